// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Kinetis UART register file, as seen by the driver.
//!
//! The driver only needs 8-bit reads and writes of a handful of registers, so it talks to this
//! trait instead of MMIO directly. [`KinetisUart`](super::kinetis::KinetisUart) implements it
//! over the real peripheral; tests implement it over a simulated one.
//!
//! Reads are not side-effect free: reading `S1` then `D` is what clears RDRF.

/// UART registers used by the driver. Discriminants are byte offsets from the peripheral base.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Reg {
    /// Baud rate high: `SBR[12:8]` in bits 4:0.
    Bdh = 0x00,
    /// Baud rate low: `SBR[7:0]`. Writing it latches the new divisor.
    Bdl = 0x01,
    /// Control 1: frame format. Zero is 8N1.
    C1 = 0x02,
    /// Control 2: interrupt and TX/RX enables.
    C2 = 0x03,
    /// Status 1.
    S1 = 0x04,
    /// Data.
    D = 0x07,
    /// Control 4: `BRFA` in bits 4:0.
    C4 = 0x0A,
}

/// Register access for one UART instance.
///
/// All methods take `&self`: the mainline half and the interrupt half of a running driver hold
/// the same register handle.
pub trait UartRegisters {
    fn read(&self, reg: Reg) -> u8;
    fn write(&self, reg: Reg, value: u8);

    /// Read-modify-write. Not atomic; callers that race an interrupt must hold a critical section.
    #[inline]
    fn modify<F: FnOnce(u8) -> u8>(&self, reg: Reg, f: F) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

impl<T: UartRegisters + ?Sized> UartRegisters for &T {
    #[inline]
    fn read(&self, reg: Reg) -> u8 {
        (**self).read(reg)
    }

    #[inline]
    fn write(&self, reg: Reg, value: u8) {
        (**self).write(reg, value)
    }
}

// Bit masks
pub mod bdh {
    pub const SBR: u8 = 0x1F;
}

pub mod c2 {
    /// Transmit interrupt enable (TDRE).
    pub const TIE: u8 = 1 << 7;
    /// Transmission complete interrupt enable.
    pub const TCIE: u8 = 1 << 6;
    /// Receive interrupt enable (RDRF).
    pub const RIE: u8 = 1 << 5;
    /// Idle line interrupt enable.
    pub const ILIE: u8 = 1 << 4;
    /// Transmitter enable.
    pub const TE: u8 = 1 << 3;
    /// Receiver enable.
    pub const RE: u8 = 1 << 2;
}

pub mod c4 {
    pub const BRFA: u8 = 0x1F;
}

/// Status register 1 snapshot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    raw: u8,
}

impl Status {
    pub const TDRE: u8 = 1 << 7;
    pub const TC: u8 = 1 << 6;
    pub const RDRF: u8 = 1 << 5;
    pub const IDLE: u8 = 1 << 4;
    pub const OR: u8 = 1 << 3;
    pub const NF: u8 = 1 << 2;
    pub const FE: u8 = 1 << 1;
    pub const PF: u8 = 1 << 0;

    #[inline]
    pub fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Transmit data register empty.
    #[inline]
    pub fn tdre(&self) -> bool {
        (self.raw & Self::TDRE) != 0
    }

    /// Transmission complete (shift register idle too).
    #[inline]
    pub fn tc(&self) -> bool {
        (self.raw & Self::TC) != 0
    }

    /// Receive data register full.
    #[inline]
    pub fn rdrf(&self) -> bool {
        (self.raw & Self::RDRF) != 0
    }

    /// Receiver overrun.
    #[inline]
    pub fn overrun(&self) -> bool {
        (self.raw & Self::OR) != 0
    }

    #[inline]
    pub fn noise(&self) -> bool {
        (self.raw & Self::NF) != 0
    }

    #[inline]
    pub fn framing(&self) -> bool {
        (self.raw & Self::FE) != 0
    }

    #[inline]
    pub fn parity(&self) -> bool {
        (self.raw & Self::PF) != 0
    }

    /// The first receive error flagged, if any, in order of severity.
    pub fn rx_error(&self) -> Option<crate::error::RxError> {
        use crate::error::RxError;
        if self.overrun() {
            Some(RxError::Overrun)
        } else if self.framing() {
            Some(RxError::Framing)
        } else if self.noise() {
            Some(RxError::Noise)
        } else if self.parity() {
            Some(RxError::Parity)
        } else {
            None
        }
    }
}
