// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types.

use core::fmt;

/// Baud-rate configuration that the peripheral cannot produce.
///
/// Both variants are fatal at start-up: writing a truncated divisor would give a wrong baud rate
/// rather than no baud rate, and every byte on the wire would be garbage.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The divisor does not fit the 13-bit SBR field (baud too low for the module clock).
    DivisorOverflow { divisor: u32 },
    /// The divisor would be zero, which disables the baud generator (baud too high).
    BaudTooHigh,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DivisorOverflow { divisor } => {
                write!(f, "baud divisor {} exceeds the 13-bit SBR field", divisor)
            }
            ConfigError::BaudTooHigh => f.write_str("baud rate too high for the module clock"),
        }
    }
}

/// Receive line error reported by the status register alongside a received byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxError {
    /// A byte arrived before the previous one was read out of the data register.
    Overrun,
    /// Noise detected on the received character.
    Noise,
    /// Missing stop bit.
    Framing,
    /// Parity mismatch. Only possible if parity was enabled behind this driver's back.
    Parity,
}

impl fmt::Display for RxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RxError::Overrun => "receiver overrun",
            RxError::Noise => "noise on received character",
            RxError::Framing => "framing error",
            RxError::Parity => "parity error",
        };
        f.write_str(s)
    }
}
