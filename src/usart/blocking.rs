// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Polling UART.
//!
//! No queue and no interrupt sources: every call looks at `S1` directly. The non-blocking
//! [`SerialWrite`]/[`SerialRead`] impls report `WouldBlock`; the `blocking_*` helpers spin on them
//! with `nb::block!`.

use core::convert::Infallible;
use nb::block;

use super::{SerialRead, SerialWrite};
use crate::error::RxError;
use crate::hw::regs::{Reg, Status, UartRegisters};

/// Running UART in polling mode.
pub struct BlockingUart<R> {
    regs: R,
}

impl<R: UartRegisters> BlockingUart<R> {
    pub(super) fn new(regs: R) -> Self {
        Self { regs }
    }

    #[inline]
    fn status(&self) -> Status {
        Status::from_raw(self.regs.read(Reg::S1))
    }

    /// Wait for the data register to free up, then write `byte`.
    #[inline]
    pub fn blocking_put_byte(&mut self, byte: u8) {
        let _ = block!(self.write(byte));
    }

    /// Wait for a byte to arrive.
    ///
    /// A line error is reported after the byte has been read out, so the flag is already clear
    /// and the next call starts fresh.
    #[inline]
    pub fn blocking_get_byte(&mut self) -> Result<u8, RxError> {
        block!(self.read())
    }

    pub fn blocking_put_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.blocking_put_byte(b);
        }
    }

    /// Wait until the last byte has left the shift register.
    #[inline]
    pub fn blocking_flush(&mut self) {
        let _ = block!(self.flush());
    }

    /// Give back the register handle.
    pub fn free(self) -> R {
        self.regs
    }
}

impl<R: UartRegisters> SerialWrite for BlockingUart<R> {
    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if !self.status().tdre() {
            return Err(nb::Error::WouldBlock);
        }
        self.regs.write(Reg::D, byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.status().tc() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<R: UartRegisters> SerialRead for BlockingUart<R> {
    type Error = RxError;

    fn read(&mut self) -> nb::Result<u8, RxError> {
        let status = self.status();
        if !status.rdrf() && !status.overrun() {
            return Err(nb::Error::WouldBlock);
        }

        // always read D, it is what clears the flags
        let byte = self.regs.read(Reg::D);
        match status.rx_error() {
            Some(e) => Err(nb::Error::Other(e)),
            None => Ok(byte),
        }
    }
}
