// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Text output over a UART.
//!
//! Provides several printing helpers for hex, decimal, and ASCII strings to print to an attached
//! terminal. Works over either running mode; with a [`BufferedUart`](super::BufferedUart) each byte
//! waits for ring space, so don't print from interrupt context.
//!
//! Note: When using `writeln!`, be sure to include `\r` (CR) in the format string to ensure correct
//! line endings on the terminal.
//!
//! To access the terminal on the host machine, connect to the OpenSDA USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 9600
//! ```

use core::fmt;
use nb::block;

use super::SerialWrite;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

pub struct Console<W: SerialWrite> {
    out: W,
}

impl<W: SerialWrite> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Borrow the underlying writer, e.g. to read from a buffered UART.
    pub fn inner(&mut self) -> &mut W {
        &mut self.out
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.out.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until everything written so far is on the wire.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.out.flush());
    }

    pub fn print_hex_u8(&mut self, n: u8) {
        self.write_str("0x");
        self.write_byte(HEX[((n >> 4) & 0xF) as usize]);
        self.write_byte(HEX[(n & 0xF) as usize]);
    }

    pub fn print_hex_u16(&mut self, n: u16) {
        self.write_str("0x");
        for shift in (0..=12).rev().step_by(4) {
            self.write_byte(HEX[((n >> shift) & 0xF) as usize]);
        }
    }

    pub fn print_hex_u32(&mut self, n: u32) {
        self.write_str("0x");
        for (i, shift) in (0..=28).rev().step_by(4).enumerate() {
            if i == 4 {
                self.write_byte(b'_');
            }
            self.write_byte(HEX[((n >> shift) & 0xF) as usize]);
        }
    }

    pub fn print_u32(&mut self, mut n: u32) {
        let mut buf = [0u8; 10];
        let mut i = buf.len();
        if n == 0 {
            self.write_byte(b'0');
            return;
        }
        while n > 0 {
            i -= 1;
            buf[i] = b'0' + (n % 10) as u8;
            n /= 10;
        }
        for &b in &buf[i..] {
            self.write_byte(b);
        }
    }

    pub fn free(self) -> W {
        self.out
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Console`.
impl<W: SerialWrite> fmt::Write for Console<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Console::write_str(self, s);
        Ok(())
    }
}
