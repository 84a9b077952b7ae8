// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated UART register file for host tests.
//!
//! Models just enough of the Kinetis UART to exercise the driver:
//!
//! - TDRE and TC are set unless the transmitter is held busy; writing `D` with TE set emits the
//!   byte immediately.
//! - RDRF follows the injected receive backlog; reading `D` pops one byte, if any, and clears the
//!   error flags.
//! - [`MockUart::interrupt_pending`] reports what the NVIC would see, so a test can detect an
//!   interrupt storm.

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use super::regs::{c2, Reg, Status, UartRegisters};

const REG_FILE_LEN: usize = 0x0B;

#[derive(Debug)]
pub struct MockUart {
    regs: [Cell<u8>; REG_FILE_LEN],
    tx_busy: Cell<bool>,
    rx_backlog: RefCell<VecDeque<u8>>,
    rx_errors: Cell<u8>,
    tx_log: RefCell<Vec<u8>>,
    write_log: RefCell<Vec<(Reg, u8)>>,
    data_reads: Cell<usize>,
}

impl MockUart {
    /// Register file at its reset values.
    pub fn new() -> Self {
        let regs: [Cell<u8>; REG_FILE_LEN] = Default::default();
        regs[Reg::Bdl as usize].set(0x04);
        Self {
            regs,
            tx_busy: Cell::new(false),
            rx_backlog: RefCell::new(VecDeque::new()),
            rx_errors: Cell::new(0),
            tx_log: RefCell::new(Vec::new()),
            write_log: RefCell::new(Vec::new()),
            data_reads: Cell::new(0),
        }
    }

    /// Set a register without logging it, e.g. to seed bits the driver must preserve.
    pub fn preset(&self, reg: Reg, value: u8) {
        self.regs[reg as usize].set(value);
    }

    /// Current raw register value, without read side effects.
    pub fn peek(&self, reg: Reg) -> u8 {
        match reg {
            Reg::S1 => self.status(),
            _ => self.regs[reg as usize].get(),
        }
    }

    /// Bytes that reached the wire, in order.
    pub fn transmitted(&self) -> Vec<u8> {
        self.tx_log.borrow().clone()
    }

    /// Every register write the driver made, in order.
    pub fn writes(&self) -> Vec<(Reg, u8)> {
        self.write_log.borrow().clone()
    }

    /// Number of times `D` was read.
    pub fn data_reads(&self) -> usize {
        self.data_reads.get()
    }

    /// Queue a byte on the receive line.
    pub fn inject_rx(&self, byte: u8) {
        self.rx_backlog.borrow_mut().push_back(byte);
    }

    /// Raise line error flags (`Status::OR` etc.) until the next read of `D`.
    ///
    /// With an empty backlog this gives an overrun reported without RDRF.
    pub fn inject_rx_error(&self, flags: u8) {
        self.rx_errors.set(self.rx_errors.get() | flags);
    }

    /// Hold the transmitter busy: TDRE and TC stay clear.
    pub fn set_tx_busy(&self, busy: bool) {
        self.tx_busy.set(busy);
    }

    /// Whether the UART would currently be asserting its RX/TX interrupt line.
    pub fn interrupt_pending(&self) -> bool {
        let ctl = self.regs[Reg::C2 as usize].get();
        let s1 = Status::from_raw(self.status());
        ((ctl & c2::TIE) != 0 && s1.tdre()) || ((ctl & c2::RIE) != 0 && s1.rdrf())
    }

    fn status(&self) -> u8 {
        let mut s1 = 0;
        if !self.tx_busy.get() {
            s1 |= Status::TDRE | Status::TC;
        }
        if !self.rx_backlog.borrow().is_empty() {
            s1 |= Status::RDRF;
        }
        s1 | self.rx_errors.get()
    }
}

impl Default for MockUart {
    fn default() -> Self {
        Self::new()
    }
}

impl UartRegisters for MockUart {
    fn read(&self, reg: Reg) -> u8 {
        match reg {
            Reg::S1 => self.status(),
            Reg::D => {
                self.data_reads.set(self.data_reads.get() + 1);
                self.rx_errors.set(0);
                match self.rx_backlog.borrow_mut().pop_front() {
                    Some(byte) => {
                        self.regs[Reg::D as usize].set(byte);
                        byte
                    }
                    None => self.regs[Reg::D as usize].get(),
                }
            }
            _ => self.regs[reg as usize].get(),
        }
    }

    fn write(&self, reg: Reg, value: u8) {
        self.write_log.borrow_mut().push((reg, value));
        match reg {
            Reg::S1 => {}
            Reg::D => {
                let ctl = self.regs[Reg::C2 as usize].get();
                if (ctl & c2::TE) != 0 && !self.tx_busy.get() {
                    self.tx_log.borrow_mut().push(value);
                }
            }
            _ => self.regs[reg as usize].set(value),
        }
    }
}
