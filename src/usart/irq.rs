// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt side of a buffered UART.
//!
//! The Kinetis UART raises one RX/TX interrupt for both "receive data register full" (RDRF, with
//! RIE) and "transmit data register empty" (TDRE, with TIE). Both flags are levels:
//!
//! - RDRF only clears once `S1` then `D` are read, so every receive service reads `D` exactly
//!   once, even if the byte is about to be dropped. Skipping the read re-enters the handler
//!   forever.
//! - TDRE is set whenever the transmitter can take a byte, so TIE has to be cleared once there is
//!   nothing left to send (see [`TxIdlePolicy`]).

use core::cell::RefCell;

use critical_section::Mutex;

use super::channel::IrqHalf;
use crate::config::TxIdlePolicy;
use crate::hw::regs::{c2, Reg, Status, UartRegisters};

/// Services one UART's RX/TX interrupt. Runs in interrupt context only.
pub struct IrqHandler<'a, R, const N: usize> {
    regs: R,
    chan: IrqHalf<'a, N>,
    policy: TxIdlePolicy,
}

impl<'a, R: UartRegisters, const N: usize> IrqHandler<'a, R, N> {
    pub(super) fn new(regs: R, chan: IrqHalf<'a, N>, policy: TxIdlePolicy) -> Self {
        Self { regs, chan, policy }
    }

    /// Entry point for the RX/TX vector.
    ///
    /// Reads `S1` once and services whichever side is asserting. Receive goes first: it is the
    /// side that loses data if late.
    pub fn on_interrupt(&mut self) {
        let status = Status::from_raw(self.regs.read(Reg::S1));

        if status.rdrf() || status.overrun() {
            self.receive(status);
        }

        if status.tdre() && (self.regs.read(Reg::C2) & c2::TIE) != 0 {
            self.on_transmit_ready();
        }
    }

    /// Move one byte from the data register into the RX ring.
    ///
    /// The data register is read unconditionally. If the ring is full the new byte is dropped
    /// and counted.
    pub fn on_receive_ready(&mut self) {
        let status = Status::from_raw(self.regs.read(Reg::S1));
        self.receive(status);
    }

    /// Move one byte from the TX ring into the data register.
    ///
    /// Under [`TxIdlePolicy::DisarmWhenEmpty`], clears TIE whenever this leaves the ring empty
    /// (or finds it empty). Under [`TxIdlePolicy::LeaveArmed`] an empty ring is a no-op.
    pub fn on_transmit_ready(&mut self) {
        if let Some(byte) = self.chan.next_tx() {
            self.regs.write(Reg::D, byte);
        }

        if self.policy == TxIdlePolicy::DisarmWhenEmpty && self.chan.tx_is_empty() {
            // The mainline can't run until we return, so no byte can slip in between the check
            // and the disarm; a later enqueue re-arms.
            self.regs.modify(Reg::C2, |v| v & !c2::TIE);
        }
    }

    /// The transmit-idle policy this handler was started with.
    #[inline]
    pub fn policy(&self) -> TxIdlePolicy {
        self.policy
    }

    fn receive(&mut self, status: Status) {
        // Second half of the S1-then-D clear sequence for RDRF/OR/NF/FE/PF.
        let byte = self.regs.read(Reg::D);

        if let Some(error) = status.rx_error() {
            self.chan.record_error(error);
        }
        // An overrun without RDRF leaves no new byte in D, just the stale one.
        if status.rdrf() {
            self.chan.push_rx(byte);
        }
    }
}

/// Static home for an [`IrqHandler`], so a fixed vector can reach the handler of its own
/// peripheral.
///
/// ```ignore
/// static UART0_IRQ: IrqSlot<KinetisUart, 64> = IrqSlot::new();
///
/// // at start-up
/// UART0_IRQ.bind(irq);
///
/// // in the vector
/// UART0_IRQ.service();
/// ```
pub struct IrqSlot<R: 'static, const N: usize> {
    handler: Mutex<RefCell<Option<IrqHandler<'static, R, N>>>>,
}

impl<R: UartRegisters + 'static, const N: usize> IrqSlot<R, N> {
    pub const fn new() -> Self {
        Self {
            handler: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install the handler. Do this before unmasking the interrupt.
    pub fn bind(&self, handler: IrqHandler<'static, R, N>) {
        critical_section::with(|cs| {
            self.handler.borrow_ref_mut(cs).replace(handler);
        });
    }

    /// Whether a handler has been installed.
    pub fn is_bound(&self) -> bool {
        critical_section::with(|cs| self.handler.borrow_ref(cs).is_some())
    }

    /// Run the bound handler. Does nothing if none is bound yet.
    ///
    /// Call from the vector only. The handler runs inside a critical section; it does a few
    /// register accesses at most.
    pub fn service(&self) {
        critical_section::with(|cs| {
            if let Some(handler) = self.handler.borrow_ref_mut(cs).as_mut() {
                handler.on_interrupt();
            }
        });
    }
}
