// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Build-time configuration.
//!
//! There is no runtime configuration surface: the baud rate and module clock are compiled in.

/// UART module clock in Hz (core clock after reset in FEI mode).
pub const SYS_CLOCK_HZ: u32 = 20_485_760;

/// Default baud rate for both UARTs.
pub const BAUD_RATE: u32 = 9600;

/// Size of each TX/RX ring. Must be a power of two; one slot is kept free.
pub const QUEUE_CAPACITY: usize = 64;

/// What the transmit interrupt handler does once it has nothing left to send.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxIdlePolicy {
    /// Clear TIE when the TX queue runs empty. The next enqueue re-arms it.
    ///
    /// Required on the Kinetis UART: TDRE is a level, so an armed TIE with an idle transmitter
    /// re-enters the handler forever.
    DisarmWhenEmpty,
    /// Leave TIE set and let the handler no-op on an empty queue.
    ///
    /// Only correct for peripherals whose transmit-empty interrupt is edge-triggered.
    LeaveArmed,
}

/// Peripheral configuration for one UART instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UartConfig {
    /// UART module clock in Hz.
    pub module_clock_hz: u32,
    /// Target baud rate.
    pub baud_rate: u32,
    /// Transmit interrupt behaviour on an empty queue.
    pub tx_idle: TxIdlePolicy,
}

impl UartConfig {
    pub const fn new(module_clock_hz: u32, baud_rate: u32) -> Self {
        Self {
            module_clock_hz,
            baud_rate,
            tx_idle: TxIdlePolicy::DisarmWhenEmpty,
        }
    }

    /// Set the baud rate.
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the transmit-idle policy.
    pub const fn with_tx_idle(mut self, tx_idle: TxIdlePolicy) -> Self {
        self.tx_idle = tx_idle;
        self
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::new(SYS_CLOCK_HZ, BAUD_RATE)
    }
}
