// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hardware access.
//!
//! Drivers only talk to a UART through [`UartRegisters`]; [`kinetis`] provides the real MMIO
//! implementation and the K64 system plumbing (clock gates, pin mux, NVIC, watchdog).

pub mod kinetis;
pub mod regs;
pub mod spi;

#[cfg(test)]
pub mod mock;

pub use kinetis::{Instance, KinetisUart};
pub use regs::{Reg, Status, UartRegisters};
