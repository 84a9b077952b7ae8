// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # K64 Serial
//!
//! Interrupt-driven, buffered UART driver for the NXP Kinetis K64 (FRDM-K64F), written in Rust,
//! targeting a Cortex-M4 running from the 20.48 MHz FLL clock (640 × 32.768 kHz).
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`baud`] | SBR/BRFA divisor calculation |
//! | [`queue`] | Lock-free single-producer/single-consumer byte rings |
//! | [`usart`] | UART typestate, buffered and polling running modes, interrupt handler, console |
//! | [`hw`] | Register access: trait seam, K64 MMIO blocks, clock gates, SPI0 |
//! | [`config`] | Board constants and per-UART configuration |
//! | [`error`] | Configuration and receive line errors |
//!
//! ## Getting Started
//!
//! Host tests:
//!
//! ```bash
//! cargo test --lib
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every other module.
mod fmt;

pub mod baud;
pub mod config;
pub mod error;
pub mod hw;
pub mod queue;
pub mod usart;

pub use baud::BaudDivisor;
pub use config::{TxIdlePolicy, UartConfig};
pub use error::{ConfigError, RxError};
pub use queue::ByteQueue;
pub use usart::{BlockingUart, BufferedUart, Channel, Console, IrqHandler, IrqSlot, Uart};
