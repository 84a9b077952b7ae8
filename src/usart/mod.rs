// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Kinetis UART driver.
//!
//! A UART goes through three states, tracked in the type:
//!
//! | State | Reached by | What has happened |
//! | ----- | ---------- | ----------------- |
//! | [`Unconfigured`] | [`Uart::new`] | nothing; clocks and pins must already be on |
//! | [`Configured`] | [`Uart::configure`] | TX/RX off, 8N1, baud divisor written |
//! | running | [`Uart::into_buffered`] / [`Uart::into_blocking`] | TX/RX on, interrupts armed if buffered |
//!
//! There is no way back: the rate is never changed at runtime.
//!
//! The buffered mode ([`BufferedUart`] + [`IrqHandler`]) is the normal one. [`BlockingUart`] is a
//! polling alternative for when no interrupt vector is available.

pub mod blocking;
pub mod buffered;
pub mod channel;
pub mod console;
pub mod irq;

pub use blocking::BlockingUart;
pub use buffered::BufferedUart;
pub use channel::{Channel, StatsSnapshot};
pub use console::Console;
pub use irq::{IrqHandler, IrqSlot};

use core::convert::Infallible;

use crate::baud::BaudDivisor;
use crate::config::{TxIdlePolicy, UartConfig};
use crate::error::ConfigError;
use crate::hw::regs::{bdh, c2, c4, Reg, UartRegisters};

/// Byte sink with a non-blocking write, implemented by both running modes.
pub trait SerialWrite {
    /// Queue or send one byte. `WouldBlock` when there is no room right now.
    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible>;

    /// `WouldBlock` until every written byte has left the shift register.
    fn flush(&mut self) -> nb::Result<(), Infallible>;
}

/// Byte source with a non-blocking read, implemented by both running modes.
pub trait SerialRead {
    type Error;

    /// The next received byte. `WouldBlock` when nothing has arrived.
    fn read(&mut self) -> nb::Result<u8, Self::Error>;
}

/// Typestate: registers untouched.
pub struct Unconfigured;

/// Typestate: divisor and frame format written, transmitter and receiver still off.
pub struct Configured {
    config: UartConfig,
    divisor: BaudDivisor,
}

/// One UART instance in a pre-running state.
pub struct Uart<R, S> {
    regs: R,
    state: S,
}

/// TX/RX enables plus every interrupt source the driver may have left on.
const C2_RUN_BITS: u8 = c2::TE | c2::RE | c2::TIE | c2::TCIE | c2::RIE | c2::ILIE;

impl<R: UartRegisters> Uart<R, Unconfigured> {
    /// Wrap a register handle.
    ///
    /// The peripheral's clock gate and pin mux must already be enabled
    /// (see [`crate::hw::kinetis::enable_peripheral`]).
    pub fn new(regs: R) -> Self {
        Self {
            regs,
            state: Unconfigured,
        }
    }

    /// Write frame format and baud divisor.
    ///
    /// Fails without touching any register if the baud rate is unreachable from the module clock.
    pub fn configure(self, config: &UartConfig) -> Result<Uart<R, Configured>, ConfigError> {
        let divisor =
            BaudDivisor::compute(config.module_clock_hz, config.baud_rate).map_err(|e| {
                warn!(
                    "uart: {} baud unreachable from a {} Hz clock",
                    config.baud_rate,
                    config.module_clock_hz
                );
                e
            })?;
        let regs = self.regs;

        // Everything off while format and rate change.
        regs.modify(Reg::C2, |v| v & !C2_RUN_BITS);

        // 8N1
        regs.write(Reg::C1, 0);

        // BDL must follow BDH: the divisor latches on the BDL write.
        regs.modify(Reg::Bdh, |v| (v & !bdh::SBR) | divisor.sbr_high());
        regs.write(Reg::Bdl, divisor.sbr_low());
        regs.modify(Reg::C4, |v| (v & !c4::BRFA) | divisor.brfa());

        info!(
            "uart configured: {} baud, sbr={} brfa={} (actual {} baud)",
            config.baud_rate,
            divisor.sbr(),
            divisor.brfa(),
            divisor.actual_baud(config.module_clock_hz)
        );

        Ok(Uart {
            regs,
            state: Configured {
                config: *config,
                divisor,
            },
        })
    }
}

impl<R: UartRegisters> Uart<R, Configured> {
    /// The divisor that was written.
    pub fn divisor(&self) -> BaudDivisor {
        self.state.divisor
    }

    pub fn config(&self) -> &UartConfig {
        &self.state.config
    }

    /// Start in interrupt-driven mode on `channel`.
    ///
    /// Returns the mainline handle and the interrupt handler. The handler must be bound to the
    /// peripheral's RX/TX vector (see [`IrqSlot`]) before the NVIC line is unmasked.
    ///
    /// RIE is armed immediately. With [`TxIdlePolicy::DisarmWhenEmpty`] TIE stays off until the
    /// first byte is queued, since TDRE is already set and would fire at once with nothing to send.
    pub fn into_buffered<'a, const N: usize>(
        self,
        channel: &'a mut Channel<N>,
    ) -> (BufferedUart<'a, R, N>, IrqHandler<'a, R, N>)
    where
        R: Clone,
    {
        let policy = self.state.config.tx_idle;
        let (main, irq) = channel.split();

        let mut enable = c2::RIE | c2::TE | c2::RE;
        if policy == TxIdlePolicy::LeaveArmed {
            enable |= c2::TIE;
        }
        self.regs.modify(Reg::C2, |v| v | enable);

        info!("uart running, buffered ({} byte rings)", N - 1);

        (
            BufferedUart::new(self.regs.clone(), main),
            IrqHandler::new(self.regs, irq, policy),
        )
    }

    /// Start in polling mode: transmitter and receiver on, no interrupt sources.
    pub fn into_blocking(self) -> BlockingUart<R> {
        self.regs.modify(Reg::C2, |v| v | c2::TE | c2::RE);
        info!("uart running, blocking");
        BlockingUart::new(self.regs)
    }
}
