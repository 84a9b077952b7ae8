// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Buffered byte channel: the TX and RX rings of one UART.
//!
//! A [`Channel`] is split once into a [`MainlineHalf`] (TX producer, RX consumer) and an
//! [`IrqHalf`] (TX consumer, RX producer). Neither half can resize or move the storage.
//!
//! Receive overflow drops the *newest* byte and counts it. Dropping the oldest instead would
//! need the interrupt to move the RX read cursor, which belongs to the mainline.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::RxError;
use crate::queue::{ByteQueue, Consumer, Producer};

/// Error and overflow counters. Written from interrupt context only.
#[derive(Default)]
pub struct Stats {
    rx_dropped: AtomicU32,
    overrun: AtomicU32,
    framing: AtomicU32,
    noise: AtomicU32,
    parity: AtomicU32,
}

impl Stats {
    pub const fn new() -> Self {
        Self {
            rx_dropped: AtomicU32::new(0),
            overrun: AtomicU32::new(0),
            framing: AtomicU32::new(0),
            noise: AtomicU32::new(0),
            parity: AtomicU32::new(0),
        }
    }

    #[inline]
    fn bump(counter: &AtomicU32) {
        // single writer, so load/store is enough and works without LDREX/STREX
        counter.store(
            counter.load(Ordering::Relaxed).wrapping_add(1),
            Ordering::Relaxed,
        );
    }

    fn record(&self, error: RxError) {
        match error {
            RxError::Overrun => Self::bump(&self.overrun),
            RxError::Framing => Self::bump(&self.framing),
            RxError::Noise => Self::bump(&self.noise),
            RxError::Parity => Self::bump(&self.parity),
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rx_dropped: self.rx_dropped.load(Ordering::Relaxed),
            overrun: self.overrun.load(Ordering::Relaxed),
            framing: self.framing.load(Ordering::Relaxed),
            noise: self.noise.load(Ordering::Relaxed),
            parity: self.parity.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Stats`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsSnapshot {
    /// Bytes received while the RX ring was full, and discarded.
    pub rx_dropped: u32,
    /// Hardware receiver overruns (a byte was lost before the interrupt ran).
    pub overrun: u32,
    pub framing: u32,
    pub noise: u32,
    pub parity: u32,
}

/// TX and RX rings plus counters for one peripheral.
pub struct Channel<const N: usize> {
    tx: ByteQueue<N>,
    rx: ByteQueue<N>,
    stats: Stats,
}

impl<const N: usize> Channel<N> {
    pub const fn new() -> Self {
        Self {
            tx: ByteQueue::new(),
            rx: ByteQueue::new(),
            stats: Stats::new(),
        }
    }

    /// Bytes each direction can hold.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Split into the mainline and interrupt halves.
    pub fn split(&mut self) -> (MainlineHalf<'_, N>, IrqHalf<'_, N>) {
        let (tx_prod, tx_cons) = self.tx.split();
        let (rx_prod, rx_cons) = self.rx.split();
        let stats = &self.stats;
        (
            MainlineHalf {
                tx: tx_prod,
                rx: rx_cons,
                stats,
            },
            IrqHalf {
                tx: tx_cons,
                rx: rx_prod,
                stats,
            },
        )
    }
}

impl<const N: usize> Default for Channel<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mainline side: fills TX, drains RX. Never blocks.
pub struct MainlineHalf<'a, const N: usize> {
    tx: Producer<'a, N>,
    rx: Consumer<'a, N>,
    stats: &'a Stats,
}

impl<'a, const N: usize> MainlineHalf<'a, N> {
    /// Offer a byte for transmission. `false` if the TX ring is full; nothing changes then.
    #[inline]
    pub fn try_enqueue(&mut self, byte: u8) -> bool {
        self.tx.enqueue(byte)
    }

    /// Take the oldest received byte, if any.
    #[inline]
    pub fn try_dequeue(&mut self) -> Option<u8> {
        self.rx.dequeue()
    }

    /// Bytes waiting to be sent.
    #[inline]
    pub fn tx_pending(&self) -> usize {
        self.tx.len()
    }

    /// Bytes waiting to be read.
    #[inline]
    pub fn rx_available(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn tx_is_full(&self) -> bool {
        self.tx.is_full()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

/// Interrupt side: drains TX, fills RX.
pub struct IrqHalf<'a, const N: usize> {
    tx: Consumer<'a, N>,
    rx: Producer<'a, N>,
    stats: &'a Stats,
}

impl<'a, const N: usize> IrqHalf<'a, N> {
    /// Next byte to put on the wire.
    #[inline]
    pub fn next_tx(&mut self) -> Option<u8> {
        self.tx.dequeue()
    }

    #[inline]
    pub fn tx_is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// Store a received byte. When the ring is full the byte is dropped and counted.
    pub fn push_rx(&mut self, byte: u8) -> bool {
        if self.rx.enqueue(byte) {
            true
        } else {
            Stats::bump(&self.stats.rx_dropped);
            false
        }
    }

    /// Count a line error reported alongside a received byte.
    #[inline]
    pub fn record_error(&self, error: RxError) {
        self.stats.record(error);
    }
}
