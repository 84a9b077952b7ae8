// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-capacity single-producer / single-consumer byte ring.
//!
//! Works in `no_std` and does not allocate memory.
//!
//! Empty and full are told apart by keeping one slot free: `read == write` is empty and
//! `write + 1 == read` (mod `N`) is full, so an `N`-byte ring holds at most `N - 1` bytes. There is
//! no sentinel value; `0x00` is an ordinary byte.
//!
//! Each cursor has exactly one writer. The [`Producer`] owns the write cursor and only reads the
//! read cursor; the [`Consumer`] does the opposite. Cursors are word-sized atomics, so the
//! cross-context read cannot tear and needs no critical section.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Backing storage and cursors. Split it once into a [`Producer`] and a [`Consumer`].
pub struct ByteQueue<const N: usize> {
    buf: UnsafeCell<[u8; N]>,
    /// Next slot to read. Written only by the consumer.
    read: AtomicUsize,
    /// Next slot to write. Written only by the producer.
    write: AtomicUsize,
}

// Slots are handed between the two halves through the acquire/release cursor protocol; a slot is
// never accessed by both sides at once.
unsafe impl<const N: usize> Sync for ByteQueue<N> {}

impl<const N: usize> ByteQueue<N> {
    const MASK: usize = N - 1;
    const VALID_CAPACITY: () = assert!(
        N >= 2 && N.is_power_of_two(),
        "queue size must be a power of two and at least 2"
    );

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;
        Self {
            buf: UnsafeCell::new([0; N]),
            read: AtomicUsize::new(0),
            write: AtomicUsize::new(0),
        }
    }

    /// Number of bytes the queue can hold at once.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Bytes currently queued. A snapshot; the other side may move on immediately.
    #[inline]
    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        write.wrapping_sub(read) & Self::MASK
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Split into the two halves. Taking `&mut self` guarantees there is only ever one of each.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let queue = &*self;
        (Producer { queue }, Consumer { queue })
    }

    #[inline]
    fn slot(&self, index: usize) -> *mut u8 {
        debug_assert!(index < N);
        // Points at a single element; never forms a reference to the whole array.
        unsafe { (self.buf.get() as *mut u8).add(index) }
    }
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half. Owns the write cursor.
pub struct Producer<'a, const N: usize> {
    queue: &'a ByteQueue<N>,
}

impl<'a, const N: usize> Producer<'a, N> {
    /// Append `byte`. Returns `false` without touching the queue if it is full.
    pub fn enqueue(&mut self, byte: u8) -> bool {
        let write = self.queue.write.load(Ordering::Relaxed);
        let next = (write + 1) & ByteQueue::<N>::MASK;
        if next == self.queue.read.load(Ordering::Acquire) {
            return false;
        }

        // The consumer will not read this slot until the release store below publishes it.
        unsafe { self.queue.slot(write).write(byte) };
        self.queue.write.store(next, Ordering::Release);
        true
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Read half. Owns the read cursor.
pub struct Consumer<'a, const N: usize> {
    queue: &'a ByteQueue<N>,
}

impl<'a, const N: usize> Consumer<'a, N> {
    /// Remove the oldest byte, if any.
    pub fn dequeue(&mut self) -> Option<u8> {
        let read = self.queue.read.load(Ordering::Relaxed);
        if read == self.queue.write.load(Ordering::Acquire) {
            return None;
        }

        // Published by the producer's release store; the producer will not reuse the slot until
        // the read cursor moves past it.
        let byte = unsafe { self.queue.slot(read).read() };
        self.queue
            .read
            .store((read + 1) & ByteQueue::<N>::MASK, Ordering::Release);
        Some(byte)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserves_one_slot() {
        let mut q = ByteQueue::<8>::new();
        assert_eq!(q.capacity(), 7);
        let (mut tx, _rx) = q.split();
        for b in 0..7 {
            assert!(tx.enqueue(b));
        }
        assert!(tx.is_full());
        assert!(!tx.enqueue(0xFF));
    }

    #[test]
    fn preserves_insertion_order() {
        let mut q = ByteQueue::<16>::new();
        let (mut tx, mut rx) = q.split();
        for b in b"hello" {
            assert!(tx.enqueue(*b));
        }
        let mut out = [0u8; 5];
        for slot in out.iter_mut() {
            *slot = rx.dequeue().unwrap();
        }
        assert_eq!(&out, b"hello");
        assert_eq!(rx.dequeue(), None);
        assert!(rx.is_empty());
    }

    #[test]
    fn rejection_leaves_queue_unchanged() {
        let mut q = ByteQueue::<4>::new();
        let (mut tx, mut rx) = q.split();
        assert!(tx.enqueue(1));
        assert!(tx.enqueue(2));
        assert!(tx.enqueue(3));

        let before = (q_cursors(&tx), tx.len());
        assert!(!tx.enqueue(4));
        assert!(!tx.enqueue(5));
        assert_eq!((q_cursors(&tx), tx.len()), before);

        assert_eq!(rx.dequeue(), Some(1));
        assert_eq!(rx.dequeue(), Some(2));
        assert_eq!(rx.dequeue(), Some(3));
        assert_eq!(rx.dequeue(), None);
    }

    fn q_cursors<const N: usize>(tx: &Producer<'_, N>) -> (usize, usize) {
        (
            tx.queue.read.load(Ordering::Relaxed),
            tx.queue.write.load(Ordering::Relaxed),
        )
    }

    #[test]
    fn zero_is_ordinary_data() {
        let mut q = ByteQueue::<4>::new();
        let (mut tx, mut rx) = q.split();
        assert!(tx.enqueue(0x00));
        assert!(tx.enqueue(0x00));
        assert_eq!(rx.len(), 2);
        assert_eq!(rx.dequeue(), Some(0x00));
        assert_eq!(rx.dequeue(), Some(0x00));
        assert_eq!(rx.dequeue(), None);
    }

    #[test]
    fn wraps_many_times() {
        let mut q = ByteQueue::<4>::new();
        let (mut tx, mut rx) = q.split();
        let mut expected = 0u8;
        for round in 0..100u32 {
            let n = (round % 3) as u8 + 1;
            for i in 0..n {
                assert!(tx.enqueue(expected.wrapping_add(i)));
            }
            for _ in 0..n {
                assert_eq!(rx.dequeue(), Some(expected));
                expected = expected.wrapping_add(1);
            }
            assert!(rx.is_empty());
        }
    }

    #[test]
    fn len_tracks_across_wrap() {
        let mut q = ByteQueue::<4>::new();
        let (mut tx, mut rx) = q.split();
        tx.enqueue(1);
        tx.enqueue(2);
        rx.dequeue();
        rx.dequeue();
        // both cursors at 2; fill across the end of the buffer
        tx.enqueue(3);
        tx.enqueue(4);
        tx.enqueue(5);
        assert_eq!(rx.len(), 3);
        assert!(tx.is_full());
    }
}
