// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mainline side of an interrupt-driven UART.
//!
//! Nothing here blocks. A full TX ring or an empty RX ring is reported to the caller, who decides
//! whether to retry, drop, or wait (e.g. with `nb::block!` on the [`SerialWrite`] impl).

use core::convert::Infallible;

use super::channel::{MainlineHalf, StatsSnapshot};
use super::{SerialRead, SerialWrite};
use crate::hw::regs::{c2, Reg, Status, UartRegisters};

/// Mainline handle of a running buffered UART.
pub struct BufferedUart<'a, R, const N: usize> {
    regs: R,
    chan: MainlineHalf<'a, N>,
}

impl<'a, R: UartRegisters, const N: usize> BufferedUart<'a, R, N> {
    pub(super) fn new(regs: R, chan: MainlineHalf<'a, N>) -> Self {
        Self { regs, chan }
    }

    /// Queue one byte for transmission.
    ///
    /// Returns `false`, and changes nothing, if the TX ring is full.
    pub fn put_byte(&mut self, byte: u8) -> bool {
        if !self.chan.try_enqueue(byte) {
            return false;
        }
        self.arm_transmit();
        true
    }

    /// Queue as many of `bytes` as fit, in order.
    ///
    /// Stops at the first byte that does not fit and returns how many were accepted, so the
    /// caller can resume from `bytes[n..]` without reordering anything.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &b in bytes {
            if !self.chan.try_enqueue(b) {
                break;
            }
            accepted += 1;
        }
        if accepted > 0 {
            self.arm_transmit();
        }
        accepted
    }

    /// [`put_bytes`](Self::put_bytes) for a string.
    #[inline]
    pub fn put_str(&mut self, s: &str) -> usize {
        self.put_bytes(s.as_bytes())
    }

    /// Take one received byte, if any.
    #[inline]
    pub fn get_byte(&mut self) -> Option<u8> {
        self.chan.try_dequeue()
    }

    /// Drain received bytes into `buf`. Returns the count copied.
    pub fn get_bytes(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.chan.try_dequeue() {
                Some(b) => {
                    *slot = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// Bytes queued but not yet handed to the data register.
    #[inline]
    pub fn tx_pending(&self) -> usize {
        self.chan.tx_pending()
    }

    /// Bytes received and not yet read.
    #[inline]
    pub fn rx_available(&self) -> usize {
        self.chan.rx_available()
    }

    /// Overflow and line-error counters.
    #[inline]
    pub fn stats(&self) -> StatsSnapshot {
        self.chan.stats()
    }

    /// Make sure TIE is set after publishing a byte.
    ///
    /// The byte is already visible to the handler, which only clears TIE after finding the ring
    /// empty; so after this runs the byte is either sent or TIE is on. C2 is shared with the
    /// handler's disarm, hence the critical section around the read-modify-write.
    fn arm_transmit(&self) {
        critical_section::with(|_| {
            let ctl = self.regs.read(Reg::C2);
            if (ctl & c2::TIE) == 0 {
                self.regs.write(Reg::C2, ctl | c2::TIE);
            }
        });
    }
}

impl<'a, R: UartRegisters, const N: usize> SerialWrite for BufferedUart<'a, R, N> {
    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if self.put_byte(byte) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.chan.tx_pending() != 0 {
            return Err(nb::Error::WouldBlock);
        }
        if Status::from_raw(self.regs.read(Reg::S1)).tc() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<'a, R: UartRegisters, const N: usize> SerialRead for BufferedUart<'a, R, N> {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.get_byte().ok_or(nb::Error::WouldBlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UartConfig;
    use crate::hw::mock::MockUart;
    use crate::usart::{Channel, Uart};

    #[test]
    fn first_byte_arms_transmit() {
        let mock = MockUart::new();
        let mut channel = Channel::<8>::new();
        let (mut uart, _irq) = Uart::new(&mock)
            .configure(&UartConfig::default())
            .unwrap()
            .into_buffered(&mut channel);

        assert_eq!(mock.peek(Reg::C2) & c2::TIE, 0);
        assert!(uart.put_byte(0x41));
        assert_ne!(mock.peek(Reg::C2) & c2::TIE, 0);
        assert!(mock.interrupt_pending());
        // still queued until the interrupt runs
        assert!(mock.transmitted().is_empty());
        assert_eq!(uart.tx_pending(), 1);
    }

    #[test]
    fn full_ring_rejects_without_change() {
        let mock = MockUart::new();
        let mut channel = Channel::<4>::new();
        let (mut uart, _irq) = Uart::new(&mock)
            .configure(&UartConfig::default())
            .unwrap()
            .into_buffered(&mut channel);

        assert!(uart.put_byte(1));
        assert!(uart.put_byte(2));
        assert!(uart.put_byte(3));
        let c2_before = mock.peek(Reg::C2);
        let writes_before = mock.writes().len();

        assert!(!uart.put_byte(4));
        assert_eq!(uart.tx_pending(), 3);
        assert_eq!(mock.peek(Reg::C2), c2_before);
        assert_eq!(mock.writes().len(), writes_before);
    }

    #[test]
    fn put_str_stops_at_first_rejection() {
        let mock = MockUart::new();
        let mut channel = Channel::<4>::new();
        let (mut uart, _irq) = Uart::new(&mock)
            .configure(&UartConfig::default())
            .unwrap()
            .into_buffered(&mut channel);

        assert_eq!(uart.put_str("hello"), 3);
        assert_eq!(uart.put_str("x"), 0);
        assert_eq!(uart.tx_pending(), 3);
    }

    #[test]
    fn put_bytes_arms_once() {
        let mock = MockUart::new();
        let mut channel = Channel::<16>::new();
        let (mut uart, _irq) = Uart::new(&mock)
            .configure(&UartConfig::default())
            .unwrap()
            .into_buffered(&mut channel);

        let before = mock.writes().len();
        assert_eq!(uart.put_bytes(b"abc"), 3);
        let c2_writes = mock.writes()[before..]
            .iter()
            .filter(|(r, _)| *r == Reg::C2)
            .count();
        assert_eq!(c2_writes, 1);
    }

    #[test]
    fn nb_write_reports_would_block() {
        let mock = MockUart::new();
        let mut channel = Channel::<2>::new();
        let (mut uart, _irq) = Uart::new(&mock)
            .configure(&UartConfig::default())
            .unwrap()
            .into_buffered(&mut channel);

        assert_eq!(SerialWrite::write(&mut uart, 7), Ok(()));
        assert_eq!(
            SerialWrite::write(&mut uart, 8),
            Err(nb::Error::WouldBlock)
        );
        assert_eq!(SerialRead::read(&mut uart), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn flush_waits_for_ring_and_shift_register() {
        let mock = MockUart::new();
        let mut channel = Channel::<8>::new();
        let (mut uart, mut irq) = Uart::new(&mock)
            .configure(&UartConfig::default())
            .unwrap()
            .into_buffered(&mut channel);

        assert_eq!(uart.flush(), Ok(()));
        uart.put_byte(0x55);
        assert_eq!(uart.flush(), Err(nb::Error::WouldBlock));

        irq.on_interrupt();
        mock.set_tx_busy(true);
        assert_eq!(uart.flush(), Err(nb::Error::WouldBlock));
        mock.set_tx_busy(false);
        assert_eq!(uart.flush(), Ok(()));
    }

    #[test]
    fn handler_drains_between_publish_and_arm() {
        let mock = MockUart::new();
        let mut channel = Channel::<8>::new();
        let (mut uart, mut irq) = Uart::new(&mock)
            .configure(&UartConfig::default())
            .unwrap()
            .into_buffered(&mut channel);

        // Byte published, then the interrupt runs before TIE is set.
        assert!(uart.chan.try_enqueue(0x41));
        irq.on_transmit_ready();
        assert_eq!(mock.transmitted(), vec![0x41]);
        assert_eq!(mock.peek(Reg::C2) & c2::TIE, 0);

        uart.arm_transmit();

        // At most one spurious entry, which finds the ring empty and disarms.
        let mut runs = 0;
        while mock.interrupt_pending() && runs < 10 {
            irq.on_interrupt();
            runs += 1;
        }
        assert!(runs <= 1);
        assert_eq!(mock.transmitted(), vec![0x41]);
        assert!(!mock.interrupt_pending());
        assert_eq!(uart.tx_pending(), 0);
    }

    #[test]
    fn get_bytes_drains_in_order() {
        let mock = MockUart::new();
        let mut channel = Channel::<8>::new();
        let (mut uart, mut irq) = Uart::new(&mock)
            .configure(&UartConfig::default())
            .unwrap()
            .into_buffered(&mut channel);

        for &b in b"xyz" {
            mock.inject_rx(b);
            irq.on_interrupt();
        }
        let mut buf = [0u8; 8];
        assert_eq!(uart.get_bytes(&mut buf), 3);
        assert_eq!(&buf[..3], b"xyz");
        assert_eq!(uart.rx_available(), 0);
    }
}
