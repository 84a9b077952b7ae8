// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Baud-rate divisor calculation for the Kinetis UART.
//!
//! The UART divides its module clock by `16 * (SBR + BRFD)`, where `SBR` is a 13-bit integer
//! divisor split across `BDH[4:0]` and `BDL`, and `BRFD = BRFA / 32` is a fine adjust held in
//! `C4[4:0]`.

use crate::error::ConfigError;

/// Largest value the 13-bit SBR field can hold.
pub const SBR_MAX: u32 = (1 << 13) - 1;

/// Largest value the 5-bit BRFA field can hold.
pub const BRFA_MAX: u8 = 31;

/// Integer divisor and fine adjust for one baud rate.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudDivisor {
    sbr: u16,
    brfa: u8,
}

impl BaudDivisor {
    /// Compute the divisor for `baud` from a module clock of `module_clock_hz`.
    ///
    /// # Panics
    ///
    /// If either argument is zero. That is a configuration bug, not a runtime condition.
    pub fn compute(module_clock_hz: u32, baud: u32) -> Result<Self, ConfigError> {
        assert!(module_clock_hz != 0, "module clock must be non-zero");
        assert!(baud != 0, "baud rate must be non-zero");

        let clock = module_clock_hz as u64;
        let div16 = baud as u64 * 16;

        let sbr = clock / div16;
        if sbr > SBR_MAX as u64 {
            return Err(ConfigError::DivisorOverflow {
                divisor: sbr.min(u32::MAX as u64) as u32,
            });
        }
        if sbr == 0 {
            return Err(ConfigError::BaudTooHigh);
        }

        // Remainder in 1/32 units; always < 32 since sbr is the floor.
        let brfa = (clock * 32) / div16 - sbr * 32;

        Ok(Self {
            sbr: sbr as u16,
            brfa: brfa as u8,
        })
    }

    #[inline]
    pub fn sbr(&self) -> u16 {
        self.sbr
    }

    #[inline]
    pub fn brfa(&self) -> u8 {
        self.brfa
    }

    /// SBR[12:8], destined for `BDH[4:0]`.
    #[inline]
    pub fn sbr_high(&self) -> u8 {
        (self.sbr >> 8) as u8 & 0x1F
    }

    /// SBR[7:0], destined for `BDL`.
    #[inline]
    pub fn sbr_low(&self) -> u8 {
        self.sbr as u8
    }

    /// Baud rate this divisor actually produces from `module_clock_hz`.
    ///
    /// `clock / (16 * (sbr + brfa / 32))`, kept in integers as `2 * clock / (32 * sbr + brfa)`.
    pub fn actual_baud(&self, module_clock_hz: u32) -> u32 {
        let denom = 32 * self.sbr as u64 + self.brfa as u64;
        (2 * module_clock_hz as u64 / denom) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clock_at_9600() {
        let d = BaudDivisor::compute(20_485_760, 9600).unwrap();
        assert_eq!(d.sbr(), 133);
        // (20485760 * 32) / (9600 * 16) = 4267, minus 133 * 32 = 4256
        assert_eq!(d.brfa(), 11);
        assert_eq!(d.sbr_high(), 0);
        assert_eq!(d.sbr_low(), 133);
    }

    #[test]
    fn default_clock_at_115200() {
        let d = BaudDivisor::compute(20_485_760, 115_200).unwrap();
        assert_eq!(d.sbr(), 11);
        assert_eq!(d.brfa(), 3);
    }

    #[test]
    fn actual_baud_within_tolerance() {
        for &baud in &[1200u32, 9600, 19_200, 57_600, 115_200] {
            let d = BaudDivisor::compute(20_485_760, baud).unwrap();
            let actual = d.actual_baud(20_485_760);
            let err = (actual as i64 - baud as i64).unsigned_abs();
            // better than 1%
            assert!(err * 100 < baud as u64, "baud {} produced {}", baud, actual);
        }
    }

    #[test]
    fn high_sbr_bits_split() {
        // 120 MHz at 1200 baud -> sbr 6250 = 0x186A
        let d = BaudDivisor::compute(120_000_000, 1200).unwrap();
        assert_eq!(d.sbr(), 6250);
        assert_eq!(d.sbr_high(), 0x18);
        assert_eq!(d.sbr_low(), 0x6A);
        assert!(d.brfa() <= BRFA_MAX);
    }

    #[test]
    fn divisor_overflow_is_rejected_not_truncated() {
        let err = BaudDivisor::compute(20_485_760, 110).unwrap_err();
        // 20485760 / 1760 = 11639
        assert_eq!(err, ConfigError::DivisorOverflow { divisor: 11_639 });
    }

    #[test]
    fn largest_divisor_accepted() {
        // clock chosen so that sbr lands exactly on the 13-bit limit
        let d = BaudDivisor::compute(SBR_MAX * 16, 1).unwrap();
        assert_eq!(d.sbr() as u32, SBR_MAX);
        assert_eq!(d.brfa(), 0);
    }

    #[test]
    fn baud_too_high() {
        assert_eq!(
            BaudDivisor::compute(20_485_760, 2_000_000),
            Err(ConfigError::BaudTooHigh)
        );
    }

    #[test]
    fn large_clock_does_not_overflow() {
        // clock * 32 exceeds u32
        let d = BaudDivisor::compute(u32::MAX, 115_200).unwrap();
        assert!(d.brfa() <= BRFA_MAX);
    }

    #[test]
    #[should_panic]
    fn zero_baud_panics() {
        let _ = BaudDivisor::compute(20_485_760, 0);
    }

    #[test]
    #[should_panic]
    fn zero_clock_panics() {
        let _ = BaudDivisor::compute(0, 9600);
    }
}
