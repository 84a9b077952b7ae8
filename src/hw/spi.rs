// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SPI0 master-mode bring-up.
//!
//! Only the one-time module configuration: clock gate, master mode, continuous SCK. Transfers are
//! not implemented; SPI0 stays halted (MDIS set) until a device driver takes it over.

use tock_registers::{
    interfaces::{ReadWriteable, Readable},
    register_bitfields, register_structs,
    registers::ReadWrite,
};

use super::kinetis;

const SPI0_BASE: usize = 0x4002_C000;

register_structs! {
    SpiRegisters {
        (0x00 => mcr: ReadWrite<u32, MCR::Register>),
        (0x04 => @END),
    }
}

register_bitfields! [
    u32,
    MCR [
        /// Master mode
        MSTR OFFSET(31) NUMBITS(1) [],
        /// Continuous SCK
        CONT_SCKE OFFSET(30) NUMBITS(1) [],
        /// Module disable (clock gated off by software)
        MDIS OFFSET(14) NUMBITS(1) [],
        HALT OFFSET(0) NUMBITS(1) []
    ]
];

#[inline]
fn spi0() -> &'static SpiRegisters {
    unsafe { &*(SPI0_BASE as *const SpiRegisters) }
}

/// Gate SPI0 on and put it in master mode with a continuous serial clock.
///
/// The module is left disabled (MDIS) so software can enable it once a chip select is chosen.
pub fn spi0_init() {
    kinetis::gate_spi0();

    let spi = spi0();
    spi.mcr
        .modify(MCR::MSTR::SET + MCR::CONT_SCKE::SET + MCR::MDIS::SET);

    debug!("SPI0 master mode, mcr={:#x}", spi.mcr.get());
}

/// Whether SPI0 has been put in master mode.
pub fn spi0_is_master() -> bool {
    spi0().mcr.is_set(MCR::MSTR)
}
