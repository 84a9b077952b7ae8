// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MK64F12 peripheral bring-up.
//!
//! Clock gating (SIM), pin muxing (PORTB), NVIC registration and watchdog disable, plus the
//! memory-mapped [`UartRegisters`] implementation for UART0 and UART3.
//!
//! Everything here is single-shot register configuration done before a UART is started.

use cortex_m::peripheral::NVIC;
use tock_registers::{
    interfaces::{ReadWriteable, Readable, Writeable},
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite, WriteOnly},
};

use super::regs::{Reg, UartRegisters};

const UART0_BASE: usize = 0x4006_A000;
const UART3_BASE: usize = 0x4006_D000;
const SIM_SCGC4_ADDR: usize = 0x4004_8034;
const PORTB_BASE: usize = 0x4004_A000;
const WDOG_BASE: usize = 0x4005_2000;

/// Number of device interrupt vectors on the MK64F12.
pub const IRQ_COUNT: usize = 86;

register_structs! {
    UartRegisterBlock {
        (0x00 => bdh: ReadWrite<u8>),
        (0x01 => bdl: ReadWrite<u8>),
        (0x02 => c1: ReadWrite<u8>),
        (0x03 => c2: ReadWrite<u8>),
        (0x04 => s1: ReadOnly<u8>),
        (0x05 => s2: ReadWrite<u8>),
        (0x06 => c3: ReadWrite<u8>),
        (0x07 => d: ReadWrite<u8>),
        (0x08 => _reserved0),
        (0x0A => c4: ReadWrite<u8>),
        (0x0B => @END),
    },

    SimGateRegisters {
        (0x00 => scgc4: ReadWrite<u32, SCGC4::Register>),
        (0x04 => scgc5: ReadWrite<u32, SCGC5::Register>),
        (0x08 => scgc6: ReadWrite<u32, SCGC6::Register>),
        (0x0C => @END),
    },

    PortRegisters {
        (0x000 => pcr: [ReadWrite<u32, PCR::Register>; 32]),
        (0x080 => @END),
    },

    WatchdogRegisters {
        (0x00 => stctrlh: ReadWrite<u16>),
        (0x02 => _reserved0),
        (0x0E => unlock: WriteOnly<u16>),
        (0x10 => @END),
    }
}

register_bitfields! [
    u32,
    SCGC4 [
        UART0 OFFSET(10) NUMBITS(1) [],
        UART3 OFFSET(13) NUMBITS(1) []
    ],
    SCGC5 [
        PORTB OFFSET(10) NUMBITS(1) []
    ],
    SCGC6 [
        SPI0 OFFSET(12) NUMBITS(1) []
    ],
    PCR [
        MUX OFFSET(8) NUMBITS(3) [
            Disabled = 0,
            Gpio = 1,
            Alt3 = 3
        ]
    ]
];

// Unlock sequence, must land within 20 bus clocks of each other
const WDOG_UNLOCK_1: u16 = 0xC520;
const WDOG_UNLOCK_2: u16 = 0xD928;
/// STCTRLH reset value with WDOGEN cleared.
const WDOG_STCTRLH_DISABLED: u16 = 0x01D2;

/// Device interrupt numbers used by this firmware.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u16)]
pub enum Interrupt {
    Uart0RxTx = 31,
    Uart3RxTx = 37,
}

unsafe impl cortex_m::interrupt::InterruptNumber for Interrupt {
    #[inline]
    fn number(self) -> u16 {
        self as u16
    }
}

/// The two UART instances this board wires up.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instance {
    /// PTB16 TX, PTB17 RX.
    Uart0,
    /// PTB11 TX, PTB10 RX.
    Uart3,
}

impl Instance {
    fn base(self) -> usize {
        match self {
            Instance::Uart0 => UART0_BASE,
            Instance::Uart3 => UART3_BASE,
        }
    }

    /// PORTB pin numbers carrying this UART, as `(tx, rx)`.
    pub fn pins(self) -> (usize, usize) {
        match self {
            Instance::Uart0 => (16, 17),
            Instance::Uart3 => (11, 10),
        }
    }

    /// The combined receive/transmit interrupt.
    pub fn interrupt(self) -> Interrupt {
        match self {
            Instance::Uart0 => Interrupt::Uart0RxTx,
            Instance::Uart3 => Interrupt::Uart3RxTx,
        }
    }

    /// Register handle for this instance.
    pub fn registers(self) -> KinetisUart {
        KinetisUart { base: self.base() }
    }
}

/// Memory-mapped UART register file.
///
/// Only an address, so it is `Copy` and can be held by both the mainline and interrupt halves
/// of a running driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KinetisUart {
    base: usize,
}

impl KinetisUart {
    pub const UART0: KinetisUart = KinetisUart { base: UART0_BASE };
    pub const UART3: KinetisUart = KinetisUart { base: UART3_BASE };

    #[inline]
    fn block(&self) -> &UartRegisterBlock {
        // Fixed peripheral address, valid for the life of the program.
        unsafe { &*(self.base as *const UartRegisterBlock) }
    }
}

impl UartRegisters for KinetisUart {
    #[inline]
    fn read(&self, reg: Reg) -> u8 {
        let r = self.block();
        match reg {
            Reg::Bdh => r.bdh.get(),
            Reg::Bdl => r.bdl.get(),
            Reg::C1 => r.c1.get(),
            Reg::C2 => r.c2.get(),
            Reg::S1 => r.s1.get(),
            Reg::D => r.d.get(),
            Reg::C4 => r.c4.get(),
        }
    }

    #[inline]
    fn write(&self, reg: Reg, value: u8) {
        let r = self.block();
        match reg {
            Reg::Bdh => r.bdh.set(value),
            Reg::Bdl => r.bdl.set(value),
            Reg::C1 => r.c1.set(value),
            Reg::C2 => r.c2.set(value),
            // read-only
            Reg::S1 => {}
            Reg::D => r.d.set(value),
            Reg::C4 => r.c4.set(value),
        }
    }
}

#[inline]
fn sim() -> &'static SimGateRegisters {
    unsafe { &*(SIM_SCGC4_ADDR as *const SimGateRegisters) }
}

#[inline]
fn portb() -> &'static PortRegisters {
    unsafe { &*(PORTB_BASE as *const PortRegisters) }
}

#[inline]
fn wdog() -> &'static WatchdogRegisters {
    unsafe { &*(WDOG_BASE as *const WatchdogRegisters) }
}

/// Gate the UART and PORTB clocks on and mux the UART's pins to ALT3.
///
/// Must run before the UART's registers are touched; an ungated peripheral bus-faults.
pub fn enable_peripheral(instance: Instance) {
    let sim = sim();
    match instance {
        Instance::Uart0 => sim.scgc4.modify(SCGC4::UART0::SET),
        Instance::Uart3 => sim.scgc4.modify(SCGC4::UART3::SET),
    }
    sim.scgc5.modify(SCGC5::PORTB::SET);

    let (tx, rx) = instance.pins();
    let port = portb();
    port.pcr[tx].write(PCR::MUX::Alt3);
    port.pcr[rx].write(PCR::MUX::Alt3);

    debug!("peripheral clocks gated, PTB{}/PTB{} muxed to ALT3", tx, rx);
}

/// Unmask the instance's RX/TX interrupt in the NVIC.
///
/// # Safety
///
/// The vector must be bound to a handler that services the peripheral, and unmasking may break
/// critical sections that rely on this interrupt being masked.
pub unsafe fn unmask_interrupt(instance: Instance) {
    NVIC::unmask(instance.interrupt());
}

/// Turn off the watchdog, which is running out of reset.
pub fn disable_watchdog() {
    let wdog = wdog();
    critical_section::with(|_| {
        wdog.unlock.set(WDOG_UNLOCK_1);
        wdog.unlock.set(WDOG_UNLOCK_2);
        wdog.stctrlh.set(WDOG_STCTRLH_DISABLED);
    });
}

/// Gate the SPI0 clock on.
pub(crate) fn gate_spi0() {
    sim().scgc6.modify(SCGC6::SPI0::SET);
}

/// Whether the UART clock gate is on. Useful as the "peripheral ready" check before configuring.
pub fn is_clock_enabled(instance: Instance) -> bool {
    let sim = sim();
    match instance {
        Instance::Uart0 => sim.scgc4.is_set(SCGC4::UART0),
        Instance::Uart3 => sim.scgc4.is_set(SCGC4::UART3),
    }
}
