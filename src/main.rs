// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! FRDM-K64F serial bring-up.
//!
//! Starts UART0 (OpenSDA virtual COM port) and UART3 (PTB10/PTB11 header) in buffered mode at
//! 9600 baud, brings SPI0 up in master mode, then echoes whatever each UART receives back out of
//! the same UART.

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use cortex_m_rt::entry;
    #[cfg(feature = "defmt")]
    use defmt_rtt as _;
    use panic_halt as _;
    use static_cell::StaticCell;

    use k64_serial::config::{QUEUE_CAPACITY, SYS_CLOCK_HZ};
    use k64_serial::hw::kinetis::{self, Instance, Interrupt, KinetisUart, IRQ_COUNT};
    use k64_serial::hw::spi;
    use k64_serial::usart::{BufferedUart, Channel, Console, IrqSlot, SerialRead, SerialWrite};
    use k64_serial::{Uart, UartConfig};

    type Chan = Channel<QUEUE_CAPACITY>;

    static UART0_CHANNEL: StaticCell<Chan> = StaticCell::new();
    static UART3_CHANNEL: StaticCell<Chan> = StaticCell::new();

    static UART0_IRQ: IrqSlot<KinetisUart, QUEUE_CAPACITY> = IrqSlot::new();
    static UART3_IRQ: IrqSlot<KinetisUart, QUEUE_CAPACITY> = IrqSlot::new();

    // Flash configuration field. The chip reads this at reset; FSEC = 0xFE leaves the part
    // unsecured. Anything else here can lock the debugger out.
    #[link_section = ".flash_config"]
    #[no_mangle]
    #[used]
    pub static FLASH_CONFIG: [u8; 16] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // backdoor key
        0xFF, 0xFF, 0xFF, 0xFF, // FPROT
        0xFE, // FSEC
        0xFF, // FOPT
        0xFF, // FEPROT
        0xFF, // FDPROT
    ];

    type Vector = unsafe extern "C" fn();

    extern "C" {
        fn DefaultHandler();
    }

    // Device vectors. cortex-m-rt places this right after the core exceptions.
    #[link_section = ".vector_table.interrupts"]
    #[no_mangle]
    #[used]
    pub static __INTERRUPTS: [Vector; IRQ_COUNT] = vector_table();

    const fn vector_table() -> [Vector; IRQ_COUNT] {
        let mut table: [Vector; IRQ_COUNT] = [DefaultHandler as Vector; IRQ_COUNT];
        table[Interrupt::Uart0RxTx as usize] = UART0_RX_TX;
        table[Interrupt::Uart3RxTx as usize] = UART3_RX_TX;
        table
    }

    #[allow(non_snake_case)]
    #[no_mangle]
    extern "C" fn UART0_RX_TX() {
        UART0_IRQ.service();
    }

    #[allow(non_snake_case)]
    #[no_mangle]
    extern "C" fn UART3_RX_TX() {
        UART3_IRQ.service();
    }

    fn start(
        instance: Instance,
        channel: &'static mut Chan,
        slot: &IrqSlot<KinetisUart, QUEUE_CAPACITY>,
    ) -> BufferedUart<'static, KinetisUart, QUEUE_CAPACITY> {
        kinetis::enable_peripheral(instance);
        debug_assert!(kinetis::is_clock_enabled(instance));

        let config = UartConfig::default();
        let (uart, irq) = Uart::new(instance.registers())
            .configure(&config)
            .unwrap()
            .into_buffered(channel);

        slot.bind(irq);
        uart
    }

    #[entry]
    fn main() -> ! {
        // Before anything slow: the watchdog is running out of reset.
        kinetis::disable_watchdog();

        let uart0 = start(Instance::Uart0, UART0_CHANNEL.init(Chan::new()), &UART0_IRQ);
        let mut uart3 = start(Instance::Uart3, UART3_CHANNEL.init(Chan::new()), &UART3_IRQ);

        // Handlers are bound, safe to let the vectors fire.
        unsafe {
            kinetis::unmask_interrupt(Instance::Uart0);
            kinetis::unmask_interrupt(Instance::Uart3);
        }

        spi::spi0_init();
        debug_assert!(spi::spi0_is_master());

        let mut console = Console::new(uart0);
        console.println("K64 serial ready");
        console.write_str("clock ");
        console.print_u32(SYS_CLOCK_HZ);
        console.println(" Hz");

        uart3.put_str("K64 serial ready\r\n");

        loop {
            echo(console.inner());
            echo(&mut uart3);
            cortex_m::asm::nop();
        }
    }

    fn echo(uart: &mut BufferedUart<'static, KinetisUart, QUEUE_CAPACITY>) {
        while let Ok(byte) = uart.read() {
            let _ = nb::block!(uart.write(byte));
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
