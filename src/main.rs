//! ServoConsole - Main entry point
//!
//! On the board: UART0 console plus two LEDC timers with three servo
//! outputs each, serviced by one cooperative superloop.
//!
//! Anywhere else: a host simulator wiring stdin/stdout to the same shell
//! over in-memory timers. Pick a profile with the first argument
//! (`single`, `triple`, `dual`).

#[cfg(target_os = "espidf")]
fn main() {
    esp_idf_svc::sys::link_patches();

    if let Err(e) = board::run() {
        // Bring-up failed before the console existed; only the IDF log is left.
        println!("peripheral bring-up failed: {}", e);
        loop {
            esp_idf_svc::hal::delay::FreeRtos::delay_ms(1000);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> std::process::ExitCode {
    sim::run()
}

#[cfg(target_os = "espidf")]
mod board {
    use core::fmt::Write;

    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::ledc::config::TimerConfig;
    use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::uart::{self, UartDriver};
    use esp_idf_svc::sys::EspError;

    use servo_console::config::{BoardProfile, ConfigError, GroupProfile, BAUD_RATE, DUAL_GROUP};
    use servo_console::hal::uart::{drain_tx, poll_rx, RxPumpDelay};
    use servo_console::hal::LedcTimer;
    use servo_console::pwm::{Frequency, Prescaler, PwmTimer, TimerSetup};
    use servo_console::transport::SerialTx;
    use servo_console::{rt_error, rt_info, RxLatch, Shell, TxQueue, SHELL_LOG};

    const PROFILE: BoardProfile = DUAL_GROUP;

    static RX: RxLatch = RxLatch::new();
    static TX: TxQueue = TxQueue::new();

    /// LEDC timer frequency for a group, in whole hertz.
    fn group_hz(group: Option<&GroupProfile>) -> Result<u32, ConfigError> {
        let group = group.ok_or(ConfigError::MissingTimer)?;
        let setup = TimerSetup {
            prescaler: Prescaler::from_code(group.prescaler_code)?,
            inverted: group.inverted,
            counter_max: group.counter_max,
        };
        Ok((Frequency::of(&setup).centi_hz / 100).max(1))
    }

    /// Report a fatal configuration error and stop servicing anything.
    fn halt(uart: &UartDriver<'_>, error: ConfigError) -> ! {
        rt_error!(SHELL_LOG, "configuration error: {}", error);
        {
            let mut tx = SerialTx::new(&TX, |q: &TxQueue| drain_tx(uart, q));
            let _ = write!(tx, "\r\nconfiguration error: {}\r\n", error);
        }
        drain_tx(uart, &TX);
        loop {
            FreeRtos::delay_ms(1000);
        }
    }

    pub fn run() -> Result<(), EspError> {
        let p = Peripherals::take()?;

        let uart_config = uart::config::Config::default().baudrate(Hertz(BAUD_RATE));
        let uart = UartDriver::new(
            p.uart0,
            p.pins.gpio43,
            p.pins.gpio44,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &uart_config,
        )?;

        let (hz0, hz1) = match (group_hz(PROFILE.groups.first()), group_hz(PROFILE.groups.get(1))) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), _) | (_, Err(e)) => halt(&uart, e),
        };

        let servo_timer = |hz: u32| TimerConfig::new().frequency(hz.Hz()).resolution(Resolution::Bits14);
        let ledc0 = LedcTimerDriver::new(p.ledc.timer0, &servo_timer(hz0))?;
        let ledc1 = LedcTimerDriver::new(p.ledc.timer1, &servo_timer(hz1))?;

        let mut timer0 = LedcTimer::new(
            PROFILE.groups.first().map_or(0, |g| g.timer_id),
            [
                Some(LedcDriver::new(p.ledc.channel0, &ledc0, p.pins.gpio4)?),
                Some(LedcDriver::new(p.ledc.channel1, &ledc0, p.pins.gpio5)?),
                Some(LedcDriver::new(p.ledc.channel2, &ledc0, p.pins.gpio6)?),
            ],
        );
        let mut timer1 = LedcTimer::new(
            PROFILE.groups.get(1).map_or(0, |g| g.timer_id),
            [
                Some(LedcDriver::new(p.ledc.channel3, &ledc1, p.pins.gpio7)?),
                Some(LedcDriver::new(p.ledc.channel4, &ledc1, p.pins.gpio15)?),
                Some(LedcDriver::new(p.ledc.channel5, &ledc1, p.pins.gpio16)?),
            ],
        );

        let timers: [&mut dyn PwmTimer; 2] = [&mut timer0, &mut timer1];
        let groups = match PROFILE.bind(timers) {
            Ok(groups) => groups,
            Err(e) => halt(&uart, e),
        };

        let mut delay = RxPumpDelay::new(&uart, &RX);
        let mut shell = match Shell::new(groups, &mut delay, &RX) {
            Ok(shell) => shell,
            Err(e) => halt(&uart, e),
        };
        rt_info!(SHELL_LOG, "profile {} bound", PROFILE.name);

        {
            let mut tx = SerialTx::new(&TX, |q: &TxQueue| drain_tx(&uart, q));
            shell.print_banner(&mut tx);
        }

        loop {
            poll_rx(&uart, &RX);

            let worked = {
                let mut tx = SerialTx::new(&TX, |q: &TxQueue| drain_tx(&uart, q));
                shell.poll(&mut tx)
            };
            drain_tx(&uart, &TX);

            if !worked {
                FreeRtos::delay_ms(1);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    use std::io::{Read, Write};
    use std::process::ExitCode;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use embedded_hal::delay::DelayNs;

    use servo_console::config::{BoardProfile, DUAL_GROUP, SINGLE_SERVO, TRIPLE_SERVO};
    use servo_console::transport::SerialTx;
    use servo_console::{rt_info, MemoryTimer, PwmTimer, RxLatch, Shell, TxQueue, SHELL_LOG};

    static RX: RxLatch = RxLatch::new();
    static TX: TxQueue = TxQueue::new();
    static EOF: AtomicBool = AtomicBool::new(false);

    struct StdDelay;

    impl DelayNs for StdDelay {
        fn delay_ns(&mut self, ns: u32) {
            thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    fn flush(queue: &TxQueue) {
        let mut stdout = std::io::stdout().lock();
        while let Some(byte) = queue.on_tx_ready() {
            let _ = stdout.write_all(&[byte]);
        }
        let _ = stdout.flush();
    }

    /// Feed stdin into the latch one byte at a time, like a serial line
    /// that waits for the receiver. Line feeds become carriage returns.
    fn spawn_reader() {
        thread::spawn(|| {
            for byte in std::io::stdin().lock().bytes() {
                let Ok(byte) = byte else { break };
                while RX.is_pending() {
                    thread::sleep(Duration::from_millis(1));
                }
                RX.on_rx(if byte == b'\n' { b'\r' } else { byte });
            }
            EOF.store(true, Ordering::Release);
        });
    }

    fn profile(name: Option<&str>) -> Option<BoardProfile> {
        match name.unwrap_or("dual") {
            "single" => Some(SINGLE_SERVO),
            "triple" => Some(TRIPLE_SERVO),
            "dual" => Some(DUAL_GROUP),
            _ => None,
        }
    }

    pub fn run() -> ExitCode {
        let arg = std::env::args().nth(1);
        let Some(profile) = profile(arg.as_deref()) else {
            eprintln!("usage: servo-console [single|triple|dual]");
            return ExitCode::FAILURE;
        };

        let timers: Result<Vec<MemoryTimer>, _> =
            profile.groups.iter().map(|g| MemoryTimer::new(g.timer_id)).collect();
        let mut timers = match timers {
            Ok(timers) => timers,
            Err(e) => {
                eprintln!("configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let groups = match profile.bind(timers.iter_mut().map(|t| t as &mut dyn PwmTimer)) {
            Ok(groups) => groups,
            Err(e) => {
                eprintln!("configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let mut delay = StdDelay;
        let mut shell = match Shell::new(groups, &mut delay, &RX) {
            Ok(shell) => shell,
            Err(e) => {
                eprintln!("configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        rt_info!(SHELL_LOG, "profile {} bound", profile.name);

        spawn_reader();

        let mut tx = SerialTx::new(&TX, flush);
        shell.print_banner(&mut tx);
        flush(&TX);

        loop {
            let worked = shell.poll(&mut tx);
            flush(&TX);

            if !worked {
                if EOF.load(Ordering::Acquire) && !RX.is_pending() {
                    break;
                }
                thread::sleep(Duration::from_millis(1));
            }
        }

        println!();
        ExitCode::SUCCESS
    }
}
