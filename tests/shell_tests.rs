//! End-to-end shell tests: bytes in through the RX latch, text out through
//! a capturing transport, levels read back from memory timers.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{level, send, timers, type_line, with_shell, CaptureTx, InjectingDelay, RecordingDelay};
use servo_console::config::{BoardProfile, DUAL_GROUP, SINGLE_SERVO, TRIPLE_SERVO, VERSION};
use servo_console::console::{DecoderState, Slider, COMMANDS};
use servo_console::pwm::{MemoryTimer, Output, SinkError, TimerSetup};
use servo_console::{Context, PwmTimer, RxLatch, Shell};

const UP: &[u8] = b"\x1b[A";
const DOWN: &[u8] = b"\x1b[B";

// --- Command mode ---

#[test]
fn test_status_reports_selected_channel() {
    with_shell(DUAL_GROUP, |shell, rx, out| {
        type_line(shell, rx, out, "status");
        assert_eq!(out.take(), "status\r\nPWM Level: 43 / 58  LOW / HIGH: 14 / 72\r\n> ");
    });
}

#[test]
fn test_unknown_command_changes_nothing() {
    with_shell(DUAL_GROUP, |shell, rx, out| {
        type_line(shell, rx, out, "foo");
        assert_eq!(out.take(), "foo\r\nfoo: command not found\r\n> ");
        for group in 0..2 {
            for channel in 0..3 {
                assert_eq!(level(shell, group, channel), 43);
            }
        }
        assert_eq!(shell.context(), Context::Command);
    });
}

#[test]
fn test_empty_line_just_prompts() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "");
        assert_eq!(out.take(), "\r\n> ");
        type_line(shell, rx, out, "   ");
        assert_eq!(out.take(), "   \r\n> ");
    });
}

#[test]
fn test_inc_and_dec() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "inc");
        assert_eq!(level(shell, 0, 0), 44);
        type_line(shell, rx, out, "dec");
        type_line(shell, rx, out, "dec");
        assert_eq!(level(shell, 0, 0), 42);
        assert_eq!(out.take(), "inc\r\n> dec\r\n> dec\r\n> ");
    });
}

#[test]
fn test_inc_saturates_silently() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "set 72");
        out.take();
        type_line(shell, rx, out, "inc");
        assert_eq!(out.take(), "inc\r\n> ");
        assert_eq!(level(shell, 0, 0), 72);
    });
}

#[test]
fn test_set_validates_argument() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "set 80");
        assert_eq!(out.take(), "set 80\r\nError:5 in Cmd:set\r\n> ");
        type_line(shell, rx, out, "set abc");
        assert_eq!(out.take(), "set abc\r\ninvalid value\r\n> ");
        type_line(shell, rx, out, "set");
        assert_eq!(out.take(), "set\r\nInsufficient number of inputs\r\n> ");
        assert_eq!(level(shell, 0, 0), 43);

        type_line(shell, rx, out, "set 60");
        assert_eq!(level(shell, 0, 0), 60);
    });
}

#[test]
fn test_idle_returns_to_idle_level() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "set 60");
        type_line(shell, rx, out, "idle");
        assert_eq!(level(shell, 0, 0), 43);

        type_line(shell, rx, out, "set 14");
        type_line(shell, rx, out, "idle");
        assert_eq!(level(shell, 0, 0), 43);
    });
}

#[test]
fn test_idle_ramp_interrupted_by_keypress() {
    let mut timers = timers(&TRIPLE_SERVO);
    let groups = TRIPLE_SERVO
        .bind(timers.iter_mut().map(|t| t as &mut dyn PwmTimer))
        .unwrap();
    let rx = RxLatch::new();
    let mut delay = InjectingDelay { rx: &rx, after: 3, byte: b'x', calls: 0 };
    let mut shell = Shell::new(groups, &mut delay, &rx).unwrap();
    let mut out = CaptureTx::new();

    type_line(&mut shell, &rx, &mut out, "set 60");
    type_line(&mut shell, &rx, &mut out, "idle");
    assert_eq!(level(&shell, 0, 0), 57);
    assert!(rx.is_pending());

    // The byte that stopped the ramp is typed input like any other.
    out.take();
    assert!(shell.poll(&mut out));
    assert_eq!(shell.line(), "x");
    assert_eq!(out.take(), "x");
}

#[test]
fn test_select_channel_and_group() {
    with_shell(DUAL_GROUP, |shell, rx, out| {
        type_line(shell, rx, out, "select B");
        assert_eq!(out.take(), "select B\r\nSelected group 0 channel B\r\n> ");
        type_line(shell, rx, out, "inc");
        assert_eq!(level(shell, 0, 1), 44);

        type_line(shell, rx, out, "select 1");
        assert_eq!(out.take(), "inc\r\n> select 1\r\nSelected group 1 channel A\r\n> ");
        assert_eq!(shell.controller().selection(), (1, 0));

        type_line(shell, rx, out, "select 7");
        assert_eq!(out.take(), "select 7\r\nunknown channel\r\n> ");
        type_line(shell, rx, out, "select a");
        assert_eq!(out.take(), "select a\r\nunknown channel\r\n> ");
        assert_eq!(shell.controller().selection(), (1, 0));
    });
}

#[test]
fn test_select_unconfigured_output() {
    with_shell(SINGLE_SERVO, |shell, rx, out| {
        assert_eq!(shell.controller().selected().map(|c| c.output), Some(Output::B));
        type_line(shell, rx, out, "select A");
        assert_eq!(out.take(), "select A\r\nunknown channel\r\n> ");
    });
}

#[test]
fn test_frequency_and_duty_cycle() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "frequency");
        assert_eq!(out.take(), "frequency\r\nFrequency: 50.00 Hz\r\n> ");
        type_line(shell, rx, out, "duty_cycle");
        assert_eq!(out.take(), "duty_cycle\r\nDuty cycle: 6.88 %\r\n> ");
    });
}

#[test]
fn test_config_lists_every_channel() {
    with_shell(DUAL_GROUP, |shell, rx, out| {
        type_line(shell, rx, out, "config");
        let text = out.take();
        assert!(text.contains("Group 0: timer 1  prescaler /256  top 625  non-inverted  50.00 Hz\r\n"));
        assert!(text.contains("Group 1: timer 3  prescaler /256  top 625  non-inverted  50.00 Hz\r\n"));
        assert!(text.contains(" * A: level 43  min 14  max 72  idle 43  step 1\r\n"));
        assert_eq!(text.matches("level 43").count(), 6);
        assert_eq!(text.matches(" * ").count(), 1);
    });
}

#[test]
fn test_help_lists_commands() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "help");
        let text = out.take();
        assert!(text.contains(VERSION));
        for command in COMMANDS {
            assert!(text.contains(command.name), "help is missing {}", command.name);
        }
        assert!(text.ends_with("\r\n> "));
    });
}

#[test]
fn test_log_command_drains() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "log");
        let text = out.take();
        assert!(text.starts_with("log\r\n"));
        assert!(text.ends_with("\r\n> "));
        assert!(!text.contains("command not found"));
    });
}

#[test]
fn test_banner() {
    with_shell(TRIPLE_SERVO, |shell, _rx, out| {
        shell.print_banner(out);
        assert_eq!(out.take(), format!("\r\n{}\r\nType 'help' for commands.\r\n> ", VERSION));
    });
}

// --- Line editing ---

#[test]
fn test_backspace_erases() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        send(shell, rx, out, b"stx");
        send(shell, rx, out, &[0x08]);
        assert_eq!(shell.line(), "st");
        send(shell, rx, out, &[0x7F, 0x7F]);
        assert_eq!(shell.line(), "");
        assert_eq!(out.take(), "stx\x08 \x08\x08 \x08\x08 \x08");

        // Nothing left to erase: nothing echoed.
        send(shell, rx, out, &[0x08]);
        assert_eq!(out.take(), "");
    });
}

#[test]
fn test_full_line_rings_bell() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        send(shell, rx, out, &[b'a'; 127]);
        assert_eq!(shell.line().len(), 127);
        out.take();

        send(shell, rx, out, b"b");
        assert_eq!(out.bytes, [0x07]);
        assert_eq!(shell.line().len(), 127);
        assert!(!shell.line().contains('b'));
    });
}

#[test]
fn test_escape_sequences_never_reach_line() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        send(shell, rx, out, UP);
        send(shell, rx, out, b"in");
        send(shell, rx, out, b"\x1bxc");
        assert_eq!(shell.line(), "inxc");
        assert_eq!(out.take(), "inxc");
        assert_eq!(shell.decoder_state(), DecoderState::Normal);

        send(shell, rx, out, &[0x01, b'\n', b'\t']);
        assert_eq!(shell.line(), "inxc");
    });
}

// --- Manual mode ---

#[test]
fn test_manual_mode_slider() {
    with_shell(DUAL_GROUP, |shell, rx, out| {
        type_line(shell, rx, out, "mode manual");
        assert_eq!(shell.context(), Context::Manual);
        assert_eq!(shell.controller().slider(), Slider { pos: 29, width: 58 });

        let text = out.take();
        let expected_bar = format!("{}]\r[{}", " ".repeat(60), "=".repeat(29));
        assert!(text.contains("[MANUAL MODE]"));
        assert!(text.ends_with(&expected_bar), "bar was {:?}", text);
        assert!(!text.ends_with("> "));

        send(shell, rx, out, UP);
        assert_eq!(level(shell, 0, 0), 44);
        assert_eq!(shell.controller().slider().pos, 30);
        assert_eq!(shell.decoder_state(), DecoderState::Normal);
        assert_eq!(out.take(), "=");

        send(shell, rx, out, DOWN);
        send(shell, rx, out, DOWN);
        assert_eq!(level(shell, 0, 0), 42);
        assert_eq!(out.take(), "\x08 \x08\x08 \x08");

        // Plain letters and side arrows do nothing here.
        send(shell, rx, out, b"AB\x1b[C");
        assert_eq!(level(shell, 0, 0), 42);
        assert_eq!(out.take(), "");

        send(shell, rx, out, b"\r");
        assert_eq!(shell.context(), Context::Command);
        assert_eq!(out.take(), "\r\n> ");

        type_line(shell, rx, out, "status");
        assert_eq!(out.take(), "status\r\nPWM Level: 42 / 58  LOW / HIGH: 14 / 72\r\n> ");
    });
}

#[test]
fn test_manual_mode_at_lower_bound() {
    with_shell(SINGLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "mode manual");
        assert!(out.take().ends_with("]\r["));
        assert_eq!(shell.controller().slider(), Slider { pos: 0, width: 58 });

        send(shell, rx, out, DOWN);
        assert_eq!(out.take(), "");
        assert_eq!(level(shell, 0, 0), 14);
    });
}

#[test]
fn test_mode_errors() {
    with_shell(TRIPLE_SERVO, |shell, rx, out| {
        type_line(shell, rx, out, "mode");
        assert_eq!(out.take(), "mode\r\nInsufficient number of inputs\r\n> ");
        type_line(shell, rx, out, "mode game");
        assert_eq!(out.take(), "mode game\r\nunknown mode\r\n> ");
        type_line(shell, rx, out, "mode turbo");
        assert_eq!(out.take(), "mode turbo\r\nunknown mode\r\n> ");
        assert_eq!(shell.context(), Context::Command);
    });
}

// --- Game mode ---

#[test]
fn test_game_mode_keymap() {
    with_shell(DUAL_GROUP, |shell, rx, out| {
        type_line(shell, rx, out, "mode game");
        assert_eq!(shell.context(), Context::Game);
        assert!(out.take().contains("[GAME MODE]"));

        send(shell, rx, out, b"A");
        assert_eq!(level(shell, 1, 0), 44);
        assert_eq!(level(shell, 0, 0), 43);

        send(shell, rx, out, UP);
        assert_eq!(level(shell, 0, 0), 44);

        send(shell, rx, out, b"w");
        assert_eq!(level(shell, 0, 2), 44);

        send(shell, rx, out, b"a");
        assert_eq!(level(shell, 1, 2), 42);

        send(shell, rx, out, b"\x1b[D");
        assert_eq!(level(shell, 0, 1), 42);

        // Keys are not echoed and unmapped keys are ignored.
        send(shell, rx, out, b"xyz");
        assert_eq!(out.take(), "");

        send(shell, rx, out, b"\r");
        assert_eq!(shell.context(), Context::Command);
        assert_eq!(out.take(), "\r\n> ");
    });
}

#[test]
fn test_enter_mid_sequence_leaves_mode() {
    with_shell(DUAL_GROUP, |shell, rx, out| {
        type_line(shell, rx, out, "mode game");
        send(shell, rx, out, b"\x1b[");
        assert_eq!(shell.decoder_state(), DecoderState::SawBracket);

        send(shell, rx, out, b"\r");
        assert_eq!(shell.context(), Context::Command);
        assert_eq!(shell.decoder_state(), DecoderState::Normal);
        assert_eq!(shell.line(), "");
    });
}

// --- Hardware failure ---

/// Memory timer whose writes can be switched off from outside.
struct FlakyTimer {
    inner: MemoryTimer,
    fail: Rc<Cell<bool>>,
}

impl PwmTimer for FlakyTimer {
    fn id(&self) -> u8 {
        self.inner.id()
    }

    fn apply(&mut self, setup: &TimerSetup) -> Result<(), SinkError> {
        self.inner.apply(setup)
    }

    fn set_compare(&mut self, output: Output, value: u16) -> Result<(), SinkError> {
        if self.fail.get() {
            return Err(SinkError);
        }
        self.inner.set_compare(output, value)
    }

    fn compare(&self, output: Output) -> u16 {
        self.inner.compare(output)
    }
}

fn flaky_rig(profile: BoardProfile, fail: &Rc<Cell<bool>>) -> Vec<FlakyTimer> {
    timers(&profile)
        .into_iter()
        .map(|inner| FlakyTimer { inner, fail: Rc::clone(fail) })
        .collect()
}

#[test]
fn test_sink_failure_reported_with_code() {
    let fail = Rc::new(Cell::new(false));
    let mut timers = flaky_rig(TRIPLE_SERVO, &fail);
    let groups = TRIPLE_SERVO
        .bind(timers.iter_mut().map(|t| t as &mut dyn PwmTimer))
        .unwrap();
    let rx = RxLatch::new();
    let mut delay = RecordingDelay::default();
    let mut shell = Shell::new(groups, &mut delay, &rx).unwrap();
    let mut out = CaptureTx::new();

    fail.set(true);
    type_line(&mut shell, &rx, &mut out, "inc");
    assert_eq!(out.take(), "inc\r\nError:6 in Cmd:inc\r\n> ");
    assert_eq!(level(&shell, 0, 0), 43);

    // Manual mode keeps running; the slider only follows real moves.
    type_line(&mut shell, &rx, &mut out, "mode manual");
    out.take();
    send(&mut shell, &rx, &mut out, UP);
    assert_eq!(out.take(), "");
    assert_eq!(shell.controller().slider().pos, 29);

    fail.set(false);
    send(&mut shell, &rx, &mut out, UP);
    assert_eq!(out.take(), "=");
    assert_eq!(level(&shell, 0, 0), 44);
}

#[test]
fn test_game_mode_only_with_two_groups() {
    with_shell(DUAL_GROUP, |shell, _rx, _out| {
        assert!(shell.controller().game_available());
    });
    for profile in [SINGLE_SERVO, TRIPLE_SERVO] {
        with_shell(profile, |shell, rx, out| {
            assert!(!shell.controller().game_available());
            type_line(shell, rx, out, "mode game");
            assert!(out.take().ends_with("unknown mode\r\n> "));
            assert_eq!(shell.context(), Context::Command);
        });
    }
}
