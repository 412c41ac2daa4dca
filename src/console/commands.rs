//! Command table and handlers

use crate::config::{ConfigError, VERSION};
use crate::log_globals::SHELL_LOG;
use crate::logging;
use crate::pwm::Output;
use crate::rt_debug;
use crate::transport::Transport;

use super::controller::Controller;
use super::CommandError;

/// Handler signature. `args[0]` is the command name itself.
pub type Handler = fn(&mut Controller<'_>, &[&str], &mut dyn Transport) -> Result<(), CommandError>;

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub brief: &'static str,
    pub handler: Handler,
}

/// All available commands, in help order
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "status", brief: "Level and bounds of selected channel", handler: cmd_status },
    CommandDescriptor { name: "inc", brief: "Increase level by one unit", handler: cmd_inc },
    CommandDescriptor { name: "dec", brief: "Decrease level by one unit", handler: cmd_dec },
    CommandDescriptor { name: "idle", brief: "Ramp to idle level", handler: cmd_idle },
    CommandDescriptor { name: "set", brief: "Move to level: set <level>", handler: cmd_set },
    CommandDescriptor { name: "mode", brief: "Live control: mode <manual|game>", handler: cmd_mode },
    CommandDescriptor { name: "select", brief: "Select channel or group: select <A|B|C|0|1>", handler: cmd_select },
    CommandDescriptor { name: "frequency", brief: "PWM frequency of selected group", handler: cmd_frequency },
    CommandDescriptor { name: "duty_cycle", brief: "Duty cycle of selected channel", handler: cmd_duty_cycle },
    CommandDescriptor { name: "config", brief: "Timer and channel configuration", handler: cmd_config },
    CommandDescriptor { name: "log", brief: "Show queued log messages", handler: cmd_log },
];

/// Result of dispatching one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No tokens on the line.
    Empty,
    Done,
    Failed(CommandError),
    NotFound,
}

/// Immutable name-to-handler table, checked for duplicates once.
#[derive(Clone, Copy)]
pub struct CommandTable {
    entries: &'static [CommandDescriptor],
}

impl CommandTable {
    pub fn new(entries: &'static [CommandDescriptor]) -> Result<Self, ConfigError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(ConfigError::DuplicateCommand(entry.name));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &'static [CommandDescriptor] {
        self.entries
    }

    pub fn find(&self, name: &str) -> Option<&'static CommandDescriptor> {
        self.entries.iter().find(|c| c.name == name)
    }

    /// Run the handler named by `args[0]` and report the outcome.
    ///
    /// Usage errors print their message; other failures print
    /// `Error:<code> in Cmd:<name>`; unknown names print
    /// `<name>: command not found` and touch nothing.
    pub fn dispatch(&self, args: &[&str], ctl: &mut Controller<'_>, out: &mut dyn Transport) -> Dispatch {
        let Some(&name) = args.first() else {
            return Dispatch::Empty;
        };

        let Some(command) = self.find(name) else {
            rt_debug!(SHELL_LOG, "unknown command '{}'", name);
            let _ = write!(out, "{}: command not found\r\n", name);
            return Dispatch::NotFound;
        };

        match (command.handler)(ctl, args, out) {
            Ok(()) => Dispatch::Done,
            Err(e) => {
                if e.is_usage() {
                    let _ = write!(out, "{}\r\n", e.message());
                } else {
                    let _ = write!(out, "Error:{} in Cmd:{}\r\n", e.code(), command.name);
                }
                Dispatch::Failed(e)
            }
        }
    }
}

// --- Command Implementations ---

fn cmd_help(ctl: &mut Controller<'_>, _args: &[&str], out: &mut dyn Transport) -> Result<(), CommandError> {
    let _ = write!(out, "\r\n# {}\r\n\r\n", VERSION);
    for c in ctl.table().entries() {
        let _ = write!(out, "  {:<12} {}\r\n", c.name, c.brief);
    }
    out.send_str("\r\n");
    Ok(())
}

fn cmd_status(ctl: &mut Controller<'_>, _args: &[&str], out: &mut dyn Transport) -> Result<(), CommandError> {
    let channel = ctl.selected().ok_or(CommandError::UnknownChannel)?;
    let config = channel.config;
    let _ = write!(
        out,
        "PWM Level: {} / {}  LOW / HIGH: {} / {}\r\n",
        channel.level,
        config.steps(),
        config.min,
        config.max
    );
    Ok(())
}

fn cmd_inc(ctl: &mut Controller<'_>, _args: &[&str], _out: &mut dyn Transport) -> Result<(), CommandError> {
    let mut channel = ctl.selected_mut().ok_or(CommandError::UnknownChannel)?;
    channel.inc()?;
    Ok(())
}

fn cmd_dec(ctl: &mut Controller<'_>, _args: &[&str], _out: &mut dyn Transport) -> Result<(), CommandError> {
    let mut channel = ctl.selected_mut().ok_or(CommandError::UnknownChannel)?;
    channel.dec()?;
    Ok(())
}

fn cmd_idle(ctl: &mut Controller<'_>, _args: &[&str], _out: &mut dyn Transport) -> Result<(), CommandError> {
    ctl.idle()?;
    Ok(())
}

fn cmd_set(ctl: &mut Controller<'_>, args: &[&str], _out: &mut dyn Transport) -> Result<(), CommandError> {
    let value = args.get(1).ok_or(CommandError::MissingArg)?;
    let level: u16 = value.parse().map_err(|_| CommandError::InvalidValue)?;

    let mut channel = ctl.selected_mut().ok_or(CommandError::UnknownChannel)?;
    let config = channel.channel().config;
    if !(config.min..=config.max).contains(&level) {
        return Err(CommandError::OutOfRange);
    }
    channel.set_level(level)?;
    Ok(())
}

fn cmd_mode(ctl: &mut Controller<'_>, args: &[&str], out: &mut dyn Transport) -> Result<(), CommandError> {
    let mode = args.get(1).ok_or(CommandError::MissingArg)?;
    match *mode {
        "manual" => ctl.enter_manual(out),
        "game" if ctl.game_available() => ctl.enter_game(out),
        _ => return Err(CommandError::UnknownMode),
    }
    Ok(())
}

fn cmd_select(ctl: &mut Controller<'_>, args: &[&str], out: &mut dyn Transport) -> Result<(), CommandError> {
    let name = args.get(1).ok_or(CommandError::MissingArg)?;

    let selected = if let Some(output) = Output::from_name(name) {
        ctl.select_output(output)
    } else if let Ok(index) = name.parse::<usize>() {
        ctl.select_group(index)
    } else {
        false
    };
    if !selected {
        return Err(CommandError::UnknownChannel);
    }

    let (group, _) = ctl.selection();
    if let Some(channel) = ctl.selected() {
        let _ = write!(out, "Selected group {} channel {}\r\n", group, channel.output.letter());
    }
    Ok(())
}

fn cmd_frequency(ctl: &mut Controller<'_>, _args: &[&str], out: &mut dyn Transport) -> Result<(), CommandError> {
    let group = ctl.selected_group().ok_or(CommandError::UnknownChannel)?;
    let _ = write!(out, "Frequency: {}\r\n", group.frequency());
    Ok(())
}

fn cmd_duty_cycle(ctl: &mut Controller<'_>, _args: &[&str], out: &mut dyn Transport) -> Result<(), CommandError> {
    let (_, index) = ctl.selection();
    let duty = ctl
        .selected_group()
        .and_then(|g| g.duty_cycle(index))
        .ok_or(CommandError::UnknownChannel)?;
    let _ = write!(out, "Duty cycle: {}\r\n", duty);
    Ok(())
}

fn cmd_config(ctl: &mut Controller<'_>, _args: &[&str], out: &mut dyn Transport) -> Result<(), CommandError> {
    let (selected_group, selected_channel) = ctl.selection();

    for (g, group) in ctl.groups().iter().enumerate() {
        let setup = group.setup();
        let _ = write!(
            out,
            "Group {}: timer {}  prescaler /{}  top {}  {}  {}\r\n",
            g,
            group.timer_id(),
            setup.prescaler.divider(),
            setup.counter_max,
            if setup.inverted { "inverted" } else { "non-inverted" },
            group.frequency()
        );
        for (c, channel) in group.channels().iter().enumerate() {
            let marker = if (g, c) == (selected_group, selected_channel) { '*' } else { ' ' };
            let cfg = channel.config;
            let _ = write!(
                out,
                " {} {}: level {}  min {}  max {}  idle {}  step {}\r\n",
                marker,
                channel.output.letter(),
                channel.level,
                cfg.min,
                cfg.max,
                cfg.idle,
                cfg.step
            );
        }
    }
    Ok(())
}

fn cmd_log(ctl: &mut Controller<'_>, _args: &[&str], out: &mut dyn Transport) -> Result<(), CommandError> {
    let shown = logging::drain_to(&SHELL_LOG, out);

    let dropped = SHELL_LOG.dropped();
    if dropped > 0 {
        let _ = write!(out, "{} log entries dropped\r\n", dropped);
        SHELL_LOG.reset_dropped();
    }

    let lost = ctl.rx().lost();
    if lost > 0 {
        let _ = write!(out, "{} received bytes lost\r\n", lost);
    }

    if shown == 0 && dropped == 0 {
        out.send_str("log empty\r\n");
    }
    Ok(())
}
