use log::debug;
use std::io::Write;

use crate::bus::{Bus, BusError, Value, PLAYER_INTERFACE, PLAYLISTS_INTERFACE, TRACKLIST_INTERFACE};
use crate::error::{Error, Result};
use crate::status::StatusReport;

/// Player commands with their one-line descriptions, as shown by `--commands`
pub const COMMANDS: [(&str, &str); 6] = [
    ("status", "show player status"),
    ("toggle", "toggle play/pause state"),
    ("stop", "stop playback"),
    ("play", "start playback"),
    ("pause", "pause playback"),
    ("open URI", "open media from URI and playback"),
];

const UNSUPPORTED_METHOD: &[&str] = &["UnknownMethod", "UnknownInterface", "NotSupported"];
const UNSUPPORTED_PROPERTY: &[&str] = &["UnknownProperty", "UnknownInterface", "InvalidArgs"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Toggle,
    Stop,
    Play,
    Pause,
    Open(String),
}

impl Command {
    /// Extra arguments to commands that take none are ignored.
    pub fn parse(keyword: &str, args: &[String]) -> Result<Self> {
        let command = match keyword {
            "status" => Command::Status,
            "toggle" => Command::Toggle,
            "stop" => Command::Stop,
            "play" => Command::Play,
            "pause" => Command::Pause,
            "open" => match args.first() {
                Some(uri) => Command::Open(uri.clone()),
                None => {
                    return Err(Error::MissingArgument {
                        command: "open",
                        argument: "URI",
                    })
                }
            },
            other => return Err(Error::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Status => "status",
            Command::Toggle => "toggle",
            Command::Stop => "stop",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Open(_) => "open",
        }
    }

    /// What the command is about to do, for verbose output
    pub fn progress_message(&self) -> Option<String> {
        match self {
            Command::Status => None,
            Command::Toggle => Some("toggling play/pause state".to_string()),
            Command::Stop => Some("stopping playback".to_string()),
            Command::Play => Some("starting playback".to_string()),
            Command::Pause => Some("pausing playback".to_string()),
            Command::Open(uri) => Some(format!("opening {}", uri)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Status(StatusReport),
    Done,
}

/// Which optional MPRIS2 interfaces a player implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub tracklist: bool,
    pub playlists: bool,
}

/// Runs one command against one service.
pub fn execute(bus: &dyn Bus, service: &str, command: &Command) -> Result<Outcome> {
    match command {
        Command::Status => status(bus, service).map(Outcome::Status),
        Command::Toggle => call(bus, service, "PlayPause", &[]),
        Command::Stop => call(bus, service, "Stop", &[]),
        Command::Play => call(bus, service, "Play", &[]),
        Command::Pause => call(bus, service, "Pause", &[]),
        Command::Open(uri) => call(bus, service, "OpenUri", &[uri.as_str()]),
    }
}

/// Probes the optional interfaces by reading one property of each.
pub fn probe_capabilities(bus: &dyn Bus, service: &str) -> Capabilities {
    let supported = |interface: &str, property: &str| {
        let result = bus.get_property(service, interface, property);
        if let Err(err) = &result {
            debug!("{} on {} not available: {}", interface, service, err);
        }
        result.is_ok()
    };

    Capabilities {
        tracklist: supported(TRACKLIST_INTERFACE, "CanEditTracks"),
        playlists: supported(PLAYLISTS_INTERFACE, "PlaylistCount"),
    }
}

/// Prints the supported commands, tab separated from their descriptions.
pub fn write_command_list<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "The following commands are supported:")?;
    for (name, description) in COMMANDS {
        writeln!(out, "\t{}\t{}", name, description)?;
    }
    Ok(())
}

fn call(bus: &dyn Bus, service: &str, method: &str, args: &[&str]) -> Result<Outcome> {
    debug!("Calling {}.{}{:?} on {}", PLAYER_INTERFACE, method, args, service);
    bus.call_method(service, PLAYER_INTERFACE, method, args)
        .map_err(|err| classify(err, service, method, UNSUPPORTED_METHOD))?;
    Ok(Outcome::Done)
}

fn get_player_property(bus: &dyn Bus, service: &str, property: &str) -> Result<Value> {
    debug!("Reading {}.{} on {}", PLAYER_INTERFACE, property, service);
    bus.get_property(service, PLAYER_INTERFACE, property)
        .map_err(|err| classify(err, service, property, UNSUPPORTED_PROPERTY))
}

/// Reads a property the player is allowed to leave out.
fn get_optional_property(bus: &dyn Bus, service: &str, property: &str) -> Result<Option<Value>> {
    match get_player_property(bus, service, property) {
        Ok(value) => Ok(Some(value)),
        Err(Error::UnsupportedCommand { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

fn status(bus: &dyn Bus, service: &str) -> Result<StatusReport> {
    let status = match get_player_property(bus, service, "PlaybackStatus")? {
        Value::Str(s) => s,
        other => other.to_string(),
    };
    let report = StatusReport::new(service, status);
    if !report.has_track() {
        return Ok(report);
    }

    let metadata = match get_optional_property(bus, service, "Metadata")? {
        Some(Value::Dict(metadata)) => metadata,
        _ => return Ok(report),
    };
    let position = get_optional_property(bus, service, "Position")?.and_then(|v| v.as_i64());

    Ok(report.with_metadata(metadata, position))
}

fn classify(err: BusError, service: &str, member: &str, unsupported: &[&str]) -> Error {
    if err.name_ends_with(unsupported) {
        Error::UnsupportedCommand {
            service: service.to_string(),
            operation: member.to_string(),
        }
    } else {
        Error::Transport {
            service: service.to_string(),
            source: err,
        }
    }
}
