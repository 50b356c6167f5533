//! Message bus access.
//!
//! The rest of the crate talks to players only through the [`Bus`] trait, so
//! the resolve-and-dispatch logic can run against the real session bus
//! ([`SessionBus`]) or against an in-memory stub in tests.

mod session;
#[cfg(test)]
pub(crate) mod stub;
mod value;

use thiserror::Error;

pub use session::SessionBus;
pub use value::Value;

/// Every MPRIS2 player registers a bus name below this prefix
pub const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";

/// Object path all MPRIS2 interfaces live on
pub const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";

pub const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

/// Optional interface, not every player implements it
pub const TRACKLIST_INTERFACE: &str = "org.mpris.MediaPlayer2.TrackList";

/// Optional interface, not every player implements it
pub const PLAYLISTS_INTERFACE: &str = "org.mpris.MediaPlayer2.Playlists";

/// A failed bus operation, as reported by the bus or the remote peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BusError {
    /// D-Bus error name, e.g. `org.freedesktop.DBus.Error.UnknownMethod`
    pub name: Option<String>,
    pub message: String,
}

impl BusError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        BusError {
            name: Some(name.into()),
            message: message.into(),
        }
    }

    /// Error raised locally, before anything was sent
    pub fn local(message: impl Into<String>) -> Self {
        BusError {
            name: None,
            message: message.into(),
        }
    }

    /// True if the error name ends with any of the given suffixes
    pub fn name_ends_with(&self, suffixes: &[&str]) -> bool {
        self.name
            .as_deref()
            .map(|name| suffixes.iter().any(|suffix| name.ends_with(suffix)))
            .unwrap_or(false)
    }
}

impl From<dbus::Error> for BusError {
    fn from(err: dbus::Error) -> Self {
        BusError {
            name: err.name().map(str::to_owned),
            message: err.message().unwrap_or("unknown D-Bus error").to_owned(),
        }
    }
}

/// The capabilities this client needs from a message bus.
///
/// Method calls and property reads always target [`MPRIS_PATH`] on the
/// given service.
pub trait Bus {
    /// All names currently registered on the bus, in bus order
    fn list_names(&self) -> Result<Vec<String>, BusError>;

    fn call_method(
        &self,
        service: &str,
        interface: &str,
        method: &str,
        args: &[&str],
    ) -> Result<(), BusError>;

    fn get_property(
        &self,
        service: &str,
        interface: &str,
        property: &str,
    ) -> Result<Value, BusError>;
}
