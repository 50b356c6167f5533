//! MPRIS2 remote control library
//!
//! Discovers media players on the D-Bus session bus, picks one by index or
//! bus name suffix and sends it a single transport command.

pub mod app;
pub mod bus;
pub mod dispatcher;
pub mod error;
pub mod locator;
pub mod status;

pub use app::{run, Invocation, OutputFormat};
pub use bus::{Bus, BusError, SessionBus, Value};
pub use dispatcher::{Command, Outcome};
pub use error::{Error, Result};
pub use locator::Selector;
pub use status::StatusReport;

/// Current version of mprisctl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file, relative to the home directory
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/mprisctl/config.toml";
