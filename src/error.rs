use thiserror::Error;

use crate::bus::BusError;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can end an invocation early.
#[derive(Debug, Error)]
pub enum Error {
    /// The bus has no name starting with the MPRIS2 prefix
    #[error("no MPRIS2 services found on the session bus")]
    NoServicesFound,

    /// Numeric selector past the end of the discovered list
    #[error("MPRIS2 service no. {index} not found ({available} available)")]
    OutOfRange { index: usize, available: usize },

    /// Name selector that is not a suffix of any discovered service
    #[error("no MPRIS2 service matches \"{0}\"")]
    NotFound(String),

    /// Name selector that is a suffix of several discovered services
    #[error("\"{selector}\" matches more than one MPRIS2 service: {}", .candidates.join(", "))]
    Ambiguous {
        selector: String,
        candidates: Vec<String>,
    },

    /// The player does not implement an optional MPRIS2 member
    #[error("service {service} does not support {operation} via MPRIS2")]
    UnsupportedCommand { service: String, operation: String },

    #[error("D-Bus call to {service} failed")]
    Transport {
        service: String,
        #[source]
        source: BusError,
    },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command \"{command}\" requires a {argument} argument")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("failed to write output")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON output")]
    Json(#[from] serde_json::Error),
}
