use log::debug;
use std::fmt;

use crate::bus::{Bus, MPRIS_PREFIX};
use crate::error::{Error, Result};

/// How the user picks one player out of the discovered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Position in bus enumeration order
    Index(usize),
    /// Trailing part of the bus name, e.g. `vlc` or `MediaPlayer2.vlc`
    Suffix(String),
}

impl Selector {
    /// Anything that parses as a non-negative integer is an index.
    pub fn parse(input: &str) -> Self {
        match input.parse::<usize>() {
            Ok(index) => Selector::Index(index),
            Err(_) => Selector::Suffix(input.to_string()),
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Selector::Index(0)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(index) => write!(f, "{}", index),
            Selector::Suffix(suffix) => f.write_str(suffix),
        }
    }
}

/// Bus names of all running MPRIS2 players, in discovery order.
pub fn list_services(bus: &dyn Bus) -> Result<Vec<String>> {
    let names = bus.list_names().map_err(|source| Error::Transport {
        service: "org.freedesktop.DBus".to_string(),
        source,
    })?;

    let services: Vec<String> = names
        .into_iter()
        .filter(|name| name.starts_with(MPRIS_PREFIX))
        .collect();

    debug!("Discovered {} MPRIS2 services: {:?}", services.len(), services);
    Ok(services)
}

/// Picks exactly one service, or explains why that is impossible.
pub fn resolve<'a>(selector: &Selector, services: &'a [String]) -> Result<&'a str> {
    match selector {
        Selector::Index(_) if services.is_empty() => Err(Error::NoServicesFound),
        Selector::Index(index) => services
            .get(*index)
            .map(String::as_str)
            .ok_or(Error::OutOfRange {
                index: *index,
                available: services.len(),
            }),
        Selector::Suffix(suffix) => {
            let mut matches = services.iter().filter(|name| name.ends_with(suffix.as_str()));
            match (matches.next(), matches.next()) {
                (Some(service), None) => {
                    debug!("Selector \"{}\" resolved to {}", suffix, service);
                    Ok(service.as_str())
                }
                (None, _) => Err(Error::NotFound(suffix.clone())),
                (Some(first), Some(second)) => {
                    let mut candidates = vec![first.clone(), second.clone()];
                    candidates.extend(matches.cloned());
                    Err(Error::Ambiguous {
                        selector: suffix.clone(),
                        candidates,
                    })
                }
            }
        }
    }
}
