//! In-memory [`Bus`] for tests. Players only answer the members they were
//! built with, every other call fails the way a real peer would.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{Bus, BusError, Value, PLAYER_INTERFACE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub service: String,
    pub interface: String,
    pub method: String,
    pub args: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct StubPlayer {
    methods: HashSet<(String, String)>,
    properties: HashMap<(String, String), Value>,
    failures: HashMap<(String, String), String>,
}

impl StubPlayer {
    /// A player that declares no optional members at all
    pub fn bare() -> Self {
        StubPlayer::default()
    }

    /// Implements every mandatory `Player` member but none of the optional ones
    pub fn standard(status: &str) -> Self {
        StubPlayer::bare()
            .method(PLAYER_INTERFACE, "Play")
            .method(PLAYER_INTERFACE, "Pause")
            .method(PLAYER_INTERFACE, "PlayPause")
            .method(PLAYER_INTERFACE, "Stop")
            .property(PLAYER_INTERFACE, "PlaybackStatus", Value::from(status))
    }

    pub fn method(mut self, interface: &str, method: &str) -> Self {
        self.methods.insert((interface.to_string(), method.to_string()));
        self
    }

    pub fn property(mut self, interface: &str, property: &str, value: Value) -> Self {
        self.properties
            .insert((interface.to_string(), property.to_string()), value);
        self
    }

    /// Makes a method or property answer with the given D-Bus error name
    pub fn failing(mut self, interface: &str, member: &str, error_name: &str) -> Self {
        self.failures.insert(
            (interface.to_string(), member.to_string()),
            error_name.to_string(),
        );
        self
    }

    fn check_failure(&self, interface: &str, member: &str) -> Result<(), BusError> {
        match self.failures.get(&(interface.to_string(), member.to_string())) {
            Some(name) => Err(BusError::new(
                name.as_str(),
                format!("{}.{} failed", interface, member),
            )),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct StubBus {
    names: Vec<String>,
    players: HashMap<String, StubPlayer>,
    calls: RefCell<Vec<Call>>,
    fail_listing: bool,
}

impl StubBus {
    pub fn new() -> Self {
        StubBus {
            // A real bus always lists itself first
            names: vec!["org.freedesktop.DBus".to_string()],
            ..StubBus::default()
        }
    }

    pub fn with_player(mut self, name: &str, player: StubPlayer) -> Self {
        self.names.push(name.to_string());
        self.players.insert(name.to_string(), player);
        self
    }

    /// Registers a non-player name on the bus
    pub fn with_name(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    /// Makes the name listing itself fail, as if the bus were unreachable
    pub fn unreachable() -> Self {
        StubBus {
            fail_listing: true,
            ..StubBus::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn player(&self, service: &str) -> Result<&StubPlayer, BusError> {
        self.players.get(service).ok_or_else(|| {
            BusError::new(
                "org.freedesktop.DBus.Error.ServiceUnknown",
                format!("The name {} was not provided by any .service files", service),
            )
        })
    }
}

impl Bus for StubBus {
    fn list_names(&self) -> Result<Vec<String>, BusError> {
        if self.fail_listing {
            return Err(BusError::new(
                "org.freedesktop.DBus.Error.NoServer",
                "Failed to connect to socket",
            ));
        }
        Ok(self.names.clone())
    }

    fn call_method(
        &self,
        service: &str,
        interface: &str,
        method: &str,
        args: &[&str],
    ) -> Result<(), BusError> {
        let player = self.player(service)?;
        player.check_failure(interface, method)?;
        if !player
            .methods
            .contains(&(interface.to_string(), method.to_string()))
        {
            return Err(BusError::new(
                "org.freedesktop.DBus.Error.UnknownMethod",
                format!("No such method '{}' on interface '{}'", method, interface),
            ));
        }
        self.calls.borrow_mut().push(Call {
            service: service.to_string(),
            interface: interface.to_string(),
            method: method.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        Ok(())
    }

    fn get_property(
        &self,
        service: &str,
        interface: &str,
        property: &str,
    ) -> Result<Value, BusError> {
        let player = self.player(service)?;
        player.check_failure(interface, property)?;
        player
            .properties
            .get(&(interface.to_string(), property.to_string()))
            .cloned()
            .ok_or_else(|| {
                BusError::new(
                    "org.freedesktop.DBus.Error.UnknownProperty",
                    format!("No such property '{}' on interface '{}'", property, interface),
                )
            })
    }
}
