use dbus::arg::{ArgType, RefArg, Variant};
use dbus::blocking::{BlockingSender, Connection};
use dbus::strings::{BusName, Interface, Member, Path};
use dbus::Message;
use log::debug;
use std::collections::BTreeMap;
use std::time::Duration;

use super::{Bus, BusError, Value, MPRIS_PATH};

const DBUS_NAME: &str = "org.freedesktop.DBus";
const DBUS_PATH: &str = "/org/freedesktop/DBus";
const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Blocking connection to the user's session bus.
pub struct SessionBus {
    conn: Connection,
    timeout: Duration,
}

impl SessionBus {
    pub fn connect(timeout: Duration) -> Result<Self, BusError> {
        let conn = Connection::new_session()?;
        debug!("Connected to session bus as {}", conn.unique_name());
        Ok(SessionBus { conn, timeout })
    }

    fn method_call(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        method: &str,
    ) -> Result<Message, BusError> {
        let service = BusName::new(service).map_err(BusError::local)?;
        let path = Path::new(path).map_err(BusError::local)?;
        let interface = Interface::new(interface).map_err(BusError::local)?;
        let method = Member::new(method).map_err(BusError::local)?;
        Ok(Message::method_call(&service, &path, &interface, &method))
    }
}

impl Bus for SessionBus {
    fn list_names(&self) -> Result<Vec<String>, BusError> {
        let proxy = self.conn.with_proxy(DBUS_NAME, DBUS_PATH, self.timeout);
        let (names,): (Vec<String>,) = proxy.method_call(DBUS_NAME, "ListNames", ())?;
        Ok(names)
    }

    fn call_method(
        &self,
        service: &str,
        interface: &str,
        method: &str,
        args: &[&str],
    ) -> Result<(), BusError> {
        let mut msg = self.method_call(service, MPRIS_PATH, interface, method)?;
        for arg in args {
            msg = msg.append1(*arg);
        }
        self.conn.send_with_reply_and_block(msg, self.timeout)?;
        Ok(())
    }

    fn get_property(
        &self,
        service: &str,
        interface: &str,
        property: &str,
    ) -> Result<Value, BusError> {
        let msg = self
            .method_call(service, MPRIS_PATH, PROPERTIES_INTERFACE, "Get")?
            .append2(interface, property);
        let reply = self.conn.send_with_reply_and_block(msg, self.timeout)?;
        let value: Variant<Box<dyn RefArg>> = reply.read1().map_err(|e| {
            BusError::local(format!("unexpected reply for {}.{}: {}", interface, property, e))
        })?;
        Ok(to_value(&value))
    }
}

/// Decodes a dynamically typed bus value, unwrapping variants.
fn to_value(arg: &dyn RefArg) -> Value {
    match arg.arg_type() {
        ArgType::Variant => arg
            .as_iter()
            .and_then(|mut inner| inner.next().map(to_value))
            .unwrap_or(Value::List(Vec::new())),
        ArgType::Boolean => Value::Bool(arg.as_u64().map(|v| v != 0).unwrap_or(false)),
        ArgType::Byte | ArgType::UInt16 | ArgType::UInt32 | ArgType::UInt64 => {
            Value::UInt(arg.as_u64().unwrap_or_default())
        }
        ArgType::Int16 | ArgType::Int32 | ArgType::Int64 | ArgType::UnixFd => {
            Value::Int(arg.as_i64().unwrap_or_default())
        }
        ArgType::Double => Value::Double(arg.as_f64().unwrap_or_default()),
        ArgType::String | ArgType::ObjectPath | ArgType::Signature => {
            Value::Str(arg.as_str().unwrap_or_default().to_owned())
        }
        ArgType::Array if arg.signature().starts_with("a{") => {
            let mut map = BTreeMap::new();
            if let Some(mut items) = arg.as_iter() {
                while let (Some(key), Some(value)) = (items.next(), items.next()) {
                    let key = match key.as_str() {
                        Some(s) => s.to_owned(),
                        None => to_value(key).to_string(),
                    };
                    map.insert(key, to_value(value));
                }
            }
            Value::Dict(map)
        }
        _ => Value::List(
            arg.as_iter()
                .map(|items| items.map(to_value).collect())
                .unwrap_or_default(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbus::arg::PropMap;

    #[test]
    fn test_decodes_metadata_map() {
        let mut meta = PropMap::new();
        meta.insert(
            "xesam:title".to_string(),
            Variant(Box::new("Song".to_string()) as Box<dyn RefArg>),
        );
        meta.insert(
            "xesam:artist".to_string(),
            Variant(Box::new(vec!["A".to_string(), "B".to_string()]) as Box<dyn RefArg>),
        );
        meta.insert(
            "mpris:length".to_string(),
            Variant(Box::new(180_000_000i64) as Box<dyn RefArg>),
        );

        let value = to_value(&meta);
        let dict = value.as_dict().unwrap();
        assert_eq!(dict["xesam:title"], Value::from("Song"));
        assert_eq!(
            dict["xesam:artist"],
            Value::List(vec![Value::from("A"), Value::from("B")])
        );
        assert_eq!(dict["mpris:length"].as_i64(), Some(180_000_000));
    }

    #[test]
    fn test_decodes_scalars() {
        assert_eq!(to_value(&true), Value::Bool(true));
        assert_eq!(to_value(&7u32), Value::UInt(7));
        assert_eq!(to_value(&-7i64), Value::Int(-7));
        assert_eq!(to_value(&0.5f64), Value::Double(0.5));
        assert_eq!(
            to_value(&Variant(Box::new("Playing".to_string()) as Box<dyn RefArg>)),
            Value::from("Playing")
        );
    }
}
