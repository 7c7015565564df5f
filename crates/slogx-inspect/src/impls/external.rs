use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::SystemTime;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, TimeZone, Utc};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use uuid::Uuid;

use super::sync::inspect_channel;
use crate::inspector::{Inspect, Inspector};
use crate::placeholder::{placeholder, short_type_name};

inspect_channel!(mpsc::Sender);
inspect_channel!(mpsc::UnboundedSender);
inspect_channel!(mpsc::Receiver);
inspect_channel!(mpsc::UnboundedReceiver);
inspect_channel!(broadcast::Sender);
inspect_channel!(broadcast::Receiver);
inspect_channel!(watch::Sender);
inspect_channel!(watch::Receiver);
inspect_channel!(oneshot::Sender);
inspect_channel!(oneshot::Receiver);

impl<T: Inspect + ?Sized> Inspect for tokio::sync::Mutex<T> {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.try_lock().map_or_else(
            |_| placeholder("locked", &short_type_name::<Self>()),
            |guard| (*guard).inspect(inspector),
        )
    }
}

impl<T: Inspect + ?Sized> Inspect for tokio::sync::RwLock<T> {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.try_read().map_or_else(
            |_| placeholder("locked", &short_type_name::<Self>()),
            |guard| (*guard).inspect(inspector),
        )
    }
}

impl<T> Inspect for tokio::task::JoinHandle<T> {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        let state = if self.is_finished() { "finished" } else { "running" };
        placeholder("task", &format!("{} {state}", short_type_name::<Self>()))
    }
}

macro_rules! inspect_file {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    placeholder("file", &format!("{self:?}"))
                }
            }
        )*
    };
}

inspect_file!(std::fs::File, tokio::fs::File);

fn socket_value(local: io::Result<SocketAddr>) -> Value {
    match local {
        Ok(addr) => placeholder("socket", &addr.to_string()),
        Err(_) => placeholder("socket", "unbound"),
    }
}

macro_rules! inspect_socket {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    socket_value(self.local_addr())
                }
            }
        )*
    };
}

inspect_socket!(
    std::net::TcpStream,
    std::net::TcpListener,
    std::net::UdpSocket,
    tokio::net::TcpStream,
    tokio::net::TcpListener,
    tokio::net::UdpSocket,
);

impl<Tz> Inspect for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Inspect for SystemTime {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        DateTime::<Utc>::from(*self).inspect(inspector)
    }
}

macro_rules! inspect_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    Value::String(self.to_string())
                }
            }
        )*
    };
}

inspect_display!(NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Uuid);

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tokio::sync::{mpsc, oneshot};
    use uuid::Uuid;

    use crate::inspect;
    use serde_json::json;

    #[test]
    fn tokio_channels_render_element_type() {
        let (tx, _rx) = mpsc::channel::<u32>(1);
        assert_eq!(inspect(&tx), json!("<chan u32>"));
        let (once, _) = oneshot::channel::<Vec<String>>();
        assert_eq!(inspect(&once), json!("<chan Vec<String>>"));
    }

    #[test]
    fn timestamps_use_rfc3339() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).single();
        assert_eq!(
            at.map(|at| inspect(&at)),
            Some(json!("2024-05-01T12:30:00Z"))
        );
    }

    #[test]
    fn uuids_render_hyphenated() {
        let id = Uuid::nil();
        assert_eq!(inspect(&id), json!("00000000-0000-0000-0000-000000000000"));
    }

    #[tokio::test]
    async fn sockets_render_local_address() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await;
        let listener = listener.expect("bind ephemeral listener");
        let addr = listener.local_addr().expect("local addr");
        assert_eq!(inspect(&listener), json!(format!("<socket {addr}>")));
    }

    #[tokio::test]
    async fn held_tokio_mutex_renders_placeholder() {
        let lock = tokio::sync::Mutex::new(1_u8);
        let guard = lock.lock().await;
        assert_eq!(inspect(&lock), json!("<locked Mutex<u8>>"));
        drop(guard);
        assert_eq!(inspect(&lock), json!(1));
    }
}
