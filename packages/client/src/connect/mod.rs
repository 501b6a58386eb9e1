//! Connection establishment
//!
//! Protocol selection, connect targets, the [`Connect`] abstraction behind
//! agents, and the default [`DirectConnector`] over TCP, Unix domain sockets
//! and rustls.

pub mod agent;
pub mod direct;
pub mod guard;
pub mod protocol;
pub mod tls;

pub use agent::{Agent, BoxedIo, Connect, ConnectTarget, DEFAULT_HOST, Io};
pub use direct::DirectConnector;
pub use guard::ConnectionGuard;
pub use protocol::{Transport, transport_for};
