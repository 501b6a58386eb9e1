//! Connection sources and connect targets
//!
//! A [`Connect`] implementation turns a [`ConnectTarget`] into a byte stream.
//! An [`Agent`] is the opaque, shareable handle through which a caller supplies
//! its own connection source for a request.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::BoxFuture;
use http::uri::Authority;
use tokio::io::{AsyncRead, AsyncWrite};

use super::protocol::Transport;
use crate::error::{self, Result};
use crate::http::options::RequestOptions;

/// Host used when the options name none.
pub const DEFAULT_HOST: &str = "localhost";

/// A bidirectional byte stream a request can be written to.
pub trait Io: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<T> Io for T where T: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

/// Boxed connection handed to the HTTP/1 handshake.
pub type BoxedIo = Box<dyn Io>;

/// Source of connections.
pub trait Connect: Send + Sync + 'static {
    /// Open a connection to `target`.
    ///
    /// For [`Transport::Tls`] targets the returned stream must already have
    /// completed its TLS handshake.
    fn connect(&self, target: ConnectTarget) -> BoxFuture<'static, io::Result<BoxedIo>>;
}

/// Where and how to connect for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub transport: Transport,
    /// Host name or IP literal, without brackets.
    pub hostname: String,
    pub port: u16,
    /// Unix domain socket to use instead of `hostname` and `port`.
    pub socket_path: Option<PathBuf>,
}

impl ConnectTarget {
    /// Resolve the target of `options` over `transport`.
    ///
    /// The port comes from `options.port`, then from the host, then from the
    /// transport's default.
    ///
    /// # Errors
    /// `ConfigurationError` when the host is not a valid authority.
    pub fn from_options(options: &RequestOptions, transport: Transport) -> Result<Self> {
        let host = match options.host.as_deref() {
            Some(host) if !host.is_empty() => host,
            _ => DEFAULT_HOST,
        };
        let authority = Authority::from_str(host)
            .map_err(|e| error::configuration(host, format!("Invalid host {host}")).with(e))?;
        if authority.as_str().contains('@') {
            return Err(error::configuration(
                host,
                format!("Invalid host {host}: credentials belong in auth"),
            ));
        }

        let hostname = authority
            .host()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = options
            .port
            .or_else(|| authority.port_u16())
            .unwrap_or_else(|| transport.default_port());

        Ok(Self {
            transport,
            hostname,
            port,
            socket_path: options.socket_path.clone(),
        })
    }

    /// Value of the `Host` header for this target.
    #[must_use]
    pub fn host_header(&self) -> String {
        let host = if self.hostname.contains(':') {
            format!("[{}]", self.hostname)
        } else {
            self.hostname.clone()
        };
        if self.port == self.transport.default_port() {
            host
        } else {
            format!("{host}:{}", self.port)
        }
    }
}

impl fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.socket_path {
            Some(path) => write!(f, "{}//unix:{}", self.transport.scheme(), path.display()),
            None => write!(f, "{}//{}:{}", self.transport.scheme(), self.hostname, self.port),
        }
    }
}

/// Shared connection source attached to request options.
///
/// Cloning an agent shares the underlying connector.
#[derive(Clone)]
pub struct Agent(Arc<dyn Connect>);

impl Agent {
    /// Wrap a connector.
    pub fn new<C: Connect>(connector: C) -> Self {
        Agent(Arc::new(connector))
    }

    /// Returns true if both agents share the same connector.
    #[must_use]
    pub fn ptr_eq(&self, other: &Agent) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Connect for Agent {
    fn connect(&self, target: ConnectTarget) -> BoxFuture<'static, io::Result<BoxedIo>> {
        self.0.connect(target)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Agent").finish_non_exhaustive()
    }
}
