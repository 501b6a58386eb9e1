//! Direct connections over TCP, Unix domain sockets and TLS

use std::io;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use futures::FutureExt;
use futures::future::BoxFuture;
use rustls::ClientConfig;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use super::agent::{BoxedIo, Connect, ConnectTarget};
use super::protocol::Transport;
use super::tls;
use crate::config::HttpConfig;

/// Connector that opens a fresh connection for every request.
///
/// The rustls configuration is built on the first `https:` request and
/// shared by clones of the connector.
#[derive(Debug, Clone)]
pub struct DirectConnector {
    nodelay: bool,
    use_native_certs: bool,
    tls: Arc<OnceLock<Arc<ClientConfig>>>,
}

impl Default for DirectConnector {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

impl DirectConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector honoring the socket and TLS settings of `config`.
    #[must_use]
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            nodelay: config.tcp_nodelay(),
            use_native_certs: config.use_native_certs(),
            tls: Arc::new(OnceLock::new()),
        }
    }

    fn tls_connector(&self) -> io::Result<TlsConnector> {
        if let Some(config) = self.tls.get() {
            return Ok(TlsConnector::from(Arc::clone(config)));
        }
        let config = tls::client_config(self.use_native_certs).map_err(io::Error::other)?;
        Ok(TlsConnector::from(Arc::clone(self.tls.get_or_init(|| config))))
    }

    async fn open(self, target: ConnectTarget) -> io::Result<BoxedIo> {
        let stream = match &target.socket_path {
            Some(path) => connect_unix(path).await?,
            None => {
                let tcp = TcpStream::connect((target.hostname.as_str(), target.port)).await?;
                tcp.set_nodelay(self.nodelay)?;
                Box::new(tcp) as BoxedIo
            }
        };

        match target.transport {
            Transport::Plain => Ok(stream),
            Transport::Tls => {
                let connector = self.tls_connector()?;
                let server_name = ServerName::try_from(target.hostname.clone())
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                let tls_stream = connector.connect(server_name, stream).await?;
                tracing::debug!("TLS handshake completed with {}", target.hostname);
                Ok(Box::new(tls_stream) as BoxedIo)
            }
        }
    }
}

impl Connect for DirectConnector {
    fn connect(&self, target: ConnectTarget) -> BoxFuture<'static, io::Result<BoxedIo>> {
        self.clone().open(target).boxed()
    }
}

#[cfg(unix)]
async fn connect_unix(path: &Path) -> io::Result<BoxedIo> {
    let stream = tokio::net::UnixStream::connect(path).await?;
    Ok(Box::new(stream))
}

#[cfg(not(unix))]
async fn connect_unix(path: &Path) -> io::Result<BoxedIo> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("Unix domain sockets are unavailable on this platform: {}", path.display()),
    ))
}
