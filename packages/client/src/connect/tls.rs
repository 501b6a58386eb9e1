//! Rustls client configuration
//!
//! Builds the client configuration used for `https:` requests, with the
//! bundled webpki roots and, when asked for, the platform's native roots.

use std::sync::Arc;

use rustls::{ClientConfig, RootCertStore};

/// Build a client configuration trusting the webpki roots, plus the native
/// roots when `use_native_certs` is set.
///
/// Native certificates that fail to load or parse are logged and skipped.
///
/// # Errors
/// Returns the rustls error if the ring provider rejects the default
/// protocol versions.
pub fn client_config(use_native_certs: bool) -> Result<Arc<ClientConfig>, rustls::Error> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if use_native_certs {
        let loaded = rustls_native_certs::load_native_certs();
        for err in &loaded.errors {
            tracing::warn!("Certificate load error: {}", err);
        }
        let (added, ignored) = root_store.add_parsable_certificates(loaded.certs);
        if ignored > 0 {
            tracing::warn!("Ignored {} unparsable system certificates", ignored);
        }
        tracing::debug!("Loaded {} system certificates", added);
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(root_store)
        .with_no_client_auth();
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}
