//! Stream executor
//!
//! Runs one request described by an options record and resolves with the
//! response head and its live body, or with a structured error. Responses
//! outside `[200, 400)` are drained and turned into `StatusCodeError`s.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::{AUTHORIZATION, HOST, USER_AGENT};
use http::request::Parts;
use http::{HeaderName, HeaderValue, Method, Request, Uri, Version};
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper::ext::ReasonPhrase;
use hyper_util::rt::TokioIo;

use crate::client::HttpClient;
use crate::config::HttpConfig;
use crate::connect::{Agent, Connect, ConnectTarget, ConnectionGuard, transport_for};
use crate::error::{self, AbortReason, ErrorBody, Result, TimedOut};
use crate::http::body::{OutgoingBody, prepare_body};
use crate::http::buffer::buffer_stream;
use crate::http::decode::has_text_content;
use crate::http::options::RequestOptions;
use crate::http::response::{ResponseBody, ResponseHead, ResponseParts};
use crate::task::Task;

/// Stream a request through the global client.
///
/// Nothing happens until the returned task is forked.
#[must_use]
pub fn stream(options: RequestOptions) -> Task<ResponseHead> {
    crate::global_client().stream(options)
}

pub(crate) fn stream_task(client: HttpClient, options: RequestOptions) -> Task<ResponseHead> {
    let options = Arc::new(options);
    Task::new(move || execute(client.clone(), Arc::clone(&options)))
}

/// One execution of a request.
pub(crate) async fn execute(client: HttpClient, options: Arc<RequestOptions>) -> Result<ResponseHead> {
    let stats = client.stats();
    stats.execution_started();

    match exchange(&client, &options).await {
        Ok(head) => {
            stats.execution_resolved();
            Ok(head)
        }
        Err(err) => {
            stats.execution_failed();
            tracing::debug!("request to {} failed: {}", options.path(), err);
            if err.options().is_some() {
                Err(err)
            } else {
                Err(err.with_options(options))
            }
        }
    }
}

async fn exchange(client: &HttpClient, options: &Arc<RequestOptions>) -> Result<ResponseHead> {
    let config = client.config();
    let transport = transport_for(options.protocol.as_deref())?;
    let target = ConnectTarget::from_options(options, transport)?;
    let head = request_head(options, &target, config)?;
    let body = prepare_body(&options.body)?;
    let request = Request::from_parts(head, body);

    let connector = options
        .agent
        .clone()
        .unwrap_or_else(|| client.connector().clone());
    let conn_timeout = options.conn_timeout.unwrap_or(config.connect_timeout);
    let idle_timeout = options.idle_timeout.unwrap_or(config.idle_timeout);

    tracing::debug!(
        "{} {} via {}",
        request.method(),
        request.uri(),
        target
    );

    let issued = issue(client, connector, target, request, conn_timeout, Arc::clone(options));
    match tokio::time::timeout(idle_timeout, issued).await {
        Ok(result) => result,
        Err(_) => {
            tracing::debug!("idle timeout of {:?} elapsed before the response head", idle_timeout);
            Err(error::aborted(AbortReason::IdleTimeout))
        }
    }
}

/// Method, target and headers of the request, validated before any I/O.
fn request_head(options: &RequestOptions, target: &ConnectTarget, config: &HttpConfig) -> Result<Parts> {
    let method_name = options.method();
    let method = Method::from_bytes(method_name.as_bytes()).map_err(|e| {
        error::configuration(method_name, format!("Invalid method {method_name}")).with(e)
    })?;

    let path = options.path();
    let target_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    let uri = target_path
        .parse::<Uri>()
        .map_err(|e| error::configuration(path, format!("Invalid path {path}")).with(e))?;

    let mut request = Request::new(());
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.version_mut() = Version::HTTP_11;

    let headers = request.headers_mut();
    for (key, value) in &options.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| error::configuration(key, format!("Invalid header name {key}")).with(e))?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            error::configuration(value.as_str(), format!("Invalid value for header {key}")).with(e)
        })?;
        headers.append(name, value);
    }

    if !headers.contains_key(HOST) {
        let host = target.host_header();
        let value = HeaderValue::from_str(&host)
            .map_err(|e| error::configuration(host.as_str(), format!("Invalid host {host}")).with(e))?;
        headers.insert(HOST, value);
    }

    if let Some(auth) = &options.auth
        && !headers.contains_key(AUTHORIZATION)
    {
        let credentials = format!("Basic {}", STANDARD.encode(auth));
        let value = HeaderValue::from_str(&credentials)
            .map_err(|e| error::configuration("auth", "Invalid credentials").with(e))?;
        headers.insert(AUTHORIZATION, value);
    }

    if let Some(user_agent) = &config.user_agent
        && !headers.contains_key(USER_AGENT)
    {
        let value = HeaderValue::from_str(user_agent).map_err(|e| {
            error::configuration(user_agent.as_str(), "Invalid user agent").with(e)
        })?;
        headers.insert(USER_AGENT, value);
    }

    Ok(request.into_parts().0)
}

/// Connect, send the request and classify the response.
///
/// Everything here runs under the idle watchdog.
async fn issue(
    client: &HttpClient,
    connector: Agent,
    target: ConnectTarget,
    request: Request<OutgoingBody>,
    conn_timeout: Duration,
    options: Arc<RequestOptions>,
) -> Result<ResponseHead> {
    let stats = client.stats();
    let io = match tokio::time::timeout(conn_timeout, connector.connect(target.clone())).await {
        Ok(Ok(io)) => io,
        Ok(Err(e)) => {
            stats.connection_failed();
            return Err(error::connection(e));
        }
        Err(_) => {
            stats.connection_failed();
            tracing::debug!("connect to {} timed out after {:?}", target, conn_timeout);
            return Err(error::connection(TimedOut));
        }
    };
    stats.connection_opened();

    let (mut sender, connection) = http1::handshake::<_, OutgoingBody>(TokioIo::new(io))
        .await
        .map_err(error::connection)?;
    let driver = tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::debug!("connection closed with error: {}", e);
        }
    });
    let guard = ConnectionGuard::new(&driver);

    let response = sender.send_request(request).await.map_err(error::connection)?;
    drop(sender);

    classify(response, guard, options).await
}

async fn classify(
    response: hyper::Response<Incoming>,
    guard: ConnectionGuard,
    options: Arc<RequestOptions>,
) -> Result<ResponseHead> {
    let status_message = response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_default();

    let (head, incoming) = response.into_parts();
    let body = ResponseBody::new(incoming, guard);
    let status = head.status;
    tracing::debug!("response {} {}", status.as_u16(), status_message);

    if (200..400).contains(&status.as_u16()) {
        let parts = ResponseParts::new(status, status_message, head.headers, head.version, options);
        return Ok(ResponseHead::new(parts, body));
    }

    let textual = has_text_content(&head.headers);
    match buffer_stream(body).await {
        Ok(buffer) => {
            let body = if textual {
                ErrorBody::Text(String::from_utf8_lossy(&buffer).into_owned())
            } else {
                ErrorBody::Bytes(buffer)
            };
            Err(error::status_code(options, status, head.headers, Some(body)))
        }
        Err(read) => Err(error::status_code(options, status, head.headers, None).with(read)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::Transport;

    fn head_for(options: &RequestOptions) -> Result<Parts> {
        let transport = transport_for(options.protocol.as_deref())?;
        let target = ConnectTarget::from_options(options, transport)?;
        request_head(options, &target, &HttpConfig::default())
    }

    #[test]
    fn host_and_basic_auth_are_derived_from_options() {
        let options = RequestOptions::new()
            .with_host("example.com:8080")
            .with_path("/items?page=2")
            .with_auth("user:secret")
            .with_method("PATCH");
        let head = head_for(&options).expect("valid options");

        assert_eq!(head.method, Method::PATCH);
        assert_eq!(head.uri, "/items?page=2");
        assert_eq!(head.headers[HOST], "example.com:8080");
        assert_eq!(head.headers[AUTHORIZATION], "Basic dXNlcjpzZWNyZXQ=");
    }

    #[test]
    fn explicit_headers_are_not_overridden() {
        let options = RequestOptions::new()
            .with_auth("user:secret")
            .with_header("host", "virtual.test")
            .with_header("Authorization", "Bearer token");
        let head = head_for(&options).expect("valid options");

        assert_eq!(head.headers[HOST], "virtual.test");
        assert_eq!(head.headers[AUTHORIZATION], "Bearer token");
        assert_eq!(head.headers.get_all(HOST).iter().count(), 1);
    }

    #[test]
    fn tls_target_omits_default_port_from_host() {
        let options = RequestOptions::new()
            .with_protocol("https:")
            .with_host("secure.test");
        let transport = transport_for(options.protocol.as_deref()).expect("https");
        assert_eq!(transport, Transport::Tls);
        let head = head_for(&options).expect("valid options");
        assert_eq!(head.headers[HOST], "secure.test");
    }

    #[test]
    fn invalid_method_and_header_are_configuration_errors() {
        let bad_method = head_for(&RequestOptions::new().with_method("GE T")).expect_err("space in method");
        assert!(bad_method.is_configuration());
        assert_eq!(bad_method.offending_value(), Some("GE T"));

        let bad_header = head_for(&RequestOptions::new().with_header("X-Bad", "line\nbreak"))
            .expect_err("newline in value");
        assert!(bad_header.is_configuration());
    }

    #[test]
    fn user_agent_comes_from_config_unless_given() {
        let config = HttpConfig {
            user_agent: Some("fhttp-test/1.0".to_string()),
            ..HttpConfig::default()
        };
        let options = RequestOptions::new();
        let target = ConnectTarget::from_options(&options, Transport::Plain).expect("target");
        let head = request_head(&options, &target, &config).expect("valid options");
        assert_eq!(head.headers[USER_AGENT], "fhttp-test/1.0");

        let options = options.with_header("User-Agent", "custom");
        let head = request_head(&options, &target, &config).expect("valid options");
        assert_eq!(head.headers[USER_AGENT], "custom");
    }
}
