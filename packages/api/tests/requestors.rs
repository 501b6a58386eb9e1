//! Fragments and middleware driving real requests

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Bytes;
use axum::extract::RawQuery;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use fhttp::dsl::{accept_json, body, conf, header, json_body, method, search, uri};
use fhttp::middleware::{after, before, compile, json_encoder, recover};
use fhttp::{DecodedResponse, Fhttp, HttpClient, Middleware, RequestOptions, Requestor, Task};
use serde_json::json;
use tokio::net::TcpListener;

async fn serve() -> SocketAddr {
    let app = Router::new()
        .route(
            "/echo",
            post(|headers: HeaderMap, body: Bytes| async move {
                let content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-")
                    .to_string();
                format!("{content_type}|{}", String::from_utf8_lossy(&body))
            }),
        )
        .route("/query", get(|RawQuery(query): RawQuery| async move { query.unwrap_or_default() }))
        .route("/gone", get(|| async { (StatusCode::GONE, "gone") }));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    addr
}

fn base(addr: SocketAddr, path: &str) -> RequestOptions {
    let url = format!("http://127.0.0.1:{}{path}", addr.port());
    conf([uri(&url).expect("valid url")])
}

#[tokio::test]
async fn json_requestor_encodes_structured_bodies() {
    let _ = env_logger::builder().is_test(true).try_init();
    let addr = serve().await;
    let client = HttpClient::new();

    let options = conf([
        uri(&format!("http://127.0.0.1:{}/echo", addr.port())).expect("valid url"),
        method("POST"),
        accept_json(),
        json_body(json!({"id": 7})),
    ]);
    let response = Fhttp::with_client(&client).json()(options).await.expect("echoed");

    assert_eq!(response.text(), Some(r#"application/json; charset=utf8|{"id":7}"#));
}

#[tokio::test]
async fn search_fragments_reach_the_server() {
    let addr = serve().await;
    let requestor = Fhttp::with_client(&HttpClient::new()).requestor();

    let options = conf([
        uri(&format!("http://127.0.0.1:{}/query?stale=1", addr.port())).expect("valid url"),
        search(&[("q", "a b"), ("n", "1")]).expect("encodable"),
    ]);
    let response = requestor(options).await.expect("query echoed");

    assert_eq!(response.text(), Some("q=a+b&n=1"));
}

#[tokio::test]
async fn middleware_stack_wraps_requests_outside_in() {
    let addr = serve().await;
    let engine = Fhttp::with_client(&HttpClient::new()).requestor();

    let stamp: Middleware<DecodedResponse> = Arc::new(|next: Requestor<DecodedResponse>| {
        before(
            |options: RequestOptions| std::future::ready(Ok(header("Content-Type", "text/x-stamped")(options))),
            next,
        )
    });
    let stack = vec![stamp, json_encoder()];
    let compiled = compile(stack, engine);

    let options = body("plain")(method("POST")(base(addr, "/echo")));
    let response = compiled(options).await.expect("echoed");

    // json_encode runs innermost, after the stamp, and overrides the content type.
    assert_eq!(response.text(), Some("application/json; charset=utf8|plain"));
}

#[tokio::test]
async fn after_and_recover_shape_outcomes() {
    let addr = serve().await;
    let engine = Fhttp::with_client(&HttpClient::new()).requestor();

    let status_of: Requestor<u16> = after(
        |response: DecodedResponse| std::future::ready(Ok(response.status().as_u16())),
        engine,
    );
    let tolerant = recover(
        |err: fhttp::Error| std::future::ready(err.status().map(|s| s.as_u16()).ok_or(err)),
        status_of,
    );

    assert_eq!(tolerant(base(addr, "/query")).await.expect("ok status"), 200);
    assert_eq!(tolerant(base(addr, "/gone")).await.expect("recovered status"), 410);
}

#[tokio::test]
async fn failed_preparation_never_connects() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let engine: Requestor<DecodedResponse> = Arc::new(move |_options: RequestOptions| {
        counter.fetch_add(1, Ordering::SeqCst);
        Task::failed(fhttp::error::configuration("engine", "should not be reached"))
    });

    let guarded = before(
        |options: RequestOptions| {
            let outcome = if options.host.is_none() {
                Err(fhttp::error::configuration("host", "A host is required"))
            } else {
                Ok(options)
            };
            std::future::ready(outcome)
        },
        engine,
    );

    let err = guarded(RequestOptions::new()).await.expect_err("rejected");
    assert!(err.is_configuration());
    assert_eq!(err.offending_value(), Some("host"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
