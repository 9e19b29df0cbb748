//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use foo_service::http::{HttpServer, ServerHandle, ServerSettings, ServerState};
use foo_service::lifecycle::{error_channel, CompletionGroup, ErrorReceiver, Shutdown};
use foo_service::net::Listener;
use foo_service::routing::Muxer;

/// A server running on an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub completion: CompletionGroup,
    pub errors: ErrorReceiver,
    pub handle: ServerHandle,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Fire shutdown and wait for the completion token, failing after `limit`.
    pub async fn shut_down_within(&self, limit: Duration) {
        self.shutdown.trigger();
        tokio::time::timeout(limit, self.completion.wait())
            .await
            .expect("completion token was not released in time");
    }
}

/// Start `server` on 127.0.0.1 with an OS-assigned port.
pub async fn start(server: HttpServer) -> TestServer {
    let listener = Listener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr();

    let shutdown = Shutdown::new();
    let completion = CompletionGroup::new();
    let (tx, errors) = error_channel();
    let mut handle = server.spawn_on(listener, &shutdown, &completion, tx);
    assert_eq!(handle.reached(ServerState::Listening).await, ServerState::Listening);

    TestServer {
        addr,
        shutdown,
        completion,
        errors,
        handle,
    }
}

/// Start a bare multiplexer with the given shutdown timeout.
#[allow(dead_code)]
pub async fn start_mux(mux: Muxer, shutdown_timeout: Duration) -> TestServer {
    let server = HttpServer::from_muxer(
        mux,
        ServerSettings {
            address: "127.0.0.1:0".to_string(),
            shutdown_timeout,
            debug: false,
        },
    );
    start(server).await
}

/// HTTP client without connection pooling or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
