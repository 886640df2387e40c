//! Shared reqwest plumbing for the public map services.
//!
//! Overpass and Nominatim both ask clients to identify themselves and answer
//! overload with 429/504, so status classification lives here once.

use std::time::Duration;

use reqwest::{Client, StatusCode};

const DEFAULT_USER_AGENT: &str = "spark-backend/0.1";
const DEFAULT_CONTACT: &str = "ops@spark.invalid";
const PREVIEW_CHAR_LIMIT: usize = 160;

/// Identity headers sent to public OSM services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpIdentity {
    pub user_agent: String,
    pub contact: String,
}

impl Default for HttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            contact: DEFAULT_CONTACT.to_owned(),
        }
    }
}

/// Failure classes shared by the map-service ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    RateLimited,
    Timeout,
    InvalidRequest,
    Transport,
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

pub(crate) fn classify_status(status: StatusCode) -> FailureKind {
    match status {
        StatusCode::TOO_MANY_REQUESTS => FailureKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => FailureKind::Timeout,
        _ if status.is_client_error() => FailureKind::InvalidRequest,
        _ => FailureKind::Transport,
    }
}

pub(crate) fn classify_transport(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Transport
    }
}

/// `status N` optionally followed by a compacted preview of the body.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Local actix server standing in for a remote HTTP service.

    use actix_web::dev::ServerHandle;
    use actix_web::{App, HttpServer, web};

    pub(crate) struct StubServer {
        pub(crate) base_url: String,
        handle: ServerHandle,
    }

    impl StubServer {
        pub(crate) async fn stop(self) {
            self.handle.stop(false).await;
        }
    }

    /// Start a single-worker server on an ephemeral port.
    pub(crate) fn spawn(routes: fn(&mut web::ServiceConfig)) -> StubServer {
        let server = HttpServer::new(move || App::new().configure(routes))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("bind stub server");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_rt::spawn(server);
        StubServer {
            base_url: format!("http://{addr}"),
            handle,
        }
    }
}
