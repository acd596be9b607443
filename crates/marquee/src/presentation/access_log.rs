use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

/// Logs one line per request in the common log format.
pub async fn access_log(req: Request, next: Next) -> Response {
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let request_line = format!("{} {} {:?}", req.method(), req.uri(), req.version());

    let response = next.run(req).await;

    let length = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    info!(
        "{}",
        common_log_line(
            &remote,
            &Utc::now(),
            &request_line,
            response.status().as_u16(),
            length
        )
    );

    response
}

fn common_log_line(
    remote: &str,
    time: &DateTime<Utc>,
    request_line: &str,
    status: u16,
    length: &str,
) -> String {
    format!(
        "{remote} - - [{}] \"{request_line}\" {status} {length}",
        time.format("%d/%b/%Y:%H:%M:%S %z")
    )
}
