//! Local dashboard server.
//!
//! A single `tiny_http` accept loop handles one request at a time, so every
//! session's state is only ever touched from this loop.

pub mod http;
pub mod routes;

use std::io::Read;
use std::time::Instant;

use s1s2_config::S1s2Config;
use s1s2_core::Dataset;

use self::http::{Method, Request, Response};
use self::routes::App;

/// Bind and serve until the process is stopped. Blocks the calling thread.
pub fn run(config: &S1s2Config, seed: Dataset, open_browser: bool) -> anyhow::Result<()> {
    let addr = config.server.bind_addr();
    let server = tiny_http::Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
    let url = server
        .server_addr()
        .to_ip()
        .map_or_else(|| format!("http://{addr}/"), |ip| format!("http://{ip}/"));

    tracing::info!(%url, debug = config.server.debug, "dashboard listening");
    if open_browser
        && let Err(error) = open::that(&url)
    {
        tracing::warn!(%error, "failed to open browser; open the URL manually");
    }

    let max_upload = config.server.max_upload_bytes;
    let mut app = App::new(config, seed);

    for mut incoming in server.incoming_requests() {
        let response = match read_request(&mut incoming, max_upload) {
            Ok(request) => app.handle(&request, Instant::now()),
            Err(response) => response,
        };
        respond(incoming, response);
    }

    Ok(())
}

/// Convert a `tiny_http` request, rejecting bodies over `max_body` bytes.
fn read_request(incoming: &mut tiny_http::Request, max_body: usize) -> Result<Request, Response> {
    let method = Method::parse(incoming.method().as_str());
    let target = incoming.url().to_string();
    let cookie = incoming
        .headers()
        .iter()
        .find(|header| header.field.equiv("Cookie"))
        .map(|header| header.value.as_str().to_string());

    if incoming.body_length().is_some_and(|len| len > max_body) {
        return Err(Response::error(413, "upload too large"));
    }

    let mut body = Vec::new();
    let limit = u64::try_from(max_body).unwrap_or(u64::MAX).saturating_add(1);
    if let Err(error) = incoming.as_reader().take(limit).read_to_end(&mut body) {
        tracing::warn!(%error, "failed to read request body");
        return Err(Response::error(400, "failed to read request body"));
    }
    if body.len() > max_body {
        return Err(Response::error(413, "upload too large"));
    }

    Ok(Request::new(method, &target, cookie.as_deref(), body))
}

fn respond(incoming: tiny_http::Request, response: Response) {
    let mut out = tiny_http::Response::from_data(response.body).with_status_code(response.status);
    let mut headers = vec![("Content-Type", response.content_type.to_string())];
    if let Some(cookie) = response.set_cookie {
        headers.push(("Set-Cookie", cookie));
    }
    if response.no_store {
        headers.push(("Cache-Control", "no-store".to_string()));
    }
    for (name, value) in headers {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => tracing::warn!(name, "dropping malformed response header"),
        }
    }
    if let Err(error) = incoming.respond(out) {
        tracing::debug!(%error, "client went away before the response was sent");
    }
}
