//! Transport-neutral request and response types.
//!
//! The router works on these so it can be exercised without a socket;
//! `server::run` converts to and from `tiny_http`.

use std::collections::HashMap;

use serde::Serialize;

pub const SESSION_COOKIE: &str = "s1s2_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub session_cookie: Option<String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Split a raw request target into path and decoded query parameters.
    pub fn new(method: Method, target: &str, cookie_header: Option<&str>, body: Vec<u8>) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method,
            path: path.to_string(),
            query: parse_query(query),
            session_cookie: cookie_header.and_then(|header| cookie_value(header, SESSION_COOKIE)),
            body,
        }
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            let value = value.replace('+', " ");
            let value = urlencoding::decode(&value).ok()?.into_owned();
            Some((key.to_string(), value))
        })
        .collect()
}

fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub set_cookie: Option<String>,
    pub no_store: bool,
}

impl Response {
    fn new(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            set_cookie: None,
            no_store: false,
        }
    }

    pub fn html(body: String) -> Self {
        Self::new(200, "text/html; charset=utf-8", body.into_bytes())
    }

    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(200, "application/json", body),
            Err(error) => {
                tracing::error!(%error, "failed to serialize response");
                Self::error(500, "failed to serialize response")
            }
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::new(status, "text/plain; charset=utf-8", message.as_bytes().to_vec())
    }

    pub fn not_found() -> Self {
        Self::error(404, "not found")
    }

    #[must_use]
    pub fn with_session_cookie(mut self, id: &str) -> Self {
        self.set_cookie = Some(format!(
            "{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Strict"
        ));
        self
    }

    #[must_use]
    pub const fn with_no_store(mut self, no_store: bool) -> Self {
        self.no_store = no_store;
        self
    }
}
