//! Request routing for the dashboard.
//!
//! | route                    | response                           |
//! |--------------------------|------------------------------------|
//! | `GET /`                  | full page                          |
//! | `GET /table?page=N`      | table fragment                     |
//! | `POST /upload?filename=` | [`PanelUpdate`] JSON               |
//! | `POST /controls`         | [`ChartUpdate`] JSON               |
//! | `GET /figure`            | current `MatrixFigure` JSON        |
//!
//! Only `GET /` starts a session. Every other route answers 409 when the
//! cookie names no live session, and the page reloads itself on that status.

use std::time::{Duration, Instant};

use s1s2_config::S1s2Config;
use s1s2_core::{ControlChange, Dataset, MatrixFigure, TablePage};
use s1s2_ingest::IngestOptions;
use serde::Serialize;

use super::http::{Method, Request, Response};
use crate::session::{Session, SessionStore};
use crate::view::page::Notice;
use crate::view::{controls, page, svg, table};

/// Everything the page replaces after an upload.
#[derive(Debug, Serialize)]
pub struct PanelUpdate {
    pub notice: Option<Notice>,
    pub table_html: String,
    pub controls_html: String,
    pub chart_svg: String,
    pub figure: MatrixFigure,
}

/// Chart replacement after a control change.
#[derive(Debug, Serialize)]
pub struct ChartUpdate {
    pub chart_svg: String,
    pub figure: MatrixFigure,
}

/// Body of the 409 sent when the cookie names no live session.
pub const SESSION_EXPIRED: &str = "session expired; reload the page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Page,
    Table,
    Figure,
    Upload,
    Controls,
}

impl Route {
    fn parse(method: Method, path: &str) -> Option<Self> {
        match (method, path) {
            (Method::Get, "/") => Some(Self::Page),
            (Method::Get, "/table") => Some(Self::Table),
            (Method::Get, "/figure") => Some(Self::Figure),
            (Method::Post, "/upload") => Some(Self::Upload),
            (Method::Post, "/controls") => Some(Self::Controls),
            _ => None,
        }
    }
}

pub struct App {
    sessions: SessionStore,
    ingest: IngestOptions,
    debug: bool,
}

impl App {
    pub fn new(config: &S1s2Config, seed: Dataset) -> Self {
        Self {
            sessions: SessionStore::new(seed, Duration::from_secs(config.server.session_ttl_secs)),
            ingest: IngestOptions {
                strict_labels: config.ingest.strict_labels,
            },
            debug: config.server.debug,
        }
    }

    /// Handle one request to completion.
    pub fn handle(&mut self, request: &Request, now: Instant) -> Response {
        let Some(route) = Route::parse(request.method, &request.path) else {
            return Response::not_found().with_no_store(self.debug);
        };

        let cookie = request.session_cookie.as_deref();
        let (id, created) = match self.sessions.lookup(cookie, now) {
            Some(id) => (id, false),
            None if route == Route::Page => match self.sessions.create(now) {
                Ok(id) => (id, true),
                Err(error) => {
                    tracing::error!(%error, "failed to start session");
                    return Response::error(500, "failed to start session");
                }
            },
            None => {
                tracing::debug!(path = %request.path, "request without a live session");
                return Response::error(409, SESSION_EXPIRED).with_no_store(self.debug);
            }
        };
        let Some(session) = self.sessions.get_mut(&id) else {
            return Response::error(500, "session vanished");
        };

        let response = match route {
            Route::Page => Response::html(page::render(session, self.debug)),
            Route::Table => table_page(session, request),
            Route::Figure => Response::json(session.figure()),
            Route::Upload => upload(session, request, self.ingest),
            Route::Controls => apply_controls(session, request),
        };

        tracing::debug!(
            method = ?request.method,
            path = %request.path,
            status = response.status,
            session = %id,
            "request handled"
        );

        let response = response.with_no_store(self.debug);
        if created {
            response.with_session_cookie(id.as_str())
        } else {
            response
        }
    }
}

fn table_page(session: &Session, request: &Request) -> Response {
    let page = match request.query_param("page").map(str::parse::<usize>) {
        None => 0,
        Some(Ok(page)) => page,
        Some(Err(_)) => return Response::error(400, "page must be a non-negative integer"),
    };
    Response::html(table::render(&TablePage::paginate(
        session.dataset().rows(),
        page,
    )))
}

fn upload(session: &mut Session, request: &Request, options: IngestOptions) -> Response {
    let Some(filename) = request.query_param("filename") else {
        return Response::error(400, "missing filename query parameter");
    };

    let outcome = session.upload(&request.body, filename, options);
    Response::json(&PanelUpdate {
        notice: Notice::for_upload(&outcome),
        table_html: table::render(&TablePage::paginate(session.dataset().rows(), 0)),
        controls_html: controls::render(session.dataset(), session.controls()),
        chart_svg: svg::render(session.figure()),
        figure: session.figure().clone(),
    })
}

fn apply_controls(session: &mut Session, request: &Request) -> Response {
    let batch: Vec<ControlChange> = match serde_json::from_slice(&request.body) {
        Ok(batch) => batch,
        Err(error) => return Response::error(400, &format!("invalid control batch: {error}")),
    };

    match session.apply_controls(&batch) {
        Ok(figure) => Response::json(&ChartUpdate {
            chart_svg: svg::render(figure),
            figure: figure.clone(),
        }),
        Err(error) => {
            tracing::warn!(%error, "control batch rejected");
            Response::error(422, &error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn app() -> App {
        App::new(&S1s2Config::default(), Dataset::default())
    }

    fn get(path: &str, cookie: Option<&str>) -> Request {
        Request::new(Method::Get, path, cookie, Vec::new())
    }

    fn post(path: &str, cookie: Option<&str>, body: &[u8]) -> Request {
        Request::new(Method::Post, path, cookie, body.to_vec())
    }

    /// Open a session and return its cookie header value.
    fn open(app: &mut App, now: Instant) -> String {
        let response = app.handle(&get("/", None), now);
        assert_eq!(response.status, 200);
        let set_cookie = response.set_cookie.expect("new session sets cookie");
        set_cookie
            .split(';')
            .next()
            .expect("cookie pair")
            .to_string()
    }

    fn json(response: &Response) -> Value {
        serde_json::from_slice(&response.body).expect("json body")
    }

    fn marker_positions(figure: &Value) -> Vec<(u64, u64)> {
        figure["markers"]
            .as_array()
            .expect("markers")
            .iter()
            .map(|m| (m["x"].as_u64().unwrap(), m["y"].as_u64().unwrap()))
            .collect()
    }

    #[test]
    fn first_visit_renders_default_page_and_sets_cookie() {
        let mut app = app();
        let response = app.handle(&get("/", None), Instant::now());
        assert_eq!(response.status, 200);
        assert!(response.content_type.starts_with("text/html"));
        let body = String::from_utf8(response.body).expect("utf-8");
        assert!(body.contains("<td>Risk 5</td>"));
        assert!(response.set_cookie.is_some());
        assert!(!response.no_store);
    }

    #[test]
    fn known_cookie_is_not_reissued() {
        let mut app = app();
        let now = Instant::now();
        let cookie = open(&mut app, now);
        let response = app.handle(&get("/figure", Some(&cookie)), now);
        assert_eq!(response.status, 200);
        assert!(response.set_cookie.is_none());
        assert_eq!(
            marker_positions(&json(&response)),
            vec![(2, 2), (1, 1), (3, 3), (2, 2), (1, 1)]
        );
    }

    #[test]
    fn control_change_moves_one_marker_and_not_the_table() {
        let mut app = app();
        let now = Instant::now();
        let cookie = open(&mut app, now);

        let batch = br#"[
            {"kind":"esg","row":0,"score":2},{"kind":"financial","row":0,"score":2},
            {"kind":"esg","row":1,"score":1},{"kind":"financial","row":1,"score":4},
            {"kind":"esg","row":2,"score":3},{"kind":"financial","row":2,"score":3},
            {"kind":"esg","row":3,"score":2},{"kind":"financial","row":3,"score":2},
            {"kind":"esg","row":4,"score":1},{"kind":"financial","row":4,"score":1}
        ]"#;
        let response = app.handle(&post("/controls", Some(&cookie), batch), now);
        assert_eq!(response.status, 200);
        let update = json(&response);
        assert_eq!(
            marker_positions(&update["figure"]),
            vec![(2, 2), (4, 1), (3, 3), (2, 2), (1, 1)]
        );
        assert!(
            update["chart_svg"]
                .as_str()
                .is_some_and(|svg| svg.starts_with("<svg"))
        );

        let table = app.handle(&get("/table", Some(&cookie)), now);
        let table = String::from_utf8(table.body).expect("utf-8");
        assert!(table.contains("<tr><td>Risk 2</td><td>low</td><td>low</td></tr>"));
    }

    #[test]
    fn invalid_control_batches_are_client_errors() {
        let mut app = app();
        let now = Instant::now();
        let cookie = open(&mut app, now);

        let response = app.handle(&post("/controls", Some(&cookie), b"not json"), now);
        assert_eq!(response.status, 400);

        let response = app.handle(
            &post(
                "/controls",
                Some(&cookie),
                br#"[{"kind":"esg","row":7,"score":2}]"#,
            ),
            now,
        );
        assert_eq!(response.status, 422);
    }

    #[test]
    fn upload_replaces_table_controls_and_chart() {
        let mut app = app();
        let now = Instant::now();
        let cookie = open(&mut app, now);

        let csv = b"risk,esg,financial\nFlood,high,medium\nFraud,low,high\nCyber,medium-high,low\n";
        let response = app.handle(
            &post("/upload?filename=q3.csv", Some(&cookie), csv),
            now,
        );
        assert_eq!(response.status, 200);
        let update = json(&response);
        assert!(update["notice"].is_null());
        assert!(
            update["table_html"]
                .as_str()
                .is_some_and(|html| html.contains("<td>Flood</td>") && !html.contains("Risk 1"))
        );
        assert!(
            update["controls_html"]
                .as_str()
                .is_some_and(|html| html.matches("<select ").count() == 6)
        );
        assert_eq!(
            marker_positions(&update["figure"]),
            vec![(2, 4), (4, 1), (1, 3)]
        );
    }

    #[test]
    fn unsupported_upload_keeps_previous_dataset() {
        let mut app = app();
        let now = Instant::now();
        let cookie = open(&mut app, now);

        let response = app.handle(
            &post("/upload?filename=notes.txt", Some(&cookie), b"hello"),
            now,
        );
        assert_eq!(response.status, 200);
        let update = json(&response);
        assert_eq!(update["notice"]["level"], "error");
        assert_eq!(update["notice"]["message"], "This file type is not supported.");
        assert!(
            update["table_html"]
                .as_str()
                .is_some_and(|html| html.contains("<td>Risk 1</td>"))
        );
        assert_eq!(update["figure"]["markers"].as_array().map(Vec::len), Some(5));
    }

    #[test]
    fn missing_column_upload_reports_generic_error() {
        let mut app = app();
        let now = Instant::now();
        let cookie = open(&mut app, now);

        let response = app.handle(
            &post("/upload?filename=bad.csv", Some(&cookie), b"risk,esg\nA,low\n"),
            now,
        );
        let update = json(&response);
        assert_eq!(
            update["notice"]["message"],
            "There was an error processing this file."
        );
    }

    #[test]
    fn upload_without_filename_is_bad_request() {
        let mut app = app();
        let now = Instant::now();
        let cookie = open(&mut app, now);
        let response = app.handle(&post("/upload", Some(&cookie), b"x"), now);
        assert_eq!(response.status, 400);
    }

    #[test]
    fn expired_session_is_not_reseeded_behind_the_page() {
        let mut app = app();
        let start = Instant::now();
        let cookie = open(&mut app, start);
        app.handle(
            &post(
                "/upload?filename=risks.csv",
                Some(&cookie),
                b"risk,esg,financial\nFlood,high,high\nFraud,low,low\n",
            ),
            start,
        );

        let later = start + Duration::from_secs(3601);
        let batch = br#"[{"kind":"esg","row":0,"score":2},{"kind":"esg","row":1,"score":3}]"#;
        let response = app.handle(&post("/controls", Some(&cookie), batch), later);
        assert_eq!(response.status, 409);
        assert!(response.set_cookie.is_none());
        assert_eq!(response.body, SESSION_EXPIRED.as_bytes());
        assert_eq!(app.sessions.len(), 0);

        for request in [
            get("/table?page=0", Some(&cookie)),
            get("/figure", Some(&cookie)),
            post("/upload?filename=a.csv", Some(&cookie), b"risk,esg,financial\nA,low,low\n"),
        ] {
            let response = app.handle(&request, later);
            assert_eq!(response.status, 409, "{}", request.path);
        }
        assert_eq!(app.sessions.len(), 0);

        let reload = app.handle(&get("/", Some(&cookie)), later);
        assert_eq!(reload.status, 200);
        assert!(reload.set_cookie.is_some());
        assert_eq!(app.sessions.len(), 1);
    }

    #[test]
    fn cookieless_requests_do_not_start_sessions() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(app.handle(&get("/figure", None), now).status, 409);
        assert_eq!(app.handle(&get("/nope", None), now).status, 404);
        assert_eq!(
            app.handle(&post("/controls", None, b"[]"), now).status,
            409
        );
        assert_eq!(app.sessions.len(), 0);
    }

    #[test]
    fn sessions_do_not_share_state() {
        let mut app = app();
        let now = Instant::now();
        let alice = open(&mut app, now);
        let bob = open(&mut app, now);
        assert_ne!(alice, bob);

        app.handle(
            &post(
                "/upload?filename=a.csv",
                Some(&alice),
                b"risk,esg,financial\nOnly,high,high\n",
            ),
            now,
        );

        let bob_figure = json(&app.handle(&get("/figure", Some(&bob)), now));
        assert_eq!(bob_figure["markers"].as_array().map(Vec::len), Some(5));
        let alice_figure = json(&app.handle(&get("/figure", Some(&alice)), now));
        assert_eq!(marker_positions(&alice_figure), vec![(4, 4)]);
    }

    #[test]
    fn table_pages_and_bad_page_param() {
        let mut app = app();
        let now = Instant::now();
        let cookie = open(&mut app, now);

        let mut csv = String::from("risk,esg,financial\n");
        for i in 1..=14 {
            csv.push_str(&format!("Risk {i},low,low\n"));
        }
        app.handle(
            &post("/upload?filename=many.csv", Some(&cookie), csv.as_bytes()),
            now,
        );

        let page = app.handle(&get("/table?page=1", Some(&cookie)), now);
        let html = String::from_utf8(page.body).expect("utf-8");
        assert_eq!(html.matches("<tr><td>").count(), 4);
        assert!(html.contains("Page 2 of 2"));

        let bad = app.handle(&get("/table?page=-1", Some(&cookie)), now);
        assert_eq!(bad.status, 400);
    }

    #[test]
    fn unknown_routes_are_not_found() {
        let mut app = app();
        let response = app.handle(&get("/nope", None), Instant::now());
        assert_eq!(response.status, 404);
        let response = app.handle(
            &Request::new(Method::Other, "/", None, Vec::new()),
            Instant::now(),
        );
        assert_eq!(response.status, 404);
    }

    #[test]
    fn debug_mode_disables_caching() {
        let mut config = S1s2Config::default();
        config.server.debug = true;
        let mut app = App::new(&config, Dataset::default());
        let response = app.handle(&get("/", None), Instant::now());
        assert!(response.no_store);
        let body = String::from_utf8(response.body).expect("utf-8");
        assert!(body.contains(r#"<pre id="figure-json">"#));
    }
}
