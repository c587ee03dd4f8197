//! Live-reload server: serves the build root and pushes reload events over
//! Server-Sent Events.

use std::convert::Infallible;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::sse::{Event, KeepAlive};
use axum::response::{IntoResponse, Response, Sse};
use axum::routing::get;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};

use crate::dev::{ReloadEvent, SharedHub, SyncConfig};
use crate::error::{CliError, Result};

/// SSE subscription endpoint.
pub const RELOAD_PATH: &str = "/__kiln_reload__";

/// Client script injected into served HTML.
pub const RELOAD_SCRIPT_PATH: &str = "/__kiln_reload__.js";

const RELOAD_SCRIPT: &str = include_str!("../../assets/reload-client.js");

pub struct ReloadServer {
    config: SyncConfig,
    hub: SharedHub,
}

impl ReloadServer {
    pub fn new(config: SyncConfig, hub: SharedHub) -> Self {
        Self { config, hub }
    }

    /// Bind and serve until the task is dropped.
    pub async fn start(self) -> Result<()> {
        let addr = self.config.addr;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {addr}: {e}")))?;

        crate::ui::success(&format!(
            "Live reload server running at {}",
            self.config.server_url()
        ));

        axum::serve(listener, router(self.hub))
            .await
            .map_err(|e| CliError::Server(format!("Server error: {e}")))
    }
}

pub(crate) fn router(hub: SharedHub) -> Router {
    Router::new()
        .route(RELOAD_PATH, get(handle_sse))
        .route(RELOAD_SCRIPT_PATH, get(handle_reload_script))
        .fallback(handle_request)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(hub)
}

async fn handle_sse(
    State(hub): State<SharedHub>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (id, rx) = hub.register_client();
    tracing::debug!("reload client {id} connected");
    hub.broadcast(&ReloadEvent::Connected { id });

    let stream = ReceiverStream::new(rx).map(|data| Ok(Event::default().data(data)));
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

async fn handle_reload_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        RELOAD_SCRIPT,
    )
}

async fn handle_request(State(hub): State<SharedHub>, uri: Uri) -> Response {
    let Some(file) = resolve_request(hub.build_root(), uri.path()) else {
        return not_found(uri.path());
    };

    match tokio::fs::read(&file).await {
        Ok(content) => {
            let content_type = content_type(&file);
            let body = if content_type.starts_with("text/html") {
                inject_reload_script(&content)
            } else {
                content
            };
            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                Body::from(body),
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => not_found(uri.path()),
        Err(e) => {
            crate::ui::warning(&format!("Failed to read {}: {e}", file.display()));
            (StatusCode::INTERNAL_SERVER_ERROR, "read error").into_response()
        }
    }
}

fn not_found(path: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("File not found: {path}")).into_response()
}

/// Map a URL path to a file under `root`. Directories resolve to their
/// `index.html`; paths escaping the root resolve to nothing.
fn resolve_request(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = Path::new(url_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let candidate = root.join(relative);
    if candidate.is_dir() {
        Some(candidate.join("index.html"))
    } else {
        Some(candidate)
    }
}

fn inject_reload_script(content: &[u8]) -> Vec<u8> {
    let html = String::from_utf8_lossy(content);
    let tag = format!(r#"<script src="{RELOAD_SCRIPT_PATH}"></script>"#);

    match html.rfind("</body>") {
        Some(pos) => format!("{}{tag}{}", &html[..pos], &html[pos..]).into_bytes(),
        None => format!("{html}{tag}").into_bytes(),
    }
}

fn content_type(path: &Path) -> &'static str {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    match extension {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" | "map" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::ReloadHub;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn hub(root: &Path) -> SharedHub {
        Arc::new(ReloadHub::new(root.to_path_buf()))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn injects_before_closing_body() {
        let out = inject_reload_script(b"<html><body><h1>Hi</h1></body></html>");
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            r#"<html><body><h1>Hi</h1><script src="/__kiln_reload__.js"></script></body></html>"#
        );
    }

    #[test]
    fn injects_at_end_without_body() {
        let out = String::from_utf8(inject_reload_script(b"<p>x</p>")).unwrap();
        assert!(out.ends_with(r#"<script src="/__kiln_reload__.js"></script>"#));
    }

    #[test]
    fn parent_components_are_rejected() {
        let root = Path::new("/site/build");
        assert_eq!(resolve_request(root, "/../secret.txt"), None);
        assert_eq!(resolve_request(root, "/styles/../../x"), None);
        assert_eq!(
            resolve_request(root, "/styles/main.css"),
            Some(PathBuf::from("/site/build/styles/main.css"))
        );
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("main.css")), "text/css");
        assert_eq!(content_type(Path::new("main.css.map")), "application/json");
        assert_eq!(content_type(Path::new("inter.woff2")), "font/woff2");
        assert_eq!(content_type(Path::new("README")), "application/octet-stream");
    }

    #[tokio::test]
    async fn root_serves_index_with_script() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("index.html"), "<body>home</body>").unwrap();

        let response = handle_request(State(hub(temp.path())), Uri::from_static("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.starts_with("<body>home<script"));
    }

    #[tokio::test]
    async fn assets_are_served_verbatim() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("styles")).unwrap();
        std::fs::write(temp.path().join("styles/main.css"), ".a{color:red}").unwrap();

        let response = handle_request(
            State(hub(temp.path())),
            Uri::from_static("/styles/main.css"),
        )
        .await;
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css"
        );
        assert_eq!(body_text(response).await, ".a{color:red}");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let temp = TempDir::new().unwrap();
        let response =
            handle_request(State(hub(temp.path())), Uri::from_static("/nope.html")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reload_script_is_served() {
        let response = handle_reload_script().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(RELOAD_PATH));
    }
}
