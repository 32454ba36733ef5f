//! Development server with live reload
//!
//! Serves the public directory, rebuilds when the source tree changes and
//! pushes a reload message to connected browsers over a websocket.

use crate::Vellum;
use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Websocket endpoint the reload script connects to
const RELOAD_PATH: &str = "/__vellum_reload";

struct ServerState {
    public_dir: PathBuf,
}

/// Build the site and serve it at `ip:port`
///
/// With `live_reload` the source tree is watched and every rebuild pushes
/// a reload to open pages; without it the output is served as-is.
pub async fn start(base_dir: &Path, ip: &str, port: u16, live_reload: bool) -> Result<()> {
    let vellum = Vellum::new(base_dir)?;
    vellum.generate()?;
    let public_dir = vellum.public_dir.clone();

    let (reload_tx, _) = broadcast::channel(16);

    let app = if live_reload {
        let state = Arc::new(ServerState {
            public_dir: public_dir.clone(),
        });

        let watch_dir = base_dir.to_path_buf();
        let rebuild_tx = reload_tx.clone();
        tokio::spawn(async move {
            if let Err(error) = watch_and_rebuild(watch_dir, rebuild_tx).await {
                error!("watcher stopped: {error:#}");
            }
        });

        Router::new()
            .route(RELOAD_PATH, get(reload_socket))
            .fallback(serve_site)
            .with_state((state, reload_tx))
    } else {
        Router::new().fallback_service(ServeDir::new(&public_dir))
    };
    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", ip, port);
    info!("serving {} at http://{}", public_dir.display(), addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn reload_socket(
    ws: WebSocketUpgrade,
    State((_, reload_tx)): State<(Arc<ServerState>, broadcast::Sender<()>)>,
) -> Response {
    ws.on_upgrade(move |socket| push_reloads(socket, reload_tx))
}

async fn push_reloads(mut socket: WebSocket, reload_tx: broadcast::Sender<()>) {
    let mut reloads = reload_tx.subscribe();
    while reloads.recv().await.is_ok() {
        if socket
            .send(Message::Text("reload".to_string()))
            .await
            .is_err()
        {
            break;
        }
    }
}

async fn serve_site(
    State((state, _)): State<(Arc<ServerState>, broadcast::Sender<()>)>,
    uri: Uri,
) -> Response {
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    let Some(file) = resolve_file(&state.public_dir, &path) else {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => {
            let content_type = content_type_for(&file);
            let body = if content_type.starts_with("text/html") {
                inject_reload_script(bytes)
            } else {
                bytes
            };
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(error) => {
            warn!("failed to read {}: {}", file.display(), error);
            (StatusCode::NOT_FOUND, "404 Not Found").into_response()
        }
    }
}

/// Map a request path to a file under the public directory
fn resolve_file(public_dir: &Path, url_path: &str) -> Option<PathBuf> {
    if url_path.split('/').any(|segment| segment == "..") {
        return None;
    }

    let mut file = public_dir.join(url_path.trim_start_matches('/'));
    if file.is_dir() {
        file = file.join("index.html");
    }
    file.is_file().then_some(file)
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("woff") => "font/woff",
        Some("txt") | Some("md") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Splice the reload script in front of `</body>`
fn inject_reload_script(bytes: Vec<u8>) -> Vec<u8> {
    let script = format!(
        "<script>(function () {{\n  var ws = new WebSocket(\"ws://\" + location.host + \"{}\");\n  ws.onmessage = function () {{ location.reload(); }};\n  ws.onclose = function () {{ setTimeout(function () {{ location.reload(); }}, 1500); }};\n}})();</script>",
        RELOAD_PATH
    );

    match String::from_utf8(bytes) {
        Ok(html) => match html.rfind("</body>") {
            Some(pos) => {
                let mut out = String::with_capacity(html.len() + script.len());
                out.push_str(&html[..pos]);
                out.push_str(&script);
                out.push_str(&html[pos..]);
                out.into_bytes()
            }
            None => (html + &script).into_bytes(),
        },
        Err(error) => error.into_bytes(),
    }
}

async fn watch_and_rebuild(base_dir: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let vellum = Vellum::new(&base_dir)?;
    let (tx, mut rx) = tokio::sync::mpsc::channel(8);
    let mut debouncer = new_debouncer(Duration::from_millis(300), move |result| {
        let _ = tx.blocking_send(result);
    })?;

    for target in vellum.watch_targets() {
        if !target.exists() {
            continue;
        }
        let mode = if target.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(&target, mode)?;
    }

    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                debug!(changes = events.len(), "source changed, rebuilding");
                match Vellum::new(&base_dir).and_then(|vellum| vellum.generate()) {
                    Ok(()) => {
                        let _ = reload_tx.send(());
                    }
                    Err(error) => error!("rebuild failed: {error:#}"),
                }
            }
            Err(error) => warn!("watch error: {error:?}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_file_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        assert!(resolve_file(dir.path(), "/../secret").is_none());
        assert!(resolve_file(dir.path(), "/index.html").is_some());
        assert!(resolve_file(dir.path(), "/").is_some());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(
            content_type_for(Path::new("a/index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("a.css")), "text/css; charset=utf-8");
        assert_eq!(content_type_for(Path::new("bin")), "application/octet-stream");
    }

    #[test]
    fn test_inject_before_body_close() {
        let html = b"<html><body><p>hi</p></body></html>".to_vec();
        let out = String::from_utf8(inject_reload_script(html)).unwrap();
        assert!(out.contains("<script>"));
        assert!(out.ends_with("</body></html>"));
        assert!(out.find("<script>").unwrap() < out.find("</body>").unwrap());
    }
}
