//! Smart Bookmark RPC Server: JSON-RPC over stdin/stdout for the renderer process.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.add", "params":{"url":"...","title":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events:   {"event":"ready",...} and {"event":"highlight","id":...}
//!
//! Pass `--demo` to run against an in-memory backend with a demo account.

use std::path::PathBuf;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use smart_bookmark::app::SessionController;
use smart_bookmark::rpc_handler::handle_method;
use smart_bookmark::services::settings_engine::SettingsEngine;

/// Overrides where the auth session file lives.
const ENV_DATA_DIR: &str = "SMART_BOOKMARK_DATA_DIR";

#[tokio::main]
async fn main() {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let demo = std::env::args().any(|arg| arg == "--demo");

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = out_rx.recv().await {
            let line = format!("{}\n", message);
            if stdout.write_all(line.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
                break;
            }
        }
    });

    let controller = match build_controller(demo) {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %e, "failed to initialize");
            let _ = out_tx.send(json!({"event": "error", "error": e.to_string()}));
            drop(out_tx);
            let _ = writer.await;
            std::process::exit(1);
        }
    };

    let mut highlight_rx = controller.subscribe_highlight();
    let app = Mutex::new(controller);

    let events = out_tx.clone();
    let forwarder = tokio::spawn(async move {
        while highlight_rx.changed().await.is_ok() {
            let id = highlight_rx.borrow_and_update().clone();
            if events.send(json!({"event": "highlight", "id": id})).is_err() {
                break;
            }
        }
    });

    let _ = out_tx.send(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION"), "demo": demo}));
    info!(demo, "rpc bridge ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let _ = out_tx.send(json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        let _ = out_tx.send(response);
    }

    info!("stdin closed, shutting down");

    // The writer exits once every sender is gone; queued replies are flushed first.
    forwarder.abort();
    let _ = forwarder.await;
    drop(out_tx);
    let _ = writer.await;
}

fn build_controller(demo: bool) -> Result<SessionController, Box<dyn std::error::Error>> {
    let settings = SettingsEngine::new(None).load_with_env()?;
    if demo {
        return Ok(SessionController::demo(&settings));
    }
    let session_path = std::env::var(ENV_DATA_DIR)
        .ok()
        .map(|dir| PathBuf::from(dir).join("session.json"));
    SessionController::from_settings(&settings, session_path)
}
