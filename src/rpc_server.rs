//! Aurora Browser RPC Server: JSON-RPC over stdin/stdout for a UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"nav.go", "params":{"url":"trustmail.com"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events:   {"event":{"type":"progress","tab_id":"...","progress":21.0}}
//!
//! The simulation clock follows wall time: between requests the server
//! sleeps until the next loading timer is due and then advances the Tab
//! Manager by the real time that passed.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use log::{error, info};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use aurora_browser::app::App;
use aurora_browser::rpc_handler::handle_method;

/// Optional settings file override.
const CONFIG_ENV: &str = "AURORA_BROWSER_CONFIG";
/// Optional session owner.
const OWNER_ENV: &str = "AURORA_BROWSER_OWNER";

/// Upper bound on an idle wait so the clock never drifts far behind.
const IDLE_WAIT: Duration = Duration::from_secs(1);

fn emit(line: &Value) {
    let mut stdout = std::io::stdout().lock();
    if writeln!(stdout, "{}", line).and_then(|_| stdout.flush()).is_err() {
        error!("stdout closed");
    }
}

/// Advances the clock to wall time and forwards queued events.
fn sync_clock(app: &Mutex<App>, last_tick: &mut Instant) {
    let now = Instant::now();
    let elapsed = now.duration_since(*last_tick);
    *last_tick = now;

    let events = match app.lock() {
        Ok(mut app) => {
            app.tick(elapsed);
            app.tab_manager.drain_events()
        }
        Err(e) => {
            error!("app state poisoned: {}", e);
            return;
        }
    };
    for event in events {
        emit(&json!({ "event": event }));
    }
}

fn next_wait(app: &Mutex<App>) -> Duration {
    app.lock()
        .ok()
        .and_then(|app| app.tab_manager.time_until_next_timer())
        .map_or(IDLE_WAIT, |wait| wait.min(IDLE_WAIT))
}

fn handle_line(app: &Mutex<App>, line: &str) -> Value {
    let req: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return json!({"id": null, "error": format!("parse error: {}", e)}),
    };

    let id = req.get("id").cloned().unwrap_or(Value::Null);
    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
    let params = req.get("params").cloned().unwrap_or(json!({}));

    match handle_method(app, method, &params) {
        Ok(val) => json!({"id": id, "result": val}),
        Err(err) => json!({"id": id, "error": err}),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty());
    let owner = std::env::var(OWNER_ENV).ok().filter(|o| !o.is_empty());
    let app = match App::new(config_path, owner.as_deref()) {
        Ok(app) => Mutex::new(app),
        Err(e) => {
            error!("failed to initialize browser: {}", e);
            emit(&json!({"event": {"type": "fatal", "error": e.to_string()}}));
            std::process::exit(1);
        }
    };
    info!("rpc server ready");
    emit(&json!({"event": {"type": "ready", "version": env!("CARGO_PKG_VERSION")}}));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_tick = Instant::now();

    loop {
        let wait = next_wait(&app);
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("stdin read failed: {}", e);
                        break;
                    }
                };
                sync_clock(&app, &mut last_tick);
                if line.trim().is_empty() {
                    continue;
                }
                let response = handle_line(&app, &line);
                emit(&response);
                sync_clock(&app, &mut last_tick);
            }
            _ = tokio::time::sleep(wait) => {
                sync_clock(&app, &mut last_tick);
            }
        }
    }
    info!("stdin closed, shutting down");
}
