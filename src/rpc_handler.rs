//! RPC method handler for the browser's JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the Tab Manager and settings
//! engine held by [`App`].

use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::tab_manager::{PageView, TabManager, TabManagerTrait};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::tab::{Tab, TabId};

fn tab_json(tab: &Tab, manager: &TabManager) -> Value {
    json!({
        "id": tab.id,
        "requested_url": tab.requested_url,
        "rendered_url": tab.rendered_url,
        "title": tab.title,
        "load_state": tab.load_state,
        "progress": tab.progress,
        "history": tab.history.entries(),
        "history_index": tab.history.position(),
        "can_go_back": tab.history.can_go_back(),
        "can_go_forward": tab.history.can_go_forward(),
        "active": manager.active_tab_id() == Some(&tab.id),
    })
}

/// Tab named by `params.id`, defaulting to the active tab.
fn target_tab(manager: &TabManager, params: &Value) -> Result<TabId, String> {
    match params.get("id").and_then(|v| v.as_str()) {
        Some(id) => Ok(TabId::from(id)),
        None => manager
            .active_tab_id()
            .cloned()
            .ok_or_else(|| "no active tab".to_string()),
    }
}

fn required_id(params: &Value) -> Result<TabId, String> {
    params
        .get("id")
        .and_then(|v| v.as_str())
        .map(TabId::from)
        .ok_or_else(|| "missing id".to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// Tab operations on unknown ids succeed with `"applied": false`.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    let mut guard = app.lock().map_err(|e| e.to_string())?;
    let a = &mut *guard;
    let tm = &mut a.tab_manager;

    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Tabs ───
        "tab.open" => {
            let id = tm.open_tab();
            Ok(json!({"id": id}))
        }
        "tab.close" => {
            let id = required_id(params)?;
            Ok(json!({"applied": tm.close_tab(&id), "count": tm.tab_count()}))
        }
        "tab.switch" => {
            let id = required_id(params)?;
            Ok(json!({"applied": tm.switch_active(&id)}))
        }
        "tab.list" => {
            let tabs: Vec<Value> = tm.get_all_tabs().iter().map(|t| tab_json(t, tm)).collect();
            Ok(json!({"items": tabs, "active_id": tm.active_tab_id()}))
        }
        "tab.get" => {
            let id = target_tab(tm, params)?;
            let tab = tm
                .get_tab(&id)
                .ok_or_else(|| format!("tab not found: {}", id))?;
            Ok(tab_json(tab, tm))
        }

        // ─── Navigation ───
        "nav.go" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let id = target_tab(tm, params)?;
            Ok(json!({"applied": tm.navigate(&id, url)}))
        }
        "nav.back" => {
            let id = target_tab(tm, params)?;
            Ok(json!({"applied": tm.go_back(&id)}))
        }
        "nav.forward" => {
            let id = target_tab(tm, params)?;
            Ok(json!({"applied": tm.go_forward(&id)}))
        }
        "nav.reload" => {
            let id = target_tab(tm, params)?;
            Ok(json!({"applied": tm.reload(&id)}))
        }
        "nav.home" => {
            let id = target_tab(tm, params)?;
            Ok(json!({"applied": tm.go_home(&id)}))
        }

        // ─── Page ───
        "page.render" => {
            let badge = tm.security_badge();
            match tm.render_active() {
                PageView::Site {
                    descriptor,
                    content,
                } => Ok(json!({
                    "kind": "site",
                    "domain": descriptor.domain,
                    "name": descriptor.name,
                    "security": descriptor.security,
                    "badge": badge,
                    "content": content,
                })),
                PageView::NotFound { url, recovery_url } => Ok(json!({
                    "kind": "not_found",
                    "url": url,
                    "recovery_url": recovery_url,
                    "badge": badge,
                })),
            }
        }
        "page.activate" => {
            let index = params
                .get("index")
                .and_then(|v| v.as_u64())
                .ok_or("missing index")?;
            Ok(json!({"applied": tm.activate_link(index as usize)}))
        }

        // ─── Clock ───
        "clock.advance" => {
            let ms = params.get("ms").and_then(|v| v.as_u64()).ok_or("missing ms")?;
            tm.advance(Duration::from_millis(ms));
            Ok(json!({"now_ms": tm.now().as_millis() as u64}))
        }
        "clock.settle" => {
            tm.run_until_idle();
            Ok(json!({"now_ms": tm.now().as_millis() as u64}))
        }
        "events.drain" => Ok(json!(tm.drain_events())),

        // ─── Bookmarks ───
        "bookmark.toggle" => {
            let url = match params.get("url").and_then(|v| v.as_str()) {
                Some(url) => url.to_string(),
                None => tm
                    .get_active_tab()
                    .map(|t| t.rendered_url.clone())
                    .ok_or("no active tab")?,
            };
            Ok(json!({"url": url, "bookmarked": tm.toggle_bookmark(&url)}))
        }
        "bookmark.list" => Ok(json!({"items": tm.bookmarks()})),

        // ─── Settings ───
        "settings.get" => {
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            a.settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            if key.split('.').next() == Some("loading") {
                tm.set_loading_settings(a.settings_engine.get_settings().loading)?;
            }
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
