//! Aurora Browser: a simulated browser with fake page loads.
//!
//! Console demo: walks a browsing session through the Tab Manager, driving
//! the loading animation in real time with tokio timers.

use std::time::Duration;

use log::info;

use aurora_browser::app::App;
use aurora_browser::managers::tab_manager::{BrowserEvent, PageView, TabManager, TabManagerTrait};
use aurora_browser::types::settings::BrowserSettings;

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_events(manager: &mut TabManager) {
    for event in manager.drain_events() {
        match event {
            BrowserEvent::Started { url, .. } => println!("  → loading {}", url),
            BrowserEvent::Progress { progress, .. } => println!("    {:>5.1}%", progress),
            BrowserEvent::Committed { url, title, .. } => {
                println!("  ✓ {} ({})", title, url)
            }
            BrowserEvent::Cancelled { url, .. } => println!("  ✗ cancelled {}", url),
        }
    }
}

/// Sleeps until each pending timer is due and fires it, until nothing loads.
async fn settle(app: &mut App) {
    let mut last = tokio::time::Instant::now();
    while let Some(wait) = app.tab_manager.time_until_next_timer() {
        tokio::time::sleep(wait).await;
        let now = tokio::time::Instant::now();
        app.tick(now.duration_since(last));
        last = now;
        print_events(&mut app.tab_manager);
    }
}

fn print_page(manager: &mut TabManager) {
    let badge = manager.security_badge();
    match manager.render_active() {
        PageView::Site { descriptor, content } => {
            println!(
                "  [{:?}/{:?}] {} :: {}",
                badge.icon, badge.tone, descriptor.domain, content.heading
            );
            for paragraph in &content.paragraphs {
                println!("    {}", paragraph);
            }
            for (i, link) in content.links.iter().enumerate() {
                println!("    [{}] {} -> {}", i, link.label, link.target);
            }
        }
        PageView::NotFound { url, recovery_url } => {
            println!("  404: {} (link 0 returns to {})", url, recovery_url);
        }
    }
}

fn print_history(manager: &TabManager) {
    if let Some(tab) = manager.get_active_tab() {
        let urls: Vec<&str> = tab.history.entries().iter().map(|e| e.url.as_str()).collect();
        println!("  history {:?} @ {}", urls, tab.history.position());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Aurora Browser v{} — Demo Mode              ║", env!("CARGO_PKG_VERSION"));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config_path = std::env::temp_dir().join("aurora-browser-demo-settings.json");
    let mut app = App::in_memory(
        BrowserSettings::default(),
        &config_path.to_string_lossy(),
        Some("demo"),
    );
    info!("demo session for owner {:?}", app.tab_manager.owner());

    section("Home");
    print_page(&mut app.tab_manager);
    println!();

    section("Navigate");
    app.tab_manager.navigate_active("trustmail.com");
    print_events(&mut app.tab_manager);
    settle(&mut app).await;
    print_page(&mut app.tab_manager);
    println!();

    section("Superseded navigation");
    app.tab_manager.navigate_active("promail.pro");
    tokio::time::sleep(Duration::from_millis(120)).await;
    app.tick(Duration::from_millis(120));
    app.tab_manager.navigate_active("trustmai1.com");
    print_events(&mut app.tab_manager);
    settle(&mut app).await;
    print_page(&mut app.tab_manager);
    println!();

    section("Unknown site");
    app.tab_manager.navigate_active("nowhere.example");
    settle(&mut app).await;
    print_page(&mut app.tab_manager);
    app.tab_manager.activate_link(0);
    settle(&mut app).await;
    print_history(&app.tab_manager);
    println!();

    section("Back and forward");
    if let Some(id) = app.tab_manager.active_tab_id().cloned() {
        app.tab_manager.go_back(&id);
        settle(&mut app).await;
        app.tab_manager.go_back(&id);
        settle(&mut app).await;
        print_history(&app.tab_manager);
        app.tab_manager.navigate(&id, "promail.pro");
        settle(&mut app).await;
        print_history(&app.tab_manager);
    }
    println!();

    section("Tabs and bookmarks");
    let second = app.tab_manager.open_tab();
    app.tab_manager.navigate(&second, "free-prizes.win");
    settle(&mut app).await;
    println!("  bookmarked: {}", app.tab_manager.toggle_bookmark("promail.pro"));
    app.tab_manager.close_tab(&second);
    println!(
        "  {} tab(s), bookmarks {:?}",
        app.tab_manager.tab_count(),
        app.tab_manager.bookmarks()
    );
    println!();

    let _ = std::fs::remove_file(&config_path);
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo session finished in {:?} of simulated time", app.tab_manager.now());
    println!("═══════════════════════════════════════════════════════════════");
}
