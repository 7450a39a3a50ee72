//! `hashnav watch`: Navigate on every hash read from stdin.
//!
//! Each non-empty line becomes the new location hash. Stops at end of
//! input or on Ctrl-C, after in-flight navigations finish.

use std::path::Path;

use hashnav_core::{Location, NavigationEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, oneshot};
use tracing::warn;

use super::{CommandResult, open_site};

pub async fn run(config_path: Option<&Path>, json: bool) -> CommandResult {
    let site = open_site(config_path, None).await?;

    let mut events = site.controller.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&event, json),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let location = site.location.clone();
    let (eof_tx, eof_rx) = oneshot::channel::<()>();
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let hash = line.trim();
                    if !hash.is_empty() {
                        location.set_hash(hash);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
        let _ = eof_tx.send(());
    });

    let shutdown = async move {
        tokio::select! {
            _ = eof_rx => {}
            _ = tokio::signal::ctrl_c() => {}
        }
    };

    let started = hashnav_router::run(site.controller.clone(), shutdown).await;
    reader.abort();

    // Dropping the last controller handle closes the event stream.
    drop(site);
    let _ = printer.await;

    if !json {
        println!("\n  {started} navigation(s)");
    }
    Ok(())
}

fn print_event(event: &NavigationEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!(error = %e, "Failed to serialize event"),
        }
        return;
    }

    match event {
        NavigationEvent::NavigationStarted {
            generation, route, ..
        } => println!("→ [{generation}] {route}"),
        NavigationEvent::FragmentFallback {
            mount,
            primary,
            error_message,
            ..
        } => println!("  ⚠️  #{mount}: {primary} failed ({error_message}), using fallback"),
        NavigationEvent::NavigationCompleted {
            generation,
            route,
            outcome,
            title,
            ..
        } => println!("✅ [{generation}] {route}: {outcome}, title \"{title}\""),
        NavigationEvent::NavigationSuperseded {
            generation, route, ..
        } => println!("⏭️  [{generation}] {route} superseded"),
    }
}
