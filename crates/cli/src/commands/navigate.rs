//! `hashnav navigate`: Run one navigation and print the result.

use std::path::Path;

use hashnav_core::{Document, NavigationReport, SidebarOutcome};

use super::{CommandResult, describe, open_site};

pub async fn run(config_path: Option<&Path>, hash: Option<&str>, html: bool) -> CommandResult {
    let site = open_site(config_path, hash).await?;

    site.controller.mount_includes().await;
    let report = site.controller.navigate().await;

    match &report {
        NavigationReport::Completed(done) => {
            println!("  Route:    {}", done.route);
            println!("  Title:    {}", done.title);
            println!("  Main:     {}", describe(&done.main));
            match &done.sidebar {
                SidebarOutcome::Hidden => println!("  Sidebar:  hidden"),
                SidebarOutcome::Shown(outcome) => println!("  Sidebar:  {}", describe(outcome)),
            }
        }
        NavigationReport::Superseded { route, .. } => {
            println!("  Route:    {route} (superseded)");
        }
    }
    println!();

    if html {
        println!("{}", site.document.to_html());
    } else if let Some(content) = site.document.content(&site.config.mounts.main) {
        println!("{}", content.trim());
    }

    Ok(())
}
