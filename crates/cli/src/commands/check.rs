//! `hashnav check`: Verify that the site's fixed fragments load.

use std::path::Path;

use hashnav_config::RouterConfig;
use hashnav_core::{Document, FetchError, FragmentLoader, FragmentPath, Route, Selector};
use hashnav_dom::MemoryDocument;

use super::CommandResult;

pub async fn run(config_path: Option<&Path>) -> CommandResult {
    println!("🩺 hashnav check — Site Diagnostics");
    println!("==================================\n");

    let mut issues = 0;

    let config = match RouterConfig::load(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            return Err(e.into());
        }
    };

    let loader = hashnav_loader::build_from_config(&config)?;
    println!("  ✅ Using {} loader", loader.name());

    // Shell and its mount points
    let shell = FragmentPath::new(config.fragments.shell.as_str());
    match loader.fetch(&shell).await {
        Ok(html) => match MemoryDocument::from_html(&html) {
            Ok(document) => {
                println!("  ✅ Shell {shell}");
                for mount in [&config.mounts.main, &config.mounts.sidebar] {
                    if document.has_mount(mount) {
                        println!("  ✅ Mount #{mount}");
                    } else {
                        println!("  ⚠️  Shell has no #{mount}");
                        issues += 1;
                    }
                }
            }
            Err(e) => {
                println!("  ❌ Shell {shell}: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ⚠️  Shell {shell}: {e}");
            issues += 1;
        }
    }

    // 404 page, which must carry its marker
    let not_found = FragmentPath::new(config.fragments.not_found.as_str());
    match loader.fetch(&not_found).await {
        Ok(body) if has_marker(&body, &config.markers.not_found_class) => {
            println!("  ✅ Not-found page {not_found}");
        }
        Ok(_) => {
            println!(
                "  ⚠️  Not-found page {not_found} lacks the `{}` marker class",
                config.markers.not_found_class
            );
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Not-found page: {e}");
            issues += 1;
        }
    }

    let mut fragments: Vec<(String, FragmentPath)> = Vec::new();
    match Route::parse(&config.default_route) {
        Some(route) => fragments.push((
            "default route".into(),
            FragmentPath::for_route(&config.fragments.pages_dir, &route, &config.fragments.extension),
        )),
        None => {
            println!("  ❌ Default route `{}` is not a route", config.default_route);
            issues += 1;
        }
    }
    fragments.extend(
        config
            .fragments
            .includes
            .iter()
            .map(|(mount, path)| (format!("include #{mount}"), FragmentPath::new(path.as_str()))),
    );
    fragments.extend(
        config
            .sidebar
            .routes
            .iter()
            .map(|(route, path)| (format!("sidebar for {route}"), FragmentPath::new(path.as_str()))),
    );

    for (label, path) in &fragments {
        match check_fragment(loader.as_ref(), path).await {
            Ok(()) => println!("  ✅ {label}: {path}"),
            Err(e) => {
                println!("  ❌ {label}: {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
        Ok(())
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
        Err(format!("{issues} issue(s) found").into())
    }
}

async fn check_fragment(loader: &dyn FragmentLoader, path: &FragmentPath) -> Result<(), FetchError> {
    loader.fetch(path).await.map(|_| ())
}

/// Whether some element in `body` carries `class`.
fn has_marker(body: &str, class: &str) -> bool {
    MemoryDocument::from_html(body)
        .map(|document| !document.query_all(None, &Selector::class(class)).is_empty())
        .unwrap_or(false)
}
