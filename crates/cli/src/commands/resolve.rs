//! `hashnav resolve`: Show how a hash resolves.

use std::path::Path;

use hashnav_config::RouterConfig;
use hashnav_core::{FragmentPath, Route, SidebarAssignment};
use hashnav_router::{RouteResolver, SidebarPolicy, TitleFormatter};

use super::CommandResult;

pub async fn run(config_path: Option<&Path>, hash: Option<&str>) -> CommandResult {
    let config = RouterConfig::load(config_path)?;
    let default_route =
        Route::parse(&config.default_route).ok_or("default_route must not be empty")?;
    let resolver = RouteResolver::new(default_route);
    let sidebar = SidebarPolicy::from_config(&config);
    let titles = TitleFormatter::from_config(&config);

    let route = resolver.resolve(hash);
    let primary = FragmentPath::for_route(
        &config.fragments.pages_dir,
        &route,
        &config.fragments.extension,
    );

    println!("  Hash:     {}", hash.unwrap_or("(none)"));
    println!("  Route:    {route}");
    println!("  Title:    {}", titles.format(&route.display_name()));
    println!(
        "  Main:     {primary} (fallback {})",
        config.fragments.not_found
    );
    match sidebar.sidebar_for(&route) {
        SidebarAssignment::Fragment(path) => println!("  Sidebar:  {path}"),
        SidebarAssignment::Absent => println!("  Sidebar:  none"),
    }

    Ok(())
}
