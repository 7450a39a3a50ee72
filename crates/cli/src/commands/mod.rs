//! Subcommands and the site wiring they share.

pub mod check;
pub mod config_cmd;
pub mod init;
pub mod navigate;
pub mod resolve;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use hashnav_config::RouterConfig;
use hashnav_core::{
    BoundHandlerRegistry, FragmentLoader, FragmentPath, InjectOutcome, NavigationResult,
};
use hashnav_dom::{MemoryDocument, MemoryLocation};
use hashnav_router::NavigationController;
use tracing::warn;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// A configured site rendered into a headless document.
pub struct Site {
    pub config: RouterConfig,
    pub document: Arc<MemoryDocument>,
    pub location: Arc<MemoryLocation>,
    pub controller: Arc<NavigationController>,
}

pub async fn open_site(
    config_path: Option<&Path>,
    initial_hash: Option<&str>,
) -> Result<Site, Box<dyn std::error::Error>> {
    let config = RouterConfig::load(config_path)?;
    let loader = hashnav_loader::build_from_config(&config)?;
    let document = Arc::new(load_shell(&config, loader.as_ref()).await);
    let location = Arc::new(MemoryLocation::new(initial_hash));

    let controller = NavigationController::from_config(
        &config,
        loader,
        document.clone(),
        location.clone(),
        Arc::new(BoundHandlerRegistry::new()),
        Vec::new(),
    )?;

    Ok(Site {
        config,
        document,
        location,
        controller: Arc::new(controller),
    })
}

/// Parse the site shell, or fall back to bare mount points.
async fn load_shell(config: &RouterConfig, loader: &dyn FragmentLoader) -> MemoryDocument {
    let shell = FragmentPath::new(config.fragments.shell.as_str());
    match loader.fetch(&shell).await {
        Ok(html) => match MemoryDocument::from_html(&html) {
            Ok(document) => return document,
            Err(e) => warn!(path = %shell, error = %e, "Shell could not be parsed, using bare mounts"),
        },
        Err(e) => warn!(path = %shell, error = %e, "Shell not loadable, using bare mounts"),
    }

    MemoryDocument::with_mounts(&[
        config.mounts.header.as_str(),
        config.mounts.sidebar.as_str(),
        config.mounts.main.as_str(),
        config.mounts.footer.as_str(),
    ])
}

/// One-line summary of an injection.
pub fn describe(outcome: &InjectOutcome) -> String {
    match outcome {
        InjectOutcome::Applied(NavigationResult::Success { path }) => format!("success ({path})"),
        InjectOutcome::Applied(NavigationResult::Degraded {
            fallback, error, ..
        }) => format!("degraded ({error}; showing {fallback})"),
        InjectOutcome::Applied(NavigationResult::Failed {
            primary_error,
            fallback_error,
            ..
        }) => format!("failed ({primary_error}; {fallback_error})"),
        InjectOutcome::NoMount => "no mount".into(),
        InjectOutcome::Superseded => "superseded".into(),
    }
}
