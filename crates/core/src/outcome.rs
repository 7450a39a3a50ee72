//! Navigation outcomes.

use crate::error::FetchError;
use crate::route::{FragmentPath, Route};

/// What ended up in a mount after one injection.
///
/// Exactly one of the three holds; each leaves visible content behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// The primary fragment loaded.
    Success { path: FragmentPath },

    /// The primary fragment failed; the fallback loaded instead.
    Degraded {
        primary: FragmentPath,
        fallback: FragmentPath,
        error: FetchError,
    },

    /// Both failed; an inline error fragment was written.
    Failed {
        primary: FragmentPath,
        fallback: FragmentPath,
        primary_error: FetchError,
        fallback_error: FetchError,
    },
}

impl NavigationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, NavigationResult::Degraded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, NavigationResult::Failed { .. })
    }

    /// Short label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            NavigationResult::Success { .. } => "success",
            NavigationResult::Degraded { .. } => "degraded",
            NavigationResult::Failed { .. } => "failed",
        }
    }
}

/// Result of asking the injector to fill one mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectOutcome {
    /// Content was written.
    Applied(NavigationResult),
    /// The mount does not exist in this layout; nothing was fetched.
    NoMount,
    /// A newer navigation started while fetching; nothing was written.
    Superseded,
}

impl InjectOutcome {
    pub fn result(&self) -> Option<&NavigationResult> {
        match self {
            InjectOutcome::Applied(result) => Some(result),
            InjectOutcome::NoMount | InjectOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, InjectOutcome::Superseded)
    }
}

/// What happened to the sidebar region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarOutcome {
    /// The route has no sidebar: cleared, hidden, layout marked sidebar-less.
    Hidden,
    /// The route's sidebar fragment was injected.
    Shown(InjectOutcome),
}

/// Summary of a navigation that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedNavigation {
    pub generation: u64,
    pub route: Route,
    pub main: InjectOutcome,
    pub sidebar: SidebarOutcome,
    /// Final document title.
    pub title: String,
}

/// Outcome of one `navigate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationReport {
    Completed(CompletedNavigation),
    /// A newer navigation started before this one finished; its remaining
    /// writes were discarded.
    Superseded { generation: u64, route: Route },
}

impl NavigationReport {
    pub fn route(&self) -> &Route {
        match self {
            NavigationReport::Completed(done) => &done.route,
            NavigationReport::Superseded { route, .. } => route,
        }
    }

    pub fn completed(&self) -> Option<&CompletedNavigation> {
        match self {
            NavigationReport::Completed(done) => Some(done),
            NavigationReport::Superseded { .. } => None,
        }
    }
}
