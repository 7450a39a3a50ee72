//! Route → sidebar fragment mapping.

use std::collections::BTreeMap;

use hashnav_config::RouterConfig;
use hashnav_core::{FragmentPath, Route, SidebarAssignment};

#[derive(Debug, Clone, Default)]
pub struct SidebarPolicy {
    routes: BTreeMap<String, FragmentPath>,
}

impl SidebarPolicy {
    pub fn new(routes: BTreeMap<String, FragmentPath>) -> Self {
        Self { routes }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(
            config
                .sidebar
                .routes
                .iter()
                .map(|(route, path)| (route.clone(), FragmentPath::new(path.as_str())))
                .collect(),
        )
    }

    pub fn sidebar_for(&self, route: &Route) -> SidebarAssignment {
        match self.routes.get(route.as_str()) {
            Some(path) => SidebarAssignment::Fragment(path.clone()),
            None => SidebarAssignment::Absent,
        }
    }

    /// Every configured sidebar fragment.
    pub fn paths(&self) -> impl Iterator<Item = (&str, &FragmentPath)> {
        self.routes.iter().map(|(route, path)| (route.as_str(), path))
    }
}
