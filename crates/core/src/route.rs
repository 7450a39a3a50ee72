//! Routes and fragment paths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical route name derived from the location hash (e.g. `home`).
///
/// Never empty. Case is preserved; only title rendering capitalizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route(String);

impl Route {
    /// Build a route from raw text. Returns `None` when the trimmed text is empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form: first character upper-cased, the rest untouched.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Route {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Route::parse(&value).ok_or_else(|| "route must not be empty".to_string())
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.0
    }
}

/// A path naming a fragment resource, relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentPath(String);

impl FragmentPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Primary path for a route: `{pages_dir}/{route}.{extension}`.
    pub fn for_route(pages_dir: &str, route: &Route, extension: &str) -> Self {
        let dir = pages_dir.trim_end_matches('/');
        if dir.is_empty() {
            Self(format!("{route}.{extension}"))
        } else {
            Self(format!("{dir}/{route}.{extension}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FragmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FragmentPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// What the sidebar region should show for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAssignment {
    /// Load this fragment into the sidebar mount and show it.
    Fragment(FragmentPath),
    /// Clear and hide the sidebar, mark the layout sidebar-less.
    Absent,
}

impl SidebarAssignment {
    pub fn is_absent(&self) -> bool {
        matches!(self, SidebarAssignment::Absent)
    }

    pub fn path(&self) -> Option<&FragmentPath> {
        match self {
            SidebarAssignment::Fragment(path) => Some(path),
            SidebarAssignment::Absent => None,
        }
    }
}
