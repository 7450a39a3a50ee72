//! Location hash → route.

use hashnav_core::Route;

#[derive(Debug, Clone)]
pub struct RouteResolver {
    default_route: Route,
}

impl RouteResolver {
    pub fn new(default_route: Route) -> Self {
        Self { default_route }
    }

    pub fn default_route(&self) -> &Route {
        &self.default_route
    }

    /// Strip a leading `#` and an optional following `/`, trim, and fall
    /// back to the default route when nothing is left. Case is preserved.
    pub fn resolve(&self, hash: Option<&str>) -> Route {
        let raw = hash.unwrap_or_default();
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        let raw = raw.strip_prefix('/').unwrap_or(raw);
        Route::parse(raw).unwrap_or_else(|| self.default_route.clone())
    }
}
