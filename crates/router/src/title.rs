//! Document title rendering.

use hashnav_config::RouterConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFormatter {
    site_name: Option<String>,
    separator: String,
}

impl TitleFormatter {
    pub fn new(site_name: Option<String>, separator: impl Into<String>) -> Self {
        Self {
            site_name: site_name.filter(|name| !name.trim().is_empty()),
            separator: separator.into(),
        }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(config.site_name.clone(), config.titles.separator.as_str())
    }

    /// `"About"` or, with a site name, `"About | Studio"`.
    pub fn format(&self, page: &str) -> String {
        match &self.site_name {
            Some(site) => format!("{page}{}{site}", self.separator),
            None => page.to_string(),
        }
    }
}

impl Default for TitleFormatter {
    fn default() -> Self {
        Self::new(None, " | ")
    }
}
