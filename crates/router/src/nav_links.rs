//! Active navigation link marking.

use hashnav_core::{Document, Route, Selector};

const ARIA_CURRENT: &str = "aria-current";

/// Mark in-page links to `route` with `aria-current="page"` and unmark
/// every other hash link. With `None`, no link is current.
/// Returns the number of links marked.
pub fn mark_active_links(document: &dyn Document, route: Option<&Route>) -> usize {
    let targets = route.map(|r| [format!("#/{r}"), format!("#{r}")]);
    let mut marked = 0;

    for link in document.query_all(None, &Selector::tag("a")) {
        let Some(href) = document.attribute(link, "href") else {
            continue;
        };
        if !href.starts_with('#') {
            continue;
        }

        let active = targets
            .as_ref()
            .is_some_and(|t| t.iter().any(|target| *target == href));
        if active {
            document.set_attribute(link, ARIA_CURRENT, "page");
            marked += 1;
        } else if document.attribute(link, ARIA_CURRENT).is_some() {
            document.remove_attribute(link, ARIA_CURRENT);
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashnav_dom::MemoryDocument;

    const SHELL: &str = r##"<body><nav>
<a href="#/home">Home</a><a href="#/about">About</a><a href="#contact">Contact</a>
<a href="https://example.com/#/about">External</a>
</nav><main id="page-content"></main></body>"##;

    fn link(doc: &MemoryDocument, href: &str) -> hashnav_core::ElementRef {
        doc.query_all(None, &Selector::tag("a"))
            .into_iter()
            .find(|a| doc.attribute(*a, "href").as_deref() == Some(href))
            .unwrap()
    }

    #[test]
    fn marks_matching_links_only() {
        let doc = MemoryDocument::from_html(SHELL).unwrap();
        let about = Route::parse("about").unwrap();
        assert_eq!(mark_active_links(&doc, Some(&about)), 1);

        assert_eq!(doc.attribute(link(&doc, "#/about"), ARIA_CURRENT).as_deref(), Some("page"));
        assert!(doc.attribute(link(&doc, "#/home"), ARIA_CURRENT).is_none());
        assert!(
            doc.attribute(link(&doc, "https://example.com/#/about"), ARIA_CURRENT)
                .is_none()
        );
    }

    #[test]
    fn bare_hash_links_match_too() {
        let doc = MemoryDocument::from_html(SHELL).unwrap();
        let contact = Route::parse("contact").unwrap();
        assert_eq!(mark_active_links(&doc, Some(&contact)), 1);
        assert_eq!(doc.attribute(link(&doc, "#contact"), ARIA_CURRENT).as_deref(), Some("page"));
    }

    #[test]
    fn moving_on_clears_previous_mark() {
        let doc = MemoryDocument::from_html(SHELL).unwrap();
        mark_active_links(&doc, Some(&Route::parse("about").unwrap()));
        mark_active_links(&doc, Some(&Route::parse("home").unwrap()));
        assert!(doc.attribute(link(&doc, "#/about"), ARIA_CURRENT).is_none());
        assert_eq!(doc.attribute(link(&doc, "#/home"), ARIA_CURRENT).as_deref(), Some("page"));

        assert_eq!(mark_active_links(&doc, None), 0);
        assert!(doc.attribute(link(&doc, "#/home"), ARIA_CURRENT).is_none());
    }
}
