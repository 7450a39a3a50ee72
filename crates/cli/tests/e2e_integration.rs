//! End-to-end integration tests for the hashnav router.
//!
//! These tests drive full navigations through the controller against a
//! headless document: hash resolution, fragment fetching with fallback,
//! sidebar toggling, titles, UI initializers and overlapping navigations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hashnav_config::RouterConfig;
use hashnav_core::error::FetchError;
use hashnav_core::{
    BoundHandlerRegistry, Document, EventKind, EventTarget, FragmentLoader, FragmentPath,
    InjectOutcome, Location, NavigationEvent, NavigationHook, NavigationReport, NavigationResult,
    Route, Selector, SidebarAssignment, SidebarOutcome,
};
use hashnav_dom::{MemoryDocument, MemoryLocation, Mutation};
use hashnav_loader::{FileFragmentLoader, StaticFragmentLoader};
use hashnav_router::{NavigationController, RouteResolver, SidebarPolicy};
use hashnav_ui::{FnHook, ModalBinding, ModalInitializer, ModalSettings};

// ── Mock loader ──────────────────────────────────────────────────────────

/// A loader that serves a fixed site and counts fetches per path.
struct SiteLoader {
    pages: HashMap<String, String>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl SiteLoader {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(path, body)| (path.to_string(), body.to_string()))
                .collect(),
            fetches: Mutex::new(HashMap::new()),
        }
    }

    fn fetches(&self, path: &str) -> usize {
        self.fetches.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl FragmentLoader for SiteLoader {
    fn name(&self) -> &str {
        "e2e_site"
    }

    async fn fetch(&self, path: &FragmentPath) -> Result<String, FetchError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default() += 1;
        self.pages
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                status: 404,
                path: path.to_string(),
            })
    }
}

/// A loader where nothing is reachable.
struct OfflineLoader;

#[async_trait::async_trait]
impl FragmentLoader for OfflineLoader {
    fn name(&self) -> &str {
        "e2e_offline"
    }

    async fn fetch(&self, path: &FragmentPath) -> Result<String, FetchError> {
        Err(FetchError::Network {
            path: path.to_string(),
            cause: "network unreachable".into(),
        })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

const SHELL: &str = r##"<!doctype html>
<html><head><title>Loading</title></head>
<body>
  <header id="site-header"></header>
  <nav><a href="#/home">Home</a><a href="#/about">About</a><a href="#/contact">Contact</a></nav>
  <aside id="site-sidebar"></aside>
  <main id="page-content"><p>Loading…</p></main>
  <footer id="site-footer"></footer>
  <div id="modal" data-modal-backdrop aria-hidden="true">
    <button data-close-modal>Close</button>
  </div>
</body></html>"##;

const PAGES: &[(&str, &str)] = &[
    ("pages/home.html", r#"<h1 class="reveal">Home</h1>"#),
    ("pages/about.html", "<h1>About us</h1>"),
    (
        "pages/contact.html",
        r#"<h1>Contact</h1><button id="hello" data-open-modal>Say hello</button>"#,
    ),
    ("pages/404.html", r#"<section class="page-404"><h1>Not Found</h1></section>"#),
    ("components/sidebar-about.html", "<p>About sidebar</p>"),
    ("components/sidebar-contact.html", "<p>Contact sidebar</p>"),
    ("components/header.html", "<strong>Studio</strong>"),
    ("components/footer.html", "<small>footer</small>"),
];

struct Site {
    document: Arc<MemoryDocument>,
    location: Arc<MemoryLocation>,
    controller: Arc<NavigationController>,
}

fn site_with(
    loader: Arc<dyn FragmentLoader>,
    hooks: Vec<Arc<dyn NavigationHook>>,
) -> Site {
    let document = Arc::new(MemoryDocument::from_html(SHELL).unwrap());
    let location = Arc::new(MemoryLocation::default());
    let controller = NavigationController::from_config(
        &RouterConfig::default(),
        loader,
        document.clone(),
        location.clone(),
        Arc::new(BoundHandlerRegistry::new()),
        hooks,
    )
    .unwrap();
    Site {
        document,
        location,
        controller: Arc::new(controller),
    }
}

fn site(loader: Arc<dyn FragmentLoader>) -> Site {
    site_with(loader, Vec::new())
}

fn completed(report: NavigationReport) -> hashnav_core::CompletedNavigation {
    match report {
        NavigationReport::Completed(done) => done,
        other => panic!("Expected a completed navigation, got: {other:?}"),
    }
}

// ── Resolution and sidebar policy ────────────────────────────────────────

#[test]
fn e2e_empty_hashes_resolve_to_home() {
    let resolver = RouteResolver::new(Route::parse("home").unwrap());
    assert_eq!(resolver.resolve(Some("")).as_str(), "home");
    assert_eq!(resolver.resolve(Some("#")).as_str(), "home");
    assert_eq!(resolver.resolve(None).as_str(), "home");
    assert_eq!(resolver.resolve(Some("#about")).as_str(), "about");
}

#[test]
fn e2e_sidebar_policy_matches_configuration() {
    let config = RouterConfig::default();
    let policy = SidebarPolicy::from_config(&config);

    for (route, path) in &config.sidebar.routes {
        match policy.sidebar_for(&Route::parse(route).unwrap()) {
            SidebarAssignment::Fragment(assigned) => assert_eq!(assigned.as_str(), path),
            SidebarAssignment::Absent => panic!("Expected a sidebar for {route}"),
        }
    }
    for route in ["home", "services", "blog"] {
        assert!(policy.sidebar_for(&Route::parse(route).unwrap()).is_absent());
    }
}

// ── Full navigations ─────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_contact_loads_page_and_sidebar() {
    let loader = Arc::new(SiteLoader::new(PAGES));
    let site = site(loader.clone());

    let done = completed(site.controller.navigate_to(Some("#contact")).await);

    assert_eq!(done.route.as_str(), "contact");
    assert_eq!(done.title, "Contact");
    assert_eq!(site.document.title(), "Contact");
    assert!(
        site.document
            .content("page-content")
            .unwrap()
            .contains("Say hello")
    );
    assert_eq!(
        site.document.content("site-sidebar").unwrap(),
        "<p>Contact sidebar</p>"
    );
    assert_eq!(loader.fetches("pages/contact.html"), 1);
    assert_eq!(loader.fetches("components/sidebar-contact.html"), 1);
    assert_eq!(loader.fetches("pages/404.html"), 0);
}

#[tokio::test]
async fn e2e_unknown_route_shows_404() {
    let site = site(Arc::new(SiteLoader::new(PAGES)));

    let done = completed(site.controller.navigate_to(Some("#doesnotexist")).await);

    assert!(matches!(
        done.main,
        InjectOutcome::Applied(NavigationResult::Degraded { .. })
    ));
    assert_eq!(done.title, "Not Found");
    assert_eq!(site.document.title(), "Not Found");
    assert_eq!(
        site.document
            .query_all(Some("page-content"), &Selector::class("page-404"))
            .len(),
        1
    );
    assert_eq!(done.sidebar, SidebarOutcome::Hidden);
}

#[tokio::test]
async fn e2e_total_failure_shows_inline_error() {
    let site = site(Arc::new(OfflineLoader));

    let done = completed(site.controller.navigate_to(Some("#/about")).await);

    assert!(done.main.result().unwrap().is_failed());
    assert_eq!(done.title, "Load Error");

    let content = site.document.content("page-content").unwrap();
    assert!(!content.is_empty());
    assert!(content.contains("pages/about.html"));
    assert!(content.contains("network unreachable"));

    // The sidebar region also got an error section rather than nothing.
    assert!(
        site.document
            .content("site-sidebar")
            .unwrap()
            .contains("components/sidebar-about.html")
    );
}

#[tokio::test]
async fn e2e_sidebar_toggles_between_routes() {
    let site = site(Arc::new(SiteLoader::new(PAGES)));

    completed(site.controller.navigate_to(Some("#/home")).await);
    assert_eq!(site.document.content("site-sidebar").unwrap(), "");
    assert_eq!(site.document.is_hidden("site-sidebar"), Some(true));
    assert!(site.document.has_layout_flag("no-sidebar"));

    completed(site.controller.navigate_to(Some("#/about")).await);
    assert!(!site.document.has_layout_flag("no-sidebar"));
    assert_eq!(site.document.is_hidden("site-sidebar"), Some(false));
    assert_eq!(
        site.document.content("site-sidebar").unwrap(),
        "<p>About sidebar</p>"
    );
}

#[tokio::test]
async fn e2e_active_link_follows_navigation() {
    let site = site(Arc::new(SiteLoader::new(PAGES)));
    let links = site.document.query_all(None, &Selector::tag("a"));

    site.controller.navigate_to(Some("#/about")).await;
    assert_eq!(
        site.document.attribute(links[1], "aria-current").as_deref(),
        Some("page")
    );

    site.controller.navigate_to(Some("#/contact")).await;
    assert!(site.document.attribute(links[1], "aria-current").is_none());
    assert_eq!(
        site.document.attribute(links[2], "aria-current").as_deref(),
        Some("page")
    );
}

// ── UI initializers ──────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_modal_binds_once_across_navigations() {
    let site = site(Arc::new(SiteLoader::new(PAGES)));

    for _ in 0..3 {
        site.controller.navigate_to(Some("#/contact")).await;
    }

    assert_eq!(
        site.document
            .listener_count(EventTarget::Document, EventKind::Click),
        1
    );
    assert_eq!(
        site.document
            .listener_count(EventTarget::Document, EventKind::KeyDown),
        1
    );

    site.document.clear_mutations();
    let hello = site.document.query_all(None, &Selector::id("hello"))[0];
    site.document.click(hello);

    let opened = site
        .document
        .mutations()
        .iter()
        .filter(|m| matches!(m, Mutation::ClassAdded { class, .. } if class == "is-open"))
        .count();
    assert_eq!(opened, 1);

    let backdrop = site
        .document
        .query_all(None, &Selector::attr("data-modal-backdrop"))[0];
    assert!(site.document.has_class(backdrop, "is-open"));
    site.document.press_key("Escape");
    assert!(!site.document.has_class(backdrop, "is-open"));
}

#[tokio::test]
async fn e2e_modal_in_page_content_binds_once_across_navigations() {
    let mut pages = PAGES.to_vec();
    pages.push((
        "pages/booking.html",
        r#"<h1>Booking</h1><button id="book" data-open-modal>Book</button>
<div data-modal-backdrop aria-hidden="true"><button data-close-modal>Close</button></div>"#,
    ));
    let document = Arc::new(
        MemoryDocument::from_html(
            r#"<html><body><aside id="site-sidebar"></aside><main id="page-content"></main></body></html>"#,
        )
        .unwrap(),
    );
    let controller = NavigationController::from_config(
        &RouterConfig::default(),
        Arc::new(SiteLoader::new(&pages)),
        document.clone(),
        Arc::new(MemoryLocation::default()),
        Arc::new(BoundHandlerRegistry::new()),
        Vec::new(),
    )
    .unwrap();

    for hash in ["#/booking", "#/home", "#/booking", "#/booking", "#/booking"] {
        completed(controller.navigate_to(Some(hash)).await);
    }

    assert_eq!(document.listener_count(EventTarget::Document, EventKind::Click), 1);
    assert_eq!(document.listener_count(EventTarget::Document, EventKind::KeyDown), 1);

    let backdrop = document.query_all(None, &Selector::attr("data-modal-backdrop"))[0];
    assert_eq!(
        document.listener_count(EventTarget::Element(backdrop), EventKind::Click),
        1
    );

    document.clear_mutations();
    let book = document.query_all(None, &Selector::id("book"))[0];
    document.click(book);
    let opened = document
        .mutations()
        .iter()
        .filter(|m| matches!(m, Mutation::ClassAdded { class, .. } if class == "is-open"))
        .count();
    assert_eq!(opened, 1);
    document.click(backdrop);
    assert!(!document.has_class(backdrop, "is-open"));
}

#[test]
fn e2e_modal_initializer_twice_attaches_once() {
    let document = Arc::new(MemoryDocument::from_html(SHELL).unwrap());
    let registry = Arc::new(BoundHandlerRegistry::new());
    let modal = ModalInitializer::new(document.clone(), registry, ModalSettings::default());

    assert_eq!(modal.init(), ModalBinding::Bound);
    assert_eq!(modal.init(), ModalBinding::AlreadyBound);

    let backdrop = document.query_all(None, &Selector::attr("data-modal-backdrop"))[0];
    assert_eq!(
        document.listener_count(EventTarget::Element(backdrop), EventKind::Click),
        1
    );
}

#[tokio::test]
async fn e2e_reveal_rebinds_to_injected_content() {
    let site = site(Arc::new(SiteLoader::new(PAGES)));

    site.controller.navigate_to(Some("#/home")).await;
    let heading = site
        .document
        .query_all(Some("page-content"), &Selector::class("reveal"))[0];
    assert!(site.document.is_observed(heading));

    site.document.scroll_into_view(heading, 0.5);
    assert!(site.document.has_class(heading, "is-in"));
}

#[tokio::test]
async fn e2e_page_hooks_run_after_each_navigation() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let log = calls.clone();
    let accordions: Arc<dyn NavigationHook> = Arc::new(FnHook::new("accordions", move || {
        log.lock().unwrap().push("accordions");
    }));
    let site = site_with(Arc::new(SiteLoader::new(PAGES)), vec![accordions]);

    site.controller.navigate_to(Some("#/home")).await;
    site.controller.navigate_to(Some("#/missing")).await;
    site.controller.navigate_to(Some("#/about")).await;

    assert_eq!(calls.lock().unwrap().len(), 3);
}

// ── Runtime ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_runtime_sets_default_hash_and_follows_changes() {
    let site = site(Arc::new(SiteLoader::new(PAGES)));
    let mut events = site.controller.subscribe();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let driver = tokio::spawn(hashnav_router::run(site.controller.clone(), async move {
        let _ = stop_rx.await;
    }));

    // Initial navigation to the default route.
    loop {
        if let NavigationEvent::NavigationCompleted { route, .. } =
            events.recv().await.unwrap().as_ref()
            && route == "home"
        {
            break;
        }
    }
    assert_eq!(site.location.hash().as_deref(), Some("#/home"));
    assert_eq!(
        site.document.content("site-header").unwrap(),
        "<strong>Studio</strong>"
    );

    site.location.set_hash("#/contact");
    loop {
        if let NavigationEvent::NavigationCompleted { route, .. } =
            events.recv().await.unwrap().as_ref()
            && route == "contact"
        {
            break;
        }
    }
    assert_eq!(site.document.title(), "Contact");

    stop_tx.send(()).unwrap();
    assert_eq!(driver.await.unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn e2e_slow_earlier_navigation_cannot_clobber_later_one() {
    let loader = StaticFragmentLoader::new()
        .with_page("pages/about.html", "<h1>About us</h1>")
        .with_page("pages/home.html", "<h1>Home</h1>")
        .with_page("pages/404.html", r#"<p class="page-404">404</p>"#)
        .with_page("components/sidebar-about.html", "<p>About sidebar</p>")
        .with_delay("pages/about.html", Duration::from_secs(2));
    let site = site(Arc::new(loader));

    let controller = site.controller.clone();
    let slow = tokio::spawn(async move { controller.navigate_to(Some("#/about")).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = completed(site.controller.navigate_to(Some("#/home")).await);

    let slow = slow.await.unwrap();
    assert!(matches!(slow, NavigationReport::Superseded { .. }));
    assert_eq!(fast.route.as_str(), "home");
    assert_eq!(site.document.content("page-content").unwrap(), "<h1>Home</h1>");
    assert_eq!(site.document.title(), "Home");
    assert!(site.document.has_layout_flag("no-sidebar"));
}

// ── Filesystem site ──────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_filesystem_site_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    for (path, body) in PAGES {
        let full = dir.path().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, body).unwrap();
    }

    let site = site(Arc::new(FileFragmentLoader::new(dir.path())));
    assert_eq!(site.controller.mount_includes().await, 2);

    let done = completed(site.controller.navigate_to(Some("#/about")).await);
    assert!(done.main.result().unwrap().is_success());
    assert_eq!(site.document.content("page-content").unwrap(), "<h1>About us</h1>");

    let done = completed(site.controller.navigate_to(Some("#/../secrets")).await);
    assert!(done.main.result().unwrap().is_degraded());
    assert_eq!(done.title, "Not Found");
}
