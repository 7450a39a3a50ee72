//! Navigation orchestration.
//!
//! One navigation: resolve the route, inject the main fragment (404
//! fallback), set the title from what is actually visible, mark active
//! links, show or hide the sidebar, rerun the hooks. Each navigation holds
//! a generation ticket; once a newer navigation starts, the older one
//! stops writing and reports `Superseded`.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use hashnav_config::RouterConfig;
use hashnav_core::{
    BoundHandlerRegistry, CompletedNavigation, Document, EventBus, FragmentLoader, FragmentPath,
    HookRegistry, InjectOutcome, Location, NavigationEvent, NavigationHook, NavigationReport,
    Route, Selector, SidebarAssignment, SidebarOutcome,
};
use hashnav_ui::{ModalInitializer, ModalSettings, RevealInitializer, RevealSettings};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::generation::{GenerationCounter, GenerationTicket};
use crate::injector::{ContentInjector, InjectorSettings};
use crate::nav_links::mark_active_links;
use crate::resolver::RouteResolver;
use crate::sidebar::SidebarPolicy;
use crate::title::TitleFormatter;

/// Mount ids, fragment layout and markers the controller works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub main_mount: String,
    pub sidebar_mount: String,
    pub pages_dir: String,
    pub extension: String,
    pub not_found: FragmentPath,
    pub not_found_class: String,
    pub error_class: String,
    pub no_sidebar_class: String,
    pub not_found_title: String,
    pub load_error_title: String,
    /// Layout components injected once at startup, as (mount, fragment).
    pub includes: Vec<(String, FragmentPath)>,
}

impl ControllerSettings {
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            main_mount: config.mounts.main.clone(),
            sidebar_mount: config.mounts.sidebar.clone(),
            pages_dir: config.fragments.pages_dir.clone(),
            extension: config.fragments.extension.clone(),
            not_found: FragmentPath::new(config.fragments.not_found.as_str()),
            not_found_class: config.markers.not_found_class.clone(),
            error_class: config.markers.error_class.clone(),
            no_sidebar_class: config.markers.no_sidebar_class.clone(),
            not_found_title: config.titles.not_found.clone(),
            load_error_title: config.titles.load_error.clone(),
            includes: config
                .fragments
                .includes
                .iter()
                .map(|(mount, path)| (mount.clone(), FragmentPath::new(path.as_str())))
                .collect(),
        }
    }
}

pub struct NavigationController {
    resolver: RouteResolver,
    sidebar: SidebarPolicy,
    injector: ContentInjector,
    document: Arc<dyn Document>,
    location: Arc<dyn Location>,
    hooks: HookRegistry,
    titles: TitleFormatter,
    settings: ControllerSettings,
    generations: GenerationCounter,
    events: Arc<EventBus>,
    current_route: Mutex<Option<Route>>,
}

impl NavigationController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resolver: RouteResolver,
        sidebar: SidebarPolicy,
        loader: Arc<dyn FragmentLoader>,
        document: Arc<dyn Document>,
        location: Arc<dyn Location>,
        hooks: HookRegistry,
        titles: TitleFormatter,
        settings: ControllerSettings,
    ) -> Self {
        let events = Arc::new(EventBus::default());
        let injector = ContentInjector::new(
            loader,
            document.clone(),
            InjectorSettings {
                titled_mount: Some(settings.main_mount.clone()),
                not_found_title: titles.format(&settings.not_found_title),
                load_error_title: titles.format(&settings.load_error_title),
                error_class: settings.error_class.clone(),
            },
        )
        .with_events(events.clone());

        Self {
            resolver,
            sidebar,
            injector,
            document,
            location,
            hooks,
            titles,
            settings,
            generations: GenerationCounter::new(),
            events,
            current_route: Mutex::new(None),
        }
    }

    /// Wire a controller from configuration. The reveal and modal
    /// initializers are registered first, then `extra_hooks` in order.
    pub fn from_config(
        config: &RouterConfig,
        loader: Arc<dyn FragmentLoader>,
        document: Arc<dyn Document>,
        location: Arc<dyn Location>,
        registry: Arc<BoundHandlerRegistry>,
        extra_hooks: Vec<Arc<dyn NavigationHook>>,
    ) -> hashnav_core::Result<Self> {
        config.validate()?;
        let default_route =
            Route::parse(&config.default_route).ok_or_else(|| hashnav_core::Error::Config {
                message: "default_route must not be empty".into(),
            })?;

        let mut hooks = HookRegistry::new()
            .with(Arc::new(RevealInitializer::new(
                document.clone(),
                RevealSettings {
                    class: config.markers.reveal_class.clone(),
                    revealed_class: config.markers.revealed_class.clone(),
                    threshold: config.reveal.threshold,
                },
            )))
            .with(Arc::new(ModalInitializer::new(
                document.clone(),
                registry,
                ModalSettings {
                    open_class: config.markers.modal_open_class.clone(),
                },
            )));
        for hook in extra_hooks {
            hooks.register(hook);
        }

        Ok(Self::new(
            RouteResolver::new(default_route),
            SidebarPolicy::from_config(config),
            loader,
            document,
            location,
            hooks,
            TitleFormatter::from_config(config),
            ControllerSettings::from_config(config),
        ))
    }

    pub fn location(&self) -> &Arc<dyn Location> {
        &self.location
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    pub fn resolver(&self) -> &RouteResolver {
        &self.resolver
    }

    pub fn sidebar_policy(&self) -> &SidebarPolicy {
        &self.sidebar
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<NavigationEvent>> {
        self.events.subscribe()
    }

    /// Route of the last navigation that wrote the main mount.
    pub fn current_route(&self) -> Option<Route> {
        self.current_route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Inject the layout components. Failures are logged and leave the
    /// mount as it was. Returns how many mounts were filled.
    pub async fn mount_includes(&self) -> usize {
        let mut mounted = 0;
        for (mount, path) in &self.settings.includes {
            match self.injector.include(mount, path).await {
                Ok(true) => {
                    debug!(mount = %mount, path = %path, "Layout include mounted");
                    mounted += 1;
                }
                Ok(false) => {}
                Err(e) => warn!(mount = %mount, path = %path, error = %e, "Layout include failed"),
            }
        }
        mounted
    }

    /// Navigate to the location's current hash.
    pub async fn navigate(&self) -> NavigationReport {
        let hash = self.location.hash();
        self.navigate_to(hash.as_deref()).await
    }

    /// Navigate to an explicit hash.
    pub async fn navigate_to(&self, hash: Option<&str>) -> NavigationReport {
        let route = self.resolver.resolve(hash);
        let ticket = self.generations.start();
        let generation = ticket.generation();

        debug!(generation, route = %route, "Navigation started");
        self.events.publish(NavigationEvent::NavigationStarted {
            generation,
            route: route.to_string(),
            timestamp: Utc::now(),
        });

        let primary = FragmentPath::for_route(&self.settings.pages_dir, &route, &self.settings.extension);
        let main = self
            .injector
            .inject_with(&ticket, &self.settings.main_mount, &primary, &self.settings.not_found)
            .await;
        if main.is_superseded() {
            return self.superseded(&ticket, route);
        }

        // Title, links and sidebar visibility are written together, and
        // only while this navigation is still the latest.
        let failed = main.result().is_some_and(|r| r.is_failed());
        let assignment = self.sidebar.sidebar_for(&route);
        let committed = ticket.commit(|| {
            let title = self.titles.format(&self.visible_title(&route));
            self.document.set_title(&title);
            *self
                .current_route
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(route.clone());
            mark_active_links(self.document.as_ref(), (!failed).then_some(&route));
            match &assignment {
                SidebarAssignment::Absent => self.hide_sidebar(),
                SidebarAssignment::Fragment(_) => self.show_sidebar(),
            }
            title
        });
        let Some(title) = committed else {
            return self.superseded(&ticket, route);
        };

        let sidebar = match assignment {
            SidebarAssignment::Absent => SidebarOutcome::Hidden,
            SidebarAssignment::Fragment(path) => {
                let outcome = self
                    .injector
                    .inject_with(&ticket, &self.settings.sidebar_mount, &path, &self.settings.not_found)
                    .await;
                if outcome.is_superseded() {
                    return self.superseded(&ticket, route);
                }
                SidebarOutcome::Shown(outcome)
            }
        };

        if !ticket.is_current() {
            return self.superseded(&ticket, route);
        }
        self.hooks.run_all();

        let outcome = match &main {
            InjectOutcome::Applied(result) => result.label(),
            InjectOutcome::NoMount => "no-mount",
            InjectOutcome::Superseded => "superseded",
        };
        info!(generation, route = %route, outcome, title = %title, "Navigation completed");
        self.events.publish(NavigationEvent::NavigationCompleted {
            generation,
            route: route.to_string(),
            outcome: outcome.to_string(),
            title: title.clone(),
            timestamp: Utc::now(),
        });

        NavigationReport::Completed(CompletedNavigation {
            generation,
            route,
            main,
            sidebar,
            title,
        })
    }

    /// Page title from the markers in the main mount, else the route.
    fn visible_title(&self, route: &Route) -> String {
        let main = Some(self.settings.main_mount.as_str());
        let has = |class: &str| !self.document.query_all(main, &Selector::class(class)).is_empty();

        if has(&self.settings.not_found_class) {
            self.settings.not_found_title.clone()
        } else if has(&self.settings.error_class) {
            self.settings.load_error_title.clone()
        } else {
            route.display_name()
        }
    }

    fn hide_sidebar(&self) {
        let mount = &self.settings.sidebar_mount;
        if self.document.has_mount(mount) {
            if let Err(e) = self.document.set_content(mount, "") {
                debug!(mount = %mount, error = %e, "Could not clear sidebar");
            }
            if let Err(e) = self.document.set_hidden(mount, true) {
                debug!(mount = %mount, error = %e, "Could not hide sidebar");
            }
        }
        self.document
            .set_layout_flag(&self.settings.no_sidebar_class, true);
    }

    fn show_sidebar(&self) {
        let mount = &self.settings.sidebar_mount;
        if self.document.has_mount(mount)
            && let Err(e) = self.document.set_hidden(mount, false)
        {
            debug!(mount = %mount, error = %e, "Could not show sidebar");
        }
        self.document
            .set_layout_flag(&self.settings.no_sidebar_class, false);
    }

    fn superseded(&self, ticket: &GenerationTicket, route: Route) -> NavigationReport {
        let generation = ticket.generation();
        info!(generation, route = %route, latest = self.generations.latest(), "Navigation superseded");
        self.events.publish(NavigationEvent::NavigationSuperseded {
            generation,
            route: route.to_string(),
            timestamp: Utc::now(),
        });
        NavigationReport::Superseded { generation, route }
    }

    /// Default hash for a location that has none, e.g. `#/home`.
    pub fn default_hash(&self) -> String {
        format!("#/{}", self.resolver.default_route())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashnav_core::NavigationResult;
    use hashnav_dom::{MemoryDocument, MemoryLocation};
    use hashnav_loader::StaticFragmentLoader;
    use hashnav_ui::FnHook;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const SHELL: &str = r##"<html><head><title>Loading</title></head><body>
<header id="site-header"></header>
<nav><a href="#/home">Home</a><a href="#/about">About</a></nav>
<aside id="site-sidebar"></aside>
<main id="page-content"></main>
</body></html>"##;

    fn site() -> StaticFragmentLoader {
        StaticFragmentLoader::new()
            .with_page("pages/home.html", r#"<h1 class="reveal">Home</h1>"#)
            .with_page("pages/about.html", "<h1>About</h1>")
            .with_page("pages/404.html", r#"<section class="page-404">Nothing here</section>"#)
            .with_page("components/sidebar-about.html", "<p>About sidebar</p>")
            .with_page("components/header.html", "<strong>Studio</strong>")
    }

    struct Harness {
        loader: Arc<StaticFragmentLoader>,
        doc: Arc<MemoryDocument>,
        controller: NavigationController,
    }

    fn harness_with(config: RouterConfig, loader: StaticFragmentLoader, hooks: Vec<Arc<dyn NavigationHook>>) -> Harness {
        let loader = Arc::new(loader);
        let doc = Arc::new(MemoryDocument::from_html(SHELL).unwrap());
        let controller = NavigationController::from_config(
            &config,
            loader.clone(),
            doc.clone(),
            Arc::new(MemoryLocation::default()),
            Arc::new(BoundHandlerRegistry::new()),
            hooks,
        )
        .unwrap();
        Harness { loader, doc, controller }
    }

    fn harness(loader: StaticFragmentLoader) -> Harness {
        harness_with(RouterConfig::default(), loader, Vec::new())
    }

    fn completed(report: NavigationReport) -> CompletedNavigation {
        match report {
            NavigationReport::Completed(done) => done,
            other => panic!("Expected completed navigation, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn navigates_with_sidebar() {
        let h = harness(site());
        let done = completed(h.controller.navigate_to(Some("#/about")).await);

        assert_eq!(done.route.as_str(), "about");
        assert_eq!(done.title, "About");
        assert!(matches!(done.sidebar, SidebarOutcome::Shown(InjectOutcome::Applied(ref r)) if r.is_success()));
        assert_eq!(h.doc.content("page-content").unwrap(), "<h1>About</h1>");
        assert_eq!(h.doc.content("site-sidebar").unwrap(), "<p>About sidebar</p>");
        assert_eq!(h.doc.is_hidden("site-sidebar"), Some(false));
        assert!(!h.doc.has_layout_flag("no-sidebar"));
        assert_eq!(h.doc.title(), "About");
        assert_eq!(h.controller.current_route().unwrap().as_str(), "about");
    }

    #[tokio::test]
    async fn unknown_route_shows_404_with_not_found_title() {
        let h = harness(site());
        let done = completed(h.controller.navigate_to(Some("#doesnotexist")).await);

        assert!(done.main.result().unwrap().is_degraded());
        assert_eq!(done.title, "Not Found");
        assert_eq!(h.doc.title(), "Not Found");
        assert!(h.doc.content("page-content").unwrap().contains("page-404"));
    }

    #[tokio::test]
    async fn marker_title_wins_over_route_name() {
        // A page served successfully that is itself 404 content.
        let h = harness(site().with_page("pages/gone.html", r#"<div class="page-404">Moved</div>"#));
        let done = completed(h.controller.navigate_to(Some("#/gone")).await);

        assert!(done.main.result().unwrap().is_success());
        assert_eq!(done.title, "Not Found");
    }

    #[tokio::test]
    async fn total_failure_keeps_load_error_title() {
        let h = harness(StaticFragmentLoader::new());
        let done = completed(h.controller.navigate_to(Some("#/about")).await);

        assert!(done.main.result().unwrap().is_failed());
        assert_eq!(done.title, "Load Error");
        let content = h.doc.content("page-content").unwrap();
        assert!(content.contains("pages/about.html"));

        let about = h.doc.query_all(None, &Selector::tag("a"))[1];
        assert!(h.doc.attribute(about, "aria-current").is_none());
    }

    #[tokio::test]
    async fn absent_sidebar_is_cleared_hidden_and_flagged() {
        let h = harness(site());
        completed(h.controller.navigate_to(Some("#/about")).await);
        let done = completed(h.controller.navigate_to(Some("#/home")).await);

        assert_eq!(done.sidebar, SidebarOutcome::Hidden);
        assert_eq!(h.doc.content("site-sidebar").unwrap(), "");
        assert_eq!(h.doc.is_hidden("site-sidebar"), Some(true));
        assert!(h.doc.has_layout_flag("no-sidebar"));

        completed(h.controller.navigate_to(Some("#/about")).await);
        assert!(!h.doc.has_layout_flag("no-sidebar"));
        assert_eq!(h.doc.is_hidden("site-sidebar"), Some(false));
        assert_eq!(h.doc.content("site-sidebar").unwrap(), "<p>About sidebar</p>");
    }

    #[tokio::test]
    async fn missing_sidebar_fragment_falls_back_without_retitling() {
        let mut config = RouterConfig::default();
        config
            .sidebar
            .routes
            .insert("home".into(), "components/sidebar-home.html".into());
        let h = harness_with(config, site(), Vec::new());

        let done = completed(h.controller.navigate_to(Some("#/home")).await);
        assert!(matches!(done.sidebar, SidebarOutcome::Shown(InjectOutcome::Applied(NavigationResult::Degraded { .. }))));
        assert_eq!(h.doc.title(), "Home");
    }

    #[tokio::test]
    async fn hooks_run_after_every_navigation() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let tabs: Arc<dyn NavigationHook> = Arc::new(FnHook::new("tabs", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let h = harness_with(RouterConfig::default(), site(), vec![tabs]);
        assert_eq!(h.controller.hooks().names(), vec!["reveal", "modal", "tabs"]);

        h.controller.navigate_to(Some("#/home")).await;
        h.controller.navigate_to(Some("#/nope")).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        // Reveal ran against the fresh home content.
        h.controller.navigate_to(Some("#/home")).await;
        let heading = h.doc.query_all(Some("page-content"), &Selector::class("reveal"))[0];
        assert!(h.doc.is_observed(heading));
    }

    #[tokio::test]
    async fn site_name_suffixes_titles() {
        let mut config = RouterConfig::default();
        config.site_name = Some("Studio".into());
        let h = harness_with(config, site(), Vec::new());

        let done = completed(h.controller.navigate_to(Some("#/about")).await);
        assert_eq!(done.title, "About | Studio");
        let done = completed(h.controller.navigate_to(Some("#/nope")).await);
        assert_eq!(done.title, "Not Found | Studio");
    }

    #[tokio::test]
    async fn active_link_follows_route() {
        let h = harness(site());
        h.controller.navigate_to(Some("#/about")).await;
        let links = h.doc.query_all(None, &Selector::tag("a"));
        assert!(h.doc.attribute(links[0], "aria-current").is_none());
        assert_eq!(h.doc.attribute(links[1], "aria-current").as_deref(), Some("page"));
    }

    #[tokio::test]
    async fn includes_mount_once_without_fallback() {
        let h = harness(site());
        assert_eq!(h.controller.mount_includes().await, 1);
        assert_eq!(h.doc.content("site-header").unwrap(), "<strong>Studio</strong>");
        // Footer mount is absent from the shell; nothing fetched for it.
        assert_eq!(h.loader.call_count("components/footer.html"), 0);
        assert_eq!(h.loader.call_count("pages/404.html"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn overtaken_navigation_discards_its_writes() {
        let h = harness(site().with_delay("pages/home.html", Duration::from_millis(500)));
        let mut events = h.controller.subscribe();

        let (slow, fast) = tokio::join!(
            h.controller.navigate_to(Some("#/home")),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                h.controller.navigate_to(Some("#/about")).await
            }
        );

        assert!(matches!(slow, NavigationReport::Superseded { generation: 1, .. }));
        assert_eq!(completed(fast).generation, 2);
        assert_eq!(h.doc.content("page-content").unwrap(), "<h1>About</h1>");
        assert_eq!(h.doc.title(), "About");

        let mut superseded = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event.as_ref(), NavigationEvent::NavigationSuperseded { .. }) {
                superseded += 1;
            }
        }
        assert_eq!(superseded, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_overtaken_during_sidebar_fetch_leaves_newer_state() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let tabs: Arc<dyn NavigationHook> = Arc::new(FnHook::new("tabs", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let loader = site().with_delay("components/sidebar-about.html", Duration::from_millis(500));
        let h = harness_with(RouterConfig::default(), loader, vec![tabs]);

        let (slow, fast) = tokio::join!(
            h.controller.navigate_to(Some("#/about")),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                h.controller.navigate_to(Some("#/home")).await
            }
        );

        assert!(matches!(slow, NavigationReport::Superseded { generation: 1, .. }));
        assert_eq!(completed(fast).sidebar, SidebarOutcome::Hidden);
        assert_eq!(h.doc.title(), "Home");
        assert_eq!(h.doc.content("site-sidebar").unwrap(), "");
        assert_eq!(h.doc.is_hidden("site-sidebar"), Some(true));
        assert!(h.doc.has_layout_flag("no-sidebar"));
        assert_eq!(h.controller.current_route().unwrap().as_str(), "home");
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_navigations_settle_on_the_latest() {
        let h = harness(site());
        let controller = Arc::new(h.controller);

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..24 {
            let controller = controller.clone();
            let hash = if i % 2 == 0 { "#/about" } else { "#/home" };
            tasks.spawn(async move { controller.navigate_to(Some(hash)).await });
        }

        let mut latest: Option<CompletedNavigation> = None;
        while let Some(report) = tasks.join_next().await {
            if let NavigationReport::Completed(done) = report.unwrap()
                && latest.as_ref().is_none_or(|l| done.generation > l.generation)
            {
                latest = Some(done);
            }
        }

        let latest = latest.unwrap();
        assert_eq!(latest.generation, 24);
        let about = latest.route.as_str() == "about";
        assert_eq!(h.doc.title(), if about { "About" } else { "Home" });
        assert_eq!(h.doc.has_layout_flag("no-sidebar"), !about);
        assert_eq!(h.doc.is_hidden("site-sidebar"), Some(!about));
        assert_eq!(controller.current_route().unwrap(), latest.route);
    }

    #[tokio::test]
    async fn navigate_reads_location() {
        let loader = Arc::new(site());
        let doc = Arc::new(MemoryDocument::from_html(SHELL).unwrap());
        let location = Arc::new(MemoryLocation::new(Some("#/about")));
        let controller = NavigationController::from_config(
            &RouterConfig::default(),
            loader,
            doc,
            location.clone(),
            Arc::new(BoundHandlerRegistry::new()),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(controller.navigate().await.route().as_str(), "about");
        location.set_hash("#/");
        assert_eq!(controller.navigate().await.route().as_str(), "home");
        assert_eq!(controller.default_hash(), "#/home");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = RouterConfig::default();
        config.reveal.threshold = 0.0;
        let result = NavigationController::from_config(
            &config,
            Arc::new(StaticFragmentLoader::new()),
            Arc::new(MemoryDocument::with_mounts(&["page-content"])),
            Arc::new(MemoryLocation::default()),
            Arc::new(BoundHandlerRegistry::new()),
            Vec::new(),
        );
        assert!(matches!(result, Err(hashnav_core::Error::Config { .. })));
    }
}
