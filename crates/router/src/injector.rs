//! Content injection with a three-tier fallback.
//!
//! `inject` never leaves a mount empty: the primary fragment, else the
//! fallback fragment, else an inline error section naming the primary
//! path. Fetch errors stop here; they are logged, published as
//! `FragmentFallback` events and folded into the [`NavigationResult`].

use std::sync::Arc;

use chrono::Utc;
use hashnav_core::{
    Document, DomError, EventBus, FetchError, FragmentLoader, FragmentPath, InjectOutcome, NavigationEvent,
    NavigationResult,
};
use maud::{Markup, html};
use tracing::{debug, warn};

use crate::generation::GenerationTicket;

/// Titles and markers the injector applies on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectorSettings {
    /// Only injections into this mount touch the document title.
    pub titled_mount: Option<String>,
    pub not_found_title: String,
    pub load_error_title: String,
    pub error_class: String,
}

impl Default for InjectorSettings {
    fn default() -> Self {
        Self {
            titled_mount: Some("page-content".into()),
            not_found_title: "Not Found".into(),
            load_error_title: "Load Error".into(),
            error_class: "page-error".into(),
        }
    }
}

pub struct ContentInjector {
    loader: Arc<dyn FragmentLoader>,
    document: Arc<dyn Document>,
    settings: InjectorSettings,
    events: Option<Arc<EventBus>>,
}

/// The inline section shown when neither fragment could be loaded.
pub fn error_fragment(class: &str, primary: &FragmentPath, cause: &FetchError) -> Markup {
    html! {
        section class=(class) role="alert" {
            h1 { "Oops." }
            p {
                "Could not load "
                code { (primary.as_str()) }
                "."
            }
            p.error-detail { (cause.to_string()) }
        }
    }
}

impl ContentInjector {
    pub fn new(
        loader: Arc<dyn FragmentLoader>,
        document: Arc<dyn Document>,
        settings: InjectorSettings,
    ) -> Self {
        Self {
            loader,
            document,
            settings,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn loader(&self) -> &Arc<dyn FragmentLoader> {
        &self.loader
    }

    /// Inject outside any navigation; never superseded.
    pub async fn inject(
        &self,
        mount: &str,
        primary: &FragmentPath,
        fallback: &FragmentPath,
    ) -> InjectOutcome {
        self.inject_with(&GenerationTicket::detached(), mount, primary, fallback)
            .await
    }

    /// Inject on behalf of the navigation holding `ticket`. Nothing is
    /// written once the ticket is stale.
    pub async fn inject_with(
        &self,
        ticket: &GenerationTicket,
        mount: &str,
        primary: &FragmentPath,
        fallback: &FragmentPath,
    ) -> InjectOutcome {
        match self.run(ticket, mount, primary, fallback).await {
            Ok(result) => InjectOutcome::Applied(result),
            Err(early) => early,
        }
    }

    async fn run(
        &self,
        ticket: &GenerationTicket,
        mount: &str,
        primary: &FragmentPath,
        fallback: &FragmentPath,
    ) -> Result<NavigationResult, InjectOutcome> {
        if !self.document.has_mount(mount) {
            debug!(mount = %mount, "Mount point absent, skipping injection");
            return Err(InjectOutcome::NoMount);
        }

        let primary_error = match self.loader.fetch(primary).await {
            Ok(body) => {
                self.write(ticket, mount, &body, None)?;
                debug!(mount = %mount, path = %primary, "Fragment injected");
                return Ok(NavigationResult::Success {
                    path: primary.clone(),
                });
            }
            Err(e) => e,
        };

        if !ticket.is_current() {
            return Err(InjectOutcome::Superseded);
        }

        warn!(
            mount = %mount,
            path = %primary,
            error = %primary_error,
            fallback = %fallback,
            "Fragment failed, trying fallback"
        );
        if let Some(events) = &self.events {
            events.publish(NavigationEvent::FragmentFallback {
                mount: mount.to_string(),
                primary: primary.to_string(),
                error_message: primary_error.to_string(),
                timestamp: Utc::now(),
            });
        }

        match self.loader.fetch(fallback).await {
            Ok(body) => {
                self.write(ticket, mount, &body, Some(&self.settings.not_found_title))?;
                Ok(NavigationResult::Degraded {
                    primary: primary.clone(),
                    fallback: fallback.clone(),
                    error: primary_error,
                })
            }
            Err(fallback_error) => {
                warn!(
                    mount = %mount,
                    path = %fallback,
                    error = %fallback_error,
                    "Fallback failed, showing inline error"
                );
                let markup = error_fragment(&self.settings.error_class, primary, &primary_error);
                self.write(
                    ticket,
                    mount,
                    &markup.into_string(),
                    Some(&self.settings.load_error_title),
                )?;
                Ok(NavigationResult::Failed {
                    primary: primary.clone(),
                    fallback: fallback.clone(),
                    primary_error,
                    fallback_error,
                })
            }
        }
    }

    fn write(
        &self,
        ticket: &GenerationTicket,
        mount: &str,
        markup: &str,
        title: Option<&str>,
    ) -> Result<(), InjectOutcome> {
        let written = ticket.commit(|| {
            self.document.set_content(mount, markup)?;
            if let Some(title) = title {
                self.title(mount, title);
            }
            Ok::<_, DomError>(())
        });
        match written {
            None => {
                debug!(mount = %mount, generation = ticket.generation(), "Discarding stale fragment");
                Err(InjectOutcome::Superseded)
            }
            Some(Err(e)) => {
                debug!(mount = %mount, error = %e, "Mount vanished before write");
                Err(InjectOutcome::NoMount)
            }
            Some(Ok(())) => Ok(()),
        }
    }

    fn title(&self, mount: &str, title: &str) {
        if self.settings.titled_mount.as_deref() == Some(mount) {
            self.document.set_title(title);
        }
    }

    /// Load a layout component into `mount` once, without fallback.
    ///
    /// Returns `Ok(false)` when the mount is absent. On failure the mount
    /// keeps its current content.
    pub async fn include(&self, mount: &str, path: &FragmentPath) -> Result<bool, FetchError> {
        if !self.document.has_mount(mount) {
            debug!(mount = %mount, "Include mount absent");
            return Ok(false);
        }
        let body = self.loader.fetch(path).await?;
        match self.document.set_content(mount, &body) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!(mount = %mount, error = %e, "Include mount vanished before write");
                Ok(false)
            }
        }
    }
}
