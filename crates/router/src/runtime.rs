//! Hash-change loop.
//!
//! Sets the default hash when the location has none, mounts the layout
//! includes, runs the initial navigation, then starts one navigation task
//! per hash change until `shutdown` resolves. Overlapping navigations are
//! settled by generation: only the newest one writes.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::controller::NavigationController;

/// Drive `controller` from its location. Returns the number of
/// navigations started, the initial one included.
///
/// A hash change that is pending when `shutdown` resolves is still
/// navigated.
pub async fn run<F>(controller: Arc<NavigationController>, shutdown: F) -> usize
where
    F: Future<Output = ()>,
{
    let location = controller.location().clone();
    let mut changes = location.subscribe();

    if location.hash().is_none() {
        let hash = controller.default_hash();
        info!(hash = %hash, "No hash present, setting default");
        location.set_hash(&hash);
    }
    // The initial navigation covers whatever the hash is now.
    changes.borrow_and_update();

    let included = controller.mount_includes().await;
    debug!(included, "Layout includes mounted");
    controller.navigate().await;
    let mut started = 1;

    let mut in_flight = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            changed = changes.changed() => {
                if changed.is_err() {
                    debug!("Location closed, stopping");
                    break;
                }
                let hash = changes.borrow_and_update().clone();
                debug!(hash = ?hash, "Hash changed");
                let controller = controller.clone();
                in_flight.spawn(async move { controller.navigate_to(hash.as_deref()).await });
                started += 1;
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "Navigation task failed");
                }
            }
            () = &mut shutdown => {
                debug!("Shutdown requested");
                break;
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Navigation task failed");
        }
    }
    info!(navigations = started, "Router stopped");
    started
}
