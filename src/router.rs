//! Event routing from the viewer to the sync engine.
//!
//! The router owns every standing subscription the overlay holds: one per
//! viewer update event plus one container-resize watch. All of them invoke
//! the same handler, which re-reads live state, so delivery order and
//! coalescing do not matter. [`EventRouter::detach`] releases them as a unit.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use std::rc::Rc;

use crate::consts::VIEWER_SYNC_EVENTS;
use crate::viewer::{Handler, ResizeSource, Subscription, ViewerEvents};

/// A resize capability with a preferred backing and an optional fallback.
///
/// The fallback is only consulted when the primary reports that it is
/// unavailable.
#[derive(Debug, Clone)]
pub struct ResizeChain<P, F> {
    primary: P,
    fallback: Option<F>,
}

impl<P, F> ResizeChain<P, F> {
    pub fn new(primary: P, fallback: Option<F>) -> Self {
        Self { primary, fallback }
    }
}

impl<P: ResizeSource, F: ResizeSource> ResizeSource for ResizeChain<P, F> {
    fn watch(&self, handler: Handler) -> Option<Subscription> {
        if let Some(sub) = self.primary.watch(Rc::clone(&handler)) {
            return Some(sub);
        }
        let fallback = self.fallback.as_ref()?;
        log::debug!("resize observation unavailable, using fallback");
        fallback.watch(handler)
    }
}

/// Owns the overlay's viewer and resize subscriptions.
#[derive(Debug, Default)]
pub struct EventRouter {
    subscriptions: Vec<Subscription>,
}

impl EventRouter {
    /// Subscribe `on_change` to every viewer sync event and to `resize`.
    ///
    /// A missing resize capability is not an error; viewer `resize` events
    /// still trigger syncs.
    pub fn attach<E, R>(events: &E, resize: Option<&R>, on_change: &Handler) -> Self
    where
        E: ViewerEvents + ?Sized,
        R: ResizeSource + ?Sized,
    {
        let mut subscriptions: Vec<Subscription> = VIEWER_SYNC_EVENTS
            .iter()
            .map(|name| events.subscribe(name, Rc::clone(on_change)))
            .collect();

        match resize.and_then(|source| source.watch(Rc::clone(on_change))) {
            Some(sub) => subscriptions.push(sub),
            None => log::debug!("no container resize notification available"),
        }

        let router = Self { subscriptions };
        log::debug!("event router attached: {}", router.subscription_names().join(", "));
        router
    }

    /// Whether any subscription is still live.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_active)
    }

    /// Names of the live subscriptions, in registration order.
    #[must_use]
    pub fn subscription_names(&self) -> Vec<&str> {
        self.subscriptions
            .iter()
            .filter(|sub| sub.is_active())
            .map(Subscription::name)
            .collect()
    }

    /// Release every subscription. Safe to call more than once.
    pub fn detach(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        log::debug!("event router detaching {} subscriptions", self.subscriptions.len());
        for mut sub in self.subscriptions.drain(..) {
            sub.release();
        }
    }
}

impl Drop for EventRouter {
    fn drop(&mut self) {
        self.detach();
    }
}
