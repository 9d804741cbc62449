//! Root navigation state bridge.
//!
//! [`RootNavigationState`] takes a snapshot of the root navigation state when
//! it is created, then follows `state` notifications from the container until
//! it is dropped or explicitly unsubscribed. Each subscription is released
//! exactly once, and nothing is delivered after release.
//!
//! Lookups go through a [`NavigationContext`]; asking for the root navigation
//! without an installed container is a caller bug and fails with
//! [`HandoffError::Context`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use handoff_core::{HandoffError, HandoffResult};

/// A navigator's state. Nested navigators appear as `state` on their route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Index of the focused route in `routes`.
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub routes: Vec<RouteState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    /// Concrete path the route was opened with, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Box<NavigationState>>,
}

impl RouteState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_state(mut self, state: NavigationState) -> Self {
        self.state = Some(Box::new(state));
        self
    }
}

impl NavigationState {
    /// State with a single focused route.
    pub fn single(route: RouteState) -> Self {
        Self {
            index: 0,
            routes: vec![route],
        }
    }

    pub fn focused_route(&self) -> Option<&RouteState> {
        self.routes.get(self.index)
    }

    /// Focused routes from the root navigator down to the deepest one.
    pub fn focused_chain(&self) -> Vec<&RouteState> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(state) = current {
            let Some(route) = state.focused_route() else {
                break;
            };
            chain.push(route);
            current = route.state.as_deref();
        }
        chain
    }

    /// In-app path of the focused screen.
    ///
    /// The deepest focused route carrying an explicit `path` wins. Without
    /// one, the focused route names are joined, leaving out `(group)`
    /// segments and `index`.
    pub fn focused_href(&self) -> String {
        let chain = self.focused_chain();
        if let Some(path) = chain.iter().rev().find_map(|r| r.path.as_deref()) {
            return if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            };
        }

        let segments: Vec<&str> = chain
            .into_iter()
            .flat_map(|r| r.name.split('/'))
            .filter(|s| !s.is_empty() && *s != "index" && !is_group(s))
            .collect();
        format!("/{}", segments.join("/"))
    }
}

fn is_group(segment: &str) -> bool {
    segment.starts_with('(') && segment.ends_with(')')
}

/// Payload of a `state` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEvent {
    pub data: StateEventData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEventData {
    pub state: NavigationState,
}

pub type StateListener = Box<dyn FnMut(&StateEvent)>;

/// The root navigator, as far as the bridge is concerned.
pub trait NavigationContainer {
    /// Current root state; `None` before the navigator is ready.
    fn root_state(&self) -> Option<NavigationState>;

    /// Register for `state` notifications until the returned guard is released.
    fn add_state_listener(&self, listener: StateListener) -> Subscription;
}

/// Releases a listener exactly once, on [`Subscription::unsubscribe`] or drop.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// In-memory navigation container that broadcasts `state` notifications.
#[derive(Clone, Default)]
pub struct StateEmitter {
    inner: Rc<RefCell<EmitterInner>>,
}

#[derive(Default)]
struct EmitterInner {
    state: Option<NavigationState>,
    next_id: u64,
    listeners: BTreeMap<u64, Rc<RefCell<StateListener>>>,
}

impl StateEmitter {
    pub fn new(initial: Option<NavigationState>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EmitterInner {
                state: initial,
                ..EmitterInner::default()
            })),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Replace the root state and notify listeners in subscription order.
    pub fn emit(&self, state: NavigationState) {
        let listeners: Vec<(u64, Rc<RefCell<StateListener>>)> = {
            let mut inner = self.inner.borrow_mut();
            inner.state = Some(state.clone());
            inner
                .listeners
                .iter()
                .map(|(id, l)| (*id, Rc::clone(l)))
                .collect()
        };

        let event = StateEvent {
            data: StateEventData { state },
        };
        for (id, listener) in listeners {
            // A listener released by an earlier one in this round is skipped.
            if !self.inner.borrow().listeners.contains_key(&id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut f) => (*f)(&event),
                Err(_) => debug!(listener = id, "skipping re-entrant state notification"),
            }
        }
    }
}

impl NavigationContainer for StateEmitter {
    fn root_state(&self) -> Option<NavigationState> {
        self.inner.borrow().state.clone()
    }

    fn add_state_listener(&self, listener: StateListener) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.insert(id, Rc::new(RefCell::new(listener)));
            id
        };

        let weak: Weak<RefCell<EmitterInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.remove(&id);
            }
        })
    }
}

impl fmt::Debug for StateEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("StateEmitter")
            .field("state", &inner.state)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Provider slot for the root navigation container.
#[derive(Clone, Default)]
pub struct NavigationContext {
    root: Option<Rc<dyn NavigationContainer>>,
}

impl NavigationContext {
    pub fn new(root: Rc<dyn NavigationContainer>) -> Self {
        Self { root: Some(root) }
    }

    /// Context with no container installed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root_navigation(&self) -> HandoffResult<Rc<dyn NavigationContainer>> {
        self.root.clone().ok_or_else(|| {
            HandoffError::context("root navigation must be used within a navigation container")
        })
    }
}

impl fmt::Debug for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("installed", &self.root.is_some())
            .finish()
    }
}

/// Live view of the root navigation state.
#[derive(Debug)]
pub struct RootNavigationState {
    state: Rc<RefCell<Option<NavigationState>>>,
    subscription: Option<Subscription>,
}

impl RootNavigationState {
    pub fn observe(ctx: &NavigationContext) -> HandoffResult<Self> {
        let navigation = ctx.root_navigation()?;

        let state = Rc::new(RefCell::new(navigation.root_state()));
        let slot = Rc::downgrade(&state);
        let subscription = navigation.add_state_listener(Box::new(move |event| {
            if let Some(slot) = slot.upgrade() {
                *slot.borrow_mut() = Some(event.data.state.clone());
            }
        }));

        Ok(Self {
            state,
            subscription: Some(subscription),
        })
    }

    pub fn get(&self) -> Option<NavigationState> {
        self.state.borrow().clone()
    }

    /// Focused in-app path, once a state is known.
    pub fn href(&self) -> Option<String> {
        self.state.borrow().as_ref().map(NavigationState::focused_href)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop following notifications. The last seen state stays readable.
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
