//! handoff-runtime
//!
//! Runtime side of handoff:
//! - [`navigation`]: root navigation state bridge with scoped subscriptions
//! - [`lifecycle`]: per-screen registration state machine over an
//!   [`ActivityRegistrar`](lifecycle::ActivityRegistrar)
//! - [`head`]: the two joined for one mounted screen
//!
//! Everything here is single-threaded and driven by the host's render/commit
//! cycle.

pub mod head;
pub mod lifecycle;
pub mod navigation;

pub use crate::head::Head;
pub use crate::lifecycle::{ActivityRegistrar, ActivityState, ScreenActivity};
pub use crate::navigation::{
    NavigationContainer, NavigationContext, NavigationState, RootNavigationState, RouteState,
    StateEmitter, StateEvent, StateEventData, StateListener, Subscription,
};
