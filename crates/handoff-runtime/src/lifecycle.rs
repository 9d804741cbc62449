//! Activity lifecycle for one mounted screen.
//!
//! ```text
//! Unregistered --commit--> Active --commit (changed)--> Active
//!       ^                     |
//!       +------unmount--------+
//! ```
//!
//! `render` computes the descriptor (render phase, no side effects);
//! `commit` performs the deferred registration. A registration is always the
//! full descriptor: the OS capability treats it as an upsert, so the previous
//! registration of the same screen is superseded without an explicit revoke.

use std::fmt;
use std::mem;
use std::rc::Rc;

use tracing::debug;

use handoff_core::builder::DescriptorBuilder;
use handoff_core::metadata::HeadNode;
use handoff_core::model::ActivityDescriptor;
use handoff_core::HandoffResult;

/// Outbound OS discoverability capability.
///
/// Calls are fire-and-forget; success and failure are reported by the
/// implementation's own channels.
pub trait ActivityRegistrar {
    /// Create or replace the current activity.
    fn create_activity(&self, descriptor: &ActivityDescriptor);

    /// Resign the activity with `id`.
    fn suspend_activity(&self, id: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityState {
    Unregistered,
    Active(ActivityDescriptor),
}

/// Per-screen registration state machine.
///
/// Dropping a mounted instance runs the unmount path.
pub struct ScreenActivity {
    builder: DescriptorBuilder,
    registrar: Rc<dyn ActivityRegistrar>,
    suspend_on_unmount: bool,
    pending: Option<ActivityDescriptor>,
    state: ActivityState,
    mounted: bool,
}

impl ScreenActivity {
    pub fn mount(builder: DescriptorBuilder, registrar: Rc<dyn ActivityRegistrar>) -> Self {
        Self {
            builder,
            registrar,
            suspend_on_unmount: false,
            pending: None,
            state: ActivityState::Unregistered,
            mounted: true,
        }
    }

    /// Whether unmounting suspends the active registration.
    pub fn suspend_on_unmount(mut self, enabled: bool) -> Self {
        self.suspend_on_unmount = enabled;
        self
    }

    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    pub fn active(&self) -> Option<&ActivityDescriptor> {
        match &self.state {
            ActivityState::Active(descriptor) => Some(descriptor),
            ActivityState::Unregistered => None,
        }
    }

    pub fn pending(&self) -> Option<&ActivityDescriptor> {
        self.pending.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Compute the descriptor for `href` and queue it for the next commit.
    ///
    /// On failure nothing is queued, so the following commit registers
    /// nothing. The active registration, if any, stays current: the OS only
    /// replaces it on the next successful commit, and there is no descriptor
    /// to supersede it with until then.
    pub fn render(
        &mut self,
        href: &str,
        nodes: &[HeadNode],
    ) -> HandoffResult<&ActivityDescriptor> {
        let built = self.builder.build(href, nodes).and_then(|descriptor| {
            descriptor.validate()?;
            Ok(descriptor)
        });

        match built {
            Ok(descriptor) => Ok(&*self.pending.insert(descriptor)),
            Err(err) => {
                self.pending = None;
                Err(err)
            }
        }
    }

    /// Register the queued descriptor. Returns whether the capability was called.
    pub fn commit(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let Some(next) = self.pending.take() else {
            return false;
        };

        if self.active() == Some(&next) {
            debug!(id = %next.id, "activity unchanged; skipping registration");
            return false;
        }

        debug!(id = %next.id, url = %next.webpage_url, "registering activity");
        self.registrar.create_activity(&next);
        self.state = ActivityState::Active(next);
        true
    }

    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !mem::replace(&mut self.mounted, false) {
            return;
        }
        self.pending = None;

        if let ActivityState::Active(descriptor) =
            mem::replace(&mut self.state, ActivityState::Unregistered)
        {
            if self.suspend_on_unmount {
                debug!(id = %descriptor.id, "suspending activity on unmount");
                self.registrar.suspend_activity(&descriptor.id);
            } else {
                debug!(id = %descriptor.id, "screen unmounted; activity left to the OS");
            }
        }
    }
}

impl Drop for ScreenActivity {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ScreenActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenActivity")
            .field("state", &self.state)
            .field("pending", &self.pending.is_some())
            .field("mounted", &self.mounted)
            .field("suspend_on_unmount", &self.suspend_on_unmount)
            .finish()
    }
}
