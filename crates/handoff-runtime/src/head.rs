//! Screen-level glue: navigation bridge -> descriptor -> registration.
//!
//! A [`Head`] is mounted once per screen instance. Each render reads the
//! focused href from the live root navigation state and computes the
//! descriptor; each commit registers it if it changed. Unmounting (or
//! dropping) the head releases the navigation listener and runs the
//! lifecycle's unmount path.

use std::rc::Rc;

use handoff_core::builder::DescriptorBuilder;
use handoff_core::config::HandoffConfig;
use handoff_core::metadata::HeadNode;
use handoff_core::model::ActivityDescriptor;
use handoff_core::HandoffResult;

use crate::lifecycle::{ActivityRegistrar, ScreenActivity};
use crate::navigation::{NavigationContext, RootNavigationState};

/// Href used before the navigator has published any state.
pub const ROOT_HREF: &str = "/";

#[derive(Debug)]
pub struct Head {
    navigation: RootNavigationState,
    activity: ScreenActivity,
}

impl Head {
    pub fn mount(
        ctx: &NavigationContext,
        builder: DescriptorBuilder,
        registrar: Rc<dyn ActivityRegistrar>,
    ) -> HandoffResult<Self> {
        Ok(Self {
            navigation: RootNavigationState::observe(ctx)?,
            activity: ScreenActivity::mount(builder, registrar),
        })
    }

    /// Mount with builder and unmount policy taken from `cfg`.
    pub fn from_config(
        ctx: &NavigationContext,
        cfg: &HandoffConfig,
        registrar: Rc<dyn ActivityRegistrar>,
    ) -> HandoffResult<Self> {
        let builder = DescriptorBuilder::from_config(cfg)?;
        Ok(Self {
            navigation: RootNavigationState::observe(ctx)?,
            activity: ScreenActivity::mount(builder, registrar)
                .suspend_on_unmount(cfg.suspend_on_unmount),
        })
    }

    pub fn href(&self) -> String {
        self.navigation
            .href()
            .unwrap_or_else(|| ROOT_HREF.to_string())
    }

    pub fn activity(&self) -> &ScreenActivity {
        &self.activity
    }

    pub fn navigation(&self) -> &RootNavigationState {
        &self.navigation
    }

    pub fn render(&mut self, nodes: &[HeadNode]) -> HandoffResult<&ActivityDescriptor> {
        let href = self.href();
        self.activity.render(&href, nodes)
    }

    pub fn commit(&mut self) -> bool {
        self.activity.commit()
    }

    /// One render/commit cycle. Returns whether a registration happened.
    pub fn update(&mut self, nodes: &[HeadNode]) -> HandoffResult<bool> {
        self.render(nodes)?;
        Ok(self.commit())
    }

    pub fn unmount(self) {
        let Head {
            mut navigation,
            activity,
        } = self;
        activity.unmount();
        navigation.unsubscribe();
    }
}
