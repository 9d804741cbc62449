//! End-to-end flow: navigation state -> head render -> registration.

use std::cell::RefCell;
use std::rc::Rc;

use assert_matches::assert_matches;

use handoff_core::builder::DescriptorBuilder;
use handoff_core::config::HandoffConfig;
use handoff_core::metadata::HeadNode;
use handoff_core::model::ActivityDescriptor;
use handoff_core::HandoffError;
use handoff_runtime::{
    ActivityRegistrar, ActivityState, Head, NavigationContext, NavigationState, RouteState,
    StateEmitter,
};

#[derive(Default)]
struct RecordingRegistrar {
    created: RefCell<Vec<ActivityDescriptor>>,
    suspended: RefCell<Vec<String>>,
}

impl ActivityRegistrar for RecordingRegistrar {
    fn create_activity(&self, descriptor: &ActivityDescriptor) {
        self.created.borrow_mut().push(descriptor.clone());
    }

    fn suspend_activity(&self, id: &str) {
        self.suspended.borrow_mut().push(id.to_string());
    }
}

fn config() -> HandoffConfig {
    HandoffConfig {
        associated_domains: vec![
            "applinks:preview.example.com?mode=developer".into(),
            "applinks:example.com/".into(),
        ],
        application_name: Some("Explore".into()),
        scheme: Some("explore".into()),
        ..HandoffConfig::default()
    }
}

fn at(path: &str) -> NavigationState {
    NavigationState::single(RouteState::new("blog/[slug]").with_path(path))
}

#[test]
fn mounting_without_metadata_registers_once() {
    let emitter = StateEmitter::new(Some(at("/blog/post-1")));
    let ctx = NavigationContext::new(Rc::new(emitter.clone()));
    let registrar = Rc::new(RecordingRegistrar::default());

    let mut head = Head::from_config(&ctx, &config(), registrar.clone()).unwrap();
    assert!(head.update(&[]).unwrap());

    let created = registrar.created.borrow();
    assert_eq!(created.len(), 1);
    let d = &created[0];
    assert_eq!(d.title, "post-1");
    assert_eq!(d.webpage_url, "https://example.com/blog/post-1");
    assert_eq!(d.keywords, vec!["post-1", "Explore"]);
    assert_eq!(d.href(), Some("explore://blog/post-1"));
    assert!(d.id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
}

#[test]
fn route_changes_register_each_new_descriptor() {
    let emitter = StateEmitter::new(Some(at("/blog/post-1")));
    let ctx = NavigationContext::new(Rc::new(emitter.clone()));
    let registrar = Rc::new(RecordingRegistrar::default());
    let mut head = Head::from_config(&ctx, &config(), registrar.clone()).unwrap();

    head.update(&[]).unwrap();
    emitter.emit(at("/blog/post-2"));
    head.update(&[]).unwrap();
    emitter.emit(at("/blog/post-3"));
    head.update(&[]).unwrap();
    // Re-render with nothing new.
    head.update(&[]).unwrap();

    let urls: Vec<String> = registrar
        .created
        .borrow()
        .iter()
        .map(|d| d.webpage_url.clone())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/blog/post-1",
            "https://example.com/blog/post-2",
            "https://example.com/blog/post-3",
        ]
    );
}

#[test]
fn metadata_overrides_apply_end_to_end() {
    let emitter = StateEmitter::new(Some(at("/blog/post-1")));
    let ctx = NavigationContext::new(Rc::new(emitter));
    let registrar = Rc::new(RecordingRegistrar::default());
    let mut head = Head::from_config(&ctx, &config(), registrar.clone()).unwrap();

    let nodes = [
        HeadNode::title("Draft"),
        HeadNode::meta_name("title", "My first post"),
        HeadNode::meta_property("og:description", "About things"),
        HeadNode::meta_property("og:image", "https://example.com/cover.png"),
        HeadNode::meta_name("keywords", "rust,handoff"),
    ];
    head.update(&nodes).unwrap();

    let d = head.activity().active().unwrap();
    assert_eq!(d.title, "My first post");
    assert_eq!(d.description.as_deref(), Some("About things"));
    assert_eq!(d.dark_image_url.as_deref(), Some("https://example.com/cover.png"));
    assert_eq!(d.keywords, vec!["rust", "handoff", "Explore"]);
}

#[test]
fn missing_domains_fail_without_registration() {
    let emitter = StateEmitter::new(Some(at("/a")));
    let ctx = NavigationContext::new(Rc::new(emitter));
    let registrar = Rc::new(RecordingRegistrar::default());
    let cfg = HandoffConfig {
        associated_domains: vec!["webcredentials:example.com".into()],
        ..HandoffConfig::default()
    };

    let mut head = Head::from_config(&ctx, &cfg, registrar.clone()).unwrap();
    assert_matches!(head.update(&[]), Err(HandoffError::Configuration(_)));
    assert!(!head.commit());
    assert!(registrar.created.borrow().is_empty());
    assert_eq!(head.activity().state(), &ActivityState::Unregistered);
}

#[test]
fn head_outside_navigation_context_fails() {
    let registrar = Rc::new(RecordingRegistrar::default());
    let err = Head::from_config(&NavigationContext::empty(), &config(), registrar).unwrap_err();
    assert_matches!(err, HandoffError::Context(_));
}

#[test]
fn unmount_releases_listener_and_honors_suspend_policy() {
    let emitter = StateEmitter::new(Some(at("/a")));
    let ctx = NavigationContext::new(Rc::new(emitter.clone()));
    let registrar = Rc::new(RecordingRegistrar::default());
    let cfg = HandoffConfig {
        suspend_on_unmount: true,
        ..config()
    };

    let mut head = Head::from_config(&ctx, &cfg, registrar.clone()).unwrap();
    head.update(&[]).unwrap();
    assert_eq!(emitter.listener_count(), 1);
    let id = head.activity().active().unwrap().id.clone();

    head.unmount();
    assert_eq!(emitter.listener_count(), 0);
    assert_eq!(*registrar.suspended.borrow(), vec![id]);

    // The source keeps emitting; nobody is listening.
    emitter.emit(at("/b"));
    assert_eq!(registrar.created.borrow().len(), 1);
}

#[test]
fn dropped_head_releases_listener() {
    let emitter = StateEmitter::new(None);
    let ctx = NavigationContext::new(Rc::new(emitter.clone()));
    let registrar = Rc::new(RecordingRegistrar::default());
    {
        let mut head = Head::from_config(&ctx, &config(), registrar.clone()).unwrap();
        assert_eq!(head.href(), "/");
        head.update(&[]).unwrap();
        assert_eq!(
            head.activity().active().unwrap().webpage_url,
            "https://example.com/"
        );
    }
    assert_eq!(emitter.listener_count(), 0);
    assert!(registrar.suspended.borrow().is_empty());
}

#[test]
fn host_thumbnail_reaches_registration() {
    let emitter = StateEmitter::new(Some(at("/blog/post-1")));
    let ctx = NavigationContext::new(Rc::new(emitter));
    let registrar = Rc::new(RecordingRegistrar::default());

    let builder = DescriptorBuilder::from_config(&config())
        .unwrap()
        .thumbnail_url(Some("https://example.com/thumb.png".into()));
    let mut head = Head::mount(&ctx, builder, registrar.clone()).unwrap();
    head.update(&[]).unwrap();

    assert_eq!(
        registrar.created.borrow()[0].thumbnail_url.as_deref(),
        Some("https://example.com/thumb.png")
    );
}
