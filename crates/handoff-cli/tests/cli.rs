//! Black-box tests for the `handoff` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::{json, Value};

fn write_json(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path.display().to_string()
}

fn app_manifest(dir: &Path) -> String {
    write_json(
        dir,
        "app.json",
        &json!({
            "expo": {
                "name": "Explore",
                "scheme": "explore",
                "ios": {
                    "associatedDomains": [
                        "applinks:preview.example.com?mode=developer",
                        "applinks:example.com/",
                        "applinks:mirror.example.com"
                    ]
                }
            }
        }),
    )
}

fn run_json(args: &[&str]) -> Value {
    let out = Command::cargo_bin("handoff")
        .unwrap()
        .arg("--json")
        .args(args)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn resolve_picks_first_domain() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = app_manifest(dir.path());

    let v = run_json(&["resolve", "--config", &cfg]);
    assert_eq!(v["origin"], "https://example.com");
    assert_eq!(v["candidates"], json!(["example.com", "mirror.example.com"]));
    assert_eq!(v["overridden"], false);
}

#[test]
fn resolve_honors_override() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = app_manifest(dir.path());

    let v = run_json(&["resolve", "--config", &cfg, "--web-url", "https://www.example.com/"]);
    assert_eq!(v["origin"], "https://www.example.com");
    assert_eq!(v["overridden"], true);
}

#[test]
fn describe_route_with_head() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = app_manifest(dir.path());
    let head = write_json(
        dir.path(),
        "head.json",
        &json!([
            { "type": "title", "children": "Post one" },
            { "type": "meta", "name": "keywords", "content": "a,b" },
            { "type": "script", "src": "ignored.js" }
        ]),
    );

    let v = run_json(&["describe", "--config", &cfg, "--route", "/blog/post-1", "--head", &head]);
    assert_eq!(v["title"], "Post one");
    assert_eq!(v["webpageURL"], "https://example.com/blog/post-1");
    assert_eq!(v["keywords"], json!(["a", "b", "Explore"]));
    assert_eq!(v["userInfo"]["href"], "explore://blog/post-1");
    assert_eq!(v["id"], "https---example-com-blog-post-1");
}

#[test]
fn describe_fails_without_domains() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_json(dir.path(), "handoff.json", &json!({ "associatedDomains": [] }));

    let out = Command::cargo_bin("handoff")
        .unwrap()
        .args(["describe", "--config", &cfg, "--route", "/a"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("configuration error"));
}

#[test]
fn id_of_url() {
    let v = run_json(&["id", "https://example.com/foo"]);
    assert_eq!(v["id"], "https---example-com-foo");
}

#[test]
fn verbose_logs_dispatch_to_stderr() {
    let out = Command::cargo_bin("handoff")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["--verbose", "id", "https://example.com/foo"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("dispatching command"), "stderr: {stderr}");

    let quiet = Command::cargo_bin("handoff")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["id", "https://example.com/foo"])
        .output()
        .unwrap();
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("dispatching command"));
}

#[test]
fn describe_tolerates_text_children_and_odd_meta() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = app_manifest(dir.path());
    let head = write_json(
        dir.path(),
        "head.json",
        &json!([
            "some text child",
            { "type": "title", "children": ["Post ", 1] },
            { "type": "meta", "name": "robots", "content": 1 }
        ]),
    );

    let v = run_json(&["describe", "--config", &cfg, "--route", "/blog/post-1", "--head", &head]);
    assert_eq!(v["title"], "Post 1");
}
