//! End-to-end tests of the `dotnav-gallery` binary against the pages in
//! `fixtures/`.
//!
//! Run with: cargo test --test cli

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dotnav-gallery"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn page_arg(name: &str) -> String {
    fixture(name).to_str().unwrap().to_string()
}

#[test]
fn scan_lists_both_families() {
    let out = run(&["scan", &page_arg("page.html")]);
    assert!(out.status.success());
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Inline galleries",
            "001 (3 slides)",
            "    001 img/dawn.jpg",
            "        Caption: Dawn over the bay",
            "    002 img/pier.jpg",
            "        Caption: The old pier",
            "    003 img/dusk.jpg",
            "",
            "Autoplay galleries",
            "001 (2 slides)",
            "    001 img/boat.jpg",
            "        Caption: Boats",
            "    002 img/nets.jpg",
            "",
            "Lightbox: 3 slides",
        ]
    );
}

#[test]
fn scan_json_keeps_caption_html() {
    let out = run(&["scan", &page_arg("page.html"), "--json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let inline = &json["inline"]["galleries"][0]["slides"];
    assert_eq!(inline.as_array().unwrap().len(), 3);
    assert_eq!(inline[0]["image_url"], "img/dawn.jpg");
    assert_eq!(inline[0]["caption"], "Dawn over the <em>bay</em>");
    assert_eq!(json["autoplay"]["galleries"][0]["slides"][1]["image_url"], "img/nets.jpg");
}

#[test]
fn check_passes_on_well_formed_page() {
    let out = run(&["check", &page_arg("page.html")]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Inline galleries: 1"));
    assert!(text.contains("Autoplay galleries: 1"));
    assert!(text.contains("Markup is valid"));
}

#[test]
fn check_fails_on_broken_page() {
    let out = run(&["check", &page_arg("broken.html")]);
    assert_eq!(out.status.code(), Some(1));
    let text = stdout(&out);
    assert!(text.contains("error   inline 001: missing next element .next-btn-iner"));
    assert!(text.contains("warning inline 001: 1 slide(s) without a background-image url(), skipped"));
    assert!(text.contains("warning page: no .open-full-gallery-btn button"));
    assert!(text.contains("1 error, 2 warnings"));
}

#[test]
fn lightbox_renders_overlay_at_index() {
    let out = run(&["lightbox", &page_arg("page.html"), "--index", "1"]);
    assert!(out.status.success());
    let html = stdout(&out);
    assert!(html.starts_with(r#"<div class="full-gallery-modal">"#));
    assert!(html.contains(r#"class="main-slide" style="background-image: url('img/pier.jpg')""#));
    assert_eq!(html.matches(r#"class="thumbnail active""#).count(), 1);
    assert_eq!(html.matches(r#"class="thumbnail""#).count(), 2);
}

#[test]
fn lightbox_index_out_of_range_fails() {
    let out = run(&["lightbox", &page_arg("page.html"), "--index", "3"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("OutOfRange"));
}

#[test]
fn lightbox_without_slides_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let page = tmp.path().join("empty.html");
    std::fs::write(&page, "<p>no galleries</p>").unwrap();
    let out = run(&["lightbox", page.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("NoSlides"));
}

#[test]
fn config_overrides_class_names() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "[inline]\ngallery = \"photo-strip\"\n").unwrap();
    let out = run(&[
        "--config",
        config.to_str().unwrap(),
        "scan",
        &page_arg("page.html"),
    ]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(!text.contains("Inline galleries"));
    assert!(text.contains("Lightbox: 0 slides"));
}

#[test]
fn invalid_config_is_reported() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "[autoplay]\ninterval_ms = 0\n").unwrap();
    let out = run(&["--config", config.to_str().unwrap(), "check", &page_arg("page.html")]);
    assert!(!out.status.success());
}

#[test]
fn gen_config_prints_documented_defaults() {
    let out = run(&["gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("[autoplay]"));
    assert!(text.contains("interval_ms = 5000"));
}
