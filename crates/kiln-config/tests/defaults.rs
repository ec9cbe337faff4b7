//! Tests for default values and edge cases.

use kiln_config::{BuildSettings, DevSettings, KilnConfig, Mode, ProjectSettings};
use std::path::PathBuf;

#[test]
fn kiln_config_defaults() {
    let config = KilnConfig::default();
    assert_eq!(config.project.name, "kiln-app");
    assert_eq!(config.project.root, PathBuf::from("."));
    assert_eq!(config.dev.port, 8080);
    assert_eq!(config.build.assets_root, PathBuf::from("dist"));
}

#[test]
fn project_settings_defaults() {
    let project = ProjectSettings::default();
    assert_eq!(project.entry, "./src/main.js");
    assert_eq!(project.src_dir, PathBuf::from("src"));
    assert_eq!(project.test_dir, PathBuf::from("test"));
    assert_eq!(project.static_dir, PathBuf::from("static"));
    assert_eq!(project.template, "index.html");
    assert_eq!(project.icon, PathBuf::from("build/logo.png"));
}

#[test]
fn dev_settings_defaults() {
    let dev = DevSettings::default();
    assert_eq!(dev.host, "localhost");
    assert_eq!(dev.port, 8080);
    assert_eq!(dev.assets_sub_directory, "static");
    assert_eq!(dev.assets_public_path, "/");
    assert_eq!(dev.devtool, "cheap-module-eval-source-map");
    assert!(dev.proxy_table.is_empty());
    assert!(!dev.auto_open_browser);
    assert!(dev.error_overlay);
    assert!(dev.notify_on_errors);
    assert!(!dev.poll);
    assert!(dev.cache_busting);
    assert!(dev.css_source_map);
}

#[test]
fn build_settings_defaults() {
    let build = BuildSettings::default();
    assert_eq!(build.index, PathBuf::from("dist/index.html"));
    assert_eq!(build.assets_sub_directory, "static");
    assert_eq!(build.assets_public_path, "/");
    assert_eq!(build.devtool, "#source-map");
    assert!(build.production_source_map);
    assert!(build.production_gzip);
    assert_eq!(build.production_gzip_extensions, vec!["js", "css"]);
    assert!(!build.bundle_analyzer_report);
}

#[test]
fn empty_object_deserializes_to_defaults() {
    let config = KilnConfig::from_value(serde_json::json!({})).unwrap();
    assert_eq!(config, KilnConfig::default());
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let config = KilnConfig::from_value(serde_json::json!({
        "dev": { "port": 4000 },
        "build": { "assets_public_path": "https://cdn.example.com/" }
    }))
    .unwrap();

    assert_eq!(config.dev.port, 4000);
    assert_eq!(config.dev.host, "localhost");
    assert_eq!(
        config.assets_public_path(Mode::Production),
        "https://cdn.example.com/"
    );
    assert_eq!(config.assets_public_path(Mode::Development), "/");
}

#[test]
fn proxy_table_preserves_declaration_order() {
    let config = KilnConfig::from_value(serde_json::json!({
        "dev": {
            "proxy_table": {
                "/zeta": { "target": "http://localhost:3001" },
                "/alpha": { "target": "http://localhost:3002", "change_origin": true }
            }
        }
    }))
    .unwrap();

    let contexts: Vec<_> = config.dev.proxy_table.keys().cloned().collect();
    assert_eq!(contexts, vec!["/zeta", "/alpha"]);
    assert!(config.dev.proxy_table["/alpha"].change_origin);
}

#[test]
fn every_mode_yields_valid_toggles_from_defaults() {
    let config = KilnConfig::default();
    for mode in Mode::ALL {
        let toggles = config.toggles(mode).unwrap();
        assert_eq!(toggles.mode(), mode);
        assert_eq!(toggles.extract(), mode.is_optimized());
    }
}
