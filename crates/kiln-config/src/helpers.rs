use std::path::PathBuf;

// Helper defaults
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_project_name() -> String {
    "kiln-app".to_string()
}

pub(crate) fn default_root() -> PathBuf {
    PathBuf::from(".")
}

pub(crate) fn default_entry() -> String {
    "./src/main.js".to_string()
}

pub(crate) fn default_src_dir() -> PathBuf {
    PathBuf::from("src")
}

pub(crate) fn default_test_dir() -> PathBuf {
    PathBuf::from("test")
}

pub(crate) fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

pub(crate) fn default_template() -> String {
    "index.html".to_string()
}

pub(crate) fn default_icon() -> PathBuf {
    PathBuf::from("build/logo.png")
}

pub(crate) fn default_assets_sub_directory() -> String {
    "static".to_string()
}

pub(crate) fn default_assets_public_path() -> String {
    "/".to_string()
}

pub(crate) fn default_host() -> String {
    "localhost".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_dev_devtool() -> String {
    "cheap-module-eval-source-map".to_string()
}

pub(crate) fn default_index() -> PathBuf {
    PathBuf::from("dist/index.html")
}

pub(crate) fn default_assets_root() -> PathBuf {
    PathBuf::from("dist")
}

pub(crate) fn default_build_devtool() -> String {
    "#source-map".to_string()
}

pub(crate) fn default_gzip_extensions() -> Vec<String> {
    vec!["js".to_string(), "css".to_string()]
}
