// Build scripts signal errors by panicking; there is no caller to
// return Result to.  Cargo treats a non-zero exit as a build failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Build script for the multishot binary crate.
//!
//! ## Stylesheet
//!
//! Copies `site/app.css` from the workspace root into `OUT_DIR` so that
//! `main.rs` can `include_str!` it via a stable environment variable
//! path (instead of a fragile `../../../site/` relative path).
//!
//! ## Generated `index.html`
//!
//! Generates `index.html` at the crate root for the Dioxus CLI, with the
//! page background set inline so there is no white flash before the
//! stylesheet loads.

use std::path::{Path, PathBuf};
use std::{env, fs};

/// Shared asset files that live in `site/` at the workspace root.
const SITE_ASSETS: &[(&str, &str)] = &[("app.css", "APP_CSS_PATH")];

/// Matches `--bg` in `site/app.css`.
const PAGE_BACKGROUND: &str = "#111827";

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    // Workspace root is two levels up from crates/multishot/.
    let workspace_root = manifest_dir
        .parent()
        .and_then(Path::parent)
        .expect("could not find workspace root");
    let site_dir = workspace_root.join("site");

    copy_site_assets(&site_dir, &out_dir);
    generate_index_html(&manifest_dir);
}

/// Copy shared assets from `site/` into `OUT_DIR` and expose their
/// paths as cargo environment variables.
fn copy_site_assets(site_dir: &Path, out_dir: &Path) {
    for &(filename, env_key) in SITE_ASSETS {
        let src = site_dir.join(filename);
        let dst = out_dir.join(filename);

        println!("cargo:rerun-if-changed={}", src.display());
        fs::copy(&src, &dst).unwrap_or_else(|e| {
            panic!("failed to copy {} to {}: {e}", src.display(), dst.display())
        });
        println!("cargo:rustc-env={env_key}={}", dst.display());
    }
}

/// Generate `crates/multishot/index.html`.
///
/// Note: this writes to `manifest_dir` (the source tree) rather than
/// `OUT_DIR` because Dioxus CLI expects `index.html` at the crate
/// root for serving.  The file is gitignored.
fn generate_index_html(manifest_dir: &Path) {
    let index_html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <title>{{app_title}}</title>
    <meta content="text/html;charset=utf-8" http-equiv="Content-Type" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <meta charset="UTF-8" />
    <style>html, body {{ background: {PAGE_BACKGROUND}; margin: 0; }}</style>
  </head>
  <body>
    <div id="main"></div>
  </body>
</html>
"#
    );

    let index_path = manifest_dir.join("index.html");
    fs::write(&index_path, index_html)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", index_path.display()));
}
