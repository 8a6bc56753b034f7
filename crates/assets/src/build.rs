// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Build Support
//!
//! Called from build scripts.  Output goes to cargo, not the `log` facade.

use std::{ffi, fs, path::Path, process};

/// Use slangc to recursively compile shaders from `shaders/` to `assets/shaders/`.
///
/// Without slangc on the `PATH` this only warns.  Previously compiled SPIR-V in `assets/` keeps
/// working and missing shaders surface at runtime as `AssetError::NotFound`.
pub fn build_shaders() {
    let manifest_dir = &std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let crate_root = Path::new(manifest_dir);

    let src_root = crate_root.join("shaders");
    let dest_root = crate_root.join("assets/shaders");

    println!("cargo:rerun-if-changed=shaders");

    if !src_root.exists() {
        return;
    }

    if process::Command::new("slangc").arg("-v").output().is_err() {
        println!("cargo:warning=no slangc found, shaders in {src_root:?} were not compiled");
        return;
    }

    fn compile_dir(dir: &Path, src_root: &Path, dest_root: &Path, ext: &ffi::OsStr) {
        let mut out_ensured = false;
        let out_dir = dest_root.join(dir.strip_prefix(src_root).unwrap());

        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            if path.is_dir() {
                compile_dir(&path, src_root, dest_root, ext);
            } else if path.extension() == Some(ext) {
                if !out_ensured {
                    fs::create_dir_all(&out_dir).unwrap();
                    out_ensured = true;
                }
                let stem = path.strip_prefix(src_root).unwrap();
                let out = dest_root.join(stem).with_extension("spv");

                // Uniform matrices are uploaded column-major.
                // `slangc <input> -matrix-layout-column-major -o <out>`
                let status = process::Command::new("slangc")
                    .arg(path.as_os_str())
                    .arg("-matrix-layout-column-major")
                    .arg("-o")
                    .arg(out)
                    .status()
                    .unwrap();

                if !status.success() {
                    panic!("slangc failed for {:?}", path);
                }
            }
        }
    }

    let slang_ext = ffi::OsStr::new("slang");
    compile_dir(&src_root, &src_root, &dest_root, slang_ext);
}

/// Sets the path for hard coding into the binary for use at runtime by the assets module.
// Packagers, see the Cargo.toml for the samples.
pub fn set_asset_default_dir() {
    let manifest_dir = &std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let manifest = Path::new(manifest_dir).join("Cargo.toml");
    println!("cargo:rerun-if-changed=Cargo.toml");

    let cargo = fs::read_to_string(&manifest).unwrap();
    let parsed: toml::Value = toml::from_str(&cargo).unwrap();

    let build_assets_dir = parsed
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("hellovk"))
        .and_then(|h| h.get("asset_dir"))
        .and_then(|d| d.as_str())
        .unwrap_or("assets");
    println!("cargo:rustc-env=HELLOVK_BUILD_ASSETS_DIR={build_assets_dir}");
}
