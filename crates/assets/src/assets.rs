// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Asset Lookup
//!
//! `AssetDirs` is a set of realized directories where lookups may search.  Hold onto it for doing
//! many lookups at computer speed but re-initialize it for human-speed queries.
//!
//! ## Precedence Rules
//!
//! 1. `HELLOVK_ASSETS_DIR`, enabling overrides for any purpose.
//! 2. **Debug builds only:** the `assets/` folder below `CARGO_MANIFEST_DIR`, which `cargo run`
//!    sets to the running package's source directory.
//! 3. An `assets/` folder next to the executable.
//! 4. An `assets/` folder in the working directory.
//! 5. **Release builds only:** the user's local data directory, then the packaged default from
//!    `HELLOVK_BUILD_ASSETS_DIR`, then the system data directory.  Only binaries see the packaged
//!    default, so they construct with `packaged`.  A relative packaged default is relative to the
//!    directory holding the executable, never the working directory.
//!
//! A directory reachable by more than one rule is searched once, at its earliest position.
//!
//! Every path points at an assets root, i.e. a folder containing a `shaders` directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::prelude::*;

/// Pre-calculated and checked parent paths for reuse in asset look-ups.
pub struct AssetDirs {
    search_paths: Vec<PathBuf>,
}

fn as_assets_root(p: PathBuf) -> Option<PathBuf> {
    p.canonicalize().ok().filter(|p| p.is_dir())
}

// Treat the given path as a parent containing an `assets/` subdir.
fn with_assets_subdir(p: PathBuf) -> Option<PathBuf> {
    as_assets_root(p.join("assets"))
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
}

// Relative packaged defaults describe an install layout, so they hang off the executable.
fn packaged_root(default_dir: &str, exe_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = PathBuf::from(default_dir);
    if dir.is_relative() {
        as_assets_root(exe_dir?.join(dir))
    } else {
        as_assets_root(dir)
    }
}

// Keep the first occurrence of each path.
fn dedup_paths(paths: &mut Vec<PathBuf>) {
    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));
}

impl AssetDirs {
    /// Checks asset search directories once on construction.
    pub fn new() -> Self {
        Self::packaged(None)
    }

    /// Like `new`, with a packaged default directory for release builds.  Binaries pass
    /// `option_env!("HELLOVK_BUILD_ASSETS_DIR")`, which their build script sets from
    /// `package.metadata.hellovk.asset_dir`.
    pub fn packaged(default_dir: Option<&str>) -> Self {
        let mut search_paths = Vec::with_capacity(6);

        if let Ok(raw) = std::env::var("HELLOVK_ASSETS_DIR") {
            match as_assets_root(PathBuf::from(&raw)) {
                Some(path) => search_paths.push(path),
                None => log::warn!("invalid HELLOVK_ASSETS_DIR (path not found): {raw}"),
            }
        }

        if cfg!(debug_assertions) {
            search_paths.extend(
                std::env::var("CARGO_MANIFEST_DIR")
                    .ok()
                    .map(PathBuf::from)
                    .and_then(with_assets_subdir),
            );
        }

        let exe_dir = exe_dir();
        search_paths.extend(exe_dir.clone().and_then(with_assets_subdir));
        search_paths.extend(std::env::current_dir().ok().and_then(with_assets_subdir));

        if !cfg!(debug_assertions) {
            search_paths.extend(
                dirs::data_local_dir()
                    .map(|p| p.join("hellovk"))
                    .and_then(with_assets_subdir),
            );
            search_paths
                .extend(default_dir.and_then(|dir| packaged_root(dir, exe_dir.as_deref())));
            search_paths.extend(
                dirs::data_dir()
                    .map(|p| p.join("hellovk"))
                    .and_then(with_assets_subdir),
            );
        }

        dedup_paths(&mut search_paths);
        Self::with_paths(search_paths)
    }

    /// Search exactly `search_paths`, in order.
    pub fn with_paths(search_paths: Vec<PathBuf>) -> Self {
        AssetDirs { search_paths }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// First existing file for `name` across the search paths.
    pub fn find(&self, name: &str, kind: AssetKind) -> Option<PathBuf> {
        let mut file = PathBuf::from(kind.subdir()).join(name);
        file.set_extension(kind.ext());

        let checked: Vec<PathBuf> = self
            .search_paths
            .iter()
            .map(|root| root.join(&file))
            .collect();

        let found = checked.iter().find(|candidate| candidate.is_file()).cloned();
        if found.is_none() {
            log::warn!("{kind:?} {name} not found");
            checked.iter().for_each(|pb| log::debug!("  checked: {pb:?}"));
        }
        found
    }

    pub fn find_bytes(&self, name: &str, kind: AssetKind) -> Result<Vec<u8>, AssetError> {
        self.find(name, kind)
            .ok_or(AssetError::NotFound(name.to_owned()))
            .and_then(|found| std::fs::read(found).map_err(|e| e.into()))
    }

    /// Load a compiled shader as SPIR-V words.
    pub fn find_shader(&self, name: &str) -> Result<Vec<u32>, AssetError> {
        let bytes = self.find_bytes(name, AssetKind::Shader)?;
        crate::spirv_words(&bytes)
    }
}

impl Default for AssetDirs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::SPIRV_MAGIC;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hellovk-assets-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("shaders/quad")).unwrap();
        dir
    }

    fn write_module(root: &Path, name: &str, words: &[u32]) {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
        fs::write(root.join("shaders").join(name).with_extension("spv"), bytes).unwrap();
    }

    #[test]
    fn test_find_respects_search_order() {
        let first = scratch("first");
        let second = scratch("second");
        write_module(&second, "quad/vertex", &[SPIRV_MAGIC, 2]);
        let dirs = AssetDirs::with_paths(vec![first.clone(), second.clone()]);
        assert_eq!(
            dirs.find("quad/vertex", AssetKind::Shader),
            Some(second.join("shaders/quad/vertex.spv"))
        );

        write_module(&first, "quad/vertex", &[SPIRV_MAGIC, 1]);
        let words = dirs.find_shader("quad/vertex").unwrap();
        assert_eq!(words, vec![SPIRV_MAGIC, 1]);

        fs::remove_dir_all(first).unwrap();
        fs::remove_dir_all(second).unwrap();
    }

    #[test]
    fn test_missing_shader_reports_name() {
        let root = scratch("missing");
        let dirs = AssetDirs::with_paths(vec![root.clone()]);
        match dirs.find_shader("quad/fragment") {
            Err(AssetError::NotFound(name)) => assert_eq!(name, "quad/fragment"),
            other => panic!("unexpected: {other:?}"),
        }
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_corrupt_shader_rejected() {
        let root = scratch("corrupt");
        write_module(&root, "quad/vertex", &[0x1234_5678]);
        let dirs = AssetDirs::with_paths(vec![root.clone()]);
        assert!(matches!(
            dirs.find_shader("quad/vertex"),
            Err(AssetError::InvalidShader(_))
        ));
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_relative_packaged_dir_follows_binary() {
        let install = scratch("install");
        let bin = install.join("bin");
        let share = install.join("share/hellovk/assets");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir_all(&share).unwrap();

        let found = packaged_root("../share/hellovk/assets", Some(&bin));
        assert_eq!(found, Some(share.canonicalize().unwrap()));
        assert_eq!(packaged_root("../share/hellovk/assets", None), None);
        assert_eq!(
            packaged_root(share.to_str().unwrap(), None),
            Some(share.canonicalize().unwrap())
        );

        fs::remove_dir_all(install).unwrap();
    }

    #[test]
    fn test_dedup_keeps_first_position() {
        let a = PathBuf::from("/a");
        let b = PathBuf::from("/b");
        let c = PathBuf::from("/c");
        let mut paths = vec![a.clone(), b.clone(), a.clone(), c.clone(), b.clone()];
        dedup_paths(&mut paths);
        assert_eq!(paths, [a, b, c]);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_packaged_default_found_from_any_cwd() {
        let exe_dir = exe_dir().unwrap();
        let relative = format!("../hellovk-assets-{}-packaged/assets", std::process::id());
        let root = exe_dir.join(&relative);
        fs::create_dir_all(root.join("shaders")).unwrap();

        let dirs = AssetDirs::packaged(Some(&relative));
        let expected = root.canonicalize().unwrap();
        assert!(
            dirs.search_paths().contains(&expected),
            "{expected:?} in {:?}",
            dirs.search_paths()
        );

        fs::remove_dir_all(root.parent().unwrap()).unwrap();
    }
}
