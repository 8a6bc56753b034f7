// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Config
//!
//! Settings come from three layers.  Command line arguments win over the config file, which wins
//! over built-in defaults.  Every field is optional in both of the outer layers.
//!
//! The config file is the first of:
//!
//! 1. `--config <path>`
//! 2. `HELLOVK_CONFIG`
//! 3. `<config dir>/hellovk/config.toml`, only if it exists
//!
//! An explicitly named file that cannot be read is an error.
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 720
//! title = "quad"
//!
//! [vulkan]
//! validation = true
//! present_mode = "vsync" # or "low-latency"
//! ```

use std::ffi::{CString, OsString};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use hellovk_vulkan::{prelude::*, swapchain::PresentPreference};
use hellovk_window::WindowSettings;

pub const CONFIG_ENV: &str = "HELLOVK_CONFIG";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reading {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Parser, Debug, Default, Clone)]
#[command(version, about)]
pub struct Args {
    /// Config file.  Defaults to $HELLOVK_CONFIG, then the user config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Window title
    #[arg(long)]
    pub title: Option<String>,

    /// Enable the Khronos validation layer.  On by default in debug builds.
    #[arg(long)]
    pub validation: Option<bool>,

    /// Present with FIFO instead of mailbox or immediate
    #[arg(long)]
    pub vsync: bool,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub vulkan: VulkanConfig,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub title: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VulkanConfig {
    pub validation: Option<bool>,
    pub present_mode: Option<PresentMode>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PresentMode {
    LowLatency,
    Vsync,
}

impl From<PresentMode> for PresentPreference {
    fn from(mode: PresentMode) -> Self {
        match mode {
            PresentMode::LowLatency => PresentPreference::LowLatency,
            PresentMode::Vsync => PresentPreference::Vsync,
        }
    }
}

impl Config {
    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(path, &text)
    }
}

/// Which config file to read, if any.  Explicit choices are returned whether they exist or not.
pub fn config_path(
    explicit: Option<&Path>,
    env: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    if let Some(raw) = env.filter(|raw| !raw.is_empty()) {
        return Some(PathBuf::from(raw));
    }
    config_dir
        .map(|dir| dir.join("hellovk").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub window: WindowSettings,
    pub context: ContextOptions,
    pub present: PresentPreference,
}

impl Settings {
    /// Merge `args` over `config` over defaults.
    pub fn resolve(args: &Args, config: &Config, default_title: &str) -> Self {
        let defaults = WindowSettings::default();
        let title = args
            .title
            .clone()
            .or_else(|| config.window.title.clone())
            .unwrap_or_else(|| default_title.to_owned());
        let window = WindowSettings {
            width: args.width.or(config.window.width).unwrap_or(defaults.width),
            height: args
                .height
                .or(config.window.height)
                .unwrap_or(defaults.height),
            title,
            visible: true,
        };

        let validation = args
            .validation
            .or(config.vulkan.validation)
            .unwrap_or(cfg!(debug_assertions));

        let present = if args.vsync {
            PresentPreference::Vsync
        } else {
            config
                .vulkan
                .present_mode
                .map(PresentPreference::from)
                .unwrap_or_default()
        };

        let context = ContextOptions {
            application_name: application_name(&window.title),
            validation,
        };

        Self {
            window,
            context,
            present,
        }
    }

    /// Find and read the config file, then merge.
    pub fn load(args: &Args, default_title: &str) -> Result<Self, ConfigError> {
        let path = config_path(
            args.config.as_deref(),
            std::env::var_os(CONFIG_ENV),
            dirs::config_dir(),
        );
        let config = match &path {
            Some(path) => {
                log::info!("config: {path:?}");
                Config::load(path)?
            }
            None => Config::default(),
        };
        Ok(Self::resolve(args, &config, default_title))
    }
}

/// Interior nul bytes cannot cross into Vulkan.
fn application_name(title: &str) -> CString {
    CString::new(title.replace('\0', "")).unwrap_or_default()
}
