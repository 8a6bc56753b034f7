// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Assets
//!
//! Shaders are authored as Slang sources and shipped as SPIR-V.  The build feature compiles them
//! from a crate's `shaders/` directory into its `assets/shaders/` directory.  The runtime feature
//! finds and loads the compiled files.
//!
//! Use the build feature in `[build-dependencies]` and the runtime feature in normal dependencies.

#[cfg(feature = "runtime")]
pub mod assets;
#[cfg(feature = "build")]
pub mod build;
#[cfg(feature = "runtime")]
pub use assets::*;

use std::ffi::OsStr;

mod prelude {
    pub use super::AssetError;
    pub use super::AssetKind;
}

/// First word of every SPIR-V module, in host byte order.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Shader,
}

impl AssetKind {
    fn ext(&self) -> &'static OsStr {
        match self {
            AssetKind::Shader => OsStr::new("spv"),
        }
    }

    fn subdir(&self) -> &'static OsStr {
        match self {
            AssetKind::Shader => OsStr::new("shaders"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("read failed: {:?}", .0)]
    ReadError(#[from] std::io::Error),
    #[error("file not found: {:?}", .0)]
    NotFound(String),
    #[error("load spirv failed: {}", .0)]
    InvalidShader(String),
}

/// Reinterpret raw bytes as SPIR-V words, checking the length and magic number.
pub fn spirv_words(bytes: &[u8]) -> Result<Vec<u32>, AssetError> {
    if bytes.len() % size_of::<u32>() != 0 {
        return Err(AssetError::InvalidShader(format!(
            "SPIR-V length not multiple of 4: {} bytes",
            bytes.len()
        )));
    }

    let words: Vec<u32> = bytes
        .chunks_exact(size_of::<u32>())
        .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    match words.first() {
        Some(&SPIRV_MAGIC) => Ok(words),
        Some(other) => Err(AssetError::InvalidShader(format!(
            "bad magic number: {other:#010x}"
        ))),
        None => Err(AssetError::InvalidShader("empty module".to_owned())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn module(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_ne_bytes()).collect()
    }

    #[test]
    fn test_spirv_words_accepts_magic() {
        let bytes = module(&[SPIRV_MAGIC, 0x0001_0000, 0, 1, 0]);
        let words = spirv_words(&bytes).unwrap();
        assert_eq!(words.len(), 5);
        assert_eq!(words[0], SPIRV_MAGIC);
    }

    #[test]
    fn test_spirv_words_rejects_ragged_length() {
        let mut bytes = module(&[SPIRV_MAGIC]);
        bytes.push(0);
        assert!(matches!(
            spirv_words(&bytes),
            Err(AssetError::InvalidShader(_))
        ));
    }

    #[test]
    fn test_spirv_words_rejects_wrong_magic() {
        let bytes = module(&[0xdead_beef, 0]);
        assert!(matches!(
            spirv_words(&bytes),
            Err(AssetError::InvalidShader(_))
        ));
        assert!(matches!(spirv_words(&[]), Err(AssetError::InvalidShader(_))));
    }
}
