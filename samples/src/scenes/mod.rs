// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod quad;
mod spinning;
mod triangle;

pub use quad::{Geometry, QuadScene};
pub use spinning::SpinningQuadScene;
pub use triangle::TriangleScene;
