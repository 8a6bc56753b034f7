// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use hellovk_samples::{SampleError, scenes::TriangleScene};

fn main() -> Result<(), SampleError> {
    hellovk_samples::run(TriangleScene, "Triangle")
}
