// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use hellovk_assets::build;

fn main() {
    build::set_asset_default_dir();
    build::build_shaders();
}
