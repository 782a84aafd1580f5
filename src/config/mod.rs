// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod regions;

pub use regions::{profile_for, resolve, Region, RegionProfile, GRAY_ENABLED, PROTOCOL_VERSION};
