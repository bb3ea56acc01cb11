use std::collections::BTreeMap;

use axial_core::AxisParams;
use serde::{Deserialize, Serialize};

/// On-disk layout of a version 1 profile.
///
/// Maps are ordered so that a saved profile is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProfileV1 {
    pub version: u8,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub local: BTreeMap<String, AxisParams>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub embedded: BTreeMap<String, AxisParams>,
}
