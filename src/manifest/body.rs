use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::catalog::FlowCatalog;

pub const MANIFEST_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub flows: Vec<ManifestFlow>,
    pub inactive_routers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestFlow {
    #[serde(rename = "_id")]
    pub id: String,
    pub version: u32,
    pub timestamps: ManifestTimestamps,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManifestTimestamps {
    /// Unix seconds, shared by every entry of one manifest.
    pub ts_api_created: f64,
}

/// One entry per catalog flow, keyed by destination address.
#[must_use]
pub fn build_manifest(catalog: &FlowCatalog, created_at: f64) -> Manifest {
    let timestamps = ManifestTimestamps {
        ts_api_created: created_at,
    };
    Manifest {
        flows: catalog
            .iter()
            .map(|flow| ManifestFlow {
                id: flow.destination_address.clone(),
                version: MANIFEST_VERSION,
                timestamps,
            })
            .collect(),
        inactive_routers: Vec::new(),
    }
}

#[must_use]
pub fn object_key(prefix: &str, at: NaiveDateTime) -> String {
    format!("{}flows_{}.json", prefix, at.format("%Y%m%d_%H%M%S"))
}
