//! Ordered flow catalog.
//!
//! The catalog is the fixed, ordered list of flows pre-declared on the traffic
//! generator. Position is significant: "K active flows" always means the first
//! K entries, so every range handed out here is a prefix-relative slice.
use std::ops::Range;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ValidationError};

/// Name prefix used when flows are derived from destination addresses.
pub const DEFAULT_NAME_PREFIX: &str = "flow_";

/// A single flow as known to both the generator and the provisioning API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlowDefinition {
    pub name: String,
    #[serde(alias = "destination")]
    pub destination_address: String,
}

impl FlowDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, destination_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            destination_address: destination_address.into(),
        }
    }
}

/// Non-empty, read-only, index-addressable flow list.
#[derive(Debug, Clone)]
pub struct FlowCatalog {
    flows: Arc<[FlowDefinition]>,
}

impl FlowCatalog {
    /// Builds a catalog from explicit definitions, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogEmpty` when no definitions are given.
    pub fn new(definitions: Vec<FlowDefinition>) -> AppResult<Self> {
        if definitions.is_empty() {
            return Err(AppError::validation(ValidationError::CatalogEmpty));
        }
        Ok(Self {
            flows: Arc::from(definitions),
        })
    }

    /// Builds a catalog with one flow per destination, named `{prefix}{destination}`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogEmpty` when `destinations` is empty.
    pub fn from_destinations<I, S>(prefix: &str, destinations: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let definitions = destinations
            .into_iter()
            .map(|destination| {
                let destination = destination.as_ref();
                FlowDefinition::new(format!("{}{}", prefix, destination), destination)
            })
            .collect();
        Self::new(definitions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FlowDefinition> {
        self.flows.get(index)
    }

    /// The first `count` flows, clamped to the catalog size.
    #[must_use]
    pub fn first(&self, count: usize) -> &[FlowDefinition] {
        self.range(0..count)
    }

    /// Flows at positions `[start, end)`, clamped to the catalog size.
    #[must_use]
    pub fn range(&self, range: Range<usize>) -> &[FlowDefinition] {
        let end = range.end.min(self.flows.len());
        let start = range.start.min(end);
        self.flows.get(start..end).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowDefinition> {
        self.flows.iter()
    }
}

/// Names of the given flows, in order.
#[must_use]
pub fn flow_names(flows: &[FlowDefinition]) -> Vec<String> {
    flows.iter().map(|flow| flow.name.clone()).collect()
}
