// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Label selector matching for domain → route assignment.
//!
//! Each entry of the domain `ConfigMap` carries a [`LabelSelector`]: a set of
//! `key == value` requirements that are ANDed together. A route whose labels
//! satisfy every requirement is eligible for that domain.
//!
//! # Example
//!
//! ```rust
//! use route_domain::selector::LabelSelector;
//! use std::collections::BTreeMap;
//!
//! let selector: LabelSelector = serde_yaml::from_str("selector: {env: prod}").unwrap();
//! let labels = BTreeMap::from([("env".to_string(), "prod".to_string())]);
//!
//! assert!(selector.matches(&labels));
//! assert_eq!(selector.specificity(), 1);
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Map of `{key, value}` pairs. A single pair is equivalent to the requirement
/// `key == value`; all requirements must be satisfied.
///
/// An empty selector has no requirements and matches every label set. The
/// domain it belongs to is a default domain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSelector {
    /// Required label values, keyed by label name.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub selector: BTreeMap<String, String>,
}

impl LabelSelector {
    /// Build a selector from `(key, value)` requirements.
    pub fn from_labels<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            selector: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns whether the given labels meet every requirement of the selector.
    ///
    /// Labels not mentioned by the selector are ignored. An empty selector
    /// matches any label set, including an empty one.
    #[must_use]
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.selector
            .iter()
            .all(|(key, expected)| labels.get(key) == Some(expected))
    }

    /// Number of requirements; higher means more specific.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.selector.len()
    }

    /// True when the selector has no requirements.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.selector.is_empty()
    }
}

// `selector: ~` is accepted the same way as an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BTreeMap<String, String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod selector_tests;
