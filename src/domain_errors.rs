// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for loading the domain configuration.
//!
//! Errors only arise while building a [`DomainConfig`](crate::domain_config::DomainConfig)
//! or while fetching the `ConfigMap` it is built from. Resolving a domain for
//! a set of labels never fails once a table has been built.
//!
//! A failed build is fatal to that configuration reload, not to the process:
//! callers keep serving the previously installed table.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while loading the domain → selector table.
#[derive(Error, Debug)]
pub enum DomainConfigError {
    /// A `ConfigMap` value could not be deserialized into a label selector
    ///
    /// Returned when the value stored under a domain key is not valid YAML or
    /// does not have the shape `{selector: {key: value, ...}}`.
    #[error("Failed to parse selector for domain '{domain}': {source}")]
    ConfigParse {
        /// The domain key whose value is malformed
        domain: String,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// No entry has an empty selector
    ///
    /// Every table needs at least one default domain so that lookups are total.
    /// The full raw data is carried for operator diagnosis.
    #[error("Config {data:?} must have a default domain")]
    MissingDefaultDomain {
        /// The raw `ConfigMap` data that was rejected
        data: BTreeMap<String, String>,
    },

    /// The domain `ConfigMap` could not be read from the API server
    #[error("Failed to fetch ConfigMap {namespace}/{name}: {source}")]
    Fetch {
        /// Namespace of the `ConfigMap`
        namespace: String,
        /// Name of the `ConfigMap`
        name: String,
        /// Underlying Kubernetes client error
        #[source]
        source: kube::Error,
    },
}

impl DomainConfigError {
    /// Returns true if retrying the same load could succeed.
    ///
    /// Parse and validation failures are properties of the data and will
    /// repeat until an operator edits the `ConfigMap`.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Fetch { .. } => true,
            Self::ConfigParse { .. } | Self::MissingDefaultDomain { .. } => false,
        }
    }

    /// Returns the status reason code for this error.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::ConfigParse { .. } => "ConfigParseError",
            Self::MissingDefaultDomain { .. } => "MissingDefaultDomain",
            Self::Fetch { .. } => "ConfigMapFetchFailed",
        }
    }
}

#[cfg(test)]
#[path = "domain_errors_tests.rs"]
mod domain_errors_tests;
