// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Domain → label selector table and domain resolution for routes.
//!
//! The domain `ConfigMap` maps each domain name to a YAML-encoded
//! [`LabelSelector`]. A route is published under the domain whose selector
//! matches the route's labels; when several match, the most specific selector
//! wins, and ties go to the lexicographically smallest domain name.
//!
//! ```yaml
//! apiVersion: v1
//! kind: ConfigMap
//! metadata:
//!   name: config-domain
//!   namespace: knative-serving
//! data:
//!   example.com: |
//!   prod.example.com: |
//!     selector:
//!       env: prod
//! ```
//!
//! A table must contain at least one default domain (empty selector), which
//! makes [`DomainConfig::lookup_domain_for_labels`] total.
//!
//! # Example
//!
//! ```rust
//! use route_domain::domain_config::DomainConfig;
//! use std::collections::BTreeMap;
//!
//! let data = BTreeMap::from([
//!     ("default.example.com".to_string(), "{}".to_string()),
//!     ("prod.example.com".to_string(), "{selector: {env: prod}}".to_string()),
//! ]);
//! let config = DomainConfig::from_data(&data).unwrap();
//!
//! let labels = BTreeMap::from([("env".to_string(), "prod".to_string())]);
//! assert_eq!(config.lookup_domain_for_labels(&labels), "prod.example.com");
//! ```

use crate::domain_errors::DomainConfigError;
use crate::selector::LabelSelector;
use k8s_openapi::api::core::v1::ConfigMap;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Domains keyed by name, each with the selector routes must match to use it.
///
/// Immutable once built. A configuration reload builds a new table and swaps
/// it in as a whole (see [`SharedDomainConfig`](crate::config_source::SharedDomainConfig)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainConfig {
    // Unordered on purpose: lookups must not depend on iteration order.
    domains: HashMap<String, LabelSelector>,
}

impl DomainConfig {
    /// Build a table from raw `ConfigMap` data.
    ///
    /// Every value is parsed as a [`LabelSelector`]. An empty value is the
    /// same as `{}`. Duplicate or contradictory selectors are kept as-is.
    ///
    /// # Errors
    ///
    /// - [`DomainConfigError::ConfigParse`] if any value fails to parse
    /// - [`DomainConfigError::MissingDefaultDomain`] if no value has an empty selector
    pub fn from_data(data: &BTreeMap<String, String>) -> Result<Self, DomainConfigError> {
        let mut domains = HashMap::with_capacity(data.len());

        for (domain, raw) in data {
            let selector = parse_selector(raw).map_err(|source| DomainConfigError::ConfigParse {
                domain: domain.clone(),
                source,
            })?;
            domains.insert(domain.clone(), selector);
        }

        let config = Self { domains };
        let defaults = config.default_domains();
        if defaults.is_empty() {
            return Err(DomainConfigError::MissingDefaultDomain { data: data.clone() });
        }
        if defaults.len() > 1 {
            warn!(
                "Multiple default domains configured ({}); routes without a more specific match use {}",
                defaults.join(", "),
                defaults[0]
            );
        }

        debug!(
            domains = config.len(),
            defaults = defaults.len(),
            "Built domain configuration"
        );
        Ok(config)
    }

    /// Build a table from a domain `ConfigMap`.
    ///
    /// A `ConfigMap` without `data` is treated as empty and therefore rejected
    /// for lacking a default domain.
    ///
    /// # Errors
    ///
    /// Same as [`DomainConfig::from_data`].
    pub fn from_config_map(config_map: &ConfigMap) -> Result<Self, DomainConfigError> {
        let empty = BTreeMap::new();
        Self::from_data(config_map.data.as_ref().unwrap_or(&empty))
    }

    /// Returns the domain for a set of labels.
    ///
    /// The most specific matching selector wins. Among equally specific
    /// matches the lexicographically smallest domain name is chosen, so the
    /// result is independent of table iteration order. A built table always
    /// contains a default domain, so some domain is always returned.
    #[must_use]
    pub fn lookup_domain_for_labels(&self, labels: &BTreeMap<String, String>) -> String {
        let mut best: Option<(&str, usize)> = None;

        for (domain, selector) in &self.domains {
            if !selector.matches(labels) {
                continue;
            }
            let specificity = selector.specificity();
            let replace = match best {
                None => true,
                Some((best_domain, best_specificity)) => {
                    specificity > best_specificity
                        || (specificity == best_specificity && domain.as_str() < best_domain)
                }
            };
            if replace {
                best = Some((domain.as_str(), specificity));
            }
        }

        let domain = best.map(|(domain, _)| domain.to_string()).unwrap_or_default();
        debug!(domain = %domain, "Resolved domain for labels {:?}", labels);
        domain
    }

    /// Returns the fully-qualified external name of a route:
    /// `{name}.{namespace}.{domain}`.
    #[must_use]
    pub fn route_domain(
        &self,
        name: &str,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> String {
        format!(
            "{name}.{namespace}.{}",
            self.lookup_domain_for_labels(labels)
        )
    }

    /// Selector configured for a domain, if present.
    #[must_use]
    pub fn selector(&self, domain: &str) -> Option<&LabelSelector> {
        self.domains.get(domain)
    }

    /// All `(domain, selector)` entries, in unspecified order.
    pub fn domains(&self) -> impl Iterator<Item = (&str, &LabelSelector)> {
        self.domains.iter().map(|(d, s)| (d.as_str(), s))
    }

    /// Domains with an empty selector, sorted.
    #[must_use]
    pub fn default_domains(&self) -> Vec<&str> {
        let mut defaults: Vec<&str> = self
            .domains
            .iter()
            .filter(|(_, selector)| selector.is_default())
            .map(|(domain, _)| domain.as_str())
            .collect();
        defaults.sort_unstable();
        defaults
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

fn parse_selector(raw: &str) -> Result<LabelSelector, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(LabelSelector::default());
    }
    serde_yaml::from_str(raw)
}

#[cfg(test)]
#[path = "domain_config_tests.rs"]
mod domain_config_tests;
