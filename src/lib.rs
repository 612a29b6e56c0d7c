// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # route-domain - label-selector based domain resolution for routes
//!
//! Decides which DNS domain a route is published under. Domains and their
//! label selectors come from a cluster-wide `ConfigMap`; the most specific
//! selector matching the route's labels wins, and a default domain (empty
//! selector) catches everything else.
//!
//! ## Modules
//!
//! - [`selector`] - Label selector matching and specificity
//! - [`domain_config`] - The domain table and the resolution algorithm
//! - [`domain_errors`] - Errors raised while building the table
//! - [`config_source`] - Fetching the `ConfigMap` and publishing reloaded tables
//! - [`constants`] - Well-known names and environment variables
//!
//! ## Example
//!
//! ```rust
//! use route_domain::domain_config::DomainConfig;
//! use std::collections::BTreeMap;
//!
//! let data = BTreeMap::from([
//!     ("example.com".to_string(), String::new()),
//!     ("internal.example.com".to_string(), "selector: {visibility: cluster-local}".to_string()),
//! ]);
//! let config = DomainConfig::from_data(&data).unwrap();
//!
//! let labels = BTreeMap::from([("visibility".to_string(), "cluster-local".to_string())]);
//! assert_eq!(
//!     config.route_domain("hello", "default", &labels),
//!     "hello.default.internal.example.com"
//! );
//! ```

pub mod config_source;
pub mod constants;
pub mod domain_config;
pub mod domain_errors;
pub mod selector;
