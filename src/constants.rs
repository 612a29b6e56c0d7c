// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for route domain resolution.
//!
//! Well-known Kubernetes object names and environment variables, kept in one
//! place so the library and the binary agree on them.

// ============================================================================
// Domain ConfigMap
// ============================================================================

/// Name of the cluster-wide `ConfigMap` holding the domain → selector table
pub const DOMAIN_CONFIG_MAP_NAME: &str = "config-domain";

/// Namespace the serving system runs in when `SYSTEM_NAMESPACE` is unset
pub const DEFAULT_SYSTEM_NAMESPACE: &str = "knative-serving";

// ============================================================================
// Environment Variables
// ============================================================================

/// Environment variable overriding the serving system namespace
pub const ENV_SYSTEM_NAMESPACE: &str = "SYSTEM_NAMESPACE";

/// Environment variable selecting the log output format (`text` or `json`)
pub const ENV_LOG_FORMAT: &str = "RUST_LOG_FORMAT";

/// Log level used when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
