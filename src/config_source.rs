// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Loading the domain `ConfigMap` and publishing the resulting table.
//!
//! [`DomainConfig`] itself never talks to the API server. Fetching goes
//! through the [`ConfigMapSource`] trait so the table can be built from a live
//! cluster ([`KubeConfigMapSource`]) or from any pre-fetched snapshot.
//!
//! # Example
//!
//! ```rust,no_run
//! use route_domain::config_source::{load_domain_config, system_namespace, KubeConfigMapSource};
//! use route_domain::constants::DOMAIN_CONFIG_MAP_NAME;
//! use kube::Client;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = KubeConfigMapSource::new(Client::try_default().await?);
//! let config = load_domain_config(&source, &system_namespace(), DOMAIN_CONFIG_MAP_NAME).await?;
//! println!("{} domains configured", config.len());
//! # Ok(())
//! # }
//! ```

use crate::constants::{DEFAULT_SYSTEM_NAMESPACE, ENV_SYSTEM_NAMESPACE};
use crate::domain_config::DomainConfig;
use crate::domain_errors::DomainConfigError;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Namespace holding the domain `ConfigMap`.
///
/// Taken from `SYSTEM_NAMESPACE`, falling back to `knative-serving`.
#[must_use]
pub fn system_namespace() -> String {
    std::env::var(ENV_SYSTEM_NAMESPACE)
        .ok()
        .filter(|ns| !ns.is_empty())
        .unwrap_or_else(|| DEFAULT_SYSTEM_NAMESPACE.to_string())
}

/// Source of `ConfigMap` objects.
#[async_trait::async_trait]
pub trait ConfigMapSource: Send + Sync {
    /// Fetch a single `ConfigMap`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainConfigError::Fetch`] if the object cannot be read.
    async fn get_config_map(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ConfigMap, DomainConfigError>;
}

/// [`ConfigMapSource`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeConfigMapSource {
    client: Client,
}

impl KubeConfigMapSource {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ConfigMapSource for KubeConfigMapSource {
    async fn get_config_map(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ConfigMap, DomainConfigError> {
        debug!("Fetching ConfigMap {}/{}", namespace, name);
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|source| DomainConfigError::Fetch {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })
    }
}

/// Fetch the domain `ConfigMap` from `source` and build a [`DomainConfig`].
///
/// # Errors
///
/// Returns the fetch error from `source`, or any construction error from
/// [`DomainConfig::from_config_map`].
pub async fn load_domain_config<S>(
    source: &S,
    namespace: &str,
    name: &str,
) -> Result<DomainConfig, DomainConfigError>
where
    S: ConfigMapSource + ?Sized,
{
    let config_map = source.get_config_map(namespace, name).await?;
    let config = DomainConfig::from_config_map(&config_map)?;
    info!(
        "Loaded {} domains from ConfigMap {}/{}",
        config.len(),
        namespace,
        name
    );
    Ok(config)
}

/// Currently installed [`DomainConfig`], shared between one reloader and
/// many readers.
///
/// Readers take an `Arc` snapshot and resolve against it without holding the
/// lock. A reload swaps the whole table; a failed reload leaves the installed
/// table untouched.
#[derive(Clone, Debug)]
pub struct SharedDomainConfig {
    current: Arc<RwLock<Arc<DomainConfig>>>,
}

impl SharedDomainConfig {
    #[must_use]
    pub fn new(config: DomainConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// The installed table.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DomainConfig> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install `config`, returning the table it replaced.
    pub fn replace(&self, config: DomainConfig) -> Arc<DomainConfig> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(config))
    }

    /// Load the `ConfigMap` again and install the result if it is valid.
    ///
    /// # Errors
    ///
    /// Returns the load error; the previous table stays installed.
    pub async fn reload<S>(
        &self,
        source: &S,
        namespace: &str,
        name: &str,
    ) -> Result<Arc<DomainConfig>, DomainConfigError>
    where
        S: ConfigMapSource + ?Sized,
    {
        match load_domain_config(source, namespace, name).await {
            Ok(config) => {
                self.replace(config);
                Ok(self.snapshot())
            }
            Err(e) => {
                warn!(
                    reason = e.status_reason(),
                    "Keeping previous domain configuration: {}", e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "config_source_tests.rs"]
mod config_source_tests;
