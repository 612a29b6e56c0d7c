// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Integration tests for domain resolution.
//!
//! The first group builds tables from `ConfigMap` manifests on disk. The
//! cluster test reads the live `config-domain` `ConfigMap`.
//!
//! Run the cluster test with: cargo test --test domain_config_integration -- --ignored

use k8s_openapi::api::core::v1::ConfigMap;
use kube::client::Client;
use route_domain::config_source::{load_domain_config, system_namespace, KubeConfigMapSource};
use route_domain::constants::DOMAIN_CONFIG_MAP_NAME;
use route_domain::domain_config::DomainConfig;
use route_domain::domain_errors::DomainConfigError;
use std::collections::BTreeMap;
use std::io::Write;

// ============================================================================
// Helper Functions
// ============================================================================

fn write_manifest(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp manifest");
    file.write_all(contents.as_bytes())
        .expect("write temp manifest");
    file
}

fn load_manifest(file: &tempfile::NamedTempFile) -> Result<DomainConfig, DomainConfigError> {
    let raw = std::fs::read_to_string(file.path()).expect("read temp manifest");
    let config_map: ConfigMap = serde_yaml::from_str(&raw).expect("parse ConfigMap manifest");
    DomainConfig::from_config_map(&config_map)
}

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Test helper to check if running in a Kubernetes cluster
async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

// ============================================================================
// Manifest Tests
// ============================================================================

const MULTI_TENANT_MANIFEST: &str = r"apiVersion: v1
kind: ConfigMap
metadata:
  name: config-domain
  namespace: knative-serving
data:
  example.com: ''
  example.org: |
    selector:
      app: nonprofit
  internal.example.com: |
    selector:
      app: nonprofit
      visibility: cluster-local
  svc.cluster.local: |
    selector:
      visibility: cluster-local
";

#[test]
fn test_manifest_resolves_each_tier() {
    let file = write_manifest(MULTI_TENANT_MANIFEST);
    let config = load_manifest(&file).unwrap();

    assert_eq!(config.len(), 4);
    assert_eq!(
        config.lookup_domain_for_labels(&labels(&[("app", "shop")])),
        "example.com"
    );
    assert_eq!(
        config.lookup_domain_for_labels(&labels(&[("app", "nonprofit")])),
        "example.org"
    );
    assert_eq!(
        config.lookup_domain_for_labels(&labels(&[("visibility", "cluster-local")])),
        "svc.cluster.local"
    );
    assert_eq!(
        config.lookup_domain_for_labels(&labels(&[
            ("app", "nonprofit"),
            ("visibility", "cluster-local")
        ])),
        "internal.example.com"
    );
}

#[test]
fn test_manifest_route_names() {
    let file = write_manifest(MULTI_TENANT_MANIFEST);
    let config = load_manifest(&file).unwrap();

    assert_eq!(
        config.route_domain("donate", "charity", &labels(&[("app", "nonprofit")])),
        "donate.charity.example.org"
    );
}

#[test]
fn test_manifest_without_default_is_rejected() {
    let file = write_manifest(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: config-domain\ndata:\n  prod.example.com: '{selector: {env: prod}}'\n",
    );

    let err = load_manifest(&file).unwrap_err();

    assert!(matches!(err, DomainConfigError::MissingDefaultDomain { .. }));
    assert!(err.to_string().contains("prod.example.com"));
}

#[test]
fn test_manifest_with_malformed_selector_is_rejected() {
    let file = write_manifest(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: config-domain\ndata:\n  example.com: ''\n  bad.example.com: 'not: valid: yaml: ::'\n",
    );

    let err = load_manifest(&file).unwrap_err();

    assert_eq!(err.status_reason(), "ConfigParseError");
    assert!(err.to_string().contains("bad.example.com"));
}

// ============================================================================
// Cluster Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires a Kubernetes cluster with the domain ConfigMap installed"]
async fn test_load_from_cluster() {
    let Some(client) = get_kube_client_or_skip().await else {
        return;
    };

    let source = KubeConfigMapSource::new(client);
    let config = load_domain_config(&source, &system_namespace(), DOMAIN_CONFIG_MAP_NAME)
        .await
        .expect("domain ConfigMap should be valid");

    let domain = config.lookup_domain_for_labels(&BTreeMap::new());
    assert!(config.default_domains().contains(&domain.as_str()));
}
