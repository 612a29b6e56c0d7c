// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::Client;
use route_domain::{
    config_source::{load_domain_config, system_namespace, KubeConfigMapSource},
    constants::{DEFAULT_LOG_LEVEL, DOMAIN_CONFIG_MAP_NAME, ENV_LOG_FORMAT},
    domain_config::DomainConfig,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Resolve the domain a route is published under from the domain `ConfigMap`.
#[derive(Debug, Parser)]
#[command(name = "route-domain", version, about)]
struct Cli {
    /// Read the `ConfigMap` from a YAML manifest instead of the cluster
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Namespace of the domain `ConfigMap` (defaults to `SYSTEM_NAMESPACE`)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Name of the domain `ConfigMap`
    #[arg(long, default_value = DOMAIN_CONFIG_MAP_NAME)]
    name: String,

    /// Route label as `key=value`; may be repeated
    #[arg(short, long = "label", value_name = "KEY=VALUE", value_parser = parse_label)]
    labels: Vec<(String, String)>,

    /// Print `{route}.{route-namespace}.{domain}` instead of the bare domain
    #[arg(long, requires = "route_namespace")]
    route: Option<String>,

    /// Namespace of the route, used with `--route`
    #[arg(long)]
    route_namespace: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .thread_name("route-domain")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Respects RUST_LOG (default info) and RUST_LOG_FORMAT=json|text.
    // Logs go to stderr so stdout carries only the resolved name.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_LEVEL));

    let log_format = std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    debug!("Logging initialized with file and line number tracking");

    let config = match &cli.file {
        Some(path) => {
            info!("Reading domain ConfigMap from {}", path.display());
            load_from_file(path).await?
        }
        None => {
            let namespace = cli.namespace.clone().unwrap_or_else(system_namespace);
            let client = Client::try_default()
                .await
                .context("Failed to initialize Kubernetes client")?;
            let source = KubeConfigMapSource::new(client);
            load_domain_config(&source, &namespace, &cli.name)
                .await
                .with_context(|| format!("Invalid domain configuration in {namespace}/{}", cli.name))?
        }
    };

    let labels: BTreeMap<String, String> = cli.labels.into_iter().collect();
    let resolved = match (&cli.route, &cli.route_namespace) {
        (Some(route), Some(route_namespace)) => config.route_domain(route, route_namespace, &labels),
        _ => config.lookup_domain_for_labels(&labels),
    };

    println!("{resolved}");
    Ok(())
}

async fn load_from_file(path: &std::path::Path) -> Result<DomainConfig> {
    let manifest = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config_map: ConfigMap = serde_yaml::from_str(&manifest)
        .with_context(|| format!("{} is not a ConfigMap manifest", path.display()))?;
    DomainConfig::from_config_map(&config_map)
        .with_context(|| format!("Invalid domain configuration in {}", path.display()))
}

fn parse_label(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("label '{raw}' must be KEY=VALUE"))?;
    if key.is_empty() {
        return Err(format!("label '{raw}' has an empty key"));
    }
    Ok((key.to_string(), value.to_string()))
}
