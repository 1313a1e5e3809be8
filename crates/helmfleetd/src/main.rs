//! HelmFleet daemon
//!
//! Thin bootstrap around the reconciliation engine: loads record
//! manifests into the in-memory store, runs every rollout sweep once,
//! then drives deployment reconciliation on a requeue schedule until
//! interrupted. The trigger layer here serializes passes per key by
//! construction (one pass at a time per queue entry).

use anyhow::Context;
use clap::Parser;
use helmfleet_connectivity::ProbeChecker;
use helmfleet_core::ResourceKey;
use helmfleet_gitops::GitCli;
use helmfleet_reconciler::{DeploymentReconciler, ReconcilerConfig, RolloutReconciler};
use helmfleet_release::{HelmfileCli, RegistryLogin};
use helmfleet_store::{KindRegistry, MemoryStore, Resource};
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::{sleep_until, Duration, Instant};

/// Delay before retrying a pass that surfaced an error
const ERROR_RETRY: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "helmfleetd", version, about = "HelmFleet reconciliation daemon")]
struct Args {
    /// Directory of record manifests (*.yaml) loaded at startup
    #[arg(long)]
    manifest_dir: PathBuf,

    /// Local working copy for the config repository
    #[arg(long, default_value = "/tmp/helmfleet/repo")]
    repo_dir: PathBuf,

    /// Kube context override; ignored when running in-cluster
    #[arg(long)]
    kube_context: Option<String>,

    /// Chart registry host to log into before each apply
    #[arg(long)]
    registry_host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let registry = KindRegistry::with_defaults();
    let store = Arc::new(MemoryStore::new());
    let (deployments, rollouts) = load_manifests(&args.manifest_dir, &registry, &store)
        .await
        .context("failed to load manifests")?;
    tracing::info!(
        deployments = deployments.len(),
        rollouts = rollouts.len(),
        "loaded manifests from {}",
        args.manifest_dir.display()
    );

    let kube_context = if running_in_cluster() {
        None
    } else {
        args.kube_context
    };

    let mut applier = HelmfileCli::new();
    if let Some(host) = args.registry_host {
        applier = applier.with_registry_login(RegistryLogin::new(host));
    }

    let reconciler = DeploymentReconciler::new(
        store.clone(),
        Arc::new(GitCli::new()),
        Arc::new(ProbeChecker::new()?),
        Arc::new(applier),
        ReconcilerConfig {
            repo_dir: args.repo_dir,
            kube_context,
            ..Default::default()
        },
    );

    // Rollout sweeps first, so retargeted deployments reconcile straight
    // to their new version
    let rollout_reconciler = RolloutReconciler::new(store.clone());
    for key in &rollouts {
        if let Err(e) = rollout_reconciler.reconcile(key).await {
            tracing::error!(%key, error = %e, "rollout sweep failed");
        }
    }

    run(reconciler, deployments).await;
    Ok(())
}

/// Requeue scheduler: earliest-due deployment first, rescheduled per the
/// outcome of each pass. Errors get a fixed retry delay.
async fn run(reconciler: DeploymentReconciler, deployments: Vec<ResourceKey>) {
    let mut queue: BinaryHeap<Reverse<(Instant, ResourceKey)>> = deployments
        .into_iter()
        .map(|key| Reverse((Instant::now(), key)))
        .collect();

    while let Some(Reverse((due, key))) = queue.pop() {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                return;
            }
            _ = sleep_until(due) => {}
        }

        match reconciler.reconcile(&key).await {
            Ok(outcome) => {
                if let Some(delay) = outcome.requeue_after {
                    queue.push(Reverse((Instant::now() + delay, key)));
                }
            }
            Err(e) => {
                tracing::error!(%key, error = %e, "reconciliation failed");
                queue.push(Reverse((Instant::now() + ERROR_RETRY, key)));
            }
        }
    }

    tracing::info!("no deployments scheduled, exiting");
}

/// Load every YAML document under `dir` through the kind registry
async fn load_manifests(
    dir: &Path,
    registry: &KindRegistry,
    store: &MemoryStore,
) -> anyhow::Result<(Vec<ResourceKey>, Vec<ResourceKey>)> {
    let mut deployments = Vec::new();
    let mut rollouts = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if !is_yaml {
            continue;
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        for doc in serde_yaml::Deserializer::from_str(&content) {
            let value = serde_yaml::Value::deserialize(doc)
                .with_context(|| format!("invalid YAML in {}", path.display()))?;
            if value.is_null() {
                continue;
            }
            match registry
                .decode(value)
                .with_context(|| format!("invalid manifest in {}", path.display()))?
            {
                Resource::Deployment(record) => {
                    deployments.push(record.key());
                    store.insert_deployment(record).await;
                }
                Resource::Rollout(record) => {
                    rollouts.push(record.key());
                    store.insert_rollout(record).await;
                }
            }
        }
    }

    Ok((deployments, rollouts))
}

/// The service-account mount is the usual in-cluster marker
fn running_in_cluster() -> bool {
    Path::new("/var/run/secrets/kubernetes.io/serviceaccount").exists()
}
