//! Workload Scaler - inspect and scale Kubernetes workloads
//!
//! A small coordinator over the `workload_scaler` library: every cluster
//! operation runs as its own task and reports through a oneshot channel.
//!
//! ## Usage
//!
//! ```bash
//! # Show a StatefulSet, its pods and whether an HPA targets it
//! workload-scaler get statefulset azp-agent -n agents
//!
//! # Scale it to 5 replicas, refusing if an HPA owns it
//! workload-scaler scale statefulset azp-agent --replicas 5 -n agents
//!
//! # Write the effective configuration for later runs
//! workload-scaler config init scaler.yaml -n agents
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::info;

use workload_scaler::config::env::{print_env_help, EnvConfig};
use workload_scaler::config::AppConfig;
use workload_scaler::k8s::pod::{phase_counts, pod_phase};
use workload_scaler::utils::{init_logger, LogLevel};
use workload_scaler::{ClientProvider, Workload, WorkloadScaler};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let cli::Command::Env = args.command {
        print_env_help();
        let env = EnvConfig::load();
        if env.has_any() {
            println!();
            println!("Active overrides:");
            for line in env.overrides() {
                println!("  {line}");
            }
        }
        return Ok(());
    }

    let config = load_config(&args)?;

    if let cli::Command::Config {
        action: cli::ConfigAction::Init { path, force },
    } = &args.command
    {
        config.init(path, *force)?;
        println!("✓ Wrote configuration to {path}");
        return Ok(());
    }
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.log_level()
    };
    init_logger(level);

    let provider = Arc::new(ClientProvider::new(config.client_settings()));
    let scaler = WorkloadScaler::with_provider(provider);
    let timeout = config.timeout();
    let namespace = config.namespace.as_str();

    match args.command {
        cli::Command::Get(get_args) => {
            show_workloads(&scaler, get_args, namespace, timeout).await?;
        }
        cli::Command::Check(target) => {
            let (tx, rx) = oneshot::channel();
            scaler.check_no_autoscaler(tx, &target.kind, namespace, &target.name);
            receive(rx, timeout, "autoscaler check").await?;
            println!(
                "✓ No HorizontalPodAutoscaler targets {}/{}",
                target.kind.to_lowercase(),
                target.name
            );
        }
        cli::Command::Scale(scale_args) => {
            scale_workload(&scaler, scale_args, namespace, timeout).await?;
        }
        cli::Command::Pods(target) => {
            let workload = resolve(&scaler, &target.kind, namespace, &target.name, timeout).await?;
            let (tx, rx) = oneshot::channel();
            scaler.list_pods(tx, workload);
            for pod in receive(rx, timeout, "pod list").await? {
                println!(
                    "{:40} {}",
                    pod.metadata.name.as_deref().unwrap_or("unknown"),
                    pod_phase(&pod)
                );
            }
        }
        cli::Command::Env | cli::Command::Config { .. } => {
            unreachable!("handled before client setup")
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let env = EnvConfig::load();
    let path = args.config.clone().or_else(|| env.config_file.clone());

    let mut config = match path {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    }
    .apply_env(&env);

    if let Some(namespace) = &args.namespace {
        config.namespace = namespace.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    Ok(config)
}

/// Wait for the single result of a spawned operation
async fn receive<T>(
    rx: oneshot::Receiver<workload_scaler::Result<T>>,
    timeout: Duration,
    what: &str,
) -> Result<T> {
    let result = tokio::time::timeout(timeout, rx)
        .await
        .with_context(|| format!("Timed out waiting for {what}"))?
        .with_context(|| format!("{what} task ended without a result"))?;

    Ok(result?)
}

async fn resolve(
    scaler: &WorkloadScaler,
    kind: &str,
    namespace: &str,
    name: &str,
    timeout: Duration,
) -> Result<Workload> {
    let (tx, rx) = oneshot::channel();
    scaler.resolve_workload(tx, kind, namespace, name);
    receive(rx, timeout, "workload").await
}

async fn scale_workload(
    scaler: &WorkloadScaler,
    args: cli::ScaleArgs,
    namespace: &str,
    timeout: Duration,
) -> Result<()> {
    let target = &args.target;
    if args.replicas < 0 {
        bail!("Replica count must not be negative: {}", args.replicas);
    }

    let (workload_tx, workload_rx) = oneshot::channel();
    let (guard_tx, guard_rx) = oneshot::channel();
    scaler.resolve_workload(workload_tx, &target.kind, namespace, &target.name);
    scaler.check_no_autoscaler(guard_tx, &target.kind, namespace, &target.name);

    let (workload, guard) = tokio::join!(
        receive(workload_rx, timeout, "workload"),
        receive(guard_rx, timeout, "autoscaler check"),
    );
    let workload = workload?;
    guard?;

    info!("Scaling {} to {} replicas", workload, args.replicas);
    let outcome = scaler
        .scale(&workload, args.replicas)
        .await
        .with_context(|| format!("Failed to scale {workload}"))?;

    println!("{}/{} {}", workload.kind, workload.name, outcome);
    Ok(())
}

async fn show_workloads(
    scaler: &WorkloadScaler,
    args: cli::TargetsArgs,
    namespace: &str,
    timeout: Duration,
) -> Result<()> {
    let summaries = join_all(
        args.names
            .iter()
            .map(|name| describe(scaler, &args.kind, namespace, name, timeout)),
    )
    .await;

    for (name, summary) in args.names.iter().zip(summaries) {
        match summary {
            Ok(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
            Err(e) => println!("✗ {name}: {e:#}"),
        }
        println!();
    }

    Ok(())
}

async fn describe(
    scaler: &WorkloadScaler,
    kind: &str,
    namespace: &str,
    name: &str,
    timeout: Duration,
) -> Result<Vec<String>> {
    let (workload_tx, workload_rx) = oneshot::channel();
    let (guard_tx, guard_rx) = oneshot::channel();
    scaler.resolve_workload(workload_tx, kind, namespace, name);
    scaler.check_no_autoscaler(guard_tx, kind, namespace, name);

    let (workload, guard) = tokio::join!(
        receive(workload_rx, timeout, "workload"),
        receive(guard_rx, timeout, "autoscaler check"),
    );
    let workload = workload?;

    let (pods_tx, pods_rx) = oneshot::channel();
    scaler.list_pods(pods_tx, workload.clone());
    let pods = receive(pods_rx, timeout, "pod list").await?;

    let replicas = |r: Option<i32>| r.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        format!("{workload}"),
        format!(
            "  Replicas:    {} desired, {} ready",
            replicas(workload.desired_replicas),
            replicas(workload.ready_replicas)
        ),
        format!("  Pods:        {}", pods.len()),
    ];
    for (phase, count) in phase_counts(&pods) {
        lines.push(format!("    {phase:10} {count}"));
    }
    lines.push(match guard {
        Ok(()) => "  Autoscaler:  none".to_string(),
        Err(e) => format!("  Autoscaler:  {e:#}"),
    });

    Ok(lines)
}
