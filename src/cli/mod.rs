//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Resolve, guard and scale Kubernetes workloads
#[derive(Parser, Debug)]
#[command(name = "workload-scaler")]
#[command(version)]
#[command(about = "Inspect and scale scalable Kubernetes workloads")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Namespace of the workload
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Seconds to wait for each cluster result
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show workloads, their pods and autoscaler status
    Get(TargetsArgs),

    /// Check that no HorizontalPodAutoscaler targets a workload
    Check(TargetArgs),

    /// Set the replica count of a workload
    Scale(ScaleArgs),

    /// List the pods of a workload
    Pods(TargetArgs),

    /// Show supported environment variables
    Env,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the effective configuration to a file
    Init {
        /// Output path (.yaml/.yml for YAML, anything else for JSON)
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// A single workload
#[derive(Parser, Debug)]
pub struct TargetArgs {
    /// Resource kind (e.g. statefulset)
    pub kind: String,

    /// Resource name
    pub name: String,
}

/// One or more workloads of the same kind
#[derive(Parser, Debug)]
pub struct TargetsArgs {
    /// Resource kind (e.g. statefulset)
    pub kind: String,

    /// Resource names
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Arguments for scale command
#[derive(Parser, Debug)]
pub struct ScaleArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Desired replica count
    #[arg(short, long)]
    pub replicas: i32,
}
