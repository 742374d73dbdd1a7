//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Top-level CLI parser for `awstools`.
#[derive(Debug, Parser)]
#[command(
    name = "awstools",
    version,
    about = "Catalog AWS profiles, regions, services and resources per workspace"
)]
pub struct Cli {
    /// Workspace folder holding a catalog document (repeatable; default: current directory).
    #[arg(long = "workspace", short = 'w', value_name = "DIR", global = true)]
    pub workspaces: Vec<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
///
/// A node path is the chain of names from the workspace down, e.g.
/// `proj dev us-east-1 Lambda`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the cataloged tree.
    Tree,
    /// List the children of a node, including live Lambda and S3 listings.
    #[command(group(ArgGroup::new("lambda").args(["versions", "aliases"])))]
    Children {
        /// Node path.
        #[arg(required = true)]
        path: Vec<String>,
        /// List the S3 folder with this prefix inside the bucket.
        #[arg(long, conflicts_with = "lambda")]
        prefix: Option<String>,
        /// List the Lambda function's published versions.
        #[arg(long)]
        versions: bool,
        /// List the Lambda function's aliases.
        #[arg(long)]
        aliases: bool,
    },
    /// List names that can be added under a node.
    Candidates {
        /// Node path.
        #[arg(required = true)]
        path: Vec<String>,
    },
    /// Add a child to a node.
    Add {
        /// Parent path followed by the name to add.
        #[arg(required = true, num_args = 2.., value_name = "PATH... NAME")]
        args: Vec<String>,
    },
    /// Remove a child from a node.
    Remove {
        /// Parent path followed by the name (or id) to remove.
        #[arg(required = true, num_args = 2.., value_name = "PATH... NAME")]
        args: Vec<String>,
    },
    /// Mark a node as expanded.
    Expand {
        /// Node path.
        #[arg(required = true)]
        path: Vec<String>,
    },
    /// Mark a node as collapsed.
    Collapse {
        /// Node path.
        #[arg(required = true)]
        path: Vec<String>,
    },
    /// Move a service one place up or down within its region.
    #[command(group(ArgGroup::new("direction").args(["up", "down"]).required(true)))]
    MoveService {
        /// Service path.
        #[arg(required = true)]
        path: Vec<String>,
        /// Towards the top.
        #[arg(long)]
        up: bool,
        /// Towards the bottom.
        #[arg(long)]
        down: bool,
    },
}
