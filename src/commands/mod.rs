//! Command dispatch and handlers.

pub mod candidates;
pub mod children;
pub mod edit;
pub mod tree;

use std::path::PathBuf;

use crate::catalog::{CatalogService, NodePath, TreeNode};
use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::store::WorkspaceFolder;

/// Dispatch a parsed command line to its handler.
///
/// Adapters are picked from the environment: `AWSTOOLS_REPLAY` serves AWS
/// lookups from a cassette and `AWSTOOLS_RECORD` records them. The catalog
/// is loaded from every `--workspace` folder, or the current directory.
///
/// # Errors
///
/// Returns an error string if set-up or the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let settings = Settings::from_env();
    let ctx = ServiceContext::from_settings(&settings)?;
    let folders = workspace_folders(&cli.workspaces)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    let mut catalog = CatalogService::load(&ctx, folders);
    runtime.block_on(dispatch_with_catalog(&cli.command, &mut catalog))
}

/// Dispatch a command against a loaded catalog.
async fn dispatch_with_catalog(
    command: &Command,
    catalog: &mut CatalogService<'_>,
) -> Result<(), String> {
    match command {
        Command::Tree => tree::run(catalog).await,
        Command::Children { path, prefix, versions, aliases } => {
            children::run(catalog, path, prefix.as_deref(), *versions, *aliases).await
        }
        Command::Candidates { path } => candidates::run(catalog, path).await,
        Command::Add { args } => edit::add(catalog, args),
        Command::Remove { args } => edit::remove(catalog, args),
        Command::Expand { path } => edit::set_expansion(catalog, path, true),
        Command::Collapse { path } => edit::set_expansion(catalog, path, false),
        Command::MoveService { path, up, .. } => edit::move_service(catalog, path, *up),
    }
}

/// Resolves `--workspace` arguments to folders, defaulting to the current directory.
fn workspace_folders(dirs: &[PathBuf]) -> Result<Vec<WorkspaceFolder>, String> {
    let dirs = if dirs.is_empty() {
        let cwd = std::env::current_dir()
            .map_err(|e| format!("Failed to read current directory: {e}"))?;
        vec![cwd]
    } else {
        dirs.to_vec()
    };
    dirs.iter()
        .map(|dir| {
            std::fs::canonicalize(dir)
                .map(WorkspaceFolder::new)
                .map_err(|e| format!("Workspace folder {}: {e}", dir.display()))
        })
        .collect()
}

/// Parses a name chain into a catalog path.
fn node_path(segments: &[String]) -> Result<NodePath, String> {
    NodePath::from_segments(segments)
        .ok_or_else(|| "A path names 1 to 5 levels, from the workspace down".to_string())
}

/// One line of output for a display node.
fn describe(node: &TreeNode) -> String {
    match (node, node.detail()) {
        (TreeNode::Placeholder(p), _) => format!("({})", p.text()),
        (_, Some(detail)) => format!("{}  [{detail}]", node.label()),
        (_, None) => node.label().to_string(),
    }
}
