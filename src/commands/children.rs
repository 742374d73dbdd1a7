//! `awstools children` command.

use crate::catalog::{CatalogService, LambdaGroup, TreeNode};

use super::{describe, node_path};

/// Execute the `children` command.
///
/// Lists what the tree would show when expanding the node at `path`. With
/// `prefix` the node is taken as an S3 bucket and the folder under that
/// prefix is listed; `versions` and `aliases` open a Lambda function's groups.
///
/// # Errors
///
/// Returns an error string if the path is not cataloged or a listing fails.
pub async fn run(
    catalog: &CatalogService<'_>,
    path: &[String],
    prefix: Option<&str>,
    versions: bool,
    aliases: bool,
) -> Result<(), String> {
    let path = node_path(path)?;
    let Some(node) = catalog.node(&path) else {
        return Err(format!("{path} is not in the catalog"));
    };
    let node = match (prefix, versions, aliases) {
        (Some(prefix), _, _) => TreeNode::S3Folder { bucket: path, prefix: prefix.to_string() },
        (None, true, _) => TreeNode::LambdaGroup { function: path, group: LambdaGroup::Versions },
        (None, _, true) => TreeNode::LambdaGroup { function: path, group: LambdaGroup::Aliases },
        (None, false, false) => node,
    };
    let children = catalog.get_children(Some(&node)).await.map_err(|e| e.to_string())?;
    for child in &children {
        println!("{}", describe(child));
    }
    Ok(())
}
