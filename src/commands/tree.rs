//! `awstools tree` command.

use crate::catalog::{CatalogService, Level, NodePath, TreeNode};

use super::describe;

/// Execute the `tree` command: print every workspace down to its resources.
///
/// Only cataloged entities are shown; live Lambda and S3 listings are left
/// to `children`.
///
/// # Errors
///
/// Returns an error string if a listing fails.
pub async fn run(catalog: &CatalogService<'_>) -> Result<(), String> {
    for line in render(catalog).await? {
        println!("{line}");
    }
    Ok(())
}

/// Renders the cataloged tree, two spaces of indent per level.
///
/// # Errors
///
/// Returns an error string if a listing fails.
pub async fn render(catalog: &CatalogService<'_>) -> Result<Vec<String>, String> {
    let roots = catalog.get_children(None).await.map_err(|e| e.to_string())?;
    if roots.is_empty() {
        return Ok(vec!["No workspaces loaded.".to_string()]);
    }

    let mut lines = Vec::new();
    let mut stack: Vec<(TreeNode, usize)> = roots.into_iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        lines.push(format!("{}{}", "  ".repeat(depth), describe(&node)));
        let descend = node.catalog_path().map(NodePath::level).is_some_and(|l| l < Level::Resource);
        if descend {
            let children = catalog.get_children(Some(&node)).await.map_err(|e| e.to_string())?;
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::WorkspaceFolder;
    use crate::testing::{context, CollectingNotifier, MemFs, ScriptedAws};

    #[tokio::test]
    async fn renders_nested_levels_with_placeholders() {
        let fs = MemFs::default().with_file(
            "/work/proj/.aws-tools.json",
            r#"{"profiles": [
                {"name": "dev", "regions": [{"name": "us-east-1", "services": [
                    {"name": "EC2 - Instances", "resources": [{"name": "web", "id": "i-1"}]},
                    {"name": "S3"}
                ]}]},
                {"name": "prod"}
            ]}"#,
        );
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, vec![WorkspaceFolder::new("/work/proj")]);

        let lines = render(&catalog).await.unwrap();
        assert_eq!(
            lines,
            vec![
                "proj",
                "  dev",
                "    us-east-1",
                "      EC2 - Instances",
                "        web  [i-1]",
                "      S3",
                "        (No resources added)",
                "  prod",
                "    (No regions added)",
            ]
        );
    }
}
