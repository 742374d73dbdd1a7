//! `awstools candidates` command.

use crate::catalog::{Candidate, CatalogService};

use super::node_path;

/// Execute the `candidates` command: list what `add` accepts under `path`.
///
/// Each line is the value to pass to `add`, followed by a description when
/// the two differ.
///
/// # Errors
///
/// Returns an error string if a live lookup fails.
pub async fn run(catalog: &CatalogService<'_>, path: &[String]) -> Result<(), String> {
    let path = node_path(path)?;
    let candidates = catalog.get_candidates(&path).await.map_err(|e| e.to_string())?;
    if candidates.is_empty() {
        println!("Nothing to add under {path}.");
    }
    for candidate in &candidates {
        println!("{}", format_candidate(candidate));
    }
    Ok(())
}

fn format_candidate(candidate: &Candidate) -> String {
    if candidate.label == candidate.value {
        candidate.value.clone()
    } else {
        format!("{}\t{}", candidate.value, candidate.label)
    }
}
