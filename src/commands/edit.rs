//! Catalog-editing commands: `add`, `remove`, `expand`, `collapse` and
//! `move-service`.
//!
//! Not-found and duplicate outcomes are reported but are not failures.

use crate::catalog::{CatalogService, MoveDirection, Mutation, NodePath};

use super::node_path;

/// Execute `add <path...> <name>`.
///
/// # Errors
///
/// Returns an error string if the path is invalid or saving fails.
pub fn add(catalog: &mut CatalogService<'_>, args: &[String]) -> Result<(), String> {
    let (parent, name) = split_name(args)?;
    let outcome = catalog.add_entity(&parent, name).map_err(|e| e.to_string())?;
    if outcome == Mutation::Missing {
        println!("{parent} not found");
    } else {
        println!("{}", describe_outcome(outcome, &parent, name, "Added"));
    }
    Ok(())
}

/// Execute `remove <path...> <name>`.
///
/// # Errors
///
/// Returns an error string if the path is invalid or saving fails.
pub fn remove(catalog: &mut CatalogService<'_>, args: &[String]) -> Result<(), String> {
    let (parent, name) = split_name(args)?;
    let outcome = catalog.remove_entity(&parent, name).map_err(|e| e.to_string())?;
    println!("{}", describe_outcome(outcome, &parent, name, "Removed"));
    Ok(())
}

/// Execute `expand <path...>` or `collapse <path...>`.
///
/// # Errors
///
/// Returns an error string if the path is invalid or saving fails.
pub fn set_expansion(
    catalog: &mut CatalogService<'_>,
    path: &[String],
    expanded: bool,
) -> Result<(), String> {
    let path = node_path(path)?;
    let outcome = catalog.set_path_expansion(&path, expanded).map_err(|e| e.to_string())?;
    let state = if expanded { "expanded" } else { "collapsed" };
    match outcome {
        Mutation::Applied => println!("{path} {state}"),
        Mutation::Missing => println!("{path} not found"),
        Mutation::Duplicate | Mutation::Unchanged => println!("{path} already {state}"),
    }
    Ok(())
}

/// Execute `move-service <path...> --up|--down`.
///
/// # Errors
///
/// Returns an error string if the path is invalid or saving fails.
pub fn move_service(
    catalog: &mut CatalogService<'_>,
    path: &[String],
    up: bool,
) -> Result<(), String> {
    let path = node_path(path)?;
    let direction = if up { MoveDirection::Up } else { MoveDirection::Down };
    let outcome = catalog.move_service(&path, direction).map_err(|e| e.to_string())?;
    match outcome {
        Mutation::Applied => println!("Moved {path} {}", if up { "up" } else { "down" }),
        Mutation::Missing => println!("{path} not found"),
        Mutation::Duplicate | Mutation::Unchanged => println!("{path} not moved"),
    }
    Ok(())
}

fn split_name(args: &[String]) -> Result<(NodePath, &str), String> {
    let Some((name, parent)) = args.split_last() else {
        return Err("Expected a path followed by a name".to_string());
    };
    Ok((node_path(parent)?, name.as_str()))
}

fn describe_outcome(outcome: Mutation, parent: &NodePath, name: &str, verb: &str) -> String {
    match outcome {
        Mutation::Applied => format!("{verb} {name} under {parent}"),
        Mutation::Duplicate => format!("{name} is already added under {parent}"),
        Mutation::Missing => format!("{name} not found under {parent}"),
        Mutation::Unchanged => format!("Nothing to change under {parent}"),
    }
}
