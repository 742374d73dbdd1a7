//! Profile names from an AWS shared credentials file.

/// Returns the section names of an INI document, in file order.
///
/// Only `[section]` headers matter; keys, values and comments are skipped.
/// A section repeated later in the file is reported once.
#[must_use]
pub fn profile_names(ini: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in ini.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some(section) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) else {
            continue;
        };
        let section = section.trim();
        if !section.is_empty() && !names.iter().any(|n| n == section) {
            names.push(section.to_string());
        }
    }
    names
}
