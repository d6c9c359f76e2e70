//! Expansion of input arguments into upload paths

use donate_core::{Error, Result};
use std::path::PathBuf;

/// Expand glob patterns into file paths; plain paths pass through.
///
/// The result is sorted and free of duplicates. A pattern that matches
/// no file is an error so a typo does not silently skip an export.
pub fn expand_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let input = input.strip_prefix("file:").unwrap_or(input);

        if !is_pattern(input) {
            paths.push(PathBuf::from(input));
            continue;
        }

        let entries = glob::glob(input)
            .map_err(|e| Error::InvalidSource(format!("Invalid glob pattern {}: {}", input, e)))?;

        let before = paths.len();
        for entry in entries {
            let path = entry.map_err(|e| Error::Other(e.into()))?;
            if path.is_file() {
                paths.push(path);
            }
        }

        if paths.len() == before {
            return Err(Error::InvalidSource(format!("No files match {}", input)));
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}
