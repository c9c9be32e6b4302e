//! CLI command implementations

pub mod converge;
pub mod lut_info;

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

/// Expands literal paths and glob patterns into a sorted frame list.
///
/// Patterns matching nothing are an error, so a typo does not silently
/// drop frames.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if !input.contains(&['*', '?', '['][..]) {
            paths.push(PathBuf::from(input));
            continue;
        }
        let mut matched: Vec<PathBuf> = glob::glob(input)
            .with_context(|| format!("Invalid glob pattern: {input}"))?
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("Failed to read matches of: {input}"))?;
        if matched.is_empty() {
            bail!("No files match: {input}");
        }
        matched.sort();
        paths.extend(matched);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["f_002.exr", "f_000.exr", "f_001.exr", "other.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let pattern = format!("{}/f_*.exr", dir.path().display());
        let paths = expand_inputs(&[pattern]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["f_000.exr", "f_001.exr", "f_002.exr"]);
    }

    #[test]
    fn test_literal_kept_and_empty_glob_fails() {
        let paths = expand_inputs(&["a.exr".to_string()]).unwrap();
        assert_eq!(paths, [PathBuf::from("a.exr")]);
        assert!(expand_inputs(&["/nonexistent/dir/*.exr".to_string()]).is_err());
    }
}
