use std::path::Path;

pub mod fixtures;

/// Fixture paths of `created`, relative to `root`, sorted.
pub fn relative_paths<'a, I>(root: &Path, created: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let root = format!("{}/", root.display());
    let mut paths: Vec<String> = created
        .into_iter()
        .map(|path| path.strip_prefix(&root).unwrap_or(path).to_string())
        .collect();
    paths.sort();
    paths
}
