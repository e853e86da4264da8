use crate::domain::ast::SourceTree;
use crate::infrastructure::SynUnitParser;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub struct SourceLoader;

impl SourceLoader {
    /// Load every `.rs` file beneath `root` into a SourceTree.
    ///
    /// Discovered paths are sorted before parsing so unit order is
    /// deterministic across platforms; alignment downstream is positional
    /// and depends on that order. A file that fails to read or parse is
    /// skipped with a diagnostic and leaves no entry in the tree, which
    /// shifts the position of every unit after it.
    pub fn load(root: &Path) -> Result<SourceTree> {
        let mut paths = Vec::new();
        Self::collect_rs_recursive(root, &mut paths)
            .with_context(|| format!("Failed to scan source root {}", root.display()))?;
        paths.sort();

        // Parsing is embarrassingly parallel; collect() keeps input order,
        // so positional identity survives. The failure filter runs after
        // collection for the same reason.
        let units = paths
            .par_iter()
            .map(|path| {
                let display = path.display().to_string();
                let src = match fs::read_to_string(path) {
                    Ok(src) => src,
                    Err(e) => {
                        eprintln!("WARN: Failed to read {}: {}", display, e);
                        return None;
                    }
                };
                match SynUnitParser::parse_unit(&display, &src) {
                    Ok(unit) => Some(unit),
                    Err(e) => {
                        eprintln!("WARN: Failed to parse {}: {}", display, e);
                        None
                    }
                }
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        Ok(SourceTree { units })
    }

    fn collect_rs_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        if dir.ends_with("target") || dir.ends_with(".git") {
            return Ok(());
        }
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                Self::collect_rs_recursive(&path, out)?;
            } else if let Some(ext) = path.extension() {
                if ext == "rs" {
                    out.push(path);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_sorts_units_by_path() {
        let dir = tempdir().unwrap();
        for name in ["zeta.rs", "alpha.rs", "mid.rs"] {
            let mut f = File::create(dir.path().join(name)).unwrap();
            writeln!(f, "struct S;").unwrap();
        }

        let tree = SourceLoader::load(dir.path()).unwrap();
        let names: Vec<&str> = tree
            .units
            .iter()
            .map(|u| u.path.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(names, vec!["alpha.rs", "mid.rs", "zeta.rs"]);
    }

    #[test]
    fn test_unparsable_file_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.rs"), "fn broken( {").unwrap();
        std::fs::write(dir.path().join("good.rs"), "struct S;").unwrap();

        let tree = SourceLoader::load(dir.path()).unwrap();
        assert_eq!(tree.units.len(), 1);
        assert!(tree.units[0].path.ends_with("good.rs"));
    }

    #[test]
    fn test_non_rs_files_and_skip_dirs_are_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not rust").unwrap();
        std::fs::create_dir(dir.path().join("target")).unwrap();
        std::fs::write(dir.path().join("target").join("gen.rs"), "struct S;").unwrap();

        let tree = SourceLoader::load(dir.path()).unwrap();
        assert!(tree.units.is_empty());
    }
}
