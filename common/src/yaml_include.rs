//! Assembles a layered YAML configuration.
//!
//! A config file may start with any number of `!include <relative path>`
//! lines. Included files are loaded recursively and merged in order; the
//! including file's own keys override whatever the includes provide.

use std::fs;
use std::path::{Path, PathBuf};
use yaml_rust2::{Yaml, YamlLoader};

#[derive(Debug, thiserror::Error)]
pub enum IncludeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: yaml_rust2::ScanError,
    },

    #[error("include cycle detected at {0}")]
    Cycle(PathBuf),
}

const INCLUDE_DIRECTIVE: &str = "!include";

pub fn load_yaml_with_includes(path: &Path) -> Result<Yaml, IncludeError> {
    let mut visiting = Vec::new();
    process_includes_recursive(path, &mut visiting)
}

fn process_includes_recursive(path: &Path, visiting: &mut Vec<PathBuf>) -> Result<Yaml, IncludeError> {
    if visiting.iter().any(|p| p == path) {
        return Err(IncludeError::Cycle(path.to_path_buf()));
    }
    visiting.push(path.to_path_buf());

    let contents = fs::read_to_string(path).map_err(|source| IncludeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_path = path.parent().unwrap_or(Path::new(""));

    let (includes, rest): (Vec<&str>, Vec<&str>) = contents
        .lines()
        .partition(|line| line.trim().starts_with(INCLUDE_DIRECTIVE));

    let mut merged: Option<Yaml> = None;
    for line in includes {
        let include_path = line.trim()[INCLUDE_DIRECTIVE.len()..].trim();
        let included = process_includes_recursive(&base_path.join(include_path), visiting)?;
        merged = Some(match merged {
            Some(acc) => merge_yaml(&acc, &included),
            None => included,
        });
    }

    let own = YamlLoader::load_from_str(&rest.join("\n"))
        .map_err(|source| IncludeError::Scan {
            path: path.to_path_buf(),
            source,
        })?
        .into_iter()
        .reduce(|acc, doc| merge_yaml(&acc, &doc));

    visiting.pop();

    Ok(match (merged, own) {
        (Some(base), Some(own)) => merge_yaml(&base, &own),
        (Some(base), None) => base,
        (None, Some(own)) => own,
        (None, None) => Yaml::Null,
    })
}

fn merge_yaml(base: &Yaml, override_yaml: &Yaml) -> Yaml {
    match (base, override_yaml) {
        (Yaml::Hash(base_hash), Yaml::Hash(override_hash)) => {
            let mut result = base_hash.clone();
            for (key, value) in override_hash {
                let merged = match base_hash.get(key) {
                    Some(base_value) => merge_yaml(base_value, value),
                    None => value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Yaml::Hash(result)
        }
        (_, override_value) => override_value.clone(),
    }
}
