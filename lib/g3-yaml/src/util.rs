/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

/// Load the first document in the yaml file.
pub fn load_doc(path: &Path) -> anyhow::Result<Yaml> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read file {}: {e}", path.display()))?;
    load_str(&content).context(format!("invalid yaml file {}", path.display()))
}

/// Load the first document in the yaml string, an empty string is loaded as `Yaml::Null`.
pub fn load_str(content: &str) -> anyhow::Result<Yaml> {
    let mut docs =
        YamlLoader::load_from_str(content).map_err(|e| anyhow!("invalid yaml content: {e}"))?;
    if docs.is_empty() {
        return Ok(Yaml::Null);
    }
    Ok(docs.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_str_ok() {
        let doc = load_str("a: 1\n---\nb: 2").unwrap();
        assert_eq!(doc["a"].as_i64(), Some(1));
        assert!(doc["b"].is_badvalue());

        assert_eq!(load_str("").unwrap(), Yaml::Null);
    }

    #[test]
    fn load_str_err() {
        assert!(load_str("a: [1, 2").is_err());
    }

    #[test]
    fn load_doc_err() {
        assert!(load_doc(Path::new("/non-existed/metrics.yaml")).is_err());
    }
}
