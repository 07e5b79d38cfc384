/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use yaml_rust::Yaml;

/// Get the path of an existing regular file.
///
/// A relative path is resolved against `lookup_dir` if set.
pub fn as_file_path(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let Yaml::String(path) = v else {
        return Err(anyhow!("yaml value type for path should be string"));
    };
    if path.is_empty() {
        return Err(anyhow!("empty path"));
    }
    let path = PathBuf::from(path);
    let path = match lookup_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    };
    if !path.exists() {
        return Err(anyhow!("path {} is not existed", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!(
            "the path {} is existed but not a regular file",
            path.display()
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_file_path_ok() {
        let manifest = env!("CARGO_MANIFEST_DIR");
        let v = yaml_str!("Cargo.toml");
        let path = as_file_path(&v, Some(Path::new(manifest))).unwrap();
        assert!(path.ends_with("Cargo.toml"));

        let v = yaml_str!(format!("{manifest}/Cargo.toml"));
        assert!(as_file_path(&v, None).is_ok());
    }

    #[test]
    fn as_file_path_err() {
        let manifest = env!("CARGO_MANIFEST_DIR");
        assert!(as_file_path(&yaml_str!("src"), Some(Path::new(manifest))).is_err());
        assert!(as_file_path(&yaml_str!("not-existed.yaml"), Some(Path::new(manifest))).is_err());
        assert!(as_file_path(&yaml_str!(""), None).is_err());
        assert!(as_file_path(&Yaml::Integer(1), None).is_err());
    }
}
