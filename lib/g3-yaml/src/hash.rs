/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

/// Call `f` on every entry of the map, in document order.
///
/// All keys should be strings.
pub fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        if let Yaml::String(key) = k {
            f(key, v).context(format!("failed to parse value of key {key}"))?;
        } else {
            return Err(anyhow!("key in hash should be string"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreach_kv_ok() {
        let yaml = yaml_doc!("enabled: true\nbase-name: vertx");
        let hash = yaml.as_hash().unwrap();
        let mut keys = Vec::new();
        foreach_kv(hash, |k, _| {
            keys.push(k.to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(keys, vec!["enabled".to_string(), "base-name".to_string()]);
    }

    #[test]
    fn foreach_kv_err() {
        let yaml = yaml_doc!("123: 1");
        let hash = yaml.as_hash().unwrap();
        assert!(foreach_kv(hash, |_, _| Ok(())).is_err());

        let yaml = yaml_doc!("enabled: 1");
        let hash = yaml.as_hash().unwrap();
        let e = foreach_kv(hash, |k, _| Err(anyhow!("invalid key {k}"))).unwrap_err();
        assert_eq!(e.to_string(), "failed to parse value of key enabled");
    }
}
