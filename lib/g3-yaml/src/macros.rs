/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Load the first yaml document from a string literal, for use in tests.
///
/// The caller crate should depend on `yaml-rust` by that name.
#[macro_export]
macro_rules! yaml_doc {
    ($s:expr) => {
        ::yaml_rust::YamlLoader::load_from_str($s)
            .unwrap()
            .pop()
            .unwrap()
    };
}

/// Build a yaml string value, for use in tests.
#[macro_export]
macro_rules! yaml_str {
    ($s:expr) => {
        ::yaml_rust::Yaml::String(($s).to_string())
    };
}
