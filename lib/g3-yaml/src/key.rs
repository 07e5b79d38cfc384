/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

/// Normalize a config key, so `baseName`, `base-name` and `base_name` are
/// all the same key.
pub fn normalize(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.chars() {
        match c {
            '-' | '_' => {
                key.push('_');
                prev_lower = false;
            }
            c if c.is_ascii_uppercase() => {
                if prev_lower {
                    key.push('_');
                }
                key.push(c.to_ascii_lowercase());
                prev_lower = false;
            }
            c => {
                key.push(c);
                prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            }
        }
    }
    key
}
