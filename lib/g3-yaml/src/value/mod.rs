/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod fs;
mod matcher;
mod metrics;
mod primary;

pub use fs::as_file_path;
pub use matcher::{as_match_rule, as_match_rule_set};
pub use metrics::{as_metric_name, as_metric_node_name};
pub use primary::{as_bool, as_list, as_string};
