/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

#[macro_use]
mod macros;

mod hash;
mod util;

pub mod key;
pub mod value;

pub use hash::foreach_kv;
pub use util::{load_doc, load_str};
