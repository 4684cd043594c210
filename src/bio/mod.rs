// SPDX-License-Identifier: AGPL-3.0-or-later
//! Perturbation profile resolution and similarity algorithms.

pub mod feature_matrix;
pub mod identifier_index;
pub mod metric;
pub mod pairs;
pub mod pairwise;
pub mod profile;
pub mod resolver;
pub mod similarity_matrix;
