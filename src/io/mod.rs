// SPDX-License-Identifier: AGPL-3.0-or-later
//! Readers for profile and catalog tables, writers for matrix exports.

pub mod catalog;
pub mod delimited;
pub mod matrix;
pub mod profiles;
