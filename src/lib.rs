// SPDX-License-Identifier: AGPL-3.0-or-later

#![forbid(unsafe_code)]
#![deny(clippy::expect_used, clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

//! perturbSpring: perturbation profile similarity for genes of interest.
//!
//! Answers one question from a JUMP-style profile table: does perturbing
//! gene A produce a morphological profile like perturbing gene B?
//!
//! # Pipeline
//!
//! ```text
//!   catalog ──► resolver ──► identifier index
//!                                   │
//!   profile table ──────────► select/relabel ──► feature matrix
//!                                                      │
//!                         pairwise engine (n² pairs, batched)
//!                                                      │
//!                         similarity matrix (sorted axes) ──► renderer
//! ```
//!
//! - [`bio::resolver`] maps gene symbols to dataset perturbation ids
//!   through an injected [`bio::resolver::Catalog`].
//! - [`bio::pairwise`] computes every ordered pair of rows under a
//!   [`bio::metric::Metric`].
//! - [`io`] reads profile and catalog tables and writes matrix exports.
//! - [`pipeline`] wires the stages together and tags failures by stage.

pub mod bio;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod render;
pub mod tolerances;
pub mod validation;
