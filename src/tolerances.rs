// SPDX-License-Identifier: AGPL-3.0-or-later
//! Named validation tolerances.
//!
//! Every threshold used by tests and the validation binary lives here.
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Exact | IEEE 754 f64 | 0.0 for batch invariance |
//! | Machine | f64 arithmetic | 1e-12 for dot/norm chains |

// ═══════════════════════════════════════════════════════════════════
// Machine-precision tolerances (IEEE 754 f64)
// ═══════════════════════════════════════════════════════════════════

/// Results that must be bitwise-equal (reruns, batch size changes).
pub const EXACT: f64 = 0.0;

/// Analytical metric values with minimal f64 rounding.
///
/// A cosine over a few thousand features accumulates a handful of ULP
/// in the dot product and both norms; 1e-12 leaves ample headroom.
pub const ANALYTICAL_F64: f64 = 1e-12;

// ═══════════════════════════════════════════════════════════════════
// Cosine metric tolerances
// ═══════════════════════════════════════════════════════════════════

/// Self-pair cosine: similarity 1 / distance 0.
///
/// `dot / (‖a‖·‖a‖)` rounds twice through `sqrt`, so the diagonal can
/// miss 1.0 by a few ULP on long profiles.
pub const COSINE_IDENTITY: f64 = 1e-10;

/// Cosine symmetry: `m[i][j]` vs `m[j][i]`.
///
/// The dot product sums the same products in the same order for both
/// orderings, so this is exact in practice; kept non-zero for FMA codegen.
pub const COSINE_SYMMETRY: f64 = 1e-15;
