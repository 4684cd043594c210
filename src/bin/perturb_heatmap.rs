// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gene-of-interest similarity heatmap.
//!
//! Resolves the configured genes through the catalog, selects their
//! profiles and writes the sorted all-pairs matrix into the figure
//! directory. Configuration comes from `PERTURBSPRING_*` variables (see
//! [`perturbspring::config`]); log verbosity from `RUST_LOG`.
//!
//! | Field | Value |
//! |-------|-------|
//! | Exact command | `cargo run --release --bin perturb_heatmap` |
//! | Default genes | CD44, HAS2 (CRISPR) |
//! | Default metric | cosine distance, batch 200 |
//! | Exit status | 0 on success, 1 with the failed stage on error |

use perturbspring::config::PipelineConfig;
use perturbspring::pipeline;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match PipelineConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    match pipeline::run_from_config(&config) {
        Ok(report) => {
            info!(
                output = %report.output.display(),
                selected = report.selected,
                "heatmap written"
            );
            println!("{}", report.output.display());
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
