//! Boundary Network Binary
//!
//! Reads a ring file, builds the merged boundary network and writes the
//! exported ways, an SVG preview and a run report.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `BOUNDARY_INPUT`: ring JSON file (required)
//! - `BOUNDARY_OUTPUT_DIR`: artifact directory (default: `.`)
//! - `BOUNDARY_KEY_PRECISION`: fractional digits of point keys (default: 15)
//! - `BOUNDARY_PREVIEW_SCALE`: preview coordinate scale (default: 10)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! BOUNDARY_INPUT=rings.json BOUNDARY_OUTPUT_DIR=out cargo run --bin boundary_network
//! ```

use std::path::PathBuf;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use boundary_network::{Identity, NetworkConfig, Pipeline};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "boundary_network=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    info!(version = version, "Starting boundary network run");

    let input = match std::env::var("BOUNDARY_INPUT") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => {
            error!("BOUNDARY_INPUT not set");
            return Err("BOUNDARY_INPUT must name a ring file".into());
        }
    };
    let output_dir = std::env::var("BOUNDARY_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    let config = NetworkConfig::from_env();
    info!(
        key_precision = config.key_precision,
        preview_scale = config.preview_scale,
        params_hash = %config.params_hash()?,
        "Configuration loaded"
    );

    let started = Instant::now();
    let pipeline = Pipeline::new(config);
    let run = pipeline.run_file(&input, &Identity).map_err(|e| {
        error!(error = %e, input = %input.display(), "Run failed");
        e
    })?;

    for pass in &run.report.passes {
        info!(
            pass = pass.pass,
            edges_before = pass.edges_before,
            edges_after = pass.edges_after,
            "Merge pass"
        );
    }

    std::fs::create_dir_all(&output_dir)?;
    let written = pipeline.write_artifacts(&run, &output_dir)?;

    info!(
        ways = %written.ways.display(),
        preview = %written.preview.display(),
        report = %written.report.display(),
        fingerprint = %run.report.fingerprint,
        latency_ms = started.elapsed().as_millis() as u64,
        "Boundary network run complete"
    );

    Ok(())
}
