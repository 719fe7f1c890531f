//! `amalgam build` — Assemble the configured libraries.

use amalgam_core::{Assembler, AssemblyPlan, AssemblyReport, WriteMode};
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    libraries: &[String],
    atomic: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    // An explicit selection must resolve even when nothing is configured
    if libraries.is_empty() && config.libraries.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("⚠️  No libraries configured — run `amalgam init` to create amalgam.toml");
        }
        return Ok(());
    }

    let plans = config.select(libraries)?;
    let reports = build_all(plans, atomic)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!(
                "✅ {} → {} ({} source(s), {} bytes)",
                report.library,
                report.output.display(),
                report.source_segments,
                report.bytes_written
            );
        }
    }

    Ok(())
}

/// Assemble plans in order, stopping at the first failure.
pub fn build_all(
    plans: Vec<AssemblyPlan>,
    atomic: bool,
) -> Result<Vec<AssemblyReport>, amalgam_core::Error> {
    plans
        .into_iter()
        .map(|plan| {
            let plan = if atomic {
                plan.with_write_mode(WriteMode::Atomic)
            } else {
                plan
            };
            Assembler::new(plan).run()
        })
        .collect()
}
