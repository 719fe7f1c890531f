//! `amalgam check` — Verify that every configured input is in place.

use amalgam_core::template::first_line_is_include;
use amalgam_core::AssemblyPlan;
use std::path::Path;

/// Outcome of checking one plan.
#[derive(Debug, Default)]
pub struct PlanCheck {
    /// Inputs or output locations that would fail the build
    pub errors: Vec<String>,
    /// Sources whose first line (always stripped) is not an `#include`
    pub warnings: Vec<String>,
}

/// Inspect a plan without writing anything.
pub fn check_plan(plan: &AssemblyPlan) -> PlanCheck {
    let mut result = PlanCheck::default();

    let header = plan.header_path();
    if let Err(e) = std::fs::read(&header) {
        result.errors.push(format!("{}: {e}", header.display()));
    }

    for source in plan.source_paths() {
        match std::fs::read(&source) {
            Ok(content) if !first_line_is_include(&content) => result.warnings.push(format!(
                "{}: first line is not an #include but will be dropped",
                source.display()
            )),
            Ok(_) => {}
            Err(e) => result.errors.push(format!("{}: {e}", source.display())),
        }
    }

    if let Err(e) = std::fs::read(&plan.license) {
        result.errors.push(format!("{}: {e}", plan.license.display()));
    }

    if !plan.output_dir.is_dir() {
        result.errors.push(format!(
            "{}: output directory does not exist",
            plan.output_dir.display()
        ));
    }

    result
}

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 amalgam check");
    println!("================\n");

    let config = super::load_config(config_path)?;
    if config.libraries.is_empty() {
        println!("  ⚠️  No libraries configured — run `amalgam init`");
        return Ok(());
    }

    let mut issues = 0;

    for plan in config.plans() {
        let result = check_plan(&plan);
        if result.errors.is_empty() {
            println!("  ✅ {} ({} source(s))", plan.name, plan.sources.len());
        } else {
            println!("  ❌ {}", plan.name);
        }
        for e in &result.errors {
            println!("     ❌ {e}");
        }
        for w in &result.warnings {
            println!("     ⚠️  {w}");
            tracing::warn!(library = %plan.name, "{w}");
        }
        issues += result.errors.len();
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
        Ok(())
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
        Err(format!("{issues} issue(s) found").into())
    }
}
