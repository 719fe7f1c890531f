//! `amalgam assemble` — One-off assembly straight from the command line.

use amalgam_core::{Assembler, AssemblyPlan, WriteMode};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Library name (output is <NAME>.h, guard is <NAME>_IMPLEMENTATION)
    pub name: String,

    /// Directory containing the header and implementation files
    pub dir: PathBuf,

    /// Public header file name inside DIR
    pub header: String,

    /// Implementation files inside DIR, in output order
    pub sources: Vec<String>,

    /// License file to append
    #[arg(long, value_name = "PATH", default_value = "LICENSE")]
    pub license: PathBuf,

    /// Directory to write <NAME>.h into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Write through a temp file and rename on success
    #[arg(long, conflicts_with = "stdout")]
    pub atomic: bool,

    /// Print the artifact to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

impl AssembleArgs {
    pub fn plan(&self) -> AssemblyPlan {
        let mode = if self.atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Stream
        };
        AssemblyPlan::new(
            self.name.as_str(),
            self.dir.clone(),
            self.header.clone(),
            self.sources.iter().cloned(),
        )
        .with_license(self.license.clone())
        .with_output_dir(self.out_dir.clone())
        .with_write_mode(mode)
    }
}

pub fn run(args: AssembleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let assembler = Assembler::new(args.plan());

    if args.stdout {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        assembler.write_to(&mut out, "<stdout>")?;
        out.flush()?;
        return Ok(());
    }

    let report = assembler.run()?;
    println!(
        "✅ {} → {} ({} source(s), {} bytes)",
        report.library,
        report.output.display(),
        report.source_segments,
        report.bytes_written
    );
    Ok(())
}
