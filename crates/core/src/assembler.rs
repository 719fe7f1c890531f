//! The assembler — concatenates a library into one single-header artifact.
//!
//! The pipeline is linear and never branches on content:
//!
//! 1. open `<output_dir>/<name>.h`
//! 2. header, verbatim
//! 3. separator banner
//! 4. `#ifdef <NAME>_IMPLEMENTATION`
//! 5. every source minus its first line, each followed by two newlines
//! 6. `#endif /* !<NAME>_IMPLEMENTATION */`
//! 7. the license inside a `/* ... */` comment
//!
//! Inputs are read one at a time, in output order. The first access failure
//! aborts the run.

use crate::error::{Error, Result};
use crate::plan::{AssemblyPlan, LibraryName, WriteMode};
use crate::template;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Summary of a finished artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub library: String,
    pub output: PathBuf,
    pub write_mode: WriteMode,
    pub guard_macro: String,
    pub header_bytes: u64,
    pub source_segments: usize,
    pub license_bytes: u64,
    pub bytes_written: u64,
}

/// Assembles one [`AssemblyPlan`].
#[derive(Debug, Clone)]
pub struct Assembler {
    plan: AssemblyPlan,
}

impl Assembler {
    pub fn new(plan: AssemblyPlan) -> Self {
        Self { plan }
    }

    /// Write the artifact to disk according to the plan's [`WriteMode`].
    pub fn run(&self) -> Result<AssemblyReport> {
        let report = match self.plan.write_mode {
            WriteMode::Stream => self.run_streamed()?,
            WriteMode::Atomic => self.run_atomic()?,
        };

        info!(
            library = %self.plan.name,
            output = %report.output.display(),
            mode = %report.write_mode,
            sources = report.source_segments,
            bytes = report.bytes_written,
            "Single header written"
        );
        Ok(report)
    }

    /// Render the artifact into an arbitrary writer.
    ///
    /// `target` only labels write failures and the returned report.
    pub fn write_to<W: Write>(&self, out: &mut W, target: impl AsRef<Path>) -> Result<AssemblyReport> {
        self.render(out, target.as_ref())
    }

    /// Truncate the target and stream into it.
    ///
    /// The writer is flushed on every exit path so a failed run leaves a
    /// complete prefix on disk rather than a half-buffered one.
    fn run_streamed(&self) -> Result<AssemblyReport> {
        let path = self.plan.output_path();
        let file = File::create(&path).map_err(|e| Error::write(&path, e))?;
        let mut out = BufWriter::new(file);

        let rendered = self.render(&mut out, &path);
        let flushed = out.flush().map_err(|e| Error::write(&path, e));
        let report = rendered?;
        flushed?;
        Ok(report)
    }

    /// Render into a temp file beside the target, then rename over it.
    ///
    /// On failure the temp file is dropped (and removed) and any existing
    /// artifact is left as it was.
    fn run_atomic(&self) -> Result<AssemblyReport> {
        let path = self.plan.output_path();
        let dir = &self.plan.output_dir;

        let tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", self.plan.name.artifact_file_name()))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| Error::write(dir, e))?;
        let mut out = BufWriter::new(tmp);

        let mut report = self.render(&mut out, &path)?;
        report.write_mode = WriteMode::Atomic;

        let tmp = out
            .into_inner()
            .map_err(|e| Error::write(&path, e.into_error()))?;

        // Temp files are private; take the replaced artifact's mode instead
        let permissions = match std::fs::metadata(&path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => fresh_artifact_permissions(),
        };
        if let Some(permissions) = permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|e| Error::write(tmp.path(), e))?;
        }

        tmp.persist(&path).map_err(|e| Error::Persist {
            path: path.clone(),
            source: e.error,
        })?;
        debug!(output = %path.display(), "Renamed temp artifact into place");
        Ok(report)
    }

    fn render<W: Write>(&self, out: &mut W, target: &Path) -> Result<AssemblyReport> {
        let plan = &self.plan;
        let guard = plan.name.guard_macro();
        let mut written = 0u64;
        let mut emit = |out: &mut W, bytes: &[u8]| -> Result<()> {
            out.write_all(bytes).map_err(|e| Error::write(target, e))?;
            written += bytes.len() as u64;
            Ok(())
        };

        let header_path = plan.header_path();
        let header = read_input(&header_path)?;
        debug!(file = %header_path.display(), bytes = header.len(), "Header");
        emit(out, &header)?;

        emit(out, template::SEPARATOR.as_bytes())?;
        emit(out, template::guard_open(&guard).as_bytes())?;

        let mut segments = 0usize;
        for source_path in plan.source_paths() {
            let content = read_input(&source_path)?;
            let body = template::strip_first_line(&content);
            debug!(
                file = %source_path.display(),
                bytes = body.len(),
                "Implementation segment"
            );
            emit(out, body)?;
            emit(out, template::SOURCE_SPACER.as_bytes())?;
            segments += 1;
        }

        emit(out, template::guard_close(&guard).as_bytes())?;

        let license = read_input(&plan.license)?;
        emit(out, template::LICENSE_OPEN.as_bytes())?;
        emit(out, &license)?;
        emit(out, template::LICENSE_CLOSE.as_bytes())?;

        Ok(AssemblyReport {
            library: plan.name.to_string(),
            output: target.to_path_buf(),
            write_mode: plan.write_mode,
            guard_macro: guard,
            header_bytes: header.len() as u64,
            source_segments: segments,
            license_bytes: license.len() as u64,
            bytes_written: written,
        })
    }
}

/// Assemble `<dir>/<header>` and `sources` into `./<name>.h`, with `./LICENSE`
/// appended, using streamed writes.
pub fn assemble(
    name: impl Into<LibraryName>,
    dir: impl Into<PathBuf>,
    header: impl Into<String>,
    sources: impl IntoIterator<Item = impl Into<String>>,
) -> Result<AssemblyReport> {
    Assembler::new(AssemblyPlan::new(name, dir, header, sources)).run()
}

#[cfg(unix)]
fn fresh_artifact_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn fresh_artifact_permissions() -> Option<std::fs::Permissions> {
    None
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::read(path, e))
}
