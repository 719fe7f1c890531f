//! Assembly plan — the explicit configuration value handed to the assembler.
//!
//! A plan names the library, the directory its files live in, the public
//! header, and the ordered implementation files. Everything else (license
//! location, output directory, write mode) has a default that reproduces the
//! classic behaviour: `./LICENSE` in, `./<name>.h` out, streamed writes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default license file, resolved against the working directory.
pub const DEFAULT_LICENSE: &str = "LICENSE";

/// Suffix appended to the uppercased library name to form the guard macro.
pub const GUARD_SUFFIX: &str = "_IMPLEMENTATION";

/// Library identifier.
///
/// Used verbatim as the output file stem and, uppercased, as the guard macro
/// prefix. No escaping or validation is performed; a name that is unsafe as a
/// filename fails at the filesystem layer, and one that is unsafe as a macro
/// token simply produces a malformed guard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LibraryName(String);

impl LibraryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<NAME_UPPERCASE>_IMPLEMENTATION`
    pub fn guard_macro(&self) -> String {
        format!("{}{GUARD_SUFFIX}", self.0.to_uppercase())
    }

    /// `<name>.h`
    pub fn artifact_file_name(&self) -> String {
        format!("{}.h", self.0)
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LibraryName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LibraryName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How the artifact reaches disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Truncate `<name>.h` up front and stream into it. A failure partway
    /// leaves whatever was written so far (flushed and closed).
    #[default]
    Stream,
    /// Render into a temporary file next to the target and rename it into
    /// place on success. A failure leaves the previous artifact untouched.
    Atomic,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => f.write_str("stream"),
            Self::Atomic => f.write_str("atomic"),
        }
    }
}

impl std::str::FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" => Ok(Self::Stream),
            "atomic" => Ok(Self::Atomic),
            other => Err(format!("unknown write mode '{other}' (expected 'stream' or 'atomic')")),
        }
    }
}

/// Everything the assembler needs for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyPlan {
    /// Library name; drives the output filename and guard macro
    pub name: LibraryName,

    /// Directory holding the header and every implementation file
    pub source_dir: PathBuf,

    /// Public interface, written verbatim first
    pub header: String,

    /// Implementation files in output order (duplicates allowed)
    pub sources: Vec<String>,

    /// License text appended in a trailing comment
    pub license: PathBuf,

    /// Directory the artifact is written into
    pub output_dir: PathBuf,

    pub write_mode: WriteMode,
}

impl AssemblyPlan {
    /// Plan with the classic defaults: `./LICENSE`, output in `.`, streamed.
    pub fn new(
        name: impl Into<LibraryName>,
        source_dir: impl Into<PathBuf>,
        header: impl Into<String>,
        sources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            source_dir: source_dir.into(),
            header: header.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            license: PathBuf::from(DEFAULT_LICENSE),
            output_dir: PathBuf::from("."),
            write_mode: WriteMode::Stream,
        }
    }

    pub fn with_license(mut self, license: impl Into<PathBuf>) -> Self {
        self.license = license.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// `<source_dir>/<header>`
    pub fn header_path(&self) -> PathBuf {
        self.source_dir.join(&self.header)
    }

    /// `<source_dir>/<source>` for every source, in order.
    pub fn source_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.sources.iter().map(|s| self.source_dir.join(s))
    }

    /// `<output_dir>/<name>.h`
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.name.artifact_file_name())
    }
}
