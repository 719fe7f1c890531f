//! # amalgam core
//!
//! Assembles a multi-file C library into a single-header artifact: the public
//! header, a separator banner, every implementation file inside an
//! `#ifdef <NAME>_IMPLEMENTATION` guard, and the license in a trailing
//! comment.
//!
//! This crate performs no parsing of the source text. It only concatenates,
//! in a fixed order, and reports the first file access failure it hits.
//!
//! ```no_run
//! use amalgam_core::assemble;
//!
//! let report = assemble("minimal", "src", "minimal.h", ["minimal.c", "input.c"])?;
//! println!("wrote {}", report.output.display());
//! # Ok::<(), amalgam_core::Error>(())
//! ```

pub mod assembler;
pub mod error;
pub mod plan;
pub mod template;

// Re-export key types at crate root for ergonomics
pub use assembler::{assemble, Assembler, AssemblyReport};
pub use error::{Error, Result};
pub use plan::{AssemblyPlan, LibraryName, WriteMode};
