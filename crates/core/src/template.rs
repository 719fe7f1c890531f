//! Fixed structural pieces of a single-header artifact.
//!
//! ```text
//! <header>
//! SEPARATOR
//! #ifdef <NAME>_IMPLEMENTATION
//! <source body>\n\n        (per source, in order)
//! #endif /* !<NAME>_IMPLEMENTATION */\n\n
//! /*\n<LICENSE>*/
//! ```

/// Banner between the public interface and the implementation section.
pub const SEPARATOR: &str = concat!(
    "\n",
    "/*\n",
    " * -----------------------------------------------------------------------------\n",
    " * ----| IMPLEMENTATION |-------------------------------------------------------\n",
    " * -----------------------------------------------------------------------------\n",
    " */\n",
);

/// Written after every implementation body.
pub const SOURCE_SPACER: &str = "\n\n";

/// Opens the comment wrapping the license.
pub const LICENSE_OPEN: &str = "/*\n";

/// Closes the license comment. Nothing follows it.
pub const LICENSE_CLOSE: &str = "*/";

/// `#ifdef <MACRO>\n`
pub fn guard_open(guard_macro: &str) -> String {
    format!("#ifdef {guard_macro}\n")
}

/// `#endif /* !<MACRO> */\n\n`
pub fn guard_close(guard_macro: &str) -> String {
    format!("#endif /* !{guard_macro} */\n\n")
}

/// Drop the first line of an implementation file.
///
/// Everything up to and including the first `\n` is discarded; the rest is
/// returned byte-for-byte, so `\r\n` endings and non-UTF-8 content survive.
/// A file without any `\n` is a single line and yields nothing. The first
/// line is assumed to be the file's own `#include` of the header, but that
/// is never checked.
pub fn strip_first_line(content: &[u8]) -> &[u8] {
    match content.iter().position(|&b| b == b'\n') {
        Some(idx) => &content[idx + 1..],
        None => &[],
    }
}

/// Whether the first line looks like an `#include` directive.
///
/// Only used for diagnostics; assembly strips the first line regardless.
pub fn first_line_is_include(content: &[u8]) -> bool {
    let end = content
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(content.len());
    let line = String::from_utf8_lossy(&content[..end]);
    let line = line.trim_start();
    line.strip_prefix('#')
        .map(|rest| rest.trim_start().starts_with("include"))
        .unwrap_or(false)
}
