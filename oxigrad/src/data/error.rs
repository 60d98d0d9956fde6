//! Errors produced when loading or validating training samples.
//!
//! All errors from the data module use [`DataError`]; the crate-level
//! [`Error`](crate::Error) wraps it.

/// Errors produced by the data loading module.
///
/// # Variants
///
/// - **Io**: Failed to read the file (e.g. file not found, permission denied, invalid UTF-8).
///   *When*: Opening or reading the path in [`PathLoader`](super::PathLoader) or [`load_from_path`](super::load_from_path).
///   *Recovery*: Ensure the path exists, is readable, and contains valid UTF-8.
///
/// - **EmptyFile**: The input yields no samples (no lines, or only blanks and comments).
///   *When*: Building a [`Dataset`](super::Dataset) from an empty list.
///   *Recovery*: Provide at least one `x,y` line.
///
/// - **Malformed**: A line is not of the form `x,y`.
///   *When*: Parsing a line in [`Sample::parse`](super::Sample::parse).
///   *Recovery*: Fix the line; the error carries the 1-based line number and its content.
///
/// - **Parse**: A field is not a finite number.
///   *When*: Parsing a line in [`Sample::parse`](super::Sample::parse).
///   *Recovery*: Fix the value at the reported line.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// I/O error while reading the input file.
    #[error("data io: {0}")]
    Io(#[from] std::io::Error),

    /// The input yields no samples.
    #[error("data: input contains no samples")]
    EmptyFile,

    /// A line does not have exactly two comma-separated fields.
    #[error("data: line {line}: expected `x,y`, got {content:?}")]
    Malformed { line: usize, content: String },

    /// A field could not be parsed as a finite `f64`.
    #[error("data: line {line}: {message}")]
    Parse { line: usize, message: String },
}
