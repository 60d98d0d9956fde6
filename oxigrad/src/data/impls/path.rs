//! [`DataLoader`](super::super::DataLoader) implementation that reads `x,y` lines from a file path.

use std::fs;
use std::path::Path;

use super::super::{DataError, DataLoader, Dataset, Sample};

/// Loads samples from a UTF-8 file with one `x,y` pair per line.
///
/// Blank lines and lines starting with `#` are skipped.
#[derive(Clone, Debug)]
pub struct PathLoader<P>(pub P);

impl<P> PathLoader<P>
where
    P: AsRef<Path>,
{
    /// Creates a loader for the given path.
    #[must_use]
    pub fn new(path: P) -> Self {
        PathLoader(path)
    }
}

impl<P> DataLoader for PathLoader<P>
where
    P: AsRef<Path>,
{
    fn load(&self) -> Result<Dataset, DataError> {
        let content = fs::read_to_string(self.0.as_ref())?;
        let samples = parse_samples(&content)?;
        tracing::debug!(
            path = %self.0.as_ref().display(),
            samples = samples.len(),
            "loaded samples"
        );
        Dataset::new(samples)
    }
}

/// Parses `x,y` lines, skipping blanks and `#` comments.
fn parse_samples(content: &str) -> Result<Vec<Sample>, DataError> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| Sample::parse(line, line_no))
        .collect()
}

/// Convenience: load samples from a path using [`PathLoader`].
///
/// # Errors
///
/// - [`DataError::Io`] when the path cannot be read or content is not valid UTF-8.
/// - [`DataError::Malformed`] / [`DataError::Parse`] for a bad line.
/// - [`DataError::EmptyFile`] when the file yields no samples.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Dataset, DataError> {
    PathLoader::new(path).load()
}
