//! Training-data loading for single-feature regression.
//!
//! This module defines the **trait** ([`DataLoader`]), **models** ([`Sample`], [`Dataset`]), and **error** ([`DataError`]).
//! Implementations (e.g. [`PathLoader`] for `x,y` files) are in the `impls` submodule.

mod error;
mod impls;
mod types;

pub use error::DataError;
pub use impls::{load_from_path, PathLoader};
pub use types::{Dataset, Sample};

/// Trait for loading a [`Dataset`].
pub trait DataLoader {
    /// Loads data. Returns [`Dataset`] or a [`DataError`].
    fn load(&self) -> Result<Dataset, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error::Error as _;
    use std::io::Write;
    use std::path::Path;

    fn write_temp(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        f.flush().unwrap();
        f
    }

    #[test]
    fn load_from_path_reads_pairs() {
        let f = write_temp(&["# x,y", "4, 6.5", "", "  7,10.1  ", "9,11.8"]);
        let data = load_from_path(f.path()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.samples()[0], Sample::new(4.0, 6.5));
        assert_eq!(data.samples()[1], Sample::new(7.0, 10.1));
        assert_eq!(data.samples()[2], Sample::new(9.0, 11.8));
    }

    #[test]
    fn load_from_path_empty_file_returns_empty_file_error() {
        let f = write_temp(&[]);
        assert!(matches!(load_from_path(f.path()), Err(DataError::EmptyFile)));
    }

    #[test]
    fn load_from_path_comments_only_returns_empty_file_error() {
        let f = write_temp(&["# nothing here", "   "]);
        assert!(matches!(load_from_path(f.path()), Err(DataError::EmptyFile)));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let f = write_temp(&["1,2", "3"]);
        let err = load_from_path(f.path()).unwrap_err();
        assert!(matches!(err, DataError::Malformed { line: 2, .. }));

        let f = write_temp(&["1,2,3"]);
        let err = load_from_path(f.path()).unwrap_err();
        assert!(matches!(err, DataError::Malformed { line: 1, .. }));
    }

    #[test]
    fn non_numeric_field_returns_parse_error() {
        let f = write_temp(&["1,2", "# c", "x,4"]);
        let err = load_from_path(f.path()).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 3, .. }));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn non_finite_field_returns_parse_error() {
        assert!(matches!(
            Sample::parse("inf,1", 1),
            Err(DataError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn load_from_path_missing_file_returns_io_error() {
        let path = Path::new("/nonexistent/oxigrad_never_exists.csv");
        let result = load_from_path(path);
        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[test]
    fn path_loader_implements_trait() {
        let f = write_temp(&["0,1"]);
        let loader = PathLoader::new(f.path());
        let data = loader.load().unwrap();
        assert_eq!(data.samples(), &[Sample::new(0.0, 1.0)]);
    }

    #[test]
    fn dataset_new_rejects_empty_vec() {
        assert!(matches!(Dataset::new(vec![]), Err(DataError::EmptyFile)));
    }

    #[test]
    fn builtin_dataset_feeds_constant_leaves() {
        let data = Dataset::builtin();
        assert_eq!(data.len(), 4);
        assert!(!data.is_empty());
        let xs = data.inputs();
        let ys = data.targets();
        assert_eq!(xs.len(), 4);
        assert_eq!(ys[3].data(), 14.2);
        assert!(xs.iter().chain(&ys).all(|v| !v.requires_grad()));
    }

    #[test]
    fn data_error_display_and_from_io() {
        let e = DataError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(e.to_string().contains("data io"));
        assert!(e.source().is_some());
        assert!(DataError::EmptyFile.source().is_none());
    }
}
