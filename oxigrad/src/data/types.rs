//! Types for loaded data: [`Sample`] (one `x,y` pair) and [`Dataset`] (non-empty list of samples).

use std::fmt;

use super::DataError;
use crate::autograd::Value;

/// One training pair for a single-feature regression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    /// Creates a sample from an input and its target.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Sample { x, y }
    }

    /// Parses one `x,y` line. `line_no` is 1-based and only used in errors.
    ///
    /// # Errors
    ///
    /// - [`DataError::Malformed`] when the line does not have two fields.
    /// - [`DataError::Parse`] when a field is not a finite number.
    pub fn parse(line: &str, line_no: usize) -> Result<Self, DataError> {
        let mut fields = line.split(',').map(str::trim);
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(DataError::Malformed {
                line: line_no,
                content: line.to_string(),
            });
        };
        Ok(Sample {
            x: parse_field(x, line_no)?,
            y: parse_field(y, line_no)?,
        })
    }
}

fn parse_field(field: &str, line_no: usize) -> Result<f64, DataError> {
    let value: f64 = field.parse().map_err(|e| DataError::Parse {
        line: line_no,
        message: format!("{field:?}: {e}"),
    })?;
    if !value.is_finite() {
        return Err(DataError::Parse {
            line: line_no,
            message: format!("{field:?} is not finite"),
        });
    }
    Ok(value)
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Loaded data: a non-empty list of [`Sample`]s.
#[derive(Clone, Debug)]
pub struct Dataset(Vec<Sample>);

impl Dataset {
    /// Builds a [`Dataset`] from a non-empty list of samples.
    ///
    /// # Errors
    ///
    /// - [`DataError::EmptyFile`] when `samples` is empty.
    pub fn new(samples: Vec<Sample>) -> Result<Self, DataError> {
        if samples.is_empty() {
            return Err(DataError::EmptyFile);
        }
        Ok(Dataset(samples))
    }

    /// The four points used when no data file is given.
    #[must_use]
    pub fn builtin() -> Self {
        Dataset(vec![
            Sample::new(4.0, 6.5),
            Sample::new(7.0, 10.1),
            Sample::new(9.0, 11.8),
            Sample::new(11.0, 14.2),
        ])
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed [`Dataset`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the samples as a slice.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    /// Inputs as constant leaves, ready to feed a model.
    #[must_use]
    pub fn inputs(&self) -> Vec<Value> {
        self.0.iter().map(|s| Value::constant(s.x)).collect()
    }

    /// Targets as constant leaves, ready to feed a loss.
    #[must_use]
    pub fn targets(&self) -> Vec<Value> {
        self.0.iter().map(|s| Value::constant(s.y)).collect()
    }
}
