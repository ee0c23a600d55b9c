//! Range expression parsing

use serde::{Deserialize, Serialize};

use crate::error::RangeError;

const SYMMETRIC_SEPARATOR: &str = "...";
const ASYMMETRIC_SEPARATOR: &str = "..";

/// A commit range as given on the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// `from...to` rather than `from..to`
    pub symmetric: bool,
    /// Start ref (or start date)
    pub from: String,
    /// End ref (or end date), may be empty
    pub to: String,
}

impl RangeSpec {
    /// A range with a single start point
    pub fn single(from: impl Into<String>) -> Self {
        Self {
            symmetric: false,
            from: from.into(),
            to: String::new(),
        }
    }
}

/// Parse `<ref>`, `<from>..<to>` or `<from>...<to>` into a [`RangeSpec`].
///
/// The three-dot form is checked first. A bare separator, or an empty
/// input, is rejected.
pub fn parse_range(range: &str) -> Result<RangeSpec, RangeError> {
    let (symmetric, separator) = if range.contains(SYMMETRIC_SEPARATOR) {
        (true, SYMMETRIC_SEPARATOR)
    } else if range.contains(ASYMMETRIC_SEPARATOR) {
        (false, ASYMMETRIC_SEPARATOR)
    } else if !range.is_empty() {
        return Ok(RangeSpec::single(range));
    } else {
        return Err(RangeError::InvalidRange(range.to_string()));
    };

    if range.len() <= separator.len() {
        return Err(RangeError::InvalidRange(range.to_string()));
    }

    let mut parts = range.split(separator);
    let from = parts.next().unwrap_or_default().to_string();
    let to = parts.next().unwrap_or_default().to_string();

    Ok(RangeSpec {
        symmetric,
        from,
        to,
    })
}
