use thiserror::Error;

/// Precondition violations reported by the autocompleters and engines.
///
/// All of them are detected before the trie is mutated, so a failed call leaves the trie as it was.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Inserted weights must be finite and strictly positive.
    #[error("weight must be a positive number, got {0}")]
    InvalidWeight(f64),

    /// A result limit, if given, must be at least 1.
    #[error("limit must be at least 1, got {0}")]
    InvalidLimit(usize),

    /// The word delimiter of an engine is not a valid regex.
    #[error("invalid delimiter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_weight(weight: f64) -> Result<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidWeight(weight))
    }
}

pub(crate) fn check_limit(limit: Option<usize>) -> Result<()> {
    match limit {
        Some(0) => Err(Error::InvalidLimit(0)),
        _ => Ok(()),
    }
}

#[test]
fn rejects_invalid_arguments() {
    assert_eq!(check_weight(0.0), Err(Error::InvalidWeight(0.0)));
    assert_eq!(check_weight(-1.5), Err(Error::InvalidWeight(-1.5)));
    assert!(check_weight(f64::NAN).is_err());
    assert!(check_weight(f64::INFINITY).is_err());
    assert_eq!(check_weight(0.25), Ok(()));

    assert_eq!(check_limit(Some(0)), Err(Error::InvalidLimit(0)));
    assert_eq!(check_limit(Some(1)), Ok(()));
    assert_eq!(check_limit(None), Ok(()));
}
