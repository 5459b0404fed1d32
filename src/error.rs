use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AabbTreeError {
    #[error("General error: {0}")]
    General(String),

    #[error("Leaf cutoff must be in 1..=255, got {0}")]
    InvalidLeafCutoff(usize),

    #[error("Box at input position {index} is degenerate or not finite")]
    DegenerateBox { index: usize },
}

pub type Result<T> = std::result::Result<T, AabbTreeError>;
