use crate::graph::error::GraphErr;
use thiserror::Error;

pub type ColoringResult<T> = Result<T, ColoringError>;

#[derive(Debug, Clone, Error)]
pub enum ColoringError {
    #[error("the graph is not planar")]
    NotPlanar,
    #[error("graph error: {0}")]
    Graph(#[from] GraphErr),
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl ColoringError {
    pub fn invariant(message: &str) -> ColoringError {
        ColoringError::Invariant(message.to_string())
    }

    pub fn invariant_err<T>(message: &str) -> ColoringResult<T> {
        Err(ColoringError::invariant(message))
    }
}
