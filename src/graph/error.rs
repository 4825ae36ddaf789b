use crate::graph::index_store::Index;
use crate::graph::indices::VertexI;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphErr>;

/// General failure of a graph operation, carrying a human readable message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GraphErr {
    message: String,
}

impl GraphErr {
    pub fn new(message: &str) -> GraphErr {
        GraphErr {
            message: message.to_string(),
        }
    }

    pub fn new_err<T>(message: &str) -> GraphResult<T> {
        Err(GraphErr::new(message))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Error)]
#[error("index {failed_index} is not valid here")]
pub struct IndexAccessError<T: Index> {
    failed_index: T,
}

impl<T: Index> IndexAccessError<T> {
    pub fn new(failed_index: T) -> IndexAccessError<T> {
        IndexAccessError { failed_index }
    }

    pub fn get_index(&self) -> T {
        self.failed_index
    }
}

impl<T: Index> From<IndexAccessError<T>> for GraphErr {
    fn from(e: IndexAccessError<T>) -> Self {
        GraphErr::new(&e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
#[error("there is no edge between {} and {}", .vertices.0, .vertices.1)]
pub struct NoSuchEdgeError {
    vertices: (VertexI, VertexI),
}

impl NoSuchEdgeError {
    pub fn new(v1: VertexI, v2: VertexI) -> NoSuchEdgeError {
        NoSuchEdgeError { vertices: (v1, v2) }
    }

    pub fn get_vertices(&self) -> (VertexI, VertexI) {
        self.vertices
    }
}

impl From<NoSuchEdgeError> for GraphErr {
    fn from(e: NoSuchEdgeError) -> Self {
        GraphErr::new(&e.to_string())
    }
}
