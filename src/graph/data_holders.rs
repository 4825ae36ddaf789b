use crate::graph::enums::EdgeEnd;
use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::index_store::Ideable;
use crate::graph::indices::{EdgeI, VertexI};
use std::fmt::{Debug, Display, Formatter};

type Result = std::fmt::Result;

#[derive(Clone)]
pub struct Edge<E> {
    pub id: EdgeI,
    pub tail: VertexI,
    pub head: VertexI,
    pub weight: E,
}

impl<E> Edge<E> {
    /// Gets the opposite vertex of 'v' at this edge.
    /// # Errors
    /// If 'v' is not adjacent to the edge, an error is yielded.
    pub fn get_other(&self, v: VertexI) -> GraphResult<VertexI> {
        if v == self.tail {
            Ok(self.head)
        } else if v == self.head {
            Ok(self.tail)
        } else {
            GraphErr::new_err(&format!(
                "The given vertex {} is not adjacent to the edge {}.",
                v, self.id
            ))
        }
    }

    /// Returns the specified endvertex of this edge.
    pub fn get_vertex(&self, end: EdgeEnd) -> VertexI {
        match end {
            EdgeEnd::Head => self.head,
            EdgeEnd::Tail => self.tail,
        }
    }

    pub fn endpoints(&self) -> (VertexI, VertexI) {
        (self.tail, self.head)
    }
}

impl<E> Ideable<EdgeI> for Edge<E> {
    fn get_id(&self) -> EdgeI {
        self.id
    }
    fn set_id(&mut self, id: EdgeI) {
        self.id = id
    }
}

impl<E> Display for Edge<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.id)
    }
}

impl<E> Debug for Edge<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{:?}: {:?} ==> {:?}", self.id, self.tail, self.head)
    }
}

#[derive(Clone)]
pub struct Vertex<N> {
    pub id: VertexI,
    pub neighbors: Vec<NbVertex>,
    pub weight: N,
}

impl<N> Vertex<N> {
    pub fn has_nb(&self, other: VertexI) -> bool {
        self.neighbors.iter().any(|nb| nb.other == other)
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

impl<N> Ideable<VertexI> for Vertex<N> {
    fn get_id(&self) -> VertexI {
        self.id
    }
    fn set_id(&mut self, id: VertexI) {
        self.id = id
    }
}

impl<N> Display for Vertex<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.id)
    }
}

impl<N> Debug for Vertex<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: ", self.id)?;
        for nb in self.neighbors.iter() {
            write!(f, "{:?} . ", nb.other)?;
        }
        Ok(())
    }
}

/// Entry of a neighborhood list: the neighbor, the connecting edge and the end of that edge the
/// neighbor sits at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NbVertex {
    pub other: VertexI,
    pub edge: EdgeI,
    pub end: EdgeEnd,
}
