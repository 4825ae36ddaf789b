use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use self::data_holders::{Edge, NbVertex, Vertex};
use self::enums::EdgeEnd;
use self::error::{GraphErr, GraphResult, IndexAccessError, NoSuchEdgeError};
use self::index_store::{IndexStore, VecIndexStore};
use self::indices::{EdgeI, VertexI};

pub mod data_holders;
pub mod enums;
pub mod error;
pub mod generators;
pub mod index_store;
pub mod indices;
pub mod io;

/// Undirected simple graph with index-stable vertices and edges.
pub struct Graph<N, E> {
    vertices: VecIndexStore<VertexI, Vertex<N>>,
    edges: VecIndexStore<EdgeI, Edge<E>>,
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Graph<N, E> {
        Graph {
            vertices: VecIndexStore::new(),
            edges: VecIndexStore::new(),
        }
    }

    pub fn is_valid_vertex(&self, v: VertexI) -> bool {
        self.vertices.is_valid_index(v)
    }

    pub fn is_valid_edge(&self, e: EdgeI) -> bool {
        self.edges.is_valid_index(e)
    }

    pub fn try_vertex(&self, v: VertexI) -> Result<&Vertex<N>, IndexAccessError<VertexI>> {
        self.vertices.get(v).ok_or(IndexAccessError::new(v))
    }

    fn try_vertex_mut(&mut self, v: VertexI) -> Result<&mut Vertex<N>, IndexAccessError<VertexI>> {
        self.vertices.get_mut(v).ok_or(IndexAccessError::new(v))
    }

    pub fn try_edge(&self, e: EdgeI) -> Result<&Edge<E>, IndexAccessError<EdgeI>> {
        self.edges.get(e).ok_or(IndexAccessError::new(e))
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Vertex indices in ascending order.
    pub fn vertex_indices(&self) -> impl Iterator<Item = VertexI> + '_ {
        self.vertices.indices()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<N>> {
        self.vertices.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge<E>> {
        self.edges.values()
    }

    /// Index the next call of `add_vertex` would assign.
    pub fn next_vertex_index(&self) -> VertexI {
        self.vertices.next_index()
    }

    pub fn max_vertex_index(&self) -> Option<VertexI> {
        self.vertices.indices().last()
    }

    pub fn neighbors(&self, v: VertexI) -> GraphResult<impl Iterator<Item = VertexI> + '_> {
        Ok(self.try_vertex(v)?.neighbors.iter().map(|nb| nb.other))
    }

    pub fn degree(&self, v: VertexI) -> GraphResult<usize> {
        Ok(self.try_vertex(v)?.degree())
    }

    pub fn has_edge(&self, v1: VertexI, v2: VertexI) -> bool {
        match self.vertices.get(v1) {
            Some(v) => v.has_nb(v2),
            None => false,
        }
    }

    pub fn get_edge(&self, v1: VertexI, v2: VertexI) -> GraphResult<EdgeI> {
        let v = self.try_vertex(v1)?;
        self.try_vertex(v2)?;

        v.neighbors
            .iter()
            .find(|nb| nb.other == v2)
            .map(|nb| nb.edge)
            .ok_or_else(|| GraphErr::from(NoSuchEdgeError::new(v1, v2)))
    }

    pub fn edge_endvertex(&self, e: EdgeI, end: EdgeEnd) -> GraphResult<VertexI> {
        Ok(self.try_edge(e)?.get_vertex(end))
    }

    pub fn edge_opposite_vertex(&self, e: EdgeI, v: VertexI) -> GraphResult<VertexI> {
        self.try_edge(e)?.get_other(v)
    }

    pub fn vertex_weight(&self, v: VertexI) -> Result<&N, IndexAccessError<VertexI>> {
        Ok(&self.try_vertex(v)?.weight)
    }

    pub fn set_vertex_weight(&mut self, v: VertexI, weight: N) -> Result<(), IndexAccessError<VertexI>> {
        self.try_vertex_mut(v)?.weight = weight;
        Ok(())
    }

    pub fn edge_weight(&self, e: EdgeI) -> Result<&E, IndexAccessError<EdgeI>> {
        Ok(&self.try_edge(e)?.weight)
    }

    pub fn add_vertex(&mut self, weight: N) -> VertexI {
        self.vertices.push(Vertex {
            id: VertexI(0),
            neighbors: Vec::new(),
            weight,
        })
    }

    /// Adds a vertex under a caller chosen index.
    /// # Errors
    /// Fails if the index is already taken.
    pub fn insert_vertex(&mut self, v: VertexI, weight: N) -> GraphResult<()> {
        self.vertices.insert(
            Vertex {
                id: v,
                neighbors: Vec::new(),
                weight,
            },
            v,
        )?;
        Ok(())
    }

    /// Adds the edge {v1, v2} with v1 as tail.
    /// # Errors
    /// Fails for invalid vertices, loops and edges that are already present.
    pub fn add_edge(&mut self, v1: VertexI, v2: VertexI, weight: E) -> GraphResult<EdgeI> {
        self.try_vertex(v2)?;
        if v1 == v2 {
            return GraphErr::new_err(&format!("Loop at {} would make the graph non-simple.", v1));
        }
        if self.try_vertex(v1)?.has_nb(v2) {
            return GraphErr::new_err(&format!(
                "Edge between {} and {} is already present.",
                v1, v2
            ));
        }

        let id = self.edges.push(Edge {
            id: EdgeI(0),
            tail: v1,
            head: v2,
            weight,
        });
        self.try_vertex_mut(v1)?.neighbors.push(NbVertex {
            other: v2,
            edge: id,
            end: EdgeEnd::Head,
        });
        self.try_vertex_mut(v2)?.neighbors.push(NbVertex {
            other: v1,
            edge: id,
            end: EdgeEnd::Tail,
        });
        Ok(id)
    }

    pub fn remove_edge(&mut self, v1: VertexI, v2: VertexI) -> GraphResult<Edge<E>> {
        let e = self.get_edge(v1, v2)?;
        self.try_vertex_mut(v1)?.neighbors.retain(|nb| nb.edge != e);
        self.try_vertex_mut(v2)?.neighbors.retain(|nb| nb.edge != e);
        self.edges
            .remove(e)
            .ok_or_else(|| GraphErr::from(IndexAccessError::new(e)))
    }

    /// Removes a vertex together with all incident edges.
    pub fn remove_vertex(&mut self, v: VertexI) -> GraphResult<Vertex<N>> {
        let others = self.try_vertex(v)?.neighbors.iter().map(|nb| nb.other).collect_vec();
        for other in others {
            self.remove_edge(v, other)?;
        }
        self.vertices
            .remove(v)
            .ok_or_else(|| GraphErr::from(IndexAccessError::new(v)))
    }

    pub fn is_connected(&self) -> bool {
        match self.vertex_indices().next() {
            None => true,
            Some(v) => self
                .connected_component(v)
                .map(|c| c.len() == self.vertex_count())
                .unwrap_or(false),
        }
    }

    /// Vertices reachable from 'vertex', in ascending order.
    pub fn connected_component(&self, vertex: VertexI) -> GraphResult<Vec<VertexI>> {
        self.try_vertex(vertex)?;

        let mut visited = HashSet::new();
        let mut to_visit = vec![vertex];

        while let Some(v) = to_visit.pop() {
            if !visited.insert(v) {
                continue;
            }
            for nb in &self.try_vertex(v)?.neighbors {
                if !visited.contains(&nb.other) {
                    to_visit.push(nb.other);
                }
            }
        }

        Ok(visited.into_iter().sorted().collect())
    }

    /// All connected components, largest first; ties are ordered by their lowest vertex.
    pub fn connected_components(&self) -> GraphResult<Vec<Vec<VertexI>>> {
        let mut seen = HashSet::new();
        let mut components = Vec::new();
        for v in self.vertex_indices() {
            if seen.contains(&v) {
                continue;
            }
            let component = self.connected_component(v)?;
            seen.extend(component.iter().copied());
            components.push(component);
        }
        components.sort_by(|a, b| b.len().cmp(&a.len()));
        Ok(components)
    }

    /// Copy of this graph with a fresh weight on every vertex and edge.
    pub fn map_weights<Nn, Ee>(&self, vertex_map: impl Fn(&N) -> Nn, edge_map: impl Fn(&E) -> Ee) -> Graph<Nn, Ee> {
        let mut g = Graph::new();
        for v in self.vertices() {
            // indices are unique in the source store
            let _ = g.insert_vertex(v.id, vertex_map(&v.weight));
        }
        for e in self.edges() {
            let _ = g.add_edge(e.tail, e.head, edge_map(&e.weight));
        }
        g
    }
}

impl<N: Clone, E: Clone> Graph<N, E> {
    /// Subgraph induced by 'keep'. The vertices keep their indices, weights are cloned.
    /// # Errors
    /// Fails if 'keep' names a vertex that is not in this graph.
    pub fn induced_subgraph<'a, I>(&self, keep: I) -> GraphResult<Graph<N, E>>
    where
        I: IntoIterator<Item = &'a VertexI>,
    {
        let mut sub = Graph::new();
        for &v in keep {
            if sub.is_valid_vertex(v) {
                continue;
            }
            sub.insert_vertex(v, self.try_vertex(v)?.weight.clone())?;
        }
        for e in self.edges() {
            if sub.is_valid_vertex(e.tail) && sub.is_valid_vertex(e.head) {
                sub.add_edge(e.tail, e.head, e.weight.clone())?;
            }
        }
        Ok(sub)
    }
}

impl<N: Clone, E: Clone> Clone for Graph<N, E> {
    fn clone(&self) -> Self {
        Graph {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Graph::new()
    }
}

impl<N, E> Debug for Graph<N, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} vertices, {} edges", self.vertex_count(), self.edge_count())?;
        for v in self.vertices() {
            let nbs = v.neighbors.iter().map(|nb| nb.other).sorted().collect_vec();
            writeln!(f, "{}: {:?}", v.id, nbs)?;
        }
        Ok(())
    }
}

/// Maps every vertex of 'graph' to its position in ascending index order.
pub fn dense_positions<N, E>(graph: &Graph<N, E>) -> HashMap<VertexI, usize> {
    graph.vertex_indices().enumerate().map(|(i, v)| (v, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Graph<(), ()> {
        let mut g = Graph::new();
        let v = (0..4).map(|_| g.add_vertex(())).collect_vec();
        for i in 0..4 {
            g.add_edge(v[i], v[(i + 1) % 4], ()).unwrap();
        }
        g
    }

    #[test]
    fn test_add_edge_rejects_loops_and_duplicates() {
        let mut g = square();
        assert!(g.add_edge(VertexI(0), VertexI(0), ()).is_err());
        assert!(g.add_edge(VertexI(1), VertexI(0), ()).is_err());
        assert!(g.add_edge(VertexI(0), VertexI(9), ()).is_err());
        assert!(g.add_edge(VertexI(0), VertexI(2), ()).is_ok());
        assert_eq!(g.edge_count(), 5);
        assert_eq!(g.degree(VertexI(0)).unwrap(), 3);
    }

    #[test]
    fn test_edge_queries() {
        let g = square();
        let e = g.get_edge(VertexI(1), VertexI(2)).unwrap();
        assert_eq!(g.edge_opposite_vertex(e, VertexI(1)).unwrap(), VertexI(2));
        assert_eq!(g.edge_endvertex(e, EdgeEnd::Tail).unwrap(), VertexI(1));
        assert!(g.edge_opposite_vertex(e, VertexI(3)).is_err());
        assert!(g.get_edge(VertexI(0), VertexI(2)).is_err());
        assert!(g.has_edge(VertexI(3), VertexI(0)));
        assert!(!g.has_edge(VertexI(3), VertexI(1)));
    }

    #[test]
    fn test_remove_vertex_drops_incident_edges() {
        let mut g = square();
        g.remove_vertex(VertexI(1)).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.neighbors(VertexI(0)).unwrap().collect_vec(), vec![VertexI(3)]);
        assert!(g.is_connected());
        g.remove_edge(VertexI(2), VertexI(3)).unwrap();
        assert!(!g.is_connected());
        assert_eq!(g.add_vertex(()), VertexI(1));
    }

    #[test]
    fn test_connected_components_largest_first() {
        let mut g: Graph<(), ()> = Graph::new();
        let v = (0..6).map(|_| g.add_vertex(())).collect_vec();
        g.add_edge(v[0], v[5], ()).unwrap();
        g.add_edge(v[1], v[2], ()).unwrap();
        g.add_edge(v[2], v[3], ()).unwrap();

        let components = g.connected_components().unwrap();
        assert_eq!(
            components,
            vec![
                vec![VertexI(1), VertexI(2), VertexI(3)],
                vec![VertexI(0), VertexI(5)],
                vec![VertexI(4)]
            ]
        );
    }

    #[test]
    fn test_induced_subgraph_keeps_indices() {
        let g = square();
        let sub = g.induced_subgraph(&[VertexI(1), VertexI(2), VertexI(3)]).unwrap();
        assert_eq!(sub.vertex_indices().collect_vec(), vec![VertexI(1), VertexI(2), VertexI(3)]);
        assert_eq!(sub.edge_count(), 2);
        assert!(sub.has_edge(VertexI(2), VertexI(3)));
        assert!(!sub.is_valid_vertex(VertexI(0)));
        assert!(g.induced_subgraph(&[VertexI(8)]).is_err());
    }

    #[test]
    fn test_empty_graph() {
        let g: Graph<(), ()> = Graph::new();
        assert!(g.is_empty());
        assert!(g.is_connected());
        assert!(g.connected_components().unwrap().is_empty());
        assert_eq!(g.max_vertex_index(), None);
    }
}
