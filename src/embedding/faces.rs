use crate::embedding::RotationSystem;
use crate::graph::enums::ClockDirection;
use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::indices::{EdgeI, FaceI, VertexI};
use crate::graph::Graph;
use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};

/// Directed half of an edge. It runs from 'vertex' to 'target' along the boundary of 'face'.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HalfEdge {
    pub vertex: VertexI,
    pub target: VertexI,
    pub edge: EdgeI,
    pub face: FaceI,
    pub next: usize,
    pub prev: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub id: FaceI,
    pub first: usize,
    pub len: usize,
}

/// Faces of an embedded graph, stored as an arena of half-edges.
#[derive(Clone)]
pub struct Faces {
    half_edges: Vec<HalfEdge>,
    faces: Vec<Face>,
    lookup: HashMap<(VertexI, VertexI), usize>,
}

impl Faces {
    /// Traces the faces of 'graph' under the rotation system 'rot'. The half-edge after
    /// (u, v) is (v, w) where w follows u in the rotation of v.
    /// # Errors
    /// Fails if 'rot' does not fit the graph or some connected component violates Euler's formula.
    pub fn build<N, E>(graph: &Graph<N, E>, rot: &RotationSystem) -> GraphResult<Faces> {
        rot.check_matches(graph)?;

        let mut half_edges = Vec::with_capacity(2 * graph.edge_count());
        let mut lookup = HashMap::new();
        for e in graph.edges() {
            for &(a, b) in &[(e.tail, e.head), (e.head, e.tail)] {
                lookup.insert((a, b), half_edges.len());
                half_edges.push(HalfEdge {
                    vertex: a,
                    target: b,
                    edge: e.id,
                    face: FaceI(usize::MAX),
                    next: usize::MAX,
                    prev: usize::MAX,
                });
            }
        }

        let mut faces = Vec::new();
        for start in 0..half_edges.len() {
            if half_edges[start].next != usize::MAX {
                continue;
            }
            let id = FaceI(faces.len());
            let mut len = 0;
            let mut cur = start;
            loop {
                let (u, v) = (half_edges[cur].vertex, half_edges[cur].target);
                let w = rot.next(v, u, ClockDirection::CW)?;
                let succ = *lookup.get(&(v, w)).ok_or_else(|| {
                    GraphErr::new(&format!("Half-edge {} -> {} is missing.", v, w))
                })?;
                if half_edges[succ].prev != usize::MAX {
                    return GraphErr::new_err("Face successor relation is not a bijection.");
                }
                half_edges[cur].face = id;
                half_edges[cur].next = succ;
                half_edges[succ].prev = cur;
                len += 1;
                cur = succ;
                if cur == start {
                    break;
                }
            }
            faces.push(Face {
                id,
                first: start,
                len,
            });
        }

        let result = Faces {
            half_edges,
            faces,
            lookup,
        };
        result.check_euler(graph)?;
        Ok(result)
    }

    fn check_euler<N, E>(&self, graph: &Graph<N, E>) -> GraphResult<()> {
        for component in graph.connected_components()? {
            let members: HashSet<VertexI> = component.iter().copied().collect();
            let component_half_edges = self
                .half_edges
                .iter()
                .filter(|h| members.contains(&h.vertex))
                .collect_vec();
            if component_half_edges.is_empty() {
                continue;
            }
            let v = component.len() as isize;
            let e = (component_half_edges.len() / 2) as isize;
            let f = component_half_edges.iter().map(|h| h.face).unique().count() as isize;
            if v - e + f != 2 {
                return GraphErr::new_err(&format!(
                    "Embedding is not planar: component of {} has V - E + F = {}.",
                    component[0],
                    v - e + f
                ));
            }
        }
        Ok(())
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter()
    }

    pub fn face(&self, f: FaceI) -> GraphResult<&Face> {
        self.faces
            .get(f.0)
            .ok_or_else(|| GraphErr::new(&format!("No face {}.", f)))
    }

    pub fn half_edge(&self, i: usize) -> &HalfEdge {
        &self.half_edges[i]
    }

    /// Face to whose boundary the half-edge (u, v) belongs.
    pub fn face_of(&self, u: VertexI, v: VertexI) -> Option<FaceI> {
        self.lookup.get(&(u, v)).map(|&i| self.half_edges[i].face)
    }

    /// Half-edges of 'f' in boundary order.
    pub fn boundary(&self, f: FaceI) -> GraphResult<Vec<&HalfEdge>> {
        let face = self.face(f)?;
        let mut result = Vec::with_capacity(face.len);
        let mut cur = face.first;
        for _ in 0..face.len {
            result.push(&self.half_edges[cur]);
            cur = self.half_edges[cur].next;
        }
        Ok(result)
    }

    /// Vertex walk around 'f'; a vertex appears once per angle it has in the face.
    pub fn vertices(&self, f: FaceI) -> GraphResult<Vec<VertexI>> {
        Ok(self.boundary(f)?.iter().map(|h| h.vertex).collect())
    }

    pub fn is_triangulation(&self) -> bool {
        self.faces.iter().all(|f| f.len == 3)
    }
}

impl Debug for Faces {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for face in &self.faces {
            write!(f, "{}: ", face.id)?;
            let mut cur = face.first;
            for _ in 0..face.len {
                write!(f, "{:?} ", self.half_edges[cur].vertex)?;
                cur = self.half_edges[cur].next;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::{complete, cycle, grid, path, SimpleGraph};
    use crate::planarity::planar_embedding;

    fn faces_of(g: &SimpleGraph) -> Faces {
        let rot = planar_embedding(g).unwrap().unwrap();
        Faces::build(g, &rot).unwrap()
    }

    #[test]
    fn test_k4_has_four_triangles() {
        let faces = faces_of(&complete(4));
        assert_eq!(faces.face_count(), 4);
        assert_eq!(faces.half_edge_count(), 12);
        assert!(faces.is_triangulation());
    }

    #[test]
    fn test_ring_has_two_faces() {
        let faces = faces_of(&cycle(10));
        assert_eq!(faces.face_count(), 2);
        assert!(faces.faces().all(|f| f.len == 10));
        assert!(!faces.is_triangulation());
    }

    #[test]
    fn test_tree_has_one_face_visiting_leaves_once() {
        let g = path(4);
        let faces = faces_of(&g);
        assert_eq!(faces.face_count(), 1);
        let walk = faces.vertices(FaceI(0)).unwrap();
        assert_eq!(walk.len(), 6);
        assert_eq!(walk.iter().filter(|&&v| v == VertexI(0)).count(), 1);
        assert_eq!(walk.iter().filter(|&&v| v == VertexI(1)).count(), 2);
    }

    #[test]
    fn test_every_half_edge_in_exactly_one_face() {
        let g = grid(4, 5);
        let faces = faces_of(&g);
        assert_eq!(faces.half_edge_count(), 2 * g.edge_count());
        let total: usize = faces.faces().map(|f| f.len).sum();
        assert_eq!(total, faces.half_edge_count());
        assert_eq!(g.vertex_count() as isize - g.edge_count() as isize + faces.face_count() as isize, 2);
        for e in g.edges() {
            assert!(faces.face_of(e.tail, e.head).is_some());
            assert!(faces.face_of(e.head, e.tail).is_some());
        }
        let rebuilt = Faces::build(&g, &planar_embedding(&g).unwrap().unwrap()).unwrap();
        assert_eq!(rebuilt.face_count(), faces.face_count());
        assert_eq!(rebuilt.half_edge_count(), faces.half_edge_count());
    }

    #[test]
    fn test_next_and_prev_are_inverse() {
        let faces = faces_of(&grid(3, 3));
        for i in 0..faces.half_edge_count() {
            let h = faces.half_edge(i);
            assert_eq!(faces.half_edge(h.next).prev, i);
            assert_eq!(faces.half_edge(h.next).vertex, h.target);
            assert_eq!(faces.half_edge(h.next).face, h.face);
        }
    }

    #[test]
    fn test_non_planar_rotation_is_rejected() {
        // K4 with the rotation of a torus-like twist at one vertex
        let g = complete(4);
        let v = |i| VertexI(i);
        let rot = RotationSystem::from_orders(vec![
            (v(0), vec![v(1), v(2), v(3)]),
            (v(1), vec![v(0), v(2), v(3)]),
            (v(2), vec![v(0), v(1), v(3)]),
            (v(3), vec![v(0), v(1), v(2)]),
        ])
        .unwrap();
        assert!(Faces::build(&g, &rot).is_err());
    }

    #[test]
    fn test_disconnected_components_checked_separately() {
        let mut g = cycle(3);
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        g.add_edge(a, b, ()).unwrap();
        g.add_vertex(());
        let faces = faces_of(&g);
        assert_eq!(faces.face_count(), 3);
    }
}
