//! Combinatorial embeddings: rotation systems, the faces they induce and triangulations.

use crate::graph::enums::ClockDirection;
use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::indices::VertexI;
use crate::graph::Graph;
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

pub mod faces;
pub mod triangulation;

/// Cyclic order of the neighbors around every vertex. Walking a rotation list forwards is
/// `ClockDirection::CW`.
#[derive(Clone, Default)]
pub struct RotationSystem {
    rotations: HashMap<VertexI, Vec<VertexI>>,
    positions: HashMap<(VertexI, VertexI), usize>,
}

impl RotationSystem {
    pub fn new() -> RotationSystem {
        RotationSystem {
            rotations: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    /// Builds a rotation system from explicit neighbor orders.
    /// # Errors
    /// Fails if a vertex is listed twice or a neighbor repeats within one order.
    pub fn from_orders<I>(orders: I) -> GraphResult<RotationSystem>
    where
        I: IntoIterator<Item = (VertexI, Vec<VertexI>)>,
    {
        let mut rot = RotationSystem::new();
        for (v, order) in orders {
            if rot.rotations.contains_key(&v) {
                return GraphErr::new_err(&format!("Rotation of {} given twice.", v));
            }
            rot.add_vertex(v);
            for (i, &u) in order.iter().enumerate() {
                if rot.positions.insert((v, u), i).is_some() {
                    return GraphErr::new_err(&format!("{} appears twice around {}.", u, v));
                }
            }
            rot.rotations.insert(v, order);
        }
        Ok(rot)
    }

    pub fn add_vertex(&mut self, v: VertexI) {
        self.rotations.entry(v).or_insert_with(Vec::new);
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexI> + '_ {
        self.rotations.keys().copied().sorted()
    }

    pub fn vertex_count(&self) -> usize {
        self.rotations.len()
    }

    pub fn rotation(&self, v: VertexI) -> GraphResult<&[VertexI]> {
        self.rotations
            .get(&v)
            .map(|r| r.as_slice())
            .ok_or_else(|| GraphErr::new(&format!("{} has no rotation.", v)))
    }

    pub fn contains(&self, v: VertexI, u: VertexI) -> bool {
        self.positions.contains_key(&(v, u))
    }

    /// Neighbor following 'u' around 'v' in the given direction.
    pub fn next(&self, v: VertexI, u: VertexI, direction: ClockDirection) -> GraphResult<VertexI> {
        let rotation = self.rotation(v)?;
        let pos = *self
            .positions
            .get(&(v, u))
            .ok_or_else(|| GraphErr::new(&format!("{} is not around {}.", u, v)))?;
        let len = rotation.len();
        Ok(match direction {
            ClockDirection::CW => rotation[(pos + 1) % len],
            ClockDirection::CCW => rotation[(pos + len - 1) % len],
        })
    }

    /// Places 'new' directly after 'pred' in the rotation of 'v'.
    pub fn insert_after(&mut self, v: VertexI, pred: VertexI, new: VertexI) -> GraphResult<()> {
        if self.contains(v, new) {
            return GraphErr::new_err(&format!("{} is already around {}.", new, v));
        }
        let pos = *self
            .positions
            .get(&(v, pred))
            .ok_or_else(|| GraphErr::new(&format!("{} is not around {}.", pred, v)))?;
        let rotation = self
            .rotations
            .get_mut(&v)
            .ok_or_else(|| GraphErr::new(&format!("{} has no rotation.", v)))?;
        rotation.insert(pos + 1, new);
        for (i, &u) in rotation.iter().enumerate().skip(pos + 1) {
            self.positions.insert((v, u), i);
        }
        Ok(())
    }

    /// Checks that every vertex of 'graph' is rotated through exactly its neighbors.
    pub fn check_matches<N, E>(&self, graph: &Graph<N, E>) -> GraphResult<()> {
        if self.rotations.len() != graph.vertex_count() {
            return GraphErr::new_err(&format!(
                "Rotation system covers {} vertices, graph has {}.",
                self.rotations.len(),
                graph.vertex_count()
            ));
        }
        for vertex in graph.vertices() {
            let rotation = self.rotation(vertex.id)?;
            if rotation.len() != vertex.degree()
                || vertex.neighbors.iter().any(|nb| !self.contains(vertex.id, nb.other))
            {
                return GraphErr::new_err(&format!(
                    "Rotation of {} does not match its neighborhood.",
                    vertex.id
                ));
            }
        }
        Ok(())
    }
}

impl Debug for RotationSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for v in self.vertices() {
            writeln!(f, "{}: {:?}", v, self.rotations[&v])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::cycle;

    fn v(i: usize) -> VertexI {
        VertexI(i)
    }

    #[test]
    fn test_next_wraps_around() {
        let rot = RotationSystem::from_orders(vec![(v(0), vec![v(1), v(2), v(3)])]).unwrap();
        assert_eq!(rot.next(v(0), v(3), ClockDirection::CW).unwrap(), v(1));
        assert_eq!(rot.next(v(0), v(1), ClockDirection::CCW).unwrap(), v(3));
        assert_eq!(rot.next(v(0), v(2), ClockDirection::CW).unwrap(), v(3));
        assert!(rot.next(v(0), v(4), ClockDirection::CW).is_err());
    }

    #[test]
    fn test_insert_after_updates_positions() {
        let mut rot = RotationSystem::from_orders(vec![(v(0), vec![v(1), v(2), v(3)])]).unwrap();
        rot.insert_after(v(0), v(1), v(7)).unwrap();
        assert_eq!(rot.rotation(v(0)).unwrap(), &[v(1), v(7), v(2), v(3)]);
        assert_eq!(rot.next(v(0), v(2), ClockDirection::CCW).unwrap(), v(7));
        assert_eq!(rot.next(v(0), v(3), ClockDirection::CW).unwrap(), v(1));
        assert!(rot.insert_after(v(0), v(3), v(7)).is_err());
    }

    #[test]
    fn test_from_orders_rejects_repeats() {
        assert!(RotationSystem::from_orders(vec![(v(0), vec![v(1), v(1)])]).is_err());
    }

    #[test]
    fn test_check_matches() {
        let g = cycle(3);
        let good = RotationSystem::from_orders(vec![
            (v(0), vec![v(1), v(2)]),
            (v(1), vec![v(2), v(0)]),
            (v(2), vec![v(0), v(1)]),
        ])
        .unwrap();
        assert!(good.check_matches(&g).is_ok());

        let bad = RotationSystem::from_orders(vec![
            (v(0), vec![v(1)]),
            (v(1), vec![v(2), v(0)]),
            (v(2), vec![v(0), v(1)]),
        ])
        .unwrap();
        assert!(bad.check_matches(&g).is_err());
    }
}
