use crate::error::{ColoringError, ColoringResult};
use crate::graph::Graph;
use crate::planarity::is_planar;
use crate::separator::connected::ConnectedSeparator;
use crate::separator::{combine_pieces, Separator, SeparatorFinder};
use tracing::{debug, warn};

/// Separator of an arbitrary planar graph with both sides bounded by 2n/3.
/// # Errors
/// `ColoringError::NotPlanar` if the graph has no planar embedding.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarSeparator;

impl SeparatorFinder for PlanarSeparator {
    fn find<N, E>(&self, graph: &Graph<N, E>) -> ColoringResult<Separator> {
        if !is_planar(graph)? {
            warn!("rejecting a non-planar graph with {} vertices", graph.vertex_count());
            return Err(ColoringError::NotPlanar);
        }
        let n = graph.vertex_count();
        if n == 0 {
            return Ok(Separator::empty());
        }

        let mut components = graph.connected_components()?;
        let separator = if components.len() > 1 && components.iter().all(|c| 3 * c.len() <= 2 * n) {
            debug!("{} components need no separator vertices", components.len());
            let (a, b) = combine_pieces(n, components);
            Separator::new(Vec::new(), a, b)
        } else {
            let largest = components.remove(0);
            let skeleton = graph.map_weights(|_| (), |_| ());
            let sub = skeleton.induced_subgraph(&largest)?;
            let inner = ConnectedSeparator.find(&sub)?;
            let (a, mut b) = if inner.subset_a.len() >= inner.subset_b.len() {
                (inner.subset_a, inner.subset_b)
            } else {
                (inner.subset_b, inner.subset_a)
            };
            b.extend(components.into_iter().flatten());
            Separator::new(inner.separator, a, b)
        };

        separator.validate(graph, true)?;
        debug!(
            "separator of {} splits {} into {} and {}",
            separator.separator.len(),
            n,
            separator.subset_a.len(),
            separator.subset_b.len()
        );
        Ok(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::{complete, cycle, grid, path, random_planar, SimpleGraph};
    use crate::graph::indices::VertexI;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn check(g: &SimpleGraph) -> Separator {
        let s = PlanarSeparator.find(g).unwrap();
        s.validate(g, true).unwrap();
        s
    }

    #[test]
    fn test_non_planar_rejected() {
        match PlanarSeparator.find(&complete(5)) {
            Err(ColoringError::NotPlanar) => {}
            other => panic!("expected NotPlanar, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_graph() {
        let g: SimpleGraph = Graph::new();
        assert_eq!(PlanarSeparator.find(&g).unwrap(), Separator::empty());
    }

    #[test]
    fn test_balanced_components_need_no_separator() {
        let mut g = cycle(4);
        for _ in 0..4 {
            g.add_vertex(());
        }
        g.add_edge(VertexI(4), VertexI(5), ()).unwrap();
        g.add_edge(VertexI(6), VertexI(7), ()).unwrap();
        let s = check(&g);
        assert!(s.separator.is_empty());
        assert_eq!(s.subset_a, vec![VertexI(0), VertexI(1), VertexI(2), VertexI(3)]);
        assert_eq!(s.subset_b.len(), 4);
    }

    #[test]
    fn test_dominant_component_is_separated() {
        let mut g = path(12);
        let lone = g.add_vertex(());
        let s = check(&g);
        assert!(!s.separator.is_empty());
        assert!(s.subset_b.contains(&lone));
        assert!(s.subset_a.len() >= s.subset_b.len() - 1);
    }

    #[test]
    fn test_grids() {
        for size in 1..=10 {
            let g = grid(size, size);
            let s = check(&g);
            let n = g.vertex_count() as f64;
            assert!(s.separator.len() as f64 <= 2.0 * (2.0 * n).sqrt() + 1.0);
        }
    }

    #[test]
    fn test_long_path() {
        let g = path(100_000);
        let s = PlanarSeparator.find(&g).unwrap();
        assert!(!s.separator.is_empty());
        assert_eq!(s.separator.len() + s.subset_a.len() + s.subset_b.len(), 100_000);
    }

    #[test]
    fn test_random_planar_graphs() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..15 {
            let g = random_planar(150, 0.5, &mut rng);
            check(&g);
        }
    }
}
