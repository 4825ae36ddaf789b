use crate::coloring::brute_force::BruteForceColorer;
use crate::coloring::{Coloring, RestrictedColors};
use crate::error::{ColoringError, ColoringResult};
use crate::graph::generators::SimpleGraph;
use crate::graph::Graph;
use crate::separator::SeparatorKind;
use tracing::{debug, trace};

/// Divide and conquer three-coloring: parts with at most sqrt(n) vertices are searched
/// exhaustively, larger parts are split along a separator whose colorings are tried in turn.
pub struct RecursiveColorer<'g, N, E> {
    graph: &'g Graph<N, E>,
    separator: SeparatorKind,
    base_size: f64,
}

impl<'g, N, E> RecursiveColorer<'g, N, E> {
    pub fn new(graph: &'g Graph<N, E>, separator: SeparatorKind) -> RecursiveColorer<'g, N, E> {
        RecursiveColorer {
            graph,
            separator,
            base_size: (graph.vertex_count() as f64).sqrt(),
        }
    }

    pub fn color(&self) -> ColoringResult<Option<Coloring>> {
        let skeleton = self.graph.map_weights(|_| (), |_| ());
        self.color_part(&skeleton, &RestrictedColors::new(), 0)
    }

    fn color_part(
        &self,
        part: &SimpleGraph,
        restricted: &RestrictedColors,
        depth: usize,
    ) -> ColoringResult<Option<Coloring>> {
        let n = part.vertex_count();
        if n as f64 <= self.base_size {
            trace!("searching {} vertices exhaustively at depth {}", n, depth);
            return Ok(BruteForceColorer::new(part, restricted)?.first_coloring());
        }

        let split = self.separator.find(part)?;
        if split.subset_a.len() == n || split.subset_b.len() == n {
            return Err(ColoringError::Invariant(format!(
                "separator of {} vertices leaves a side of the same size",
                n
            )));
        }
        debug!(
            "depth {}: {} vertices split by {} into {} and {}",
            depth,
            n,
            split.separator.len(),
            split.subset_a.len(),
            split.subset_b.len()
        );

        let separator_graph = part.induced_subgraph(&split.separator)?;
        let side_a = part.induced_subgraph(&split.subset_a)?;
        let side_b = part.induced_subgraph(&split.subset_b)?;
        let candidates = BruteForceColorer::new(&separator_graph, &restricted.restrict(&split.separator))?;

        for candidate in candidates.colorings() {
            let merged = restricted.merge(&RestrictedColors::around(self.graph, &candidate)?);
            if merged.blocks_any(&split.subset_a) || merged.blocks_any(&split.subset_b) {
                continue;
            }
            let a = match self.color_part(&side_a, &merged.restrict(&split.subset_a), depth + 1)? {
                Some(a) => a,
                None => continue,
            };
            let b = match self.color_part(&side_b, &merged.restrict(&split.subset_b), depth + 1)? {
                Some(b) => b,
                None => continue,
            };
            let mut coloring = candidate;
            coloring.absorb(a);
            coloring.absorb(b);
            return Ok(Some(coloring));
        }
        trace!("no separator coloring extends at depth {}", depth);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::{cycle, grid, path, random_planar};
    use crate::graph::indices::VertexI;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_simple_separator_on_grid() {
        let g = grid(5, 4);
        let c = RecursiveColorer::new(&g, SeparatorKind::Simple).color().unwrap().unwrap();
        c.check(&g).unwrap();
    }

    #[test]
    fn test_planar_separator_on_grid() {
        let g = grid(7, 7);
        let c = RecursiveColorer::new(&g, SeparatorKind::Planar).color().unwrap().unwrap();
        c.check(&g).unwrap();
    }

    #[test]
    fn test_weights_are_ignored() {
        let mut g: Graph<String, f64> = Graph::new();
        let vs: Vec<VertexI> = (0..5).map(|i| g.add_vertex(format!("v{}", i))).collect();
        for i in 0..5 {
            g.add_edge(vs[i], vs[(i + 1) % 5], 1.5).unwrap();
        }
        let c = RecursiveColorer::new(&g, SeparatorKind::Planar).color().unwrap().unwrap();
        c.check(&g).unwrap();
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn test_agrees_with_brute_force_on_small_graphs() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            let g = random_planar(9, 0.6, &mut rng);
            let exact = BruteForceColorer::new(&g, &RestrictedColors::new())
                .unwrap()
                .first_coloring();
            for kind in &[SeparatorKind::Simple, SeparatorKind::Planar] {
                let c = RecursiveColorer::new(&g, *kind).color().unwrap();
                assert_eq!(c.is_some(), exact.is_some());
                if let Some(c) = c {
                    c.check(&g).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_odd_cycles_and_paths() {
        for g in vec![cycle(9), cycle(12), path(20)] {
            let c = RecursiveColorer::new(&g, SeparatorKind::Simple).color().unwrap().unwrap();
            c.check(&g).unwrap();
        }
    }
}
