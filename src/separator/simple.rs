use crate::error::ColoringResult;
use crate::graph::Graph;
use crate::separator::{Separator, SeparatorFinder};
use std::collections::HashSet;
use tracing::trace;

/// Cuts the lowest-index vertex off by taking its neighborhood as separator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleSeparator;

impl SeparatorFinder for SimpleSeparator {
    fn find<N, E>(&self, graph: &Graph<N, E>) -> ColoringResult<Separator> {
        let v = match graph.vertex_indices().next() {
            Some(v) => v,
            None => return Ok(Separator::empty()),
        };
        let nbs: HashSet<_> = graph.neighbors(v)?.collect();
        let rest = graph
            .vertex_indices()
            .filter(|w| *w != v && !nbs.contains(w))
            .collect::<Vec<_>>();
        trace!("isolating {} behind {} neighbors", v, nbs.len());
        let separator = Separator::new(nbs, vec![v], rest);
        separator.validate(graph, false)?;
        Ok(separator)
    }
}
