use crate::coloring::{Color, Coloring, RestrictedColors};
use crate::graph::error::GraphResult;
use crate::graph::indices::VertexI;
use crate::graph::{dense_positions, Graph};
use tracing::trace;

/// Exhaustive three-coloring search over the vertices in ascending index order.
///
/// Colors are tried in ascending order, so colorings come out in lexicographic order of the
/// vertex sequence. Vertices whose restrictions leave no color make the graph impossible.
pub struct BruteForceColorer {
    order: Vec<VertexI>,
    options: Vec<Vec<Color>>,
    /// Neighbors of each position that come earlier in the order.
    earlier: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

impl BruteForceColorer {
    pub fn new<N, E>(graph: &Graph<N, E>, restricted: &RestrictedColors) -> GraphResult<BruteForceColorer> {
        let positions = dense_positions(graph);
        let order: Vec<VertexI> = graph.vertex_indices().collect();
        let options = order.iter().map(|&v| restricted.allowed(v).collect()).collect();
        let mut earlier = vec![Vec::new(); order.len()];
        for (i, &v) in order.iter().enumerate() {
            for w in graph.neighbors(v)? {
                if positions[&w] < i {
                    earlier[i].push(positions[&w]);
                }
            }
        }
        let edges = graph
            .edges()
            .map(|e| (positions[&e.tail], positions[&e.head]))
            .collect();
        Ok(BruteForceColorer {
            order,
            options,
            earlier,
            edges,
        })
    }

    /// Whether some vertex has no allowed color at all.
    pub fn is_impossible(&self) -> bool {
        self.options.iter().any(Vec::is_empty)
    }

    /// Lazy enumeration of all proper colorings; every call starts a fresh search.
    pub fn colorings(&self) -> Colorings<'_> {
        Colorings {
            colorer: self,
            cursor: Vec::new(),
            assignment: Vec::new(),
            done: false,
        }
    }

    pub fn first_coloring(&self) -> Option<Coloring> {
        self.colorings().next()
    }

    pub fn all_colorings(&self) -> Vec<Coloring> {
        self.colorings().collect()
    }

    fn is_proper(&self, assignment: &[Color]) -> bool {
        self.edges.iter().all(|&(a, b)| assignment[a] != assignment[b])
    }
}

/// Backtracking iterator over the colorings of a `BruteForceColorer`.
pub struct Colorings<'a> {
    colorer: &'a BruteForceColorer,
    /// Next option to try per assigned position.
    cursor: Vec<usize>,
    assignment: Vec<Color>,
    done: bool,
}

impl<'a> Colorings<'a> {
    fn emit(&self) -> Coloring {
        self.colorer
            .order
            .iter()
            .copied()
            .zip(self.assignment.iter().copied())
            .collect()
    }
}

impl<'a> Iterator for Colorings<'a> {
    type Item = Coloring;

    fn next(&mut self) -> Option<Coloring> {
        if self.done {
            return None;
        }
        let colorer = self.colorer;
        let n = colorer.order.len();
        if colorer.is_impossible() {
            trace!("a vertex has all three colors restricted");
            self.done = true;
            return None;
        }
        if n == 0 {
            self.done = true;
            return Some(Coloring::new());
        }

        loop {
            let depth = self.assignment.len();
            if depth == n {
                let found = if colorer.is_proper(&self.assignment) {
                    Some(self.emit())
                } else {
                    None
                };
                self.assignment.pop();
                if found.is_some() {
                    return found;
                }
                continue;
            }

            if self.cursor.len() == depth {
                self.cursor.push(0);
            }
            let options = &colorer.options[depth];
            let mut placed = false;
            while self.cursor[depth] < options.len() {
                let color = options[self.cursor[depth]];
                self.cursor[depth] += 1;
                if colorer.earlier[depth]
                    .iter()
                    .all(|&p| self.assignment[p] != color)
                {
                    self.assignment.push(color);
                    placed = true;
                    break;
                }
            }
            if !placed {
                self.cursor.pop();
                if self.assignment.pop().is_none() {
                    self.done = true;
                    return None;
                }
            }
        }
    }
}
