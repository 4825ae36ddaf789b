//! Vertex separators: a set S whose removal leaves two sides A and B without edges between them.

use crate::error::{ColoringError, ColoringResult};
use crate::graph::indices::VertexI;
use crate::graph::Graph;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

pub mod connected;
pub mod context;
pub mod planar;
pub mod simple;

pub use planar::PlanarSeparator;
pub use simple::SimpleSeparator;

/// Partition of the vertices into separator, subset A and subset B; each list is sorted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Separator {
    pub separator: Vec<VertexI>,
    pub subset_a: Vec<VertexI>,
    pub subset_b: Vec<VertexI>,
}

impl Separator {
    pub fn new<S, A, B>(separator: S, subset_a: A, subset_b: B) -> Separator
    where
        S: IntoIterator<Item = VertexI>,
        A: IntoIterator<Item = VertexI>,
        B: IntoIterator<Item = VertexI>,
    {
        Separator {
            separator: separator.into_iter().sorted().collect(),
            subset_a: subset_a.into_iter().sorted().collect(),
            subset_b: subset_b.into_iter().sorted().collect(),
        }
    }

    pub fn empty() -> Separator {
        Separator {
            separator: Vec::new(),
            subset_a: Vec::new(),
            subset_b: Vec::new(),
        }
    }

    /// Checks that the three sets partition the vertices of 'graph' and that no edge joins A
    /// and B. With 'bounded', both sides must also hold at most two thirds of the vertices.
    pub fn validate<N, E>(&self, graph: &Graph<N, E>, bounded: bool) -> ColoringResult<()> {
        let n = graph.vertex_count();
        let all = self
            .separator
            .iter()
            .chain(&self.subset_a)
            .chain(&self.subset_b)
            .copied()
            .collect_vec();
        let distinct: HashSet<VertexI> = all.iter().copied().collect();
        if all.len() != n || distinct.len() != n || !all.iter().all(|&v| graph.is_valid_vertex(v)) {
            return ColoringError::invariant_err(&format!(
                "separator sets do not partition the {} vertices ({} listed, {} distinct)",
                n,
                all.len(),
                distinct.len()
            ));
        }

        let side_a: HashSet<VertexI> = self.subset_a.iter().copied().collect();
        let side_b: HashSet<VertexI> = self.subset_b.iter().copied().collect();
        if let Some(e) = graph.edges().find(|e| {
            (side_a.contains(&e.tail) && side_b.contains(&e.head))
                || (side_b.contains(&e.tail) && side_a.contains(&e.head))
        }) {
            return ColoringError::invariant_err(&format!(
                "edge {} -- {} joins both sides of a separator",
                e.tail, e.head
            ));
        }

        if bounded && (3 * self.subset_a.len() > 2 * n || 3 * self.subset_b.len() > 2 * n) {
            return ColoringError::invariant_err(&format!(
                "separator sides of {} and {} exceed two thirds of {}",
                self.subset_a.len(),
                self.subset_b.len(),
                n
            ));
        }
        Ok(())
    }
}

impl Display for Separator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let list = |vs: &[VertexI]| vs.iter().map(|v| v.0.to_string()).join(" ");
        writeln!(f, "separator ({}): {}", self.separator.len(), list(&self.separator))?;
        writeln!(f, "subset A ({}): {}", self.subset_a.len(), list(&self.subset_a))?;
        write!(f, "subset B ({}): {}", self.subset_b.len(), list(&self.subset_b))
    }
}

pub trait SeparatorFinder {
    fn find<N, E>(&self, graph: &Graph<N, E>) -> ColoringResult<Separator>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparatorKind {
    Simple,
    Planar,
}

impl SeparatorKind {
    pub fn find<N, E>(&self, graph: &Graph<N, E>) -> ColoringResult<Separator> {
        match self {
            SeparatorKind::Simple => SimpleSeparator.find(graph),
            SeparatorKind::Planar => PlanarSeparator.find(graph),
        }
    }
}

impl Default for SeparatorKind {
    fn default() -> Self {
        SeparatorKind::Planar
    }
}

/// Splits 'pieces' into two sides: pieces go to A, largest first, until A holds more than a
/// third of 'n' vertices; the rest go to B.
pub fn combine_pieces(n: usize, pieces: Vec<Vec<VertexI>>) -> (Vec<VertexI>, Vec<VertexI>) {
    let mut a = Vec::new();
    let mut b = Vec::new();
    for piece in pieces.into_iter().sorted_by(|x, y| y.len().cmp(&x.len())) {
        if a.is_empty() || 3 * a.len() <= n {
            a.extend(piece);
        } else {
            b.extend(piece);
        }
    }
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::path;

    fn vs(ids: &[usize]) -> Vec<VertexI> {
        ids.iter().map(|&i| VertexI(i)).collect()
    }

    #[test]
    fn test_combine_pieces() {
        let (a, b) = combine_pieces(10, vec![vs(&[0, 1]), vs(&[2, 3, 4, 5]), vs(&[6])]);
        assert_eq!(a, vs(&[2, 3, 4, 5]));
        assert_eq!(b, vs(&[0, 1, 6]));

        let (a, b) = combine_pieces(9, vec![vs(&[0, 1]), vs(&[2]), vs(&[3, 4])]);
        assert_eq!(a.len(), 4);
        assert_eq!(b, vs(&[2]));

        let (a, b) = combine_pieces(0, vec![]);
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn test_validate() {
        let g = path(5);
        let good = Separator::new(vs(&[2]), vs(&[0, 1]), vs(&[3, 4]));
        assert!(good.validate(&g, true).is_ok());

        let crossing = Separator::new(vs(&[3]), vs(&[0, 1]), vs(&[2, 4]));
        assert!(crossing.validate(&g, false).is_err());

        let missing = Separator::new(vs(&[2]), vs(&[0]), vs(&[3, 4]));
        assert!(missing.validate(&g, false).is_err());

        let unbalanced = Separator::new(vs(&[4]), vs(&[0, 1, 2, 3]), vs(&[]));
        assert!(unbalanced.validate(&g, false).is_ok());
        assert!(unbalanced.validate(&g, true).is_err());
    }

    #[test]
    fn test_display() {
        let s = Separator::new(vs(&[2]), vs(&[1, 0]), vs(&[]));
        assert_eq!(format!("{}", s), "separator (1): 2\nsubset A (2): 0 1\nsubset B (0): ");
    }
}
