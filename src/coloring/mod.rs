//! Three-colorings of planar graphs.

use crate::error::{ColoringError, ColoringResult};
use crate::graph::error::GraphResult;
use crate::graph::indices::VertexI;
use crate::graph::Graph;
use crate::separator::SeparatorKind;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Display, Formatter};
use tracing::info;

pub mod brute_force;
pub mod recursive;

pub use brute_force::BruteForceColorer;
pub use recursive::RecursiveColorer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    First = 1,
    Second = 2,
    Third = 3,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::First, Color::Second, Color::Third];

    pub fn number(self) -> u8 {
        self as u8
    }

    fn bit(self) -> u8 {
        1 << (self.number() - 1)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Subset of the three colors.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColorSet(u8);

impl ColorSet {
    pub fn empty() -> ColorSet {
        ColorSet(0)
    }

    pub fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn with(self, color: Color) -> ColorSet {
        ColorSet(self.0 | color.bit())
    }

    pub fn union(self, other: ColorSet) -> ColorSet {
        ColorSet(self.0 | other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_full(self) -> bool {
        self.len() == Color::ALL.len()
    }

    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.iter().copied().filter(move |c| self.contains(*c))
    }
}

impl Debug for ColorSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().join(","))
    }
}

/// Assignment of colors to vertices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    colors: BTreeMap<VertexI, Color>,
}

impl Coloring {
    pub fn new() -> Coloring {
        Coloring::default()
    }

    pub fn get(&self, v: VertexI) -> Option<Color> {
        self.colors.get(&v).copied()
    }

    pub fn set(&mut self, v: VertexI, color: Color) {
        self.colors.insert(v, color);
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colored vertices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexI, Color)> + '_ {
        self.colors.iter().map(|(&v, &c)| (v, c))
    }

    pub fn absorb(&mut self, other: Coloring) {
        self.colors.extend(other.colors);
    }

    /// Whether no edge of 'graph' joins two vertices of the same color.
    pub fn is_proper<N, E>(&self, graph: &Graph<N, E>) -> bool {
        graph.edges().all(|e| match (self.get(e.tail), self.get(e.head)) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        })
    }

    /// Fails unless every vertex of 'graph', and nothing else, is colored and the coloring is
    /// proper.
    pub fn check<N, E>(&self, graph: &Graph<N, E>) -> ColoringResult<()> {
        if self.len() != graph.vertex_count() || !graph.vertex_indices().all(|v| self.get(v).is_some()) {
            return ColoringError::invariant_err(&format!(
                "coloring of {} vertices does not cover the {} vertices of the graph",
                self.len(),
                graph.vertex_count()
            ));
        }
        if let Some(e) = graph.edges().find(|e| self.get(e.tail) == self.get(e.head)) {
            return ColoringError::invariant_err(&format!(
                "edge {} -- {} has both ends colored {:?}",
                e.tail,
                e.head,
                self.get(e.tail)
            ));
        }
        Ok(())
    }
}

impl std::iter::FromIterator<(VertexI, Color)> for Coloring {
    fn from_iter<T: IntoIterator<Item = (VertexI, Color)>>(iter: T) -> Self {
        Coloring {
            colors: iter.into_iter().collect(),
        }
    }
}

impl Display for Coloring {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lines = self.iter().map(|(v, c)| format!("{}: {}", v.0, c)).join("\n");
        write!(f, "{}", lines)
    }
}

/// Colors each vertex may not take because a neighbor colored elsewhere already carries them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestrictedColors {
    forbidden: HashMap<VertexI, ColorSet>,
}

impl RestrictedColors {
    pub fn new() -> RestrictedColors {
        RestrictedColors::default()
    }

    /// Restrictions imposed by 'coloring' on the uncolored neighbors of its vertices in 'graph'.
    pub fn around<N, E>(graph: &Graph<N, E>, coloring: &Coloring) -> GraphResult<RestrictedColors> {
        let mut restricted = RestrictedColors::new();
        for (v, color) in coloring.iter() {
            for w in graph.neighbors(v)? {
                if coloring.get(w).is_none() {
                    restricted.forbid(w, color);
                }
            }
        }
        Ok(restricted)
    }

    pub fn forbid(&mut self, v: VertexI, color: Color) {
        let set = self.forbidden.entry(v).or_default();
        *set = set.with(color);
    }

    pub fn get(&self, v: VertexI) -> ColorSet {
        self.forbidden.get(&v).copied().unwrap_or_default()
    }

    /// Colors 'v' may still take, in ascending order.
    pub fn allowed(&self, v: VertexI) -> impl Iterator<Item = Color> {
        let forbidden = self.get(v);
        Color::ALL.iter().copied().filter(move |c| !forbidden.contains(*c))
    }

    /// Per-vertex union of both restrictions.
    pub fn merge(&self, other: &RestrictedColors) -> RestrictedColors {
        let mut merged = self.clone();
        for (&v, &set) in &other.forbidden {
            let entry = merged.forbidden.entry(v).or_default();
            *entry = entry.union(set);
        }
        merged
    }

    /// The restrictions of 'vertices' only.
    pub fn restrict<'a, I>(&self, vertices: I) -> RestrictedColors
    where
        I: IntoIterator<Item = &'a VertexI>,
    {
        RestrictedColors {
            forbidden: vertices
                .into_iter()
                .filter_map(|v| self.forbidden.get(v).map(|set| (*v, *set)))
                .collect(),
        }
    }

    /// Whether some vertex of 'vertices' has no color left.
    pub fn blocks_any<'a, I>(&self, vertices: I) -> bool
    where
        I: IntoIterator<Item = &'a VertexI>,
    {
        vertices.into_iter().any(|&v| self.get(v).is_full())
    }

    pub fn len(&self) -> usize {
        self.forbidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Exact search over the whole graph.
    BruteForce,
    /// Divide and conquer along separators of the given kind.
    Recursive(SeparatorKind),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Recursive(SeparatorKind::Planar)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoringConfig {
    pub strategy: Strategy,
}

/// Colors 'graph' with at most three colors.
///
/// Returns `Ok(None)` if no three-coloring exists. The graph must be simple; the planar separator
/// strategy rejects non-planar graphs with `ColoringError::NotPlanar`.
pub fn color_three<N, E>(graph: &Graph<N, E>, config: &ColoringConfig) -> ColoringResult<Option<Coloring>> {
    let coloring = match config.strategy {
        Strategy::BruteForce => BruteForceColorer::new(graph, &RestrictedColors::new())?.first_coloring(),
        Strategy::Recursive(kind) => RecursiveColorer::new(graph, kind).color()?,
    };
    match &coloring {
        Some(c) => {
            c.check(graph)?;
            info!("colored {} vertices with {:?}", c.len(), config.strategy);
        }
        None => info!("{} vertices admit no three-coloring", graph.vertex_count()),
    }
    Ok(coloring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::{complete, cycle, grid, path, wheel, SimpleGraph};

    fn v(i: usize) -> VertexI {
        VertexI(i)
    }

    fn all_strategies() -> Vec<ColoringConfig> {
        vec![
            ColoringConfig {
                strategy: Strategy::BruteForce,
            },
            ColoringConfig {
                strategy: Strategy::Recursive(SeparatorKind::Simple),
            },
            ColoringConfig::default(),
        ]
    }

    fn restrictions(entries: &[(usize, Color)]) -> RestrictedColors {
        let mut r = RestrictedColors::new();
        for &(i, c) in entries {
            r.forbid(v(i), c);
        }
        r
    }

    #[test]
    fn test_color_set() {
        let set = ColorSet::empty().with(Color::Third).with(Color::First);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Color::First) && !set.contains(Color::Second));
        assert_eq!(set.iter().collect_vec(), vec![Color::First, Color::Third]);
        assert!(set.with(Color::Second).is_full());
        assert_eq!(format!("{:?}", set), "{1,3}");
    }

    #[test]
    fn test_merge_laws() {
        let a = restrictions(&[(0, Color::First), (1, Color::Second)]);
        let b = restrictions(&[(1, Color::Third), (2, Color::First)]);
        let c = restrictions(&[(0, Color::Third), (2, Color::Second)]);
        assert_eq!(a.merge(&a), a);
        assert_eq!(a.merge(&b), b.merge(&a));
        assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
        assert_eq!(a.merge(&RestrictedColors::new()), a);

        let merged = a.merge(&b);
        assert_eq!(merged.allowed(v(1)).collect_vec(), vec![Color::First]);
        assert_eq!(merged.allowed(v(7)).count(), 3);
    }

    #[test]
    fn test_restrict_and_block() {
        let r = restrictions(&[
            (0, Color::First),
            (0, Color::Second),
            (0, Color::Third),
            (1, Color::Second),
        ]);
        assert!(r.blocks_any(&[v(0), v(1)]));
        assert!(!r.blocks_any(&[v(1), v(2)]));
        let only = r.restrict(&[v(1), v(2)]);
        assert_eq!(only.len(), 1);
        assert_eq!(only.get(v(1)), ColorSet::empty().with(Color::Second));
    }

    #[test]
    fn test_restrictions_around_coloring() {
        let g = path(4);
        let coloring: Coloring = vec![(v(1), Color::Second)].into_iter().collect();
        let r = RestrictedColors::around(&g, &coloring).unwrap();
        assert_eq!(r.get(v(0)), ColorSet::empty().with(Color::Second));
        assert_eq!(r.get(v(2)), ColorSet::empty().with(Color::Second));
        assert!(r.get(v(1)).is_empty() && r.get(v(3)).is_empty());
    }

    #[test]
    fn test_check() {
        let g = path(3);
        let good: Coloring = vec![(v(0), Color::First), (v(1), Color::Second), (v(2), Color::First)]
            .into_iter()
            .collect();
        assert!(good.check(&g).is_ok());
        assert_eq!(format!("{}", good), "0: 1\n1: 2\n2: 1");

        let clash: Coloring = vec![(v(0), Color::First), (v(1), Color::First), (v(2), Color::Second)]
            .into_iter()
            .collect();
        assert!(!clash.is_proper(&g));
        assert!(clash.check(&g).is_err());

        let partial: Coloring = vec![(v(0), Color::First)].into_iter().collect();
        assert!(partial.is_proper(&g));
        assert!(partial.check(&g).is_err());
    }

    #[test]
    fn test_trivial_graphs() {
        for config in all_strategies() {
            let empty: SimpleGraph = Graph::new();
            assert_eq!(color_three(&empty, &config).unwrap(), Some(Coloring::new()));

            let single = path(1);
            let c = color_three(&single, &config).unwrap().unwrap();
            assert_eq!(c.get(v(0)), Some(Color::First));
        }
    }

    #[test]
    fn test_not_three_colorable() {
        for config in all_strategies() {
            assert_eq!(color_three(&complete(4), &config).unwrap(), None);
            assert_eq!(color_three(&wheel(5), &config).unwrap(), None);
        }
    }

    #[test]
    fn test_colorable_families() {
        for config in all_strategies() {
            for g in vec![grid(4, 4), cycle(7), wheel(6), path(10)] {
                let c = color_three(&g, &config).unwrap().unwrap();
                c.check(&g).unwrap();
            }
        }
    }

    #[test]
    fn test_larger_grid_with_planar_separators() {
        let g = grid(8, 8);
        let c = color_three(&g, &ColoringConfig::default()).unwrap().unwrap();
        c.check(&g).unwrap();
    }

    #[test]
    fn test_grid_with_deep_search_tree() {
        let g = grid(60, 60);
        let c = color_three(&g, &ColoringConfig::default()).unwrap().unwrap();
        c.check(&g).unwrap();
        assert_eq!(c.len(), 3600);
    }

    #[test]
    fn test_non_planar_graph_rejected() {
        match color_three(&complete(5), &ColoringConfig::default()) {
            Err(ColoringError::NotPlanar) => {}
            other => panic!("expected NotPlanar, got {:?}", other),
        }
    }
}
