//! Lipton-Tarjan separator for connected planar graphs.

use crate::embedding::faces::Faces;
use crate::embedding::triangulation::triangulate;
use crate::error::{ColoringError, ColoringResult};
use crate::graph::indices::{FaceI, VertexI};
use crate::graph::Graph;
use crate::planarity::planar_embedding;
use crate::separator::context::SeparatorContext;
use crate::separator::{combine_pieces, Separator, SeparatorFinder};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Separator of a connected planar graph with |S| <= 2 sqrt(2n) + 1 and both sides holding at
/// most 2n/3 vertices.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectedSeparator;

/// Whether a level of 'size' vertices at distance 'dist' from the center level stays within the
/// budget |L| + 2 dist <= 2 sqrt(budget).
fn fits(size: usize, dist: usize, budget: usize) -> bool {
    let lhs = size + 2 * dist;
    lhs * lhs <= 4 * budget
}

fn level_at(levels: &[Vec<VertexI>], l: usize) -> &[VertexI] {
    levels.get(l).map(Vec::as_slice).unwrap_or(&[])
}

/// All vertices on levels from..to, clamped to the existing levels.
fn span_of(levels: &[Vec<VertexI>], from: usize, to: usize) -> Vec<VertexI> {
    let to = to.min(levels.len());
    levels[from.min(to)..to].concat()
}

impl SeparatorFinder for ConnectedSeparator {
    fn find<N, E>(&self, graph: &Graph<N, E>) -> ColoringResult<Separator> {
        let n = graph.vertex_count();
        let root = match graph.vertex_indices().next() {
            Some(v) => v,
            None => return Ok(Separator::empty()),
        };
        let ctx = SeparatorContext::bfs(graph, root)?;
        let levels = ctx.levels();
        if levels.iter().map(Vec::len).sum::<usize>() != n {
            return ColoringError::invariant_err("connected separator applied to a disconnected graph");
        }
        let level = |l: usize| level_at(levels, l);
        let span = |from: usize, to: usize| span_of(levels, from, to);

        let mut k = 0;
        let mut l1 = 0;
        for (i, lvl) in levels.iter().enumerate() {
            k += lvl.len();
            if 2 * k >= n {
                l1 = i;
                break;
            }
        }

        if level(l1).len().pow(2) <= 8 * n {
            debug!("level {} of {} separates {} vertices", l1, levels.len(), n);
            let (a, b) = combine_pieces(n, vec![span(0, l1), span(l1 + 1, levels.len())]);
            return Ok(Separator::new(level(l1).to_vec(), a, b));
        }

        let l0 = (0..=l1).rev().find(|&l| fits(level(l).len(), l1 - l, k));
        let l2 = (l1 + 1..levels.len())
            .find(|&l| fits(level(l).len(), l - l1 - 1, n - k))
            .unwrap_or_else(|| levels.len());
        let start = l0.map_or(0, |l| l + 1);

        let above = l0.map_or_else(Vec::new, |l| span(0, l));
        let middle = span(start, l2);
        let below = span(l2 + 1, levels.len());
        let mut separator = l0.map_or_else(Vec::new, |l| level(l).to_vec());
        separator.extend_from_slice(level(l2));
        debug!(
            "levels {:?} and {} bound a middle of {} out of {}",
            l0,
            l2,
            middle.len(),
            n
        );

        if 3 * middle.len() <= 2 * n {
            let (a, b) = combine_pieces(n, vec![above, middle, below]);
            return Ok(Separator::new(separator, a, b));
        }

        match shrink_middle(graph, &ctx, l0.is_some(), start, l2, &middle, n)? {
            Some(split) => {
                separator.extend(split.cycle);
                let (a, b) = combine_pieces(n, vec![above, below, split.inside, split.outside]);
                Ok(Separator::new(separator, a, b))
            }
            None => {
                separator.extend(middle);
                let (a, b) = combine_pieces(n, vec![above, below]);
                Ok(Separator::new(separator, a, b))
            }
        }
    }
}

/// Result of splitting the middle levels along a fundamental cycle.
struct CycleSplit {
    cycle: Vec<VertexI>,
    inside: Vec<VertexI>,
    outside: Vec<VertexI>,
}

/// Rooted spanning tree of the dual graph with preorder intervals.
struct DualTree {
    parent: Vec<Option<usize>>,
    tin: Vec<usize>,
    tout: Vec<usize>,
}

impl DualTree {
    fn rooted(adj: &[Vec<(usize, VertexI, VertexI)>], root: usize) -> ColoringResult<DualTree> {
        let count = adj.len();
        let mut tree = DualTree {
            parent: vec![None; count],
            tin: vec![usize::MAX; count],
            tout: vec![0; count],
        };
        let mut clock = 0;
        let mut stack = vec![(root, false)];
        while let Some((f, done)) = stack.pop() {
            if done {
                tree.tout[f] = clock;
                continue;
            }
            tree.tin[f] = clock;
            clock += 1;
            stack.push((f, true));
            for &(g, _, _) in adj[f].iter().rev() {
                if g != root && tree.tin[g] == usize::MAX && tree.parent[f] != Some(g) {
                    if tree.parent[g].is_some() {
                        return ColoringError::invariant_err("dual of the non-tree edges has a cycle");
                    }
                    tree.parent[g] = Some(f);
                    stack.push((g, false));
                }
            }
        }
        if clock != count {
            return ColoringError::invariant_err("dual of the non-tree edges is not connected");
        }
        Ok(tree)
    }

    fn contains(&self, top: usize, f: usize) -> bool {
        self.tin[top] <= self.tin[f] && self.tin[f] < self.tout[top]
    }

    fn children<'a>(
        &'a self,
        adj: &'a [Vec<(usize, VertexI, VertexI)>],
        f: usize,
    ) -> impl Iterator<Item = &'a (usize, VertexI, VertexI)> + 'a {
        adj[f].iter().filter(move |(g, _, _)| self.parent[*g] == Some(f))
    }
}

fn face_index(faces: &Faces, u: VertexI, v: VertexI) -> ColoringResult<usize> {
    faces
        .face_of(u, v)
        .map(|f: FaceI| f.0)
        .ok_or_else(|| ColoringError::Invariant(format!("no face next to {} -> {}", u, v)))
}

/// Weight strictly inside the cycle of the edge {u, v} on the side formed by the faces below
/// 'top', together with the tree edges leading there.
fn inside_weight(
    tree: &SeparatorContext,
    faces: &Faces,
    dual: &DualTree,
    top: usize,
    u: VertexI,
    v: VertexI,
) -> ColoringResult<(Vec<VertexI>, usize, Vec<(VertexI, VertexI)>)> {
    let cycle = tree.fundamental_cycle(u, v)?;
    let mut weight = 0;
    let mut exits = Vec::new();
    for (from, to, w) in tree.outgoing_edge_weights(&cycle)? {
        if dual.contains(top, face_index(faces, from, to)?) {
            weight += w;
            exits.push((from, to));
        }
    }
    Ok((cycle, weight, exits))
}

/// Complex stage: contracts the levels up to l0 into a weightless root, triangulates the middle
/// levels and walks down the dual tree until the cycle encloses at most 2n/3 vertices.
/// Returns None if the reduced graph is too small to carry a cycle.
fn shrink_middle<N, E>(
    graph: &Graph<N, E>,
    ctx: &SeparatorContext,
    contract: bool,
    start: usize,
    end: usize,
    middle: &[VertexI],
    n: usize,
) -> ColoringResult<Option<CycleSplit>> {
    let in_middle: HashSet<VertexI> = middle.iter().copied().collect();
    let mut reduced: Graph<(), ()> = Graph::new();
    for &v in middle {
        reduced.insert_vertex(v, ())?;
    }
    for e in graph.edges() {
        if in_middle.contains(&e.tail) && in_middle.contains(&e.head) {
            reduced.add_edge(e.tail, e.head, ())?;
        }
    }

    let mut parents = HashMap::new();
    let mut weights = HashMap::new();
    let contracted = if contract {
        let x = VertexI(graph.max_vertex_index().map_or(0, |v| v.0 + 1));
        reduced.insert_vertex(x, ())?;
        weights.insert(x, 0);
        for &v in &ctx.levels()[start] {
            reduced.add_edge(x, v, ())?;
            parents.insert(v, x);
        }
        Some(x)
    } else {
        None
    };
    for &v in middle {
        let d = ctx.depth(v)?;
        if d > start && d < end {
            let p = ctx.parent(v)?.ok_or_else(|| {
                ColoringError::Invariant(format!("{} below the first middle level has no parent", v))
            })?;
            parents.insert(v, p);
        }
    }
    let tree_root = contracted.unwrap_or_else(|| ctx.root());
    let tree = SeparatorContext::from_parents(tree_root, &parents, &weights)?;

    if reduced.vertex_count() < 3 {
        return Ok(None);
    }
    let rotation = planar_embedding(&reduced)?
        .ok_or_else(|| ColoringError::invariant("reduced graph lost planarity"))?;
    let triangulation = triangulate(&reduced, &rotation, |_, _| ())?;
    let faces = &triangulation.faces;
    trace!(
        "reduced graph of {} vertices triangulated into {} faces",
        reduced.vertex_count(),
        faces.face_count()
    );

    let mut adj = vec![Vec::new(); faces.face_count()];
    let mut first = None;
    for e in triangulation.graph.edges() {
        if tree.is_tree_edge(e.tail, e.head) {
            continue;
        }
        let f = face_index(faces, e.tail, e.head)?;
        let g = face_index(faces, e.head, e.tail)?;
        adj[f].push((g, e.tail, e.head));
        adj[g].push((f, e.head, e.tail));
        first.get_or_insert((e.tail, e.head));
    }
    let (a, b) = match first {
        Some(edge) => edge,
        None => return Ok(None),
    };

    let total = tree.total_weight();
    let cycle_weight = |cycle: &[VertexI]| -> ColoringResult<usize> {
        cycle.iter().map(|&v| tree.weight(v)).sum()
    };

    let f = face_index(faces, a, b)?;
    let g = face_index(faces, b, a)?;
    let mut dual = DualTree::rooted(&adj, f)?;
    let (mut cycle, mut inside, mut exits) = inside_weight(&tree, faces, &dual, g, a, b)?;
    let mut top = g;
    let outside = total.saturating_sub(inside + cycle_weight(&cycle)?);
    if inside < outside {
        dual = DualTree::rooted(&adj, g)?;
        let (c, w, x) = inside_weight(&tree, faces, &dual, f, a, b)?;
        cycle = c;
        inside = w;
        exits = x;
        top = f;
    }

    while 3 * inside > 2 * n {
        let mut best: Option<(usize, Vec<VertexI>, usize, Vec<(VertexI, VertexI)>)> = None;
        for &(child, u, v) in dual.children(&adj, top) {
            let (c, w, x) = inside_weight(&tree, faces, &dual, child, u, v)?;
            if best.as_ref().map_or(true, |(_, _, bw, _)| w > *bw) {
                best = Some((child, c, w, x));
            }
        }
        match best {
            Some((child, c, w, x)) => {
                trace!("descending to face {} enclosing {}", child, w);
                top = child;
                cycle = c;
                inside = w;
                exits = x;
            }
            None => break,
        }
    }

    let on_cycle: HashSet<VertexI> = cycle.iter().copied().collect();
    let mut interior = HashSet::new();
    for (from, to) in exits {
        interior.extend(tree.vertices_behind(from, to)?);
    }
    let keep = |v: &VertexI| Some(*v) != contracted;
    let outside = triangulation
        .graph
        .vertex_indices()
        .filter(|v| !on_cycle.contains(v) && !interior.contains(v) && keep(v))
        .collect_vec();
    debug!(
        "cycle of {} splits the middle into {} inside and {} outside",
        cycle.len(),
        interior.len(),
        outside.len()
    );

    Ok(Some(CycleSplit {
        cycle: cycle.into_iter().filter(keep).collect(),
        inside: interior.into_iter().filter(keep).collect(),
        outside,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::{cycle, grid, path, random_planar, wheel, SimpleGraph};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn check(g: &SimpleGraph) -> Separator {
        let s = ConnectedSeparator.find(g).unwrap();
        let n = g.vertex_count();
        s.validate(g, true).unwrap();
        let bound = 2.0 * (2.0 * n as f64).sqrt() + 1.0;
        assert!(s.separator.len() as f64 <= bound, "{} > {}", s.separator.len(), bound);
        s
    }

    #[test]
    fn test_path_splits_in_the_middle() {
        let s = check(&path(9));
        assert_eq!(s.separator.len(), 1);
    }

    #[test]
    fn test_small_graphs() {
        check(&path(1));
        check(&path(2));
        check(&cycle(3));
        check(&wheel(8));
    }

    #[test]
    fn test_wheel_needs_the_cycle_stage() {
        // the rim is one oversized level, the hub is contracted away
        let s = check(&wheel(30));
        assert_eq!(s.separator.len(), 3);
        assert!(s.separator.contains(&VertexI(0)));
    }

    #[test]
    fn test_grids() {
        for size in &[3, 5, 8, 12, 20] {
            check(&grid(*size, *size));
        }
        check(&grid(2, 30));
    }

    #[test]
    fn test_random_triangulations_need_cycles() {
        let mut rng = StdRng::seed_from_u64(23);
        for n in &[30, 80, 200] {
            let g = random_planar(*n, 1.0, &mut rng);
            check(&g);
        }
    }

    #[test]
    fn test_random_connected_planar_graphs() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            let g = random_planar(120, 0.7, &mut rng);
            let largest = g.connected_components().unwrap().remove(0);
            let sub = g.induced_subgraph(&largest).unwrap();
            check(&sub);
        }
    }

    #[test]
    fn test_disconnected_rejected() {
        let mut g = path(3);
        g.add_vertex(());
        assert!(ConnectedSeparator.find(&g).is_err());
    }
}
