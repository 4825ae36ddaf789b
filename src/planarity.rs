//! Left-right planarity test.
//!
//! Follows Brandes' formulation of the de Fraysseix-Rosenstiehl criterion: a DFS orients the
//! graph and computes lowpoints, a second DFS checks the constraints between return edges with a
//! stack of conflict pairs, and a third DFS turns the resulting sides into a rotation system.

use crate::embedding::RotationSystem;
use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::{dense_positions, Graph};
use itertools::Itertools;
use std::collections::HashMap;
use tracing::trace;

/// Interval of return edges, given by its lowest and highest edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Interval {
    low: Option<usize>,
    high: Option<usize>,
}

impl Interval {
    fn single(e: usize) -> Interval {
        Interval {
            low: Some(e),
            high: Some(e),
        }
    }

    fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }

    fn conflicting(&self, b: usize, lowpt: &[usize]) -> bool {
        match self.high {
            Some(h) => lowpt[h] > lowpt[b],
            None => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ConflictPair {
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }

    fn lowest(&self, lowpt: &[usize]) -> Option<usize> {
        match (self.left.low, self.right.low) {
            (None, Some(r)) => Some(lowpt[r]),
            (Some(l), None) => Some(lowpt[l]),
            (Some(l), Some(r)) => Some(lowpt[l].min(lowpt[r])),
            (None, None) => None,
        }
    }
}

fn missing(what: &str) -> GraphErr {
    GraphErr::new(&format!("Planarity test state is missing {}.", what))
}

/// Per-vertex cyclic neighbor links used while the embedding is assembled.
#[derive(Default)]
struct HalfEdgeLinks {
    first: Vec<Option<usize>>,
    cw: HashMap<(usize, usize), usize>,
    ccw: HashMap<(usize, usize), usize>,
}

impl HalfEdgeLinks {
    fn new(n: usize) -> HalfEdgeLinks {
        HalfEdgeLinks {
            first: vec![None; n],
            cw: HashMap::new(),
            ccw: HashMap::new(),
        }
    }

    fn add_cw(&mut self, start: usize, end: usize, reference: Option<usize>) -> GraphResult<()> {
        match reference {
            None => {
                self.cw.insert((start, end), end);
                self.ccw.insert((start, end), end);
                self.first[start] = Some(end);
            }
            Some(r) => {
                let cw_ref = *self.cw.get(&(start, r)).ok_or_else(|| missing("a cw link"))?;
                self.cw.insert((start, r), end);
                self.cw.insert((start, end), cw_ref);
                self.ccw.insert((start, cw_ref), end);
                self.ccw.insert((start, end), r);
            }
        }
        Ok(())
    }

    fn add_ccw(&mut self, start: usize, end: usize, reference: Option<usize>) -> GraphResult<()> {
        match reference {
            None => self.add_cw(start, end, None),
            Some(r) => {
                let ccw_ref = *self.ccw.get(&(start, r)).ok_or_else(|| missing("a ccw link"))?;
                self.add_cw(start, end, Some(ccw_ref))?;
                if self.first[start] == Some(r) {
                    self.first[start] = Some(end);
                }
                Ok(())
            }
        }
    }

    fn add_first(&mut self, start: usize, end: usize) -> GraphResult<()> {
        let reference = self.first[start];
        self.add_ccw(start, end, reference)
    }

    fn rotation(&self, v: usize) -> GraphResult<Vec<usize>> {
        let mut result = Vec::new();
        if let Some(first) = self.first[v] {
            let mut cur = first;
            loop {
                result.push(cur);
                cur = *self.cw.get(&(v, cur)).ok_or_else(|| missing("a cw link"))?;
                if cur == first {
                    break;
                }
                if result.len() > self.first.len() {
                    return Err(missing("a closed rotation"));
                }
            }
        }
        Ok(result)
    }
}

struct LrState {
    adjs: Vec<Vec<(usize, usize)>>,
    height: Vec<Option<usize>>,
    roots: Vec<usize>,
    // oriented edges, indexed like the undirected edges they come from
    oriented: Vec<bool>,
    src: Vec<usize>,
    dst: Vec<usize>,
    out: Vec<Vec<usize>>,
    dfs_out: Vec<Vec<usize>>,
    parent_edge: Vec<Option<usize>>,
    lowpt: Vec<usize>,
    lowpt2: Vec<usize>,
    nesting_depth: Vec<isize>,
    refs: Vec<Option<usize>>,
    side: Vec<isize>,
    stack: Vec<ConflictPair>,
    stack_bottom: Vec<usize>,
    lowpt_edge: Vec<Option<usize>>,
    left_ref: Vec<Option<usize>>,
    right_ref: Vec<Option<usize>>,
    links: HalfEdgeLinks,
}

impl LrState {
    fn new(n: usize, m: usize, adjs: Vec<Vec<(usize, usize)>>) -> LrState {
        LrState {
            adjs,
            height: vec![None; n],
            roots: Vec::new(),
            oriented: vec![false; m],
            src: vec![0; m],
            dst: vec![0; m],
            out: vec![Vec::new(); n],
            dfs_out: Vec::new(),
            parent_edge: vec![None; n],
            lowpt: vec![0; m],
            lowpt2: vec![0; m],
            nesting_depth: vec![0; m],
            refs: vec![None; m],
            side: vec![1; m],
            stack: Vec::new(),
            stack_bottom: vec![0; m],
            lowpt_edge: vec![None; m],
            left_ref: vec![None; n],
            right_ref: vec![None; n],
            links: HalfEdgeLinks::new(n),
        }
    }

    fn height_of(&self, v: usize) -> GraphResult<usize> {
        self.height[v].ok_or_else(|| missing("a DFS height"))
    }

    /// Orients every edge away from the DFS roots and computes lowpoints and nesting depths.
    fn dfs_orientation(&mut self) -> GraphResult<()> {
        let n = self.adjs.len();
        let mut next = vec![0; n];
        let mut resumed = vec![false; self.oriented.len()];
        for root in 0..n {
            if self.height[root].is_some() {
                continue;
            }
            self.height[root] = Some(0);
            self.roots.push(root);

            let mut stack = vec![root];
            'search: while let Some(v) = stack.pop() {
                let e = self.parent_edge[v];
                let hv = self.height_of(v)?;
                while next[v] < self.adjs[v].len() {
                    let (w, vw) = self.adjs[v][next[v]];
                    if !resumed[vw] {
                        if self.oriented[vw] {
                            next[v] += 1;
                            continue;
                        }
                        self.oriented[vw] = true;
                        self.src[vw] = v;
                        self.dst[vw] = w;
                        self.out[v].push(vw);
                        self.lowpt[vw] = hv;
                        self.lowpt2[vw] = hv;
                        match self.height[w] {
                            None => {
                                self.parent_edge[w] = Some(vw);
                                self.height[w] = Some(hv + 1);
                                resumed[vw] = true;
                                stack.push(v);
                                stack.push(w);
                                continue 'search;
                            }
                            Some(hw) => {
                                self.lowpt[vw] = hw;
                            }
                        }
                    }

                    self.nesting_depth[vw] = 2 * self.lowpt[vw] as isize;
                    if self.lowpt2[vw] < hv {
                        self.nesting_depth[vw] += 1;
                    }

                    if let Some(e) = e {
                        if self.lowpt[vw] < self.lowpt[e] {
                            self.lowpt2[e] = self.lowpt[e].min(self.lowpt2[vw]);
                            self.lowpt[e] = self.lowpt[vw];
                        } else if self.lowpt[vw] > self.lowpt[e] {
                            self.lowpt2[e] = self.lowpt2[e].min(self.lowpt[vw]);
                        } else {
                            self.lowpt2[e] = self.lowpt2[e].min(self.lowpt2[vw]);
                        }
                    }
                    next[v] += 1;
                }
            }
        }
        Ok(())
    }

    /// Orders the outgoing edges of every vertex by nesting depth, ties in DFS order.
    fn sort_by_nesting_depth(&mut self) {
        if self.dfs_out.is_empty() {
            self.dfs_out = self.out.clone();
        } else {
            self.out = self.dfs_out.clone();
        }
        for v in 0..self.out.len() {
            let depth = &self.nesting_depth;
            self.out[v].sort_by_key(|&e| depth[e]);
        }
    }

    /// Checks the left-right constraints below every root. A vertex is pushed back under its
    /// child while the child's subtree is searched, and finishes once its last edge is merged.
    fn dfs_testing(&mut self) -> GraphResult<bool> {
        let mut next = vec![0; self.out.len()];
        let mut resumed = vec![false; self.oriented.len()];
        for root in self.roots.clone() {
            let mut stack = vec![root];
            'search: while let Some(v) = stack.pop() {
                let e = self.parent_edge[v];
                let hv = self.height_of(v)?;
                while next[v] < self.out[v].len() {
                    let i = next[v];
                    let ei = self.out[v][i];
                    let w = self.dst[ei];
                    if !resumed[ei] {
                        self.stack_bottom[ei] = self.stack.len();
                        if self.parent_edge[w] == Some(ei) {
                            resumed[ei] = true;
                            stack.push(v);
                            stack.push(w);
                            continue 'search;
                        }
                        self.lowpt_edge[ei] = Some(ei);
                        self.stack.push(ConflictPair {
                            left: Interval::default(),
                            right: Interval::single(ei),
                        });
                    }

                    if self.lowpt[ei] < hv {
                        if i == 0 {
                            if let Some(e) = e {
                                self.lowpt_edge[e] = self.lowpt_edge[ei];
                            }
                        } else if let Some(e) = e {
                            if !self.add_constraints(ei, e)? {
                                trace!("conflict found below {}", root);
                                return Ok(false);
                            }
                        }
                    }
                    next[v] += 1;
                }

                if let Some(e) = e {
                    self.remove_back_edges(e)?;
                }
            }
        }
        Ok(true)
    }

    fn add_constraints(&mut self, ei: usize, e: usize) -> GraphResult<bool> {
        let mut p = ConflictPair::default();

        // merge return edges of ei into p.right
        loop {
            let mut q = self.stack.pop().ok_or_else(|| missing("a conflict pair"))?;
            if !q.left.is_empty() {
                q.swap();
            }
            if !q.left.is_empty() {
                return Ok(false);
            }
            let q_low = q.right.low.ok_or_else(|| missing("an interval edge"))?;
            if self.lowpt[q_low] > self.lowpt[e] {
                if p.right.is_empty() {
                    p.right = q.right;
                } else if let Some(pl) = p.right.low {
                    self.refs[pl] = q.right.high;
                }
                p.right.low = q.right.low;
            } else {
                self.refs[q_low] = self.lowpt_edge[e];
            }
            if self.stack.len() == self.stack_bottom[ei] {
                break;
            }
        }

        // merge conflicting return edges of the earlier siblings into p.left
        while let Some(top) = self.stack.last() {
            if !(top.left.conflicting(ei, &self.lowpt) || top.right.conflicting(ei, &self.lowpt)) {
                break;
            }
            let mut q = self.stack.pop().ok_or_else(|| missing("a conflict pair"))?;
            if q.right.conflicting(ei, &self.lowpt) {
                q.swap();
            }
            if q.right.conflicting(ei, &self.lowpt) {
                return Ok(false);
            }
            if let Some(pl) = p.right.low {
                self.refs[pl] = q.right.high;
            }
            if q.right.low.is_some() {
                p.right.low = q.right.low;
            }

            if p.left.is_empty() {
                p.left = q.left;
            } else if let Some(pl) = p.left.low {
                self.refs[pl] = q.left.high;
            }
            p.left.low = q.left.low;
        }

        if !(p.left.is_empty() && p.right.is_empty()) {
            self.stack.push(p);
        }
        Ok(true)
    }

    fn remove_back_edges(&mut self, e: usize) -> GraphResult<()> {
        let u = self.src[e];
        let hu = self.height_of(u)?;

        while let Some(top) = self.stack.last() {
            if top.lowest(&self.lowpt) != Some(hu) {
                break;
            }
            let p = self.stack.pop().ok_or_else(|| missing("a conflict pair"))?;
            if let Some(l) = p.left.low {
                self.side[l] = -1;
            }
        }

        if let Some(mut p) = self.stack.pop() {
            while let Some(h) = p.left.high {
                if self.dst[h] != u {
                    break;
                }
                p.left.high = self.refs[h];
            }
            if p.left.high.is_none() {
                if let Some(l) = p.left.low {
                    self.refs[l] = p.right.low;
                    self.side[l] = -1;
                    p.left.low = None;
                }
            }

            while let Some(h) = p.right.high {
                if self.dst[h] != u {
                    break;
                }
                p.right.high = self.refs[h];
            }
            if p.right.high.is_none() {
                if let Some(r) = p.right.low {
                    self.refs[r] = p.left.low;
                    self.side[r] = -1;
                    p.right.low = None;
                }
            }
            self.stack.push(p);
        }

        if self.lowpt[e] < hu {
            if let Some(top) = self.stack.last() {
                let hl = top.left.high;
                let hr = top.right.high;
                self.refs[e] = match (hl, hr) {
                    (Some(l), None) => Some(l),
                    (Some(l), Some(r)) if self.lowpt[l] > self.lowpt[r] => Some(l),
                    _ => hr,
                };
            }
        }
        Ok(())
    }

    /// Resolves the side of 'e' relative to its parent edge by following the reference chain.
    fn sign(&mut self, e: usize) -> isize {
        let mut chain = vec![e];
        while let Some(next) = self.refs[chain[chain.len() - 1]] {
            chain.push(next);
        }
        for i in (0..chain.len() - 1).rev() {
            let (cur, next) = (chain[i], chain[i + 1]);
            self.side[cur] *= self.side[next];
            self.refs[cur] = None;
        }
        self.side[e]
    }

    fn dfs_embedding(&mut self) -> GraphResult<()> {
        let mut next = vec![0; self.out.len()];
        for root in self.roots.clone() {
            let mut stack = vec![root];
            'search: while let Some(v) = stack.pop() {
                while next[v] < self.out[v].len() {
                    let ei = self.out[v][next[v]];
                    next[v] += 1;
                    let w = self.dst[ei];
                    if self.parent_edge[w] == Some(ei) {
                        self.links.add_first(w, v)?;
                        self.left_ref[v] = Some(w);
                        self.right_ref[v] = Some(w);
                        stack.push(v);
                        stack.push(w);
                        continue 'search;
                    } else if self.side[ei] == 1 {
                        let r = self.right_ref[w].ok_or_else(|| missing("a right reference"))?;
                        self.links.add_cw(w, v, Some(r))?;
                    } else {
                        let l = self.left_ref[w].ok_or_else(|| missing("a left reference"))?;
                        self.links.add_ccw(w, v, Some(l))?;
                        self.left_ref[w] = Some(v);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Computes a planar rotation system of 'graph', or None if the graph is not planar.
/// Disconnected graphs are embedded component by component.
pub fn planar_embedding<N, E>(graph: &Graph<N, E>) -> GraphResult<Option<RotationSystem>> {
    let n = graph.vertex_count();
    let m = graph.edge_count();
    if n > 2 && m > 3 * n - 6 {
        trace!("{} edges on {} vertices, too dense to be planar", m, n);
        return Ok(None);
    }

    let order = graph.vertex_indices().collect_vec();
    let pos = dense_positions(graph);
    let mut adjs = vec![Vec::new(); n];
    for (i, e) in graph.edges().enumerate() {
        let (a, b) = (pos[&e.tail], pos[&e.head]);
        adjs[a].push((b, i));
        adjs[b].push((a, i));
    }
    for adj in adjs.iter_mut() {
        adj.sort();
    }

    let mut state = LrState::new(n, m, adjs);
    state.dfs_orientation()?;

    state.sort_by_nesting_depth();
    if !state.dfs_testing()? {
        return Ok(None);
    }

    for e in 0..m {
        let s = state.sign(e);
        state.nesting_depth[e] *= s;
    }
    state.sort_by_nesting_depth();
    for v in 0..n {
        let mut previous = None;
        for i in 0..state.out[v].len() {
            let w = state.dst[state.out[v][i]];
            state.links.add_cw(v, w, previous)?;
            previous = Some(w);
        }
    }
    state.dfs_embedding()?;

    let mut orders = Vec::with_capacity(n);
    for v in 0..n {
        let rotation = state.links.rotation(v)?;
        orders.push((order[v], rotation.into_iter().map(|w| order[w]).collect_vec()));
    }
    let rot = RotationSystem::from_orders(orders)?;
    Ok(Some(rot))
}

pub fn is_planar<N, E>(graph: &Graph<N, E>) -> GraphResult<bool> {
    Ok(planar_embedding(graph)?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::faces::Faces;
    use crate::graph::generators::{complete, cycle, grid, path, random_planar, wheel, SimpleGraph};
    use crate::graph::indices::VertexI;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn k33() -> SimpleGraph {
        let mut g = Graph::new();
        let v = (0..6).map(|_| g.add_vertex(())).collect_vec();
        for i in 0..3 {
            for j in 3..6 {
                g.add_edge(v[i], v[j], ()).unwrap();
            }
        }
        g
    }

    fn assert_embeds(g: &SimpleGraph) {
        let rot = planar_embedding(g).unwrap().expect("graph should be planar");
        let faces = Faces::build(g, &rot).unwrap();
        assert_eq!(faces.half_edge_count(), 2 * g.edge_count());
    }

    #[test]
    fn test_rejects_kuratowski_graphs() {
        assert!(!is_planar(&complete(5)).unwrap());
        assert!(!is_planar(&k33()).unwrap());
    }

    #[test]
    fn test_rejects_subdivided_k33() {
        let mut g = k33();
        g.remove_edge(VertexI(0), VertexI(3)).unwrap();
        let x = g.add_vertex(());
        g.add_edge(VertexI(0), x, ()).unwrap();
        g.add_edge(x, VertexI(3), ()).unwrap();
        assert!(!is_planar(&g).unwrap());
    }

    #[test]
    fn test_accepts_planar_families() {
        assert_embeds(&complete(4));
        assert_embeds(&grid(6, 7));
        assert_embeds(&wheel(9));
        assert_embeds(&path(12));
        assert_embeds(&cycle(3));
        assert_embeds(&Graph::new());
        let mut k33_minus = k33();
        k33_minus.remove_edge(VertexI(2), VertexI(5)).unwrap();
        assert_embeds(&k33_minus);
    }

    #[test]
    fn test_accepts_random_planar_graphs() {
        let mut rng = StdRng::seed_from_u64(5);
        for keep in &[1.0, 0.8, 0.4] {
            for _ in 0..5 {
                assert_embeds(&random_planar(60, *keep, &mut rng));
            }
        }
    }

    #[test]
    fn test_long_paths_and_cycles_do_not_exhaust_the_stack() {
        assert_embeds(&path(100_000));
        assert_embeds(&cycle(50_000));
        assert!(is_planar(&grid(200, 200)).unwrap());
    }

    #[test]
    fn test_embedding_keeps_vertex_identities() {
        let g = grid(4, 4);
        let sub = g
            .induced_subgraph(&[VertexI(5), VertexI(6), VertexI(9), VertexI(10), VertexI(14)])
            .unwrap();
        let rot = planar_embedding(&sub).unwrap().unwrap();
        assert_eq!(
            rot.vertices().collect_vec(),
            vec![VertexI(5), VertexI(6), VertexI(9), VertexI(10), VertexI(14)]
        );
        assert!(rot.check_matches(&sub).is_ok());
    }
}
