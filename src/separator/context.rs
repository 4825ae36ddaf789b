use crate::error::{ColoringError, ColoringResult};
use crate::graph::indices::VertexI;
use crate::graph::Graph;
use itertools::Itertools;
use std::collections::{HashMap, HashSet, VecDeque};

/// Rooted spanning tree of one separator computation together with the weights of its subtrees.
pub struct SeparatorContext {
    root: VertexI,
    parent: HashMap<VertexI, Option<VertexI>>,
    children: HashMap<VertexI, Vec<VertexI>>,
    depth: HashMap<VertexI, usize>,
    levels: Vec<Vec<VertexI>>,
    weight: HashMap<VertexI, usize>,
    subtree: HashMap<VertexI, usize>,
    tin: HashMap<VertexI, usize>,
    tout: HashMap<VertexI, usize>,
}

fn no_data(what: &str, v: VertexI) -> ColoringError {
    ColoringError::Invariant(format!("spanning tree has no {} for {}", what, v))
}

impl SeparatorContext {
    /// Breadth first search tree of the component of 'root'; every vertex weighs 1.
    pub fn bfs<N, E>(graph: &Graph<N, E>, root: VertexI) -> ColoringResult<SeparatorContext> {
        let mut parents = HashMap::new();
        let mut queue = VecDeque::new();
        parents.insert(root, None);
        queue.push_back(root);
        while let Some(v) = queue.pop_front() {
            for w in graph.neighbors(v)?.sorted() {
                if !parents.contains_key(&w) {
                    parents.insert(w, Some(v));
                    queue.push_back(w);
                }
            }
        }
        let weights = parents.keys().map(|&v| (v, 1)).collect();
        SeparatorContext::build(root, parents, weights)
    }

    /// Tree given by explicit parent pointers. Vertices without a weight entry weigh 1.
    pub fn from_parents(
        root: VertexI,
        parents: &HashMap<VertexI, VertexI>,
        weights: &HashMap<VertexI, usize>,
    ) -> ColoringResult<SeparatorContext> {
        let mut all: HashMap<VertexI, Option<VertexI>> =
            parents.iter().map(|(&v, &p)| (v, Some(p))).collect();
        if all.insert(root, None).is_some() {
            return ColoringError::invariant_err("the root of a spanning tree has a parent");
        }
        for p in parents.values() {
            if !all.contains_key(p) {
                return Err(no_data("parent entry", *p));
            }
        }
        let weights = all
            .keys()
            .map(|&v| (v, weights.get(&v).copied().unwrap_or(1)))
            .collect();
        SeparatorContext::build(root, all, weights)
    }

    fn build(
        root: VertexI,
        parent: HashMap<VertexI, Option<VertexI>>,
        weight: HashMap<VertexI, usize>,
    ) -> ColoringResult<SeparatorContext> {
        let mut children: HashMap<VertexI, Vec<VertexI>> =
            parent.keys().map(|&v| (v, Vec::new())).collect();
        for (&v, p) in &parent {
            if let Some(p) = p {
                children.get_mut(p).ok_or_else(|| no_data("children", *p))?.push(v);
            }
        }
        for list in children.values_mut() {
            list.sort();
        }

        let mut depth = HashMap::new();
        let mut levels: Vec<Vec<VertexI>> = Vec::new();
        let mut queue = VecDeque::new();
        depth.insert(root, 0);
        queue.push_back(root);
        while let Some(v) = queue.pop_front() {
            let d = depth[&v];
            if levels.len() <= d {
                levels.push(Vec::new());
            }
            levels[d].push(v);
            for &c in &children[&v] {
                depth.insert(c, d + 1);
                queue.push_back(c);
            }
        }
        if depth.len() != parent.len() {
            return ColoringError::invariant_err("parent pointers do not form a tree");
        }
        for level in levels.iter_mut() {
            level.sort();
        }

        let mut subtree = HashMap::new();
        for level in levels.iter().rev() {
            for &v in level {
                let below: usize = children[&v].iter().map(|c| subtree[c]).sum();
                subtree.insert(v, weight[&v] + below);
            }
        }

        // preorder numbering for subtree membership
        let mut tin = HashMap::new();
        let mut tout = HashMap::new();
        let mut clock = 0;
        let mut stack = vec![(root, false)];
        while let Some((v, done)) = stack.pop() {
            if done {
                tout.insert(v, clock);
                continue;
            }
            tin.insert(v, clock);
            clock += 1;
            stack.push((v, true));
            for &c in children[&v].iter().rev() {
                stack.push((c, false));
            }
        }

        Ok(SeparatorContext {
            root,
            parent,
            children,
            depth,
            levels,
            weight,
            subtree,
            tin,
            tout,
        })
    }

    pub fn root(&self) -> VertexI {
        self.root
    }

    pub fn parent(&self, v: VertexI) -> ColoringResult<Option<VertexI>> {
        self.parent.get(&v).copied().ok_or_else(|| no_data("parent entry", v))
    }

    pub fn children(&self, v: VertexI) -> ColoringResult<&[VertexI]> {
        self.children
            .get(&v)
            .map(|c| c.as_slice())
            .ok_or_else(|| no_data("children", v))
    }

    pub fn depth(&self, v: VertexI) -> ColoringResult<usize> {
        self.depth.get(&v).copied().ok_or_else(|| no_data("depth", v))
    }

    /// Vertices grouped by depth, each level in ascending order.
    pub fn levels(&self) -> &[Vec<VertexI>] {
        &self.levels
    }

    pub fn weight(&self, v: VertexI) -> ColoringResult<usize> {
        self.weight.get(&v).copied().ok_or_else(|| no_data("weight", v))
    }

    pub fn total_weight(&self) -> usize {
        self.subtree[&self.root]
    }

    /// Weight of 'v' and everything below it.
    pub fn subtree_weight(&self, v: VertexI) -> ColoringResult<usize> {
        self.subtree.get(&v).copied().ok_or_else(|| no_data("subtree weight", v))
    }

    /// Whether 'v' lies in the subtree of 'top'.
    pub fn in_subtree(&self, v: VertexI, top: VertexI) -> ColoringResult<bool> {
        let tv = *self.tin.get(&v).ok_or_else(|| no_data("preorder number", v))?;
        let start = *self.tin.get(&top).ok_or_else(|| no_data("preorder number", top))?;
        let end = *self.tout.get(&top).ok_or_else(|| no_data("preorder number", top))?;
        Ok(start <= tv && tv < end)
    }

    pub fn is_tree_edge(&self, u: VertexI, v: VertexI) -> bool {
        self.parent.get(&u) == Some(&Some(v)) || self.parent.get(&v) == Some(&Some(u))
    }

    pub fn lca(&self, u: VertexI, v: VertexI) -> ColoringResult<VertexI> {
        let (mut a, mut b) = (u, v);
        let (mut da, mut db) = (self.depth(a)?, self.depth(b)?);
        while da > db {
            a = self.parent(a)?.ok_or_else(|| no_data("parent", a))?;
            da -= 1;
        }
        while db > da {
            b = self.parent(b)?.ok_or_else(|| no_data("parent", b))?;
            db -= 1;
        }
        while a != b {
            a = self.parent(a)?.ok_or_else(|| no_data("parent", a))?;
            b = self.parent(b)?.ok_or_else(|| no_data("parent", b))?;
        }
        Ok(a)
    }

    /// Tree path closing a cycle with the edge {u, v}: [u, ..., lca(u, v), ..., v].
    pub fn fundamental_cycle(&self, u: VertexI, v: VertexI) -> ColoringResult<Vec<VertexI>> {
        let top = self.lca(u, v)?;
        let mut cycle = Vec::new();
        let mut cur = u;
        while cur != top {
            cycle.push(cur);
            cur = self.parent(cur)?.ok_or_else(|| no_data("parent", cur))?;
        }
        cycle.push(top);
        let mut tail = Vec::new();
        cur = v;
        while cur != top {
            tail.push(cur);
            cur = self.parent(cur)?.ok_or_else(|| no_data("parent", cur))?;
        }
        cycle.extend(tail.into_iter().rev());
        Ok(cycle)
    }

    /// Tree edges leaving 'cycle', as (vertex on the cycle, vertex off the cycle, weight behind
    /// the edge). The edge above the topmost cycle vertex carries everything outside its subtree.
    pub fn outgoing_edge_weights(
        &self,
        cycle: &[VertexI],
    ) -> ColoringResult<Vec<(VertexI, VertexI, usize)>> {
        let on_cycle: HashSet<VertexI> = cycle.iter().copied().collect();
        let mut top = None;
        let mut result = Vec::new();
        for &c in cycle {
            for &child in self.children(c)? {
                if !on_cycle.contains(&child) {
                    result.push((c, child, self.subtree_weight(child)?));
                }
            }
            match self.parent(c)? {
                Some(p) if on_cycle.contains(&p) => {}
                _ => top = Some(c),
            }
        }
        if let Some(top) = top {
            if let Some(p) = self.parent(top)? {
                result.push((top, p, self.total_weight() - self.subtree_weight(top)?));
            }
        }
        Ok(result)
    }

    /// Vertices behind an edge returned by `outgoing_edge_weights`.
    pub fn vertices_behind(&self, from: VertexI, to: VertexI) -> ColoringResult<Vec<VertexI>> {
        if self.parent(to)? == Some(from) {
            self.parent
                .keys()
                .filter_map(|&v| match self.in_subtree(v, to) {
                    Ok(true) => Some(Ok(v)),
                    Ok(false) => None,
                    Err(e) => Some(Err(e)),
                })
                .collect()
        } else {
            self.parent
                .keys()
                .filter_map(|&v| match self.in_subtree(v, from) {
                    Ok(false) => Some(Ok(v)),
                    Ok(true) => None,
                    Err(e) => Some(Err(e)),
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VertexI {
        VertexI(i)
    }

    fn sample_tree() -> Graph<(), ()> {
        let mut g = Graph::new();
        for _ in 0..14 {
            g.add_vertex(());
        }
        let edges = [
            (0, 1),
            (1, 2),
            (2, 3),
            (4, 5),
            (5, 0),
            (6, 5),
            (8, 6),
            (6, 7),
            (1, 9),
            (2, 10),
            (10, 11),
            (10, 12),
            (5, 13),
        ];
        for &(a, b) in edges.iter() {
            g.add_edge(v(a), v(b), ()).unwrap();
        }
        g
    }

    #[test]
    fn test_parents_from_bfs() {
        let ctx = SeparatorContext::bfs(&sample_tree(), v(8)).unwrap();
        let expected = [
            (0, 5),
            (1, 0),
            (2, 1),
            (3, 2),
            (4, 5),
            (5, 6),
            (6, 8),
            (7, 6),
            (9, 1),
            (10, 2),
            (11, 10),
            (12, 10),
            (13, 5),
        ];
        for &(child, parent) in expected.iter() {
            assert_eq!(ctx.parent(v(child)).unwrap(), Some(v(parent)));
        }
        assert_eq!(ctx.parent(v(8)).unwrap(), None);
        assert_eq!(ctx.root(), v(8));
        assert!(ctx.parent(v(20)).is_err());
        assert_eq!(ctx.levels()[2], vec![v(5), v(7)]);
    }

    #[test]
    fn test_lca_and_cycle() {
        let ctx = SeparatorContext::bfs(&sample_tree(), v(8)).unwrap();
        assert_eq!(ctx.lca(v(3), v(4)).unwrap(), v(5));
        assert_eq!(ctx.lca(v(11), v(9)).unwrap(), v(1));
        assert_eq!(ctx.lca(v(7), v(7)).unwrap(), v(7));
        assert_eq!(
            ctx.fundamental_cycle(v(3), v(4)).unwrap(),
            vec![v(3), v(2), v(1), v(0), v(5), v(4)]
        );
        assert_eq!(ctx.lca(v(4), v(8)).unwrap(), v(8));
        assert_eq!(ctx.depth(v(4)).unwrap(), 3);
        assert!(ctx.is_tree_edge(v(2), v(10)));
        assert!(!ctx.is_tree_edge(v(3), v(4)));
    }

    #[test]
    fn test_outgoing_edge_weights() {
        let ctx = SeparatorContext::bfs(&sample_tree(), v(8)).unwrap();
        let cycle = ctx.fundamental_cycle(v(3), v(4)).unwrap();
        let weights = ctx.outgoing_edge_weights(&cycle).unwrap();
        assert_eq!(
            weights.into_iter().sorted().collect_vec(),
            vec![
                (v(1), v(9), 1),
                (v(2), v(10), 3),
                (v(5), v(6), 3),
                (v(5), v(13), 1),
            ]
        );
        assert_eq!(ctx.subtree_weight(v(5)).unwrap(), 11);
        assert_eq!(ctx.total_weight(), 14);
        assert_eq!(
            ctx.vertices_behind(v(5), v(6)).unwrap().into_iter().sorted().collect_vec(),
            vec![v(6), v(7), v(8)]
        );
        assert_eq!(
            ctx.vertices_behind(v(2), v(10)).unwrap().into_iter().sorted().collect_vec(),
            vec![v(10), v(11), v(12)]
        );
    }

    #[test]
    fn test_from_parents_with_weights() {
        let parents: HashMap<VertexI, VertexI> =
            vec![(v(1), v(0)), (v(2), v(0)), (v(3), v(2))].into_iter().collect();
        let weights: HashMap<VertexI, usize> = vec![(v(0), 0)].into_iter().collect();
        let ctx = SeparatorContext::from_parents(v(0), &parents, &weights).unwrap();
        assert_eq!(ctx.total_weight(), 3);
        assert_eq!(ctx.subtree_weight(v(2)).unwrap(), 2);
        assert_eq!(ctx.depth(v(3)).unwrap(), 2);
        assert!(ctx.in_subtree(v(3), v(2)).unwrap());
        assert!(!ctx.in_subtree(v(1), v(2)).unwrap());

        let dangling: HashMap<VertexI, VertexI> = vec![(v(1), v(7))].into_iter().collect();
        assert!(SeparatorContext::from_parents(v(0), &dangling, &weights).is_err());
    }
}
