//! Small families of planar graphs for tests and the command line.

use crate::graph::indices::VertexI;
use crate::graph::Graph;
use itertools::Itertools;
use rand::Rng;

pub type SimpleGraph = Graph<(), ()>;

fn with_vertices(n: usize) -> (SimpleGraph, Vec<VertexI>) {
    let mut g = Graph::new();
    let v = (0..n).map(|_| g.add_vertex(())).collect_vec();
    (g, v)
}

// edges between freshly added, distinct vertices cannot be rejected
fn connect(g: &mut SimpleGraph, a: VertexI, b: VertexI) {
    let _ = g.add_edge(a, b, ());
}

pub fn path(n: usize) -> SimpleGraph {
    let (mut g, v) = with_vertices(n);
    for (&a, &b) in v.iter().tuple_windows() {
        connect(&mut g, a, b);
    }
    g
}

/// Cycle on 'n' vertices; for n < 3 this is a path.
pub fn cycle(n: usize) -> SimpleGraph {
    let mut g = path(n);
    if n >= 3 {
        connect(&mut g, VertexI(n - 1), VertexI(0));
    }
    g
}

/// Grid with 'rows' x 'cols' vertices, vertex (r, c) has index r * cols + c.
pub fn grid(rows: usize, cols: usize) -> SimpleGraph {
    let (mut g, v) = with_vertices(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let i = r * cols + c;
            if c + 1 < cols {
                connect(&mut g, v[i], v[i + 1]);
            }
            if r + 1 < rows {
                connect(&mut g, v[i], v[i + cols]);
            }
        }
    }
    g
}

pub fn complete(n: usize) -> SimpleGraph {
    let (mut g, v) = with_vertices(n);
    for (&a, &b) in v.iter().tuple_combinations() {
        connect(&mut g, a, b);
    }
    g
}

/// Hub vertex 0 joined to every vertex of a rim cycle on 'spokes' vertices.
pub fn wheel(spokes: usize) -> SimpleGraph {
    let (mut g, v) = with_vertices(spokes + 1);
    for i in 1..=spokes {
        connect(&mut g, v[0], v[i]);
    }
    if spokes >= 3 {
        for i in 1..=spokes {
            connect(&mut g, v[i], v[i % spokes + 1]);
        }
    } else {
        for (&a, &b) in v[1..].iter().tuple_windows() {
            connect(&mut g, a, b);
        }
    }
    g
}

/// Random planar graph: a stacked triangulation on 'n' vertices built by repeatedly splitting a
/// random face, of which every edge survives with probability 'keep'.
pub fn random_planar<R: Rng>(n: usize, keep: f64, rng: &mut R) -> SimpleGraph {
    let (mut full, v) = with_vertices(n);
    if n < 3 {
        for (&a, &b) in v.iter().tuple_windows() {
            connect(&mut full, a, b);
        }
    } else {
        let mut faces = vec![[v[0], v[1], v[2]], [v[0], v[2], v[1]]];
        connect(&mut full, v[0], v[1]);
        connect(&mut full, v[1], v[2]);
        connect(&mut full, v[2], v[0]);
        for &x in &v[3..] {
            let i = rng.gen_range(0, faces.len());
            let [a, b, c] = faces.swap_remove(i);
            connect(&mut full, x, a);
            connect(&mut full, x, b);
            connect(&mut full, x, c);
            faces.push([a, b, x]);
            faces.push([b, c, x]);
            faces.push([c, a, x]);
        }
    }

    let keep = keep.max(0.0).min(1.0);
    let (mut g, _) = with_vertices(n);
    for e in full.edges() {
        if rng.gen_bool(keep) {
            connect(&mut g, e.tail, e.head);
        }
    }
    g
}
