use crate::embedding::faces::Faces;
use crate::embedding::RotationSystem;
use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::indices::{FaceI, VertexI};
use crate::graph::Graph;
use std::collections::HashSet;
use tracing::trace;

/// Maximal planar supergraph together with its embedding.
pub struct Triangulation<N, E> {
    pub graph: Graph<N, E>,
    pub rotation: RotationSystem,
    pub faces: Faces,
    /// Edges added on top of the input graph.
    pub chords: Vec<(VertexI, VertexI)>,
}

struct Builder<'a, N, E, F: Fn(VertexI, VertexI) -> E> {
    graph: Graph<N, E>,
    rotation: RotationSystem,
    chords: Vec<(VertexI, VertexI)>,
    chord_weight: &'a F,
}

impl<'a, N, E, F: Fn(VertexI, VertexI) -> E> Builder<'a, N, E, F> {
    /// Adds the chord p[i] -- p[i + 2] inside the face whose boundary walk is 'p' and drops
    /// p[i + 1] from the walk.
    fn chord(&mut self, p: &mut Vec<VertexI>, i: usize) -> GraphResult<()> {
        let k = p.len();
        let a = p[i];
        let b = p[(i + 2) % k];
        let pred_a = p[(i + k - 1) % k];
        let pred_b = p[(i + 1) % k];
        if a == b || self.graph.has_edge(a, b) {
            return GraphErr::new_err(&format!(
                "Chord between {} and {} would make the graph non-simple.",
                a, b
            ));
        }
        trace!("chord {} -- {}", a, b);
        self.rotation.insert_after(a, pred_a, b)?;
        self.rotation.insert_after(b, pred_b, a)?;
        self.graph.add_edge(a, b, (self.chord_weight)(a, b))?;
        self.chords.push((a, b));
        p.remove((i + 1) % k);
        Ok(())
    }

    /// Cuts repeated vertices out of a face walk until it is a simple cycle.
    fn make_simple(&mut self, mut walk: Vec<VertexI>) -> GraphResult<()> {
        loop {
            let mut seen = HashSet::new();
            let repeat = walk.iter().position(|v| !seen.insert(*v));
            match repeat {
                Some(j) => self.chord(&mut walk, j - 1)?,
                None => return Ok(()),
            }
        }
    }

    /// Triangulates a face bounded by a simple cycle with a star, or with two stars when the
    /// apex is already joined to a vertex of the cycle outside the face.
    fn fan(&mut self, mut polygon: Vec<VertexI>) -> GraphResult<()> {
        while polygon.len() > 3 {
            let k = polygon.len();
            let apex = polygon[0];
            if polygon[2..k - 1].iter().all(|&v| !self.graph.has_edge(apex, v)) {
                while polygon.len() > 3 {
                    self.chord(&mut polygon, 0)?;
                }
            } else {
                self.chord(&mut polygon, k - 1)?;
            }
        }
        Ok(())
    }
}

/// Adds chords to a connected embedded graph until every face is a triangle.
/// Graphs with fewer than three vertices are returned unchanged.
/// # Errors
/// Fails for disconnected graphs and rotation systems that are not planar embeddings of 'graph'.
pub fn triangulate<N, E, F>(
    graph: &Graph<N, E>,
    rotation: &RotationSystem,
    chord_weight: F,
) -> GraphResult<Triangulation<N, E>>
where
    N: Clone,
    E: Clone,
    F: Fn(VertexI, VertexI) -> E,
{
    if !graph.is_connected() {
        return GraphErr::new_err("Only connected graphs can be triangulated.");
    }

    let faces = Faces::build(graph, rotation)?;
    let mut builder = Builder {
        graph: graph.clone(),
        rotation: rotation.clone(),
        chords: Vec::new(),
        chord_weight: &chord_weight,
    };
    let n = graph.vertex_count();
    if n < 3 {
        return Ok(Triangulation {
            graph: builder.graph,
            rotation: builder.rotation,
            faces,
            chords: Vec::new(),
        });
    }

    let walks = (0..faces.face_count())
        .map(|i| faces.vertices(FaceI(i)))
        .collect::<GraphResult<Vec<_>>>()?;
    for walk in walks {
        builder.make_simple(walk)?;
    }

    let simple_faces = Faces::build(&builder.graph, &builder.rotation)?;
    let polygons = simple_faces
        .faces()
        .filter(|f| f.len > 3)
        .map(|f| simple_faces.vertices(f.id))
        .collect::<GraphResult<Vec<_>>>()?;
    for polygon in polygons {
        builder.fan(polygon)?;
    }

    let faces = Faces::build(&builder.graph, &builder.rotation)?;
    if builder.graph.edge_count() != 3 * n - 6 || !faces.is_triangulation() {
        return GraphErr::new_err(&format!(
            "Triangulation ended with {} edges and {} faces on {} vertices.",
            builder.graph.edge_count(),
            faces.face_count(),
            n
        ));
    }
    trace!(
        "triangulated {} vertices with {} chords",
        n,
        builder.chords.len()
    );

    Ok(Triangulation {
        graph: builder.graph,
        rotation: builder.rotation,
        faces,
        chords: builder.chords,
    })
}
