//! graph6 and sparse6 text formats.

use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::generators::SimpleGraph;
use crate::graph::indices::VertexI;
use crate::graph::{dense_positions, Graph};
use itertools::Itertools;
use std::io::BufRead;

const GRAPH6_HEADER: &str = ">>graph6<<";
const SPARSE6_HEADER: &str = ">>sparse6<<";
const BIAS: u8 = 63;

/// Parses one graph in graph6 or sparse6 (leading ':') format. Vertices are numbered 0..n-1.
pub fn read_graph6(line: &str) -> GraphResult<SimpleGraph> {
    let line = line.trim();
    let line = line
        .strip_prefix(GRAPH6_HEADER)
        .or_else(|| line.strip_prefix(SPARSE6_HEADER))
        .unwrap_or(line);

    let (sparse, body) = match line.strip_prefix(':') {
        Some(rest) => (true, rest),
        None => (false, line),
    };

    let data = body
        .bytes()
        .map(|b| {
            if (BIAS..=BIAS + 63).contains(&b) {
                Ok(b - BIAS)
            } else {
                GraphErr::new_err(&format!("Invalid character '{}' in graph6 data.", b as char))
            }
        })
        .collect::<GraphResult<Vec<u8>>>()?;

    let (n, rest) = decode_size(&data)?;
    let edges = if sparse {
        sparse6_edges(n, rest)
    } else {
        graph6_edges(n, rest)?
    };

    let mut graph = Graph::new();
    for _ in 0..n {
        graph.add_vertex(());
    }
    for (a, b) in edges {
        graph.add_edge(VertexI(a), VertexI(b), ()).map_err(|e| {
            GraphErr::new(&format!("Input graph is not simple: {}", e))
        })?;
    }
    Ok(graph)
}

fn decode_size(data: &[u8]) -> GraphResult<(usize, &[u8])> {
    let fold = |bytes: &[u8]| bytes.iter().fold(0usize, |acc, &b| (acc << 6) | b as usize);
    match data {
        [63, 63, rest @ ..] if rest.len() >= 6 => Ok((fold(&rest[..6]), &rest[6..])),
        [63, rest @ ..] if rest.len() >= 3 => Ok((fold(&rest[..3]), &rest[3..])),
        [n, rest @ ..] if *n < 63 => Ok((*n as usize, rest)),
        _ => GraphErr::new_err("Truncated graph6 size field."),
    }
}

fn bits(data: &[u8]) -> impl Iterator<Item = bool> + '_ {
    data.iter()
        .flat_map(|&byte| (0..6).rev().map(move |shift| (byte >> shift) & 1 == 1))
}

fn graph6_edges(n: usize, data: &[u8]) -> GraphResult<Vec<(usize, usize)>> {
    // the size field allows up to 2^36 - 1 vertices
    let needed = n as u128 * n.saturating_sub(1) as u128 / 2;
    if (data.len() as u128) * 6 < needed {
        return GraphErr::new_err(&format!(
            "graph6 data too short: {} bits needed for {} vertices.",
            needed, n
        ));
    }

    let pairs = (1..n).flat_map(|j| (0..j).map(move |i| (i, j)));
    Ok(pairs
        .zip(bits(data))
        .filter(|(_, set)| *set)
        .map(|(pair, _)| pair)
        .collect())
}

fn sparse6_edges(n: usize, data: &[u8]) -> Vec<(usize, usize)> {
    let mut k = 1;
    while (1usize << k) < n {
        k += 1;
    }

    let stream = bits(data).collect_vec();
    let mut edges = Vec::new();
    let mut v = 0;
    let mut pos = 0;
    while pos + 1 + k <= stream.len() {
        let b = stream[pos];
        let x = stream[pos + 1..pos + 1 + k]
            .iter()
            .fold(0usize, |acc, &bit| (acc << 1) | bit as usize);
        pos += 1 + k;

        if b {
            v += 1;
        }
        if x >= n || v >= n {
            break;
        }
        if x > v {
            v = x;
        } else {
            edges.push((x, v));
        }
    }
    edges
}

fn encode_size(n: usize, out: &mut Vec<u8>) {
    if n < 63 {
        out.push(n as u8);
    } else if n < 258048 {
        out.push(63);
        out.extend((0..3).rev().map(|i| ((n >> (6 * i)) & 0x3f) as u8));
    } else {
        out.push(63);
        out.push(63);
        out.extend((0..6).rev().map(|i| ((n >> (6 * i)) & 0x3f) as u8));
    }
}

/// Encodes 'graph' as graph6, numbering the vertices by ascending index.
pub fn write_graph6<N, E>(graph: &Graph<N, E>) -> String {
    let n = graph.vertex_count();
    let pos = dense_positions(graph);
    let mut matrix = vec![false; n * n];
    for e in graph.edges() {
        let (a, b) = (pos[&e.tail], pos[&e.head]);
        matrix[a * n + b] = true;
        matrix[b * n + a] = true;
    }

    let mut out = Vec::new();
    encode_size(n, &mut out);
    let upper = (1..n)
        .flat_map(|j| (0..j).map(move |i| (i, j)))
        .map(|(i, j)| matrix[i * n + j])
        .collect_vec();
    for chunk in upper.chunks(6) {
        let byte = (0..6).fold(0u8, |acc, i| (acc << 1) | *chunk.get(i).unwrap_or(&false) as u8);
        out.push(byte);
    }

    out.into_iter().map(|b| (b + BIAS) as char).collect()
}

/// Reads one graph per non-empty line.
pub fn read_graphs<R: BufRead>(reader: R) -> GraphResult<Vec<SimpleGraph>> {
    let mut graphs = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| GraphErr::new(&format!("Unable to read input: {}", e)))?;
        if line.trim().is_empty() {
            continue;
        }
        graphs.push(read_graph6(&line)?);
    }
    Ok(graphs)
}
