use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use planar_three_coloring::coloring::{color_three, Coloring, ColoringConfig, Strategy};
use planar_three_coloring::graph::generators::{cycle, grid, random_planar, wheel, SimpleGraph};
use planar_three_coloring::graph::io::{read_graph6, read_graphs, write_graph6};
use planar_three_coloring::separator::SeparatorKind;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{stderr, stdin, stdout, BufReader, Write};
use tracing::info;

pub fn color(matches: &ArgMatches) -> Result<()> {
    let config = ColoringConfig {
        strategy: if matches.is_present("brute-force") {
            Strategy::BruteForce
        } else {
            Strategy::Recursive(retrieve_separator(matches)?)
        },
    };
    let graphs = read_input(matches)?;

    let mut results: Vec<Option<Coloring>> = Vec::new();
    for (i, graph) in graphs.iter().enumerate() {
        info!(
            "graph {}: {} vertices, {} edges",
            i,
            graph.vertex_count(),
            graph.edge_count()
        );
        let coloring = color_three(graph, &config)?;
        if graphs.len() > 1 {
            println!("# graph {}", i);
        }
        report(&coloring, &mut stdout().lock(), &mut stderr().lock())?;
        results.push(coloring);
    }

    if let Some(output) = matches.value_of("output") {
        let file = File::create(output)
            .with_context(|| format!("File '{}' could not be opened for writing.", output))?;
        serde_cbor::to_writer(file, &results)
            .with_context(|| format!("Colorings could not be written to '{}'.", output))?;
    }
    Ok(())
}

/// Colorings go to 'out', the failure notice to 'err'.
fn report(coloring: &Option<Coloring>, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    match coloring {
        Some(c) if c.is_empty() => {}
        Some(c) => writeln!(out, "{}", c)?,
        None => writeln!(err, "Three coloring is not possible on a given graph")?,
    }
    Ok(())
}

pub fn separate(matches: &ArgMatches) -> Result<()> {
    let kind = retrieve_separator(matches)?;
    for (i, graph) in read_input(matches)?.iter().enumerate() {
        let separator = kind.find(graph)?;
        println!("# graph {}", i);
        println!("{}", separator);
    }
    Ok(())
}

pub fn generate(matches: &ArgMatches) -> Result<()> {
    let n = retrieve_number(matches, "n", 10)?;
    let graph = match matches.value_of("KIND").unwrap_or("grid") {
        "grid" => grid(n, retrieve_number(matches, "m", n)?),
        "cycle" => cycle(n),
        "wheel" => wheel(n),
        "random" => {
            let keep = match matches.value_of("keep").map(str::parse::<f64>) {
                Some(Ok(p)) if (0.0..=1.0).contains(&p) => p,
                None => 1.0,
                _ => bail!("The edge probability should be a number between 0 and 1."),
            };
            let mut rng = match matches.value_of("seed").map(str::parse::<u64>) {
                Some(Ok(seed)) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
                _ => bail!("The seed should be a positive number."),
            };
            random_planar(n, keep, &mut rng)
        }
        kind => bail!("Graph kind '{}' not known.", kind),
    };
    println!("{}", write_graph6(&graph));
    Ok(())
}

fn read_input(matches: &ArgMatches) -> Result<Vec<SimpleGraph>> {
    if let Some(code) = matches.value_of("GRAPH6") {
        return Ok(vec![read_graph6(code)?]);
    }
    let graphs = match matches.value_of("file") {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Input file '{}' could not be opened for reading.", path))?;
            read_graphs(BufReader::new(file))?
        }
        None => read_graphs(stdin().lock())?,
    };
    if graphs.is_empty() {
        bail!("The input does not contain any graph.");
    }
    Ok(graphs)
}

fn retrieve_separator(matches: &ArgMatches) -> Result<SeparatorKind> {
    match matches.value_of("separator").unwrap_or("planar") {
        "simple" => Ok(SeparatorKind::Simple),
        "planar" => Ok(SeparatorKind::Planar),
        other => bail!("Separator '{}' not known.", other),
    }
}

fn retrieve_number(matches: &ArgMatches, name: &str, default: usize) -> Result<usize> {
    match matches.value_of(name).map(str::parse::<usize>) {
        Some(Ok(k)) if k >= 1 => Ok(k),
        None => Ok(default),
        _ => bail!("{} should be a positive number.", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_three_coloring::coloring::Color;
    use planar_three_coloring::graph::indices::VertexI;

    fn reported(coloring: Option<Coloring>) -> (String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        report(&coloring, &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_failure_notice_goes_to_stderr() {
        let (out, err) = reported(None);
        assert!(out.is_empty());
        assert_eq!(err, "Three coloring is not possible on a given graph\n");
    }

    #[test]
    fn test_coloring_goes_to_stdout() {
        let coloring: Coloring = vec![(VertexI(0), Color::First), (VertexI(1), Color::Second)]
            .into_iter()
            .collect();
        let (out, err) = reported(Some(coloring.clone()));
        assert_eq!(out, format!("{}\n", coloring));
        assert!(err.is_empty());

        let (out, err) = reported(Some(Coloring::new()));
        assert!(out.is_empty() && err.is_empty());
    }
}
