use clap::{Arg, ArgMatches, Command};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod subcommands;

fn input_args(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("GRAPH6")
                .help("Graph in graph6 or sparse6 format; read from FILE or STDIN when missing")
                .index(1),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .takes_value(true)
                .value_name("FILE")
                .conflicts_with("GRAPH6")
                .help("File with one graph6 or sparse6 graph per line"),
        )
        .arg(
            Arg::new("separator")
                .long("separator")
                .takes_value(true)
                .possible_values(["simple", "planar"])
                .default_value("planar")
                .help("Separator used to split large graphs"),
        )
}

fn main() {
    let color = input_args(Command::new("color").about("Computes a three-coloring of planar graphs"))
        .arg(
            Arg::new("brute-force")
                .long("brute-force")
                .help("Searches exhaustively instead of splitting along separators"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .takes_value(true)
                .value_name("FILE")
                .help("Writes the colorings to FILE in CBOR format"),
        );

    let separate = input_args(Command::new("separate").about("Prints a separator of planar graphs"));

    let generate = Command::new("generate")
        .about("Prints a generated planar graph in graph6 format")
        .arg(
            Arg::new("KIND")
                .possible_values(["grid", "random", "cycle", "wheel"])
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("n")
                .short('n')
                .takes_value(true)
                .help("Number of vertices (rows of a grid, spokes of a wheel)"),
        )
        .arg(Arg::new("m").short('m').takes_value(true).help("Columns of a grid"))
        .arg(
            Arg::new("keep")
                .long("keep")
                .takes_value(true)
                .help("Probability for each edge of a random triangulation to survive"),
        )
        .arg(Arg::new("seed").long("seed").takes_value(true).help("Seed of a random graph"));

    let matches = Command::new("threecolor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Three-coloring of planar graphs by recursive planar separators")
        .arg(
            Arg::new("verbose")
                .short('v')
                .multiple_occurrences(true)
                .global(true)
                .help("Logs more details to STDERR (-v, -vv, -vvv)"),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(color)
        .subcommand(separate)
        .subcommand(generate)
        .get_matches();

    init_logging(&matches);

    let result = match matches.subcommand() {
        Some(("color", m)) => subcommands::color(m),
        Some(("separate", m)) => subcommands::separate(m),
        Some(("generate", m)) => subcommands::generate(m),
        _ => Ok(()),
    };
    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(matches: &ArgMatches) {
    let verbosity = matches
        .subcommand()
        .map_or(0, |(_, m)| m.occurrences_of("verbose"))
        .max(matches.occurrences_of("verbose"));
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
