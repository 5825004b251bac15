//! Command line front end: solve word lists, generate them, and translate between alphabets.

use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use alienorder::decode::decode;
use alienorder::{
    read_words, Alphabet, EncoderBuilder, ExtractionReport, Mode, OrderExtractor, SubstitutionTable, TieBreak,
};
use anyhow::{bail, Context};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{info, warn};

const ADVERSARIAL_PAIN_PREFIX: usize = 64;
const ADVERSARIAL_CLUSTERS: usize = 16;

#[derive(Parser, Debug)]
#[command(name = "alienorder")]
#[command(about = "Infer alien alphabet orders from sorted word lists, and generate such lists")]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer the order behind a sorted word list
    Solve {
        /// Word list, one word per line
        path: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Break ties by smallest code point rather than first appearance
        #[arg(
            short,
            long,
            value_name = "BOOL",
            default_value = "true",
            action = ArgAction::Set,
            value_parser = BoolishValueParser::new()
        )]
        deterministic: bool,
    },

    /// Generate a word list sorted under the order of an alphabet file
    Generate(GenerateArgs),

    /// Write an alphabet file covering a range of code points
    Symbols {
        /// First code point, decimal or 0x/U+ hexadecimal
        #[arg(long, value_parser = parse_code_point)]
        start: u32,

        /// Last code point, inclusive
        #[arg(long, value_parser = parse_code_point)]
        end: u32,

        /// Write the alphabet here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Substitute symbols of a text file
    Map(MapArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Alphabet file: one symbol per line, in order
    #[arg(long, value_name = "PATH")]
    input_path: PathBuf,

    /// Write the word list here instead of stdout
    #[arg(long, value_name = "PATH")]
    output_path: Option<PathBuf>,

    /// Number of words to produce
    #[arg(long, default_value_t = 1000)]
    input_words: usize,

    /// Minimum word length
    #[arg(long, default_value_t = 3)]
    min_word_size: usize,

    /// Maximum word length
    #[arg(long, default_value_t = 10)]
    max_word_size: usize,

    /// Seed of the padding phase
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// One of unique, ambiguous, adversarial
    #[arg(long, default_value_t = Mode::Unique)]
    mode: Mode,

    /// Number of leading symbols whose order is enforced in ambiguous mode
    #[arg(long)]
    enforce_prefix: Option<usize>,

    /// Padding symbol, the first symbol of the alphabet by default
    #[arg(long)]
    filler_symbol: Option<char>,

    /// Common prefix length before each constraint pair's first difference
    /// [default: 64 in adversarial mode, 0 otherwise]
    #[arg(long)]
    pain_prefix_len: Option<usize>,

    /// Number of symbol clusters in adversarial mode [default: 16, at most the alphabet size]
    #[arg(long)]
    clusters: Option<usize>,

    /// Enforce a chain over the first N symbols in adversarial mode
    #[arg(long, default_value_t = 0)]
    enforce_global: usize,

    /// Enforce a chain over the first K symbols of each cluster in adversarial mode
    #[arg(long, default_value_t = 8)]
    enforce_per_cluster: usize,

    /// Share of padding words that add few constraints in adversarial mode
    #[arg(long, default_value_t = 0.90)]
    noise_ratio: f64,

    /// Constraint pairs per boundary between neighboring clusters in adversarial mode
    #[arg(long, default_value_t = 1)]
    inter_cluster_pairs: usize,
}

#[derive(Args, Debug)]
struct MapArgs {
    /// File to translate
    input: PathBuf,

    /// Destination of the translated text
    output: PathBuf,

    /// Substitution table, `source<TAB>destination` per line
    #[arg(long, value_name = "PATH", required_unless_present = "from_order", conflicts_with = "from_order")]
    table: Option<PathBuf>,

    /// Derive the table from the order inferred from this word list
    #[arg(long, value_name = "PATH", requires = "to_alphabet")]
    from_order: Option<PathBuf>,

    /// Alphabet paired symbol by symbol with the inferred order
    #[arg(long, value_name = "PATH", requires = "from_order")]
    to_alphabet: Option<PathBuf>,

    /// Also write the derived table here
    #[arg(long, value_name = "PATH", requires = "from_order")]
    save_table: Option<PathBuf>,
}

fn parse_code_point(value: &str) -> Result<u32, String> {
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("U+"))
        .or_else(|| value.strip_prefix("u+"));
    match hex {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => value.parse(),
    }
    .map_err(|e| format!("invalid code point {:?}: {}", value, e))
}

fn write_output(path: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => fs::write(path, contents).with_context(|| format!("could not write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn solve(path: &Path, output: Option<&Path>, deterministic: bool) -> anyhow::Result<ExitCode> {
    let tie_break = if deterministic { TieBreak::Ascending } else { TieBreak::Insertion };
    let report = ExtractionReport::solve(path, &OrderExtractor::new(tie_break))?;

    match &report.outcome {
        Ok(order) => info!(symbols = order.len(), words = report.stats.kept_lines, "found an order"),
        Err(failure) => warn!(%failure, "no valid order"),
    }
    write_output(output, &report.to_string())?;

    Ok(if report.is_solved() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    if args.input_words == 0 {
        info!("zero words requested, writing an empty list");
        return write_output(args.output_path.as_deref(), "");
    }

    let alphabet = Alphabet::read(&args.input_path)?;
    let symbols = alphabet.len();
    let adversarial = args.mode == Mode::Adversarial;

    let mut builder = EncoderBuilder::new(alphabet);
    builder
        .word_count(args.input_words)
        .word_len(args.min_word_size, args.max_word_size)
        .seed(args.seed)
        .mode(args.mode)
        .pain_prefix(args.pain_prefix_len.unwrap_or(if adversarial { ADVERSARIAL_PAIN_PREFIX } else { 0 }));
    if let Some(filler) = args.filler_symbol {
        builder.filler(filler);
    }
    if let Some(enforced) = args.enforce_prefix {
        builder.enforce_prefix(enforced);
    }
    if adversarial {
        builder
            .clusters(args.clusters.unwrap_or(ADVERSARIAL_CLUSTERS.min(symbols)))
            .enforce_global(args.enforce_global)
            .enforce_per_cluster(args.enforce_per_cluster)
            .noise_ratio(args.noise_ratio)
            .inter_cluster_pairs(args.inter_cluster_pairs);
    }

    let words = builder.build()?.encode();
    info!(mode = %args.mode, words = words.len(), symbols, "generated word list");

    let mut contents = String::new();
    for word in &words {
        contents.push_str(word);
        contents.push('\n');
    }
    write_output(args.output_path.as_deref(), &contents)
}

fn substitution_table(args: &MapArgs) -> anyhow::Result<SubstitutionTable> {
    if let Some(path) = &args.table {
        return Ok(SubstitutionTable::read(path)?);
    }

    let (Some(words_path), Some(alphabet_path)) = (&args.from_order, &args.to_alphabet) else {
        bail!("either --table or both --from-order and --to-alphabet are required");
    };

    let (words, _) = read_words(words_path)?;
    let order = OrderExtractor::default()
        .extract(&words)
        .with_context(|| format!("cannot infer an order from {}", words_path.display()))?;
    let table = SubstitutionTable::from_orders(&order, &Alphabet::read(alphabet_path)?)?;

    if let Some(path) = &args.save_table {
        write_output(Some(path.as_path()), &table.to_string())?;
    }
    Ok(table)
}

fn map(args: &MapArgs) -> anyhow::Result<()> {
    let table = substitution_table(args)?;

    let bytes = fs::read(&args.input).with_context(|| format!("could not read {}", args.input.display()))?;
    let (text, encoding) = decode(&bytes);
    info!(%encoding, entries = table.len(), "mapping {}", args.input.display());

    let file = File::create(&args.output).with_context(|| format!("could not create {}", args.output.display()))?;
    table.map_stream(Cursor::new(text), BufWriter::new(file))?;
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Solve { path, output, deterministic } => solve(&path, output.as_deref(), deterministic),
        Command::Generate(args) => generate(&args).map(|()| ExitCode::SUCCESS),
        Command::Symbols { start, end, output } => {
            if end < start {
                bail!("--end {:#x} is below --start {:#x}", end, start);
            }
            let alphabet = Alphabet::from_code_points(start..=end);
            info!(symbols = alphabet.len(), "generated alphabet");
            write_output(output.as_deref(), &alphabet.to_string()).map(|()| ExitCode::SUCCESS)
        }
        Command::Map(args) => map(&args).map(|()| ExitCode::SUCCESS),
    }
}
