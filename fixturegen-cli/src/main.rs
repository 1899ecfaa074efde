use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fixturegen_cli::OutputFormat;
use fixturegen_core::{ConstraintSet, TypeTag};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate constrained test data from the command line
#[derive(Parser)]
#[command(name = "fixturegen")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate values of one type
    #[command(alias = "v")]
    Value(ValueArgs),

    /// Generate rows of dummy data from a JSON field table
    Table(TableArgs),

    /// List the character classes string types draw from
    Classes,
}

#[derive(Args)]
struct GenerationArgs {
    /// Number of values or rows to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible output
    #[arg(short, long, env = "FIXTUREGEN_SEED")]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Existing user ids for USER_ID values (comma separated)
    #[arg(long, value_delimiter = ',')]
    user_ids: Vec<i64>,
}

#[derive(Args)]
struct ValueArgs {
    /// Type tag: ALPHA, NUMERIC, INTEGER, PRICE, EMAIL, DATE, ...
    #[arg(short = 't', long = "type")]
    tag: String,

    /// Minimum length or value
    #[arg(long, allow_hyphen_values = true)]
    min: Option<i64>,

    /// Maximum length or value, negative for unbounded
    #[arg(long, allow_hyphen_values = true)]
    max: Option<i64>,

    /// Never repeat a value, optionally within a named pool
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    unique: Option<String>,

    /// Lowercase letters only
    #[arg(long, conflicts_with = "uppercase")]
    lowercase: bool,

    /// Uppercase the generated text
    #[arg(long)]
    uppercase: bool,

    /// Constraint in NAME[=PARAM] form, e.g. YESTERDAY
    #[arg(short = 'c', long = "constraint")]
    constraints: Vec<String>,

    #[command(flatten)]
    generation: GenerationArgs,
}

impl ValueArgs {
    fn constraint_set(&self) -> Result<ConstraintSet> {
        let mut constraints = ConstraintSet::parse_all(self.constraints.as_slice())
            .context("parsing --constraint values")?;
        if let Some(min) = self.min {
            constraints = constraints.with_min(min);
        }
        if let Some(max) = self.max {
            constraints = constraints.with_max(max);
        }
        constraints = match self.unique.as_deref() {
            Some("") => constraints.unique(),
            Some(key) => constraints.unique_in(key),
            None => constraints,
        };
        if self.lowercase {
            constraints = constraints.lowercase();
        }
        if self.uppercase {
            constraints = constraints.uppercase();
        }
        Ok(constraints)
    }
}

#[derive(Args)]
struct TableArgs {
    /// Field table file
    path: PathBuf,

    #[command(flatten)]
    generation: GenerationArgs,
}

fn main() {
    colored::control::set_override(
        std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprint!("{}", fixturegen_cli::format_error(&err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Value(args) => run_value(args),
        Commands::Table(args) => run_table(args),
        Commands::Classes => {
            print!("{}", fixturegen_cli::format_classes());
            Ok(())
        }
    }
}

fn run_value(args: ValueArgs) -> Result<()> {
    let constraints = args.constraint_set()?;
    let tag = TypeTag::from(args.tag.as_str());
    let generation = &args.generation;

    let mut generator = fixturegen_cli::build_generator(generation.seed, &generation.user_ids);
    let values =
        fixturegen_cli::generate_values(&mut generator, &tag, &constraints, generation.count)?;

    match generation.format {
        OutputFormat::Text => print!("{}", fixturegen_cli::format_values(&values)),
        OutputFormat::Json => println!("{}", fixturegen_cli::values_to_json(&values)?),
    }
    Ok(())
}

fn run_table(args: TableArgs) -> Result<()> {
    let table = fixturegen_cli::load_table(&args.path)?;
    let generation = &args.generation;

    let mut generator = fixturegen_cli::build_generator(generation.seed, &generation.user_ids);
    let rows = fixturegen_cli::generate_rows(&mut generator, &table, generation.count)?;

    match generation.format {
        OutputFormat::Text => print!("{}", fixturegen_cli::format_rows(&table.type_name, &rows)),
        OutputFormat::Json => println!("{}", fixturegen_cli::rows_to_json(&rows)?),
    }
    Ok(())
}
