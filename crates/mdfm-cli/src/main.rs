//! mdfm CLI: read, rewrite and validate document frontmatter.
//!
//! Commands: get, set, merge, validate, completions
//!
//! Results are printed as JSON on stdout, failures included, so scripts
//! can consume the output of every invocation. Logs go to stderr.

mod commands;
mod logging;
mod output;
mod storage;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, CommandFactory, Parser};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "mdfm")]
#[command(version)]
#[command(about = "Read and rewrite the frontmatter of markdown documents")]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print all frontmatter fields, or a single one
    Get {
        file: PathBuf,
        /// Only print this field
        #[arg(long)]
        field: Option<String>,
    },
    /// Set one field and rewrite the file
    Set {
        file: PathBuf,
        #[arg(long)]
        field: String,
        /// Raw value; `true`, `42` and `["a","b"]` are typed
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
    /// Apply a JSON object of field updates in a single rewrite
    Merge {
        file: PathBuf,
        /// JSON object, e.g. '{"status": "done", "wave": 2}'
        #[arg(long)]
        data: String,
    },
    /// Check required fields and allowed values
    #[command(group(ArgGroup::new("source").required(true).multiple(true)))]
    Validate {
        file: PathBuf,
        /// Built-in rule set: plan, summary or verification
        #[arg(long, group = "source")]
        schema: Option<String>,
        /// YAML or JSON rules file
        #[arg(long, group = "source")]
        rules: Option<PathBuf>,
        /// Extra required fields, comma separated
        #[arg(long, group = "source", value_delimiter = ',')]
        require: Vec<String>,
    },
    /// Print shell completions
    Completions { shell: Shell },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = match cli.command {
        Commands::Get { file, field } => commands::get(&file, field.as_deref()),
        Commands::Set { file, field, value } => commands::set(&file, &field, &value),
        Commands::Merge { file, data } => commands::merge(&file, &data),
        Commands::Validate {
            file,
            schema,
            rules,
            require,
        } => commands::validate(&file, schema.as_deref(), rules.as_deref(), &require),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "mdfm", &mut io::stdout());
            return Ok(ExitCode::SUCCESS);
        }
    };

    output::emit(outcome)
}
