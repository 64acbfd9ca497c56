use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use harvest::config::{DEFAULT_INPUT_ROOT, DEFAULT_OUTPUT_DIR, DEFAULT_PROGRESS_EVERY, DEFAULT_TMP_DIR};
use harvest::hooks;
use harvest::rules::read_spec_file;
use harvest::{ExtractConfig, Orchestrator, Rule, RuleSet};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Extract localizable strings from recorded game event logs
#[derive(Parser, Debug)]
#[command(name = "harvest", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every rule over the input tree and write one sorted file per rule
    Extract(ExtractArgs),
    /// Print the registered hooks and the compiled rule set as JSON
    Rules(RuleArgs),
}

#[derive(Args, Debug)]
struct RuleArgs {
    /// Rule spec `<msg>@<path>[#<hook>]`; replaces the built-in catalog (repeatable)
    #[arg(long = "rule", value_name = "SPEC")]
    rules: Vec<String>,

    /// File with one rule spec per line; replaces the built-in catalog
    #[arg(long, value_name = "PATH")]
    rules_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Directory tree holding `{"data": [...]}` documents
    #[arg(long, default_value = DEFAULT_INPUT_ROOT)]
    input: PathBuf,

    /// Directory for per-rule sink files
    #[arg(long, default_value = DEFAULT_TMP_DIR)]
    tmp: PathBuf,

    /// Directory for the final JSON arrays
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Document workers (default: 4 x CPUs)
    #[arg(long)]
    parse_jobs: Option<usize>,

    /// Flush workers (default: 2 x CPUs)
    #[arg(long)]
    flush_jobs: Option<usize>,

    /// Log progress every N files
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    progress_every: usize,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,

    #[command(flatten)]
    rules: RuleArgs,
}

#[derive(Serialize)]
struct Listing<'a> {
    hooks: Vec<&'static str>,
    rules: Vec<RuleListing<'a>>,
}

#[derive(Serialize)]
struct RuleListing<'a> {
    #[serde(flatten)]
    rule: &'a Rule,
    hook_known: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract(args) => extract(args),
        Command::Rules(args) => list_rules(&args),
    }
}

/// Compile the rule set before any work starts; a bad spec stops here
fn load_rules(args: &RuleArgs) -> Result<RuleSet> {
    let mut specs = args.rules.clone();
    if let Some(path) = &args.rules_file {
        specs.extend(read_spec_file(path)?);
    }

    let rules = if specs.is_empty() {
        RuleSet::builtin()
    } else {
        RuleSet::from_specs(&specs)
    };
    rules.context("Invalid rule configuration")
}

fn extract(args: ExtractArgs) -> Result<()> {
    let rules = load_rules(&args.rules)?;

    let mut config = ExtractConfig::new()
        .input_root(&args.input)
        .tmp_dir(&args.tmp)
        .output_dir(&args.output)
        .progress_every(args.progress_every);
    if let Some(jobs) = args.parse_jobs {
        config = config.parse_parallelism(jobs);
    }
    if let Some(jobs) = args.flush_jobs {
        config = config.flush_parallelism(jobs);
    }

    let summary = Orchestrator::new(config, rules).run()?;

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn list_rules(args: &RuleArgs) -> Result<()> {
    let rules = load_rules(args)?;
    let listing = Listing {
        hooks: hooks::names(),
        rules: rules
            .iter()
            .map(|rule| RuleListing {
                rule,
                hook_known: rule.hook_is_known(),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
