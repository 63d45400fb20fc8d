use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gherkin_fmt_config::{Config, LoadOptions};
use gherkin_fmt_core::{discover_files, FeatureFormatter};
use serde_json::json;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut load = LoadOptions::default();
    if let Some(path) = &cli.config {
        load = load.with_config_path(path.clone());
    }
    let mut config = Config::load(load)?;

    if let Some(indent) = cli.background_indent {
        config.indent.background_and_scenario = indent;
    }
    if let Some(indent) = cli.step_indent {
        config.indent.step = indent;
    }
    if let Some(indent) = cli.table_indent {
        config.indent.table_and_doc_string = indent;
    }

    let formatter = FeatureFormatter::from_config(&config);

    match cli.command {
        Command::Fmt(command) => match command {
            FmtCommand::Stdout { file } => handle_stdout(&formatter, &file),
            FmtCommand::Replace { path } => handle_replace(&formatter, &path, &config.extensions),
        },
        Command::Check(args) => handle_check(&formatter, &config.extensions, args),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "gherkin-fmt",
    author,
    version,
    about = "Gherkin feature file formatter",
    long_about = None
)]
struct Cli {
    /// Use an explicit configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the background/scenario indentation level
    #[arg(long, global = true, value_name = "N")]
    background_indent: Option<usize>,

    /// Override the step/examples indentation level
    #[arg(long, global = true, value_name = "N")]
    step_indent: Option<usize>,

    /// Override the table/doc-string indentation level
    #[arg(long, global = true, value_name = "N")]
    table_indent: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format feature files
    #[command(subcommand)]
    Fmt(FmtCommand),
    /// Verify files are canonically formatted without rewriting them
    Check(CheckArgs),
}

#[derive(Subcommand, Debug)]
enum FmtCommand {
    /// Print the formatted document to stdout
    Stdout {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Rewrite a file, or every matching file under a directory, in place
    Replace {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<CheckFormat>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CheckFormat {
    Plain,
    Json,
}

fn handle_stdout(formatter: &FeatureFormatter, file: &Path) -> Result<i32> {
    let formatted = formatter
        .transform_file(file)
        .with_context(|| format!("failed to format {}", file.display()))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(formatted.as_bytes())?;
    stdout.flush()?;
    Ok(0)
}

fn handle_replace(
    formatter: &FeatureFormatter,
    path: &Path,
    extensions: &[String],
) -> Result<i32> {
    let errors = formatter.transform_and_replace(path, extensions);

    for error in &errors {
        eprintln!("{error}");
    }

    Ok(if errors.is_empty() { 0 } else { 1 })
}

fn handle_check(
    formatter: &FeatureFormatter,
    extensions: &[String],
    args: CheckArgs,
) -> Result<i32> {
    let files = check_targets(&args.path, extensions)?;

    let mut unformatted: Vec<PathBuf> = Vec::new();
    let mut failures: Vec<(PathBuf, String)> = Vec::new();

    for file in &files {
        let on_disk = match fs::read_to_string(file) {
            Ok(contents) => contents,
            Err(err) => {
                failures.push((file.clone(), err.to_string()));
                continue;
            }
        };

        match formatter.transform_source(&on_disk) {
            Ok(formatted) if formatted == on_disk => {}
            Ok(_) => unformatted.push(file.clone()),
            Err(err) => failures.push((file.clone(), err.to_string())),
        }
    }

    match args.format.unwrap_or(CheckFormat::Plain) {
        CheckFormat::Plain => {
            for file in &unformatted {
                println!("{} is not formatted", file.display());
            }
            for (file, message) in &failures {
                eprintln!("{}: {message}", file.display());
            }
        }
        CheckFormat::Json => {
            let report = json!({
                "checked": files.len(),
                "unformatted": unformatted
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>(),
                "errors": failures
                    .iter()
                    .map(|(path, message)| json!({
                        "path": path.display().to_string(),
                        "message": message,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{report}");
        }
    }

    Ok(if unformatted.is_empty() && failures.is_empty() {
        0
    } else {
        1
    })
}

fn check_targets(path: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("cannot check {}", path.display()))?;

    if metadata.is_dir() {
        discover_files(path, extensions)
            .with_context(|| format!("failed to scan {}", path.display()))
    } else {
        Ok(vec![path.to_path_buf()])
    }
}
