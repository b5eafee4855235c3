use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use difftext::{is_word_char, levenshtein, Cleanup, Differ, DEFAULT_EDIT_COST};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(version, about = "A tool for comparing texts character by character")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum CleanupArg {
    None,
    Semantic,
    Efficiency,
    Word,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two files and print the edit records
    Compare {
        /// The original file
        #[arg(short = 'i', long)]
        old: PathBuf,

        /// The new file
        #[arg(short, long)]
        new: PathBuf,

        /// Time budget in seconds; zero or less means no limit
        #[arg(short, long, default_value_t = 1.0)]
        timeout: f64,

        /// Disable the line-level speedup for large inputs
        #[arg(long, default_value_t = false)]
        no_line_mode: bool,

        /// Cleanup pass applied to the raw diff
        #[arg(short, long, value_enum, default_value_t = CleanupArg::None)]
        cleanup: CleanupArg,

        /// Cost of one edit operation, used by efficiency and word cleanup
        #[arg(short, long, allow_negative_numbers = true)]
        edit_cost: Option<i32>,

        /// The output file (defaults to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            old,
            new,
            timeout,
            no_line_mode,
            cleanup,
            edit_cost,
            output,
        } => {
            if timeout.is_nan() {
                bail!("timeout must be a number of seconds");
            }

            let cleanup = match cleanup {
                CleanupArg::None => Cleanup::None,
                CleanupArg::Semantic => Cleanup::Semantic,
                CleanupArg::Efficiency => {
                    let cost = edit_cost.unwrap_or(DEFAULT_EDIT_COST as i32);
                    if cost < 0 {
                        bail!("efficiency cleanup needs a non-negative edit cost");
                    }
                    Cleanup::Efficiency(cost.unsigned_abs() as usize)
                }
                CleanupArg::Word => Cleanup::WordSemantic {
                    edit_cost: edit_cost.unwrap_or(-1),
                    is_word: is_word_char,
                },
            };

            let differ = Differ::from_paths(&old, &new)?
                .line_mode(!no_line_mode)
                .cleanup(cleanup);
            let differ = match Duration::try_from_secs_f64(timeout) {
                Ok(budget) if timeout > 0.0 => differ.timeout(budget),
                _ => differ.no_timeout(),
            };

            let diffs = differ.generate();
            info!(
                records = diffs.len(),
                distance = levenshtein(&diffs),
                "comparison finished"
            );

            let result: String = diffs.iter().map(|diff| format!("{diff}\n")).collect();
            match output {
                Some(path) => fs::write(path, result)?,
                None => print!("{}", result),
            }
        }
    }

    Ok(())
}
