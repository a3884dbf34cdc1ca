use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sota_unwrapped::config::{DataPaths, DATA_DIR_ENV, DEFAULT_DATA_DIR};
use sota_unwrapped::identity::{self, CallsignDirectory};
use sota_unwrapped::normalize::{normalize_activations, normalize_contacts};
use sota_unwrapped::summary::{self, ReferenceData};
use sota_unwrapped::{report, UnwrappedError};

#[derive(Parser)]
#[command(name = "sota-unwrapped")]
#[command(about = "Yearly SOTA statistics for activators and chasers", long_about = None)]
struct Cli {
    /// Directory holding the honor rolls and the summit list
    #[arg(long, global = true, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize an activator log
    Activator {
        #[arg(long)]
        callsign: String,
        /// JSON array of activation log entries
        #[arg(long)]
        activations: PathBuf,
        /// JSON array of summit-to-summit contacts
        #[arg(long)]
        s2s: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Summarize a chaser log
    Chaser {
        #[arg(long)]
        callsign: String,
        /// JSON array of chaser contacts
        #[arg(long)]
        contacts: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Look up a user id in the cached honor rolls
    Resolve {
        #[arg(long)]
        callsign: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sota_unwrapped=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = DataPaths::from_data_dir(&cli.data_dir);
    let reference_context =
        || format!("failed to load reference data from {}", cli.data_dir.display());

    match cli.command {
        Commands::Activator {
            callsign,
            activations,
            s2s,
            format,
            out,
        } => {
            let reference = ReferenceData::load(&paths).with_context(reference_context)?;
            let callsign = callsign.trim().to_uppercase();
            let records = normalize_activations(&read_json_array(&activations)?);
            let s2s = match s2s {
                Some(path) => normalize_contacts(&read_json_array(&path)?),
                None => Vec::new(),
            };

            let summary = match summary::activator_summary(&callsign, &records, &s2s, &reference) {
                Ok(summary) => summary,
                Err(UnwrappedError::EmptyInput) => {
                    emit(&no_activations(&callsign, format), out.as_deref())?;
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            let rendered = match format {
                Format::Json => to_json(&summary)?,
                Format::Markdown => report::build_activator_report(&summary),
            };
            emit(&rendered, out.as_deref())?;
        }
        Commands::Chaser {
            callsign,
            contacts,
            format,
            out,
        } => {
            let reference = ReferenceData::load(&paths).with_context(reference_context)?;
            let callsign = callsign.trim().to_uppercase();
            let contacts = normalize_contacts(&read_json_array(&contacts)?);
            let summary = summary::chaser_summary(&callsign, &contacts, &reference)?;

            let rendered = match format {
                Format::Json => to_json(&summary)?,
                Format::Markdown => report::build_chaser_report(&summary),
            };
            emit(&rendered, out.as_deref())?;
        }
        Commands::Resolve { callsign } => {
            let reference = ReferenceData::load_rolls(&paths).with_context(reference_context)?;
            let directories: [&dyn CallsignDirectory; 2] =
                [&reference.activator_roll, &reference.chaser_roll];
            match identity::resolve_user_id(&callsign, &directories) {
                Some(user_id) => println!("{user_id}"),
                None => println!("No user found for {}.", callsign.trim().to_uppercase()),
            }
        }
    }

    Ok(())
}

fn read_json_array(path: &Path) -> anyhow::Result<Vec<serde_json::Value>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("{} is not a JSON array", path.display()))?;
    info!(path = %path.display(), entries = values.len(), "read log entries");
    Ok(values)
}

/// Output for a callsign with no activations. JSON mode writes `null` to
/// keep stdout parseable and reports the reason on stderr.
fn no_activations(callsign: &str, format: Format) -> String {
    let message = format!("No activations found for {callsign}.");
    match format {
        Format::Json => {
            eprintln!("{message}");
            "null\n".to_string()
        }
        Format::Markdown => format!("{message}\n"),
    }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize summary")?;
    Ok(format!("{json}\n"))
}

fn emit(rendered: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Summary written to {}.", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_activations_keeps_json_output_parseable() {
        let json = no_activations("G4XYZ", Format::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_null());

        let text = no_activations("G4XYZ", Format::Markdown);
        assert_eq!(text, "No activations found for G4XYZ.\n");
    }

    #[test]
    fn data_dir_is_global() {
        let cli = Cli::parse_from([
            "sota-unwrapped",
            "resolve",
            "--callsign",
            "G5JFJ",
            "--data-dir",
            "/srv/unwrapped",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/srv/unwrapped"));
        assert!(matches!(cli.command, Commands::Resolve { .. }));
    }
}
