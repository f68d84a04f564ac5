use std::path::{Path, PathBuf};
use clap::Parser;
use crate::sources::SourceSpec;

mod commands;
mod errors;
mod merge;
mod sources;
mod utils;
mod vectors;

/// Merge handshake test vector files, keeping one vector per protocol name.
#[derive(Debug, Clone, clap::Parser)]
struct Cli {
    /// Directory containing the vector files
    #[arg(short, long, default_value = ".")]
    data_directory: PathBuf,

    /// Output file (defaults to vectors.txt one level above the data directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source files as [NAME=]FILE, relative to the data directory, in merge order
    #[arg(short, long)]
    source: Vec<SourceSpec>,

    /// Derive protocol names from the `name` field for these sources
    #[arg(long)]
    derive_protocol_name: Vec<String>,

    /// Use every source in the reference catalog, including disabled ones
    #[arg(long, conflicts_with = "source")]
    include_disabled: bool,

    /// Also write logs to this directory
    #[arg(long)]
    log_directory: Option<PathBuf>,
}

fn setup_logging(log_directory: Option<&Path>) -> anyhow::Result<flexi_logger::LoggerHandle> {
    let spec = flexi_logger::LogSpecification::parse("warn,vector_merger=debug")?;
    let logger = flexi_logger::Logger::with(spec)
        .format_for_stdout(flexi_logger::colored_detailed_format)
        .set_palette("b1;3;2;4;6".to_string());
    let logger = match log_directory {
        Some(directory) => logger
            .log_to_file(
                flexi_logger::FileSpec::default()
                    .directory(directory)
                    .basename("vector-merger")
                    .use_timestamp(false),
            )
            .duplicate_to_stdout(flexi_logger::Duplicate::Info)
            .format_for_files(flexi_logger::detailed_format),
        None => logger.log_to_stdout()
    };
    Ok(logger.start()?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(cli.log_directory.as_deref())?;

    log::debug!("Data directory: {}", cli.data_directory.display());
    let mut sources = if cli.source.is_empty() {
        sources::reference_sources(&cli.data_directory, cli.include_disabled)
    } else {
        cli.source.iter()
            .map(|spec| spec.resolve(&cli.data_directory))
            .collect::<anyhow::Result<Vec<_>>>()?
    };
    sources::apply_name_derivation(&mut sources, &cli.derive_protocol_name)?;
    let output = cli.output
        .unwrap_or_else(|| utils::paths::default_output(&cli.data_directory));

    commands::merge_vectors::merge_vectors(sources, output)
}
