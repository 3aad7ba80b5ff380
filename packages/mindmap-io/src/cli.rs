//! Command-line interface for mindmap-io.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::document::MapIo;
use crate::error::Result;
use crate::links::NodeLinks;
use crate::model::MapModel;
use crate::registry::ParseWarning;

/// Inspect, normalize and merge mind-map documents.
#[derive(Parser)]
#[command(name = "mindmap-io")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// YAML file with the standard connector style
    #[arg(long, global = true)]
    pub style: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print node and connector counts and any warnings.
    Inspect {
        /// Map file (.mm)
        file: PathBuf,
    },

    /// Read a map and write it back in canonical form.
    Normalize {
        /// Map file (.mm)
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Paste a node fragment into a map.
    Paste {
        /// Map file (.mm)
        map: PathBuf,

        /// File holding a single <node> element
        fragment: PathBuf,

        /// Identifier of the node that receives the fragment
        #[arg(short, long)]
        parent: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let io = match &cli.style {
        Some(path) => MapIo::from_style_file(path)?,
        None => MapIo::default(),
    };

    match cli.command {
        Commands::Inspect { file } => inspect_command(&io, &file),
        Commands::Normalize { file, output } => normalize_command(&io, &file, output.as_deref()),
        Commands::Paste {
            map,
            fragment,
            parent,
            output,
        } => paste_command(&io, &map, &fragment, &parent, output.as_deref()),
    }
}

fn inspect_command(io: &MapIo, file: &Path) -> Result<()> {
    let outcome = io.read_file(file)?;

    println!("{} {}", style("Map").bold(), style(file.display()).cyan());
    println!("  Nodes: {}", outcome.map.len());
    println!("  Connectors: {}", count_connectors(&outcome.map));
    print_warnings(&outcome.warnings);
    Ok(())
}

fn normalize_command(io: &MapIo, file: &Path, output: Option<&Path>) -> Result<()> {
    let outcome = io.read_file(file)?;
    print_warnings(&outcome.warnings);
    emit(&io.write(&outcome.map)?, output)
}

fn paste_command(
    io: &MapIo,
    map_file: &Path,
    fragment_file: &Path,
    parent: &str,
    output: Option<&Path>,
) -> Result<()> {
    let mut outcome = io.read_file(map_file)?;
    let fragment = std::fs::read_to_string(fragment_file)?;

    let mut warnings = outcome.warnings;
    warnings.extend(io.paste(&mut outcome.map, parent, &fragment)?);
    print_warnings(&warnings);
    emit(&io.write(&outcome.map)?, output)
}

/// Total connectors over all attached nodes.
fn count_connectors(map: &MapModel) -> usize {
    map.nodes()
        .into_iter()
        .filter_map(|key| map.node(key).extensions().get::<NodeLinks>())
        .map(|links| links.connectors().count())
        .sum()
}

/// Warnings go to stderr so normalized output on stdout stays clean.
fn print_warnings(warnings: &[ParseWarning]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("  Warnings: {}", style(warnings.len()).yellow().bold());
    for warning in warnings {
        eprintln!("    {} {warning}", style("-").yellow());
    }
}

fn emit(xml: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, xml)?;
            tracing::info!(path = %path.display(), "Wrote map");
            eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => print!("{xml}"),
    }
    Ok(())
}
