//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use apphost::core::color::{parse_accent, Rgb};
use apphost::util::shell::ColorChoice;

/// AppHost - builds launcher-redirect Android apps from a .NET host template
#[derive(Parser)]
#[command(name = "apphost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color)]
    pub color: ColorChoice,

    /// Host template directory (overrides `host.dir`)
    #[arg(long, global = true, env = "APPHOST_HOST", value_name = "DIR")]
    pub host: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_color(s: &str) -> Result<ColorChoice, String> {
    s.parse()
}

fn parse_accent_arg(s: &str) -> Result<Rgb, String> {
    parse_accent(s)
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a redirect app for a package
    Build(BuildArgs),

    /// Render adaptive icon layers from a monochrome mask
    Icon(IconArgs),

    /// Check the installed .NET toolchain
    Toolchain,

    /// Find the built package of an existing workspace
    Locate(LocateArgs),

    /// List the built-in accent swatches
    Swatches,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Android package to redirect to (e.g. com.example.app)
    #[arg(short, long)]
    pub package: String,

    /// Launcher display name
    #[arg(short, long)]
    pub name: String,

    /// Adaptive icon foreground image
    #[arg(long, value_name = "IMAGE")]
    pub foreground: Option<PathBuf>,

    /// Adaptive icon background image
    #[arg(long, value_name = "IMAGE")]
    pub background: Option<PathBuf>,

    /// Monochrome icon mask
    #[arg(long, value_name = "IMAGE")]
    pub monochrome: Option<PathBuf>,

    /// Accent color for generated layers: #RRGGBB or a swatch index
    #[arg(long, value_parser = parse_accent_arg, requires = "monochrome")]
    pub accent: Option<Rgb>,

    /// Replace an existing workspace without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Copy the built package to this file or directory
    #[arg(long, value_name = "PATH")]
    pub save_to: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct IconArgs {
    /// Monochrome icon mask
    #[arg(long, value_name = "IMAGE")]
    pub monochrome: PathBuf,

    /// Accent color: #RRGGBB or a swatch index
    #[arg(long, value_parser = parse_accent_arg)]
    pub accent: Option<Rgb>,

    /// Output directory
    #[arg(long, default_value = "icon-preview", value_name = "DIR")]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct LocateArgs {
    /// Package whose workspace to search
    #[arg(short, long)]
    pub package: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
