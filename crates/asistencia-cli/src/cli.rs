//! CLI command definitions and argument parsing.

use asistencia_gatekeeper::IntakeConfig;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Asistencia - RUT check-in and validation tools.
#[derive(Debug, Parser)]
#[command(name = "asistencia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ASISTENCIA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (formatted RUTs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Strip punctuation, keeping digits and K
    Clean(RutArg),

    /// Format as 12.345.678-5
    Format(RutArg),

    /// Check a RUT's check digit (exit code 1 when invalid)
    Validate(RutArg),

    /// Compute the check digit for a body
    CheckDigit(BodyArg),

    /// Show cleaned, formatted and expected forms for one or more RUTs
    Inspect(InspectArgs),

    /// Run a delimited member sheet through intake
    Import(ImportArgs),

    /// Pull a RUT out of a QR payload or voice transcript
    Extract(ExtractArgs),

    /// Interactive check-in prompt
    Checkin(CheckinArgs),

    /// Show or initialise the configuration file
    Config(ConfigArgs),
}

/// A single free-form RUT.
#[derive(Debug, Parser)]
pub struct RutArg {
    /// RUT in any punctuation, e.g. 12.345.678-5
    pub input: String,
}

/// A RUT body without check character.
#[derive(Debug, Parser)]
pub struct BodyArg {
    /// Body digits, dots allowed (e.g. 12.345.678)
    pub body: String,
}

/// Arguments for the inspect command.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// RUTs to inspect
    #[arg(required = true)]
    pub inputs: Vec<String>,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Delimited text file (CSV export of the member sheet)
    pub file: PathBuf,

    /// 1-based column holding the RUT (default: the "RUT" header, else 1)
    #[arg(long)]
    pub column: Option<usize>,

    /// Field delimiter
    #[arg(short, long, default_value = ",")]
    pub delimiter: char,

    /// File has no header row
    #[arg(long)]
    pub no_header: bool,

    /// Intake rules, overriding the configuration file
    #[arg(short, long, value_enum)]
    pub rules: Option<RulesArg>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("source").required(true).args(["qr", "transcript"])))]
pub struct ExtractArgs {
    /// Scanned QR or barcode payload
    #[arg(long)]
    pub qr: Option<String>,

    /// Voice transcript
    #[arg(long)]
    pub transcript: Option<String>,
}

/// Arguments for the checkin command.
#[derive(Debug, Parser)]
pub struct CheckinArgs {
    /// Intake rules, overriding the configuration file
    #[arg(short, long, value_enum)]
    pub rules: Option<RulesArg>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Intake rule presets.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RulesArg {
    /// Check digit and duplicates
    Default,
    /// Structural parse only
    Permissive,
    /// Check digit, duplicates and 7-8 digit bodies
    Strict,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<RulesArg> for IntakeConfig {
    fn from(rules: RulesArg) -> Self {
        match rules {
            RulesArg::Default => IntakeConfig::default(),
            RulesArg::Permissive => IntakeConfig::permissive(),
            RulesArg::Strict => IntakeConfig::strict(),
        }
    }
}
