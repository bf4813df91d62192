use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shipkit_core::Capability;

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(name = "shipkit")]
#[command(about = "Build, send and decode shipping carrier requests", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List built-in carriers and their capabilities.
    Carriers,
    /// List a carrier's shipping methods.
    Methods(MethodsArgs),
    /// Print the request an operation would send, without sending it.
    Serialize(OperationArgs),
    /// Send an operation to the carrier and print the decoded outcome.
    Run(OperationArgs),
}

#[derive(Debug, Args)]
pub struct MethodsArgs {
    pub carrier: String,
    /// Only methods sold from this ISO country code.
    #[arg(long, value_name = "COUNTRY")]
    pub origin: Option<String>,
}

#[derive(Debug, Args)]
pub struct OperationArgs {
    pub carrier: String,
    #[arg(value_enum)]
    pub operation: OperationArg,
    /// Shipment document (`.json` or `.toml`).
    #[arg(long, value_name = "FILE")]
    pub shipment: PathBuf,
    /// Carrier options document (`.json` or `.toml`).
    #[arg(long, value_name = "FILE")]
    pub options: PathBuf,
    /// Service code to book; required for labels.
    #[arg(long, value_name = "CODE")]
    pub service: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Rates,
    Labels,
    Timings,
    Load,
}

impl OperationArg {
    pub const fn capability(self) -> Capability {
        match self {
            Self::Rates => Capability::Rates,
            Self::Labels => Capability::Labels,
            Self::Timings => Capability::Timings,
            Self::Load => Capability::Loads,
        }
    }
}
