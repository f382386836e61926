use std::path::PathBuf;

use clap::Parser;

/// Generates a data-holder struct based on a SQL query result.
#[derive(Parser, Debug, Clone)]
#[command(name = "dto-gen")]
pub struct Args {
    /// Name of the generated struct.
    #[arg(long)]
    pub name: String,

    /// SQL query whose result columns drive the generation.
    #[arg(long)]
    pub sql: String,

    /// Connection name, looked up in the config file. Case is sensitive.
    #[arg(long)]
    pub cn: String,

    /// Module (namespace) wrapping the generated struct.
    #[arg(long)]
    pub ns: Option<String>,

    /// Path to the connections config file.
    #[arg(long, default_value = "connections.json")]
    pub config: PathBuf,

    /// Directory the generated file is written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Logging level (stderr). Also supports RUST_LOG.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
