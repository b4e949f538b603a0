pub mod store;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "catalog-rotate")]
#[command(about = "Rotate the database passwords behind catalog-managed sources")]
pub struct CliConfig {
    #[arg(long, default_value = "/usr/local/etc/catalog-rotate.toml")]
    pub config: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit log lines as JSON")]
    pub log_json: bool,
}
