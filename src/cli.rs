use clap::Parser;

/// Run a TOML suite of HTTP request/response checks
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the suite file
    #[arg(short, long, default_value = "suites/reqres.toml")]
    pub path: String,

    /// Send every request to this base URL instead of `setup.base_url`
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Log requests and responses (same as RUST_LOG=restquest=debug)
    #[arg(short, long)]
    pub verbose: bool,
}
