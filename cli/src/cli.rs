use clap::Parser;
use std::path::PathBuf;

/// Interactive terminal agent backed by an OpenAI-compatible chat API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Environment file with KEY=value settings (defaults to ./.env)
    #[arg(long, env = "ASIONE_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error); overrides ASIONE_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    /// Disable the long-term knowledge store for this session
    #[arg(long, default_value_t = false)]
    pub no_memory: bool,
}
