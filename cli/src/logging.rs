use env_logger::Env;

/// Environment variable holding the default log filter
pub const LOG_ENV: &str = "ASIONE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Initializes the global logger. An explicit level wins over `ASIONE_LOG`.
pub fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, DEFAULT_FILTER));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.format_timestamp(None).init();
}
