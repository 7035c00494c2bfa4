// enables structured JSON logs for hosts that aggregate them
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // ANSI color codes show up in a confusing manner in aggregated logs.
        .with_ansi(false)
        // the log pipeline adds its own ingestion time.
        .without_time()
        .json()
        .init();
}
