use clap::Parser;
use dnstap_collector_domain::{CliOverrides, OutputFormat};
use tracing::info;

mod bootstrap;
mod server;
mod sinks;

#[derive(Parser)]
#[command(name = "dnstap-collector")]
#[command(version)]
#[command(about = "dnstap collector - Frame Streams listener with query/reply correlation")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Observation output format (text, json)
    #[arg(long)]
    output_format: Option<OutputFormat>,

    /// Listen port for every TCP collector
    #[arg(short = 'p', long)]
    listen_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        log_level: cli.log_level,
        output_format: cli.output_format,
        listen_port: cli.listen_port,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!(
        collectors = config.collectors.len(),
        output = %config.output.format,
        "Starting dnstap collector v{}",
        env!("CARGO_PKG_VERSION")
    );

    let (sink, sink_task) = sinks::spawn_stdout_sink(&config.output);
    let collectors = server::start_collectors(&config, sink)?;

    bootstrap::shutdown_signal().await;
    info!("Shutdown signal received, draining collectors");

    server::stop_collectors(collectors).await;

    // Every collector has dropped its sink handle by now, so the sink ends
    // once it has written what is left in its channel.
    let written = sink_task.await?;
    info!(observations = written, "dnstap collector stopped");
    Ok(())
}
