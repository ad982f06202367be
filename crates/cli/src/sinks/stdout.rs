use chrono::{DateTime, SecondsFormat};
use dnstap_collector_application::services::SinkHandle;
use dnstap_collector_domain::{DnsObservation, OutputConfig, OutputFormat};
use std::fmt::Write as _;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// Starts the stdout writer and returns the handle collectors feed.
///
/// The task ends once every clone of the handle is dropped and the channel
/// is empty; it resolves to the number of lines written.
pub fn spawn_stdout_sink(config: &OutputConfig) -> (SinkHandle, JoinHandle<u64>) {
    let (handle, rx) = SinkHandle::channel("stdout", config.queue_capacity);
    let task = tokio::spawn(write_lines(rx, config.format));
    (handle, task)
}

async fn write_lines(mut rx: mpsc::Receiver<DnsObservation>, format: OutputFormat) -> u64 {
    let mut out = BufWriter::new(tokio::io::stdout());
    let mut written = 0u64;

    while let Some(observation) = rx.recv().await {
        let line = match format {
            OutputFormat::Text => format_text(&observation),
            OutputFormat::Json => match serde_json::to_string(&observation) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize observation");
                    continue;
                }
            },
        };

        if let Err(e) = write_line(&mut out, &line, rx.is_empty()).await {
            error!(error = %e, "stdout closed, dropping remaining observations");
            rx.close();
            break;
        }
        written += 1;
    }

    let _ = out.flush().await;
    written
}

async fn write_line<W>(out: &mut W, line: &str, flush: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    if flush {
        out.flush().await?;
    }
    Ok(())
}

/// One human-readable line:
/// `time identity operation client protocol rcode qname qtype size latency`.
pub fn format_text(observation: &DnsObservation) -> String {
    let time = DateTime::from_timestamp(
        observation.time_seconds as i64,
        observation.time_nanoseconds,
    )
    .map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true))
    .unwrap_or_else(|| "-".to_string());

    let client = match (observation.query_ip, observation.query_port) {
        (Some(ip), Some(port)) => std::net::SocketAddr::new(ip, port).to_string(),
        (Some(ip), None) => ip.to_string(),
        _ => "-".to_string(),
    };

    let mut line = String::with_capacity(128);
    let _ = write!(
        line,
        "{} {} {} {} {} {} {} {} {}b",
        time,
        observation.identity.as_deref().unwrap_or("-"),
        observation.operation,
        client,
        observation.transport_protocol,
        observation.response_code,
        observation.question_name.as_deref().unwrap_or("-"),
        observation.question_type.as_deref().unwrap_or("-"),
        observation.payload_length,
    );
    match observation.latency_seconds {
        Some(latency) => {
            let _ = write!(line, " {:.6}s", latency);
        }
        None => line.push_str(" -"),
    }
    line
}
