use dnstap_collector_application::services::SinkHandle;
use dnstap_collector_application::use_cases::DecodeStats;
use dnstap_collector_domain::Config;
use dnstap_collector_infrastructure::collector::{
    CollectorError, CollectorStopHandle, DnstapCollector,
};
use dnstap_collector_infrastructure::dnstap::ProtobufEventDecoder;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub struct RunningCollector {
    name: String,
    stop: CollectorStopHandle,
    task: JoinHandle<Result<DecodeStats, CollectorError>>,
}

/// Binds every configured collector before spawning any of them, so a bad
/// endpoint fails startup instead of leaving half the collectors running.
pub fn start_collectors(
    config: &Config,
    sink: SinkHandle,
) -> anyhow::Result<Vec<RunningCollector>> {
    let decoder = Arc::new(ProtobufEventDecoder::new());

    let mut bound = Vec::with_capacity(config.collectors.len());
    for collector_config in &config.collectors {
        let mut collector = DnstapCollector::new(
            collector_config.name.clone(),
            vec![sink.clone()],
            collector_config.clone(),
            decoder.clone(),
        );
        collector.listen().map_err(|e| {
            anyhow::anyhow!("Collector '{}' failed to start: {}", collector_config.name, e)
        })?;
        bound.push(collector);
    }

    Ok(bound
        .into_iter()
        .map(|collector| {
            let name = collector.name().to_string();
            let stop = collector.stop_handle();
            let task = tokio::spawn(collector.run());
            RunningCollector { name, stop, task }
        })
        .collect())
}

pub async fn stop_collectors(collectors: Vec<RunningCollector>) {
    for running in collectors {
        running.stop.stop().await;
        match running.task.await {
            Ok(Ok(stats)) => info!(
                collector = %running.name,
                frames = stats.frames,
                emitted = stats.emitted,
                envelope_errors = stats.envelope_errors,
                payload_errors = stats.payload_errors,
                "Collector drained"
            ),
            Ok(Err(e)) => error!(collector = %running.name, error = %e, "Collector failed"),
            Err(e) => error!(collector = %running.name, error = %e, "Collector task panicked"),
        }
    }
}
