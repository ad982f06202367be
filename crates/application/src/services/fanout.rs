use dnstap_collector_domain::DnsObservation;
use std::fmt;
use tokio::sync::mpsc;
use tracing::warn;

/// A named downstream consumer fed through a bounded channel.
#[derive(Clone)]
pub struct SinkHandle {
    name: String,
    sender: mpsc::Sender<DnsObservation>,
}

impl SinkHandle {
    pub fn new(name: impl Into<String>, sender: mpsc::Sender<DnsObservation>) -> Self {
        Self {
            name: name.into(),
            sender,
        }
    }

    /// Creates a handle together with the receiving end of its channel.
    pub fn channel(
        name: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<DnsObservation>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(name, tx), rx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkHandle")
            .field("name", &self.name)
            .field("capacity", &self.sender.max_capacity())
            .finish()
    }
}

/// Delivers every observation to each registered sink, in registration order.
///
/// Delivery is sequential: a full sink holds back the sinks after it and the
/// caller until it has room.
pub struct FanoutDispatcher {
    sinks: Vec<SinkHandle>,
}

impl FanoutDispatcher {
    pub fn new(sinks: Vec<SinkHandle>) -> Self {
        Self { sinks }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(SinkHandle::name).collect()
    }

    /// Returns how many sinks accepted the observation.
    pub async fn dispatch(&mut self, observation: DnsObservation) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for (index, sink) in self.sinks.iter().enumerate() {
            match sink.sender.send(observation.clone()).await {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!(sink = %sink.name, "Sink closed, removing it from dispatch");
                    closed.push(index);
                }
            }
        }

        for index in closed.into_iter().rev() {
            self.sinks.remove(index);
        }

        delivered
    }
}
