//! Background execution of assistant requests.
//!
//! Each request runs on its own thread; results come back over an `mpsc`
//! channel tagged with the pending entry they belong to. The terminal thread
//! applies them when it polls, so the transcript only ever has one writer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use log::{debug, warn};

use crate::assistant::{Assistant, AssistantOutcome};
use crate::transcript::EntryId;

/// A finished assistant request.
pub type Completed = (EntryId, AssistantOutcome);

/// Runs `Assistant::ask` off the terminal thread.
pub struct AssistantWorker {
    assistant: Arc<Assistant>,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    in_flight: usize,
}

impl AssistantWorker {
    pub fn new(assistant: Assistant) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            assistant: Arc::new(assistant),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// Start a request whose result will patch entry `id`.
    pub fn dispatch(&mut self, id: EntryId, prompt: String) {
        let assistant = Arc::clone(&self.assistant);
        let tx = self.tx.clone();
        self.in_flight += 1;
        debug!("dispatching assistant request for entry {}", id.get());

        let spawned = thread::Builder::new()
            .name(format!("assistant-{}", id.get()))
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| assistant.ask(&prompt)))
                    .unwrap_or_else(|_| AssistantOutcome::Failed(assistant.fallback()));
                // The receiver lives as long as the worker; a send error only
                // means the terminal is gone.
                let _ = tx.send((id, outcome));
            });

        if let Err(e) = spawned {
            warn!("could not spawn assistant thread: {e}");
            let _ = self
                .tx
                .send((id, AssistantOutcome::Failed(self.assistant.fallback())));
        }
    }

    /// A finished request, if any, without blocking.
    pub fn try_recv(&mut self) -> Option<Completed> {
        match self.rx.try_recv() {
            Ok(done) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(done)
            },
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next request finishes. `None` when nothing is in flight.
    pub fn recv_blocking(&mut self) -> Option<Completed> {
        if self.in_flight == 0 {
            return None;
        }
        let done = self.rx.recv().ok()?;
        self.in_flight -= 1;
        Some(done)
    }

    /// Requests dispatched but not yet received.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{AssistantTransport, Endpoint, TransportResponse};
    use crate::config::TerminalConfig;
    use crate::transcript::{EntryKind, Transcript};
    use quantum_types::Result;

    struct Echo;
    impl AssistantTransport for Echo {
        fn post_json(&self, _url: &str, body: &serde_json::Value) -> Result<TransportResponse> {
            Ok(TransportResponse {
                status: 200,
                body: serde_json::json!({ "response": body["prompt"], "tokensUsed": 1 }).to_string(),
            })
        }
    }

    struct Panics;
    impl AssistantTransport for Panics {
        fn post_json(&self, _: &str, _: &serde_json::Value) -> Result<TransportResponse> {
            panic!("transport bug");
        }
    }

    fn worker(transport: Arc<dyn AssistantTransport>) -> AssistantWorker {
        AssistantWorker::new(Assistant::new(
            transport,
            Endpoint::fixed("http://api.test/api/chat", false),
            &TerminalConfig::default(),
        ))
    }

    #[test]
    fn results_are_tagged_with_their_entry() {
        let mut t = Transcript::new();
        let first = t.push(EntryKind::Pending, "");
        let second = t.push(EntryKind::Pending, "");
        let mut w = worker(Arc::new(Echo));
        w.dispatch(first, "one".into());
        w.dispatch(second, "two".into());
        assert_eq!(w.in_flight(), 2);

        let mut got = Vec::new();
        while let Some((id, outcome)) = w.recv_blocking() {
            got.push((id, outcome));
        }
        got.sort_by_key(|(id, _)| *id);
        assert_eq!(w.in_flight(), 0);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].0, first);
        assert!(matches!(&got[0].1, AssistantOutcome::Answered(s) if s.contains("one")));
        assert!(matches!(&got[1].1, AssistantOutcome::Answered(s) if s.contains("two")));
    }

    #[test]
    fn idle_worker_does_not_block() {
        let mut w = worker(Arc::new(Echo));
        assert!(w.try_recv().is_none());
        assert!(w.recv_blocking().is_none());
    }

    #[test]
    fn panicking_transport_resolves_to_failure() {
        let mut t = Transcript::new();
        let id = t.push(EntryKind::Pending, "");
        let mut w = worker(Arc::new(Panics));
        w.dispatch(id, "boom".into());
        let (got, outcome) = w.recv_blocking().unwrap();
        assert_eq!(got, id);
        assert!(matches!(outcome, AssistantOutcome::Failed(_)));
    }
}
