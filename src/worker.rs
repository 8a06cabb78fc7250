//! Runs one user action at a time off the caller's thread

use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Result of a finished job
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutput {
    pub label: String,
    pub output: String,
}

pub struct Worker {
    /// Tokio runtime for the blocking jobs
    runtime: Runtime,
    /// Channel sender handed to each job
    sender: UnboundedSender<JobOutput>,
    /// Channel receiver polled by the caller
    receiver: UnboundedReceiver<JobOutput>,
    busy: bool,
}

impl Worker {
    pub fn new() -> std::io::Result<Self> {
        let (tx, rx) = unbounded_channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            sender: tx,
            receiver: rx,
            busy: false,
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start a job. Returns false without running it while another job is in flight.
    pub fn submit<F>(&mut self, label: &str, job: F) -> bool
    where
        F: FnOnce() -> String + Send + 'static,
    {
        if self.busy {
            log::warn!("Worker busy, ignoring {}", label);
            return false;
        }
        self.busy = true;

        let tx = self.sender.clone();
        let label = label.to_string();
        log::debug!("Starting job: {}", label);
        self.runtime.spawn_blocking(move || {
            let output = catch_unwind(AssertUnwindSafe(job))
                .unwrap_or_else(|_| format!("{} failed unexpectedly", label));
            if tx.send(JobOutput { label, output }).is_err() {
                log::warn!("Job finished after the worker was dropped");
            }
        });
        true
    }

    /// Non-blocking check for a finished job
    pub fn poll(&mut self) -> Option<JobOutput> {
        let output = self.receiver.try_recv().ok()?;
        self.busy = false;
        Some(output)
    }

    /// Block until the running job finishes; `None` when idle
    pub fn wait(&mut self) -> Option<JobOutput> {
        if !self.busy {
            return None;
        }
        let output = self.receiver.blocking_recv()?;
        self.busy = false;
        Some(output)
    }
}
