//! Fakes shared by the application tests.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::domain::{CpuReading, MemoryReading, MetricSnapshot, ProbeOutcome};
use crate::ports::{FeedError, LivenessCheck, MetricFeed, ProbeFailure, ResourceReader, SnapshotStream, Unavailable};

/// Reader that replays queued readings and is unavailable once drained
#[derive(Default)]
pub struct ScriptedReader {
    memory: Mutex<VecDeque<MemoryReading>>,
    cpu: Mutex<VecDeque<CpuReading>>,
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_memory(&self, reading: MemoryReading) {
        self.memory.lock().unwrap().push_back(reading);
    }

    pub fn push_cpu(&self, reading: CpuReading) {
        self.cpu.lock().unwrap().push_back(reading);
    }
}

#[async_trait]
impl ResourceReader for ScriptedReader {
    async fn read_memory(&self) -> Result<MemoryReading, Unavailable> {
        self.memory
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Unavailable::NoInterface(PathBuf::from("/scripted")))
    }

    async fn read_cpu_cumulative(&self) -> Result<CpuReading, Unavailable> {
        self.cpu
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Unavailable::NoInterface(PathBuf::from("/scripted")))
    }
}

/// Liveness check answering from a fixed table; unknown endpoints time out
#[derive(Default)]
pub struct FixedLivenessCheck {
    outcomes: HashMap<String, ProbeOutcome>,
}

impl FixedLivenessCheck {
    pub fn with(mut self, endpoint: &str, outcome: ProbeOutcome) -> Self {
        self.outcomes.insert(endpoint.to_string(), outcome);
        self
    }
}

#[async_trait]
impl LivenessCheck for FixedLivenessCheck {
    async fn probe(&self, endpoint: &str) -> Result<ProbeOutcome, ProbeFailure> {
        self.outcomes.get(endpoint).copied().ok_or(ProbeFailure::Timeout)
    }
}

/// Feed handing out one pre-recorded session per connect, then refusing
#[derive(Default)]
pub struct ScriptedFeed {
    sessions: Mutex<VecDeque<Vec<Result<MetricSnapshot, FeedError>>>>,
    connects: Mutex<usize>,
}

impl ScriptedFeed {
    pub fn with_session(self, events: Vec<Result<MetricSnapshot, FeedError>>) -> Self {
        self.sessions.lock().unwrap().push_back(events);
        self
    }

    pub fn connects(&self) -> usize {
        *self.connects.lock().unwrap()
    }
}

#[async_trait]
impl MetricFeed for ScriptedFeed {
    async fn connect(&self, endpoint: &str) -> Result<SnapshotStream, FeedError> {
        *self.connects.lock().unwrap() += 1;
        match self.sessions.lock().unwrap().pop_front() {
            Some(events) => Ok(stream::iter(events).boxed()),
            None => Err(FeedError::Connect(format!("{} refused", endpoint))),
        }
    }
}
