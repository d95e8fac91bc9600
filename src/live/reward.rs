//! Reward collaborator.

use std::sync::Mutex;

use tracing::{info, warn};

use crate::engine::MatchRecord;

/// Receives every finished match exactly once.
///
/// Rating, tiers and statistics live behind this trait; the engine never
/// writes to a store itself.
pub trait RewardSink: Send + Sync {
    /// Take ownership of a finished match.
    fn deliver(&self, record: MatchRecord);
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemoryRewardSink {
    records: Mutex<Vec<MatchRecord>>,
}

impl MemoryRewardSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the records delivered so far.
    #[must_use]
    pub fn records(&self) -> Vec<MatchRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of records delivered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether nothing has been delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RewardSink for MemoryRewardSink {
    fn deliver(&self, record: MatchRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(_) => warn!(match_id = record.match_id, "reward sink poisoned; record dropped"),
        }
    }
}

/// Logs a one-line summary of each record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRewardSink;

impl RewardSink for TracingRewardSink {
    fn deliver(&self, record: MatchRecord) {
        info!(
            match_id = record.match_id,
            winner = record.winner,
            reason = ?record.reason,
            turns = record.final_turn,
            events = record.events.len(),
            "match record delivered"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::started;
    use crate::game::Side;

    fn finished_record() -> MatchRecord {
        let mut game = started(12);
        game.disconnect(Side::Team2).unwrap();
        game.record().unwrap()
    }

    #[test]
    fn test_memory_sink_keeps_records_in_order() {
        let sink = MemoryRewardSink::new();
        assert!(sink.is_empty());

        let record = finished_record();
        sink.deliver(record.clone());
        TracingRewardSink.deliver(record.clone());

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records(), vec![record]);
    }

    #[test]
    fn test_sinks_are_object_safe() {
        let sinks: Vec<Box<dyn RewardSink>> = vec![Box::new(MemoryRewardSink::new()), Box::new(TracingRewardSink)];
        for sink in &sinks {
            sink.deliver(finished_record());
        }
    }
}
