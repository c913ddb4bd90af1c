//! Analytics event sink
//!
//! Fire-and-forget collaborator: the engine reports which insight categories
//! it emitted, tagged with a coarse persona bucket, and never waits on or
//! propagates errors from the sink. Raw profile data never leaves the engine.

use crate::types::InsightCategory;
use log::info;

/// An insight-emission event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightEvent {
    pub category: InsightCategory,
    /// Coarse persona bucket (0-999), never raw profile data
    pub persona: u16,
}

/// Fire-and-forget event sink; implementations must not block or fail loudly
pub trait AnalyticsSink {
    fn record(&self, event: InsightEvent);
}

/// Default sink: structured log line per event
#[derive(Debug, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn record(&self, event: InsightEvent) {
        info!(
            "insight emitted category={} persona={}",
            event.category.as_str(),
            event.persona
        );
    }
}

/// Sink that drops every event
#[derive(Debug, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn record(&self, _event: InsightEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sinks_accept_events_silently() {
        let event = InsightEvent {
            category: InsightCategory::Motivational,
            persona: 42,
        };
        LogSink.record(event.clone());
        NullSink.record(event);
    }
}
