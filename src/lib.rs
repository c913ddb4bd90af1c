//! Deskcore - On-device engagement scoring and insight engine
//!
//! Deskcore turns a user's onboarding answers and daily activity into a
//! bounded engagement score, a rolling progress/streak summary, and a varied
//! but reproducible set of natural-language insights. Everything is
//! deterministic and rule-based: the same inputs always yield the same
//! outputs.
//!
//! ## Modules
//!
//! - **Score Calculator**: pure weighted rubric mapping a day's activity to 30-100
//! - **Progress Repository**: day-keyed durable store with streak/trend/weekly aggregates
//! - **Profile Analysis Engine**: onboarding snapshot to posture-risk report
//! - **Daily Insight Engine**: 2-3 seeded rotating insights per calendar day

pub mod analysis;
pub mod analytics;
pub mod catalog;
pub mod daily;
pub mod error;
pub mod progress;
pub mod score;
pub mod seed;
pub mod store;
pub mod templates;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use analysis::{generate_report, risk_score, ProfileAnalysisEngine};
pub use analytics::{AnalyticsSink, InsightEvent, LogSink, NullSink};
pub use catalog::{Exercise, ExerciseCatalog};
pub use daily::DailyInsightEngine;
pub use error::EngineError;
pub use progress::ProgressRepository;
pub use score::{engagement_score, score_breakdown, ScoreInputs};
pub use store::{EntryStore, JsonFileStore, MemoryStore};
pub use types::{
    AnalysisReport, AnalysisScore, DailyInsight, DailyScoreEntry, ExerciseFrequency, FocusArea,
    Goal, InsightCard, InsightCategory, MotivationLevel, PainArea, PlanInfo, PostureIssue,
    ProfileSnapshot, ProgressSummary, RiskCategory, SedentaryBucket, Severity, StiffnessTime,
    Trend,
};

/// Engine version embedded in reports and the CLI
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for analytics and provenance
pub const PRODUCER_NAME: &str = "deskcore";
