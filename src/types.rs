//! Core types for the Deskcore engine
//!
//! This module defines the records that flow through the engine: the onboarding
//! profile snapshot, per-day score entries, the derived progress summary, the
//! analysis report, and daily insights.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Primary wellness goal chosen at onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    ReducePain,
    FixPosture,
    MoveMore,
    FeelBetter,
}

/// Body region a user wants to work on (ordered for stable iteration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusArea {
    Neck,
    Shoulders,
    UpperBack,
    LowerBack,
    Hips,
    Wrists,
}

impl FocusArea {
    pub fn label(&self) -> &'static str {
        match self {
            FocusArea::Neck => "neck",
            FocusArea::Shoulders => "shoulders",
            FocusArea::UpperBack => "upper back",
            FocusArea::LowerBack => "lower back",
            FocusArea::Hips => "hips",
            FocusArea::Wrists => "wrists",
        }
    }
}

/// Body region where the user reports discomfort
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainArea {
    Neck,
    Shoulders,
    UpperBack,
    LowerBack,
    Hips,
    Wrists,
}

impl PainArea {
    pub fn label(&self) -> &'static str {
        match self {
            PainArea::Neck => "neck",
            PainArea::Shoulders => "shoulders",
            PainArea::UpperBack => "upper back",
            PainArea::LowerBack => "lower back",
            PainArea::Hips => "hips",
            PainArea::Wrists => "wrists",
        }
    }

    /// Focus area that addresses this pain area
    pub fn focus_area(&self) -> FocusArea {
        match self {
            PainArea::Neck => FocusArea::Neck,
            PainArea::Shoulders => FocusArea::Shoulders,
            PainArea::UpperBack => FocusArea::UpperBack,
            PainArea::LowerBack => FocusArea::LowerBack,
            PainArea::Hips => FocusArea::Hips,
            PainArea::Wrists => FocusArea::Wrists,
        }
    }
}

/// Self-reported posture issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureIssue {
    ForwardHead,
    RoundedShoulders,
    SlouchedBack,
    AnteriorPelvicTilt,
    UnevenHips,
}

impl PostureIssue {
    pub fn label(&self) -> &'static str {
        match self {
            PostureIssue::ForwardHead => "forward head",
            PostureIssue::RoundedShoulders => "rounded shoulders",
            PostureIssue::SlouchedBack => "slouched back",
            PostureIssue::AnteriorPelvicTilt => "anterior pelvic tilt",
            PostureIssue::UnevenHips => "uneven hips",
        }
    }

    /// Focus area that addresses this posture issue
    pub fn focus_area(&self) -> FocusArea {
        match self {
            PostureIssue::ForwardHead => FocusArea::Neck,
            PostureIssue::RoundedShoulders => FocusArea::Shoulders,
            PostureIssue::SlouchedBack => FocusArea::UpperBack,
            PostureIssue::AnteriorPelvicTilt | PostureIssue::UnevenHips => FocusArea::Hips,
        }
    }
}

/// Part of the day the user reports feeling stiff
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StiffnessTime {
    Morning,
    Midday,
    Evening,
    AllDay,
}

impl StiffnessTime {
    pub fn label(&self) -> &'static str {
        match self {
            StiffnessTime::Morning => "morning",
            StiffnessTime::Midday => "midday",
            StiffnessTime::Evening => "evening",
            StiffnessTime::AllDay => "all day",
        }
    }

    /// Apply a selection toggle to a stiffness-time set.
    ///
    /// Rules: picking `AllDay` clears individual picks; picking an individual
    /// time clears `AllDay`; picking an already-selected value removes it.
    pub fn toggle(
        candidate: StiffnessTime,
        current: &BTreeSet<StiffnessTime>,
    ) -> BTreeSet<StiffnessTime> {
        let mut next = current.clone();
        if next.contains(&candidate) {
            next.remove(&candidate);
            return next;
        }
        match candidate {
            StiffnessTime::AllDay => {
                next.clear();
                next.insert(StiffnessTime::AllDay);
            }
            _ => {
                next.remove(&StiffnessTime::AllDay);
                next.insert(candidate);
            }
        }
        next
    }
}

/// Kind of work environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Office,
    Remote,
    Hybrid,
    Field,
}

impl WorkType {
    pub fn label(&self) -> &'static str {
        match self {
            WorkType::Office => "office",
            WorkType::Remote => "remote",
            WorkType::Hybrid => "hybrid",
            WorkType::Field => "field",
        }
    }
}

/// Self-reported daily sitting time, ordered lightest to heaviest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SedentaryBucket {
    LessThanTwo,
    TwoToFour,
    FourToSix,
    SixToEight,
    MoreThanEight,
}

impl SedentaryBucket {
    pub fn label(&self) -> &'static str {
        match self {
            SedentaryBucket::LessThanTwo => "under 2 hours",
            SedentaryBucket::TwoToFour => "2-4 hours",
            SedentaryBucket::FourToSix => "4-6 hours",
            SedentaryBucket::SixToEight => "6-8 hours",
            SedentaryBucket::MoreThanEight => "over 8 hours",
        }
    }
}

/// Self-reported exercise habit, ordered most to least active
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseFrequency {
    Daily,
    FewTimesAWeek,
    OnceAWeek,
    Rarely,
    Never,
}

impl ExerciseFrequency {
    pub fn label(&self) -> &'static str {
        match self {
            ExerciseFrequency::Daily => "daily",
            ExerciseFrequency::FewTimesAWeek => "a few times a week",
            ExerciseFrequency::OnceAWeek => "once a week",
            ExerciseFrequency::Rarely => "rarely",
            ExerciseFrequency::Never => "never",
        }
    }
}

/// Self-reported motivation level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationLevel {
    Low,
    Medium,
    High,
}

/// Immutable snapshot of the user's onboarding answers.
///
/// Created once when onboarding completes and read-only thereafter. Optional
/// fields were skippable questions; every formula substitutes a documented
/// default rather than erroring on missing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub goal: Goal,
    #[serde(default)]
    pub focus_areas: BTreeSet<FocusArea>,
    #[serde(default)]
    pub pain_areas: BTreeSet<PainArea>,
    #[serde(default)]
    pub posture_issues: BTreeSet<PostureIssue>,
    #[serde(default)]
    pub stiffness_times: BTreeSet<StiffnessTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<WorkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sedentary_bucket: Option<SedentaryBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_frequency: Option<ExerciseFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation_level: Option<MotivationLevel>,
    /// Minutes of break time the user budgets per day
    pub daily_time_minutes: u32,
    /// Work start, minutes since midnight
    pub work_start_minutes: u32,
    /// Work end, minutes since midnight (end > start enforced upstream)
    pub work_end_minutes: u32,
}

impl ProfileSnapshot {
    /// Work span in whole hours
    pub fn work_span_hours(&self) -> u32 {
        self.work_end_minutes.saturating_sub(self.work_start_minutes) / 60
    }

    /// Count of distinct stiffness periods; `AllDay` counts as all three
    pub fn stiffness_period_count(&self) -> usize {
        if self.stiffness_times.contains(&StiffnessTime::AllDay) {
            3
        } else {
            self.stiffness_times.len()
        }
    }
}

impl Default for ProfileSnapshot {
    fn default() -> Self {
        Self {
            goal: Goal::FeelBetter,
            focus_areas: BTreeSet::new(),
            pain_areas: BTreeSet::new(),
            posture_issues: BTreeSet::new(),
            stiffness_times: BTreeSet::new(),
            work_type: None,
            sedentary_bucket: None,
            exercise_frequency: None,
            motivation_level: None,
            daily_time_minutes: 5,
            work_start_minutes: 9 * 60,
            work_end_minutes: 17 * 60,
        }
    }
}

/// One calendar day of recorded activity and its engagement score.
///
/// At most one entry exists per distinct day; later writes replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyScoreEntry {
    pub date: NaiveDate,
    /// Engagement score, clamped to 0-100
    pub score: u8,
    pub minutes_completed: u32,
    pub sessions_completed: u32,
    #[serde(default)]
    pub focus_areas: BTreeSet<FocusArea>,
    #[serde(default)]
    pub stiffness_times_triggered: BTreeSet<StiffnessTime>,
}

impl DailyScoreEntry {
    /// A day counts as active once any session completed on it
    pub fn has_activity(&self) -> bool {
        self.sessions_completed > 0
    }

    /// Zero-activity placeholder for charting continuity; never persisted
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            score: 0,
            minutes_completed: 0,
            sessions_completed: 0,
            focus_areas: BTreeSet::new(),
            stiffness_times_triggered: BTreeSet::new(),
        }
    }
}

/// Direction of the user's recent scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Steady,
    Declining,
}

/// Rolling progress summary derived from the entry set.
///
/// Never persisted independently; rebuilt after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub week_start_date: NaiveDate,
    /// Mean score over active days in the trailing 7; 0 if none were active
    pub weekly_average_score: u32,
    pub weekly_sessions_completed: u32,
    pub weekly_minutes_completed: u32,
    pub streak_days: u32,
    pub trend: Trend,
    /// Exactly 7 entries, oldest to newest, gaps backfilled with placeholders
    pub last_7_days: Vec<DailyScoreEntry>,
    pub focus_areas_touched: BTreeSet<FocusArea>,
    pub wins: Vec<String>,
    /// True iff at least one entry with activity exists
    pub has_enough_data: bool,
}

/// Posture-risk score bucket with fixed thresholds (0-33 / 34-66 / 67-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Moderate,
    Elevated,
}

impl RiskCategory {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=33 => RiskCategory::Low,
            34..=66 => RiskCategory::Moderate,
            _ => RiskCategory::Elevated,
        }
    }
}

/// Posture-risk score with its category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisScore {
    pub value: u8,
    pub category: RiskCategory,
}

/// Severity of an insight card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A templated, severity-tagged piece of explanatory text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightCard {
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub action_label: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full onboarding analysis report, derived once per profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub summary_headline: String,
    pub summary_body: String,
    pub score: AnalysisScore,
    /// Non-increasing in severity, at most 6 cards
    pub insights: Vec<InsightCard>,
    /// At most 8 entries, in rule-evaluation order
    pub risk_factors: Vec<String>,
    pub focus_areas: Vec<FocusArea>,
    /// At most 4
    pub recommended_priorities: Vec<String>,
    /// At most 4
    pub weekly_actions: Vec<String>,
    pub disclaimers: Vec<String>,
}

/// Category of a daily insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Pain,
    SedentaryRisk,
    Timing,
    Progress,
    Plan,
    Motivational,
    Recovery,
    WorkEnvironment,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Pain => "pain",
            InsightCategory::SedentaryRisk => "sedentary_risk",
            InsightCategory::Timing => "timing",
            InsightCategory::Progress => "progress",
            InsightCategory::Plan => "plan",
            InsightCategory::Motivational => "motivational",
            InsightCategory::Recovery => "recovery",
            InsightCategory::WorkEnvironment => "work_environment",
        }
    }
}

/// Short rotating message shown on the home screen, cached per calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyInsight {
    pub id: Uuid,
    pub category: InsightCategory,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub generated_on: NaiveDate,
}

/// Day-keyed cache of generated insights, persisted so a mid-day relaunch
/// does not reshuffle the home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightCache {
    pub generated_on: NaiveDate,
    pub insights: Vec<DailyInsight>,
}

/// Plan state supplied by the session-playback collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanInfo {
    pub exercises_planned: u32,
    pub exercises_completed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_exercise_name: Option<String>,
}
