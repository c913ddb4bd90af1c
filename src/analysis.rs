//! Profile analysis engine
//!
//! Maps a static onboarding snapshot to a full report: posture-risk score,
//! ranked insight cards, risk factors, focus areas, priorities, weekly
//! actions, and summary text. Pure function of the profile plus a
//! profile-derived seed; no wall-clock or external randomness feeds wording.

use crate::seed::{analysis_seed, profile_hash};
use crate::templates::{
    fill_placeholders, ANALYSIS_LOWER_BACK_VARIANTS, ANALYSIS_MOVEMENT_VARIANTS,
    ANALYSIS_NECK_VARIANTS, ANALYSIS_SEDENTARY_VARIANTS, ANALYSIS_STIFFNESS_VARIANTS,
    ANALYSIS_TIME_VARIANTS, ANALYSIS_WORK_VARIANTS, DISCLAIMERS, SUMMARY_ELEVATED, SUMMARY_LOW,
    SUMMARY_MODERATE,
};
use crate::types::{
    AnalysisReport, AnalysisScore, ExerciseFrequency, FocusArea, InsightCard, PainArea,
    PostureIssue, ProfileSnapshot, RiskCategory, SedentaryBucket, Severity,
};
use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Maximum insight cards in a report
pub const MAX_INSIGHTS: usize = 6;
/// Maximum risk-factor strings
pub const MAX_RISK_FACTORS: usize = 8;
/// Maximum recommended priorities
pub const MAX_PRIORITIES: usize = 4;
/// Maximum weekly actions
pub const MAX_WEEKLY_ACTIONS: usize = 4;

// ---------------------------------------------------------------------------
// Risk rubric (axis maxima sum to 100)
// ---------------------------------------------------------------------------

/// Sedentary axis, up to 25 points; missing answers default mid-table so
/// skipped questions never artificially lower risk
fn sedentary_points(bucket: Option<SedentaryBucket>) -> u32 {
    match bucket {
        Some(SedentaryBucket::LessThanTwo) => 3,
        Some(SedentaryBucket::TwoToFour) => 8,
        Some(SedentaryBucket::FourToSix) | None => 14,
        Some(SedentaryBucket::SixToEight) => 20,
        Some(SedentaryBucket::MoreThanEight) => 25,
    }
}

/// Stiffness-timing axis, up to 20 points by distinct period count
fn stiffness_points(period_count: usize) -> u32 {
    match period_count {
        0 => 5,
        1 => 8,
        2 => 14,
        _ => 20,
    }
}

/// Pain axis, up to 20 points by area count
fn pain_points(count: usize) -> u32 {
    match count {
        0 => 0,
        1 => 5,
        2 => 10,
        3 => 14,
        4 => 17,
        _ => 20,
    }
}

/// Posture-issue axis, up to 15 points by issue count
fn posture_points(count: usize) -> u32 {
    match count {
        0 => 0,
        1 => 4,
        2 => 8,
        3 => 11,
        _ => 15,
    }
}

/// Exercise axis, up to 15 points, inverted (less exercise = more risk);
/// missing defaults mid-table
fn exercise_points(frequency: Option<ExerciseFrequency>) -> u32 {
    match frequency {
        Some(ExerciseFrequency::Daily) => 0,
        Some(ExerciseFrequency::FewTimesAWeek) => 4,
        Some(ExerciseFrequency::OnceAWeek) | None => 8,
        Some(ExerciseFrequency::Rarely) => 12,
        Some(ExerciseFrequency::Never) => 15,
    }
}

/// Work-span axis, up to 5 points by hour band
fn work_span_points(hours: u32) -> u32 {
    match hours {
        0..=4 => 0,
        5..=8 => 2,
        9..=10 => 4,
        _ => 5,
    }
}

/// Compute the 0-100 posture-risk score for a profile
pub fn risk_score(profile: &ProfileSnapshot) -> u8 {
    let total = sedentary_points(profile.sedentary_bucket)
        + stiffness_points(profile.stiffness_period_count())
        + pain_points(profile.pain_areas.len())
        + posture_points(profile.posture_issues.len())
        + exercise_points(profile.exercise_frequency)
        + work_span_points(profile.work_span_hours());
    total.min(100) as u8
}

// ---------------------------------------------------------------------------
// Insight generators
// ---------------------------------------------------------------------------

/// Severity by count of qualifying conditions matched
fn severity_for(matched: usize) -> Severity {
    match matched {
        0 | 1 => Severity::Low,
        2 => Severity::Medium,
        _ => Severity::High,
    }
}

fn pick<'a>(variants: &'a [&'a str], seed: usize) -> &'a str {
    variants[seed % variants.len()]
}

fn sedentary_insight(profile: &ProfileSnapshot, seed: usize) -> Option<InsightCard> {
    let bucket = profile.sedentary_bucket?;
    if bucket < SedentaryBucket::FourToSix {
        return None;
    }
    let mut matched = 1;
    if bucket >= SedentaryBucket::SixToEight {
        matched += 1;
    }
    if bucket >= SedentaryBucket::MoreThanEight {
        matched += 1;
    }
    Some(InsightCard {
        title: "Sedentary Load".to_string(),
        body: fill_placeholders(
            pick(ANALYSIS_SEDENTARY_VARIANTS, seed),
            &[("sedentary", bucket.label())],
        ),
        severity: severity_for(matched),
        action_label: "Build hourly breaks".to_string(),
        tags: vec!["sedentary".to_string()],
    })
}

fn stiffness_insight(profile: &ProfileSnapshot, seed: usize) -> Option<InsightCard> {
    let periods = profile.stiffness_period_count();
    if periods == 0 {
        return None;
    }
    Some(InsightCard {
        title: "Stiffness Pattern".to_string(),
        body: pick(ANALYSIS_STIFFNESS_VARIANTS, seed).to_string(),
        severity: severity_for(periods),
        action_label: "Time your breaks".to_string(),
        tags: vec!["timing".to_string()],
    })
}

fn neck_upper_back_insight(profile: &ProfileSnapshot, seed: usize) -> Option<InsightCard> {
    let pain_hits = [PainArea::Neck, PainArea::Shoulders, PainArea::UpperBack]
        .iter()
        .filter(|a| profile.pain_areas.contains(a))
        .count();
    let posture_hits = [PostureIssue::ForwardHead, PostureIssue::RoundedShoulders]
        .iter()
        .filter(|i| profile.posture_issues.contains(i))
        .count();
    let matched = pain_hits + posture_hits;
    if matched == 0 {
        return None;
    }
    Some(InsightCard {
        title: "Neck & Upper Back Focus".to_string(),
        body: pick(ANALYSIS_NECK_VARIANTS, seed).to_string(),
        severity: severity_for(matched),
        action_label: "Start neck routine".to_string(),
        tags: vec!["neck".to_string(), "upper_back".to_string()],
    })
}

fn lower_back_hips_insight(profile: &ProfileSnapshot, seed: usize) -> Option<InsightCard> {
    let pain_hits = [PainArea::LowerBack, PainArea::Hips]
        .iter()
        .filter(|a| profile.pain_areas.contains(a))
        .count();
    let posture_hits = [PostureIssue::AnteriorPelvicTilt, PostureIssue::UnevenHips]
        .iter()
        .filter(|i| profile.posture_issues.contains(i))
        .count();
    let matched = pain_hits + posture_hits;
    if matched == 0 {
        return None;
    }
    Some(InsightCard {
        title: "Lower Back & Hips".to_string(),
        body: pick(ANALYSIS_LOWER_BACK_VARIANTS, seed).to_string(),
        severity: severity_for(matched),
        action_label: "Open hip routine".to_string(),
        tags: vec!["lower_back".to_string(), "hips".to_string()],
    })
}

fn movement_baseline_insight(profile: &ProfileSnapshot, seed: usize) -> Option<InsightCard> {
    let frequency = profile.exercise_frequency?;
    if frequency < ExerciseFrequency::OnceAWeek {
        return None;
    }
    let mut matched = 1;
    if frequency >= ExerciseFrequency::Rarely {
        matched += 1;
    }
    if frequency == ExerciseFrequency::Never {
        matched += 1;
    }
    Some(InsightCard {
        title: "Movement Baseline".to_string(),
        body: pick(ANALYSIS_MOVEMENT_VARIANTS, seed).to_string(),
        severity: severity_for(matched),
        action_label: "Try a 2-minute session".to_string(),
        tags: vec!["movement".to_string()],
    })
}

fn time_efficiency_insight(profile: &ProfileSnapshot, seed: usize) -> Option<InsightCard> {
    if profile.daily_time_minutes > 10 {
        return None;
    }
    let matched = if profile.daily_time_minutes <= 5 { 2 } else { 1 };
    Some(InsightCard {
        title: "Time Efficiency".to_string(),
        body: fill_placeholders(
            pick(ANALYSIS_TIME_VARIANTS, seed),
            &[("minutes", &profile.daily_time_minutes.to_string())],
        ),
        severity: severity_for(matched),
        action_label: "See quick wins".to_string(),
        tags: vec!["time".to_string()],
    })
}

fn work_context_insight(profile: &ProfileSnapshot, seed: usize) -> Option<InsightCard> {
    let span = profile.work_span_hours();
    if span < 9 {
        return None;
    }
    let matched = if span >= 11 { 2 } else { 1 };
    Some(InsightCard {
        title: "Work Setup".to_string(),
        body: fill_placeholders(
            pick(ANALYSIS_WORK_VARIANTS, seed),
            &[("work_hours", &span.to_string())],
        ),
        severity: severity_for(matched),
        action_label: "Review your setup".to_string(),
        tags: vec!["work".to_string()],
    })
}

/// Run all generators, rank by severity, and cap the list
fn generate_insights(profile: &ProfileSnapshot) -> Vec<InsightCard> {
    let seed = analysis_seed(profile);
    let mut insights: Vec<InsightCard> = [
        sedentary_insight(profile, seed),
        stiffness_insight(profile, seed),
        neck_upper_back_insight(profile, seed),
        lower_back_hips_insight(profile, seed),
        movement_baseline_insight(profile, seed),
        time_efficiency_insight(profile, seed),
        work_context_insight(profile, seed),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Stable sort keeps generator order within a severity rank
    insights.sort_by_key(|card| std::cmp::Reverse(card.severity));
    insights.truncate(MAX_INSIGHTS);
    insights
}

// ---------------------------------------------------------------------------
// Risk factors, focus areas, priorities, actions
// ---------------------------------------------------------------------------

/// Rule-based risk-factor strings, in fixed evaluation order, capped at 8
fn collect_risk_factors(profile: &ProfileSnapshot) -> Vec<String> {
    let mut factors = Vec::new();

    if let Some(bucket) = profile.sedentary_bucket {
        if bucket >= SedentaryBucket::SixToEight {
            factors.push(format!("Sitting {} per day", bucket.label()));
        }
    }
    match profile.stiffness_period_count() {
        0 => {}
        1 => factors.push("Recurring daily stiffness window".to_string()),
        _ => factors.push("Stiffness at multiple times of day".to_string()),
    }
    for area in &profile.pain_areas {
        factors.push(format!("Reported {} discomfort", area.label()));
    }
    for issue in &profile.posture_issues {
        factors.push(format!("Self-identified {}", issue.label()));
    }
    if matches!(
        profile.exercise_frequency,
        Some(ExerciseFrequency::Rarely) | Some(ExerciseFrequency::Never)
    ) {
        factors.push("Little regular exercise outside work".to_string());
    }
    if profile.work_span_hours() >= 9 {
        factors.push(format!("Long {}-hour workdays", profile.work_span_hours()));
    }

    factors.truncate(MAX_RISK_FACTORS);
    factors
}

/// Derived focus areas: pain and posture mappings unioned with explicit picks
fn derive_focus_areas(profile: &ProfileSnapshot) -> Vec<FocusArea> {
    let mut areas: BTreeSet<FocusArea> = profile.focus_areas.clone();
    areas.extend(profile.pain_areas.iter().map(PainArea::focus_area));
    areas.extend(profile.posture_issues.iter().map(PostureIssue::focus_area));
    areas.into_iter().collect()
}

fn priority_for(area: FocusArea) -> &'static str {
    match area {
        FocusArea::Neck => "Ease daily neck tension",
        FocusArea::Shoulders => "Unround your shoulders",
        FocusArea::UpperBack => "Mobilize your upper back",
        FocusArea::LowerBack => "Support your lower back",
        FocusArea::Hips => "Free up your hips",
        FocusArea::Wrists => "Protect your wrists",
    }
}

/// Recommended priorities in focus-area order, capped at 4, with a default
/// when nothing specific triggered
fn derive_priorities(focus_areas: &[FocusArea]) -> Vec<String> {
    let mut priorities: Vec<String> = focus_areas
        .iter()
        .take(MAX_PRIORITIES)
        .map(|a| priority_for(*a).to_string())
        .collect();
    if priorities.is_empty() {
        priorities.push("Build a daily movement habit".to_string());
    }
    priorities
}

/// Weekly actions from the strongest triggers, capped at 4, with fallbacks
fn derive_weekly_actions(profile: &ProfileSnapshot) -> Vec<String> {
    let mut actions = Vec::new();

    if profile
        .sedentary_bucket
        .is_some_and(|b| b >= SedentaryBucket::SixToEight)
    {
        actions.push("Stand up and move for one minute every hour".to_string());
    }
    if let Some(first) = profile.stiffness_times.iter().next() {
        actions.push(format!(
            "Schedule a stretch break just before your {} stiffness window",
            first.label()
        ));
    }
    if profile.pain_areas.contains(&PainArea::Neck)
        || profile.posture_issues.contains(&PostureIssue::ForwardHead)
    {
        actions.push("Do a two-minute chin-tuck routine three times this week".to_string());
    }
    if matches!(
        profile.exercise_frequency,
        Some(ExerciseFrequency::Rarely) | Some(ExerciseFrequency::Never)
    ) {
        actions.push("Complete three short sessions this week".to_string());
    }

    if actions.is_empty() {
        actions.push("Complete one short session each workday".to_string());
        actions.push("Check your screen height and chair setup".to_string());
    }
    actions.truncate(MAX_WEEKLY_ACTIONS);
    actions
}

fn summary_for(category: RiskCategory) -> (&'static str, &'static str) {
    match category {
        RiskCategory::Low => SUMMARY_LOW,
        RiskCategory::Moderate => SUMMARY_MODERATE,
        RiskCategory::Elevated => SUMMARY_ELEVATED,
    }
}

/// Generate the full analysis report for a profile.
///
/// Deterministic in content: the same profile always yields the same score,
/// wording, and ordering (only the report id and timestamp differ).
pub fn generate_report(profile: &ProfileSnapshot) -> AnalysisReport {
    let value = risk_score(profile);
    let category = RiskCategory::from_score(value);
    let (headline, body) = summary_for(category);
    let focus_areas = derive_focus_areas(profile);

    AnalysisReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        summary_headline: headline.to_string(),
        summary_body: body.to_string(),
        score: AnalysisScore { value, category },
        insights: generate_insights(profile),
        risk_factors: collect_risk_factors(profile),
        recommended_priorities: derive_priorities(&focus_areas),
        weekly_actions: derive_weekly_actions(profile),
        focus_areas,
        disclaimers: DISCLAIMERS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Stateful wrapper that caches the report until the profile changes
#[derive(Default)]
pub struct ProfileAnalysisEngine {
    cache: Option<(u64, AnalysisReport)>,
}

impl ProfileAnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report for the profile, regenerated only when the profile changed
    pub fn report(&mut self, profile: &ProfileSnapshot) -> &AnalysisReport {
        let key = profile_hash(profile);
        let stale = self.cache.as_ref().map(|(k, _)| *k != key).unwrap_or(true);
        if stale {
            self.cache = None;
        }
        let (_, report) = self
            .cache
            .get_or_insert_with(|| (key, generate_report(profile)));
        report
    }

    /// Drop the cached report; safe at any time, it is purely derived
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Goal, StiffnessTime};
    use pretty_assertions::assert_eq;

    fn elevated_profile() -> ProfileSnapshot {
        ProfileSnapshot {
            goal: Goal::ReducePain,
            pain_areas: [PainArea::Neck, PainArea::UpperBack, PainArea::LowerBack]
                .into_iter()
                .collect(),
            posture_issues: [PostureIssue::ForwardHead, PostureIssue::RoundedShoulders]
                .into_iter()
                .collect(),
            stiffness_times: [StiffnessTime::Morning, StiffnessTime::Midday]
                .into_iter()
                .collect(),
            sedentary_bucket: Some(SedentaryBucket::MoreThanEight),
            exercise_frequency: Some(ExerciseFrequency::Rarely),
            daily_time_minutes: 5,
            ..ProfileSnapshot::default()
        }
    }

    #[test]
    fn test_risk_score_bounds() {
        let max_profile = ProfileSnapshot {
            pain_areas: [
                PainArea::Neck,
                PainArea::Shoulders,
                PainArea::UpperBack,
                PainArea::LowerBack,
                PainArea::Hips,
                PainArea::Wrists,
            ]
            .into_iter()
            .collect(),
            posture_issues: [
                PostureIssue::ForwardHead,
                PostureIssue::RoundedShoulders,
                PostureIssue::SlouchedBack,
                PostureIssue::AnteriorPelvicTilt,
            ]
            .into_iter()
            .collect(),
            stiffness_times: [StiffnessTime::AllDay].into_iter().collect(),
            sedentary_bucket: Some(SedentaryBucket::MoreThanEight),
            exercise_frequency: Some(ExerciseFrequency::Never),
            work_start_minutes: 8 * 60,
            work_end_minutes: 20 * 60,
            ..ProfileSnapshot::default()
        };
        assert_eq!(risk_score(&max_profile), 100);
        assert!(risk_score(&ProfileSnapshot::default()) <= 100);
    }

    #[test]
    fn test_missing_fields_use_mid_table_defaults() {
        // Defaults must not artificially lower risk
        let empty = ProfileSnapshot::default();
        // sedentary 14 + stiffness 5 + pain 0 + posture 0 + exercise 8 + work 2
        assert_eq!(risk_score(&empty), 29);
    }

    #[test]
    fn test_elevated_scenario() {
        let profile = elevated_profile();
        let score = risk_score(&profile);
        // 25 + 14 + 14 + 8 + 12 + 2 = 75
        assert_eq!(score, 75);
        assert_eq!(RiskCategory::from_score(score), RiskCategory::Elevated);

        let report = generate_report(&profile);
        let titles: Vec<&str> = report.insights.iter().map(|c| c.title.as_str()).collect();
        assert!(titles.contains(&"Sedentary Load"));
        assert!(titles.contains(&"Stiffness Pattern"));
        assert!(titles.contains(&"Neck & Upper Back Focus"));
    }

    #[test]
    fn test_empty_profile_still_produces_valid_report() {
        let report = generate_report(&ProfileSnapshot::default());
        assert!(report.score.value <= 100);
        assert!(!report.summary_headline.is_empty());
        assert!(!report.summary_body.is_empty());
        assert!(!report.recommended_priorities.is_empty());
        assert!(!report.weekly_actions.is_empty());
        assert!(!report.disclaimers.is_empty());
    }

    #[test]
    fn test_insights_capped_and_severity_ordered() {
        let report = generate_report(&elevated_profile());
        assert!(report.insights.len() <= MAX_INSIGHTS);
        for pair in report.insights.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
        }
    }

    #[test]
    fn test_report_content_is_deterministic() {
        let profile = elevated_profile();
        let a = generate_report(&profile);
        let b = generate_report(&profile);
        assert_eq!(a.insights, b.insights);
        assert_eq!(a.risk_factors, b.risk_factors);
        assert_eq!(a.score.value, b.score.value);
        assert_eq!(a.weekly_actions, b.weekly_actions);
    }

    #[test]
    fn test_different_profiles_can_get_different_wordings() {
        let a = generate_report(&elevated_profile());
        let other = ProfileSnapshot {
            pain_areas: [PainArea::Hips].into_iter().collect(),
            ..elevated_profile()
        };
        let b = generate_report(&other);
        // Same generator, severity may coincide, but both bodies come from the
        // fixed variant bank
        let sed_a = a.insights.iter().find(|c| c.title == "Sedentary Load").unwrap();
        let sed_b = b.insights.iter().find(|c| c.title == "Sedentary Load").unwrap();
        assert!(ANALYSIS_SEDENTARY_VARIANTS
            .iter()
            .any(|v| sed_a.body.contains("sitting") || v.contains("sitting")));
        assert!(!sed_b.body.is_empty());
    }

    #[test]
    fn test_risk_factors_capped_and_ordered() {
        let factors = collect_risk_factors(&elevated_profile());
        assert!(factors.len() <= MAX_RISK_FACTORS);
        // Sedentary rule evaluates first
        assert!(factors[0].starts_with("Sitting"));
    }

    #[test]
    fn test_focus_areas_derived_and_deduplicated() {
        let profile = ProfileSnapshot {
            focus_areas: [FocusArea::Neck].into_iter().collect(),
            pain_areas: [PainArea::Neck, PainArea::Hips].into_iter().collect(),
            posture_issues: [PostureIssue::AnteriorPelvicTilt].into_iter().collect(),
            ..ProfileSnapshot::default()
        };
        let areas = derive_focus_areas(&profile);
        assert_eq!(areas, vec![FocusArea::Neck, FocusArea::Hips]);
    }

    #[test]
    fn test_priorities_and_actions_capped() {
        let report = generate_report(&elevated_profile());
        assert!(report.recommended_priorities.len() <= MAX_PRIORITIES);
        assert!(report.weekly_actions.len() <= MAX_WEEKLY_ACTIONS);
    }

    #[test]
    fn test_generators_abstain_on_quiet_profile() {
        let quiet = ProfileSnapshot {
            sedentary_bucket: Some(SedentaryBucket::LessThanTwo),
            exercise_frequency: Some(ExerciseFrequency::Daily),
            daily_time_minutes: 30,
            ..ProfileSnapshot::default()
        };
        let insights = generate_insights(&quiet);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_engine_caches_until_profile_changes() {
        let mut engine = ProfileAnalysisEngine::new();
        let profile = elevated_profile();

        let first_id = engine.report(&profile).id;
        let second_id = engine.report(&profile).id;
        assert_eq!(first_id, second_id);

        let changed = ProfileSnapshot {
            sedentary_bucket: Some(SedentaryBucket::LessThanTwo),
            ..elevated_profile()
        };
        let third_id = engine.report(&changed).id;
        assert_ne!(first_id, third_id);
    }

    #[test]
    fn test_summary_switches_on_category_only() {
        let low = ProfileSnapshot {
            sedentary_bucket: Some(SedentaryBucket::LessThanTwo),
            exercise_frequency: Some(ExerciseFrequency::Daily),
            ..ProfileSnapshot::default()
        };
        let report = generate_report(&low);
        assert_eq!(report.score.category, RiskCategory::Low);
        assert_eq!(report.summary_headline, SUMMARY_LOW.0);
    }
}
