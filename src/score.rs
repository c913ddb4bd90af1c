//! Engagement score calculation
//!
//! A fixed, additive point rubric maps a day's activity to a 30-100 score.
//! The formula is pure: identical inputs always produce the identical integer.

use crate::types::{DailyScoreEntry, FocusArea, ProfileSnapshot, SedentaryBucket, StiffnessTime};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Starting point before bonuses and penalties
pub const BASE_SCORE: i32 = 60;
/// Points per completed session, capped at `SESSION_BONUS_CAP`
pub const SESSION_BONUS_PER: i32 = 8;
pub const SESSION_BONUS_CAP: i32 = 25;
/// Points per streak day, capped at `STREAK_BONUS_CAP`
pub const STREAK_BONUS_PER: i32 = 2;
pub const STREAK_BONUS_CAP: i32 = 10;
/// Points per stiffness-window session match, capped at `TIMING_BONUS_CAP`
pub const TIMING_BONUS_PER: i32 = 3;
pub const TIMING_BONUS_CAP: i32 = 6;
/// Final score bounds
pub const SCORE_MIN: i32 = 30;
pub const SCORE_MAX: i32 = 100;

/// Inputs to the engagement score rubric
#[derive(Debug, Clone, Default)]
pub struct ScoreInputs {
    pub sessions_completed: u32,
    pub minutes_completed: u32,
    pub streak_days: u32,
    /// Sessions done during a self-reported stiff period
    pub stiffness_times_matched: u32,
    pub sedentary_bucket: Option<SedentaryBucket>,
    pub focus_areas: BTreeSet<FocusArea>,
}

/// Per-component breakdown of a computed score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScoreComponents {
    session_bonus: i32,
    streak_bonus: i32,
    timing_bonus: i32,
    sedentary_penalty: i32,
    variety_bonus: i32,
}

fn components(inputs: &ScoreInputs) -> ScoreComponents {
    let session_bonus = (inputs.sessions_completed as i32 * SESSION_BONUS_PER).min(SESSION_BONUS_CAP);
    let streak_bonus = (inputs.streak_days as i32 * STREAK_BONUS_PER).min(STREAK_BONUS_CAP);
    let timing_bonus = (inputs.stiffness_times_matched as i32 * TIMING_BONUS_PER).min(TIMING_BONUS_CAP);

    // The rubric never punishes someone who did at least one session that day
    let sedentary_penalty = if inputs.sessions_completed == 0 {
        match inputs.sedentary_bucket {
            Some(SedentaryBucket::FourToSix) => 4,
            Some(SedentaryBucket::SixToEight) => 7,
            Some(SedentaryBucket::MoreThanEight) => 10,
            _ => 0,
        }
    } else {
        0
    };

    let variety_bonus = match inputs.focus_areas.len() {
        0 | 1 => 0,
        2 => 1,
        _ => 2,
    };

    ScoreComponents {
        session_bonus,
        streak_bonus,
        timing_bonus,
        sedentary_penalty,
        variety_bonus,
    }
}

/// Compute the engagement score for a day's activity, clamped to 30-100
pub fn engagement_score(inputs: &ScoreInputs) -> u8 {
    let c = components(inputs);
    let total = BASE_SCORE + c.session_bonus + c.streak_bonus + c.timing_bonus
        - c.sedentary_penalty
        + c.variety_bonus;
    total.clamp(SCORE_MIN, SCORE_MAX) as u8
}

/// Render the score's component breakdown.
///
/// Re-derives the same components as [`engagement_score`], so the rendered
/// parts always sum (before clamping) to the score itself. Zero-valued
/// optional components are omitted.
pub fn score_breakdown(inputs: &ScoreInputs) -> String {
    let c = components(inputs);
    let mut parts = vec![format!("Base: {BASE_SCORE}")];
    if c.session_bonus > 0 {
        parts.push(format!("Sessions: +{}", c.session_bonus));
    }
    if c.streak_bonus > 0 {
        parts.push(format!("Streak: +{}", c.streak_bonus));
    }
    if c.timing_bonus > 0 {
        parts.push(format!("Timing: +{}", c.timing_bonus));
    }
    if c.sedentary_penalty > 0 {
        parts.push(format!("Sedentary: -{}", c.sedentary_penalty));
    }
    if c.variety_bonus > 0 {
        parts.push(format!("Variety: +{}", c.variety_bonus));
    }
    parts.join(" • ")
}

/// Count triggered stiffness windows that match the profile's self-report.
///
/// A profile `AllDay` pick matches any triggered window.
pub fn matched_stiffness_count(
    triggered: &BTreeSet<StiffnessTime>,
    profile: Option<&ProfileSnapshot>,
) -> u32 {
    let Some(profile) = profile else { return 0 };
    if profile.stiffness_times.contains(&StiffnessTime::AllDay) {
        return triggered.len() as u32;
    }
    triggered
        .iter()
        .filter(|t| profile.stiffness_times.contains(t))
        .count() as u32
}

/// Build a full [`DailyScoreEntry`] for a day's activity.
///
/// Intersects the day's triggered stiffness windows with the profile's
/// self-reported ones, pulls the sedentary bucket from the profile, and
/// delegates to the core formula.
#[allow(clippy::too_many_arguments)]
pub fn build_daily_entry(
    date: NaiveDate,
    sessions_completed: u32,
    minutes_completed: u32,
    focus_areas: BTreeSet<FocusArea>,
    stiffness_times_triggered: BTreeSet<StiffnessTime>,
    profile: Option<&ProfileSnapshot>,
    streak_days: u32,
) -> DailyScoreEntry {
    let inputs = ScoreInputs {
        sessions_completed,
        minutes_completed,
        streak_days,
        stiffness_times_matched: matched_stiffness_count(&stiffness_times_triggered, profile),
        sedentary_bucket: profile.and_then(|p| p.sedentary_bucket),
        focus_areas: focus_areas.clone(),
    };
    DailyScoreEntry {
        date,
        score: engagement_score(&inputs),
        minutes_completed,
        sessions_completed,
        focus_areas,
        stiffness_times_triggered,
    }
}
