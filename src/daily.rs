//! Daily insight engine
//!
//! Generates 2-3 rotating short insights per calendar day: a primary slot
//! driven by profile signals in fixed priority order, a secondary slot that
//! rotates across categories, and an optional tertiary slot earned by
//! momentum. Selection is seeded from the day-of-year and a stable profile
//! hash, so the same profile on the same day always reads the same messages.

use crate::analytics::{AnalyticsSink, InsightEvent};
use crate::seed::{daily_seed, persona_hash};
use crate::templates::{
    fill_placeholders, MOTIVATIONAL_BANK, PAIN_BANK, PLAN_BANK, PLAN_FALLBACK,
    PROGRESS_GENERAL_BANK, PROGRESS_IMPROVING_BANK, PROGRESS_RESTART_BANK, PROGRESS_STREAK_BANK,
    RECOVERY_BANK, SEDENTARY_BANK, TIMING_BANK, WORK_ENVIRONMENT_BANK,
};
use crate::types::{
    DailyInsight, InsightCache, InsightCategory, PlanInfo, ProfileSnapshot, ProgressSummary,
    SedentaryBucket, StiffnessTime, Trend,
};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// Secondary-slot rotation order (fixed; length drives the modulus)
const SECONDARY_ROTATION: [InsightCategory; 7] = [
    InsightCategory::Progress,
    InsightCategory::Plan,
    InsightCategory::WorkEnvironment,
    InsightCategory::Recovery,
    InsightCategory::Motivational,
    InsightCategory::SedentaryRisk,
    InsightCategory::Timing,
];

/// Sedentary bucket at or above which the primary slot flags sitting load
const HIGH_SEDENTARY: SedentaryBucket = SedentaryBucket::SixToEight;

fn title_for(category: InsightCategory) -> &'static str {
    match category {
        InsightCategory::Pain => "Ease the tension",
        InsightCategory::SedentaryRisk => "Break up the sitting",
        InsightCategory::Timing => "Time it right",
        InsightCategory::Progress => "Your week in motion",
        InsightCategory::Plan => "Today's plan",
        InsightCategory::Motivational => "Keep showing up",
        InsightCategory::Recovery => "Recover smart",
        InsightCategory::WorkEnvironment => "Tune your setup",
    }
}

fn action_label_for(category: InsightCategory) -> Option<String> {
    match category {
        InsightCategory::Pain | InsightCategory::Timing | InsightCategory::SedentaryRisk => {
            Some("Open today's routine".to_string())
        }
        InsightCategory::Plan => Some("Start next exercise".to_string()),
        _ => None,
    }
}

/// Label substituted for `{time}`; an all-day pick reads as morning, its
/// earliest window
fn primary_stiffness_label(profile: &ProfileSnapshot) -> &'static str {
    profile
        .stiffness_times
        .iter()
        .find(|t| **t != StiffnessTime::AllDay)
        .map(StiffnessTime::label)
        .unwrap_or("morning")
}

fn sedentary_label(profile: Option<&ProfileSnapshot>) -> &'static str {
    profile
        .and_then(|p| p.sedentary_bucket)
        .map(|b| SedentaryBucket::label(&b))
        .unwrap_or("long hours")
}

/// Deterministic insight generator with a per-day cache
pub struct DailyInsightEngine {
    sink: Box<dyn AnalyticsSink>,
    cache: Option<InsightCache>,
}

impl DailyInsightEngine {
    pub fn new(sink: Box<dyn AnalyticsSink>) -> Self {
        Self { sink, cache: None }
    }

    /// Restore a previously persisted cache (e.g. from the progress store)
    pub fn with_cache(sink: Box<dyn AnalyticsSink>, cache: Option<InsightCache>) -> Self {
        Self { sink, cache }
    }

    /// Current cache, for persisting alongside progress state
    pub fn cache(&self) -> Option<&InsightCache> {
        self.cache.as_ref()
    }

    /// Today's insights, generated at most once per calendar day
    pub fn today(
        &mut self,
        profile: Option<&ProfileSnapshot>,
        summary: Option<&ProgressSummary>,
        plan: Option<&PlanInfo>,
        today: NaiveDate,
    ) -> Vec<DailyInsight> {
        let fresh = self
            .cache
            .as_ref()
            .map(|c| c.generated_on == today)
            .unwrap_or(false);
        if !fresh {
            self.regenerate(profile, summary, plan, today);
        }
        self.cache
            .as_ref()
            .map(|c| c.insights.clone())
            .unwrap_or_default()
    }

    /// Drop the cache and regenerate, regardless of day
    pub fn force_refresh(
        &mut self,
        profile: Option<&ProfileSnapshot>,
        summary: Option<&ProgressSummary>,
        plan: Option<&PlanInfo>,
        today: NaiveDate,
    ) -> Vec<DailyInsight> {
        self.regenerate(profile, summary, plan, today);
        self.today(profile, summary, plan, today)
    }

    fn regenerate(
        &mut self,
        profile: Option<&ProfileSnapshot>,
        summary: Option<&ProgressSummary>,
        plan: Option<&PlanInfo>,
        today: NaiveDate,
    ) {
        let insights = generate_insights(profile, summary, plan, today);
        let persona = profile.map(persona_hash).unwrap_or(0);
        for insight in &insights {
            self.sink.record(InsightEvent {
                category: insight.category,
                persona,
            });
        }
        self.cache = Some(InsightCache {
            generated_on: today,
            insights,
        });
    }
}

/// Generate the day's 2-3 insights without caching or side effects
pub fn generate_insights(
    profile: Option<&ProfileSnapshot>,
    summary: Option<&ProgressSummary>,
    plan: Option<&PlanInfo>,
    today: NaiveDate,
) -> Vec<DailyInsight> {
    let seed = daily_seed(profile, today);

    let primary = primary_insight(profile, seed, today);
    let secondary = secondary_insight(profile, summary, plan, primary.category, seed, today);

    let mut insights = vec![primary, secondary];
    let used = [insights[0].category, insights[1].category];
    if let Some(tertiary) = tertiary_insight(summary, &used, seed, today) {
        insights.push(tertiary);
    }
    insights
}

fn make_insight(
    category: InsightCategory,
    body: String,
    badge: Option<String>,
    today: NaiveDate,
) -> DailyInsight {
    DailyInsight {
        id: Uuid::new_v4(),
        category,
        title: title_for(category).to_string(),
        body,
        badge,
        action_label: action_label_for(category),
        tags: vec![category.as_str().to_string()],
        generated_on: today,
    }
}

/// Primary slot: profile signals in fixed priority order
fn primary_insight(profile: Option<&ProfileSnapshot>, seed: usize, today: NaiveDate) -> DailyInsight {
    if let Some(p) = profile {
        if let Some(area) = p.pain_areas.iter().next() {
            let body = fill_placeholders(
                PAIN_BANK[seed % PAIN_BANK.len()],
                &[("pain_area", area.label())],
            );
            return make_insight(InsightCategory::Pain, body, None, today);
        }
        if p.sedentary_bucket.is_some_and(|b| b >= HIGH_SEDENTARY) {
            let body = fill_placeholders(
                SEDENTARY_BANK[seed % SEDENTARY_BANK.len()],
                &[("sedentary", sedentary_label(profile))],
            );
            return make_insight(InsightCategory::SedentaryRisk, body, None, today);
        }
        if !p.stiffness_times.is_empty() {
            let body = fill_placeholders(
                TIMING_BANK[seed % TIMING_BANK.len()],
                &[("time", primary_stiffness_label(p))],
            );
            return make_insight(InsightCategory::Timing, body, None, today);
        }
    }
    let body = MOTIVATIONAL_BANK[seed % MOTIVATIONAL_BANK.len()].to_string();
    make_insight(InsightCategory::Motivational, body, None, today)
}

/// Secondary slot: rotates across categories, advancing once on collision
fn secondary_insight(
    profile: Option<&ProfileSnapshot>,
    summary: Option<&ProgressSummary>,
    plan: Option<&PlanInfo>,
    primary_category: InsightCategory,
    seed: usize,
    today: NaiveDate,
) -> DailyInsight {
    let weekday = today.weekday().num_days_from_monday() as usize;
    let mut index = (weekday + seed) % SECONDARY_ROTATION.len();
    if SECONDARY_ROTATION[index] == primary_category {
        index = (index + 1) % SECONDARY_ROTATION.len();
    }
    let category = SECONDARY_ROTATION[index];

    let body = match category {
        InsightCategory::Progress => progress_body(summary, seed),
        InsightCategory::Plan => plan_body(plan, seed),
        InsightCategory::WorkEnvironment => {
            WORK_ENVIRONMENT_BANK[seed % WORK_ENVIRONMENT_BANK.len()].to_string()
        }
        InsightCategory::Recovery => RECOVERY_BANK[seed % RECOVERY_BANK.len()].to_string(),
        InsightCategory::Motivational => {
            MOTIVATIONAL_BANK[seed % MOTIVATIONAL_BANK.len()].to_string()
        }
        InsightCategory::SedentaryRisk => fill_placeholders(
            SEDENTARY_BANK[seed % SEDENTARY_BANK.len()],
            &[("sedentary", sedentary_label(profile))],
        ),
        InsightCategory::Timing => fill_placeholders(
            TIMING_BANK[seed % TIMING_BANK.len()],
            &[(
                "time",
                profile.map(primary_stiffness_label).unwrap_or("midday"),
            )],
        ),
        // Pain never appears in the rotation list
        InsightCategory::Pain => unreachable!("pain is primary-only"),
    };
    make_insight(category, body, None, today)
}

/// Progress category branches on the week's shape
fn progress_body(summary: Option<&ProgressSummary>, seed: usize) -> String {
    let Some(s) = summary else {
        return PROGRESS_GENERAL_BANK[seed % PROGRESS_GENERAL_BANK.len()].to_string();
    };
    if s.trend == Trend::Improving {
        PROGRESS_IMPROVING_BANK[seed % PROGRESS_IMPROVING_BANK.len()].to_string()
    } else if s.streak_days >= 3 {
        fill_placeholders(
            PROGRESS_STREAK_BANK[seed % PROGRESS_STREAK_BANK.len()],
            &[("streak", &s.streak_days.to_string())],
        )
    } else if s.weekly_sessions_completed == 0 {
        PROGRESS_RESTART_BANK[seed % PROGRESS_RESTART_BANK.len()].to_string()
    } else {
        PROGRESS_GENERAL_BANK[seed % PROGRESS_GENERAL_BANK.len()].to_string()
    }
}

fn plan_body(plan: Option<&PlanInfo>, seed: usize) -> String {
    let Some(p) = plan.filter(|p| p.exercises_planned > 0) else {
        return PLAN_FALLBACK.to_string();
    };
    let next = p
        .next_exercise_name
        .clone()
        .unwrap_or_else(|| "a quick stretch".to_string());
    let remaining = p.exercises_planned.saturating_sub(p.exercises_completed);
    fill_placeholders(
        PLAN_BANK[seed % PLAN_BANK.len()],
        &[
            ("next_exercise", next.as_str()),
            ("remaining", &remaining.to_string()),
            ("completed", &p.exercises_completed.to_string()),
            ("planned", &p.exercises_planned.to_string()),
        ],
    )
}

/// Tertiary slot: earned by momentum, never duplicates an earlier category
fn tertiary_insight(
    summary: Option<&ProgressSummary>,
    used: &[InsightCategory],
    seed: usize,
    today: NaiveDate,
) -> Option<DailyInsight> {
    let s = summary?;
    if s.streak_days < 3 && s.weekly_sessions_completed < 5 {
        return None;
    }
    let category = [InsightCategory::Motivational, InsightCategory::Recovery]
        .into_iter()
        .find(|c| !used.contains(c))?;
    let body = match category {
        InsightCategory::Motivational => {
            MOTIVATIONAL_BANK[seed % MOTIVATIONAL_BANK.len()].to_string()
        }
        _ => RECOVERY_BANK[seed % RECOVERY_BANK.len()].to_string(),
    };
    let badge = (s.streak_days >= 3).then(|| format!("{}-day streak", s.streak_days));
    Some(make_insight(category, body, badge, today))
}
