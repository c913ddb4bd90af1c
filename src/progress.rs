//! Progress repository
//!
//! Durable, day-keyed store of score entries with a derived rolling summary.
//! One entry per calendar day; later writes replace. The in-memory entry list
//! and summary are single-writer state: callers serialize mutations (a
//! UI-driven client drives one logical owner).

use crate::score::build_daily_entry;
use crate::store::{EntryStore, StoredProgress, STORE_VERSION};
use crate::types::{
    DailyScoreEntry, FocusArea, InsightCache, ProfileSnapshot, ProgressSummary, StiffnessTime,
    Trend,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use log::warn;
use std::collections::BTreeSet;

/// Days considered when classifying the score trend
pub const TREND_WINDOW_DAYS: i64 = 14;
/// Minimum active days before a trend is called
pub const TREND_MIN_ACTIVE_DAYS: usize = 3;
/// Integer-average band within which the trend stays steady
pub const TREND_BAND: i64 = 5;

/// Map a wall-clock hour to the stiffness window it falls in.
///
/// Boundary hours (05:00 / 12:00 / 17:00) are product constants, preserved
/// literally from the shipped rubric.
pub fn stiffness_window_for_hour(hour: u32) -> StiffnessTime {
    match hour {
        5..=11 => StiffnessTime::Morning,
        12..=16 => StiffnessTime::Midday,
        _ => StiffnessTime::Evening,
    }
}

/// Day-keyed progress store with a derived weekly summary
pub struct ProgressRepository {
    store: Box<dyn EntryStore>,
    /// Newest-first
    entries: Vec<DailyScoreEntry>,
    insight_cache: Option<InsightCache>,
    summary: ProgressSummary,
}

impl ProgressRepository {
    /// Open the repository, reading persisted state from the store
    pub fn new(store: Box<dyn EntryStore>, today: NaiveDate) -> Self {
        let stored = store.load();
        let mut entries = stored.entries;
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.dedup_by_key(|e| e.date);
        let summary = compute_summary(&entries, today);
        Self {
            store,
            entries,
            insight_cache: stored.insight_cache,
            summary,
        }
    }

    /// Current derived summary (recomputed on every mutation)
    pub fn summary(&self) -> &ProgressSummary {
        &self.summary
    }

    /// All entries, newest-first
    pub fn entries(&self) -> &[DailyScoreEntry] {
        &self.entries
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<&DailyScoreEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    pub fn todays_entry(&self, today: NaiveDate) -> Option<&DailyScoreEntry> {
        self.entry_for(today)
    }

    /// Entries within the trailing `n` days of `today`, newest-first
    pub fn entries_last(&self, n: u32, today: NaiveDate) -> Vec<DailyScoreEntry> {
        let from = today - Duration::days(i64::from(n) - 1);
        self.entries_between(from, today)
    }

    /// Entries with `from <= date <= to`, newest-first
    pub fn entries_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<DailyScoreEntry> {
        self.entries
            .iter()
            .filter(|e| e.date >= from && e.date <= to)
            .cloned()
            .collect()
    }

    /// Upsert an entry for its calendar day and recompute the summary
    pub fn save_entry(&mut self, entry: DailyScoreEntry, today: NaiveDate) {
        self.entries.retain(|e| e.date != entry.date);
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
        self.persist();
        self.summary = compute_summary(&self.entries, today);
    }

    pub fn delete_entry(&mut self, date: NaiveDate, today: NaiveDate) {
        self.entries.retain(|e| e.date != date);
        self.persist();
        self.summary = compute_summary(&self.entries, today);
    }

    pub fn clear_all(&mut self, today: NaiveDate) {
        self.entries.clear();
        self.insight_cache = None;
        self.persist();
        self.summary = compute_summary(&self.entries, today);
    }

    /// Force a re-read from storage, discarding in-memory state
    pub fn reload(&mut self, today: NaiveDate) {
        let stored = self.store.load();
        self.entries = stored.entries;
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
        self.entries.dedup_by_key(|e| e.date);
        self.insight_cache = stored.insight_cache;
        self.summary = compute_summary(&self.entries, today);
    }

    /// Record a completed session.
    ///
    /// Reads or synthesizes today's entry, bumps sessions and minutes, unions
    /// the focus areas and the stiffness window derived from the wall-clock
    /// hour, rescores, and upserts.
    pub fn record_session_completion(
        &mut self,
        duration_seconds: u32,
        focus_areas: &BTreeSet<FocusArea>,
        profile: Option<&ProfileSnapshot>,
        current_streak: u32,
        now: NaiveDateTime,
    ) {
        let today = now.date();
        let existing = self.entry_for(today).cloned();

        let mut sessions = 1;
        let mut minutes = duration_seconds / 60;
        let mut areas = focus_areas.clone();
        let mut triggered: BTreeSet<StiffnessTime> = BTreeSet::new();
        if let Some(prev) = existing {
            sessions += prev.sessions_completed;
            minutes += prev.minutes_completed;
            areas.extend(prev.focus_areas);
            triggered.extend(prev.stiffness_times_triggered);
        }
        triggered.insert(stiffness_window_for_hour(now.hour()));

        let entry = build_daily_entry(
            today,
            sessions,
            minutes,
            areas,
            triggered,
            profile,
            current_streak,
        );
        self.save_entry(entry, today);
    }

    /// Persisted per-day insight cache, if any
    pub fn insight_cache(&self) -> Option<&InsightCache> {
        self.insight_cache.as_ref()
    }

    pub fn set_insight_cache(&mut self, cache: InsightCache) {
        self.insight_cache = Some(cache);
        self.persist();
    }

    fn persist(&mut self) {
        let stored = StoredProgress {
            version: STORE_VERSION,
            entries: self.entries.clone(),
            insight_cache: self.insight_cache.clone(),
        };
        // Best-effort: progress data must never block app usage
        if let Err(e) = self.store.save(&stored) {
            warn!("failed to persist progress: {e}");
        }
    }
}

/// Count consecutive active days walking backward from `today`.
///
/// If today has no activity the walk starts at yesterday, so a streak
/// survives until the user's "today" session instead of breaking at
/// midnight. The first inactive or missing day terminates the walk.
pub fn compute_streak(entries: &[DailyScoreEntry], today: NaiveDate) -> u32 {
    let active = |date: NaiveDate| {
        entries
            .iter()
            .find(|e| e.date == date)
            .map(DailyScoreEntry::has_activity)
            .unwrap_or(false)
    };

    let mut cursor = if active(today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while active(cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

/// Classify the trend over active-day scores in the trailing window.
///
/// Scores are split into halves (remainder with the second half); fewer than
/// three active days is always steady.
pub fn compute_trend(entries: &[DailyScoreEntry], today: NaiveDate) -> Trend {
    let from = today - Duration::days(TREND_WINDOW_DAYS - 1);
    let mut scores: Vec<(NaiveDate, i64)> = entries
        .iter()
        .filter(|e| e.date >= from && e.date <= today && e.has_activity())
        .map(|e| (e.date, i64::from(e.score)))
        .collect();
    scores.sort_by_key(|(date, _)| *date);

    if scores.len() < TREND_MIN_ACTIVE_DAYS {
        return Trend::Steady;
    }

    let mid = scores.len() / 2;
    let first: Vec<i64> = scores[..mid].iter().map(|(_, s)| *s).collect();
    let second: Vec<i64> = scores[mid..].iter().map(|(_, s)| *s).collect();
    let first_avg = first.iter().sum::<i64>() / first.len() as i64;
    let second_avg = second.iter().sum::<i64>() / second.len() as i64;

    let diff = second_avg - first_avg;
    if diff > TREND_BAND {
        Trend::Improving
    } else if diff < -TREND_BAND {
        Trend::Declining
    } else {
        Trend::Steady
    }
}

/// Short congratulatory strings derived from the week's numbers
fn generate_wins(
    streak: u32,
    weekly_sessions: u32,
    weekly_average: u32,
    trend: Trend,
) -> Vec<String> {
    let mut wins = Vec::new();
    if streak >= 7 {
        wins.push(format!("{streak}-day streak — a full week of showing up"));
    } else if streak >= 3 {
        wins.push(format!("{streak}-day streak and counting"));
    }
    if weekly_sessions >= 5 {
        wins.push(format!("{weekly_sessions} sessions this week"));
    }
    if weekly_average >= 80 {
        wins.push(format!("Weekly average of {weekly_average} — strong week"));
    }
    if trend == Trend::Improving {
        wins.push("Scores trending up".to_string());
    }
    wins.truncate(3);
    wins
}

/// Rebuild the rolling summary from the entry set
pub fn compute_summary(entries: &[DailyScoreEntry], today: NaiveDate) -> ProgressSummary {
    let week_start = today - Duration::days(6);

    // Trailing 7 days, oldest to newest, gaps backfilled with placeholders
    let last_7_days: Vec<DailyScoreEntry> = (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            entries
                .iter()
                .find(|e| e.date == date)
                .cloned()
                .unwrap_or_else(|| DailyScoreEntry::placeholder(date))
        })
        .collect();

    let active: Vec<&DailyScoreEntry> =
        last_7_days.iter().filter(|e| e.has_activity()).collect();
    let weekly_average_score = if active.is_empty() {
        0
    } else {
        active.iter().map(|e| u32::from(e.score)).sum::<u32>() / active.len() as u32
    };
    let weekly_sessions_completed = last_7_days.iter().map(|e| e.sessions_completed).sum();
    let weekly_minutes_completed = last_7_days.iter().map(|e| e.minutes_completed).sum();

    let focus_areas_touched: BTreeSet<FocusArea> = last_7_days
        .iter()
        .flat_map(|e| e.focus_areas.iter().copied())
        .collect();

    let streak_days = compute_streak(entries, today);
    let trend = compute_trend(entries, today);
    let wins = generate_wins(streak_days, weekly_sessions_completed, weekly_average_score, trend);
    let has_enough_data = entries.iter().any(DailyScoreEntry::has_activity);

    ProgressSummary {
        week_start_date: week_start,
        weekly_average_score,
        weekly_sessions_completed,
        weekly_minutes_completed,
        streak_days,
        trend,
        last_7_days,
        focus_areas_touched,
        wins,
        has_enough_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn active_entry(date: NaiveDate, score: u8) -> DailyScoreEntry {
        DailyScoreEntry {
            score,
            sessions_completed: 1,
            minutes_completed: 5,
            ..DailyScoreEntry::placeholder(date)
        }
    }

    fn make_repo() -> ProgressRepository {
        ProgressRepository::new(Box::new(MemoryStore::new()), day(15))
    }

    #[test]
    fn test_stiffness_window_boundaries() {
        assert_eq!(stiffness_window_for_hour(4), StiffnessTime::Evening);
        assert_eq!(stiffness_window_for_hour(5), StiffnessTime::Morning);
        assert_eq!(stiffness_window_for_hour(11), StiffnessTime::Morning);
        assert_eq!(stiffness_window_for_hour(12), StiffnessTime::Midday);
        assert_eq!(stiffness_window_for_hour(16), StiffnessTime::Midday);
        assert_eq!(stiffness_window_for_hour(17), StiffnessTime::Evening);
        assert_eq!(stiffness_window_for_hour(23), StiffnessTime::Evening);
    }

    #[test]
    fn test_save_entry_replaces_same_day() {
        let mut repo = make_repo();
        repo.save_entry(active_entry(day(15), 70), day(15));
        repo.save_entry(active_entry(day(15), 85), day(15));

        assert_eq!(repo.entries().len(), 1);
        assert_eq!(repo.entry_for(day(15)).unwrap().score, 85);
    }

    #[test]
    fn test_entries_sorted_newest_first() {
        let mut repo = make_repo();
        repo.save_entry(active_entry(day(10), 70), day(15));
        repo.save_entry(active_entry(day(14), 75), day(15));
        repo.save_entry(active_entry(day(12), 72), day(15));

        let dates: Vec<NaiveDate> = repo.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(14), day(12), day(10)]);
    }

    #[test]
    fn test_streak_three_consecutive_days() {
        let entries = vec![
            active_entry(day(15), 70),
            active_entry(day(14), 70),
            active_entry(day(13), 70),
        ];
        assert_eq!(compute_streak(&entries, day(15)), 3);
    }

    #[test]
    fn test_streak_survives_inactive_today() {
        // No activity today, but yesterday and the day before
        let entries = vec![active_entry(day(14), 70), active_entry(day(13), 70)];
        assert_eq!(compute_streak(&entries, day(15)), 2);
    }

    #[test]
    fn test_streak_breaks_on_gap() {
        let entries = vec![
            active_entry(day(15), 70),
            active_entry(day(14), 70),
            // gap on the 13th
            active_entry(day(12), 70),
        ];
        assert_eq!(compute_streak(&entries, day(15)), 2);
    }

    #[test]
    fn test_streak_zero_activity_day_terminates() {
        let entries = vec![
            active_entry(day(15), 70),
            DailyScoreEntry::placeholder(day(14)),
            active_entry(day(13), 70),
        ];
        assert_eq!(compute_streak(&entries, day(15)), 1);
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(compute_streak(&[], day(15)), 0);
    }

    #[test]
    fn test_weekly_average_ignores_inactive_days() {
        let entries = vec![
            active_entry(day(15), 80),
            DailyScoreEntry::placeholder(day(14)),
            active_entry(day(13), 60),
        ];
        let summary = compute_summary(&entries, day(15));
        assert_eq!(summary.weekly_average_score, 70);
    }

    #[test]
    fn test_weekly_average_zero_without_activity() {
        let entries = vec![DailyScoreEntry::placeholder(day(15))];
        let summary = compute_summary(&entries, day(15));
        assert_eq!(summary.weekly_average_score, 0);
        assert!(!summary.has_enough_data);
    }

    #[test]
    fn test_last_7_days_backfilled_and_ordered() {
        let entries = vec![active_entry(day(15), 80)];
        let summary = compute_summary(&entries, day(15));

        assert_eq!(summary.last_7_days.len(), 7);
        assert_eq!(summary.last_7_days[0].date, day(9));
        assert_eq!(summary.last_7_days[6].date, day(15));
        assert!(summary.last_7_days[..6].iter().all(|e| !e.has_activity()));
        assert!(summary.last_7_days[6].has_activity());
    }

    #[test]
    fn test_trend_needs_three_active_days() {
        let entries = vec![active_entry(day(15), 90), active_entry(day(14), 40)];
        assert_eq!(compute_trend(&entries, day(15)), Trend::Steady);
    }

    #[test]
    fn test_trend_improving() {
        let entries = vec![
            active_entry(day(15), 90),
            active_entry(day(14), 88),
            active_entry(day(13), 60),
            active_entry(day(12), 62),
        ];
        assert_eq!(compute_trend(&entries, day(15)), Trend::Improving);
    }

    #[test]
    fn test_trend_declining() {
        let entries = vec![
            active_entry(day(15), 55),
            active_entry(day(14), 58),
            active_entry(day(13), 85),
            active_entry(day(12), 88),
        ];
        assert_eq!(compute_trend(&entries, day(15)), Trend::Declining);
    }

    #[test]
    fn test_trend_steady_within_band() {
        let entries = vec![
            active_entry(day(15), 72),
            active_entry(day(14), 70),
            active_entry(day(13), 68),
            active_entry(day(12), 70),
        ];
        assert_eq!(compute_trend(&entries, day(15)), Trend::Steady);
    }

    #[test]
    fn test_record_session_completion_creates_entry() {
        let mut repo = make_repo();
        let now = day(15).and_hms_opt(9, 30, 0).unwrap();
        let areas: BTreeSet<_> = [FocusArea::Neck].into_iter().collect();

        repo.record_session_completion(300, &areas, None, 0, now);

        let entry = repo.todays_entry(day(15)).unwrap();
        assert_eq!(entry.sessions_completed, 1);
        assert_eq!(entry.minutes_completed, 5);
        assert!(entry
            .stiffness_times_triggered
            .contains(&StiffnessTime::Morning));
        assert!(repo.summary().has_enough_data);
    }

    #[test]
    fn test_record_session_completion_accumulates() {
        let mut repo = make_repo();
        let morning = day(15).and_hms_opt(8, 0, 0).unwrap();
        let afternoon = day(15).and_hms_opt(14, 0, 0).unwrap();
        let neck: BTreeSet<_> = [FocusArea::Neck].into_iter().collect();
        let hips: BTreeSet<_> = [FocusArea::Hips].into_iter().collect();

        repo.record_session_completion(120, &neck, None, 0, morning);
        repo.record_session_completion(180, &hips, None, 1, afternoon);

        let entry = repo.todays_entry(day(15)).unwrap();
        assert_eq!(entry.sessions_completed, 2);
        assert_eq!(entry.minutes_completed, 5);
        assert_eq!(entry.focus_areas.len(), 2);
        assert_eq!(entry.stiffness_times_triggered.len(), 2);
    }

    #[test]
    fn test_record_session_scores_with_profile_match() {
        let profile = ProfileSnapshot {
            stiffness_times: [StiffnessTime::Morning].into_iter().collect(),
            ..ProfileSnapshot::default()
        };
        let mut repo = make_repo();
        let now = day(15).and_hms_opt(8, 0, 0).unwrap();

        repo.record_session_completion(300, &BTreeSet::new(), Some(&profile), 0, now);

        // Base 60 + 8 session + 3 timing match
        assert_eq!(repo.todays_entry(day(15)).unwrap().score, 71);
    }

    #[test]
    fn test_clear_all_and_delete() {
        let mut repo = make_repo();
        repo.save_entry(active_entry(day(14), 70), day(15));
        repo.save_entry(active_entry(day(15), 75), day(15));

        repo.delete_entry(day(14), day(15));
        assert_eq!(repo.entries().len(), 1);

        repo.clear_all(day(15));
        assert!(repo.entries().is_empty());
        assert!(!repo.summary().has_enough_data);
    }

    #[test]
    fn test_persistence_round_trip_through_reload() {
        let mut repo = make_repo();
        repo.save_entry(active_entry(day(15), 75), day(15));
        repo.reload(day(15));

        assert_eq!(repo.entries().len(), 1);
        assert_eq!(repo.entry_for(day(15)).unwrap().score, 75);
    }

    #[test]
    fn test_wins_generation() {
        let wins = generate_wins(7, 6, 85, Trend::Improving);
        assert_eq!(wins.len(), 3);
        assert!(wins[0].contains("7-day streak"));

        assert!(generate_wins(0, 0, 0, Trend::Steady).is_empty());
    }

    #[test]
    fn test_summary_uses_explicit_today() {
        // Entries far in the past contribute nothing to this week
        let entries = vec![active_entry(day(1), 90)];
        let summary = compute_summary(&entries, day(15));
        assert_eq!(summary.weekly_sessions_completed, 0);
        assert_eq!(summary.weekly_average_score, 0);
        assert!(summary.has_enough_data);
    }

    #[test]
    fn test_full_flow_through_file_store() {
        use crate::store::JsonFileStore;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let areas: BTreeSet<FocusArea> = [FocusArea::Neck].into_iter().collect();

        // Three consecutive days of sessions, each through a fresh repository
        for d in 13..=15 {
            let mut repo =
                ProgressRepository::new(Box::new(JsonFileStore::new(&path)), day(d));
            let streak = compute_streak(repo.entries(), day(d));
            repo.record_session_completion(
                300,
                &areas,
                None,
                streak,
                day(d).and_hms_opt(9, 30, 0).unwrap(),
            );
        }

        let repo = ProgressRepository::new(Box::new(JsonFileStore::new(&path)), day(15));
        assert_eq!(repo.entries().len(), 3);
        assert_eq!(repo.summary().streak_days, 3);
        assert_eq!(repo.summary().weekly_sessions_completed, 3);
        assert!(repo.summary().focus_areas_touched.contains(&FocusArea::Neck));
        // 09:30 falls in the morning window
        assert!(repo
            .entry_for(day(15))
            .unwrap()
            .stiffness_times_triggered
            .contains(&StiffnessTime::Morning));
    }

    #[test]
    fn test_insight_cache_survives_file_reload() {
        use crate::store::JsonFileStore;
        use crate::types::InsightCache;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let mut repo = ProgressRepository::new(Box::new(JsonFileStore::new(&path)), day(15));
        repo.save_entry(active_entry(day(15), 75), day(15));
        repo.set_insight_cache(InsightCache {
            generated_on: day(15),
            insights: Vec::new(),
        });

        let reopened = ProgressRepository::new(Box::new(JsonFileStore::new(&path)), day(15));
        assert_eq!(reopened.insight_cache().unwrap().generated_on, day(15));
    }
}
