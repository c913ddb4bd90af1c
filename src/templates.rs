//! Template bank
//!
//! Static catalogs of parameterized message text, grouped by category.
//! Banks are data, not logic: selection happens in the analysis and daily
//! engines via deterministic seeds, and `{placeholder}` tokens are filled
//! from profile and progress state.

/// Substitute `{key}` tokens in a template with the given values
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

// ---------------------------------------------------------------------------
// Daily insight banks (primary slot, 4-5 variants each)
// ---------------------------------------------------------------------------

pub const PAIN_BANK: &[&str] = &[
    "Your {pain_area} tends to tighten up during long sitting stretches. A two-minute release now can head that off.",
    "Gentle movement is the fastest way to calm {pain_area} discomfort. Try a short mobility break before it builds.",
    "Checking in on your {pain_area}: a quick stretch between meetings keeps it from stiffening through the day.",
    "Small, frequent resets do more for {pain_area} tension than one long session. Sneak one in this hour.",
    "Your {pain_area} will thank you for a micro-break. Thirty seconds of movement counts.",
];

pub const SEDENTARY_BANK: &[&str] = &[
    "You log {sedentary} of sitting most days. Standing up once an hour measurably offsets that load.",
    "With {sedentary} at the desk, your hips and back carry the cost. Break it up with a walk to refill your water.",
    "Long sitting blocks add up to {sedentary} a day. A one-minute stand-and-stretch resets your posture clock.",
    "Sitting {sedentary} keeps your hip flexors shortened. Stand during your next call and let them lengthen.",
];

pub const TIMING_BANK: &[&str] = &[
    "You usually feel stiffest in the {time}. A pre-emptive stretch just before then works best.",
    "Your {time} stiffness window is coming up. Two minutes of movement now softens it considerably.",
    "Stiff {time}s are common with desk work. Meeting them with a short routine builds lasting relief.",
    "Plan one break for the {time}, your reported stiff period. Timing the movement is half the benefit.",
];

pub const MOTIVATIONAL_BANK: &[&str] = &[
    "Consistency beats intensity. One small session today keeps the habit alive.",
    "Your future self feels every break you take today. Make one count.",
    "Posture change is built in minutes, not marathons. You only need a few.",
    "Showing up daily is the whole game. A single stretch still counts as showing up.",
    "Momentum is easier to keep than to rebuild. Keep today's streak rolling.",
];

pub const RECOVERY_BANK: &[&str] = &[
    "Recovery matters as much as movement. Gentle range-of-motion work today keeps joints happy.",
    "A lighter day is still a day. Slow shoulder rolls and deep breaths count as recovery work.",
    "Give worked muscles a day to adapt: easy neck circles and a walk are perfect today.",
    "Rest is part of the plan. A few relaxed stretches tonight will set up tomorrow's session.",
];

pub const WORK_ENVIRONMENT_BANK: &[&str] = &[
    "Raise your screen to eye level today; it quietly removes hours of forward-head load.",
    "Check your chair: hips slightly above knees keeps your lower back in its natural curve.",
    "Keep your keyboard close enough that elbows rest at your sides. Reach creeps in over the day.",
    "Try anchoring breaks to a cue you already have, like the top of every hour or after each meeting.",
];

pub const PLAN_BANK: &[&str] = &[
    "Your next planned exercise is {next_exercise}. It slots neatly into a two-minute gap.",
    "Today's plan has {remaining} exercises left. Knocking out one now keeps the rest easy.",
    "One exercise from today's plan takes less time than brewing a coffee. {next_exercise} is up next.",
    "You're {completed} of {planned} through today's plan. The next one is the easiest to skip and the most worth doing.",
];

/// Shown for the plan category when no plan state was supplied
pub const PLAN_FALLBACK: &str =
    "Your plan is ready when you are. Two minutes is all the first exercise needs.";

// Progress bank, sub-branched on progress state
pub const PROGRESS_IMPROVING_BANK: &[&str] = &[
    "Your scores are trending up this week. Whatever you changed, it's working.",
    "Nice trajectory: recent days score higher than where the week started.",
    "The trend line is pointing up. Consistency is compounding for you.",
];

pub const PROGRESS_STREAK_BANK: &[&str] = &[
    "{streak} days in a row. Streaks like this are where posture change actually happens.",
    "You're on a {streak}-day streak. Protect it with even one short session today.",
    "Day {streak} of your streak. The habit is forming; keep feeding it.",
];

pub const PROGRESS_RESTART_BANK: &[&str] = &[
    "No sessions logged this week yet. The first one back is the hardest and it takes two minutes.",
    "A quiet week so far. One short session today restarts the clock without any catch-up needed.",
    "This week is still open. A single stretch break turns it into an active one.",
];

pub const PROGRESS_GENERAL_BANK: &[&str] = &[
    "Every recorded session feeds your weekly picture. Today's is worth logging.",
    "Progress shows up in the weekly view before you feel it. Keep the entries coming.",
    "Your week is building. Each session nudges the average up.",
];

// ---------------------------------------------------------------------------
// Analysis insight variant banks (2-4 phrasings per generator)
// ---------------------------------------------------------------------------

pub const ANALYSIS_SEDENTARY_VARIANTS: &[&str] = &[
    "You report {sedentary} of sitting per day. Sustained sitting is the single biggest driver of desk-related stiffness, and breaking it into shorter blocks is the highest-leverage change available to you.",
    "At {sedentary} of daily sitting, your muscles spend most of the workday in one shortened position. Regular micro-breaks restore length and circulation far better than a single workout can.",
    "Sitting {sedentary} each day concentrates load on your spine and hips. Standing briefly every hour spreads that load and is the first habit worth building.",
];

pub const ANALYSIS_STIFFNESS_VARIANTS: &[&str] = &[
    "Your stiffness shows a clear daily pattern. Scheduling movement just before your stiff periods, rather than reacting afterward, tends to shrink them week over week.",
    "You feel stiff at predictable times of day. That predictability is useful: a short routine timed ahead of each window prevents most of the buildup.",
    "Recurring stiffness windows usually track your sitting rhythm. Pre-empting them with brief mobility work breaks the cycle.",
];

pub const ANALYSIS_NECK_VARIANTS: &[&str] = &[
    "Your reported discomfort centers on the neck and upper back, the classic screen-posture zone. Chin tucks and doorway stretches target it directly.",
    "Neck and upper-back strain usually comes from screen height and forward-head drift. Raising your display plus daily chin tucks addresses both causes at once.",
    "The neck and upper back respond quickly to small daily work. Two focused minutes a day typically beats an occasional long session.",
];

pub const ANALYSIS_LOWER_BACK_VARIANTS: &[&str] = &[
    "Lower-back and hip discomfort points to long sitting with shortened hip flexors. Standing breaks and hip-flexor stretches relieve the underlying tension.",
    "Your lower back and hips carry most of the sitting load. Gentle extension breaks and glute activation counter the pattern that builds it.",
    "Hips and lower back stiffen together at a desk. A kneeling hip-flexor stretch once a day is the most efficient counter.",
];

pub const ANALYSIS_MOVEMENT_VARIANTS: &[&str] = &[
    "Your current exercise baseline is light, which makes desk stiffness accumulate faster. Short daily mobility work is the gentlest on-ramp.",
    "With little regular exercise, your body has fewer chances to undo the day's sitting. Micro-sessions lower the bar enough to start today.",
    "A low movement baseline means each small session counts double. Start with the two-minute versions and let frequency do the work.",
];

pub const ANALYSIS_TIME_VARIANTS: &[&str] = &[
    "You budgeted {minutes} minutes per day. That is enough for a focused routine if each break stays short and targeted.",
    "With {minutes} minutes available daily, the plan leans on brief, high-value movements rather than long sessions.",
];

pub const ANALYSIS_WORK_VARIANTS: &[&str] = &[
    "Your {work_hours}-hour workday means posture habits at the desk dominate everything else. Small workstation changes pay off across every one of those hours.",
    "Across a {work_hours}-hour workday, ergonomics compound. Screen height, chair setup, and hourly stands are worth more than any single exercise.",
    "A {work_hours}-hour desk day rewards environment fixes first: raise the screen, square the chair, and anchor one break per hour.",
];

// ---------------------------------------------------------------------------
// Analysis summary text, fixed per risk category
// ---------------------------------------------------------------------------

pub const SUMMARY_LOW: (&str, &str) = (
    "You're in good shape to build on",
    "Your answers show a light posture-risk load. A short daily routine will keep it that way and make your desk hours easier on your body.",
);

pub const SUMMARY_MODERATE: (&str, &str) = (
    "A few patterns worth addressing",
    "Your answers show a moderate posture-risk load: some habits are working for you, and a few are quietly building tension. The plan focuses on the handful of changes with the biggest payoff.",
);

pub const SUMMARY_ELEVATED: (&str, &str) = (
    "Your body is asking for a change",
    "Your answers show an elevated posture-risk load. The good news: desk-driven tension responds quickly to small, consistent habits, and your plan starts with the areas under the most strain.",
);

pub const DISCLAIMERS: &[&str] = &[
    "This analysis reflects your self-reported answers and is not a medical assessment.",
    "If you experience sharp, persistent, or radiating pain, consult a healthcare professional.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_placeholders() {
        let out = fill_placeholders(
            "Your {pain_area} hurts after {sedentary}.",
            &[("pain_area", "neck"), ("sedentary", "over 8 hours")],
        );
        assert_eq!(out, "Your neck hurts after over 8 hours.");
    }

    #[test]
    fn test_fill_placeholders_missing_key_left_alone() {
        let out = fill_placeholders("Hello {name}", &[("other", "x")]);
        assert_eq!(out, "Hello {name}");
    }

    #[test]
    fn test_primary_banks_have_four_to_five_variants() {
        for bank in [
            PAIN_BANK,
            SEDENTARY_BANK,
            TIMING_BANK,
            MOTIVATIONAL_BANK,
            RECOVERY_BANK,
            WORK_ENVIRONMENT_BANK,
            PLAN_BANK,
        ] {
            assert!((4..=5).contains(&bank.len()));
        }
    }

    #[test]
    fn test_analysis_banks_have_two_to_four_variants() {
        for bank in [
            ANALYSIS_SEDENTARY_VARIANTS,
            ANALYSIS_STIFFNESS_VARIANTS,
            ANALYSIS_NECK_VARIANTS,
            ANALYSIS_LOWER_BACK_VARIANTS,
            ANALYSIS_MOVEMENT_VARIANTS,
            ANALYSIS_TIME_VARIANTS,
            ANALYSIS_WORK_VARIANTS,
        ] {
            assert!((2..=4).contains(&bank.len()));
        }
    }
}
