//! The achievement engine.
//!
//! `evaluate` is a pure function from a ledger snapshot and the set already
//! awarded to the delta of newly earned badges. Persisting the merge (and
//! telling the user) is the caller's job; a badge, once awarded, is never
//! revoked.

use crate::core::broker::DbBroker;
use crate::core::db;
use crate::core::error;
use crate::core::store::Store;
use crate::core::time;
use crate::subsystems::activity::ActivityEntry;
use chrono::NaiveDate;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How many consecutive calendar days earn the Consistency badge.
pub const STREAK_DAYS: usize = 7;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    FirstStep,
    StepChamp,
    SleeperPro,
    Consistency,
}

impl Badge {
    /// Stable identifier used as the storage key.
    pub fn id(&self) -> &'static str {
        match self {
            Badge::FirstStep => "FIRST_STEP",
            Badge::StepChamp => "STEP_CHAMP",
            Badge::SleeperPro => "SLEEPER_PRO",
            Badge::Consistency => "CONSISTENCY",
        }
    }

    /// Display label shown in the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Badge::FirstStep => "🥉 First Step",
            Badge::StepChamp => "🥈 Step Champ",
            Badge::SleeperPro => "🥇 Sleeper Pro",
            Badge::Consistency => "🔥 Consistency",
        }
    }

    pub fn from_id(id: &str) -> Option<Badge> {
        match id {
            "FIRST_STEP" => Some(Badge::FirstStep),
            "STEP_CHAMP" => Some(Badge::StepChamp),
            "SLEEPER_PRO" => Some(Badge::SleeperPro),
            "CONSISTENCY" => Some(Badge::Consistency),
            _ => None,
        }
    }

    pub const ALL: [Badge; 4] = [
        Badge::FirstStep,
        Badge::StepChamp,
        Badge::SleeperPro,
        Badge::Consistency,
    ];
}

/// Newly earned badges for this snapshot, in declaration order. Anything in
/// `already_awarded` is never returned again.
pub fn evaluate(entries: &[ActivityEntry], already_awarded: &HashSet<Badge>) -> Vec<Badge> {
    let mut earned = Vec::new();

    for badge in Badge::ALL {
        if already_awarded.contains(&badge) {
            continue;
        }
        let hit = match badge {
            Badge::FirstStep => !entries.is_empty(),
            Badge::StepChamp => entries.iter().any(|e| e.steps >= 10_000),
            Badge::SleeperPro => entries.iter().any(|e| e.sleep_hours >= 8.0),
            Badge::Consistency => has_week_streak(entries),
        };
        if hit {
            earned.push(badge);
        }
    }

    earned
}

/// True when the ledger holds a run of `STREAK_DAYS` calendar-consecutive
/// dates. The run may sit anywhere in the history; any gap resets it.
fn has_week_streak(entries: &[ActivityEntry]) -> bool {
    if entries.len() < STREAK_DAYS {
        return false;
    }

    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort();
    dates.dedup();

    let mut run = 1;
    for pair in dates.windows(2) {
        if pair[0].succ_opt() == Some(pair[1]) {
            run += 1;
            if run >= STREAK_DAYS {
                return true;
            }
        } else {
            run = 1;
        }
    }
    false
}

/// The persisted awarded set for one user.
pub fn load_awarded(store: &Store, email: &str) -> Result<HashSet<Badge>, error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, email, "badges.load", |conn| {
        let mut stmt = conn.prepare("SELECT badge FROM awarded_badges WHERE email = ?1")?;
        let rows = stmt.query_map(params![email], |row| row.get::<_, String>(0))?;

        let mut awarded = HashSet::new();
        for row in rows {
            let id = row?;
            if let Some(badge) = Badge::from_id(&id) {
                awarded.insert(badge);
            }
        }
        Ok(awarded)
    })
}

/// Merge newly earned badges into the persisted set. Re-recording an
/// already-held badge is a no-op thanks to the (email, badge) key.
pub fn record_awarded(
    store: &Store,
    email: &str,
    badges: &[Badge],
) -> Result<(), error::WellnestError> {
    if badges.is_empty() {
        return Ok(());
    }
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);
    let awarded_at = time::now_epoch_z();

    broker.with_conn(&db_path, email, "badges.record", |conn| {
        for badge in badges {
            conn.execute(
                "INSERT OR IGNORE INTO awarded_badges(email, badge, awarded_at) VALUES(?1, ?2, ?3)",
                params![email, badge.id(), awarded_at],
            )?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, steps: i64, sleep_hours: f64) -> ActivityEntry {
        ActivityEntry {
            date: date.parse().unwrap(),
            steps,
            calories: 2000,
            sleep_hours,
        }
    }

    #[test]
    fn test_empty_ledger_earns_nothing() {
        assert!(evaluate(&[], &HashSet::new()).is_empty());
    }

    #[test]
    fn test_first_step_on_single_entry() {
        let earned = evaluate(&[entry("2024-01-01", 100, 6.0)], &HashSet::new());
        assert_eq!(earned, vec![Badge::FirstStep]);
    }

    #[test]
    fn test_step_champ_threshold() {
        let earned = evaluate(&[entry("2024-01-01", 10_000, 6.0)], &HashSet::new());
        assert!(earned.contains(&Badge::StepChamp));

        let earned = evaluate(&[entry("2024-01-01", 9_999, 6.0)], &HashSet::new());
        assert!(!earned.contains(&Badge::StepChamp));
    }

    #[test]
    fn test_sleeper_pro_threshold() {
        let earned = evaluate(&[entry("2024-01-01", 100, 8.0)], &HashSet::new());
        assert!(earned.contains(&Badge::SleeperPro));

        let earned = evaluate(&[entry("2024-01-01", 100, 7.9)], &HashSet::new());
        assert!(!earned.contains(&Badge::SleeperPro));
    }

    #[test]
    fn test_consistency_seven_consecutive_days() {
        let entries: Vec<ActivityEntry> = (1..=7)
            .map(|d| entry(&format!("2024-01-{:02}", d), 100, 6.0))
            .collect();
        assert!(evaluate(&entries, &HashSet::new()).contains(&Badge::Consistency));
    }

    #[test]
    fn test_consistency_gap_breaks_streak() {
        // Jan 1-6 plus Jan 8: never seven in a row
        let mut entries: Vec<ActivityEntry> = (1..=6)
            .map(|d| entry(&format!("2024-01-{:02}", d), 100, 6.0))
            .collect();
        entries.push(entry("2024-01-08", 100, 6.0));
        assert!(!evaluate(&entries, &HashSet::new()).contains(&Badge::Consistency));
    }

    #[test]
    fn test_consistency_two_short_runs_do_not_combine() {
        // Jan 1-5 and Jan 8-10
        let mut entries: Vec<ActivityEntry> = (1..=5)
            .map(|d| entry(&format!("2024-01-{:02}", d), 100, 6.0))
            .collect();
        for d in 8..=10 {
            entries.push(entry(&format!("2024-01-{:02}", d), 100, 6.0));
        }
        assert!(!evaluate(&entries, &HashSet::new()).contains(&Badge::Consistency));
    }

    #[test]
    fn test_consistency_streak_spans_month_boundary() {
        let entries: Vec<ActivityEntry> = [
            "2024-01-28",
            "2024-01-29",
            "2024-01-30",
            "2024-01-31",
            "2024-02-01",
            "2024-02-02",
            "2024-02-03",
        ]
        .iter()
        .map(|d| entry(d, 100, 6.0))
        .collect();
        assert!(evaluate(&entries, &HashSet::new()).contains(&Badge::Consistency));
    }

    #[test]
    fn test_already_awarded_never_returned() {
        let entries = vec![entry("2024-01-01", 12_000, 9.0)];
        let mut already = HashSet::new();
        already.insert(Badge::FirstStep);
        already.insert(Badge::StepChamp);

        let earned = evaluate(&entries, &already);
        assert_eq!(earned, vec![Badge::SleeperPro]);
    }

    #[test]
    fn test_badge_id_round_trip() {
        for badge in Badge::ALL {
            assert_eq!(Badge::from_id(badge.id()), Some(badge));
        }
        assert_eq!(Badge::from_id("NOT_A_BADGE"), None);
    }
}
