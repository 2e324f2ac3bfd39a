//! Command handlers for lingoctl.

use anyhow::Result;
use lingo_ledger::achievements;
use lingo_ledger::settings;
use lingo_ledger::stats::StatsSummary;
use lingo_ledger::{FileStore, KeyValueStore, LedgerConfig, ProgressLedger};
use std::fmt::Write;
use tracing::{debug, warn};

use crate::{Commands, PointsAction, Toggle};

/// Run a command against the file-backed ledger. Returns the exit code.
pub fn run(command: Commands, config: &LedgerConfig) -> Result<i32> {
    debug!("Using data dir {}", config.data_dir.display());
    let store = FileStore::new(&config.data_dir);
    let mut ledger = ProgressLedger::with_config(store, config);

    let (output, code) = execute(&mut ledger, command)?;
    print!("{}", output);
    if ledger.has_unsaved_changes() {
        eprintln!("Warning: changes could not be saved to {}", config.data_dir.display());
        return Ok(1);
    }
    Ok(code)
}

/// Execute a command and render its output
pub fn execute<S: KeyValueStore>(
    ledger: &mut ProgressLedger<S>,
    command: Commands,
) -> Result<(String, i32)> {
    let mut out = String::new();
    let mut code = 0;

    match command {
        Commands::Status => {
            let stats = StatsSummary::from_record(&ledger.load());
            writeln!(out, "{} - Level {}", stats.username, stats.level)?;
            writeln!(
                out,
                "XP      {} {}/{} ({}%)",
                stats.progress_bar(20),
                stats.experience,
                stats.threshold,
                stats.progress
            )?;
            writeln!(out, "Points  {}", stats.points)?;
            writeln!(out, "Words   {}", stats.words_learned)?;
            writeln!(out, "Correct {}", stats.correct_answers)?;
            writeln!(out, "Time    {}", stats.learning_time_display())?;
            writeln!(out, "Badges  {}", stats.achievement_count)?;
        }
        Commands::Xp { amount } => {
            let up = ledger.add_experience(amount);
            if up.leveled_up() {
                writeln!(
                    out,
                    "Level up! {} -> {} (+{} points)",
                    up.from, up.to, up.bonus_points
                )?;
            }
            let record = ledger.load();
            writeln!(out, "Level {}: {}/{} XP", record.level, record.experience, record.threshold())?;
        }
        Commands::Points { action } => match action {
            PointsAction::Add { amount } => {
                let record = ledger.add_points(amount);
                writeln!(out, "Points: {}", record.points)?;
            }
            PointsAction::Spend { amount } => {
                if ledger.spend_points(amount) {
                    writeln!(out, "Spent {}. Points: {}", amount, ledger.load().points)?;
                } else {
                    writeln!(
                        out,
                        "Not enough points: have {}, need {}",
                        ledger.load().points,
                        amount
                    )?;
                    code = 1;
                }
            }
        },
        Commands::Time { minutes } => {
            let record = ledger.add_learning_time(minutes);
            writeln!(out, "Learning time: {}", lingo_ledger::stats::format_minutes(record.learning_time))?;
        }
        Commands::Words { count } => {
            let record = ledger.add_words_learned(count);
            writeln!(out, "Words learned: {}", record.words_learned)?;
        }
        Commands::Correct { count } => {
            let record = ledger.add_correct_answers(count);
            writeln!(out, "Correct answers: {}", record.correct_answers)?;
        }
        Commands::Unlock { id } => {
            if ledger.add_achievement(&id) {
                writeln!(out, "{}", achievements::format_unlock(&id))?;
            } else {
                writeln!(out, "Already unlocked: {}", id)?;
            }
        }
        Commands::Achievements { check } => {
            if check {
                for ach in achievements::eligible(&ledger.load()) {
                    if ledger.add_achievement(ach.id) {
                        writeln!(out, "{}", achievements::format_unlock(ach.id))?;
                    }
                }
            }
            let record = ledger.load();
            for ach in achievements::all_achievements() {
                let mark = if record.has_achievement(ach.id) { "x" } else { " " };
                writeln!(out, "[{}] {:<6} {} - {}", mark, ach.badge, ach.name, ach.description)?;
            }
            let badges = achievements::format_badges(&record.achievements, 8);
            if !badges.is_empty() {
                writeln!(out, "Unlocked: {}", badges)?;
            }
        }
        Commands::History { limit } => {
            let log = ledger.history();
            let shown = limit.unwrap_or(log.len());
            for entry in log.entries.iter().take(shown) {
                writeln!(
                    out,
                    "{} {}  {:<8} {}",
                    entry.date, entry.time, entry.activity, entry.description
                )?;
            }
        }
        Commands::Log { activity, description } => {
            let log = ledger.record_history(&activity, &description);
            writeln!(out, "Recorded. {} entries in history", log.len())?;
        }
        Commands::Profile { name, email } => {
            let record = ledger.update_profile(&name, email.as_deref());
            let mut form = settings::load_settings(ledger.store());
            form.username = record.username.clone();
            form.email = record.email.clone().unwrap_or_default();
            if let Err(e) = settings::save_settings(ledger.store_mut(), &form) {
                warn!("Failed to save settings ({}): {}", e.kind(), e);
                code = 1;
            }
            writeln!(out, "Profile: {}", record.username)?;
        }
        Commands::DarkMode { state } => {
            if let Some(state) = state {
                if let Err(e) = settings::set_dark_mode(ledger.store_mut(), matches!(state, Toggle::On)) {
                    warn!("Failed to save dark mode ({}): {}", e.kind(), e);
                    code = 1;
                }
            }
            let on = settings::dark_mode(ledger.store());
            writeln!(out, "Dark mode: {}", if on { "on" } else { "off" })?;
        }
    }

    Ok((out, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_ledger::MemoryStore;

    fn ledger() -> ProgressLedger<MemoryStore> {
        ProgressLedger::new(MemoryStore::new())
    }

    #[test]
    fn test_status_fresh() {
        let mut ledger = ledger();
        let (out, code) = execute(&mut ledger, Commands::Status).unwrap();
        assert_eq!(code, 0);
        assert!(out.contains("游客 - Level 1"));
        assert!(out.contains("Points  1000"));
    }

    #[test]
    fn test_xp_reports_level_up() {
        let mut ledger = ledger();
        let (out, _) = execute(&mut ledger, Commands::Xp { amount: 2500 }).unwrap();
        assert!(out.contains("Level up! 1 -> 3 (+1000 points)"));
        assert!(out.contains("Level 3: 500/3000 XP"));
    }

    #[test]
    fn test_failed_spend_exit_code() {
        let mut ledger = ledger();
        let cmd = Commands::Points { action: PointsAction::Spend { amount: 5000 } };
        let (out, code) = execute(&mut ledger, cmd).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("Not enough points"));
    }

    #[test]
    fn test_unlock_twice() {
        let mut ledger = ledger();
        let (first, _) = execute(&mut ledger, Commands::Unlock { id: "time_60".into() }).unwrap();
        let (second, _) = execute(&mut ledger, Commands::Unlock { id: "time_60".into() }).unwrap();
        assert!(first.contains("Achievement unlocked"));
        assert!(second.contains("Already unlocked"));
    }

    #[test]
    fn test_achievements_check() {
        let mut ledger = ledger();
        ledger.add_learning_time(60);
        let (out, _) = execute(&mut ledger, Commands::Achievements { check: true }).unwrap();
        assert!(out.contains("专注一小时"));
        assert!(out.contains("Unlocked: ~1h~"));
    }

    #[test]
    fn test_history_limit() {
        let mut ledger = ledger();
        let (out, _) = execute(&mut ledger, Commands::History { limit: Some(2) }).unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_profile_updates_record_and_settings() {
        let mut ledger = ledger();
        let cmd = Commands::Profile {
            name: "Mei".into(),
            email: Some("mei@example.com".into()),
        };
        execute(&mut ledger, cmd).unwrap();
        assert_eq!(ledger.load().username, "Mei");
        assert_eq!(settings::load_settings(ledger.store()).email, "mei@example.com");
    }

    #[test]
    fn test_settings_write_failure_continues() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut ledger = ProgressLedger::new(store);

        let cmd = Commands::Profile {
            name: "Mei".into(),
            email: None,
        };
        let (out, code) = execute(&mut ledger, cmd).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("Profile: Mei"));
        assert_eq!(ledger.load().username, "Mei");

        let (out, code) = execute(&mut ledger, Commands::DarkMode { state: Some(Toggle::On) }).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("Dark mode: off"));
    }

    #[test]
    fn test_dark_mode_toggle() {
        let mut ledger = ledger();
        let (out, _) = execute(&mut ledger, Commands::DarkMode { state: Some(Toggle::On) }).unwrap();
        assert!(out.contains("Dark mode: on"));
        let (out, _) = execute(&mut ledger, Commands::DarkMode { state: None }).unwrap();
        assert!(out.contains("Dark mode: on"));
    }
}
