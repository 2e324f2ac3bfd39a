//! Achievement catalog for the learning site.
//!
//! The ledger stores unlocked ids only. This catalog gives the notification
//! toast and the profile page something to render for each id, and offers
//! `eligible` for callers that want the stock unlock conditions.

use crate::record::ProgressRecord;
use serde::Serialize;

/// Achievement badge with ASCII symbol and description
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Achievement {
    /// Unique identifier, as stored in `ProgressRecord::achievements`
    pub id: &'static str,
    /// ASCII badge symbol (e.g., "[1]", "<L5>")
    pub badge: &'static str,
    /// Short name
    pub name: &'static str,
    /// Description of how to earn it
    pub description: &'static str,
}

impl Achievement {
    const fn new(id: &'static str, badge: &'static str, name: &'static str, desc: &'static str) -> Self {
        Self { id, badge, name, description: desc }
    }
}

/// All available achievements
pub fn all_achievements() -> Vec<Achievement> {
    vec![
        // Vocabulary
        Achievement::new("first_word", "[1]", "初次学习", "学习第一个单词"),
        Achievement::new("words_100", "[100]", "词汇新星", "累计学习100个单词"),
        Achievement::new("words_500", "[500]", "词汇达人", "累计学习500个单词"),

        // Accuracy
        Achievement::new("correct_10", "(10)", "小试牛刀", "累计答对10题"),
        Achievement::new("correct_100", "(100)", "百发百中", "累计答对100题"),

        // Time on task
        Achievement::new("time_60", "~1h~", "专注一小时", "累计学习60分钟"),
        Achievement::new("time_600", "~10h~", "学海无涯", "累计学习600分钟"),

        // Levels
        Achievement::new("level_5", "<L5>", "渐入佳境", "达到5级"),
        Achievement::new("level_10", "<L10>", "英语高手", "达到10级"),

        // Points
        Achievement::new("points_5000", "{5k}", "积分富翁", "积分达到5000"),
    ]
}

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<Achievement> {
    all_achievements().into_iter().find(|a| a.id == id)
}

/// Catalog achievements whose condition the record satisfies and which it
/// has not unlocked yet
pub fn eligible(record: &ProgressRecord) -> Vec<Achievement> {
    all_achievements()
        .into_iter()
        .filter(|a| !record.has_achievement(a.id) && is_satisfied(a.id, record))
        .collect()
}

fn is_satisfied(id: &str, record: &ProgressRecord) -> bool {
    match id {
        "first_word" => record.words_learned >= 1,
        "words_100" => record.words_learned >= 100,
        "words_500" => record.words_learned >= 500,

        "correct_10" => record.correct_answers >= 10,
        "correct_100" => record.correct_answers >= 100,

        "time_60" => record.learning_time >= 60,
        "time_600" => record.learning_time >= 600,

        "level_5" => record.level >= 5,
        "level_10" => record.level >= 10,

        "points_5000" => record.points >= 5000,

        _ => false,
    }
}

/// Badge strip for unlocked ids. Ids missing from the catalog show as `[?]`.
pub fn format_badges(ids: &[String], max_display: usize) -> String {
    if ids.is_empty() {
        return String::new();
    }

    let badges: Vec<&str> = ids
        .iter()
        .take(max_display)
        .map(|id| find(id).map(|a| a.badge).unwrap_or("[?]"))
        .collect();
    let badges = badges.join(" ");

    if ids.len() > max_display {
        format!("{} +{} more", badges, ids.len() - max_display)
    } else {
        badges
    }
}

/// Toast text for a newly unlocked achievement
pub fn format_unlock(id: &str) -> String {
    match find(id) {
        Some(ach) => format!("{} Achievement unlocked: {} - {}", ach.badge, ach.name, ach.description),
        None => format!("[?] Achievement unlocked: {}", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        let all = all_achievements();
        let mut ids: Vec<_> = all.iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all.len());
    }

    #[test]
    fn test_every_catalog_entry_has_condition() {
        let maxed = ProgressRecord {
            level: 99,
            points: 99_999,
            words_learned: 9_999,
            correct_answers: 9_999,
            learning_time: 9_999,
            ..Default::default()
        };
        assert_eq!(eligible(&maxed).len(), all_achievements().len());
    }

    #[test]
    fn test_eligible_skips_unlocked() {
        let mut record = ProgressRecord {
            words_learned: 1,
            ..Default::default()
        };
        assert!(eligible(&record).iter().any(|a| a.id == "first_word"));

        record.unlock("first_word");
        assert!(eligible(&record).is_empty());
    }

    #[test]
    fn test_fresh_record_has_nothing_eligible() {
        assert!(eligible(&ProgressRecord::default()).is_empty());
    }

    #[test]
    fn test_format_badges() {
        let ids = vec!["first_word".to_string(), "level_5".to_string(), "custom".to_string()];
        assert_eq!(format_badges(&ids, 5), "[1] <L5> [?]");
        assert_eq!(format_badges(&ids, 1), "[1] +2 more");
        assert_eq!(format_badges(&[], 3), "");
    }

    #[test]
    fn test_format_unlock() {
        assert!(format_unlock("time_60").contains("专注一小时"));
        assert!(format_unlock("mystery").contains("mystery"));
    }
}
