//! Stats summary for the profile page.

use serde::Serialize;

use crate::record::ProgressRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub username: String,
    pub level: u32,
    pub experience: u64,
    pub threshold: u64,
    /// Percent toward next level (0-100)
    pub progress: u8,
    pub points: u64,
    pub words_learned: u64,
    pub correct_answers: u64,
    pub learning_time_minutes: u64,
    pub achievement_count: usize,
}

impl StatsSummary {
    pub fn from_record(record: &ProgressRecord) -> Self {
        Self {
            username: record.username.clone(),
            level: record.level,
            experience: record.experience,
            threshold: record.threshold(),
            progress: record.level_progress(),
            points: record.points,
            words_learned: record.words_learned,
            correct_answers: record.correct_answers,
            learning_time_minutes: record.learning_time,
            achievement_count: record.achievements.len(),
        }
    }

    /// Learning time as "Xh Ym"
    pub fn learning_time_display(&self) -> String {
        format_minutes(self.learning_time_minutes)
    }

    /// Text progress bar of `width` cells
    pub fn progress_bar(&self, width: usize) -> String {
        let filled = (self.progress as usize * width) / 100;
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

pub fn format_minutes(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_record() {
        let record = ProgressRecord {
            level: 2,
            experience: 500,
            learning_time: 65,
            achievements: vec!["first_word".into()],
            ..Default::default()
        };
        let stats = StatsSummary::from_record(&record);
        assert_eq!(stats.threshold, 2000);
        assert_eq!(stats.progress, 25);
        assert_eq!(stats.achievement_count, 1);
        assert_eq!(stats.learning_time_display(), "1h 5m");
    }

    #[test]
    fn test_progress_bar() {
        let record = ProgressRecord {
            experience: 500,
            ..Default::default()
        };
        let stats = StatsSummary::from_record(&record);
        assert_eq!(stats.progress_bar(10), "[#####-----]");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0h 0m");
        assert_eq!(format_minutes(120), "2h 0m");
    }
}
