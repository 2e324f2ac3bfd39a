//! Progress record: experience, levels, points and achievements.
//!
//! Stored under `userData` with camelCase field names. Every field has a
//! serde default so partial records from older pages still load.

use serde::{Deserialize, Serialize};

/// Experience needed per level: `level * LEVEL_STEP`
pub const LEVEL_STEP: u64 = 1000;
/// Points awarded for each level gained
pub const LEVEL_UP_BONUS: u64 = 500;
/// Starting points balance
pub const STARTING_POINTS: u64 = 1000;
/// Display name when none was set
pub const GUEST_NAME: &str = "游客";

/// Experience threshold at which `level` levels up
pub fn level_threshold(level: u32) -> u64 {
    u64::from(level).saturating_mul(LEVEL_STEP)
}

/// The persisted learning-progress record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u64,
    #[serde(default = "default_points")]
    pub points: u64,
    #[serde(default)]
    pub words_learned: u64,
    #[serde(default)]
    pub correct_answers: u64,
    /// Minutes
    #[serde(default)]
    pub learning_time: u64,
    #[serde(default)]
    pub achievements: Vec<String>,
}

fn default_username() -> String {
    GUEST_NAME.to_string()
}

fn default_level() -> u32 {
    1
}

fn default_points() -> u64 {
    STARTING_POINTS
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            username: default_username(),
            email: None,
            level: default_level(),
            experience: 0,
            points: default_points(),
            words_learned: 0,
            correct_answers: 0,
            learning_time: 0,
            achievements: Vec::new(),
        }
    }
}

/// Result of adding experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
    pub bonus_points: u64,
}

impl LevelUp {
    pub fn levels_gained(&self) -> u32 {
        self.to - self.from
    }

    pub fn leveled_up(&self) -> bool {
        self.to > self.from
    }
}

impl ProgressRecord {
    /// Repair values a hand-edited or older record may carry.
    /// Level 0 becomes 1 and duplicate achievement ids are dropped.
    pub fn normalize(&mut self) {
        if self.level == 0 {
            self.level = 1;
        }
        let mut seen = std::collections::HashSet::new();
        self.achievements.retain(|id| seen.insert(id.clone()));
    }

    pub fn threshold(&self) -> u64 {
        level_threshold(self.level)
    }

    /// Add experience and level up as many times as the amount covers.
    ///
    /// Every level gained within one call costs the threshold of the level
    /// the call started at, so `level=1, experience=0` plus 2500 lands on
    /// level 3 with 500 left over. The remainder is always below the
    /// starting threshold, hence below the new level's threshold too.
    pub fn gain_experience(&mut self, amount: u64) -> LevelUp {
        self.level = self.level.max(1);
        let from = self.level;
        let step = self.threshold();
        self.experience = self.experience.saturating_add(amount);

        let headroom = u64::from(u32::MAX - self.level);
        let levels = (self.experience / step).min(headroom);
        self.experience -= levels * step;
        self.level += levels as u32;

        let bonus = levels.saturating_mul(LEVEL_UP_BONUS);
        self.points = self.points.saturating_add(bonus);

        LevelUp {
            from,
            to: self.level,
            bonus_points: bonus,
        }
    }

    /// Percent of the way to the next level (0-100)
    pub fn level_progress(&self) -> u8 {
        let threshold = self.threshold();
        if threshold == 0 {
            return 0;
        }
        ((self.experience.min(threshold) * 100) / threshold) as u8
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    /// Insert an achievement id. Returns false if it was already present.
    pub fn unlock(&mut self, id: &str) -> bool {
        if self.has_achievement(id) {
            return false;
        }
        self.achievements.push(id.to_string());
        true
    }
}
