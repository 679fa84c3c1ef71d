use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::AchievementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub rarity: Rarity,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub progress: Option<u32>,
    pub max_progress: Option<u32>,
}

impl Achievement {
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Band a level falls into; the dashboard picks badge styling from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LevelTier {
    Novice,
    Adept,
    Expert,
    Master,
}

impl LevelTier {
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        match level {
            50.. => LevelTier::Master,
            20..=49 => LevelTier::Expert,
            10..=19 => LevelTier::Adept,
            _ => LevelTier::Novice,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub total_goals_completed: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_sessions_completed: u32,
    pub achievements: Vec<Achievement>,
}

impl UserStats {
    #[must_use]
    pub fn tier(&self) -> LevelTier {
        LevelTier::for_level(self.level)
    }

    #[must_use]
    pub fn unlocked_achievements(&self) -> usize {
        self.achievements.iter().filter(|a| a.is_unlocked()).count()
    }

    /// Share of the current level already earned, in percent.
    #[must_use]
    pub fn level_progress_percent(&self) -> f64 {
        crate::metrics::level_progress_percent(self.experience, self.experience_to_next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn tiers_follow_level_bands() {
        assert_eq!(LevelTier::for_level(1), LevelTier::Novice);
        assert_eq!(LevelTier::for_level(10), LevelTier::Adept);
        assert_eq!(LevelTier::for_level(19), LevelTier::Adept);
        assert_eq!(LevelTier::for_level(20), LevelTier::Expert);
        assert_eq!(LevelTier::for_level(50), LevelTier::Master);
    }

    #[test]
    fn counts_unlocked_achievements() {
        let badge = |id: u64, unlocked: bool| Achievement {
            id: AchievementId::new(id),
            title: format!("Badge {id}"),
            description: String::new(),
            rarity: Rarity::Common,
            unlocked_at: unlocked.then(fixed_now),
            progress: None,
            max_progress: None,
        };
        let stats = UserStats {
            level: 12,
            experience: 2450,
            experience_to_next: 550,
            total_goals_completed: 3,
            current_streak: 7,
            longest_streak: 15,
            total_sessions_completed: 24,
            achievements: vec![badge(1, true), badge(2, false), badge(3, true)],
        };
        assert_eq!(stats.unlocked_achievements(), 2);
        assert_eq!(stats.tier(), LevelTier::Adept);
        assert!((stats.level_progress_percent() - 81.666_666).abs() < 1e-3);
    }
}
