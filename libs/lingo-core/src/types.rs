//! Core types for the practice application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic tag attached to every vocabulary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Eyewear,
    Business,
    Marine,
    Diving,
    Sailboats,
    #[serde(rename = "AI & Tech")]
    AiTech,
    #[serde(rename = "Global News")]
    GlobalNews,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Self::Eyewear,
        Self::Business,
        Self::Sailboats,
        Self::Diving,
        Self::Marine,
        Self::AiTech,
        Self::GlobalNews,
    ];

    /// Get the category label as shown to the learner.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eyewear => "Eyewear",
            Self::Business => "Business",
            Self::Marine => "Marine",
            Self::Diving => "Diving",
            Self::Sailboats => "Sailboats",
            Self::AiTech => "AI & Tech",
            Self::GlobalNews => "Global News",
        }
    }

    /// Parse from label.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A vocabulary entry from static or generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub english: String,
    pub turkish: String,
    pub category: Category,
}

impl VocabularyItem {
    pub fn new(english: impl Into<String>, turkish: impl Into<String>, category: Category) -> Self {
        Self {
            english: english.into(),
            turkish: turkish.into(),
            category,
        }
    }
}

/// Self-reported recall difficulty for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    /// Anything but a failed recall counts as correct in session stats.
    pub fn is_recalled(self) -> bool {
        !matches!(self, Self::Hard)
    }
}

/// Spaced repetition record for one vocabulary entry.
///
/// Serialized in the same camelCase shape the browser store used, with the
/// eligibility instant as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// Stable identity: the English display text.
    pub id: String,
    pub english: String,
    pub turkish: String,
    pub category: Category,
    pub difficulty: Difficulty,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review: DateTime<Utc>,
    /// Current interval in days, always within `[1, max_interval_days]`.
    pub interval: u32,
    pub repetitions: u32,
}

impl ReviewItem {
    /// Whether the item is eligible for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

/// Fill-in-the-blank exercise. The sentence marks the gap with `___`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillInBlanksItem {
    pub sentence: String,
    pub turkish: String,
    pub blank: String,
    pub options: Vec<String>,
}

impl FillInBlanksItem {
    /// Sentence fragments around each `___` gap.
    pub fn fragments(&self) -> Vec<&str> {
        self.sentence.split("___").collect()
    }
}

/// Word pair unlocked by solving a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub english: String,
    pub turkish: String,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Longest review interval, in days.
pub const MAX_INTERVAL_DAYS: u32 = 30;

/// Largest review session.
pub const MAX_SESSION_SIZE: usize = 8;

/// Practice tuning, persisted alongside progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeSettings {
    /// Upper bound on the size of a review session.
    pub review_session_cap: usize,
    /// Chance that a not-yet-due item is pulled into a session.
    pub variety_probability: f64,
    pub max_interval_days: u32,
    /// User messages needed before a conversation counts as practice.
    pub conversation_goal: usize,
    /// Distinct correctly pronounced words needed before pronunciation counts.
    pub pronunciation_goal: usize,
    pub weekly_goal: u32,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            review_session_cap: 8,
            variety_probability: 0.2,
            max_interval_days: 30,
            conversation_goal: 3,
            pronunciation_goal: 5,
            weekly_goal: 3,
        }
    }
}

/// Stored overrides (all fields optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_session_cap: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_interval_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_goal: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation_goal: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_goal: Option<u32>,
}

impl PracticeSettings {
    /// Merge stored overrides over the defaults.
    ///
    /// Out-of-range values fall back to the default. The interval and the
    /// session size are clamped to [`MAX_INTERVAL_DAYS`] and
    /// [`MAX_SESSION_SIZE`].
    pub fn merge(base: &PracticeSettings, overrides: &PracticeOverrides) -> Self {
        let probability = overrides
            .variety_probability
            .filter(|p| (0.0..=1.0).contains(p))
            .unwrap_or(base.variety_probability);

        Self {
            review_session_cap: overrides
                .review_session_cap
                .unwrap_or(base.review_session_cap)
                .min(MAX_SESSION_SIZE),
            variety_probability: probability,
            max_interval_days: overrides
                .max_interval_days
                .filter(|d| *d >= 1)
                .unwrap_or(base.max_interval_days)
                .clamp(1, MAX_INTERVAL_DAYS),
            conversation_goal: overrides.conversation_goal.unwrap_or(base.conversation_goal),
            pronunciation_goal: overrides.pronunciation_goal.unwrap_or(base.pronunciation_goal),
            weekly_goal: overrides.weekly_goal.filter(|g| *g >= 1).unwrap_or(base.weekly_goal),
        }
    }
}
