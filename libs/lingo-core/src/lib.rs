//! Core practice engine shared by the host application and its adapters.
//!
//! Provides:
//! - Spaced repetition scheduling (simplified SM-2) and review sessions
//! - Nonogram clue derivation and win checking
//! - Shuffled drill sessions with idempotent scoring
//! - Lesson content validation and the daily lesson flow
//! - Pronunciation and conversation practice over injected capabilities
//! - Progress tracking over a key-value storage port and an event bus

pub mod algorithm;
pub mod chat;
pub mod content;
pub mod drill;
pub mod error;
pub mod events;
pub mod lesson;
pub mod matching;
pub mod progress;
pub mod puzzle;
pub mod review;
pub mod shuffle;
pub mod speech;
pub mod storage;
pub mod types;

pub use algorithm::{ReviewAlgorithm, SchedulingResult};
pub use chat::{send_message, ChatSession, LanguageModel, CONNECTION_ERROR_MESSAGE};
pub use content::{ExplanationPart, LessonPlan};
pub use drill::{Advance, DrillMode, DrillSession, Feedback, FlashcardDeck, Question, VisitTracker};
pub use error::{ChatError, ContentError, PuzzleError, Result, SpeechError, StorageError};
pub use events::{EventBus, ProgressEvent, ProgressListener};
pub use lesson::{find_lesson, DailyLesson, SessionStep};
pub use progress::{DailyLog, ProgressKind, ProgressStats, ProgressTracker};
pub use puzzle::{derive_clues, is_solved, toggle_cell, CellState, PlayerGrid, Puzzle, PuzzleBoard};
pub use review::ReviewRun;
pub use storage::{KeyValueStore, MemoryStore};
pub use types::{
    Category, ChatMessage, Difficulty, FillInBlanksItem, PracticeOverrides, PracticeSettings,
    ReviewItem, Role, VocabularyItem, WordPair,
};
