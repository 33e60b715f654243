//! Test data.

use chrono::NaiveDate;
use lingo_core::{Category, VocabularyItem};

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn vocabulary() -> Vec<VocabularyItem> {
    vec![
        VocabularyItem::new("Frame", "Çerçeve", Category::Eyewear),
        VocabularyItem::new("Invoice", "Fatura", Category::Business),
        VocabularyItem::new("Anchor", "Çapa", Category::Sailboats),
    ]
}

pub const LESSON_JSON: &str = r#"[
    {
        "grammarTopic": "Present Simple Tense",
        "explanation": "Steady as the trade winds.",
        "detailedExplanation": [
            {"type": "text", "content": "Habits and facts."},
            {"type": "quiz", "question": "She ___ clients.", "options": ["meet", "meets"], "answer": "meets"}
        ],
        "vocabulary": [
            {"english": "Lens", "turkish": "Mercek", "category": "Eyewear"}
        ],
        "fillInBlanks": [
            {"sentence": "We ___ business.", "turkish": "İş yapıyoruz.", "blank": "do", "options": ["do", "does"]}
        ],
        "conversationPrompt": "Ahoy! What do ye sell at the fair?",
        "summary": "Well sailed!"
    },
    {
        "grammarTopic": "Broken",
        "explanation": "No parts at all.",
        "detailedExplanation": []
    }
]"#;
