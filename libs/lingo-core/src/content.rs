//! Lesson content model and loading.
//!
//! Lesson plans come either from bundled JSON or from a language model reply.
//! Model replies may wrap the JSON in prose and leave trailing commas, so
//! [`LessonPlan::from_model_text`] extracts the outermost object and cleans it
//! before parsing. Explanation parts are validated once here; a malformed part
//! is logged and dropped instead of failing the whole plan.

use crate::error::ContentError;
use crate::types::{FillInBlanksItem, VocabularyItem};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One block of a grammar explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExplanationPart {
    Text {
        content: String,
    },
    Example {
        english: String,
        turkish: String,
    },
    Quiz {
        question: String,
        options: Vec<String>,
        answer: String,
    },
}

fn string_field(value: &Value, part: &'static str, field: &'static str) -> crate::Result<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ContentError::MissingField { part, field })
}

impl ExplanationPart {
    /// Validate a raw part.
    pub fn from_value(value: &Value) -> crate::Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ContentError::MissingField {
                part: "explanation",
                field: "type",
            })?;

        match kind {
            "text" => Ok(Self::Text {
                content: string_field(value, "text", "content")?,
            }),
            "example" => Ok(Self::Example {
                english: string_field(value, "example", "english")?,
                turkish: string_field(value, "example", "turkish")?,
            }),
            "quiz" => {
                let question = string_field(value, "quiz", "question")?;
                let answer = string_field(value, "quiz", "answer")?;
                let options: Vec<String> = value
                    .get("options")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|o| o.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                if options.is_empty() {
                    return Err(ContentError::MissingField {
                        part: "quiz",
                        field: "options",
                    });
                }
                if !options.contains(&answer) {
                    return Err(ContentError::AnswerNotInOptions { answer });
                }
                Ok(Self::Quiz {
                    question,
                    options,
                    answer,
                })
            }
            other => Err(ContentError::UnknownPart(other.to_string())),
        }
    }
}

/// Validate every part, dropping the malformed ones.
pub fn parse_parts(values: &[Value]) -> Vec<ExplanationPart> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match ExplanationPart::from_value(value) {
            Ok(part) => Some(part),
            Err(e) => {
                tracing::warn!(index = index, error = %e, "skipping malformed explanation part");
                None
            }
        })
        .collect()
}

fn lenient_parts<'de, D>(deserializer: D) -> std::result::Result<Vec<ExplanationPart>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(parse_parts(&raw))
}

fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed lesson entry");
                None
            }
        })
        .collect())
}

/// A full daily lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub grammar_topic: String,
    /// Short themed introduction.
    pub explanation: String,
    #[serde(deserialize_with = "lenient_parts")]
    pub detailed_explanation: Vec<ExplanationPart>,
    #[serde(deserialize_with = "lenient_list")]
    pub vocabulary: Vec<VocabularyItem>,
    #[serde(deserialize_with = "lenient_list")]
    pub fill_in_blanks: Vec<FillInBlanksItem>,
    /// Opening line for the follow-up conversation.
    pub conversation_prompt: String,
    pub summary: String,
}

impl LessonPlan {
    /// Parse a plan from clean JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let plan: Self = serde_json::from_str(json)?;
        plan.require_explanation()
    }

    fn require_explanation(self) -> crate::Result<Self> {
        if self.detailed_explanation.is_empty() {
            return Err(ContentError::EmptyExplanation);
        }
        Ok(self)
    }

    /// Parse a plan from a model reply that may contain surrounding prose
    /// and trailing commas.
    pub fn from_model_text(text: &str) -> crate::Result<Self> {
        let object = extract_json_object(text).ok_or(ContentError::NoJsonObject)?;
        Self::from_json(&strip_trailing_commas(object))
    }

    /// Quiz parts in order of appearance.
    pub fn quizzes(&self) -> impl Iterator<Item = &ExplanationPart> {
        self.detailed_explanation
            .iter()
            .filter(|part| matches!(part, ExplanationPart::Quiz { .. }))
    }
}

/// Load a bundled list of lessons. A lesson that fails to parse is skipped.
pub fn load_lessons(json: &str) -> crate::Result<Vec<LessonPlan>> {
    let raw: Vec<Value> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let topic = value
                .get("grammarTopic")
                .and_then(Value::as_str)
                .unwrap_or("?")
                .to_string();
            let parsed = serde_json::from_value::<LessonPlan>(value)
                .map_err(ContentError::from)
                .and_then(LessonPlan::require_explanation);
            match parsed {
                Ok(plan) => Some(plan),
                Err(e) => {
                    tracing::warn!(index = index, topic = %topic, error = %e, "skipping malformed lesson");
                    None
                }
            }
        })
        .collect())
}

/// The span from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Remove commas that directly precede `]` or `}` (ignoring whitespace),
/// leaving string contents alone.
pub fn strip_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let closes = chars[i + 1..]
                    .iter()
                    .find(|n| !n.is_whitespace())
                    .is_some_and(|n| *n == ']' || *n == '}');
                if !closes {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PLAN: &str = r#"{
        "grammarTopic": "Present Simple Tense",
        "explanation": "Steady as the trade winds.",
        "detailedExplanation": [
            {"type": "text", "content": "Habits and facts."},
            {"type": "example", "english": "We import frames.", "turkish": "Çerçeve ithal ediyoruz."},
            {"type": "quiz", "question": "Pick one", "options": ["meet", "meets"], "answer": "meets"},
            {"type": "example", "english": "Missing translation"},
            {"type": "video", "url": "x"}
        ],
        "vocabulary": [
            {"english": "Import", "turkish": "İthal etmek", "category": "Business"},
            {"english": "Kraken", "turkish": "Kraken", "category": "Mythology"}
        ],
        "fillInBlanks": [
            {"sentence": "We ___ business.", "turkish": "___ yapıyoruz.", "blank": "do", "options": ["do", "does"]}
        ],
        "conversationPrompt": "Tell me about your suppliers.",
        "summary": "Well sailed!"
    }"#;

    #[test]
    fn malformed_parts_are_skipped() {
        let plan = LessonPlan::from_json(PLAN).unwrap();
        assert_eq!(plan.detailed_explanation.len(), 3);
        assert_eq!(plan.quizzes().count(), 1);
        assert_eq!(
            plan.vocabulary,
            vec![VocabularyItem::new("Import", "İthal etmek", Category::Business)]
        );
        assert_eq!(plan.fill_in_blanks.len(), 1);
    }

    #[test]
    fn part_validation_errors() {
        assert!(matches!(
            ExplanationPart::from_value(&json!({"content": "no tag"})),
            Err(ContentError::MissingField { field: "type", .. })
        ));
        assert!(matches!(
            ExplanationPart::from_value(&json!({"type": "quiz", "question": "q", "options": ["a"], "answer": "b"})),
            Err(ContentError::AnswerNotInOptions { .. })
        ));
        assert!(matches!(
            ExplanationPart::from_value(&json!({"type": "quiz", "question": "q", "answer": "b"})),
            Err(ContentError::MissingField { field: "options", .. })
        ));
        assert!(matches!(
            ExplanationPart::from_value(&json!({"type": "poll"})),
            Err(ContentError::UnknownPart(kind)) if kind == "poll"
        ));
    }

    #[test]
    fn model_text_with_prose_and_trailing_commas() {
        let text = format!(
            "Ahoy! Here be your lesson:\n```json\n{}\n```\nFair winds!",
            PLAN.replace("\"Well sailed!\"", "\"Well sailed!\",")
                .replace("\"meets\"]", "\"meets\",]")
        );
        let plan = LessonPlan::from_model_text(&text).unwrap();
        assert_eq!(plan.grammar_topic, "Present Simple Tense");
        assert_eq!(plan.summary, "Well sailed!");
    }

    #[test]
    fn no_object_in_reply() {
        assert!(matches!(
            LessonPlan::from_model_text("The sea took the lesson."),
            Err(ContentError::NoJsonObject)
        ));
    }

    #[test]
    fn trailing_commas_inside_strings_are_kept() {
        assert_eq!(
            strip_trailing_commas(r#"{"a": "x, }", "b": [1, 2, ], }"#),
            r#"{"a": "x, }", "b": [1, 2 ] }"#
        );
        assert_eq!(
            strip_trailing_commas(r#"{"q": "say \"hi\",]"}"#),
            r#"{"q": "say \"hi\",]"}"#
        );
    }

    #[test]
    fn lessons_list_skips_broken_lessons() {
        let list = format!(r#"[{PLAN}, {{"grammarTopic": "Broken"}}]"#);
        let lessons = load_lessons(&list).unwrap();
        assert_eq!(lessons.len(), 1);
    }

    #[test]
    fn parts_serialize_with_type_tag() {
        let part = ExplanationPart::Example {
            english: "Hi".into(),
            turkish: "Merhaba".into(),
        };
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({"type": "example", "english": "Hi", "turkish": "Merhaba"})
        );
    }
}
