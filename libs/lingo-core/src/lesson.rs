//! Daily lesson flow: grammar, vocabulary, practice, conversation, summary.

use crate::chat::ChatSession;
use crate::content::{ExplanationPart, LessonPlan};
use crate::drill::{DrillMode, DrillSession, Feedback, FlashcardDeck, Question};
use crate::types::FillInBlanksItem;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionStep {
    Grammar,
    Vocabulary,
    Practice,
    Conversation,
    Summary,
}

impl SessionStep {
    pub const ALL: [SessionStep; 5] = [
        Self::Grammar,
        Self::Vocabulary,
        Self::Practice,
        Self::Conversation,
        Self::Summary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Grammar => "Grammar",
            Self::Vocabulary => "Vocabulary",
            Self::Practice => "Practice",
            Self::Conversation => "Conversation",
            Self::Summary => "Complete!",
        }
    }
}

/// Pick a lesson by topic.
///
/// A topic matches when either string contains the other, ignoring case.
/// Unknown topics fall back to the first lesson; no topic picks one at random.
pub fn find_lesson<'a, R: Rng + ?Sized>(
    lessons: &'a [LessonPlan],
    topic: Option<&str>,
    rng: &mut R,
) -> Option<&'a LessonPlan> {
    if lessons.is_empty() {
        return None;
    }
    match topic {
        Some(topic) => {
            let wanted = topic.to_lowercase();
            lessons
                .iter()
                .find(|lesson| {
                    let name = lesson.grammar_topic.to_lowercase();
                    name.contains(&wanted) || wanted.contains(&name)
                })
                .or_else(|| lessons.first())
        }
        None => lessons.get(rng.gen_range(0..lessons.len())),
    }
}

/// Single quiz question embedded in an explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPrompt {
    pub question: String,
    pub options: Vec<String>,
    answer: String,
    selected: Option<String>,
    feedback: Option<Feedback>,
}

impl QuizPrompt {
    pub fn from_part(part: &ExplanationPart) -> Option<Self> {
        match part {
            ExplanationPart::Quiz {
                question,
                options,
                answer,
            } => Some(Self {
                question: question.clone(),
                options: options.clone(),
                answer: answer.clone(),
                selected: None,
                feedback: None,
            }),
            _ => None,
        }
    }

    /// First choice wins; later calls return the recorded feedback.
    pub fn choose(&mut self, option: &str) -> Feedback {
        if let Some(feedback) = self.feedback {
            return feedback;
        }
        let feedback = Feedback::judge(option, &self.answer);
        self.selected = Some(option.to_string());
        self.feedback = Some(feedback);
        feedback
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// The answer is revealed only after a choice.
    pub fn revealed_answer(&self) -> Option<&str> {
        self.feedback.map(|_| self.answer.as_str())
    }
}

impl Question for QuizPrompt {
    fn correct_answer(&self) -> &str {
        &self.answer
    }
}

/// Progress through one lesson plan.
#[derive(Debug, Clone)]
pub struct DailyLesson {
    plan: LessonPlan,
    step: SessionStep,
    vocab_completed: bool,
    quizzes: Vec<QuizPrompt>,
}

impl DailyLesson {
    pub fn new(plan: LessonPlan) -> Self {
        let quizzes = plan.quizzes().filter_map(QuizPrompt::from_part).collect();
        Self {
            plan,
            step: SessionStep::Grammar,
            vocab_completed: false,
            quizzes,
        }
    }

    pub fn plan(&self) -> &LessonPlan {
        &self.plan
    }

    pub fn step(&self) -> SessionStep {
        self.step
    }

    pub fn quizzes(&self) -> &[QuizPrompt] {
        &self.quizzes
    }

    pub fn quiz_mut(&mut self, index: usize) -> Option<&mut QuizPrompt> {
        self.quizzes.get_mut(index)
    }

    pub fn vocab_completed(&self) -> bool {
        self.vocab_completed
    }

    /// Flashcards for the vocabulary step.
    pub fn vocabulary_deck<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<FlashcardDeck> {
        FlashcardDeck::start(self.plan.vocabulary.clone(), rng, || {})
    }

    /// One embedded pass over the lesson's fill-in-the-blank items.
    pub fn practice_drill<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<DrillSession<FillInBlanksItem>> {
        DrillSession::start(self.plan.fill_in_blanks.clone(), None, DrillMode::Embedded, rng)
    }

    /// Record that every word was browsed. Returns true the first time.
    pub fn complete_vocabulary(&mut self) -> bool {
        if self.vocab_completed {
            return false;
        }
        self.vocab_completed = true;
        true
    }

    /// Move from grammar to vocabulary, or from vocabulary to practice once
    /// the words were browsed. Returns whether the step changed.
    pub fn next_step(&mut self) -> bool {
        let next = match self.step {
            SessionStep::Grammar => SessionStep::Vocabulary,
            SessionStep::Vocabulary if self.vocab_completed => SessionStep::Practice,
            _ => return false,
        };
        self.step = next;
        true
    }

    /// The practice drill finished; go to the conversation step.
    pub fn complete_practice(&mut self) {
        if self.step == SessionStep::Practice {
            self.step = SessionStep::Conversation;
        }
    }

    /// Conversation seeded with the lesson's opening prompt.
    pub fn conversation(&self, goal: usize) -> ChatSession {
        ChatSession::with_opening_prompt(goal, self.plan.conversation_prompt.clone())
    }

    /// Wrap up from the conversation step. `on_finished` runs on the
    /// transition to the summary.
    pub fn finish<F: FnOnce()>(&mut self, on_finished: F) -> bool {
        if self.step != SessionStep::Conversation {
            return false;
        }
        self.step = SessionStep::Summary;
        tracing::info!(topic = %self.plan.grammar_topic, "daily lesson finished");
        on_finished();
        true
    }

    /// Review the lesson from the top.
    pub fn restart(&mut self) {
        self.step = SessionStep::Grammar;
    }
}
