//! Speech capabilities and the pronunciation trainer.
//!
//! Recognition and synthesis engines live outside the core. They are injected
//! through [`SpeechCapture`] and [`Speaker`]; the session only tracks which
//! word is being attempted and scores transcripts with
//! [`crate::matching::compare_pronunciation`].

use crate::error::SpeechError;
use crate::matching::{compare_pronunciation, PronunciationResult};
use std::collections::{HashMap, HashSet};

/// Language requested from speech engines.
pub const SPEECH_LANG: &str = "en-US";
/// Playback rate for model pronunciations.
pub const SPEECH_RATE: f32 = 0.9;

/// Single-shot speech recognizer. Results arrive later through
/// [`PronunciationSession::on_result`] and friends.
pub trait SpeechCapture {
    fn start(&mut self, lang: &str) -> Result<(), SpeechError>;
    fn stop(&mut self);
}

/// Text-to-speech output.
pub trait Speaker {
    fn speak(&self, text: &str, lang: &str, rate: f32) -> Result<(), SpeechError>;
}

/// Play a word with the trainer's voice settings.
pub fn pronounce<S: Speaker + ?Sized>(speaker: &S, text: &str) -> Result<(), SpeechError> {
    speaker.speak(text, SPEECH_LANG, SPEECH_RATE)
}

/// Pronunciation practice over one capture device.
#[derive(Debug)]
pub struct PronunciationSession<C> {
    capture: C,
    listening: bool,
    target: Option<String>,
    feedback: HashMap<String, bool>,
    practiced: HashSet<String>,
    goal: usize,
    goal_reached: bool,
}

impl<C: SpeechCapture> PronunciationSession<C> {
    /// `goal` distinct correct words count as a day's practice.
    pub fn new(capture: C, goal: usize) -> Self {
        Self {
            capture,
            listening: false,
            target: None,
            feedback: HashMap::new(),
            practiced: HashSet::new(),
            goal,
            goal_reached: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Last verdict for a word, `None` if untried or being retried.
    pub fn feedback(&self, word: &str) -> Option<bool> {
        self.feedback.get(word).copied()
    }

    pub fn practiced_count(&self) -> usize {
        self.practiced.len()
    }

    /// Start listening for `word`. Only one capture may be active.
    pub fn listen(&mut self, word: &str) -> Result<(), SpeechError> {
        if self.listening {
            let current = self.target.clone().unwrap_or_default();
            return Err(SpeechError::AlreadyListening(current));
        }
        self.capture.start(SPEECH_LANG)?;
        self.feedback.remove(word);
        self.target = Some(word.to_string());
        self.listening = true;
        Ok(())
    }

    /// Score a transcript against the active word. `on_practiced` runs once,
    /// when the goal of distinct correct words is first reached.
    pub fn on_result<F: FnOnce()>(
        &mut self,
        transcript: &str,
        on_practiced: F,
    ) -> Option<PronunciationResult> {
        let target = self.target.take()?;
        let result = compare_pronunciation(transcript, &target);
        tracing::debug!(word = %target, correct = result.is_correct, "pronunciation attempt");

        self.feedback.insert(target.clone(), result.is_correct);
        if result.is_correct {
            self.practiced.insert(target);
            if !self.goal_reached && self.practiced.len() >= self.goal {
                self.goal_reached = true;
                on_practiced();
            }
        }
        Some(result)
    }

    /// Capture failed: drop the attempt, keep earlier results.
    pub fn on_error(&mut self, error: &SpeechError) {
        tracing::warn!(error = %error, "speech recognition error");
        self.listening = false;
        self.target = None;
    }

    /// Capture device released.
    pub fn on_end(&mut self) {
        self.listening = false;
    }

    pub fn stop(&mut self) {
        if self.listening {
            self.capture.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeMic {
        starts: usize,
        stops: usize,
        broken: bool,
    }

    impl SpeechCapture for FakeMic {
        fn start(&mut self, lang: &str) -> Result<(), SpeechError> {
            assert_eq!(lang, "en-US");
            if self.broken {
                return Err(SpeechError::Unavailable);
            }
            self.starts += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn attempt(session: &mut PronunciationSession<FakeMic>, word: &str, heard: &str, fired: &Cell<u32>) {
        session.listen(word).unwrap();
        session.on_result(heard, || fired.set(fired.get() + 1));
        session.on_end();
    }

    #[test]
    fn rejects_second_capture() {
        let mut session = PronunciationSession::new(FakeMic::default(), 5);
        session.listen("Anchor").unwrap();
        assert_eq!(
            session.listen("Harbor"),
            Err(SpeechError::AlreadyListening("Anchor".into()))
        );
        assert_eq!(session.capture.starts, 1);
        session.stop();
        assert_eq!(session.capture.stops, 1);
    }

    #[test]
    fn practiced_after_five_distinct_words_once() {
        let mut session = PronunciationSession::new(FakeMic::default(), 5);
        let fired = Cell::new(0);

        for word in ["Lens", "Lens", "Frame", "Mast"] {
            attempt(&mut session, word, &format!("the {word}"), &fired);
        }
        attempt(&mut session, "Hull", "hall", &fired);
        assert_eq!(session.feedback("Hull"), Some(false));
        assert_eq!(fired.get(), 0);

        attempt(&mut session, "Hull", "HULL", &fired);
        assert_eq!(fired.get(), 0);
        attempt(&mut session, "Keel", "keel", &fired);
        assert_eq!(fired.get(), 1);
        attempt(&mut session, "Bow", "bow", &fired);
        assert_eq!(fired.get(), 1);
        assert_eq!(session.practiced_count(), 6);
    }

    #[test]
    fn error_clears_target() {
        let mut session = PronunciationSession::new(FakeMic::default(), 5);
        session.listen("Anchor").unwrap();
        session.on_error(&SpeechError::Capture("no-speech".into()));
        assert!(!session.is_listening());
        assert_eq!(session.target(), None);
        assert!(session.on_result("anchor", || {}).is_none());
        session.listen("Anchor").unwrap();
    }

    #[test]
    fn unavailable_capture_leaves_session_idle() {
        let mic = FakeMic {
            broken: true,
            ..Default::default()
        };
        let mut session = PronunciationSession::new(mic, 5);
        assert_eq!(session.listen("Anchor"), Err(SpeechError::Unavailable));
        assert!(!session.is_listening());
    }

    #[test]
    fn speaker_uses_trainer_settings() {
        struct Recorder(RefCell<Vec<(String, String, f32)>>);
        impl Speaker for Recorder {
            fn speak(&self, text: &str, lang: &str, rate: f32) -> Result<(), SpeechError> {
                self.0.borrow_mut().push((text.into(), lang.into(), rate));
                Ok(())
            }
        }

        let recorder = Recorder(RefCell::new(Vec::new()));
        pronounce(&recorder, "Sunglasses").unwrap();
        assert_eq!(
            recorder.0.into_inner(),
            vec![("Sunglasses".to_string(), "en-US".to_string(), 0.9)]
        );
    }
}
