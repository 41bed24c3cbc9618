use crate::haptics::{Haptics, PulseOutcome};
use crate::speech::Speech;
use crate::time_capsule::{CapsuleDraft, CapsuleVault};
use chrono::{DateTime, Local};
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::warn;

pub const MOTIVATIONAL_MESSAGES: [&str; 4] = [
    "You got this.",
    "You're smashing it!",
    "Keep going!",
    "Don't give up!",
];

const FALLBACK_MESSAGE: &str = "You're doing great!";

/// Uniform pick from a fixed message list. Repeats are allowed.
pub struct MessageTrigger<R: Rng> {
    messages: &'static [&'static str],
    rng: R,
}

impl MessageTrigger<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(&MOTIVATIONAL_MESSAGES, rand::rng())
    }
}

impl<R: Rng> MessageTrigger<R> {
    pub fn with_rng(messages: &'static [&'static str], rng: R) -> Self {
        MessageTrigger { messages, rng }
    }

    pub fn pick(&mut self) -> &'static str {
        self.messages
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(FALLBACK_MESSAGE)
    }
}

/// Everything behind the Mindfulness tab.
pub struct Mindfulness<R: Rng = ThreadRng> {
    trigger: MessageTrigger<R>,
    haptics: Haptics,
    speech: Speech,
    speak_on_tap: bool,
    message: Option<&'static str>,
    pub capsules: CapsuleVault<Local>,
}

impl<R: Rng> Mindfulness<R> {
    pub fn new(trigger: MessageTrigger<R>, haptics: Haptics, speech: Speech, speak_on_tap: bool) -> Self {
        Mindfulness {
            trigger,
            haptics,
            speech,
            speak_on_tap,
            message: None,
            capsules: CapsuleVault::new(),
        }
    }

    /// Shows a fresh message and buzzes once.
    pub fn tap(&mut self) -> PulseOutcome {
        let message = self.trigger.pick();
        self.message = Some(message);
        let pulse = self.haptics.pulse();
        if self.speak_on_tap {
            self.speech.speak(message);
        }
        pulse
    }

    /// Reads the current message aloud, if there is one.
    pub fn speak_message(&self) {
        if let Some(message) = self.message {
            self.speech.speak(message);
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    pub fn can_speak(&self) -> bool {
        self.speech.is_available()
    }

    pub fn seal_capsule(&mut self, draft: CapsuleDraft, now: DateTime<Local>) {
        match draft.seal(now) {
            Ok(capsule) => self.capsules.store(capsule),
            Err(e) => warn!(error = %e, "time capsule could not be sealed"),
        }
    }
}
