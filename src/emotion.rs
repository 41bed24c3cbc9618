use std::fmt;

/// Mood tag attached to every diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Emotion {
    #[default]
    Happy,
    Sad,
    Excited,
    Angry,
    Relaxed,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Excited,
        Emotion::Angry,
        Emotion::Relaxed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Excited => "Excited",
            Emotion::Angry => "Angry",
            Emotion::Relaxed => "Relaxed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Emotion::Happy => "☀️",
            Emotion::Sad => "🌧️",
            Emotion::Excited => "🎈",
            Emotion::Angry => "🔥",
            Emotion::Relaxed => "🌊",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|e| *e == self).unwrap_or(0)
    }

    /// Next tag in picker order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
