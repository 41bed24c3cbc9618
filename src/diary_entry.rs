use crate::emotion::Emotion;
use crate::photo::Photo;
use crate::text_input::TextInput;
use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub text: String,
    pub emotion: Emotion,
    pub photo: Option<Photo>,
}

impl DiaryEntry {
    pub fn new(date: NaiveDate, text: String, emotion: Emotion, photo: Option<Photo>) -> Self {
        DiaryEntry {
            id: Uuid::new_v4(),
            date,
            text,
            emotion,
            photo,
        }
    }

    /// First line of the text, for list previews.
    pub fn headline(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }
}

/// State of the "add entry" form, opened for one day.
///
/// Dropping the draft is the cancel path: nothing reaches the diary.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    date: NaiveDate,
    pub text: TextInput,
    pub emotion: Emotion,
    pub photo: Option<Photo>,
}

impl EntryDraft {
    pub fn new(date: NaiveDate) -> Self {
        EntryDraft {
            date,
            text: TextInput::new(),
            emotion: Emotion::default(),
            photo: None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Builds the entry and hands it to `on_save`. Empty text is accepted.
    pub fn submit(self, on_save: impl FnOnce(DiaryEntry)) {
        on_save(DiaryEntry::new(
            self.date,
            self.text.into_string(),
            self.emotion,
            self.photo,
        ));
    }
}
