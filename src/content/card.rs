//! Card text and media, optionally loaded from a TOML file.
//!
//! Every field has a built-in default so a content file only needs to list
//! what it changes:
//!
//! ```toml
//! recipient = "Sam"
//! birthday = { month = 3, day = 2 }
//! daily_quotes = ["You light up every room."]
//!
//! [[letters]]
//! key = "sad"
//! title = "When You're Sad"
//! body = "It's okay to not be okay."
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use indoc::indoc;
use serde::{Deserialize, Serialize};

use crate::constants::{BIRTHDAY_DAY, BIRTHDAY_MONTH, DEFAULT_RECIPIENT};
use crate::error::CardError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    /// 1-based month.
    pub month: u32,
    pub day: u32,
}

impl Default for Birthday {
    fn default() -> Self {
        Self {
            month: BIRTHDAY_MONTH,
            day: BIRTHDAY_DAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspiration {
    pub quote: String,
    pub author: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    pub key: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub title: String,
    pub body: String,
}

/// Two photos shown side by side above the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoPair {
    pub then: String,
    pub now: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardContent {
    pub recipient: String,
    pub birthday: Birthday,
    pub daily_quotes: Vec<String>,
    pub inspiration: Vec<Inspiration>,
    pub letters: Vec<Letter>,
    pub reasons: Vec<String>,
    /// Static text panels keyed by kind tag.
    pub templates: BTreeMap<String, Template>,
    /// Photo file names, resolved against the photo directory.
    pub photos: Vec<String>,
    pub comparison: Option<PhotoPair>,
}

impl CardContent {
    pub fn from_toml_str(source: &str) -> Result<Self, CardError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, CardError> {
        let source = std::fs::read_to_string(path)?;
        let content = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded card content");
        Ok(content)
    }
}

fn inspiration(quote: &str, author: &str, note: &str) -> Inspiration {
    Inspiration {
        quote: quote.to_string(),
        author: author.to_string(),
        note: note.to_string(),
    }
}

fn letter(key: &str, title: &str, body: &str) -> Letter {
    Letter {
        key: key.to_string(),
        title: title.to_string(),
        body: body.to_string(),
    }
}

impl Default for CardContent {
    fn default() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(
            "birthday-vault".to_string(),
            Template {
                title: "Birthday Vault".to_string(),
                body: indoc! {"
                    Happy birthday!

                    This little vault holds every wish saved up over the year.
                    More laughter, calmer mornings and braver days.
                    And people around you who see how wonderful you are.
                "}
                .to_string(),
            },
        );
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            birthday: Birthday::default(),
            daily_quotes: vec![
                "You make the world brighter.".to_string(),
                "I will always care for you.".to_string(),
                "I will always be there for you.".to_string(),
                "You are enough as you are.".to_string(),
            ],
            inspiration: vec![
                inspiration(
                    "Believe you can and you're halfway there.",
                    "Theodore Roosevelt",
                    "Your potential is limitless.",
                ),
                inspiration(
                    "The best way to predict the future is to create it.",
                    "Peter Drucker",
                    "Every step counts.",
                ),
                inspiration(
                    "The only way to do great work is to love what you do.",
                    "Steve Jobs",
                    "Find your passion.",
                ),
            ],
            letters: vec![
                letter(
                    "happy",
                    "When You're Happy",
                    "Seeing you happy makes my whole day. Hold on to this feeling.",
                ),
                letter(
                    "sad",
                    "When You're Sad",
                    "It's okay to not be okay. I'm always here to listen.",
                ),
                letter(
                    "stressed",
                    "When You're Stressed",
                    "Breathe. Take a deep breath right now. Everything else can wait.",
                ),
                letter(
                    "lonely",
                    "When You Feel Alone",
                    "You're not alone, even when it feels that way. I'm on your side.",
                ),
            ],
            reasons: vec![
                "Your laugh is contagious.".to_string(),
                "You never give up on the people you love.".to_string(),
                "You make ordinary days feel special.".to_string(),
                "You are kind even when nobody is watching.".to_string(),
            ],
            templates,
            photos: Vec::new(),
            comparison: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let content = CardContent::from_toml_str(indoc! {r#"
            recipient = "Sam"
            birthday = { month = 3, day = 2 }
        "#})
        .expect("valid toml");
        assert_eq!(content.recipient, "Sam");
        assert_eq!(content.birthday, Birthday { month: 3, day: 2 });
        assert_eq!(content.letters, CardContent::default().letters);
    }

    #[test]
    fn letters_and_templates_parse() {
        let content = CardContent::from_toml_str(indoc! {r#"
            [[letters]]
            key = "brave"
            title = "When You Need Courage"
            body = "You've got this."

            [templates.playlist]
            title = "Playlist"
            body = "Track one"

            [comparison]
            then = "small.png"
            now = "today.png"
        "#})
        .expect("valid toml");
        assert_eq!(content.comparison.map(|p| p.now), Some("today.png".to_string()));
        assert_eq!(content.letters.len(), 1);
        assert_eq!(content.letters[0].key, "brave");
        assert_eq!(content.templates["playlist"].body, "Track one");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = CardContent::from_toml_str("recipient = [").unwrap_err();
        assert!(matches!(err, CardError::ContentParse(_)));
    }
}
