//! Options, defaults, and resolution into a canonical [`Config`].
//!
//! [`Config::resolve`] never fails. Missing or degenerate options fall back
//! to their defaults.

use crate::machine::Progress;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PHRASE: &str = "Type something amazing!";
pub const DEFAULT_DELIMITER: &str = ",";
pub const DEFAULT_TYPE_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_DELETE_DELAY: Duration = Duration::from_millis(800);
pub const DEFAULT_COLOR: &str = "inherit";
pub const DEFAULT_CURSOR_GLYPH: &str = "|";
pub const DEFAULT_BLINK: Duration = Duration::from_millis(400);

/// One phrase, or a list of phrases.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Texts {
    One(String),
    Many(Vec<String>),
}

impl Texts {
    pub fn is_empty(&self) -> bool {
        match self {
            Texts::One(text) => text.is_empty(),
            Texts::Many(texts) => texts.is_empty(),
        }
    }

    /// The phrases as given, a single string becoming a one-element list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Texts::One(text) => vec![text],
            Texts::Many(texts) => texts,
        }
    }

    /// The phrases, splitting a single string on `delimiter`.
    ///
    /// Pieces are trimmed and empty pieces dropped. A list is returned as is.
    pub fn split(self, delimiter: &str) -> Vec<String> {
        match self {
            Texts::One(text) => text
                .split(delimiter)
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_owned)
                .collect(),
            Texts::Many(texts) => texts,
        }
    }
}

impl From<&str> for Texts {
    fn from(text: &str) -> Self {
        Texts::One(text.to_owned())
    }
}

impl From<String> for Texts {
    fn from(text: String) -> Self {
        Texts::One(text)
    }
}

impl From<Vec<String>> for Texts {
    fn from(texts: Vec<String>) -> Self {
        Texts::Many(texts)
    }
}

impl From<Vec<&str>> for Texts {
    fn from(texts: Vec<&str>) -> Self {
        Texts::Many(texts.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Texts {
    fn from(texts: [&str; N]) -> Self {
        Texts::Many(texts.into_iter().map(str::to_owned).collect())
    }
}

/// The `loop` option: a flag, or an exact number of passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LoopOption {
    Enabled(bool),
    Passes(u32),
}

/// User-facing options. Every field is optional.
///
/// Deserializes from camelCase JSON, e.g.
/// `{"words": ["a", "b"], "loop": 2, "delay": 120, "colors": ["red"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    #[serde(alias = "words", alias = "texts")]
    pub phrases: Option<Texts>,
    pub delimiter: Option<String>,
    #[serde(rename = "loop")]
    pub looping: Option<LoopOption>,
    /// Per-character delay in milliseconds.
    #[serde(alias = "delay")]
    pub type_delay: Option<u64>,
    /// Pause before a completed phrase starts erasing, in milliseconds.
    pub delete_delay: Option<u64>,
    pub colors: Option<Vec<String>>,
    pub cursor_char: Option<String>,
    /// Blink interval in milliseconds.
    pub cursor_blink_speed: Option<u64>,
    pub show_cursor: Option<bool>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phrases(mut self, phrases: impl Into<Texts>) -> Self {
        self.phrases = Some(phrases.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = Some(LoopOption::Enabled(looping));
        self
    }

    pub fn with_passes(mut self, passes: u32) -> Self {
        self.looping = Some(LoopOption::Passes(passes));
        self
    }

    pub fn with_type_delay(mut self, ms: u64) -> Self {
        self.type_delay = Some(ms);
        self
    }

    pub fn with_delete_delay(mut self, ms: u64) -> Self {
        self.delete_delay = Some(ms);
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_cursor(mut self, glyph: impl Into<String>, blink_ms: u64) -> Self {
        self.cursor_char = Some(glyph.into());
        self.cursor_blink_speed = Some(blink_ms);
        self
    }

    pub fn with_show_cursor(mut self, show: bool) -> Self {
        self.show_cursor = Some(show);
        self
    }
}

/// Cursor node settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSettings {
    pub glyph: String,
    pub blink: Duration,
    pub show: bool,
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self {
            glyph: DEFAULT_CURSOR_GLYPH.to_owned(),
            blink: DEFAULT_BLINK,
            show: true,
        }
    }
}

/// Canonical configuration, immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Never empty.
    pub phrases: Vec<String>,
    pub delimiter: String,
    pub loop_enabled: bool,
    /// Passes before terminating; `None` loops forever.
    pub loop_limit: Option<u32>,
    pub type_delay: Duration,
    /// Pause between a completed phrase and the start of its erasure.
    pub delete_delay: Duration,
    /// Never empty.
    pub colors: Vec<String>,
    pub cursor: CursorSettings,
}

impl Config {
    /// Resolve `options` against the text the surface already shows.
    ///
    /// Non-blank `existing` text becomes phrase 0 and the animation starts
    /// by erasing it. Without an explicit phrase list it is the only phrase
    /// and looping is turned off.
    pub fn resolve(existing: &str, options: Options) -> (Config, Progress) {
        let delimiter = options
            .delimiter
            .filter(|delimiter| !delimiter.is_empty())
            .unwrap_or_else(|| DEFAULT_DELIMITER.to_owned());
        let supplied = options.phrases.map(|texts| texts.split(&delimiter));
        let mut looping = options.looping;

        let existing = existing.trim();
        let (phrases, initial) = if existing.is_empty() {
            let phrases = supplied
                .filter(|phrases| !phrases.is_empty())
                .unwrap_or_else(|| vec![DEFAULT_PHRASE.to_owned()]);
            (phrases, Progress::default())
        } else {
            let mut phrases = vec![existing.to_owned()];
            match supplied {
                Some(rest) => phrases.extend(rest),
                None => looping = Some(LoopOption::Enabled(false)),
            }
            let initial = Progress {
                chars: existing.chars().count(),
                building: false,
                ..Progress::default()
            };
            (phrases, initial)
        };

        let loop_enabled = looping != Some(LoopOption::Enabled(false));
        let loop_limit = match looping {
            Some(LoopOption::Passes(passes)) => Some(passes.max(1)),
            Some(LoopOption::Enabled(false)) => Some(1),
            _ => None,
        };

        let colors: Vec<String> = options
            .colors
            .unwrap_or_default()
            .into_iter()
            .filter(|color| !color.trim().is_empty())
            .collect();
        let colors = if colors.is_empty() {
            vec![DEFAULT_COLOR.to_owned()]
        } else {
            colors
        };

        let cursor = CursorSettings {
            glyph: options
                .cursor_char
                .filter(|glyph| !glyph.is_empty())
                .unwrap_or_else(|| DEFAULT_CURSOR_GLYPH.to_owned()),
            blink: options
                .cursor_blink_speed
                .filter(|ms| *ms > 0)
                .map_or(DEFAULT_BLINK, Duration::from_millis),
            show: options.show_cursor.unwrap_or(true),
        };

        let config = Config {
            phrases,
            delimiter,
            loop_enabled,
            loop_limit,
            type_delay: options
                .type_delay
                .map_or(DEFAULT_TYPE_DELAY, Duration::from_millis),
            delete_delay: options
                .delete_delay
                .map_or(DEFAULT_DELETE_DELAY, Duration::from_millis),
            colors,
            cursor,
        };
        (config, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let (config, initial) = Config::resolve("", Options::new());
        assert_eq!(config.phrases, [DEFAULT_PHRASE]);
        assert_eq!(config.delimiter, ",");
        assert!(config.loop_enabled);
        assert_eq!(config.loop_limit, None);
        assert_eq!(config.type_delay, Duration::from_millis(200));
        assert_eq!(config.delete_delay, Duration::from_millis(800));
        assert_eq!(config.colors, ["inherit"]);
        assert_eq!(config.cursor, CursorSettings::default());
        assert_eq!(
            initial,
            Progress {
                phrase: 0,
                chars: 0,
                building: true,
                loops_completed: 0
            }
        );
    }

    #[test]
    fn test_existing_text_without_phrases_disables_loop() {
        let (config, initial) = Config::resolve("  Hi \n", Options::new().with_passes(5));
        assert_eq!(config.phrases, ["Hi"]);
        assert!(!config.loop_enabled);
        assert_eq!(config.loop_limit, Some(1));
        assert_eq!(initial.chars, 2);
        assert!(!initial.building);
    }

    #[test]
    fn test_existing_text_prepended_to_phrases() {
        let options = Options::new().with_phrases(["a", "b"]);
        let (config, initial) = Config::resolve("Hello", options);
        assert_eq!(config.phrases, ["Hello", "a", "b"]);
        assert!(config.loop_enabled);
        assert_eq!(config.loop_limit, None);
        assert_eq!(initial.chars, 5);
    }

    #[test]
    fn test_existing_text_counts_chars_not_bytes() {
        let (_, initial) = Config::resolve("héllo", Options::new());
        assert_eq!(initial.chars, 5);
    }

    #[test]
    fn test_loop_resolution() {
        let resolve = |looping| {
            let mut options = Options::new();
            options.looping = looping;
            let (config, _) = Config::resolve("", options);
            (config.loop_enabled, config.loop_limit)
        };
        assert_eq!(resolve(None), (true, None));
        assert_eq!(resolve(Some(LoopOption::Enabled(true))), (true, None));
        assert_eq!(resolve(Some(LoopOption::Enabled(false))), (false, Some(1)));
        assert_eq!(resolve(Some(LoopOption::Passes(3))), (true, Some(3)));
        assert_eq!(resolve(Some(LoopOption::Passes(0))), (true, Some(1)));
    }

    #[test]
    fn test_delimited_phrases() {
        let options = Options::new()
            .with_phrases("one; two ;;three")
            .with_delimiter(";");
        let (config, _) = Config::resolve("", options);
        assert_eq!(config.phrases, ["one", "two", "three"]);
        assert_eq!(config.delimiter, ";");
    }

    #[test]
    fn test_empty_phrase_list_falls_back() {
        let (config, _) = Config::resolve("", Options::new().with_phrases(Vec::<String>::new()));
        assert_eq!(config.phrases, [DEFAULT_PHRASE]);
    }

    #[test]
    fn test_degenerate_values_fall_back() {
        let options = Options::new()
            .with_colors(["", "  "])
            .with_cursor("", 0)
            .with_type_delay(0);
        let (config, _) = Config::resolve("", options);
        assert_eq!(config.colors, ["inherit"]);
        assert_eq!(config.cursor.glyph, "|");
        assert_eq!(config.cursor.blink, DEFAULT_BLINK);
        assert_eq!(config.type_delay, Duration::ZERO);
    }

    #[test]
    fn test_deserialize_json_options() {
        let options: Options = serde_json::from_str(
            r##"{"words": ["a", "b"], "loop": 2, "delay": 120, "deleteDelay": 300,
                "colors": ["red", "#00ff00"], "cursorChar": "_", "showCursor": false}"##,
        )
        .unwrap();
        assert_eq!(options.phrases, Some(Texts::from(["a", "b"])));
        assert_eq!(options.looping, Some(LoopOption::Passes(2)));
        assert_eq!(options.type_delay, Some(120));
        assert_eq!(options.delete_delay, Some(300));
        assert_eq!(options.cursor_char.as_deref(), Some("_"));
        assert_eq!(options.show_cursor, Some(false));

        let options: Options = serde_json::from_str(r#"{"loop": false, "texts": "x,y"}"#).unwrap();
        assert_eq!(options.looping, Some(LoopOption::Enabled(false)));
        let (config, _) = Config::resolve("", options);
        assert_eq!(config.phrases, ["x", "y"]);
    }
}
