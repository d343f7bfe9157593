//! Literal text matcher

use super::MatchState;

/// How a [`TextMatcher`] compares its literal against the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// The literal must appear within a single line
    Simple,
    /// The literal may span several lines; punctuation is ignored
    Full,
}

/// Case-insensitive, whitespace-normalized literal search.
///
/// A literal containing a newline selects [`TextMode::Full`], which keeps a sliding
/// window of the normalized input so the literal can be found across line breaks.
/// In full mode every non alphanumeric character counts as whitespace, which lets
/// license text wrapped in comment decoration (`*`, `#`, `//`) still match.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    text: String,
    mode: TextMode,
    needle: String,
    window: String,
}

impl TextMatcher {
    /// Create a matcher for `text`; the mode is derived from the literal
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mode = if text.contains('\n') {
            TextMode::Full
        } else {
            TextMode::Simple
        };
        let needle = match mode {
            TextMode::Simple => normalize(&text),
            TextMode::Full => prune(&text),
        };

        Self {
            text,
            mode,
            needle,
            window: String::new(),
        }
    }

    /// The literal as configured
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The comparison mode
    pub fn mode(&self) -> TextMode {
        self.mode
    }

    /// Whether nothing is left to search for once the literal is normalized
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub(crate) fn process(&mut self, line: &str) -> MatchState {
        match self.mode {
            TextMode::Simple => {
                if normalize(line).contains(&self.needle) {
                    MatchState::Matched
                } else {
                    MatchState::Pending
                }
            }
            TextMode::Full => self.process_full(line),
        }
    }

    fn process_full(&mut self, line: &str) -> MatchState {
        let pruned = prune(line);
        if pruned.is_empty() {
            return MatchState::Pending;
        }

        if !self.window.is_empty() {
            self.window.push(' ');
        }
        self.window.push_str(&pruned);

        if self.window.contains(&self.needle) {
            self.window.clear();
            return MatchState::Matched;
        }

        // Only a suffix shorter than the needle can still take part in a match
        let keep = self.needle.len();
        if self.window.len() > keep {
            let mut cut = self.window.len() - keep;
            while !self.window.is_char_boundary(cut) {
                cut += 1;
            }
            self.window.drain(..cut);
        }

        MatchState::Pending
    }

    pub(crate) fn reset(&mut self) {
        self.window.clear();
    }
}

/// Lowercase and collapse whitespace runs into single spaces
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, keeping only alphanumeric words separated by single spaces
fn prune(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
