//! Input sanitization
//!
//! Strips the common script-injection patterns from free text before it is
//! stored or sent, and bounds its length. This is a denylist filter: it catches
//! `<script>` blocks, `javascript:` schemes and inline `on*=` handlers, nothing
//! more. Rendering code must still escape output.

use edumatch_core::{validation_error, EdumatchResult, SecurityConfig, DEFAULT_MAX_INPUT_LENGTH};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static SCRIPT_BLOCK: OnceLock<Regex> = OnceLock::new();
static JAVASCRIPT_SCHEME: OnceLock<Regex> = OnceLock::new();
static EVENT_HANDLER: OnceLock<Regex> = OnceLock::new();

// Case folding and word boundaries are ASCII-only, so `javaſcript:` or
// `<scripté>` are treated the way a browser's JavaScript regex treats them.
fn script_block() -> &'static Regex {
    // Shortest match up to the first closing tag, across newlines
    SCRIPT_BLOCK.get_or_init(|| {
        Regex::new(r"(?s)(?i-u:<script\b).*?(?i-u:</script>)")
            .expect("script block pattern is valid")
    })
}

fn javascript_scheme() -> &'static Regex {
    JAVASCRIPT_SCHEME
        .get_or_init(|| Regex::new(r"(?i-u)javascript:").expect("scheme pattern is valid"))
}

fn event_handler() -> &'static Regex {
    EVENT_HANDLER.get_or_init(|| {
        Regex::new(r"(?i-u)on[a-z0-9_]+=").expect("event handler pattern is valid")
    })
}

/// One pass over the three pattern classes, in order
fn strip_once(input: &str) -> String {
    let without_scripts = script_block().replace_all(input, "");
    let without_schemes = javascript_scheme().replace_all(&without_scripts, "");
    event_handler().replace_all(&without_schemes, "").into_owned()
}

const SCRIPT_OPEN: &str = "<script";
const SCRIPT_CLOSE: &str = "</script>";
const SCHEME: &str = "javascript:";

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn ends_with_ignore_case(chars: &[char], pattern: &str) -> bool {
    let n = pattern.len();
    chars.len() >= n
        && chars[chars.len() - n..]
            .iter()
            .zip(pattern.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

/// Left-to-right scan that removes a forbidden fragment as soon as its last
/// character arrives. The buffer is free of matches before every push, so a
/// new match can only end at the last character, and removing it leaves a
/// clean prefix. Linear in the input.
struct Scrubber {
    chars: Vec<char>,
    /// Leftmost `on` inside the word run ending at each position
    first_on: Vec<Option<usize>>,
    /// Start of each `<script` followed by a non-word character, ascending
    openers: Vec<usize>,
}

impl Scrubber {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            chars: Vec::with_capacity(capacity),
            first_on: Vec::with_capacity(capacity),
            openers: Vec::new(),
        }
    }

    fn push(&mut self, c: char) {
        let len = self.chars.len();

        if !is_word(c) && ends_with_ignore_case(&self.chars, SCRIPT_OPEN) {
            self.openers.push(len - SCRIPT_OPEN.len());
        }

        let first_on = if is_word(c) && len > 0 && is_word(self.chars[len - 1]) {
            self.first_on[len - 1].or_else(|| {
                (self.chars[len - 1].eq_ignore_ascii_case(&'o') && c.eq_ignore_ascii_case(&'n'))
                    .then_some(len - 1)
            })
        } else {
            None
        };

        self.chars.push(c);
        self.first_on.push(first_on);
        self.remove_trailing_match();
    }

    fn remove_trailing_match(&mut self) {
        let len = self.chars.len();

        if ends_with_ignore_case(&self.chars, SCRIPT_CLOSE) {
            if let Some(&start) = self.openers.first() {
                self.truncate(start);
                return;
            }
        }

        if ends_with_ignore_case(&self.chars, SCHEME) {
            self.truncate(len - SCHEME.len());
            return;
        }

        // `on` plus at least one word character before the `=`
        if len >= 2 && self.chars[len - 1] == '=' {
            if let Some(start) = self.first_on[len - 2] {
                if start + 2 < len - 1 {
                    self.truncate(start);
                }
            }
        }
    }

    fn truncate(&mut self, len: usize) {
        self.chars.truncate(len);
        self.first_on.truncate(len);
        // An opener needs its trailing boundary character
        while self
            .openers
            .last()
            .is_some_and(|&start| start + SCRIPT_OPEN.len() >= len)
        {
            self.openers.pop();
        }
    }

    fn finish(self) -> String {
        self.chars.into_iter().collect()
    }
}

/// Strip the three pattern classes. A single regex pass handles ordinary input;
/// when it removed something, the scrubber also catches fragments spliced
/// together by the removal, such as `javajavascript:script:`.
fn strip_patterns(input: &str) -> String {
    let once = strip_once(input);
    if once.len() == input.len() {
        return once;
    }

    let mut scrubber = Scrubber::with_capacity(once.len());
    for c in once.chars() {
        scrubber.push(c);
    }
    scrubber.finish()
}

fn truncate_chars(mut text: String, max_length: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_length) {
        text.truncate(byte_index);
    }
    text
}

/// Sanitizer with a configurable length bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitizer {
    max_length: usize,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT_LENGTH)
    }
}

impl Sanitizer {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.max_input_length)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Sanitize one field value. Total over all inputs; `""` maps to `""`.
    pub fn sanitize(&self, input: &str) -> String {
        let stripped = strip_patterns(input);
        if stripped.len() != input.len() {
            debug!(
                removed_bytes = input.len() - stripped.len(),
                "Stripped disallowed markup from input"
            );
        }
        truncate_chars(stripped, self.max_length)
    }

    /// Sanitize an optional field: blank results count as "not provided"
    pub fn sanitize_optional(&self, input: &str) -> Option<String> {
        let sanitized = self.sanitize(input);
        if sanitized.trim().is_empty() {
            None
        } else {
            Some(sanitized)
        }
    }

    /// Sanitize a required field, rejecting values that are blank once sanitized
    pub fn sanitize_required(&self, field: &str, input: &str) -> EdumatchResult<String> {
        self.sanitize_optional(input)
            .ok_or_else(|| validation_error!(format!("{} is required", field), field, "sanitizer"))
    }
}

/// Sanitize with the default 5000 character bound
pub fn sanitize(input: &str) -> String {
    Sanitizer::default().sanitize(input)
}
