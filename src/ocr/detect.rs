//! Deciding whether a page's native text can be trusted.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::dictionary::{normalize_word, SpellDictionary};

/// Thresholds of the bad-text heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadTextThresholds {
    /// Max share of distinct unknown words among alphanumeric words
    pub misspell: f64,
    /// Max share of whitespace runs
    pub space: f64,
    /// Max share of newline runs
    pub newline: f64,
    /// Min share of alphanumeric characters among non-whitespace characters
    pub alphanumeric: f64,
    /// Replacement characters tolerated as a share of the text length
    pub invalid_chars: f64,
    /// Replacement characters always tolerated
    pub min_invalid_chars: f64,
}

impl Default for BadTextThresholds {
    fn default() -> Self {
        Self {
            misspell: 0.7,
            space: 0.6,
            newline: 0.5,
            alphanumeric: 0.4,
            invalid_chars: 0.02,
            min_invalid_chars: 3.0,
        }
    }
}

/// Why a text was judged unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadTextReason {
    Empty,
    Misspelled,
    Whitespace,
    Newlines,
    Garbled,
    InvalidChars,
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn newline_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n+").expect("valid regex"))
}

/// Share of alphanumeric characters among non-whitespace characters.
pub fn alphanumeric_ratio(text: &str) -> f64 {
    let (total, alnum) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(total, alnum), c| {
            (total + 1, alnum + usize::from(c.is_alphanumeric()))
        });
    if total == 0 {
        return 0.0;
    }
    alnum as f64 / total as f64
}

/// Run the bad-text heuristic; `None` means the text looks usable.
pub fn bad_text_reason(
    text: &str,
    dictionary: Option<&dyn SpellDictionary>,
    thresholds: &BadTextThresholds,
) -> Option<BadTextReason> {
    if text.is_empty() {
        return Some(BadTextReason::Empty);
    }

    if let Some(dictionary) = dictionary {
        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| w.chars().all(char::is_alphanumeric))
            .collect();
        let unknown: HashSet<String> = words
            .iter()
            .filter(|w| !dictionary.contains(w))
            .map(|w| normalize_word(w))
            .collect();
        if unknown.len() as f64 > words.len() as f64 * thresholds.misspell {
            return Some(BadTextReason::Misspelled);
        }
    }

    let spaces = whitespace_runs().find_iter(text).count();
    let non_spaces = text.chars().filter(|c| !c.is_whitespace()).count();
    if spaces as f64 / (spaces + non_spaces) as f64 > thresholds.space {
        return Some(BadTextReason::Whitespace);
    }

    let newlines = newline_runs().find_iter(text).count();
    let non_newlines = text.chars().filter(|&c| c != '\n').count();
    if newlines as f64 / (newlines + non_newlines) as f64 > thresholds.newline {
        return Some(BadTextReason::Newlines);
    }

    if alphanumeric_ratio(text) < thresholds.alphanumeric {
        return Some(BadTextReason::Garbled);
    }

    let invalid = text.chars().filter(|&c| c == char::REPLACEMENT_CHARACTER).count();
    let limit = thresholds
        .min_invalid_chars
        .max(text.chars().count() as f64 * thresholds.invalid_chars);
    if invalid as f64 > limit {
        return Some(BadTextReason::InvalidChars);
    }

    None
}

/// Check whether `text` looks like unusable extraction output.
pub fn detect_bad_text(
    text: &str,
    dictionary: Option<&dyn SpellDictionary>,
    thresholds: &BadTextThresholds,
) -> bool {
    bad_text_reason(text, dictionary, thresholds).is_some()
}

/// Inputs of the per-page OCR decision.
#[derive(Debug, Clone, Copy)]
pub struct OcrPolicy {
    /// The whole document has no extractable text
    pub document_has_no_text: bool,
    /// Pages at or below this index are never recognized
    pub min_ocr_page: usize,
    /// Total number of pages in the document
    pub total_pages: usize,
    pub ocr_all_pages: bool,
    pub disable_ocr: bool,
}

impl OcrPolicy {
    /// Check whether `page_index` lies strictly between `min_ocr_page` and
    /// the last page.
    pub fn page_eligible(&self, page_index: usize) -> bool {
        self.min_ocr_page < page_index && page_index + 1 < self.total_pages
    }

    /// Check whether native text is unusable, ignoring the page gate.
    pub fn text_needs_ocr(
        &self,
        prelim_text: &str,
        dictionary: Option<&dyn SpellDictionary>,
        thresholds: &BadTextThresholds,
    ) -> bool {
        self.document_has_no_text
            || (!prelim_text.is_empty() && detect_bad_text(prelim_text, dictionary, thresholds))
    }

    /// Final decision for one page.
    pub fn should_ocr(
        &self,
        page_index: usize,
        prelim_text: &str,
        dictionary: Option<&dyn SpellDictionary>,
        thresholds: &BadTextThresholds,
    ) -> bool {
        if self.ocr_all_pages {
            return true;
        }
        !self.disable_ocr
            && self.page_eligible(page_index)
            && self.text_needs_ocr(prelim_text, dictionary, thresholds)
    }
}
