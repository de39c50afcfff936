//! Compile-Fault Locator.
//!
//! A compile fault arrives with a terse message and a position. The Locator
//! re-tokenizes the offending source, when it can get hold of it, and runs two
//! ordered rule tables with the same first-match discipline as the runtime
//! classifier:
//!
//! 1. message rules, keyed on the compiler's wording. Wording changed between
//!    runtime releases, so each rule carries the [`VersionRange`] it applies to.
//! 2. token rules, which look at the tokens of the offending line for the
//!    mistakes a bare "invalid syntax" does not name.
//!
//! Without any source text only the message rules can fire, and anything they
//! do not recognise is explained as `unknown`.
//!
//! [`VersionRange`]: crate::fault::VersionRange

mod brackets;
mod messages;
mod source;
mod statements;
mod tokenize;

use crate::{
    category::{CauseCategory, Classification},
    classify::first_match,
    config::ExplainConfig,
    fault::{CapturedFault, FaultKind, RuntimeVersion},
    tracer::InferenceTracer,
};
use brackets::{BracketIssue, bracket_name};
use tokenize::{Token, TokenKind, significant_on_row, tokenize};

/// Everything a syntax rule may look at.
pub(crate) struct SyntaxCtx<'s> {
    pub kind: &'s FaultKind,
    pub message: &'s str,
    pub version: RuntimeVersion,
    /// Full source text, when available.
    pub source: Option<&'s str>,
    /// 1-based line of the fault; 1 when the compiler reported no position.
    pub line_number: usize,
    /// Text of the offending line, empty when unknown.
    pub line: &'s str,
    /// Tokens of the whole source, or of `line` alone without source.
    pub tokens: Vec<Token<'s>>,
    /// Row of the offending line within `tokens`.
    pub row: usize,
    /// Significant tokens on the offending line.
    pub line_tokens: Vec<Token<'s>>,
}

impl<'s> SyntaxCtx<'s> {
    fn new(fault: &'s CapturedFault<'_>, version: RuntimeVersion, source: Option<&'s str>) -> Self {
        let location = fault.location;
        let reported_line = location.and_then(|location| location.line_number);
        let line_number = reported_line.unwrap_or(1);
        let line = location
            .and_then(|location| location.line_text.as_deref())
            .map(|text| text.trim_end_matches(['\n', '\r']))
            .or_else(|| source.and_then(|text| source::line_at(text, line_number)))
            .unwrap_or_default();
        let (tokens, row) = match (source, reported_line) {
            (Some(text), Some(number)) => (tokenize(text), number),
            _ => (tokenize(line), 1),
        };
        let line_tokens = significant_on_row(&tokens, row);
        Self {
            kind: &fault.kind,
            message: fault.raw_message,
            version,
            source,
            line_number,
            line,
            tokens,
            row,
            line_tokens,
        }
    }

    /// Maps a row of `tokens` back to a source line number.
    fn line_of(&self, row: usize) -> usize {
        if self.source.is_some() {
            row
        } else {
            self.line_number + row - 1
        }
    }

    /// Line `number` of the source, if the source is known.
    pub fn source_line(&self, number: usize) -> Option<&'s str> {
        self.source.and_then(|text| source::line_at(text, number))
    }

    /// The nearest non-blank line above the offending one.
    pub fn previous_line(&self) -> Option<&'s str> {
        self.source
            .and_then(|text| source::previous_code_line(text, self.line_number))
    }

    /// True when the fault is reported past the last line of the source.
    pub fn at_end_of_source(&self) -> bool {
        match self.source {
            Some(text) => self.line_number > text.lines().count() || self.line.trim().is_empty(),
            None => false,
        }
    }

    /// Bracket problem up to and including the offending line.
    pub fn bracket_issue(&self, whole_source: bool) -> Option<BracketIssue> {
        brackets::scan(&self.tokens, (!whole_source).then_some(self.row))
    }

    /// Classification naming the bracket problem.
    pub fn bracket_cause(&self, issue: BracketIssue) -> Classification {
        match issue {
            BracketIssue::Unclosed { open, row } => Classification::new(CauseCategory::UnclosedBracket)
                .text("bracket", open.to_string())
                .text("bracket_name", bracket_name(open))
                .text("line", self.line_of(row).to_string()),
            BracketIssue::Unmatched { close, row } => Classification::new(CauseCategory::UnmatchedClosingBracket)
                .text("bracket", close.to_string())
                .text("bracket_name", bracket_name(close))
                .text("line", self.line_of(row).to_string()),
            BracketIssue::Mismatched {
                open,
                open_row,
                close,
                row,
            } => Classification::new(CauseCategory::MismatchedBracket)
                .text("open", open.to_string())
                .text("open_name", bracket_name(open))
                .text("open_line", self.line_of(open_row).to_string())
                .text("close", close.to_string())
                .text("close_name", bracket_name(close))
                .text("line", self.line_of(row).to_string()),
        }
    }

    /// Text left of the first top-level `=` on the offending line, without a
    /// leading `if`/`elif`/`while`.
    pub fn assignment_target(&self) -> Option<&'s str> {
        let byte_at = |col: usize| self.line.char_indices().nth(col).map_or(self.line.len(), |(i, _)| i);
        let skip = usize::from(
            self.line_tokens
                .first()
                .is_some_and(|tok| matches!(tok.text, "if" | "elif" | "while") && tok.kind == TokenKind::Name),
        );
        let start = self.line_tokens.get(skip).map_or(0, |tok| byte_at(tok.col));
        let mut depth = 0usize;
        for tok in &self.line_tokens {
            match tok.text {
                "(" | "[" | "{" if tok.kind == TokenKind::Op => depth += 1,
                ")" | "]" | "}" if tok.kind == TokenKind::Op => depth = depth.saturating_sub(1),
                "=" if tok.kind == TokenKind::Op && depth == 0 => {
                    let end = byte_at(tok.col);
                    let target = self.line.get(start..end).unwrap_or_default().trim();
                    return (!target.is_empty()).then_some(target);
                }
                _ => {}
            }
        }
        None
    }
}

/// Explains a compile fault. Never fails: unreadable source only narrows the
/// rules that can fire.
pub(crate) fn locate(
    fault: &CapturedFault<'_>,
    config: &ExplainConfig,
    tracer: &mut dyn InferenceTracer,
) -> Classification {
    let version = fault.version.unwrap_or_else(|| config.version());
    let loaded = fault
        .location
        .and_then(|location| source::load(location, config, tracer));
    let ctx = SyntaxCtx::new(fault, version, loaded.as_deref());
    if let Some(found) = first_match("syntax-message", messages::RULES, &ctx, version, tracer) {
        return found;
    }
    if ctx.line_tokens.is_empty() {
        return Classification::unknown();
    }
    first_match("syntax-token", statements::RULES, &ctx, version, tracer).unwrap_or_else(Classification::unknown)
}

/// Classification for a stray character, by what it most likely stands for.
pub(crate) fn character_cause(ch: char) -> Classification {
    let code = format!("U+{:04X}", u32::from(ch));
    if matches!(ch, '\u{201c}' | '\u{201d}' | '\u{2018}' | '\u{2019}' | '\u{ab}' | '\u{bb}' | '\u{201e}' | '\u{201a}')
    {
        let meant = if matches!(ch, '\u{2018}' | '\u{2019}' | '\u{201a}') { "'" } else { "\"" };
        return Classification::new(CauseCategory::FancyQuote)
            .text("char", ch.to_string())
            .text("meant", meant);
    }
    if let Some(fraction) = unicode_fraction(ch) {
        return Classification::new(CauseCategory::UnicodeFraction)
            .text("char", ch.to_string())
            .text("fraction", fraction);
    }
    if ch == '`' {
        return Classification::new(CauseCategory::Backquote);
    }
    if ch.is_control() || matches!(ch, '\u{a0}' | '\u{2000}'..='\u{200f}' | '\u{2028}' | '\u{2029}' | '\u{feff}') {
        return Classification::new(CauseCategory::NonPrintableCharacter).text("code", code);
    }
    Classification::new(CauseCategory::InvalidCharacter)
        .text("char", ch.to_string())
        .text("code", code)
}

fn unicode_fraction(ch: char) -> Option<&'static str> {
    Some(match ch {
        '\u{bd}' => "1/2",
        '\u{2153}' => "1/3",
        '\u{2154}' => "2/3",
        '\u{bc}' => "1/4",
        '\u{be}' => "3/4",
        '\u{2155}' => "1/5",
        '\u{2156}' => "2/5",
        '\u{2157}' => "3/5",
        '\u{2158}' => "4/5",
        '\u{2159}' => "1/6",
        '\u{215a}' => "5/6",
        '\u{2150}' => "1/7",
        '\u{215b}' => "1/8",
        '\u{215c}' => "3/8",
        '\u{215d}' => "5/8",
        '\u{215e}' => "7/8",
        '\u{2151}' => "1/9",
        '\u{2152}' => "1/10",
        '\u{2044}' | '\u{2215}' => "/",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fault::SourceLocation, tracer::RecordingTracer};

    fn locate_source(message: &str, source: &str, line: usize) -> Classification {
        let location = SourceLocation {
            file_path: "<test>".to_owned(),
            line_number: Some(line),
            source: Some(source.to_owned()),
            ..SourceLocation::default()
        };
        let fault = CapturedFault::new(FaultKind::SyntaxError, message).with_location(&location);
        locate(&fault, &ExplainConfig::new(), &mut RecordingTracer::new())
    }

    #[test]
    fn character_causes() {
        assert_eq!(character_cause('\u{201c}').category, CauseCategory::FancyQuote);
        assert_eq!(character_cause('\u{bd}').params.text("fraction"), Some("1/2"));
        assert_eq!(character_cause('\u{a0}').params.text("code"), Some("U+00A0"));
        assert_eq!(character_cause('$').category, CauseCategory::InvalidCharacter);
    }

    #[test]
    fn assignment_target_stops_at_top_level_equal() {
        let found = locate_source("cannot assign to function call", "f(x=1) = 3\n", 1);
        assert_eq!(found.category, CauseCategory::AssignToFunctionCall);
        assert_eq!(found.params.text("target"), Some("f(x=1)"));
    }

    #[test]
    fn unclosed_bracket_line_comes_from_the_tokens() {
        let found = locate_source("invalid syntax", "a = [1, 2,\nb = 3\n", 2);
        assert_eq!(found.category, CauseCategory::UnclosedBracket);
        assert_eq!(found.params.text("line"), Some("1"));
    }

    #[test]
    fn no_source_and_no_known_message_is_unknown() {
        let fault = CapturedFault::new(FaultKind::SyntaxError, "invalid syntax");
        let found = locate(&fault, &ExplainConfig::new(), &mut RecordingTracer::new());
        assert!(found.category.is_unknown());
    }
}
