//! Syntax rules that read the tokens of the offending line.
//!
//! These run after the message rules, mostly for faults the compiler only
//! reports as "invalid syntax".

use super::{
    SyntaxCtx, character_cause,
    tokenize::{Token, TokenKind},
};
use crate::{
    category::{CauseCategory, Classification},
    classify::Rule,
    fault::VersionRange,
    similarity::best_matches,
    stdlib::{BLOCK_KEYWORDS, is_keyword},
};

type Check = fn(&SyntaxCtx<'_>) -> Option<Classification>;

const fn rule(name: &'static str, check: Check) -> Rule<Check> {
    Rule::new(name, check)
}

pub(super) const RULES: &[Rule<Check>] = &[
    rule("copy-pasted-code", copy_pasted_code),
    rule("pip-install", pip_install),
    rule("python-command", python_command),
    rule("stray-character", stray_character),
    rule("unterminated-string", unterminated_string),
    rule("bracket-state", bracket_state),
    rule("triple-equal", triple_equal),
    rule("inverted-operators", inverted_operators),
    Rule::only("walrus-unsupported", VersionRange::before(3, 8), walrus_unsupported as Check),
    rule("leading-zero", leading_zero),
    rule("invalid-hex-literal", invalid_hex_literal),
    rule("invalid-octal-literal", invalid_octal_literal),
    rule("imaginary-i", imaginary_i),
    rule("identifier-starts-with-digit", identifier_starts_with_digit),
    rule("else-if", else_if),
    rule("elseif", elseif),
    rule("print-statement", print_statement),
    rule("python2-raise", python2_raise),
    rule("def-missing-name", def_missing_name),
    rule("class-missing-name", class_missing_name),
    rule("def-missing-parens", def_missing_parens),
    rule("keyword-as-attribute", keyword_as_attribute),
    rule("and-in-import", and_in_import),
    rule("trailing-comma-in-import", trailing_comma_in_import),
    rule("hyphen-in-name", hyphen_in_name),
    rule("assign-instead-of-equal", assign_instead_of_equal),
    rule("semicolon-instead-of-colon", semicolon_instead_of_colon),
    rule("missing-colon", missing_colon),
    rule("misspelled-keyword", misspelled_keyword),
    rule("missing-comma", missing_comma),
];

/// Statement keywords a misspelt first word is compared against.
const STATEMENT_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "for", "while", "def", "class", "try", "except", "finally", "with", "return", "import",
    "from", "global", "nonlocal", "raise", "assert", "del", "pass", "yield", "lambda",
];

/// True when `b` starts right where `a` ends.
fn touching(a: &Token<'_>, b: &Token<'_>) -> bool {
    a.row == b.row && a.col + a.text.chars().count() == b.col
}

/// The line's tokens with a leading `async` dropped.
fn statement<'t, 's>(s: &'t SyntaxCtx<'s>) -> &'t [Token<'s>] {
    match s.line_tokens.split_first() {
        Some((first, rest)) if first.is_name("async") => rest,
        _ => &s.line_tokens,
    }
}

fn starts_with_name(s: &SyntaxCtx<'_>, name: &str) -> bool {
    statement(s).first().is_some_and(|tok| tok.is_name(name))
}

/// Whether `op` occurs outside any bracket on the line.
fn top_level_op(tokens: &[Token<'_>], op: &str) -> bool {
    let mut depth = 0usize;
    for tok in tokens {
        if tok.kind != TokenKind::Op {
            continue;
        }
        match tok.text {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.saturating_sub(1),
            text if text == op && depth == 0 => return true,
            _ => {}
        }
    }
    false
}

fn copy_pasted_code(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let line = s.line.trim_start();
    let prompt = if line.starts_with(">>>") {
        ">>>"
    } else if let Some(rest) = line.strip_prefix("...")
        && rest.starts_with([' ', '\t'])
        && !rest.trim().is_empty()
    {
        "..."
    } else {
        return None;
    };
    Some(Classification::new(CauseCategory::CopyPastedCode).text("prompt", prompt))
}

fn pip_install(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let names: Vec<&str> = s.line_tokens.iter().take(4).map(|tok| tok.text).collect();
    let found = matches!(names.as_slice(), ["pip" | "pip3", "install", ..])
        || matches!(names.as_slice(), ["python" | "python3" | "py", "-", "m", "pip"]);
    found.then(|| Classification::new(CauseCategory::PipInstall))
}

fn python_command(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let [first, second, ..] = s.line_tokens.as_slice() else {
        return None;
    };
    let is_python = matches!(first.text, "python" | "python3" | "py") && first.kind == TokenKind::Name;
    (is_python && matches!(second.kind, TokenKind::Name | TokenKind::String))
        .then(|| Classification::new(CauseCategory::PythonCommand))
}

fn stray_character(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let stray = s.line_tokens.iter().find(|tok| tok.kind == TokenKind::Error)?;
    stray.text.chars().next().map(character_cause)
}

/// An unterminated literal on or before the offending line.
fn unterminated_string(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let open = s
        .tokens
        .iter()
        .take_while(|tok| tok.row <= s.row)
        .find(|tok| tok.kind == TokenKind::UnterminatedString)?;
    let body = open.text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let category = if body.starts_with("'''") || body.starts_with("\"\"\"") {
        CauseCategory::UnterminatedTripleQuote
    } else {
        CauseCategory::UnterminatedString
    };
    Some(Classification::new(category))
}

fn bracket_state(s: &SyntaxCtx<'_>) -> Option<Classification> {
    s.bracket_issue(false).map(|issue| s.bracket_cause(issue))
}

fn triple_equal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    s.line_tokens
        .windows(2)
        .any(|pair| pair[0].is_op("==") && pair[1].is_op("=") && touching(&pair[0], &pair[1]))
        .then(|| Classification::new(CauseCategory::TripleEqual))
}

/// `=<` and `=>` written for `<=` and `>=`.
fn inverted_operators(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let pair = s.line_tokens.windows(2).find(|pair| {
        pair[0].is_op("=") && (pair[1].is_op("<") || pair[1].is_op(">")) && touching(&pair[0], &pair[1])
    })?;
    let second = pair[1].text;
    Some(
        Classification::new(CauseCategory::InvertedOperators)
            .text("wrong", format!("={second}"))
            .text("right", format!("{second}=")),
    )
}

fn walrus_unsupported(s: &SyntaxCtx<'_>) -> Option<Classification> {
    s.line_tokens
        .iter()
        .any(|tok| tok.is_op(":="))
        .then(|| Classification::new(CauseCategory::WalrusUnsupported))
}

fn numbers<'t, 's>(s: &'t SyntaxCtx<'s>) -> impl Iterator<Item = &'t Token<'s>> {
    s.line_tokens.iter().filter(|tok| tok.kind == TokenKind::Number)
}

/// `0123`: decimal literals cannot have leading zeros.
fn leading_zero(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let number = numbers(s).find(|tok| {
        let text = tok.text;
        text.len() > 1
            && text.starts_with('0')
            && text.bytes().all(|b| b.is_ascii_digit() || b == b'_')
            && text.bytes().any(|b| (b'1'..=b'9').contains(&b))
    })?;
    let stripped = number.text.trim_start_matches(['0', '_']);
    let suggestion = if !number.text.contains('_') && stripped.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        format!("0o{stripped}")
    } else {
        stripped.to_owned()
    };
    Some(
        Classification::new(CauseCategory::LeadingZero)
            .text("number", number.text)
            .text("suggestion", suggestion),
    )
}

fn prefixed_digits<'t>(tok: &Token<'t>, prefixes: [&str; 2]) -> Option<&'t str> {
    prefixes.iter().find_map(|prefix| tok.text.strip_prefix(prefix))
}

fn invalid_hex_literal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let number = numbers(s).find(|tok| {
        prefixed_digits(tok, ["0x", "0X"]).is_some_and(|digits| {
            digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit() || b == b'_')
        })
    })?;
    Some(Classification::new(CauseCategory::InvalidHexLiteral).text("number", number.text))
}

fn invalid_octal_literal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let number = numbers(s).find(|tok| {
        prefixed_digits(tok, ["0o", "0O"]).is_some_and(|digits| {
            digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b) || b == b'_')
        })
    })?;
    Some(Classification::new(CauseCategory::InvalidOctalLiteral).text("number", number.text))
}

/// A number with a name glued to it, such as `3i` or `2pi`.
fn glued_name<'t, 's>(s: &'t SyntaxCtx<'s>) -> Option<(&'t Token<'s>, &'t Token<'s>)> {
    s.line_tokens
        .windows(2)
        .find(|pair| pair[0].kind == TokenKind::Number && pair[1].kind == TokenKind::Name && touching(&pair[0], &pair[1]))
        .map(|pair| (&pair[0], &pair[1]))
}

fn imaginary_i(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let (number, name) = glued_name(s)?;
    matches!(name.text, "i" | "I").then(|| {
        Classification::new(CauseCategory::ImaginaryI)
            .text("number", format!("{}{}", number.text, name.text))
            .text("suggestion", format!("{}j", number.text))
    })
}

fn identifier_starts_with_digit(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let (number, name) = glued_name(s)?;
    Some(
        Classification::new(CauseCategory::IdentifierStartsWithDigit)
            .text("name", format!("{}{}", number.text, name.text))
            .text("product", format!("{} * {}", number.text, name.text)),
    )
}

fn else_if(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let [first, second, ..] = s.line_tokens.as_slice() else {
        return None;
    };
    (first.is_name("else") && second.is_name("if")).then(|| Classification::new(CauseCategory::ElseIfInsteadOfElif))
}

fn elseif(s: &SyntaxCtx<'_>) -> Option<Classification> {
    starts_with_name(s, "elseif").then(|| Classification::new(CauseCategory::ElseifInsteadOfElif))
}

/// `print "hello"` from the days when `print` was a statement.
fn print_statement(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let [first, second, ..] = s.line_tokens.as_slice() else {
        return None;
    };
    (first.is_name("print") && second.is_atom()).then(|| Classification::new(CauseCategory::PrintIsFunction))
}

/// `raise ValueError, "message"`.
fn python2_raise(s: &SyntaxCtx<'_>) -> Option<Classification> {
    (starts_with_name(s, "raise") && top_level_op(&s.line_tokens, ","))
        .then(|| Classification::new(CauseCategory::Python2Raise))
}

fn def_missing_name(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let [first, second, ..] = statement(s) else {
        return None;
    };
    (first.is_name("def") && (second.is_op("(") || second.is_op(":")))
        .then(|| Classification::new(CauseCategory::DefMissingName))
}

fn class_missing_name(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let [first, second, ..] = s.line_tokens.as_slice() else {
        return None;
    };
    (first.is_name("class") && (second.is_op("(") || second.is_op(":")))
        .then(|| Classification::new(CauseCategory::ClassMissingName))
}

fn def_missing_parens(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let [first, name, third, ..] = statement(s) else {
        return None;
    };
    (first.is_name("def") && name.kind == TokenKind::Name && third.is_op(":")).then(|| {
        Classification::new(CauseCategory::DefMissingParens).text("name", name.text)
    })
}

fn keyword_as_attribute(s: &SyntaxCtx<'_>) -> Option<Classification> {
    if starts_with_name(s, "from") || starts_with_name(s, "import") {
        return None;
    }
    let pair = s
        .line_tokens
        .windows(2)
        .find(|pair| pair[0].is_op(".") && pair[1].kind == TokenKind::Name && is_keyword(pair[1].text))?;
    Some(Classification::new(CauseCategory::KeywordAsAttribute).text("keyword", pair[1].text))
}

fn is_import(s: &SyntaxCtx<'_>) -> bool {
    starts_with_name(s, "import") || (starts_with_name(s, "from") && s.line_tokens.iter().any(|tok| tok.is_name("import")))
}

fn and_in_import(s: &SyntaxCtx<'_>) -> Option<Classification> {
    (is_import(s) && s.line_tokens.iter().any(|tok| tok.is_name("and")))
        .then(|| Classification::new(CauseCategory::AndInImport))
}

fn trailing_comma_in_import(s: &SyntaxCtx<'_>) -> Option<Classification> {
    (is_import(s) && s.line_tokens.last().is_some_and(|tok| tok.is_op(",")))
        .then(|| Classification::new(CauseCategory::TrailingCommaInImport))
}

/// `my-name = 3`: a hyphenated name on the left of an assignment.
fn hyphen_in_name(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let tokens = s.line_tokens.as_slice();
    let mut parts = Vec::new();
    let mut i = 0;
    while let Some(tok) = tokens.get(i) {
        if tok.kind != TokenKind::Name || is_keyword(tok.text) {
            return None;
        }
        parts.push(tok.text);
        match tokens.get(i + 1) {
            Some(next) if next.is_op("-") => i += 2,
            Some(next) if next.is_op("=") && parts.len() > 1 => {
                return Some(Classification::new(CauseCategory::HyphenInName).text("name", parts.join("_")));
            }
            _ => return None,
        }
    }
    None
}

fn assign_instead_of_equal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let opens_condition = ["if", "elif", "while"].iter().any(|kw| starts_with_name(s, kw));
    (opens_condition && top_level_op(&s.line_tokens, "="))
        .then(|| Classification::new(CauseCategory::AssignInsteadOfEqual))
}

fn block_keyword(s: &SyntaxCtx<'_>) -> Option<&'static str> {
    let first = statement(s).first()?;
    BLOCK_KEYWORDS.iter().copied().find(|kw| first.is_name(kw))
}

fn semicolon_instead_of_colon(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let keyword = block_keyword(s)?;
    s.line_tokens.last().filter(|tok| tok.is_op(";")).map(|_| {
        Classification::new(CauseCategory::SemicolonInsteadOfColon).text("keyword", keyword)
    })
}

fn missing_colon(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let keyword = block_keyword(s)?;
    (!top_level_op(&s.line_tokens, ":")).then(|| {
        Classification::new(CauseCategory::MissingColon).text("keyword", keyword)
    })
}

/// `iff x:` or `whille x:`: an unknown first word directly followed by an
/// operand, close to a statement keyword.
fn misspelled_keyword(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let [first, second, ..] = s.line_tokens.as_slice() else {
        return None;
    };
    if first.kind != TokenKind::Name || is_keyword(first.text) || !second.is_atom() {
        return None;
    }
    let keyword = best_matches(first.text, STATEMENT_KEYWORDS.iter().copied(), 1, 0.75)
        .into_iter()
        .next()?;
    let start = s.line.len() - s.line.trim_start().len();
    let rest = s.line.get(start + first.text.len()..).unwrap_or_default();
    let fixed = format!("{keyword}{rest}");
    Some(
        Classification::new(CauseCategory::MisspelledKeyword)
            .text("word", first.text)
            .text("keyword", keyword)
            .text("fixed", fixed.trim_end()),
    )
}

/// Two operands side by side inside brackets.
fn missing_comma(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let mut depth = 0usize;
    let mut previous: Option<&Token<'_>> = None;
    for tok in &s.tokens {
        if tok.row > s.row {
            break;
        }
        if matches!(tok.kind, TokenKind::Comment | TokenKind::Newline) {
            continue;
        }
        if tok.kind == TokenKind::Op {
            match tok.text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if let Some(prev) = previous
            && depth > 0
            && tok.row == s.row
            && prev.is_atom()
            && tok.is_atom()
            && !(prev.kind == TokenKind::String && tok.kind == TokenKind::String)
            && !is_keyword(prev.text)
            && !is_keyword(tok.text)
        {
            return Some(
                Classification::new(CauseCategory::MissingComma)
                    .text("first", prev.text)
                    .text("second", tok.text),
            );
        }
        previous = Some(tok);
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        classify::first_match,
        fault::{CapturedFault, FaultKind, RuntimeVersion, SourceLocation},
        tracer::RecordingTracer,
    };

    fn run(line: &str, version: (u8, u8)) -> Option<Classification> {
        let location = SourceLocation {
            line_number: Some(1),
            line_text: Some(line.to_owned()),
            ..SourceLocation::default()
        };
        let version = RuntimeVersion::new(version.0, version.1);
        let fault = CapturedFault::new(FaultKind::SyntaxError, "invalid syntax").with_location(&location);
        let ctx = SyntaxCtx::new(&fault, version, None);
        first_match("syntax-token", RULES, &ctx, version, &mut RecordingTracer::new())
    }

    fn category(line: &str) -> Option<CauseCategory> {
        run(line, (3, 12)).map(|found| found.category)
    }

    fn param(line: &str, key: &str) -> Option<String> {
        run(line, (3, 12)).and_then(|found| found.params.text(key).map(str::to_owned))
    }

    #[test]
    fn not_code_at_all() {
        assert_eq!(category(">>> print(1)"), Some(CauseCategory::CopyPastedCode));
        assert_eq!(category("pip install requests"), Some(CauseCategory::PipInstall));
        assert_eq!(category("python -m pip install x"), Some(CauseCategory::PipInstall));
        assert_eq!(category("python script.py"), Some(CauseCategory::PythonCommand));
    }

    #[test]
    fn operators() {
        assert_eq!(category("if a === b:"), Some(CauseCategory::TripleEqual));
        assert_eq!(param("if a => b:", "right"), Some(">=".to_owned()));
        assert_eq!(category("if a == b:"), None);
    }

    #[test]
    fn numbers() {
        assert_eq!(param("x = 01", "suggestion"), Some("0o1".to_owned()));
        assert_eq!(param("x = 000_123_456", "suggestion"), Some("123_456".to_owned()));
        assert_eq!(param("z = 3.0i", "suggestion"), Some("3.0j".to_owned()));
        assert_eq!(param("tau = 2pi", "product"), Some("2 * pi".to_owned()));
        assert_eq!(category("x = 0x1G"), Some(CauseCategory::InvalidHexLiteral));
        assert_eq!(category("x = 0o18"), Some(CauseCategory::InvalidOctalLiteral));
        assert_eq!(category("x = 0"), None);
    }

    #[test]
    fn statements() {
        assert_eq!(category("else if x:"), Some(CauseCategory::ElseIfInsteadOfElif));
        assert_eq!(category("elseif x:"), Some(CauseCategory::ElseifInsteadOfElif));
        assert_eq!(category("print 'hello'"), Some(CauseCategory::PrintIsFunction));
        assert_eq!(category("raise ValueError, 'bad'"), Some(CauseCategory::Python2Raise));
        assert_eq!(category("def :"), Some(CauseCategory::DefMissingName));
        assert_eq!(category("class :"), Some(CauseCategory::ClassMissingName));
        assert_eq!(param("async def test:", "name"), Some("test".to_owned()));
        assert_eq!(param("a.pass = 1", "keyword"), Some("pass".to_owned()));
        assert_eq!(category("from math import sin and cos"), Some(CauseCategory::AndInImport));
        assert_eq!(category("from math import sin, cos,"), Some(CauseCategory::TrailingCommaInImport));
        assert_eq!(param("a-b = 2", "name"), Some("a_b".to_owned()));
    }

    #[test]
    fn colons() {
        assert_eq!(category("if x = 1:"), Some(CauseCategory::AssignInsteadOfEqual));
        assert_eq!(category("while True;"), Some(CauseCategory::SemicolonInsteadOfColon));
        assert_eq!(param("for i in range(3)", "keyword"), Some("for".to_owned()));
        assert_eq!(category("if f(lambda x: x):"), None);
    }

    #[test]
    fn misspelled_keyword_offers_fixed_line() {
        assert_eq!(param("iff i in range(3):", "fixed"), Some("if i in range(3):".to_owned()));
    }

    #[test]
    fn missing_comma_between_operands() {
        assert_eq!(param("a = [1 2]", "second"), Some("2".to_owned()));
        assert_eq!(category("a = ['implicit' 'concatenation']"), None);
    }

    #[test]
    fn walrus_depends_on_version() {
        assert_eq!(
            run("if (n := 10) > 5:", (3, 7)).map(|found| found.category),
            Some(CauseCategory::WalrusUnsupported)
        );
        assert_eq!(run("if (n := 10) > 5:", (3, 8)).map(|found| found.category), None);
    }

    #[test]
    fn fancy_quotes() {
        assert_eq!(param("a = \u{2018}hi\u{2019}", "meant"), Some("'".to_owned()));
    }
}
