//! Syntax rules keyed on the compiler's message.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    SyntaxCtx,
    brackets::bracket_name,
    character_cause,
    tokenize::{TokenKind, tokenize},
};
use crate::{
    category::{CauseCategory, Classification},
    classify::Rule,
    fault::{FaultKind, VersionRange},
    similarity::best_matches,
    stdlib::FUTURE_FEATURES,
};

type Check = fn(&SyntaxCtx<'_>) -> Option<Classification>;

const fn rule(name: &'static str, check: Check) -> Rule<Check> {
    Rule::new(name, check)
}

const fn only(name: &'static str, versions: VersionRange, check: Check) -> Rule<Check> {
    Rule::only(name, versions, check)
}

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("static pattern"));
    };
}

pattern!(NEVER_CLOSED, r"^'(?P<open>[(\[{])' was never closed");
pattern!(UNMATCHED, r"^unmatched '(?P<close>[)\]}])'");
pattern!(
    MISMATCHED,
    r"^closing parenthesis '(?P<close>[)\]}])' does not match opening parenthesis '(?P<open>[(\[{])'(?: on line (?P<open_line>\d+))?"
);
pattern!(KEYWORD_CONSTANT, r"^(?:cannot|can't) assign to (?P<keyword>True|False|None|__debug__)");
pattern!(LITERAL, r"^(?:cannot|can't) assign to (?:literal|dict display|set display|dict literal|set literal)");
pattern!(
    OPERATOR,
    r"^(?:cannot|can't) assign to (?:operator|expression|comparison|lambda|await expression|named expression)"
);
pattern!(
    SCOPE_ORDER,
    r"^name '(?P<name>[^']+)' is (?P<how>assigned to before|used prior to) (?P<scope>global|nonlocal) declaration"
);
pattern!(PARAMETER_AND, r"^name '(?P<name>[^']+)' is parameter and (?P<scope>global|nonlocal)");
pattern!(NONLOCAL_AND_GLOBAL, r"^name '(?P<name>[^']+)' is nonlocal and global");
pattern!(NO_BINDING, r"^no binding for nonlocal '(?P<name>[^']+)' found");
pattern!(DUPLICATE_ARGUMENT, r"^duplicate argument '(?P<name>[^']+)' in function definition");
pattern!(FUTURE_UNKNOWN, r"^future feature (?P<feature>\w+) is not defined");
pattern!(INVALID_CHARACTER, r"^invalid character '(?P<char>.)' \(U\+[0-9A-Fa-f]+\)");
pattern!(NON_PRINTABLE, r"^invalid non-printable character (?P<code>U\+[0-9A-Fa-f]+)");

pub(super) const RULES: &[Rule<Check>] = &[
    rule("tabs-and-spaces", tabs_and_spaces),
    rule("unindent-mismatch", unindent_mismatch),
    rule("missing-continuation", missing_continuation),
    rule("unexpected-indent", unexpected_indent),
    rule("missing-code-block", missing_code_block),
    rule("expected-indented-block", expected_indented_block),
    only("never-closed", VersionRange::since(3, 10), never_closed),
    rule("unmatched-closing", unmatched_closing),
    rule("mismatched-closing", mismatched_closing),
    only("unexpected-eof", VersionRange::before(3, 10), unexpected_eof),
    only("unterminated-triple-quote", VersionRange::since(3, 10), unterminated_triple_quote),
    only("eof-in-triple-quote", VersionRange::before(3, 10), eof_in_triple_quote),
    only("unterminated-string", VersionRange::since(3, 10), unterminated_string),
    only("eol-in-string", VersionRange::before(3, 10), eol_in_string),
    only("f-string-backslash", VersionRange::before(3, 12), f_string_backslash),
    rule("f-string-single-closing", f_string_single_closing),
    rule("f-string-expecting-closing", f_string_expecting_closing),
    rule("unicode-escape", unicode_escape),
    rule("print-is-function", print_is_function),
    rule("assign-to-keyword-constant", assign_to_keyword_constant),
    rule("assign-to-literal", assign_to_literal),
    rule("assign-to-function-call", assign_to_function_call),
    rule("assign-to-conditional", assign_to_conditional),
    rule("assign-to-generator", assign_to_generator),
    rule("assign-to-f-string", assign_to_f_string),
    rule("assign-to-yield", assign_to_yield),
    rule("assign-to-ellipsis", assign_to_ellipsis),
    rule("assign-instead-of-equal", assign_instead_of_equal),
    rule("assign-to-operator", assign_to_operator),
    rule("delete-function-call", delete_function_call),
    rule("delete-literal", delete_literal),
    rule("starred-expression", starred_expression),
    rule("break-outside-loop", break_outside_loop),
    rule("continue-outside-loop", continue_outside_loop),
    rule("return-outside-function", return_outside_function),
    rule("yield-outside-function", yield_outside_function),
    rule("await-outside-function", await_outside_function),
    rule("nonlocal-at-module", nonlocal_at_module),
    rule("no-binding-for-nonlocal", no_binding_for_nonlocal),
    rule("declaration-order", declaration_order),
    rule("parameter-and-declared", parameter_and_declared),
    rule("global-and-nonlocal", global_and_nonlocal),
    rule("duplicate-argument", duplicate_argument),
    rule("keyword-argument-repeated", keyword_argument_repeated),
    rule("positional-after-keyword", positional_after_keyword),
    only("non-default-argument", VersionRange::before(3, 12), non_default_argument),
    only("parameter-without-default", VersionRange::since(3, 12), parameter_without_default),
    rule("future-not-first", future_not_first),
    rule("future-braces", future_braces),
    rule("future-unknown", future_unknown),
    rule("too-many-nested-blocks", too_many_nested_blocks),
    only("too-many-parentheses", VersionRange::since(3, 9), too_many_parentheses),
    rule("trailing-comma-in-import", trailing_comma_in_import),
    only("invalid-character", VersionRange::since(3, 9), invalid_character),
    only("invalid-character-in-identifier", VersionRange::before(3, 9), invalid_character_in_identifier),
    only("non-printable-character", VersionRange::since(3, 9), non_printable_character),
    only("expected-colon", VersionRange::since(3, 10), expected_colon),
    only("perhaps-forgot-comma", VersionRange::since(3, 10), perhaps_forgot_comma),
];

fn when(found: bool, category: CauseCategory) -> Option<Classification> {
    found.then(|| Classification::new(category))
}

fn tabs_and_spaces(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        *s.kind == FaultKind::TabError || s.message.starts_with("inconsistent use of tabs and spaces"),
        CauseCategory::TabsAndSpaces,
    )
}

fn unindent_mismatch(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("unindent does not match any outer indentation level"),
        CauseCategory::UnindentMismatch,
    )
}

/// An indented line after one that ended in an operator: the author meant
/// the expression to continue and forgot the brackets or the `\`.
fn missing_continuation(s: &SyntaxCtx<'_>) -> Option<Classification> {
    if !s.message.starts_with("unexpected indent") {
        return None;
    }
    let previous = s.previous_line()?;
    let tokens = tokenize(previous);
    let last = tokens.iter().rev().find(|tok| tok.kind == TokenKind::Op || tok.is_atom())?;
    let dangling = match last.kind {
        TokenKind::Op => !matches!(last.text, ")" | "]" | "}" | ":"),
        _ => matches!(last.text, "and" | "or" | "not" | "in" | "is"),
    };
    dangling.then(|| Classification::new(CauseCategory::MissingContinuation))
}

fn unexpected_indent(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(s.message.starts_with("unexpected indent"), CauseCategory::UnexpectedIndent)
}

fn missing_code_block(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("expected an indented block") && s.at_end_of_source(),
        CauseCategory::MissingCodeBlock,
    )
}

fn expected_indented_block(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("expected an indented block"),
        CauseCategory::ExpectedIndentedBlock,
    )
}

fn never_closed(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = NEVER_CLOSED.captures(s.message)?;
    let open = &caps["open"];
    Some(
        Classification::new(CauseCategory::UnclosedBracket)
            .text("bracket", open)
            .text("bracket_name", bracket_name(open.chars().next()?))
            .text("line", s.line_number.to_string()),
    )
}

fn unmatched_closing(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = UNMATCHED.captures(s.message)?;
    let close = &caps["close"];
    Some(
        Classification::new(CauseCategory::UnmatchedClosingBracket)
            .text("bracket", close)
            .text("bracket_name", bracket_name(close.chars().next()?))
            .text("line", s.line_number.to_string()),
    )
}

fn mismatched_closing(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = MISMATCHED.captures(s.message)?;
    let open = &caps["open"];
    let close = &caps["close"];
    let open_line = caps
        .name("open_line")
        .map_or_else(|| s.line_number.to_string(), |m| m.as_str().to_owned());
    Some(
        Classification::new(CauseCategory::MismatchedBracket)
            .text("open", open)
            .text("open_name", bracket_name(open.chars().next()?))
            .text("open_line", open_line)
            .text("close", close)
            .text("close_name", bracket_name(close.chars().next()?))
            .text("line", s.line_number.to_string()),
    )
}

/// Older runtimes report every premature end of input the same way; the
/// bracket scan tells an unclosed bracket from a missing block.
fn unexpected_eof(s: &SyntaxCtx<'_>) -> Option<Classification> {
    if !s.message.starts_with("unexpected EOF while parsing") {
        return None;
    }
    Some(match s.bracket_issue(true) {
        Some(issue) => s.bracket_cause(issue),
        None => Classification::new(CauseCategory::MissingCodeBlock),
    })
}

fn unterminated_triple_quote(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("unterminated triple-quoted string literal"),
        CauseCategory::UnterminatedTripleQuote,
    )
}

fn eof_in_triple_quote(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("EOF while scanning triple-quoted string literal"),
        CauseCategory::UnterminatedTripleQuote,
    )
}

fn unterminated_string(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("unterminated string literal"),
        CauseCategory::UnterminatedString,
    )
}

fn eol_in_string(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("EOL while scanning string literal"),
        CauseCategory::UnterminatedString,
    )
}

fn f_string_backslash(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("f-string expression part cannot include a backslash"),
        CauseCategory::FStringBackslash,
    )
}

fn f_string_single_closing(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("f-string: single '}' is not allowed"),
        CauseCategory::FStringUnmatchedClosing,
    )
}

fn f_string_expecting_closing(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("f-string: expecting '}'"),
        CauseCategory::FStringExpectingClosing,
    )
}

fn unicode_escape(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("(unicode error) 'unicodeescape' codec can't decode bytes"),
        CauseCategory::UnicodeEscapeBackslash,
    )
}

fn print_is_function(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("Missing parentheses in call to 'print'"),
        CauseCategory::PrintIsFunction,
    )
}

fn assign_to_keyword_constant(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let keyword = if let Some(caps) = KEYWORD_CONSTANT.captures(s.message) {
        caps["keyword"].to_owned()
    } else if s.message.starts_with("assignment to keyword") {
        s.line_tokens
            .iter()
            .find(|tok| matches!(tok.text, "True" | "False" | "None" | "__debug__"))?
            .text
            .to_owned()
    } else {
        return None;
    };
    Some(Classification::new(CauseCategory::AssignToKeywordConstant).text("keyword", keyword))
}

/// Type of the literal a line starts with, as the runtime would name it.
fn literal_type(s: &SyntaxCtx<'_>) -> &'static str {
    let Some(first) = s.line_tokens.first() else {
        return "literal";
    };
    match first.kind {
        TokenKind::String => {
            if first.text.trim_start_matches(|c: char| c.is_ascii_alphabetic()).len() < first.text.len()
                && first.text.to_ascii_lowercase().contains('b')
            {
                "bytes"
            } else {
                "str"
            }
        }
        TokenKind::Number => {
            let lower = first.text.to_ascii_lowercase();
            if lower.ends_with('j') {
                "complex"
            } else if !lower.starts_with("0x") && (lower.contains('.') || lower.contains('e')) {
                "float"
            } else {
                "int"
            }
        }
        _ if first.is_op("{") => {
            let mut depth = 0usize;
            for tok in &s.line_tokens {
                match tok.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    ":" if depth == 1 => return "dict",
                    _ => {}
                }
            }
            "set"
        }
        _ => "literal",
    }
}

fn assign_to_literal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    if !LITERAL.is_match(s.message) {
        return None;
    }
    let target = s.assignment_target().unwrap_or("...");
    Some(
        Classification::new(CauseCategory::AssignToLiteral)
            .text("target", target)
            .text("type", literal_type(s)),
    )
}

fn assignment(s: &SyntaxCtx<'_>, what: &str, category: CauseCategory) -> Option<Classification> {
    let rest = s
        .message
        .strip_prefix("cannot assign to ")
        .or_else(|| s.message.strip_prefix("can't assign to "))?;
    rest.starts_with(what).then(|| {
        Classification::new(category).text("target", s.assignment_target().unwrap_or("..."))
    })
}

fn assign_to_function_call(s: &SyntaxCtx<'_>) -> Option<Classification> {
    assignment(s, "function call", CauseCategory::AssignToFunctionCall)
}

fn assign_to_conditional(s: &SyntaxCtx<'_>) -> Option<Classification> {
    assignment(s, "conditional expression", CauseCategory::AssignToConditional)
}

fn assign_to_generator(s: &SyntaxCtx<'_>) -> Option<Classification> {
    assignment(s, "generator expression", CauseCategory::AssignToGenerator)
}

fn assign_to_f_string(s: &SyntaxCtx<'_>) -> Option<Classification> {
    assignment(s, "f-string expression", CauseCategory::AssignToFString)
}

fn assign_to_yield(s: &SyntaxCtx<'_>) -> Option<Classification> {
    assignment(s, "yield expression", CauseCategory::AssignToYield)
}

fn assign_to_ellipsis(s: &SyntaxCtx<'_>) -> Option<Classification> {
    assignment(s, "Ellipsis", CauseCategory::AssignToEllipsis)
        .or_else(|| assignment(s, "ellipsis", CauseCategory::AssignToEllipsis))
}

fn assign_instead_of_equal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let message = s.message;
    when(
        message.contains("Maybe you meant '==' ")
            || message.starts_with("cannot assign to attribute here")
            || message.starts_with("expression cannot contain assignment, perhaps you meant \"==\""),
        CauseCategory::AssignInsteadOfEqual,
    )
}

fn assign_to_operator(s: &SyntaxCtx<'_>) -> Option<Classification> {
    OPERATOR.is_match(s.message).then(|| {
        Classification::new(CauseCategory::AssignToOperator).text("target", s.assignment_target().unwrap_or("..."))
    })
}

fn delete_function_call(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("cannot delete function call") || s.message.starts_with("can't delete function call"),
        CauseCategory::DeleteFunctionCall,
    )
}

fn delete_literal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("cannot delete literal") || s.message.starts_with("can't delete literal"),
        CauseCategory::DeleteLiteral,
    )
}

fn starred_expression(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let message = s.message;
    when(
        message.starts_with("can't use starred expression here")
            || message.starts_with("cannot use starred expression here")
            || message.starts_with("starred assignment target must be in a list or tuple")
            || message.starts_with("cannot use double starred expression here"),
        CauseCategory::StarredExpressionMisuse,
    )
}

fn break_outside_loop(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(s.message.starts_with("'break' outside loop"), CauseCategory::BreakOutsideLoop)
}

fn continue_outside_loop(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("'continue' not properly in loop"),
        CauseCategory::ContinueOutsideLoop,
    )
}

fn return_outside_function(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("'return' outside function"),
        CauseCategory::ReturnOutsideFunction,
    )
}

fn yield_outside_function(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("'yield' outside function"),
        CauseCategory::YieldOutsideFunction,
    )
}

fn await_outside_function(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("'await' outside function") || s.message.starts_with("'await' outside async function"),
        CauseCategory::AwaitOutsideFunction,
    )
}

fn nonlocal_at_module(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("nonlocal declaration not allowed at module level"),
        CauseCategory::NonlocalAtModule,
    )
}

fn no_binding_for_nonlocal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = NO_BINDING.captures(s.message)?;
    Some(Classification::new(CauseCategory::NoBindingForNonlocal).text("name", &caps["name"]))
}

fn declaration_order(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = SCOPE_ORDER.captures(s.message)?;
    let category = match (&caps["how"], &caps["scope"]) {
        ("assigned to before", "global") => CauseCategory::AssignedBeforeGlobal,
        ("assigned to before", _) => CauseCategory::AssignedBeforeNonlocal,
        (_, "global") => CauseCategory::UsedBeforeGlobal,
        _ => CauseCategory::UsedBeforeNonlocal,
    };
    Some(Classification::new(category).text("name", &caps["name"]))
}

fn parameter_and_declared(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = PARAMETER_AND.captures(s.message)?;
    let category = if &caps["scope"] == "global" {
        CauseCategory::ParameterAndGlobal
    } else {
        CauseCategory::ParameterAndNonlocal
    };
    Some(Classification::new(category).text("name", &caps["name"]))
}

fn global_and_nonlocal(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = NONLOCAL_AND_GLOBAL.captures(s.message)?;
    Some(Classification::new(CauseCategory::GlobalAndNonlocal).text("name", &caps["name"]))
}

fn duplicate_argument(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = DUPLICATE_ARGUMENT.captures(s.message)?;
    Some(Classification::new(CauseCategory::DuplicateArgument).text("name", &caps["name"]))
}

fn keyword_argument_repeated(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("keyword argument repeated"),
        CauseCategory::KeywordArgumentRepeated,
    )
}

fn positional_after_keyword(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("positional argument follows keyword argument"),
        CauseCategory::PositionalAfterKeyword,
    )
}

fn non_default_argument(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("non-default argument follows default argument"),
        CauseCategory::NonDefaultAfterDefault,
    )
}

fn parameter_without_default(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("parameter without a default follows parameter with a default"),
        CauseCategory::NonDefaultAfterDefault,
    )
}

fn future_not_first(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("from __future__ imports must occur at the beginning of the file"),
        CauseCategory::FutureNotFirst,
    )
}

fn future_braces(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(s.message.starts_with("not a chance"), CauseCategory::FutureBraces)
}

fn future_unknown(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = FUTURE_UNKNOWN.captures(s.message)?;
    let feature = &caps["feature"];
    let suggestions = best_matches(feature, FUTURE_FEATURES.iter().copied(), 1, 0.6);
    Some(
        Classification::new(CauseCategory::FutureUnknown)
            .text("feature", feature)
            .list("suggestions", suggestions)
            .list("features", FUTURE_FEATURES.iter().copied()),
    )
}

fn too_many_nested_blocks(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("too many statically nested blocks"),
        CauseCategory::TooManyNestedBlocks,
    )
}

fn too_many_parentheses(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("too many nested parentheses"),
        CauseCategory::TooManyParentheses,
    )
}

fn trailing_comma_in_import(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.starts_with("trailing comma not allowed without surrounding parentheses"),
        CauseCategory::TrailingCommaInImport,
    )
}

fn invalid_character(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = INVALID_CHARACTER.captures(s.message)?;
    caps["char"].chars().next().map(character_cause)
}

fn invalid_character_in_identifier(s: &SyntaxCtx<'_>) -> Option<Classification> {
    if !s.message.starts_with("invalid character in identifier") {
        return None;
    }
    let stray = s
        .line_tokens
        .iter()
        .find(|tok| tok.kind == TokenKind::Error)?;
    stray.text.chars().next().map(character_cause)
}

fn non_printable_character(s: &SyntaxCtx<'_>) -> Option<Classification> {
    let caps = NON_PRINTABLE.captures(s.message)?;
    Some(Classification::new(CauseCategory::NonPrintableCharacter).text("code", &caps["code"]))
}

fn expected_colon(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(s.message.starts_with("expected ':'"), CauseCategory::MissingColon)
}

fn perhaps_forgot_comma(s: &SyntaxCtx<'_>) -> Option<Classification> {
    when(
        s.message.ends_with("Perhaps you forgot a comma?"),
        CauseCategory::MissingComma,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classify::first_match,
        fault::{CapturedFault, RuntimeVersion, SourceLocation},
        tracer::RecordingTracer,
    };

    fn run(message: &str, line: &str, version: (u8, u8)) -> Option<Classification> {
        let location = SourceLocation {
            line_number: Some(1),
            line_text: Some(line.to_owned()),
            ..SourceLocation::default()
        };
        let version = RuntimeVersion::new(version.0, version.1);
        let fault = CapturedFault::new(FaultKind::SyntaxError, message).with_location(&location);
        let ctx = SyntaxCtx::new(&fault, version, None);
        first_match("syntax-message", RULES, &ctx, version, &mut RecordingTracer::new())
    }

    fn category(message: &str, line: &str, version: (u8, u8)) -> Option<CauseCategory> {
        run(message, line, version).map(|found| found.category)
    }

    #[test]
    fn wording_is_version_specific() {
        assert_eq!(
            category("'(' was never closed", "f(1", (3, 11)),
            Some(CauseCategory::UnclosedBracket)
        );
        assert_eq!(category("'(' was never closed", "f(1", (3, 9)), None);
        assert_eq!(
            category("EOL while scanning string literal", "s = 'a", (3, 8)),
            Some(CauseCategory::UnterminatedString)
        );
        assert_eq!(category("EOL while scanning string literal", "s = 'a", (3, 12)), None);
    }

    #[test]
    fn unexpected_eof_uses_the_bracket_scan() {
        let found = run("unexpected EOF while parsing", "print(a, [1, 2]", (3, 8)).expect("match");
        assert_eq!(found.category, CauseCategory::UnclosedBracket);
        assert_eq!(found.params.text("bracket"), Some("("));
        assert_eq!(
            category("unexpected EOF while parsing", "for i in x:", (3, 8)),
            Some(CauseCategory::MissingCodeBlock)
        );
    }

    #[test]
    fn mismatched_bracket_lines() {
        let found = run(
            "closing parenthesis ']' does not match opening parenthesis '(' on line 2",
            "    3]",
            (3, 11),
        )
        .expect("match");
        assert_eq!(found.params.text("open_line"), Some("2"));
        assert_eq!(found.params.text("close_name"), Some("square bracket"));
    }

    #[test]
    fn literal_assignment_names_the_type() {
        let found = run("cannot assign to literal", "1 = a", (3, 12)).expect("match");
        assert_eq!(found.params.text("type"), Some("int"));
        assert_eq!(found.params.text("target"), Some("1"));
        let found = run("cannot assign to literal", "{1: 2} = a", (3, 12)).expect("match");
        assert_eq!(found.params.text("type"), Some("dict"));
        let found = run("cannot assign to set display", "{1, 2} = a", (3, 12)).expect("match");
        assert_eq!(found.params.text("type"), Some("set"));
    }

    #[test]
    fn literal_here_outranks_instead_of_equal() {
        assert_eq!(
            category("cannot assign to literal here. Maybe you meant '==' instead of '='?", "if 1 = a:", (3, 10)),
            Some(CauseCategory::AssignToLiteral)
        );
        assert_eq!(
            category("invalid syntax. Maybe you meant '==' or ':=' instead of '='?", "if a = 1:", (3, 10)),
            Some(CauseCategory::AssignInsteadOfEqual)
        );
    }

    #[test]
    fn declaration_order_categories() {
        assert_eq!(
            category("name 'var' is used prior to global declaration", "global var", (3, 12)),
            Some(CauseCategory::UsedBeforeGlobal)
        );
        assert_eq!(
            category("name 's' is assigned to before nonlocal declaration", "nonlocal s", (3, 12)),
            Some(CauseCategory::AssignedBeforeNonlocal)
        );
    }

    #[test]
    fn future_typo_suggests_feature() {
        let found = run("future feature divisio is not defined", "from __future__ import divisio", (3, 12))
            .expect("match");
        assert_eq!(
            found.params.get("suggestions"),
            Some(&crate::category::ParamValue::List(vec!["division".to_owned()]))
        );
    }

    #[test]
    fn non_default_wording_changed() {
        assert_eq!(
            category("non-default argument follows default argument", "def f(a=1, b):", (3, 11)),
            Some(CauseCategory::NonDefaultAfterDefault)
        );
        assert_eq!(
            category(
                "parameter without a default follows parameter with a default",
                "def f(a=1, b):",
                (3, 12)
            ),
            Some(CauseCategory::NonDefaultAfterDefault)
        );
    }

    #[test]
    fn invalid_character_is_refined() {
        assert_eq!(
            category("invalid character '\u{201c}' (U+201C)", "a = \u{201c}hi\u{201d}", (3, 12)),
            Some(CauseCategory::FancyQuote)
        );
        assert_eq!(
            category("invalid character in identifier", "a = \u{bd}", (3, 8)),
            Some(CauseCategory::UnicodeFraction)
        );
    }
}
