use lucid::{
    CapturedFault, CauseCategory, ExplainConfig, Explainer, Explanation, FaultKind, RecordingTracer, RuntimeVersion,
    SourceLocation, TraceEvent, classify_only,
};
use pretty_assertions::assert_eq;

fn located(source: &str, line: usize) -> SourceLocation {
    SourceLocation {
        file_path: "<test>".to_owned(),
        line_number: Some(line),
        source: Some(source.to_owned()),
        ..SourceLocation::default()
    }
}

fn explain_at(message: &str, source: &str, line: usize, version: RuntimeVersion) -> Explanation {
    let location = located(source, line);
    let fault = CapturedFault::new(FaultKind::SyntaxError, message)
        .with_location(&location)
        .with_version(version);
    Explainer::new().explain(&fault)
}

const PY312: RuntimeVersion = RuntimeVersion::new(3, 12);
const PY38: RuntimeVersion = RuntimeVersion::new(3, 8);

// === message rules ===

#[test]
fn never_closed_bracket() {
    let explanation = explain_at("'(' was never closed", "print(len(x)\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::UnclosedBracket);
    assert_eq!(explanation.cause, "The opening parenthesis `(` on line 1 is not closed.");
    assert_eq!(explanation.suggestion.as_deref(), Some("Did you forget a closing parenthesis?"));
}

#[test]
fn unexpected_eof_is_split_by_the_bracket_scan() {
    let bracket = explain_at("unexpected EOF while parsing", "total = [1, 2,\n", 2, PY38);
    assert_eq!(bracket.category, CauseCategory::UnclosedBracket);
    assert!(bracket.cause.contains("square bracket `[` on line 1"), "{}", bracket.cause);

    let block = explain_at("unexpected EOF while parsing", "if ready:\n", 2, PY38);
    assert_eq!(block.category, CauseCategory::MissingCodeBlock);
}

#[test]
fn version_gated_rules_are_not_checked_outside_their_range() {
    let location = located("x = (1,\n", 1);
    let fault = CapturedFault::new(FaultKind::SyntaxError, "'(' was never closed").with_location(&location);

    let mut new = Explainer::with_config(ExplainConfig::new().with_version(PY312)).with_tracer(RecordingTracer::new());
    assert_eq!(new.classify_only(&fault), CauseCategory::UnclosedBracket);
    assert_eq!(new.tracer().matched_rule(), Some("never-closed"));

    let mut old = Explainer::with_config(ExplainConfig::new().with_version(PY38)).with_tracer(RecordingTracer::new());
    assert_eq!(old.classify_only(&fault), CauseCategory::UnclosedBracket);
    assert!(!old.tracer().checked_rules().contains(&"never-closed"));
    assert_eq!(old.tracer().matched_rule(), Some("bracket-state"));
}

#[test]
fn mismatched_closing_bracket() {
    let explanation = explain_at(
        "closing parenthesis ']' does not match opening parenthesis '(' on line 1",
        "x = (1,\n 2]\n",
        2,
        PY312,
    );
    assert_eq!(explanation.category, CauseCategory::MismatchedBracket);
    assert_eq!(
        explanation.cause,
        "The closing square bracket `]` on line 2 does not match the opening parenthesis `(` on line 1."
    );
}

#[test]
fn expected_colon_without_keyword_detail() {
    let explanation = explain_at("expected ':'", "for i in range(3)\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::MissingColon);
    assert_eq!(
        explanation.cause,
        "You wrote a statement but forgot to add a colon `:` at the end."
    );
}

#[test]
fn fancy_quotes() {
    let explanation = explain_at(
        "invalid character '\u{201c}' (U+201C)",
        "print(\u{201c}hi\u{201d})\n",
        1,
        PY312,
    );
    assert_eq!(explanation.category, CauseCategory::FancyQuote);
    assert_eq!(
        explanation.suggestion.as_deref(),
        Some("Did you mean to use a normal quote character, `\"`?")
    );
}

#[test]
fn unknown_future_feature() {
    let explanation = explain_at(
        "future feature divsion is not defined",
        "from __future__ import divsion\n",
        1,
        PY312,
    );
    assert_eq!(explanation.category, CauseCategory::FutureUnknown);
    assert_eq!(explanation.suggestion.as_deref(), Some("Did you mean `division`?"));
    assert!(explanation.cause.contains("`annotations`"));
}

#[test]
fn assignment_targets() {
    let call = explain_at("cannot assign to function call here", "len(x) = 3\n", 1, PY312);
    assert_eq!(call.category, CauseCategory::AssignToFunctionCall);
    assert!(call.cause.starts_with("You wrote an expression like `len(x) = ...`"));

    let literal = explain_at("cannot assign to literal here", "1 = x\n", 1, PY312);
    assert_eq!(literal.category, CauseCategory::AssignToLiteral);
    assert!(literal.cause.contains("object of type `int`"), "{}", literal.cause);

    let constant = explain_at("cannot assign to True", "True = 1\n", 1, PY312);
    assert_eq!(constant.category, CauseCategory::AssignToKeywordConstant);
}

#[test]
fn indentation_faults() {
    let location = located("if x:\n", 2);
    let fault = CapturedFault::new(
        FaultKind::IndentationError,
        "expected an indented block after 'if' statement on line 1",
    )
    .with_location(&location);
    assert_eq!(classify_only(&fault), CauseCategory::MissingCodeBlock);

    let location = located("if x:\npass\n", 2);
    let fault = CapturedFault::new(
        FaultKind::IndentationError,
        "expected an indented block after 'if' statement on line 1",
    )
    .with_location(&location);
    assert_eq!(classify_only(&fault), CauseCategory::ExpectedIndentedBlock);

    let location = located("total = 1 +\n    2\n", 2);
    let fault = CapturedFault::new(FaultKind::IndentationError, "unexpected indent").with_location(&location);
    assert_eq!(classify_only(&fault), CauseCategory::MissingContinuation);
}

#[test]
fn scope_declarations_without_source() {
    let cases = [
        ("'break' outside loop", CauseCategory::BreakOutsideLoop),
        ("'return' outside function", CauseCategory::ReturnOutsideFunction),
        ("nonlocal declaration not allowed at module level", CauseCategory::NonlocalAtModule),
        ("name 'x' is assigned to before global declaration", CauseCategory::AssignedBeforeGlobal),
        ("name 'x' is used prior to nonlocal declaration", CauseCategory::UsedBeforeNonlocal),
        ("no binding for nonlocal 'x' found", CauseCategory::NoBindingForNonlocal),
        ("duplicate argument 'a' in function definition", CauseCategory::DuplicateArgument),
        ("positional argument follows keyword argument", CauseCategory::PositionalAfterKeyword),
    ];
    for (message, expected) in cases {
        let fault = CapturedFault::new(FaultKind::SyntaxError, message);
        assert_eq!(classify_only(&fault), expected, "{message}");
    }
}

#[test]
fn message_rules_without_source() {
    let cases = [
        ("unmatched ')'", CauseCategory::UnmatchedClosingBracket),
        ("cannot assign to operator", CauseCategory::AssignToOperator),
        ("cannot assign to conditional expression", CauseCategory::AssignToConditional),
        ("cannot assign to generator expression", CauseCategory::AssignToGenerator),
        ("cannot assign to f-string expression here", CauseCategory::AssignToFString),
        ("cannot assign to yield expression", CauseCategory::AssignToYield),
        ("cannot assign to Ellipsis", CauseCategory::AssignToEllipsis),
        ("cannot use starred expression here", CauseCategory::StarredExpressionMisuse),
        ("cannot delete function call", CauseCategory::DeleteFunctionCall),
        ("cannot delete literal", CauseCategory::DeleteLiteral),
        ("'continue' not properly in loop", CauseCategory::ContinueOutsideLoop),
        ("'yield' outside function", CauseCategory::YieldOutsideFunction),
        ("'await' outside function", CauseCategory::AwaitOutsideFunction),
        ("name 'x' is parameter and global", CauseCategory::ParameterAndGlobal),
        ("name 'x' is parameter and nonlocal", CauseCategory::ParameterAndNonlocal),
        ("name 'x' is nonlocal and global", CauseCategory::GlobalAndNonlocal),
        ("keyword argument repeated: end", CauseCategory::KeywordArgumentRepeated),
        (
            "from __future__ imports must occur at the beginning of the file",
            CauseCategory::FutureNotFirst,
        ),
        ("not a chance", CauseCategory::FutureBraces),
        ("too many statically nested blocks", CauseCategory::TooManyNestedBlocks),
        ("too many nested parentheses", CauseCategory::TooManyParentheses),
        ("invalid non-printable character U+00A0", CauseCategory::NonPrintableCharacter),
        (
            "unterminated triple-quoted string literal (detected at line 3)",
            CauseCategory::UnterminatedTripleQuote,
        ),
        ("f-string: single '}' is not allowed", CauseCategory::FStringUnmatchedClosing),
        ("f-string: expecting '}'", CauseCategory::FStringExpectingClosing),
        (
            "(unicode error) 'unicodeescape' codec can't decode bytes in position 2-3: truncated \\UXXXXXXXX escape",
            CauseCategory::UnicodeEscapeBackslash,
        ),
    ];
    for (message, expected) in cases {
        let fault = CapturedFault::new(FaultKind::SyntaxError, message).with_version(PY312);
        // a template missing a parameter degrades to unknown
        assert_eq!(lucid::explain(&fault).category, expected, "{message}");
    }
}

#[test]
fn f_string_backslash_only_before_3_12() {
    let message = "f-string expression part cannot include a backslash";
    let old = CapturedFault::new(FaultKind::SyntaxError, message).with_version(RuntimeVersion::new(3, 11));
    assert_eq!(classify_only(&old), CauseCategory::FStringBackslash);

    let new = CapturedFault::new(FaultKind::SyntaxError, message).with_version(PY312);
    assert_eq!(classify_only(&new), CauseCategory::Unknown);
}

#[test]
fn indentation_messages() {
    let location = located("x = 1\n    y = 2\n", 2);
    let fault = CapturedFault::new(FaultKind::IndentationError, "unexpected indent").with_location(&location);
    assert_eq!(classify_only(&fault), CauseCategory::UnexpectedIndent);

    let fault = CapturedFault::new(
        FaultKind::IndentationError,
        "unindent does not match any outer indentation level",
    );
    assert_eq!(classify_only(&fault), CauseCategory::UnindentMismatch);

    let fault = CapturedFault::new(FaultKind::TabError, "inconsistent use of tabs and spaces in indentation");
    assert_eq!(classify_only(&fault), CauseCategory::TabsAndSpaces);
}

// === token rules ===

#[test]
fn keyword_after_a_dot() {
    let explanation = explain_at("invalid syntax", "x = obj.class\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::KeywordAsAttribute);
    assert!(explanation.cause.contains("`class`"), "{}", explanation.cause);
}

#[test]
fn python2_backquotes() {
    let explanation = explain_at("invalid syntax", "a = `x`\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::Backquote);
    assert_eq!(
        explanation.suggestion.as_deref(),
        Some("To convert `x` into a string, use the function `repr(x)`.")
    );
}

#[test]
fn token_rules_on_invalid_syntax() {
    let cases = [
        ("else if x > 1:", CauseCategory::ElseIfInsteadOfElif),
        ("elseif x > 1:", CauseCategory::ElseifInsteadOfElif),
        ("if a === b:", CauseCategory::TripleEqual),
        (">>> print('hi')", CauseCategory::CopyPastedCode),
        ("pip install requests", CauseCategory::PipInstall),
        ("print 'hello'", CauseCategory::PrintIsFunction),
        ("if x = 3:", CauseCategory::AssignInsteadOfEqual),
        ("from math import sin and cos", CauseCategory::AndInImport),
        ("def (x):", CauseCategory::DefMissingName),
        ("raise ValueError, 'bad'", CauseCategory::Python2Raise),
    ];
    for (line, expected) in cases {
        let explanation = explain_at("invalid syntax", &format!("{line}\n"), 1, PY312);
        assert_eq!(explanation.category, expected, "{line}");
    }
}

#[test]
fn inverted_comparison_operator() {
    let explanation = explain_at("invalid syntax", "if a =< b:\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::InvertedOperators);
    assert!(explanation.cause.contains("The correct operator is `<=`."));
}

#[test]
fn number_literals() {
    let zero = explain_at(
        "leading zeros in decimal integer literals are not permitted; use an 0o prefix for octal integers",
        "mode = 0777\n",
        1,
        PY312,
    );
    assert_eq!(zero.category, CauseCategory::LeadingZero);
    assert_eq!(zero.suggestion.as_deref(), Some("Did you mean `0o777`?"));

    let imaginary = explain_at("invalid decimal literal", "z = 3i\n", 1, PY312);
    assert_eq!(imaginary.category, CauseCategory::ImaginaryI);
    assert_eq!(imaginary.suggestion.as_deref(), Some("Did you mean `3j`?"));

    let glued = explain_at("invalid decimal literal", "area = 2pi\n", 1, PY312);
    assert_eq!(glued.category, CauseCategory::IdentifierStartsWithDigit);
    assert_eq!(
        glued.suggestion.as_deref(),
        Some("Perhaps you forgot a multiplication operator, `2 * pi`.")
    );
}

#[test]
fn def_without_parentheses() {
    let explanation = explain_at("invalid syntax", "def greet:\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::DefMissingParens);
    assert!(explanation.cause.contains("function `greet`"));
    assert_eq!(explanation.suggestion.as_deref(), Some("Did you forget parentheses?"));
}

#[test]
fn hyphenated_name() {
    let explanation = explain_at("invalid syntax", "my-name = 3\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::HyphenInName);
    assert_eq!(explanation.suggestion.as_deref(), Some("Did you mean `my_name`?"));
}

#[test]
fn missing_colon_names_the_keyword() {
    let explanation = explain_at("invalid syntax", "for i in range(3)\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::MissingColon);
    assert!(explanation.cause.contains("beginning with `for`"), "{}", explanation.cause);
}

#[test]
fn semicolon_for_colon() {
    let explanation = explain_at("invalid syntax", "while True;\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::SemicolonInsteadOfColon);
    assert!(explanation.cause.ends_with("A `while` statement must end with a colon."));
}

#[test]
fn misspelled_keyword_gets_a_fixed_line() {
    let explanation = explain_at("invalid syntax", "whille x > 0:\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::MisspelledKeyword);
    assert_eq!(explanation.suggestion.as_deref(), Some("Did you mean `while x > 0:`?"));
}

#[test]
fn missing_comma_between_items() {
    let explanation = explain_at("invalid syntax", "a = [1 2]\n", 1, PY312);
    assert_eq!(explanation.category, CauseCategory::MissingComma);
    assert!(explanation.cause.ends_with("between `1` and `2`."), "{}", explanation.cause);

    let from_message = explain_at("invalid syntax. Perhaps you forgot a comma?", "a = [1 2]\n", 1, PY312);
    assert_eq!(from_message.category, CauseCategory::MissingComma);
    assert_eq!(from_message.cause, "Python could not understand the code.");
}

// === missing or partial source ===

#[test]
fn line_text_alone_feeds_the_token_rules() {
    let location = SourceLocation {
        file_path: "<stdin>".to_owned(),
        line_number: Some(4),
        line_text: Some("else if x:".to_owned()),
        ..SourceLocation::default()
    };
    let fault = CapturedFault::new(FaultKind::SyntaxError, "invalid syntax").with_location(&location);
    let mut explainer = Explainer::new().with_tracer(RecordingTracer::new());
    assert_eq!(explainer.classify_only(&fault), CauseCategory::ElseIfInsteadOfElif);
    assert!(
        explainer
            .tracer()
            .events()
            .iter()
            .any(|event| matches!(event, TraceEvent::SourceUnavailable { path } if path == "<stdin>"))
    );
}

#[test]
fn unreadable_file_keeps_message_rules() {
    let location = SourceLocation {
        file_path: "/no/such/dir/program.py".to_owned(),
        line_number: Some(3),
        ..SourceLocation::default()
    };
    let fault = CapturedFault::new(FaultKind::SyntaxError, "'return' outside function").with_location(&location);
    let mut explainer = Explainer::new().with_tracer(RecordingTracer::new());
    let explanation = explainer.explain(&fault);
    assert_eq!(explanation.category, CauseCategory::ReturnOutsideFunction);
    assert!(
        explainer
            .tracer()
            .events()
            .iter()
            .any(|event| matches!(event, TraceEvent::SourceUnavailable { .. }))
    );
}

#[test]
fn source_files_are_not_read_when_disabled() {
    let location = SourceLocation {
        file_path: "/no/such/dir/program.py".to_owned(),
        line_number: Some(1),
        ..SourceLocation::default()
    };
    let fault = CapturedFault::new(FaultKind::SyntaxError, "invalid syntax").with_location(&location);
    let mut explainer =
        Explainer::with_config(ExplainConfig::new().with_source_files(false)).with_tracer(RecordingTracer::new());
    assert_eq!(explainer.classify_only(&fault), CauseCategory::Unknown);
    assert!(explainer.tracer().events().iter().all(|event| !matches!(event, TraceEvent::SourceUnavailable { .. })));
}

#[test]
fn bare_invalid_syntax_is_unknown() {
    let fault = CapturedFault::new(FaultKind::SyntaxError, "invalid syntax");
    let explanation = lucid::explain(&fault);
    assert_eq!(explanation.category, CauseCategory::Unknown);
    assert_eq!(explanation.cause, "Currently, I cannot guess the likely cause of this error.");
}
