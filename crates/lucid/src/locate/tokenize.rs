//! Error-tolerant tokenizer for source snippets.
//!
//! Unlike a compiler front end this never fails: anything it cannot place
//! becomes an [`TokenKind::Error`] token and scanning resumes after it, which
//! is exactly what is needed when the input is known to be malformed.

/// Kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Name,
    Number,
    String,
    /// A string literal whose closing quote never came.
    UnterminatedString,
    Op,
    Comment,
    /// End of a logical line.
    Newline,
    /// A character that starts no token, e.g. `$` or a fancy quote.
    Error,
}

/// A token borrowing its text from the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'s> {
    pub kind: TokenKind,
    pub text: &'s str,
    /// 1-based line.
    pub row: usize,
    /// 0-based character column.
    pub col: usize,
}

impl Token<'_> {
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text == op
    }

    pub fn is_name(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && self.text == name
    }

    /// Names, numbers and strings: things that can stand alone as an operand.
    pub fn is_atom(&self) -> bool {
        matches!(self.kind, TokenKind::Name | TokenKind::Number | TokenKind::String)
    }
}

/// Operators, longest first so that `**=` wins over `**` and `*`.
const OPERATORS: &[&str] = &[
    "**=", "//=", "<<=", ">>=", "...", "==", "!=", "<=", ">=", "**", "//", "<<", ">>", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "@=", "->", ":=", "<>", "(", ")", "[", "]", "{", "}", ":", ",", ";", "+", "-", "*", "/", "|",
    "&", "<", ">", "=", ".", "%", "~", "^", "@", "!", "\\",
];

const STRING_PREFIXES: &[&str] = &[
    "rb", "br", "Rb", "bR", "RB", "BR", "rB", "Br", "fr", "rf", "Fr", "fR", "FR", "RF", "rF", "Rf", "r", "u", "b", "f",
    "R", "U", "B", "F",
];

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Tokenizes `source`. Newlines inside brackets or after a `\` continuation
/// do not end the logical line.
pub(crate) fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut row = 1usize;
    let mut line_start = 0usize;
    let mut i = 0usize;
    let mut saw_code = false;

    while i < source.len() {
        let Some(ch) = source[i..].chars().next() else {
            break;
        };
        let col = source[line_start..i].chars().count();

        if ch == '\n' {
            if depth == 0 && saw_code {
                out.push(Token {
                    kind: TokenKind::Newline,
                    text: &source[i..=i],
                    row,
                    col,
                });
                saw_code = false;
            }
            i += 1;
            row += 1;
            line_start = i;
            continue;
        }

        if matches!(ch, ' ' | '\t' | '\x0c' | '\r') {
            i += ch.len_utf8();
            continue;
        }

        if ch == '#' {
            let end = source[i..].find('\n').map_or(source.len(), |n| i + n);
            out.push(Token {
                kind: TokenKind::Comment,
                text: &source[i..end],
                row,
                col,
            });
            i = end;
            continue;
        }

        if ch == '\\' && source[i + 1..].starts_with(['\n', '\r']) {
            // explicit line continuation
            let newline = source[i..].find('\n').map_or(source.len(), |n| i + n);
            i = newline + 1;
            row += 1;
            line_start = i;
            continue;
        }

        saw_code = true;

        if let Some(prefix_len) = string_prefix_len(&source[i..]) {
            let (end, kind, rows) = scan_string(source, i + prefix_len);
            out.push(Token {
                kind,
                text: &source[i..end],
                row,
                col,
            });
            if rows > 0 {
                row += rows;
                line_start = source[..end].rfind('\n').map_or(line_start, |n| n + 1);
            }
            i = end;
            continue;
        }

        if is_ident_start(ch) {
            let end = source[i..]
                .char_indices()
                .find(|&(_, c)| !is_ident_continue(c))
                .map_or(source.len(), |(n, _)| i + n);
            out.push(Token {
                kind: TokenKind::Name,
                text: &source[i..end],
                row,
                col,
            });
            i = end;
            continue;
        }

        if ch.is_ascii_digit() || (ch == '.' && source[i + 1..].starts_with(|c: char| c.is_ascii_digit())) {
            let end = scan_number(source, i);
            out.push(Token {
                kind: TokenKind::Number,
                text: &source[i..end],
                row,
                col,
            });
            i = end;
            continue;
        }

        if let Some(op) = OPERATORS.iter().find(|op| source[i..].starts_with(**op)) {
            match *op {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
            let end = i + op.len();
            out.push(Token {
                kind: TokenKind::Op,
                text: &source[i..end],
                row,
                col,
            });
            i = end;
            continue;
        }

        let end = i + ch.len_utf8();
        out.push(Token {
            kind: TokenKind::Error,
            text: &source[i..end],
            row,
            col,
        });
        i = end;
    }

    if saw_code {
        out.push(Token {
            kind: TokenKind::Newline,
            text: "",
            row,
            col: source[line_start..].chars().count(),
        });
    }
    out
}

/// Length of a string prefix (possibly empty) followed by a quote.
fn string_prefix_len(rest: &str) -> Option<usize> {
    if rest.starts_with(['\'', '"']) {
        return Some(0);
    }
    STRING_PREFIXES
        .iter()
        .find(|prefix| rest.starts_with(**prefix) && rest[prefix.len()..].starts_with(['\'', '"']))
        .map(|prefix| prefix.len())
}

/// Scans the string literal whose opening quote is at `start`.
///
/// Returns the end offset, the token kind and how many newlines the literal
/// spans. A single-quoted string stops at the end of its line.
fn scan_string(source: &str, start: usize) -> (usize, TokenKind, usize) {
    let rest = &source[start..];
    let quote = if rest.starts_with('"') { '"' } else { '\'' };
    let triple = if quote == '"' { "\"\"\"" } else { "'''" };
    let is_triple = rest.starts_with(triple);
    let mut i = start + if is_triple { 3 } else { 1 };
    let mut rows = 0usize;
    let mut escaped = false;

    while i < source.len() {
        let Some(ch) = source[i..].chars().next() else {
            break;
        };
        if escaped {
            escaped = false;
            if ch == '\n' {
                rows += 1;
            }
            i += ch.len_utf8();
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\n' if !is_triple => return (i, TokenKind::UnterminatedString, rows),
            '\n' => rows += 1,
            c if c == quote => {
                if !is_triple {
                    return (i + 1, TokenKind::String, rows);
                }
                if source[i..].starts_with(triple) {
                    return (i + 3, TokenKind::String, rows);
                }
            }
            _ => {}
        }
        i += ch.len_utf8();
    }
    (source.len(), TokenKind::UnterminatedString, rows)
}

/// Scans a numeric literal, including a trailing identifier tail such as the
/// `rd` of `3rd`, which the caller inspects.
fn scan_number(source: &str, start: usize) -> usize {
    let bytes = source.as_bytes();
    let mut i = start;
    if bytes[i] == b'0' && bytes.get(i + 1).is_some_and(|b| matches!(b, b'x' | b'X' | b'o' | b'O' | b'b' | b'B')) {
        i += 2;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        return i;
    }
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
            i += 1;
        }
    }
    if i < bytes.len()
        && matches!(bytes[i], b'e' | b'E')
        && bytes.get(i + 1).is_some_and(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-'))
    {
        i += 2;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && matches!(bytes[i], b'j' | b'J') {
        i += 1;
    }
    i
}

/// Tokens of `tokens` that are on `row`, without comments and newlines.
pub(crate) fn significant_on_row<'t, 's>(tokens: &'t [Token<'s>], row: usize) -> Vec<Token<'s>> {
    tokens
        .iter()
        .filter(|tok| tok.row == row && !matches!(tok.kind, TokenKind::Comment | TokenKind::Newline))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source).into_iter().map(|tok| (tok.kind, tok.text)).collect()
    }

    #[test]
    fn basic_statement() {
        assert_eq!(
            kinds("x = foo(1, 'a')"),
            vec![
                (TokenKind::Name, "x"),
                (TokenKind::Op, "="),
                (TokenKind::Name, "foo"),
                (TokenKind::Op, "("),
                (TokenKind::Number, "1"),
                (TokenKind::Op, ","),
                (TokenKind::String, "'a'"),
                (TokenKind::Op, ")"),
                (TokenKind::Newline, ""),
            ]
        );
    }

    #[test]
    fn longest_operator_wins() {
        let toks = kinds("a === b");
        assert_eq!(toks[1], (TokenKind::Op, "=="));
        assert_eq!(toks[2], (TokenKind::Op, "="));
    }

    #[test]
    fn prefixed_and_unterminated_strings() {
        assert_eq!(kinds("f'{x}'")[0], (TokenKind::String, "f'{x}'"));
        assert_eq!(kinds("s = 'abc")[2], (TokenKind::UnterminatedString, "'abc"));
    }

    #[test]
    fn triple_quoted_string_spans_lines() {
        let toks = tokenize("s = '''a\nb'''\nx");
        let last = toks.iter().find(|tok| tok.text == "x").expect("x token");
        assert_eq!(last.row, 3);
        assert_eq!(toks[2].kind, TokenKind::String);
    }

    #[test]
    fn brackets_join_lines() {
        let newlines = tokenize("a = (1,\n 2)\nb")
            .iter()
            .filter(|tok| tok.kind == TokenKind::Newline)
            .count();
        assert_eq!(newlines, 2);
    }

    #[test]
    fn unknown_characters_are_error_tokens() {
        assert_eq!(kinds("a = \u{201c}hi\u{201d}")[2], (TokenKind::Error, "\u{201c}"));
    }

    #[test]
    fn number_with_identifier_tail() {
        let toks = kinds("3rd = 4");
        assert_eq!(toks[0], (TokenKind::Number, "3"));
        assert_eq!(toks[1], (TokenKind::Name, "rd"));
        assert_eq!(kinds("0x1G")[0], (TokenKind::Number, "0x1G"));
    }
}
