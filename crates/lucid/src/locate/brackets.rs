//! Open-bracket tracking over a token stream.

use super::tokenize::{Token, TokenKind};

/// First structural bracket problem found in a token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BracketIssue {
    /// An opening bracket still open at the end of the tokens. The innermost
    /// one is reported, which is the one the compiler gives up on.
    Unclosed { open: char, row: usize },
    /// A closing bracket with nothing open.
    Unmatched { close: char, row: usize },
    /// A closing bracket of the wrong shape for the innermost open one.
    Mismatched {
        open: char,
        open_row: usize,
        close: char,
        row: usize,
    },
}

fn closer_of(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Human name of a bracket character, as used in explanations.
pub(crate) fn bracket_name(bracket: char) -> &'static str {
    match bracket {
        '(' | ')' => "parenthesis",
        '[' | ']' => "square bracket",
        _ => "curly bracket",
    }
}

/// Scans `tokens` in order. Tokens past `stop_row` are ignored so that an
/// error on an early line is not blamed on code after it.
pub(crate) fn scan(tokens: &[Token<'_>], stop_row: Option<usize>) -> Option<BracketIssue> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    for tok in tokens {
        if stop_row.is_some_and(|stop| tok.row > stop) {
            break;
        }
        if tok.kind != TokenKind::Op {
            continue;
        }
        let Some(ch) = tok.text.chars().next().filter(|_| tok.text.len() == 1) else {
            continue;
        };
        match ch {
            '(' | '[' | '{' => stack.push((ch, tok.row)),
            ')' | ']' | '}' => match stack.pop() {
                None => return Some(BracketIssue::Unmatched { close: ch, row: tok.row }),
                Some((open, open_row)) if closer_of(open) != ch => {
                    return Some(BracketIssue::Mismatched {
                        open,
                        open_row,
                        close: ch,
                        row: tok.row,
                    });
                }
                Some(_) => {}
            },
            _ => {}
        }
    }
    stack
        .pop()
        .map(|(open, row)| BracketIssue::Unclosed { open, row })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::tokenize::tokenize;

    #[test]
    fn balanced_source_has_no_issue() {
        assert_eq!(scan(&tokenize("f(a[1], {2: 3})"), None), None);
    }

    #[test]
    fn reports_innermost_unclosed() {
        let tokens = tokenize("x = (1,\n [2,\n 3\n");
        assert_eq!(scan(&tokens, None), Some(BracketIssue::Unclosed { open: '[', row: 2 }));
    }

    #[test]
    fn unmatched_closing() {
        assert_eq!(
            scan(&tokenize("a = 1)\n"), None),
            Some(BracketIssue::Unmatched { close: ')', row: 1 })
        );
    }

    #[test]
    fn mismatched_closing() {
        assert_eq!(
            scan(&tokenize("a = (1,\n 2]\n"), None),
            Some(BracketIssue::Mismatched {
                open: '(',
                open_row: 1,
                close: ']',
                row: 2,
            })
        );
    }

    #[test]
    fn brackets_inside_strings_are_ignored() {
        assert_eq!(scan(&tokenize("s = '(' + \"]\""), None), None);
    }

    #[test]
    fn stop_row_limits_the_scan() {
        let tokens = tokenize("a = 1\nb = (\n");
        assert_eq!(scan(&tokens, Some(1)), None);
    }
}
