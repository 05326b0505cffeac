//! Statement tree construction
//!
//! Translates the flat token list into the hierarchical statement tree the
//! flowchart renderer draws. The builder is a pure function of the token
//! slice and never fails: malformed or truncated input yields the best
//! partial tree available.
//!
//! Condition and value text are captured heuristically, not parsed: capture
//! runs until the next statement-starting keyword or until an identifier
//! immediately followed by `=` signals that the next statement has begun.
//! The heuristic can under-capture expressions that legitimately contain a
//! keyword-shaped identifier; that imprecision is accepted.

use crate::lexer::{Token, TokenKind};
use serde::Serialize;

/// One unit of the flowchart statement tree. Closed set: every node kind
/// the renderer must draw is enumerated here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Statement {
    Start,
    End,
    Declaration {
        name: String,
        value: Option<String>,
    },
    Assignment {
        name: String,
        expression: String,
    },
    Display {
        message: String,
    },
    Read {
        variable: String,
    },
    Conditional {
        condition: String,
        body: Vec<Statement>,
    },
    Loop {
        condition: String,
        body: Vec<Statement>,
    },
}

impl Statement {
    /// Nesting depth of this node: 1 for a leaf, 1 + deepest body for a
    /// conditional or loop.
    pub fn depth(&self) -> usize {
        match self {
            Statement::Conditional { body, .. } | Statement::Loop { body, .. } => {
                1 + body.iter().map(Statement::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }
}

/// Build the ordered statement tree from the full token list.
pub fn build(tokens: &[Token]) -> Vec<Statement> {
    build_range(tokens, 0, tokens.len())
}

/// Recursive body construction works on index ranges into the original
/// token list; only the recursion depth follows source nesting.
fn build_range(tokens: &[Token], lo: usize, hi: usize) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut i = lo;

    while i < hi {
        match tokens[i].kind {
            TokenKind::Inicio => {
                statements.push(Statement::Start);
                i += 1;
            }
            TokenKind::Fin => {
                statements.push(Statement::End);
                i += 1;
            }
            TokenKind::Var => {
                if i + 1 >= hi {
                    break;
                }
                let name = tokens[i + 1].text().to_string();

                if i + 3 < hi && tokens[i + 2].kind == TokenKind::Assign {
                    let expr_end = find_expression_end(tokens, i + 3, hi);
                    let value = join_text(tokens, i + 3, expr_end);
                    statements.push(Statement::Declaration {
                        name,
                        value: Some(value),
                    });
                    i = expr_end;
                } else {
                    statements.push(Statement::Declaration { name, value: None });
                    i += 2;
                }
            }
            TokenKind::Identifier => {
                if i + 2 < hi && tokens[i + 1].kind == TokenKind::Assign {
                    let name = tokens[i].text().to_string();
                    let expr_end = find_expression_end(tokens, i + 2, hi);
                    let expression = join_text(tokens, i + 2, expr_end);
                    statements.push(Statement::Assignment { name, expression });
                    i = expr_end;
                } else {
                    i += 1;
                }
            }
            TokenKind::Mostrar => {
                let message = if i + 1 < hi {
                    tokens[i + 1].text().to_string()
                } else {
                    String::new()
                };
                statements.push(Statement::Display { message });
                i += 2;
            }
            TokenKind::Leer => {
                let variable = if i + 1 < hi {
                    tokens[i + 1].text().to_string()
                } else {
                    String::new()
                };
                statements.push(Statement::Read { variable });
                i += 2;
            }
            TokenKind::Si => {
                let (condition, body, next) =
                    build_block(tokens, i, hi, TokenKind::Entonces, TokenKind::Si, TokenKind::FinSi);
                statements.push(Statement::Conditional { condition, body });
                i = next;
            }
            TokenKind::Mientras => {
                let (condition, body, next) = build_block(
                    tokens,
                    i,
                    hi,
                    TokenKind::Hacer,
                    TokenKind::Mientras,
                    TokenKind::FinMientras,
                );
                statements.push(Statement::Loop { condition, body });
                i = next;
            }
            _ => {
                // Directive tokens and anything else are not statements.
                i += 1;
            }
        }
    }

    statements
}

/// Shared construction for SI/MIENTRAS: capture the condition, locate the
/// body range, build it recursively, and return the cursor position past
/// the close keyword.
fn build_block(
    tokens: &[Token],
    at: usize,
    hi: usize,
    body_marker: TokenKind,
    open: TokenKind,
    close: TokenKind,
) -> (String, Vec<Statement>, usize) {
    let condition = read_condition(tokens, at, hi);

    match index_after(tokens, at, hi, body_marker) {
        Some(body_start) => {
            let body_end = find_block_end(tokens, body_start, hi, open, close);
            let body = if body_start < body_end {
                build_range(tokens, body_start, body_end)
            } else {
                Vec::new()
            };
            // Resume past the close keyword; an unmatched open already
            // consumed everything up to the range end.
            let next = if body_end < hi { body_end + 1 } else { hi };
            (condition, body, next)
        }
        // No body marker: emit the construct with an empty body and step
        // over the keyword alone.
        None => (condition, Vec::new(), at + 1),
    }
}

/// Condition text is the span strictly inside the nearest `( ... )` pair
/// after the keyword; missing parentheses yield an empty condition.
fn read_condition(tokens: &[Token], start: usize, hi: usize) -> String {
    let open = match index_after(tokens, start, hi, TokenKind::LeftParen) {
        Some(open) => open,
        None => return String::new(),
    };

    let close = (open..hi).find(|&j| tokens[j].kind == TokenKind::RightParen);
    match close {
        Some(close) => join_text(tokens, open, close),
        None => String::new(),
    }
}

/// Position immediately after the first occurrence of `target` in
/// `start..hi`.
fn index_after(tokens: &[Token], start: usize, hi: usize, target: TokenKind) -> Option<usize> {
    (start..hi)
        .find(|&j| tokens[j].kind == target)
        .map(|j| j + 1)
}

/// Depth-counted close-keyword matching: an explicit counter over the index
/// range, incremented on a nested open of the same construct and
/// decremented on close. Returns the close position, or `hi` when the
/// construct is unterminated.
fn find_block_end(tokens: &[Token], from: usize, hi: usize, open: TokenKind, close: TokenKind) -> usize {
    if from >= hi {
        return hi;
    }

    let mut depth = 0usize;
    for i in from..hi {
        if tokens[i].kind == open {
            depth += 1;
        } else if tokens[i].kind == close {
            if depth == 0 {
                return i;
            }
            depth -= 1;
        }
    }
    hi
}

/// Expression capture stops at the fixed statement-boundary keyword set or
/// at an identifier immediately followed by the assignment operator.
/// Shared with the grammar checker so both agree on where a value span
/// ends.
pub(crate) fn find_expression_end(tokens: &[Token], from: usize, hi: usize) -> usize {
    for i in from..hi {
        if tokens[i].kind.starts_statement() {
            return i;
        }
        if i > from
            && tokens[i].kind == TokenKind::Identifier
            && i + 1 < hi
            && tokens[i + 1].kind == TokenKind::Assign
        {
            return i;
        }
    }
    hi
}

/// Concatenate token literals in `start..end`, separated by single spaces.
fn join_text(tokens: &[Token], start: usize, end: usize) -> String {
    let mut text = String::new();
    for token in &tokens[start..end.min(tokens.len())] {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(token.text());
    }
    text.trim().to_string()
}
