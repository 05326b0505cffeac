//! Legacy grammar validation
//!
//! Statement-level checker that reproduces the acceptance of the original
//! CUP grammar, including its known gaps: it does not understand
//! comparison or logical operators inside expressions, shape/font literal
//! keywords as directive values, or commas outside a color triplet. Those
//! constructs are reported as unexpected tokens in the fixed pattern
//! `Token inesperado: '<text>' Línea: <l> Columna: <c>`; the compatibility
//! gates downstream decide whether tree construction may proceed anyway.
//!
//! The checker never fails: it collects error strings and keeps scanning.

use crate::ast;
use crate::lexer::{Token, TokenKind};

/// Validate the token list against the legacy grammar and return the
/// syntax error strings.
pub fn check(tokens: &[Token]) -> Vec<String> {
    let mut checker = GrammarChecker {
        tokens,
        pos: 0,
        errors: Vec::new(),
    };
    checker.run();
    checker.errors
}

struct GrammarChecker<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<String>,
}

impl<'a> GrammarChecker<'a> {
    fn run(&mut self) {
        while self.pos < self.tokens.len() {
            self.check_statement();
        }
    }

    fn check_statement(&mut self) {
        let kind = self.tokens[self.pos].kind;
        match kind {
            TokenKind::Inicio
            | TokenKind::Fin
            | TokenKind::FinSi
            | TokenKind::FinMientras
            | TokenKind::Separator => {
                self.pos += 1;
            }
            TokenKind::Var => self.check_declaration(),
            TokenKind::Identifier => self.check_assignment(),
            TokenKind::Mostrar | TokenKind::Leer => self.check_io(),
            TokenKind::Si => self.check_block_head(TokenKind::Entonces),
            TokenKind::Mientras => self.check_block_head(TokenKind::Hacer),
            TokenKind::Default => self.check_default(),
            TokenKind::StyleKey(_) => self.check_directive(kind.is_color_key()),
            _ => {
                // Operators, literals, ENTONCES/HACER and the rest have no
                // business at statement position.
                self.report_current();
                self.pos += 1;
            }
        }
    }

    /// `VAR id` or `VAR id = <expr>`
    fn check_declaration(&mut self) {
        self.pos += 1;
        if !self.expect(TokenKind::Identifier) {
            return;
        }
        if self.peek_kind() == Some(TokenKind::Assign) {
            self.pos += 1;
            self.check_expression();
        }
    }

    /// `id = <expr>`; a bare identifier is not a statement.
    fn check_assignment(&mut self) {
        if self.tokens.get(self.pos + 1).map(|t| t.kind) == Some(TokenKind::Assign) {
            self.pos += 2;
            self.check_expression();
        } else {
            self.report_current();
            self.pos += 1;
        }
    }

    /// `MOSTRAR <operand>` / `LEER <operand>`
    fn check_io(&mut self) {
        self.pos += 1;
        match self.peek_kind() {
            Some(
                TokenKind::StringLit
                | TokenKind::Identifier
                | TokenKind::Integer
                | TokenKind::Decimal,
            ) => {
                self.pos += 1;
            }
            Some(kind) => {
                self.report_current();
                // Leave statement starters for the main loop, as expect()
                // does, so the misplaced statement is still validated.
                if !kind.starts_statement() {
                    self.pos += 1;
                }
            }
            None => self.report_end_of_input(),
        }
    }

    /// `SI ( <cond> ) ENTONCES` / `MIENTRAS ( <cond> ) HACER`. Body
    /// statements are validated by the main loop; the close keyword is
    /// accepted there as well.
    fn check_block_head(&mut self, marker: TokenKind) {
        self.pos += 1;

        if self.peek_kind() != Some(TokenKind::LeftParen) {
            match self.peek_kind() {
                Some(_) => self.report_current(),
                None => self.report_end_of_input(),
            }
            self.resync_to_marker(marker);
            return;
        }
        self.pos += 1;

        let mut depth = 0usize;
        loop {
            let kind = match self.peek_kind() {
                Some(kind) => kind,
                None => {
                    self.report_end_of_input();
                    return;
                }
            };

            match kind {
                TokenKind::LeftParen => {
                    depth += 1;
                    self.pos += 1;
                }
                TokenKind::RightParen => {
                    self.pos += 1;
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ if Self::is_operand(kind) || kind.is_arithmetic() => {
                    self.pos += 1;
                }
                // The legacy grammar has no comparison, logical, comma or
                // shape/font productions inside a condition.
                _ if kind.is_comparison()
                    || kind == TokenKind::Comma
                    || kind.is_config_literal() =>
                {
                    self.report_current();
                    self.pos += 1;
                }
                _ if kind == marker => {
                    // Close parenthesis never arrived.
                    self.report_current();
                    self.pos += 1;
                    return;
                }
                _ => {
                    // A statement keyword inside the condition: the
                    // parenthesis was never closed. Leave the token for
                    // the main loop.
                    self.report_current();
                    return;
                }
            }
        }

        if self.peek_kind() == Some(marker) {
            self.pos += 1;
        } else {
            match self.peek_kind() {
                Some(kind) => {
                    self.report_current();
                    if !kind.starts_statement() {
                        self.pos += 1;
                    }
                }
                None => self.report_end_of_input(),
            }
        }
    }

    /// `DEFAULT = <entero>`
    fn check_default(&mut self) {
        self.pos += 1;
        if !self.expect(TokenKind::Assign) {
            return;
        }
        self.expect(TokenKind::Integer);
    }

    /// `KEY = <value tokens> | <entero>`. Color keys additionally accept
    /// commas between integer components; everything else the resolver can
    /// read (shape/font keywords) the legacy grammar rejects.
    fn check_directive(&mut self, color_key: bool) {
        self.pos += 1;
        if !self.expect(TokenKind::Assign) {
            return;
        }

        let mut value_seen = false;
        loop {
            let kind = match self.peek_kind() {
                Some(kind) => kind,
                None => {
                    self.report_end_of_input();
                    return;
                }
            };

            match kind {
                TokenKind::Bar => {
                    if !value_seen {
                        self.report_current();
                    }
                    self.pos += 1;
                    break;
                }
                _ if kind.starts_statement() => {
                    // Bar delimiter never arrived.
                    self.report_current();
                    return;
                }
                _ if Self::is_operand(kind) => {
                    value_seen = true;
                    self.pos += 1;
                }
                TokenKind::Comma if color_key => {
                    self.pos += 1;
                }
                _ => {
                    value_seen = true;
                    self.report_current();
                    self.pos += 1;
                }
            }
        }

        self.expect(TokenKind::Integer);
    }

    fn check_expression(&mut self) {
        let end = ast::find_expression_end(self.tokens, self.pos, self.tokens.len());
        if end == self.pos {
            if self.pos < self.tokens.len() {
                self.report_current();
            } else {
                self.report_end_of_input();
            }
            return;
        }

        while self.pos < end {
            let kind = self.tokens[self.pos].kind;
            let accepted = Self::is_operand(kind)
                || kind.is_arithmetic()
                || kind == TokenKind::LeftParen
                || kind == TokenKind::RightParen;
            if !accepted {
                self.report_current();
            }
            self.pos += 1;
        }
    }

    fn is_operand(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Identifier
                | TokenKind::Integer
                | TokenKind::Decimal
                | TokenKind::StringLit
        )
    }

    /// Consume the expected kind, or report the offending token. A token
    /// that starts a statement is left for the main loop.
    fn expect(&mut self, expected: TokenKind) -> bool {
        match self.peek_kind() {
            Some(kind) if kind == expected => {
                self.pos += 1;
                true
            }
            Some(kind) => {
                self.report_current();
                if !kind.starts_statement() {
                    self.pos += 1;
                }
                false
            }
            None => {
                self.report_end_of_input();
                false
            }
        }
    }

    /// Skip ahead to just past the body marker, or to the next statement
    /// keyword, whichever comes first.
    fn resync_to_marker(&mut self, marker: TokenKind) {
        while let Some(kind) = self.peek_kind() {
            if kind == marker {
                self.pos += 1;
                return;
            }
            if kind.starts_statement() {
                return;
            }
            self.pos += 1;
        }
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn report_current(&mut self) {
        let token = &self.tokens[self.pos];
        self.errors.push(format!(
            "Token inesperado: '{}' Línea: {} Columna: {}",
            token.error_text(),
            token.line,
            token.column
        ));
    }

    fn report_end_of_input(&mut self) {
        let (line, column) = self
            .tokens
            .last()
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1));
        self.errors.push(format!(
            "Token inesperado: 'EOF' Línea: {} Columna: {}",
            line, column
        ));
    }
}
