//! Lexical analysis for the Spanish pseudocode language
//!
//! Produces the flat token list every later phase consumes. Lexical errors
//! are collected, not thrown: the scanner skips the offending character and
//! keeps going, and each error string embeds `Línea:`/`Columna:` metadata in
//! the fixed pattern the report builder parses back out.

use crate::style::StyleKey;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // Statement keywords
    Inicio,
    Fin,
    Var,
    Mostrar,
    Leer,
    Si,
    Entonces,
    FinSi,
    Mientras,
    Hacer,
    FinMientras,

    // Punctuation
    Assign,     // =
    LeftParen,  // (
    RightParen, // )
    Bar,        // |
    Comma,      // ,
    Separator,  // ;

    // Arithmetic operators
    Plus,
    Minus,
    Star,
    Slash,

    // Comparison and logical operators
    Equal,        // ==
    NotEqual,     // !=
    Greater,      // >
    Less,         // <
    GreaterEqual, // >=
    LessEqual,    // <=
    And,          // &&
    Or,           // ||
    Not,          // !

    // Literals
    Integer,
    Decimal,
    StringLit,
    Identifier,

    // Style directives
    Default,
    StyleKey(StyleKey),

    // Shape literals
    Elipse,
    Circulo,
    Paralelogramo,
    Rectangulo,
    Rombo,
    RectanguloRedondeado,

    // Font literals
    Arial,
    TimesNewRoman,
    ComicSans,
    Verdana,
}

impl TokenKind {
    /// Statement-starting and style-directive keywords: the fixed boundary
    /// set shared by expression capture and the grammar checker.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Inicio
                | TokenKind::Fin
                | TokenKind::Var
                | TokenKind::Mostrar
                | TokenKind::Leer
                | TokenKind::Si
                | TokenKind::Mientras
                | TokenKind::FinSi
                | TokenKind::FinMientras
                | TokenKind::Separator
                | TokenKind::Default
                | TokenKind::StyleKey(_)
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::Greater
                | TokenKind::Less
                | TokenKind::GreaterEqual
                | TokenKind::LessEqual
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
        )
    }

    pub fn is_shape_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Elipse
                | TokenKind::Circulo
                | TokenKind::Paralelogramo
                | TokenKind::Rectangulo
                | TokenKind::Rombo
                | TokenKind::RectanguloRedondeado
        )
    }

    pub fn is_font_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Arial | TokenKind::TimesNewRoman | TokenKind::ComicSans | TokenKind::Verdana
        )
    }

    /// A shape or font keyword used as a directive value.
    pub fn is_config_literal(self) -> bool {
        self.is_shape_literal() || self.is_font_literal()
    }

    /// A style key whose value is a shape or font literal.
    pub fn is_shape_font_key(self) -> bool {
        match self {
            TokenKind::StyleKey(key) => matches!(
                key.aspect(),
                crate::style::StyleAspect::Shape | crate::style::StyleAspect::Font
            ),
            _ => false,
        }
    }

    /// A style key whose value is a color.
    pub fn is_color_key(self) -> bool {
        match self {
            TokenKind::StyleKey(key) => key.is_color(),
            _ => false,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Inicio => "INICIO",
            TokenKind::Fin => "FIN",
            TokenKind::Var => "VAR",
            TokenKind::Mostrar => "MOSTRAR",
            TokenKind::Leer => "LEER",
            TokenKind::Si => "SI",
            TokenKind::Entonces => "ENTONCES",
            TokenKind::FinSi => "FINSI",
            TokenKind::Mientras => "MIENTRAS",
            TokenKind::Hacer => "HACER",
            TokenKind::FinMientras => "FINMIENTRAS",
            TokenKind::Assign => "=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Bar => "|",
            TokenKind::Comma => ",",
            TokenKind::Separator => ";",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LessEqual => "<=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::Integer => "entero",
            TokenKind::Decimal => "decimal",
            TokenKind::StringLit => "cadena",
            TokenKind::Identifier => "identificador",
            TokenKind::Default => "DEFAULT",
            TokenKind::StyleKey(key) => key.keyword(),
            TokenKind::Elipse => "ELIPSE",
            TokenKind::Circulo => "CIRCULO",
            TokenKind::Paralelogramo => "PARALELOGRAMO",
            TokenKind::Rectangulo => "RECTANGULO",
            TokenKind::Rombo => "ROMBO",
            TokenKind::RectanguloRedondeado => "RECTANGULO_REDONDEADO",
            TokenKind::Arial => "ARIAL",
            TokenKind::TimesNewRoman => "TIMES_NEW_ROMAN",
            TokenKind::ComicSans => "COMIC_SANS",
            TokenKind::Verdana => "VERDANA",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// The token's literal text, empty when it carries none.
    pub fn text(&self) -> &str {
        self.literal.as_deref().unwrap_or("")
    }

    /// Text used in `Token inesperado: '...'` diagnostics: the literal when
    /// present, otherwise the keyword/operator spelling.
    pub fn error_text(&self) -> String {
        match &self.literal {
            Some(text) => text.clone(),
            None => self.kind.to_string(),
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    errors: Vec<String>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn tokenize(&mut self) -> &[Token] {
        while !self.is_at_end() {
            self.next_token();
        }
        &self.tokens
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn lexical_errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_parts(self) -> (Vec<Token>, Vec<String>) {
        (self.tokens, self.errors)
    }

    fn next_token(&mut self) {
        self.skip_whitespace_and_comments();
        if self.is_at_end() {
            return;
        }

        let line = self.line;
        let column = self.column;
        let ch = self.peek();

        if ch.is_ascii_digit() {
            self.scan_number(line, column);
            return;
        }
        if ch == '"' {
            self.scan_string(line, column);
            return;
        }
        if ch.is_ascii_alphabetic() || ch == '_' {
            self.scan_word(line, column);
            return;
        }

        self.advance();
        match ch {
            '=' => {
                if self.match_char('=') {
                    self.push_op(TokenKind::Equal, "==", line, column);
                } else {
                    self.push(TokenKind::Assign, None, line, column);
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.push_op(TokenKind::NotEqual, "!=", line, column);
                } else {
                    self.push_op(TokenKind::Not, "!", line, column);
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.push_op(TokenKind::GreaterEqual, ">=", line, column);
                } else {
                    self.push_op(TokenKind::Greater, ">", line, column);
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.push_op(TokenKind::LessEqual, "<=", line, column);
                } else {
                    self.push_op(TokenKind::Less, "<", line, column);
                }
            }
            '&' => {
                if self.match_char('&') {
                    self.push_op(TokenKind::And, "&&", line, column);
                } else {
                    self.error_at('&', line, column);
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.push_op(TokenKind::Or, "||", line, column);
                } else {
                    self.push(TokenKind::Bar, None, line, column);
                }
            }
            '+' => self.push_op(TokenKind::Plus, "+", line, column),
            '-' => self.push_op(TokenKind::Minus, "-", line, column),
            '*' => self.push_op(TokenKind::Star, "*", line, column),
            '/' => self.push_op(TokenKind::Slash, "/", line, column),
            '(' => self.push(TokenKind::LeftParen, None, line, column),
            ')' => self.push(TokenKind::RightParen, None, line, column),
            ',' => self.push_op(TokenKind::Comma, ",", line, column),
            ';' => self.push(TokenKind::Separator, None, line, column),
            other => self.error_at(other, line, column),
        }
    }

    fn scan_number(&mut self, line: usize, column: usize) {
        let mut text = String::new();
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            text.push(self.advance());
        }

        let mut is_decimal = false;
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_decimal = true;
            text.push(self.advance());
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
        }

        let kind = if is_decimal {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        };
        self.push(kind, Some(text), line, column);
    }

    fn scan_string(&mut self, line: usize, column: usize) {
        self.advance(); // opening quote
        let mut text = String::new();
        while !self.is_at_end() && self.peek() != '"' && self.peek() != '\n' {
            text.push(self.advance());
        }

        if self.peek() == '"' {
            self.advance();
        } else {
            self.errors.push(format!(
                "Error lexico: cadena sin cerrar Línea: {} Columna: {}",
                line, column
            ));
        }
        self.push(TokenKind::StringLit, Some(text), line, column);
    }

    fn scan_word(&mut self, line: usize, column: usize) {
        let mut word = String::new();
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == '_') {
            word.push(self.advance());
        }

        match keyword_kind(&word) {
            Some(kind) => {
                // Shape/font keywords double as directive value text.
                let literal = kind.is_config_literal().then(|| word);
                self.push(kind, literal, line, column);
            }
            None => self.push(TokenKind::Identifier, Some(word), line, column),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while !self.is_at_end() && self.peek().is_whitespace() {
                self.advance();
            }
            if self.peek() == '/' && self.peek_next() == '/' {
                while !self.is_at_end() && self.peek() != '\n' {
                    self.advance();
                }
                continue;
            }
            break;
        }
    }

    fn push(&mut self, kind: TokenKind, literal: Option<String>, line: usize, column: usize) {
        self.tokens.push(Token {
            kind,
            literal,
            line,
            column,
        });
    }

    fn push_op(&mut self, kind: TokenKind, text: &str, line: usize, column: usize) {
        self.push(kind, Some(text.to_string()), line, column);
    }

    fn error_at(&mut self, ch: char, line: usize, column: usize) {
        self.errors.push(format!(
            "Error lexico: caracter no valido '{}' Línea: {} Columna: {}",
            ch, line, column
        ));
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> char {
        self.input.get(self.position).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.input.get(self.position + 1).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let ch = self.input[self.position];
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "INICIO" => TokenKind::Inicio,
        "FIN" => TokenKind::Fin,
        "VAR" => TokenKind::Var,
        "MOSTRAR" => TokenKind::Mostrar,
        "LEER" => TokenKind::Leer,
        "SI" => TokenKind::Si,
        "ENTONCES" => TokenKind::Entonces,
        "FINSI" => TokenKind::FinSi,
        "MIENTRAS" => TokenKind::Mientras,
        "HACER" => TokenKind::Hacer,
        "FINMIENTRAS" => TokenKind::FinMientras,
        "DEFAULT" => TokenKind::Default,
        "ELIPSE" => TokenKind::Elipse,
        "CIRCULO" => TokenKind::Circulo,
        "PARALELOGRAMO" => TokenKind::Paralelogramo,
        "RECTANGULO" => TokenKind::Rectangulo,
        "ROMBO" => TokenKind::Rombo,
        "RECTANGULO_REDONDEADO" => TokenKind::RectanguloRedondeado,
        "ARIAL" => TokenKind::Arial,
        "TIMES_NEW_ROMAN" => TokenKind::TimesNewRoman,
        "COMIC_SANS" => TokenKind::ComicSans,
        "VERDANA" => TokenKind::Verdana,
        _ => return StyleKey::from_keyword(word).map(TokenKind::StyleKey),
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> (Vec<Token>, Vec<String>) {
        let mut lexer = Lexer::new(source);
        lexer.tokenize();
        lexer.into_parts()
    }

    #[test]
    fn test_keywords_and_identifier() {
        let (tokens, errors) = scan("INICIO VAR contador FIN");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Inicio);
        assert_eq!(tokens[1].kind, TokenKind::Var);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].text(), "contador");
        assert_eq!(tokens[3].kind, TokenKind::Fin);
    }

    #[test]
    fn test_operators() {
        let (tokens, errors) = scan("= == != > >= < <= && || ! + - * /");
        assert!(errors.is_empty());
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Assign,
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
            ]
        );
        assert_eq!(tokens[3].text(), ">");
    }

    #[test]
    fn test_numbers() {
        let (tokens, errors) = scan("42 3.14");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].text(), "42");
        assert_eq!(tokens[1].kind, TokenKind::Decimal);
        assert_eq!(tokens[1].text(), "3.14");
    }

    #[test]
    fn test_string_literal() {
        let (tokens, errors) = scan(r#"MOSTRAR "hola mundo""#);
        assert!(errors.is_empty());
        assert_eq!(tokens[1].kind, TokenKind::StringLit);
        assert_eq!(tokens[1].text(), "hola mundo");
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, errors) = scan("MOSTRAR \"hola\nFIN");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Línea: 1"));
        assert!(errors[0].contains("Columna: 9"));
        // Scanning continues past the bad string
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Fin);
    }

    #[test]
    fn test_style_keys_and_literals() {
        let (tokens, errors) = scan("FIGURA_BLOQUE = RECTANGULO | 2");
        assert!(errors.is_empty());
        assert_eq!(
            tokens[0].kind,
            TokenKind::StyleKey(StyleKey::FiguraBloque)
        );
        assert_eq!(tokens[1].kind, TokenKind::Assign);
        assert_eq!(tokens[2].kind, TokenKind::Rectangulo);
        assert_eq!(tokens[2].text(), "RECTANGULO");
        assert_eq!(tokens[3].kind, TokenKind::Bar);
        assert_eq!(tokens[4].kind, TokenKind::Integer);
    }

    #[test]
    fn test_comments_skipped() {
        let (tokens, errors) = scan("INICIO // esto es un comentario\nFIN");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_invalid_character_collected() {
        let (tokens, errors) = scan("INICIO @ FIN");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'@'"));
        assert!(errors[0].contains("Línea: 1"));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_positions() {
        let (tokens, _) = scan("VAR x\nLEER y");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 5));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 1));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 6));
    }

    #[test]
    fn test_lone_ampersand_is_error() {
        let (_, errors) = scan("a & b");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'&'"));
    }
}
