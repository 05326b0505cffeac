//! Compatibility gates for known legacy-grammar gaps
//!
//! The legacy grammar over-rejects constructs the tree and style builders
//! handle fine. A gate decides whether construction may proceed despite
//! reported syntax errors. It is a strict allow-list: bypass happens only
//! when every reported error is positively attributable to a known gap AND
//! the token stream actually contains the construct the gap is about.

use crate::lexer::{Token, TokenKind};

type KindPredicate = fn(TokenKind) -> bool;

/// One allow-list instantiation. `witnesses` is a disjunction of
/// conjunctions over the token stream: the gate applies only when, for
/// some witness, every one of its predicates matches at least one token.
pub struct CompatGate {
    name: &'static str,
    markers: &'static [&'static str],
    witnesses: &'static [&'static [KindPredicate]],
}

impl CompatGate {
    pub fn can_bypass(&self, syntax_errors: &[String], tokens: &[Token]) -> bool {
        if syntax_errors.is_empty() {
            return false;
        }

        let witnessed = self.witnesses.iter().any(|predicates| {
            predicates
                .iter()
                .all(|matches| tokens.iter().any(|token| matches(token.kind)))
        });
        if !witnessed {
            return false;
        }

        let approved = syntax_errors.iter().all(|error| {
            let error = error.to_lowercase();
            self.markers
                .iter()
                .any(|marker| error.contains(&marker.to_lowercase()))
        });

        if approved {
            log::debug!(
                "gate '{}' approves bypass of {} syntax error(s)",
                self.name,
                syntax_errors.len()
            );
        }
        approved
    }
}

fn has_comparison(kind: TokenKind) -> bool {
    kind.is_comparison()
}

fn has_config_literal(kind: TokenKind) -> bool {
    kind.is_config_literal()
}

fn has_shape_font_key(kind: TokenKind) -> bool {
    kind.is_shape_font_key()
}

fn has_comma(kind: TokenKind) -> bool {
    kind == TokenKind::Comma
}

fn has_color_key(kind: TokenKind) -> bool {
    kind.is_color_key()
}

const LEGACY_EXPRESSION_MARKERS: &[&str] = &[
    "Token inesperado: '>'",
    "Token inesperado: '<'",
    "Token inesperado: '>='",
    "Token inesperado: '<='",
    "Token inesperado: '=='",
    "Token inesperado: '!='",
    "Token inesperado: '&&'",
    "Token inesperado: '||'",
    "Token inesperado: '!'",
    "Token inesperado: 'IGUAL'",
    "Token inesperado: 'DIFERENTE'",
    "Token inesperado: 'MAYOR'",
    "Token inesperado: 'MENOR'",
    "Token inesperado: 'MAYOR_IGUAL'",
    "Token inesperado: 'MENOR_IGUAL'",
    "Token inesperado: 'ELIPSE'",
    "Token inesperado: 'CIRCULO'",
    "Token inesperado: 'PARALELOGRAMO'",
    "Token inesperado: 'RECTANGULO'",
    "Token inesperado: 'ROMBO'",
    "Token inesperado: 'RECTANGULO_REDONDEADO'",
    "Token inesperado: 'ARIAL'",
    "Token inesperado: 'TIMES_NEW_ROMAN'",
    "Token inesperado: 'COMIC_SANS'",
    "Token inesperado: 'VERDANA'",
];

const COLOR_TRIPLET_MARKERS: &[&str] = &["Token inesperado: ','"];

/// Gate for comparison/logical operators in expressions and shape/font
/// literal keywords used as directive values.
pub fn legacy_expression_gate() -> CompatGate {
    CompatGate {
        name: "legacy-expression",
        markers: LEGACY_EXPRESSION_MARKERS,
        witnesses: &[
            &[has_comparison],
            &[has_config_literal, has_shape_font_key],
        ],
    }
}

/// Narrower gate for commas belonging to a color triplet that landed in a
/// context the legacy grammar never wired.
pub fn color_triplet_gate() -> CompatGate {
    CompatGate {
        name: "color-triplet",
        markers: COLOR_TRIPLET_MARKERS,
        witnesses: &[&[has_comma, has_color_key]],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn tokens_of(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize();
        lexer.into_tokens()
    }

    #[test]
    fn test_comparison_bypass() {
        let errors = vec!["Token inesperado: '>' Línea: 3".to_string()];
        let tokens = tokens_of("SI (x > 5) ENTONCES FINSI");
        assert!(legacy_expression_gate().can_bypass(&errors, &tokens));
    }

    #[test]
    fn test_no_witness_token_no_bypass() {
        let errors = vec!["Token inesperado: '>' Línea: 3".to_string()];
        let tokens = tokens_of("INICIO FIN");
        assert!(!legacy_expression_gate().can_bypass(&errors, &tokens));
    }

    #[test]
    fn test_one_unattributable_error_blocks_all() {
        let errors = vec![
            "Token inesperado: '>' Línea: 3".to_string(),
            "Token inesperado: 'FIN' Línea: 9".to_string(),
        ];
        let tokens = tokens_of("SI (x > 5) ENTONCES FINSI");
        assert!(!legacy_expression_gate().can_bypass(&errors, &tokens));
    }

    #[test]
    fn test_empty_error_list_no_bypass() {
        let tokens = tokens_of("SI (x > 5) ENTONCES FINSI");
        assert!(!legacy_expression_gate().can_bypass(&[], &tokens));
    }

    #[test]
    fn test_marker_match_is_case_insensitive() {
        let errors = vec!["TOKEN INESPERADO: 'rectangulo' Línea: 2".to_string()];
        let tokens = tokens_of("FIGURA_SI = RECTANGULO | 1");
        assert!(legacy_expression_gate().can_bypass(&errors, &tokens));
    }

    #[test]
    fn test_shape_literal_needs_shape_key_too() {
        let errors = vec!["Token inesperado: 'RECTANGULO' Línea: 1".to_string()];
        // Shape literal present but no shape/font style key in the stream.
        let tokens = tokens_of("VAR x = RECTANGULO");
        assert!(!legacy_expression_gate().can_bypass(&errors, &tokens));
    }

    #[test]
    fn test_color_triplet_gate() {
        let errors = vec![
            "Token inesperado: ',' Línea: 1".to_string(),
            "Token inesperado: ',' Línea: 1".to_string(),
        ];
        let with_color_key = tokens_of("VAR c = 255,0,0 COLOR_SI = H00FF00 | 1");
        assert!(color_triplet_gate().can_bypass(&errors, &with_color_key));

        let without_color_key = tokens_of("VAR c = 255,0,0");
        assert!(!color_triplet_gate().can_bypass(&errors, &without_color_key));

        // The comparison gate never approves comma errors.
        assert!(!legacy_expression_gate().can_bypass(&errors, &with_color_key));
    }
}
