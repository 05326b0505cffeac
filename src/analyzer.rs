//! Analysis coordination
//!
//! The single place where the phases meet and where failures become
//! user-facing reports: lexical scan, legacy grammar check, compatibility
//! gates, then statement tree and style table construction over the full
//! token list. Lexical errors are always fatal; syntax errors are fatal
//! unless a gate attributes every one of them to a known legacy-grammar
//! gap. Each invocation is a pure function of the source text.

use crate::compat::{color_triplet_gate, legacy_expression_gate};
use crate::error::Result;
use crate::lexer::Lexer;
use crate::style::StyleTable;
use crate::{ast, grammar, report, style};
use serde::Serialize;
use std::fs;
use std::panic;
use std::path::Path;

const LEXICAL_HINT: &str =
    "Revisa caracteres invalidos y formato de literales (cadenas, numeros y colores).";
const SYNTAX_HINT: &str = "Verifica parentesis, palabras reservadas (INICIO/FIN, SI/FINSI, \
                           MIENTRAS/FINMIENTRAS) y separadores.";

/// A successful analysis: the statement tree and the style table, ready
/// for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub statements: Vec<ast::Statement>,
    pub styles: StyleTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome")]
pub enum AnalysisOutcome {
    Success(Analysis),
    Failure { report: String },
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }
}

/// Analyze one source text. Total: every fault, including a panic in a
/// construction phase, degrades to a `Failure` report.
pub fn analyze(source: &str) -> AnalysisOutcome {
    match panic::catch_unwind(|| run_analysis(source)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "Sin detalle".to_string());
            log::error!("analysis panicked: {}", detail);
            AnalysisOutcome::Failure {
                report: report::internal_fault_report(&detail, source),
            }
        }
    }
}

pub fn analyze_file(path: impl AsRef<Path>) -> Result<AnalysisOutcome> {
    let source = fs::read_to_string(path)?;
    Ok(analyze(&source))
}

fn run_analysis(source: &str) -> AnalysisOutcome {
    let mut lexer = Lexer::new(source);
    lexer.tokenize();
    let (tokens, lexical_errors) = lexer.into_parts();

    if !lexical_errors.is_empty() {
        return AnalysisOutcome::Failure {
            report: report::detailed_report("Errores lexicos", &lexical_errors, source, LEXICAL_HINT),
        };
    }

    let syntax_errors = grammar::check(&tokens);
    if !syntax_errors.is_empty() {
        let bypass = legacy_expression_gate().can_bypass(&syntax_errors, &tokens)
            || color_triplet_gate().can_bypass(&syntax_errors, &tokens);
        if !bypass {
            return AnalysisOutcome::Failure {
                report: report::detailed_report(
                    "Errores sintacticos",
                    &syntax_errors,
                    source,
                    SYNTAX_HINT,
                ),
            };
        }
        log::debug!(
            "proceeding past {} known-safe syntax error(s)",
            syntax_errors.len()
        );
    }

    AnalysisOutcome::Success(Analysis {
        statements: ast::build(&tokens),
        styles: style::resolve(&tokens),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;
    use crate::style::{StyleKey, StyleValue};
    use std::io::Write;

    fn expect_success(source: &str) -> Analysis {
        match analyze(source) {
            AnalysisOutcome::Success(analysis) => analysis,
            AnalysisOutcome::Failure { report } => panic!("analysis failed:\n{}", report),
        }
    }

    fn expect_failure(source: &str) -> String {
        match analyze(source) {
            AnalysisOutcome::Failure { report } => report,
            AnalysisOutcome::Success(_) => panic!("analysis unexpectedly succeeded"),
        }
    }

    #[test]
    fn test_clean_program() {
        let analysis = expect_success("INICIO VAR x = 1 MOSTRAR \"hola\" FIN");
        assert_eq!(analysis.statements.len(), 4);
        assert!(analysis.styles.is_empty());
    }

    #[test]
    fn test_comparison_bypassed_end_to_end() {
        let analysis = expect_success("SI (x > 5) ENTONCES MOSTRAR \"hola\" FINSI");
        assert_eq!(
            analysis.statements,
            vec![Statement::Conditional {
                condition: "x > 5".to_string(),
                body: vec![Statement::Display {
                    message: "hola".to_string(),
                }],
            }]
        );
    }

    #[test]
    fn test_styled_program_end_to_end() {
        let source = "INICIO\n\
                      SI (x > 1) ENTONCES LEER y FINSI\n\
                      FIN\n\
                      FIGURA_SI = ROMBO | 2\n\
                      COLOR_SI = 255,0,0 | 2\n";
        let analysis = expect_success(source);

        assert_eq!(analysis.statements.len(), 3);
        assert_eq!(
            analysis.styles.get(StyleKey::FiguraSi, 2).unwrap().value,
            StyleValue::Text("ROMBO".to_string())
        );
        assert_eq!(
            analysis.styles.get(StyleKey::ColorSi, 2).unwrap().value,
            StyleValue::Color(crate::color::Color::rgb(255, 0, 0))
        );
    }

    #[test]
    fn test_lexical_errors_always_fatal() {
        let report = expect_failure("INICIO @ FIN");
        assert!(report.starts_with("Errores lexicos (1)"));
        assert!(report.contains("'@'"));
        assert!(report.contains("Sugerencia:"));
    }

    #[test]
    fn test_unapproved_syntax_error_fatal() {
        // A stray close keyword is not attributable to any known gap.
        let report = expect_failure("INICIO ) FIN");
        assert!(report.starts_with("Errores sintacticos (1)"));
        assert!(report.contains("Token inesperado: ')'"));
    }

    #[test]
    fn test_report_carries_source_context() {
        let report = expect_failure("INICIO\nVAR 5\nFIN");
        assert!(report.contains("Línea: 2"));
        assert!(report.contains("-> Linea 2: VAR 5"));
    }

    #[test]
    fn test_analyze_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "INICIO MOSTRAR \"archivo\" FIN").unwrap();

        let outcome = analyze_file(file.path()).unwrap();
        assert!(outcome.is_success());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(analyze_file("/nonexistent/program.pse").is_err());
    }
}
