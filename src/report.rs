//! User-facing error report construction
//!
//! Error strings from the lexer and grammar checker embed their location as
//! `Línea: <n>` / `Columna: <n>` text; the report builder parses the line
//! number back out to attach the offending source line as context.

use regex::Regex;

/// Reports list at most this many errors; the rest are summarized.
pub const MAX_REPORTED_ERRORS: usize = 5;

/// Build a bounded, human-readable report from an error list.
pub fn detailed_report(title: &str, errors: &[String], source: &str, suggestion: &str) -> String {
    let mut message = format!("{} ({})", title, errors.len());

    for (index, error) in errors.iter().take(MAX_REPORTED_ERRORS).enumerate() {
        message.push_str(&format!("\n{}) {}", index + 1, error));
        if let Some(context) = line_context(error, source) {
            message.push_str(&format!("\n   -> {}", context));
        }
    }

    if errors.len() > MAX_REPORTED_ERRORS {
        message.push_str(&format!(
            "\n...\nSe omitieron {} errores adicionales",
            errors.len() - MAX_REPORTED_ERRORS
        ));
    }

    message.push_str(&format!("\nSugerencia: {}", suggestion));
    message
}

/// Summarize an internal fault without losing the input that triggered it.
pub fn internal_fault_report(detail: &str, source: &str) -> String {
    let first_line = source
        .lines()
        .next()
        .map(|line| line.chars().take(120).collect::<String>())
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| "Entrada vacia".to_string());

    format!(
        "Fallo interno durante el analisis\nMensaje: {}\nContexto de entrada: {}",
        detail, first_line
    )
}

/// Recover the source line an error string points at.
fn line_context(error: &str, source: &str) -> Option<String> {
    let line_pattern = Regex::new(r"(?i)l[ií]nea:\s*(\d+)").ok()?;
    let line_number: usize = line_pattern.captures(error)?.get(1)?.as_str().parse().ok()?;

    let lines: Vec<&str> = source.lines().collect();
    if line_number == 0 || line_number > lines.len() {
        return None;
    }

    Some(format!(
        "Linea {}: {}",
        line_number,
        lines[line_number - 1].trim()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_with_context() {
        let errors = vec!["Token inesperado: '>' Línea: 2 Columna: 7".to_string()];
        let report = detailed_report(
            "Errores sintacticos",
            &errors,
            "INICIO\nSI (x > 5) ENTONCES\nFINSI",
            "Verifica la condicion",
        );

        assert!(report.starts_with("Errores sintacticos (1)"));
        assert!(report.contains("1) Token inesperado: '>'"));
        assert!(report.contains("-> Linea 2: SI (x > 5) ENTONCES"));
        assert!(report.ends_with("Sugerencia: Verifica la condicion"));
    }

    #[test]
    fn test_report_truncates_long_lists() {
        let errors: Vec<String> = (1..=8)
            .map(|i| format!("Token inesperado: 'x' Línea: {}", i))
            .collect();
        let report = detailed_report("Errores", &errors, "", "nada");

        assert!(report.starts_with("Errores (8)"));
        assert!(report.contains("5) "));
        assert!(!report.contains("6) "));
        assert!(report.contains("Se omitieron 3 errores adicionales"));
    }

    #[test]
    fn test_context_out_of_range() {
        let errors = vec!["Error lexico Línea: 99".to_string()];
        let report = detailed_report("Errores", &errors, "una sola linea", "nada");
        assert!(!report.contains("->"));
    }

    #[test]
    fn test_internal_fault_report() {
        let report = internal_fault_report("indice fuera de rango", "INICIO\nFIN");
        assert!(report.contains("Mensaje: indice fuera de rango"));
        assert!(report.contains("Contexto de entrada: INICIO"));

        let empty = internal_fault_report("x", "");
        assert!(empty.contains("Entrada vacia"));
    }
}
