//! Flujo pseudocode compiler
//!
//! Compiles a small Spanish-keyword pseudocode language into the two
//! artifacts a flowchart renderer needs: a hierarchical statement tree and
//! a per-node style table (colors, shapes, fonts, sizes).
//!
//! # Basic Usage
//!
//! ```rust
//! use flujo::{analyze, AnalysisOutcome};
//!
//! match analyze("INICIO MOSTRAR \"hola\" FIN") {
//!     AnalysisOutcome::Success(analysis) => {
//!         assert_eq!(analysis.statements.len(), 3);
//!     }
//!     AnalysisOutcome::Failure { report } => eprintln!("{}", report),
//! }
//! ```
//!
//! # Analysis Pipeline
//!
//! 1. **Lexer** - Tokenize the source, collecting lexical errors
//! 2. **Grammar check** - Validate against the legacy grammar, collecting
//!    syntax errors
//! 3. **Compatibility gates** - Decide whether reported syntax errors are
//!    all attributable to known legacy-grammar gaps
//! 4. **Statement tree** - Translate the token stream into the flowchart
//!    statement hierarchy
//! 5. **Style resolution** - Collect inline style directives into the
//!    per-node style table
//!
//! Lexical errors always stop the pipeline; syntax errors stop it unless a
//! gate approves. Tree and style construction are total and never fail.

pub mod analyzer;
pub mod ast;
pub mod cli;
pub mod color;
pub mod compat;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod report;
pub mod style;

// Re-export commonly used types and functions
pub use analyzer::{analyze, analyze_file, Analysis, AnalysisOutcome};
pub use ast::{build, Statement};
pub use color::{parse_color, Color};
pub use compat::{color_triplet_gate, legacy_expression_gate, CompatGate};
pub use error::{CompilerError, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use style::{
    resolve, DefaultMode, StyleAspect, StyleDirective, StyleKey, StyleTable, StyleValue,
};

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
