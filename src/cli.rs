//! Command line interface for the flujo compiler

use crate::error::{CompilerError, Result};
use crate::{analyze, ast::Statement, AnalysisOutcome};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;

pub fn run() -> Result<()> {
    let matches = build_cli().get_matches();
    setup_logging(matches.get_count("verbose"));

    let input = matches.get_one::<String>("input").unwrap();
    let source = fs::read_to_string(input)?;

    if matches.get_flag("tokens") {
        dump_tokens(&source);
        return Ok(());
    }

    handle_analyze(&source, &matches)
}

fn build_cli() -> Command {
    Command::new(crate::NAME)
        .version(crate::VERSION)
        .about(crate::DESCRIPTION)
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Pseudocode source file")
                .required(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit the statement tree and style table as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Dump the token stream and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase verbosity (can be used multiple times)")
                .action(ArgAction::Count),
        )
}

fn setup_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .try_init();
}

fn handle_analyze(source: &str, matches: &ArgMatches) -> Result<()> {
    match analyze(source) {
        AnalysisOutcome::Success(analysis) => {
            if matches.get_flag("json") {
                let json = serde_json::to_string_pretty(&analysis)
                    .map_err(|e| CompilerError::invalid_format(e.to_string()))?;
                println!("{}", json);
            } else {
                print_statements(&analysis.statements, 0);
                for directive in analysis.styles.iter() {
                    println!(
                        "{} [{}] = {}",
                        directive.key.keyword(),
                        directive.node_index,
                        directive.value
                    );
                }
            }
            Ok(())
        }
        AnalysisOutcome::Failure { report } => Err(CompilerError::analysis(report)),
    }
}

fn print_statements(statements: &[Statement], indent: usize) {
    let pad = "  ".repeat(indent);
    for statement in statements {
        match statement {
            Statement::Start => println!("{}INICIO", pad),
            Statement::End => println!("{}FIN", pad),
            Statement::Declaration { name, value } => match value {
                Some(value) => println!("{}DECLARACION {} = {}", pad, name, value),
                None => println!("{}DECLARACION {}", pad, name),
            },
            Statement::Assignment { name, expression } => {
                println!("{}ASIGNACION {} = {}", pad, name, expression)
            }
            Statement::Display { message } => println!("{}MOSTRAR \"{}\"", pad, message),
            Statement::Read { variable } => println!("{}LEER {}", pad, variable),
            Statement::Conditional { condition, body } => {
                println!("{}SI ({})", pad, condition);
                print_statements(body, indent + 1);
            }
            Statement::Loop { condition, body } => {
                println!("{}MIENTRAS ({})", pad, condition);
                print_statements(body, indent + 1);
            }
        }
    }
}

fn dump_tokens(source: &str) {
    let mut lexer = crate::lexer::Lexer::new(source);
    lexer.tokenize();

    for token in lexer.tokens() {
        match &token.literal {
            Some(literal) => println!(
                "{}:{} {:?} \"{}\"",
                token.line, token.column, token.kind, literal
            ),
            None => println!("{}:{} {:?}", token.line, token.column, token.kind),
        }
    }
    for error in lexer.lexical_errors() {
        eprintln!("{}", error);
    }
}
