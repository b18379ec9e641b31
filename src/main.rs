use std::{fs, path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser};
use clap_stdin::FileOrStdin;
use kjplc::{lexer::Lexer, CompileError};
use miette::{NamedSource, Report};
use tracing::{error, Level};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source file, or "-" for stdin
    input: FileOrStdin,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stop after lexing and print the tokens
    #[arg(long, conflicts_with_all = ["ast", "check"])]
    tokens: bool,

    /// Stop after parsing and print the AST
    #[arg(long, conflicts_with_all = ["tokens", "check"])]
    ast: bool,

    /// Stop after semantic analysis
    #[arg(long, conflicts_with_all = ["tokens", "ast"])]
    check: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Clone, Copy, Debug)]
enum Stage {
    Lex,
    Parse,
    Check,
    Compile,
}

impl Args {
    fn stage(&self) -> Stage {
        if self.tokens {
            Stage::Lex
        } else if self.ast {
            Stage::Parse
        } else if self.check {
            Stage::Check
        } else {
            Stage::Compile
        }
    }
}

fn run(stage: Stage, source: &str) -> Result<Option<String>, CompileError> {
    match stage {
        Stage::Lex => {
            let tokens = Lexer::tokenize(source)?;
            let text = tokens
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            Ok(Some(text))
        }
        Stage::Parse => {
            let program = kjplc::parse(source)?;
            Ok(Some(format!("{:#?}", program)))
        }
        Stage::Check => {
            let errors = kjplc::analyze_source(source)?;
            if !errors.is_empty() {
                return Err(CompileError::Semantic(errors));
            }
            Ok(None)
        }
        Stage::Compile => kjplc::compile(source).map(Some),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    let stage = args.stage();

    let name = if args.input.is_stdin() {
        "<stdin>".to_string()
    } else {
        args.input.filename().to_string()
    };
    let source = match args.input.contents() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = match run(stage, &source) {
        Ok(output) => output,
        Err(e) => {
            error!("compilation failed");
            let report = Report::new(e).with_source_code(NamedSource::new(name, source));
            eprintln!("{report:?}");
            return ExitCode::FAILURE;
        }
    };

    let Some(output) = output else {
        return ExitCode::SUCCESS;
    };
    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, output + "\n") {
                eprintln!("error: {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
        None => println!("{output}"),
    }
    ExitCode::SUCCESS
}
