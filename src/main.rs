mod cli;
mod codegen;
mod error;
mod syntax;

use std::{
    io::{self, Read},
    path::Path,
    process,
};

use clap::Parser as _;

use cli::{Cli, Command, OutputFormat};
use codegen::Compiler;
use error::Diagnostics;
use syntax::Parser;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Parse { file } => {
            let (name, src) = match &file {
                Some(path) => (path.display().to_string(), read_file(path)),
                None => ("<stdin>".to_string(), read_stdin()),
            };

            let mut parser = Parser::new(&src);
            for item in parser.parse_program() {
                println!("{item}");
            }

            log::debug!("scope depth after parse: {}", parser.symbols().depth());
            if report(&name, parser.diagnostics()) {
                process::exit(1);
            }
        }
        Command::Compile {
            file,
            output,
            format,
        } => {
            let src = read_file(&file);
            let mut parser = Parser::new(&src);
            let items = parser.parse_program();

            if report(&file.display().to_string(), parser.diagnostics()) {
                process::exit(1);
            }

            let bytes = match Compiler::new(&items).compile() {
                Ok(bytes) => bytes,
                Err(why) => {
                    eprintln!("{}: {why}", file.display());
                    process::exit(1);
                }
            };

            let contents = match format {
                OutputFormat::Wasm => bytes,
                OutputFormat::Wat => match wasmprinter::print_bytes(&bytes) {
                    Ok(text) => text.into_bytes(),
                    Err(why) => {
                        eprintln!("Failed to print module: {why}");
                        process::exit(1);
                    }
                },
            };

            let output = output.unwrap_or_else(|| file.with_extension(format.extension()));
            if let Err(why) = std::fs::write(&output, contents) {
                eprintln!("Failed to write {output:?}: {why}");
                process::exit(1);
            }
            log::info!("wrote {}", output.display());
        }
    }
}

/// Renders diagnostics to stderr. Returns whether there were any.
fn report(name: &str, diagnostics: &Diagnostics) -> bool {
    for diagnostic in diagnostics.iter() {
        eprintln!("{name}:{diagnostic}");
    }
    log::debug!("{name}: {} diagnostic(s)", diagnostics.len());
    !diagnostics.is_empty()
}

fn read_file(path: &Path) -> String {
    if !path.exists() {
        eprintln!("File {path:?} does not exist");
        process::exit(1);
    }

    match std::fs::read_to_string(path) {
        Ok(src) => src,
        Err(why) => {
            eprintln!("Failed to read {path:?}: {why}");
            process::exit(1);
        }
    }
}

fn read_stdin() -> String {
    let mut src = String::new();
    if let Err(why) = io::stdin().read_to_string(&mut src) {
        eprintln!("Failed to read stdin: {why}");
        process::exit(1);
    }
    src
}
