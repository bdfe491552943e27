use clap::Parser;
use opgen::compiler::compile;
use opgen::emitters::EmitterType;
use opgen::error::{Error, ErrorType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Generates x86-64 encoder declarations from instruction templates")]
struct Args {
    /// Instruction template list, one template per line
    input: PathBuf,

    /// Which declaration set to generate
    #[arg(short, long, value_enum)]
    emitter: EmitterType,
}

fn main() {
    let args = Args::parse();
    let file = args.input.to_string_lossy().to_string();

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            let error = Error::new(ErrorType::Io, format!("Failed to read '{file}': {e}"));
            error.print(&file, "").unwrap();
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout();

    if let Err(error) = compile(&source, args.emitter, &mut stdout) {
        error.print(&file, &source).unwrap();
        std::process::exit(1);
    }
}
