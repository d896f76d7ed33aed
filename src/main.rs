use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
    process,
    rc::Rc,
    time::Instant,
};

use clamc::{
    analyzer::analyzer::analyze, display_error, errors::errors::Error,
    executor::executor::execute, generator::generator::generate, lexer::lexer::tokenize,
    parser::parser::parse,
};
use clap::Parser;
use env_logger::Env;

/// Clam compiler
///
/// Checks a Clam module, then either runs it or translates it to C.
#[derive(Parser, Debug)]
#[command(name = "clamc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Run the module instead of translating it
    #[arg(short, long)]
    run: bool,

    /// Write the generated C source here instead of stdout
    #[arg(short, long, value_name = "FILE", conflicts_with = "run")]
    output: Option<PathBuf>,

    /// Write the generated header here
    #[arg(long, value_name = "FILE", conflicts_with = "run")]
    header: Option<PathBuf>,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let source = match read_to_string(&args.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read {}: {}", args.file.display(), error);
            process::exit(1);
        }
    };

    if let Err(error) = compile(&args, &source) {
        display_error(&error, &source);
        process::exit(1);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn compile(args: &Args, source: &str) -> Result<(), Error> {
    let file_name = file_name(&args.file);
    let start = Instant::now();

    let tokens = tokenize(source.to_string(), Some(file_name.clone()))?;
    log::info!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let (_, module) = parse(tokens, Rc::new(file_name));
    let module = module?;
    log::info!("Parsed in {:?}", parse_start.elapsed());

    let analyze_start = Instant::now();
    analyze(&module)?;
    log::info!("Analyzed in {:?}", analyze_start.elapsed());

    if args.run {
        let run_start = Instant::now();
        let result = execute(&module)?;
        log::info!("Executed in {:?}", run_start.elapsed());

        println!("main return {}", result);
        return Ok(());
    }

    let generate_start = Instant::now();
    let generated = generate(&module)?;
    log::info!("Generated in {:?}", generate_start.elapsed());

    match &args.output {
        Some(path) => write_output(path, &generated.source),
        None => print!("{}", generated.source),
    }
    if let Some(path) = &args.header {
        write_output(path, &generated.header);
    }

    log::info!("Total time: {:?}", start.elapsed());
    Ok(())
}

fn write_output(path: &Path, contents: &str) {
    if let Err(error) = write(path, contents) {
        eprintln!("error: cannot write {}: {}", path.display(), error);
        process::exit(1);
    }
}
