use std::{
    env, fs,
    path::{Path, PathBuf},
    process::ExitCode,
    rc::Rc,
    time::Instant,
};

use log::{LevelFilter, Metadata, Record};
use snc::{
    display_error,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::{
        imports::{module_file_name, resolve_imports},
        parser::parse,
    },
    type_checker::{type_check, CheckerConfig},
};

const USAGE: &str = "usage: snc <file.sn> [-v|-vv] [--dump-symbols] [--tokens]";

/// Writes every enabled record to stderr.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

struct Options {
    path: PathBuf,
    log_level: LevelFilter,
    dump_symbols: bool,
    dump_tokens: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut path = None;
    let mut log_level = LevelFilter::Warn;
    let mut dump_symbols = false;
    let mut dump_tokens = false;

    for arg in args {
        match arg.as_str() {
            "-v" => log_level = LevelFilter::Debug,
            "-vv" => log_level = LevelFilter::Trace,
            "--dump-symbols" => dump_symbols = true,
            "--tokens" => dump_tokens = true,
            flag if flag.starts_with('-') => return Err(format!("unknown flag '{}'", flag)),
            file if path.is_none() => path = Some(PathBuf::from(file)),
            extra => return Err(format!("unexpected argument '{}'", extra)),
        }
    }

    let path = path.ok_or_else(|| String::from("no input file"))?;
    Ok(Options {
        path,
        log_level,
        dump_symbols,
        dump_tokens,
    })
}

fn main() -> ExitCode {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = log::set_logger(&LOGGER) {
        eprintln!("failed to install logger: {}", error);
    }
    log::set_max_level(options.log_level);

    if run(&options) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Shows `error` against the source of the file it points into, which may
/// be an imported module next to the main file.
fn report(error: &Error, main_file: &str, main_source: &str, directory: &Path) {
    let file = error.get_position().1.as_str();
    if file == main_file {
        display_error(error, main_source);
        return;
    }

    let source = fs::read_to_string(directory.join(file)).unwrap_or_default();
    display_error(error, &source);
}

fn run(options: &Options) -> bool {
    let file_name = options
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| options.path.to_string_lossy().into_owned());
    let directory = options
        .path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let source = match fs::read_to_string(&options.path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("cannot read {}: {}", options.path.display(), error);
            return false;
        }
    };

    let start = Instant::now();
    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &source);
            return false;
        }
    };

    println!("Tokenized in {:?}", start.elapsed());

    if options.dump_tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }

    let parse_start = Instant::now();
    let (_, parsed) = parse(tokens, Rc::new(file_name.clone()));
    let mut module = match parsed {
        Ok(module) => module,
        Err(error) => {
            display_error(&error, &source);
            return false;
        }
    };

    let mut reader =
        |module: &str| fs::read_to_string(directory.join(module_file_name(module))).ok();
    let statements = std::mem::take(&mut module.statements);
    module.statements = match resolve_imports(statements, &mut reader) {
        Ok(statements) => statements,
        Err(error) => {
            report(&error, &file_name, &source, &directory);
            return false;
        }
    };

    println!("Parsed in {:?}", parse_start.elapsed());

    let type_check_start = Instant::now();
    let config = CheckerConfig::new().with_log_level(options.log_level);
    let (checker, success) = type_check(&mut module, config);

    println!("Type checked in {:?}", type_check_start.elapsed());

    if options.dump_symbols {
        print!("{}", checker.table.dump());
    }

    if !success {
        for error in checker.get_errors() {
            report(error, &file_name, &source, &directory);
        }
        eprintln!("{} error(s) found", checker.get_errors().len());
        return false;
    }

    println!("Total time: {:?}", start.elapsed());
    true
}
