//! SOSI CLI tool
//!
//! Examples:
//!   sosi check data.sos                      - parse and report
//!   sosi events data.sos                     - dump parser events
//!   sosi tree data.sos                       - show the element tree
//!   sosi detect data.sos                     - show the detected charset
//!   sosi format data.sos --charset UTF-8     - rewrite, re-encoding as UTF-8

use std::io::{self, Read, Write};

use facet::Facet;
use figue as args;
use sosi_encoding::{CharDecoder, Charset, DETECT_PREFIX_LEN, inspect};
use sosi_format::{FormatOptions, SosiWriter};
use sosi_parse::{Event, Parser, ParserFeatures};
use sosi_tree::{Document, Element, ParseDiagnostic, TreeError, Value};

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// CLI argument structures
// ============================================================================

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level CLI with optional subcommand
#[derive(Facet, Debug)]
struct Args {
    /// Show version
    #[facet(args::named, args::short = 'V', default)]
    version: bool,

    /// Subcommand to run
    #[facet(args::subcommand, default)]
    command: Option<Command>,
}

/// Available subcommands
#[derive(Facet, Debug)]
#[repr(u8)]
enum Command {
    /// Parse a file and report errors
    Check {
        /// Input file (or "-" for stdin)
        #[facet(args::positional)]
        file: String,

        /// Accept empty elements and a missing or unknown charset
        #[facet(args::named, default)]
        permissive: bool,
    },

    /// Dump parser events
    Events {
        /// Input file (or "-" for stdin)
        #[facet(args::positional)]
        file: String,

        /// Accept empty elements and a missing or unknown charset
        #[facet(args::named, default)]
        permissive: bool,
    },

    /// Show the element tree
    Tree {
        /// Input file (or "-" for stdin)
        #[facet(args::positional)]
        file: String,

        /// Accept empty elements and a missing or unknown charset
        #[facet(args::named, default)]
        permissive: bool,
    },

    /// Show the detected charset
    Detect {
        /// Input file (or "-" for stdin)
        #[facet(args::positional)]
        file: String,
    },

    /// Rewrite a file
    Format {
        /// Input file (or "-" for stdin)
        #[facet(args::positional)]
        file: String,

        /// Output charset (default: UTF-8)
        #[facet(args::named, default)]
        charset: Option<String>,

        /// Keep elements that shared a line on one line
        #[facet(args::named, default)]
        preserve_lines: bool,

        /// Output to file (default: stdout)
        #[facet(args::named, args::short = 'o', default)]
        output: Option<String>,

        /// Accept empty elements and a missing or unknown charset
        #[facet(args::named, default)]
        permissive: bool,
    },
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    if raw_args.is_empty() || raw_args[0] == "--help" || raw_args[0] == "-h" {
        print_help();
        std::process::exit(EXIT_SUCCESS);
    }

    if raw_args[0] == "--version" || raw_args[0] == "-V" {
        println!("sosi {VERSION}");
        std::process::exit(EXIT_SUCCESS);
    }

    match run(&raw_args) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                CliError::Tree {
                    error,
                    source,
                    filename,
                } => {
                    ParseDiagnostic::from(error).write_report(filename, source, io::stderr());
                }
                _ => eprintln!("error: {e}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn print_help() {
    eprintln!("sosi {VERSION} - command-line tool for SOSI geodata files\n");
    eprintln!("USAGE:");
    eprintln!("    sosi <command> <file> [options]   Files may be '-' for stdin\n");
    eprintln!("SUBCOMMANDS:");
    eprintln!("    check <file>                    Parse and report errors");
    eprintln!("    events <file>                   Dump parser events");
    eprintln!("    tree <file>                     Show the element tree");
    eprintln!("    detect <file>                   Show the detected charset");
    eprintln!("    format <file>                   Rewrite the file\n");
    eprintln!("OPTIONS:");
    eprintln!("        --permissive                Accept empty elements and bad charsets");
    eprintln!("        --charset <NAME>            Output charset for format (default: UTF-8)");
    eprintln!("        --preserve-lines            Keep source line breaks for format");
    eprintln!("    -o, --output <FILE>             Output file for format\n");
    eprintln!("ENVIRONMENT:");
    eprintln!("    RUST_LOG                        Log filter, e.g. RUST_LOG=sosi_parse=trace");
    eprintln!("    NO_COLOR                        Disable colored diagnostics");
}

fn run(args: &[String]) -> Result<(), CliError> {
    let args_strs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let parsed: Args = figue::from_slice(&args_strs).map_err(|e| CliError::Usage(e.to_string()))?;

    if parsed.version {
        println!("sosi {VERSION}");
        return Ok(());
    }

    match parsed.command {
        Some(Command::Check { file, permissive }) => run_check(&file, features(permissive)),
        Some(Command::Events { file, permissive }) => run_events(&file, features(permissive)),
        Some(Command::Tree { file, permissive }) => run_tree(&file, features(permissive)),
        Some(Command::Detect { file }) => run_detect(&file),
        Some(Command::Format {
            file,
            charset,
            preserve_lines,
            output,
            permissive,
        }) => run_format(
            &file,
            charset.as_deref(),
            preserve_lines,
            output.as_deref(),
            features(permissive),
        ),
        None => {
            print_help();
            Ok(())
        }
    }
}

fn features(permissive: bool) -> ParserFeatures {
    if permissive {
        ParserFeatures::permissive()
    } else {
        ParserFeatures::default()
    }
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Tree {
        error: TreeError,
        source: String,
        filename: String,
    },
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Tree { error, .. } => match error.as_parse_error() {
                Some(e) if !e.is_data_error() && !e.is_usage_error() => EXIT_IO_ERROR,
                _ => EXIT_SYNTAX_ERROR,
            },
            CliError::Usage(_) => EXIT_SYNTAX_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Tree { error, .. } => write!(f, "{error}"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

// ============================================================================
// Input
// ============================================================================

/// Raw input bytes and their decoded text, kept for diagnostics.
struct Input {
    filename: String,
    bytes: Vec<u8>,
    text: String,
}

impl Input {
    fn read(file: &str) -> Result<Self, CliError> {
        let bytes = read_input(file)?;
        let detection = inspect(&bytes[..bytes.len().min(DETECT_PREFIX_LEN)]);
        let text = CharDecoder::new(&bytes[detection.skip..], detection.charset)
            .collect::<io::Result<String>>()?;
        let filename = if file == "-" { "<stdin>" } else { file };
        Ok(Self {
            filename: filename.to_string(),
            bytes,
            text,
        })
    }

    fn parser(&self, features: ParserFeatures) -> Result<Parser<'_>, CliError> {
        Parser::from_reader(&self.bytes[..], features).map_err(|e| self.error(e.into()))
    }

    fn document(&self, features: ParserFeatures) -> Result<Document, CliError> {
        Document::read_with(&self.bytes[..], features).map_err(|e| self.error(e))
    }

    fn error(&self, error: TreeError) -> CliError {
        CliError::Tree {
            error,
            source: self.text.clone(),
            filename: self.filename.clone(),
        }
    }
}

fn read_input(file: &str) -> Result<Vec<u8>, io::Error> {
    if file == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(file)
    }
}

// ============================================================================
// Subcommand implementations
// ============================================================================

fn run_check(file: &str, features: ParserFeatures) -> Result<(), CliError> {
    let input = Input::read(file)?;
    let document = input.document(features)?;
    println!(
        "{}: ok, {} elements, charset {}",
        input.filename,
        document.elements().len(),
        document.charset()
    );
    Ok(())
}

fn run_events(file: &str, features: ParserFeatures) -> Result<(), CliError> {
    let input = Input::read(file)?;
    let parser = input.parser(features)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in parser {
        let event = event.map_err(|e| input.error(e.into()))?;
        let location = event.location();
        write!(out, "{}:{} {}", location.line, location.column, event.kind_name())?;
        match &event {
            Event::StartHead { name, .. } | Event::StartElement { name, .. } => {
                write!(out, " {name}")?
            }
            Event::String { value, .. } => write!(out, " {value:?}")?,
            Event::Number { value, .. } => write!(out, " {value}")?,
            Event::SerialNumber { value, .. } => write!(out, " {value}")?,
            Event::Reference { value, .. } => write!(out, " {value}")?,
            Event::Comment { text, .. } => write!(out, " {text:?}")?,
            _ => {}
        }
        writeln!(out)?;
    }
    Ok(())
}

fn run_tree(file: &str, features: ParserFeatures) -> Result<(), CliError> {
    let input = Input::read(file)?;
    let document = input.document(features)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for element in document.elements() {
        print_element(&mut out, element, 1)?;
    }
    Ok(())
}

fn print_element(out: &mut impl Write, element: &Element, depth: usize) -> io::Result<()> {
    let location = element.location();
    write!(
        out,
        "{}{}{} [{}:{}]",
        "  ".repeat(depth - 1),
        ".".repeat(depth),
        element.name(),
        location.line,
        location.column
    )?;
    for value in element.values() {
        write!(out, " {}", describe(value))?;
    }
    writeln!(out)?;
    for child in element.children() {
        print_element(out, child, depth + 1)?;
    }
    Ok(())
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => format!("string({text:?})"),
        Value::Number(number) if number.is_integral() => format!("integer({number})"),
        Value::Number(number) => format!("decimal({number})"),
        Value::SerialNumber(serial) => format!("serial({serial})"),
        Value::Reference(reference) => format!("ref({reference})"),
        Value::ReferenceIsland(members) => {
            let members: Vec<String> = members.iter().map(|m| m.to_string()).collect();
            format!("island({})", members.join(" "))
        }
        Value::Default => "default".to_string(),
        Value::Unspecified => "unspecified".to_string(),
    }
}

fn run_detect(file: &str) -> Result<(), CliError> {
    let bytes = read_input(file)?;
    let detection = inspect(&bytes[..bytes.len().min(DETECT_PREFIX_LEN)]);
    println!("charset: {}", detection.charset);
    println!("status: {:?}", detection.status);
    if detection.skip > 0 {
        println!("skip: {} bytes", detection.skip);
    }
    Ok(())
}

fn run_format(
    file: &str,
    charset: Option<&str>,
    preserve_lines: bool,
    output: Option<&str>,
    features: ParserFeatures,
) -> Result<(), CliError> {
    let charset = match charset {
        Some(name) => Charset::from_declaration(name)
            .ok_or_else(|| CliError::Usage(format!("unknown charset '{name}'")))?,
        None => Charset::Utf8,
    };

    let input = Input::read(file)?;
    let document = input.document(features)?;

    let mut options = FormatOptions::new().charset(charset);
    if preserve_lines {
        options = options.preserve_lines();
    }
    let bytes = SosiWriter::new(options).write_bytes(&document);

    match output {
        Some(path) if path != "-" => std::fs::write(path, &bytes)?,
        _ => io::stdout().write_all(&bytes)?,
    }
    Ok(())
}
