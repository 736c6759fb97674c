use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::{ArgAction, Parser, ValueEnum};
use minutes_toon::{Document, ParseOptions};
use tiktoken_rs::cl100k_base;

#[derive(Parser, Debug)]
#[command(
    name = "minutes-toon",
    version,
    about = "Meeting-minutes format parser, validator and serializer"
)]
struct Args {
    /// Input file path (.json, .toon or .txt). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Force encode mode: JSON in, format text out.
    #[arg(short = 'e', long, conflicts_with_all = ["decode", "check"])]
    encode: bool,

    /// Force decode mode: format text in, JSON out.
    #[arg(short = 'd', long, conflicts_with = "check")]
    decode: bool,

    /// Parse and validate only; print a one-line verdict.
    #[arg(long)]
    check: bool,

    /// JSON indentation when decoding (0 for compact output).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Show token statistics when encoding.
    #[arg(long)]
    stats: bool,

    /// Skip the required-fields check when decoding.
    #[arg(long = "no-validate", action = ArgAction::SetFalse, default_value_t = true)]
    validate: bool,

    /// Treat literal "\n" sequences in the input as line breaks.
    #[arg(long = "unescape-newlines", alias = "unescapeNewlines")]
    unescape_newlines: bool,

    /// Report lines the parser skipped on stderr.
    #[arg(long)]
    warnings: bool,

    /// How parse and validation errors are printed on stderr.
    #[arg(long = "error-format", value_enum, value_name = "format", default_value_t = ErrorFormat::Text)]
    error_format: ErrorFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ErrorFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
    Check,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        report_error(err.as_ref(), args.error_format);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let mode = resolve_mode(args, &input_source)?;
    log::debug!("running in {mode:?} mode");

    match mode {
        Mode::Encode => run_encode(args, &input_text, &input_source),
        Mode::Decode => run_decode(args, &input_text, &input_source),
        Mode::Check => run_check(args, &input_text),
    }
}

fn run_encode(args: &Args, input: &str, input_source: &InputSource) -> Result<(), Box<dyn Error>> {
    let document = minutes_toon::from_json_str(input)?;
    let text = minutes_toon::serialize(&document);
    let output_target = OutputTarget::from_arg(args.output.as_deref());
    write_output(output_target.path(), text.as_bytes())?;

    if let OutputTarget::File(path) = &output_target {
        report_status(Mode::Encode, input_source, path);
    }
    if args.stats {
        let leading_newlines = match output_target {
            OutputTarget::File(_) => 1,
            OutputTarget::Stdout => 2,
        };
        print_stats(&document, &text, leading_newlines)?;
    }
    Ok(())
}

fn run_decode(args: &Args, input: &str, input_source: &InputSource) -> Result<(), Box<dyn Error>> {
    let document = parse_input(args, input)?;
    if args.validate {
        minutes_toon::validate(&document)?;
    }

    let json = if args.indent == 0 {
        minutes_toon::to_json_string(&document)?
    } else {
        minutes_toon::to_json_string_pretty(&document, args.indent)?
    };
    let output_target = OutputTarget::from_arg(args.output.as_deref());
    write_output(output_target.path(), json.as_bytes())?;
    if let OutputTarget::File(path) = &output_target {
        report_status(Mode::Decode, input_source, path);
    }
    Ok(())
}

fn run_check(args: &Args, input: &str) -> Result<(), Box<dyn Error>> {
    let document = parse_input(args, input)?;
    minutes_toon::validate(&document)?;
    let records: usize = document.arrays().map(|(_, block)| block.len()).sum();
    println!(
        "✔ valid: {} scalar fields, {} arrays, {} records",
        document.scalars().count(),
        document.arrays().count(),
        records
    );
    Ok(())
}

fn parse_input(args: &Args, input: &str) -> Result<Document, Box<dyn Error>> {
    let options = ParseOptions::new().with_unescape_newlines(args.unescape_newlines);
    let parsed = minutes_toon::parse_detailed(input, &options)?;
    if args.warnings {
        for skipped in &parsed.skipped {
            eprintln!(
                "WARN  line {} skipped ({:?}): {}",
                skipped.line, skipped.reason, skipped.text
            );
        }
    }
    Ok(parsed.document)
}

fn resolve_mode(args: &Args, input_source: &InputSource) -> Result<Mode, Box<dyn Error>> {
    if args.check {
        return Ok(Mode::Check);
    }
    if args.encode {
        return Ok(Mode::Encode);
    }
    if args.decode {
        return Ok(Mode::Decode);
    }

    match input_source {
        InputSource::Stdin => Ok(Mode::Decode),
        InputSource::File(path) => match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Mode::Encode),
            Some("toon") | Some("txt") => Ok(Mode::Decode),
            _ => Err("unable to auto-detect mode; use --encode, --decode or --check".into()),
        },
    }
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

fn report_error(err: &(dyn Error + 'static), format: ErrorFormat) {
    if format == ErrorFormat::Json {
        if let Some(err) = err.downcast_ref::<minutes_toon::Error>() {
            match serde_json::to_string(&err.report()) {
                Ok(json) => {
                    eprintln!("{json}");
                    return;
                }
                Err(json_err) => log::error!("failed to encode error report: {json_err}"),
            }
        }
    }
    eprintln!("ERROR  {err}");
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) => fs::write(path, data)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(data)?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn report_status(mode: Mode, input_source: &InputSource, output_path: &str) {
    let input_label = match input_source {
        InputSource::Stdin => "stdin",
        InputSource::File(path) => path.as_str(),
    };
    let verb = match mode {
        Mode::Encode => "Encoded",
        Mode::Decode => "Decoded",
        Mode::Check => "Checked",
    };
    println!("✔ {verb} {input_label} → {output_path}");
}

fn print_stats(document: &Document, text: &str, leading_newlines: usize) -> Result<(), Box<dyn Error>> {
    let json = minutes_toon::to_json_string(document)?;
    let bpe = cl100k_base()?;
    let json_tokens = count_tokens(&bpe, &json);
    let text_tokens = count_tokens(&bpe, text);
    let saved = json_tokens as isize - text_tokens as isize;
    let pct = if json_tokens > 0 {
        ((text_tokens as f64 - json_tokens as f64) / json_tokens as f64) * 100.0
    } else {
        0.0
    };

    for _ in 0..leading_newlines {
        println!();
    }
    println!("ℹ Token estimates: ~{json_tokens} (JSON) → ~{text_tokens} (minutes)");
    println!("✔ Saved ~{saved} tokens ({pct:.1}%)");
    Ok(())
}

fn count_tokens(bpe: &tiktoken_rs::CoreBPE, text: &str) -> usize {
    bpe.encode_with_special_tokens(text).len()
}
