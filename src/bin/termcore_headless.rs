//! Termcore Headless Runner
//!
//! Feeds plain terminal output through the core without a GUI and prints the
//! resulting visible state. Reads input from stdin or a file.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use termcore::{CoreSettings, NullRenderTarget, Size, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

struct Args {
    cols: Option<usize>,
    rows: Option<usize>,
    /// Resize to this size after processing the input
    resize: Option<(usize, usize)>,
    input_file: Option<PathBuf>,
    settings_file: Option<PathBuf>,
    output_format: OutputFormat,
    show_help: bool,
}

fn parse_size(value: &str) -> Option<(usize, usize)> {
    let (cols, rows) = value.split_once('x')?;
    Some((cols.parse().ok()?, rows.parse().ok()?))
}

fn parse_args() -> Args {
    let mut args = Args {
        cols: None,
        rows: None,
        resize: None,
        input_file: None,
        settings_file: None,
        output_format: OutputFormat::Text,
        show_help: false,
    };
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-c" | "--cols" => {
                i += 1;
                args.cols = argv.get(i).and_then(|v| v.parse().ok());
            }
            "-r" | "--rows" => {
                i += 1;
                args.rows = argv.get(i).and_then(|v| v.parse().ok());
            }
            "--resize" => {
                i += 1;
                args.resize = argv.get(i).and_then(|v| parse_size(v));
            }
            "-f" | "--file" => {
                i += 1;
                args.input_file = argv.get(i).map(PathBuf::from);
            }
            "-s" | "--settings" => {
                i += 1;
                args.settings_file = argv.get(i).map(PathBuf::from);
            }
            "-j" | "--json" => args.output_format = OutputFormat::Json,
            "-t" | "--text" => args.output_format = OutputFormat::Text,
            "-h" | "--help" => args.show_help = true,
            other => {
                // Treat as input file if no flag
                if args.input_file.is_none() && !other.starts_with('-') {
                    args.input_file = Some(PathBuf::from(other));
                }
            }
        }
        i += 1;
    }
    args
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = parse_args();
    if args.show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let mut settings = match &args.settings_file {
        Some(path) => match CoreSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => CoreSettings {
            initial_cols: 80,
            initial_rows: 24,
            history_size: 1000,
            ..CoreSettings::default()
        },
    };
    if let Some(cols) = args.cols {
        settings.initial_cols = i32::try_from(cols).unwrap_or(i32::MAX);
    }
    if let Some(rows) = args.rows {
        settings.initial_rows = i32::try_from(rows).unwrap_or(i32::MAX);
    }

    let terminal = match Terminal::from_settings(&settings, Arc::new(NullRenderTarget)) {
        Ok(terminal) => terminal,
        Err(e) => {
            eprintln!("Error creating terminal: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let input = match &args.input_file {
        Some(path) => std::fs::read(path).map_err(|e| (path.display().to_string(), e)),
        None => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .map(|_| data)
                .map_err(|e| ("stdin".to_string(), e))
        }
    };
    let input = match input {
        Ok(data) => data,
        Err((source, e)) => {
            eprintln!("Error reading {}: {}", source, e);
            return ExitCode::FAILURE;
        }
    };

    let report = terminal.process_output(&String::from_utf8_lossy(&input));
    tracing::debug!(?report, "processed input");

    if let Some((cols, rows)) = args.resize {
        if let Err(e) = terminal.user_resize(Size::new(cols, rows)) {
            eprintln!("Error resizing terminal: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let snapshot = terminal.snapshot();
    match args.output_format {
        OutputFormat::Text => {
            println!("Terminal State ({}x{}):", snapshot.cols, snapshot.rows);
            println!("Cursor: ({}, {})", snapshot.cursor.row, snapshot.cursor.col);
            println!("---");
            print!("{}", snapshot.to_text());
            println!("---");
        }
        OutputFormat::Json => match snapshot.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

fn print_help() {
    println!("Termcore Headless Runner");
    println!();
    println!("Usage: termcore-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -c, --cols <N>         Set terminal width (default: 80)");
    println!("  -r, --rows <N>         Set terminal height (default: 24)");
    println!("      --resize <CxR>     Resize after processing, e.g. 40x10");
    println!("  -s, --settings <PATH>  Load core settings from a JSON file");
    println!("  -f, --file <PATH>      Read input from file");
    println!("  -j, --json             Output snapshot as JSON");
    println!("  -t, --text             Output snapshot as text (default)");
    println!("  -h, --help             Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!("Only CR, LF, BS, HT and BEL are interpreted; ESC and other controls are dropped.");
    println!();
    println!("Examples:");
    println!("  printf 'hello\\r\\nworld' | termcore-headless");
    println!("  termcore-headless -c 20 -r 5 --resize 10x5 input.txt");
    println!("  termcore-headless --json < output.txt > snapshot.json");
}
