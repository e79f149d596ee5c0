// tifor: For(T,R,A,N interpreter with a terminal front end

use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Once;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tifor::interpreter::config::{parse_initial_value, RunOptions};
use tifor::interpreter::engine::Interpreter;
use tifor::interpreter::sink::MessageSink;
use tifor::snapshot::{MockTerminal, VariablePanel};
use tifor::ui::App;

static TRACING: Once = Once::new();

/// Install the stderr subscriber, but only when `RUST_LOG` asks for it.
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .try_init();
    });
}

struct Args {
    file: String,
    initial_value: String,
    warnings: bool,
    headless: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut file = None;
    let mut initial_value = String::new();
    let mut warnings = false;
    let mut headless = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--warnings" => warnings = true,
            "--headless" => headless = true,
            "--ans" => {
                initial_value = iter
                    .next()
                    .ok_or_else(|| "--ans needs a value".to_string())?
                    .clone();
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option '{}'", flag)),
            path => {
                if file.replace(path.to_string()).is_some() {
                    return Err("Only one input file can be given".to_string());
                }
            }
        }
    }

    Ok(Args {
        file: file.ok_or_else(|| "No input file provided".to_string())?,
        initial_value,
        warnings,
        headless,
    })
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <file> [--ans <value>] [--warnings] [--headless]", program_name);
    eprintln!();
    eprintln!("  --ans <value>   initial value of Ans (~ is the negative sign), default 0");
    eprintln!("  --warnings      report parser warnings");
    eprintln!("  --headless      run once and print output instead of starting the TUI");
}

/// Prints Disp lines to stdout and everything else to stderr
struct StdioSink;

impl MessageSink for StdioSink {
    fn on_message(&mut self, text: &str) {
        println!("{}", text);
    }

    fn on_warning(&mut self, text: &str) {
        eprintln!("{}", text);
    }

    fn on_fatal_error(&mut self, text: &str) {
        eprintln!("{}", text);
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("tifor");

    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            return Ok(ExitCode::FAILURE);
        }
    };

    if !Path::new(&args.file).exists() {
        eprintln!("Error: File '{}' not found", args.file);
        print_usage(program_name);
        return Ok(ExitCode::FAILURE);
    }

    let source = fs::read_to_string(&args.file)?;
    let options = RunOptions::default().with_warnings(args.warnings);

    if args.headless {
        let mut interpreter = Interpreter::new((), StdioSink);
        let initial_value = parse_initial_value(&args.initial_value);
        return Ok(match interpreter.run(&source, initial_value, &options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        });
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let interpreter = Interpreter::new(VariablePanel::new(), MockTerminal::new());
    let mut app = App::new(interpreter, source, options, args.initial_value);
    app.run_program();
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
