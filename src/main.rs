mod debug_report;
mod demo;

use chatroute::Options;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_tracing();

    let options = match &config.config {
        Some(path) => match Options::load(path) {
            Ok(options) => options,
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(2);
            }
        },
        None => Options::default(),
    };

    let engine = match demo::engine(options) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: demo registration failed: {err}");
            std::process::exit(1);
        }
    };

    if config.list {
        debug_report::print_listing(&engine.list_commands(config.locale.as_deref()), config.color);
        return;
    }

    let host = demo::host(config.locale.as_deref(), config.admin);
    let message = config.message.unwrap_or_default();
    let report = engine.dispatch_verbose(&host, &demo::caller(), &message);
    debug_report::print_dispatch(&message, &report, config.color);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CHATROUTE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

struct CliConfig {
    message: Option<String>,
    locale: Option<String>,
    admin: bool,
    list: bool,
    config: Option<PathBuf>,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut message: Option<String> = None;
    let mut locale: Option<String> = None;
    let mut admin = false;
    let mut list = false;
    let mut config: Option<PathBuf> = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("chatroute {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--admin" => admin = true,
            "--list" => list = true,
            "--locale" | "-l" => {
                let value = args.next().ok_or_else(|| "error: --locale expects a value".to_string())?;
                locale = Some(value);
            }
            "--config" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --config expects a value".to_string())?;
                config = Some(PathBuf::from(value));
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    message = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--locale=") => {
                locale = Some(arg.trim_start_matches("--locale=").to_string());
            }
            _ if arg.starts_with("--config=") => {
                config = Some(PathBuf::from(arg.trim_start_matches("--config=")));
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                message = Some(rest);
                break;
            }
        }
    }

    if list {
        return Ok(CliConfig { message, locale, admin, list, config, color });
    }

    let message = match message {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if message.trim().is_empty() {
        return Err(format!("error: no message provided\n\n{}", help_text()));
    }

    Ok(CliConfig { message: Some(message), locale, admin, list, config, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "chatroute {version}

Chat command routing engine CLI. Dispatches one message against a built-in
demo command set and prints how it was routed.

Usage:
  chatroute [OPTIONS] [--] <message...>
  chatroute [OPTIONS] --list

Options:
  -l, --locale <tag>         Locale of the caller (e.g. es). Default: none.
  --admin                    Treat the caller as an administrator.
  --list                     Print the commands visible in the locale and exit.
  -c, --config <path>        Load engine options from a TOML file.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

If no message is given on the command line it is read from stdin.
Set CHATROUTE_LOG (or RUST_LOG), e.g. CHATROUTE_LOG=chatroute=trace, for logs.

Exit codes:
  0  Success (the message was dispatched, whatever the outcome).
  1  Internal error.
  2  Invalid arguments, configuration or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
