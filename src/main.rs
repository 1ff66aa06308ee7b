use std::io::IsTerminal;
use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tmsh::formatting::{encode_with_renderer, Identity, Render, Terminal};
use tmsh::language::Document;
use tmsh::parsing::{self, ParserConfig};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("tmsh")
        .version(VERSION)
        .propagate_version(true)
        .about("Read, check, and rewrite TMSH configuration files.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("check")
                .about("Parse the given configuration and report any problems")
                .arg(opaque())
                .arg(filename()),
        )
        .subcommand(
            Command::new("format")
                .about("Parse the given configuration and write it back out in canonical form")
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(opaque())
                .arg(filename()),
        )
        .subcommand(
            Command::new("glob")
                .about("Print only the top-level commands whose key phrase matches a wildcard pattern")
                .arg(
                    Arg::new("pattern")
                        .required(true)
                        .help("Shell style pattern such as 'ltm pool *'. Quote it to protect it from your shell."),
                )
                .arg(opaque())
                .arg(filename()),
        )
        .subcommand(
            Command::new("json")
                .about("Print the parsed configuration as JSON")
                .arg(opaque())
                .arg(filename()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let (filename, content) = read(submatches);
            let document = parse(filename, &content, submatches);
            println!(
                "{}: {} command{}",
                filename.to_string_lossy(),
                document.len(),
                if document.len() == 1 { "" } else { "s" }
            );
        }
        Some(("format", submatches)) => {
            let raw_output = submatches.get_flag("raw-control-chars");
            let (filename, content) = read(submatches);
            let document = parse(filename, &content, submatches);

            let renderer: &dyn Render = if raw_output || std::io::stdout().is_terminal() {
                &Terminal
            } else {
                &Identity
            };
            print!("{}", encode_with_renderer(&document, renderer));
        }
        Some(("glob", submatches)) => {
            let pattern = match submatches.get_one::<String>("pattern") {
                Some(pattern) => pattern,
                None => unreachable!("pattern is a required argument"),
            };
            let (filename, content) = read(submatches);
            let document = parse(filename, &content, submatches);

            match document.glob(pattern) {
                Ok(selected) => {
                    debug!("Matched {} of {}", selected.len(), document.len());
                    print!("{}", selected.dumps());
                }
                Err(error) => {
                    eprintln!("{}: {}", "error".bright_red(), error);
                    std::process::exit(1);
                }
            }
        }
        Some(("json", submatches)) => {
            let (filename, content) = read(submatches);
            let document = parse(filename, &content, submatches);

            match serde_json::to_string_pretty(&document) {
                Ok(json) => println!("{}", json),
                Err(error) => {
                    eprintln!("{}: {}", "error".bright_red(), error);
                    std::process::exit(1);
                }
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: tmsh [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn filename() -> Arg {
    Arg::new("filename")
        .required(true)
        .help("The file containing the configuration, or - to read from standard input.")
}

fn opaque() -> Arg {
    Arg::new("opaque")
        .long("opaque")
        .value_name("PREFIX")
        .action(ArgAction::Append)
        .help("Keep the bodies of commands whose key phrase starts with PREFIX as raw text, in addition to the built-in ones (iRules, scripts, and the like).")
}

fn read(submatches: &ArgMatches) -> (&Path, String) {
    let filename = match submatches.get_one::<String>("filename") {
        Some(filename) => Path::new(filename),
        None => unreachable!("filename is a required argument"),
    };
    debug!(?filename);

    if filename.to_str() == Some("-") {
        let content = match std::io::read_to_string(std::io::stdin()) {
            Ok(content) => content,
            Err(error) => {
                eprintln!("{}: {}", "error".bright_red(), error);
                std::process::exit(1);
            }
        };
        return (filename, content);
    }

    match parsing::load(filename) {
        Ok(content) => (filename, content),
        Err(error) => {
            eprintln!("{}: {}", "error".bright_red(), error);
            std::process::exit(1);
        }
    }
}

fn parse(filename: &Path, content: &str, submatches: &ArgMatches) -> Document {
    let mut config = ParserConfig::default();
    if let Some(prefixes) = submatches.get_many::<String>("opaque") {
        config
            .blacklist
            .extend(prefixes.cloned());
    }

    match parsing::parse_with(content, &config) {
        Ok(document) => document,
        Err(error) => {
            eprintln!("{}", error.full_details(filename, content));
            std::process::exit(1);
        }
    }
}
