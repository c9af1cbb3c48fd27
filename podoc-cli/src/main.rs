// Command-line interface for podoc
//
// Converts a document from one markup language to another by routing it through the podoc tree.
//
// The source language comes from --from, or from the input file's extension. The target comes
// from --to, or from the output file's extension. Without an input file the document is read
// from stdin, and without -o the result goes to stdout; a tree result is printed as a diagram.
//
// Usage:
//  podoc <input> --to <lang> [--from <lang>] [--output <file>]  - Convert (default)
//  podoc --from <lang> --to <lang> < input                      - Convert stdin
//  podoc inspect <input> [--from <lang>]                        - Print the document tree
//  podoc --list-languages | --list-plugins                      - Show what is registered
//
// Configuration is read from ./podoc.toml if present, then from --config. Plugin manifests are
// discovered in the configured plugin directories and in every --plugin-dir.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use podoc::{Content, Podoc, PluginRegistry, TreePrinter, AST};
use podoc_config::{Loader, PodocConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

fn build_cli() -> Command {
    Command::new("podoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert documents between markup languages")
        .long_about(
            "podoc converts documents between markup languages through a common tree.\n\n\
            Examples:\n  \
            podoc notes.md --to pandoc               # Markdown to Pandoc JSON (stdout)\n  \
            podoc notes.md -o notes.json             # Target taken from the output extension\n  \
            cat notes.md | podoc -f markdown -t ast  # Print the tree of stdin\n  \
            podoc inspect notes.md                   # Same, from a file\n  \
            podoc notes.md -t pandoc --show-path     # Print the conversion chain only",
        )
        .args_conflicts_with_subcommands(true)
        .arg(
            Arg::new("input")
                .help("Input file (stdin if omitted)")
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("from")
                .short('f')
                .long("from")
                .value_name("LANG")
                .help("Source language (detected from the input extension if omitted)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("to")
                .short('t')
                .long("to")
                .value_name("LANG")
                .help("Target language (detected from the output extension if omitted)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Output file path (defaults to stdout)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("show-path")
                .long("show-path")
                .help("Print the conversion chain instead of converting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-languages")
                .long("list-languages")
                .help("List registered languages")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-plugins")
                .long("list-plugins")
                .help("List plugins in attach order")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a podoc.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("plugin-dir")
                .long("plugin-dir")
                .value_name("DIR")
                .help("Directory to scan for plugin manifests (repeatable)")
                .action(ArgAction::Append)
                .value_hint(ValueHint::DirPath)
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the document tree of a file")
                .arg(
                    Arg::new("input")
                        .help("Input file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .short('f')
                        .long("from")
                        .value_name("LANG")
                        .help("Source language (detected from the extension if omitted)")
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    init_tracing(matches.get_flag("debug"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    if let Some(dirs) = matches.get_many::<String>("plugin-dir") {
        config.plugins.dirs.extend(dirs.map(PathBuf::from));
    }

    let registry = config.plugin_registry().unwrap_or_else(|e| {
        eprintln!("Error loading plugins: {e}");
        std::process::exit(1);
    });
    let podoc = Podoc::with_plugins(&registry).unwrap_or_else(|e| {
        eprintln!("Error attaching plugins: {e}");
        std::process::exit(1);
    });

    if matches.get_flag("list-plugins") {
        handle_list_plugins_command(&registry);
        return;
    }
    if matches.get_flag("list-languages") {
        handle_list_languages_command(&podoc);
        return;
    }

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            handle_inspect_command(&podoc, &config, input, from);
        }
        _ => handle_convert_command(&podoc, &config, &matches),
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {e}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> PodocConfig {
    let loader = Loader::new().with_optional_file("podoc.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Read the input document and name its language.
fn read_input(podoc: &Podoc, input: Option<&str>, from: Option<&str>) -> (String, Content) {
    match (input, from) {
        (Some(path), None) => podoc.open(path).unwrap_or_else(|e| {
            eprintln!("Error opening '{path}': {e}");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }),
        (Some(path), Some(lang)) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading file '{path}': {e}");
                std::process::exit(1);
            });
            (lang.to_string(), Content::Text(text))
        }
        (None, Some(lang)) => {
            let text = io::read_to_string(io::stdin()).unwrap_or_else(|e| {
                eprintln!("Error reading stdin: {e}");
                std::process::exit(1);
            });
            (lang.to_string(), Content::Text(text))
        }
        (None, None) => {
            eprintln!("Error: reading from stdin requires --from");
            std::process::exit(1);
        }
    }
}

/// Handle the default convert command
fn handle_convert_command(podoc: &Podoc, config: &PodocConfig, matches: &ArgMatches) {
    let input = matches.get_one::<String>("input").map(|s| s.as_str());
    let from = matches.get_one::<String>("from").map(|s| s.as_str());
    let output = matches.get_one::<String>("output").map(Path::new);

    let target = match matches.get_one::<String>("to") {
        Some(to) => to.clone(),
        None => match output.and_then(|path| podoc.get_lang_for_file(path)) {
            Some(detected) => detected.to_string(),
            None => {
                eprintln!("Error: Could not detect the target language");
                eprintln!("Please specify --to explicitly");
                std::process::exit(1);
            }
        },
    };

    if matches.get_flag("show-path") {
        let source = match (from, input) {
            (Some(lang), _) => lang.to_string(),
            (None, Some(path)) => podoc
                .get_lang_for_file(path)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    eprintln!("Error: Could not detect the language of '{path}'");
                    std::process::exit(1);
                }),
            (None, None) => {
                eprintln!("Error: --show-path needs --from or an input file");
                std::process::exit(1);
            }
        };
        let path = podoc.convert_path(&source, &target).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });
        println!("{}", path.join(" -> "));
        return;
    }

    let (source, content) = read_input(podoc, input, from);
    let converted = if source == target {
        debug!(lang = %source, "source and target match, nothing to convert");
        content
    } else {
        podoc
            .convert_to(content, &source, &target)
            .unwrap_or_else(|e| {
                eprintln!("Conversion error: {e}");
                std::process::exit(1);
            })
    };

    match output {
        Some(path) => podoc.save(path, &target, &converted).unwrap_or_else(|e| {
            eprintln!("Error writing file '{}': {e}", path.display());
            std::process::exit(1);
        }),
        None => print_content(config, &converted),
    }
}

/// Handle the inspect command
fn handle_inspect_command(podoc: &Podoc, config: &PodocConfig, input: &str, from: Option<&str>) {
    let (source, content) = read_input(podoc, Some(input), from);
    let tree = if source == AST {
        content
    } else {
        podoc.convert_to(content, &source, AST).unwrap_or_else(|e| {
            eprintln!("Conversion error: {e}");
            std::process::exit(1);
        })
    };
    print_content(config, &tree);
}

fn print_content(config: &PodocConfig, content: &Content) {
    match content {
        Content::Text(text) => print!("{text}"),
        Content::Tree(tree) => {
            let mut printer = TreePrinter::from(&config.printer);
            println!("{}", printer.render(tree));
        }
    }
}

/// Handle the list-languages command
fn handle_list_languages_command(podoc: &Podoc) {
    println!("Languages:\n");
    for name in podoc.languages() {
        let ext = podoc
            .lang(name)
            .ok()
            .and_then(|lang| lang.get_file_ext())
            .unwrap_or("-");
        println!("  {name:<16} {ext}");
    }

    println!("\nConverters:\n");
    for (source, target) in podoc.conversion_pairs() {
        println!("  {source} -> {target}");
    }
}

/// Handle the list-plugins command
fn handle_list_plugins_command(registry: &PluginRegistry) {
    println!("Plugins (in attach order):\n");
    for plugin in registry.list() {
        println!("  {:<24} {}", plugin.name(), plugin.description());
    }
}
