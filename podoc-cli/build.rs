use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the arguments in src/main.rs
// Build scripts can't access src/ modules, so the command is declared again here
fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("podoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert documents between markup languages")
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
                .help("Source language")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("to")
                .short('t')
                .long("to")
                .value_name("LANG")
                .help("Target language")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Output file path")
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
                .help("Directory to scan for plugin manifests")
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
                        .help("Source language")
                        .value_hint(ValueHint::Other),
                ),
        );

    generate_to(Bash, &mut cmd, "podoc", &outdir)?;
    generate_to(Zsh, &mut cmd, "podoc", &outdir)?;
    generate_to(Fish, &mut cmd, "podoc", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
