use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn build_cli() -> Command {
    Command::new("casedoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render clinical case JSON as Markdown")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a casedoc.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render case JSON (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input file, directory, or '-' for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Output format")
                        .value_parser(["markdown", "html"]),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file, or output directory for directory input")
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .help("Default density for documents without a 'mode' field")
                        .value_parser(["verbose", "compact"]),
                ),
        )
        .subcommand(
            Command::new("cases")
                .about("List the cases in a directory")
                .arg(
                    Arg::new("dir")
                        .help("Directory holding case files")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::DirPath),
                ),
        )
}

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=build.rs");

    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    generate_to(Bash, &mut cmd, "casedoc", &outdir)?;
    generate_to(Zsh, &mut cmd, "casedoc", &outdir)?;
    generate_to(Fish, &mut cmd, "casedoc", &outdir)?;

    Ok(())
}
