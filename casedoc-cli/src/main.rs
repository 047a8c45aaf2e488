// Command-line interface for casedoc
//
// casedoc turns clinical case JSON files into Markdown (or HTML) documents.
// The rendering itself lives in casedoc-render; this binary handles files,
// directories, configuration and output.
//
// Usage:
//  casedoc <input> [--to <format>] [--output <path>]          - Convert (default)
//  casedoc convert <input> [--to <format>] [--output <path>]  - Same as above (explicit)
//  casedoc cases <dir>                                        - List the cases in a directory
//  casedoc --list-formats                                     - List output formats
//
// <input> is a JSON file, `-` for stdin, or a directory of *.json files.
//
// Extra Parameters:
//
// Render settings can be overridden with --extra-<name> <value>, on top of
// casedoc.toml and --config. Supported: max-depth, array-cap, tables,
// date-style, mode.
// Example:
//  casedoc case.json --extra-max-depth 5 --extra-tables false

use casedoc_cli::cases::{json_files, CaseIndex};
use casedoc_config::{CasedocConfig, Loader};
use casedoc_render::{DateStyle, FormatRegistry, Mode, RenderOptions, Renderer};
use chrono::Utc;
use clap::{Arg, ArgAction, Command, ValueHint};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "cases", "help"];
const MODES: &[&str] = &["verbose", "compact"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

/// Arguments with `convert` inserted, when the first argument is an input
/// rather than a subcommand or a flag.
fn with_default_subcommand(args: &[String]) -> Option<Vec<String>> {
    let first = args.get(1)?;
    let is_input = first == "-" || !first.starts_with('-');
    if !is_input || SUBCOMMANDS.contains(&first.as_str()) {
        return None;
    }
    let mut injected = vec![args[0].clone(), "convert".to_string()];
    injected.extend_from_slice(&args[1..]);
    Some(injected)
}

fn build_cli() -> Command {
    Command::new("casedoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render clinical case JSON as Markdown")
        .long_about(
            "casedoc renders clinical case JSON files as readable Markdown documents.\n\n\
            Commands:\n  \
            - convert: Render a file, stdin or a directory of cases (default)\n  \
            - cases:   List the cases found in a directory\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override render settings:\n  \
            max-depth, array-cap, tables, date-style, mode.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            casedoc case.json                        # Markdown to stdout\n  \
            casedoc case.json -o case.html           # HTML, detected from the extension\n  \
            casedoc cases/ -o out/                   # One document per case file\n  \
            cat case.json | casedoc - --mode compact # Read from stdin",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .long_about(
                    "Render clinical case JSON as a document.\n\n\
                    The input may be a file, '-' for stdin, or a directory: every\n\
                    *.json file in it is rendered in file name order.\n\n\
                    The output format comes from --to, else the extension of --output,\n\
                    else the configured default (output.format).\n\n\
                    Invalid JSON is not an error: an error document is rendered instead.",
                )
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
                        .help("Output format (markdown, html)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file, or output directory for directory input")
                        .long_help(
                            "Path to write the rendered output.\n\n\
                            If not specified, output is written to stdout.\n\
                            For directory input this is a directory; each case is written\n\
                            to <output>/<file stem>.<format extension>.",
                        )
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .help("Default density for documents without a 'mode' field")
                        .value_parser(clap::builder::PossibleValuesParser::new(MODES)),
                ),
        )
        .subcommand(
            Command::new("cases")
                .about("List the cases in a directory")
                .long_about(
                    "Index every *.json file in a directory by its case_id and print\n\
                    one line per case: case_id, title and file name, tab separated.\n\n\
                    Files that cannot be parsed are reported on stderr and skipped.",
                )
                .arg(
                    Arg::new("dir")
                        .help("Directory holding case files")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::DirPath),
                ),
        )
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CASEDOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => match with_default_subcommand(&cleaned_args) {
            Some(injected) => match cli.try_get_matches_from(&injected) {
                Ok(m) => m,
                Err(e2) => e2.exit(),
            },
            None => e.exit(),
        },
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    for key in extra_params.keys() {
        warn!("ignoring unknown parameter --extra-{key}");
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                eprintln!("Error: missing input");
                std::process::exit(1);
            };
            if let Some(mode) = sub_matches.get_one::<String>("mode") {
                config.render.mode = parse_mode_arg("--mode", mode);
            }
            let to = sub_matches.get_one::<String>("to").map(|s| s.as_str());
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, to, output, &config);
        }
        Some(("cases", sub_matches)) => {
            let Some(dir) = sub_matches.get_one::<String>("dir") else {
                eprintln!("Error: missing directory");
                std::process::exit(1);
            };
            handle_cases_command(Path::new(dir));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    to: Option<&str>,
    output: Option<&str>,
    config: &CasedocConfig,
) {
    let registry = FormatRegistry::default();
    let renderer = Renderer::new(RenderOptions::from(config));

    let input_path = Path::new(input);
    if input != "-" && input_path.is_dir() {
        // an output directory says nothing about the format
        let format = to.unwrap_or(config.output.format.as_str());
        ensure_format(&registry, format);
        convert_directory(&renderer, &registry, input_path, format, output.map(Path::new));
        return;
    }

    let format = resolve_format(&registry, to, output, &config.output.format);
    ensure_format(&registry, &format);

    let source = read_input(input);
    let text = convert_source(&renderer, &registry, &source, &format);
    match output {
        Some(path) => write_file(Path::new(path), &text),
        None => print!("{text}"),
    }
}

fn convert_directory(
    renderer: &Renderer,
    registry: &FormatRegistry,
    dir: &Path,
    format: &str,
    output_dir: Option<&Path>,
) {
    let files = json_files(dir).unwrap_or_else(|e| {
        eprintln!("Error reading directory '{}': {e}", dir.display());
        std::process::exit(1);
    });
    if files.is_empty() {
        warn!(dir = %dir.display(), "no JSON files found");
        return;
    }

    if let Some(out) = output_dir {
        fs::create_dir_all(out).unwrap_or_else(|e| {
            eprintln!("Error creating directory '{}': {e}", out.display());
            std::process::exit(1);
        });
    }
    let extension = registry
        .get(format)
        .ok()
        .and_then(|f| f.file_extensions().first().copied())
        .unwrap_or(format);

    for (position, file) in files.iter().enumerate() {
        let source = read_file(file);
        let text = convert_source(renderer, registry, &source, format);
        match output_dir {
            Some(out) => {
                let target = output_path(out, file, extension);
                debug!(from = %file.display(), to = %target.display(), "writing case");
                write_file(&target, &text);
            }
            None => {
                if position > 0 {
                    println!();
                }
                print!("{text}");
            }
        }
    }
}

fn convert_source(
    renderer: &Renderer,
    registry: &FormatRegistry,
    source: &str,
    format: &str,
) -> String {
    let doc = renderer.build(source, Utc::now());
    registry.serialize(&doc, format).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    })
}

/// Handle the cases command
fn handle_cases_command(dir: &Path) {
    let index = CaseIndex::load(dir).unwrap_or_else(|e| {
        eprintln!("Error reading directory '{}': {e}", dir.display());
        std::process::exit(1);
    });

    for skipped in &index.skipped {
        eprintln!("Skipping '{}': {}", skipped.path.display(), skipped.reason);
    }
    if index.is_empty() {
        eprintln!("No cases found in '{}'", dir.display());
        return;
    }
    for case in index.cases() {
        println!(
            "{}\t{}\t{}",
            case.case_id,
            case.title.as_deref().unwrap_or("—"),
            case.file_name()
        );
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for (name, description) in registry.describe_formats() {
        println!("  {name:<10} {description}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> CasedocConfig {
    let loader = Loader::new().with_optional_file("casedoc.toml");
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

fn apply_config_overrides(config: &mut CasedocConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("max-depth") {
        config.render.max_depth = parse_usize_arg("max-depth", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["array-cap", "inline-array-cap"]) {
        config.render.inline_array_cap = parse_usize_arg("array-cap", &raw);
    }
    if let Some(raw) = extra_params.remove("compact-array-cap") {
        config.render.compact_array_cap = parse_usize_arg("compact-array-cap", &raw);
    }
    if let Some(raw) = extra_params.remove("tables") {
        config.render.tables = parse_bool_arg("tables", &raw);
    }
    if let Some(raw) = extra_params.remove("date-style") {
        config.render.date_style = match raw.to_lowercase().as_str() {
            "iso" => DateStyle::Iso,
            "long" => DateStyle::Long,
            other => {
                eprintln!("Invalid date style '{other}' for --extra-date-style (iso or long)");
                std::process::exit(1);
            }
        };
    }
    if let Some(raw) = extra_params.remove("mode") {
        config.render.mode = parse_mode_arg("--extra-mode", &raw);
    }
}

/// `--to` wins, then the extension of the output file, then the configured default.
fn resolve_format(
    registry: &FormatRegistry,
    to: Option<&str>,
    output: Option<&str>,
    configured: &str,
) -> String {
    if let Some(to) = to {
        return to.to_string();
    }
    output
        .and_then(|path| registry.detect_format_from_filename(path))
        .unwrap_or_else(|| configured.to_string())
}

fn ensure_format(registry: &FormatRegistry, format: &str) {
    if let Err(e) = registry.get(format) {
        eprintln!("Error: {e}");
        eprintln!("Use --list-formats to see the available formats");
        std::process::exit(1);
    }
}

fn output_path(dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    dir.join(format!("{}.{extension}", stem.to_string_lossy()))
}

fn read_input(input: &str) -> String {
    if input != "-" {
        return read_file(Path::new(input));
    }
    let mut source = String::new();
    io::stdin().read_to_string(&mut source).unwrap_or_else(|e| {
        eprintln!("Error reading stdin: {e}");
        std::process::exit(1);
    });
    source
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {e}", path.display());
        std::process::exit(1);
    })
}

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap_or_else(|e| {
        eprintln!("Error writing file '{}': {e}", path.display());
        std::process::exit(1);
    });
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

fn parse_usize_arg(flag: &str, raw: &str) -> usize {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid number '{raw}' for --extra-{flag}");
        std::process::exit(1);
    })
}

fn parse_mode_arg(flag: &str, raw: &str) -> Mode {
    Mode::from_name(&raw.to_lowercase()).unwrap_or_else(|| {
        eprintln!("Invalid mode '{raw}' for {flag} (expected verbose or compact)");
        std::process::exit(1);
    })
}
