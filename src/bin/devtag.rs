//! Command-line interface for devtag
//! This binary is the caller shell around the conversion core: it reads source
//! files, gathers tag declarations from flags or a JSON config file, and writes
//! the rewritten text out. All I/O lives here; the library stays pure.
//!
//! Usage:
//!   devtag convert `<path>` --tag debug --tag log:console.log [--comment `<text>`] [-o `<out>`]
//!   devtag convert `<path>` --config `<cfg.json>`
//!   devtag tags --config `<cfg.json>`

use clap::{Arg, ArgAction, Command};
use devtag::{convert_with_tags, TagSet};
use serde::Deserialize;

/// On-disk configuration: `{ "tags": [...], "comments": [...] }`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    comments: Vec<String>,
}

fn main() {
    let matches = Command::new("devtag")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Expand tagged comments in JavaScript-like source into live code")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Rewrite a source file, expanding the declared tags")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .short('t')
                        .action(ArgAction::Append)
                        .help("Tag declaration, 'tag' or 'tag:method' (repeatable)"),
                )
                .arg(
                    Arg::new("comment")
                        .long("comment")
                        .short('c')
                        .action(ArgAction::Append)
                        .help("Header comment line emitted before the output (repeatable)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("JSON file with 'tags' and 'comments' arrays"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the result here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("tags")
                .about("Validate a configuration file and list the tags it declares")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .required(true)
                        .help("JSON file with a 'tags' array"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("convert", convert_matches)) => {
            let path = convert_matches.get_one::<String>("path").unwrap();
            handle_convert_command(path, convert_matches);
        }
        Some(("tags", tags_matches)) => {
            let config = tags_matches.get_one::<String>("config").unwrap();
            handle_tags_command(config);
        }
        _ => unreachable!(),
    }
}

/// Handle the convert command
fn handle_convert_command(path: &str, matches: &clap::ArgMatches) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error reading {}: {}", path, e);
        std::process::exit(1);
    });

    let config = matches
        .get_one::<String>("config")
        .map(|p| load_config(p))
        .unwrap_or_default();

    // Flag-supplied declarations come first, then the config file's.
    let mut tags: Vec<String> = collect_values(matches, "tag");
    tags.extend(config.tags);
    let mut comments: Vec<String> = collect_values(matches, "comment");
    comments.extend(config.comments);

    let tag_set = TagSet::parse(&tags).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    let comments: Vec<&str> = comments.iter().map(String::as_str).collect();

    let output = convert_with_tags(&source, &tag_set, &comments).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    match matches.get_one::<String>("output") {
        Some(out_path) => {
            std::fs::write(out_path, output).unwrap_or_else(|e| {
                eprintln!("error writing {}: {}", out_path, e);
                std::process::exit(1);
            });
        }
        None => print!("{}", output),
    }
}

/// Handle the tags command
fn handle_tags_command(config_path: &str) {
    let config = load_config(config_path);
    let tag_set = TagSet::parse(&config.tags).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    for tag in tag_set.tags() {
        match tag.method() {
            Some(method) => println!("{} -> {}(...)", tag.name(), method),
            None => println!("{}", tag.name()),
        }
    }
}

fn load_config(path: &str) -> ConfigFile {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error reading {}: {}", path, e);
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error parsing {}: {}", path, e);
        std::process::exit(1);
    })
}

fn collect_values(matches: &clap::ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
