//! Command-line interface for dtdcheck
//! This binary parses DTDs, dumps their models, and manages compiled grammar caches.
//!
//! Usage:
//!   dtdcheck dump `<path>` [--json] [--root `<name>`]  - Parse a DTD and print its model
//!   dtdcheck compile `<path>` `<cache>`                  - Compile content models into a cache file
//!   dtdcheck show-cache `<cache>`                      - List the patterns stored in a cache

use clap::{Arg, ArgAction, Command};
use std::io;
use std::path::Path;

use dtdcheck::compiler::cache;
use dtdcheck::compiler::GrammarTable;
use dtdcheck::error::DtdError;
use dtdcheck::parser::{AttributeType, DefaultDecl, Dtd, DtdAttribute, DtdParser};
use dtdcheck::scanner::{FileExpander, Scanner};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let matches = Command::new("dtdcheck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting DTDs and compiling their content models")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("dump")
                .about("Parse a DTD and print its model")
                .arg(
                    Arg::new("path")
                        .help("Path to the DTD file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit the model as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("root")
                        .long("root")
                        .help("Use this root element instead of guessing"),
                ),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile content models and write a grammar cache")
                .arg(
                    Arg::new("path")
                        .help("Path to the DTD file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("cache")
                        .help("Path of the cache file to write")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("show-cache")
                .about("List the patterns stored in a grammar cache")
                .arg(
                    Arg::new("path")
                        .help("Path to the cache file")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    // Handle subcommands
    match matches.subcommand() {
        Some(("dump", dump_matches)) => {
            let path = dump_matches.get_one::<String>("path").unwrap();
            let json = dump_matches.get_flag("json");
            let root = dump_matches.get_one::<String>("root");
            handle_dump_command(path, json, root.map(String::as_str));
        }
        Some(("compile", compile_matches)) => {
            let path = compile_matches.get_one::<String>("path").unwrap();
            let cache_path = compile_matches.get_one::<String>("cache").unwrap();
            handle_compile_command(path, cache_path);
        }
        Some(("show-cache", show_matches)) => {
            let path = show_matches.get_one::<String>("path").unwrap();
            handle_show_cache_command(path);
        }
        _ => unreachable!(),
    }
}

/// Handle the dump command
fn handle_dump_command(path: &str, json: bool, root: Option<&str>) {
    match run_dump(path, json, root) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the compile command
fn handle_compile_command(path: &str, cache_path: &str) {
    match run_compile(path, cache_path) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the show-cache command
fn handle_show_cache_command(path: &str) {
    match run_show_cache(path) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_dump(path: &str, json: bool, root: Option<&str>) -> Result<(), DtdError> {
    let mut dtd = parse_dtd(path, root.is_none())?;
    if let Some(name) = root {
        dtd.root_element = Some(name.to_string());
    }

    if json {
        let rendered = serde_json::to_string_pretty(&dtd).map_err(io::Error::from)?;
        println!("{}", rendered);
    } else {
        print_dtd(&dtd, root.is_some());
    }
    Ok(())
}

fn run_compile(path: &str, cache_path: &str) -> Result<(), DtdError> {
    let dtd = parse_dtd(path, false)?;
    let table = GrammarTable::compile(&dtd)?;
    cache::write_cache(&table, Path::new(cache_path))?;
    println!("Compiled {} element patterns to {}", table.len(), cache_path);
    Ok(())
}

fn run_show_cache(path: &str) -> Result<(), DtdError> {
    let table = cache::read_cache(Path::new(path))?;
    for (name, pattern) in table.entries() {
        println!("{}: {}", name, pattern);
    }
    Ok(())
}

/// Parses the DTD at `path`, resolving external parameter entities relative to
/// its directory.
fn parse_dtd(path: &str, guess_root: bool) -> Result<Dtd, DtdError> {
    let text = std::fs::read_to_string(path)?;
    let base_dir = Path::new(path).parent().unwrap_or(Path::new("."));
    let scanner = Scanner::with_expander(path, &text, Box::new(FileExpander::new(base_dir)));
    let dtd = DtdParser::new(scanner).parse(guess_root)?;
    Ok(dtd)
}

fn print_dtd(dtd: &Dtd, forced_root: bool) {
    if let Some(root) = &dtd.root_element {
        if forced_root {
            println!("Root element: {}", root);
        } else {
            println!("Root element is probably: {}", root);
        }
    }

    let mut element_names: Vec<&String> = dtd.elements.keys().collect();
    element_names.sort();
    for name in element_names {
        let element = &dtd.elements[name];
        println!("Element: {}", element.name);
        match &element.content {
            Some(model) => println!("   Content: {}", model),
            None => println!("   Content: (undeclared)"),
        }
        if !element.attributes.is_empty() {
            println!("   Attributes:");
            let mut attribute_names: Vec<&String> = element.attributes.keys().collect();
            attribute_names.sort();
            for attribute_name in attribute_names {
                println!(
                    "        {}",
                    render_attribute(&element.attributes[attribute_name])
                );
            }
        }
    }

    let mut entity_names: Vec<&String> = dtd.entities.keys().collect();
    entity_names.sort();
    for name in entity_names {
        let entity = &dtd.entities[name];
        if entity.is_parameter {
            println!("Parameter entity: {}", entity.name);
        } else {
            println!("Entity: {}", entity.name);
        }
        if let Some(value) = &entity.value {
            println!("    Value: {}", value);
        }
        if let Some(system) = &entity.system_id {
            match &entity.public_id {
                Some(public) => println!("    Public: {} {}", public, system),
                None => println!("    System: {}", system),
            }
        }
        if let Some(ndata) = &entity.ndata {
            println!("    NDATA {}", ndata);
        }
    }

    let mut notation_names: Vec<&String> = dtd.notations.keys().collect();
    notation_names.sort();
    for name in notation_names {
        let notation = &dtd.notations[name];
        println!("Notation: {}", notation.name);
        match (&notation.public_id, &notation.system_id) {
            (Some(public), Some(system)) => println!("    Public: {} {}", public, system),
            (Some(public), None) => println!("    Public: {}", public),
            (None, Some(system)) => println!("    System: {}", system),
            (None, None) => {}
        }
    }
}

fn render_attribute(attribute: &DtdAttribute) -> String {
    let mut out = attribute.name.clone();
    out.push(' ');
    match &attribute.attr_type {
        AttributeType::Named(word) => out.push_str(word),
        AttributeType::Enumeration(items) => {
            out.push('(');
            out.push_str(&items.join("|"));
            out.push(')');
        }
        AttributeType::Notation(items) => {
            out.push_str("NOTATION (");
            out.push_str(&items.join("|"));
            out.push(')');
        }
    }
    match &attribute.default {
        DefaultDecl::Required => out.push_str(" #REQUIRED"),
        DefaultDecl::Implied => out.push_str(" #IMPLIED"),
        DefaultDecl::Fixed(value) => {
            out.push_str(" #FIXED \"");
            out.push_str(value);
            out.push('"');
        }
        DefaultDecl::Value(value) => {
            out.push_str(" \"");
            out.push_str(value);
            out.push('"');
        }
        DefaultDecl::None => {}
    }
    out
}
