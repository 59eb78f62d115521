//! sideload: convert between embedded and side-loaded JSON payloads
//!
//! Usage:
//!   # Extract an embedded payload into its side-loaded document
//!   sideload extract --schema schema.json --type superVillain payload.json
//!
//!   # Extract a list payload read from stdin
//!   cat villains.json | sideload extract --schema schema.json --type superVillain --array
//!
//!   # Serialize a record tree with embedded relationships
//!   sideload serialize --schema schema.json --include-id record.json
//!
//!   # Print the URL path of a type
//!   sideload path famousPerson

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sideload::{extract_reader, parse_payload, Record, RestAdapter, Schema, SerializeOptions, Shape};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sideload")]
#[command(about = "Convert between embedded and side-loaded JSON payloads", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull embedded records out of a payload into side-load collections
    Extract {
        /// Schema document declaring types and serializers
        #[arg(long)]
        schema: String,

        /// Type key of the primary data, e.g. superVillain
        #[arg(long = "type")]
        type_key: String,

        /// The payload holds a list of primary records
        #[arg(long)]
        array: bool,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        /// Input file (use stdin if omitted)
        #[arg(value_name = "FILE")]
        input: Option<String>,
    },

    /// Serialize a record tree, embedding configured relationships
    Serialize {
        /// Schema document declaring types and serializers
        #[arg(long)]
        schema: String,

        /// Write the record's own id
        #[arg(long)]
        include_id: bool,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        /// Input file (use stdin if omitted)
        #[arg(value_name = "FILE")]
        input: Option<String>,
    },

    /// Print the URL path for a type key
    Path {
        type_key: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Extract {
            schema,
            type_key,
            array,
            compact,
            input,
        } => {
            let schema = load_schema(&schema)?;
            let shape = if array { Shape::Many } else { Shape::Single };
            let document = extract_reader(open_input(input.as_deref())?, &schema, &type_key, shape)?;
            print_json(&document, compact)
        }
        Command::Serialize {
            schema,
            include_id,
            compact,
            input,
        } => {
            let schema = load_schema(&schema)?;

            let mut content = Vec::new();
            open_input(input.as_deref())?
                .read_to_end(&mut content)
                .context("Failed to read record")?;
            let record: Record = serde_json::from_value(parse_payload(&content)?)
                .context("Input is not a record tree")?;

            let options = SerializeOptions { include_id };
            let data = schema
                .serialize_into_hash(&record, options)
                .with_context(|| format!("Failed to serialize `{}` record", record.type_key))?;
            print_json(&data, compact)
        }
        Command::Path { type_key } => {
            println!("{}", RestAdapter::new().path_for_type(&type_key));
            Ok(())
        }
    }
}

fn load_schema(path: &str) -> Result<Schema> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema {path}"))?;
    Schema::from_json(&json).with_context(|| format!("Invalid schema {path}"))
}

fn open_input(path: Option<&str>) -> Result<Box<dyn Read>> {
    Ok(match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(std::io::stdin()),
    })
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if compact {
        serde_json::to_writer(&mut out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
