use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::params::Params;
use crate::table::load_table;
use crate::urls::{RefUrl, RequestUrl};

#[derive(Parser)]
#[command(name = "maskroute")]
#[command(about = "maskroute route-table tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile every mask in a route table and report problems
    Check {
        /// Route table file (YAML or JSON)
        #[arg(short, long)]
        table: PathBuf,
    },
    /// Match a URL against a route table and print the parameters as JSON
    Resolve {
        /// Route table file (YAML or JSON)
        #[arg(short, long)]
        table: PathBuf,

        /// Absolute URL to resolve
        #[arg(short, long)]
        url: String,
    },
    /// Construct a URL from key=value parameters
    Build {
        /// Route table file (YAML or JSON)
        #[arg(short, long)]
        table: PathBuf,

        /// Reference URL anchoring the construction
        #[arg(short, long, default_value = "http://localhost/")]
        reference: String,

        /// Parameters as key=value pairs
        #[arg(value_parser = parse_key_val, required = true)]
        params: Vec<(String, String)>,
    },
}

fn parse_key_val(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", arg)),
    }
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check { table } => {
            let list = load_table(&table)?;
            println!("{}: ok ({} top-level routers)", table.display(), list.len());
        }
        Commands::Resolve { table, url } => {
            let list = load_table(&table)?;
            let request =
                RequestUrl::parse(&url).with_context(|| format!("parsing URL '{}'", url))?;
            match list.match_url(&request) {
                Some(params) => println!("{}", serde_json::to_string_pretty(&params.to_json())?),
                None => {
                    println!("null");
                    std::process::exit(1);
                }
            }
        }
        Commands::Build {
            table,
            reference,
            params,
        } => {
            let list = load_table(&table)?;
            let reference = RefUrl::parse(&reference)
                .with_context(|| format!("parsing reference URL '{}'", reference))?;
            let params: Params = params
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            match list.construct_url(&params, &reference) {
                Some(url) => println!("{}", url),
                None => {
                    eprintln!("no route could construct a URL from the given parameters");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
