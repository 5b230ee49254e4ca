//! Netlex - netlist and VCD lexer
//!
//! Runs single productions over text and scans whitelist and VCD files.
//!
//! # Usage
//!
//! ```bash
//! netlex lex ConnectionList '.a(x), .b({y, z}));'
//! netlex connections '.a(x), .b({y, z})'
//! RUST_LOG=debug netlex vcd-vars dump.vcd
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use netlex::{
    error::{NetlexError, Result},
    netlist::{self, Production},
    scan, signals, vcd,
};

/// Structural netlist and VCD lexer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one netlist production and print the token and remainder
    Lex {
        /// Production name, e.g. ConnectionList or HexImmediate
        #[arg(value_name = "RULE", value_parser = parse_rule)]
        rule: Production,
        text: String,
    },
    /// Print each connection of a connection list as `port<TAB>element`
    Connections { text: String },
    /// Print each binding of a `#(...)` block as `port<TAB>value`
    Params { text: String },
    /// Decode a numeric literal to its width and value
    Literal { text: String },
    /// Print every signal key of a whitelist file
    Whitelist {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Print every `$var` of a VCD header as `code<TAB>width<TAB>name`
    VcdVars {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| NetlexError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufReader::new(file))
}

/// Resolve a production by name for the `RULE` argument.
fn parse_rule(name: &str) -> std::result::Result<Production, String> {
    Production::from_name(name).ok_or_else(|| {
        let names: Vec<_> = Production::ALL.iter().map(|p| p.to_string()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

fn lex(production: Production, text: &str) -> Result<()> {
    let (rest, token) = scan::consume(text, production)?;
    println!("token: {}", token);
    println!("rest:  {}", rest);
    Ok(())
}

fn print_connections(connections: &[netlist::Connection]) {
    for connection in connections {
        let (port, element) = connection.as_pair();
        println!("{}\t{}", port, element);
    }
}

fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();
    let args = Args::parse();

    match args.command {
        Command::Lex { rule, text } => lex(rule, &text)?,
        Command::Connections { text } => {
            let (_, token) = netlist::consume_connection_list(&text)?;
            print_connections(&netlist::extract_connections(&token));
        }
        Command::Params { text } => {
            let (_, token) = netlist::consume_module_parameters(&text)?;
            print_connections(&netlist::extract_module_parameters(&token));
        }
        Command::Literal { text } => {
            let (_, token) = netlist::consume_immediate(&text)?;
            if token.starts_with('"') {
                println!("string\t{}", token);
            } else {
                let literal = netlist::literal_to_value(&token)?;
                println!("{}\t{}", literal.width, literal.value);
            }
        }
        Command::Whitelist { path } => {
            for key in signals::scan_signal_keys(open(&path)?)? {
                println!("{}", key);
            }
        }
        Command::VcdVars { path } => {
            for var in vcd::scan_vars(open(&path)?)? {
                println!("{}\t{}\t{}", var.code, var.width, var.name);
            }
        }
    }

    Ok(())
}
