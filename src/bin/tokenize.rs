//! Tokenizes a formula given on the command line, or read from stdin if no
//! argument is given.
//!
//! Run with: `cargo run --bin tokenize -- "=SUM(A1,B1)"`
//! Add `--json` to print the token array as JSON instead of the
//! indented debug form.

use std::env;
use std::io::{self, Read};

use anyhow::{Context, Result};
use formula_tokenizer::{pretty_print, tokenize};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let formula_arg = args.into_iter().find(|a| a != "--json");

    let formula = match formula_arg {
        Some(formula) => formula,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read formula from stdin")?;
            buf
        }
    };

    let tokens = tokenize(&formula);

    if as_json {
        let json = serde_json::to_string_pretty(&tokens).context("failed to serialize tokens")?;
        println!("{json}");
    } else {
        print!("{}", pretty_print(&tokens));
    }

    Ok(())
}
