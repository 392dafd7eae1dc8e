use dbml_syntax::{Lexer, Token};

use crate::cli::TokensArgs;
use crate::commands::read_source;
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `tokens` command: dump the token stream of one file.
pub fn run(args: TokensArgs, output: &OutputContext) -> Result<(), CliError> {
    let source_text = read_source(&args.file)?;

    let tokens = match Lexer::new(&source_text).collect::<Result<Vec<Token>, _>>() {
        Ok(tokens) => tokens,
        Err(error) => {
            return Err(CliError::Parse {
                error,
                source_text,
                file: args.file,
            })
        }
    };

    match output.mode {
        OutputMode::Human => {
            for token in &tokens {
                println!("{token}");
            }
        }
        OutputMode::Json => {
            let list: Vec<serde_json::Value> = tokens.iter().map(token_json).collect();
            output.print_json(&serde_json::Value::Array(list));
        }
        OutputMode::Plain => {
            for token in &tokens {
                println!(
                    "{}\t{}\t{}\t{}",
                    token.kind, token.position.line, token.position.column, token.value
                );
            }
        }
    }

    output.status(&format!("{} tokens", tokens.len()));
    Ok(())
}

fn token_json(token: &Token) -> serde_json::Value {
    serde_json::json!({
        "kind": token.kind.as_str(),
        "value": token.value,
        "line": token.position.line,
        "column": token.position.column,
        "start": token.span.start,
        "end": token.span.end,
    })
}
