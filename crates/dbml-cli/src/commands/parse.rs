use std::path::{Path, PathBuf};

use dbml_core::{Enum, Table};

use crate::cli::{GlobalOpts, ParseArgs};
use crate::commands::read_source;
use crate::config::load_config;
use crate::diagnostic::render_diagnostic;
use crate::error::{dbml_error_json, CliError};
use crate::output::{OutputContext, OutputMode};

/// Run the `parse` command: parse each discovered file and report results.
///
/// Every file is attempted; failures are rendered as they occur and turned
/// into a single `ParseFailed` at the end.
pub fn run(args: ParseArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(&config.cli.default_schema_dir)]
    } else {
        args.paths
    };
    let files = discover_dbml_files(&paths, &config.cli.file_extension)?;
    tracing::debug!(files = files.len(), "discovered input files");

    let mut total_declarations = 0usize;
    let mut failed = 0usize;
    let mut file_results: Vec<serde_json::Value> = Vec::new();

    for file in &files {
        let source_text = read_source(file)?;
        let filename = file.display().to_string();

        match dbml_syntax::parse(&source_text) {
            Ok(ast) => {
                total_declarations += ast.len();
                let tables = ast.tables();
                let enums = ast.enums();

                // In JSON mode this goes under "printed", never bare on stdout.
                let printed = args.print.then(|| dbml_syntax::print(&ast));

                match output.mode {
                    OutputMode::Human => {
                        if let Some(text) = &printed {
                            print!("{text}");
                        }
                        output.status(&format!(
                            "  {filename} .... {}",
                            describe_counts(ast.len(), &tables, &enums)
                        ));
                    }
                    OutputMode::Json => {
                        file_results.push(serde_json::json!({
                            "file": filename,
                            "declarations": ast.len(),
                            "project": ast.project(),
                            "tables": tables,
                            "enums": enums,
                            "printed": printed,
                            "errors": [],
                        }));
                    }
                    OutputMode::Plain => match &printed {
                        Some(text) => print!("{text}"),
                        None => {
                            println!("{filename}\t{}\t{}\t{}", ast.len(), tables.len(), enums.len());
                        }
                    },
                }
            }
            Err(error) => {
                failed += 1;
                tracing::debug!(file = %filename, %error, "parse failed");

                match output.mode {
                    OutputMode::Human => {
                        let report = render_diagnostic(&error, &source_text, &filename);
                        eprintln!("{report:?}");
                    }
                    OutputMode::Json => {
                        file_results.push(serde_json::json!({
                            "file": filename,
                            "declarations": 0,
                            "errors": [dbml_error_json(&error)],
                        }));
                    }
                    OutputMode::Plain => {
                        eprintln!("{filename}\terror\t{error}");
                    }
                }
            }
        }
    }

    match output.mode {
        OutputMode::Human => {
            let summary = format!(
                "{total_declarations} declarations parsed from {} files, {failed} failed",
                files.len()
            );
            output.summary(failed == 0, &summary);
        }
        OutputMode::Json => {
            output.print_json(&serde_json::json!({
                "files": files.len(),
                "declarations": total_declarations,
                "failed": failed,
                "results": file_results,
            }));
        }
        OutputMode::Plain => {}
    }

    if failed > 0 {
        Err(CliError::ParseFailed {
            failed,
            total: files.len(),
        })
    } else {
        Ok(())
    }
}

fn describe_counts(declarations: usize, tables: &[Table], enums: &[Enum]) -> String {
    let columns: usize = tables.iter().map(|t| t.columns.len()).sum();
    format!(
        "{declarations} declarations ({} tables, {columns} columns, {} enums)",
        tables.len(),
        enums.len()
    )
}

/// Discover DBML files from a list of paths.
///
/// Files are used directly whatever their extension; directories are
/// searched recursively for `**/*.<extension>`.
fn discover_dbml_files(paths: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(glob_directory(path, extension)?);
        } else {
            return Err(CliError::NoSchemaFiles {
                path: path.clone(),
                extension: extension.to_string(),
            });
        }
    }

    if files.is_empty() {
        let display_path = paths
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("schemas/"));
        return Err(CliError::NoSchemaFiles {
            path: display_path,
            extension: extension.to_string(),
        });
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn glob_directory(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CliError> {
    let pattern = format!(
        "{}/**/*.{}",
        glob::Pattern::escape(&dir.display().to_string()),
        extension
    );
    let entries = glob::glob(&pattern).map_err(|e| CliError::Other(e.to_string()))?;
    entries
        .map(|entry| entry.map_err(|e| CliError::Other(e.to_string())))
        .collect()
}
