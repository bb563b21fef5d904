//! Minimal CLI: parse → (definitions | show)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use swagger_schema::{Document, ParseOptions, SchemaType, emit};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// parse Swagger/JSON Schema definitions into a resolved schema graph
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// list every definition of each input with its kind
    Definitions(DefinitionsOut),
    /// print one definition (or all of them) as resolved JSON
    Show(ShowOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to the definitions map in each document
    #[arg(long, default_value = "/definitions")]
    definitions_path: String,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct DefinitionsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// print a JSON summary instead of colored text
    #[arg(long)]
    json: bool,
}

#[derive(clap::Parser, Debug)]
struct ShowOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// definition to print (all definitions if omitted)
    #[arg(long)]
    name: Option<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DefinitionSummary {
    name: String,
    kind: &'static str,
    /// target of a top-level alias (`Foo: {$ref: Bar}`)
    #[serde(skip_serializing_if = "Option::is_none")]
    alias_of: Option<String>,
}

#[derive(Debug, Serialize)]
struct FileSummary {
    path: String,
    definitions: Vec<DefinitionSummary>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn options(&self) -> ParseOptions {
        ParseOptions { definitions_path: self.definitions_path.clone() }
    }

    fn source_paths(&self) -> Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")
    }
}

/// Each document gets its own build context, so files are parsed in parallel.
fn summarize(path: &Path, options: &ParseOptions) -> Result<FileSummary> {
    let doc = load_document(path, options)?;
    let definitions = doc
        .iter()
        .map(|(name, schema)| DefinitionSummary {
            name: name.to_string(),
            kind: schema.ty.kind(),
            alias_of: match &schema.ty {
                SchemaType::Structure(s) => Some(s.name().to_string()),
                _ => None,
            },
        })
        .collect();
    Ok(FileSummary { path: path.to_string_lossy().to_string(), definitions })
}

fn load_document(path: &Path, options: &ParseOptions) -> Result<Document> {
    let path_str = path.to_string_lossy();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file ({path_str})"))?;
    let value = serde_json::from_str::<serde_json::Value>(&source)
        .with_context(|| format!("failed to parse JSON source file ({path_str})"))?;
    let doc = Document::from_node(&value, options)
        .with_context(|| format!("failed to resolve schema definitions ({path_str})"))?;
    info!(path = %path_str, definitions = doc.len(), "parsed document");
    Ok(doc)
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Definitions(target) => {
                let options = target.input_settings.options();
                let paths = target.input_settings.source_paths()?;
                let summaries = paths
                    .par_iter()
                    .map(|path| summarize(path, &options))
                    .collect::<Result<Vec<_>>>()?;

                if target.json {
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                    return Ok(());
                }
                for summary in &summaries {
                    println!("{}", summary.path.bold());
                    for def in &summary.definitions {
                        match &def.alias_of {
                            Some(alias) => println!("  {} {} → {}", def.name, def.kind.cyan(), alias),
                            None => println!("  {} {}", def.name, def.kind.cyan()),
                        }
                    }
                }
                Ok(())
            }
            Command::Show(target) => {
                let options = target.input_settings.options();
                let paths = target.input_settings.source_paths()?;
                let [path] = paths.as_slice() else {
                    return Err(anyhow!("`show` takes exactly one input, got {}", paths.len()));
                };
                let doc = load_document(path, &options)?;
                let value = match &target.name {
                    None => emit::document_to_json(&doc, &options),
                    Some(name) => {
                        let schema = doc
                            .get(name)
                            .ok_or_else(|| anyhow!("no definition named `{name}`"))?;
                        emit::schema_to_json_with(schema, &options)
                    }
                };
                let src = serde_json::to_string_pretty(&value)?;

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &src)?;
                } else {
                    println!("{src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(anyhow!("glob pattern matched no files: {pattern}"));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
