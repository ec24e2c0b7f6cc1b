pub mod diff;
pub mod explain;
pub mod read;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "spatch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a JSON Pointer within a document
    Read(ReadArgs),

    /// Compute a schema-driven structural diff between two JSON documents
    Diff(DiffArgs),

    /// Print only the human-readable explanations for a diff between two JSON documents
    Explain(ExplainArgs),
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// JSON Pointer expression to resolve within the document, e.g. /store/book/0/title
    ///
    /// The provided path MUST resolve to a single value; otherwise, an error will be returned.
    pub path: String,

    /// Path to the JSON file to read. Reads from stdin when omitted.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Path to the old JSON document
    pub file1: PathBuf,

    /// Path to the new JSON document
    pub file2: PathBuf,

    /// Path to an optional JSON Schema used to compile per-array matching plans
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Restrict the diff to a sub-tree rooted at this JSON Pointer (may be repeated)
    #[arg(short, long = "partial-key")]
    pub partial_keys: Vec<String>,

    /// Omit the human-readable explanation attached to each delta
    #[arg(long)]
    pub no_explain: bool,

    /// Emit a tracing span around the diff call
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExplainArgs {
    /// Path to the old JSON document
    pub file1: PathBuf,

    /// Path to the new JSON document
    pub file2: PathBuf,

    /// Path to an optional JSON Schema used to compile per-array matching plans
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Restrict the diff to a sub-tree rooted at this JSON Pointer (may be repeated)
    #[arg(short, long = "partial-key")]
    pub partial_keys: Vec<String>,
}
