//! CLI argument definition for mermaid-render.
//!
//! clap only splits off the command keyword and the bridge settings. The
//! tokens after `render` and `batch` are kept verbatim and walked as
//! flag/value pairs by `options`, which tolerates flags it does not know.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Render Mermaid diagrams as SVG or ASCII art.
#[derive(Parser, Debug)]
#[command(
    name = "mermaid-render",
    version,
    about = "Render Mermaid diagrams as SVG or ASCII art with beautiful-mermaid"
)]
pub struct Cli {
    /// Node.js executable used to run the render bridge.
    #[arg(long, env = "MERMAID_RENDER_NODE", default_value = "node")]
    pub node: PathBuf,

    /// Directory the bridge runs in; `beautiful-mermaid` is resolved from here.
    #[arg(long, env = "MERMAID_RENDER_MODULE_DIR")]
    pub module_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Render one diagram: --input <path> [--output <path>] [--format svg|ascii] ...
    Render {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the built-in theme names as a JSON array.
    ListThemes {
        /// Extra tokens are accepted and ignored.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        ignored: Vec<String>,
    },

    /// Render every .mmd file of a directory: --input-dir <dir> --output-dir <dir> ...
    Batch {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Anything else; reported as an unknown command.
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}
