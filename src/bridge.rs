//! Node.js bridge to the beautiful-mermaid library.
//!
//! Every call spawns `node --input-type=module --eval <bridge.mjs>`,
//! writes one JSON request to the child's stdin and reads one JSON reply
//! from its stdout. The library is resolved from the child's working
//! directory, so `module_dir` must be a directory where
//! `beautiful-mermaid` is installed (or one of its ancestors is).

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::backend::{AsciiOptions, DiagramBackend, SvgOptions};
use crate::theme::ThemeTable;

const BRIDGE_SCRIPT: &str = include_str!("bridge.mjs");

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(
        "Node.js not found (tried `{}`); install Node.js or set MERMAID_RENDER_NODE",
        .0.display()
    )]
    NodeNotFound(PathBuf),

    #[error("module directory does not exist: {}", .0.display())]
    ModuleDirMissing(PathBuf),

    #[error("failed to run the render bridge: {0}")]
    Io(#[from] io::Error),

    #[error("render bridge exited with {status}: {stderr}")]
    Exited { status: ExitStatus, stderr: String },

    #[error("unexpected reply from the render bridge: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("render bridge reply carried no value")]
    EmptyReply,

    /// An error thrown by the library itself, message passed through.
    #[error("{0}")]
    Library(String),
}

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Request<'a> {
    Themes,
    Svg {
        source: &'a str,
        options: &'a SvgOptions,
    },
    Ascii {
        source: &'a str,
        options: &'a AsciiOptions,
    },
}

impl Request<'_> {
    fn op(&self) -> &'static str {
        match self {
            Self::Themes => "themes",
            Self::Svg { .. } => "svg",
            Self::Ascii { .. } => "ascii",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Reply<T> {
    ok: bool,
    value: Option<T>,
    error: Option<String>,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, BridgeError> {
        if self.ok {
            self.value.ok_or(BridgeError::EmptyReply)
        } else {
            Err(BridgeError::Library(
                self.error
                    .unwrap_or_else(|| "unknown error in diagram library".to_string()),
            ))
        }
    }
}

/// Production [`DiagramBackend`] backed by a Node.js child process.
#[derive(Debug, Clone)]
pub struct NodeBridge {
    node: PathBuf,
    module_dir: Option<PathBuf>,
}

impl NodeBridge {
    pub fn new(node: impl Into<PathBuf>, module_dir: Option<PathBuf>) -> Self {
        Self {
            node: node.into(),
            module_dir,
        }
    }

    fn command(&self) -> Result<Command, BridgeError> {
        let mut command = Command::new(&self.node);
        command
            .arg("--input-type=module")
            .arg("--eval")
            .arg(BRIDGE_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.module_dir {
            if !dir.is_dir() {
                return Err(BridgeError::ModuleDirMissing(dir.clone()));
            }
            command.current_dir(dir);
        }
        Ok(command)
    }

    fn spawn_error(&self, err: io::Error) -> BridgeError {
        if err.kind() == io::ErrorKind::NotFound {
            BridgeError::NodeNotFound(self.node.clone())
        } else {
            BridgeError::Io(err)
        }
    }

    fn call_blocking<T: DeserializeOwned>(&self, request: &Request<'_>) -> Result<T, BridgeError> {
        let payload = serde_json::to_vec(request)?;
        log::debug!(
            "spawning render bridge ({}) via {}",
            request.op(),
            self.node.display()
        );

        let mut child = self.command()?.spawn().map_err(|err| self.spawn_error(err))?;
        if let Some(mut stdin) = child.stdin.take() {
            // A child that died early reports itself through its exit status.
            if let Err(err) = stdin.write_all(&payload) {
                if err.kind() != io::ErrorKind::BrokenPipe {
                    return Err(err.into());
                }
            }
        }
        decode(child.wait_with_output()?)
    }

    async fn call<T: DeserializeOwned>(&self, request: &Request<'_>) -> Result<T, BridgeError> {
        let payload = serde_json::to_vec(request)?;
        log::debug!(
            "spawning render bridge ({}) via {}",
            request.op(),
            self.node.display()
        );

        let mut child = tokio::process::Command::from(self.command()?)
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| self.spawn_error(err))?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(&payload).await {
                if err.kind() != io::ErrorKind::BrokenPipe {
                    return Err(err.into());
                }
            }
        }
        decode(child.wait_with_output().await?)
    }
}

impl DiagramBackend for NodeBridge {
    async fn render_svg(&self, source: &str, options: &SvgOptions) -> Result<String, BridgeError> {
        self.call(&Request::Svg { source, options }).await
    }

    async fn render_ascii(
        &self,
        source: &str,
        options: &AsciiOptions,
    ) -> Result<String, BridgeError> {
        self.call(&Request::Ascii { source, options }).await
    }

    fn themes(&self) -> Result<ThemeTable, BridgeError> {
        self.call_blocking(&Request::Themes)
    }
}

/// Turns a finished bridge process into the reply value.
///
/// A well-formed reply wins even when the exit status is non-zero; only
/// without one does the captured stderr become the error.
fn decode<T: DeserializeOwned>(output: Output) -> Result<T, BridgeError> {
    if output.status.success() {
        return parse_reply(&output.stdout);
    }
    match serde_json::from_slice::<Reply<T>>(&output.stdout) {
        Ok(reply) => reply.into_result(),
        Err(_) => Err(BridgeError::Exited {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
    }
}

fn parse_reply<T: DeserializeOwned>(stdout: &[u8]) -> Result<T, BridgeError> {
    serde_json::from_slice::<Reply<T>>(stdout)?.into_result()
}
