//! Command dispatch: one entry point per CLI command.

use std::fs;
use std::io::Write;

use color_eyre::eyre::{Result, WrapErr};

use crate::backend::DiagramBackend;
use crate::batch;
use crate::cli::Command;
use crate::error::CliError;
use crate::options::{parse_batch_args, parse_render_args};
use crate::render::RenderPlan;

/// Runs `command` against `backend`.
///
/// Regular output goes to `stdout`; per-file failures of a batch go to
/// `stderr`. Every other failure is returned for the caller to report.
pub async fn run<B>(
    command: Option<Command>,
    backend: &B,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<()>
where
    B: DiagramBackend + Clone + 'static,
{
    match command {
        Some(Command::Render { args }) => render(&args, backend, stdout).await,
        Some(Command::ListThemes { .. }) => list_themes(backend, stdout),
        Some(Command::Batch { args }) => {
            let options = parse_batch_args(&args)?;
            batch::run(&options, backend, stdout, stderr).await
        }
        Some(Command::Unknown(argv)) => {
            let name = argv.into_iter().next().unwrap_or_default();
            Err(CliError::UnknownCommand(name).into())
        }
        None => Err(CliError::MissingCommand.into()),
    }
}

async fn render<B: DiagramBackend>(
    args: &[String],
    backend: &B,
    stdout: &mut impl Write,
) -> Result<()> {
    let options = parse_render_args(args)?;
    let source = fs::read_to_string(&options.input)
        .wrap_err_with(|| format!("failed to read {}", options.input.display()))?;

    let plan = RenderPlan::prepare(backend, &options.diagram)?;
    let rendered = plan.execute(backend, &source).await?;
    rendered.deliver(options.output.as_deref(), stdout)
}

/// Prints the theme names as a pretty JSON array (two-space indent).
fn list_themes<B: DiagramBackend>(backend: &B, stdout: &mut impl Write) -> Result<()> {
    let themes = backend.themes().wrap_err("failed to load themes")?;
    let json = serde_json::to_string_pretty(&themes.names())?;
    writeln!(stdout, "{json}")?;
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
