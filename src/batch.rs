//! Batch rendering of every `.mmd` file in a directory.
//!
//! Files are rendered concurrently on the current thread, at most
//! `workers` at a time. Both render paths are awaited, so each render is
//! bounded by [`RENDER_TIMEOUT`]; a timed-out render drops its bridge
//! process, which kills it.

use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::sync::Semaphore;
use tokio::task::{JoinSet, LocalSet};

use crate::backend::DiagramBackend;
use crate::error::CliError;
use crate::options::BatchOptions;
use crate::render::{RenderPlan, extension};

pub const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

const DIAGRAM_EXTENSION: &str = "mmd";

pub async fn run<B>(
    options: &BatchOptions,
    backend: &B,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<()>
where
    B: DiagramBackend + Clone + 'static,
{
    if !options.input_dir.is_dir() {
        return Err(CliError::InputDirNotFound(options.input_dir.clone()).into());
    }
    let diagrams = collect_diagrams(&options.input_dir)?;
    if diagrams.is_empty() {
        return Err(CliError::NoDiagrams(options.input_dir.clone()).into());
    }
    fs::create_dir_all(&options.output_dir)
        .wrap_err_with(|| format!("failed to create {}", options.output_dir.display()))?;

    let plan = Rc::new(RenderPlan::prepare(backend, &options.diagram)?);
    let total = diagrams.len();
    writeln!(stdout, "Found {total} diagram(s) to render...")?;

    let semaphore = Arc::new(Semaphore::new(options.workers));
    let local = LocalSet::new();
    let failed = local
        .run_until(async {
            let mut jobs = JoinSet::new();
            for input in diagrams {
                let output = output_path(&input, &options.output_dir, &plan);
                let backend = backend.clone();
                let plan = Rc::clone(&plan);
                let semaphore = Arc::clone(&semaphore);
                jobs.spawn_local(async move {
                    let _permit = semaphore.acquire().await;
                    let outcome = tokio::time::timeout(
                        RENDER_TIMEOUT,
                        render_one(&backend, &plan, &input, &output),
                    )
                    .await
                    .unwrap_or_else(|_| {
                        Err(eyre!("timed out after {}s", RENDER_TIMEOUT.as_secs()))
                    });
                    (display_name(&input), outcome)
                });
            }

            let mut failed = Vec::new();
            while let Some(joined) = jobs.join_next().await {
                let (name, outcome) = joined?;
                match outcome {
                    Ok(()) => writeln!(stdout, "✓ {name}")?,
                    Err(err) => {
                        writeln!(stderr, "✗ {name}: {err:#}")?;
                        failed.push((name, format!("{err:#}")));
                    }
                }
            }
            Ok::<_, color_eyre::eyre::Report>(failed)
        })
        .await?;

    writeln!(
        stdout,
        "\n{}/{total} diagrams rendered successfully",
        total - failed.len()
    )?;

    if failed.is_empty() {
        return Ok(());
    }
    writeln!(stdout, "\n{} failed:", failed.len())?;
    for (name, err) in &failed {
        writeln!(stdout, "  - {name}: {err}")?;
    }
    Err(CliError::BatchFailed {
        failed: failed.len(),
        total,
    }
    .into())
}

async fn render_one<B: DiagramBackend>(
    backend: &B,
    plan: &RenderPlan,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let source = fs::read_to_string(input)
        .wrap_err_with(|| format!("failed to read {}", input.display()))?;
    let rendered = plan.execute(backend, &source).await?;
    rendered.write_to(output)
}

/// Lists the `.mmd` files directly inside `dir`, sorted by path.
fn collect_diagrams(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).wrap_err_with(|| format!("failed to list {}", dir.display()))?;
    let mut diagrams = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension() == Some(OsStr::new(DIAGRAM_EXTENSION)) {
            diagrams.push(path);
        }
    }
    diagrams.sort();
    Ok(diagrams)
}

fn output_path(input: &Path, output_dir: &Path, plan: &RenderPlan) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension(plan.format()));
    output_dir.join(name)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
