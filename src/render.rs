//! Render invocation: turns parsed options into exactly one library call
//! and delivers the result.

use std::fs;
use std::io::Write;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use serde_json::Map;

use crate::backend::{AsciiOptions, DiagramBackend, SvgOptions};
use crate::options::{DiagramOptions, OutputFormat};
use crate::theme::{ColorBundle, ThemeTable};

/// A fully resolved render request, ready to be applied to any number of
/// diagram sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPlan {
    Svg(SvgOptions),
    Ascii(AsciiOptions),
}

impl RenderPlan {
    /// Resolves `options` into a plan. The theme table is fetched from the
    /// backend only when SVG output with a named theme was requested.
    pub fn prepare<B: DiagramBackend>(backend: &B, options: &DiagramOptions) -> Result<Self> {
        match options.format {
            OutputFormat::Ascii => Ok(Self::Ascii(ascii_options(options))),
            OutputFormat::Svg => {
                let themes = match requested_theme(options) {
                    Some(_) => Some(backend.themes().wrap_err("failed to load themes")?),
                    None => None,
                };
                Ok(Self::Svg(svg_options(options, themes.as_ref())))
            }
        }
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Svg(_) => OutputFormat::Svg,
            Self::Ascii(_) => OutputFormat::Ascii,
        }
    }

    /// Calls the matching library entry point.
    pub async fn execute<B: DiagramBackend>(&self, backend: &B, source: &str) -> Result<Rendered> {
        let content = match self {
            Self::Svg(options) => backend.render_svg(source, options).await?,
            Self::Ascii(options) => backend.render_ascii(source, options).await?,
        };
        Ok(Rendered {
            format: self.format(),
            content,
        })
    }
}

/// Library output tagged with the format that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub format: OutputFormat,
    pub content: String,
}

impl Rendered {
    fn label(&self) -> &'static str {
        match self.format {
            OutputFormat::Svg => "SVG",
            OutputFormat::Ascii => "ASCII",
        }
    }

    /// Writes the content to `output`, or to `stdout` when no path is set.
    ///
    /// With a path, the file receives the content byte-for-byte and
    /// `stdout` only gets the confirmation line.
    pub fn deliver(&self, output: Option<&Path>, stdout: &mut impl Write) -> Result<()> {
        match output {
            Some(path) => {
                self.write_to(path)?;
                writeln!(stdout, "{} diagram saved to {}", self.label(), path.display())?;
            }
            None => writeln!(stdout, "{}", self.content)?,
        }
        Ok(())
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.content)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {} bytes to {}", self.content.len(), path.display());
        Ok(())
    }
}

pub fn extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Svg => "svg",
        OutputFormat::Ascii => "txt",
    }
}

fn requested_theme(options: &DiagramOptions) -> Option<&str> {
    options.theme.as_deref().filter(|name| !name.is_empty())
}

/// Builds the SVG options.
///
/// A theme found in `themes` supplies the whole color bundle and explicit
/// color flags are dropped. Otherwise the bundle is bg and fg plus the
/// optional channels that were given a non-empty value.
pub fn svg_options(options: &DiagramOptions, themes: Option<&ThemeTable>) -> SvgOptions {
    let preset = requested_theme(options).and_then(|name| {
        let bundle = themes.and_then(|table| table.get(name));
        if bundle.is_none() {
            log::warn!("unknown theme `{name}`, falling back to explicit colors");
        }
        bundle.cloned()
    });

    let colors = preset.unwrap_or_else(|| ColorBundle {
        bg: options.bg.clone(),
        fg: options.fg.clone(),
        line: explicit(&options.line),
        accent: explicit(&options.accent),
        muted: explicit(&options.muted),
        surface: explicit(&options.surface),
        border: explicit(&options.border),
        extra: Map::new(),
    });

    SvgOptions {
        colors,
        font: options.font.clone(),
        transparent: options.transparent,
    }
}

pub fn ascii_options(options: &DiagramOptions) -> AsciiOptions {
    AsciiOptions {
        use_ascii: options.use_ascii,
        padding_x: options.padding_x,
        padding_y: options.padding_y,
        box_border_padding: options.box_border_padding,
    }
}

fn explicit(color: &Option<String>) -> Option<String> {
    color.as_ref().filter(|c| !c.is_empty()).cloned()
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
