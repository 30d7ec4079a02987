//! Flag parsing for the `render` and `batch` commands.
//!
//! Tokens are consumed as `(flag, value)` pairs. Recognized flags are
//! copied into the option records; anything else is skipped without
//! complaint. The only validation is the presence of the required paths
//! (and, for `batch`, a usable worker count). Colors, fonts and theme
//! names are passed through untouched for the library to judge.

use std::path::PathBuf;

use crate::error::CliError;

pub const DEFAULT_BG: &str = "#FFFFFF";
pub const DEFAULT_FG: &str = "#27272A";
pub const DEFAULT_FONT: &str = "Inter";
pub const DEFAULT_PADDING_X: i64 = 5;
pub const DEFAULT_PADDING_Y: i64 = 5;
pub const DEFAULT_BOX_BORDER_PADDING: i64 = 1;
pub const DEFAULT_WORKERS: usize = 4;

/// Which of the two library entry points to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Ascii,
}

impl OutputFormat {
    /// Only the exact string `ascii` selects text-art output.
    pub fn from_flag(value: &str) -> Self {
        if value == "ascii" {
            Self::Ascii
        } else {
            Self::Svg
        }
    }
}

/// Everything that shapes a rendered diagram, independent of where the
/// source comes from or where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOptions {
    pub format: OutputFormat,
    pub theme: Option<String>,
    pub bg: String,
    pub fg: String,
    pub line: Option<String>,
    pub accent: Option<String>,
    pub muted: Option<String>,
    pub surface: Option<String>,
    pub border: Option<String>,
    pub font: String,
    pub transparent: bool,
    pub use_ascii: bool,
    /// `None` when the flag value was not a number.
    pub padding_x: Option<i64>,
    pub padding_y: Option<i64>,
    pub box_border_padding: Option<i64>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Svg,
            theme: None,
            bg: DEFAULT_BG.to_string(),
            fg: DEFAULT_FG.to_string(),
            line: None,
            accent: None,
            muted: None,
            surface: None,
            border: None,
            font: DEFAULT_FONT.to_string(),
            transparent: false,
            use_ascii: false,
            padding_x: Some(DEFAULT_PADDING_X),
            padding_y: Some(DEFAULT_PADDING_Y),
            box_border_padding: Some(DEFAULT_BOX_BORDER_PADDING),
        }
    }
}

impl DiagramOptions {
    /// Applies one flag. Returns `false` if the flag is not a diagram flag.
    ///
    /// A missing value (trailing flag) unsets the field: optional fields
    /// become `None`, paddings become not-a-number and the remaining
    /// fields fall back to their defaults.
    fn apply(&mut self, flag: &str, value: Option<&str>) -> bool {
        let text = || value.map(str::to_string);
        match flag {
            "--format" => self.format = value.map_or(OutputFormat::Svg, OutputFormat::from_flag),
            "--theme" => self.theme = text(),
            "--bg" => self.bg = value.unwrap_or(DEFAULT_BG).to_string(),
            "--fg" => self.fg = value.unwrap_or(DEFAULT_FG).to_string(),
            "--line" => self.line = text(),
            "--accent" => self.accent = text(),
            "--muted" => self.muted = text(),
            "--surface" => self.surface = text(),
            "--border" => self.border = text(),
            "--font" => self.font = value.unwrap_or(DEFAULT_FONT).to_string(),
            "--transparent" => self.transparent = value == Some("true"),
            "--use-ascii" => self.use_ascii = value == Some("true"),
            "--padding-x" => self.padding_x = value.and_then(parse_int),
            "--padding-y" => self.padding_y = value.and_then(parse_int),
            "--box-border-padding" => self.box_border_padding = value.and_then(parse_int),
            _ => return false,
        }
        true
    }
}

/// Options for a single `render` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub diagram: DiagramOptions,
}

/// Options for a `batch` invocation over a directory of `.mmd` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub workers: usize,
    pub diagram: DiagramOptions,
}

/// Parses the tokens following `render`.
pub fn parse_render_args(args: &[String]) -> Result<RenderOptions, CliError> {
    let mut input = None;
    let mut output = None;
    let mut diagram = DiagramOptions::default();

    for (flag, value) in flag_pairs(args) {
        match flag {
            "--input" => input = value.map(PathBuf::from),
            "--output" => output = value.map(PathBuf::from),
            _ => {
                if !diagram.apply(flag, value) {
                    log::debug!("ignoring unrecognized flag {flag}");
                }
            }
        }
    }

    let input = input
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(CliError::MissingInput)?;
    let output = output.filter(|path| !path.as_os_str().is_empty());

    Ok(RenderOptions {
        input,
        output,
        diagram,
    })
}

/// Parses the tokens following `batch`.
pub fn parse_batch_args(args: &[String]) -> Result<BatchOptions, CliError> {
    let mut input_dir = None;
    let mut output_dir = None;
    let mut workers = None;
    let mut diagram = DiagramOptions::default();

    for (flag, value) in flag_pairs(args) {
        match flag {
            "--input-dir" => input_dir = value.map(PathBuf::from),
            "--output-dir" => output_dir = value.map(PathBuf::from),
            "--workers" => workers = Some(value.unwrap_or_default()),
            _ => {
                if !diagram.apply(flag, value) {
                    log::debug!("ignoring unrecognized flag {flag}");
                }
            }
        }
    }

    let input_dir = input_dir
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(CliError::MissingInputDir)?;
    let output_dir = output_dir
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(CliError::MissingOutputDir)?;
    let workers = match workers {
        None => DEFAULT_WORKERS,
        Some(raw) => parse_int(raw)
            .filter(|&n| n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| CliError::InvalidWorkers(raw.to_string()))?,
    };

    Ok(BatchOptions {
        input_dir,
        output_dir,
        workers,
        diagram,
    })
}

/// Walks the tokens two at a time. A trailing flag pairs with `None`.
fn flag_pairs(args: &[String]) -> impl Iterator<Item = (&str, Option<&str>)> {
    args.chunks(2)
        .map(|pair| (pair[0].as_str(), pair.get(1).map(String::as_str)))
}

/// Lenient integer parse: leading whitespace, an optional sign and an
/// optional `0x` prefix, then as many digits as are present. Trailing
/// characters are ignored. Returns `None` when no digit is found or the
/// value overflows.
pub fn parse_int(value: &str) -> Option<i64> {
    let mut rest = value.trim_start();

    let negative = match rest.as_bytes().first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let radix = if rest.len() >= 2 && (rest.starts_with("0x") || rest.starts_with("0X")) {
        rest = &rest[2..];
        16
    } else {
        10
    };

    let digits = rest
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(rest, |(end, _)| &rest[..end]);
    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
