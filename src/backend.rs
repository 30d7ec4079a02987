//! The seam between this CLI and the diagram library.
//!
//! `DiagramBackend` mirrors the three things the library exports: the SVG
//! renderer, the text-art renderer and the table of built-in themes. Both
//! renderers run out of process, so both are awaited. The production
//! implementation is [`crate::bridge::NodeBridge`]; tests substitute a
//! recording fake.

use serde::Serialize;

use crate::bridge::BridgeError;
use crate::theme::{ColorBundle, ThemeTable};

/// Options for the SVG entry point: a color bundle plus font and
/// transparency, serialized flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SvgOptions {
    #[serde(flatten)]
    pub colors: ColorBundle,
    pub font: String,
    pub transparent: bool,
}

/// Options for the text-art entry point.
///
/// Padding values of `None` serialize as `null`; the bridge hands them to
/// the library as `NaN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsciiOptions {
    pub use_ascii: bool,
    pub padding_x: Option<i64>,
    pub padding_y: Option<i64>,
    pub box_border_padding: Option<i64>,
}

pub trait DiagramBackend {
    /// Renders diagram source to SVG markup.
    async fn render_svg(&self, source: &str, options: &SvgOptions) -> Result<String, BridgeError>;

    /// Renders diagram source to a block of text art.
    async fn render_ascii(
        &self,
        source: &str,
        options: &AsciiOptions,
    ) -> Result<String, BridgeError>;

    /// Returns the built-in themes in declaration order.
    fn themes(&self) -> Result<ThemeTable, BridgeError>;
}
