//! Shared helpers for unit tests: a recording backend and temp dirs.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::backend::{AsciiOptions, DiagramBackend, SvgOptions};
use crate::bridge::BridgeError;
use crate::theme::{ColorBundle, ThemeTable};

/// Sources containing this marker make the fake library throw.
pub const FAIL_MARKER: &str = "%% fail";

#[derive(Default)]
struct Recorded {
    themes: ThemeTable,
    svg_calls: RefCell<Vec<(String, SvgOptions)>>,
    ascii_calls: RefCell<Vec<(String, AsciiOptions)>>,
    theme_lookups: Cell<usize>,
}

/// In-memory [`DiagramBackend`] that records every call.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Rc<Recorded>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::with_themes(sample_themes())
    }

    pub fn with_themes(themes: ThemeTable) -> Self {
        Self {
            inner: Rc::new(Recorded {
                themes,
                ..Recorded::default()
            }),
        }
    }

    pub fn svg_calls(&self) -> Vec<(String, SvgOptions)> {
        self.inner.svg_calls.borrow().clone()
    }

    pub fn ascii_calls(&self) -> Vec<(String, AsciiOptions)> {
        self.inner.ascii_calls.borrow().clone()
    }

    pub fn theme_lookups(&self) -> usize {
        self.inner.theme_lookups.get()
    }
}

impl DiagramBackend for FakeBackend {
    async fn render_svg(&self, source: &str, options: &SvgOptions) -> Result<String, BridgeError> {
        self.inner
            .svg_calls
            .borrow_mut()
            .push((source.to_string(), options.clone()));
        tokio::task::yield_now().await;
        if source.contains(FAIL_MARKER) {
            return Err(BridgeError::Library("Parse error on line 1".to_string()));
        }
        Ok(format!(
            "<svg data-bg=\"{}\">{}</svg>",
            options.colors.bg,
            source.trim()
        ))
    }

    async fn render_ascii(
        &self,
        source: &str,
        options: &AsciiOptions,
    ) -> Result<String, BridgeError> {
        self.inner
            .ascii_calls
            .borrow_mut()
            .push((source.to_string(), options.clone()));
        tokio::task::yield_now().await;
        if source.contains(FAIL_MARKER) {
            return Err(BridgeError::Library("Parse error on line 1".to_string()));
        }
        let edge = if options.use_ascii { "+---+" } else { "┌───┐" };
        Ok(format!("{edge}\n{}\n{edge}", source.trim()))
    }

    fn themes(&self) -> Result<ThemeTable, BridgeError> {
        self.inner.theme_lookups.set(self.inner.theme_lookups.get() + 1);
        Ok(self.inner.themes.clone())
    }
}

pub fn bundle(bg: &str, fg: &str) -> ColorBundle {
    ColorBundle {
        bg: bg.to_string(),
        fg: fg.to_string(),
        ..ColorBundle::default()
    }
}

pub fn sample_themes() -> ThemeTable {
    ThemeTable::new(vec![
        ("zinc-light".to_string(), bundle("#FFFFFF", "#27272A")),
        (
            "tokyo-night".to_string(),
            ColorBundle {
                line: Some("#3d59a1".to_string()),
                accent: Some("#7aa2f7".to_string()),
                muted: Some("#565f89".to_string()),
                ..bundle("#1a1b26", "#a9b1d6")
            },
        ),
        ("dracula".to_string(), bundle("#282a36", "#f8f8f2")),
    ])
}

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A scratch directory removed on drop.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "mermaid-render-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `contents` to `name` inside the directory and returns the path.
    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
