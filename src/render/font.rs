//! Tick label font lookup.
//!
//! The bitmap backend rasterizes text with ab_glyph, which only knows fonts
//! registered at runtime. Registered bytes must be `'static`, so each font
//! file is leaked once and remembered by path.

use crate::error::{ReportError, Result};
use plotters::style::{FontStyle, register_font};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::{debug, warn};

/// Probed in order when no font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font files from the system list that exist on this machine.
pub fn system_fonts() -> impl Iterator<Item = &'static Path> {
    SYSTEM_FONTS.iter().map(Path::new).filter(|p| p.is_file())
}

fn registry() -> &'static Mutex<BTreeMap<PathBuf, &'static str>> {
    static REGISTRY: OnceLock<Mutex<BTreeMap<PathBuf, &'static str>>> = OnceLock::new();
    REGISTRY.get_or_init(Default::default)
}

/// Resolve the font family to draw labels with.
///
/// An explicit font must load. Without one, the first usable system font
/// wins; `None` means labels are skipped.
pub fn label_family(explicit: Option<&Path>) -> Result<Option<&'static str>> {
    if let Some(path) = explicit {
        return register(path).map(Some);
    }

    for candidate in system_fonts() {
        match register(candidate) {
            Ok(family) => return Ok(Some(family)),
            Err(e) => warn!(font = %candidate.display(), error = %e, "skipping unusable font"),
        }
    }

    warn!("no label font found; drawing chart without tick labels");
    Ok(None)
}

fn register(path: &Path) -> Result<&'static str> {
    let mut registered = registry()
        .lock()
        .map_err(|_| ReportError::render("font registry poisoned"))?;
    if let Some(family) = registered.get(path).copied() {
        return Ok(family);
    }

    let bytes = fs::read(path)
        .map_err(|e| ReportError::render(format!("read font {}: {}", path.display(), e)))?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    let family: &'static str =
        Box::leak(format!("perf-report-font-{}", registered.len()).into_boxed_str());

    register_font(family, FontStyle::Normal, bytes)
        .map_err(|_| ReportError::render(format!("invalid font {}", path.display())))?;

    debug!(font = %path.display(), family, "registered label font");
    registered.insert(path.to_path_buf(), family);
    Ok(family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_font_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = label_family(Some(&dir.path().join("nope.ttf"))).unwrap_err();
        assert!(matches!(err, ReportError::Render { .. }));
    }

    #[test]
    fn explicit_garbage_font_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.ttf");
        fs::write(&path, b"not a font").unwrap();
        let err = label_family(Some(&path)).unwrap_err();
        assert!(matches!(err, ReportError::Render { .. }));
    }
}
