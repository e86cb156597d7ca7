//! Page rasterization and output.
//!
//! PDF documents are rendered to page images through the `pdftoppm` CLI;
//! plain image documents are loaded as a single page. Filled pages are
//! written back out as numbered PNGs.

use crate::core::{FillResult, FormFillError};
use crate::utils::load_rgb_image;
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Renders a document into per-page RGB images.
pub trait PageRasterizer {
    /// Renders every page of the document at `path`, in order.
    fn rasterize(&self, path: &Path) -> FillResult<Vec<RgbImage>>;
}

/// `pdftoppm`-backed rasterizer. Image files bypass the CLI and load
/// directly as one page.
#[derive(Debug, Clone)]
pub struct PdftoppmCli {
    /// Render resolution in dots per inch.
    pub dpi: u32,
}

impl PdftoppmCli {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Checks whether the `pdftoppm` binary is on the PATH.
    pub fn is_available() -> bool {
        Command::new("pdftoppm")
            .arg("-v")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn rasterize_pdf(&self, path: &Path) -> FillResult<Vec<RgbImage>> {
        let dir = tempfile::tempdir()?;
        let stem = dir.path().join("page");

        let output = Command::new("pdftoppm")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(path)
            .arg(&stem)
            .output()
            .map_err(|e| {
                FormFillError::page_render(format!("failed to launch pdftoppm: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormFillError::page_render(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // pdftoppm names pages page-1.png, page-2.png, ...; lexicographic
        // sort is wrong past page 9, so sort on the numeric suffix.
        let mut page_files: Vec<PathBuf> = std::fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        page_files.sort_by_key(|p| page_number(p));

        if page_files.is_empty() {
            return Err(FormFillError::page_render(format!(
                "pdftoppm produced no pages for {}",
                path.display()
            )));
        }

        let mut pages = Vec::with_capacity(page_files.len());
        for file in &page_files {
            pages.push(load_rgb_image(file)?);
        }
        info!("rendered {} pages from {}", pages.len(), path.display());
        Ok(pages)
    }
}

impl PageRasterizer for PdftoppmCli {
    fn rasterize(&self, path: &Path) -> FillResult<Vec<RgbImage>> {
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) {
            self.rasterize_pdf(path)
        } else {
            debug!("loading {} as a single-page image", path.display());
            Ok(vec![load_rgb_image(path)?])
        }
    }
}

fn page_number(path: &Path) -> u32 {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.rsplit('-').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Writes filled pages as `<stem>_filled_page_N.png` next to `output_dir`,
/// returning the written paths in page order.
pub fn save_filled_pages(
    pages: &[RgbImage],
    output_dir: &Path,
    stem: &str,
) -> FillResult<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        let path = output_dir.join(format!("{}_filled_page_{}.png", stem, i + 1));
        page.save(&path)?;
        written.push(path);
    }
    info!("wrote {} filled pages to {}", written.len(), output_dir.display());
    Ok(written)
}
