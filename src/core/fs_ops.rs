// src/core/fs_ops.rs
//! File system operations for resume text, saved pages and generated output

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::utils::get_file_extension;

/// Plain-text resume formats; binary formats are decoded by an external tool first.
pub const RESUME_TEXT_EXTENSIONS: [&str; 3] = ["txt", "text", "md"];

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        info!("Written file: {}", path.display());
        Ok(())
    }

    /// Read already-decoded resume text. PDF and DOCX must be converted to
    /// text beforehand.
    pub async fn read_resume_text(path: &Path) -> Result<String> {
        let name = path.to_string_lossy();
        match get_file_extension(&name).as_deref() {
            Some(ext) if RESUME_TEXT_EXTENSIONS.contains(&ext) => {}
            Some(ext @ ("pdf" | "docx" | "doc")) => anyhow::bail!(
                "Cannot read .{} directly: convert {} to plain text first",
                ext,
                path.display()
            ),
            Some(ext) => anyhow::bail!("Unsupported resume format: .{}", ext),
            None => {}
        }

        let text = Self::read_file_safe(path).await?;
        info!("Read {} chars of resume text from {}", text.chars().count(), path.display());
        Ok(text)
    }

    /// Read a saved HTML page
    pub async fn read_html(path: &Path) -> Result<String> {
        let html = Self::read_file_safe(path).await?;
        if html.trim().is_empty() {
            anyhow::bail!("HTML file is empty: {}", path.display());
        }
        Ok(html)
    }
}
