//! Backfill missing slugs into post front-matter

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::loader::is_markdown_file;
use crate::content::Header;
use crate::helpers::generate_slug;
use crate::Blog;

/// What happened to a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// A slug was generated and written
    Updated { slug: String, title: String },
    /// The file already had a slug
    AlreadyHasSlug(String),
    /// The file has no front-matter block
    MissingHeader,
    /// The front-matter has no title to derive a slug from
    MissingTitle,
    /// The file is not valid UTF-8 and was left alone
    NotUtf8,
}

/// Per-run counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl BackfillSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        self.processed += 1;
        match outcome {
            FileOutcome::Updated { .. } => self.updated += 1,
            FileOutcome::AlreadyHasSlug(_) => self.unchanged += 1,
            FileOutcome::MissingHeader | FileOutcome::MissingTitle | FileOutcome::NotUtf8 => {
                self.skipped += 1
            }
        }
    }
}

/// Compute the new content of a post, if it needs a slug
pub fn backfill(content: &str) -> (FileOutcome, Option<String>) {
    let Some((mut header, body)) = Header::extract(content) else {
        return (FileOutcome::MissingHeader, None);
    };

    if let Some(slug) = header.get("slug") {
        return (FileOutcome::AlreadyHasSlug(slug), None);
    }

    let Some(title) = header.get("title") else {
        return (FileOutcome::MissingTitle, None);
    };

    let slug = generate_slug(&title);
    header.set_slug(&slug);
    let updated = header.render(body);

    (FileOutcome::Updated { slug, title }, Some(updated))
}

/// Backfill one file in place
pub fn process_file(path: &Path) -> Result<FileOutcome> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let Ok(content) = String::from_utf8(bytes) else {
        return Ok(FileOutcome::NotUtf8);
    };

    let (outcome, updated) = backfill(&content);
    if let Some(updated) = updated {
        fs::write(path, updated).with_context(|| format!("Failed to write {:?}", path))?;
    }

    Ok(outcome)
}

/// Markdown files directly inside `dir`, sorted by name
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read content directory {:?}", dir))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_markdown_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Backfill every post in `dir`
pub fn backfill_dir(dir: &Path) -> Result<BackfillSummary> {
    let files = markdown_files(dir)?;
    let mut summary = BackfillSummary::default();

    if files.is_empty() {
        println!("No markdown files found in {:?}", dir);
        return Ok(summary);
    }

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let outcome = process_file(path)?;
        match &outcome {
            FileOutcome::Updated { slug, title } => {
                println!("  updated  {}: slug '{}' from title '{}'", name, slug, title)
            }
            FileOutcome::AlreadyHasSlug(slug) => {
                println!("  ok       {}: already has slug '{}'", name, slug)
            }
            FileOutcome::MissingHeader => {
                tracing::warn!("{}: no front-matter found, skipping", name)
            }
            FileOutcome::MissingTitle => tracing::warn!("{}: no title found, skipping", name),
            FileOutcome::NotUtf8 => tracing::warn!("{}: not valid UTF-8, skipping", name),
        }
        summary.record(&outcome);
    }

    Ok(summary)
}

/// Run the slug backfill over the site's content directory
pub fn run(blog: &Blog) -> Result<BackfillSummary> {
    tracing::info!("Generating slugs for posts in {:?}", blog.content_dir);
    let summary = backfill_dir(&blog.content_dir)?;

    println!(
        "Processed {} files: {} updated, {} unchanged, {} skipped",
        summary.processed, summary.updated, summary.unchanged, summary.skipped
    );

    Ok(summary)
}
