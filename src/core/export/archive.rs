//! Staging tree and final deliverable
//!
//! A job builds its package in `<output_dir>/.staging-<job_id>`. The
//! archive step either moves that tree to `<output_dir>/<project_id>/<root_folder>`
//! or packs it into `<output_dir>/<project_id>.zip`. A failed job's staging
//! tree and partial archive are removed so it never leaves a deliverable behind.

use crate::config::OutputForm;
use crate::core::assembly::PackageLayout;
use crate::domain::context::ResultExt;
use crate::domain::ids::{JobId, ProjectId};
use crate::domain::{PhotopackError, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Staging directory of a job
pub fn staging_dir(output_dir: &Path, job_id: JobId) -> PathBuf {
    output_dir.join(format!(".staging-{job_id}"))
}

/// Creates the staging tree's subfolders
///
/// The drawing folder is only created when the package has drawings.
///
/// # Errors
///
/// Fails if the staging directory already exists or cannot be created.
pub async fn create_staging(
    staging: &Path,
    layout: &PackageLayout,
    with_drawings: bool,
) -> Result<()> {
    if tokio::fs::try_exists(staging).await.unwrap_or(false) {
        return Err(PhotopackError::Export(format!(
            "Staging directory already exists: {}",
            staging.display()
        )));
    }
    tokio::fs::create_dir_all(staging.join(&layout.photo_folder))
        .await
        .with_context(|| format!("Failed to create {}", staging.display()))?;
    if with_drawings {
        tokio::fs::create_dir_all(staging.join(&layout.drawing_folder))
            .await
            .with_context(|| format!("Failed to create drawing folder in {}", staging.display()))?;
    }
    Ok(())
}

/// Writes the metadata document at the staging root
pub async fn write_metadata(staging: &Path, layout: &PackageLayout, xml: &[u8]) -> Result<PathBuf> {
    let path = staging.join(&layout.metadata_file);
    tokio::fs::write(&path, xml)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Where a project's deliverable lands
pub fn deliverable_path(
    form: OutputForm,
    output_dir: &Path,
    layout: &PackageLayout,
    project_id: &ProjectId,
) -> PathBuf {
    match form {
        OutputForm::Folder => output_dir
            .join(project_id.as_str())
            .join(&layout.root_folder),
        OutputForm::Archive => output_dir.join(format!("{project_id}.zip")),
    }
}

/// Fails when a folder deliverable would collide with an existing one
///
/// Archives are replaced, so only the folder form is checked.
pub async fn ensure_target_free(
    form: OutputForm,
    output_dir: &Path,
    layout: &PackageLayout,
    project_id: &ProjectId,
) -> Result<()> {
    let target = deliverable_path(form, output_dir, layout, project_id);
    if form == OutputForm::Folder && tokio::fs::try_exists(&target).await.unwrap_or(false) {
        return Err(PhotopackError::Export(format!(
            "Output folder already exists: {}",
            target.display()
        )));
    }
    Ok(())
}

/// Turns the staging tree into the deliverable and returns its location
///
/// # Errors
///
/// The folder form fails when `<output_dir>/<project_id>/<root_folder>`
/// already exists. An existing archive is replaced.
pub async fn finalize(
    form: OutputForm,
    staging: &Path,
    output_dir: &Path,
    layout: &PackageLayout,
    project_id: &ProjectId,
    job_id: JobId,
) -> Result<PathBuf> {
    let target = deliverable_path(form, output_dir, layout, project_id);
    match form {
        OutputForm::Folder => {
            ensure_target_free(form, output_dir, layout, project_id).await?;
            let parent = output_dir.join(project_id.as_str());
            tokio::fs::create_dir_all(&parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
            tokio::fs::rename(staging, &target)
                .await
                .with_context(|| format!("Failed to move package to {}", target.display()))?;
            Ok(target)
        }
        OutputForm::Archive => {
            let partial = output_dir.join(format!(".{project_id}-{job_id}.zip.partial"));

            let staging_owned = staging.to_path_buf();
            let partial_owned = partial.clone();
            let root = layout.root_folder.clone();
            let written = match tokio::task::spawn_blocking(move || {
                write_zip(&staging_owned, &root, &partial_owned)
            })
            .await
            {
                Ok(result) => result,
                Err(e) => Err(PhotopackError::Export(format!("Archive task failed: {e}"))),
            };
            let moved = match written {
                Ok(()) => tokio::fs::rename(&partial, &target)
                    .await
                    .with_context(|| format!("Failed to move archive to {}", target.display())),
                Err(e) => Err(e),
            };
            if let Err(e) = moved {
                remove_partial_archive(&partial).await;
                return Err(e);
            }

            remove_staging(staging).await;
            Ok(target)
        }
    }
}

async fn remove_partial_archive(partial: &Path) {
    if let Err(e) = tokio::fs::remove_file(partial).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %partial.display(), error = %e, "Failed to remove partial archive");
        }
    }
}

/// Removes a staging tree, logging instead of failing
pub async fn remove_staging(staging: &Path) {
    match tokio::fs::remove_dir_all(staging).await {
        Ok(()) => tracing::debug!(path = %staging.display(), "Removed staging directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging directory")
        }
    }
}

/// Writes a deterministic zip of `staging` with every entry under `root/`
///
/// Entries are stored uncompressed, sorted by path, with a fixed timestamp,
/// so identical trees give identical bytes.
fn write_zip(staging: &Path, root: &str, target: &Path) -> Result<()> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    collect_tree(staging, staging, &mut files, &mut dirs)?;
    files.sort();
    dirs.sort();

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    let file = File::create(target)
        .with_context(|| format!("Failed to create {}", target.display()))?;
    let mut zip = ZipWriter::new(file);

    zip.add_directory(format!("{root}/"), options)?;
    for dir in &dirs {
        zip.add_directory(format!("{root}/{dir}/"), options)?;
    }
    for rel in &files {
        zip.start_file(format!("{root}/{rel}"), options)?;
        let bytes = std::fs::read(staging.join(rel))
            .with_context(|| format!("Failed to read staged file {rel}"))?;
        zip.write_all(&bytes)?;
    }
    zip.finish()?;
    Ok(())
}

/// Collects slash-separated paths relative to `base`
fn collect_tree(
    base: &Path,
    dir: &Path,
    files: &mut Vec<String>,
    dirs: &mut Vec<String>,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let rel = path
            .strip_prefix(base)
            .map_err(|e| PhotopackError::Export(format!("Unexpected staging path: {e}")))?
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if path.is_dir() {
            dirs.push(rel);
            collect_tree(base, &path, files, dirs)?;
        } else {
            files.push(rel);
        }
    }
    Ok(())
}
