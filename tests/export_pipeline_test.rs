//! Integration tests for the export pipeline
//!
//! These tests drive [`ExportService`] end to end against in-memory
//! collaborators and a temporary output directory, verifying that:
//! - A successful job produces the folder or archive deliverable
//! - A failing job ends in `failed` and leaves no deliverable behind
//! - Unauthorized requests never create a job
//! - Concurrent jobs keep independent sequences
//! - Folder deliverables of different projects never collide
//! - Snapshots that repeat a file ID are refused before any copy
//! - Job status survives in the status directory

use chrono::NaiveDate;
use photopack::adapters::authz::AllowListAuthorizer;
use photopack::adapters::catalog::MemoryCatalog;
use photopack::adapters::storage::MemoryBinaryStorage;
use photopack::config::{parse_config, OutputForm, PhotopackConfig};
use photopack::core::export::{ExportService, ExportState};
use photopack::core::state::{FileStatusStorage, StateManager};
use photopack::core::validation::codes;
use photopack::core::verification::Verifier;
use photopack::core::assembly::PackageLayout;
use photopack::domain::{
    Classification, ClassifiedDrawing, ClassifiedPhoto, PhotopackError, Principal,
    ProjectId, ProjectSnapshot, StorageError,
};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

struct Harness {
    _dir: TempDir,
    output_dir: std::path::PathBuf,
    status_dir: std::path::PathBuf,
    catalog: Arc<MemoryCatalog>,
    storage: Arc<MemoryBinaryStorage>,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        Self {
            output_dir: dir.path().join("out"),
            status_dir: dir.path().join("jobs"),
            _dir: dir,
            catalog: Arc::new(MemoryCatalog::new()),
            storage: Arc::new(MemoryBinaryStorage::new()),
        }
    }

    fn config(&self, extra: &str) -> PhotopackConfig {
        parse_config(&format!(
            r#"
[export]
output_dir = '{}'
max_retries = 2
retry_backoff_ms = [1]
copy_concurrency = 1
{extra}

[storage]
root = '/unused'

[catalog]
manifest_dir = '/unused'

[state]
status_dir = '{}'
"#,
            self.output_dir.display(),
            self.status_dir.display()
        ))
        .unwrap()
    }

    fn service(&self, config: PhotopackConfig, allowed: &[&str]) -> ExportService {
        let state_manager = Arc::new(StateManager::new_with_storage(Arc::new(
            FileStatusStorage::new(&self.status_dir),
        )));
        ExportService::new(
            config,
            self.catalog.clone(),
            Arc::new(AllowListAuthorizer::new(allowed.iter().copied())),
            self.storage.clone(),
            state_manager,
        )
    }

    /// Registers a project with `photos` photos and `drawings` drawings
    fn project(&self, id: &str, photos: usize, drawings: usize) -> ProjectId {
        let mut snapshot = ProjectSnapshot::default();
        for i in 1..=drawings {
            let reference = format!("{id}/drawings/plan-{i}.pdf");
            self.storage.insert(&reference, format!("drawing {i}").into_bytes());
            snapshot
                .drawings
                .push(ClassifiedDrawing::new(format!("dwg-{i}"), reference).unwrap());
        }
        for i in 1..=photos {
            let reference = format!("{id}/site/IMG_{i:04}.jpg");
            self.storage.insert(&reference, format!("{id} photo {i}").into_bytes());
            let mut builder = ClassifiedPhoto::builder()
                .id(format!("photo-{i}"))
                .binary_ref(reference)
                .classification(Classification::new("工事", "施工状況写真"))
                .title(format!("Photo {i}"))
                .shooting_date(NaiveDate::from_ymd_opt(2024, 5, i as u32).unwrap());
            if drawings > 0 {
                builder = builder.drawing_ref("dwg-1");
            }
            snapshot.photos.push(builder.build().unwrap());
        }
        let project_id = ProjectId::new(id).unwrap();
        self.catalog.insert(project_id.clone(), snapshot);
        project_id
    }
}

fn alice() -> Principal {
    Principal::new("alice").unwrap()
}

fn no_cancel() -> watch::Receiver<bool> {
    watch::channel(false).1
}

fn dir_entries(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .map(|entries| {
            entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_folder_export_produces_verified_package() {
    let harness = Harness::new();
    let project = harness.project("bridge-7", 3, 1);
    let service = harness.service(harness.config(""), &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    assert_eq!(status.state, ExportState::Completed, "{}", status.format_summary());
    assert_eq!(status.percent_complete, 100);
    assert_eq!(status.processed_files, 4);
    assert_eq!(status.total_files, 4);
    assert_eq!(status.copied_files.len(), 4);

    let root = harness.output_dir.join("bridge-7").join("PHOTO");
    assert_eq!(status.archive_location.as_deref(), Some(root.as_path()));
    assert_eq!(
        dir_entries(&root.join("PIC")),
        vec!["P0000001.JPG", "P0000002.JPG", "P0000003.JPG"]
    );
    assert_eq!(dir_entries(&root.join("DRA")), vec!["D0000001.PDF"]);

    let xml = std::fs::read_to_string(root.join("PHOTO05.XML")).unwrap();
    assert!(xml.contains("P0000001.JPG"));
    assert!(xml.contains("D0000001.PDF"));

    // Staging tree is gone
    assert_eq!(dir_entries(&harness.output_dir), vec!["bridge-7"]);
    assert_eq!(dir_entries(&harness.output_dir.join("bridge-7")), vec!["PHOTO"]);

    let report = Verifier::new(PackageLayout::default())
        .verify_package(&root, Some(&status.copied_files))
        .unwrap();
    assert!(report.is_success(), "{}", report.format_summary());
    assert_eq!(report.checksums_verified, 4);
}

#[tokio::test]
async fn test_archive_export_writes_zip() {
    let harness = Harness::new();
    let project = harness.project("bridge-7", 2, 0);
    let mut config = harness.config("");
    config.package.output_form = OutputForm::Archive;
    let service = harness.service(config, &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    assert!(status.is_completed(), "{}", status.format_summary());
    let zip_path = harness.output_dir.join("bridge-7.zip");
    assert_eq!(status.archive_location.as_deref(), Some(zip_path.as_path()));
    assert_eq!(dir_entries(&harness.output_dir), vec!["bridge-7.zip"]);

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
    let names: Vec<String> = archive.file_names().map(String::from).collect();
    assert!(names.contains(&"PHOTO/PHOTO05.XML".to_string()));
    assert!(names.contains(&"PHOTO/PIC/P0000002.JPG".to_string()));
    assert!(!names.iter().any(|n| n.contains("DRA")));

    let mut content = String::new();
    archive
        .by_name("PHOTO/PIC/P0000001.JPG")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "bridge-7 photo 1");
}

#[tokio::test]
async fn test_permanent_copy_failure_leaves_no_deliverable() {
    let harness = Harness::new();
    let project = harness.project("bridge-7", 5, 0);
    harness.storage.fail_always(
        "bridge-7/site/IMG_0004.jpg",
        StorageError::Permanent("disk gone".to_string()),
    );
    let service = harness.service(harness.config(""), &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    assert_eq!(status.state, ExportState::Failed);
    let failure = status.failure.as_ref().unwrap();
    assert_eq!(failure.step, ExportState::CopyingPhotos);
    assert!(failure.reason.contains("P0000004.JPG"), "{}", failure.reason);
    assert_eq!(failure.total_files, 5);
    assert!(failure.processed_files < failure.total_files);
    assert!(status.archive_location.is_none());

    // Neither the deliverable nor the staging tree survives
    assert!(dir_entries(&harness.output_dir).is_empty());
    assert_eq!(harness.storage.open_count("bridge-7/site/IMG_0004.jpg"), 1);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let harness = Harness::new();
    let project = harness.project("bridge-7", 3, 0);
    harness.storage.fail_times(
        "bridge-7/site/IMG_0002.jpg",
        2,
        StorageError::Transient("busy".to_string()),
    );
    let service = harness.service(harness.config(""), &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    assert!(status.is_completed(), "{}", status.format_summary());
    assert_eq!(harness.storage.open_count("bridge-7/site/IMG_0002.jpg"), 3);
}

#[tokio::test]
async fn test_unauthorized_request_creates_no_job() {
    let harness = Harness::new();
    let project = harness.project("bridge-7", 1, 0);
    let service = harness.service(harness.config(""), &["bob"]);

    let result = service
        .request_export(alice(), project, no_cancel())
        .await;

    assert!(matches!(result, Err(PhotopackError::Authorization(_))));
    assert!(dir_entries(&harness.output_dir).is_empty());
    assert!(dir_entries(&harness.status_dir).is_empty());
    assert_eq!(harness.storage.open_count("bridge-7/site/IMG_0001.jpg"), 0);
}

#[tokio::test]
async fn test_project_scoped_authorization() {
    let harness = Harness::new();
    let allowed = harness.project("bridge-7", 1, 0);
    let denied = harness.project("tunnel-2", 1, 0);
    let mut config = harness.config("");
    config.package.output_form = OutputForm::Archive;
    let service = harness.service(config, &["alice@bridge-7"]);

    assert!(service
        .request_export(alice(), allowed, no_cancel())
        .await
        .unwrap()
        .is_completed());
    assert!(matches!(
        service.request_export(alice(), denied, no_cancel()).await,
        Err(PhotopackError::Authorization(_))
    ));
}

#[tokio::test]
async fn test_unknown_project_is_catalog_error() {
    let harness = Harness::new();
    let service = harness.service(harness.config(""), &[]);

    let result = service
        .request_export(alice(), ProjectId::new("ghost").unwrap(), no_cancel())
        .await;

    assert!(matches!(result, Err(PhotopackError::Catalog(_))));
}

#[tokio::test]
async fn test_validation_errors_block_the_package() {
    let harness = Harness::new();
    let mut snapshot = ProjectSnapshot::default();
    harness.storage.insert("p/a.jpg", b"a".to_vec());
    snapshot.photos.push(
        ClassifiedPhoto::builder()
            .id("photo-1")
            .binary_ref("p/a.jpg")
            .classification(Classification::new("工事", "施工状況写真"))
            .title("No date")
            .build()
            .unwrap(),
    );
    let project = ProjectId::new("p").unwrap();
    harness.catalog.insert(project.clone(), snapshot);
    let service = harness.service(harness.config(""), &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    assert_eq!(status.state, ExportState::Failed);
    assert_eq!(status.failure.as_ref().unwrap().step, ExportState::Validating);
    let report = status.validation_report.as_ref().unwrap();
    assert_eq!(report.count_code(codes::MISSING_REQUIRED_FIELD), 1);
    assert!(dir_entries(&harness.output_dir).is_empty());
}

#[tokio::test]
async fn test_warning_policy() {
    let harness = Harness::new();
    let mut snapshot = ProjectSnapshot::default();
    harness.storage.insert("p/a.jpg", b"a".to_vec());
    snapshot.photos.push(
        ClassifiedPhoto::builder()
            .id("photo-1")
            .binary_ref("p/a.jpg")
            .classification(Classification::new("工事", "not-a-category"))
            .title("Odd category")
            .shooting_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .build()
            .unwrap(),
    );
    let project = ProjectId::new("p").unwrap();
    harness.catalog.insert(project.clone(), snapshot);

    let strict = harness.service(harness.config("allow_warnings = false"), &[]);
    let status = strict
        .request_export(alice(), project.clone(), no_cancel())
        .await
        .unwrap();
    assert_eq!(status.state, ExportState::Failed);
    let report = status.validation_report.as_ref().unwrap();
    assert!(report.is_valid());
    assert_eq!(report.count_code(codes::UNRECOGNIZED_CLASSIFICATION), 1);

    let lenient = harness.service(harness.config(""), &[]);
    let status = lenient
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();
    assert!(status.is_completed(), "{}", status.format_summary());
    assert_eq!(status.validation_report.as_ref().unwrap().warnings().len(), 1);
}

#[tokio::test]
async fn test_concurrent_jobs_keep_independent_sequences() {
    let harness = Harness::new();
    let first = harness.project("bridge-7", 4, 0);
    let second = harness.project("tunnel-2", 6, 0);
    let mut config = harness.config("");
    config.package.output_form = OutputForm::Archive;
    let service = harness.service(config, &[]);

    let (first_id, first_handle) = service
        .spawn_export(alice(), first, no_cancel())
        .await
        .unwrap();
    let (second_id, second_handle) = service
        .spawn_export(alice(), second, no_cancel())
        .await
        .unwrap();
    assert_ne!(first_id, second_id);

    let first_status = first_handle.await.unwrap();
    let second_status = second_handle.await.unwrap();
    assert!(first_status.is_completed(), "{}", first_status.format_summary());
    assert!(second_status.is_completed(), "{}", second_status.format_summary());

    let names = |status: &photopack::core::state::JobStatus| {
        let mut names: Vec<String> = status
            .copied_files
            .iter()
            .map(|f| f.delivery_name.clone())
            .collect();
        names.sort();
        names
    };
    assert_eq!(names(&first_status).first().map(String::as_str), Some("P0000001.JPG"));
    assert_eq!(names(&first_status).last().map(String::as_str), Some("P0000004.JPG"));
    assert_eq!(names(&second_status).first().map(String::as_str), Some("P0000001.JPG"));
    assert_eq!(names(&second_status).last().map(String::as_str), Some("P0000006.JPG"));

    assert_eq!(
        service.status(&first_id).await.unwrap().unwrap().state,
        ExportState::Completed
    );
    let partials: Vec<String> = dir_entries(&harness.output_dir)
        .into_iter()
        .filter(|name| name.ends_with(".partial"))
        .collect();
    assert!(partials.is_empty(), "{partials:?}");
}

#[tokio::test]
async fn test_folder_exports_of_two_projects_coexist() {
    let harness = Harness::new();
    let first = harness.project("bridge-7", 2, 0);
    let second = harness.project("tunnel-2", 3, 0);
    let service = harness.service(harness.config(""), &[]);

    for project in [first, second] {
        let status = service
            .request_export(alice(), project, no_cancel())
            .await
            .unwrap();
        assert!(status.is_completed(), "{}", status.format_summary());
    }

    assert_eq!(dir_entries(&harness.output_dir), vec!["bridge-7", "tunnel-2"]);
    assert_eq!(
        dir_entries(&harness.output_dir.join("tunnel-2/PHOTO/PIC")),
        vec!["P0000001.JPG", "P0000002.JPG", "P0000003.JPG"]
    );
    let content =
        std::fs::read_to_string(harness.output_dir.join("bridge-7/PHOTO/PIC/P0000001.JPG"))
            .unwrap();
    assert_eq!(content, "bridge-7 photo 1");
}

#[tokio::test]
async fn test_repeated_photo_id_is_refused_before_copy() {
    let harness = Harness::new();
    let mut snapshot = ProjectSnapshot::default();
    for (reference, title) in [("p/a.jpg", "first"), ("p/b.jpg", "second")] {
        harness.storage.insert(reference, title.as_bytes().to_vec());
        snapshot.photos.push(
            ClassifiedPhoto::builder()
                .id("dup")
                .binary_ref(reference)
                .classification(Classification::new("工事", "施工状況写真"))
                .title(title)
                .shooting_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
                .build()
                .unwrap(),
        );
    }
    let project = ProjectId::new("p").unwrap();
    harness.catalog.insert(project.clone(), snapshot);
    let service = harness.service(harness.config(""), &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    assert_eq!(status.state, ExportState::Failed);
    let failure = status.failure.as_ref().unwrap();
    assert_eq!(failure.step, ExportState::Preparing);
    assert!(failure.reason.contains("'dup'"), "{}", failure.reason);
    assert_eq!(harness.storage.open_count("p/a.jpg"), 0);
    assert_eq!(harness.storage.open_count("p/b.jpg"), 0);
    assert!(dir_entries(&harness.output_dir).is_empty());
}

#[tokio::test]
async fn test_finished_job_leaves_the_live_registry() {
    let harness = Harness::new();
    let project = harness.project("bridge-7", 1, 0);
    let service = harness.service(harness.config(""), &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    assert!(service.subscribe(&status.job_id).is_none());
    let persisted = service.status(&status.job_id).await.unwrap().unwrap();
    assert_eq!(persisted.state, ExportState::Completed);
    assert_eq!(persisted.processed_files, 1);
}

#[tokio::test]
async fn test_status_is_persisted() {
    let harness = Harness::new();
    let project = harness.project("bridge-7", 2, 0);
    let service = harness.service(harness.config(""), &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    let reader = StateManager::new_with_storage(Arc::new(FileStatusStorage::new(
        &harness.status_dir,
    )));
    let persisted = reader.load_status(&status.job_id).await.unwrap().unwrap();
    assert_eq!(persisted.state, ExportState::Completed);
    assert_eq!(persisted.processed_files, 2);
    assert_eq!(persisted.copied_files, status.copied_files);
    assert!(persisted.completed_at.is_some());

    let all = reader.list_statuses().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_existing_folder_target_fails_before_copy() {
    let harness = Harness::new();
    let project = harness.project("bridge-7", 1, 0);
    let existing = harness.output_dir.join("bridge-7").join("PHOTO");
    std::fs::create_dir_all(&existing).unwrap();
    let service = harness.service(harness.config(""), &[]);

    let status = service
        .request_export(alice(), project, no_cancel())
        .await
        .unwrap();

    assert_eq!(status.state, ExportState::Failed);
    let failure = status.failure.as_ref().unwrap();
    assert_eq!(failure.step, ExportState::Preparing);
    assert!(failure.reason.contains("already exists"), "{}", failure.reason);
    assert_eq!(failure.processed_files, 0);
    assert_eq!(harness.storage.open_count("bridge-7/site/IMG_0001.jpg"), 0);
    assert_eq!(dir_entries(&harness.output_dir), vec!["bridge-7"]);
    assert!(dir_entries(&existing).is_empty());
}
