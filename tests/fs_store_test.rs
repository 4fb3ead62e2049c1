use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use vitae::api::VitaeApi;
use vitae::error::VitaeError;
use vitae::model::{Categories, Document, Entry, Profile};
use vitae::settings::{Columns, Settings};
use vitae::store::fs::{FileOps, FileStore};
use vitae::store::retry::StorePolicy;
use vitae::store::DocumentStore;

/// Fails the first N reads/renames with the given error kind, then behaves normally.
struct FlakyOps {
    read_failures: AtomicU32,
    rename_failures: AtomicU32,
    kind: io::ErrorKind,
    fail_copy: bool,
}

impl FlakyOps {
    fn new(kind: io::ErrorKind) -> Self {
        Self {
            read_failures: AtomicU32::new(0),
            rename_failures: AtomicU32::new(0),
            kind,
            fail_copy: false,
        }
    }

    fn reads(self, n: u32) -> Self {
        self.read_failures.store(n, Ordering::SeqCst);
        self
    }

    fn renames(self, n: u32) -> Self {
        self.rename_failures.store(n, Ordering::SeqCst);
        self
    }

    fn failing_copy(mut self) -> Self {
        self.fail_copy = true;
        self
    }

    fn take(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl FileOps for FlakyOps {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if Self::take(&self.read_failures) {
            return Err(io::Error::new(self.kind, "simulated read failure"));
        }
        fs::read(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if Self::take(&self.rename_failures) {
            return Err(io::Error::new(self.kind, "simulated rename failure"));
        }
        fs::rename(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        if self.fail_copy {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated copy failure"));
        }
        fs::copy(from, to)
    }
}

type Sleeps = Arc<Mutex<Vec<Duration>>>;

fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("resume_data.json");
    (dir, path)
}

fn recording_store(path: &Path, ops: FlakyOps) -> (FileStore, Sleeps) {
    let sleeps: Sleeps = Arc::new(Mutex::new(Vec::new()));
    let recorder = sleeps.clone();
    let store = FileStore::new(path)
        .with_file_ops(ops)
        .with_sleeper(move |d: Duration| recorder.lock().unwrap().push(d));
    (store, sleeps)
}

fn leftover_temp_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("tmp_resume_"))
        .collect()
}

fn backups(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("corrupt_backup_"))
        })
        .collect()
}

fn sample_document() -> Document {
    let mut categories = Categories::new();
    categories.insert(
        "Publications".into(),
        vec![Entry {
            name: "Notes on the Analytical Engine".into(),
            link: Some("https://example.org/notes".into()),
            date: "1843-09-01".into(),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 6)
                .unwrap()
                .and_hms_opt(7, 8, 9),
        }],
    );
    categories.insert("Awards".into(), Vec::new());

    Document {
        profile: Profile {
            name: "Ada Lovelace".into(),
            email: "ada@example.org".into(),
            summary: "Writes programs for engines: ünïcødé".into(),
            ..Default::default()
        },
        categories,
        settings: Settings {
            columns: Columns::One,
            separator: false,
        },
    }
}

#[test]
fn first_load_creates_default_file() {
    let (dir, path) = setup();
    let store = FileStore::new(&path);

    let doc = store.load().unwrap();
    assert_eq!(doc, Document::default());
    assert!(path.exists());

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(on_disk.get("personal_details").is_some());
    assert_eq!(on_disk["categories"], serde_json::json!({}));
    assert_eq!(
        on_disk["settings"],
        serde_json::json!({"columns": 2, "separator": true})
    );
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn save_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("cv.json");
    let store = FileStore::new(&path);
    store.save(&sample_document()).unwrap();
    assert!(path.exists());
}

#[test]
fn save_then_load_round_trips() {
    let (dir, path) = setup();
    let store = FileStore::new(&path);
    let doc = sample_document();

    store.save(&doc).unwrap();
    assert_eq!(store.load().unwrap(), doc);

    // A second store on the same file sees the same thing.
    assert_eq!(FileStore::new(&path).load().unwrap(), doc);
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn file_is_pretty_utf8_json() {
    let (_dir, path) = setup();
    FileStore::new(&path).save(&sample_document()).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("ünïcødé"), "non-ASCII text should not be escaped");
    assert!(raw.contains("\n  \"categories\": {"));
    let publications = raw.find("\"Publications\"").unwrap();
    let awards = raw.find("\"Awards\"").unwrap();
    assert!(publications < awards, "category order must be preserved");
}

#[test]
fn normalization_is_not_written_back() {
    let (_dir, path) = setup();
    let partial = r#"{"categories": {"Talks": []}}"#;
    fs::write(&path, partial).unwrap();

    let doc = FileStore::new(&path).load().unwrap();
    assert_eq!(doc.settings, Settings::default());
    assert!(doc.profile.is_blank());
    assert!(doc.categories.contains("Talks"));
    assert_eq!(fs::read_to_string(&path).unwrap(), partial);
}

#[test]
fn busy_rename_is_retried_with_policy_delay() {
    let (dir, path) = setup();
    let ops = FlakyOps::new(io::ErrorKind::PermissionDenied).renames(3);
    let (store, sleeps) = recording_store(&path, ops);

    store.save(&sample_document()).unwrap();

    assert_eq!(
        *sleeps.lock().unwrap(),
        vec![Duration::from_millis(120); 3]
    );
    assert_eq!(FileStore::new(&path).load().unwrap(), sample_document());
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn exhausted_rename_fails_and_keeps_previous_file() {
    let (dir, path) = setup();
    let previous = sample_document();
    FileStore::new(&path).save(&previous).unwrap();
    let before = fs::read(&path).unwrap();

    let ops = FlakyOps::new(io::ErrorKind::PermissionDenied).renames(u32::MAX);
    let (store, sleeps) = recording_store(&path, ops);

    let err = store.save(&Document::default()).unwrap_err();
    match err {
        VitaeError::Busy { attempts, .. } => assert_eq!(attempts, 8),
        other => panic!("expected Busy, got {:?}", other),
    }
    assert_eq!(sleeps.lock().unwrap().len(), 7);
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn permanent_rename_error_is_not_retried() {
    let (dir, path) = setup();
    let ops = FlakyOps::new(io::ErrorKind::NotFound).renames(1);
    let (store, sleeps) = recording_store(&path, ops);

    let err = store.save(&sample_document()).unwrap_err();
    assert!(matches!(err, VitaeError::Io(_)));
    assert!(sleeps.lock().unwrap().is_empty());
    assert!(!path.exists());
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn failed_read_is_retried() {
    let (_dir, path) = setup();
    FileStore::new(&path).save(&sample_document()).unwrap();

    let ops = FlakyOps::new(io::ErrorKind::PermissionDenied).reads(2);
    let (store, sleeps) = recording_store(&path, ops);

    assert_eq!(store.load().unwrap(), sample_document());
    assert_eq!(*sleeps.lock().unwrap(), vec![Duration::from_millis(80); 2]);
}

#[test]
fn exhausted_reads_degrade_to_default_without_writing() {
    let (_dir, path) = setup();
    FileStore::new(&path).save(&sample_document()).unwrap();
    let before = fs::read(&path).unwrap();

    let ops = FlakyOps::new(io::ErrorKind::PermissionDenied).reads(u32::MAX);
    let (store, sleeps) = recording_store(&path, ops);

    assert_eq!(store.load().unwrap(), Document::default());
    assert_eq!(sleeps.lock().unwrap().len(), 5);
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn unreadable_file_refuses_updates_and_keeps_its_bytes() {
    let (dir, path) = setup();
    FileStore::new(&path).save(&sample_document()).unwrap();
    let before = fs::read(&path).unwrap();

    let ops = FlakyOps::new(io::ErrorKind::PermissionDenied).reads(u32::MAX);
    let (store, sleeps) = recording_store(&path, ops);
    let api = VitaeApi::new(store);

    let err = api.add_category("New").unwrap_err();
    match &err {
        VitaeError::Busy { attempts, .. } => assert_eq!(*attempts, 6),
        other => panic!("expected Busy, got {:?}", other),
    }
    assert!(err.is_transient());
    assert!(!err.is_rejection());
    assert_eq!(sleeps.lock().unwrap().len(), 5);

    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(backups(dir.path()).is_empty());
    assert!(leftover_temp_files(dir.path()).is_empty());

    // Reads still degrade instead of failing.
    assert_eq!(api.document().unwrap(), Document::default());
}

#[test]
fn mistyped_fields_load_without_reset() {
    let (dir, path) = setup();
    let raw = r#"{"personal_details": {"name": "Ada", "phone": 5551234},
                  "categories": {"Work": [{"name": "Engine", "date": "1843-01-01"}]},
                  "settings": {"columns": 1, "separator": false}}"#;
    fs::write(&path, raw).unwrap();

    let store = FileStore::new(&path);
    let doc = store.load().unwrap();
    assert_eq!(doc.profile.name, "Ada");
    assert_eq!(doc.profile.phone, "5551234");
    let work = doc.categories.get("Work").unwrap();
    assert_eq!(work[0].name, "Engine");
    assert_eq!(work[0].created_at, None);
    assert_eq!(doc.settings.columns, Columns::One);

    assert!(backups(dir.path()).is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), raw);

    // Later writes carry the tolerated entry forward.
    let api = VitaeApi::new(store);
    api.add_category("Talks").unwrap();
    assert_eq!(api.entries("Work").unwrap()[0].name, "Engine");
}

#[test]
fn corrupt_file_is_backed_up_and_reset() {
    let (dir, path) = setup();
    let garbage = b"{\"categories\": {\"Work\": [ oops".to_vec();
    fs::write(&path, &garbage).unwrap();

    let ops = FlakyOps::new(io::ErrorKind::PermissionDenied);
    let (store, sleeps) = recording_store(&path, ops);

    assert_eq!(store.load().unwrap(), Document::default());
    assert!(sleeps.lock().unwrap().is_empty(), "corruption is never retried");

    let found = backups(dir.path());
    assert_eq!(found.len(), 1);
    assert_eq!(fs::read(&found[0]).unwrap(), garbage);

    // The target now holds a valid default document and accepts writes.
    let reloaded: Document = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(reloaded, Document::default());
    store.save(&sample_document()).unwrap();
    assert_eq!(store.load().unwrap(), sample_document());
    assert_eq!(backups(dir.path()).len(), 1);
}

#[test]
fn wrong_shape_counts_as_corruption() {
    let (dir, path) = setup();
    fs::write(&path, "[1, 2, 3]").unwrap();
    assert_eq!(FileStore::new(&path).load().unwrap(), Document::default());
    assert_eq!(backups(dir.path()).len(), 1);
}

#[test]
fn empty_file_counts_as_corruption() {
    let (dir, path) = setup();
    fs::write(&path, "").unwrap();
    assert_eq!(FileStore::new(&path).load().unwrap(), Document::default());
    assert_eq!(backups(dir.path()).len(), 1);
}

#[test]
fn failed_backup_does_not_block_recovery() {
    let (dir, path) = setup();
    fs::write(&path, "not json at all").unwrap();

    let ops = FlakyOps::new(io::ErrorKind::PermissionDenied).failing_copy();
    let (store, _sleeps) = recording_store(&path, ops);

    assert_eq!(store.load().unwrap(), Document::default());
    assert!(backups(dir.path()).is_empty());
    let on_disk: Document = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk, Document::default());
}

#[test]
fn update_error_leaves_file_untouched() {
    let (_dir, path) = setup();
    let store = FileStore::new(&path);
    store.save(&sample_document()).unwrap();
    let before = fs::read(&path).unwrap();

    let result: vitae::error::Result<()> = store.update(|doc| {
        doc.categories.remove("Publications");
        Err(vitae::error::Rejection::EmptyEntryName.into())
    });
    assert!(result.unwrap_err().is_rejection());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn immediate_policy_never_waits() {
    let (_dir, path) = setup();
    let ops = FlakyOps::new(io::ErrorKind::WouldBlock).renames(2);
    let sleeps: Sleeps = Arc::new(Mutex::new(Vec::new()));
    let recorder = sleeps.clone();
    let store = FileStore::new(&path)
        .with_policy(StorePolicy::immediate())
        .with_file_ops(ops)
        .with_sleeper(move |d: Duration| recorder.lock().unwrap().push(d));

    store.save(&sample_document()).unwrap();
    assert!(sleeps.lock().unwrap().iter().all(|d| d.is_zero()));
}
