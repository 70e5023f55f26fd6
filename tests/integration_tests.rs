/// Integration tests for desktidy
///
/// These tests simulate real desktop layouts end to end: planning, executing
/// moves with and without backup, uniqueness handling, and undoing a run.
///
/// Test categories:
/// 1. Planning (dry run) scenarios
/// 2. Organize execution and directory creation
/// 3. Backup behavior
/// 4. Collision handling
/// 5. Undo round-trips
use desktidy::config::Config;
use desktidy::organizer::{perform_organize, plan_organize};
use desktidy::output::OutputFormatter;
use desktidy::undo::undo;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary desktop directory with a
/// configurable file structure.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new fixture with an empty desktop directory.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    /// Get the path to the desktop directory.
    fn desktop(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content on the desktop.
    fn create_file(&self, rel_path: &str, content: &[u8]) {
        let file_path = self.desktop().join(rel_path);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    /// Create a subdirectory on the desktop.
    fn create_subdir(&self, name: &str) {
        fs::create_dir_all(self.desktop().join(name)).expect("Failed to create subdirectory");
    }

    /// Assert that a file exists at the given relative path.
    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.desktop().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    /// Assert that a file does NOT exist at the given relative path.
    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.desktop().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }
}

/// Rules from an inline TOML document.
fn rules(document: &str) -> desktidy::config::Rules {
    let config: Config = toml::from_str(document).expect("test config should parse");
    config.compile()
}

fn quiet() -> OutputFormatter {
    OutputFormatter::quiet()
}

// ============================================================================
// Planning (dry run)
// ============================================================================

#[test]
fn test_plan_matches_categories_and_fallback() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"jpeg");
    fixture.create_file("b.txt", b"text");
    fixture.create_file(".hidden.jpg", b"jpeg");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    let mut actions = plan_organize(fixture.desktop(), &rules).expect("Planning failed");
    actions.sort_by(|a, b| a.source.cmp(&b.source));

    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].source, fixture.desktop().join("a.jpg"));
    assert_eq!(actions[0].dest, fixture.desktop().join("Images").join("a.jpg"));
    assert_eq!(actions[1].source, fixture.desktop().join("b.txt"));
    assert_eq!(actions[1].dest, fixture.desktop().join("Others").join("b.txt"));
}

#[test]
fn test_plan_does_not_touch_filesystem() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"jpeg");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    plan_organize(fixture.desktop(), &rules).expect("Planning failed");

    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_not_exists("Images");
}

#[test]
fn test_plan_skips_directories_and_excluded_names() {
    let fixture = TestFixture::new();
    fixture.create_subdir("projects");
    fixture.create_file("keepme.txt", b"text");
    fixture.create_file("moveme.txt", b"text");

    let rules = rules(
        r#"
        exclude = ["keepme.txt"]

        [categories]
        Documents = [".txt"]
        "#,
    );

    let actions = plan_organize(fixture.desktop(), &rules).expect("Planning failed");

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].source, fixture.desktop().join("moveme.txt"));
}

#[test]
fn test_plan_skips_existing_category_folder() {
    // A folder named like a category is a destination, never a source.
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_file("a.jpg", b"jpeg");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    let actions = plan_organize(fixture.desktop(), &rules).expect("Planning failed");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].source, fixture.desktop().join("a.jpg"));
}

#[test]
fn test_plan_includes_hidden_when_enabled() {
    let fixture = TestFixture::new();
    fixture.create_file(".hidden.jpg", b"jpeg");

    let rules = rules(
        r#"
        move_hidden = true

        [categories]
        Images = [".jpg"]
        "#,
    );

    let actions = plan_organize(fixture.desktop(), &rules).expect("Planning failed");
    assert_eq!(actions.len(), 1);
    assert_eq!(
        actions[0].dest,
        fixture.desktop().join("Images").join(".hidden.jpg")
    );
}

#[test]
fn test_plan_collision_appends_counter() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_file("Images/a.jpg", b"already organized");
    fixture.create_file("a.jpg", b"new arrival");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    let actions = plan_organize(fixture.desktop(), &rules).expect("Planning failed");
    assert_eq!(actions.len(), 1);
    assert_eq!(
        actions[0].dest,
        fixture.desktop().join("Images").join("a (1).jpg")
    );
}

// ============================================================================
// Organize execution
// ============================================================================

#[test]
fn test_perform_moves_files_and_creates_folders() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"jpeg");
    fixture.create_file("b.txt", b"text");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    let actions =
        perform_organize(fixture.desktop(), &rules, false, &quiet()).expect("Organize failed");

    assert_eq!(actions.len(), 2);
    fixture.assert_file_not_exists("a.jpg");
    fixture.assert_file_not_exists("b.txt");
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Others/b.txt");
}

#[test]
fn test_perform_creates_all_category_folders_upfront() {
    // Folders for every configured category appear even with nothing to move.
    let fixture = TestFixture::new();

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        Documents = [".pdf"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, false, &quiet()).expect("Organize failed");

    assert!(fixture.desktop().join("Images").is_dir());
    assert!(fixture.desktop().join("Documents").is_dir());
    assert!(fixture.desktop().join("Others").is_dir());
    assert!(!fixture.desktop().join("Backup").exists());
}

#[test]
fn test_perform_collision_appends_counter() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_file("Images/a.jpg", b"first");
    fixture.create_file("a.jpg", b"second");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, false, &quiet()).expect("Organize failed");

    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Images/a (1).jpg");
    let content = fs::read_to_string(fixture.desktop().join("Images").join("a (1).jpg"))
        .expect("Failed to read file");
    assert_eq!(content, "second");
}

#[test]
fn test_perform_first_match_category_wins() {
    let fixture = TestFixture::new();
    fixture.create_file("report.txt", b"text");

    let rules = rules(
        r#"
        [categories]
        Notes = [".txt"]
        Documents = [".txt"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, false, &quiet()).expect("Organize failed");

    fixture.assert_file_exists("Notes/report.txt");
    fixture.assert_file_not_exists("Documents/report.txt");
}

#[test]
fn test_perform_uppercase_extension_matches() {
    let fixture = TestFixture::new();
    fixture.create_file("PHOTO.JPG", b"jpeg");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, false, &quiet()).expect("Organize failed");

    fixture.assert_file_exists("Images/PHOTO.JPG");
}

#[test]
fn test_perform_invalid_desktop_fails() {
    // A path through a regular file cannot be created or enumerated, for
    // any user. A path under / would be creatable when running as root.
    let dir = TempDir::new().expect("Failed to create temp directory");
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"plain file").expect("Failed to write file");

    let rules = rules("");
    let result = perform_organize(&blocker.join("desktop"), &rules, false, &quiet());
    assert!(result.is_err());
}

// ============================================================================
// Backup behavior
// ============================================================================

#[test]
fn test_backup_copies_original_before_move() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"original bytes");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, true, &quiet()).expect("Organize failed");

    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Backup/a.jpg");

    let moved = fs::read(fixture.desktop().join("Images").join("a.jpg")).expect("read moved");
    let backup = fs::read(fixture.desktop().join("Backup").join("a.jpg")).expect("read backup");
    assert_eq!(moved, b"original bytes");
    assert_eq!(backup, moved);
}

#[test]
fn test_backup_preserves_modification_time() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"jpeg");

    // Give the original a distinctive mtime well in the past.
    let source_mtime = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(fixture.desktop().join("a.jpg"), source_mtime)
        .expect("Failed to set mtime");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, true, &quiet()).expect("Organize failed");

    let backup_meta = fs::metadata(fixture.desktop().join("Backup").join("a.jpg"))
        .expect("Failed to read backup metadata");
    let backup_mtime = filetime::FileTime::from_last_modification_time(&backup_meta);
    assert_eq!(backup_mtime, source_mtime);
}

#[test]
fn test_backup_name_uniquified_across_runs() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"first run");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, true, &quiet()).expect("Organize failed");

    // A later arrival with the same name must not clobber the first backup.
    fixture.create_file("a.jpg", b"second run");
    perform_organize(fixture.desktop(), &rules, true, &quiet()).expect("Organize failed");

    fixture.assert_file_exists("Backup/a.jpg");
    fixture.assert_file_exists("Backup/a (1).jpg");
}

// ============================================================================
// Undo round-trips
// ============================================================================

#[test]
fn test_organize_then_undo_restores_names() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"jpeg");
    fixture.create_file("b.txt", b"text");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, false, &quiet()).expect("Organize failed");
    fixture.assert_file_not_exists("a.jpg");

    let report = undo(fixture.desktop(), &quiet()).expect("Undo failed");

    assert_eq!(report.restored_files(), 2);
    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("b.txt");
    fixture.assert_file_not_exists("Images/a.jpg");
    fixture.assert_file_not_exists("Others/b.txt");
}

#[test]
fn test_undo_preserves_backup_folder() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"jpeg");

    let rules = rules(
        r#"
        [categories]
        Images = [".jpg"]
        "#,
    );

    perform_organize(fixture.desktop(), &rules, true, &quiet()).expect("Organize failed");
    undo(fixture.desktop(), &quiet()).expect("Undo failed");

    // The restored original is back at the root; the backup copy stays put.
    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("Backup/a.jpg");
}

#[test]
fn test_undo_collision_at_root_uses_counter() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_file("Images/a.jpg", b"organized earlier");
    fixture.create_file("a.jpg", b"newer file at root");

    let report = undo(fixture.desktop(), &quiet()).expect("Undo failed");

    assert_eq!(report.restored_files(), 1);
    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("a (1).jpg");
    let restored =
        fs::read_to_string(fixture.desktop().join("a (1).jpg")).expect("Failed to read file");
    assert_eq!(restored, "organized earlier");
}

#[test]
fn test_undo_flattens_unrelated_files_too() {
    // Structural undo has no move ledger: anything inside a category folder
    // comes back to the root, organized by desktidy or not.
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_file("Images/manually-placed.png", b"png");

    let report = undo(fixture.desktop(), &quiet()).expect("Undo failed");

    assert_eq!(report.restored_files(), 1);
    fixture.assert_file_exists("manually-placed.png");
}

// ============================================================================
// Configuration integration
// ============================================================================

#[test]
fn test_config_file_round_trip() {
    let fixture = TestFixture::new();
    let config_path = fixture.desktop().join("config.toml");
    fs::write(
        &config_path,
        r#"
        move_hidden = false
        exclude = ["keepme.txt"]

        [categories]
        Images = [".jpg", ".png"]
        Documents = [".pdf"]
        "#,
    )
    .expect("Failed to write config");

    let rules = Config::load(&config_path)
        .expect("Config should load")
        .compile();

    assert_eq!(rules.category_for(".png"), Some("Images"));
    assert_eq!(rules.category_for(".pdf"), Some("Documents"));
    assert_eq!(rules.category_for(".zip"), None);
    assert!(rules.is_protected("keepme.txt"));
    assert!(rules.is_protected("Images"));
}

#[test]
fn test_empty_config_sends_everything_to_fallback() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"jpeg");
    fixture.create_file("b.txt", b"text");

    let rules = rules("");
    perform_organize(fixture.desktop(), &rules, false, &quiet()).expect("Organize failed");

    fixture.assert_file_exists("Others/a.jpg");
    fixture.assert_file_exists("Others/b.txt");
}
