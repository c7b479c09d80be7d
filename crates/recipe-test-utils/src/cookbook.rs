//! [`TestCookbook`] builder for converge scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory under the sandbox root that holds cookbooks.
pub const COOKBOOKS: &str = "cookbooks";

/// A temporary sandbox holding a cookbook tree and the files recipes act on.
///
/// The sandbox root doubles as the runner root, so a resource named
/// `hello-world.txt` refers to `<root>/hello-world.txt`.
///
/// # Example
///
/// ```rust,no_run
/// use recipe_test_utils::TestCookbook;
///
/// let sandbox = TestCookbook::new();
/// sandbox.write_recipe(
///     "example",
///     "default",
///     r#"
/// [[resources]]
/// type = "file"
/// name = "hello-world.txt"
/// action = "create"
/// "#,
/// );
/// sandbox.write_file("hello-world.txt", "old");
/// sandbox.assert_file_exists("hello-world.txt");
/// ```
pub struct TestCookbook {
    temp_dir: TempDir,
}

impl Default for TestCookbook {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCookbook {
    /// Create an empty sandbox with an empty cookbook directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(COOKBOOKS)).unwrap();
        Self { temp_dir }
    }

    /// Return the root path of the sandbox.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Return the cookbook search path.
    pub fn cookbook_path(&self) -> PathBuf {
        self.root().join(COOKBOOKS)
    }

    /// Write `cookbooks/<cookbook>/recipes/<recipe>.toml`.
    pub fn write_recipe(&self, cookbook: &str, recipe: &str, toml: &str) -> PathBuf {
        self.write_recipe_as(cookbook, recipe, "toml", toml)
    }

    /// Write a recipe in another supported format (`json`, `yaml`, `yml`).
    pub fn write_recipe_as(&self, cookbook: &str, recipe: &str, extension: &str, body: &str) -> PathBuf {
        let path = self
            .cookbook_path()
            .join(cookbook)
            .join("recipes")
            .join(format!("{recipe}.{extension}"));
        write(&path, body.as_bytes());
        path
    }

    /// Write `cookbooks/<cookbook>/templates/default/<source>`.
    pub fn write_template(&self, cookbook: &str, source: &str, body: &str) -> PathBuf {
        let path = self
            .cookbook_path()
            .join(cookbook)
            .join("templates")
            .join("default")
            .join(source);
        write(&path, body.as_bytes());
        path
    }

    /// Write `cookbooks/<cookbook>/files/default/<source>`.
    pub fn write_cookbook_file(&self, cookbook: &str, source: &str, body: &str) -> PathBuf {
        let path = self
            .cookbook_path()
            .join(cookbook)
            .join("files")
            .join("default")
            .join(source);
        write(&path, body.as_bytes());
        path
    }

    /// Write a pre-existing file relative to the sandbox root.
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        write(&full_path, content.as_bytes());
        full_path
    }

    /// Create a pre-existing directory relative to the sandbox root.
    pub fn create_dir(&self, path: &str) -> PathBuf {
        let full_path = self.root().join(path);
        fs::create_dir_all(&full_path).unwrap();
        full_path
    }

    /// Read a file relative to the sandbox root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_file(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `path` (relative to the sandbox root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the sandbox root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read_file(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
}
