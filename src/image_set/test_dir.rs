//! Scratch directories for tests that touch the file system

use image::RgbImage;
use std::path::{Path, PathBuf};

/// Directory under the system temp dir, removed on drop
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "image-position-finder-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).expect("create test dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty file
    pub fn touch(&self, name: &str) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, b"").expect("write test file");
        path
    }

    pub fn subdir(&self, name: &str) -> PathBuf {
        let path = self.path.join(name);
        std::fs::create_dir_all(&path).expect("create test subdir");
        path
    }

    pub fn write_png(&self, name: &str, image: &RgbImage) -> PathBuf {
        let path = self.path.join(name);
        image.save(&path).expect("save test png");
        path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
