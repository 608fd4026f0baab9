// SPDX-License-Identifier: MPL-2.0
//! Directory scanner that turns a folder of images into a photo collection.
//!
//! Only regular files with a supported image extension are kept. Each one
//! becomes a photo record whose source field holds the file path.

use crate::carousel::PhotoCollection;
use crate::config::SortOrder;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Extensions (lowercase) of image formats the front-end can decode.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "ico",
];

/// Scans `directory` for images and builds a collection sorted by `sort_order`.
///
/// # Errors
///
/// Returns [`crate::error::Error::Io`] if the directory cannot be read.
pub fn scan_directory(
    directory: &Path,
    sort_order: SortOrder,
    src_key: &str,
) -> Result<PhotoCollection> {
    let mut image_files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            image_files.push(path);
        }
    }

    sort_image_files(&mut image_files, sort_order);
    log::info!(
        "Found {} images in {}",
        image_files.len(),
        directory.display()
    );

    Ok(PhotoCollection::from_sources(
        src_key,
        image_files
            .iter()
            .map(|path| path.to_string_lossy().into_owned()),
    ))
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn sort_image_files(image_files: &mut [PathBuf], sort_order: SortOrder) {
    match sort_order {
        SortOrder::Alphabetical => {
            image_files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }
        SortOrder::ModifiedDate => {
            image_files.sort_by_key(|path| {
                path.metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH)
            });
        }
        SortOrder::CreatedDate => {
            image_files.sort_by_key(|path| {
                path.metadata()
                    .and_then(|m| m.created())
                    .unwrap_or(SystemTime::UNIX_EPOCH)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("failed to create test file");
        file.write_all(b"fake image data")
            .expect("failed to write test file");
        path
    }

    #[test]
    fn scan_directory_keeps_only_images() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_test_file(temp_dir.path(), "a.jpg");
        create_test_file(temp_dir.path(), "b.png");
        create_test_file(temp_dir.path(), "c.gif");
        create_test_file(temp_dir.path(), "notes.txt");
        create_test_file(temp_dir.path(), "clip.mp4");
        fs::create_dir(temp_dir.path().join("nested.jpg")).expect("failed to create dir");

        let photos = scan_directory(temp_dir.path(), SortOrder::Alphabetical, "src")
            .expect("failed to scan directory");

        assert_eq!(photos.len(), 3);
    }

    #[test]
    fn scan_directory_sorts_alphabetically() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let img_c = create_test_file(temp_dir.path(), "c.jpg");
        let img_a = create_test_file(temp_dir.path(), "a.jpg");
        let img_b = create_test_file(temp_dir.path(), "b.jpg");

        let photos = scan_directory(temp_dir.path(), SortOrder::Alphabetical, "src")
            .expect("failed to scan directory");

        let sources: Vec<&str> = (0..photos.len())
            .filter_map(|i| photos.source(i, "src"))
            .collect();
        assert_eq!(
            sources,
            vec![
                img_a.to_str().expect("utf-8 path"),
                img_b.to_str().expect("utf-8 path"),
                img_c.to_str().expect("utf-8 path"),
            ]
        );
    }

    #[test]
    fn scan_directory_uses_configured_key() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_test_file(temp_dir.path(), "only.webp");

        let photos = scan_directory(temp_dir.path(), SortOrder::Alphabetical, "large")
            .expect("failed to scan directory");

        assert!(photos.source(0, "large").is_some());
        assert!(photos.source(0, "src").is_none());
    }

    #[test]
    fn scan_directory_handles_empty_directory() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let photos = scan_directory(temp_dir.path(), SortOrder::ModifiedDate, "src")
            .expect("failed to scan directory");
        assert!(photos.is_empty());
    }

    #[test]
    fn scan_missing_directory_fails() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = scan_directory(
            &temp_dir.path().join("missing"),
            SortOrder::Alphabetical,
            "src",
        );
        assert!(result.is_err());
    }

    #[test]
    fn supported_image_matches_case_insensitively() {
        assert!(is_supported_image(Path::new("test.JPG")));
        assert!(is_supported_image(Path::new("test.jpeg")));
        assert!(is_supported_image(Path::new("test.TIFF")));
        assert!(!is_supported_image(Path::new("test.svg")));
        assert!(!is_supported_image(Path::new("test.mov")));
        assert!(!is_supported_image(Path::new("README")));
    }
}
