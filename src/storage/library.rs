//! Image folder listing and renaming

use std::path::Path;
use tracing::{debug, info};

use crate::error::ViewerError;

/// File extensions shown in the image list (lowercase, no dot)
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Whether a file name has one of the supported image extensions
pub fn is_supported_image(name: &str) -> bool {
    let (_, ext) = split_file_name(name);
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| ext.eq_ignore_ascii_case(supported))
}

/// List image file names in `folder`, sorted
pub fn list_images(folder: &Path) -> Result<Vec<String>, ViewerError> {
    let mut images = Vec::new();

    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        // Names that are not valid UTF-8 cannot be shown or renamed
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_supported_image(&name) {
            images.push(name);
        }
    }

    images.sort();
    debug!("Found {} images in {:?}", images.len(), folder);
    Ok(images)
}

/// Split a file name into base and extension (without the dot)
///
/// A leading dot does not start an extension: `.hidden` has no extension.
pub fn split_file_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(idx) => (&name[..idx], &name[idx + 1..]),
    }
}

/// Join base and extension back into a file name
pub fn join_file_name(base: &str, ext: &str) -> String {
    if ext.is_empty() {
        base.to_string()
    } else {
        format!("{}.{}", base, ext)
    }
}

/// Rename `old_name` inside `folder` to `new_base.new_ext`
///
/// Refuses names containing path separators and never overwrites an
/// existing file. Returns the new file name.
pub fn rename_image(
    folder: &Path,
    old_name: &str,
    new_base: &str,
    new_ext: &str,
) -> Result<String, ViewerError> {
    let new_base = new_base.trim();
    let new_ext = new_ext.trim().trim_start_matches('.');

    let invalid = |s: &str| s.contains(['/', '\\']) || s == "." || s == "..";
    if new_base.is_empty() || invalid(new_base) || invalid(new_ext) {
        return Err(ViewerError::InvalidFileName(join_file_name(new_base, new_ext)));
    }

    let new_name = join_file_name(new_base, new_ext);
    if new_name == old_name {
        return Ok(new_name);
    }

    let old_path = folder.join(old_name);
    let new_path = folder.join(&new_name);
    if new_path.exists() {
        return Err(ViewerError::FileExists(new_path));
    }

    std::fs::rename(&old_path, &new_path)?;
    info!("Renamed {:?} to {:?}", old_path, new_path);
    Ok(new_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn folder_with(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            fs::write(dir.path().join(file), b"x").unwrap();
        }
        dir
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = folder_with(&["b.JPG", "a.png", "notes.txt", "c.jpeg", "d.Gif", "e.bmp", "f.tiff"]);
        fs::create_dir(dir.path().join("folder.png")).unwrap();

        let images = list_images(dir.path()).unwrap();
        assert_eq!(images, vec!["a.png", "b.JPG", "c.jpeg", "d.Gif", "e.bmp"]);
    }

    #[test]
    fn test_list_images_missing_folder() {
        let result = list_images(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(ViewerError::Io(_))));
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("photo.jpg"), ("photo", "jpg"));
        assert_eq!(split_file_name("archive.tar.gz"), ("archive.tar", "gz"));
        assert_eq!(split_file_name("noext"), ("noext", ""));
        assert_eq!(split_file_name(".hidden"), (".hidden", ""));
        assert_eq!(split_file_name("trailing."), ("trailing", ""));
    }

    #[test]
    fn test_rename_image() {
        let dir = folder_with(&["IMG_0001.jpg"]);
        let new_name = rename_image(dir.path(), "IMG_0001.jpg", "20241026", "jpg").unwrap();

        assert_eq!(new_name, "20241026.jpg");
        assert!(dir.path().join("20241026.jpg").exists());
        assert!(!dir.path().join("IMG_0001.jpg").exists());
    }

    #[test]
    fn test_rename_trims_input() {
        let dir = folder_with(&["a.png"]);
        let new_name = rename_image(dir.path(), "a.png", " 20241026-143005 ", ".png").unwrap();
        assert_eq!(new_name, "20241026-143005.png");
    }

    #[test]
    fn test_rename_refuses_overwrite() {
        let dir = folder_with(&["a.png", "b.png"]);
        let result = rename_image(dir.path(), "a.png", "b", "png");
        assert!(matches!(result, Err(ViewerError::FileExists(_))));
        assert!(dir.path().join("a.png").exists());
    }

    #[test]
    fn test_rename_rejects_bad_names() {
        let dir = folder_with(&["a.png"]);
        for (base, ext) in [("", "png"), ("  ", "png"), ("../a", "png"), ("a", "p/g"), ("..", "")] {
            let result = rename_image(dir.path(), "a.png", base, ext);
            assert!(
                matches!(result, Err(ViewerError::InvalidFileName(_))),
                "{base:?}.{ext:?}"
            );
        }
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let dir = folder_with(&["a.png"]);
        assert_eq!(rename_image(dir.path(), "a.png", "a", "png").unwrap(), "a.png");
        assert!(dir.path().join("a.png").exists());
    }

    #[test]
    fn test_rename_missing_source() {
        let dir = folder_with(&[]);
        let result = rename_image(dir.path(), "gone.png", "new", "png");
        assert!(matches!(result, Err(ViewerError::Io(_))));
    }
}
