use std::fs;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;
use walkdir::WalkDir;
use crate::utils::utils_errors::SceneError;

/// Convenience struct that holds many class functions related to file utils.
pub struct FileUtils;
impl FileUtils {
    /// Reads contents of file and outputs it to a string.
    pub fn read_file_contents_to_string(p: &Path) -> Result<String, SceneError> {
        let mut file_res = File::open(p);
        return match &mut file_res {
            Ok(f) => {
                let mut contents = String::new();
                if let Err(e) = f.read_to_string(&mut contents) {
                    return Err(SceneError::new_generic_error_str(&format!("Could not read {:?}: {}", p, e), file!(), line!()));
                }
                Ok(contents)
            }
            Err(e) => {
                Err(SceneError::new_generic_error_str(&format!("Could not open {:?}: {}", p, e), file!(), line!()))
            }
        }
    }
    /// Returns file extension of path as string.
    pub fn get_file_extension_string(p: &Path) -> Option<String> {
        return match p.extension() {
            None => { None }
            Some(o) => { o.to_str().map(|s| s.to_string()) }
        }
    }
    /// Returns the file name of the path without its extension (like `basename` in boost).
    pub fn get_file_stem_string(p: &Path) -> Option<String> {
        return match p.file_stem() {
            None => { None }
            Some(o) => { o.to_str().map(|s| s.to_string()) }
        }
    }
    /// Returns the paths of all files directly within a directory, sorted by name.
    pub fn get_all_files_in_directory(p: &Path) -> Result<Vec<PathBuf>, SceneError> {
        if !p.is_dir() {
            return Err(SceneError::new_generic_error_str(&format!("directory {:?} does not exist.", p), file!(), line!()));
        }

        let mut out: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(p).min_depth(1).max_depth(1).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() { out.push(entry.into_path()); }
                }
                Err(e) => {
                    return Err(SceneError::new_generic_error_str(&format!("Could not walk directory {:?}: {}", p, e), file!(), line!()));
                }
            }
        }
        Ok(out)
    }
    /// Creates the directory (and its parents) if it does not exist.  Returns true if something
    /// was created.
    pub fn create_directory(p: &Path) -> Result<bool, SceneError> {
        if p.is_dir() { return Ok(false); }
        return match fs::create_dir_all(p) {
            Ok(_) => { Ok(true) }
            Err(e) => { Err(SceneError::new_generic_error_str(&format!("Could not create directory {:?}: {}", p, e), file!(), line!())) }
        }
    }
    /// Writes the string to a freshly truncated file.  The file is flushed and closed before
    /// returning.
    pub fn write_string_to_file(s: &str, p: &Path) -> Result<(), SceneError> {
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() { Self::create_directory(parent)?; }
        }

        let f = match File::create(p) {
            Ok(f) => { f }
            Err(e) => { return Err(SceneError::new_serialization_failure_error(&format!("Could not open {:?}: {}", p, e), file!(), line!())); }
        };
        let mut writer = BufWriter::new(f);
        if let Err(e) = writer.write_all(s.as_bytes()).and_then(|_| writer.flush()) {
            return Err(SceneError::new_serialization_failure_error(&format!("Could not write {:?}: {}", p, e), file!(), line!()));
        }
        Ok(())
    }
    /// Saves given object to a file as a JSON string.  The object must be serializable using serde json.
    pub fn save_object_to_file_as_json<T: Serialize>(object: &T, p: &Path) -> Result<(), SceneError> {
        let s = match serde_json::to_string_pretty(object) {
            Ok(s) => { s }
            Err(e) => { return Err(SceneError::new_serialization_failure_error(&e.to_string(), file!(), line!())); }
        };
        Self::write_string_to_file(&s, p)
    }
    pub fn load_object_from_json_file<T: DeserializeOwned>(p: &Path) -> Result<T, SceneError> {
        let contents = Self::read_file_contents_to_string(p)?;
        return Self::load_object_from_json_string(&contents);
    }
    pub fn load_object_from_json_string<T: DeserializeOwned>(json_str: &str) -> Result<T, SceneError> {
        let o_res = serde_json::from_str(json_str);
        return match o_res {
            Ok(o) => { Ok(o) }
            Err(e) => {
                Err(SceneError::new_serialization_failure_error(&format!("load_object_from_json_string() failed.  The given json_string is incompatible with the requested type: {}", e), file!(), line!()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let mut p = env::temp_dir();
        p.push(format!("scene_utils_files_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&p);
        p
    }

    #[test]
    fn write_then_read_string() {
        let mut p = scratch_dir("rw");
        p.push("nested");
        p.push("out.txt");
        FileUtils::write_string_to_file("hello", &p).unwrap();
        assert_eq!(FileUtils::read_file_contents_to_string(&p).unwrap(), "hello");

        FileUtils::write_string_to_file("bye", &p).unwrap();
        assert_eq!(FileUtils::read_file_contents_to_string(&p).unwrap(), "bye");
    }

    #[test]
    fn lists_files_sorted_and_skips_directories() {
        let dir = scratch_dir("list");
        FileUtils::write_string_to_file("", &dir.join("b.material")).unwrap();
        FileUtils::write_string_to_file("", &dir.join("a.material")).unwrap();
        FileUtils::create_directory(&dir.join("sub")).unwrap();

        let files = FileUtils::get_all_files_in_directory(&dir).unwrap();
        let stems: Vec<String> = files.iter().filter_map(|f| FileUtils::get_file_stem_string(f)).collect();
        assert_eq!(stems, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = scratch_dir("missing");
        assert!(FileUtils::get_all_files_in_directory(&dir).is_err());
    }
}
