//! # Persistence File
//!
//! The whole collection lives in one JSON array of
//! `{name, age, school, id}` objects, pretty-printed with four-space
//! indentation. Every save rewrites the file in full.
//!
//! Loading never fails on bad content: a file that does not parse as that
//! array, or that repeats an id, is logged and discarded, and the store
//! starts empty.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::record::Student;

/// How a save reaches the disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Truncate and rewrite the target in place. A crash mid-write can leave
    /// a partial file, which the next load discards.
    #[default]
    Overwrite,
    /// Write a sibling temp file, then rename it over the target
    Atomic,
}

/// Read the persistence file
///
/// - missing file: empty collection
/// - unparsable content or repeated ids: `warn!` and empty collection
/// - any other read failure: `StoreError::Io`
pub fn load_students(path: &Path) -> StoreResult<Vec<Student>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no persistence file, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::io(path.display().to_string(), e)),
    };

    let students = match serde_json::from_slice::<Vec<Student>>(&bytes) {
        Ok(students) => students,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "discarding unparsable persistence file, starting empty"
            );
            return Ok(Vec::new());
        }
    };

    if let Some(id) = first_duplicate_id(&students) {
        tracing::warn!(
            path = %path.display(),
            %id,
            "discarding persistence file with duplicate ids, starting empty"
        );
        return Ok(Vec::new());
    }

    Ok(students)
}

fn first_duplicate_id(students: &[Student]) -> Option<Uuid> {
    let mut seen = HashSet::with_capacity(students.len());
    students.iter().map(|s| s.id).find(|id| !seen.insert(*id))
}

/// Encode the collection the way it is stored on disk
pub fn encode_students(students: &[Student]) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(64 * students.len() + 2);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    students.serialize(&mut ser)?;
    Ok(buf)
}

/// Overwrite the persistence file with the given collection
pub fn save_students(path: &Path, students: &[Student], mode: WriteMode) -> StoreResult<()> {
    let bytes = encode_students(students)?;

    match mode {
        WriteMode::Overwrite => write_file(path, &bytes),
        WriteMode::Atomic => {
            let tmp = temp_path(path);
            write_file(&tmp, &bytes)?;
            fs::rename(&tmp, path).map_err(|e| StoreError::io(path.display().to_string(), e))
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let to_err = |e| StoreError::io(path.display().to_string(), e);

    let mut file = fs::File::create(path).map_err(to_err)?;
    file.write_all(bytes).map_err(to_err)?;
    file.flush().map_err(to_err)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::NewStudent;
    use tempfile::TempDir;

    fn sample() -> Vec<Student> {
        vec![
            Student::from_new(NewStudent::new("A", 10, "X"), Uuid::new_v4()),
            Student::from_new(NewStudent::new("B", 11, "Y"), Uuid::new_v4()),
        ]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = load_students(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");

        let contents: [&[u8]; 4] = [b"{not json", b"{\"name\":\"A\"}", b"\xff\xfe", b""];
        for content in contents {
            fs::write(&path, content).unwrap();
            assert!(load_students(&path).unwrap().is_empty());
        }
    }

    #[test]
    fn test_bad_id_text_discards_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");
        fs::write(
            &path,
            r#"[{"name":"A","age":10,"school":"X","id":"nope"}]"#,
        )
        .unwrap();

        assert!(load_students(&path).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_discard_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        fs::write(
            &path,
            format!(
                r#"[{{"name":"A","age":10,"school":"X","id":"{id}"}},
                    {{"name":"C","age":12,"school":"Z","id":"{other}"}},
                    {{"name":"B","age":11,"school":"Y","id":"{id}"}}]"#
            ),
        )
        .unwrap();

        assert!(load_students(&path).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order_and_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");
        let students = sample();

        save_students(&path, &students, WriteMode::Overwrite).unwrap();
        assert_eq!(load_students(&path).unwrap(), students);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");
        let students = sample();

        save_students(&path, &students, WriteMode::Atomic).unwrap();

        assert_eq!(load_students(&path).unwrap(), students);
        assert!(!dir.path().join("students.json.tmp").exists());
    }

    #[test]
    fn test_file_layout_is_indented_array() {
        let id = Uuid::new_v4();
        let students = vec![Student::from_new(NewStudent::new("A", 10, "X"), id)];

        let text = String::from_utf8(encode_students(&students).unwrap()).unwrap();

        assert!(text.starts_with("[\n    {\n        \"name\": \"A\""));
        assert!(text.contains(&format!("\"id\": \"{}\"", id)));
    }

    #[test]
    fn test_save_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");

        save_students(&path, &sample(), WriteMode::Overwrite).unwrap();
        save_students(&path, &[], WriteMode::Overwrite).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
