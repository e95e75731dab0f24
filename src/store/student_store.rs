//! # Student Store
//!
//! Ordered in-memory collection of student records backed by one JSON file.
//! Lookups are linear scans; the collection keeps insertion order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::filter::StudentFilter;
use super::hook::{NoPersist, PersistHook};
use super::persistence::{load_students, save_students, WriteMode};
use super::record::{NewStudent, Student};

/// File-backed student record store
///
/// All mutations go through a single write lock. After each successful
/// mutation the configured `PersistHook` receives a snapshot while that lock
/// is still held.
pub struct StudentStore {
    path: PathBuf,
    write_mode: WriteMode,
    students: RwLock<Vec<Student>>,
    hook: Arc<dyn PersistHook>,
}

impl StudentStore {
    /// Load the collection from `path` and attach a post-commit hook
    ///
    /// A missing or unparsable file gives an empty store.
    pub fn open(
        path: impl Into<PathBuf>,
        write_mode: WriteMode,
        hook: Arc<dyn PersistHook>,
    ) -> StoreResult<Self> {
        let path = path.into();
        let students = load_students(&path)?;

        tracing::info!(path = %path.display(), records = students.len(), "student store loaded");

        Ok(Self {
            path,
            write_mode,
            students: RwLock::new(students),
            hook,
        })
    }

    /// Store that is never written after mutations; only `persist()` saves
    pub fn open_without_hook(path: impl Into<PathBuf>, write_mode: WriteMode) -> StoreResult<Self> {
        Self::open(path, write_mode, Arc::new(NoPersist))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.students.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.read().is_empty()
    }

    /// Copy of the whole collection in insertion order
    pub fn snapshot(&self) -> Vec<Student> {
        self.students.read().clone()
    }

    /// Records matching every supplied filter field, in insertion order
    pub fn list(&self, filter: &StudentFilter) -> Vec<Student> {
        let students = self.students.read();
        if filter.is_empty() {
            return students.clone();
        }
        students.iter().filter(|s| filter.matches(s)).cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> StoreResult<Student> {
        self.students
            .read()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Append a new record with a freshly generated id
    pub fn create(&self, fields: NewStudent) -> Student {
        let mut students = self.students.write();

        let id = loop {
            let candidate = Uuid::new_v4();
            if !students.iter().any(|s| s.id == candidate) {
                break candidate;
            }
        };

        let student = Student::from_new(fields, id);
        students.push(student.clone());
        tracing::debug!(%id, "student created");

        self.hook.after_commit(students.clone());
        student
    }

    /// Replace name, age and school of an existing record
    pub fn update(&self, id: Uuid, fields: NewStudent) -> StoreResult<Student> {
        let mut students = self.students.write();

        let student = students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;
        student.replace_fields(fields);
        let updated = student.clone();
        tracing::debug!(%id, "student updated");

        self.hook.after_commit(students.clone());
        Ok(updated)
    }

    pub fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut students = self.students.write();

        let pos = students
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;
        students.remove(pos);
        tracing::debug!(%id, "student deleted");

        self.hook.after_commit(students.clone());
        Ok(())
    }

    /// Write the current collection to the persistence file
    pub fn persist(&self) -> StoreResult<()> {
        let students = self.students.read();
        save_students(&self.path, &students, self.write_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingHook(AtomicUsize);

    impl PersistHook for CountingHook {
        fn after_commit(&self, _: Vec<Student>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn store_with_counter(dir: &TempDir) -> (StudentStore, Arc<CountingHook>) {
        let hook = Arc::new(CountingHook(AtomicUsize::new(0)));
        let store = StudentStore::open(
            dir.path().join("students.json"),
            WriteMode::Overwrite,
            hook.clone(),
        )
        .unwrap();
        (store, hook)
    }

    #[test]
    fn test_hook_fires_once_per_successful_mutation() {
        let dir = TempDir::new().unwrap();
        let (store, hook) = store_with_counter(&dir);

        let a = store.create(NewStudent::new("A", 10, "X"));
        store.update(a.id, NewStudent::new("A2", 11, "X")).unwrap();
        store.delete(a.id).unwrap();
        assert_eq!(hook.0.load(Ordering::SeqCst), 3);

        assert!(store.update(a.id, NewStudent::new("A3", 12, "X")).is_err());
        assert!(store.delete(a.id).is_err());
        assert_eq!(hook.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_reads_do_not_fire_hook() {
        let dir = TempDir::new().unwrap();
        let (store, hook) = store_with_counter(&dir);
        let a = store.create(NewStudent::new("A", 10, "X"));
        let before = hook.0.load(Ordering::SeqCst);

        store.get(a.id).unwrap();
        store.list(&StudentFilter::new());
        store.persist().unwrap();

        assert_eq!(hook.0.load(Ordering::SeqCst), before);
    }

    #[test]
    fn test_update_does_not_reorder() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with_counter(&dir);
        let a = store.create(NewStudent::new("A", 10, "X"));
        let b = store.create(NewStudent::new("B", 10, "Y"));

        store.update(a.id, NewStudent::new("Z", 99, "Q")).unwrap();

        let ids: Vec<Uuid> = store.snapshot().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_ids_are_unique() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with_counter(&dir);
        for i in 0..50 {
            store.create(NewStudent::new(format!("S{i}"), i, "X"));
        }

        let mut ids: Vec<Uuid> = store.snapshot().iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with_counter(&dir);
        let id = Uuid::new_v4();

        match store.get(id) {
            Err(StoreError::NotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
