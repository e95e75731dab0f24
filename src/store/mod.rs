//! Student record store
//!
//! Holds the ordered collection of student records, loads it from a JSON
//! file at startup and writes it back after each mutation and at shutdown.
//!
//! # Behaviour
//!
//! - Insertion order is preserved; updates never reorder
//! - Ids are generated here and never change
//! - A missing or unparsable file means an empty store, never an error
//! - Each save rewrites the whole file

mod errors;
mod filter;
mod hook;
mod persistence;
mod record;
mod student_store;

pub use errors::{StoreError, StoreResult};
pub use filter::StudentFilter;
pub use hook::{BackgroundPersist, NoPersist, PersistHook, SyncPersist};
pub use persistence::{encode_students, load_students, save_students, WriteMode};
pub use record::{NewStudent, Student};
pub use student_store::StudentStore;
