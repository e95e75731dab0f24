//! Student record types
//!
//! `Student` is what the store holds and persists. `NewStudent` is the
//! create/update payload; it carries every field except the identifier,
//! which only the store assigns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields supplied by a caller when creating or replacing a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub age: i64,
    pub school: String,
}

impl NewStudent {
    pub fn new(name: impl Into<String>, age: i64, school: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            school: school.into(),
        }
    }
}

/// A stored student record
///
/// Field order matches the persisted file layout: `name`, `age`, `school`,
/// then `id` as hyphenated UUID text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub age: i64,
    pub school: String,
    pub id: Uuid,
}

impl Student {
    /// Build a record from a payload and an already-generated id
    pub fn from_new(fields: NewStudent, id: Uuid) -> Self {
        Self {
            name: fields.name,
            age: fields.age,
            school: fields.school,
            id,
        }
    }

    /// Replace every field except the id
    pub fn replace_fields(&mut self, fields: NewStudent) {
        self.name = fields.name;
        self.age = fields.age;
        self.school = fields.school;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serialized_as_text() {
        let id = Uuid::new_v4();
        let student = Student::from_new(NewStudent::new("Ada", 12, "North"), id);

        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["id"], serde_json::json!(id.to_string()));
        assert_eq!(json["age"], serde_json::json!(12));
    }

    #[test]
    fn test_replace_fields_keeps_id() {
        let id = Uuid::new_v4();
        let mut student = Student::from_new(NewStudent::new("Ada", 12, "North"), id);

        student.replace_fields(NewStudent::new("Grace", 13, "South"));

        assert_eq!(student.id, id);
        assert_eq!(student.name, "Grace");
        assert_eq!(student.age, 13);
        assert_eq!(student.school, "South");
    }

    #[test]
    fn test_invalid_id_text_rejected() {
        let raw = r#"{"name":"Ada","age":12,"school":"North","id":"not-a-uuid"}"#;
        assert!(serde_json::from_str::<Student>(raw).is_err());
    }
}
