//! # Student Filters
//!
//! Exact-match filters for the List query. Each field is independently
//! optional; supplied fields are ANDed, absent fields are not applied.

use serde::Deserialize;

use super::record::Student;

/// Equality filter over the non-id fields of a student
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub school: Option<String>,
}

impl StudentFilter {
    /// Filter that matches every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn school(mut self, school: impl Into<String>) -> Self {
        self.school = Some(school.into());
        self
    }

    /// True when no field is constrained
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.school.is_none()
    }

    /// Drop zero-valued constraints
    ///
    /// At the HTTP boundary `?name=`, `?school=` and `?age=0` all mean
    /// "no filter on this field", so they are treated the same as leaving
    /// the parameter out. `matches` itself stays exact for every value.
    pub fn normalized(mut self) -> Self {
        if self.name.as_deref() == Some("") {
            self.name = None;
        }
        if self.age == Some(0) {
            self.age = None;
        }
        if self.school.as_deref() == Some("") {
            self.school = None;
        }
        self
    }

    /// Check whether a record satisfies every supplied constraint
    pub fn matches(&self, student: &Student) -> bool {
        if let Some(name) = &self.name {
            if &student.name != name {
                return false;
            }
        }
        if let Some(age) = self.age {
            if student.age != age {
                return false;
            }
        }
        if let Some(school) = &self.school {
            if &student.school != school {
                return false;
            }
        }
        true
    }
}
