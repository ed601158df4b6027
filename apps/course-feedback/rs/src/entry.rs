//! Feedback data shapes and the mapping between UI field names and storage
//! column names.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the five form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    StudentName,
    CourseName,
    Email,
    Rating,
    FeedbackMessage,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::StudentName,
        Field::CourseName,
        Field::Email,
        Field::Rating,
        Field::FeedbackMessage,
    ];

    /// UI-side name, also used as the input's `name`/`id` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::StudentName => "studentName",
            Field::CourseName => "courseName",
            Field::Email => "email",
            Field::Rating => "rating",
            Field::FeedbackMessage => "feedbackMessage",
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Raw form contents. The rating travels as text, exactly as the select
/// reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackInput {
    pub student_name: String,
    pub course_name: String,
    pub email: String,
    pub rating: String,
    pub feedback_message: String,
}

impl FeedbackInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::StudentName => &self.student_name,
            Field::CourseName => &self.course_name,
            Field::Email => &self.email,
            Field::Rating => &self.rating,
            Field::FeedbackMessage => &self.feedback_message,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::StudentName => &mut self.student_name,
            Field::CourseName => &mut self.course_name,
            Field::Email => &mut self.email,
            Field::Rating => &mut self.rating,
            Field::FeedbackMessage => &mut self.feedback_message,
        };
        *slot = value;
    }

    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// A validated entry in UI naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub student_name: String,
    pub course_name: String,
    pub email: String,
    pub rating: i64,
    pub feedback_message: String,
}

/// Row as written to the `feedback` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedbackRow {
    pub student_name: String,
    pub course_name: String,
    pub email: String,
    pub rating: i64,
    pub feedback_message: String,
}

/// Row echoed back by the store. Identifier and timestamp are assigned
/// remotely and carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub row: NewFeedbackRow,
}

impl From<&FeedbackEntry> for NewFeedbackRow {
    fn from(e: &FeedbackEntry) -> Self {
        NewFeedbackRow {
            student_name: e.student_name.clone(),
            course_name: e.course_name.clone(),
            email: e.email.clone(),
            rating: e.rating,
            feedback_message: e.feedback_message.clone(),
        }
    }
}

impl From<StoredFeedback> for FeedbackEntry {
    fn from(s: StoredFeedback) -> Self {
        let r = s.row;
        FeedbackEntry {
            student_name: r.student_name,
            course_name: r.course_name,
            email: r.email,
            rating: r.rating,
            feedback_message: r.feedback_message,
        }
    }
}
