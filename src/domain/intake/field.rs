//! The four questions asked during intake.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field collected by exactly one dialog step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeField {
    FirstName,
    LastName,
    Age,
    Residency,
}

impl IntakeField {
    /// All fields in the order they are asked.
    pub fn all() -> &'static [IntakeField] {
        &[
            IntakeField::FirstName,
            IntakeField::LastName,
            IntakeField::Age,
            IntakeField::Residency,
        ]
    }

    /// Storage column name. Also used as a structured log value.
    pub fn column(&self) -> &'static str {
        match self {
            IntakeField::FirstName => "first_name",
            IntakeField::LastName => "last_name",
            IntakeField::Age => "age",
            IntakeField::Residency => "residency",
        }
    }

    /// Human wording used inside spoken prompts.
    pub fn label(&self) -> &'static str {
        match self {
            IntakeField::FirstName => "first name",
            IntakeField::LastName => "last name",
            IntakeField::Age => "age",
            IntakeField::Residency => "residency",
        }
    }

    /// Callback path of the step that collects this field.
    pub fn step_path(&self) -> &'static str {
        match self {
            IntakeField::FirstName => "/process_first_name",
            IntakeField::LastName => "/process_last_name",
            IntakeField::Age => "/process_age",
            IntakeField::Residency => "/process_residency",
        }
    }

    /// The question that asks for this field.
    pub fn question(&self) -> &'static str {
        match self {
            IntakeField::FirstName => "Please say your first name after the beep.",
            IntakeField::LastName => "Please say your last name.",
            IntakeField::Age => "Please say your age.",
            IntakeField::Residency => "Please state your residency.",
        }
    }

    /// Spoken acknowledgement of an accepted answer.
    ///
    /// Names are echoed back; other answers get a plain thank-you.
    pub fn acknowledgement(&self, answer: &str) -> String {
        match self {
            IntakeField::FirstName | IntakeField::LastName => format!("Thank you, {}.", answer),
            IntakeField::Age | IntakeField::Residency => "Thank you.".to_string(),
        }
    }

    /// The field asked after this one, if any.
    pub fn next(&self) -> Option<IntakeField> {
        match self {
            IntakeField::FirstName => Some(IntakeField::LastName),
            IntakeField::LastName => Some(IntakeField::Age),
            IntakeField::Age => Some(IntakeField::Residency),
            IntakeField::Residency => None,
        }
    }

    /// True for the last required field.
    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
