use serde::{Deserialize, Serialize};

/// The three principal kinds. Each has its own credential table and its own
/// token signing material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    /// Capitalised label used in client-facing messages.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Teacher => "Teacher",
            Self::Student => "Student",
        }
    }
}

/// Review state of a student response, derived from `is_reviewed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ResponseStatus {
    Submitted,
    Reviewed,
}

impl ResponseStatus {
    pub(crate) fn from_flag(is_reviewed: bool) -> Self {
        if is_reviewed {
            Self::Reviewed
        } else {
            Self::Submitted
        }
    }
}
