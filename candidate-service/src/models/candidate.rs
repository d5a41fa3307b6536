use crate::services::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use std::fmt;
use thiserror::Error;

/// Stored candidate document. The store key is the name itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    #[serde(rename = "CandidateName")]
    pub name: String,
}

impl Candidate {
    pub fn new(name: &CandidateName) -> Self {
        Self {
            name: name.as_str().to_string(),
        }
    }

    /// The fields written to the store for this candidate.
    pub fn to_document(&self) -> Result<Document, AppError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(AppError::InternalError(anyhow::anyhow!(
                "candidate serialized to a non-object value: {}",
                other
            ))),
            Err(e) => Err(AppError::InternalError(anyhow::Error::new(e))),
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("name is invalid")]
pub struct InvalidName;

impl From<InvalidName> for AppError {
    fn from(err: InvalidName) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

/// A validated candidate identifier: non-empty and free of `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateName(String);

impl CandidateName {
    /// Derive the name from a resource path such as `/alice`.
    ///
    /// One leading separator is stripped. Anything that is empty afterwards
    /// or still contains a separator (nested or traversal paths) is rejected.
    pub fn from_path(path: &str) -> Result<Self, InvalidName> {
        let name = path.strip_prefix('/').unwrap_or(path);

        if name.is_empty() || name.contains('/') {
            return Err(InvalidName);
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
