//! Error type for trunk identification and the trunk trait walk.
//!
//! Parsing problems are reported separately via
//! [ParsingError](crate::parser::ParsingError); [AnalysisError] covers
//! everything that can go wrong once a tree is in memory.

use crate::model::VertexIndex;
use std::error::Error;
use std::fmt;

// =#========================================================================#=
// ANALYSIS ERROR
// =#========================================================================$=
/// Fatal failure of an analysis step. No partial results are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Tree has no root, contains a cycle, or has vertices detached from the root.
    MalformedTree(String),
    /// Vertex lacks an annotation that the step requires.
    MissingAnnotation { key: String, vertex: VertexIndex },
    /// Annotation is present but cannot be interpreted.
    InvalidAnnotation {
        key: String,
        vertex: VertexIndex,
        value: String,
    },
    /// Edge leading into `vertex` is processed but has no length.
    MissingBranchLength { vertex: VertexIndex },
    /// Trunk threshold is negative or not an integer.
    InvalidThreshold(String),
}

impl AnalysisError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        AnalysisError::MalformedTree(msg.into())
    }

    pub(crate) fn missing_annotation(key: &str, vertex: VertexIndex) -> Self {
        AnalysisError::MissingAnnotation {
            key: key.to_string(),
            vertex,
        }
    }

    pub(crate) fn invalid_annotation(key: &str, vertex: VertexIndex, value: impl fmt::Display) -> Self {
        AnalysisError::InvalidAnnotation {
            key: key.to_string(),
            vertex,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MalformedTree(msg) => write!(f, "Malformed tree: {msg}"),
            AnalysisError::MissingAnnotation { key, vertex } => {
                write!(f, "Missing annotation '{key}' on vertex {vertex}")
            }
            AnalysisError::InvalidAnnotation { key, vertex, value } => {
                write!(f, "Invalid value '{value}' for annotation '{key}' on vertex {vertex}")
            }
            AnalysisError::MissingBranchLength { vertex } => {
                write!(f, "Missing branch length on edge into vertex {vertex}")
            }
            AnalysisError::InvalidThreshold(msg) => write!(f, "Invalid trunk threshold: {msg}"),
        }
    }
}

impl Error for AnalysisError {}
