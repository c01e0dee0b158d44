//! Orchestrator context documents and the reports written back.
//!
//! Each invocation receives one JSON document describing the node, its
//! instance, and both ends of a relationship. The operation mutates the
//! runtime properties in place and the caller serialises an
//! [`OperationReport`] so the orchestrator can persist the new state.

use std::io::Read;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::lifecycle::VolumeLifecycle;
use crate::node::{NodeInstance, RelationshipEnd, RuntimeProperties, VolumeProperties};
use crate::outcome::{LifecycleResult, Outcome};
use crate::provider::ProviderClient;

/// Path argument that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Exit status for a completed operation.
pub const EXIT_COMPLETE: i32 = 0;
/// Exit status for a failed operation.
pub const EXIT_FAILED: i32 = 1;
/// Exit status asking the orchestrator to retry (`EX_TEMPFAIL`).
pub const EXIT_RETRY: i32 = 75;

/// Lifecycle operation selected by the orchestrator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    /// Pre-deployment validation.
    Validate,
    /// Create or adopt the volume.
    Create,
    /// Delete or release the volume.
    Delete,
    /// Attach the source volume to the target instance.
    Attach,
    /// Detach the source volume from the target instance.
    Detach,
}

impl Operation {
    /// Returns the lowercase operation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Attach => "attach",
            Self::Detach => "detach",
        }
    }

    const fn uses_relationship(self) -> bool {
        matches!(self, Self::Attach | Self::Detach)
    }
}

/// Document handed to each invocation.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OperationContext {
    /// Declared properties of the volume node.
    #[serde(default)]
    pub node: VolumeProperties,
    /// Runtime instance of the volume node.
    #[serde(default)]
    pub instance: NodeInstance,
    /// Volume end of an attach/detach relationship.
    #[serde(default)]
    pub source: RelationshipEnd,
    /// Instance end of an attach/detach relationship.
    #[serde(default)]
    pub target: RelationshipEnd,
}

/// Errors raised while reading a context document.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The document could not be read.
    #[error("failed to read context from {source_name}: {message}")]
    Read {
        /// Path, or `stdin`.
        source_name: String,
        /// Underlying I/O error.
        message: String,
    },
    /// The document is not a valid context.
    #[error("invalid context document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl OperationContext {
    /// Parses a context from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Parse`] when the text is not a valid context.
    pub fn from_json(text: &str) -> Result<Self, ContextError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a context from `path`, or from standard input when `path` is
    /// `None` or `-`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Read`] when the file or stream cannot be read
    /// and [`ContextError::Parse`] when its content is not a valid context.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ContextError> {
        let text = match path {
            Some(file) if file.as_str() != STDIN_PATH => read_file(file)?,
            _ => read_stdin()?,
        };
        Self::from_json(&text)
    }
}

fn read_file(path: &Utf8Path) -> Result<String, ContextError> {
    let read_error = |message: String| ContextError::Read {
        source_name: path.to_string(),
        message,
    };
    let (dir_path, file_name) = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_str().is_empty() => (parent, name),
        (_, Some(name)) => (Utf8Path::new("."), name),
        (_, None) => return Err(read_error(String::from("path has no file name"))),
    };
    let dir = Dir::open_ambient_dir(dir_path, ambient_authority())
        .map_err(|err| read_error(err.to_string()))?;
    dir.read_to_string(file_name)
        .map_err(|err| read_error(err.to_string()))
}

fn read_stdin() -> Result<String, ContextError> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| ContextError::Read {
            source_name: String::from("stdin"),
            message: err.to_string(),
        })?;
    Ok(text)
}

/// Final state of an operation as reported to the orchestrator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// The operation finished.
    Complete,
    /// The orchestrator should invoke the operation again.
    Retry,
    /// The operation failed terminally.
    Failed,
}

/// JSON report printed after an operation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OperationReport {
    /// Operation that ran.
    pub operation: &'static str,
    /// Final state.
    pub outcome: ReportStatus,
    /// Retry reason or failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure category, set only when `outcome` is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Runtime properties after the operation ran.
    pub runtime_properties: ReportedRuntime,
}

/// Runtime properties the operation may have changed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ReportedRuntime {
    /// Volume instance state for validate, create and delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<RuntimeProperties>,
    /// Volume end state for attach and detach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RuntimeProperties>,
    /// Instance end state for attach and detach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<RuntimeProperties>,
}

impl OperationReport {
    fn new(operation: Operation, result: LifecycleResult, context: &OperationContext) -> Self {
        let (outcome, message, kind) = match result {
            Ok(Outcome::Complete) => (ReportStatus::Complete, None, None),
            Ok(Outcome::Retry { message }) => (ReportStatus::Retry, Some(message), None),
            Err(err) => (
                ReportStatus::Failed,
                Some(err.to_string()),
                Some(err.kind()),
            ),
        };
        let runtime_properties = if operation.uses_relationship() {
            ReportedRuntime {
                instance: None,
                source: Some(context.source.runtime_properties.clone()),
                target: Some(context.target.runtime_properties.clone()),
            }
        } else {
            ReportedRuntime {
                instance: Some(context.instance.runtime_properties.clone()),
                source: None,
                target: None,
            }
        };
        Self {
            operation: operation.name(),
            outcome,
            message,
            kind,
            runtime_properties,
        }
    }

    /// Maps the outcome onto a process exit status.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self.outcome {
            ReportStatus::Complete => EXIT_COMPLETE,
            ReportStatus::Retry => EXIT_RETRY,
            ReportStatus::Failed => EXIT_FAILED,
        }
    }
}

/// Runs `operation` against `context`, mutating its runtime properties, and
/// reports the result.
pub async fn run_operation<P: ProviderClient>(
    lifecycle: &VolumeLifecycle<P>,
    operation: Operation,
    context: &mut OperationContext,
) -> OperationReport {
    debug!(operation = operation.name(), instance = %context.instance.id, "running operation");
    let result = match operation {
        Operation::Validate => lifecycle.validate(&context.node).await,
        Operation::Create => lifecycle.create(&context.node, &mut context.instance).await,
        Operation::Delete => lifecycle.delete(&context.node, &mut context.instance).await,
        Operation::Attach => lifecycle.attach(&context.source, &mut context.target).await,
        Operation::Detach => lifecycle.detach(&context.source, &mut context.target).await,
    };
    OperationReport::new(operation, result, context)
}
