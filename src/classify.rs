//! Classification of provider failures into lifecycle outcomes.
//!
//! Legacy provider clients expose no structured code for "this transition is
//! blocked right now", so transient conflicts are recognised by substrings of
//! the provider message. The matching is fragile: it depends on provider
//! wording. Keep the marker lists in sync with the providers in use.

use crate::provider::ProviderError;

/// Marker seen when a volume cannot be deleted because it is still attached.
const DELETE_BLOCKED_MARKERS: &[&str] = &["attached"];

/// Marker seen when a volume cannot be attached because it is not yet ready.
const ATTACH_BLOCKED_MARKERS: &[&str] = &["available"];

/// Markers that identify a lookup for a volume the provider does not know.
const NOT_FOUND_MARKERS: &[&str] = &["InvalidVolume.NotFound", "not_found"];

/// Provider call during which a failure was observed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    /// Resolving a volume by identifier.
    Lookup,
    /// Reading a compute instance's placement.
    Placement,
    /// Creating a volume.
    Create,
    /// Deleting a volume.
    Delete,
    /// Attaching a volume to an instance.
    Attach,
    /// Detaching a volume.
    Detach,
}

/// How a provider failure should be surfaced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// The resource is gone; callers treat this as an idempotent success.
    NotFound,
    /// The transition is blocked by provider state; the caller should retry.
    TransientConflict,
    /// Unrecoverable; the message is propagated verbatim.
    Terminal,
}

/// Maps a provider failure observed during `transition` onto an
/// [`ErrorClass`].
#[must_use]
pub fn classify(error: &ProviderError, transition: Transition) -> ErrorClass {
    let message = match error {
        ProviderError::NotFound { .. } if transition == Transition::Lookup => {
            return ErrorClass::NotFound;
        }
        ProviderError::NotFound { .. } => return ErrorClass::Terminal,
        ProviderError::Api {
            status: Some(404), ..
        } if transition == Transition::Lookup => return ErrorClass::NotFound,
        ProviderError::Api { message, .. } => message.as_str(),
    };

    let markers = match transition {
        Transition::Lookup => {
            return if contains_any(message, NOT_FOUND_MARKERS) {
                ErrorClass::NotFound
            } else {
                ErrorClass::Terminal
            };
        }
        Transition::Delete => DELETE_BLOCKED_MARKERS,
        Transition::Attach => ATTACH_BLOCKED_MARKERS,
        Transition::Placement | Transition::Create | Transition::Detach => {
            return ErrorClass::Terminal;
        }
    };

    if contains_any(message, markers) {
        ErrorClass::TransientConflict
    } else {
        ErrorClass::Terminal
    }
}

fn contains_any(message: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| message.contains(marker))
}
