//! Error type for the voice core.

use thiserror::Error;

/// Errors surfaced by the voice core.
///
/// Most failures in this subsystem are recoverable and show up as status
/// fields or spoken feedback instead of errors; this type covers the few
/// places where a caller-visible `Result` makes sense.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The platform has no speech recognition capability.
    #[error("speech recognition is not supported on this platform")]
    NotSupported,

    /// The platform speech API reported a failure we cannot interpret further.
    #[error("platform speech error: {0}")]
    Platform(String),
}
