//! Voice core configuration.
//!
//! Every timing and threshold in the voice pipeline is empirically chosen,
//! so all of them live here instead of being buried as constants.

use serde::{Deserialize, Serialize};

/// Tunable parameters for recognition, dispatch feedback and read-aloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Minimum recognizer confidence for a final result to be dispatched
    /// (0.0-1.0). Finals below this set an error message and do nothing.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Pause between spoken segments during read-aloud (in milliseconds)
    #[serde(default = "default_segment_pause_ms")]
    pub segment_pause_ms: u64,

    /// Delay before auto-restarting recognition after a transient error
    /// (in milliseconds)
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,

    /// Delay before auto-advancing to the next word after a full
    /// read-through completes (in milliseconds)
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,

    /// Settle delay between cancelling a read-aloud job and restarting it
    /// on repeat, so the platform finishes tearing down (in milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// How long transient error messages stay visible before auto-clearing
    /// (in milliseconds)
    #[serde(default = "default_error_clear_ms")]
    pub error_clear_ms: u64,

    /// Speech synthesis rate (1.0 = platform default speed)
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Speech synthesis pitch (1.0 = platform default)
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// Speech synthesis volume (0.0-1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_confidence_threshold() -> f32 {
    0.3 // low on purpose; browser recognizers report conservative scores
}

fn default_segment_pause_ms() -> u64 {
    800 // breathing room between term, definition and example
}

fn default_restart_delay_ms() -> u64 {
    300
}

fn default_advance_delay_ms() -> u64 {
    1500 // gap before the next word starts reading
}

fn default_settle_delay_ms() -> u64 {
    250
}

fn default_error_clear_ms() -> u64 {
    4000
}

fn default_rate() -> f32 {
    0.9 // slightly slower than default, easier for learners
}

fn default_pitch() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    1.0
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            segment_pause_ms: default_segment_pause_ms(),
            restart_delay_ms: default_restart_delay_ms(),
            advance_delay_ms: default_advance_delay_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            error_clear_ms: default_error_clear_ms(),
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: VoiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.confidence_threshold, 0.3);
        assert_eq!(config.segment_pause_ms, 800);
        assert_eq!(config.rate, 0.9);
    }

    #[test]
    fn test_partial_override() {
        let config: VoiceConfig = toml::from_str("confidence_threshold = 0.5").unwrap();
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.restart_delay_ms, 300);
    }
}
