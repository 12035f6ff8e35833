//! Session modes and the per-mode tuning they select

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Feedback modes.
///
/// Both modes share the same state shape; they only change the dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Regular session: stronger reactions, faster fades
    #[serde(alias = "game")]
    Primary,
    /// Wind-down session: more sensitive detection, gentler response
    #[serde(alias = "reset")]
    Recovery,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Primary
    }
}

impl Mode {
    /// Arousal must exceed `baseline * multiplier` to count as a raw hit
    pub fn spike_multiplier(&self) -> f64 {
        match self {
            Mode::Primary => 1.15,
            Mode::Recovery => 1.10,
        }
    }

    /// Level-target increase per accepted spike
    pub fn spike_increment(&self) -> f64 {
        match self {
            Mode::Primary => 1.0,
            Mode::Recovery => 0.5,
        }
    }

    /// Level-target decrease per calm frame once the quiet period has elapsed
    pub fn decay_rate(&self) -> f64 {
        match self {
            Mode::Primary => 0.02,
            Mode::Recovery => 0.01,
        }
    }

    /// Exponential smoothing factor applied on every refresh
    pub fn follow_rate(&self) -> f64 {
        match self {
            Mode::Primary => 0.08,
            Mode::Recovery => 0.04,
        }
    }

    /// Crossfade progress added per refresh
    pub fn fade_step(&self) -> f32 {
        match self {
            Mode::Primary => 0.04,
            Mode::Recovery => 0.02,
        }
    }

    /// Calibration length used when a session (re)enters this mode
    pub fn default_calibration_secs(&self) -> f64 {
        match self {
            Mode::Primary => 10.0,
            Mode::Recovery => 8.0,
        }
    }

    /// The other mode
    pub fn toggled(&self) -> Self {
        match self {
            Mode::Primary => Mode::Recovery,
            Mode::Recovery => Mode::Primary,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Primary => "PRIMARY",
            Mode::Recovery => "RECOVERY",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown mode name at a configuration or command-line boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mode '{0}' (expected 'primary' or 'recovery')")]
pub struct ModeParseError(pub String);

impl FromStr for Mode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "game" => Ok(Mode::Primary),
            "recovery" | "reset" => Ok(Mode::Recovery),
            _ => Err(ModeParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        assert_eq!(Mode::default(), Mode::Primary);
    }

    #[test]
    fn test_recovery_is_more_sensitive_and_gentler() {
        assert!(Mode::Recovery.spike_multiplier() < Mode::Primary.spike_multiplier());
        assert!(Mode::Recovery.spike_increment() < Mode::Primary.spike_increment());
        assert!(Mode::Recovery.follow_rate() < Mode::Primary.follow_rate());
        assert!(Mode::Recovery.fade_step() < Mode::Primary.fade_step());
    }

    #[test]
    fn test_parse_accepts_legacy_names() {
        assert_eq!("GAME".parse::<Mode>().unwrap(), Mode::Primary);
        assert_eq!(" recovery ".parse::<Mode>().unwrap(), Mode::Recovery);
        assert_eq!("reset".parse::<Mode>().unwrap(), Mode::Recovery);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "turbo".parse::<Mode>().unwrap_err();
        assert_eq!(err, ModeParseError("turbo".to_string()));
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Mode::Primary.toggled().toggled(), Mode::Primary);
    }
}
