//! lull: gaze-driven biofeedback
//!
//! Facade over the workspace crates. Most users want [`Session`] from the
//! core and [`config::LullConfig`] to build one from a TOML file.

pub use lull_config as config;
pub use lull_core::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_builds_a_session() {
        let config = config::LullConfig::default();
        let mut session = config.build_session(None).unwrap();
        let snapshot = session.advance(std::time::Duration::ZERO, Some(GazePoint::CENTER));
        assert_eq!(snapshot.status, Status::Calibrating);
        assert_eq!(snapshot.mode, Mode::Primary);
    }
}
