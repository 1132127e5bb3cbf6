//! Error types for upgrade application and tuning

use thiserror::Error;

/// Logical faults raised outside the tick.
///
/// None of these end a session. The session logs them and carries on.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown weapon id '{0}'")]
    UnknownWeapon(String),

    #[error("unknown passive id '{0}'")]
    UnknownPassive(String),

    #[error("weapon '{weapon}' has no upgrade '{upgrade}'")]
    UnknownUpgrade { weapon: String, upgrade: String },

    #[error("unknown item id '{0}'")]
    UnknownItem(String),

    #[error("player does not own weapon '{0}'")]
    WeaponNotOwned(String),

    #[error("tier {tier} of '{weapon}' is locked until level {required}")]
    TierLocked {
        weapon: String,
        tier: usize,
        required: u32,
    },

    #[error("tier {tier} of '{weapon}' already holds '{chosen}'")]
    TierFilled {
        weapon: String,
        tier: usize,
        chosen: String,
    },

    #[error("weapon '{0}' is already at max level")]
    MaxLevel(String),

    #[error("{0} slots are full")]
    SlotsFull(&'static str),

    #[error("no level-up is pending")]
    NoPendingLevelUp,

    #[error("option index {0} is out of range")]
    NoSuchOption(usize),

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("failed to parse tuning: {0}")]
    TuningParse(#[from] serde_json::Error),
}

/// Result alias for fallible operations
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::TierFilled {
            weapon: "fire_bird".into(),
            tier: 1,
            chosen: "bird_pierce".into(),
        };
        assert_eq!(
            err.to_string(),
            "tier 1 of 'fire_bird' already holds 'bird_pierce'"
        );
        assert_eq!(
            SimError::UnknownWeapon("nope".into()).to_string(),
            "unknown weapon id 'nope'"
        );
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SimError = parse.into();
        assert!(matches!(err, SimError::TuningParse(_)));
    }
}
