//! Selector of the adversarial imitation learning algorithm.
use crate::error::ImitrlError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Adversarial imitation learning algorithm.
///
/// The variant determines the inputs of the discriminator:
/// `(state, action)` for GAIL and
/// `(state, action, next_state, policy_likelihood)` for AIRL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AdversarialAlgorithm {
    /// Generative adversarial imitation learning.
    #[serde(rename = "GAIL")]
    Gail,

    /// Adversarial inverse reinforcement learning.
    #[serde(rename = "AIRL")]
    Airl,
}

impl AdversarialAlgorithm {
    /// Returns the name of the algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gail => "GAIL",
            Self::Airl => "AIRL",
        }
    }
}

impl fmt::Display for AdversarialAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AdversarialAlgorithm {
    type Err = ImitrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GAIL" => Ok(Self::Gail),
            "AIRL" => Ok(Self::Airl),
            _ => Err(ImitrlError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("GAIL".parse(), Ok(AdversarialAlgorithm::Gail));
        assert_eq!("AIRL".parse(), Ok(AdversarialAlgorithm::Airl));
        assert_eq!(
            "BCO".parse::<AdversarialAlgorithm>(),
            Err(ImitrlError::UnknownAlgorithm("BCO".to_string()))
        );
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        let algorithm: AdversarialAlgorithm = serde_yaml::from_str("AIRL").unwrap();
        assert_eq!(algorithm, AdversarialAlgorithm::Airl);
        assert!(serde_yaml::from_str::<AdversarialAlgorithm>("gail").is_err());
    }
}
