//! Team label encoding for model input

use serde::{Deserialize, Serialize};

use crate::TeamId;

/// Maps a team to the numeric code a classifier was trained with
pub trait TeamEncoder {
    fn encode(&self, team: &TeamId) -> Option<u32>;
}

/// Codes assigned by alphabetical order of team name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<TeamId>,
}

impl LabelEncoder {
    pub fn fit<I>(teams: I) -> Self
    where
        I: IntoIterator<Item = TeamId>,
    {
        let mut classes: Vec<TeamId> = teams.into_iter().collect();
        classes.sort();
        classes.dedup();
        LabelEncoder { classes }
    }

    pub fn decode(&self, code: u32) -> Option<&TeamId> {
        self.classes.get(code as usize)
    }

    pub fn classes(&self) -> &[TeamId] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TeamEncoder for LabelEncoder {
    fn encode(&self, team: &TeamId) -> Option<u32> {
        self.classes
            .binary_search(team)
            .ok()
            .and_then(|i| u32::try_from(i).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder::fit(
            ["Wolves", "Arsenal", "Leeds", "Arsenal", "Burnley"]
                .into_iter()
                .map(TeamId::from),
        )
    }

    #[test]
    fn test_alphabetical_codes() {
        let enc = encoder();
        assert_eq!(enc.len(), 4);
        assert_eq!(enc.encode(&TeamId::from("Arsenal")), Some(0));
        assert_eq!(enc.encode(&TeamId::from("Burnley")), Some(1));
        assert_eq!(enc.encode(&TeamId::from("Wolves")), Some(3));
    }

    #[test]
    fn test_unknown_team() {
        let enc = encoder();
        assert_eq!(enc.encode(&TeamId::from("Brentford")), None);
        assert_eq!(enc.decode(9), None);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let enc = encoder();
        for team in enc.classes() {
            let code = enc.encode(team).unwrap();
            assert_eq!(enc.decode(code), Some(team));
        }
    }
}
