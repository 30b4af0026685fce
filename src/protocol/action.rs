use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Action tag of every message on the optimizer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MessageAction {
    UpdateEmbedding,
    OptimizeWeights,
    SaveResult,
    LoadResult,
    InitialLoad,
    AddNewComponent,
}

impl MessageAction {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::UpdateEmbedding => 0,
            Self::OptimizeWeights => 1,
            Self::SaveResult => 2,
            Self::LoadResult => 3,
            Self::InitialLoad => 4,
            Self::AddNewComponent => 5,
        }
    }

    /// Whether an inbound message of this kind replaces the whole store.
    #[must_use]
    pub const fn is_full_load(self) -> bool {
        matches!(self, Self::InitialLoad | Self::LoadResult)
    }
}

impl From<MessageAction> for u8 {
    fn from(action: MessageAction) -> Self {
        action.code()
    }
}

impl TryFrom<u8> for MessageAction {
    type Error = ViewError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::UpdateEmbedding),
            1 => Ok(Self::OptimizeWeights),
            2 => Ok(Self::SaveResult),
            3 => Ok(Self::LoadResult),
            4 => Ok(Self::InitialLoad),
            5 => Ok(Self::AddNewComponent),
            other => Err(ViewError::Protocol(format!("unknown action code {other}"))),
        }
    }
}

impl TryFrom<i64> for MessageAction {
    type Error = ViewError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        u8::try_from(code)
            .map_err(|_| ViewError::Protocol(format!("unknown action code {code}")))
            .and_then(<Self as TryFrom<u8>>::try_from)
    }
}

impl fmt::Display for MessageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UpdateEmbedding => "updateEmb",
            Self::OptimizeWeights => "optimizeWeights",
            Self::SaveResult => "saveResult",
            Self::LoadResult => "loadResult",
            Self::InitialLoad => "initialLoad",
            Self::AddNewComponent => "addNewComp",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_serde() {
        let json = serde_json::to_string(&MessageAction::InitialLoad).expect("json");
        assert_eq!(json, "4");
        let back: MessageAction = serde_json::from_str("5").expect("action");
        assert_eq!(back, MessageAction::AddNewComponent);
        assert!(serde_json::from_str::<MessageAction>("9").is_err());
        assert!(MessageAction::try_from(-1_i64).is_err());
    }
}
