use std::fmt;

use serde::{Deserialize, Serialize};

/// Session-unique, 1-based key of a user-drawn component. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(pub u32);

impl ComponentKey {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weight channels editable through bar charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeightChannel {
    Target,
    Background,
    BetweenClass,
    Boundary,
}

impl WeightChannel {
    pub const ALL: [Self; 4] = [
        Self::Target,
        Self::Background,
        Self::BetweenClass,
        Self::Boundary,
    ];

    /// Key used for the per-class channels in wire payloads.
    #[must_use]
    pub const fn wire_key(self) -> Option<&'static str> {
        match self {
            Self::Target => Some("tg"),
            Self::Background => Some("bg"),
            Self::BetweenClass => Some("bw"),
            Self::Boundary => None,
        }
    }

    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::Target => "Target weight",
            Self::Background => "Background weight",
            Self::BetweenClass => "Between-class weight",
            Self::Boundary => "Other parameters",
        }
    }

    #[must_use]
    pub const fn view(self) -> ViewId {
        match self {
            Self::Target => ViewId::TargetWeight,
            Self::Background => ViewId::BackgroundWeight,
            Self::BetweenClass => ViewId::BetweenClassWeight,
            Self::Boundary => ViewId::Boundary,
        }
    }
}

/// Identifier of every view held by the view-state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewId {
    TargetWeight,
    BackgroundWeight,
    BetweenClassWeight,
    Boundary,
    Embedding,
    ComponentX,
    ComponentY,
    ComponentFeatureNames,
    Component(ComponentKey),
}

impl ViewId {
    #[must_use]
    pub const fn weight_channel(self) -> Option<WeightChannel> {
        match self {
            Self::TargetWeight => Some(WeightChannel::Target),
            Self::BackgroundWeight => Some(WeightChannel::Background),
            Self::BetweenClassWeight => Some(WeightChannel::BetweenClass),
            Self::Boundary => Some(WeightChannel::Boundary),
            _ => None,
        }
    }

    /// Views laid out in the component strip.
    #[must_use]
    pub const fn is_component_panel(self) -> bool {
        matches!(
            self,
            Self::ComponentX | Self::ComponentY | Self::ComponentFeatureNames | Self::Component(_)
        )
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetWeight => f.write_str("tg_weight"),
            Self::BackgroundWeight => f.write_str("bg_weight"),
            Self::BetweenClassWeight => f.write_str("bw_weight"),
            Self::Boundary => f.write_str("ratio_bound"),
            Self::Embedding => f.write_str("emb"),
            Self::ComponentX => f.write_str("comp_x"),
            Self::ComponentY => f.write_str("comp_y"),
            Self::ComponentFeatureNames => f.write_str("comp_feat_name"),
            Self::Component(key) => write!(f, "comp_{key}"),
        }
    }
}
