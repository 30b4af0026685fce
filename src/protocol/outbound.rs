use serde::Serialize;

use crate::core::{ClassLabel, ComponentKey, EmbeddedPoint, WeightEntry};
use crate::error::{ViewError, ViewResult};
use crate::interaction::{EllipseDomainGeometry, EllipseGesture};

use super::{MessageAction, WeightSet};

/// Content of `updateEmb`: the full parameter state after a weight edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateEmbeddingRequest {
    pub weights: WeightSet,
    pub bounds: Vec<WeightEntry>,
    pub emb: Vec<EmbeddedPoint>,
}

/// Content of `optimizeWeights`: the edited ellipses plus current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeWeightsRequest {
    pub emb: Vec<EmbeddedPoint>,
    pub weights: WeightSet,
    pub bounds: Vec<WeightEntry>,
    pub interaction: EllipseGesture,
    pub updated_label: ClassLabel,
    pub ellipses: Vec<EllipseDomainGeometry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundRequest {
    UpdateEmbedding(UpdateEmbeddingRequest),
    OptimizeWeights(OptimizeWeightsRequest),
    SaveResult { name: String },
    LoadResult { name: String },
    AddNewComponent { key: ComponentKey, component: Vec<f64> },
}

#[derive(Serialize)]
struct Envelope<T> {
    action: MessageAction,
    content: T,
}

#[derive(Serialize)]
struct Wrapped<'a, T> {
    data: &'a T,
}

#[derive(Serialize)]
struct Named<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct NewComponent<'a> {
    key: ComponentKey,
    component: &'a [f64],
}

impl OutboundRequest {
    #[must_use]
    pub fn action(&self) -> MessageAction {
        match self {
            Self::UpdateEmbedding(_) => MessageAction::UpdateEmbedding,
            Self::OptimizeWeights(_) => MessageAction::OptimizeWeights,
            Self::SaveResult { .. } => MessageAction::SaveResult,
            Self::LoadResult { .. } => MessageAction::LoadResult,
            Self::AddNewComponent { .. } => MessageAction::AddNewComponent,
        }
    }

    /// Wire text: `{"action": <code>, "content": ...}`.
    ///
    /// Embedding and optimization payloads are nested under `content.data`.
    pub fn to_json(&self) -> ViewResult<String> {
        let action = self.action();
        let encoded = match self {
            Self::UpdateEmbedding(request) => serde_json::to_string(&Envelope {
                action,
                content: Wrapped { data: request },
            }),
            Self::OptimizeWeights(request) => serde_json::to_string(&Envelope {
                action,
                content: Wrapped { data: request },
            }),
            Self::SaveResult { name } | Self::LoadResult { name } => {
                serde_json::to_string(&Envelope {
                    action,
                    content: Named { name },
                })
            }
            Self::AddNewComponent { key, component } => serde_json::to_string(&Envelope {
                action,
                content: NewComponent {
                    key: *key,
                    component,
                },
            }),
        };
        encoded.map_err(|e| ViewError::Protocol(format!("failed to encode {action}: {e}")))
    }
}
