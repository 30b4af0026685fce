use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

use crate::core::{EmbeddedPoint, WeightEntry};
use crate::error::{ViewError, ViewResult};

use super::MessageAction;

/// Per-class weight rows keyed by channel, as on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    #[serde(default)]
    pub tg: Vec<WeightEntry>,
    #[serde(default)]
    pub bg: Vec<WeightEntry>,
    #[serde(default)]
    pub bw: Vec<WeightEntry>,
}

/// Loadings of the current projection and the feature they belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentAxes {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default, deserialize_with = "feature_names")]
    pub feat_names: Vec<String>,
}

impl ComponentAxes {
    fn validate(&self) -> ViewResult<()> {
        if self.x.len() != self.y.len() {
            return Err(ViewError::Protocol(format!(
                "component axes differ in length: x={}, y={}",
                self.x.len(),
                self.y.len()
            )));
        }
        Ok(())
    }
}

/// Content of `initialLoad` and `loadResult`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoadContent {
    pub weights: WeightSet,
    #[serde(default)]
    pub bounds: Vec<WeightEntry>,
    pub max_upper_bound: f64,
    pub emb: Vec<EmbeddedPoint>,
    pub components: ComponentAxes,
    #[serde(default)]
    pub label_to_name: IndexMap<String, String>,
}

/// Content of optimizer responses that refresh the current dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateContent {
    pub weights: WeightSet,
    #[serde(default)]
    pub bounds: Vec<WeightEntry>,
    #[serde(default)]
    pub max_upper_bound: Option<f64>,
    pub emb: Vec<EmbeddedPoint>,
    pub components: ComponentAxes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveContent {
    #[serde(rename = "dataNames")]
    pub data_names: Vec<String>,
}

/// A decoded and validated inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    FullLoad {
        action: MessageAction,
        content: Box<LoadContent>,
    },
    SaveResult(SaveContent),
    /// Any other action code, known or not.
    Update {
        code: i64,
        content: Box<UpdateContent>,
    },
}

impl InboundMessage {
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::FullLoad { action, .. } => i64::from(action.code()),
            Self::SaveResult(_) => i64::from(MessageAction::SaveResult.code()),
            Self::Update { code, .. } => *code,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    action: i64,
    content: serde_json::Value,
}

/// Parses `{action, content}` and checks the content against its action.
pub fn decode_inbound(input: &str) -> ViewResult<InboundMessage> {
    let envelope: RawEnvelope = serde_json::from_str(input)
        .map_err(|e| ViewError::Protocol(format!("failed to parse message envelope: {e}")))?;
    let action = MessageAction::try_from(envelope.action).ok();
    trace!(code = envelope.action, ?action, bytes = input.len(), "inbound message");

    match action {
        Some(action) if action.is_full_load() => {
            let content: LoadContent = parse_content(envelope.content, action.to_string())?;
            content.components.validate()?;
            if !content.max_upper_bound.is_finite() || content.max_upper_bound <= 0.0 {
                return Err(ViewError::Protocol(format!(
                    "max_upper_bound must be finite and > 0, got {}",
                    content.max_upper_bound
                )));
            }
            Ok(InboundMessage::FullLoad {
                action,
                content: Box::new(content),
            })
        }
        Some(MessageAction::SaveResult) => Ok(InboundMessage::SaveResult(parse_content(
            envelope.content,
            MessageAction::SaveResult.to_string(),
        )?)),
        _ => {
            let content: UpdateContent =
                parse_content(envelope.content, format!("action {}", envelope.action))?;
            content.components.validate()?;
            Ok(InboundMessage::Update {
                code: envelope.action,
                content: Box::new(content),
            })
        }
    }
}

fn parse_content<T: for<'de> Deserialize<'de>>(
    content: serde_json::Value,
    what: String,
) -> ViewResult<T> {
    serde_json::from_value(content)
        .map_err(|e| ViewError::Protocol(format!("invalid {what} content: {e}")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureName {
    Text(String),
    Number(serde_json::Number),
}

fn feature_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<FeatureName>::deserialize(deserializer)?;
    Ok(names
        .into_iter()
        .map(|name| match name {
            FeatureName::Text(text) => text,
            FeatureName::Number(number) => number.to_string(),
        })
        .collect())
}
