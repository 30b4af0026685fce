use tracing::debug;

use crate::core::{ClassLabel, EmbeddedPoint, ViewId, WeightChannel, WeightEntry};
use crate::error::ViewResult;
use crate::interaction::{EllipseDomainGeometry, EllipseGesture};
use crate::store::ViewStateStore;

use super::{
    Channel, ComponentAxes, InboundMessage, OptimizeWeightsRequest, OutboundRequest,
    UpdateEmbeddingRequest, WeightSet,
};

/// What an applied inbound message changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Every view was replaced; render from scratch.
    FullReload,
    /// Only the saved-dataset list changed.
    SaveListUpdated,
    /// Rows were refilled in place; render with transitions.
    Incremental,
}

/// Translates between the view-state store and wire messages.
#[derive(Debug, Clone, Default)]
pub struct ProtocolAdapter {
    requests_sent: u64,
    messages_applied: u64,
}

impl ProtocolAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    #[must_use]
    pub fn messages_applied(&self) -> u64 {
        self.messages_applied
    }

    /// Merges a decoded message into `store`.
    ///
    /// Views must already be registered; a missing view is reported before
    /// any row changes. Under [`LabelNamePolicy::FailFast`] every label in
    /// the dataset must have a name, checked before any row changes too.
    ///
    /// [`LabelNamePolicy::FailFast`]: crate::store::LabelNamePolicy::FailFast
    pub fn apply_inbound(
        &mut self,
        store: &mut ViewStateStore,
        message: InboundMessage,
    ) -> ViewResult<ApplyOutcome> {
        let code = message.code();
        let outcome = match message {
            InboundMessage::FullLoad { action, content } => {
                ensure_views(store)?;
                let content = *content;
                store.label_names().ensure_named_in(
                    &content.label_to_name,
                    dataset_labels(&content.weights, &content.bounds, &content.emb),
                )?;
                store.set_boundary_max(content.max_upper_bound)?;
                refill_dataset(
                    store,
                    content.weights,
                    content.bounds,
                    content.emb,
                    content.components,
                )?;
                store.replace_label_names(content.label_to_name);
                debug!(%action, points = store.points()?.len(), "dataset loaded");
                ApplyOutcome::FullReload
            }
            InboundMessage::SaveResult(content) => {
                debug!(names = content.data_names.len(), "saved datasets listed");
                store.set_data_names(content.data_names);
                store.show_save_indicator();
                ApplyOutcome::SaveListUpdated
            }
            InboundMessage::Update { content, .. } => {
                ensure_views(store)?;
                let content = *content;
                store.label_names().ensure_named(dataset_labels(
                    &content.weights,
                    &content.bounds,
                    &content.emb,
                ))?;
                refill_dataset(
                    store,
                    content.weights,
                    content.bounds,
                    content.emb,
                    content.components,
                )?;
                debug!(code, points = store.points()?.len(), "embedding refreshed");
                ApplyOutcome::Incremental
            }
        };
        self.messages_applied += 1;
        Ok(outcome)
    }

    /// `updateEmb` with the store's current weights, bounds and points.
    pub fn update_embedding_request(&self, store: &ViewStateStore) -> ViewResult<OutboundRequest> {
        Ok(OutboundRequest::UpdateEmbedding(UpdateEmbeddingRequest {
            weights: weight_set(store)?,
            bounds: store.weights(WeightChannel::Boundary)?.to_vec(),
            emb: store.points()?.to_vec(),
        }))
    }

    pub fn optimize_weights_request(
        &self,
        store: &ViewStateStore,
        interaction: EllipseGesture,
        updated_label: ClassLabel,
        ellipses: Vec<EllipseDomainGeometry>,
    ) -> ViewResult<OutboundRequest> {
        Ok(OutboundRequest::OptimizeWeights(OptimizeWeightsRequest {
            emb: store.points()?.to_vec(),
            weights: weight_set(store)?,
            bounds: store.weights(WeightChannel::Boundary)?.to_vec(),
            interaction,
            updated_label,
            ellipses,
        }))
    }

    /// Encodes and sends `request`; nothing is awaited.
    pub fn send<C: Channel>(&mut self, channel: &mut C, request: &OutboundRequest) -> ViewResult<()> {
        let action = request.action();
        let message = request.to_json()?;
        let bytes = message.len();
        channel.send(message)?;
        self.requests_sent += 1;
        debug!(%action, bytes, "request sent");
        Ok(())
    }
}

const DATASET_VIEWS: [ViewId; 8] = [
    ViewId::TargetWeight,
    ViewId::BackgroundWeight,
    ViewId::BetweenClassWeight,
    ViewId::Boundary,
    ViewId::Embedding,
    ViewId::ComponentX,
    ViewId::ComponentY,
    ViewId::ComponentFeatureNames,
];

fn ensure_views(store: &ViewStateStore) -> ViewResult<()> {
    for view in DATASET_VIEWS {
        store.view(view)?;
    }
    Ok(())
}

fn dataset_labels<'a>(
    weights: &'a WeightSet,
    bounds: &'a [WeightEntry],
    emb: &'a [EmbeddedPoint],
) -> impl Iterator<Item = &'a ClassLabel> {
    weights
        .tg
        .iter()
        .chain(&weights.bg)
        .chain(&weights.bw)
        .chain(bounds)
        .map(|entry| &entry.label)
        .chain(emb.iter().map(|point| &point.label))
}

fn refill_dataset(
    store: &mut ViewStateStore,
    weights: WeightSet,
    bounds: Vec<WeightEntry>,
    emb: Vec<EmbeddedPoint>,
    components: ComponentAxes,
) -> ViewResult<()> {
    store.refill_weights(WeightChannel::Target, weights.tg)?;
    store.refill_weights(WeightChannel::Background, weights.bg)?;
    store.refill_weights(WeightChannel::BetweenClass, weights.bw)?;
    store.refill_weights(WeightChannel::Boundary, bounds)?;
    store.refill_points(emb)?;
    store.refill_values(ViewId::ComponentX, components.x)?;
    store.refill_values(ViewId::ComponentY, components.y)?;
    store.refill_feature_names(components.feat_names)
}

fn weight_set(store: &ViewStateStore) -> ViewResult<WeightSet> {
    Ok(WeightSet {
        tg: store.weights(WeightChannel::Target)?.to_vec(),
        bg: store.weights(WeightChannel::Background)?.to_vec(),
        bw: store.weights(WeightChannel::BetweenClass)?.to_vec(),
    })
}
