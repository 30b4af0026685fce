use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::core::{ComponentKey, ViewId, WeightChannel, unique_labels};
use crate::error::{ViewError, ViewResult};
use crate::interaction::{ComponentCanvasController, EllipseController, WeightBarController};
use crate::protocol::{ApplyOutcome, Channel, ProtocolAdapter, decode_inbound};
use crate::render::palette::label_color;
use crate::render::{Reconciler, Renderer, Scene, TransitionPolicy};
use crate::store::{ViewPayload, ViewState, ViewStateStore};

use super::component_scene_builder::{build_component_scene, build_feature_name_scene};
use super::embedding_scene_builder::{
    EmbeddingSceneInput, LegendEntry, PointSizing, build_embedding_scene,
};
use super::weight_scene_builder::{WeightBarStyle, build_weight_scene};
use super::{ContainerLayout, WorkbenchConfig, WorkbenchLayout};

/// Headless engine behind the weight, embedding and component views.
///
/// `Workbench` owns the view-state store and every gesture controller,
/// applies backend messages, sends requests over `C` and pushes scene
/// patches to `R`. Hosts feed it raw pointer events per widget.
pub struct Workbench<R: Renderer, C: Channel> {
    pub(super) config: WorkbenchConfig,
    pub(super) store: ViewStateStore,
    pub(super) renderer: R,
    pub(super) channel: C,
    pub(super) adapter: ProtocolAdapter,
    pub(super) reconciler: Reconciler,
    pub(super) weight_bars: IndexMap<WeightChannel, WeightBarController>,
    pub(super) ellipses: EllipseController,
    pub(super) canvas: ComponentCanvasController,
    pub(super) highlighted_feature: Option<usize>,
}

impl<R: Renderer, C: Channel> Workbench<R, C> {
    /// Registers the fixed views with empty rows; nothing is drawn until
    /// the first load arrives.
    pub fn new(config: WorkbenchConfig, renderer: R, channel: C) -> ViewResult<Self> {
        let config = config.validate()?;
        let layout = WorkbenchLayout::resolve(&config, 0, 0)?;
        let mut store = ViewStateStore::new(config.label_name_policy);

        let mut weight_bars = IndexMap::new();
        for channel in WeightChannel::ALL {
            let max = match channel {
                WeightChannel::Boundary => config.boundary_max,
                _ => config.weight_max,
            };
            weight_bars.insert(channel, WeightBarController::new(channel, max)?);
            store.insert_view(
                channel.view(),
                ViewState::new(layout.weight, ViewPayload::Weights(Vec::new()))
                    .with_subtitle(channel.subtitle()),
            );
        }
        store.insert_view(
            ViewId::Embedding,
            ViewState::new(layout.embedding, ViewPayload::Points(Vec::new())),
        );
        store.insert_view(
            ViewId::ComponentX,
            ViewState::new(layout.component_x, ViewPayload::Values(Vec::new())).with_subtitle("x"),
        );
        store.insert_view(
            ViewId::ComponentY,
            ViewState::new(layout.component, ViewPayload::Values(Vec::new())).with_subtitle("y"),
        );
        store.insert_view(
            ViewId::ComponentFeatureNames,
            ViewState::new(layout.feature_names, ViewPayload::Names(Vec::new())),
        );

        Ok(Self {
            ellipses: EllipseController::new(config.confidence_level()?),
            reconciler: Reconciler::new(config.transition_ms),
            config,
            store,
            renderer,
            channel,
            adapter: ProtocolAdapter::new(),
            weight_bars,
            canvas: ComponentCanvasController::new(),
            highlighted_feature: None,
        })
    }

    /// Decodes and applies one backend message, then redraws what changed.
    ///
    /// A malformed message is rejected before any state changes.
    pub fn handle_message(&mut self, text: &str) -> ViewResult<ApplyOutcome> {
        let message = decode_inbound(text)?;
        let outcome = self.adapter.apply_inbound(&mut self.store, message)?;
        match outcome {
            ApplyOutcome::FullReload => {
                if let Some(max) = self.store.boundary_max() {
                    self.weight_bar_mut(WeightChannel::Boundary)?
                        .set_domain_max(max)?;
                }
                self.reset_gestures();
                self.retire_components()?;
                self.highlighted_feature = None;
                self.relayout()?;
                self.render_all(TransitionPolicy::Initial)?;
                info!(
                    points = self.store.points()?.len(),
                    features = self.store.feature_names()?.len(),
                    "dataset loaded"
                );
            }
            ApplyOutcome::Incremental => {
                self.reset_gestures();
                let retired = self.retire_components()?;
                self.relayout()?;
                if retired > 0 {
                    for view in [ViewId::ComponentX, ViewId::ComponentY, ViewId::ComponentFeatureNames] {
                        self.render_view(view, TransitionPolicy::Initial)?;
                    }
                }
                self.render_all(TransitionPolicy::Animated)?;
                debug!(points = self.store.points()?.len(), "embedding refreshed");
            }
            ApplyOutcome::SaveListUpdated => {
                debug!(names = self.store.data_names().len(), "save list updated");
            }
        }
        Ok(outcome)
    }

    /// Recomputes every plot area for new container sizes and redraws.
    pub fn resize(&mut self, containers: ContainerLayout) -> ViewResult<()> {
        let config = self.config.with_containers(containers).validate()?;
        self.config = config;
        self.ellipses.invalidate();
        self.relayout()?;
        self.render_all(TransitionPolicy::Initial)
    }

    /// Advances the save indicator clock; `true` when it just expired.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        self.store.tick(elapsed_ms)
    }

    pub fn render_all(&mut self, policy: TransitionPolicy) -> ViewResult<()> {
        let views: Vec<ViewId> = self.store.view_ids().collect();
        for view in views {
            self.render_view(view, policy)?;
        }
        Ok(())
    }

    pub fn render_view(&mut self, view: ViewId, policy: TransitionPolicy) -> ViewResult<()> {
        let scene = self.build_scene(view)?;
        scene.validate()?;
        let patch = self.reconciler.reconcile(scene, policy);
        if patch.is_empty() {
            return Ok(());
        }
        let counts = patch.counts();
        self.renderer.apply(&patch)?;
        trace!(
            %view,
            ?policy,
            entered = counts.entered,
            updated = counts.updated,
            exited = counts.exited,
            "view reconciled"
        );
        Ok(())
    }

    pub(super) fn build_scene(&mut self, view: ViewId) -> ViewResult<Scene> {
        let area = self.store.pixel_area(view)?;
        match view {
            ViewId::TargetWeight
            | ViewId::BackgroundWeight
            | ViewId::BetweenClassWeight
            | ViewId::Boundary => {
                let channel = view
                    .weight_channel()
                    .ok_or_else(|| ViewError::UnknownView(view.to_string()))?;
                let entries = self.store.weights(channel)?;
                let names = entries
                    .iter()
                    .map(|entry| self.store.label_name(&entry.label))
                    .collect::<ViewResult<Vec<_>>>()?;
                let scale = self.weight_bar(channel)?.x_scale(entries, area)?;
                build_weight_scene(
                    view,
                    area,
                    &self.store.view(view)?.subtitle,
                    entries,
                    &names,
                    scale,
                    WeightBarStyle {
                        band_padding: self.config.band_padding,
                        max_bar_height: self.config.max_bar_height,
                        handle_width: self.config.handle_width,
                    },
                )
            }
            ViewId::Embedding => {
                let points = self.store.points()?;
                self.ellipses.ensure(points, area)?;
                let scales = self
                    .ellipses
                    .scales()
                    .ok_or_else(|| ViewError::InvalidData("embedding scales missing".to_owned()))?;
                let sizing = PointSizing {
                    min_radius: self.config.min_point_radius,
                    max_radius: self.config.max_point_radius,
                };
                let radii = sizing.radii(points, self.highlighted_feature);
                let legend = unique_labels(points)
                    .into_iter()
                    .map(|label| {
                        Ok(LegendEntry {
                            name: self.store.label_name(&label)?,
                            fill: label_color(&label),
                        })
                    })
                    .collect::<ViewResult<Vec<_>>>()?;
                build_embedding_scene(
                    EmbeddingSceneInput {
                        area,
                        scales,
                        points,
                        radii: &radii,
                        legend: &legend,
                    },
                    self.ellipses.ellipses(),
                    self.canvas.arena().iter(),
                )
            }
            ViewId::ComponentFeatureNames => build_feature_name_scene(
                area,
                self.store.feature_names()?,
                self.highlighted_feature,
                self.config.band_padding,
            ),
            ViewId::ComponentX | ViewId::ComponentY | ViewId::Component(_) => build_component_scene(
                view,
                area,
                &self.store.view(view)?.subtitle,
                self.store.values(view)?,
                self.config.band_padding,
                self.config.max_bar_height,
            ),
        }
    }

    /// Re-resolves plot areas for the current container sizes and
    /// component count.
    pub(super) fn relayout(&mut self) -> ViewResult<()> {
        let rows = self.store.values(ViewId::ComponentX)?.len();
        let live: Vec<_> = self.canvas.arena().live().map(|component| component.key).collect();
        let layout = WorkbenchLayout::resolve(&self.config, live.len(), rows)?;

        for channel in WeightChannel::ALL {
            self.store.set_pixel_area(channel.view(), layout.weight)?;
        }
        self.store.set_pixel_area(ViewId::Embedding, layout.embedding)?;
        self.store.set_pixel_area(ViewId::ComponentX, layout.component_x)?;
        self.store.set_pixel_area(ViewId::ComponentY, layout.component)?;
        self.store
            .set_pixel_area(ViewId::ComponentFeatureNames, layout.feature_names)?;
        for key in live {
            self.store.set_pixel_area(ViewId::Component(key), layout.component)?;
        }
        Ok(())
    }

    /// Drops in-flight gestures whose baselines no longer match the rows.
    fn reset_gestures(&mut self) {
        for bar in self.weight_bars.values_mut() {
            bar.reset();
        }
        self.ellipses.invalidate();
    }

    /// Retires every drawn component and erases its panel.
    fn retire_components(&mut self) -> ViewResult<usize> {
        let keys: Vec<_> = self.canvas.arena().live().map(|component| component.key).collect();
        let retired = self.canvas.retire_all();
        for key in keys {
            self.discard_component_view(key)?;
        }
        Ok(retired)
    }

    pub(super) fn discard_component_view(&mut self, key: ComponentKey) -> ViewResult<()> {
        let view = ViewId::Component(key);
        self.store.remove_view(view);
        match self.reconciler.retire(view) {
            Some(patch) => self.renderer.apply(&patch),
            None => Ok(()),
        }
    }

    pub(super) fn weight_bar(&self, channel: WeightChannel) -> ViewResult<&WeightBarController> {
        self.weight_bars
            .get(&channel)
            .ok_or_else(|| ViewError::UnknownView(channel.view().to_string()))
    }

    pub(super) fn weight_bar_mut(
        &mut self,
        channel: WeightChannel,
    ) -> ViewResult<&mut WeightBarController> {
        self.weight_bars
            .get_mut(&channel)
            .ok_or_else(|| ViewError::UnknownView(channel.view().to_string()))
    }
}
