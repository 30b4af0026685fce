//! Host-facing engine: configuration, layout, scene building and the
//! `Workbench` facade that ties store, controllers and protocol together.

mod component_scene_builder;
mod config;
mod embedding_scene_builder;
mod layout;
mod weight_scene_builder;
mod workbench;
mod workbench_accessors;
mod workbench_gestures;

pub use component_scene_builder::{
    COMPONENT_DOMAIN, MAX_FEATURE_NAME_CHARS, build_component_scene, build_feature_name_scene,
    shorten_feature_name,
};
pub use config::{ContainerLayout, ViewMargins, WorkbenchConfig};
pub use embedding_scene_builder::{
    EmbeddingSceneInput, LegendEntry, PointSizing, build_embedding_scene,
};
pub use layout::WorkbenchLayout;
pub use weight_scene_builder::{WeightBarStyle, build_weight_scene};
pub use workbench::Workbench;
