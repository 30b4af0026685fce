//! Message protocol spoken with the optimizer service.
//!
//! Every message is `{"action": <int>, "content": {...}}` in both
//! directions. Inbound messages are fully decoded and validated before the
//! [`ProtocolAdapter`] touches the store.

mod action;
mod adapter;
mod channel;
mod inbound;
mod outbound;

pub use action::MessageAction;
pub use adapter::{ApplyOutcome, ProtocolAdapter};
#[cfg(feature = "ws-channel")]
pub use channel::WebSocketChannel;
pub use channel::{Channel, RecordingChannel};
pub use inbound::{
    ComponentAxes, InboundMessage, LoadContent, SaveContent, UpdateContent, WeightSet,
    decode_inbound,
};
pub use outbound::{OptimizeWeightsRequest, OutboundRequest, UpdateEmbeddingRequest};
