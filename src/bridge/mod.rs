//! Cross-document bridge between the host workspace and embedded pages
//!
//! - [`origin`]: the origin guard every handler runs first
//! - [`protocol`]: message schema and wire encoding
//! - [`child`]: the endpoint inside an embedded document
//! - [`router`]: the host's single inbound listener
//! - [`embed`]: embedding URLs carrying the panel/tab identity

pub mod child;
pub mod embed;
pub mod origin;
pub mod protocol;
pub mod router;

pub use child::{ChildBridge, ChildCommand, FrameIdentity, OutboundPost};
pub use embed::{embed_target, EmbedTarget};
pub use origin::{parse_origin, OriginGuard};
pub use protocol::{BridgeMessage, DecodeError, Envelope, MessageKind};
pub use router::{ChildPost, DropReason, InboundEvent, MessageRouter, RoutedMessage, SubscriptionId};
