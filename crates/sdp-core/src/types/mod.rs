//! Data types shared by the parser, serializer and WebRTC layers.

pub mod sdp;

pub use sdp::{Bandwidth, ConnectionData, MediaDescriptor, Origin, SessionDescription};
