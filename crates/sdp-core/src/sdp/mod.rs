//! SDP text handling: grammar parser and serializer.

pub mod parser;
pub mod serializer;

pub use self::parser::{parse_sdp, parse_sdp_bytes};
pub use self::serializer::serialize_sdp;
