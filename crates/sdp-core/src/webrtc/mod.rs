//! WebRTC interpretation of SDP attributes
//!
//! The grammar layer keeps attributes as raw text; this module reads the
//! ICE/DTLS ones to resolve BUNDLE transports and to build answers.

pub mod answer;
pub mod bundle;
pub mod candidate;

pub use self::answer::{AnswerConfig, SetupRole, generate_answer, invert_setup};
pub use self::bundle::{Bundle, DtlsParameters, IceParameters, bundle_groups, extract_bundles};
pub use self::candidate::host_candidate;
