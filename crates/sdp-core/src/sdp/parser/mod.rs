//! SDP grammar parser
//!
//! The grammar is split in two levels, session and media, each expressed as
//! an ordered list of field parsers driven by [`field::run_pipeline`].

pub mod field;
mod media;
mod session;

pub use self::field::{FieldParser, Grammar, ParseOutcome, optional_field, repeated_field, required_field, run_pipeline};
pub use self::session::{parse_sdp, parse_sdp_bytes};

use std::str::FromStr;

use crate::error::Error;
use crate::types::sdp::SessionDescription;

impl FromStr for SessionDescription {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sdp(s)
    }
}
