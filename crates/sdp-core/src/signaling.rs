//! Offer/answer exchange in JSON form.
//!
//! A signaling front end receives `{"sdp": "<offer>"}` and replies either with
//! `{"sdp": "<answer>", "candidates": [...]}` or, on failure, with an HTTP
//! style status and `{"code": <status>, "description": "<error>"}`.
//! [`process_offer`] runs the whole negotiation; [`handle_offer_json`] adds
//! the JSON decoding and encoding around it.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::EchoConfig;
use crate::error::{Error, Result};
use crate::sdp::{parse_sdp, serialize_sdp};
use crate::types::sdp::SessionDescription;
use crate::webrtc::{Bundle, extract_bundles, generate_answer};

/// Offer body as sent by the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub sdp: String,
}

impl OfferRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::Grammar {
            field: "offer request",
            fragment: e.to_string(),
        })
    }
}

/// Successful reply: the answer SDP and our local candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub sdp: String,
    pub candidates: Vec<String>,
}

impl AnswerResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Failure reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub description: String,
}

impl ErrorResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            code: err.status_code(),
            description: err.to_string(),
        }
    }
}

/// Everything produced while answering one offer.
#[derive(Debug, Clone)]
pub struct Negotiated {
    /// Transports the offer bundles its media onto
    pub bundles: Vec<Bundle>,
    pub answer: SessionDescription,
    pub response: AnswerResponse,
}

/// Parses an offer, resolves its BUNDLE transports and builds the answer.
pub fn process_offer(request: &OfferRequest, config: &EchoConfig) -> Result<Negotiated> {
    let offer = parse_sdp(&request.sdp)?;
    let bundles = extract_bundles(&offer)?;
    let answer = generate_answer(&offer, &config.answer);
    let response = AnswerResponse {
        sdp: serialize_sdp(&answer),
        candidates: vec![config.candidate.host_candidate()],
    };
    info!(
        media = offer.media().len(),
        bundles = bundles.len(),
        "offer answered"
    );
    Ok(Negotiated { bundles, answer, response })
}

/// Body sent when a reply cannot be encoded.
const ENCODE_FAILURE_BODY: &str = r#"{"code":500,"description":"cannot encode reply"}"#;

/// Logs a failed negotiation and builds its status and reply.
///
/// Offers the peer got wrong are logged as warnings, failures on our side as
/// errors.
fn reject(err: &Error) -> (u16, serde_json::Result<String>) {
    if err.is_input_error() {
        warn!(error = %err, "offer rejected");
    } else {
        error!(error = %err, "offer failed");
    }
    let reply = ErrorResponse::from(err);
    (reply.code, reply.to_json())
}

/// Answers a JSON offer body, returning the status code and JSON reply body.
pub fn handle_offer_json(body: &str, config: &EchoConfig) -> (u16, String) {
    let outcome = OfferRequest::from_json(body).and_then(|request| process_offer(&request, config));
    let (status, reply) = match outcome {
        Ok(negotiated) => {
            debug!(candidates = negotiated.response.candidates.len(), "sending answer");
            (200, negotiated.response.to_json())
        }
        Err(err) => reject(&err),
    };
    match reply {
        Ok(body) => (status, body),
        Err(e) => {
            error!(error = %e, "cannot encode reply");
            (500, ENCODE_FAILURE_BODY.to_string())
        }
    }
}
