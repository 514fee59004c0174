use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing SDP or negotiating a WebRTC transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required field is absent, out of order or malformed
    #[error("cannot parse {field}: {fragment}")]
    Grammar {
        /// Grammar element that failed to match
        field: &'static str,
        /// Unmatched input (first line only)
        fragment: String,
    },

    /// The grammar matched but input remains after the last media description
    #[error("not fully parsed, remaining input: {0}")]
    TrailingInput(String),

    /// A repeated field matched without consuming input
    #[error("repeated field '{0}=' matched without consuming input")]
    LoopInvariant(char),

    /// A BUNDLE group is empty or names a MID that no media carries
    #[error("cannot resolve BUNDLE group: {0}")]
    BundleResolution(String),

    /// Media sharing a BUNDLE group disagree on ICE/DTLS identity
    #[error("ICE/DTLS attributes of BUNDLE group {group} differ on media with mid {mid}")]
    BundleConsistency {
        /// Zero-based index of the group in discovery order
        group: usize,
        /// MID of the first media that disagrees with the group's first media
        mid: String,
    },

    /// A bandwidth or transport attribute lacks its `:` separator
    #[error("invalid {kind}: {value}")]
    AttributeFormat {
        /// What was being parsed (e.g. "bandwidth", "transport attribute")
        kind: &'static str,
        /// The offending text
        value: String,
    },

    /// Configuration could not be loaded
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Builds a grammar error that quotes the first line of the unmatched input.
    pub(crate) fn grammar(field: &'static str, input: &str) -> Self {
        Error::Grammar {
            field,
            fragment: first_line(input).to_string(),
        }
    }

    /// HTTP-style status code a signaling front end should answer with.
    ///
    /// Everything derived from the offer text is the client's fault (400);
    /// a loop invariant violation or bad configuration is ours (500).
    pub fn status_code(&self) -> u16 {
        match self {
            Error::LoopInvariant(_) | Error::Config(_) => 500,
            _ => 400,
        }
    }

    /// Whether this error was caused by the SDP text rather than by this crate.
    pub fn is_input_error(&self) -> bool {
        self.status_code() == 400
    }
}

fn first_line(input: &str) -> &str {
    let end = input.find(['\r', '\n']).unwrap_or(input.len());
    &input[..end]
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
