//! Echo endpoint configuration
//!
//! Loaded from TOML. Every section and key is optional; missing values take
//! the defaults below and unknown keys are rejected.
//!
//! ```toml
//! [answer]
//! session_name = "echo"
//!
//! [answer.origin]
//! username = "-"
//! session_id = "0"
//! session_version = "0"
//! net_type = "IN"
//! addr_type = "IP4"
//! unicast_address = "127.0.0.1"
//!
//! [candidate]
//! protocol = "udp"
//! address = "192.168.1.10"
//! port = 40000
//!
//! [logging]
//! level = "debug"
//! json = false
//! file_info = false
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::Level;

use crate::error::{Error, Result};
use crate::webrtc::answer::AnswerConfig;
use crate::webrtc::candidate::host_candidate;

/// Local transport address announced as a host candidate
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CandidateConfig {
    /// Transport token written into the candidate, e.g. "udp"
    pub protocol: String,
    pub address: String,
    pub port: u16,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            protocol: "udp".to_string(),
            address: "127.0.0.1".to_string(),
            port: 9,
        }
    }
}

impl CandidateConfig {
    /// The host candidate for this address.
    pub fn host_candidate(&self) -> String {
        host_candidate(&self.protocol, &self.address, self.port)
    }
}

/// Logging preferences applied by the binary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Default level; `RUST_LOG` directives take precedence
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
    /// Include file and line information
    pub file_info: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_info: false,
        }
    }
}

impl LoggingSettings {
    /// Parsed log level
    pub fn level(&self) -> Result<Level> {
        Level::from_str(&self.level)
            .map_err(|_| Error::Config(format!("invalid log level: {}", self.level)))
    }
}

/// Complete configuration of the echo endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EchoConfig {
    pub answer: AnswerConfig,
    pub candidate: CandidateConfig,
    pub logging: LoggingSettings,
}

impl EchoConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EchoConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Checks values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.logging.level()?;
        if self.candidate.address.is_empty() {
            return Err(Error::Config("candidate address must not be empty".to_string()));
        }
        if self.candidate.protocol.is_empty() {
            return Err(Error::Config("candidate protocol must not be empty".to_string()));
        }
        self.validate_answer()
    }

    /// The configured identity is written into every answer, so it must
    /// survive a round trip through the grammar.
    fn validate_answer(&self) -> Result<()> {
        let answer = &self.answer;
        if answer.session_name.contains(['\r', '\n']) {
            return Err(Error::Config("answer session_name must be a single line".to_string()));
        }

        let origin = &answer.origin;
        // The username is split off from the right and may contain spaces.
        let fields = [
            ("username", &origin.username, false),
            ("session_id", &origin.session_id, true),
            ("session_version", &origin.session_version, true),
            ("net_type", &origin.net_type, true),
            ("addr_type", &origin.addr_type, true),
            ("unicast_address", &origin.unicast_address, true),
        ];
        for (name, value, token) in fields {
            let invalid = value.is_empty()
                || value.contains(['\r', '\n'])
                || (token && value.contains(char::is_whitespace));
            if invalid {
                return Err(Error::Config(format!(
                    "answer origin {} is not a valid token: {:?}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EchoConfig::default();
        assert_eq!(config.answer.session_name, "-");
        assert_eq!(config.answer.origin.to_string(), "- 0 0 IN IP4 127.0.0.1");
        assert_eq!(config.candidate.host_candidate(), "candidate:1 1 udp 1 127.0.0.1 9 typ host");
        assert_eq!(config.logging.level().unwrap(), Level::INFO);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EchoConfig::from_toml_str("").unwrap(), EchoConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = EchoConfig::from_toml_str(
            r#"
            [candidate]
            address = "10.0.0.2"
            port = 5000

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.candidate.protocol, "udp");
        assert_eq!(config.candidate.address, "10.0.0.2");
        assert_eq!(config.candidate.port, 5000);
        assert_eq!(config.logging.level().unwrap(), Level::DEBUG);
        assert_eq!(config.answer, AnswerConfig::default());
    }

    #[test]
    fn test_answer_origin_section() {
        let config = EchoConfig::from_toml_str(
            r#"
            [answer]
            session_name = "echo"

            [answer.origin]
            username = "echo"
            session_id = "1"
            session_version = "2"
            net_type = "IN"
            addr_type = "IP6"
            unicast_address = "::1"
            "#,
        )
        .unwrap();
        assert_eq!(config.answer.session_name, "echo");
        assert_eq!(config.answer.origin.to_string(), "echo 1 2 IN IP6 ::1");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = EchoConfig::from_toml_str("[candidate]\nhost = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(EchoConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").is_err());
        assert!(EchoConfig::from_toml_str("[candidate]\nport = 70000\n").is_err());
        assert!(EchoConfig::from_toml_str("[candidate]\naddress = \"\"\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = EchoConfig::from_file("/nonexistent/echo.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_multiline_session_name() {
        let err = EchoConfig::from_toml_str("[answer]\nsession_name = \"echo\\r\\na=setup:active\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    fn origin_with(field: &str, value: &str) -> String {
        let mut text = "[answer.origin]\n".to_string();
        for (name, default) in [
            ("username", "-"),
            ("session_id", "0"),
            ("session_version", "0"),
            ("net_type", "IN"),
            ("addr_type", "IP4"),
            ("unicast_address", "127.0.0.1"),
        ] {
            let value = if name == field { value } else { default };
            text.push_str(&format!("{} = {:?}\n", name, value));
        }
        text
    }

    #[test]
    fn test_rejects_bad_origin_tokens() {
        assert!(EchoConfig::from_toml_str(&origin_with("username", "echo user")).is_ok());
        for (field, value) in [
            ("session_id", "1 2"),
            ("unicast_address", ""),
            ("net_type", "IN\n"),
            ("addr_type", "IP4\t"),
            ("username", "a\rb"),
        ] {
            let err = EchoConfig::from_toml_str(&origin_with(field, value)).unwrap_err();
            assert_eq!(
                err,
                Error::Config(format!("answer origin {} is not a valid token: {:?}", field, value))
            );
        }
    }

    #[test]
    fn test_valid_identity_answers_parse_back() {
        use crate::sdp::{parse_sdp, serialize_sdp};
        use crate::webrtc::generate_answer;

        let config = EchoConfig::from_toml_str(
            r#"
            [answer]
            session_name = "echo session"

            [answer.origin]
            username = "echo user"
            session_id = "42"
            session_version = "1"
            net_type = "IN"
            addr_type = "IP4"
            unicast_address = "10.0.0.1"
            "#,
        )
        .unwrap();
        let offer = parse_sdp("v=0\r\no=- 0 0 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n").unwrap();
        let text = serialize_sdp(&generate_answer(&offer, &config.answer));
        let answer = parse_sdp(&text).unwrap();
        assert_eq!(answer.origin().username, "echo user");
        assert_eq!(answer.session_name(), "echo session");
    }
}
