//! echo-sdp - inspect SDP offers and produce WebRTC echo answers
//!
//! Reads SDP text (or an offer JSON body) from a file or stdin and writes the
//! result to stdout. Logs go to stderr.

mod logging;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use echo_sdp_core::prelude::*;
use echo_sdp_core::signaling::handle_offer_json;
use tracing::{debug, info};

use crate::logging::{LoggingConfig, setup_logging};

#[derive(Parser, Debug)]
#[command(name = "echo-sdp")]
#[command(version, about = "Parse SDP offers and build WebRTC echo answers")]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "ECHO_SDP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Parse SDP and print the document as JSON
    Parse {
        /// Input file, stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Print the re-serialized SDP instead of JSON
        #[arg(long)]
        sdp: bool,
    },

    /// Print the BUNDLE transports of an offer as JSON
    Bundles {
        /// Input file, stdin when omitted or "-"
        input: Option<PathBuf>,
    },

    /// Answer an offer and print the answer JSON
    Answer {
        /// Input file, stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Input is a `{"sdp": "..."}` offer body rather than raw SDP
        #[arg(long)]
        json: bool,

        /// Local candidate address
        #[arg(short, long)]
        address: Option<String>,

        /// Local candidate port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("cannot read stdin")?;
            Ok(text)
        }
    }
}

fn load_config(args: &Args) -> Result<EchoConfig> {
    let mut config = match &args.config {
        Some(path) => EchoConfig::from_file(path)?,
        None => EchoConfig::default(),
    };

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.log_json {
        config.logging.json = true;
    }
    if let Command::Answer { address, port, .. } = &args.command {
        if let Some(address) = address {
            config.candidate.address = address.clone();
        }
        if let Some(port) = port {
            config.candidate.port = *port;
        }
    }

    config.validate()?;
    Ok(config)
}

fn run(command: &Command, config: &EchoConfig) -> Result<String> {
    match command {
        Command::Parse { input, sdp } => {
            let session = parse_sdp(&read_input(input.as_deref())?)?;
            info!(media = session.media().len(), "SDP parsed");
            if *sdp {
                Ok(serialize_sdp(&session))
            } else {
                Ok(serde_json::to_string_pretty(&session)?)
            }
        }
        Command::Bundles { input } => {
            let session = parse_sdp(&read_input(input.as_deref())?)?;
            let bundles = extract_bundles(&session)?;
            info!(bundles = bundles.len(), "BUNDLE groups extracted");
            Ok(serde_json::to_string_pretty(&bundles)?)
        }
        Command::Answer { input, json, .. } => {
            let text = read_input(input.as_deref())?;
            if *json {
                let (status, body) = handle_offer_json(&text, config);
                if status != 200 {
                    bail!("offer rejected ({}): {}", status, body);
                }
                Ok(body)
            } else {
                let negotiated = process_offer(&OfferRequest { sdp: text }, config)?;
                debug!(bundles = negotiated.bundles.len(), "offer negotiated");
                Ok(negotiated.response.to_json()?)
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    setup_logging(&LoggingConfig::from_settings(&config.logging)?)?;
    info!("Starting echo-sdp v{}", env!("CARGO_PKG_VERSION"));

    let output = run(&args.command, &config)?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFER: &str = "v=0\r\n\
        o=- 0 0 IN IP4 127.0.0.1\r\n\
        s=-\r\n\
        t=0 0\r\n\
        a=group:BUNDLE 0\r\n\
        m=audio 9 UDP/TLS/RTP/SAVPF 0\r\n\
        a=mid:0\r\n\
        a=ice-ufrag:abc\r\n\
        a=setup:actpass\r\n";

    fn offer_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("echo-sdp-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_subcommand_args() {
        let args = Args::try_parse_from(["echo-sdp", "parse", "offer.sdp", "--sdp"]).unwrap();
        assert_eq!(
            args.command,
            Command::Parse { input: Some(PathBuf::from("offer.sdp")), sdp: true }
        );
        assert!(args.config.is_none());
    }

    #[test]
    fn test_answer_subcommand_args() {
        let args = Args::try_parse_from([
            "echo-sdp", "answer", "--json", "-a", "10.0.0.5", "-p", "40000", "--log-level", "debug",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Command::Answer {
                input: None,
                json: true,
                address: Some("10.0.0.5".to_string()),
                port: Some(40000),
            }
        );
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_args() {
        assert!(Args::try_parse_from(["echo-sdp"]).is_err());
        assert!(Args::try_parse_from(["echo-sdp", "answer", "--port", "70000"]).is_err());
        assert!(Args::try_parse_from(["echo-sdp", "transcode"]).is_err());
    }

    #[test]
    fn test_overrides_are_applied() {
        let args = Args::try_parse_from([
            "echo-sdp", "--log-level", "trace", "answer", "--address", "192.0.2.7", "--port", "5004",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.candidate.address, "192.0.2.7");
        assert_eq!(config.candidate.port, 5004);
    }

    #[test]
    fn test_invalid_log_level_override() {
        let args = Args::try_parse_from(["echo-sdp", "--log-level", "noisy", "bundles"]).unwrap();
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_run_answer() {
        let path = offer_file("answer.sdp", OFFER);
        let command = Command::Answer { input: Some(path.clone()), json: false, address: None, port: None };
        let output = run(&command, &EchoConfig::default()).unwrap();
        std::fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value["sdp"].as_str().unwrap().contains("a=setup:passive"));
        assert_eq!(value["candidates"][0], "candidate:1 1 udp 1 127.0.0.1 9 typ host");
    }

    #[test]
    fn test_run_bundles_and_parse() {
        let path = offer_file("bundles.sdp", OFFER);
        let bundles = run(&Command::Bundles { input: Some(path.clone()) }, &EchoConfig::default()).unwrap();
        let canonical = run(&Command::Parse { input: Some(path.clone()), sdp: true }, &EchoConfig::default()).unwrap();
        std::fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&bundles).unwrap();
        assert_eq!(value[0]["ice"]["ufrag"], "abc");
        assert_eq!(value[0]["mids"][0], "0");
        assert_eq!(canonical, OFFER);
    }

    #[test]
    fn test_run_rejects_bad_offer() {
        let path = offer_file("bad.json", "{\"sdp\": \"v=0\\r\\n\"}");
        let command = Command::Answer { input: Some(path.clone()), json: true, address: None, port: None };
        let err = run(&command, &EchoConfig::default()).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("400"));
    }
}
