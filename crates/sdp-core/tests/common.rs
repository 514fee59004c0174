// Shared fixtures for the integration tests

#![allow(dead_code)]

/// Installs a test-writer subscriber so parser and bundle traces show up in
/// failing test output.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("echo_sdp_core=trace")
        .with_test_writer()
        .try_init();
}

/// Offer from a browser with one bundled audio section.
pub const SINGLE_AUDIO_OFFER: &str = "v=0\r\n\
    o=- 0 0 IN IP4 127.0.0.1\r\n\
    s=-\r\n\
    t=0 0\r\n\
    m=audio 9 UDP/TLS/RTP/SAVPF 0\r\n\
    a=mid:0\r\n\
    a=ice-ufrag:abc\r\n\
    a=ice-pwd:defdefdefdefdefdefdef\r\n\
    a=setup:actpass\r\n\
    a=fingerprint:sha-256 AA:BB\r\n\
    a=group:BUNDLE 0\r\n";

/// Builds an offer with audio (mid 0) and video (mid 1) grouped in one
/// BUNDLE. `video_pwd` is the ICE password of the video section.
pub fn two_media_offer(video_pwd: &str) -> String {
    format!(
        "v=0\r\n\
         o=mozilla...THIS_IS_SDPARTA-99.0 4153826281 0 IN IP4 0.0.0.0\r\n\
         s=-\r\n\
         t=0 0\r\n\
         a=group:BUNDLE 0 1\r\n\
         a=msid-semantic:WMS *\r\n\
         m=audio 9 UDP/TLS/RTP/SAVPF 109 9 0 8 101\r\n\
         c=IN IP4 0.0.0.0\r\n\
         a=sendrecv\r\n\
         a=ice-pwd:2b6c9f4e1a3d5e7f9a1b3c5d7e9f\r\n\
         a=ice-ufrag:8f3e2d1c\r\n\
         a=mid:0\r\n\
         a=rtcp-mux\r\n\
         a=rtpmap:109 opus/48000/2\r\n\
         a=setup:actpass\r\n\
         a=fingerprint:sha-256 5B:1B:6F:0E:4B:2D:AA:01\r\n\
         a=ice-options:trickle\r\n\
         a=candidate:0 1 UDP 2122252543 192.168.1.20 51234 typ host\r\n\
         m=video 9 UDP/TLS/RTP/SAVPF 120 124\r\n\
         c=IN IP4 0.0.0.0\r\n\
         b=AS:2000\r\n\
         a=recvonly\r\n\
         a=ice-pwd:{}\r\n\
         a=ice-ufrag:8f3e2d1c\r\n\
         a=mid:1\r\n\
         a=rtcp-mux\r\n\
         a=rtpmap:120 VP8/90000\r\n\
         a=setup:actpass\r\n\
         a=fingerprint:sha-256 5B:1B:6F:0E:4B:2D:AA:01\r\n\
         a=ice-options:trickle\r\n\
         a=candidate:1 1 UDP 2122252543 192.168.1.20 51235 typ host\r\n",
        video_pwd
    )
}

pub const AUDIO_PWD: &str = "2b6c9f4e1a3d5e7f9a1b3c5d7e9f";
