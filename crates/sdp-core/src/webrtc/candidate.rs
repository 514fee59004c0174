//! Local ICE candidates announced alongside an answer.

/// Formats a host candidate attribute value for a local transport address.
///
/// Foundation, component and priority are fixed at 1; `protocol` is written
/// as given.
pub fn host_candidate(protocol: &str, address: &str, port: u16) -> String {
    format!("candidate:1 1 {} 1 {} {} typ host", protocol, address, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_candidate() {
        assert_eq!(
            host_candidate("udp", "192.168.1.10", 40000),
            "candidate:1 1 udp 1 192.168.1.10 40000 typ host"
        );
        assert_eq!(
            host_candidate("UDP", "::1", 9),
            "candidate:1 1 UDP 1 ::1 9 typ host"
        );
    }
}
