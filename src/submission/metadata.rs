use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// What the server observed about the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMetadata {
    pub client_address: String,
    pub user_agent: Option<String>,
}

/// Extract client metadata from the request headers and peer address.
pub fn extract(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> ClientMetadata {
    let client_address = extract_ip(headers, peer_addr, trusted_proxies);
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    ClientMetadata {
        client_address,
        user_agent,
    }
}

fn extract_ip(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> String {
    let Some(peer) = peer_addr else {
        return "unknown".to_string();
    };

    // X-Forwarded-For is only honored when the direct peer is a trusted proxy
    if trusted_proxies.iter().any(|net| net.contains(&peer)) {
        if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            // Rightmost hop that isn't one of ours is the client
            for ip_str in xff.rsplit(',').map(|s| s.trim()) {
                if let Ok(ip) = ip_str.parse::<IpAddr>() {
                    if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
                        return ip.to_string();
                    }
                }
            }
        }
    }

    peer.to_string()
}
