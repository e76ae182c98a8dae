/// Client IP extraction for recording who submitted a response.
///
/// Only the textual address is kept, on the response row itself.
use actix_web::HttpRequest;
use std::net::IpAddr;

/// Extract the real client IP address from an HTTP request.
///
/// Checks headers in order of preference:
/// 1. X-Forwarded-For (first IP in the list)
/// 2. X-Real-IP
/// 3. Remote peer address
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(xff) = req.headers().get("x-forwarded-for") {
        if let Ok(xff_str) = xff.to_str() {
            // First entry is the original client
            if let Some(ip) = xff_str.split(',').next().and_then(parse_ip) {
                return Some(ip);
            }
        }
    }

    if let Some(xri) = req.headers().get("x-real-ip") {
        if let Some(ip) = xri.to_str().ok().and_then(parse_ip) {
            return Some(ip);
        }
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}

fn parse_ip(raw: &str) -> Option<String> {
    raw.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
}
