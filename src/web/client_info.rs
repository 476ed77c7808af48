use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts};

use crate::db::enums::AuditAction;
use crate::db::services::audit_service::AuditEntry;

/// Caller address and user agent, recorded on audit entries.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: String,
}

impl ClientInfo {
    /// First `X-Forwarded-For` hop when present, else the peer address.
    pub fn from_parts(parts: &Parts) -> Self {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty());
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Self { ip_address: forwarded.or(peer), user_agent }
    }

    pub fn audit(&self, action: AuditAction) -> AuditEntry {
        AuditEntry::new(action).client(self.ip_address.clone(), &self.user_agent)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn forwarded_for_wins_over_peer() {
        let mut req = Request::builder()
            .header("X-Forwarded-For", "203.0.113.9, 10.0.0.1")
            .header("User-Agent", "Mozilla/5.0")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 5000))));

        let info = ClientInfo::from_parts(&parts(req));
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(info.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 20], 443))));
        let info = ClientInfo::from_parts(&parts(req));
        assert_eq!(info.ip_address.as_deref(), Some("192.168.1.20"));
        assert_eq!(info.user_agent, "");

        let bare = ClientInfo::from_parts(&parts(Request::builder().body(()).unwrap()));
        assert!(bare.ip_address.is_none());
    }
}
