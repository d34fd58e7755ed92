//! Browsing-session identification for the wizard routes.
//!
//! The wizard core is transport-agnostic; at the HTTP edge a session is
//! identified by a `sid` cookie. The extractor never fails: requests
//! without a usable cookie get a freshly minted id, and responses built
//! through [`SessionId::attach`] carry the matching `Set-Cookie` header.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
    response::Response,
};
use uuid::Uuid;

/// Cookie carrying the opaque session identifier.
pub const SESSION_COOKIE: &str = "sid";

/// An extracted (or freshly minted) session identifier.
#[derive(Debug, Clone)]
pub struct SessionId {
    pub id: String,
    minted: bool,
}

impl SessionId {
    /// Attach the session cookie to a response when the id was minted for
    /// this request.
    pub fn attach(&self, mut response: Response) -> Response {
        if self.minted {
            let cookie = format!(
                "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
                self.id
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }

    fn parse_cookie_header(value: &str) -> Option<String> {
        value
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    #[cfg(test)]
    pub fn minted(&self) -> bool {
        self.minted
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(Self::parse_cookie_header);

        Ok(match existing {
            Some(id) => Self { id, minted: false },
            None => Self {
                id: Uuid::new_v4().to_string(),
                minted: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(cookie: Option<&str>) -> SessionId {
        let mut builder = Request::builder().uri("/");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        SessionId::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reuses_cookie_value() {
        let session = extract(Some("sid=abc123")).await;
        assert_eq!(session.id, "abc123");
        assert!(!session.minted());
    }

    #[tokio::test]
    async fn test_finds_sid_among_other_cookies() {
        let session = extract(Some("theme=dark; sid=abc123; lang=en")).await;
        assert_eq!(session.id, "abc123");
    }

    #[tokio::test]
    async fn test_mints_when_absent() {
        let session = extract(None).await;
        assert!(session.minted());
        assert!(!session.id.is_empty());
    }

    #[tokio::test]
    async fn test_mints_when_empty() {
        let session = extract(Some("sid=")).await;
        assert!(session.minted());
    }

    #[tokio::test]
    async fn test_attach_sets_cookie_only_when_minted() {
        let minted = extract(None).await;
        let response = minted.attach(Response::new(axum::body::Body::empty()));
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("sid="));
        assert!(cookie.contains("HttpOnly"));

        let existing = extract(Some("sid=abc123")).await;
        let response = existing.attach(Response::new(axum::body::Body::empty()));
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
