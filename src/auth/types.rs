//! Session types.

use serde::{Deserialize, Serialize};

use crate::jwt::SessionClaims;

/// Identity of the signed-in reader, decoded from the session cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    /// Backend access token, attached as a bearer credential by the API client
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: u64,
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            image: claims.picture,
            access_token: claims.access_token,
            refresh_token: claims.refresh_token,
            expires_at: claims.exp,
        }
    }
}

/// User part of the public session view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Session as exposed over `GET /api/auth/session`. Never carries the refresh token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: SessionUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Expiration timestamp (Unix seconds)
    pub expires: u64,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            user: SessionUser {
                id: session.user_id.clone(),
                name: session.name.clone(),
                email: session.email.clone(),
                image: session.image.clone(),
            },
            access_token: session.access_token.clone(),
            expires: session.expires_at,
        }
    }
}

impl From<SessionView> for Session {
    fn from(view: SessionView) -> Self {
        Self {
            user_id: view.user.id,
            email: view.user.email,
            name: view.user.name,
            image: view.user.image,
            access_token: view.access_token,
            refresh_token: None,
            expires_at: view.expires,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user_id: "7".to_string(),
            email: "bob@example.com".to_string(),
            name: "Bob".to_string(),
            image: Some("https://cdn.example.com/bob.png".to_string()),
            access_token: Some("at".to_string()),
            refresh_token: Some("rt".to_string()),
            expires_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_view_hides_refresh_token() {
        let json = serde_json::to_value(SessionView::from(&session())).unwrap();

        assert_eq!(json["user"]["id"], "7");
        assert_eq!(json["user"]["image"], "https://cdn.example.com/bob.png");
        assert_eq!(json["accessToken"], "at");
        assert_eq!(json["expires"], 1_700_000_000u64);
        assert!(json.get("refreshToken").is_none());
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_view_without_access_token() {
        let mut s = session();
        s.access_token = None;
        let json = serde_json::to_value(SessionView::from(&s)).unwrap();
        assert!(json.get("accessToken").is_none());
    }

    #[test]
    fn test_session_from_view_drops_refresh_token() {
        let restored = Session::from(SessionView::from(&session()));
        assert_eq!(restored.refresh_token, None);
        assert_eq!(restored.access_token.as_deref(), Some("at"));
        assert_eq!(restored.user_id, "7");
    }
}
