//! Backend authentication endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use super::{ApiClient, ClientError, Navigator, RequestOptions, SessionSource};
use crate::jwt::SessionIdentity;

const SIGN_IN_ENDPOINT: &str = "/sign-in";
const SIGN_UP_ENDPOINT: &str = "/sign-up";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// User as returned by the backend sign-in endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInData {
    #[serde(default)]
    pub user: Option<BackendUser>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub data: Option<SignInData>,
}

impl SignInResponse {
    /// Identity to store in the session, if the backend returned a user.
    pub fn into_identity(self) -> Option<SessionIdentity> {
        let data = self.data?;
        let user = data.user?;
        let name = user.full_name.or(user.name).unwrap_or_default();
        Some(SessionIdentity {
            user_id: user.id,
            email: user.email,
            name,
            image: user.image,
            access_token: data.access_token,
            refresh_token: data.refresh_token,
        })
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Credential exchange with the backend. Calls never carry a bearer token.
pub struct AuthService<S, N> {
    client: ApiClient<S, N>,
}

impl<S, N> AuthService<S, N>
where
    S: SessionSource,
    N: Navigator,
{
    pub fn new(client: ApiClient<S, N>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient<S, N> {
        &self.client
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignInResponse, ClientError> {
        self.client
            .post(SIGN_IN_ENDPOINT, credentials, RequestOptions::without_token())
            .await
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<serde_json::Value, ClientError> {
        self.client
            .post(SIGN_UP_ENDPOINT, request, RequestOptions::without_token())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_prefers_full_name() {
        let response: SignInResponse = serde_json::from_value(serde_json::json!({
            "data": {
                "user": {
                    "id": 12,
                    "email": "c@example.com",
                    "fullName": "Carol C",
                    "name": "carol"
                },
                "accessToken": "at",
                "refreshToken": "rt"
            }
        }))
        .unwrap();

        let identity = response.into_identity().unwrap();
        assert_eq!(identity.user_id, "12");
        assert_eq!(identity.name, "Carol C");
        assert_eq!(identity.access_token.as_deref(), Some("at"));
        assert_eq!(identity.refresh_token.as_deref(), Some("rt"));
    }

    #[test]
    fn test_identity_falls_back_to_name() {
        let response: SignInResponse = serde_json::from_value(serde_json::json!({
            "data": {"user": {"id": "u-1", "email": "d@example.com", "name": "Dee"}}
        }))
        .unwrap();

        let identity = response.into_identity().unwrap();
        assert_eq!(identity.user_id, "u-1");
        assert_eq!(identity.name, "Dee");
        assert_eq!(identity.access_token, None);
    }

    #[test]
    fn test_identity_requires_user() {
        let empty: SignInResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let no_user: SignInResponse =
            serde_json::from_value(serde_json::json!({"data": {"accessToken": "x"}})).unwrap();

        assert!(empty.into_identity().is_none());
        assert!(no_user.into_identity().is_none());
    }

    #[test]
    fn test_sign_up_request_uses_camel_case() {
        let json = serde_json::to_value(SignUpRequest {
            email: "e@example.com".into(),
            password: "hunter22".into(),
            full_name: "Eve".into(),
        })
        .unwrap();

        assert_eq!(json["fullName"], "Eve");
        assert!(json.get("full_name").is_none());
    }
}
