use crate::entities::AuthProvider;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const FACEBOOK_ME_URL: &str = "https://graph.facebook.com/me";

// Identity-provider calls must never block a request indefinitely.
const PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Provider-independent identity shape. Both provider payloads are
/// normalized into this at the boundary so nothing downstream branches
/// on the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub external_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacebookUserInfo {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<FacebookPicture>,
}

#[derive(Debug, Deserialize)]
struct FacebookPicture {
    data: Option<FacebookPictureData>,
}

#[derive(Debug, Deserialize)]
struct FacebookPictureData {
    url: Option<String>,
}

impl TryFrom<GoogleUserInfo> for OAuthProfile {
    type Error = AppError;

    fn try_from(info: GoogleUserInfo) -> Result<Self, Self::Error> {
        // A profile without an email cannot be matched to a local account.
        let email = info.email.filter(|e| !e.is_empty()).ok_or(AppError::InvalidOAuthToken)?;
        Ok(Self {
            external_id: info.id,
            email,
            display_name: info.name,
            avatar_url: info.picture,
        })
    }
}

impl TryFrom<FacebookUserInfo> for OAuthProfile {
    type Error = AppError;

    fn try_from(info: FacebookUserInfo) -> Result<Self, Self::Error> {
        let email = info.email.filter(|e| !e.is_empty()).ok_or(AppError::InvalidOAuthToken)?;
        Ok(Self {
            external_id: info.id,
            email,
            display_name: info.name,
            avatar_url: info.picture.and_then(|p| p.data).and_then(|d| d.url),
        })
    }
}

#[derive(Clone)]
pub struct OAuthClient {
    http: Client,
}

impl Default for OAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuthClient {
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent("queue-backend/oauth")
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .expect("reqwest client");
        Self { http }
    }

    /// Exchanges a caller-supplied provider access token for a normalized
    /// profile. Every failure mode (network, timeout, non-2xx, unusable
    /// body) funnels into `InvalidOAuthToken`.
    pub async fn fetch_profile(
        &self,
        provider: AuthProvider,
        access_token: &str,
    ) -> AppResult<OAuthProfile> {
        match provider {
            AuthProvider::Google => self.fetch_google_profile(access_token).await,
            AuthProvider::Facebook => self.fetch_facebook_profile(access_token).await,
            AuthProvider::Email => Err(AppError::UnsupportedProvider(provider.to_string())),
        }
    }

    async fn fetch_google_profile(&self, access_token: &str) -> AppResult<OAuthProfile> {
        let response = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                log::warn!("Google userinfo request failed: {e}");
                AppError::InvalidOAuthToken
            })?;

        if !response.status().is_success() {
            log::warn!("Google userinfo returned HTTP {}", response.status());
            return Err(AppError::InvalidOAuthToken);
        }

        let info: GoogleUserInfo = response.json().await.map_err(|e| {
            log::warn!("Google userinfo body unparseable: {e}");
            AppError::InvalidOAuthToken
        })?;

        info.try_into()
    }

    async fn fetch_facebook_profile(&self, access_token: &str) -> AppResult<OAuthProfile> {
        let response = self
            .http
            .get(FACEBOOK_ME_URL)
            .query(&[
                ("access_token", access_token),
                ("fields", "id,name,email,picture"),
            ])
            .send()
            .await
            .map_err(|e| {
                log::warn!("Facebook graph request failed: {e}");
                AppError::InvalidOAuthToken
            })?;

        if !response.status().is_success() {
            log::warn!("Facebook graph returned HTTP {}", response.status());
            return Err(AppError::InvalidOAuthToken);
        }

        let info: FacebookUserInfo = response.json().await.map_err(|e| {
            log::warn!("Facebook graph body unparseable: {e}");
            AppError::InvalidOAuthToken
        })?;

        info.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_google_payload() {
        let info: GoogleUserInfo = serde_json::from_str(
            r#"{"id": "108", "email": "g@example.com", "verified_email": true,
                "name": "G User", "picture": "https://lh3.example/photo.jpg"}"#,
        )
        .unwrap();

        let profile = OAuthProfile::try_from(info).unwrap();
        assert_eq!(profile.external_id, "108");
        assert_eq!(profile.email, "g@example.com");
        assert_eq!(profile.display_name.as_deref(), Some("G User"));
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://lh3.example/photo.jpg")
        );
    }

    #[test]
    fn test_normalize_facebook_payload() {
        let info: FacebookUserInfo = serde_json::from_str(
            r#"{"id": "42", "name": "F User", "email": "f@example.com",
                "picture": {"data": {"url": "https://graph.example/pic.png", "width": 50}}}"#,
        )
        .unwrap();

        let profile = OAuthProfile::try_from(info).unwrap();
        assert_eq!(profile.external_id, "42");
        assert_eq!(profile.email, "f@example.com");
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://graph.example/pic.png")
        );
    }

    #[test]
    fn test_profile_without_email_is_unusable() {
        let info: GoogleUserInfo = serde_json::from_str(r#"{"id": "108"}"#).unwrap();
        assert!(matches!(
            OAuthProfile::try_from(info),
            Err(AppError::InvalidOAuthToken)
        ));

        let info: FacebookUserInfo =
            serde_json::from_str(r#"{"id": "42", "email": ""}"#).unwrap();
        assert!(matches!(
            OAuthProfile::try_from(info),
            Err(AppError::InvalidOAuthToken)
        ));
    }
}
