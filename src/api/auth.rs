//! Token refresh payloads.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub access_token: String,
}

/// `/auth/refresh` answers either with a bare token object or the usual envelope.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RefreshResponse {
    Enveloped { success: bool, data: TokenPayload },
    Bare(TokenPayload),
}

impl RefreshResponse {
    pub fn into_token(self) -> Option<String> {
        match self {
            Self::Enveloped { success: true, data } | Self::Bare(data) => Some(data.access_token),
            Self::Enveloped { success: false, .. } => None,
        }
    }
}
