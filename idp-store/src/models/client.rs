//! OAuth2/OIDC client (relying party) model.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// OAuth2 grant types a client may be allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    ClientCredentials,
    Implicit,
    Hybrid,
    Password,
    RefreshToken,
    DeviceCode,
}

impl GrantType {
    /// Wire/database representation, using the standard OAuth names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::ClientCredentials => "client_credentials",
            Self::Implicit => "implicit",
            Self::Hybrid => "hybrid",
            Self::Password => "password",
            Self::RefreshToken => "refresh_token",
            Self::DeviceCode => "urn:ietf:params:oauth:grant-type:device_code",
        }
    }
}

impl std::fmt::Display for GrantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GrantType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authorization_code" => Ok(Self::AuthorizationCode),
            "client_credentials" => Ok(Self::ClientCredentials),
            "implicit" => Ok(Self::Implicit),
            "hybrid" => Ok(Self::Hybrid),
            "password" => Ok(Self::Password),
            "refresh_token" => Ok(Self::RefreshToken),
            "urn:ietf:params:oauth:grant-type:device_code" => Ok(Self::DeviceCode),
            _ => Err(format!("Invalid grant type: {}", s)),
        }
    }
}

/// A hashed client credential. Only the SHA-256/base64 digest is ever
/// stored; plaintext secrets exist only in deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
    pub value: String,
}

impl ClientSecret {
    /// Hash a plaintext secret (SHA-256, base64-encoded digest).
    pub fn from_plain(plain: &str) -> Self {
        let digest = Sha256::digest(plain.as_bytes());
        Self {
            value: BASE64.encode(digest),
        }
    }

    /// Wrap an already-hashed value as read back from the store.
    pub fn from_hash(value: String) -> Self {
        Self { value }
    }
}

/// A registered OAuth2/OIDC relying party.
///
/// `allowed_scopes` holds soft references to [`super::IdentityResource`]
/// and [`super::ApiScope`] names; referential integrity is not enforced
/// at seed time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    pub display_name: String,
    pub grant_types: Vec<GrantType>,
    pub allowed_scopes: Vec<String>,
    pub redirect_uris: Vec<String>,
    pub secrets: Vec<ClientSecret>,
    pub require_pkce: bool,
    pub allow_offline_access: bool,
}
