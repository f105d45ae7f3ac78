//! Personal Access Token handling for Azure DevOps
//!
//! Azure DevOps authenticates REST calls with HTTP Basic auth where the username is
//! empty and the PAT is the password. Everything here treats the token as a secret:
//! [`Credential`] never prints it, and [`scrub_secret`] masks it (and its base64 forms)
//! in arbitrary diagnostic text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Placeholder substituted for a raw token
pub const MASKED_PAT: &str = "***PAT***";

/// Placeholder substituted for a base64-encoded token
pub const MASKED_ENCODED_PAT: &str = "***ENCODED_PAT***";

/// An opaque Personal Access Token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Build a credential from an optional raw value, treating blank values as absent
    pub fn from_optional(token: Option<String>) -> Option<Self> {
        token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Self)
    }

    /// The raw token. Callers must not log the returned value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value for this credential
    pub fn auth_header(&self) -> String {
        build_auth_header(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Create the Basic auth header value: `"Basic " + base64(":" + token)`
pub fn build_auth_header(token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!(":{token}")))
}

/// Mask `token` in `text`.
///
/// The raw token is replaced by [`MASKED_PAT`]; both `base64(":" + token)` and
/// `base64(token)` are replaced by [`MASKED_ENCODED_PAT`]. If those placeholders
/// would reintroduce the token (e.g. the token is `PAT` or `*`), every match is
/// replaced by a run of a character that occurs in none of the secret forms instead.
/// Returns `text` unchanged when either argument is empty.
pub fn scrub_secret(text: &str, token: &str) -> String {
    if text.is_empty() || token.is_empty() {
        return text.to_string();
    }

    let encoded_with_colon = STANDARD.encode(format!(":{token}"));
    let encoded_plain = STANDARD.encode(token);
    let secrets = [token, encoded_with_colon.as_str(), encoded_plain.as_str()];

    let masked = mask_all(text, &secrets, MASKED_PAT, MASKED_ENCODED_PAT);
    if !secrets.iter().any(|secret| masked.contains(secret)) {
        return masked;
    }

    // A mask sharing no character with any secret cannot create a new match
    let fill = fallback_mask_char(&secrets);
    let raw_mask = fill.to_string().repeat(MASKED_PAT.len());
    let encoded_mask = fill.to_string().repeat(MASKED_ENCODED_PAT.len());
    mask_all(text, &secrets, &raw_mask, &encoded_mask)
}

/// `secrets` is `[raw, base64(":" + raw), base64(raw)]`
fn mask_all(text: &str, secrets: &[&str; 3], raw_mask: &str, encoded_mask: &str) -> String {
    let [raw, encoded_with_colon, encoded_plain] = *secrets;
    text.replace(raw, raw_mask)
        .replace(encoded_with_colon, encoded_mask)
        .replace(encoded_plain, encoded_mask)
}

fn fallback_mask_char(secrets: &[&str]) -> char {
    ['*', '#', '~', '%', '?']
        .into_iter()
        .chain('\u{2588}'..=char::MAX)
        .find(|c| !secrets.iter().any(|secret| secret.contains(*c)))
        .unwrap_or('\u{2588}')
}
