//! Host frame boundary
//!
//! Auth, cast sharing, and the simulated mint live behind this module. All
//! three are opaque host capabilities: gameplay never blocks on any of them,
//! and a failure here is logged and absorbed locally, never surfaced by the
//! simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::HIT_SCORE;

/// Identity returned by the auth endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub fid: u64,
    #[serde(default)]
    pub issued_at: Option<f64>,
    #[serde(default)]
    pub expires_at: Option<f64>,
}

/// Response envelope from `/api/auth`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pick the name used in the start-screen greeting.
///
/// The frame context display name wins; an authenticated fid is the
/// fallback; `None` means the UI greets "there".
pub fn greeting_name(display_name: Option<&str>, auth: Option<&AuthResponse>) -> Option<String> {
    if let Some(name) = display_name {
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    auth.filter(|a| a.success)
        .and_then(|a| a.user.as_ref())
        .map(|u| format!("fid #{}", u.fid))
}

/// Greeting line for the start screen
pub fn greeting(name: Option<&str>) -> String {
    format!(
        "Hey {}, ready to test your reflexes?",
        name.unwrap_or("there")
    )
}

/// Cast text summarizing a finished session
pub fn share_text(score: u32) -> String {
    format!(
        "I smashed {} flies in 60 seconds and scored {} points in Fly Smasher! 🪰",
        score / HIT_SCORE,
        score
    )
}

/// Pseudo transaction id for the simulated mint: "0x" + 64 hex chars
pub fn fake_tx_hash(rng: &mut impl Rng) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(66);
    out.push_str("0x");
    for _ in 0..32 {
        let byte: u8 = rng.random();
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(target_arch = "wasm32")]
mod host {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::Response;

    use super::AuthResponse;

    #[wasm_bindgen(inline_js = "
        export function frame_display_name() {
            return globalThis.miniapp?.context?.user?.displayName ?? null;
        }
        export function compose_cast(text) {
            const sdk = globalThis.miniapp?.sdk;
            if (sdk?.actions?.composeCast) {
                sdk.actions.composeCast({ text });
            }
        }
        export function sleep_ms(ms) {
            return new Promise((resolve) => setTimeout(resolve, ms));
        }
    ")]
    extern "C" {
        fn frame_display_name() -> Option<String>;
        fn compose_cast(text: &str);
        fn sleep_ms(ms: f64) -> js_sys::Promise;
    }

    /// Display name from the embedding frame context, if any
    pub fn display_name() -> Option<String> {
        frame_display_name()
    }

    /// Fetch the auth envelope.
    ///
    /// Gameplay never waits on this; the caller only uses the result to
    /// personalize the greeting.
    pub async fn fetch_auth() -> Result<AuthResponse, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let resp: Response = JsFuture::from(window.fetch_with_str("/api/auth"))
            .await?
            .dyn_into()?;
        let text = JsFuture::from(resp.text()?).await?;
        let text = text.as_string().unwrap_or_default();
        serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Share a cast through the host SDK. Fire-and-forget.
    pub fn share_cast(text: &str) {
        compose_cast(text);
        log::info!("cast composed ({} chars)", text.len());
    }

    /// Simulated mint: fixed confirmation delay, then a pseudo tx id.
    pub async fn mint(option_ids: &[u32]) -> Result<String, JsValue> {
        use rand::SeedableRng;

        log::info!("minting with options {:?}", option_ids);
        JsFuture::from(sleep_ms(crate::consts::MINT_DELAY_MS)).await?;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(js_sys::Date::now() as u64);
        let tx = super::fake_tx_hash(&mut rng);
        log::info!("mint confirmed: {}", tx);
        Ok(tx)
    }
}

#[cfg(target_arch = "wasm32")]
pub use host::{display_name, fetch_auth, mint, share_cast};

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn display_name() -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn share_cast(text: &str) {
    log::info!("cast (native no-op): {}", text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_greeting_falls_back_to_there() {
        assert_eq!(greeting(None), "Hey there, ready to test your reflexes?");
        assert_eq!(
            greeting(Some("alice")),
            "Hey alice, ready to test your reflexes?"
        );
    }

    #[test]
    fn test_greeting_name_prefers_display_name() {
        let auth = AuthResponse {
            success: true,
            user: Some(AuthUser {
                fid: 123,
                issued_at: None,
                expires_at: None,
            }),
            message: None,
        };
        assert_eq!(
            greeting_name(Some("alice"), Some(&auth)).as_deref(),
            Some("alice")
        );
        assert_eq!(
            greeting_name(None, Some(&auth)).as_deref(),
            Some("fid #123")
        );
        assert_eq!(greeting_name(Some(""), None), None);
    }

    #[test]
    fn test_greeting_name_ignores_failed_auth() {
        let auth = AuthResponse {
            success: false,
            user: Some(AuthUser {
                fid: 123,
                issued_at: None,
                expires_at: None,
            }),
            message: Some("expired".into()),
        };
        assert_eq!(greeting_name(None, Some(&auth)), None);
    }

    #[test]
    fn test_share_text_counts_flies_from_score() {
        let text = share_text(40);
        assert!(text.contains("4 flies"));
        assert!(text.contains("40 points"));
    }

    #[test]
    fn test_auth_response_parses_camel_case() {
        let json = r#"{
            "success": true,
            "user": { "fid": 8152, "issuedAt": 1700000000, "expiresAt": 1700003600 }
        }"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert!(auth.success);
        let user = auth.user.unwrap();
        assert_eq!(user.fid, 8152);
        assert_eq!(user.issued_at, Some(1_700_000_000.0));
        assert!(auth.message.is_none());
    }

    #[test]
    fn test_auth_response_tolerates_missing_user() {
        let json = r#"{ "success": false, "message": "unauthorized" }"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert!(!auth.success);
        assert!(auth.user.is_none());
        assert_eq!(auth.message.as_deref(), Some("unauthorized"));
    }

    #[test]
    fn test_fake_tx_hash_shape() {
        let mut rng = Pcg32::seed_from_u64(99);
        let tx = fake_tx_hash(&mut rng);
        assert_eq!(tx.len(), 66);
        assert!(tx.starts_with("0x"));
        assert!(tx[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
