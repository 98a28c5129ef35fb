// src/notify/apns.rs

//! Apple Push Notification service transport.
//!
//! One alert per call, sent over HTTP/2 with a freshly signed provider token.
//! Only `200 OK` counts as delivered.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Notification, NotifierConfig};
use crate::notify::{Notifier, TokenSigner};
use crate::utils::truncate_graphemes;

pub const PRODUCTION_HOST: &str = "https://api.push.apple.com";
pub const SANDBOX_HOST: &str = "https://api.sandbox.push.apple.com";

/// APNs rejects payloads above 4 KiB.
const MAX_PAYLOAD_BYTES: usize = 4096;

/// Environment variable names for the credential set.
pub mod env {
    pub const KEY_P8: &str = "APNS_KEY_P8";
    pub const KEY_ID: &str = "APNS_KEY_ID";
    pub const TEAM_ID: &str = "APNS_TEAM_ID";
    pub const BUNDLE_ID: &str = "BUNDLE_ID";
    pub const DEVICE_TOKEN: &str = "DEVICE_TOKEN";
    pub const SANDBOX: &str = "APNS_SANDBOX";

    pub const REQUIRED: [&str; 5] = [KEY_P8, KEY_ID, TEAM_ID, BUNDLE_ID, DEVICE_TOKEN];
}

/// APNs credentials and target.
#[derive(Clone)]
pub struct ApnsConfig {
    /// Contents of the `.p8` signing key (PEM)
    pub key_p8: String,
    /// 10-character key identifier
    pub key_id: String,
    /// Developer team identifier, the token issuer
    pub team_id: String,
    /// App bundle identifier, sent as the topic
    pub bundle_id: String,
    /// Target device token (hex)
    pub device_token: String,
    /// Use the development endpoint
    pub sandbox: bool,
}

impl std::fmt::Debug for ApnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApnsConfig")
            .field("key_p8", &"<redacted>")
            .field("key_id", &self.key_id)
            .field("team_id", &self.team_id)
            .field("bundle_id", &self.bundle_id)
            .field("device_token", &self.device_token)
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

impl ApnsConfig {
    /// Read the credential set from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the credential set through `lookup`.
    ///
    /// Every variable except the sandbox flag is required and must be non-empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::config(format!("missing environment variable {name}")))
        };

        Ok(Self {
            key_p8: required(env::KEY_P8)?,
            key_id: required(env::KEY_ID)?,
            team_id: required(env::TEAM_ID)?,
            bundle_id: required(env::BUNDLE_ID)?,
            device_token: required(env::DEVICE_TOKEN)?,
            sandbox: lookup(env::SANDBOX)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    /// Endpoint host for the selected environment.
    pub fn host(&self) -> &'static str {
        if self.sandbox { SANDBOX_HOST } else { PRODUCTION_HOST }
    }
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    aps: Aps<'a>,
}

#[derive(Debug, Serialize)]
struct Aps<'a> {
    alert: Alert<'a>,
    sound: &'a str,
}

#[derive(Debug, Serialize)]
struct Alert<'a> {
    title: &'a str,
    body: &'a str,
}

/// Delivers alerts to a single device through APNs.
#[derive(Debug)]
pub struct ApnsNotifier {
    client: Client,
    signer: TokenSigner,
    host: String,
    topic: String,
    device_token: String,
    sound: String,
}

impl ApnsNotifier {
    /// Create a notifier. Fails if the signing key cannot be loaded.
    pub fn new(apns: &ApnsConfig, config: &NotifierConfig) -> Result<Self> {
        let signer = TokenSigner::from_pem(&apns.key_p8, &apns.key_id, &apns.team_id)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            signer,
            host: apns.host().to_string(),
            topic: apns.bundle_id.clone(),
            device_token: apns.device_token.clone(),
            sound: config.sound.clone(),
        })
    }

    /// Send to a different base URL instead of the Apple endpoint.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Full request URL for the configured device.
    pub fn endpoint(&self) -> String {
        format!("{}/3/device/{}", self.host, self.device_token)
    }

    /// Serialize the alert payload, shortening the body if the payload would
    /// exceed the APNs size limit.
    fn payload(&self, notification: &Notification) -> Result<Vec<u8>> {
        let encode = |body: &str| {
            serde_json::to_vec(&Payload {
                aps: Aps {
                    alert: Alert {
                        title: &notification.title,
                        body,
                    },
                    sound: &self.sound,
                },
            })
        };

        let bytes = encode(notification.body.as_str())?;
        if bytes.len() <= MAX_PAYLOAD_BYTES {
            return Ok(bytes);
        }

        let overflow = bytes.len() - MAX_PAYLOAD_BYTES;
        // JSON escaping can make the body grow, so the cut is retried a few times.
        let mut limit = notification.body.len().saturating_sub(overflow);
        for _ in 0..4 {
            let body = truncate_graphemes(&notification.body, limit);
            let bytes = encode(body.as_str())?;
            if bytes.len() <= MAX_PAYLOAD_BYTES {
                log::warn!(
                    "Notification body cut from {} to {} bytes to fit the payload limit",
                    notification.body.len(),
                    body.len()
                );
                return Ok(bytes);
            }
            limit = limit.saturating_sub(bytes.len() - MAX_PAYLOAD_BYTES);
        }

        Err(AppError::delivery(
            None,
            format!("payload exceeds {MAX_PAYLOAD_BYTES} bytes"),
        ))
    }
}

#[async_trait]
impl Notifier for ApnsNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let token = self.signer.sign_now()?;
        let payload = self.payload(notification)?;
        let url = self.endpoint();

        log::debug!("Sending APNs alert to {}", url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("bearer {token}"))
            .header("apns-topic", &self.topic)
            .header("apns-push-type", "alert")
            .header("apns-priority", "10")
            .header("content-type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| AppError::delivery(None, e))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<unreadable body: {e}>"),
            };
            return Err(AppError::delivery(Some(status), body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::jwt::tests::test_key;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env(pem: &str) -> HashMap<String, String> {
        vars(&[
            (env::KEY_P8, pem),
            (env::KEY_ID, "ABC123DEFG"),
            (env::TEAM_ID, "TEAM123456"),
            (env::BUNDLE_ID, "cat.castells.horaahora"),
            (env::DEVICE_TOKEN, "a1b2c3"),
        ])
    }

    fn notifier() -> ApnsNotifier {
        let (pem, _) = test_key();
        let map = full_env(&pem);
        let apns = ApnsConfig::from_lookup(|k| map.get(k).cloned()).unwrap();
        ApnsNotifier::new(&apns, &NotifierConfig::default()).unwrap()
    }

    #[test]
    fn test_from_lookup_reads_all_values() {
        let map = full_env("pem");
        let apns = ApnsConfig::from_lookup(|k| map.get(k).cloned()).unwrap();

        assert_eq!(apns.key_id, "ABC123DEFG");
        assert_eq!(apns.team_id, "TEAM123456");
        assert_eq!(apns.bundle_id, "cat.castells.horaahora");
        assert_eq!(apns.device_token, "a1b2c3");
        assert!(!apns.sandbox);
        assert_eq!(apns.host(), PRODUCTION_HOST);
    }

    #[test]
    fn test_each_required_variable_is_enforced() {
        for missing in env::REQUIRED {
            let mut map = full_env("pem");
            map.remove(missing);
            let err = ApnsConfig::from_lookup(|k| map.get(k).cloned()).unwrap_err();
            assert!(matches!(err, AppError::Config(_)));
            assert!(err.to_string().contains(missing));
        }
    }

    #[test]
    fn test_empty_required_variable_is_missing() {
        let mut map = full_env("pem");
        map.insert(env::DEVICE_TOKEN.to_string(), "  ".to_string());
        assert!(ApnsConfig::from_lookup(|k| map.get(k).cloned()).is_err());
    }

    #[test]
    fn test_sandbox_flag() {
        for (value, expected) in [("true", true), ("TRUE", true), ("1", false), ("no", false)] {
            let mut map = full_env("pem");
            map.insert(env::SANDBOX.to_string(), value.to_string());
            let apns = ApnsConfig::from_lookup(|k| map.get(k).cloned()).unwrap();
            assert_eq!(apns.sandbox, expected, "APNS_SANDBOX={value}");
        }

        let mut map = full_env("pem");
        map.insert(env::SANDBOX.to_string(), "true".to_string());
        let apns = ApnsConfig::from_lookup(|k| map.get(k).cloned()).unwrap();
        assert_eq!(apns.host(), SANDBOX_HOST);
    }

    #[test]
    fn test_debug_redacts_key() {
        let map = full_env("SECRET-KEY-MATERIAL");
        let apns = ApnsConfig::from_lookup(|k| map.get(k).cloned()).unwrap();
        assert!(!format!("{apns:?}").contains("SECRET-KEY-MATERIAL"));
    }

    #[test]
    fn test_invalid_key_fails_construction() {
        let map = full_env("not a key");
        let apns = ApnsConfig::from_lookup(|k| map.get(k).cloned()).unwrap();
        assert!(matches!(
            ApnsNotifier::new(&apns, &NotifierConfig::default()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let n = notifier();
        assert_eq!(n.endpoint(), "https://api.push.apple.com/3/device/a1b2c3");

        let n = n.with_host("http://127.0.0.1:9999/");
        assert_eq!(n.endpoint(), "http://127.0.0.1:9999/3/device/a1b2c3");
    }

    #[test]
    fn test_payload_shape() {
        let n = notifier();
        let bytes = n
            .payload(&Notification::new("La Nit de Castells", "Divendres 30, 11h. Entrada lliure"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "aps": {
                    "alert": {
                        "title": "La Nit de Castells",
                        "body": "Divendres 30, 11h. Entrada lliure"
                    },
                    "sound": "default"
                }
            })
        );
    }

    #[test]
    fn test_oversized_body_is_cut_to_limit() {
        let n = notifier();
        let long_body = "Plaça de Sant Jaume ".repeat(400);
        let bytes = n
            .payload(&Notification::new("La Nit de Castells", long_body.clone()))
            .unwrap();
        assert!(bytes.len() <= MAX_PAYLOAD_BYTES);

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let body = value["aps"]["alert"]["body"].as_str().unwrap();
        assert!(body.ends_with('…'));
        assert!(long_body.starts_with(body.trim_end_matches('…')));
    }
}
