use serde::{Deserialize, Serialize};

use crate::errors::{Result, ViewerError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Extracts the audio URL from a voice backend response.
pub fn parse_voice_response(ok: bool, status: u16, body: &[u8]) -> Result<String> {
    if !ok {
        return Err(ViewerError::HttpResponseError { status });
    }
    let reply: VoiceReply = serde_json::from_slice(body)?;
    match reply.audio_url {
        Some(url) if reply.success && !url.is_empty() => Ok(url),
        _ => Err(ViewerError::Backend("Voice synthesis failed".to_string())),
    }
}

#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct VoiceClient {
    endpoint: String,
}

#[cfg(feature = "http")]
impl VoiceClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint)?;
        Ok(Self { endpoint })
    }

    /// Returns the URL of the synthesized audio.
    pub async fn synthesize(&self, text: &str) -> Result<String> {
        let body = serde_json::to_value(VoiceRequest { text: text.to_string() })?;
        let response = super::post_json(&self.endpoint, &body).await?;
        parse_voice_response(response.ok, response.status, &response.bytes)
    }
}
