//! Seam for generative image sources.
//!
//! No HTTP client ships with the crate. A provider implementation performs the request and hands
//! the status code and body to [`classify_generate_response`].

use base64::{Engine as _, engine::general_purpose};

use crate::foundation::error::{IconStackError, IconStackResult};

/// Turns a text prompt into encoded image bytes.
pub trait ImageSourceProvider: Send + Sync {
    /// Generate an image for `prompt`. Timeouts and transport failures are
    /// [`IconStackError::ProviderFailure`].
    fn generate(&self, prompt: &str) -> IconStackResult<Vec<u8>>;
}

/// Map a `generateContent` reply to image bytes.
///
/// The image is expected at `candidates[0].content.parts[0].inlineData.data`, base64-encoded.
pub fn classify_generate_response(status: u16, body: &str) -> IconStackResult<Vec<u8>> {
    if status != 200 {
        return Err(IconStackError::provider_failure(format!(
            "status {status}: {}",
            truncate(body, 200)
        )));
    }

    let reply: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| IconStackError::provider_failure(format!("malformed reply: {e}")))?;
    let part = reply
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .ok_or_else(|| {
            IconStackError::provider_failure("malformed reply: no candidates[0].content.parts[0]")
        })?;

    let Some(inline) = part.get("inlineData") else {
        let text = part.get("text").and_then(|t| t.as_str()).unwrap_or("");
        return Err(IconStackError::provider_failure(format!(
            "text-only reply: {}",
            truncate(text, 200)
        )));
    };
    let data = inline.get("data").and_then(|d| d.as_str()).ok_or_else(|| {
        IconStackError::provider_failure("malformed reply: inlineData has no data string")
    })?;

    general_purpose::STANDARD
        .decode(data)
        .map_err(|e| IconStackError::provider_failure(format!("invalid base64 image data: {e}")))
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_owned(),
    }
}

#[cfg(test)]
#[path = "../tests/unit/provider/provider.rs"]
mod tests;
