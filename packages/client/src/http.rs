//! Response decoding shared by the crime backend endpoints.

use serde::de::DeserializeOwned;

use crate::NetworkError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Checks the status of `response` and decodes its body as JSON.
///
/// Any non-2xx status is a failure; the status text is not inspected.
pub async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, NetworkError> {
    let url = response.url().to_string();
    let status = response.status();

    if !status.is_success() {
        log::error!("HTTP {status} from {url}");
        return Err(NetworkError::Status {
            status: status.as_u16(),
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        log::error!(
            "JSON parse failed.\n  \
             url: {url}\n  \
             received: {} bytes\n  \
             parse error: {e}\n  \
             body preview: {}",
            text.len(),
            preview(&text),
        );
        NetworkError::Decode(e)
    })
}

fn preview(text: &str) -> &str {
    if text.len() <= BODY_PREVIEW_LEN {
        return text;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
