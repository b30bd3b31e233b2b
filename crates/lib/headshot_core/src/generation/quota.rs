//! Result shaping: payload normalisation and quota fitting.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::model::{GeneratedImage, ModelError};

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Pad by round-robin duplication, or truncate, to exactly `quota` entries.
/// An empty input stays empty.
pub fn fit_to_quota<T: Clone>(items: Vec<T>, quota: usize) -> Vec<T> {
    if items.is_empty() {
        return items;
    }
    items.iter().cycle().take(quota).cloned().collect()
}

/// Turn a model payload into a `data:image/...;base64,` URI.
///
/// Data URIs pass through when their body decodes. Bare bodies must be
/// well-formed base64.
pub fn normalize_image_payload(image: &GeneratedImage) -> Result<String, ModelError> {
    let data = image.data.trim();
    if let Some(rest) = data.strip_prefix("data:") {
        let (header, body) = rest
            .split_once(',')
            .ok_or_else(|| ModelError::InvalidPayload("data URI without body".into()))?;
        if !header.starts_with("image/") || !header.ends_with(";base64") {
            return Err(ModelError::InvalidPayload(format!(
                "unsupported data URI header {header:?}"
            )));
        }
        decode_body(body)?;
        return Ok(data.to_string());
    }

    let body: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    decode_body(&body)?;
    let mime = image
        .mime_type
        .as_deref()
        .filter(|m| m.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_MIME);
    Ok(format!("data:{mime};base64,{body}"))
}

fn decode_body(body: &str) -> Result<(), ModelError> {
    let bytes = BASE64
        .decode(body)
        .map_err(|e| ModelError::InvalidPayload(e.to_string()))?;
    if bytes.is_empty() {
        return Err(ModelError::InvalidPayload("empty image body".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(data: &str, mime: Option<&str>) -> GeneratedImage {
        GeneratedImage {
            data: data.into(),
            mime_type: mime.map(String::from),
        }
    }

    #[test]
    fn pads_round_robin() {
        let fitted = fit_to_quota(vec!["a", "b", "c", "d"], 6);
        assert_eq!(fitted, vec!["a", "b", "c", "d", "a", "b"]);
    }

    #[test]
    fn truncates_to_quota() {
        assert_eq!(fit_to_quota(vec![1, 2, 3, 4, 5], 2), vec![1, 2]);
    }

    #[test]
    fn empty_stays_empty() {
        assert!(fit_to_quota(Vec::<String>::new(), 4).is_empty());
    }

    #[test]
    fn bare_base64_becomes_data_uri() {
        let uri = normalize_image_payload(&payload("aGVs\nbG8=", None)).unwrap();
        assert_eq!(uri, "data:image/jpeg;base64,aGVsbG8=");
        let uri = normalize_image_payload(&payload("aGVsbG8=", Some("image/png"))).unwrap();
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn data_uri_passes_through() {
        let uri = "data:image/webp;base64,aGVsbG8=";
        assert_eq!(normalize_image_payload(&payload(uri, None)).unwrap(), uri);
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_image_payload(&payload("not base64!!", None)).is_err());
        assert!(normalize_image_payload(&payload("", None)).is_err());
        assert!(normalize_image_payload(&payload("data:text/plain;base64,aGk=", None)).is_err());
    }
}
