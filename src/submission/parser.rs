use axum::http::HeaderMap;
use serde_json::{Map, Value};

/// Parse a request body based on the Content-Type header. An empty body is
/// an empty object whatever the content type claims.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, String> {
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let Some(ct) = content_type else {
        return parse_untyped(body);
    };

    if ct.contains("application/json") {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else if ct.contains("multipart/form-data") {
        Err("multipart".to_string())
    } else {
        parse_untyped(body)
    }
}

/// No usable Content-Type: try JSON first, then form-urlencoded.
fn parse_untyped(body: &[u8]) -> Result<Value, String> {
    serde_json::from_slice(body)
        .or_else(|_| parse_form_urlencoded(body))
        .map_err(|e| format!("Unable to parse body: {e}"))
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let mut map = Map::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        map.insert(k.into_owned(), Value::String(v.into_owned()));
    }
    Ok(Value::Object(map))
}

/// Collect the text parts of a multipart form. File uploads are not form
/// fields here and are skipped.
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<Value, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let parts = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut form = multer::Multipart::new(parts, boundary);

    let mut fields = Map::new();
    while let Some(part) = form
        .next_field()
        .await
        .map_err(|e| format!("Malformed multipart body: {e}"))?
    {
        if part.file_name().is_some() {
            continue;
        }
        let Some(name) = part.name().map(str::to_owned) else {
            continue;
        };
        let text = part
            .text()
            .await
            .map_err(|e| format!("Unreadable multipart field '{name}': {e}"))?;
        fields.insert(name, Value::String(text));
    }

    Ok(Value::Object(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencoded_fields_become_strings() {
        let v = parse_body(
            Some("application/x-www-form-urlencoded"),
            b"name=Alice+Smith&email=a%40x.com",
        )
        .unwrap();
        assert_eq!(v["name"], "Alice Smith");
        assert_eq!(v["email"], "a@x.com");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(parse_body(Some("application/json"), b"{not json").is_err());
    }

    #[test]
    fn empty_body_is_empty_object() {
        for ct in [None, Some("application/json"), Some("text/plain")] {
            let v = parse_body(ct, b"").unwrap();
            assert_eq!(v, Value::Object(Map::new()), "{ct:?}");
        }
    }

    #[tokio::test]
    async fn multipart_text_parts_are_collected() {
        let body = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"name\"\r\n\r\n\
            Gil\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\r\n\
            ignored\r\n\
            --XyZ--\r\n";
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "multipart/form-data; boundary=XyZ".parse().unwrap());

        let v = parse_multipart(&headers, bytes::Bytes::from(body)).await.unwrap();
        assert_eq!(v["name"], "Gil");
        assert!(v.get("upload").is_none());
    }
}
