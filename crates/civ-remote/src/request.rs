use civ_core::PayloadShape;

/// Raw text of one document, bound for the lint endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationRequest {
    content: String,
}

/// Body bytes plus the content type that describes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(serde::Serialize)]
struct JsonEnvelope<'a> {
    content: &'a str,
}

impl ValidationRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn encode(&self, shape: PayloadShape) -> EncodedBody {
        match shape {
            PayloadShape::Json => EncodedBody {
                content_type: "application/json",
                // A struct holding one &str always serializes.
                bytes: serde_json::to_vec(&JsonEnvelope {
                    content: &self.content,
                })
                .unwrap_or_default(),
            },
            PayloadShape::Form => EncodedBody {
                content_type: "application/x-www-form-urlencoded",
                bytes: url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("content", &self.content)
                    .finish()
                    .into_bytes(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_envelope_wraps_content() {
        let body = ValidationRequest::new("a: \"b\"\n").encode(PayloadShape::Json);
        assert_eq!(body.content_type, "application/json");
        let v: serde_json::Value = serde_json::from_slice(&body.bytes).unwrap();
        assert_eq!(v, serde_json::json!({ "content": "a: \"b\"\n" }));
    }

    #[test]
    fn form_body_is_url_encoded() {
        let body = ValidationRequest::new("job:\n  script: a&b").encode(PayloadShape::Form);
        assert_eq!(body.content_type, "application/x-www-form-urlencoded");
        assert_eq!(
            String::from_utf8(body.bytes).unwrap(),
            "content=job%3A%0A++script%3A+a%26b"
        );
    }
}
