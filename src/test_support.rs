use rusoto_core::signature::{SignedRequest, SignedRequestPayload};

/// Query parameters and buffered body of a request the mock dispatcher received,
/// flattened to one string. EC2 sends form-encoded params, Cost Explorer a JSON body.
pub fn request_text(request: &SignedRequest) -> String {
    let mut text = request
        .params
        .iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{}={}", key, value),
            None => key.to_string(),
        })
        .collect::<Vec<String>>()
        .join("&");
    if let Some(SignedRequestPayload::Buffer(ref body)) = request.payload {
        if !text.is_empty() {
            text.push('&');
        }
        text.push_str(&String::from_utf8_lossy(body));
    }
    text
}
