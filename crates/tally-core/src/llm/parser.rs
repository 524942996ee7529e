//! Response parsing for OpenAI-compatible endpoints

use serde_json::Value;

use super::messages::ChatCompletion;
use crate::error::{TallyError, TallyResult};

/// Parse a chat completion body
///
/// The first choice's message content is required; usage is optional.
pub fn parse_chat_completion(response: &Value) -> TallyResult<ChatCompletion> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| TallyError::llm("response has no choices[0].message.content"))?
        .to_string();

    let total_tokens = response["usage"]
        .get("total_tokens")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);

    Ok(ChatCompletion {
        content,
        total_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_response() {
        let body = json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "answer: 4"}}],
            "usage": {"prompt_tokens": 20, "completion_tokens": 3, "total_tokens": 23}
        });
        let completion = parse_chat_completion(&body).unwrap();
        assert_eq!(completion.content, "answer: 4");
        assert_eq!(completion.total_tokens, 23);
    }

    #[test]
    fn test_missing_usage_defaults_to_zero() {
        let body = json!({"choices": [{"message": {"content": "4"}}]});
        assert_eq!(parse_chat_completion(&body).unwrap().total_tokens, 0);
    }

    #[test]
    fn test_missing_content_is_error() {
        let body = json!({"choices": []});
        assert!(matches!(
            parse_chat_completion(&body),
            Err(TallyError::Llm { .. })
        ));

        let body = json!({"choices": [{"message": {"content": null}}]});
        assert!(parse_chat_completion(&body).is_err());
    }
}
