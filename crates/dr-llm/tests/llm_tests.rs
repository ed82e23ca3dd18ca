//! Tests for dr-llm: types, provider trait, and real Anthropic API integration.

use dr_llm::*;

// ===========================================================================
// LlmRequest
// ===========================================================================

#[test]
fn llm_request_default() {
    let req = LlmRequest::default();
    assert!(req.model.contains("claude"));
    assert!(req.messages.is_empty());
    assert_eq!(req.max_tokens, Some(8192));
    assert!(req.temperature.is_none());
    assert!(req.system.is_none());
}

// ===========================================================================
// LlmContent
// ===========================================================================

#[test]
fn llm_content_from_string() {
    let c: LlmContent = "hello".into();
    match c {
        LlmContent::Text(s) => assert_eq!(s, "hello"),
        _ => panic!("Expected Text"),
    }
}

#[test]
fn llm_content_from_owned_string() {
    let c: LlmContent = String::from("world").into();
    match c {
        LlmContent::Text(s) => assert_eq!(s, "world"),
        _ => panic!("Expected Text"),
    }
}

#[test]
fn llm_content_text_serde() {
    let c = LlmContent::Text("hello".into());
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, r#""hello""#);
    let back: LlmContent = serde_json::from_str(&json).unwrap();
    match back {
        LlmContent::Text(s) => assert_eq!(s, "hello"),
        _ => panic!("Expected Text"),
    }
}

#[test]
fn llm_content_blocks_serde() {
    let c = LlmContent::Blocks(vec![
        ContentBlock::Text { text: "hi".into() },
    ]);
    let json = serde_json::to_string(&c).unwrap();
    assert!(json.contains(r#""type":"text""#));
    let back: LlmContent = serde_json::from_str(&json).unwrap();
    match back {
        LlmContent::Blocks(blocks) => {
            assert_eq!(blocks.len(), 1);
            match &blocks[0] {
                ContentBlock::Text { text } => assert_eq!(text, "hi"),
                _ => panic!("Expected Text block"),
            }
        }
        _ => panic!("Expected Blocks"),
    }
}

// ===========================================================================
// ContentBlock
// ===========================================================================

#[test]
fn content_block_text_serde() {
    let b = ContentBlock::Text { text: "hello".into() };
    let json = serde_json::to_string(&b).unwrap();
    assert!(json.contains(r#""type":"text""#));
    let back: ContentBlock = serde_json::from_str(&json).unwrap();
    match back {
        ContentBlock::Text { text } => assert_eq!(text, "hello"),
        _ => panic!("Expected Text"),
    }
}

// ===========================================================================
// LlmMessage
// ===========================================================================

#[test]
fn llm_message_serde() {
    let msg = LlmMessage {
        role: "user".into(),
        content: LlmContent::Text("hello".into()),
    };
    let json = serde_json::to_string(&msg).unwrap();
    let back: LlmMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back.role, "user");
}

// ===========================================================================
// Usage
// ===========================================================================

#[test]
fn usage_default() {
    let u = Usage::default();
    assert_eq!(u.input_tokens, 0);
    assert_eq!(u.output_tokens, 0);
}

#[test]
fn usage_serde() {
    let u = Usage { input_tokens: 100, output_tokens: 50 };
    let json = serde_json::to_string(&u).unwrap();
    let back: Usage = serde_json::from_str(&json).unwrap();
    assert_eq!(back.input_tokens, 100);
    assert_eq!(back.output_tokens, 50);
}

// ===========================================================================
// AnthropicProvider — real API integration
// ===========================================================================

fn load_api_key() -> Option<String> {
    let key = std::env::var("ANTHROPIC_API_KEY").ok()?;
    if key.is_empty() { None } else { Some(key) }
}

#[tokio::test]
async fn anthropic_provider_simple_text_response() {
    let api_key = match load_api_key() {
        Some(k) => k,
        None => { eprintln!("SKIP: no ANTHROPIC_API_KEY"); return; }
    };

    let provider = AnthropicProvider::new(&api_key);
    assert_eq!(provider.name(), "anthropic");
    assert!(provider.models().len() > 0);

    let request = LlmRequest {
        model: "claude-haiku-4-5-20251001".into(),
        messages: vec![LlmMessage {
            role: "user".into(),
            content: LlmContent::Text("Reply with exactly the word 'pong' and nothing else.".into()),
        }],
        max_tokens: Some(32),
        ..Default::default()
    };

    use futures::StreamExt;
    let stream = provider.complete_stream(request, None).await.expect("API call failed");
    tokio::pin!(stream);

    let mut text = String::new();
    let mut got_done = false;

    while let Some(result) = stream.next().await {
        match result.expect("Stream error") {
            StreamDelta::Text(t) => text.push_str(&t),
            StreamDelta::Done { .. } => got_done = true,
            _ => {}
        }
    }

    let lower = text.to_lowercase();
    assert!(lower.contains("pong"), "Expected 'pong' in response, got: {}", text);
    assert!(got_done, "Never received Done delta");
}

#[tokio::test]
async fn anthropic_provider_bad_key_fails() {
    let provider = AnthropicProvider::new("sk-bad-key-12345");

    let request = LlmRequest {
        model: "claude-haiku-4-5-20251001".into(),
        messages: vec![LlmMessage {
            role: "user".into(),
            content: LlmContent::Text("hello".into()),
        }],
        max_tokens: Some(16),
        ..Default::default()
    };

    let result = provider.complete_stream(request, None).await;
    assert!(result.is_err(), "Expected error with bad API key");
}

#[tokio::test]
async fn anthropic_provider_cancellation_short_circuits() {
    let provider = AnthropicProvider::new("fake-key");
    let token = tokio_util::sync::CancellationToken::new();
    token.cancel();

    let request = LlmRequest {
        model: "claude-haiku-4-5-20251001".into(),
        messages: vec![LlmMessage { role: "user".into(), content: LlmContent::Text("hi".into()) }],
        max_tokens: Some(16),
        ..Default::default()
    };

    let result = provider.complete_stream(request, Some(token)).await;
    assert!(matches!(result, Err(LlmError::Cancelled)));
}

#[test]
fn anthropic_provider_supports_model() {
    let provider = AnthropicProvider::new("fake");
    assert!(provider.supports_model("claude-haiku-4-5-20251001"));
    assert!(!provider.supports_model("gpt-4"));
}
