// API client module: a small blocking HTTP client for the OpenAI chat
// completions endpoint. One request per run, no retries, no request
// timeout.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::suggest::{build_prompt, parse_reply, RenamePair, SuggestError, Suggester};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";
const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

/// Holds a reqwest blocking client, the endpoint and the API key used as
/// a bearer token.
pub struct ApiClient {
    client: Client,
    url: String,
    api_key: String,
}

/// One message in a chat request.
#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

// Only the fields we read are modelled; everything else is ignored.

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize, Debug)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

impl ApiClient {
    /// Create a client for the public OpenAI endpoint. The key is passed
    /// through untouched; a bad key fails at request time.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_url(api_key, CHAT_COMPLETIONS_URL)
    }

    /// Same as `new` but against another chat-completions endpoint.
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        // The blocking client otherwise gives up after 30s; a long name
        // list can take the model longer than that to answer.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    /// Send a single user prompt and return the text of the first choice.
    pub fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!(url = %self.url, model = MODEL, prompt_len = prompt.len(), "sending chat request");
        let res = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("Failed to send chat completion request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_default();
            anyhow::bail!("Chat completion failed: {} - {}", status, txt);
        }

        let resp: ChatResponse = res.json().context("Parsing chat completion response json")?;
        let content = resp.into_content().ok_or(SuggestError::MissingContent)?;
        debug!(reply = %content, "received chat reply");
        Ok(content)
    }
}

impl Suggester for ApiClient {
    fn suggest(&self, names: &[String]) -> Result<Vec<RenamePair>> {
        let prompt = build_prompt(names)?;
        let reply = self.complete(&prompt)?;
        let pairs = parse_reply(&reply)?;
        debug!(count = pairs.len(), "parsed rename suggestions");
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Instant;

    /// Serve one chat-completions request, answering only after `delay`.
    fn serve_once(delay: Duration, content: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();

            thread::sleep(delay);

            let reply = serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })
            .to_string();
            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.len(),
                reply
            )
            .unwrap();
            stream.flush().unwrap();
        });

        url
    }

    #[test]
    fn test_suggest_against_local_endpoint() {
        let url = serve_once(Duration::ZERO, r#"[["a", "A - Book (2000)"]]"#);
        let api = ApiClient::with_url("sk-test", url).unwrap();

        let pairs = api.suggest(&["a".to_string()]).unwrap();

        assert_eq!(pairs, vec![RenamePair::new("a", "A - Book (2000)")]);
    }

    #[test]
    fn test_slow_reply_is_not_cut_off() {
        let url = serve_once(Duration::from_secs(35), r#"[["a", "A - Book (2000)"]]"#);
        let api = ApiClient::with_url("sk-test", url).unwrap();

        let started = Instant::now();
        let pairs = api.suggest(&["a".to_string()]).unwrap();

        assert!(started.elapsed() >= Duration::from_secs(35));
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_response_first_choice_content() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "[[\"a\", \"b\"]]"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
            ]
        }"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.into_content().as_deref(), Some("[[\"a\", \"b\"]]"));
    }

    #[test]
    fn test_response_without_content() {
        let no_choices: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(no_choices.into_content().is_none());

        let null_content: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        assert!(null_content.into_content().is_none());
    }
}
