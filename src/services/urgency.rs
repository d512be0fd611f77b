//! Urgency scoring adapter
//!
//! Single boundary to the external text-classification service. Scoring is
//! strictly best effort: a transport failure, a malformed reply or a
//! missing score never propagates from a batch; every input item comes
//! back with at least the neutral default score, so classification
//! problems cannot block the lifecycle or the statistics surface.

use crate::error::CoreError;
use crate::models::UrgencyConfig;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Neutral score substituted when the service fails or returns nothing usable
pub const DEFAULT_SCORE: u8 = 50;

const SYSTEM_PROMPT: &str = "You are a helpful assistant classifying city initiatives.";

/// One item of a scoring batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrgencyRequest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
}

/// Scored batch entry, ready for the prioritized admin listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredInitiative {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Urgency in [0, 100]
    pub priority_score: u8,
}

/// Seam to the external classifier; swapped for a stub in tests
#[async_trait]
pub trait UrgencyScorer: Send + Sync {
    async fn analyze(&self, prompt: &str) -> Result<String, CoreError>;
}

// -- OpenAI-style chat completions client -----------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// HTTP scorer against an OpenAI-compatible chat completions endpoint
pub struct HttpScorer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpScorer {
    /// Build from config; the API key comes from the configured env var.
    /// A missing key is not fatal here; `analyze` degrades instead.
    pub fn new(config: &UrgencyConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: std::env::var(&config.api_key_env).ok(),
        })
    }
}

#[async_trait]
impl UrgencyScorer for HttpScorer {
    async fn analyze(&self, prompt: &str) -> Result<String, CoreError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CoreError::AdapterUnavailable("no API key configured".to_string()))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.3,
            max_tokens: 100,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CoreError::AdapterUnavailable(e.to_string()))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CoreError::AdapterUnavailable(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CoreError::AdapterUnavailable("empty completion".to_string()))
    }
}

// -- Prompt and reply parsing -----------------------------------------------

pub fn build_prompt(item: &UrgencyRequest) -> String {
    format!(
        "Analyze the following citizen initiative and return a priority score \
         from 1 (low) to 5 (high):\n\nTitle: {}\nDescription: {}\nLocation: {}",
        item.title, item.description, item.location
    )
}

/// Prompt for the single-item analysis endpoint; the reply is returned
/// to the caller verbatim rather than reduced to a score.
pub fn build_analysis_prompt(title: &str, description: &str) -> String {
    format!(
        "Analyze the following citizen initiative and return the most suitable \
         category and a priority score from 1 (low) to 5 (high):\n\nTitle: {}\nDescription: {}",
        title, description
    )
}

/// Best-effort extraction of a score from free text.
///
/// Looks for a small integer shortly after "priority" or "urgency". Values
/// 1-5 are rescaled to 0-100; values 6-100 are taken as-is; anything else
/// yields `None` and the caller substitutes the default.
pub fn parse_priority_score(text: &str) -> Option<u8> {
    let re = Regex::new(r"(?i)\b(?:priority|urgency)\b[^0-9]{0,40}?(\d{1,3})").unwrap();
    let value: u32 = re.captures(text)?.get(1)?.as_str().parse().ok()?;

    match value {
        1..=5 => Some(((value - 1) * 25) as u8),
        6..=100 => Some(value as u8),
        _ => None,
    }
}

/// Score a batch of initiatives.
///
/// Every input item appears in the output exactly once, failures included.
/// The result is sorted descending by score; the sort is stable so ties
/// keep input order.
pub async fn score_batch(
    scorer: &dyn UrgencyScorer,
    items: Vec<UrgencyRequest>,
) -> Vec<ScoredInitiative> {
    let mut scored = Vec::with_capacity(items.len());

    for item in items {
        let prompt = build_prompt(&item);
        let priority_score = match scorer.analyze(&prompt).await {
            Ok(reply) => parse_priority_score(&reply).unwrap_or(DEFAULT_SCORE),
            Err(_) => DEFAULT_SCORE,
        };

        scored.push(ScoredInitiative {
            id: item.id,
            title: item.title,
            description: item.description,
            location: item.location,
            priority_score,
        });
    }

    scored.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer(Vec<Result<String, ()>>);

    #[async_trait]
    impl UrgencyScorer for FixedScorer {
        async fn analyze(&self, prompt: &str) -> Result<String, CoreError> {
            // Replies keyed off the title embedded in the prompt
            for (i, reply) in self.0.iter().enumerate() {
                if prompt.contains(&format!("item-{}", i)) {
                    return reply.clone().map_err(|_| {
                        CoreError::AdapterUnavailable("connection refused".to_string())
                    });
                }
            }
            Err(CoreError::AdapterUnavailable("no reply".to_string()))
        }
    }

    fn request(i: usize) -> UrgencyRequest {
        UrgencyRequest {
            id: Uuid::new_v4(),
            title: format!("item-{}", i),
            description: "desc".to_string(),
            location: "Center".to_string(),
        }
    }

    #[test]
    fn test_analysis_prompt_carries_both_fields() {
        let prompt = build_analysis_prompt("Broken bench", "Slats missing in the park");
        assert!(prompt.contains("Title: Broken bench"));
        assert!(prompt.contains("Description: Slats missing in the park"));
        assert!(prompt.contains("category"));
    }

    #[test]
    fn test_parse_rescales_one_to_five() {
        assert_eq!(parse_priority_score("Priority score: 1"), Some(0));
        assert_eq!(parse_priority_score("priority: 3 (moderate)"), Some(50));
        assert_eq!(parse_priority_score("I'd assign priority 5 here."), Some(100));
    }

    #[test]
    fn test_parse_accepts_percent_scale() {
        assert_eq!(parse_priority_score("Urgency: 85 out of 100"), Some(85));
    }

    #[test]
    fn test_parse_rejects_out_of_range_and_missing() {
        assert_eq!(parse_priority_score("priority: 250"), None);
        assert_eq!(parse_priority_score("no score in this reply"), None);
        assert_eq!(parse_priority_score(""), None);
    }

    #[tokio::test]
    async fn test_failed_calls_still_yield_full_batch_with_defaults() {
        let scorer = FixedScorer(vec![Err(()), Err(()), Err(())]);
        let items = vec![request(0), request(1), request(2)];
        let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();

        let scored = score_batch(&scorer, items).await;

        assert_eq!(scored.len(), 3);
        for entry in &scored {
            assert_eq!(entry.priority_score, DEFAULT_SCORE);
        }
        // Ties on the default score keep input order
        let out_ids: Vec<Uuid> = scored.iter().map(|s| s.id).collect();
        assert_eq!(out_ids, ids);
    }

    #[tokio::test]
    async fn test_batch_sorted_descending_by_score() {
        let scorer = FixedScorer(vec![
            Ok("priority: 2".to_string()),   // 25
            Ok("priority: 5".to_string()),   // 100
            Err(()),                         // default 50
        ]);
        let scored = score_batch(&scorer, vec![request(0), request(1), request(2)]).await;

        let scores: Vec<u8> = scored.iter().map(|s| s.priority_score).collect();
        assert_eq!(scores, vec![100, 50, 25]);
        assert_eq!(scored[0].title, "item-1");
    }

    #[tokio::test]
    async fn test_unparsable_reply_falls_back_to_default() {
        let scorer = FixedScorer(vec![Ok("this is a very thoughtful essay".to_string())]);
        let scored = score_batch(&scorer, vec![request(0)]).await;

        assert_eq!(scored[0].priority_score, DEFAULT_SCORE);
    }
}
