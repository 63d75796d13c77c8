use std::future::Future;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One question record as the trivia API returns it, before decoding and shuffling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub incorrect_answers: Vec<String>,
    pub correct_answer: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<RawQuestion>,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Source of raw question batches.
pub trait QuestionProvider {
    /// Request `amount` multiple-choice questions.
    fn fetch(
        &self,
        amount: usize,
    ) -> impl Future<Output = Result<Vec<RawQuestion>, QuizError>> + Send;
}

/// Parse an API response body into raw records.
///
/// A non-zero `response_code` means the service refused the request, and an
/// empty batch is treated as malformed since there is nothing to show.
pub fn parse_response(body: &str) -> Result<Vec<RawQuestion>, QuizError> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.response_code != 0 {
        return Err(QuizError::Api(response.response_code));
    }
    if response.results.is_empty() {
        return Err(QuizError::DataFormat("no questions returned".into()));
    }
    Ok(response.results)
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenTdbSettings {
    pub api_url: String,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub timeout: Duration,
}

impl Default for OpenTdbSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            category: None,
            difficulty: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP provider for the Open Trivia Database.
#[derive(Debug, Clone)]
pub struct OpenTdbProvider {
    client: Client,
    settings: OpenTdbSettings,
}

impl OpenTdbProvider {
    pub fn new(settings: OpenTdbSettings) -> Result<Self, QuizError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &OpenTdbSettings {
        &self.settings
    }

    fn query(&self, amount: usize) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("amount", amount.to_string()),
            ("type", "multiple".to_string()),
        ];
        if let Some(category) = self.settings.category {
            query.push(("category", category.to_string()));
        }
        if let Some(difficulty) = self.settings.difficulty {
            query.push(("difficulty", difficulty.to_string()));
        }
        query
    }
}

impl QuestionProvider for OpenTdbProvider {
    async fn fetch(&self, amount: usize) -> Result<Vec<RawQuestion>, QuizError> {
        let response = self
            .client
            .get(&self.settings.api_url)
            .query(&self.query(amount))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuizError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}
