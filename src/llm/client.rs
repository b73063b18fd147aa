use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};

use super::LlmClient;
use super::error::LlmError;

const CATEGORIZE_SYSTEM_PROMPT: &str = "You classify customer questions for a partner-benefit \
service. Answer with exactly one benefit category name such as FOOD, CAFE, CULTURE, SHOPPING, \
TRAVEL, BEAUTY, ACTIVITY or EDUCATION. Answer with only the category word. If no category fits, \
answer with an empty string.";

const REASON_SYSTEM_PROMPT: &str = "You write one short, friendly sentence explaining why the \
listed partner brands suit a customer's question. Mention the brands naturally. Do not invent \
discounts or amounts.";

#[derive(Clone)]
/// LLM client backed by the `genai` multi-provider chat API.
pub struct GenaiLlm {
    client: Client,
    model: String,
}

impl GenaiLlm {
    /// Creates a client for `model`. Provider credentials are resolved by
    /// `genai` from the environment.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// Returns the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn exec(&self, request: ChatRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| LlmError::ProviderFailed {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        Ok(response.first_text().unwrap_or_default().trim().to_string())
    }
}

impl LlmClient for GenaiLlm {
    async fn categorize(&self, question: &str) -> Result<Option<String>, LlmError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(CATEGORIZE_SYSTEM_PROMPT),
            ChatMessage::user(question),
        ]);

        let answer = self.exec(request).await?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }

    async fn generate_reasons(
        &self,
        question: &str,
        category: &str,
        partner_names: &[String],
    ) -> Result<String, LlmError> {
        let prompt = format!(
            "Question: {question}\nCategory: {category}\nPartners: {}",
            partner_names.join(", ")
        );

        let request = ChatRequest::new(vec![
            ChatMessage::system(REASON_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        let reason = self.exec(request).await?;
        if reason.is_empty() {
            return Err(LlmError::EmptyResponse {
                model: self.model.clone(),
            });
        }

        Ok(reason)
    }
}
