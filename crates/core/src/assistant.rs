use crate::error::TripError;
use crate::llm::{ChatTurn, CompletionRequest, LlmClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Oldest turns beyond this are dropped before the history is forwarded.
const MAX_HISTORY_TURNS: usize = 20;

const CHAT_SYSTEM_PROMPT: &str = "You are a friendly travel assistant. Help users plan trips, \
suggest destinations, answer travel questions and give practical, personalized advice. \
Keep answers concise and conversational.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One message of a chat transcript as the widget resubmits it each turn.
/// Extra fields (ids, timestamps) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub text: String,
    pub sender: Sender,
}

/// Free-text assistant backed by the same AI provider as the itinerary
/// generator. Holds no conversation state of its own.
pub struct ChatAssistant {
    llm: Arc<dyn LlmClient>,
}

impl ChatAssistant {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn reply(
        &self,
        message: &str,
        conversation: &[ConversationMessage],
    ) -> Result<String, TripError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(TripError::Validation("Message is required".into()));
        }

        let req = CompletionRequest {
            system: Some(CHAT_SYSTEM_PROMPT.to_string()),
            turns: history_turns(conversation, message),
            response_schema: None,
        };

        let text = self
            .llm
            .complete(req)
            .await
            .map_err(|e| TripError::upstream("AI provider", e))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(TripError::Generation(format!(
                "empty chat response from {:?}",
                self.llm.provider()
            )));
        }
        Ok(text.to_string())
    }

    /// Short teaser for a trip. Never fails: provider errors and empty replies
    /// fall back to canned text.
    pub async fn summarize(&self, destination: &str, days: u32) -> String {
        let prompt = format!(
            "Create a brief, engaging summary for a {days}-day trip to {destination}. \
Include key highlights and what makes this destination special. Keep it under 100 words."
        );

        match self.llm.complete(CompletionRequest::prompt(prompt)).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => format!("Discover the amazing {destination} in {days} days!"),
            Err(err) => {
                tracing::error!(%destination, error = %err, "trip summary generation failed");
                format!("Explore {destination} over {days} unforgettable days.")
            }
        }
    }
}

// The provider expects the transcript to open with a user turn, so leading
// bot messages (the widget greeting) are skipped.
fn history_turns(conversation: &[ConversationMessage], message: &str) -> Vec<ChatTurn> {
    let start = conversation.len().saturating_sub(MAX_HISTORY_TURNS);
    let mut turns: Vec<ChatTurn> = conversation[start..]
        .iter()
        .skip_while(|m| m.sender == Sender::Bot)
        .filter(|m| !m.text.trim().is_empty())
        .map(|m| match m.sender {
            Sender::User => ChatTurn::user(m.text.trim()),
            Sender::Bot => ChatTurn::model(m.text.trim()),
        })
        .collect();
    turns.push(ChatTurn::user(message));
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::tests::ScriptedLlm;
    use crate::llm::Role;
    use serde_json::json;

    fn transcript() -> Vec<ConversationMessage> {
        serde_json::from_value(json!([
            {"id": "1", "text": "Hi! I'm your Travel AI Assistant!", "sender": "bot", "timestamp": "2026-10-16T09:00:00Z"},
            {"id": "2", "text": "Where should I go in May?", "sender": "user", "timestamp": "2026-10-16T09:00:05Z"},
            {"id": "3", "text": "Portugal is lovely in May.", "sender": "bot", "timestamp": "2026-10-16T09:00:07Z"}
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn forwards_history_and_new_message() {
        let llm = ScriptedLlm::replying("Try Porto as well!\n");
        let assistant = ChatAssistant::new(llm.clone());
        let reply = assistant.reply("What about Porto?", &transcript()).await.unwrap();
        assert_eq!(reply, "Try Porto as well!");

        let requests = llm.requests.lock().unwrap();
        let turns = &requests[0].turns;
        let roles: Vec<_> = turns.iter().map(|t| t.role).collect();
        assert_eq!(roles, [Role::User, Role::Model, Role::User]);
        assert_eq!(turns[2].text, "What about Porto?");
        assert!(requests[0].response_schema.is_none());
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_calling_provider() {
        let llm = ScriptedLlm::replying("unused");
        let assistant = ChatAssistant::new(llm.clone());
        let err = assistant.reply("   ", &[]).await.unwrap_err();
        assert!(err.is_validation());
        assert!(llm.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_reply_is_a_generation_error() {
        let assistant = ChatAssistant::new(ScriptedLlm::replying(""));
        let err = assistant.reply("Hello", &[]).await.unwrap_err();
        assert!(matches!(err, TripError::Generation(_)));
    }

    #[test]
    fn history_is_capped() {
        let long: Vec<_> = (0..50)
            .map(|i| ConversationMessage {
                text: format!("msg {i}"),
                sender: if i % 2 == 0 { Sender::User } else { Sender::Bot },
            })
            .collect();
        let turns = history_turns(&long, "latest");
        assert!(turns.len() <= MAX_HISTORY_TURNS + 1);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns.last().unwrap().text, "latest");
    }

    #[tokio::test]
    async fn summary_falls_back_on_failure_or_empty_reply() {
        let assistant = ChatAssistant::new(ScriptedLlm::failing("quota exceeded"));
        assert_eq!(
            assistant.summarize("Lisbon", 4).await,
            "Explore Lisbon over 4 unforgettable days."
        );

        let assistant = ChatAssistant::new(ScriptedLlm::replying(" "));
        assert_eq!(
            assistant.summarize("Lisbon", 4).await,
            "Discover the amazing Lisbon in 4 days!"
        );

        let assistant = ChatAssistant::new(ScriptedLlm::replying("Sunny hills and tiled streets."));
        assert_eq!(
            assistant.summarize("Lisbon", 4).await,
            "Sunny hills and tiled streets."
        );
    }
}
