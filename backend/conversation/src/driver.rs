use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use chatfill_core::{ChatMessage, ChatRole, ChatfillError, Placeholder};
use chatfill_placeholders::is_date_label;

static DATE_ANSWER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Where the conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// No document loaded yet.
    Idle,
    /// Asking questions, one placeholder at a time.
    Chatting,
    /// Every placeholder has been visited (or there were none).
    Complete,
}

/// Drives one fill-in session over an extracted placeholder sequence.
///
/// Owns the answer map and the transcript; the extractor never sees either.
/// Message ids are `<role>-<n>` with a counter scoped to this instance.
pub struct Conversation {
    placeholders: Vec<Placeholder>,
    answers: HashMap<String, String>,
    transcript: Vec<ChatMessage>,
    current_index: usize,
    state: ConversationState,
    message_count: usize,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            placeholders: Vec::new(),
            answers: HashMap::new(),
            transcript: Vec::new(),
            current_index: 0,
            state: ConversationState::Idle,
            message_count: 0,
        };
        conversation.push_message(
            ChatRole::Assistant,
            "Upload a legal template (.docx) and I'll help you fill in the blanks.",
        );
        conversation
    }

    /// Starts a session over a freshly extracted placeholder sequence,
    /// discarding any previous placeholders, answers, and transcript.
    pub fn begin(&mut self, placeholders: Vec<Placeholder>) {
        self.answers.clear();
        self.transcript.clear();
        self.current_index = 0;

        let intro = if placeholders.is_empty() {
            "I didn't detect any placeholders, but you can still review the document below."
                .to_string()
        } else {
            let plural = if placeholders.len() == 1 { "" } else { "s" };
            format!(
                "I found {} placeholder{plural}. Let's fill them in together.",
                placeholders.len()
            )
        };
        self.push_message(ChatRole::Assistant, intro);

        if let Some(first) = placeholders.first() {
            let question = first.question.clone();
            self.push_message(ChatRole::Assistant, question);
            self.state = ConversationState::Chatting;
        } else {
            self.state = ConversationState::Complete;
        }

        self.placeholders = placeholders;
    }

    /// Submits an answer for the current placeholder.
    ///
    /// Date-labeled placeholders require `YYYY-MM-DD`; anything else just
    /// has to be non-empty after trimming. Rejection leaves the cursor,
    /// answers, and state untouched so the user can resubmit.
    pub fn submit_answer(&mut self, input: &str) -> Result<(), ChatfillError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ChatfillError::InvalidAnswer(
                "An answer is required.".to_string(),
            ));
        }

        let placeholder = self
            .placeholders
            .get(self.current_index)
            .ok_or_else(|| {
                ChatfillError::InvalidInput("no placeholder awaiting an answer".to_string())
            })?
            .clone();

        if is_date_label(&placeholder.label) && !DATE_ANSWER.is_match(trimmed) {
            return Err(ChatfillError::InvalidAnswer(
                "Dates must use the YYYY-MM-DD format (e.g., 2024-03-31).".to_string(),
            ));
        }

        self.push_message(ChatRole::User, trimmed);
        self.answers.insert(placeholder.id, trimmed.to_string());

        let next_index = self.current_index + 1;
        if next_index < self.placeholders.len() {
            let question = self.placeholders[next_index].question.clone();
            self.push_message(ChatRole::Assistant, question);
            self.current_index = next_index;
            self.state = ConversationState::Chatting;
        } else {
            self.push_message(
                ChatRole::Assistant,
                "All set! You can review the completed document on the right. \
                 Feel free to adjust any field from the list below.",
            );
            self.state = ConversationState::Complete;
        }

        Ok(())
    }

    /// Re-enters the conversation at `index` to revise a field. Returns the
    /// previously stored answer, if any, as a pre-fill draft.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        let placeholder = self.placeholders.get(index)?.clone();

        self.push_message(
            ChatRole::Assistant,
            format!(
                "Let's update the {}. {}",
                placeholder.label.to_lowercase(),
                placeholder.question
            ),
        );
        self.current_index = index;
        self.state = ConversationState::Chatting;

        self.answers.get(&placeholder.id).map(String::as_str)
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn current_placeholder(&self) -> Option<&Placeholder> {
        self.placeholders.get(self.current_index)
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn answers(&self) -> &HashMap<String, String> {
        &self.answers
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn answered_count(&self) -> usize {
        self.placeholders
            .iter()
            .filter(|p| self.answers.contains_key(&p.id))
            .count()
    }

    fn push_message(&mut self, role: ChatRole, text: impl Into<String>) {
        self.message_count += 1;
        let id = format!("{}-{}", role.as_str(), self.message_count);
        self.transcript.push(ChatMessage::new(id, role, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(id: &str, raw: &str, label: &str) -> Placeholder {
        Placeholder {
            id: id.into(),
            raw: raw.into(),
            label: label.into(),
            question: chatfill_placeholders::build_question(label),
        }
    }

    fn two_field_conversation() -> Conversation {
        let mut conversation = Conversation::new();
        conversation.begin(vec![
            placeholder("tenant-name-1", "{{Tenant Name}}", "Tenant Name"),
            placeholder("effective-date-2", "{{Effective Date}}", "Effective Date"),
        ]);
        conversation
    }

    #[test]
    fn test_empty_sequence_goes_straight_to_complete() {
        let mut conversation = Conversation::new();
        conversation.begin(Vec::new());
        assert_eq!(conversation.state(), ConversationState::Complete);
        assert!(conversation.current_placeholder().is_none());
    }

    #[test]
    fn test_begin_posts_intro_and_first_question() {
        let conversation = two_field_conversation();
        assert_eq!(conversation.state(), ConversationState::Chatting);
        let texts: Vec<_> = conversation
            .transcript()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "I found 2 placeholders. Let's fill them in together.",
                "Please provide the Tenant Name.",
            ]
        );
    }

    #[test]
    fn test_answers_advance_and_complete() {
        let mut conversation = two_field_conversation();
        conversation.submit_answer("Jane Doe").unwrap();
        assert_eq!(conversation.state(), ConversationState::Chatting);
        assert_eq!(
            conversation.current_placeholder().unwrap().id,
            "effective-date-2"
        );

        conversation.submit_answer("2024-03-31").unwrap();
        assert_eq!(conversation.state(), ConversationState::Complete);
        assert_eq!(conversation.answered_count(), 2);
        assert_eq!(
            conversation.answers().get("tenant-name-1").unwrap(),
            "Jane Doe"
        );
    }

    #[test]
    fn test_date_answers_validated() {
        let mut conversation = two_field_conversation();
        conversation.submit_answer("Jane Doe").unwrap();

        let err = conversation.submit_answer("03/31/2024").unwrap_err();
        assert!(matches!(err, ChatfillError::InvalidAnswer(_)));
        // Rejection leaves the cursor and state alone.
        assert_eq!(conversation.state(), ConversationState::Chatting);
        assert_eq!(
            conversation.current_placeholder().unwrap().id,
            "effective-date-2"
        );

        conversation.submit_answer(" 2024-03-31 ").unwrap();
        assert_eq!(conversation.state(), ConversationState::Complete);
        assert_eq!(
            conversation.answers().get("effective-date-2").unwrap(),
            "2024-03-31"
        );
    }

    #[test]
    fn test_empty_answer_rejected() {
        let mut conversation = two_field_conversation();
        assert!(conversation.submit_answer("   ").is_err());
        assert_eq!(conversation.answered_count(), 0);
    }

    #[test]
    fn test_revision_prefills_and_overwrites() {
        let mut conversation = two_field_conversation();
        conversation.submit_answer("Jane Doe").unwrap();
        conversation.submit_answer("2024-03-31").unwrap();
        assert_eq!(conversation.state(), ConversationState::Complete);

        let draft = conversation.select(0).map(str::to_string);
        assert_eq!(draft.as_deref(), Some("Jane Doe"));
        assert_eq!(conversation.state(), ConversationState::Chatting);

        conversation.submit_answer("John Smith").unwrap();
        assert_eq!(
            conversation.answers().get("tenant-name-1").unwrap(),
            "John Smith"
        );
        // Answer map overwrites, never grows a second entry.
        assert_eq!(conversation.answers().len(), 2);
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut conversation = two_field_conversation();
        let before = conversation.transcript().len();
        assert!(conversation.select(9).is_none());
        assert_eq!(conversation.transcript().len(), before);
    }

    #[test]
    fn test_message_ids_are_instance_scoped() {
        let conversation = two_field_conversation();
        let ids: Vec<_> = conversation
            .transcript()
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["assistant-2", "assistant-3"]);

        // A fresh conversation restarts its own counter.
        let other = Conversation::new();
        assert_eq!(other.transcript()[0].id, "assistant-1");
    }
}
