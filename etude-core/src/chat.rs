use std::collections::VecDeque;
use std::time::{Duration, Instant};

use etude_types::ChatMessage;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub reply_delay: Duration,
    pub reply_text: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(1000),
            reply_text: "This is a placeholder response.".to_string(),
        }
    }
}

/// Chat side panel. Every message gets one canned reply after a delay.
#[derive(Debug, Default)]
pub struct ChatLog {
    settings: ChatSettings,
    messages: Vec<ChatMessage>,
    // Due times are non-decreasing, so replies leave in scheduling order.
    pending: VecDeque<Instant>,
}

impl ChatLog {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            settings,
            messages: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Log lines as displayed, e.g. "You: Hello".
    pub fn lines(&self) -> Vec<String> {
        self.messages.iter().map(ToString::to_string).collect()
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    /// Append a user message and schedule its reply. Blank input is
    /// ignored. Returns whether the message was accepted.
    pub fn send(&mut self, text: &str, now: Instant) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.messages.push(ChatMessage::user(text));
        self.pending.push_back(now + self.settings.reply_delay);
        log::debug!(target: "chat", "message sent, {} replies pending", self.pending.len());
        true
    }

    /// Deliver every reply due at `now`. Returns how many were appended.
    pub fn poll(&mut self, now: Instant) -> usize {
        let mut delivered = 0;
        while self.pending.front().is_some_and(|due| *due <= now) {
            self.pending.pop_front();
            self.messages
                .push(ChatMessage::assistant(self.settings.reply_text.clone()));
            delivered += 1;
        }
        delivered
    }
}
