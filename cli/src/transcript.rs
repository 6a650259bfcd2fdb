use asione_core::Message;

/// Seed plus the message just pushed
const MIN_CAP: usize = 2;

/// Conversation sent to the chat endpoint.
///
/// The first message is the seed system prompt and is never dropped, nor is
/// the newest message. Once more than `cap` messages are held (seed
/// included), the oldest of the rest are discarded. A cap of 0 keeps
/// everything; caps below 2 act as 2.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    cap: usize,
}

impl Transcript {
    pub fn new(seed: Message, cap: usize) -> Self {
        let cap = if cap == 0 { 0 } else { cap.max(MIN_CAP) };
        Self {
            messages: vec![seed],
            cap,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        if self.cap > 0 && self.messages.len() > self.cap {
            let excess = self.messages.len() - self.cap;
            self.messages.drain(1..=excess);
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asione_core::Role;

    #[test]
    fn unbounded_when_cap_is_zero() {
        let mut transcript = Transcript::new(Message::system("seed"), 0);
        for i in 0..100 {
            transcript.push(Message::user(format!("m{i}")));
        }
        assert_eq!(transcript.len(), 101);
    }

    #[test]
    fn oldest_messages_go_first_and_seed_stays() {
        let mut transcript = Transcript::new(Message::system("seed"), 4);
        for i in 0..6 {
            transcript.push(Message::user(format!("m{i}")));
        }

        let contents: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["seed", "m3", "m4", "m5"]);
        assert_eq!(transcript.messages()[0].role, Role::System);
    }

    #[test]
    fn tiny_cap_still_keeps_the_latest_message() {
        let mut transcript = Transcript::new(Message::system("seed"), 1);
        transcript.push(Message::user("question"));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[1].content, "question");

        transcript.push(Message::assistant("réponse"));
        let contents: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["seed", "réponse"]);
    }
}
