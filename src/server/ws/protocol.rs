use serde::Deserialize;

/// Events the page sends over the socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsIncomingMessage {
    SendMessage { message: String },
    Reset,
    SelectConversation { id: usize },
}

impl WsIncomingMessage {
    /// Name reported when the handler fails.
    pub fn handler_name(&self) -> &'static str {
        match self {
            WsIncomingMessage::SendMessage { .. } => "send_message",
            WsIncomingMessage::Reset => "reset_chat",
            WsIncomingMessage::SelectConversation { .. } => "select_conversation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_events() {
        let send: WsIncomingMessage =
            serde_json::from_str(r#"{"type":"send_message","message":"Hello"}"#).unwrap();
        let select: WsIncomingMessage =
            serde_json::from_str(r#"{"type":"select_conversation","id":2}"#).unwrap();
        let reset: WsIncomingMessage = serde_json::from_str(r#"{"type":"reset"}"#).unwrap();

        assert_eq!(
            send,
            WsIncomingMessage::SendMessage {
                message: "Hello".to_string()
            }
        );
        assert_eq!(select, WsIncomingMessage::SelectConversation { id: 2 });
        assert_eq!(reset.handler_name(), "reset_chat");
    }

    #[test]
    fn rejects_unknown_event_types() {
        assert!(serde_json::from_str::<WsIncomingMessage>(r#"{"type":"delete_everything"}"#).is_err());
    }
}
