use crate::llm::ChatMessage;

/// Rephrases a follow-up into a standalone question. Filled in one pass, so
/// braces inside earlier turns are never treated as placeholders.
pub fn condense_question_prompt(history: &[ChatMessage], question: &str) -> String {
    format!(
        "Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.\n\n\
         Chat History:\n{}\nFollow Up Input: {}\nStandalone question:",
        format_chat_history(history),
        question
    )
}

pub fn qa_system_prompt(context: &str) -> String {
    format!(
        "Use the following pieces of context to answer the user's question. \n\
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\
         ----------------\n{}",
        context
    )
}

/// One `Human:`/`Assistant:` line per message.
pub fn format_chat_history(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|message| {
            let speaker = if message.is_user() { "Human" } else { "Assistant" };
            format!("{}: {}", speaker, message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
