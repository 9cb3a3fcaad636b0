//! Conversation assembly
//!
//! Builds the fixed-order message sequence: system guidance, prior history,
//! then the current question.

use std::collections::HashMap;

use crate::types::{ChatMessage, Conversation, MessageRole};

/// System prompt; `{role}` and `{style}` come from the [`Persona`].
pub const SYSTEM_TEMPLATE: &str = "你是一个{role}。你需要用{style}的语气回答问题。你的目标是帮助程序员保持积极乐观的心态，提供技术建议的同时也要关注他们的心理健康。";

/// User prompt wrapping the current question.
pub const QUESTION_TEMPLATE: &str = "问题: {question}";

pub const DEFAULT_ROLE: &str = "程序员鼓励师";
pub const DEFAULT_STYLE: &str = "积极、温暖且专业";
pub const DEFAULT_QUESTION: &str = "我的代码一直报错，感觉好沮丧，该怎么办？";

/// Who the assistant plays and in what tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub role: String,
    pub style: String,
}

impl Persona {
    pub fn new(role: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            style: style.into(),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE, DEFAULT_STYLE)
    }
}

/// The two format strings used to assemble a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub system: String,
    pub question: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: SYSTEM_TEMPLATE.to_string(),
            question: QUESTION_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            question: question.into(),
        }
    }

    /// `[system, ...history, user question]`.
    ///
    /// `history` must hold only user and assistant turns; it is copied as is.
    pub fn format_messages(
        &self,
        persona: &Persona,
        history: &[ChatMessage],
        question: &str,
    ) -> Conversation {
        let system_vars = HashMap::from([("role", persona.role.as_str()), ("style", persona.style.as_str())]);
        let question_vars = HashMap::from([("question", question)]);

        debug_assert!(
            history.iter().all(|m| m.role != MessageRole::System),
            "history must not contain system messages"
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(render(&self.system, &system_vars)));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(render(&self.question, &question_vars)));
        Conversation::new(messages)
    }
}

/// Assemble a conversation with the default templates.
pub fn create_messages(persona: &Persona, history: &[ChatMessage], question: &str) -> Conversation {
    PromptTemplate::default().format_messages(persona, history, question)
}

/// The default persona, two-turn history and question.
pub fn create_messages_from_template() -> Conversation {
    create_messages(&Persona::default(), &default_history(), DEFAULT_QUESTION)
}

/// Two user/assistant exchanges used by [`create_messages_from_template`].
pub fn default_history() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("你好"),
        ChatMessage::assistant(
            "嘿！我是你的程序员鼓励师！记住，每个优秀的程序员都是从 Debug 中成长起来的。有什么我可以帮你的吗？",
        ),
        ChatMessage::user("我觉得自己写的代码太烂了"),
        ChatMessage::assistant(
            "每个程序员都经历过这个阶段！重要的是你在不断学习和进步。让我们一起看看代码，我相信通过重构和优化，它会变得更好。记住，Rome wasn't built in a day，代码质量是通过持续改进来提升的。",
        ),
    ]
}

/// Single-pass `{name}` substitution. Unknown placeholders are kept verbatim
/// and substituted values are never rescanned.
fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if vars.contains_key(&after[..close]) => {
                out.push_str(vars[&after[..close]]);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_conversation_has_fixed_order_and_text() {
        let conversation = create_messages_from_template();

        assert_eq!(
            conversation.roles(),
            [
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
            ]
        );
        assert_eq!(
            conversation[0].content,
            "你是一个程序员鼓励师。你需要用积极、温暖且专业的语气回答问题。你的目标是帮助程序员保持积极乐观的心态，提供技术建议的同时也要关注他们的心理健康。"
        );
        assert_eq!(conversation[1].content, "你好");
        assert_eq!(
            conversation[2].content,
            "嘿！我是你的程序员鼓励师！记住，每个优秀的程序员都是从 Debug 中成长起来的。有什么我可以帮你的吗？"
        );
        assert_eq!(conversation[3].content, "我觉得自己写的代码太烂了");
        assert_eq!(
            conversation[4].content,
            "每个程序员都经历过这个阶段！重要的是你在不断学习和进步。让我们一起看看代码，我相信通过重构和优化，它会变得更好。记住，Rome wasn't built in a day，代码质量是通过持续改进来提升的。"
        );
        assert_eq!(
            conversation[5].content,
            "问题: 我的代码一直报错，感觉好沮丧，该怎么办？"
        );
    }

    #[test]
    fn history_can_be_empty() {
        let conversation = create_messages(&Persona::new("reviewer", "terse"), &[], "why?");
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation[1], ChatMessage::user("问题: why?"));
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let persona = Persona::new("{style}", "calm");
        let conversation = create_messages(&persona, &[], "{question}");
        assert!(conversation[0].content.starts_with("你是一个{style}。"));
        assert_eq!(conversation[1].content, "问题: {question}");
    }

    #[test]
    #[should_panic(expected = "history must not contain system messages")]
    #[cfg(debug_assertions)]
    fn system_turns_in_history_are_rejected() {
        let history = [ChatMessage::system("sneaky"), ChatMessage::user("hi")];
        create_messages(&Persona::default(), &history, "why?");
    }

    #[test]
    fn render_keeps_unknown_and_unbalanced_braces() {
        let vars = HashMap::from([("a", "1")]);
        assert_eq!(render("{a} {b} {", &vars), "1 {b} {");
    }
}
