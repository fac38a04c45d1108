use crate::models::{ChatMessage, Role};

/// Styling for the transcript bubbles, emitted once at the top of a
/// rendered transcript.
pub const CSS: &str = "<style>
  .chat-message {
    padding: 0.5rem;
    border-radius: 0.5rem;
    margin-bottom: 0.5rem;
    display: flex;
  }

  .chat-message.user {
    background-color: #2b313e;
  }

  .chat-message.bot {
    background-color: #475063;
  }

  .chat-message .message {
    width: 95%;
    padding: 0 1.5rem;
    color: #fff;
  }
</style>
";

pub const USER_TEMPLATE: &str = "<div class=\"chat-message user\">
    <div class=\"message\">{{MSG}}</div>
</div>
";

pub const BOT_TEMPLATE: &str = "<div class=\"chat-message bot\">
    <div class=\"message\">{{MSG}}</div>
</div>
";

const PLACEHOLDER: &str = "{{MSG}}";

/// Message text is escaped before substitution, so transcript content can
/// never inject markup into the rendered page.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn render_message(message: &ChatMessage) -> String {
    let template = match message.role {
        Role::User => USER_TEMPLATE,
        Role::Bot => BOT_TEMPLATE,
    };
    template.replace(PLACEHOLDER, &escape_html(&message.content))
}

/// Full transcript: the CSS block followed by one bubble per message in
/// history order.
pub fn render_transcript(history: &[ChatMessage]) -> String {
    let mut page = String::from(CSS);
    for message in history {
        page.push_str(&render_message(message));
    }
    page
}

#[cfg(test)]
mod tests {
    use super::{render_message, render_transcript, BOT_TEMPLATE, USER_TEMPLATE};
    use crate::models::ChatMessage;

    #[test]
    fn templates_keep_the_placeholder() {
        assert!(USER_TEMPLATE.contains("{{MSG}}"));
        assert!(BOT_TEMPLATE.contains("{{MSG}}"));
    }

    #[test]
    fn message_content_is_escaped() {
        let rendered = render_message(&ChatMessage::bot("<script>alert('x')</script>"));
        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
    }

    #[test]
    fn transcript_alternates_user_and_bot_bubbles() {
        let history = vec![
            ChatMessage::user("q1"),
            ChatMessage::bot("a1"),
            ChatMessage::user("q2"),
            ChatMessage::bot("a2"),
        ];

        let page = render_transcript(&history);
        let user_positions: Vec<usize> = page
            .match_indices("chat-message user")
            .map(|(at, _)| at)
            .collect();
        let bot_positions: Vec<usize> = page
            .match_indices("chat-message bot")
            .map(|(at, _)| at)
            .collect();

        assert_eq!(user_positions.len(), 2);
        assert_eq!(bot_positions.len(), 2);
        assert!(user_positions[0] < bot_positions[0]);
        assert!(bot_positions[0] < user_positions[1]);
        assert!(user_positions[1] < bot_positions[1]);
    }

    #[test]
    fn empty_history_renders_styles_only() {
        let page = render_transcript(&[]);
        assert!(page.contains("<style>"));
        assert!(!page.contains("chat-message user"));
    }
}
