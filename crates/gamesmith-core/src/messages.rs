//! User-facing assistant messages appended to the conversation.

/// Greeting shown as the first entry of a fresh session.
pub const GREETING: &str = "👋 Hi! I'm your AI Game Creator. Describe any game you'd like to create, and I'll build it for you instantly!

Try something like:
• \"Create a snake game with score tracking\"
• \"Make a space shooter with enemies\"
• \"Build a platformer with jumping mechanics\"";

/// Assistant message for a successful generation of `description`.
pub fn success(description: &str) -> String {
    format!(
        "🎮 **Game Created Successfully!**\n\n\
         I've generated your {}. The game is now playable in the preview!\n\n\
         **How to play:**\n\
         • Use arrow keys or WASD to control\n\
         • Follow the on-screen instructions\n\
         • Have fun!\n\n\
         Want to modify it? Just tell me what changes you'd like!",
        description.to_lowercase()
    )
}

/// Assistant message for a failed generation.
pub fn failure(reason: &str) -> String {
    format!(
        "❌ Sorry, I encountered an error creating the game: {reason}\n\n\
         Please try again with a different prompt."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_lowercases_description() {
        let msg = success("Snake Game With SCORE");
        assert!(msg.contains("I've generated your snake game with score."));
        assert!(msg.starts_with("🎮 **Game Created Successfully!**\n\n"));
    }

    #[test]
    fn test_failure_includes_reason() {
        let msg = failure("HTTP request failed: timeout");
        assert!(msg.contains("error creating the game: HTTP request failed: timeout\n\n"));
    }

    #[test]
    fn test_greeting_lists_examples() {
        assert_eq!(GREETING.matches('•').count(), 3);
    }
}
