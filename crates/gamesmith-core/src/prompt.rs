//! Prompt builder for game generation requests.
//!
//! Renders a free-text game description into the fixed instruction sent to
//! the generative service. The description is embedded verbatim between a
//! fixed head and tail; nothing else varies between calls.

/// Instruction text preceding the description.
const PROMPT_HEAD: &str = "You are an expert game developer. Create a complete, playable HTML5 game based on this description: \"";

/// Instruction text following the description.
const PROMPT_TAIL: &str = "\"

CRITICAL REQUIREMENTS:
1. Generate ONLY the complete HTML code with embedded CSS and JavaScript
2. The game must be fully self-contained in a single HTML file
3. Use HTML5 Canvas or DOM elements for rendering
4. Include all game logic, controls, and UI
5. Make it visually appealing with colors and styling
6. Add score/lives display if relevant
7. Include clear instructions in the game
8. Make controls intuitive (arrow keys, WASD, mouse/touch)
9. DO NOT include any explanatory text before or after the code
10. DO NOT use markdown code blocks or backticks
11. Start directly with <!DOCTYPE html>

The game should be production-ready and fun to play immediately.";

/// Builds the generation prompt from a user description.
pub struct GamePromptBuilder;

impl GamePromptBuilder {
    /// Render `description` into the instruction template.
    ///
    /// Pure and total: the description is neither trimmed, escaped, nor
    /// truncated, and identical input always yields identical output.
    pub fn build(description: &str) -> String {
        let mut prompt =
            String::with_capacity(PROMPT_HEAD.len() + description.len() + PROMPT_TAIL.len());
        prompt.push_str(PROMPT_HEAD);
        prompt.push_str(description);
        prompt.push_str(PROMPT_TAIL);
        prompt
    }
}
