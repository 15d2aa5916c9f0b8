use crate::interview::{CandidateRecord, ConversationState, TechStack};

pub const WELCOME_MESSAGE: &str = "Hello! I'm TalentScout, your AI hiring assistant.

I'm here to help you with the initial screening process for technology positions. I'll be collecting some basic information about you and conducting a brief technical assessment.

Let's get started! Please tell me your full name.";

pub const CLOSING_MESSAGE: &str = "Thank you for your time and for sharing your information with TalentScout!

I've collected your details and conducted a brief technical assessment. Our recruitment team will review your profile and get back to you within 2-3 business days.

Here's a summary of what we discussed:
- Your information has been recorded
- Your tech stack has been noted
- Technical assessment completed

If you have any questions or need to update your information, please don't hesitate to reach out to our team.

Good luck with your application!";

pub const QUESTION_GENERATOR_SYSTEM_PROMPT: &str =
    "You are a technical interviewer. Generate relevant technical questions based on the provided tech stack.";

pub fn backend_failure_message(detail: &str) -> String {
    format!(
        "I apologize, but I'm experiencing technical difficulties. Please try again. Error: {}",
        detail
    )
}

/// Everything the reply model needs to know about where the screening stands.
pub struct PromptContext<'a> {
    pub state: ConversationState,
    pub record: &'a CandidateRecord,
    pub tech_stack: &'a TechStack,
    pub questions: &'a [String],
    pub question_index: usize,
}

pub fn build_system_prompt(ctx: &PromptContext<'_>) -> String {
    let info = if ctx.record.is_empty() {
        "none yet".to_string()
    } else {
        ctx.record
            .iter()
            .map(|(field, value)| format!("{}: {}", field, value))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let tech_stack = if ctx.tech_stack.is_empty() {
        "none yet".to_string()
    } else {
        ctx.tech_stack.joined(", ")
    };

    let questions = if ctx.questions.is_empty() {
        "none yet".to_string()
    } else {
        ctx.questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are TalentScout, an intelligent hiring assistant for a technology recruitment agency. Your role is to:

1. Greet candidates warmly and explain your purpose
2. Collect essential candidate information systematically
3. Gather their tech stack details
4. Generate relevant technical questions based on their tech stack
5. Conduct a technical assessment
6. End the conversation gracefully

Key Guidelines:
- Be professional, friendly, and encouraging
- Ask one question at a time
- Maintain context throughout the conversation
- If you encounter conversation-ending keywords (goodbye, exit, quit, end, stop), gracefully conclude
- Keep responses concise but informative
- Always stay in character as a hiring assistant

Current conversation state: {state}

Candidate information collected so far: {info}

Tech stack: {tech_stack}

Technical questions generated:
{questions}

Current question index: {index}

Respond appropriately based on the current state and context."#,
        state = ctx.state,
        info = info,
        tech_stack = tech_stack,
        questions = questions,
        index = ctx.question_index,
    )
}

pub fn build_question_prompt(tech_stack: &TechStack) -> String {
    format!(
        "Generate 3-5 technical questions for a candidate with the following tech stack: {}.

For each technology, create relevant questions that assess:
1. Basic understanding
2. Practical experience
3. Problem-solving skills

Format the response as a JSON array of questions.",
        tech_stack.joined(", ")
    )
}
