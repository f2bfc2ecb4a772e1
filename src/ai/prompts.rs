//! Prompt templates for every generation operation.

use super::{GenerationRequest, Template};
use crate::wizard::Language;

const PERSONA: &str = "You are FRONT, a customer experience (CX) expert.";

/// Render the full prompt text for a request.
pub fn render(request: &GenerationRequest) -> String {
    let body = match &request.template {
        Template::Mission { feeling, goal, problem } => format!(
            r#"{PERSONA}
Based on these three answers:
1. How the customer should feel: {feeling}
2. Business goal: {goal}
3. Main problem: {problem}

Write a "Customer Service Mission" using exactly this sentence template:
"Our mission is to make every customer feel [feeling] after contacting us, by [goal]. Our first objective is to eliminate the problem of [problem]."
Output only the mission sentence."#
        ),
        Template::JourneyAudit { channels, tools, example_response } => format!(
            r#"You are a customer journey auditor.
Analyse the contact channels ({channels}), the tools ({tools}) and this agent response: "{example_response}".
Point out exactly 3 concrete pain points, labelled "Pain #1", "Pain #2" and "Pain #3", as plain text."#
        ),
        Template::Manifesto { adjectives, form, forbidden, preferred } => format!(
            r#"{PERSONA}
Create the FRONT Communication Manifesto.
Brand adjectives: {adjectives}. Form of address: {form}. Forbidden phrase: {forbidden}. Preferred phrase: {preferred}.
Express the rules as exactly 3 numbered principles."#
        ),
        Template::VocAnalysis { raw_messages } => format!(
            r#"Analyse these customer messages: {raw_messages}
Apply the 3C analysis (Concern, Cause, Correction) and add a Systemic Action for each concern.
Return a JSON array of objects with the fields "problem", "cause", "response" and "systemAction"."#
        ),
        Template::Faq { questions } => format!(
            r#"Create an FAQ section for these questions: {questions}
For each question write a clear answer and one proactive action that would make the question unnecessary.
Return a JSON array of objects with the fields "question", "answer" and "proactiveAction"."#
        ),
        Template::ProactiveStrategy { context } => format!(
            r#"{PERSONA}
Based on the whole engagement context below, identify the 2 key proactive moments, labelled "Moment #1" and "Moment #2".
For each, describe the Problem and the Proactive Action.

Context:
{context}"#
        ),
        Template::Suggestion { field_label, context } => format!(
            r#"{PERSONA}
The user is filling in a CX workshop form. Suggest a short, concrete value for the field "{field_label}".
Take what they have already written into account:
{context}

Answer with the value only: no quotes, no explanation, at most one sentence."#
        ),
    };

    format!("{body}\n\n{}", language_instruction(request.language))
}

fn language_instruction(language: Language) -> String {
    format!("Write the answer in {}.", language.english_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(template: Template, language: Language) -> GenerationRequest {
        GenerationRequest { template, language }
    }

    #[test]
    fn test_mission_prompt_interpolates_inputs() {
        let prompt = render(&request(
            Template::Mission {
                feeling: "spokój".to_string(),
                goal: "wzrost retencji".to_string(),
                problem: "brak informacji".to_string(),
            },
            Language::Pl,
        ));

        assert!(prompt.contains("spokój"));
        assert!(prompt.contains("wzrost retencji"));
        assert!(prompt.contains("brak informacji"));
        assert!(prompt.ends_with("Write the answer in Polish."));
    }

    #[test]
    fn test_language_is_threaded_into_every_template() {
        let prompt = render(&request(
            Template::Faq { questions: "Where is my order?".to_string() },
            Language::Es,
        ));
        assert!(prompt.contains("Spanish"));
        assert!(prompt.contains("proactiveAction"));
    }

    #[test]
    fn test_suggestion_prompt_names_the_field() {
        let prompt = render(&request(
            Template::Suggestion {
                field_label: "Customer Feeling".to_string(),
                context: "{}".to_string(),
            },
            Language::En,
        ));
        assert!(prompt.contains("\"Customer Feeling\""));
    }
}
