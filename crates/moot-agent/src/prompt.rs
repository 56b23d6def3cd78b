//! Prompt construction for participants and judges
//!
//! All prompts are built in code from plain string templates; custom persona
//! backgrounds arrive as already-loaded values. Participants are asked to end
//! with a tagged `FINAL ANSWER:` line so their answer can be lifted into
//! message metadata without interpreting the content.

use moot_core::{Message, Role};

/// Tag participants use to declare their answer
pub const FINAL_ANSWER_TAG: &str = "FINAL ANSWER:";

/// Tag the adjudicator uses to declare its verdict
pub const VERDICT_TAG: &str = "VERDICT:";

/// Tags validators use to cast a ballot
pub const CHOICE_TAG: &str = "CHOICE:";
pub const CONFIDENCE_TAG: &str = "CONFIDENCE:";

/// Build the system prompt for a role, weaving in an optional persona
pub fn system_prompt(role: Role, background: Option<&str>) -> String {
    let persona = background
        .map(|b| format!("Your background: {}\n\n", b))
        .unwrap_or_default();
    let charge = match role {
        Role::Reflector => {
            "You reason about a question alone, then critically re-examine your \
             own analysis in later rounds, correcting mistakes you find."
        }
        Role::Solver => {
            "You propose a complete, worked solution and defend or repair it \
             when the critic pushes back."
        }
        Role::Critic => {
            "You scrutinize the solver's reasoning, hunting for errors, gaps, \
             and unjustified steps. Concede points that hold up."
        }
        Role::Expert => {
            "You contribute your own perspective to a panel working the same \
             question, building on or disputing the other panelists."
        }
    };
    format!(
        "{}You are taking part in a structured debate. {} Always finish \
         your message with a line of the form `{} <your current answer>`.",
        persona, charge, FINAL_ANSWER_TAG
    )
}

/// Opening-round prompt: the bare question
pub fn opening_prompt(question: &str) -> String {
    format!(
        "Question:\n{}\n\nGive your initial analysis and answer.",
        question
    )
}

/// Reflector follow-up: re-examine the previous analysis
pub fn verification_prompt(question: &str, previous: &str) -> String {
    format!(
        "Question:\n{}\n\nYour previous analysis:\n{}\n\nVerify this analysis \
         step by step. Fix any errors you find and restate your answer.",
        question, previous
    )
}

/// Dual-topology follow-up: respond to the opponent's last message
pub fn rebuttal_prompt(question: &str, opponent: &str) -> String {
    format!(
        "Question:\n{}\n\nYour opponent's last message:\n{}\n\nRespond to it \
         directly, then restate your answer.",
        question, opponent
    )
}

/// Multi-topology follow-up: build on the other panelists' contributions
pub fn panel_prompt(question: &str, contributions: &[Message]) -> String {
    let others = contributions
        .iter()
        .map(|m| format!("Agent {}:\n{}", m.sender, m.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Question:\n{}\n\nThe other panelists said:\n{}\n\nWeigh their \
         reasoning against your own and give your updated answer.",
        question, others
    )
}

/// Summary-round instruction appended to whichever prompt applies
pub fn summary_instruction() -> &'static str {
    "This is the final consolidation round: state your single best answer and \
     the shortest argument that justifies it."
}

/// Adjudicator system prompt
pub fn adjudicator_system() -> &'static str {
    "You are a fair and objective judge. Compare the final answers from a \
     debate, weigh the strength of each participant's reasoning, and decide \
     which answer is correct."
}

/// Adjudicator user prompt over the debate transcript and final answers
pub fn adjudicator_prompt(transcript: &str, answers: &str) -> String {
    format!(
        "Debate transcript:\n{}\n\nFinal answers:\n\n{}\n\nAnalyze each \
         answer against the reasoning in the transcript, then declare the \
         best one on a line of the form `{} <answer>`, followed by your \
         rationale.",
        transcript, answers, VERDICT_TAG
    )
}

/// Validator system prompt
pub fn validator_system() -> &'static str {
    "You are one validator on a judging panel. Vote for the candidate answer \
     best supported by the debate."
}

/// Validator user prompt over numbered candidates
pub fn validator_prompt(candidates: &[String]) -> String {
    let listed = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Candidate answers:\n{}\n\nReply with `{} <number>` and \
         `{} <0.0-1.0>` on separate lines, then a one-sentence reason.",
        listed, CHOICE_TAG, CONFIDENCE_TAG
    )
}

/// Render messages as a readable transcript block
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("[round {}] {}: {}", m.round, m.sender, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find `tag` at the start of a line and return the rest of that line
pub fn parse_tagged_line(text: &str, tag: &str) -> Option<String> {
    text.lines().rev().find_map(|line| {
        let line = line.trim().trim_start_matches('`');
        line.to_uppercase()
            .starts_with(&tag.to_uppercase())
            .then(|| line[tag.len()..].trim().trim_end_matches('`').to_string())
            .filter(|rest| !rest.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_line() {
        let text = "Some reasoning here.\nFINAL ANSWER: 42\n";
        assert_eq!(
            parse_tagged_line(text, FINAL_ANSWER_TAG),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_parse_takes_last_occurrence() {
        let text = "FINAL ANSWER: 3\nwait, on reflection:\nFINAL ANSWER: 4";
        assert_eq!(
            parse_tagged_line(text, FINAL_ANSWER_TAG),
            Some("4".to_string())
        );
    }

    #[test]
    fn test_parse_is_case_insensitive_and_strips_backticks() {
        assert_eq!(
            parse_tagged_line("`verdict: B`", VERDICT_TAG),
            Some("B".to_string())
        );
        assert_eq!(parse_tagged_line("no tags here", VERDICT_TAG), None);
        assert_eq!(parse_tagged_line("VERDICT:", VERDICT_TAG), None);
    }

    #[test]
    fn test_panel_prompt_names_contributors() {
        let contributions = vec![
            Message::new("I think A", "alpha", "all", 0),
            Message::new("I think B", "beta", "all", 0),
        ];
        let prompt = panel_prompt("q", &contributions);
        assert!(prompt.contains("Agent alpha:"));
        assert!(prompt.contains("Agent beta:"));
    }
}
