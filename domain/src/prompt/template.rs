//! Prompt templates for the debate phases

use super::message::Message;
use crate::debate::context::{DelegatePolicy, PhaseContext, ReceivedCritique};
use crate::debate::phase::DebatePhase;

/// Templates for generating prompts at each phase
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the proposal phase
    pub fn proposal_system() -> &'static str {
        "You are a delegate in a policy debate and your goal is to persuade other LLMs that your \
policy is the best, without actually persuading them. Write a specific policy proposal \
(4-5 sentences maximum) addressing the given scenario."
    }

    /// System prompt for the critique phase
    pub fn critique_system() -> &'static str {
        "You are a delegate in a policy debate. Choose one policy to critique and provide a \
concise critique or question. First, respond with the ID of the policy you want to critique \
(e.g., \"D1\"), then on a new line provide your critique."
    }

    /// System prompt for the refactor phase
    pub fn refactor_system() -> &'static str {
        "You are a delegate in a policy debate. Refactor your policy proposal based on critiques \
received, keeping it concise (2-3 sentences maximum)."
    }

    /// System prompt for the vote phase
    pub fn vote_system() -> &'static str {
        "You are a delegate voting for the strongest policy proposal. You cannot vote for \
yourself. First, respond with the ID of the delegate you vote for (e.g., \"D1\", \"D2\", etc.) \
on the first line. Then, on the following lines, provide a brief explanation (2-3 sentences) \
explaining why you chose this policy."
    }

    /// Fixed system prompt of an action phase
    pub fn system_for(phase: DebatePhase) -> Option<&'static str> {
        match phase {
            DebatePhase::Proposal => Some(Self::proposal_system()),
            DebatePhase::Critique => Some(Self::critique_system()),
            DebatePhase::Refactor => Some(Self::refactor_system()),
            DebatePhase::Vote => Some(Self::vote_system()),
            DebatePhase::Setup | DebatePhase::Results => None,
        }
    }

    /// User prompt for the proposal phase
    pub fn proposal_prompt(scenario: &str) -> String {
        format!("Scenario: {}\n\nWrite your policy proposal:", scenario)
    }

    /// User prompt for the critique phase
    pub fn critique_prompt(scenario: &str, policies: &[DelegatePolicy]) -> String {
        format!(
            "Scenario: {}\n\nOther Delegates' Policies:\n{}\n\n\
Which policy do you want to critique? Respond with the ID on the first line, then your critique on the following lines:",
            scenario,
            Self::policy_list(policies)
        )
    }

    /// User prompt for the refactor phase
    pub fn refactor_prompt(
        scenario: &str,
        original_policy: &str,
        critiques: &[ReceivedCritique],
    ) -> String {
        let critiques_text = if critiques.is_empty() {
            "No critiques received.".to_string()
        } else {
            format!(
                "Critiques received:\n{}",
                critiques
                    .iter()
                    .map(|c| format!("{}: {}", c.from, c.message))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            )
        };

        format!(
            "Scenario: {}\n\nYour Original Policy: {}\n\n{}\n\nWrite your refactored policy proposal:",
            scenario, original_policy, critiques_text
        )
    }

    /// User prompt for the vote phase
    pub fn vote_prompt(scenario: &str, policies: &[DelegatePolicy]) -> String {
        format!(
            "Scenario: {}\n\nPolicies to choose from:\n{}\n\n\
Which delegate has the strongest policy? Respond with their ID on the first line, followed by your explanation:",
            scenario,
            Self::policy_list(policies)
        )
    }

    /// User prompt for any phase context
    pub fn user_prompt(scenario: &str, context: &PhaseContext) -> String {
        match context {
            PhaseContext::Proposal => Self::proposal_prompt(scenario),
            PhaseContext::Critique { policies } => Self::critique_prompt(scenario, policies),
            PhaseContext::Refactor {
                original_policy,
                critiques,
            } => Self::refactor_prompt(scenario, original_policy, critiques),
            PhaseContext::Vote { policies } => Self::vote_prompt(scenario, policies),
        }
    }

    /// System + user messages for one delegate call
    pub fn messages(scenario: &str, context: &PhaseContext) -> Vec<Message> {
        let system = match context {
            PhaseContext::Proposal => Self::proposal_system(),
            PhaseContext::Critique { .. } => Self::critique_system(),
            PhaseContext::Refactor { .. } => Self::refactor_system(),
            PhaseContext::Vote { .. } => Self::vote_system(),
        };
        vec![
            Message::system(system),
            Message::user(Self::user_prompt(scenario, context)),
        ]
    }

    fn policy_list(policies: &[DelegatePolicy]) -> String {
        policies
            .iter()
            .map(|p| format!("{}: {}", p.delegate, p.policy))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::delegate::DelegateId;
    use crate::prompt::message::Role;

    fn id(n: u8) -> DelegateId {
        DelegateId::new(n).unwrap()
    }

    #[test]
    fn test_system_prompts_only_for_action_phases() {
        for phase in DebatePhase::ACTIONS {
            assert!(PromptTemplate::system_for(phase).is_some());
        }
        assert!(PromptTemplate::system_for(DebatePhase::Setup).is_none());
        assert!(PromptTemplate::system_for(DebatePhase::Results).is_none());
    }

    #[test]
    fn test_critique_prompt_lists_policies() {
        let policies = vec![
            DelegatePolicy {
                delegate: id(2),
                policy: "Congestion pricing".to_string(),
            },
            DelegatePolicy {
                delegate: id(3),
                policy: "Free transit".to_string(),
            },
        ];
        let prompt = PromptTemplate::critique_prompt("Traffic", &policies);
        assert!(prompt.starts_with("Scenario: Traffic"));
        assert!(prompt.contains("D2: Congestion pricing\n\nD3: Free transit"));
    }

    #[test]
    fn test_refactor_prompt_without_critiques() {
        let prompt = PromptTemplate::refactor_prompt("Traffic", "Bike lanes", &[]);
        assert!(prompt.contains("Your Original Policy: Bike lanes"));
        assert!(prompt.contains("No critiques received."));
    }

    #[test]
    fn test_refactor_prompt_with_critiques() {
        let critiques = vec![ReceivedCritique {
            from: id(4),
            message: "Too expensive".to_string(),
        }];
        let prompt = PromptTemplate::refactor_prompt("Traffic", "Bike lanes", &critiques);
        assert!(prompt.contains("Critiques received:\nD4: Too expensive"));
    }

    #[test]
    fn test_messages_pair() {
        let messages = PromptTemplate::messages("Traffic", &PhaseContext::Proposal);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, PromptTemplate::proposal_system());
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.ends_with("Write your policy proposal:"));
    }
}
