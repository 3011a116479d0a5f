use serde::Serialize;

use crate::{config::MintCopy, constants::DEFAULT_GROUP, guards::GuardDecision};

/// One mint button of the storefront: a guard group with its copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintButton {
    pub label: String,
    pub allowed: bool,
    pub mint_text: String,
    pub button_label: String,
}

/// Buttons for the evaluated groups. The default group is only offered when
/// it is the sole group.
pub fn mint_buttons(decisions: &[GuardDecision], copy: &MintCopy) -> Vec<MintButton> {
    let only_default = decisions.len() <= 1;

    decisions
        .iter()
        .filter(|decision| only_default || decision.label != DEFAULT_GROUP)
        .map(|decision| {
            let (mint_text, button_label) = copy.texts_for(&decision.label);
            MintButton {
                label: decision.label.clone(),
                allowed: decision.allowed,
                mint_text,
                button_label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MintText,
        constants::MINT_TEXT_FALLBACK,
        guards::DenyReason,
    };

    fn copy() -> MintCopy {
        MintCopy::new(vec![MintText {
            label: "early".to_string(),
            mint_text: "Early access".to_string(),
            button_label: "Mint early".to_string(),
        }])
    }

    #[test]
    fn default_is_hidden_behind_groups() {
        let decisions = vec![
            GuardDecision::allowed("early"),
            GuardDecision::denied("public", DenyReason::NotLive { start: 10 }),
            GuardDecision::allowed(DEFAULT_GROUP),
        ];

        let buttons = mint_buttons(&decisions, &copy());

        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].label, "early");
        assert_eq!(buttons[0].mint_text, "Early access");
        assert!(buttons[0].allowed);
        assert_eq!(buttons[1].label, "public");
        assert_eq!(buttons[1].button_label, MINT_TEXT_FALLBACK);
        assert!(!buttons[1].allowed);
    }

    #[test]
    fn sole_default_is_shown() {
        let buttons = mint_buttons(&[GuardDecision::allowed(DEFAULT_GROUP)], &copy());

        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].label, DEFAULT_GROUP);
        assert_eq!(buttons[0].mint_text, MINT_TEXT_FALLBACK);
    }
}
