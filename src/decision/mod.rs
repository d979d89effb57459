//! Trading decisions from a language model
//!
//! [`parse_decision`] is the strict, pure half; [`DecisionEngine::analyze`]
//! wraps it so that every failure becomes a HOLD carrying the failure text.

mod model;

pub use model::{LanguageModel, OpenAiModel};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    BuyEntry,
    SellExit,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::BuyEntry => "BUY_ENTRY",
            Action::SellExit => "SELL_EXIT",
            Action::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

/// A model recommendation; `amount` is in native units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Decision {
    pub thought: String,
    pub action: Action,
    pub amount: f64,
}

impl Decision {
    pub fn hold(thought: impl Into<String>) -> Self {
        Self {
            thought: thought.into(),
            action: Action::Hold,
            amount: 0.0,
        }
    }
}

/// Strip Markdown code fences and decode a decision
///
/// Only fence markers are removed; any other surrounding prose makes the
/// reply invalid.
pub fn parse_decision(text: &str) -> Result<Decision, ParseError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let decision: Decision = serde_json::from_str(cleaned.trim())?;

    if decision.amount < 0.0 || !decision.amount.is_finite() {
        return Err(ParseError::NegativeAmount(decision.amount));
    }
    Ok(decision)
}

/// Prompt sent on each analysis cycle
pub fn build_prompt(balance: f64, strategy: &str) -> String {
    format!(
        r#"Role: Automated Trading System.
Current Balance: {balance:.4} ETH.
Strategy Directive: "{strategy}"

ACTIONS:
1. BUY_ENTRY (Simulates capital deployment)
2. SELL_EXIT (Simulates profit realization)
3. HOLD (No action)

Output valid JSON only.

Example:
{{
    "thought": "Market conditions optimal for entry.",
    "action": "BUY_ENTRY",
    "amount": 0.05
}}"#
    )
}

/// Turns balance and strategy text into a [`Decision`]
pub struct DecisionEngine {
    model: Option<Box<dyn LanguageModel>>,
}

impl DecisionEngine {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Engine without a model; every analysis returns "System Offline"
    pub fn offline() -> Self {
        Self { model: None }
    }

    pub fn is_online(&self) -> bool {
        self.model.is_some()
    }

    /// Never fails: model and parse errors are logged and become HOLD
    pub async fn analyze(&self, balance: f64, strategy: &str) -> Decision {
        let Some(model) = &self.model else {
            return Decision::hold("System Offline");
        };

        match Self::ask(model.as_ref(), balance, strategy).await {
            Ok(decision) => {
                tracing::info!(
                    action = %decision.action,
                    amount = decision.amount,
                    thought = %decision.thought,
                    "Model decision"
                );
                decision
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model decision failed, holding");
                Decision::hold(format!("Logic Failure: {}", e))
            }
        }
    }

    async fn ask(model: &dyn LanguageModel, balance: f64, strategy: &str) -> Result<Decision, ModelError> {
        let reply = model.complete(&build_prompt(balance, strategy)).await?;
        tracing::debug!(reply = %reply, "Model reply");
        Ok(parse_decision(&reply)?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies in order and records every prompt
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, String>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn new(replies: impl IntoIterator<Item = Result<&'static str, &'static str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(reply: &'static str) -> Self {
            Self::new([Ok(reply)])
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(e)) => Err(ModelError::Request(e)),
                None => Err(ModelError::EmptyResponse),
            }
        }
    }
}
