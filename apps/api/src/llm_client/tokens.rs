//! Prompt token estimation for completion diagnostics.

use tiktoken_rs::tokenizer::{get_tokenizer, Tokenizer};
use tiktoken_rs::{
    cl100k_base_singleton, o200k_base_singleton, p50k_base_singleton, p50k_edit_singleton,
    r50k_base_singleton,
};
use tracing::info;

/// Estimated token count of `text` under `model`'s tokenizer.
///
/// BPE tables are loaded once per process and shared across calls.
pub fn estimate_tokens(text: &str, model: &str) -> usize {
    let bpe = match tokenizer_for(model) {
        Tokenizer::O200kBase => o200k_base_singleton(),
        Tokenizer::Cl100kBase => cl100k_base_singleton(),
        Tokenizer::P50kBase => p50k_base_singleton(),
        Tokenizer::P50kEdit => p50k_edit_singleton(),
        Tokenizer::R50kBase | Tokenizer::Gpt2 => r50k_base_singleton(),
    };
    let count = bpe.lock().encode_with_special_tokens(text).len();
    count
}

/// Unknown models fall back to `cl100k_base`.
fn tokenizer_for(model: &str) -> Tokenizer {
    get_tokenizer(model).unwrap_or(Tokenizer::Cl100kBase)
}

/// Remaining answer budget. Signed: prompts routinely exceed the default budget.
pub fn remaining_budget(max_tokens: u32, prompt_tokens: usize) -> i64 {
    i64::from(max_tokens) - prompt_tokens as i64
}

/// Logs engine and token estimates ahead of a completion call.
/// Nothing is truncated or rejected here.
pub fn log_token_budget(prompt: &str, model: &str, max_tokens: u32) {
    info!("Querying completion API with engine {model}");

    let prompt_tokens = estimate_tokens(prompt, model);
    let answer_tokens = remaining_budget(max_tokens, prompt_tokens);
    info!(
        engine = model,
        prompt_tokens,
        answer_tokens,
        max_tokens,
        "Tokens: {prompt_tokens} + {answer_tokens} = {max_tokens}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_budget_can_go_negative() {
        assert_eq!(remaining_budget(100, 1500), -1400);
    }

    #[test]
    fn test_remaining_budget_positive() {
        assert_eq!(remaining_budget(100, 40), 60);
    }

    #[test]
    fn test_estimate_tokens_nonzero_for_text() {
        let n = estimate_tokens("John Doe, Senior Engineer at Example Corp", "gpt-3.5-turbo");
        assert!(n > 0);
    }

    #[test]
    fn test_estimate_tokens_unknown_model_still_counts() {
        let n = estimate_tokens("hello world", "some-unreleased-model");
        assert!(n > 0);
    }

    #[test]
    fn test_unknown_model_shares_the_cl100k_table() {
        assert_eq!(tokenizer_for("gpt-3.5-turbo"), Tokenizer::Cl100kBase);
        assert_eq!(tokenizer_for("some-unreleased-model"), Tokenizer::Cl100kBase);
        assert!(std::sync::Arc::ptr_eq(
            &cl100k_base_singleton(),
            &cl100k_base_singleton()
        ));
        assert_eq!(
            estimate_tokens("Jane Roe", "gpt-3.5-turbo"),
            estimate_tokens("Jane Roe", "gpt-3.5-turbo")
        );
    }

    #[test]
    fn test_estimate_tokens_empty_is_zero() {
        assert_eq!(estimate_tokens("", "gpt-3.5-turbo"), 0);
    }
}
