//! System prompt for the LLM polish stage.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the cleanup behaviour requires
//!    editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompt directly without
//!    calling a real provider, making prompt regressions easy to catch.

/// Instruction sent with every text chunk during the polish stage.
///
/// The pipeline's deterministic passes run *before* this stage, so the model
/// only sees pre-cleaned text; its job is judgement calls the regex passes
/// cannot make (residual extraction noise, near-duplicate phrasing).
pub const CLEANUP_SYSTEM_PROMPT: &str = r#"You are a text-cleanup assistant. You receive a fragment of text extracted from a PDF document.

Follow these rules precisely:

1. PRESERVE
   - Keep ALL technical content, code snippets, identifiers, parameter names, and values exactly as written
   - Keep the original wording of substantive sentences

2. REMOVE
   - Extraction artifacts: stray page numbers, repeated headers/footers, orphaned single characters
   - Redundant repetition of the same sentence or heading
   - Navigation boilerplate (next/previous/chapter markers)

3. OUTPUT FORMAT
   - Output ONLY the cleaned text
   - Do NOT add commentary, summaries, or explanatory preamble
   - Do NOT rephrase or reformat content that is already clean"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_forbids_preamble() {
        assert!(CLEANUP_SYSTEM_PROMPT.contains("preamble"));
    }

    #[test]
    fn prompt_preserves_code() {
        assert!(CLEANUP_SYSTEM_PROMPT.contains("code"));
    }
}
