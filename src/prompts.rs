//! The fixed instruction sent with every page image.
//!
//! Keeping the prompt here, away from the request code in
//! [`crate::pipeline::llm`], lets tests inspect it directly.

/// Instruction asking for a literal, complete transcription of one page.
pub const TRANSCRIPTION_INSTRUCTION: &str = "Transcribe, in full, all content of the provided image, \
including headers, footers, subtexts, images (as alternative text), tables and any other elements. \
Requirements: return the complete content exactly as it appears, with no explanations, \
no additional comments and no formatting delimiters such as code fences.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_covers_page_furniture() {
        for needle in ["headers", "footers", "tables", "alternative text"] {
            assert!(
                TRANSCRIPTION_INSTRUCTION.contains(needle),
                "instruction should mention {needle}"
            );
        }
    }

    #[test]
    fn instruction_forbids_commentary_and_fences() {
        assert!(TRANSCRIPTION_INSTRUCTION.contains("no additional comments"));
        assert!(TRANSCRIPTION_INSTRUCTION.contains("no formatting delimiters"));
    }
}
