use crate::domain::entities::Document;

/// Assembles the text handed to the generator for one question.
///
/// By default only the question and the end-of-turn marker are sent, even when
/// a document was selected. With grounding enabled the document text, cut to
/// `max_context_chars`, is placed in front of the question.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    eos_token: String,
    ground_in_document: bool,
    max_context_chars: usize,
}

impl PromptBuilder {
    pub fn new(eos_token: String) -> Self {
        Self {
            eos_token,
            ground_in_document: false,
            max_context_chars: 4000,
        }
    }

    pub fn with_document_grounding(mut self, max_context_chars: usize) -> Self {
        self.ground_in_document = true;
        self.max_context_chars = max_context_chars;
        self
    }

    pub fn build(&self, question: &str, document: Option<&Document>) -> String {
        match document {
            Some(doc) if self.ground_in_document && !doc.processed_text().trim().is_empty() => {
                let context = truncate_chars(doc.processed_text(), self.max_context_chars);
                format!(
                    "Context from {}:\n{}\n\nQuestion: {}{}",
                    doc.original_filename(),
                    context.trim(),
                    question,
                    self.eos_token
                )
            }
            _ => format!("{}{}", question, self.eos_token),
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewDocument;
    use crate::domain::value_objects::OwnerId;
    use chrono::Utc;

    const EOS: &str = "<|endoftext|>";

    fn document(text: &str) -> Document {
        NewDocument::new(
            OwnerId::new(1).unwrap(),
            "notes.pdf".to_string(),
            "Notes.pdf".to_string(),
            "/uploads/notes.pdf".to_string(),
            100,
            1,
            text.to_string(),
        )
        .unwrap()
        .into_persisted(1, Utc::now())
    }

    #[test]
    fn test_question_only_prompt() {
        let builder = PromptBuilder::new(EOS.to_string());
        assert_eq!(builder.build("hello", None), "hello<|endoftext|>");
    }

    #[test]
    fn test_document_is_ignored_without_grounding() {
        let builder = PromptBuilder::new(EOS.to_string());
        let doc = document("secret contents");
        assert_eq!(builder.build("hello", Some(&doc)), "hello<|endoftext|>");
    }

    #[test]
    fn test_grounded_prompt_includes_truncated_text() {
        let builder = PromptBuilder::new(EOS.to_string()).with_document_grounding(5);
        let doc = document("abcdéfghij");
        let prompt = builder.build("what?", Some(&doc));

        assert!(prompt.starts_with("Context from Notes.pdf:\nabcdé\n"));
        assert!(prompt.ends_with("Question: what?<|endoftext|>"));
        assert!(!prompt.contains("fgh"));
    }

    #[test]
    fn test_grounding_skips_empty_document_text() {
        let builder = PromptBuilder::new(EOS.to_string()).with_document_grounding(100);
        let doc = document("   ");
        assert_eq!(builder.build("hi", Some(&doc)), "hi<|endoftext|>");
    }
}
