pub mod prompt_builder;
pub mod text_sanitizer;

pub use prompt_builder::PromptBuilder;
pub use text_sanitizer::strip_nul;
