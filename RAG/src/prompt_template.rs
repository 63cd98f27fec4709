use crate::models::RetrievedDocument;
use anyhow::{bail, Result};

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

const ANIME_TEMPLATE: &str = r#"You are an expert anime recommender. Help the user find anime that fits their preferences.

Using the context below, write a detailed and engaging answer to the user's question.

Suggest exactly three anime titles. For each one include:
1. The anime title.
2. A short plot summary (2-3 sentences).
3. Why it matches what the user asked for.

Present the recommendations as a numbered list.

If the context does not contain a good answer, say you don't know. Do not make anything up.

Context:
{context}

User's question:
{question}

Your answer:"#;

/// Second pipeline stage: turns the question and retrieved documents into a prompt.
pub trait PromptRenderer: Send + Sync {
    fn render(&self, question: &str, documents: &[RetrievedDocument]) -> Result<String>;
}

/// Fixed text with `{context}` and `{question}` slots.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for slot in [CONTEXT_SLOT, QUESTION_SLOT] {
            if !template.contains(slot) {
                bail!("prompt template is missing the {slot} slot");
            }
        }
        Ok(Self { template })
    }

    pub fn anime() -> Result<Self> {
        Self::new(ANIME_TEMPLATE)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Joins document contents with blank lines, in retrieval order.
pub fn format_context(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl PromptRenderer for PromptTemplate {
    fn render(&self, question: &str, documents: &[RetrievedDocument]) -> Result<String> {
        let context = format_context(documents);
        // Context first so a question containing "{context}" is left alone.
        let (head, tail) = self
            .template
            .split_once(QUESTION_SLOT)
            .unwrap_or((self.template.as_str(), ""));
        let head = head.replace(CONTEXT_SLOT, &context);
        let tail = tail.replace(CONTEXT_SLOT, &context).replace(QUESTION_SLOT, question);
        Ok(format!("{head}{question}{tail}"))
    }
}
