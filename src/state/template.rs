//! Document template data model
//!
//! A template describes one document type: the ordered questions the wizard
//! asks and whether the finished document needs one or two signatures.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a question collects its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    #[default]
    ShortText,
    LongText,
    Choice,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShortText => "Text",
            Self::LongText => "Long text",
            Self::Choice => "Choice",
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::LongText)
    }
}

/// A single wizard question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    pub required: bool,
}

impl Question {
    pub fn short_text(id: &str, prompt: &str, required: bool) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::ShortText,
            choices: Vec::new(),
            required,
        }
    }

    pub fn long_text(id: &str, prompt: &str, required: bool) -> Self {
        Self {
            kind: QuestionKind::LongText,
            ..Self::short_text(id, prompt, required)
        }
    }

    pub fn choice(id: &str, prompt: &str, choices: &[&str], required: bool) -> Self {
        Self {
            kind: QuestionKind::Choice,
            choices: choices.iter().map(|c| c.to_string()).collect(),
            ..Self::short_text(id, prompt, required)
        }
    }
}

/// Errors raised when a template definition is inconsistent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("dual-party signature requires signatures to be enabled")]
    DualSignatureWithoutSignature,

    #[error("question {index} has an empty id")]
    EmptyQuestionId { index: usize },

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("choice question {0} has no choices")]
    ChoiceWithoutOptions(String),

    #[error("question {0} lists choices but is not a choice question")]
    UnexpectedChoices(String),
}

/// The document type definition the wizard is driven by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub requires_signature: bool,
    #[serde(default)]
    pub dual_party_signature: bool,
}

impl TemplateConfig {
    /// Check the structural invariants of the template
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.title.trim().is_empty() {
            return Err(TemplateError::MissingField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(TemplateError::MissingField("description"));
        }
        if self.dual_party_signature && !self.requires_signature {
            return Err(TemplateError::DualSignatureWithoutSignature);
        }

        let mut seen = HashSet::new();
        for (index, question) in self.questions.iter().enumerate() {
            if question.id.trim().is_empty() {
                return Err(TemplateError::EmptyQuestionId { index });
            }
            if !seen.insert(question.id.as_str()) {
                return Err(TemplateError::DuplicateQuestionId(question.id.clone()));
            }
            match question.kind {
                QuestionKind::Choice if question.choices.is_empty() => {
                    return Err(TemplateError::ChoiceWithoutOptions(question.id.clone()));
                }
                QuestionKind::ShortText | QuestionKind::LongText
                    if !question.choices.is_empty() =>
                {
                    return Err(TemplateError::UnexpectedChoices(question.id.clone()));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Number of signers the template asks for
    pub fn signer_count(&self) -> usize {
        match (self.requires_signature, self.dual_party_signature) {
            (false, _) => 0,
            (true, false) => 1,
            (true, true) => 2,
        }
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Default question given to templates authored without any
pub fn default_question() -> Question {
    Question::short_text("basic_info", "Basic Information", true)
}

/// Turn a prompt into a question id (`Landlord's Full Name` -> `landlords_full_name`).
/// Letters outside ASCII are kept, lowercased.
pub fn slugify_question_id(prompt: &str) -> String {
    let mut id = String::new();
    let mut pending_sep = false;
    for c in prompt.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !id.is_empty() {
                id.push('_');
            }
            pending_sep = false;
            id.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' || c == '/' {
            pending_sep = true;
        }
    }
    id
}

/// Parse the admin question block, one question per line.
///
/// - leading `*` marks the question required
/// - trailing `[long]` makes it multi-line
/// - trailing `{a, b, c}` makes it a choice between `a`, `b` and `c`
///
/// An empty block yields [`default_question`].
pub fn parse_question_lines(block: &str) -> Vec<Question> {
    let mut questions: Vec<Question> = Vec::new();

    for raw in block.lines() {
        let mut line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let required = line.starts_with('*');
        if required {
            line = line[1..].trim_start();
        }

        let mut kind = QuestionKind::ShortText;
        let mut choices = Vec::new();

        if let Some(stripped) = line.strip_suffix("[long]") {
            kind = QuestionKind::LongText;
            line = stripped.trim_end();
        } else if line.ends_with('}') {
            if let Some(open) = line.rfind('{') {
                choices = line[open + 1..line.len() - 1]
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
                if !choices.is_empty() {
                    kind = QuestionKind::Choice;
                }
                line = line[..open].trim_end();
            }
        }

        if line.is_empty() {
            continue;
        }
        // Prompts made only of symbols still need an id
        let mut id = slugify_question_id(line);
        if id.is_empty() {
            id = format!("question_{}", questions.len() + 1);
        }
        // Keep ids unique within the block
        let base = id.clone();
        let mut n = 2;
        while questions.iter().any(|q| q.id == id) {
            id = format!("{base}_{n}");
            n += 1;
        }

        questions.push(Question {
            id,
            prompt: line.to_string(),
            kind,
            choices,
            required,
        });
    }

    if questions.is_empty() {
        questions.push(default_question());
    }
    questions
}

/// Render questions in the syntax [`parse_question_lines`] reads
pub fn format_question_lines(questions: &[Question]) -> String {
    questions
        .iter()
        .map(|q| {
            let marker = if q.required { "*" } else { "" };
            match q.kind {
                QuestionKind::ShortText => format!("{marker}{}", q.prompt),
                QuestionKind::LongText => format!("{marker}{} [long]", q.prompt),
                QuestionKind::Choice => {
                    format!("{marker}{} {{{}}}", q.prompt, q.choices.join(", "))
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
