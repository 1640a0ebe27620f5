//! Document generation wizard
//!
//! The wizard is a single linear index over a step list computed once from the
//! template: one step per question, the free-text modifications step, an
//! optional signature step, and the final generate/download step. Navigation
//! only ever moves the index by one in either direction.

use super::document::{GeneratedDocument, GenerationRequest};
use super::signature::SignatureRole;
use super::template::{Question, QuestionKind, TemplateConfig, TemplateError};
use crate::backend::{DocumentOpener, GenerationClient, GenerationError};
use crate::registry::{RegistryError, TemplateRegistry};
use std::collections::HashMap;

/// One screen of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Index into the template's question list
    Question(usize),
    Modifications,
    /// Primary capture, plus secondary when `dual`
    Signatures { dual: bool },
    /// Generate call-to-action, or download once a document exists
    Final,
}

/// Build the ordered step list for a template
pub fn compute_steps(config: &TemplateConfig) -> Vec<Step> {
    let mut steps: Vec<Step> = (0..config.questions.len()).map(Step::Question).collect();
    steps.push(Step::Modifications);
    if config.requires_signature {
        steps.push(Step::Signatures {
            dual: config.dual_party_signature,
        });
    }
    steps.push(Step::Final);
    steps
}

/// Everything the user has entered in this session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub current_step_index: usize,
    pub answers: HashMap<String, String>,
    pub modifications: String,
    pub signatures: HashMap<SignatureRole, String>,
    pub generated_document: Option<GeneratedDocument>,
}

/// Result of a generate attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Not on the final step, already generating, or already generated
    Skipped,
    Generated(GeneratedDocument),
    Failed(GenerationError),
}

/// Reasons a wizard cannot be opened
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Document type not found: {0}")]
    TemplateNotFound(String),

    #[error("Document type {id} is misconfigured: {source}")]
    InvalidTemplate {
        id: String,
        #[source]
        source: TemplateError,
    },
}

/// Drives one wizard session for one template
#[derive(Debug, Clone)]
pub struct WizardController {
    template_id: String,
    config: TemplateConfig,
    steps: Vec<Step>,
    state: WizardState,
    generating: bool,
}

impl WizardController {
    pub fn new(template_id: impl Into<String>, config: TemplateConfig) -> Self {
        let steps = compute_steps(&config);
        Self {
            template_id: template_id.into(),
            config,
            steps,
            state: WizardState::default(),
            generating: false,
        }
    }

    /// Open a wizard for a registered template
    pub fn from_registry(registry: &TemplateRegistry, id: &str) -> Result<Self, WizardError> {
        let template = registry.get(id).map_err(|e| match e {
            RegistryError::NotFound(id) => WizardError::TemplateNotFound(id),
            other => WizardError::TemplateNotFound(other.to_string()),
        })?;
        template
            .config
            .validate()
            .map_err(|source| WizardError::InvalidTemplate {
                id: id.to_string(),
                source,
            })?;
        Ok(Self::new(id, template.config.clone()))
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn current_index(&self) -> usize {
        self.state.current_step_index
    }

    pub fn current_step(&self) -> Step {
        self.steps[self.state.current_step_index]
    }

    pub fn is_first_step(&self) -> bool {
        self.state.current_step_index == 0
    }

    pub fn is_final_step(&self) -> bool {
        self.state.current_step_index + 1 == self.total_steps()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn generated_document(&self) -> Option<&GeneratedDocument> {
        self.state.generated_document.as_ref()
    }

    /// Question shown on the current step, if it is a question step
    pub fn current_question(&self) -> Option<&Question> {
        match self.current_step() {
            Step::Question(i) => self.config.questions.get(i),
            _ => None,
        }
    }

    /// Fraction of the wizard reached, counting the current step
    pub fn progress(&self) -> f64 {
        (self.state.current_step_index + 1) as f64 / self.total_steps() as f64
    }

    pub fn progress_percent(&self) -> u16 {
        (self.progress() * 100.0).round() as u16
    }

    /// Card header for the current step
    pub fn step_title(&self) -> String {
        match self.current_step() {
            Step::Question(i) => format!("Question {}", i + 1),
            Step::Modifications => "Modifications".to_string(),
            Step::Signatures { .. } => "Signatures".to_string(),
            Step::Final => "Generate Document".to_string(),
        }
    }

    pub fn go_next(&mut self) {
        if self.state.current_step_index + 1 < self.total_steps() {
            self.state.current_step_index += 1;
        }
    }

    pub fn go_previous(&mut self) {
        if self.state.current_step_index > 0 {
            self.state.current_step_index -= 1;
        }
    }

    pub fn answer(&self, question_id: &str) -> &str {
        self.state
            .answers
            .get(question_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_answer(&mut self, question_id: &str, value: impl Into<String>) {
        self.state
            .answers
            .insert(question_id.to_string(), value.into());
    }

    /// Step a choice question to its next (or previous) option
    pub fn cycle_choice(&mut self, question_id: &str, forward: bool) {
        let Some(question) = self.config.question(question_id) else {
            return;
        };
        if question.kind != QuestionKind::Choice || question.choices.is_empty() {
            return;
        }
        let count = question.choices.len();
        let current = question
            .choices
            .iter()
            .position(|c| c == self.answer(question_id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        let value = question.choices[next].clone();
        self.set_answer(question_id, value);
    }

    pub fn set_modifications(&mut self, text: impl Into<String>) {
        self.state.modifications = text.into();
    }

    pub fn modifications(&self) -> &str {
        &self.state.modifications
    }

    /// Store a captured signature. An empty payload clears the role.
    pub fn set_signature(&mut self, role: SignatureRole, payload: impl Into<String>) {
        let payload = payload.into();
        if payload.is_empty() {
            self.state.signatures.remove(&role);
        } else {
            self.state.signatures.insert(role, payload);
        }
    }

    pub fn signature(&self, role: SignatureRole) -> Option<&str> {
        self.state.signatures.get(&role).map(String::as_str)
    }

    /// Roles the signature step presents
    pub fn signature_roles(&self) -> Vec<SignatureRole> {
        match self.config.signer_count() {
            0 => Vec::new(),
            1 => vec![SignatureRole::Primary],
            _ => vec![SignatureRole::Primary, SignatureRole::Secondary],
        }
    }

    /// Required questions still without a non-blank answer. Informational only.
    pub fn missing_required(&self) -> Vec<&Question> {
        self.config
            .questions
            .iter()
            .filter(|q| q.required && self.answer(&q.id).trim().is_empty())
            .collect()
    }

    pub fn can_generate(&self) -> bool {
        self.is_final_step() && !self.generating && self.state.generated_document.is_none()
    }

    /// Enter the generating sub-state and build the outgoing request.
    ///
    /// Returns `None` when generation is not allowed right now, so a second
    /// trigger while a call is outstanding issues nothing.
    pub fn begin_generation(&mut self) -> Option<GenerationRequest> {
        if !self.can_generate() {
            return None;
        }
        self.generating = true;
        tracing::info!(template = %self.template_id, "Generating document");

        Some(GenerationRequest {
            document_type: self.config.title.clone(),
            answers: self.state.answers.clone(),
            modifications: self.state.modifications.clone(),
            signatures: self.state.signatures.clone(),
        })
    }

    /// Leave the generating sub-state with the backend's answer.
    ///
    /// A result arriving when no call is outstanding (e.g. after a reset) is dropped.
    pub fn complete_generation(
        &mut self,
        result: Result<GeneratedDocument, GenerationError>,
    ) -> GenerateOutcome {
        if !self.generating {
            tracing::debug!("Dropping stale generation result");
            return GenerateOutcome::Skipped;
        }
        self.generating = false;

        match result {
            Ok(document) => {
                tracing::info!(document_id = %document.id, "Document generated");
                self.state.generated_document = Some(document.clone());
                GenerateOutcome::Generated(document)
            }
            Err(err) => {
                tracing::warn!("Document generation failed: {err}");
                GenerateOutcome::Failed(err)
            }
        }
    }

    /// Issue the generation call and wait for it
    pub async fn generate(
        &mut self,
        client: &dyn GenerationClient,
        token: Option<String>,
    ) -> GenerateOutcome {
        let Some(request) = self.begin_generation() else {
            return GenerateOutcome::Skipped;
        };
        let result = client.generate(request, token).await;
        self.complete_generation(result)
    }

    /// Hand the download locator to `opener`. `Ok(false)` when there is nothing to download.
    pub fn download(&self, opener: &dyn DocumentOpener) -> anyhow::Result<bool> {
        let Some(document) = self.state.generated_document.as_ref() else {
            return Ok(false);
        };
        opener.open(&document.download_url)?;
        tracing::info!(document_id = %document.id, "Opened download link");
        Ok(true)
    }

    /// Start over with a blank session for the same template
    pub fn reset(&mut self) {
        self.state = WizardState::default();
        self.generating = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockDocumentOpener, MockGenerationClient};
    use crate::state::template::Question;
    use chrono::Utc;

    fn config(questions: usize, requires_signature: bool, dual: bool) -> TemplateConfig {
        TemplateConfig {
            title: "Test Document".to_string(),
            description: "For tests".to_string(),
            questions: (0..questions)
                .map(|i| Question::short_text(&format!("q{i}"), &format!("Question {i}"), true))
                .collect(),
            requires_signature,
            dual_party_signature: dual,
        }
    }

    fn wizard(questions: usize, requires_signature: bool, dual: bool) -> WizardController {
        WizardController::new("test", config(questions, requires_signature, dual))
    }

    fn document(id: &str) -> GeneratedDocument {
        GeneratedDocument {
            id: id.to_string(),
            content: "preview".to_string(),
            download_url: format!("https://example.test/download/{id}"),
            created_at: Utc::now(),
        }
    }

    fn to_final(wizard: &mut WizardController) {
        for _ in 0..wizard.total_steps() {
            wizard.go_next();
        }
    }

    mod steps {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_total_steps_formula() {
            for questions in 0..4 {
                for (sig, dual) in [(false, false), (true, false), (true, true)] {
                    let w = wizard(questions, sig, dual);
                    let expected = questions + 1 + usize::from(sig) + 1;
                    assert_eq!(w.total_steps(), expected);
                }
            }
        }

        #[test]
        fn test_step_list_order() {
            let steps = compute_steps(&config(2, true, true));
            assert_eq!(
                steps,
                vec![
                    Step::Question(0),
                    Step::Question(1),
                    Step::Modifications,
                    Step::Signatures { dual: true },
                    Step::Final,
                ]
            );
        }

        #[test]
        fn test_two_questions_dual_signature() {
            let mut w = wizard(2, true, true);
            assert_eq!(w.total_steps(), 5);
            for _ in 0..3 {
                w.go_next();
            }
            assert_eq!(w.current_step(), Step::Signatures { dual: true });
            assert_eq!(
                w.signature_roles(),
                vec![SignatureRole::Primary, SignatureRole::Secondary]
            );
        }

        #[test]
        fn test_single_signature_has_one_role() {
            let w = wizard(1, true, false);
            assert_eq!(w.signature_roles(), vec![SignatureRole::Primary]);
        }

        #[test]
        fn test_zero_questions_no_signature() {
            let mut w = wizard(0, false, false);
            assert_eq!(w.total_steps(), 2);
            assert_eq!(w.current_step(), Step::Modifications);
            w.go_next();
            assert_eq!(w.current_step(), Step::Final);
            assert!(w.is_final_step());
        }

        #[test]
        fn test_step_titles() {
            let mut w = wizard(1, true, false);
            assert_eq!(w.step_title(), "Question 1");
            w.go_next();
            assert_eq!(w.step_title(), "Modifications");
            w.go_next();
            assert_eq!(w.step_title(), "Signatures");
            w.go_next();
            assert_eq!(w.step_title(), "Generate Document");
        }

        #[test]
        fn test_current_question() {
            let mut w = wizard(2, false, false);
            assert_eq!(w.current_question().unwrap().id, "q0");
            w.go_next();
            assert_eq!(w.current_question().unwrap().id, "q1");
            w.go_next();
            assert!(w.current_question().is_none());
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_previous_at_start_is_noop() {
            let mut w = wizard(2, false, false);
            w.go_previous();
            w.go_previous();
            assert_eq!(w.current_index(), 0);
        }

        #[test]
        fn test_next_at_end_is_noop() {
            let mut w = wizard(2, true, false);
            to_final(&mut w);
            let last = w.total_steps() - 1;
            assert_eq!(w.current_index(), last);
            w.go_next();
            assert_eq!(w.current_index(), last);
        }

        #[test]
        fn test_index_stays_in_range_for_any_sequence() {
            let mut w = wizard(3, true, true);
            // Deterministic pseudo-random walk
            let mut seed: u32 = 0x2545_f491;
            for _ in 0..500 {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                if seed % 3 == 0 {
                    w.go_previous();
                } else {
                    w.go_next();
                }
                assert!(w.current_index() < w.total_steps());
            }
        }

        #[test]
        fn test_next_does_not_validate_required_answers() {
            let mut w = wizard(2, false, false);
            w.go_next();
            w.go_next();
            assert_eq!(w.current_step(), Step::Modifications);
            assert_eq!(w.missing_required().len(), 2);
        }

        #[test]
        fn test_progress() {
            let mut w = wizard(2, true, false);
            assert!((w.progress() - 0.2).abs() < f64::EPSILON);
            to_final(&mut w);
            assert!((w.progress() - 1.0).abs() < f64::EPSILON);
            assert_eq!(w.progress_percent(), 100);
        }
    }

    mod inputs {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_answer_idempotent_and_last_write_wins() {
            let mut w = wizard(1, false, false);
            w.set_answer("q0", "A");
            w.set_answer("q0", "A");
            assert_eq!(w.state().answers.len(), 1);
            assert_eq!(w.answer("q0"), "A");
            w.set_answer("q0", "B");
            assert_eq!(w.answer("q0"), "B");
        }

        #[test]
        fn test_set_modifications_replaces() {
            let mut w = wizard(0, false, false);
            w.set_modifications("first");
            w.set_modifications("second");
            assert_eq!(w.modifications(), "second");
        }

        #[test]
        fn test_empty_signature_clears_role() {
            let mut w = wizard(0, true, true);
            w.set_signature(SignatureRole::Primary, "data:one");
            w.set_signature(SignatureRole::Secondary, "data:two");
            w.set_signature(SignatureRole::Primary, "");
            assert_eq!(w.signature(SignatureRole::Primary), None);
            assert_eq!(w.signature(SignatureRole::Secondary), Some("data:two"));
        }

        #[test]
        fn test_cycle_choice() {
            let mut config = config(0, false, false);
            config
                .questions
                .push(Question::choice("term", "Term", &["a", "b", "c"], false));
            let mut w = WizardController::new("t", config);

            w.cycle_choice("term", true);
            assert_eq!(w.answer("term"), "a");
            w.cycle_choice("term", false);
            assert_eq!(w.answer("term"), "c");
            w.cycle_choice("term", true);
            assert_eq!(w.answer("term"), "a");
        }

        #[test]
        fn test_cycle_choice_ignores_text_questions() {
            let mut w = wizard(1, false, false);
            w.cycle_choice("q0", true);
            assert_eq!(w.answer("q0"), "");
        }

        #[test]
        fn test_missing_required_ignores_blank_answers() {
            let mut w = wizard(2, false, false);
            w.set_answer("q0", "  ");
            w.set_answer("q1", "filled");
            let missing: Vec<_> = w.missing_required().iter().map(|q| q.id.clone()).collect();
            assert_eq!(missing, vec!["q0".to_string()]);
        }
    }

    mod generation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_begin_only_on_final_step() {
            let mut w = wizard(1, false, false);
            assert!(w.begin_generation().is_none());
            assert!(!w.is_generating());
            to_final(&mut w);
            assert!(w.begin_generation().is_some());
            assert!(w.is_generating());
        }

        #[test]
        fn test_second_trigger_while_pending_issues_nothing() {
            let mut w = wizard(0, false, false);
            to_final(&mut w);
            assert!(w.begin_generation().is_some());
            assert!(w.begin_generation().is_none());
        }

        #[test]
        fn test_request_carries_answers_verbatim() {
            let mut w = WizardController::new(
                "t",
                TemplateConfig {
                    questions: vec![Question::short_text("a", "A", true)],
                    ..config(0, false, false)
                },
            );
            w.set_answer("a", "X");
            w.set_modifications("extra clause");
            to_final(&mut w);

            let request = w.begin_generation().unwrap();
            assert_eq!(request.document_type, "Test Document");
            assert_eq!(
                request.answers,
                HashMap::from([("a".to_string(), "X".to_string())])
            );
            assert_eq!(request.modifications, "extra clause");
            assert!(request.signatures.is_empty());
        }

        #[tokio::test]
        async fn test_generate_success_stores_document() {
            let mut client = MockGenerationClient::new();
            client
                .expect_generate()
                .times(1)
                .returning(|_, _| Ok(document("doc_1")));

            let mut w = wizard(0, false, false);
            to_final(&mut w);
            let outcome = w.generate(&client, Some("token".to_string())).await;

            match outcome {
                GenerateOutcome::Generated(doc) => assert_eq!(doc.id, "doc_1"),
                other => panic!("expected document, got {other:?}"),
            }
            assert_eq!(w.generated_document().unwrap().id, "doc_1");
            assert!(!w.is_generating());
        }

        #[tokio::test]
        async fn test_generate_twice_calls_backend_once() {
            let mut client = MockGenerationClient::new();
            client
                .expect_generate()
                .times(1)
                .returning(|_, _| Ok(document("doc_1")));

            let mut w = wizard(1, true, false);
            to_final(&mut w);
            w.generate(&client, Some("token".to_string())).await;
            let second = w.generate(&client, Some("token".to_string())).await;

            assert_eq!(second, GenerateOutcome::Skipped);
        }

        #[tokio::test]
        async fn test_request_sent_to_backend_includes_answer() {
            let mut client = MockGenerationClient::new();
            client
                .expect_generate()
                .withf(|request, token| {
                    request.answers.get("a").map(String::as_str) == Some("X")
                        && token.as_deref() == Some("token")
                })
                .times(1)
                .returning(|_, _| Ok(document("doc_1")));

            let mut w = WizardController::new(
                "t",
                TemplateConfig {
                    questions: vec![Question::short_text("a", "A", true)],
                    ..config(0, false, false)
                },
            );
            w.set_answer("a", "X");
            to_final(&mut w);
            let outcome = w.generate(&client, Some("token".to_string())).await;
            assert!(matches!(outcome, GenerateOutcome::Generated(_)));
        }

        #[tokio::test]
        async fn test_auth_failure_is_distinct_and_leaves_no_document() {
            let mut client = MockGenerationClient::new();
            client
                .expect_generate()
                .times(1)
                .returning(|_, _| Err(GenerationError::AuthenticationRequired));

            let mut w = wizard(0, false, false);
            to_final(&mut w);
            let outcome = w.generate(&client, None).await;

            match outcome {
                GenerateOutcome::Failed(err) => assert!(err.requires_authentication()),
                other => panic!("expected failure, got {other:?}"),
            }
            assert!(w.generated_document().is_none());
            assert!(!w.is_generating());
        }

        #[tokio::test]
        async fn test_generic_failure_permits_retry() {
            let mut client = MockGenerationClient::new();
            let mut seq = mockall::Sequence::new();
            client
                .expect_generate()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| {
                    Err(GenerationError::Http {
                        status: 500,
                        message: "boom".to_string(),
                    })
                });
            client
                .expect_generate()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(document("doc_2")));

            let mut w = wizard(0, false, false);
            to_final(&mut w);

            let first = w.generate(&client, Some("t".to_string())).await;
            match first {
                GenerateOutcome::Failed(err) => assert!(!err.requires_authentication()),
                other => panic!("expected failure, got {other:?}"),
            }
            assert!(w.generated_document().is_none());

            let second = w.generate(&client, Some("t".to_string())).await;
            assert!(matches!(second, GenerateOutcome::Generated(_)));
        }

        #[test]
        fn test_stale_completion_after_reset_is_dropped() {
            let mut w = wizard(0, false, false);
            to_final(&mut w);
            w.begin_generation().unwrap();
            w.reset();

            let outcome = w.complete_generation(Ok(document("doc_late")));
            assert_eq!(outcome, GenerateOutcome::Skipped);
            assert!(w.generated_document().is_none());
            assert_eq!(w.current_index(), 0);
        }
    }

    mod download {
        use super::*;

        #[test]
        fn test_download_without_document_is_noop() {
            let mut opener = MockDocumentOpener::new();
            opener.expect_open().times(0);

            let w = wizard(0, false, false);
            assert!(!w.download(&opener).unwrap());
        }

        #[test]
        fn test_download_opens_locator() {
            let mut opener = MockDocumentOpener::new();
            opener
                .expect_open()
                .withf(|url| url == "https://example.test/download/doc_1")
                .times(1)
                .returning(|_| Ok(()));

            let mut w = wizard(0, false, false);
            to_final(&mut w);
            w.begin_generation().unwrap();
            w.complete_generation(Ok(document("doc_1")));

            assert!(w.download(&opener).unwrap());
        }

        #[test]
        fn test_download_propagates_opener_failure() {
            let mut opener = MockDocumentOpener::new();
            opener
                .expect_open()
                .returning(|_| Err(anyhow::anyhow!("no clipboard")));

            let mut w = wizard(0, false, false);
            to_final(&mut w);
            w.begin_generation().unwrap();
            w.complete_generation(Ok(document("doc_1")));

            assert!(w.download(&opener).is_err());
        }
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;
        use crate::registry::TemplateRegistry;

        #[test]
        fn test_from_registry_unknown_id() {
            let registry = TemplateRegistry::with_builtin();
            let err = WizardController::from_registry(&registry, "nope").unwrap_err();
            assert_eq!(err, WizardError::TemplateNotFound("nope".to_string()));
        }

        #[test]
        fn test_from_registry_builtin() {
            let registry = TemplateRegistry::with_builtin();
            let w = WizardController::from_registry(&registry, "rent-agreement").unwrap();
            assert_eq!(w.total_steps(), 6 + 1 + 1 + 1);
            assert_eq!(w.template_id(), "rent-agreement");
        }

        #[test]
        fn test_reset_clears_everything() {
            let mut w = wizard(1, true, false);
            w.set_answer("q0", "x");
            w.set_signature(SignatureRole::Primary, "sig");
            to_final(&mut w);
            w.reset();
            assert_eq!(w.state(), &WizardState::default());
        }
    }
}
