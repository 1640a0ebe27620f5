//! In-memory catalogue of document templates
//!
//! Seeded with the built-in document types; the admin screen can add,
//! edit and remove entries for the lifetime of the process.

use crate::state::{default_question, Question, TemplateConfig, TemplateError};

/// Categories offered when authoring a template
pub const CATEGORIES: &[&str] = &["Legal", "Business", "Employment", "Financial"];

/// A catalogue entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTemplate {
    pub id: String,
    pub category: String,
    pub price: String,
    pub config: TemplateConfig,
}

impl DocumentTemplate {
    pub fn title(&self) -> &str {
        &self.config.title
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Document type not found: {0}")]
    NotFound(String),

    #[error("A document type with id {0} already exists")]
    DuplicateId(String),

    #[error(transparent)]
    Invalid(#[from] TemplateError),
}

/// Input for a new template
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: String,
    /// Empty means the default question
    pub questions: Vec<Question>,
    pub requires_signature: bool,
    pub dual_party_signature: bool,
}

impl Default for NewTemplate {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            price: String::new(),
            questions: Vec::new(),
            requires_signature: true,
            dual_party_signature: false,
        }
    }
}

/// Partial update; `None` leaves the field alone
#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub questions: Option<Vec<Question>>,
    pub requires_signature: Option<bool>,
    pub dual_party_signature: Option<bool>,
}

/// Id derived from a title: lowercased, whitespace runs become `-`
pub fn template_id_from_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<DocumentTemplate>,
}

impl TemplateRegistry {
    pub fn with_builtin() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    pub fn list(&self) -> &[DocumentTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&DocumentTemplate, RegistryError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn add(&mut self, new: NewTemplate) -> Result<&DocumentTemplate, RegistryError> {
        let questions = if new.questions.is_empty() {
            vec![default_question()]
        } else {
            new.questions
        };
        let config = TemplateConfig {
            title: new.title.trim().to_string(),
            description: new.description.trim().to_string(),
            questions,
            requires_signature: new.requires_signature,
            dual_party_signature: new.dual_party_signature,
        };
        config.validate()?;

        let id = template_id_from_title(&config.title);
        if self.templates.iter().any(|t| t.id == id) {
            return Err(RegistryError::DuplicateId(id));
        }

        tracing::info!(%id, "Added document type");
        self.templates.push(DocumentTemplate {
            id,
            category: new.category,
            price: new.price,
            config,
        });
        let index = self.templates.len() - 1;
        Ok(&self.templates[index])
    }

    pub fn update(
        &mut self,
        id: &str,
        patch: TemplatePatch,
    ) -> Result<&DocumentTemplate, RegistryError> {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        let mut updated = self.templates[index].clone();
        if let Some(title) = patch.title {
            updated.config.title = title;
        }
        if let Some(description) = patch.description {
            updated.config.description = description;
        }
        if let Some(category) = patch.category {
            updated.category = category;
        }
        if let Some(price) = patch.price {
            updated.price = price;
        }
        if let Some(questions) = patch.questions {
            updated.config.questions = questions;
        }
        if let Some(requires_signature) = patch.requires_signature {
            updated.config.requires_signature = requires_signature;
        }
        if let Some(dual) = patch.dual_party_signature {
            updated.config.dual_party_signature = dual;
        }
        updated.config.validate()?;

        tracing::info!(%id, "Updated document type");
        self.templates[index] = updated;
        Ok(&self.templates[index])
    }

    pub fn remove(&mut self, id: &str) -> Result<DocumentTemplate, RegistryError> {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        tracing::info!(%id, "Removed document type");
        Ok(self.templates.remove(index))
    }
}

fn text(id: &str, prompt: &str, required: bool) -> Question {
    Question::short_text(id, prompt, required)
}

fn long(id: &str, prompt: &str, required: bool) -> Question {
    Question::long_text(id, prompt, required)
}

fn builtin(
    id: &str,
    category: &str,
    title: &str,
    description: &str,
    questions: Vec<Question>,
    signatures: usize,
) -> DocumentTemplate {
    DocumentTemplate {
        id: id.to_string(),
        category: category.to_string(),
        price: "Free".to_string(),
        config: TemplateConfig {
            title: title.to_string(),
            description: description.to_string(),
            questions,
            requires_signature: signatures > 0,
            dual_party_signature: signatures > 1,
        },
    }
}

/// The document types every installation starts with
pub fn builtin_templates() -> Vec<DocumentTemplate> {
    vec![
        builtin(
            "rent-agreement",
            "Legal",
            "Rent Agreement",
            "Professional rental agreement for landlords and tenants",
            vec![
                text("landlord_name", "Landlord's Full Name", true),
                text("tenant_name", "Tenant's Full Name", true),
                long("property_address", "Property Address", true),
                text("monthly_rent", "Monthly Rent Amount", true),
                text("lease_duration", "Lease Duration (in months)", true),
                text("security_deposit", "Security Deposit Amount", true),
            ],
            2,
        ),
        builtin(
            "job-offer",
            "HR",
            "Job Offer Letter",
            "Professional job offer letter for new employees",
            vec![
                text("company_name", "Company Name", true),
                text("candidate_name", "Candidate's Full Name", true),
                text("position", "Job Position/Title", true),
                text("salary", "Annual Salary", true),
                text("start_date", "Start Date", true),
                long("benefits", "Benefits and Perks", false),
            ],
            1,
        ),
        builtin(
            "nda",
            "Legal",
            "Non-Disclosure Agreement",
            "Confidentiality agreement for business partnerships",
            vec![
                text("disclosing_party", "Disclosing Party Name", true),
                text("receiving_party", "Receiving Party Name", true),
                long("purpose", "Purpose of Information Sharing", true),
                text("duration", "Duration of Agreement (years)", true),
                long("specific_info", "Specific Information to be Protected", false),
            ],
            2,
        ),
        builtin(
            "invoice",
            "Business",
            "Professional Invoice",
            "Create professional invoices for your business",
            vec![
                text("company_name", "Your Company Name", true),
                text("client_name", "Client Name/Company", true),
                text("invoice_number", "Invoice Number", true),
                long("services", "Services/Products Description", true),
                text("amount", "Total Amount", true),
                text("due_date", "Payment Due Date", true),
            ],
            0,
        ),
        builtin(
            "employee-handbook",
            "HR",
            "Employee Handbook",
            "Comprehensive employee handbook template",
            vec![
                text("company_name", "Company Name", true),
                long("company_mission", "Company Mission Statement", true),
                text("work_hours", "Standard Work Hours", true),
                long("dress_code", "Dress Code Policy", false),
                long("vacation_policy", "Vacation Policy", true),
            ],
            0,
        ),
        builtin(
            "business-proposal",
            "Business",
            "Business Proposal",
            "Professional business proposal template",
            vec![
                text("company_name", "Your Company Name", true),
                text("client_name", "Client/Prospect Name", true),
                long("project_overview", "Project Overview", true),
                text("timeline", "Project Timeline", true),
                text("budget", "Proposed Budget", true),
                long("deliverables", "Key Deliverables", true),
            ],
            0,
        ),
    ]
}
