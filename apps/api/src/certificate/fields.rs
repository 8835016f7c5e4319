use serde::{Deserialize, Serialize};

use crate::layout::{FitPolicy, PolicyDefaults, Rect, TemplateVariant};

/// The text fields a certificate template has boxes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateField {
    CompanyName,
    Address,
    Scope,
    IsoStandard,
    ManagementSystem,
    CertificateNumber,
    OriginalIssueDate,
    IssueDate,
    SurveillanceDueDate,
    ExpiryDate,
    RecertificationDate,
    Country,
}

impl CertificateField {
    pub fn label(&self) -> &'static str {
        match self {
            CertificateField::CompanyName => "Company Name",
            CertificateField::Address => "Address",
            CertificateField::Scope => "Scope",
            CertificateField::IsoStandard => "ISO Standard",
            CertificateField::ManagementSystem => "Management System",
            CertificateField::CertificateNumber => "Certificate Number",
            CertificateField::OriginalIssueDate => "Original Issue Date",
            CertificateField::IssueDate => "Issue Date",
            CertificateField::SurveillanceDueDate => "Surveillance Due Date",
            CertificateField::ExpiryDate => "Expiry Date",
            CertificateField::RecertificationDate => "Recertification Date",
            CertificateField::Country => "Country",
        }
    }

    /// Starting size for the search when the caller gives none.
    pub fn default_max_font_size(&self) -> f32 {
        match self {
            CertificateField::CompanyName | CertificateField::IsoStandard => 30.0,
            CertificateField::Scope => 20.0,
            CertificateField::ManagementSystem => 15.0,
            CertificateField::Address => 13.6,
            _ => 12.0,
        }
    }

    /// Only the scope box is written as a bullet list.
    pub fn uses_bullets(&self) -> bool {
        matches!(self, CertificateField::Scope)
    }
}

/// One field to lay out, with the box the caller's template puts it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInput {
    pub field: CertificateField,
    pub text: String,
    pub rect: Rect,
    #[serde(default)]
    pub max_font_size: Option<f32>,
    #[serde(default)]
    pub min_font_size: Option<f32>,
    /// Signed points added after fitting.
    #[serde(default)]
    pub font_size_adjustment: f32,
    /// Use the starting size as-is and skip the search.
    #[serde(default)]
    pub force_font_size: bool,
    /// Vertical nudge applied at placement, in points.
    #[serde(default)]
    pub offset_y: f32,
}

impl FieldInput {
    pub fn new(field: CertificateField, text: impl Into<String>, rect: Rect) -> Self {
        FieldInput {
            field,
            text: text.into(),
            rect,
            max_font_size: None,
            min_font_size: None,
            font_size_adjustment: 0.0,
            force_font_size: false,
            offset_y: 0.0,
        }
    }

    pub fn policy(&self, variant: TemplateVariant, defaults: &PolicyDefaults) -> FitPolicy {
        let max = self
            .max_font_size
            .unwrap_or_else(|| self.field.default_max_font_size());
        let mut policy = defaults.policy(variant, max);
        if let Some(min) = self.min_font_size {
            policy.min_font_size = min;
        }
        if !self.field.uses_bullets() {
            policy = policy.with_bullet_indicators(Vec::<String>::new());
        }
        policy
    }
}
