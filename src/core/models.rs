// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumIter};

/// Placeholder used wherever a certificate field could not be extracted.
pub const UNKNOWN: &str = "Unknown";

// --- Core Data Models ---

// The category of a single heuristic observation. The variant order mirrors the
// order in which the checks are registered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter, AsRefStr)]
pub enum Category {
    SuspiciousUrl,
    PoorDesign,
    UnusualDomain,
    UnrealisticDiscount,
    NoCustomerReviews,
    InsecurePaymentForm,
    TrustSealPresent,
    HttpsUsed,
    SslCertificateDetail,
    Error,
}

// An enumeration representing the severity level of a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// Facts read from the leaf certificate. Each field is extracted on its own,
/// a missing one is reported as `Unknown` without affecting the others.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateDetails {
    pub issuer: String,
    pub subject: String,
    pub expiration: Option<DateTime<Utc>>,
}

impl CertificateDetails {
    pub fn unknown() -> Self {
        Self {
            issuer: UNKNOWN.to_string(),
            subject: UNKNOWN.to_string(),
            expiration: None,
        }
    }

    pub fn expiration_label(&self) -> String {
        match &self.expiration {
            Some(date) => date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => UNKNOWN.to_string(),
        }
    }
}

/// Structured evidence attached to a finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingDetail {
    Url { url: String },
    Discount { original: f64, current: f64, percent: f64 },
    Form { action: String },
    Status { code: u16 },
    Certificate(CertificateDetails),
}

// A single heuristic observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub category: Category,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<FindingDetail>,
}

impl Finding {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self { category, message: message.into(), detail: None }
    }

    pub fn with_detail(mut self, detail: FindingDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Category::Error, message)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Title and meta description of the analysed page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub title: Option<String>,
    pub description: Option<String>,
}

// --- Main Report ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    pub fn categories(&self) -> Vec<Category> {
        self.findings.iter().map(|f| f.category).collect()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.findings.iter().any(|f| f.category == category)
    }
}
