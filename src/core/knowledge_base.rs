//! Static, read-only description of every finding category.
//! The checks only decide whether something fired; how it is explained,
//! how serious it is and what a visitor should do about it lives here.

use crate::core::models::{AnalysisReport, Category, Severity};
use serde::Serialize;
use std::fmt;

/// High-level grouping used when presenting findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingGroup {
    /// Signals read from the page content.
    Content,
    /// Signals read from the URL itself.
    Domain,
    /// Transport and certificate facts.
    Transport,
    /// Failures of the analysis itself.
    Analysis,
}

impl fmt::Display for FindingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingGroup::Content => write!(f, "Page Content"),
            FindingGroup::Domain => write!(f, "Domain"),
            FindingGroup::Transport => write!(f, "HTTPS / TLS"),
            FindingGroup::Analysis => write!(f, "Analysis"),
        }
    }
}

/// Human-readable information about a finding category.
pub struct CategoryDetail {
    pub category: Category,
    pub title: &'static str,
    pub group: FindingGroup,
    pub severity: Severity,
    pub description: &'static str,
    pub advice: &'static str,
}

static DETAILS: &[CategoryDetail] = &[
    CategoryDetail {
        category: Category::SuspiciousUrl,
        title: "Embedded URLs Detected",
        group: FindingGroup::Content,
        severity: Severity::Info,
        description: "The page source contains absolute http, https or ftp links. This is a broad signal: nearly every page with outbound links triggers it, so on its own it says very little.",
        advice: "Look at where the links point. Links to unrelated or look-alike domains deserve more suspicion than links to well-known services.",
    },
    CategoryDetail {
        category: Category::PoorDesign,
        title: "Poor Website Structure",
        group: FindingGroup::Content,
        severity: Severity::Warning,
        description: "The page is missing a header or a footer section. Hastily assembled scam storefronts often skip the structural elements a maintained site has.",
        advice: "Check whether the site has working contact details, legal notices and an about page, which normally live in the header and footer.",
    },
    CategoryDetail {
        category: Category::UnusualDomain,
        title: "Unusual Domain Name",
        group: FindingGroup::Domain,
        severity: Severity::Warning,
        description: "The host name contains a hyphen. Look-alike domains frequently glue a brand name to a generic word with hyphens.",
        advice: "Compare the domain with the brand's official one, letter by letter, before entering any personal data.",
    },
    CategoryDetail {
        category: Category::UnrealisticDiscount,
        title: "Unrealistic Discount",
        group: FindingGroup::Content,
        severity: Severity::Critical,
        description: "A product is advertised at an implausibly deep discount off its original price, beyond the configured threshold. Discounts this deep are a classic lure of fake shops.",
        advice: "Compare the price with other retailers. If it looks too good to be true, it usually is.",
    },
    CategoryDetail {
        category: Category::NoCustomerReviews,
        title: "No Customer Reviews",
        group: FindingGroup::Content,
        severity: Severity::Warning,
        description: "The page shows no customer reviews. Legitimate shops usually display feedback from previous buyers.",
        advice: "Search for independent reviews of the shop on third-party review platforms.",
    },
    CategoryDetail {
        category: Category::InsecurePaymentForm,
        title: "Insecure Form Submission",
        group: FindingGroup::Content,
        severity: Severity::Critical,
        description: "A form on the page submits its data over plain HTTP. Anything typed into it, payment details included, travels unencrypted.",
        advice: "Never enter card numbers or passwords into a form that does not submit over HTTPS.",
    },
    CategoryDetail {
        category: Category::TrustSealPresent,
        title: "Trust Seal Present",
        group: FindingGroup::Content,
        severity: Severity::Info,
        description: "The page displays a trust seal or certification badge. Seals are easy to copy, so their presence alone proves nothing.",
        advice: "Click the seal and make sure it opens a verification page on the issuer's own domain.",
    },
    CategoryDetail {
        category: Category::HttpsUsed,
        title: "HTTPS In Use",
        group: FindingGroup::Transport,
        severity: Severity::Info,
        description: "The page is served over HTTPS, so traffic between the visitor and the server is encrypted.",
        advice: "Encryption does not vouch for the operator. Check the certificate details below as well.",
    },
    CategoryDetail {
        category: Category::SslCertificateDetail,
        title: "SSL Certificate Details",
        group: FindingGroup::Transport,
        severity: Severity::Info,
        description: "Issuer, subject and expiration date of the certificate presented by the server.",
        advice: "Make sure the subject matches the site you meant to visit and that the certificate has not expired.",
    },
    CategoryDetail {
        category: Category::Error,
        title: "Analysis Error",
        group: FindingGroup::Analysis,
        severity: Severity::Warning,
        description: "Part of the analysis could not be completed. The remaining findings are still valid.",
        advice: "Verify that the site is reachable and try again.",
    },
];

/// Retrieves the full detail for a given category.
pub fn get_category_detail(category: Category) -> Option<&'static CategoryDetail> {
    DETAILS.iter().find(|d| d.category == category)
}

pub fn severity_of(category: Category) -> Severity {
    get_category_detail(category).map(|d| d.severity).unwrap_or(Severity::Info)
}

/// Aggregated view of a report: a 0-100 trust score and counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub score: u8,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

pub fn summarize(report: &AnalysisReport) -> ReportSummary {
    let mut summary = ReportSummary::default();
    for finding in &report.findings {
        match severity_of(finding.category) {
            Severity::Critical => summary.critical += 1,
            Severity::Warning => summary.warning += 1,
            Severity::Info => summary.info += 1,
        }
    }
    let penalty = summary.critical.saturating_mul(15).saturating_add(summary.warning.saturating_mul(5));
    summary.score = 100usize.saturating_sub(penalty) as u8;
    summary
}
