// src/core/scanner/feature_checks.rs

use crate::core::config::EngineConfig;
use crate::core::document::{element_text, previous_element_sibling, DocumentModel};
use crate::core::models::{Category, Finding, FindingDetail};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use tracing::debug;
use url::{Host, Url};

/// One independent heuristic rule.
///
/// A check only reads the URL and the parsed page and returns at most one
/// finding. It never depends on the outcome of another check, so checks can
/// be evaluated in any order and the engine re-imposes registration order.
pub trait FeatureCheck: Send + Sync {
    /// Short identifier used in logs and error findings.
    fn name(&self) -> &'static str;

    fn evaluate(&self, url: &Url, document: &DocumentModel) -> Option<Finding>;
}

// Statically compiled patterns and selectors.
static RE_ABSOLUTE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(http|ftp|https)://[\w-]+(\.[\w-]+)+([\w.,@?^=%&:/~+#-]*[\w@?^=%&/~+#-])?").unwrap()
});
static SEL_HEADER: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"header, [role="banner"]"#).unwrap());
static SEL_FOOTER: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"footer, [role="contentinfo"]"#).unwrap());
static SEL_PRICE: Lazy<Selector> = Lazy::new(|| Selector::parse("span.price").unwrap());
static SEL_CUSTOMER_REVIEW: Lazy<Selector> = Lazy::new(|| Selector::parse(".customer-review").unwrap());
static SEL_FORM_ACTION: Lazy<Selector> = Lazy::new(|| Selector::parse("form[action]").unwrap());
static SEL_TRUST_SEAL: Lazy<Selector> = Lazy::new(|| Selector::parse(".trust-seal").unwrap());

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '₽', '₩'];

/// Absolute http/https/ftp URLs anywhere in the page source.
///
/// Fires on nearly any page with outbound links. This broad behaviour is
/// intentional and the finding is classed as informational.
pub struct SuspiciousUrlCheck;

impl FeatureCheck for SuspiciousUrlCheck {
    fn name(&self) -> &'static str {
        "suspicious_url"
    }

    fn evaluate(&self, _url: &Url, document: &DocumentModel) -> Option<Finding> {
        let first = RE_ABSOLUTE_URL.find(document.raw())?;
        debug!(url = first.as_str(), "Embedded absolute URL found.");
        Some(
            Finding::new(Category::SuspiciousUrl, "Suspicious URLs detected")
                .with_detail(FindingDetail::Url { url: first.as_str().to_string() }),
        )
    }
}

/// Missing header or footer section.
pub struct PoorDesignCheck;

impl FeatureCheck for PoorDesignCheck {
    fn name(&self) -> &'static str {
        "poor_design"
    }

    fn evaluate(&self, _url: &Url, document: &DocumentModel) -> Option<Finding> {
        let has_header = document.exists(&SEL_HEADER);
        let has_footer = document.exists(&SEL_FOOTER);
        debug!(has_header, has_footer, "Structural elements checked.");
        if has_header && has_footer {
            return None;
        }
        Some(Finding::new(Category::PoorDesign, "Poor Website Design and User Experience detected"))
    }
}

/// Hyphenated host names.
pub struct UnusualDomainCheck;

impl FeatureCheck for UnusualDomainCheck {
    fn name(&self) -> &'static str {
        "unusual_domain"
    }

    fn evaluate(&self, url: &Url, _document: &DocumentModel) -> Option<Finding> {
        // Internationalised names are stored as punycode, whose `xn--` prefix
        // is not a hyphen anyone typed.
        let host = match url.host()? {
            Host::Domain(domain) => idna::domain_to_unicode(domain).0,
            Host::Ipv4(_) | Host::Ipv6(_) => return None,
        };
        if !host.contains('-') {
            return None;
        }
        Some(Finding::new(
            Category::UnusualDomain,
            format!("Unusual Domain Names detected ({host})"),
        ))
    }
}

/// Price pairs with a discount above the configured threshold.
pub struct UnrealisticDiscountCheck {
    pub threshold_pct: f64,
}

impl FeatureCheck for UnrealisticDiscountCheck {
    fn name(&self) -> &'static str {
        "unrealistic_discount"
    }

    fn evaluate(&self, _url: &Url, document: &DocumentModel) -> Option<Finding> {
        for price in document.select(&SEL_PRICE) {
            let Some(original_el) = previous_element_sibling(&price) else { continue };
            let tagged = original_el.value().name() == "span"
                && original_el.value().classes().any(|c| c == "original-price");
            if !tagged {
                continue;
            }

            let (Some(original), Some(current)) =
                (parse_price(&element_text(&original_el)), parse_price(&element_text(&price)))
            else {
                debug!("Skipping price pair that could not be parsed.");
                continue;
            };

            let Some(percent) = discount_percent(original, current) else { continue };
            if percent > self.threshold_pct {
                debug!(original, current, percent, "Unrealistic discount found.");
                return Some(
                    Finding::new(
                        Category::UnrealisticDiscount,
                        format!("Unrealistic Discounts and Deals detected ({percent:.0}% off)"),
                    )
                    .with_detail(FindingDetail::Discount { original, current, percent }),
                );
            }
        }
        None
    }
}

/// Parses a displayed price such as `$1,299.00`. Returns `None` for anything
/// that is not a finite number.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches(CURRENCY_SYMBOLS)
        .trim_end_matches(CURRENCY_SYMBOLS)
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `(original - current) / original * 100`, or `None` when the original price
/// cannot serve as a divisor.
pub fn discount_percent(original: f64, current: f64) -> Option<f64> {
    if original <= 0.0 || !original.is_finite() || !current.is_finite() {
        return None;
    }
    Some((original - current) * 100.0 / original)
}

/// No element marked as a customer review.
pub struct NoCustomerReviewsCheck;

impl FeatureCheck for NoCustomerReviewsCheck {
    fn name(&self) -> &'static str {
        "no_customer_reviews"
    }

    fn evaluate(&self, _url: &Url, document: &DocumentModel) -> Option<Finding> {
        if document.exists(&SEL_CUSTOMER_REVIEW) {
            return None;
        }
        Some(Finding::new(Category::NoCustomerReviews, "Absence of Customer Reviews detected"))
    }
}

/// Forms that submit over plain HTTP.
pub struct InsecurePaymentFormCheck;

impl FeatureCheck for InsecurePaymentFormCheck {
    fn name(&self) -> &'static str {
        "insecure_payment_form"
    }

    fn evaluate(&self, _url: &Url, document: &DocumentModel) -> Option<Finding> {
        let action = document
            .select(&SEL_FORM_ACTION)
            .filter_map(|form| form.value().attr("action"))
            .map(str::trim)
            .find(|action| action.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("http://")))?;
        Some(
            Finding::new(Category::InsecurePaymentForm, "Insecure Payment Methods detected")
                .with_detail(FindingDetail::Form { action: action.to_string() }),
        )
    }
}

/// Presence of a trust seal. Informational only.
pub struct TrustSealCheck;

impl FeatureCheck for TrustSealCheck {
    fn name(&self) -> &'static str {
        "trust_seal"
    }

    fn evaluate(&self, _url: &Url, document: &DocumentModel) -> Option<Finding> {
        if !document.exists(&SEL_TRUST_SEAL) {
            return None;
        }
        Some(Finding::new(Category::TrustSealPresent, "Trust Seals and Certifications detected"))
    }
}

/// HTTPS scheme. Its finding also gates the certificate inspection.
pub struct HttpsUsedCheck;

impl HttpsUsedCheck {
    pub fn applies(url: &Url) -> bool {
        url.scheme() == "https"
    }
}

impl FeatureCheck for HttpsUsedCheck {
    fn name(&self) -> &'static str {
        "https_used"
    }

    fn evaluate(&self, url: &Url, _document: &DocumentModel) -> Option<Finding> {
        Self::applies(url).then(|| Finding::new(Category::HttpsUsed, "Website is using HTTPS protocol"))
    }
}

/// The fixed battery of checks, in report order.
pub fn default_checks(config: &EngineConfig) -> Vec<Box<dyn FeatureCheck>> {
    vec![
        Box::new(SuspiciousUrlCheck),
        Box::new(PoorDesignCheck),
        Box::new(UnusualDomainCheck),
        Box::new(UnrealisticDiscountCheck { threshold_pct: config.discount_threshold_pct }),
        Box::new(NoCustomerReviewsCheck),
        Box::new(InsecurePaymentFormCheck),
        Box::new(TrustSealCheck),
        Box::new(HttpsUsedCheck),
    ]
}
