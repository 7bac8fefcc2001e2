// src/core/scanner/mod.rs

// Public interface of the `scanner` module: the engine that drives one
// analysis plus the pieces it is built from.
pub mod feature_checks;
pub mod page_fetcher;
pub mod ssl_scanner;

use crate::core::config::EngineConfig;
use crate::core::document::DocumentModel;
use crate::core::error::{FetchError, ValidationError};
use crate::core::models::{AnalysisReport, Category, Finding, FindingDetail, PageInfo};
use self::feature_checks::{default_checks, FeatureCheck, HttpsUsedCheck};
use self::page_fetcher::{FetchedPage, PageFetcher};
use self::ssl_scanner::{certificate_finding, inspection_host, CertificateInspector};
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info, warn};
use url::Url;

thread_local! {
    static CAPTURING_CHECK_PANIC: Cell<bool> = const { Cell::new(false) };
}

/// True while this thread runs a check whose panic the engine turns into an
/// `Error` finding. Panic hooks use it to stay quiet for those panics.
pub fn capturing_check_panic() -> bool {
    CAPTURING_CHECK_PANIC.get()
}

/// Checks an input string is an absolute http(s) URL with a host.
pub fn validate_url(input: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(input.trim()).map_err(|e| ValidationError::Malformed {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::MissingHost(input.to_string()));
    }
    Ok(url)
}

/// Runs the fixed battery of checks against one page.
///
/// The engine holds configuration, the check registry and the HTTP client.
/// Nothing about a particular analysis survives the call that produced it,
/// so one engine can serve any number of independent requests.
pub struct HeuristicEngine {
    config: EngineConfig,
    checks: Vec<Box<dyn FeatureCheck>>,
    fetcher: PageFetcher,
    inspector: CertificateInspector,
}

impl HeuristicEngine {
    pub fn new(config: EngineConfig) -> Result<Self, FetchError> {
        let checks = default_checks(&config);
        Self::with_checks(config, checks)
    }

    /// Engine with a custom registry. Report order follows `checks` order.
    pub fn with_checks(config: EngineConfig, checks: Vec<Box<dyn FeatureCheck>>) -> Result<Self, FetchError> {
        let fetcher = PageFetcher::new(&config)?;
        let inspector = CertificateInspector::new(&config);
        Ok(Self { config, checks, fetcher, inspector })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates, fetches once, then evaluates the page.
    ///
    /// Only a `ValidationError` fails the call. A failed fetch produces a
    /// report holding a single `Error` finding.
    pub async fn analyze(&self, input: &str) -> Result<AnalysisReport, ValidationError> {
        let url = validate_url(input)?;
        info!(url = %url, "Starting analysis.");

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "Fetch failed, skipping document checks.");
                return Ok(fetch_failure_report(&url, &e));
            }
        };

        Ok(self.evaluate_page(&url, page).await)
    }

    /// Everything after the fetch: parse, run the checks and, when `HttpsUsed`
    /// fires, inspect the certificate.
    pub async fn evaluate_page(&self, url: &Url, page: FetchedPage) -> AnalysisReport {
        // The inspection talks to a socket, not to the document, so it runs on
        // the blocking pool while the checks are evaluated here.
        let inspection = self
            .inspects_certificates(url)
            .then(|| inspection_host(url))
            .flatten()
            .map(|host| {
                let inspector = self.inspector.clone();
                tokio::spawn(async move { inspector.inspect(&host).await })
            });

        let (page_info, mut findings) = self.evaluate_document(url, &page.raw_body);
        drop(page);

        if let Some(handle) = inspection {
            match findings.iter().position(|f| f.category == Category::HttpsUsed) {
                Some(https_at) => {
                    let finding = match handle.await {
                        Ok(result) => certificate_finding(result),
                        Err(e) => {
                            error!(error = %e, "Certificate inspection task failed.");
                            Finding::error(format!("SSL certificate inspection failed: {e}"))
                        }
                    };
                    findings.insert(https_at + 1, finding);
                }
                None => {
                    debug!("HttpsUsed did not fire, dropping certificate inspection.");
                    handle.abort();
                }
            }
        }

        info!(url = %url, findings = findings.len(), "Analysis finished.");
        AnalysisReport { url: url.to_string(), page_info: Some(page_info), findings }
    }

    fn inspects_certificates(&self, url: &Url) -> bool {
        HttpsUsedCheck::applies(url) && self.checks.iter().any(|c| c.name() == HttpsUsedCheck.name())
    }

    /// Parses the body and runs every registered check in order. A check that
    /// panics contributes one `Error` finding in its own slot.
    pub fn evaluate_document(&self, url: &Url, raw_body: &str) -> (PageInfo, Vec<Finding>) {
        let document = DocumentModel::parse(raw_body);
        debug!(bytes = raw_body.len(), checks = self.checks.len(), "Document parsed.");

        let mut findings = Vec::new();
        for check in &self.checks {
            CAPTURING_CHECK_PANIC.set(true);
            let outcome = catch_unwind(AssertUnwindSafe(|| check.evaluate(url, &document)));
            CAPTURING_CHECK_PANIC.set(false);
            match outcome {
                Ok(Some(finding)) => {
                    debug!(check = check.name(), category = %finding.category, "Check fired.");
                    findings.push(finding);
                }
                Ok(None) => debug!(check = check.name(), "Check passed."),
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    error!(check = check.name(), reason = %reason, "Check panicked.");
                    findings.push(Finding::error(format!("Check '{}' failed: {reason}", check.name())));
                }
            }
        }
        (document.page_info(), findings)
    }
}

fn fetch_failure_report(url: &Url, error: &FetchError) -> AnalysisReport {
    let mut finding = Finding::error(format!("An error occurred: {error}"));
    if let FetchError::NonOk(code) = error {
        finding = finding.with_detail(FindingDetail::Status { code: *code });
    }
    AnalysisReport { url: url.to_string(), page_info: None, findings: vec![finding] }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Analyzes `url` with the configuration from the environment.
pub async fn analyze_website(url: &str) -> Result<AnalysisReport, ValidationError> {
    let target = validate_url(url)?;
    match HeuristicEngine::new(EngineConfig::from_env()) {
        Ok(engine) => engine.analyze(target.as_str()).await,
        Err(e) => Ok(fetch_failure_report(&target, &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::feature_checks::NoCustomerReviewsCheck;
    use std::time::Duration;

    struct PanickingCheck;

    impl FeatureCheck for PanickingCheck {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn evaluate(&self, _url: &Url, _document: &DocumentModel) -> Option<Finding> {
            panic!("selector exploded")
        }
    }

    struct AlwaysCheck(Category);

    impl FeatureCheck for AlwaysCheck {
        fn name(&self) -> &'static str {
            "always"
        }

        fn evaluate(&self, _url: &Url, _document: &DocumentModel) -> Option<Finding> {
            Some(Finding::new(self.0, "fired"))
        }
    }

    #[test]
    fn validation_rules() {
        assert!(validate_url("https://shop.example.com").is_ok());
        assert!(validate_url("  http://a.test/path  ").is_ok());
        assert_eq!(
            validate_url("ftp://files.example.com"),
            Err(ValidationError::UnsupportedScheme("ftp".into()))
        );
        assert!(matches!(validate_url("example.com"), Err(ValidationError::Malformed { .. })));
        assert!(matches!(validate_url("/relative/path"), Err(ValidationError::Malformed { .. })));
        assert!(validate_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn panicking_check_keeps_its_slot() {
        let checks: Vec<Box<dyn FeatureCheck>> = vec![
            Box::new(AlwaysCheck(Category::PoorDesign)),
            Box::new(PanickingCheck),
            Box::new(AlwaysCheck(Category::TrustSealPresent)),
        ];
        let engine = HeuristicEngine::with_checks(EngineConfig::default(), checks).unwrap();
        let url = Url::parse("http://a.test").unwrap();

        let (_, findings) = engine.evaluate_document(&url, "<p></p>");

        let categories: Vec<_> = findings.iter().map(|f| f.category).collect();
        assert_eq!(categories, [Category::PoorDesign, Category::Error, Category::TrustSealPresent]);
        assert!(findings[1].message.contains("panicking"));
        assert!(findings[1].message.contains("selector exploded"));
    }

    struct FlagCheck;

    impl FeatureCheck for FlagCheck {
        fn name(&self) -> &'static str {
            "flag"
        }

        fn evaluate(&self, _url: &Url, _document: &DocumentModel) -> Option<Finding> {
            capturing_check_panic().then(|| Finding::new(Category::TrustSealPresent, "captured"))
        }
    }

    #[test]
    fn panic_capture_flag_is_scoped_to_checks() {
        let engine = HeuristicEngine::with_checks(EngineConfig::default(), vec![Box::new(FlagCheck)]).unwrap();
        let url = Url::parse("http://a.test").unwrap();

        assert!(!capturing_check_panic());
        let (_, findings) = engine.evaluate_document(&url, "");
        assert_eq!(findings.len(), 1);
        assert!(!capturing_check_panic());
    }

    fn https_engine(checks: Vec<Box<dyn FeatureCheck>>) -> HeuristicEngine {
        let config = EngineConfig { inspect_timeout: Duration::from_secs(2), ..EngineConfig::default() };
        HeuristicEngine::with_checks(config, checks).unwrap()
    }

    #[tokio::test]
    async fn certificate_needs_https_used_in_registry() {
        let engine = https_engine(vec![Box::new(NoCustomerReviewsCheck)]);
        let url = Url::parse("https://a.invalid/").unwrap();

        let report = engine.evaluate_page(&url, FetchedPage::new(url.clone(), "")).await;

        assert_eq!(report.categories(), [Category::NoCustomerReviews]);
    }

    #[tokio::test]
    async fn certificate_finding_sits_right_after_https_used() {
        let engine = https_engine(vec![
            Box::new(HttpsUsedCheck),
            Box::new(AlwaysCheck(Category::TrustSealPresent)),
        ]);
        let url = Url::parse("https://a.invalid/").unwrap();

        let report = engine.evaluate_page(&url, FetchedPage::new(url.clone(), "")).await;

        // a.invalid never resolves, so the inspection yields an error finding.
        assert_eq!(report.categories(), [Category::HttpsUsed, Category::Error, Category::TrustSealPresent]);
    }

    #[test]
    fn fetch_failure_has_single_error_finding() {
        let url = Url::parse("http://a.test").unwrap();
        let report = fetch_failure_report(&url, &FetchError::NonOk(404));
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].category, Category::Error);
        assert!(report.findings[0].message.contains("404"));
        assert_eq!(report.findings[0].detail, Some(FindingDetail::Status { code: 404 }));
        assert!(report.page_info.is_none());
    }
}
