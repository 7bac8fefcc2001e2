use std::time::Duration;
use trustlens::core::models::{Category, FindingDetail};
use trustlens::core::scanner::page_fetcher::FetchedPage;
use trustlens::{EngineConfig, HeuristicEngine, ValidationError};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine() -> HeuristicEngine {
    let config = EngineConfig {
        fetch_timeout: Duration::from_secs(5),
        inspect_timeout: Duration::from_secs(2),
        ..EngineConfig::default()
    };
    HeuristicEngine::new(config).expect("engine builds")
}

fn page(url: &str, body: &str) -> (Url, FetchedPage) {
    let url = Url::parse(url).expect("valid url");
    let page = FetchedPage::new(url.clone(), body);
    (url, page)
}

#[tokio::test]
async fn plain_http_page_with_structure() {
    let engine = engine();
    let (url, fetched) = page("http://plain-example.com", "<header></header><footer></footer>");

    let report = engine.evaluate_page(&url, fetched).await;

    assert_eq!(report.categories(), [Category::UnusualDomain, Category::NoCustomerReviews]);
}

#[tokio::test]
async fn https_shop_with_deep_discount() {
    let engine = engine();
    let (url, fetched) = page(
        "https://shop.example.com",
        r#"<span class="original-price">$100</span><span class="price">$5</span>"#,
    );

    let report = engine.evaluate_page(&url, fetched).await;
    let categories = report.categories();

    assert!(report.contains(Category::UnrealisticDiscount));
    let https_at = categories.iter().position(|c| *c == Category::HttpsUsed).expect("https finding");
    // Without a reachable server the inspection degrades to an error finding.
    let last = *categories.last().unwrap();
    assert!(matches!(last, Category::SslCertificateDetail | Category::Error), "got {categories:?}");
    assert_eq!(https_at + 1, categories.len() - 1);

    let discount = report
        .findings
        .iter()
        .find(|f| f.category == Category::UnrealisticDiscount)
        .unwrap();
    assert_eq!(
        discount.detail,
        Some(FindingDetail::Discount { original: 100.0, current: 5.0, percent: 95.0 })
    );
}

#[tokio::test]
async fn not_found_page_yields_single_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<header></header>"))
        .expect(1)
        .mount(&server)
        .await;

    let report = engine().analyze(&format!("{}/gone", server.uri())).await.unwrap();

    assert_eq!(report.categories(), [Category::Error]);
    assert!(report.findings[0].message.contains("404"));
    assert!(report.page_info.is_none());
}

#[tokio::test]
async fn bare_page_lacks_design_and_reviews() {
    let engine = engine();
    let (url, fetched) = page("http://example.com", "<html><body><p>Buy now</p></body></html>");

    let report = engine.evaluate_page(&url, fetched).await;

    assert_eq!(report.categories(), [Category::PoorDesign, Category::NoCustomerReviews]);
}

#[tokio::test]
async fn plain_http_form_is_insecure() {
    let engine = engine();
    let (url, fetched) = page(
        "http://example.com/checkout",
        r#"<header></header><form action="http://pay.example.com"><input name="card"></form>
           <div class="customer-review">great</div><footer></footer>"#,
    );

    let report = engine.evaluate_page(&url, fetched).await;

    assert_eq!(report.categories(), [Category::SuspiciousUrl, Category::InsecurePaymentForm]);
}

#[tokio::test]
async fn full_pipeline_against_mock_server() {
    let server = MockServer::start().await;
    let body = r#"<html><head><title>Bargain Hub</title>
        <meta name="description" content="Everything must go"></head>
        <body><a href="https://partner.example.net/deal">deal</a>
        <img class="trust-seal" src="/seal.png"></body></html>"#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let report = engine().analyze(&server.uri()).await.unwrap();

    assert_eq!(
        report.categories(),
        [
            Category::SuspiciousUrl,
            Category::PoorDesign,
            Category::NoCustomerReviews,
            Category::TrustSealPresent,
        ]
    );
    let info = report.page_info.expect("page info");
    assert_eq!(info.title.as_deref(), Some("Bargain Hub"));
    assert_eq!(info.description.as_deref(), Some("Everything must go"));
}

#[tokio::test]
async fn slow_fetch_becomes_error_finding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    let config = EngineConfig { fetch_timeout: Duration::from_millis(200), ..EngineConfig::default() };
    let engine = HeuristicEngine::new(config).unwrap();

    let report = engine.analyze(&server.uri()).await.unwrap();

    assert_eq!(report.categories(), [Category::Error]);
    assert!(report.findings[0].message.contains("timed out"));
}

#[tokio::test]
async fn invalid_input_is_rejected_before_fetching() {
    let engine = engine();
    assert!(matches!(
        engine.analyze("ftp://files.example.com/").await,
        Err(ValidationError::UnsupportedScheme(_))
    ));
    assert!(matches!(engine.analyze("not a url").await, Err(ValidationError::Malformed { .. })));
    assert!(trustlens::analyze_website("javascript:alert(1)").await.is_err());
}

#[tokio::test]
async fn same_body_gives_identical_reports() {
    let engine = engine();
    let body = r#"<span class="original-price">$50</span><span class="price">$1</span>
                  <form action="http://pay.example.com"></form><a href="http://x.example.org/a">a</a>"#;

    let (url, first) = page("http://deal-hub.example", body);
    let (_, second) = page("http://deal-hub.example", body);

    let a = engine.evaluate_page(&url, first).await;
    let b = engine.evaluate_page(&url, second).await;
    assert_eq!(a, b);
    assert_eq!(
        a.categories(),
        [
            Category::SuspiciousUrl,
            Category::PoorDesign,
            Category::UnusualDomain,
            Category::UnrealisticDiscount,
            Category::NoCustomerReviews,
            Category::InsecurePaymentForm,
        ]
    );
}

#[tokio::test]
async fn hyphen_in_host_decides_unusual_domain() {
    let engine = engine();
    let cases = [
        ("http://example.com", false),
        ("http://a-b.example.com", true),
        ("http://example.com/a-b-c", false),
        ("http://x.y-z.org:8080/", true),
        ("http://127.0.0.1/", false),
        ("http://münchen.de/", false),
        ("http://mün-chen.de/", true),
    ];
    for (input, expected) in cases {
        let (url, fetched) = page(input, "");
        let report = engine.evaluate_page(&url, fetched).await;
        assert_eq!(report.contains(Category::UnusualDomain), expected, "{input}");
    }
}

#[tokio::test]
async fn certificate_findings_only_follow_https() {
    let engine = engine();
    let (url, fetched) = page("http://example.com", "<p></p>");

    let report = engine.evaluate_page(&url, fetched).await;

    assert!(!report.contains(Category::HttpsUsed));
    assert!(!report.contains(Category::SslCertificateDetail));
    assert!(!report.contains(Category::Error));
}
