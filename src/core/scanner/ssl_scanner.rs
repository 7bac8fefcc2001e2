// src/core/scanner/ssl_scanner.rs

use tracing::{debug, error, info, warn};

use crate::core::config::EngineConfig;
use crate::core::error::InspectorError;
use crate::core::models::{CertificateDetails, Category, Finding, FindingDetail, UNKNOWN};
use chrono::{DateTime, Utc};
use native_tls::TlsConnector;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tokio::task::spawn_blocking;
use url::{Host, Url};
use x509_parser::prelude::*;

/// Reads issuer, subject and expiry from the leaf certificate a server
/// presents. Only facts are collected: the chain is not validated, so expired
/// or self-signed certificates are inspected like any other.
#[derive(Debug, Clone)]
pub struct CertificateInspector {
    port: u16,
    timeout: Duration,
}

impl CertificateInspector {
    pub fn new(config: &EngineConfig) -> Self {
        Self { port: config.tls_port, timeout: config.inspect_timeout }
    }

    pub async fn inspect(&self, host: &str) -> Result<CertificateDetails, InspectorError> {
        info!(host, port = self.port, "Starting certificate inspection.");
        let host_owned = host.to_string();
        let port = self.port;
        let timeout = self.timeout;

        debug!("Spawning blocking task for TLS connection.");
        let task = spawn_blocking(move || perform_tls_inspection(&host_owned, port, timeout));

        // The socket timeouts bound each step; this bounds the whole exchange.
        let outcome = tokio::time::timeout(timeout.saturating_mul(2), task).await;
        let result = match outcome {
            Err(_) => {
                warn!(host, "Certificate inspection exceeded its time budget.");
                Err(InspectorError::Timeout(timeout))
            }
            Ok(Err(e)) => {
                error!(panic = %e, "Blocking certificate task failed!");
                Err(InspectorError::Task(e.to_string()))
            }
            Ok(Ok(result)) => result,
        };

        match &result {
            Ok(details) => info!(issuer = %details.issuer, subject = %details.subject, "Certificate inspection finished."),
            Err(e) => warn!(error = %e, "Certificate inspection failed."),
        }
        result
    }
}

/// The URL's host as a socket and SNI name. IPv6 literals lose the brackets
/// that only belong in URLs.
pub fn inspection_host(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(domain) => Some(domain.to_string()),
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

fn perform_tls_inspection(host: &str, port: u16, timeout: Duration) -> Result<CertificateDetails, InspectorError> {
    debug!(host, port, "Resolving target address.");
    let addrs: Vec<_> = (host, port)
        .to_socket_addrs()
        .map_err(|e| InspectorError::Resolve { host: host.to_string(), reason: e.to_string() })?
        .collect();

    let mut last_error = None;
    let mut stream = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(s) => {
                stream = Some(s);
                break;
            }
            Err(e) => {
                debug!(%addr, error = %e, "TCP connect attempt failed.");
                last_error = Some(e);
            }
        }
    }
    let stream = match (stream, last_error) {
        (Some(s), _) => s,
        (None, Some(e)) if e.kind() == std::io::ErrorKind::TimedOut => {
            return Err(InspectorError::Timeout(timeout));
        }
        (None, Some(e)) => return Err(InspectorError::Connect(e.to_string())),
        (None, None) => {
            return Err(InspectorError::Resolve { host: host.to_string(), reason: "no addresses".to_string() });
        }
    };
    stream.set_read_timeout(Some(timeout)).map_err(|e| InspectorError::Connect(e.to_string()))?;
    stream.set_write_timeout(Some(timeout)).map_err(|e| InspectorError::Connect(e.to_string()))?;

    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to create TlsConnector");
            InspectorError::Handshake(e.to_string())
        })?;

    debug!(host, "Performing TLS handshake.");
    let tls = connector.connect(host, stream).map_err(|e| {
        error!(error = %e, "TLS handshake failed");
        InspectorError::Handshake(e.to_string())
    })?;

    let cert = match tls.peer_certificate() {
        Ok(Some(c)) => c,
        Ok(None) => return Err(InspectorError::NoCertificate),
        Err(e) => return Err(InspectorError::Handshake(e.to_string())),
    };

    // A certificate that cannot be re-encoded still counts as presented.
    match cert.to_der() {
        Ok(der) => Ok(extract_certificate_details(&der)),
        Err(e) => {
            warn!(error = %e, "Could not convert certificate to DER.");
            Ok(CertificateDetails::unknown())
        }
    }
}

/// Best-effort field extraction. Each field falls back to `Unknown` on its
/// own, and an unparsable certificate yields all three as `Unknown`.
pub fn extract_certificate_details(der: &[u8]) -> CertificateDetails {
    let (_, x509) = match parse_x509_certificate(der) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Failed to parse X.509 certificate.");
            return CertificateDetails::unknown();
        }
    };

    CertificateDetails {
        issuer: common_name(x509.issuer()),
        subject: common_name(x509.subject()),
        expiration: asn1_time_to_chrono_utc(&x509.validity().not_after),
    }
}

fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.timestamp(), 0)
}

/// Turns the inspection outcome into the single finding placed after `HttpsUsed`.
pub fn certificate_finding(result: Result<CertificateDetails, InspectorError>) -> Finding {
    match result {
        Ok(details) => Finding::new(
            Category::SslCertificateDetail,
            format!(
                "SSL certificate details: Issuer: {}, Subject: {}, Expiration Date: {}",
                details.issuer,
                details.subject,
                details.expiration_label()
            ),
        )
        .with_detail(FindingDetail::Certificate(details)),
        Err(e) => Finding::error(format!("SSL certificate inspection failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn fixture_der(pem: &[u8]) -> Vec<u8> {
        let (_, pem) = x509_parser::pem::parse_x509_pem(pem).unwrap();
        pem.contents
    }

    #[test]
    fn extracts_fields_from_leaf_certificate() {
        let der = fixture_der(include_bytes!("../../../tests/fixtures/leaf.pem"));
        let details = extract_certificate_details(&der);

        assert_eq!(details.issuer, "shop.example.com");
        assert_eq!(details.subject, "shop.example.com");
        let expiration = details.expiration.unwrap();
        assert_eq!((expiration.year(), expiration.month(), expiration.day()), (2036, 10, 13));
        assert_eq!((expiration.hour(), expiration.minute(), expiration.second()), (23, 9, 46));
    }

    #[test]
    fn missing_common_name_degrades_to_unknown() {
        let der = fixture_der(include_bytes!("../../../tests/fixtures/no_cn.pem"));
        let details = extract_certificate_details(&der);

        assert_eq!(details.issuer, UNKNOWN);
        assert_eq!(details.subject, UNKNOWN);
        assert!(details.expiration.is_some());
    }

    #[test]
    fn garbage_der_yields_all_unknown() {
        let details = extract_certificate_details(b"definitely not a certificate");
        assert_eq!(details, CertificateDetails::unknown());
        assert_eq!(details.expiration_label(), UNKNOWN);
    }

    #[test]
    fn finding_carries_details() {
        let finding = certificate_finding(Ok(CertificateDetails::unknown()));
        assert_eq!(finding.category, Category::SslCertificateDetail);
        assert!(finding.message.contains("Issuer: Unknown"));
        assert!(finding.message.contains("Expiration Date: Unknown"));
    }

    #[test]
    fn inspector_error_becomes_error_finding() {
        let finding = certificate_finding(Err(InspectorError::NoCertificate));
        assert_eq!(finding.category, Category::Error);
        assert!(finding.detail.is_none());
    }

    #[tokio::test]
    async fn closed_port_is_reported_as_error() {
        let config = EngineConfig {
            tls_port: 9,
            inspect_timeout: Duration::from_secs(2),
            ..EngineConfig::default()
        };
        let result = CertificateInspector::new(&config).inspect("127.0.0.1").await;
        assert!(matches!(result, Err(InspectorError::Connect(_)) | Err(InspectorError::Timeout(_))));
    }

    #[test]
    fn inspection_host_strips_ipv6_brackets() {
        let host = |s: &str| inspection_host(&Url::parse(s).unwrap());
        assert_eq!(host("https://[::1]:8443/").as_deref(), Some("::1"));
        assert_eq!(host("https://[2001:db8::7]/").as_deref(), Some("2001:db8::7"));
        assert_eq!(host("https://127.0.0.1/").as_deref(), Some("127.0.0.1"));
        assert_eq!(host("https://münchen.de/").as_deref(), Some("xn--mnchen-3ya.de"));
    }

    #[tokio::test]
    async fn ipv6_literal_reaches_connect_stage() {
        let config = EngineConfig {
            tls_port: 9,
            inspect_timeout: Duration::from_secs(2),
            ..EngineConfig::default()
        };
        let host = inspection_host(&Url::parse("https://[::1]/").unwrap()).unwrap();
        let result = CertificateInspector::new(&config).inspect(&host).await;
        assert!(
            matches!(result, Err(InspectorError::Connect(_)) | Err(InspectorError::Timeout(_))),
            "got: {result:?}"
        );
    }
}
