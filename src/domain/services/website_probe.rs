// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Business website contact probe.
//!
//! Fetches a listing's own website over plain HTTP and sweeps the body
//! for contact details Google Maps does not surface: email addresses
//! and additional phone numbers. The probe is strictly best-effort, a
//! site that is down or unparseable leaves the record exactly as the
//! maps extraction produced it.

use crate::config::settings::ProbeSettings;
use crate::domain::extractor::phone_candidates;
use crate::domain::models::listing::ListingRecord;
use crate::utils::text::digits;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::debug;

/// Bare addresses anywhere in the body.
static EMAIL_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("Failed to compile bare email regex")
});

/// Addresses inside mailto: links.
static EMAIL_MAILTO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"mailto:([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})")
        .expect("Failed to compile mailto email regex")
});

/// Addresses following an "email:" style label.
static EMAIL_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)email[:\s]*([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})")
        .expect("Failed to compile labeled email regex")
});

/// Asset filenames like logo@2x.png match the bare pattern and must be
/// filtered out.
const ASSET_SUFFIXES: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];

/// Cap on extra phone numbers pulled from a website.
const MAX_ADDITIONAL_PHONES: usize = 3;

/// 网站联系方式探测器
pub struct WebsiteProbe {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl WebsiteProbe {
    pub fn new(settings: &ProbeSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    /// 访问记录的网站并补充邮箱与额外电话
    ///
    /// 任何失败只记录日志，记录保持原样且 `website_visited` 不置位
    pub async fn enrich(&self, record: &mut ListingRecord) {
        let Some(website) = record.website.clone() else {
            return;
        };

        let body = match self.fetch_body(&website).await {
            Ok(body) => body,
            Err(e) => {
                debug!("Website probe failed for {}: {}", website, e);
                return;
            }
        };

        let decoded = html_escape::decode_html_entities(&body);
        let emails = extract_emails(&decoded);
        let mut emails = emails.into_iter();
        record.email = emails.next();
        record.secondary_email = emails.next();
        record.additional_phones = extract_phones(&decoded, record.phone.as_deref());
        record.website_visited = true;
    }

    async fn fetch_body(&self, url: &str) -> Result<String, reqwest::Error> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let capped = &bytes[..bytes.len().min(self.max_body_bytes)];
        Ok(String::from_utf8_lossy(capped).into_owned())
    }
}

/// Sweep a page body for email addresses.
///
/// Patterns run in precision order, results are lowercased and deduped
/// while keeping first-seen order, asset filenames are dropped.
fn extract_emails(body: &str) -> Vec<String> {
    let mut found = Vec::new();

    let mut push = |candidate: &str| {
        let email = candidate.trim().to_lowercase();
        if ASSET_SUFFIXES.iter().any(|s| email.ends_with(s)) {
            return;
        }
        if !found.contains(&email) {
            found.push(email);
        }
    };

    for m in EMAIL_MAILTO.captures_iter(body) {
        if let Some(group) = m.get(1) {
            push(group.as_str());
        }
    }
    for m in EMAIL_LABELED.captures_iter(body) {
        if let Some(group) = m.get(1) {
            push(group.as_str());
        }
    }
    for m in EMAIL_BARE.find_iter(body) {
        push(m.as_str());
    }

    found
}

/// Phone numbers beyond the one Maps already yielded, deduped on digits.
fn extract_phones(body: &str, known: Option<&str>) -> Vec<String> {
    let known_digits = known.map(digits).unwrap_or_default();
    let mut seen = vec![known_digits];
    let mut found = Vec::new();

    for candidate in phone_candidates(body) {
        let normalized = digits(&candidate);
        if seen.contains(&normalized) {
            continue;
        }
        seen.push(normalized);
        found.push(candidate);
        if found.len() >= MAX_ADDITIONAL_PHONES {
            break;
        }
    }

    found
}
