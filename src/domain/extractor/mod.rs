// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Listing field extraction.
//!
//! Turns the raw HTML of a Google Maps place page into a
//! [`ListingRecord`]. Each field is resolved through an ordered chain of
//! [`Locator`] candidates; the first candidate that yields a value passing
//! that field's validation wins, and later candidates are only consulted
//! when earlier ones miss or produce garbage. Extraction itself never
//! fails: a page where nothing matches simply produces a record full of
//! `None`, and the caller decides what to do with it.

pub mod fields;
pub mod locators;

use crate::domain::models::listing::ListingRecord;
use crate::engines::traits::ListingSnapshot;
use crate::utils::text::{digits, leading_count, leading_decimal};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

pub use locators::{Locator, ValueSource};

/// US-style phone numbers, with optional country code and punctuation.
static PHONE_US: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("Failed to compile US phone regex")
});

/// International numbers written with an explicit + prefix.
static PHONE_INTL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+\d{1,3}[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{1,9}")
        .expect("Failed to compile international phone regex")
});

/// The per-field locator chains the extractor walks.
///
/// Kept as a struct so tests and alternative page layouts can swap in
/// their own chains without recompiling the defaults.
#[derive(Debug, Clone, Copy)]
pub struct FieldChains {
    pub name: &'static [Locator],
    pub address: &'static [Locator],
    pub rating: &'static [Locator],
    pub review_count: &'static [Locator],
    pub category: &'static [Locator],
    pub website: &'static [Locator],
    pub phone: &'static [Locator],
}

impl Default for FieldChains {
    fn default() -> Self {
        Self {
            name: fields::NAME,
            address: fields::ADDRESS,
            rating: fields::RATING,
            review_count: fields::REVIEW_COUNT,
            category: fields::CATEGORY,
            website: fields::WEBSITE,
            phone: fields::PHONE,
        }
    }
}

/// 详情页字段提取器。
pub struct FieldExtractor {
    chains: FieldChains,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            chains: FieldChains::default(),
        }
    }

    pub fn with_chains(chains: FieldChains) -> Self {
        Self { chains }
    }

    /// Extract every supported field from a listing snapshot.
    ///
    /// Fields that cannot be resolved stay `None`; the record is always
    /// returned. Name-less records are the orchestrator's problem, not
    /// ours.
    pub fn extract(&self, snapshot: &ListingSnapshot, query: &str) -> ListingRecord {
        let mut record = ListingRecord::new(snapshot.url.clone(), query.to_string());

        // Html holds Cell-based interior state and must stay inside a
        // synchronous scope, never across an await point.
        let doc = Html::parse_document(&snapshot.html);

        record.name = first_valid(self.chains.name, &doc, |v| Some(v.to_string()));
        record.address = first_valid(self.chains.address, &doc, |v| Some(v.to_string()));
        record.rating = first_valid(self.chains.rating, &doc, leading_decimal);
        record.review_count = first_valid(self.chains.review_count, &doc, leading_count);
        record.category = first_valid(self.chains.category, &doc, |v| Some(v.to_string()));
        record.website = first_valid(self.chains.website, &doc, valid_website);
        record.phone = self.extract_phone(&doc);

        record
    }

    /// Phone resolution has one extra stage beyond the locator chain: when
    /// no structured element carries a usable number, the visible page
    /// text is swept with the phone patterns as a last resort.
    fn extract_phone(&self, doc: &Html) -> Option<String> {
        if let Some(phone) = first_valid(self.chains.phone, doc, |raw| {
            let cleaned = sanitize_phone(raw);
            is_valid_phone(&cleaned).then_some(cleaned)
        }) {
            return Some(phone);
        }
        phone_candidates(&page_text(doc)).into_iter().next()
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a locator chain and return the first value the field validator
/// accepts. A candidate that matches but fails validation does not end
/// the chain; the remaining candidates still get their turn.
fn first_valid<T>(
    chain: &[Locator],
    doc: &Html,
    accept: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    chain
        .iter()
        .find_map(|locator| locator.locate(doc).and_then(|value| accept(&value)))
}

/// Strip the markup prefixes phone locators pick up along with the number.
fn sanitize_phone(raw: &str) -> String {
    let mut value = raw.trim();
    for prefix in ["phone:tel:", "tel:", "Phone:", "Call"] {
        if let Some(rest) = value.strip_prefix(prefix) {
            value = rest.trim();
        }
    }
    value.to_string()
}

/// A plausible phone number keeps at least ten digits once punctuation
/// is stripped. Short numeric fragments ("Office #42") are rejected.
fn is_valid_phone(value: &str) -> bool {
    digits(value).len() >= 10
}

/// Sweep free text for phone-shaped substrings, in document order.
pub fn phone_candidates(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in [&*PHONE_US, &*PHONE_INTL] {
        for m in pattern.find_iter(text) {
            let candidate = m.as_str().trim().to_string();
            if is_valid_phone(&candidate) && !found.contains(&candidate) {
                found.push(candidate);
            }
        }
    }
    found
}

/// Concatenated visible text of the whole document.
fn page_text(doc: &Html) -> String {
    doc.root_element().text().collect::<Vec<_>>().join(" ")
}

/// Validate a website candidate and unwrap Google's redirect wrapper.
///
/// Maps sometimes links external sites through
/// `https://www.google.com/url?q=<real-url>`; the real destination is
/// what callers want stored.
fn valid_website(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    if parsed.domain().is_some_and(|d| d.ends_with("google.com")) && parsed.path() == "/url" {
        if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "q") {
            return valid_website(&target);
        }
    }
    Some(parsed.to_string())
}
