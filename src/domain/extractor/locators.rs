// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::text::squeeze_whitespace;
use scraper::{Html, Selector};

/// Where a locator reads its value from once the selector has matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// The concatenated text content of the element.
    Text,
    /// A named attribute of the element.
    Attr(&'static str),
}

/// One candidate locator for a listing field.
///
/// Locators are plain data so that field chains can be extended or
/// reordered without touching the extraction logic.
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    pub selector: &'static str,
    pub source: ValueSource,
}

impl Locator {
    pub const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            source: ValueSource::Text,
        }
    }

    pub const fn attr(selector: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            source: ValueSource::Attr(name),
        }
    }

    /// Find the first non-empty value this locator yields in the document.
    ///
    /// An invalid selector or a selector with no match both come back as
    /// `None`; a broken candidate never aborts the chain it belongs to.
    pub fn locate(&self, doc: &Html) -> Option<String> {
        let selector = Selector::parse(self.selector).ok()?;
        for element in doc.select(&selector) {
            let raw = match self.source {
                ValueSource::Text => element.text().collect::<String>(),
                ValueSource::Attr(name) => match element.value().attr(name) {
                    Some(value) => value.to_string(),
                    None => continue,
                },
            };
            let value = squeeze_whitespace(&raw);
            if !value.is_empty() {
                return Some(value);
            }
        }
        None
    }
}
