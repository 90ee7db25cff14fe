// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Google Maps 详情页字段定位器链。
//!
//! Google 会周期性轮换 class 名，每条链按可靠性降序排列，
//! 取链中第一个通过校验的值。

use super::locators::Locator;

/// Business name candidates, most stable first.
pub const NAME: &[Locator] = &[
    Locator::text("h1[data-attrid='title']"),
    Locator::text("h1.DUwDvf"),
    Locator::text(".x3AX1-LfntMc-header-title-title span"),
    Locator::text("h1.fontHeadlineLarge"),
    Locator::text("h1"),
];

/// Street address candidates.
pub const ADDRESS: &[Locator] = &[
    Locator::text("button[data-item-id='address'] .Io6YTe"),
    Locator::text("[data-item-id='address'] .fontBodyMedium"),
    Locator::text(".rogA2c .Io6YTe"),
    Locator::text(".Io6YTe.fontBodyMedium"),
];

/// Star-rating candidates. Values may carry trailing words
/// ("4.6 stars"), the parser keeps the leading number only.
pub const RATING: &[Locator] = &[
    Locator::text(".F7nice span[aria-hidden='true']"),
    Locator::text(".MW4etd"),
    Locator::attr("span.ceNzKf", "aria-label"),
    Locator::text("div.fontDisplayLarge"),
];

/// Review-count candidates, typically "(1,234)" or "1,234 reviews".
pub const REVIEW_COUNT: &[Locator] = &[
    Locator::text(".F7nice span:nth-child(2)"),
    Locator::text(".UY7F9"),
    Locator::attr("button[jsaction*='reviewChart']", "aria-label"),
];

/// Business category candidates.
pub const CATEGORY: &[Locator] = &[
    Locator::text("button.DkEaL"),
    Locator::text(".DkEaL"),
    Locator::text(".YhemCb"),
];

/// Website link candidates.
pub const WEBSITE: &[Locator] = &[
    Locator::attr("a[data-item-id='authority']", "href"),
    Locator::attr("a[data-tooltip='Open website']", "href"),
    Locator::attr("a[aria-label^='Website']", "href"),
];

/// Phone number candidates. The `data-item-id` variant embeds the
/// number as `phone:tel:+14155550100`, sanitized downstream.
pub const PHONE: &[Locator] = &[
    Locator::attr("button[data-item-id^='phone:tel:']", "data-item-id"),
    Locator::attr("a[href^='tel:']", "href"),
    Locator::attr("button[data-tooltip='Copy phone number']", "aria-label"),
    Locator::attr("button[aria-label^='Phone']", "aria-label"),
];
