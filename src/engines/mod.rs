// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 浏览器引擎模块
//!
//! 提供地图搜索与详情页抓取的引擎抽象及其实现。

pub mod chromium;
pub mod stub;
pub mod traits;

pub use chromium::ChromiumEngine;
pub use stub::StubBrowser;
pub use traits::{ListingSnapshot, MapsBrowser, ResultsView, ViewError};
