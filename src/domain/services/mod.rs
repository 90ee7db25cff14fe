// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 领域服务模块
//!
//! 包含抓取编排与网站联系方式探测服务。

pub mod scrape_service;
pub mod website_probe;
