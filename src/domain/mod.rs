// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 领域层。
//!
//! 包含链接采集、字段提取与抓取编排等核心业务逻辑，
//! 不依赖任何具体浏览器实现。

pub mod collector;
pub mod extractor;
pub mod models;
pub mod services;
