// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 端到端测试模块
///
/// 通过HTTP入口走完整条抓取流水线，验证各组件的集成
pub mod scrape_flow_test;
