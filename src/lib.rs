// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含HTTP接口的数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置与抓取档位
pub mod config;

/// 领域模块
///
/// 包含链接采集、字段提取与抓取编排等核心业务逻辑
pub mod domain;

/// 引擎模块
///
/// 实现地图搜索与详情页抓取的浏览器引擎
pub mod engines;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
