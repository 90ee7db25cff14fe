// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 配置模块
//!
//! 负责应用程序配置的加载与抓取档位预设。

pub mod profiles;
pub mod settings;

pub use profiles::ScrapeProfile;
pub use settings::Settings;
