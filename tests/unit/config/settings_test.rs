// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试配置加载和验证功能
/// 确保配置系统能够正确解析和验证各种配置参数

#[cfg(test)]
mod tests {
    use mapleads::config::settings::Settings;
    use std::sync::Mutex;

    // Settings::new reads process environment, keep these tests serial.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_load_without_config_files() {
        let _guard = ENV_LOCK.lock().unwrap();
        let settings = Settings::new().expect("defaults should load");

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.browser.engine, "chromium");
        assert_eq!(settings.browser.request_timeout_secs, 30);
        assert_eq!(settings.scrape.default_profile, "balanced");
        assert_eq!(settings.scrape.default_max_results, 100);
        assert_eq!(settings.scrape.max_results_cap, 500);
        assert!(!settings.scrape.expand_coverage);
        assert_eq!(settings.probe.timeout_secs, 10);
        assert!(settings.probe.user_agent.contains("Mozilla"));
    }

    #[test]
    fn test_environment_variables_override_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("MAPLEADS__SCRAPE__DEFAULT_PROFILE", "lightning");
        std::env::set_var("MAPLEADS__PROBE__TIMEOUT_SECS", "25");

        let settings = Settings::new();

        std::env::remove_var("MAPLEADS__SCRAPE__DEFAULT_PROFILE");
        std::env::remove_var("MAPLEADS__PROBE__TIMEOUT_SECS");

        let settings = settings.expect("settings with env overrides should load");
        assert_eq!(settings.scrape.default_profile, "lightning");
        assert_eq!(settings.probe.timeout_secs, 25);
    }
}
