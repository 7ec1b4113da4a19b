#![no_main]

use libfuzzer_sys::fuzz_target;
use rolemine::config::AnalyticsConfig;
use rolemine::signal::SignalResolver;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(config) = AnalyticsConfig::from_toml_str(input) {
            let resolver = SignalResolver::new(&config.catalog);
            for role in &config.roles {
                let _ = resolver.resolve(role);
            }
        }
    }
});
