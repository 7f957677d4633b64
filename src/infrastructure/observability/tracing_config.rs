/// Knobs for the tracing subscriber. `default_directives` seeds the
/// filter when `RUST_LOG` is absent.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_directives: String,
}

impl TracingConfig {
    pub fn for_environment(environment: impl Into<String>, json_format: bool) -> Self {
        Self {
            environment: environment.into(),
            json_format,
            default_directives: "info,voltline=debug,tower_http=debug".to_string(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let json_format = std::env::var("LOG_FORMAT")
            .map(|value| value.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self::for_environment(environment, json_format)
    }
}
