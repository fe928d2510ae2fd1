//! Composition of the `X-Contentful-User-Agent` header.

/// Builds the structured identification string sent with every request.
///
/// The composed value is cached and invalidated whenever the application
/// or integration identity changes.
#[derive(Debug, Clone)]
pub struct UserAgentGenerator {
    sdk: String,
    application: String,
    integration: String,
    cached: Option<String>,
}

impl UserAgentGenerator {
    /// Create a generator for the given SDK name and version.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            sdk: format!("{}/{}", name, version),
            application: String::new(),
            integration: String::new(),
            cached: None,
        }
    }

    /// Set the application name and version.
    ///
    /// Passing `None` (or an empty name) clears the application fact.
    pub fn set_application(&mut self, name: Option<&str>, version: Option<&str>) {
        self.application = identity(name, version);
        self.cached = None;
    }

    /// Set the integration name and version.
    ///
    /// Passing `None` (or an empty name) clears the integration fact.
    pub fn set_integration(&mut self, name: Option<&str>, version: Option<&str>) {
        self.integration = identity(name, version);
        self.cached = None;
    }

    /// The value of the `X-Contentful-User-Agent` header.
    pub fn user_agent(&mut self) -> String {
        if self.cached.is_none() {
            self.cached = Some(self.generate());
        }

        self.cached.clone().unwrap_or_default()
    }

    fn generate(&self) -> String {
        let platform = format!("Rust/{}", env!("CONTENTFUL_RUST_VERSION"));
        let parts = [
            ("app", self.application.as_str()),
            ("integration", self.integration.as_str()),
            ("sdk", self.sdk.as_str()),
            ("platform", platform.as_str()),
            ("os", os_name()),
        ];

        let mut user_agent = String::new();
        for (key, value) in parts {
            if value.is_empty() {
                continue;
            }
            user_agent.push_str(key);
            user_agent.push(' ');
            user_agent.push_str(value);
            user_agent.push_str("; ");
        }

        user_agent.trim_end().to_string()
    }
}

fn identity(name: Option<&str>, version: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => match version {
            Some(version) if !version.is_empty() => format!("{}/{}", name, version),
            _ => name.to_string(),
        },
        _ => String::new(),
    }
}

fn os_name() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows",
        "macos" => "macOS",
        _ => "Linux",
    }
}
