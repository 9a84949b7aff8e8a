use crate::error::SupabaseError;

/// Environment variable holding the project URL.
pub const URL_VAR: &str = "SUPABASE_URL";
/// Environment variable holding the service-role key.
pub const KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Connection settings for a Supabase project.
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: String,
}

impl SupabaseConfig {
    /// Load settings from the environment. Both variables are required.
    pub fn from_env() -> Result<Self, SupabaseError> {
        Self::from_values(std::env::var(URL_VAR).ok(), std::env::var(KEY_VAR).ok())
    }

    /// Validate raw values as they would come from the environment.
    ///
    /// Blank values count as missing.
    pub fn from_values(url: Option<String>, key: Option<String>) -> Result<Self, SupabaseError> {
        let url = required(url, URL_VAR)?;
        let service_key = required(key, KEY_VAR)?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SupabaseError::Config(format!(
                "{} must be an http(s) URL, got '{}'",
                URL_VAR, url
            )));
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            service_key,
        })
    }
}

fn required(value: Option<String>, var: &str) -> Result<String, SupabaseError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SupabaseError::Config(format!("Missing {}. Set the {} env var", var, var)))
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}
