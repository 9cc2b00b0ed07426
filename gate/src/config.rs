use crate::credentials::SharedSecret;

/// Password used when `MEMBER_PASSWORD` is not set.
pub const DEFAULT_MEMBER_PASSWORD: &str = "MJP-HHB1";

#[derive(Clone, Debug)]
pub struct GateConfig {
    /// The one password shared by every member. Read once at startup.
    pub secret: SharedSecret,
}

impl GateConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. An empty value counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = lookup("MEMBER_PASSWORD")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MEMBER_PASSWORD.to_string());

        Self {
            secret: SharedSecret::new(password),
        }
    }
}
