use serde::{
    Deserialize,
    Serialize,
};

/// Persisted preferences. The theme choice is the only state the app keeps
/// across sessions; the endpoint lives here so a deployment can point the
/// client at its own sheet without rebuilding.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    pub dark_mode: bool,
    pub api_url: String,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self { dark_mode: true, api_url: String::new() }
    }
}
