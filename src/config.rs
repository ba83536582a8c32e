use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder for the child count inside a title template
pub const NUM_PLACEHOLDER: &str = "${num}";

/// Main configuration structure for a navigation tree session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// View appended to a node path to fetch its children
    #[serde(default = "default_children_view")]
    pub children_view: String,

    /// View appended to the page URL to fetch the initial branch
    #[serde(default = "default_single_branch_view")]
    pub single_branch_view: String,

    /// View appended to a node path to build its content link
    #[serde(default = "default_content_view")]
    pub content_view: String,

    /// Text of the placeholder shown while children are loading
    ///
    /// Overridden by the `loading_msg` attribute of the branch document.
    #[serde(default = "default_loading_message")]
    pub loading_message: String,

    /// Text shown instead of the tree when the root cannot be loaded
    #[serde(default = "default_unavailable_message")]
    pub unavailable_message: String,

    /// Tooltip template for collection links, `${num}` is the child count
    ///
    /// Overridden by the `title_tpl` attribute of the branch document.
    #[serde(default = "default_title_template")]
    pub title_template: String,

    #[serde(default)]
    pub icons: IconConfig,

    /// Timeout for a single children request
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_children_view() -> String {
    "@@children.xml".to_string()
}

fn default_single_branch_view() -> String {
    "@@singleBranchTree.xml".to_string()
}

fn default_content_view() -> String {
    "@@SelectedManagementView.html".to_string()
}

fn default_loading_message() -> String {
    "Loading...".to_string()
}

fn default_unavailable_message() -> String {
    "Unavailable".to_string()
}

fn default_title_template() -> String {
    format!("Contains {NUM_PLACEHOLDER} item(s)")
}

fn default_fetch_timeout() -> u64 {
    30
}

/// Expand/collapse glyphs, resolved against `<base_url>@@/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconConfig {
    #[serde(default = "default_collapsed_icon")]
    pub collapsed: String,

    #[serde(default = "default_expanded_icon")]
    pub expanded: String,
}

fn default_collapsed_icon() -> String {
    "pl.gif".to_string()
}

fn default_expanded_icon() -> String {
    "mi.gif".to_string()
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            collapsed: default_collapsed_icon(),
            expanded: default_expanded_icon(),
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            children_view: default_children_view(),
            single_branch_view: default_single_branch_view(),
            content_view: default_content_view(),
            loading_message: default_loading_message(),
            unavailable_message: default_unavailable_message(),
            title_template: default_title_template(),
            icons: IconConfig::default(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl TreeConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: TreeConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.children_view.is_empty() {
            return Err(ConfigError::ValidationError(
                "children_view cannot be empty".to_string(),
            ));
        }

        if self.single_branch_view.is_empty() {
            return Err(ConfigError::ValidationError(
                "single_branch_view cannot be empty".to_string(),
            ));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// URL of the children document for a node path
    pub fn children_url(&self, path: &str) -> String {
        format!("{}{}", path, self.children_view)
    }

    /// URL of the single-branch document for a page
    pub fn single_branch_url(&self, page_url: &str) -> String {
        format!("{}{}", page_url, self.single_branch_view)
    }

    /// Link target for a node path
    pub fn content_url(&self, path: &str) -> String {
        format!("{}{}", path, self.content_view)
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
