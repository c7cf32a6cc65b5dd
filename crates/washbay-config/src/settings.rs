//! Engine settings parsing.

use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};

/// Parsed settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub engine: EngineSettings,
    pub notifications: NotificationTemplates,
}

/// Tunables for token issuance and job creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Length of the random token suffix.
    pub token_suffix_length: usize,
    /// Draw-and-probe attempts before the timestamp fallback kicks in.
    pub token_attempts: u32,
    /// Full job-creation attempts when inserts hit a duplicate token.
    pub create_attempts: u32,
    /// Upper bound of the randomized backoff between creation attempts.
    pub backoff_max_ms: u64,
    /// After-image count required before a job may be delivered.
    pub min_delivery_images: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            token_suffix_length: 6,
            token_attempts: 10,
            create_attempts: 5,
            backoff_max_ms: 100,
            min_delivery_images: 2,
        }
    }
}

/// Customer-facing message templates, `{{key}}` placeholder syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTemplates {
    pub job_received: String,
    pub status_changed: String,
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self {
            job_received: "Hi {{customer}}! {{business}} has received your vehicle. \
                           Your token is {{token}}. Estimated delivery: {{eta}}."
                .to_string(),
            status_changed: "Hi {{customer}}! Job {{token}} at {{business}} is now {{status}}."
                .to_string(),
        }
    }
}

/// Parse a settings document from KDL text. Missing nodes fall back to
/// defaults; present nodes with malformed values are errors.
pub fn parse_settings(kdl: &str) -> ConfigResult<Settings> {
    let doc: KdlDocument = kdl.parse()?;

    let mut settings = Settings::default();

    for node in doc.nodes() {
        match node.name().value() {
            "engine" => parse_engine(node, &mut settings.engine)?,
            "notifications" => parse_notifications(node, &mut settings.notifications)?,
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(settings)
}

fn parse_engine(node: &KdlNode, engine: &mut EngineSettings) -> ConfigResult<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        let field = child.name().value();
        match field {
            "token-suffix-length" => {
                engine.token_suffix_length = bounded(positive_int(child, field)?, field)?;
            }
            "token-attempts" => {
                engine.token_attempts = bounded(positive_int(child, field)?, field)?;
            }
            "create-attempts" => {
                engine.create_attempts = bounded(positive_int(child, field)?, field)?;
            }
            "backoff-max-ms" => {
                engine.backoff_max_ms = bounded(int_arg(child, field)?, field)?;
            }
            "min-delivery-images" => {
                engine.min_delivery_images = bounded(int_arg(child, field)?, field)?;
            }
            _ => {}
        }
    }

    Ok(())
}

fn parse_notifications(
    node: &KdlNode,
    templates: &mut NotificationTemplates,
) -> ConfigResult<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        let field = child.name().value();
        match field {
            "job-received" => {
                templates.job_received = string_arg(child, field)?;
            }
            "status-changed" => {
                templates.status_changed = string_arg(child, field)?;
            }
            _ => {}
        }
    }

    Ok(())
}

fn first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(String::from)
}

fn first_int_arg(node: &KdlNode) -> Option<i128> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_integer())
}

fn string_arg(node: &KdlNode, field: &str) -> ConfigResult<String> {
    first_string_arg(node).ok_or_else(|| ConfigError::MissingField(field.to_string()))
}

fn int_arg(node: &KdlNode, field: &str) -> ConfigResult<i128> {
    let value = first_int_arg(node).ok_or_else(|| ConfigError::MissingField(field.to_string()))?;
    if value < 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("must not be negative, got {}", value),
        });
    }
    Ok(value)
}

fn positive_int(node: &KdlNode, field: &str) -> ConfigResult<i128> {
    let value = int_arg(node, field)?;
    if value < 1 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("must be at least 1, got {}", value),
        });
    }
    Ok(value)
}

fn bounded<T: TryFrom<i128>>(value: i128, field: &str) -> ConfigResult<T> {
    T::try_from(value).map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        message: format!("value {} is out of range", value),
    })
}
