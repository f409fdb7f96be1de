use std::any::Any;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::class_names::merge_optional;
use crate::error::ConfigError;
use crate::locals::ExitValue;
use crate::view::Props;

pub const DEFAULT_FORCE_REMOVE_TIMEOUT: Duration = Duration::from_millis(300);

/// Options for an [`AnimatedTransition`](crate::AnimatedTransition).
#[derive(Clone)]
pub struct TransitionConfig {
    /// Props layered onto exiting clones. `class_name` is merged, not replaced.
    pub exit_props: Props,
    /// Shorthand merged into `exit_props.class_name`.
    pub exit_class: Option<String>,
    /// Upper bound before forced removal when no animation ever starts.
    pub force_remove_timeout: Duration,
    /// Pass input through untouched and keep no state.
    pub disabled: bool,
    /// Value exposed to the subtree of each exiting node.
    pub exit_context: Option<ExitValue>,
}

impl std::fmt::Debug for TransitionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionConfig")
            .field("exit_props", &self.exit_props)
            .field("exit_class", &self.exit_class)
            .field("force_remove_timeout", &self.force_remove_timeout)
            .field("disabled", &self.disabled)
            .field("exit_context", &self.exit_context.as_ref().map(|_| "<any>"))
            .finish()
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            exit_props: Props::default(),
            exit_class: None,
            force_remove_timeout: DEFAULT_FORCE_REMOVE_TIMEOUT,
            disabled: false,
            exit_context: None,
        }
    }
}

impl TransitionConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn exit_props(mut self, props: Props) -> Self {
        self.exit_props = props;
        self
    }
    pub fn exit_class(mut self, class: impl Into<String>) -> Self {
        self.exit_class = Some(class.into());
        self
    }
    pub fn force_remove_timeout(mut self, timeout: Duration) -> Self {
        self.force_remove_timeout = timeout;
        self
    }
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
    pub fn exit_context<T: Any>(mut self, value: T) -> Self {
        self.exit_context = Some(Rc::new(value) as ExitValue);
        self
    }

    /// `exit_props` with `exit_class` folded into its class list.
    pub fn effective_exit_props(&self) -> Props {
        let mut props = self.exit_props.clone();
        if self.exit_class.is_some() {
            props.class_name =
                merge_optional(props.class_name.as_deref(), self.exit_class.as_deref());
        }
        props
    }
}

/// Serializable subset of [`TransitionConfig`] for settings files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionSettings {
    pub exit_class: Option<String>,
    pub exit_attrs: BTreeMap<String, String>,
    pub force_remove_timeout_ms: u64,
    pub disabled: bool,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            exit_class: None,
            exit_attrs: BTreeMap::new(),
            force_remove_timeout_ms: DEFAULT_FORCE_REMOVE_TIMEOUT.as_millis() as u64,
            disabled: false,
        }
    }
}

impl TransitionSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into())
    }

    pub fn into_config(self) -> TransitionConfig {
        TransitionConfig {
            exit_props: Props {
                attrs: self.exit_attrs,
                ..Props::default()
            },
            exit_class: self.exit_class,
            force_remove_timeout: Duration::from_millis(self.force_remove_timeout_ms),
            disabled: self.disabled,
            exit_context: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = TransitionConfig::default();
        assert_eq!(cfg.force_remove_timeout, Duration::from_millis(300));
        assert!(!cfg.disabled);
        assert_eq!(cfg.effective_exit_props().class_name, None);
    }

    #[test]
    fn test_exit_class_folds_into_props() {
        let cfg = TransitionConfig::new()
            .exit_props(Props::new().class("fade"))
            .exit_class("exiting fade");
        assert_eq!(
            cfg.effective_exit_props().class_name.as_deref(),
            Some("fade exiting")
        );
        // the stored props are left alone
        assert_eq!(cfg.exit_props.class_name.as_deref(), Some("fade"));
    }

    #[test]
    fn test_settings_from_json() {
        let s = TransitionSettings::from_json(
            r#"{ "exit_class": "leaving", "force_remove_timeout_ms": 450,
                 "exit_attrs": { "aria-hidden": "true" } }"#,
        )
        .unwrap();
        let cfg = s.into_config();
        assert_eq!(cfg.force_remove_timeout, Duration::from_millis(450));
        assert_eq!(
            cfg.effective_exit_props().class_name.as_deref(),
            Some("leaving")
        );
        assert_eq!(
            cfg.exit_props.attrs.get("aria-hidden").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_settings_empty_object_uses_defaults() {
        let s = TransitionSettings::from_json("{}").unwrap();
        assert_eq!(s, TransitionSettings::default());
        assert_eq!(s.force_remove_timeout_ms, 300);
    }

    #[test]
    fn test_settings_rejects_unknown_fields() {
        let err = TransitionSettings::from_json(r#"{ "exitClass": "x" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid transition settings"));
    }

    #[test]
    fn test_settings_missing_file() {
        let err = TransitionSettings::from_path("/nonexistent/linger.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let s = TransitionSettings {
            exit_class: Some("out".into()),
            ..TransitionSettings::default()
        };
        assert_eq!(TransitionSettings::from_json(&s.to_json()).unwrap(), s);
    }
}
