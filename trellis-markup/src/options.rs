use serde::Deserialize;

/// Event names recognised after the reserved `_` prefix when no list is
/// configured.
pub const DEFAULT_EVENTS: &[&str] = &[
    "click",
    "double_click",
    "change",
    "input",
    "submit",
    "focus",
    "blur",
    "key_down",
    "key_up",
    "mouse_enter",
    "mouse_leave",
];

pub const DEFAULT_RUNTIME_PATH: &str = "::trellis_runtime";

/// Knobs for one compilation. Every field has a default, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Path under which generated code finds `VNode`, `PropValue`,
    /// `EventHandler` and `Rebuild`.
    pub runtime_path: String,
    /// Event names that turn a `_name` attribute into a handler binding.
    pub events: Vec<String>,
    /// Reject malformed `_foreach` values instead of dropping them.
    pub strict_directives: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            events: DEFAULT_EVENTS.iter().map(|e| e.to_string()).collect(),
            strict_directives: false,
        }
    }
}

impl CompileOptions {
    /// The configured spelling of `name` if it is a known event
    /// (case-insensitive).
    pub fn event_name(&self, name: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|e| e.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}
