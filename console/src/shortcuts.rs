//! Keyboard-shortcut parsing, matching, and dispatch.
//!
//! Combos are written the way operators read them (`Ctrl+K`,
//! `Shift+Alt+P`); the registry matches incoming key events against bound
//! combos and skips bindings while the focus sits in an editing surface.
//! Peripheral to the core, but the matching rules are exact: a combo fires
//! only when its modifier set equals the event's modifier set.

use thiserror::Error;

/// Errors raised when parsing a combo string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShortcutParseError {
    /// Every part of the combo named a modifier; no main key remained.
    #[error("shortcut must name a non-modifier key")]
    MissingKey,
}

/// One parsed chord, e.g. `Ctrl+K`.
///
/// Modifier aliases are accepted while parsing: `control` for `ctrl`,
/// `option` for `alt`, and `cmd`/`command` for `meta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    key: String,
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
}

impl KeyCombo {
    /// Parse a `+`-separated combo string.
    ///
    /// The first non-modifier part becomes the main key (lowercased);
    /// later non-modifier parts are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcutParseError::MissingKey`] when no main key is left.
    pub fn parse(combo: &str) -> Result<Self, ShortcutParseError> {
        let mut parsed = Self {
            key: String::new(),
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        };
        for part in combo.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => parsed.ctrl = true,
                "alt" | "option" => parsed.alt = true,
                "shift" => parsed.shift = true,
                "meta" | "cmd" | "command" => parsed.meta = true,
                "" => {}
                other => {
                    if parsed.key.is_empty() {
                        parsed.key = other.to_owned();
                    }
                }
            }
        }
        if parsed.key.is_empty() {
            return Err(ShortcutParseError::MissingKey);
        }
        Ok(parsed)
    }

    /// Whether `press` is exactly this chord: same key, same modifier set.
    pub fn matches(&self, press: &KeyPress) -> bool {
        press.key.to_lowercase() == self.key
            && press.ctrl == self.ctrl
            && press.alt == self.alt
            && press.shift == self.shift
            && press.meta == self.meta
    }

    /// The main key, lowercased.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }
}

/// A key event as reported by the embedding shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    /// Key value (case-insensitive for matching).
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    /// Focus currently sits in an input, textarea, or other editing surface.
    pub editing: bool,
}

impl KeyPress {
    /// Plain press of `key` with no modifiers.
    pub fn of(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}

/// Options for one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutOptions {
    /// Skip this binding while the focus is in an editing surface.
    pub ignore_when_editing: bool,
}

impl Default for ShortcutOptions {
    fn default() -> Self {
        Self {
            ignore_when_editing: true,
        }
    }
}

/// Handle for removing a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

type Handler = Box<dyn Fn(&KeyPress) + Send + Sync>;

struct Binding {
    id: BindingId,
    combo: KeyCombo,
    options: ShortcutOptions,
    handler: Handler,
}

/// Registry dispatching key events to bound handlers.
///
/// # Examples
/// ```
/// use console::shortcuts::{KeyPress, ShortcutRegistry};
///
/// let mut registry = ShortcutRegistry::new();
/// registry
///     .register("Ctrl+K", |_press| { /* open the search palette */ })
///     .expect("combo parses");
/// let press = KeyPress { key: "k".into(), ctrl: true, ..KeyPress::default() };
/// assert_eq!(registry.dispatch(&press), 1);
/// ```
#[derive(Default)]
pub struct ShortcutRegistry {
    bindings: Vec<Binding>,
    next_id: u64,
}

impl ShortcutRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to a combo string with default options.
    ///
    /// # Errors
    ///
    /// Fails when the combo string does not parse.
    pub fn register(
        &mut self,
        combo: &str,
        handler: impl Fn(&KeyPress) + Send + Sync + 'static,
    ) -> Result<BindingId, ShortcutParseError> {
        self.register_with(combo, ShortcutOptions::default(), handler)
    }

    /// Bind `handler` with explicit options.
    ///
    /// # Errors
    ///
    /// Fails when the combo string does not parse.
    pub fn register_with(
        &mut self,
        combo: &str,
        options: ShortcutOptions,
        handler: impl Fn(&KeyPress) + Send + Sync + 'static,
    ) -> Result<BindingId, ShortcutParseError> {
        let combo = KeyCombo::parse(combo)?;
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.bindings.push(Binding {
            id,
            combo,
            options,
            handler: Box::new(handler),
        });
        Ok(id)
    }

    /// Remove a binding; returns whether it existed.
    pub fn unregister(&mut self, id: BindingId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|binding| binding.id != id);
        self.bindings.len() != before
    }

    /// Fire every binding matching `press`; returns how many fired.
    pub fn dispatch(&self, press: &KeyPress) -> usize {
        let mut fired = 0;
        for binding in &self.bindings {
            if binding.options.ignore_when_editing && press.editing {
                continue;
            }
            if binding.combo.matches(press) {
                (binding.handler)(press);
                fired += 1;
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rstest::rstest;

    use super::*;

    fn press(key: &str, ctrl: bool, alt: bool, shift: bool, meta: bool) -> KeyPress {
        KeyPress {
            key: key.to_owned(),
            ctrl,
            alt,
            shift,
            meta,
            editing: false,
        }
    }

    #[rstest]
    #[case::simple("Ctrl+K", "k", true, false, false, false)]
    #[case::aliases("Command+Option+P", "p", false, true, false, true)]
    #[case::control_alias("Control+/", "/", true, false, false, false)]
    #[case::triple("Shift+Alt+P", "p", false, true, true, false)]
    #[case::bare_key("Escape", "escape", false, false, false, false)]
    fn parse_recognizes_modifiers_and_aliases(
        #[case] combo: &str,
        #[case] key: &str,
        #[case] ctrl: bool,
        #[case] alt: bool,
        #[case] shift: bool,
        #[case] meta: bool,
    ) {
        let parsed = KeyCombo::parse(combo).expect("combo parses");
        assert_eq!(parsed.key(), key);
        assert!(parsed.matches(&press(key, ctrl, alt, shift, meta)));
    }

    #[test]
    fn parse_rejects_modifier_only_combos() {
        assert_eq!(KeyCombo::parse("Ctrl+Shift"), Err(ShortcutParseError::MissingKey));
        assert_eq!(KeyCombo::parse(""), Err(ShortcutParseError::MissingKey));
    }

    #[test]
    fn matching_requires_the_exact_modifier_set() {
        let combo = KeyCombo::parse("Ctrl+K").expect("combo parses");
        assert!(combo.matches(&press("K", true, false, false, false)), "key is case-insensitive");
        assert!(!combo.matches(&press("k", true, false, true, false)), "extra modifier must not fire");
        assert!(!combo.matches(&press("k", false, false, false, false)), "missing modifier must not fire");
    }

    #[test]
    fn dispatch_counts_fired_handlers_and_honors_unregister() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut registry = ShortcutRegistry::new();

        let observed = Arc::clone(&fired);
        let binding = registry
            .register("Ctrl+K", move |_press| {
                observed.fetch_add(1, Ordering::SeqCst);
            })
            .expect("combo parses");

        let event = press("k", true, false, false, false);
        assert_eq!(registry.dispatch(&event), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        assert!(registry.unregister(binding));
        assert!(!registry.unregister(binding), "second removal is a no-op");
        assert_eq!(registry.dispatch(&event), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn editing_surfaces_suppress_default_bindings() {
        let mut registry = ShortcutRegistry::new();
        registry.register("/", |_press| {}).expect("combo parses");
        registry
            .register_with(
                "Ctrl+S",
                ShortcutOptions {
                    ignore_when_editing: false,
                },
                |_press| {},
            )
            .expect("combo parses");

        let mut slash = KeyPress::of("/");
        slash.editing = true;
        assert_eq!(registry.dispatch(&slash), 0, "default bindings are skipped");

        let save = KeyPress {
            key: "s".to_owned(),
            ctrl: true,
            editing: true,
            ..KeyPress::default()
        };
        assert_eq!(registry.dispatch(&save), 1, "opted-in bindings still fire");
    }
}
