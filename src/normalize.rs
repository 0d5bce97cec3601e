//! Token normalization.
//!
//! Raw tokens from a mapping table are rewritten into short uppercase codes
//! by applying an ordered list of regex substitutions. Button-state tokens
//! (`mp_*`) are passed through lowercased so the codec can look them up.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{QuadmapError, QuadmapResult};

/// Prefix shared by every button-state token.
pub const BUTTON_STATE_PREFIX: &str = "mp_";

/// Input-side rewrite rules, applied to labels in this order.
///
/// Patterns are regular expressions.
pub const INPUT_RULES: &[(&str, &str)] = &[
    ("kb_", ""),
    ("_", "."),
    ("mouse", "m"),
    ("button", "btn"),
    ("control", "ctrl"),
    ("delete", "del"),
    ("back_space", "bks"),
    ("pag_eup", "pgup"),
    ("page_down", "pgdn"),
    ("caps_lock", "caps"),
    ("num_lock", "num"),
    ("scroll_lock", "scroll"),
    ("print_screen", "prt"),
    ("pause_break", "pause"),
    ("insert", "ins"),
    ("wheel", "whl"),
];

/// Output-side rewrite rules, applied to codes in this order.
///
/// `.left` must run after `_` has become `.`, and the `L.C.` family only
/// matches once `.left`/`right.`/`center` produced their capitals.
pub const OUTPUT_RULES: &[(&str, &str)] = &[
    ("_", "."),
    ("soft", "s"),
    (".left", ".L"),
    ("right.", "R."),
    ("center", "C"),
    ("L.C.", "LC."),
    ("R.C.", "RC."),
    ("L.R.", "LR."),
];

/// An ordered, compiled list of substitutions.
#[derive(Debug)]
pub struct Ruleset {
    rules: Vec<(Regex, &'static str)>,
}

impl Ruleset {
    /// Compiles a ruleset from `(pattern, replacement)` pairs.
    ///
    /// # Errors
    ///
    /// Returns the regex error for the first pattern that fails to compile.
    pub fn compile(rules: &[(&'static str, &'static str)]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|(pattern, replacement)| Ok((Regex::new(pattern)?, *replacement)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the ruleset has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (pattern, replacement)| {
                pattern.replace_all(&acc, *replacement).into_owned()
            })
    }
}

/// Ruleset applied to input labels.
pub static INPUT_RULESET: LazyLock<Result<Ruleset, regex::Error>> =
    LazyLock::new(|| Ruleset::compile(INPUT_RULES));

/// Ruleset applied to output codes.
pub static OUTPUT_RULESET: LazyLock<Result<Ruleset, regex::Error>> =
    LazyLock::new(|| Ruleset::compile(OUTPUT_RULES));

fn checked<'a>(
    name: &str,
    compiled: &'a Result<Ruleset, regex::Error>,
) -> QuadmapResult<&'a Ruleset> {
    compiled
        .as_ref()
        .map_err(|err| QuadmapError::resource(name, err.to_string()))
}

/// Returns true if `token` names a button state (after trimming/lowercasing).
#[must_use]
pub fn is_button_state_token(token: &str) -> bool {
    token.trim().to_lowercase().starts_with(BUTTON_STATE_PREFIX)
}

/// Normalizes a raw token with the given ruleset.
///
/// Empty input yields an empty string. Button-state tokens come back
/// trimmed and lowercased; everything else is rewritten, trimmed and
/// uppercased.
#[must_use]
pub fn normalize(raw: &str, ruleset: &Ruleset) -> String {
    let text = raw.trim().to_lowercase();
    if text.is_empty() || is_button_state_token(&text) {
        return text;
    }

    ruleset.apply(&text).trim().to_uppercase()
}

/// The label and code rulesets used together.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    input: &'a Ruleset,
    output: &'a Ruleset,
}

impl<'a> Normalizer<'a> {
    /// Pairs an input ruleset with an output ruleset.
    #[must_use]
    pub const fn new(input: &'a Ruleset, output: &'a Ruleset) -> Self {
        Self { input, output }
    }

    /// Normalizes an input-side token (a label).
    #[must_use]
    pub fn label(&self, raw: &str) -> String {
        normalize(raw, self.input)
    }

    /// Normalizes an output-side token (a code).
    #[must_use]
    pub fn code(&self, raw: &str) -> String {
        normalize(raw, self.output)
    }
}

impl Normalizer<'static> {
    /// The built-in rulesets.
    ///
    /// # Errors
    ///
    /// Returns [`QuadmapError::ResourceLoad`] if a built-in pattern does not
    /// compile.
    pub fn builtin() -> QuadmapResult<Self> {
        Ok(Self::new(
            checked("input rules", &INPUT_RULESET)?,
            checked("output rules", &OUTPUT_RULESET)?,
        ))
    }
}
