//! Rule-set files — the configuration layer that replaces hardcoded scripts.
//!
//! A rule set names a root, an extension filter, the directories to
//! case-normalize, and an ordered list of replacement rules. File order is
//! application order.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::rewrite::Rule;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub from: String,
    pub to: String,
    /// When true, `from` matches case-insensitively (still a literal token).
    #[serde(default)]
    pub insensitive: bool,
}

impl RuleSpec {
    pub fn compile(&self) -> Result<Rule> {
        if self.insensitive {
            Rule::insensitive(&self.from, &self.to)
        } else if self.from.is_empty() {
            Err(Error::ruleset_invalid_rule(&self.from, "empty match token"))
        } else {
            Ok(Rule::literal(&self.from, &self.to))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// Root directory the rules apply under. Relative to the rule-set file's
    /// directory unless absolute; overridable from the command line.
    #[serde(default)]
    pub root: Option<String>,
    /// Extension filter, without dots (e.g. `["java"]`). Empty matches all.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Directories (relative to root) whose immediate subdirectories get
    /// case-normalized before the rewrite pass.
    #[serde(default)]
    pub normalize_dirs: Vec<String>,
    /// Ordered replacement rules.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl RuleSet {
    pub fn compile_rules(&self) -> Result<Vec<Rule>> {
        self.rules.iter().map(|spec| spec.compile()).collect()
    }
}

pub fn load(path: &Path) -> Result<RuleSet> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("read rule-set {}", path.display())),
        )
    })?;

    serde_json::from_str(&content)
        .map_err(|e| Error::ruleset_invalid_json(path.display().to_string(), e))
}
