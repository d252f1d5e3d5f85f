use srcmend::rewrite::Rule;
use srcmend::{Error, Result};

pub mod doctor;
pub mod fix;
pub mod normalize;
pub mod rebuild;
pub mod repair;
pub mod restore;
pub mod rewrite;

pub type CmdResult<T> = Result<(T, i32)>;

/// Parse a `FROM=TO` rule flag. The first `=` splits; the replacement may
/// contain further `=` characters, the match token may not.
pub fn parse_rule_flag(raw: &str, insensitive: bool) -> Result<Rule> {
    let (from, to) = raw.split_once('=').ok_or_else(|| {
        Error::validation_invalid_argument(
            if insensitive { "irule" } else { "rule" },
            format!("'{}' is missing the '=' separator", raw),
        )
        .with_hint("Rules take the form FROM=TO, e.g. --rule .Entities=.entities")
    })?;

    if from.is_empty() {
        return Err(Error::validation_invalid_argument(
            if insensitive { "irule" } else { "rule" },
            "empty match token before '='",
        ));
    }

    if insensitive {
        Rule::insensitive(from, to)
    } else {
        Ok(Rule::literal(from, to))
    }
}

/// Collect the ordered rule list for a rewrite invocation.
///
/// Application order is the documented contract: rules from `--rules-file`
/// first (file order), then `--rule` literals in flag order, then `--irule`
/// case-insensitive rules in flag order.
pub fn collect_rules(
    rules_file: Option<&str>,
    literal_flags: &[String],
    insensitive_flags: &[String],
) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();

    if let Some(path) = rules_file {
        let path = srcmend::paths::require_file(path)?;
        let set = srcmend::ruleset::load(&path)?;
        rules.extend(set.compile_rules()?);
    }

    for raw in literal_flags {
        rules.push(parse_rule_flag(raw, false)?);
    }
    for raw in insensitive_flags {
        rules.push(parse_rule_flag(raw, true)?);
    }

    if rules.is_empty() {
        return Err(Error::validation_invalid_argument(
            "rule",
            "no replacement rules supplied",
        )
        .with_hint("Pass --rule FROM=TO, --irule FROM=TO, or --rules-file FILE"));
    }

    Ok(rules)
}

pub(crate) fn run_json(command: crate::Commands) -> (Result<serde_json::Value>, i32) {
    crate::tty::status("srcmend is working...");

    match command {
        crate::Commands::Rewrite(args) => crate::output::map_cmd_result_to_json(rewrite::run(args)),
        crate::Commands::Normalize(args) => {
            crate::output::map_cmd_result_to_json(normalize::run(args))
        }
        crate::Commands::Fix(args) => crate::output::map_cmd_result_to_json(fix::run(args)),
        crate::Commands::Rebuild(args) => crate::output::map_cmd_result_to_json(rebuild::run(args)),
        crate::Commands::Repair(args) => crate::output::map_cmd_result_to_json(repair::run(args)),
        crate::Commands::Restore(args) => crate::output::map_cmd_result_to_json(restore::run(args)),
        crate::Commands::Doctor(args) => crate::output::map_cmd_result_to_json(doctor::run(args)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_flag_splits_on_first_equals() {
        let rule = parse_rule_flag(".Entities=.entities", false).unwrap();
        let summary = rule.summary();
        assert_eq!(summary.from, ".Entities");
        assert_eq!(summary.to, ".entities");
        assert_eq!(summary.kind, "literal");
    }

    #[test]
    fn replacement_may_contain_equals() {
        let rule = parse_rule_flag("key=a=b", false).unwrap();
        assert_eq!(rule.summary().to, "a=b");
    }

    #[test]
    fn missing_separator_is_invalid() {
        let err = parse_rule_flag("no-separator", false).unwrap_err();
        assert_eq!(err.code, srcmend::ErrorCode::ValidationInvalidArgument);
    }

    #[test]
    fn no_rules_at_all_is_invalid() {
        let err = collect_rules(None, &[], &[]).unwrap_err();
        assert_eq!(err.code, srcmend::ErrorCode::ValidationInvalidArgument);
    }

    #[test]
    fn flag_order_is_preserved() {
        let rules = collect_rules(
            None,
            &["a=1".to_string(), "b=2".to_string()],
            &["c=3".to_string()],
        )
        .unwrap();
        let order: Vec<String> = rules.iter().map(|r| r.summary().from).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
