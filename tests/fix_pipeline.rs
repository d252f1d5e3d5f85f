//! End-to-end pass over a miniature broken Java tree: case-normalize the
//! package directories, then rewrite package identifiers, and verify the
//! whole pass converges after one application.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use srcmend::normalize::normalize_dirs;
use srcmend::rewrite::{rewrite_tree, Rule};
use srcmend::ruleset;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn broken_tree_is_repaired_in_one_pass() {
    let tmp = TempDir::new().unwrap();
    let java_root = tmp.path().join("src/main/java");
    let pkg = java_root.join("com/expensemanagement");

    // Mixed-case package dirs, one of them colliding with its lowercase twin.
    write(
        tmp.path(),
        "src/main/java/com/expensemanagement/Entities/Expense.java",
        "package com.ExpenseManagement.Entities;\n\npublic class Expense {}\n",
    );
    write(
        tmp.path(),
        "src/main/java/com/expensemanagement/entities/User.java",
        "package com.expensemanagement.Entities;\n\npublic class User {}\n",
    );
    write(
        tmp.path(),
        "src/main/java/com/expensemanagement/Controller/ExpenseController.java",
        "package com.expensemanagement.Controller;\n\nimport com.ExpenseManagement.Entities.Expense;\n",
    );

    // 1. Normalize directory case, merging Entities into entities.
    let normalized = normalize_dirs(&pkg, true).unwrap();
    assert_eq!(normalized.renames.len(), 2);
    assert!(pkg.join("entities/Expense.java").is_file());
    assert!(pkg.join("entities/User.java").is_file());
    assert!(pkg.join("controller/ExpenseController.java").is_file());
    assert!(!pkg.join("Entities").exists());

    // 2. Rewrite package identifiers, caller-supplied order.
    let rules = vec![
        Rule::insensitive("com.expensemanagement", "com.expensemanagement").unwrap(),
        Rule::literal(".Entities", ".entities"),
        Rule::literal(".Controller", ".controller"),
    ];
    let exts = vec!["java".to_string()];

    let first = rewrite_tree(&java_root, &exts, &rules, true).unwrap();
    assert_eq!(first.edits.len(), 3);
    assert!(first.skipped.is_empty());

    let expense = fs::read_to_string(pkg.join("entities/Expense.java")).unwrap();
    assert!(expense.starts_with("package com.expensemanagement.entities;"));
    let controller = fs::read_to_string(pkg.join("controller/ExpenseController.java")).unwrap();
    assert!(controller.contains("package com.expensemanagement.controller;"));
    assert!(controller.contains("import com.expensemanagement.entities.Expense;"));

    // 3. Re-running is a fixed point: no further edits, no renames.
    let second = rewrite_tree(&java_root, &exts, &rules, true).unwrap();
    assert!(second.edits.is_empty());
    let renormalized = normalize_dirs(&pkg, true).unwrap();
    assert!(renormalized.renames.is_empty());
}

#[test]
fn rule_set_file_drives_the_same_pass() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "app/src/Service.java",
        "package com.ExpenseManagement.Services;\n",
    );
    write(
        tmp.path(),
        "mend.json",
        r#"{
            "root": "app",
            "extensions": ["java"],
            "rules": [
                { "from": "com.expensemanagement", "to": "com.expensemanagement", "insensitive": true },
                { "from": ".Services", "to": ".services" }
            ]
        }"#,
    );

    let set = ruleset::load(&tmp.path().join("mend.json")).unwrap();
    let rules = set.compile_rules().unwrap();
    let root = tmp.path().join(set.root.as_deref().unwrap());

    let result = rewrite_tree(&root, &set.extensions, &rules, true).unwrap();
    assert_eq!(result.edits.len(), 1);
    assert_eq!(
        fs::read_to_string(tmp.path().join("app/src/Service.java")).unwrap(),
        "package com.expensemanagement.services;\n"
    );
}
