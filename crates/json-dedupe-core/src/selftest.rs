//! Bundled scenario checks behind `json-dedupe self-test`
//!
//! Each scenario runs the deduplicator on a fixed input and compares the
//! output text exactly, so element shape (key order, sequence order) is
//! checked along with membership. A second pass over the output must then
//! remove nothing.

use serde::Serialize;

use crate::dedupe::deduplicate;
use crate::value::{parse_items, JsonValue};

struct Scenario {
    name: &'static str,
    input: &'static str,
    expected: &'static str,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "mapping-key-order",
        input: r#"[{"Name":"John","Age":40},{"Age":40,"Name":"John"},{"Name":"Nancy","Age":60}]"#,
        expected: r#"[{"Name":"John","Age":40},{"Name":"Nancy","Age":60}]"#,
    },
    Scenario {
        name: "primitive-list-order",
        input: "[[1,2,3],[3,2,1]]",
        expected: "[[1,2,3],[3,2,1]]",
    },
    Scenario {
        name: "nested-primitive-list-order",
        input: r#"[{"user":{"name":"John","preferences":["reading","gaming"]},"scores":[1,2,3]},{"user":{"preferences":["gaming","reading"],"name":"John"},"scores":[1,2,3]}]"#,
        expected: r#"[{"user":{"name":"John","preferences":["reading","gaming"]},"scores":[1,2,3]},{"user":{"preferences":["gaming","reading"],"name":"John"},"scores":[1,2,3]}]"#,
    },
    Scenario {
        name: "empty-input",
        input: "[]",
        expected: "[]",
    },
    Scenario {
        name: "empty-mappings",
        input: "[{},{}]",
        expected: "[{}]",
    },
    Scenario {
        name: "composite-list-order",
        input: r#"[{"a":[1,{"b":2}]},{"a":[{"b":2},1]}]"#,
        expected: r#"[{"a":[1,{"b":2}]}]"#,
    },
    Scenario {
        name: "no-overlap",
        input: r#"[{"Name":"John","Age":40},{"Name":"Nancy","Age":60}]"#,
        expected: r#"[{"Name":"John","Age":40},{"Name":"Nancy","Age":60}]"#,
    },
    Scenario {
        name: "overlap",
        input: r#"[{"Name":"John","Age":40},{"Name":"Nancy","Age":60},{"Age":40,"Name":"John"}]"#,
        expected: r#"[{"Name":"John","Age":40},{"Name":"Nancy","Age":60}]"#,
    },
    Scenario {
        name: "nested-structures",
        input: r#"[{"a":[{"x":1},{"y":2}],"b":[0,1]},{"b":[0,1],"a":[{"y":2},{"x":1}]},{"a":[{"x":1},{"y":2}],"b":[0,1]}]"#,
        expected: r#"[{"a":[{"x":1},{"y":2}],"b":[0,1]}]"#,
    },
    Scenario {
        name: "primitive-lists",
        input: r#"[{"nums":[1,0,1]},{"nums":[0,1,1]},{"nums":[1,0,1]}]"#,
        expected: r#"[{"nums":[1,0,1]},{"nums":[0,1,1]}]"#,
    },
    Scenario {
        name: "empty-structures",
        input: r#"[{"empty_list":[],"empty_dict":{}},{"empty_dict":{},"empty_list":[]},{"empty_list":[],"empty_dict":{}},{"a":[]},{"a":[]}]"#,
        expected: r#"[{"empty_list":[],"empty_dict":{}},{"a":[]}]"#,
    },
    Scenario {
        name: "mixed-types",
        input: r#"[{"a":1,"b":"string","c":true,"d":1.5},{"b":"string","a":1,"d":1.5,"c":true},{"a":1,"b":"string","c":true,"d":1.5}]"#,
        expected: r#"[{"a":1,"b":"string","c":true,"d":1.5}]"#,
    },
    Scenario {
        name: "integer-vs-float",
        input: "[1,1.0,1,1.0]",
        expected: "[1,1.0]",
    },
    Scenario {
        name: "mapping-vs-pair-list",
        input: r#"[{"a":1},[["a",1]],{"a":1}]"#,
        expected: r#"[{"a":1},[["a",1]]]"#,
    },
];

/// Outcome of one bundled scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Outcomes of every bundled scenario, in definition order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelfTestReport {
    pub scenarios: Vec<ScenarioOutcome>,
}

impl SelfTestReport {
    /// True when every scenario passed
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(|s| s.passed)
    }

    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.scenarios.iter().filter(|s| !s.passed).collect()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Run every bundled scenario
pub fn run() -> SelfTestReport {
    let scenarios = SCENARIOS
        .iter()
        .map(|scenario| {
            let result = check(scenario);
            ScenarioOutcome {
                name: scenario.name.to_string(),
                passed: result.is_ok(),
                detail: result.err(),
            }
        })
        .collect();
    SelfTestReport { scenarios }
}

fn check(scenario: &Scenario) -> Result<(), String> {
    let items = parse_items(scenario.input).map_err(|e| format!("input: {}", e))?;
    let expected = parse_items(scenario.expected).map_err(|e| format!("expected: {}", e))?;

    let once = deduplicate(&items).map_err(|e| e.to_string())?;
    let got = render(&once)?;
    let want = render(&expected)?;
    if got != want {
        return Err(format!("expected {}, got {}", want, got));
    }

    let twice = deduplicate(&once).map_err(|e| e.to_string())?;
    if twice.len() != once.len() {
        return Err(format!(
            "second pass removed {} more item(s)",
            once.len() - twice.len()
        ));
    }
    Ok(())
}

fn render(items: &[JsonValue]) -> Result<String, String> {
    serde_json::to_string(items).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scenarios_pass() {
        let report = run();
        assert_eq!(report.len(), SCENARIOS.len());
        for outcome in &report.scenarios {
            assert!(outcome.passed, "{} failed: {:?}", outcome.name, outcome.detail);
        }
        assert!(report.passed());
        assert!(report.failures().is_empty());
    }

    #[test]
    fn test_scenario_names_unique() {
        let mut names: Vec<_> = SCENARIOS.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SCENARIOS.len());
    }

    #[test]
    fn test_mismatch_is_reported() {
        let bogus = Scenario {
            name: "bogus",
            input: "[[1,2],[2,1]]",
            expected: "[[1,2]]",
        };
        let detail = check(&bogus).unwrap_err();
        assert_eq!(detail, "expected [[1,2]], got [[1,2],[2,1]]");
    }

    #[test]
    fn test_report_serializes_without_empty_detail() {
        let report = SelfTestReport {
            scenarios: vec![
                ScenarioOutcome {
                    name: "ok".into(),
                    passed: true,
                    detail: None,
                },
                ScenarioOutcome {
                    name: "bad".into(),
                    passed: false,
                    detail: Some("boom".into()),
                },
            ],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["scenarios"][0].get("detail").is_none());
        assert_eq!(json["scenarios"][1]["detail"], "boom");
        assert!(!report.passed());
        assert_eq!(report.failures().len(), 1);
    }
}
