//! Compliance trials
//!
//! Every executed command can be appended to a JSONL trial log as a
//! [`TrialRecord`]. [`TrialStats`] aggregates such a log back into rates,
//! with a Wilson score interval for the plan-compliance rate.

use crate::plan::PlanCompliance;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of the trial log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub model: String,
    pub user_input: String,
    /// Whether the planner output parsed as a plan document
    pub json_valid: bool,
    pub compliance: PlanCompliance,
    pub tool_compliance_rate: f64,
    /// Plan compliant and no step of the run reported an error
    pub auto_success: bool,
    #[serde(default)]
    pub manual_success: Option<bool>,
    /// The plan steps as the planner wrote them
    pub plan: Value,
}

impl TrialRecord {
    pub fn new(
        timestamp: impl Into<String>,
        model: impl Into<String>,
        user_input: impl Into<String>,
        json_valid: bool,
        compliance: PlanCompliance,
        plan: Value,
    ) -> Self {
        let tool_compliance_rate = compliance.tool_compliance_rate();
        let auto_success = compliance.plan_compliant;
        Self {
            timestamp: timestamp.into(),
            model: model.into(),
            user_input: user_input.into(),
            json_valid,
            compliance,
            tool_compliance_rate,
            auto_success,
            manual_success: None,
            plan,
        }
    }

    /// Downgrade `auto_success` when the run itself hit errors.
    pub fn with_execution_errors(mut self, errors: usize) -> Self {
        self.auto_success = self.auto_success && errors == 0;
        self
    }
}

/// Wilson score interval for `k` successes out of `n` trials.
///
/// Returns `(0.0, 0.0)` for `n == 0`.
pub fn wilson_ci(k: u64, n: u64, z: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }
    let n = n as f64;
    let phat = k as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (phat + z2 / (2.0 * n)) / denom;
    let half = z * ((phat * (1.0 - phat) + z2 / (4.0 * n)) / n).sqrt() / denom;
    ((center - half).max(0.0), (center + half).min(1.0))
}

/// z for a two-sided 95 % interval
pub const Z_95: f64 = 1.96;

/// Aggregate over a trial log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrialStats {
    pub trials: u64,
    pub json_valid: u64,
    pub plan_compliant: u64,
    pub tool_compliance_sum: f64,
    pub manual_labeled: u64,
    pub manual_success: u64,
}

fn rate(k: u64, n: u64) -> f64 {
    if n == 0 { 0.0 } else { k as f64 / n as f64 }
}

impl TrialStats {
    /// Fold one raw log line in. Missing fields count as false / zero so
    /// logs written by older versions still aggregate.
    pub fn add(&mut self, record: &Value) {
        self.trials += 1;
        if record.get("json_valid").and_then(Value::as_bool) == Some(true) {
            self.json_valid += 1;
        }
        if record
            .get("compliance")
            .and_then(|c| c.get("plan_compliant"))
            .and_then(Value::as_bool)
            == Some(true)
        {
            self.plan_compliant += 1;
        }
        self.tool_compliance_sum += record
            .get("tool_compliance_rate")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        if let Some(success) = record.get("manual_success").and_then(Value::as_bool) {
            self.manual_labeled += 1;
            if success {
                self.manual_success += 1;
            }
        }
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.add(record);
        }
        stats
    }

    pub fn json_valid_rate(&self) -> f64 {
        rate(self.json_valid, self.trials)
    }

    pub fn plan_compliant_rate(&self) -> f64 {
        rate(self.plan_compliant, self.trials)
    }

    pub fn avg_tool_compliance(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.tool_compliance_sum / self.trials as f64
        }
    }

    pub fn plan_compliant_ci(&self) -> (f64, f64) {
        wilson_ci(self.plan_compliant, self.trials, Z_95)
    }

    /// `None` when no trial was labelled by hand.
    pub fn manual_success_rate(&self) -> Option<f64> {
        (self.manual_labeled > 0).then(|| rate(self.manual_success, self.manual_labeled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Plan, validate_plan};
    use crate::action::ActionVocabulary;
    use serde_json::json;

    #[test]
    fn test_wilson_ci() {
        assert_eq!(wilson_ci(0, 0, Z_95), (0.0, 0.0));

        let (lo, hi) = wilson_ci(8, 10, Z_95);
        assert!((lo - 0.4902).abs() < 1e-3, "lo = {}", lo);
        assert!((hi - 0.9433).abs() < 1e-3, "hi = {}", hi);

        let (lo, hi) = wilson_ci(10, 10, Z_95);
        assert!(hi <= 1.0 && lo > 0.6);
    }

    #[test]
    fn test_record_from_compliance() {
        let plan = Plan::new("Waving.").with_step("Propagate Action", json!({"Action": "wave"}));
        let compliance = validate_plan(&plan, &ActionVocabulary::default());
        let record = TrialRecord::new(
            "2025-01-01T00:00:00Z",
            "qwen3:8b",
            "wave",
            true,
            compliance,
            serde_json::to_value(&plan.steps).unwrap(),
        );
        assert!(record.auto_success);
        assert_eq!(record.tool_compliance_rate, 1.0);
        assert!(!record.clone().with_execution_errors(1).auto_success);

        let line = serde_json::to_value(&record).unwrap();
        assert_eq!(line["compliance"]["plan_compliant"], true);
        assert_eq!(line["manual_success"], serde_json::Value::Null);
    }

    #[test]
    fn test_stats_aggregate() {
        let lines = vec![
            json!({"json_valid": true, "compliance": {"plan_compliant": true}, "tool_compliance_rate": 1.0, "manual_success": true}),
            json!({"json_valid": true, "compliance": {"plan_compliant": false}, "tool_compliance_rate": 0.5, "manual_success": null}),
            json!({"json_valid": false}),
            json!({"json_valid": true, "compliance": {"plan_compliant": true}, "tool_compliance_rate": 1.0, "manual_success": false}),
        ];
        let stats = TrialStats::from_records(&lines);
        assert_eq!(stats.trials, 4);
        assert_eq!(stats.json_valid_rate(), 0.75);
        assert_eq!(stats.plan_compliant_rate(), 0.5);
        assert_eq!(stats.avg_tool_compliance(), 0.625);
        assert_eq!(stats.manual_labeled, 2);
        assert_eq!(stats.manual_success_rate(), Some(0.5));
    }

    #[test]
    fn test_empty_stats() {
        let stats = TrialStats::default();
        assert_eq!(stats.plan_compliant_rate(), 0.0);
        assert_eq!(stats.avg_tool_compliance(), 0.0);
        assert_eq!(stats.manual_success_rate(), None);
        assert_eq!(stats.plan_compliant_ci(), (0.0, 0.0));
    }
}
