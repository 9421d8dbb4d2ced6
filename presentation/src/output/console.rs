//! Console output formatter for plans, runs and trial statistics

use colored::Colorize;
use pilot_application::PickOutcome;
use pilot_domain::{ExecutionReport, ExecutorPhase, Plan, PlanCompliance, TrialStats};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a plan as the planner returned it
    pub fn format_plan(plan: &Plan) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Robot:".cyan().bold(), plan.response));
        if plan.is_empty() {
            output.push_str(&format!("{}\n", "(no steps)".dimmed()));
            return output;
        }

        output.push_str(&Self::section_header("Plan"));
        for step in &plan.steps {
            output.push_str(&format!(
                "  {}. {} {}\n",
                step.step,
                step.tool.bold(),
                step.params.to_string().dimmed()
            ));
        }
        output
    }

    /// Format compliance metrics of a plan
    pub fn format_compliance(compliance: &PlanCompliance) -> String {
        let mut output = String::new();

        if !compliance.parsed_ok {
            return format!("{} planner output did not parse\n", "x".red());
        }

        let verdict = if compliance.plan_compliant {
            "compliant".green().bold()
        } else {
            "non-compliant".red().bold()
        };
        output.push_str(&format!(
            "{} {} ({}/{} steps, tool compliance {:.1}%)\n",
            "Compliance:".cyan().bold(),
            verdict,
            compliance.num_compliant_steps,
            compliance.num_steps,
            compliance.tool_compliance_rate() * 100.0
        ));

        for step in &compliance.step_violations {
            for violation in &step.violations {
                output.push_str(&format!(
                    "  {} step {}: {}\n",
                    "x".red(),
                    step.step_index + 1,
                    violation
                ));
            }
        }
        output
    }

    /// Format the outcome of an executed plan
    pub fn format_report(report: &ExecutionReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Execution"));
        for record in &report.log.records {
            let mark = if record.error_flag {
                "x".red()
            } else {
                "v".green()
            };
            output.push_str(&format!(
                "  {} {}. {} -> {}\n",
                mark, record.step, record.tool, record.result_text
            ));
        }

        for replan in &report.log.replans {
            output.push_str(&format!(
                "  {} replan {} after step {}: {}\n",
                "~".yellow(),
                replan.attempt,
                replan.failing_step,
                replan.outcome
            ));
        }

        let phase = match report.phase {
            ExecutorPhase::Done => report.phase.as_str().green().bold(),
            _ => report.phase.as_str().red().bold(),
        };
        output.push_str(&format!("\n{} {}", "Result:".cyan().bold(), phase));
        if let Some(failure) = &report.failure {
            output.push_str(&format!(" ({})", failure));
        }
        output.push('\n');

        if let Some(analysis) = &report.log.final_analysis {
            output.push_str(&Self::section_header("Analysis"));
            output.push_str(analysis.trim());
            output.push('\n');
        }
        output
    }

    /// Format a direct pick run
    pub fn format_pick(outcome: &PickOutcome) -> String {
        let verdict = if outcome.success {
            "picked".green().bold()
        } else {
            "not reached".red().bold()
        };
        let mut output = format!(
            "{} {} {} after {} steps\n",
            "Pick:".cyan().bold(),
            outcome.object_description,
            verdict,
            outcome.steps
        );
        output.push_str(&format!(
            "{} [{}]\n",
            "Actions:".cyan().bold(),
            outcome.actions.join(", ")
        ));
        if let Some(path) = &outcome.episode_path {
            output.push_str(&format!("{} {}\n", "Episode:".dimmed(), path.display()));
        }
        output
    }

    /// Format aggregated trial statistics
    pub fn format_stats(stats: &TrialStats) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Trial Statistics"));
        output.push('\n');

        let (lo, hi) = stats.plan_compliant_ci();
        let rows = [
            ("Trials", stats.trials.to_string()),
            (
                "JSON valid",
                format!("{:.1}%", stats.json_valid_rate() * 100.0),
            ),
            (
                "Plan compliant",
                format!(
                    "{:.1}% (95% CI {:.1}%-{:.1}%)",
                    stats.plan_compliant_rate() * 100.0,
                    lo * 100.0,
                    hi * 100.0
                ),
            ),
            (
                "Avg tool compliance",
                format!("{:.1}%", stats.avg_tool_compliance() * 100.0),
            ),
            (
                "Manual success",
                match stats.manual_success_rate() {
                    Some(rate) => format!(
                        "{:.1}% of {} labelled",
                        rate * 100.0,
                        stats.manual_labeled
                    ),
                    None => "unlabelled".to_string(),
                },
            ),
        ];
        for (label, value) in rows {
            output.push_str(&format!("{:<22}{}\n", format!("{}:", label), value));
        }

        output.push_str(&Self::footer());
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_domain::{
        ActionVocabulary, ExecutionLog, ExecutionRecord, FailureReason, validate_plan,
    };
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    fn wave_plan() -> Plan {
        Plan::new("Waving").with_step("Propagate Action", json!({"Action": "wave"}))
    }

    #[test]
    fn test_format_plan_lists_steps() {
        plain();
        let output = ConsoleFormatter::format_plan(&wave_plan());
        assert!(output.contains("Robot: Waving"));
        assert!(output.contains(r#"1. Propagate Action {"Action":"wave"}"#));
    }

    #[test]
    fn test_format_compliance_lists_violations() {
        plain();
        let plan = Plan::new("")
            .with_step("Propagate Action", json!({"Action": "moonwalk"}))
            .with_step("Control Servo", json!({"Servo Position": 1500}));
        let compliance = validate_plan(&plan, &ActionVocabulary::default());

        let output = ConsoleFormatter::format_compliance(&compliance);
        assert!(output.contains("non-compliant (1/2 steps, tool compliance 50.0%)"));
        assert!(output.contains("step 1: Invalid Action 'moonwalk'"));
    }

    #[test]
    fn test_format_report_shows_failure() {
        plain();
        let mut log = ExecutionLog::new("Waving");
        log.push(ExecutionRecord {
            step: 1,
            tool: "Propagate Action".to_string(),
            params: json!({"Action": "wave"}),
            result_text: "Action failed: timeout".to_string(),
            error_flag: true,
        });
        let report = ExecutionReport {
            phase: ExecutorPhase::Failed,
            log,
            final_plan: wave_plan(),
            failure: Some(FailureReason::Cancelled),
        };

        let output = ConsoleFormatter::format_report(&report);
        assert!(output.contains("x 1. Propagate Action -> Action failed: timeout"));
        assert!(output.contains("Result: failed (cancelled)"));
        assert!(!output.contains("Analysis"));
    }

    #[test]
    fn test_format_stats() {
        plain();
        let records = [
            json!({"json_valid": true, "compliance": {"plan_compliant": true}, "tool_compliance_rate": 1.0}),
            json!({"json_valid": false, "compliance": {"plan_compliant": false}, "tool_compliance_rate": 0.0}),
        ];
        let output = ConsoleFormatter::format_stats(&TrialStats::from_records(&records));
        assert!(output.contains("Trials:"));
        assert!(output.contains("50.0%"));
        assert!(output.contains("unlabelled"));
    }
}
