//! Progress reporting for plan execution and the pick loop

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pilot_application::ExecutionProgressNotifier;
use pilot_domain::util::{first_line, truncate_chars};
use pilot_domain::{Decision, ExecutionRecord, ExecutorPhase, Plan, PlanStep, ReplanEvent};
use std::sync::Mutex;
use std::time::Duration;

const MESSAGE_WIDTH: usize = 60;

/// Reports progress with an indicatif bar over the plan steps
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn step_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }

    /// The current bar, created on first use with `total` steps
    fn ensure_bar(&self, total: usize) {
        if let Ok(mut guard) = self.bar.lock() {
            let bar = guard.get_or_insert_with(|| {
                let bar = ProgressBar::new(total as u64);
                bar.set_style(Self::step_style());
                bar.set_prefix("Executing");
                bar.enable_steady_tick(Duration::from_millis(120));
                bar
            });
            bar.set_length(total as u64);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionProgressNotifier for ProgressReporter {
    fn on_plan_ready(&self, plan: &Plan) {
        println!("{} {}", "Robot:".cyan().bold(), plan.response);
    }

    fn on_phase_change(&self, phase: ExecutorPhase) {
        if phase.is_terminal()
            && let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_and_clear();
        }
    }

    fn on_step_start(&self, step: &PlanStep, index: usize, total: usize) {
        self.ensure_bar(total);
        self.with_bar(|bar| {
            bar.set_position(index as u64);
            let message = format!("{} {}", step.tool, step.params);
            bar.set_message(truncate_chars(&message, MESSAGE_WIDTH).into_owned());
        });
    }

    fn on_step_complete(&self, record: &ExecutionRecord) {
        let mark = if record.error_flag {
            "x".red()
        } else {
            "v".green()
        };
        let line = format!(
            "  {} {}. {}",
            mark,
            record.step,
            first_line(&record.result_text)
        );
        let mut printed = false;
        self.with_bar(|bar| {
            bar.println(&line);
            bar.inc(1);
            printed = true;
        });
        if !printed {
            println!("{}", line);
        }
    }

    fn on_replan_start(&self, failing_step: u32, attempt: u32) {
        self.with_bar(|bar| {
            bar.set_message(format!("replanning after step {} (attempt {})", failing_step, attempt))
        });
    }

    fn on_replan_complete(&self, event: &ReplanEvent) {
        let line = format!("  {} replan {}: {}", "~".yellow(), event.attempt, event.outcome);
        self.with_bar(|bar| bar.println(&line));
    }

    fn on_analysis_start(&self) {
        self.with_bar(|bar| bar.set_message("analyzing run..."));
    }

    fn on_pick_frame(&self, step: u32, decision: &Decision) {
        self.with_bar(|bar| {
            bar.set_message(format!(
                "pick frame {}: {} head {} ({})",
                step, decision.action, decision.head, decision.phase
            ))
        });
    }

    fn on_detection_miss(&self, step: u32, retries: u32) {
        self.with_bar(|bar| {
            bar.set_message(format!("pick frame {}: target not visible ({})", step, retries))
        });
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ExecutionProgressNotifier for SimpleProgress {
    fn on_plan_ready(&self, plan: &Plan) {
        println!("{} {} ({} steps)", "->".cyan(), plan.response, plan.len());
    }

    fn on_step_start(&self, step: &PlanStep, index: usize, total: usize) {
        println!(
            "{} [{}/{}] {} {}",
            "->".cyan(),
            index + 1,
            total,
            step.tool.bold(),
            step.params
        );
    }

    fn on_step_complete(&self, record: &ExecutionRecord) {
        if record.error_flag {
            println!("  {} {}", "x".red(), record.result_text);
        } else {
            println!("  {} {}", "v".green(), record.result_text);
        }
    }

    fn on_replan_complete(&self, event: &ReplanEvent) {
        println!(
            "  {} replan {} after step {}: {}",
            "~".yellow(),
            event.attempt,
            event.failing_step,
            event.outcome
        );
    }

    fn on_pick_frame(&self, step: u32, decision: &Decision) {
        println!(
            "  {} frame {}: {} (head {}, {})",
            "*".dimmed(),
            step,
            decision.action,
            decision.head,
            decision.phase
        );
    }
}
