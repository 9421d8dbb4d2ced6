//! REPL (Read-Eval-Print Loop) for interactive robot commands

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use pilot_application::{
    NoProgress, PlannerGateway, RunCommandOutput, RunCommandUseCase, ToolInvoker, VisionPort,
};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io;

const HISTORY_CAPACITY: usize = 500;

/// What a line of input asks the REPL to do
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Help,
    Command(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Input::Empty,
            "quit" | "exit" | "q" => Input::Quit,
            "help" | "?" => Input::Help,
            command => Input::Command(command),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl<G, T, V>
where
    G: PlannerGateway + 'static,
    T: ToolInvoker + 'static,
    V: VisionPort + 'static,
{
    use_case: RunCommandUseCase<G, T, V>,
    show_progress: bool,
}

impl<G, T, V> ChatRepl<G, T, V>
where
    G: PlannerGateway + 'static,
    T: ToolInvoker + 'static,
    V: VisionPort + 'static,
{
    pub fn new(use_case: RunCommandUseCase<G, T, V>) -> Self {
        Self {
            use_case,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> io::Result<()> {
        let mut editor = Reedline::create();
        let history_path = dirs::data_dir().map(|p| p.join("robot-pilot").join("history.txt"));
        if let Some(path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(history) = FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                editor = editor.with_history(Box::new(history));
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("robot".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => match Input::parse(&line) {
                    Input::Empty => continue,
                    Input::Quit => {
                        println!("Bye!");
                        break;
                    }
                    Input::Help => Self::print_help(),
                    Input::Command(command) => self.process_command(command).await,
                },
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                _ => {
                    println!("^C");
                    continue;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            Robot Pilot - Chat Mode          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Planner: {}", self.use_case.executor().planner().model());
        Self::print_help();
    }

    fn print_help() {
        println!();
        println!("Type a command for the robot, e.g. \"pick up the red ball\".");
        println!("  help, ?          - Show this help");
        println!("  quit, exit, q    - Exit chat");
        println!();
    }

    async fn process_command(&self, command: &str) {
        println!();

        let output = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.execute_with_progress(command, &progress).await
        } else {
            self.use_case.execute_with_progress(command, &NoProgress).await
        };

        Self::print_output(&output);
        println!();
    }

    fn print_output(output: &RunCommandOutput) {
        print!("{}", ConsoleFormatter::format_compliance(&output.compliance));
        print!("{}", ConsoleFormatter::format_report(&output.report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_parse() {
        assert_eq!(Input::parse("   "), Input::Empty);
        assert_eq!(Input::parse("quit"), Input::Quit);
        assert_eq!(Input::parse(" q "), Input::Quit);
        assert_eq!(Input::parse("exit"), Input::Quit);
        assert_eq!(Input::parse("?"), Input::Help);
        assert_eq!(Input::parse(" wave at me "), Input::Command("wave at me"));
    }
}
