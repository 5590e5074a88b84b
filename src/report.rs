use colored::Colorize;
use std::fmt;

/// What happened to a single item of a batch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Skipped(String),
    Failed(String),
}

/// The stage a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rename,
    Tag,
    Playlist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Rename => write!(f, "Rename"),
            Stage::Tag => write!(f, "Tag"),
            Stage::Playlist => write!(f, "Playlist"),
        }
    }
}

/// Collects the per-item outcomes of one stage.
#[derive(Debug)]
pub struct Report {
    pub stage: Stage,
    pub outcomes: Vec<(String, Outcome)>,
}

impl Report {
    pub fn new(stage: Stage) -> Self {
        Report {
            stage,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, item: impl Into<String>, outcome: Outcome) {
        self.outcomes.push((item.into(), outcome));
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Done))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }

    /**
     * Prints the totals of the stage, followed by every item that was not
     * processed and why.
     */
    pub fn print_summary(&self) {
        println!(
            "{} {} done, {} skipped, {} failed",
            format!("{}:", self.stage).bold(),
            self.succeeded().to_string().green(),
            self.skipped().to_string().yellow(),
            self.failed().to_string().red()
        );
        for (item, outcome) in &self.outcomes {
            match outcome {
                Outcome::Done => {}
                Outcome::Skipped(reason) => {
                    println!("  {} '{}': {}", "Skipped".yellow(), item, reason)
                }
                Outcome::Failed(reason) => {
                    println!("  {} '{}': {}", "Failed".red(), item, reason)
                }
            }
        }
    }
}
