//! Coding tutor: spoken commands build and run a toy program
//!
//! The matcher is a small regex grammar tested in a fixed priority order;
//! the first pattern that matches wins and at most one action fires per
//! transcript change. Running the program is delegated to a sandboxed
//! `ProgramEvaluator` collaborator; its failures come back as `Error: ...`
//! output strings, never as faults.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use voxplay_foundation::phase::{GamePhase, PhaseTracker};

use crate::feedback::{Feedback, FeedbackKind};
use crate::{advance_phase, normalize};

const DWELL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramTemplate {
    Sum,
    Difference,
    Product,
    Greeting,
}

impl ProgramTemplate {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(ProgramTemplate::Sum),
            "difference" => Some(ProgramTemplate::Difference),
            "product" => Some(ProgramTemplate::Product),
            "greeting" => Some(ProgramTemplate::Greeting),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProgramTemplate::Sum => "sum",
            ProgramTemplate::Difference => "difference",
            ProgramTemplate::Product => "product",
            ProgramTemplate::Greeting => "greeting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodingAction {
    LoadTemplate(ProgramTemplate),
    Clear,
    Run,
    SetFirstNumber(i64),
    SetSecondNumber(i64),
    CreateVariable { name: String, value: i64 },
    CreateFunction { name: String },
    Print { target: String },
}

static TEMPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:load|open|start)(?: the)? (sum|difference|product|greeting) (?:program|template)")
        .unwrap()
});
static CLEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:clear|reset)\b").unwrap());
static RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\brun\b").unwrap());
static FIRST_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:set )?(?:the )?first number (?:to |is |equals )?(-?\d+)").unwrap()
});
static SECOND_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:set )?(?:the )?second number (?:to |is |equals )?(-?\d+)").unwrap()
});
static VARIABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:create|make|add)(?: a| new)* variable (?:called |named )?([a-z][a-z0-9_]*)(?: (?:equal to|with value|to) (-?\d+))?",
    )
    .unwrap()
});
static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:create|make|add)(?: a| new)* function (?:called |named )?([a-z][a-z0-9_]*)")
        .unwrap()
});
static PRINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bprint (.+)$").unwrap());

/// Pure matcher: first grammar rule that matches wins.
pub fn match_coding_command(transcript: &str) -> Option<CodingAction> {
    let spoken = normalize(transcript);
    if spoken.is_empty() {
        return None;
    }

    if let Some(caps) = TEMPLATE_RE.captures(&spoken) {
        let template = ProgramTemplate::from_name(&caps[1])?;
        return Some(CodingAction::LoadTemplate(template));
    }
    if CLEAR_RE.is_match(&spoken) {
        return Some(CodingAction::Clear);
    }
    if RUN_RE.is_match(&spoken) {
        return Some(CodingAction::Run);
    }
    if let Some(caps) = FIRST_NUMBER_RE.captures(&spoken) {
        return caps[1].parse().ok().map(CodingAction::SetFirstNumber);
    }
    if let Some(caps) = SECOND_NUMBER_RE.captures(&spoken) {
        return caps[1].parse().ok().map(CodingAction::SetSecondNumber);
    }
    if let Some(caps) = VARIABLE_RE.captures(&spoken) {
        let value = caps
            .get(2)
            .and_then(|v| v.as_str().parse().ok())
            .unwrap_or(0);
        return Some(CodingAction::CreateVariable {
            name: caps[1].to_string(),
            value,
        });
    }
    if let Some(caps) = FUNCTION_RE.captures(&spoken) {
        return Some(CodingAction::CreateFunction {
            name: caps[1].to_string(),
        });
    }
    if let Some(caps) = PRINT_RE.captures(&spoken) {
        return Some(CodingAction::Print {
            target: caps[1].trim().to_string(),
        });
    }
    None
}

/// The spoken program under construction.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub template: Option<ProgramTemplate>,
    pub variables: Vec<(String, i64)>,
    pub functions: Vec<String>,
    pub prints: Vec<String>,
    pub first_number: Option<i64>,
    pub second_number: Option<i64>,
}

impl Program {
    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.variables
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn set_variable(&mut self, name: String, value: i64) {
        if let Some(slot) = self.variables.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.variables.push((name, value));
        }
    }
}

/// Sandboxed execution seam. Spoken text never reaches a real interpreter;
/// the evaluator only sees the structured `Program`.
pub trait ProgramEvaluator: Send + Sync {
    fn run(&self, program: &Program) -> Result<String, String>;
}

/// The built-in toy interpreter.
#[derive(Debug, Clone, Default)]
pub struct ToyEvaluator;

impl ProgramEvaluator for ToyEvaluator {
    fn run(&self, program: &Program) -> Result<String, String> {
        let mut lines = Vec::new();

        if let Some(template) = program.template {
            match template {
                ProgramTemplate::Greeting => lines.push("hello, world".to_string()),
                ProgramTemplate::Sum | ProgramTemplate::Difference | ProgramTemplate::Product => {
                    let a = program
                        .first_number
                        .ok_or("the first number is not set")?;
                    let b = program
                        .second_number
                        .ok_or("the second number is not set")?;
                    let (label, value) = match template {
                        ProgramTemplate::Sum => ("sum", a + b),
                        ProgramTemplate::Difference => ("difference", a - b),
                        ProgramTemplate::Product => ("product", a * b),
                        ProgramTemplate::Greeting => unreachable!(),
                    };
                    lines.push(format!("the {} is {}", label, value));
                }
            }
        }

        for target in &program.prints {
            if let Ok(n) = target.parse::<i64>() {
                lines.push(n.to_string());
            } else if let Some(v) = program.lookup(target) {
                lines.push(v.to_string());
            } else {
                return Err(format!("unknown name `{}`", target));
            }
        }

        if lines.is_empty() {
            Ok("(no output)".to_string())
        } else {
            Ok(lines.join("\n"))
        }
    }
}

pub struct CodingSession {
    program: Program,
    output: String,
    evaluator: Box<dyn ProgramEvaluator>,
    phase: PhaseTracker,
}

impl CodingSession {
    pub fn new(evaluator: Box<dyn ProgramEvaluator>) -> Self {
        Self {
            program: Program::default(),
            output: String::new(),
            evaluator,
            phase: PhaseTracker::new(),
        }
    }

    pub fn with_toy_evaluator() -> Self {
        Self::new(Box::new(ToyEvaluator))
    }

    pub fn begin(&mut self) -> bool {
        advance_phase(&self.phase, GamePhase::Listening)
    }

    pub fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        if self.phase.current() != GamePhase::Listening {
            return None;
        }
        let action = match_coding_command(transcript)?;
        if !advance_phase(&self.phase, GamePhase::Evaluating) {
            return None;
        }

        let message = self.apply(action);
        let feedback = Feedback::new(FeedbackKind::Info, message, DWELL);
        advance_phase(&self.phase, GamePhase::Feedback);
        Some(feedback)
    }

    fn apply(&mut self, action: CodingAction) -> String {
        match action {
            CodingAction::LoadTemplate(template) => {
                self.program = Program {
                    template: Some(template),
                    ..Default::default()
                };
                self.output.clear();
                format!("Loaded the {} program.", template.name())
            }
            CodingAction::Clear => {
                self.program = Program::default();
                self.output.clear();
                "Program cleared.".to_string()
            }
            CodingAction::Run => {
                self.output = self
                    .evaluator
                    .run(&self.program)
                    .unwrap_or_else(|e| format!("Error: {}", e));
                self.output.clone()
            }
            CodingAction::SetFirstNumber(n) => {
                self.program.first_number = Some(n);
                format!("First number set to {}.", n)
            }
            CodingAction::SetSecondNumber(n) => {
                self.program.second_number = Some(n);
                format!("Second number set to {}.", n)
            }
            CodingAction::CreateVariable { name, value } => {
                let message = format!("Variable {} = {}.", name, value);
                self.program.set_variable(name, value);
                message
            }
            CodingAction::CreateFunction { name } => {
                if !self.program.functions.contains(&name) {
                    self.program.functions.push(name.clone());
                }
                format!("Function {} created.", name)
            }
            CodingAction::Print { target } => {
                self.program.prints.push(target.clone());
                format!("Will print {}.", target)
            }
        }
    }

    /// Resume listening after the feedback dwell. The coding tutor has no
    /// terminal state; it runs until the user leaves.
    pub fn advance(&mut self) -> GamePhase {
        if self.phase.current() == GamePhase::Feedback {
            advance_phase(&self.phase, GamePhase::Listening);
        }
        self.phase.current()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }
}
