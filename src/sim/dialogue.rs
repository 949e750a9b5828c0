//! NPC dialogue: scripted lines revealed one character at a time
//!
//! A single `advance(dt_ms)` drives the whole thing, so every intermediate
//! state can be inspected between calls.

use serde::{Deserialize, Serialize};

use crate::consts::{MESSAGE_PAUSE_MS, TYPE_DELAY_MS};

/// One scripted line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub text: String,
    /// While this line is fully shown, a destruction streak may trigger escalation
    pub escalation_eligible: bool,
}

impl ScriptLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            escalation_eligible: false,
        }
    }

    pub fn eligible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            escalation_eligible: true,
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Which script is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptKind {
    Intro,
    Escalation,
    /// A line shown instantly (no typing)
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub kind: ScriptKind,
    pub lines: Vec<ScriptLine>,
}

impl Script {
    /// Greeting played at startup; its last line dares the player
    pub fn intro() -> Self {
        Self {
            kind: ScriptKind::Intro,
            lines: vec![
                ScriptLine::new("Hello, traveler..."),
                ScriptLine::new("You’re not supposed to be here."),
                ScriptLine::new("Did you just generate this world for fun?"),
                ScriptLine::eligible("Press the button. I dare you."),
            ],
        }
    }

    /// Played when the player keeps smashing blocks
    pub fn escalation() -> Self {
        Self {
            kind: ScriptKind::Escalation,
            lines: vec![ScriptLine::new("You should not have done that...")],
        }
    }

    /// Line shown when the rickroll starts
    pub fn gotcha() -> ScriptLine {
        ScriptLine::eligible("Hahaha! Gotcha!")
    }
}

/// Sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueState {
    Idle,
    /// `chars` characters of `line` are on screen
    Typing { line: usize, chars: usize },
    /// `line` is complete; waiting before the next one
    Pausing { line: usize },
    /// Script finished; `line` stays on screen
    Done { line: usize },
}

/// Emitted by `play` and `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueEvent {
    ScriptComplete(ScriptKind),
    /// A script still typing was replaced before it finished
    ScriptInterrupted(ScriptKind),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueSequencer {
    script: Option<Script>,
    state: DialogueState,
    text: String,
    /// Time left before the next step (ms)
    wait_ms: f64,
}

impl Default for DialogueSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueSequencer {
    pub fn new() -> Self {
        Self {
            script: None,
            state: DialogueState::Idle,
            text: String::new(),
            wait_ms: 0.0,
        }
    }

    /// Replace whatever is showing and start typing `script`.
    /// The first character appears immediately.
    ///
    /// Returns the interruption of the script that was still typing, then the
    /// completion of `script` if it has no lines.
    #[must_use]
    pub fn play(&mut self, script: Script) -> Vec<DialogueEvent> {
        let mut events = Vec::new();
        if let Some(kind) = self.kind().filter(|_| self.is_typing()) {
            events.push(DialogueEvent::ScriptInterrupted(kind));
        }

        self.script = Some(script);
        self.state = DialogueState::Typing { line: 0, chars: 0 };
        self.text.clear();
        self.wait_ms = 0.0;
        events.extend(self.advance(0.0));
        events
    }

    /// Show a line instantly, replacing any running script
    pub fn show(&mut self, line: ScriptLine) {
        self.text.clone_from(&line.text);
        self.script = Some(Script {
            kind: ScriptKind::Line,
            lines: vec![line],
        });
        self.state = DialogueState::Done { line: 0 };
        self.wait_ms = 0.0;
    }

    /// Advance timers by `dt_ms`. Returns the completion of the running script,
    /// if it finished during this call.
    pub fn advance(&mut self, dt_ms: f64) -> Option<DialogueEvent> {
        self.wait_ms -= dt_ms;
        while self.wait_ms <= 0.0 {
            match self.state {
                DialogueState::Idle | DialogueState::Done { .. } => {
                    self.wait_ms = 0.0;
                    return None;
                }
                _ => {
                    if let Some(event) = self.step() {
                        self.wait_ms = 0.0;
                        return Some(event);
                    }
                }
            }
        }
        None
    }

    /// Perform one scheduled action
    fn step(&mut self) -> Option<DialogueEvent> {
        let script = self.script.as_ref()?;

        match self.state {
            DialogueState::Typing { line, chars } => {
                let Some(current) = script.lines.get(line) else {
                    // Empty script
                    self.state = DialogueState::Idle;
                    return Some(DialogueEvent::ScriptComplete(script.kind));
                };
                match current.text.chars().nth(chars) {
                    Some(ch) => {
                        self.text.push(ch);
                        self.state = DialogueState::Typing {
                            line,
                            chars: chars + 1,
                        };
                        self.wait_ms += TYPE_DELAY_MS;
                    }
                    None => {
                        self.state = DialogueState::Pausing { line };
                        self.wait_ms += MESSAGE_PAUSE_MS;
                    }
                }
                None
            }
            DialogueState::Pausing { line } => {
                if line + 1 >= script.lines.len() {
                    // Final line stays on screen
                    self.state = DialogueState::Done { line };
                    return Some(DialogueEvent::ScriptComplete(script.kind));
                }
                // Next line starts typing right away (no added wait)
                self.text.clear();
                self.state = DialogueState::Typing {
                    line: line + 1,
                    chars: 0,
                };
                None
            }
            DialogueState::Idle | DialogueState::Done { .. } => None,
        }
    }

    /// Text currently on screen
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    /// Kind of the script on screen, if any
    pub fn kind(&self) -> Option<ScriptKind> {
        self.script.as_ref().map(|s| s.kind)
    }

    /// A script is on screen and has not finished
    pub fn is_typing(&self) -> bool {
        matches!(
            self.state,
            DialogueState::Typing { .. } | DialogueState::Pausing { .. }
        )
    }

    /// True while a fully revealed, escalation-eligible line is on screen
    pub fn escalation_eligible(&self) -> bool {
        let Some(script) = &self.script else {
            return false;
        };
        let (line, complete) = match self.state {
            DialogueState::Idle => return false,
            DialogueState::Typing { line, chars } => (
                line,
                script.lines.get(line).is_some_and(|l| chars == l.char_len()),
            ),
            DialogueState::Pausing { line } | DialogueState::Done { line } => (line, true),
        };
        complete && script.lines.get(line).is_some_and(|l| l.escalation_eligible)
    }
}
