//! The animation state machine.
//!
//! [`Machine::tick`] is pure. It advances [`Progress`] by one character (or
//! one mode switch) and returns the ordered [`Effect`]s the driver must
//! apply, plus the delay before the next tick. Timers and I/O live in the
//! scheduler and the surface.

use crate::config::{Config, Options};
use crate::hooks::Hook;
use std::time::Duration;

/// Where the animation stands. Handed to hooks as an immutable copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Index into the phrase list.
    pub phrase: usize,
    /// Characters of the current phrase on display.
    pub chars: usize,
    /// `true` while typing, `false` while erasing.
    pub building: bool,
    /// Full passes through the phrase list so far.
    pub loops_completed: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            phrase: 0,
            chars: 0,
            building: true,
            loops_completed: 0,
        }
    }
}

/// The displayed text and progress at the moment a hook fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub progress: Progress,
}

/// One side effect of a tick, in the order it must be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show this text on the surface.
    Render(String),
    /// Apply this color to the surface.
    Paint(String),
    /// Invoke a hook, with a frame for the per-tick hooks.
    Hook(Hook, Option<Frame>),
}

/// What follows a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    After(Duration),
    Finished,
}

/// The outcome of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub effects: Vec<Effect>,
    pub next: Next,
}

/// Owns the mutable progress of one animation.
#[derive(Debug, Clone)]
pub struct Machine {
    config: Config,
    initial: Progress,
    progress: Progress,
    color_index: usize,
    finished: bool,
}

impl Machine {
    /// Resolve `options` against the `existing` surface text and start from
    /// the resulting snapshot.
    pub fn resolve(existing: &str, options: Options) -> Self {
        let (config, initial) = Config::resolve(existing, options);
        Self::new(config, initial)
    }

    /// `config` must come from [`Config::resolve`], which guarantees at
    /// least one phrase and one color.
    pub(crate) fn new(config: Config, initial: Progress) -> Self {
        Self {
            config,
            initial,
            progress: initial,
            color_index: 0,
            finished: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn color(&self) -> &str {
        &self.config.colors[self.color_index]
    }

    /// The substring the current progress corresponds to.
    pub fn display(&self) -> String {
        self.phrase().chars().take(self.progress.chars).collect()
    }

    fn phrase(&self) -> &str {
        &self.config.phrases[self.progress.phrase]
    }

    /// Effects of (re)starting: `Begin`, then `LoopBegin` at a pass start.
    pub fn begin(&self) -> Vec<Effect> {
        let mut effects = vec![Effect::Hook(Hook::Begin, None)];
        if self.progress.phrase == 0 {
            effects.push(Effect::Hook(Hook::LoopBegin, None));
        }
        effects
    }

    /// Restore the initial snapshot and the first color.
    ///
    /// A finished machine stays finished.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.progress = self.initial;
        self.color_index = 0;
        vec![
            Effect::Render(self.display()),
            Effect::Paint(self.color().to_owned()),
        ]
    }

    /// Advance by one step.
    pub fn tick(&mut self) -> Step {
        if self.finished {
            return Step {
                effects: Vec::new(),
                next: Next::Finished,
            };
        }

        let text = self.display();
        let phrase_len = self.phrase().chars().count();
        let at_word_end = self.progress.building && self.progress.chars == phrase_len;

        let mut effects = vec![
            Effect::Render(text.clone()),
            self.frame(Hook::Update, &text),
            self.frame(Hook::Change, &text),
        ];

        if self.progress.building {
            if !at_word_end {
                effects.push(self.frame(Hook::ChangeBegin, &text));
                self.progress.chars += 1;
            } else {
                effects.push(self.frame(Hook::ChangeComplete, &text));
                self.progress.building = false;
                let last = self.progress.phrase + 1 == self.config.phrases.len();
                if !self.config.loop_enabled && last {
                    return self.finish(effects);
                }
            }
        } else if self.progress.chars > 0 {
            effects.push(self.frame(Hook::ChangeBegin, &text));
            self.progress.chars -= 1;
        } else {
            effects.push(self.frame(Hook::ChangeComplete, &text));
            self.progress.building = true;
            self.progress.phrase += 1;
            self.color_index = (self.color_index + 1) % self.config.colors.len();
            effects.push(Effect::Paint(self.color().to_owned()));

            if self.progress.phrase == self.config.phrases.len() {
                self.progress.phrase = 0;
                self.progress.loops_completed += 1;
                effects.push(Effect::Hook(Hook::LoopComplete, None));
                tracing::debug!(
                    loops_completed = self.progress.loops_completed,
                    "pass complete"
                );
                let exhausted = self
                    .config
                    .loop_limit
                    .is_some_and(|limit| self.progress.loops_completed >= limit);
                if exhausted {
                    return self.finish(effects);
                }
                effects.push(Effect::Hook(Hook::LoopBegin, None));
            }
        }

        let delay = if at_word_end {
            self.config.delete_delay
        } else {
            self.config.type_delay
        };
        tracing::trace!(progress = ?self.progress, ?delay, "tick");
        Step {
            effects,
            next: Next::After(delay),
        }
    }

    fn finish(&mut self, mut effects: Vec<Effect>) -> Step {
        self.finished = true;
        effects.push(Effect::Hook(Hook::Complete, None));
        Step {
            effects,
            next: Next::Finished,
        }
    }

    fn frame(&self, hook: Hook, text: &str) -> Effect {
        Effect::Hook(
            hook,
            Some(Frame {
                text: text.to_owned(),
                progress: self.progress,
            }),
        )
    }
}
