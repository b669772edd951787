//! [`SimpleTypewriter`]: the minimal typewriter policy.
//!
//! It types one character per step at `type_speed`, pauses
//! `pause_between` on a completed phrase, erases at `delete_speed` and moves
//! on. It has no colors, cursor, hooks or awaitable, only a one-shot
//! callback at the end of a non-looping sequence.

use crate::config::Texts;
use crate::error::TypewriterError;
use crate::surface::{SharedSurface, lock};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

/// Timing and looping for [`SimpleTypewriter`]. Durations are milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimpleOptions {
    pub type_speed: u64,
    pub delete_speed: u64,
    pub pause_between: u64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub delay_start: u64,
}

impl Default for SimpleOptions {
    fn default() -> Self {
        Self {
            type_speed: 100,
            delete_speed: 50,
            pause_between: 1000,
            looping: false,
            delay_start: 0,
        }
    }
}

impl SimpleOptions {
    fn type_speed(&self) -> Duration {
        Duration::from_millis(self.type_speed)
    }

    fn delete_speed(&self) -> Duration {
        Duration::from_millis(self.delete_speed)
    }

    fn pause_between(&self) -> Duration {
        Duration::from_millis(self.pause_between)
    }
}

/// What the driver does after a [`Sequence::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Type the next character after `type_speed`.
    Type,
    /// Erase the next character after `delete_speed`.
    Delete,
    /// A phrase is complete and another follows: pause, then erase.
    Pause,
    /// The last phrase is complete and looping is off.
    Done,
}

/// The step-by-step state of a [`SimpleTypewriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    texts: Vec<String>,
    looping: bool,
    index: usize,
    shown: usize,
    deleting: bool,
}

impl Sequence {
    /// # Errors
    ///
    /// [`TypewriterError::EmptyTexts`] if `texts` is empty.
    pub fn new(texts: Vec<String>, looping: bool) -> Result<Self, TypewriterError> {
        if texts.is_empty() {
            return Err(TypewriterError::EmptyTexts);
        }
        Ok(Self {
            texts,
            looping,
            index: 0,
            shown: 0,
            deleting: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    fn full_len(&self) -> usize {
        self.texts[self.index].chars().count()
    }

    /// The text on display.
    pub fn text(&self) -> String {
        self.texts[self.index].chars().take(self.shown).collect()
    }

    /// Change one character and report what comes next.
    pub fn step(&mut self) -> (String, Cue) {
        let full = self.full_len();
        if self.deleting {
            self.shown = self.shown.saturating_sub(1);
        } else {
            self.shown = (self.shown + 1).min(full);
        }
        let text = self.text();

        let cue = if !self.deleting && self.shown == full {
            if self.index + 1 < self.texts.len() || self.looping {
                Cue::Pause
            } else {
                Cue::Done
            }
        } else if self.deleting && self.shown == 0 {
            self.deleting = false;
            self.index = (self.index + 1) % self.texts.len();
            Cue::Type
        } else if self.deleting {
            Cue::Delete
        } else {
            Cue::Type
        };
        (text, cue)
    }

    /// Switch to erasing once the pause after a full phrase has elapsed.
    pub fn begin_delete(&mut self) {
        self.deleting = true;
    }
}

struct SimpleState {
    sequence: Sequence,
    stopped: bool,
    pending: Option<JoinHandle<()>>,
}

/// One-shot completion callback of a [`SimpleTypewriter`].
pub type Callback = Box<dyn FnOnce() + Send>;

struct SimpleShared {
    state: Mutex<SimpleState>,
    surface: SharedSurface,
    options: SimpleOptions,
    callback: Mutex<Option<Callback>>,
}

impl SimpleShared {
    /// One step, or `None` once stopped.
    fn step(&self) -> Option<Cue> {
        let (text, cue) = {
            let mut state = lock(&self.state);
            if state.stopped {
                return None;
            }
            state.sequence.step()
        };
        lock(&self.surface).set_text(&text);
        Some(cue)
    }

    fn begin_delete(&self) -> bool {
        let mut state = lock(&self.state);
        if state.stopped {
            return false;
        }
        state.sequence.begin_delete();
        true
    }

    fn complete(&self) {
        let callback = lock(&self.callback).take();
        if let Some(callback) = callback {
            info!("simple typewriter complete");
            callback();
        }
    }
}

async fn run(shared: Arc<SimpleShared>, mut delay: Duration) {
    let options = shared.options;
    loop {
        // Frame boundary: let other tasks render before the next step.
        tokio::task::yield_now().await;
        sleep(delay).await;
        let Some(cue) = shared.step() else {
            return;
        };
        delay = match cue {
            Cue::Type => options.type_speed(),
            Cue::Delete => options.delete_speed(),
            Cue::Pause => {
                sleep(options.pause_between()).await;
                if !shared.begin_delete() {
                    return;
                }
                options.delete_speed()
            }
            Cue::Done => {
                shared.complete();
                return;
            }
        };
    }
}

/// The minimal typewriter: start and stop, nothing else.
///
/// Typing begins on construction, after `delay_start`.
///
/// ```no_run
/// use std::sync::{Arc, Mutex};
/// use typewriter::{SimpleOptions, SimpleTypewriter, TerminalSurface};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let surface = Arc::new(Mutex::new(TerminalSurface::stdout()));
///     let (done_tx, done_rx) = tokio::sync::oneshot::channel();
///     let _typewriter = SimpleTypewriter::new(
///         surface,
///         ["Hello", "World"],
///         SimpleOptions::default(),
///         Some(Box::new(move || {
///             let _ = done_tx.send(());
///         })),
///     )?;
///     done_rx.await?;
///     Ok(())
/// }
/// ```
pub struct SimpleTypewriter {
    shared: Arc<SimpleShared>,
}

impl SimpleTypewriter {
    /// Validate the inputs and schedule the first step.
    ///
    /// `callback` runs at most once, when the last phrase is fully typed
    /// and looping is off.
    ///
    /// # Errors
    ///
    /// [`TypewriterError::InvalidTarget`] if the surface is not an element,
    /// [`TypewriterError::EmptyTexts`] for an empty string or list.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new(
        surface: SharedSurface,
        texts: impl Into<Texts>,
        options: SimpleOptions,
        callback: Option<Callback>,
    ) -> Result<Self, TypewriterError> {
        if !lock(&surface).is_element() {
            return Err(TypewriterError::InvalidTarget);
        }
        let texts = texts.into();
        if texts.is_empty() {
            return Err(TypewriterError::EmptyTexts);
        }

        let sequence = Sequence::new(texts.into_vec(), options.looping)?;
        debug!(
            texts = sequence.texts.len(),
            looping = options.looping,
            "simple typewriter configured"
        );
        let shared = Arc::new(SimpleShared {
            state: Mutex::new(SimpleState {
                sequence,
                stopped: false,
                pending: None,
            }),
            surface,
            options,
            callback: Mutex::new(callback),
        });
        let task = tokio::spawn(run(
            Arc::clone(&shared),
            Duration::from_millis(options.delay_start),
        ));
        lock(&shared.state).pending = Some(task);
        Ok(Self { shared })
    }

    /// Cancel the pending step.
    pub fn stop(&self) {
        let mut state = lock(&self.shared.state);
        state.stopped = true;
        if let Some(task) = state.pending.take() {
            task.abort();
        }
        debug!("simple typewriter stopped");
    }

    /// Resume from where [`stop`](Self::stop) left off. Does nothing unless stopped.
    pub fn start(&self) {
        let mut state = lock(&self.shared.state);
        if !state.stopped {
            return;
        }
        state.stopped = false;
        state.pending = Some(tokio::spawn(run(
            Arc::clone(&self.shared),
            self.shared.options.type_speed(),
        )));
        debug!("simple typewriter resumed");
    }

    pub fn is_stopped(&self) -> bool {
        lock(&self.shared.state).stopped
    }

    /// The text the sequence currently shows.
    pub fn text(&self) -> String {
        lock(&self.shared.state).sequence.text()
    }
}

impl Drop for SimpleTypewriter {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.shared.state).pending.take() {
            task.abort();
        }
    }
}
