//! [`Typewriter`]: the canonical typewriter effect bound to a surface.

use crate::completion::{Completion, Finished};
use crate::config::{Config, Options};
use crate::cursor::Cursor;
use crate::hooks::Callbacks;
use crate::machine::{Effect, Machine, Next, Progress};
use crate::scheduler::{Scheduler, Tick};
use crate::surface::{SharedSurface, lock};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

struct State {
    machine: Machine,
    scheduler: Scheduler,
    destroyed: bool,
}

struct Shared {
    state: Mutex<State>,
    surface: SharedSurface,
    callbacks: Mutex<Callbacks>,
    completion: Completion,
}

impl Shared {
    /// Apply tick effects in order. No state lock is held here, so hooks
    /// may call back into the instance.
    fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(text) => lock(&self.surface).set_text(&text),
                Effect::Paint(color) => lock(&self.surface).set_color(&color),
                Effect::Hook(hook, frame) => {
                    let handler = lock(&self.callbacks).take(hook);
                    if let Some(mut handler) = handler {
                        handler.call(hook, frame.as_ref());
                        lock(&self.callbacks).restore(hook, handler);
                    }
                }
            }
        }
    }
}

impl Tick for Shared {
    fn tick(&self, generation: u64) -> Option<Duration> {
        let step = {
            let mut state = lock(&self.state);
            if !state.scheduler.is_current(generation) {
                return None;
            }
            let step = state.machine.tick();
            if step.next == Next::Finished {
                state.scheduler.halt();
            }
            step
        };
        self.apply(step.effects);
        match step.next {
            Next::After(delay) => Some(delay),
            Next::Finished => {
                self.completion.resolve();
                info!("typewriter complete");
                None
            }
        }
    }
}

/// Types, pauses on and erases a sequence of phrases on a [`Surface`](crate::Surface).
///
/// All operations take `&self`, so an instance can be shared behind an
/// `Arc` and driven from hooks. Dropping it has the same effect as
/// [`destroy`](Self::destroy).
///
/// ```no_run
/// use std::sync::{Arc, Mutex};
/// use typewriter::{Callbacks, Hook, Options, TerminalSurface, Typewriter};
///
/// #[tokio::main]
/// async fn main() {
///     let surface = Arc::new(Mutex::new(TerminalSurface::stdout()));
///     let options = Options::new()
///         .with_phrases(["fast", "safe", "fun"])
///         .with_type_delay(80)
///         .with_passes(2);
///     let callbacks = Callbacks::new().on(Hook::Complete, || println!());
///
///     let typewriter = Typewriter::new(surface, options, callbacks);
///     typewriter.start();
///     typewriter.finished().await;
/// }
/// ```
pub struct Typewriter {
    shared: Arc<Shared>,
    cursor: Mutex<Cursor>,
}

impl Typewriter {
    /// Resolve `options` against the surface's current text, attach the
    /// cursor and apply the first color. Nothing is typed until
    /// [`start`](Self::start).
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while the cursor is shown.
    pub fn new(surface: SharedSurface, options: Options, callbacks: Callbacks) -> Self {
        let existing = lock(&surface).text();
        let (config, initial) = Config::resolve(&existing, options);
        debug!(
            phrases = config.phrases.len(),
            loop_limit = ?config.loop_limit,
            "typewriter configured"
        );

        let cursor = Cursor::attach(Arc::clone(&surface), &config.cursor);
        let machine = Machine::new(config, initial);
        lock(&surface).set_color(machine.color());

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                machine,
                scheduler: Scheduler::default(),
                destroyed: false,
            }),
            surface,
            callbacks: Mutex::new(callbacks),
            completion: Completion::new(),
        });
        Self {
            shared,
            cursor: Mutex::new(cursor),
        }
    }

    /// Begin or resume typing.
    ///
    /// Emits `Begin`, then `LoopBegin` when at the first phrase, and runs
    /// the first tick immediately. Does nothing while running, once the
    /// animation has completed, or after [`destroy`](Self::destroy).
    pub fn start(&self) -> &Self {
        let (generation, effects) = {
            let mut state = lock(&self.shared.state);
            if state.machine.is_finished() || state.destroyed {
                debug!("start ignored: animation already complete");
                return self;
            }
            let Some(generation) = state.scheduler.begin() else {
                return self;
            };
            (generation, state.machine.begin())
        };
        info!(generation, "typewriter started");

        self.shared.apply(effects);
        if let Some(delay) = self.shared.tick(generation) {
            lock(&self.shared.state)
                .scheduler
                .schedule(Arc::clone(&self.shared), generation, delay);
        }
        self
    }

    /// Pause typing. The pending tick becomes inert. This is not completion:
    /// `Complete` is not emitted and [`finished`](Self::finished) stays pending.
    pub fn stop(&self) -> &Self {
        lock(&self.shared.state).scheduler.halt();
        debug!("typewriter stopped");
        self
    }

    /// Restore the initial progress, text and color. Running state is untouched.
    pub fn reset(&self) -> &Self {
        let effects = lock(&self.shared.state).machine.reset();
        debug!("typewriter reset");
        self.shared.apply(effects);
        self
    }

    /// Show the cursor, hide it, or flip it with `None`.
    pub fn toggle_cursor(&self, show: impl Into<Option<bool>>) -> &Self {
        lock(&self.cursor).toggle(show.into());
        self
    }

    /// Cancel pending ticks, remove the cursor node and release every
    /// [`Finished`] waiter. The instance cannot be started again. Safe to
    /// call more than once.
    pub fn destroy(&self) {
        {
            let mut state = lock(&self.shared.state);
            state.destroyed = true;
            state.scheduler.halt();
            state.scheduler.cancel();
        }
        lock(&self.cursor).detach();
        if self.shared.completion.resolve() {
            info!("typewriter destroyed");
        }
    }

    /// A handle resolving on natural completion or on [`destroy`](Self::destroy).
    pub fn finished(&self) -> Finished {
        self.shared.completion.subscribe()
    }

    pub fn progress(&self) -> Progress {
        lock(&self.shared.state).machine.progress()
    }

    /// The text the current progress corresponds to.
    pub fn display(&self) -> String {
        lock(&self.shared.state).machine.display()
    }

    pub fn color(&self) -> String {
        lock(&self.shared.state).machine.color().to_owned()
    }

    pub fn config(&self) -> Config {
        lock(&self.shared.state).machine.config().clone()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.shared.state).scheduler.is_running()
    }

    pub fn is_finished(&self) -> bool {
        lock(&self.shared.state).machine.is_finished()
    }

    pub fn is_cursor_shown(&self) -> bool {
        lock(&self.cursor).is_shown()
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.destroy();
    }
}
