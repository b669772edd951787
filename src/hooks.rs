//! Lifecycle hooks and the optional handlers bound to them.

use crate::machine::{Frame, Progress};
use std::collections::HashMap;
use std::fmt;

/// An event emitted while a [`Typewriter`](crate::Typewriter) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// `start()` was called on an idle instance.
    Begin,
    /// The animation terminated naturally.
    Complete,
    /// A pass through the phrases is starting.
    LoopBegin,
    /// A pass through the phrases finished.
    LoopComplete,
    /// Every tick, carrying the displayed text.
    Update,
    /// Every tick, right after [`Hook::Update`].
    Change,
    /// The character count is about to change.
    ChangeBegin,
    /// A phrase was fully typed or fully erased.
    ChangeComplete,
}

impl Hook {
    pub const ALL: [Hook; 8] = [
        Hook::Begin,
        Hook::Complete,
        Hook::LoopBegin,
        Hook::LoopComplete,
        Hook::Update,
        Hook::Change,
        Hook::ChangeBegin,
        Hook::ChangeComplete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Hook::Begin => "begin",
            Hook::Complete => "complete",
            Hook::LoopBegin => "loopBegin",
            Hook::LoopComplete => "loopComplete",
            Hook::Update => "update",
            Hook::Change => "change",
            Hook::ChangeBegin => "changeBegin",
            Hook::ChangeComplete => "changeComplete",
        }
    }

    /// Whether this hook is emitted with the displayed text and a progress snapshot.
    pub fn carries_frame(self) -> bool {
        matches!(
            self,
            Hook::Update | Hook::Change | Hook::ChangeBegin | Hook::ChangeComplete
        )
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) enum Handler {
    Plain(Box<dyn FnMut() + Send>),
    Frame(Box<dyn FnMut(&str, &Progress) + Send>),
}

impl Handler {
    pub(crate) fn call(&mut self, hook: Hook, frame: Option<&Frame>) {
        match (self, frame) {
            (Handler::Plain(handler), _) => handler(),
            (Handler::Frame(handler), Some(frame)) => handler(&frame.text, &frame.progress),
            (Handler::Frame(_), None) => {
                tracing::trace!(%hook, "frame handler bound to a hook without a frame");
            }
        }
    }
}

/// Handlers keyed by [`Hook`]. Hooks without a handler are skipped.
///
/// ```
/// use typewriter::{Callbacks, Hook};
///
/// let callbacks = Callbacks::new()
///     .on(Hook::Complete, || println!("done"))
///     .on_frame(Hook::Update, |text, progress| {
///         println!("{text:?} at phrase {}", progress.phrase);
///     });
/// assert!(callbacks.is_set(Hook::Update));
/// assert!(!callbacks.is_set(Hook::Begin));
/// ```
#[derive(Default)]
pub struct Callbacks {
    handlers: HashMap<Hook, Handler>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler that takes no arguments.
    pub fn on(mut self, hook: Hook, handler: impl FnMut() + Send + 'static) -> Self {
        self.handlers.insert(hook, Handler::Plain(Box::new(handler)));
        self
    }

    /// Bind a handler that receives the displayed text and a progress snapshot.
    ///
    /// Only hooks for which [`Hook::carries_frame`] is true invoke it.
    pub fn on_frame(
        mut self,
        hook: Hook,
        handler: impl FnMut(&str, &Progress) + Send + 'static,
    ) -> Self {
        self.handlers.insert(hook, Handler::Frame(Box::new(handler)));
        self
    }

    pub fn is_set(&self, hook: Hook) -> bool {
        self.handlers.contains_key(&hook)
    }

    /// Remove a handler for the duration of a call.
    pub(crate) fn take(&mut self, hook: Hook) -> Option<Handler> {
        self.handlers.remove(&hook)
    }

    /// Put back a handler removed by [`take`](Self::take), unless one was
    /// bound in the meantime.
    pub(crate) fn restore(&mut self, hook: Hook, handler: Handler) {
        self.handlers.entry(hook).or_insert(handler);
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<&str> = Hook::ALL
            .iter()
            .filter(|hook| self.is_set(**hook))
            .map(|hook| hook.name())
            .collect();
        f.debug_struct("Callbacks").field("bound", &bound).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_unbound_hooks_are_absent() {
        let mut callbacks = Callbacks::new().on(Hook::Begin, || {});
        assert!(callbacks.is_set(Hook::Begin));
        for hook in Hook::ALL.into_iter().filter(|hook| *hook != Hook::Begin) {
            assert!(callbacks.take(hook).is_none(), "{hook} should be unbound");
        }
    }

    #[test]
    fn test_frame_handler_receives_snapshot() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut callbacks = Callbacks::new().on_frame(Hook::Update, move |text, progress| {
            sink.lock().unwrap().push((text.to_owned(), progress.chars));
        });

        let frame = Frame {
            text: "ab".into(),
            progress: Progress {
                chars: 2,
                ..Progress::default()
            },
        };
        let mut handler = callbacks.take(Hook::Update).unwrap();
        handler.call(Hook::Update, Some(&frame));
        handler.call(Hook::Update, None);
        callbacks.restore(Hook::Update, handler);

        assert_eq!(*seen.lock().unwrap(), [("ab".to_owned(), 2)]);
        assert!(callbacks.is_set(Hook::Update));
    }

    #[test]
    fn test_plain_handler_ignores_frame() {
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        let mut callbacks = Callbacks::new().on(Hook::Change, move || *sink.lock().unwrap() += 1);
        let mut handler = callbacks.take(Hook::Change).unwrap();
        handler.call(Hook::Change, None);
        handler.call(
            Hook::Change,
            Some(&Frame {
                text: String::new(),
                progress: Progress::default(),
            }),
        );
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn test_restore_keeps_newer_binding() {
        let mut callbacks = Callbacks::new().on(Hook::Begin, || {});
        let old = callbacks.take(Hook::Begin).unwrap();
        callbacks = callbacks.on_frame(Hook::Begin, |_, _| {});
        callbacks.restore(Hook::Begin, old);
        assert!(matches!(callbacks.take(Hook::Begin), Some(Handler::Frame(_))));
    }

    #[test]
    fn test_hook_names() {
        assert_eq!(Hook::LoopBegin.to_string(), "loopBegin");
        assert!(Hook::ChangeBegin.carries_frame());
        assert!(!Hook::Complete.carries_frame());
    }
}
