//! # Typewriter
//!
//! A typewriter text effect engine.
//!
//! A [`Typewriter`] builds a phrase up one character at a time on a
//! [`Surface`], pauses, erases it again and moves on to the next phrase. It
//! can cycle colors per phrase, blink a cursor next to the text and report
//! its progress through hooks and an awaitable [`Finished`] signal.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use typewriter::{Callbacks, Options, TerminalSurface, Typewriter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let surface = Arc::new(Mutex::new(TerminalSurface::stdout()));
//!     let options = Options::new()
//!         .with_phrases("Hello,World")
//!         .with_colors(["cyan", "magenta"])
//!         .with_loop(false);
//!
//!     let typewriter = Typewriter::new(surface, options, Callbacks::new());
//!     typewriter.start();
//!     typewriter.finished().await;
//! }
//! ```
//!
//! ## Options
//!
//! | Option | Default | Meaning |
//! |--------|---------|---------|
//! | `phrases` | `"Type something amazing!"` | A list, or one string split on `delimiter` |
//! | `delimiter` | `,` | Separator for a single phrase string |
//! | `loop` | `true` | `false` for one pass, a number for that many passes |
//! | `typeDelay` | 200ms | Delay per typed or erased character |
//! | `deleteDelay` | 800ms | Pause before a completed phrase is erased |
//! | `colors` | `["inherit"]` | Colors cycled once per erased phrase |
//! | `cursorChar` | `\|` | Cursor glyph |
//! | `cursorBlinkSpeed` | 400ms | Cursor blink interval |
//! | `showCursor` | `true` | Whether to create a cursor at all |
//!
//! Text already on the surface when the typewriter is created becomes the
//! first phrase and is erased first. Without explicit phrases it is the
//! only phrase and the animation runs a single pass.
//!
//! ## Hooks
//!
//! Bind handlers per [`Hook`] with [`Callbacks`]. Per-tick hooks receive the
//! displayed text and a copy of the [`Progress`]:
//!
//! ```
//! use typewriter::{Callbacks, Hook};
//!
//! let callbacks = Callbacks::new()
//!     .on(Hook::LoopComplete, || println!("pass done"))
//!     .on_frame(Hook::Change, |text, progress| {
//!         println!("{text} ({} chars)", progress.chars);
//!     });
//! ```
//!
//! ## The simple variant
//!
//! [`SimpleTypewriter`] is a minimal sibling with per-character type and
//! delete speeds, a pause between phrases and a one-shot callback. It
//! validates its inputs and starts on construction. [`attach_all`] builds
//! them from JSON payloads, skipping malformed entries.
//!
//! ## Custom surfaces
//!
//! Implement [`Surface`] to draw anywhere:
//!
//! ```
//! use typewriter::Surface;
//!
//! #[derive(Default)]
//! struct Title(String);
//!
//! impl Surface for Title {
//!     fn text(&self) -> String { self.0.clone() }
//!     fn set_text(&mut self, text: &str) { self.0 = text.to_owned(); }
//!     fn set_color(&mut self, _color: &str) {}
//! }
//! ```

pub mod attach;
pub mod completion;
pub mod config;
pub mod cursor;
pub mod effect;
pub mod error;
pub mod hooks;
pub mod machine;
pub(crate) mod scheduler;
pub mod simple;
pub mod surface;
pub mod surfaces;

pub use attach::{MarkedElement, attach_all};
pub use completion::Finished;
pub use config::{Config, CursorSettings, LoopOption, Options, Texts};
pub use cursor::Cursor;
pub use effect::Typewriter;
pub use error::TypewriterError;
pub use hooks::{Callbacks, Hook};
pub use machine::{Effect, Frame, Machine, Next, Progress, Step};
pub use simple::{SimpleOptions, SimpleTypewriter};
pub use surface::{SharedSurface, Surface};
pub use surfaces::{MemorySurface, TerminalSurface};
