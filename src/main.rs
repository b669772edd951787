use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;
use typewriter::{
    Callbacks, LoopOption, Options, SimpleOptions, SimpleTypewriter, TerminalSurface, Texts,
    Typewriter,
};

#[derive(Parser, Debug)]
#[command(
    name = "typewriter",
    about = "Type, pause and erase phrases on the terminal",
    version
)]
struct Args {
    /// Phrase to type; repeat for several, or pass one delimited list
    #[arg(short, long = "phrase")]
    phrases: Vec<String>,

    /// Separator used to split a single phrase argument
    #[arg(short, long)]
    delimiter: Option<String>,

    /// JSON file with options; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text treated as already on screen before typing starts
    #[arg(long)]
    existing: Option<String>,

    /// Milliseconds per typed character
    #[arg(long)]
    type_delay: Option<u64>,

    /// Milliseconds before erasing (per erased character with --simple)
    #[arg(long)]
    delete_delay: Option<u64>,

    /// Milliseconds to pause between phrases (--simple only)
    #[arg(long)]
    pause: Option<u64>,

    /// Number of passes through the phrases
    #[arg(long, conflicts_with = "no_loop")]
    loops: Option<u32>,

    /// Type the phrases once and stop
    #[arg(long)]
    no_loop: bool,

    /// Colors to cycle through, comma separated
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,

    /// Do not draw a blinking cursor
    #[arg(long)]
    no_cursor: bool,

    /// Use the minimal typewriter instead of the full one
    #[arg(long)]
    simple: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.simple {
        run_simple(args).await?;
    } else {
        run_full(args).await?;
    }

    finish_line()
}

async fn run_full(args: Args) -> Result<()> {
    let mut options: Options = match &args.config {
        Some(path) => read_json(path)?,
        None => Options::default(),
    };
    if let Some(texts) = phrases(&args) {
        options.phrases = Some(texts);
    }
    if let Some(delimiter) = args.delimiter {
        options.delimiter = Some(delimiter);
    }
    if let Some(ms) = args.type_delay {
        options.type_delay = Some(ms);
    }
    if let Some(ms) = args.delete_delay {
        options.delete_delay = Some(ms);
    }
    if let Some(passes) = args.loops {
        options.looping = Some(LoopOption::Passes(passes));
    }
    if args.no_loop {
        options.looping = Some(LoopOption::Enabled(false));
    }
    if !args.colors.is_empty() {
        options.colors = Some(args.colors);
    }
    if args.no_cursor {
        options.show_cursor = Some(false);
    }

    let surface = TerminalSurface::stdout().with_text(args.existing.unwrap_or_default());
    let typewriter = Typewriter::new(Arc::new(Mutex::new(surface)), options, Callbacks::new());
    typewriter.start();

    tokio::select! {
        _ = typewriter.finished().wait() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            typewriter.destroy();
        }
    }
    Ok(())
}

async fn run_simple(args: Args) -> Result<()> {
    let mut options: SimpleOptions = match &args.config {
        Some(path) => read_json(path)?,
        None => SimpleOptions::default(),
    };
    if let Some(ms) = args.type_delay {
        options.type_speed = ms;
    }
    if let Some(ms) = args.delete_delay {
        options.delete_speed = ms;
    }
    if let Some(ms) = args.pause {
        options.pause_between = ms;
    }
    if args.loops.is_some() {
        options.looping = true;
    }
    if args.no_loop {
        options.looping = false;
    }

    let texts = match (phrases(&args), args.delimiter.as_deref()) {
        (Some(texts), Some(delimiter)) => Texts::Many(texts.split(delimiter)),
        (Some(texts), None) => texts,
        (None, _) => Texts::One("Hello, world!".to_owned()),
    };
    let surface = TerminalSurface::stdout().with_text(args.existing.unwrap_or_default());
    let (done_tx, done_rx) = oneshot::channel();
    let typewriter = SimpleTypewriter::new(
        Arc::new(Mutex::new(surface)),
        texts,
        options,
        Some(Box::new(move || {
            let _ = done_tx.send(());
        })),
    )
    .context("Failed to create typewriter")?;

    tokio::select! {
        done = done_rx => done.context("Typewriter ended without completing")?,
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            typewriter.stop();
        }
    }
    Ok(())
}

/// Phrases from the command line. A single argument stays one string so
/// the delimiter can split it.
fn phrases(args: &Args) -> Option<Texts> {
    match args.phrases.as_slice() {
        [] => None,
        [one] => Some(Texts::One(one.clone())),
        many => Some(Texts::Many(many.to_vec())),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn finish_line() -> Result<()> {
    println!();
    std::io::stdout().flush()?;
    Ok(())
}
