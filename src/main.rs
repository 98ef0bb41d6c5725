//! mote binary entry point: CLI parsing and the input-render loop.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use mote::editor::{Editor, InputResult};
use mote::input::read_key;
use mote::render;
use mote::term::{self, RawMode, TtyInput};

/// Minimal screen-oriented text viewer.
#[derive(Parser)]
#[command(name = "mote", version, about)]
struct Cli {
    /// File to open. When omitted the editor starts with an empty buffer.
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Best-effort clear so the error is readable on a sane screen.
            let _ = render::clear_screen(&mut io::stdout());
            eprintln!("mote: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if !atty::is(atty::Stream::Stdin) || !atty::is(atty::Stream::Stdout) {
        bail!("stdin and stdout must be a terminal");
    }

    // Raw mode stays on for the whole session; the guard restores the
    // original settings exactly once, on every exit path.
    let _raw = RawMode::enable().context("failed to enable raw mode")?;

    let mut input = TtyInput;
    let size = term::window_size(&mut input).context("failed to determine window size")?;

    let mut editor = Editor::new(size);
    if let Some(path) = &cli.file {
        editor.open(path)?;
    }
    editor.set_status_message("HELP: Ctrl-Q = quit");

    let mut stdout = io::stdout();
    loop {
        render::refresh_screen(&mut editor, &mut stdout, Instant::now())
            .context("failed to write frame")?;

        let key = read_key(&mut input)?;
        if editor.process_key(key) == InputResult::Quit {
            render::clear_screen(&mut stdout)?;
            return Ok(());
        }
    }
}
