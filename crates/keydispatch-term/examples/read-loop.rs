use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use tracing_subscriber::EnvFilter;

use keydispatch::{
    ActionRegistry,
    Deadline,
    DispatchContext,
    KeySession,
    ResolvedAction,
    TextRange,
};
use keydispatch_term::{config::Config, errors::HostResult, key::convert_key};

const DEFAULT_CONFIG: &str = r#"
[input]
timeout = true
timeoutlen = 1000

[[bindings]]
mode = "normal"
keys = "d"
action = "edit.delete"

[[bindings]]
mode = "normal"
keys = "y"
action = "edit.yank"

[[bindings]]
mode = "normal"
keys = "d d"
action = "edit.delete-line"

[[bindings]]
mode = "normal"
keys = "x"
action = "edit.delete-char"

[[bindings]]
mode = "normal"
keys = "w"
action = "motion.word"

[[bindings]]
mode = "normal"
keys = "0"
action = "motion.line-start"

[[bindings]]
mode = "normal"
keys = "f"
action = "motion.find-char"

[[bindings]]
mode = "normal"
keys = "Space Space"
action = "palette.open"

[[bindings]]
mode = "normal"
keys = "Z Z"
action = "demo.quit"
"#;

/// How long to block for input when nothing is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

fn main() -> HostResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::from_toml_str(DEFAULT_CONFIG)?,
    };
    let bindings = config.bindings()?;

    let quit = Arc::new(AtomicBool::new(false));
    let mut registry = ActionRegistry::new();
    registry.register("demo", 0, demo_actions(quit.clone()))?;

    let actions = registry.action_map();
    let ctx = DispatchContext::new(&bindings, &actions, "normal");
    let mut session = KeySession::with_deadline(config.input.timeout_duration());

    println!("Reading keys in normal mode; 'Z Z' or Ctrl-C quits the loop.");

    crossterm::terminal::enable_raw_mode()?;

    let res = run(&mut session, &ctx, &quit);

    crossterm::terminal::disable_raw_mode()?;

    return res;
}

fn demo_actions(quit: Arc<AtomicBool>) -> Vec<ResolvedAction> {
    vec![
        ResolvedAction::operator("edit.delete", |range| print!("  delete {range:?}\r\n")),
        ResolvedAction::operator("edit.yank", |range| print!("  yank {range:?}\r\n")),
        ResolvedAction::command("edit.delete-line", |count| {
            print!("  delete lines: {count:?}\r\n");
        }),
        ResolvedAction::command("edit.delete-char", |count| {
            print!("  delete chars: {count:?}\r\n");
        }),
        ResolvedAction::motion("motion.word", |count, _| {
            TextRange::new(0, count.unwrap_or(1).saturating_mul(5))
        }),
        ResolvedAction::motion("motion.line-start", |_, _| TextRange::new(0, 0)),
        ResolvedAction::char_motion("motion.find-char", |count, ch| {
            print!("  find {ch:?} x{}\r\n", count.unwrap_or(1));
            TextRange::new(0, count.unwrap_or(1))
        }),
        ResolvedAction::command("palette.open", |_| print!("  open palette\r\n")),
        ResolvedAction::command("demo.quit", move |_| quit.store(true, Ordering::SeqCst)),
    ]
}

fn run(
    session: &mut KeySession<Deadline>,
    ctx: &DispatchContext<'_>,
    quit: &AtomicBool,
) -> HostResult<()> {
    loop {
        let timeout = session.poll_timeout(Instant::now()).unwrap_or(IDLE_POLL);

        if !poll(timeout)? {
            if session.expire_due(Instant::now()) {
                print!("(timed out)\r\n");
            }

            continue;
        }

        match read()? {
            Event::Key(ke) => {
                if ke.code == KeyCode::Char('c') && ke.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                let Some(key) = convert_key(&ke) else {
                    continue;
                };

                let res = session.handle_key(&key, ctx);

                print!("{:<12} {:?} [{}]\r\n", key.key(), res, session.pending_keys_display());

                if let Some(range) = res.run() {
                    print!("  range {range:?}\r\n");
                }

                if quit.load(Ordering::SeqCst) {
                    return Ok(());
                }
            },
            Event::FocusGained | Event::FocusLost => {
                // Do nothing for now.
            },
            Event::Mouse(_) | Event::Paste(_) | Event::Resize(_, _) => {
                // Do nothing for now.
            },
        }
    }
}
