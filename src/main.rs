mod display;

use std::collections::HashMap;
use std::error::Error;
use std::io::{stdout, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use tilt_shooter::input::HeldTilt;
use tilt_shooter::{Settings, Simulation};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Tilt reported while a direction key is held.  A full ±1.0 would move
/// the player 30 units per 10 ms sample, crossing the screen in a blink.
const KEY_TILT: f32 = 0.1;

/// How often the reader thread checks whether it has been unsubscribed.
const READER_POLL: Duration = Duration::from_millis(50);

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Terminal lifetime ─────────────────────────────────────────────────────────

/// Raw mode + alternate screen for as long as the guard lives.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn acquire<W: Write>(out: &mut W) -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;

        // Request key-release (and key-repeat) events from the terminal.
        // Kitty-protocol terminals support this; others fall back gracefully.
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(Self { keyboard_enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Terminal events delivered from a dedicated reader thread.  Dropping the
/// subscription stops and joins the thread.
struct KeyboardSubscription {
    rx: mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl KeyboardSubscription {
    fn subscribe() -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                match event::poll(READER_POLL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(_) => break,
                }
                match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break; // receiver dropped → program exiting
                        }
                    }
                    Err(_) => break,
                }
            }
        });
        Self {
            rx,
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Outcome {
    Quit,
    Restart,
}

/// Runs one session until the player quits or restarts after game over.
///
/// Tilt is emulated from the keyboard with the same held-key model used for
/// key repeat: while Left/A or Right/D is live the sensor reports -`KEY_TILT`
/// or +`KEY_TILT`, and with no direction held it reports nothing at all.
fn game_loop<W: Write>(
    out: &mut W,
    sim: &mut Simulation,
    keys: &KeyboardSubscription,
) -> std::io::Result<Outcome> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut tilt = HeldTilt::default();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = keys.rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(Outcome::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(Outcome::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if sim.is_over() => {
                            return Ok(Outcome::Restart);
                        }
                        KeyCode::Char(' ') => sim.fire(),
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let left = is_held(&key_frame, &KeyCode::Left, frame)
            || is_held(&key_frame, &KeyCode::Char('a'), frame)
            || is_held(&key_frame, &KeyCode::Char('A'), frame);
        let right = is_held(&key_frame, &KeyCode::Right, frame)
            || is_held(&key_frame, &KeyCode::Char('d'), frame)
            || is_held(&key_frame, &KeyCode::Char('D'), frame);
        match (left, right) {
            (true, false) => tilt.set(-KEY_TILT),
            (false, true) => tilt.set(KEY_TILT),
            _ => tilt.clear(),
        }

        let now = Instant::now();
        sim.advance(now - last, &mut tilt);
        last = now;

        display::render(out, sim.state(), sim.settings())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let settings = Settings::from_env()?;

    let mut out = BufWriter::new(stdout());
    let _terminal = TerminalGuard::acquire(&mut out)?;
    let keys = KeyboardSubscription::subscribe();

    loop {
        let mut sim = Simulation::new(settings.clone())?;
        match game_loop(&mut out, &mut sim, &keys)? {
            Outcome::Quit => break,
            Outcome::Restart => log::info!("restarting session"),
        }
    }

    // Subscription first, then the terminal guard.
    drop(keys);
    Ok(())
}
