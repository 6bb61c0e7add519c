//! Terminal frontend
//!
//! Draws scenes as colored glyphs with crossterm and turns key events into
//! [`TickInput`]s. All terminal I/O lives here; the simulation never sees it.

use std::collections::HashMap;
use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
};

use bombfall::Settings;
use bombfall::consts::*;
use bombfall::renderer::{BirdPose, Canvas, DrawCmd, Sprite, build_scene, colors, sprite::to_rgb8};
use bombfall::sim::{GamePhase, GameState, HeldDirections, TickInput, tick};

/// Turns raw key events into per-tick input
///
/// Direction keys count as held while their last press or repeat is at most
/// `hold_window` ticks old. Once the terminal has sent a release event it is
/// trusted to send them all, and keys stay held until released.
pub struct InputTracker {
    /// Last tick each key was seen, plus whether Shift was down
    key_frame: HashMap<KeyCode, (u64, bool)>,
    hold_window: u64,
    releases_seen: bool,
    /// One-shot actions waiting for the next tick
    pending: TickInput,
}

impl InputTracker {
    pub fn new(hold_window: u64) -> Self {
        Self {
            key_frame: HashMap::new(),
            hold_window,
            releases_seen: false,
            pending: TickInput::default(),
        }
    }

    pub fn handle(&mut self, key: KeyEvent, frame: u64) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(key.code, (frame, shift));
                self.press(key.code, key.modifiers);
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(key.code, (frame, shift));
            }
            KeyEventKind::Release => {
                self.releases_seen = true;
                self.key_frame.remove(&key.code);
            }
        }
    }

    fn press(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let pending = &mut self.pending;
        match code {
            KeyCode::Char(' ') => pending.fire = true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                pending.quit = true
            }
            KeyCode::Char('s') | KeyCode::Char('S') => pending.shield = true,
            KeyCode::Enter => pending.pulse = true,
            KeyCode::Tab | KeyCode::BackTab => pending.gravity = true,
            KeyCode::Char('h') | KeyCode::Char('H') => pending.hyper = true,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => pending.quit = true,
            _ => {}
        }
    }

    fn held(&self, code: KeyCode, frame: u64) -> Option<bool> {
        let &(last, shift) = self.key_frame.get(&code)?;
        let fresh = self.releases_seen || frame.saturating_sub(last) <= self.hold_window;
        fresh.then_some(shift)
    }

    /// Input for tick `frame`; one-shot actions are consumed
    pub fn next_input(&mut self, frame: u64) -> TickInput {
        let up = self.held(KeyCode::Up, frame);
        let down = self.held(KeyCode::Down, frame);
        let left = self.held(KeyCode::Left, frame);
        let right = self.held(KeyCode::Right, frame);

        let mut input = std::mem::take(&mut self.pending);
        input.held = HeldDirections {
            up: up.is_some(),
            down: down.is_some(),
            left: left.is_some(),
            right: right.is_some(),
        };
        input.boost = [up, down, left, right].contains(&Some(true));
        input
    }
}

/// Cell grid that world coordinates are scaled onto
pub struct TerminalCanvas<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cells: Vec<Option<(char, Color)>>,
}

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb {
        r: color[0],
        g: color[1],
        b: color[2],
    }
}

fn tint(color: [f32; 4]) -> Color {
    rgb(to_rgb8(color))
}

/// Arrow per facing, in `Facing::ALL` order
const FACING_GLYPHS: [char; 8] = ['→', '↗', '↑', '↖', '←', '↙', '↓', '↘'];

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            out,
            cols,
            rows,
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    fn cell_of(&self, x: f32, y: f32) -> (i32, i32) {
        let col = (x / WIDTH * self.cols as f32).floor() as i32;
        let row = (y / HEIGHT * self.rows as f32).floor() as i32;
        (col, row)
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let inside = (0..self.cols as i32).contains(&col) && (0..self.rows as i32).contains(&row);
        inside.then(|| row as usize * self.cols as usize + col as usize)
    }

    /// Paint the cells covered by a world-space box; `overlay` only fills blanks
    fn fill(&mut self, cmd: &DrawCmd, glyph: char, color: Color, overlay: bool) {
        let half = cmd.size / 2.0;
        let (c0, r0) = self.cell_of(cmd.center.x - half.x, cmd.center.y - half.y);
        let (c1, r1) = self.cell_of(cmd.center.x + half.x, cmd.center.y + half.y);
        for row in r0..=r1.max(r0) {
            for col in c0..=c1.max(c0) {
                let Some(i) = self.index(col, row) else {
                    continue;
                };
                if overlay && self.cells[i].is_some() {
                    continue;
                }
                self.cells[i] = Some((glyph, color));
            }
        }
    }

    /// Like `fill`, restricted to cells whose center lies inside the circle
    fn fill_circle(&mut self, cmd: &DrawCmd, glyph: char, color: Color) {
        let radius = cmd.size.x / 2.0;
        let cell_w = WIDTH / self.cols as f32;
        let cell_h = HEIGHT / self.rows as f32;
        let (c0, r0) = self.cell_of(cmd.center.x - radius, cmd.center.y - radius);
        let (c1, r1) = self.cell_of(cmd.center.x + radius, cmd.center.y + radius);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let Some(i) = self.index(col, row) else {
                    continue;
                };
                let x = (col as f32 + 0.5) * cell_w;
                let y = (row as f32 + 0.5) * cell_h;
                if (x - cmd.center.x).hypot(y - cmd.center.y) <= radius && self.cells[i].is_none() {
                    self.cells[i] = Some((glyph, color));
                }
            }
        }
    }

    fn text(&mut self, cmd: &DrawCmd, text: &str, color: Color) {
        let (col, row) = self.cell_of(cmd.center.x, cmd.center.y);
        for (offset, ch) in text.chars().enumerate() {
            if let Some(i) = self.index(col + offset as i32, row) {
                self.cells[i] = Some((ch, color));
            }
        }
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    type Error = io::Error;

    fn draw(&mut self, cmd: &DrawCmd) -> io::Result<()> {
        match &cmd.sprite {
            Sprite::Background => self.cells.fill(None),
            Sprite::Bird { pose, hyper } => {
                let glyph = match pose {
                    BirdPose::Facing(facing) => FACING_GLYPHS[facing.index()],
                    BirdPose::Happy => '☺',
                    BirdPose::Sad => '☹',
                };
                let color = if *hyper { colors::BIRD_HYPER } else { colors::BIRD };
                self.fill(cmd, glyph, tint(color), false);
            }
            Sprite::Beam { angle_degrees } => {
                let glyph = match angle_degrees.rem_euclid(180.0) {
                    a if a < 22.5 || a >= 157.5 => '─',
                    a if a < 67.5 => '╱',
                    a if a < 112.5 => '│',
                    _ => '╲',
                };
                self.fill(cmd, glyph, tint(colors::BEAM), false);
            }
            Sprite::Enemy { variant } => {
                let color = colors::ENEMY[*variant as usize % colors::ENEMY.len()];
                self.fill(cmd, 'Ѫ', tint(color), false);
            }
            Sprite::Bomb { color, .. } => self.fill(cmd, '●', rgb(*color), false),
            Sprite::Explosion { frame } => {
                let glyph = if *frame == 0 { '✶' } else { '✹' };
                let color = colors::EXPLOSION[*frame as usize % colors::EXPLOSION.len()];
                self.fill(cmd, glyph, tint(color), false);
            }
            Sprite::ScreenPulse => self.fill(cmd, '░', tint(colors::PULSE), true),
            Sprite::Shield { horizontal } => {
                let glyph = if *horizontal { '▀' } else { '█' };
                self.fill(cmd, glyph, tint(colors::SHIELD), false);
            }
            Sprite::Gravity { .. } => self.fill_circle(cmd, '·', tint(colors::GRAVITY)),
            Sprite::ScoreText(text) => self.text(cmd, text, tint(colors::SCORE)),
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let mut current = None;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                let (glyph, color) = cell.unwrap_or((' ', Color::Reset));
                if current != Some(color) {
                    self.out.queue(style::SetForegroundColor(color))?;
                    current = Some(color);
                }
                self.out.queue(Print(glyph))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

/// Run an interactive game until quit or game over
pub fn run(settings: &Settings, seed: u64) -> io::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Terminals without the keyboard protocol fall back to the hold window
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &rx, settings, seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    let state = result?;
    println!("{}", state.score);
    Ok(())
}

fn game_loop(
    out: &mut BufWriter<Stdout>,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
    seed: u64,
) -> io::Result<GameState> {
    let mut state = GameState::with_tuning(seed, settings.tuning.clone())
        .map_err(|reason| io::Error::new(io::ErrorKind::InvalidInput, reason))?;
    let mut tracker = InputTracker::new(settings.hold_window_ticks);
    let frame_duration = settings.frame_duration();
    let (cols, rows) = terminal::size()?;
    let mut canvas = TerminalCanvas::new(out, cols, rows);

    loop {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(key) = ev {
                tracker.handle(key, state.frame);
            }
        }

        let input = tracker.next_input(state.frame);
        tick(&mut state, &input);

        match state.phase {
            GamePhase::Quit => return Ok(state),
            GamePhase::GameOver => {
                build_scene(&state).paint(&mut canvas)?;
                thread::sleep(settings.game_over_pause());
                return Ok(state);
            }
            GamePhase::Running => build_scene(&state).paint(&mut canvas)?,
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bombfall::renderer::Layer;
    use glam::Vec2;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, kind)
    }

    #[test]
    fn test_one_shots_are_consumed() {
        let mut tracker = InputTracker::new(4);
        tracker.handle(key(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Press), 0);
        tracker.handle(key(KeyCode::Tab, KeyModifiers::NONE, KeyEventKind::Press), 0);

        let input = tracker.next_input(0);
        assert!(input.fire);
        assert!(input.gravity);
        assert!(!input.shield);

        let input = tracker.next_input(1);
        assert!(!input.fire);
        assert!(!input.gravity);
    }

    #[test]
    fn test_repeat_does_not_refire() {
        let mut tracker = InputTracker::new(4);
        tracker.handle(key(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Repeat), 0);
        assert!(!tracker.next_input(0).fire);
    }

    #[test]
    fn test_held_keys_expire_without_releases() {
        let mut tracker = InputTracker::new(4);
        tracker.handle(key(KeyCode::Up, KeyModifiers::SHIFT, KeyEventKind::Press), 10);

        let input = tracker.next_input(14);
        assert!(input.held.up);
        assert!(input.boost);

        assert!(!tracker.next_input(15).held.up);
    }

    #[test]
    fn test_release_events_end_holds() {
        let mut tracker = InputTracker::new(4);
        tracker.handle(key(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Press), 0);
        tracker.handle(key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Press), 0);
        tracker.handle(key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Release), 1);

        // Left stays held well past the window once releases are reported
        let input = tracker.next_input(100);
        assert!(input.held.left);
        assert!(!input.held.right);
        assert!(!input.boost);
    }

    #[test]
    fn test_quit_keys() {
        for (code, modifiers) in [
            (KeyCode::Char('q'), KeyModifiers::NONE),
            (KeyCode::Esc, KeyModifiers::NONE),
            (KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut tracker = InputTracker::new(4);
            tracker.handle(key(code, modifiers, KeyEventKind::Press), 0);
            assert!(tracker.next_input(0).quit);
        }
    }

    #[test]
    fn test_canvas_paints_scene() {
        let mut state = GameState::new(5);
        state.score.add(7);
        let mut buf = Vec::new();
        {
            let mut canvas = TerminalCanvas::new(&mut buf, 80, 24);
            let scene = build_scene(&state);
            assert_eq!(scene.count(Layer::Player), 1);
            scene.paint(&mut canvas).unwrap();

            // Player at (900, 400) lands in column 45, row 10
            let (col, row) = canvas.cell_of(900.0, 400.0);
            assert_eq!((col, row), (45, 10));
            let i = canvas.index(col, row).unwrap();
            assert_eq!(canvas.cells[i].map(|c| c.0), Some('→'));
        }
        let printed = String::from_utf8_lossy(&buf);
        assert!(printed.contains("Score: 7"));
    }

    #[test]
    fn test_overlay_keeps_existing_cells() {
        let mut canvas = TerminalCanvas::new(Vec::new(), 16, 9);
        let bomb = DrawCmd {
            layer: Layer::Bombs,
            sprite: Sprite::Bomb {
                radius: 10.0,
                color: [255, 0, 0],
            },
            center: Vec2::new(50.0, 50.0),
            size: Vec2::splat(20.0),
        };
        let pulse = DrawCmd {
            layer: Layer::Pulses,
            sprite: Sprite::ScreenPulse,
            center: Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
            size: Vec2::new(WIDTH, HEIGHT),
        };
        canvas.draw(&bomb).unwrap();
        canvas.draw(&pulse).unwrap();
        assert_eq!(canvas.cells[0].map(|c| c.0), Some('●'));
        assert_eq!(canvas.cells[1].map(|c| c.0), Some('░'));
    }
}
