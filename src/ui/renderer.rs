/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Paint the whole scene into a pixel `Canvas` in world coordinates
///   2. Fold pixel pairs into half-block cells (▀: fg = top, bg = bottom)
///      inside the aspect-locked viewport, then draw HUD, touch bar and
///      screens on top, all into the `front` buffer
///   3. Compare each cell with the `back` buffer (previous frame) and only
///      emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The scene is rebuilt from entity state every frame; only the terminal
/// write is incremental.
///
/// Screen layout (rows):
///   0                 HUD
///   1 ..              viewport
///   after viewport    touch bar (◀ ▶ … JUMP), TOUCH_ROWS tall
///   last              help line

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Collectible, Enemy, EnemyKind, GemKind, Particle, Platform, Player};
use crate::domain::material::Rgb;
use crate::domain::physics::Rect;
use crate::sim::world::{Phase, WorldState};
use super::canvas::Canvas;
use super::input::{TouchLayout, TouchState};
use super::viewport::Viewport;

// ── Cell: the unit of the back-buffer ──

const BASE_RGB: Rgb = Rgb(22, 22, 35);

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every "empty" terminal cell, so the
    /// cleared screen and drawn cells never disagree on colour.
    const BASE_BG: Color = Color::Rgb { r: BASE_RGB.0, g: BASE_RGB.1, b: BASE_RGB.2 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any real cell.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    /// Normalize bg: Color::Reset → BASE_BG (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
    }

    /// Upper half-block showing two stacked pixels.
    fn pixels(top: Rgb, bottom: Rgb) -> Self {
        Cell { ch: '▀', fg: term_color(top), bg: term_color(bottom) }
    }
}

#[inline]
fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

const HUD_ROW: usize = 0;
const VIEW_TOP: u16 = 1;
const TOUCH_ROWS: u16 = 3;
/// HUD + touch bar + help line.
const RESERVED_ROWS: u16 = 1 + TOUCH_ROWS + 1;

// ── Palette ──

const SKY: Rgb = Rgb(0x87, 0xCE, 0xEB);
const MEADOW: Rgb = Rgb(0x98, 0xFB, 0x98);
const GRASS: Rgb = Rgb(0x22, 0x8B, 0x22);

const PLAYER_GROUNDED: Rgb = Rgb(0xFF, 0x6B, 0x6B);
const PLAYER_AIRBORNE: Rgb = Rgb(0xFF, 0x8E, 0x53);
const HAT: Rgb = Rgb(0xFF, 0x00, 0x00);
const DIAMOND: Rgb = Rgb(0x00, 0xBF, 0xFF);
const EMERALD: Rgb = Rgb(0x50, 0xC8, 0x78);
const GOOMBA: Rgb = Rgb(0x8B, 0x45, 0x13);

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const BOX_BG: Color = Color::Rgb { r: 30, g: 30, b: 45 };
const ACCENT: Color = Color::Rgb { r: 255, g: 215, b: 0 };
const GOOD: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const BAD: Color = Color::Rgb { r: 255, g: 60, b: 60 };
const DIM: Color = Color::DarkGrey;

const SEAM_SPACING: usize = 20;
const PARTICLE_SIZE: f32 = 3.0;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    viewport: Viewport,
    canvas: Canvas,
    touch_layout: TouchLayout,
    keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new() -> Self {
        let viewport = Viewport::fit(0, 0, VIEW_TOP, RESERVED_ROWS);
        Renderer {
            writer: BufWriter::with_capacity(32768, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            canvas: Canvas::new(&viewport),
            viewport,
            touch_layout: TouchLayout::default(),
            keyboard_enhanced: false,
        }
    }

    /// Enter raw mode / alternate screen with mouse and focus reporting.
    /// Returns true when the terminal will report key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            EnableFocusChange,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keyboard_enhanced = true;
        }
        log::info!("terminal ready (key release events: {})", self.keyboard_enhanced);

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.apply_size(tw, th);

        Ok(self.keyboard_enhanced)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            DisableFocusChange,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// On-screen button areas from the most recent layout.
    pub fn touch_layout(&self) -> &TouchLayout {
        &self.touch_layout
    }

    fn apply_size(&mut self, tw: u16, th: u16) {
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        self.viewport = Viewport::fit(tw, th, VIEW_TOP, RESERVED_ROWS);
        self.canvas.resize(&self.viewport);
        let bar_row = VIEW_TOP + self.viewport.rows();
        self.touch_layout = TouchLayout::bar(tw, bar_row, TOUCH_ROWS);
    }

    pub fn render(&mut self, world: &WorldState, touch: &TouchState, pad_connected: bool) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.apply_size(tw, th);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();

        paint_scene(&mut self.canvas, world);
        match world.phase {
            Phase::Playing => {}
            Phase::Title => self.canvas.dim(0.55),
            Phase::GameOver | Phase::GameComplete => self.canvas.dim(0.7),
        }
        self.blit_canvas();

        self.compose_hud(world);
        match world.phase {
            Phase::Title => self.compose_title(world),
            Phase::GameOver | Phase::GameComplete => self.compose_end_screen(world),
            Phase::Playing => {}
        }
        self.compose_touch_bar(touch);
        self.compose_help(pad_connected);

        if world.paused {
            self.compose_pause_overlay(world);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours, never ResetColor: the terminal default may
        // differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    /// Canvas → half-block cells inside the viewport.
    fn blit_canvas(&mut self) {
        let vp = self.viewport;
        if vp.is_empty() { return; }
        for row in 0..vp.rows() as usize {
            for col in 0..vp.px_w {
                let top = self.canvas.get(col, row * 2).unwrap_or(BASE_RGB);
                let bottom = self.canvas.get(col, row * 2 + 1).unwrap_or(BASE_RGB);
                self.front.set(
                    vp.col as usize + col,
                    vp.row as usize + row,
                    Cell::pixels(top, bottom),
                );
            }
        }
    }

    fn compose_hud(&mut self, w: &WorldState) {
        let hud = &w.hud;
        let hearts = "♥".repeat(hud.lives as usize);
        let text = format!(
            " Score: {:<7} Level: {}   Time: {:>3}   Lives: {:<3}  Gems: {}/{}",
            hud.score, hud.level, hud.timer, hearts,
            w.collectibles.len() - w.gems_remaining(), w.collectibles.len(),
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &text, Color::White, HUD_BG);
        if hud.timer <= 30 && w.phase == Phase::Playing {
            // Re-draw the clock in red for the last half minute
            let clock = format!("Time: {:>3}", hud.timer);
            if let Some(at) = text.find("Time:") {
                let col = text[..at].chars().count();
                self.front.put_str(col, HUD_ROW, &clock, BAD, HUD_BG);
            }
        }
    }

    fn compose_touch_bar(&mut self, touch: &TouchState) {
        for b in &self.touch_layout.buttons {
            let held = touch.is_held(b.button);
            let (fg, bg) = if held {
                (Color::Black, ACCENT)
            } else {
                (Color::White, Color::Rgb { r: 60, g: 60, b: 90 })
            };
            for dy in 0..b.height {
                for dx in 0..b.width {
                    self.front.set((b.col + dx) as usize, (b.row + dy) as usize, Cell::new(' ', fg, bg));
                }
            }
            let label = b.button.label();
            let label_w = label.chars().count() as u16;
            let lx = b.col + b.width.saturating_sub(label_w) / 2;
            self.front.put_str(lx as usize, (b.row + b.height / 2) as usize, label, fg, bg);
        }
    }

    fn compose_help(&mut self, pad_connected: bool) {
        let row = self.term_h.saturating_sub(1);
        let help = if pad_connected {
            " Pad: D-pad/Stick Move  A/B Jump  Y Pause  Start Play  Select Quit  │  Keys: ←→ ↑ P Enter Q"
        } else {
            " ←→/AD Move  ↑/W/Space Jump  P/F1 Pause  Enter Start  Q/Esc Quit  │  Mouse: click ◀ ▶ JUMP"
        };
        self.front.put_str(0, row, help, DIM, Color::Reset);
    }

    /// Dark box centred in the viewport, one padding row above and below.
    fn compose_box(&mut self, lines: &[(&str, Color)]) {
        let vp = self.viewport;
        let inner_w = lines.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0);
        let box_w = (inner_w + 6).min(self.term_w);
        let box_h = lines.len() + 2;
        let cx = vp.col as usize + vp.px_w / 2;
        let cy = vp.row as usize + vp.rows() as usize / 2;
        let x0 = cx.saturating_sub(box_w / 2);
        let y0 = cy.saturating_sub(box_h / 2).max(VIEW_TOP as usize);

        for y in y0..y0 + box_h {
            for x in x0..x0 + box_w {
                self.front.set(x, y, Cell::new(' ', Color::White, BOX_BG));
            }
        }
        for (i, (line, fg)) in lines.iter().enumerate() {
            let lx = x0 + (box_w.saturating_sub(line.chars().count())) / 2;
            self.front.put_str(lx, y0 + 1 + i, line, *fg, BOX_BG);
        }
    }

    fn compose_title(&mut self, w: &WorldState) {
        let blink = (w.anim_tick / 30) % 2 == 0;
        let prompt = if blink { "▸ Press ENTER or Start to play ◂" } else { "" };
        self.compose_box(&[
            ("◆  G E M   H O P  ◆", ACCENT),
            ("", Color::White),
            ("Collect every gem on each of the three levels.", Color::White),
            ("Stomp enemies from above. Beat the clock.", Color::White),
            ("", Color::White),
            ("◆ Diamond 50   ◆ Emerald 25   Stomp 100", DIM),
            ("", Color::White),
            (prompt, GOOD),
        ]);
    }

    fn compose_end_screen(&mut self, w: &WorldState) {
        let won = w.phase == Phase::GameComplete;
        let (headline, color, sub) = if won {
            ("★ CONGRATULATIONS! ★", ACCENT, "You completed all levels!")
        } else {
            ("✕ GAME OVER ✕", BAD, "Better luck next time.")
        };
        let score = format!("Final Score: {}", w.score);
        let level = format!("Level Reached: {}", w.level);
        self.compose_box(&[
            (headline, color),
            (sub, Color::White),
            ("", Color::White),
            (score.as_str(), Color::White),
            (level.as_str(), Color::White),
            ("", Color::White),
            ("▸ ENTER / Start: Play Again", GOOD),
            ("▸ Q / Esc: Quit", DIM),
        ]);
    }

    fn compose_pause_overlay(&mut self, w: &WorldState) {
        let blink = (w.anim_tick / 8) % 2 == 0;
        let label = if blink { "▶  PAUSED  ◀" } else { "   PAUSED   " };
        self.compose_box(&[
            (label, ACCENT),
            ("", Color::White),
            ("P / F1  Resume", Color::White),
            ("Q / Esc Quit", DIM),
        ]);
    }
}

// ══════════════════════════════════════════════════════════════
// Scene painting (world coordinates → canvas)
// ══════════════════════════════════════════════════════════════

/// Background, platforms, gems, enemies, player, particles, back to front.
pub fn paint_scene(canvas: &mut Canvas, w: &WorldState) {
    canvas.vertical_gradient(&[(0.0, SKY), (0.7, MEADOW), (1.0, GRASS)]);
    for p in &w.platforms {
        paint_platform(canvas, p);
    }
    for gem in w.collectibles.iter().filter(|g| !g.collected) {
        paint_gem(canvas, gem);
    }
    for enemy in w.enemies.iter().filter(|e| !e.defeated) {
        paint_enemy(canvas, enemy);
    }
    paint_player(canvas, &w.player);
    for particle in &w.particles {
        paint_particle(canvas, particle);
    }
}

fn paint_platform(canvas: &mut Canvas, p: &Platform) {
    let r = p.rect;
    canvas.fill_rect(r, p.material.color());
    let seam = p.material.seam_color();
    for i in (0..r.w as usize).step_by(SEAM_SPACING) {
        canvas.fill_rect(Rect::new(r.x + i as f32, r.y, 1.0, r.h), seam);
    }
}

fn paint_player(canvas: &mut Canvas, p: &Player) {
    let b = &p.body;
    let body = if b.on_ground { PLAYER_GROUNDED } else { PLAYER_AIRBORNE };
    canvas.fill_rect(b.rect(), body);

    canvas.fill_rect(Rect::new(b.x + 8.0, b.y + 8.0, 6.0, 6.0), Rgb::WHITE);
    canvas.fill_rect(Rect::new(b.x + 18.0, b.y + 8.0, 6.0, 6.0), Rgb::WHITE);

    // Pupils look the way the player faces
    let look = if p.facing.sign() > 0.0 { 2.0 } else { 0.0 };
    canvas.fill_rect(Rect::new(b.x + 10.0 + look, b.y + 10.0, 2.0, 2.0), Rgb::BLACK);
    canvas.fill_rect(Rect::new(b.x + 20.0 + look, b.y + 10.0, 2.0, 2.0), Rgb::BLACK);

    canvas.fill_rect(Rect::new(b.x + 4.0, b.y - 8.0, 24.0, 12.0), HAT);
}

/// Gem outline relative to its centre, before rotation.
fn gem_shape(kind: GemKind) -> [(f32, f32); 6] {
    match kind {
        GemKind::Diamond => [(0.0, -10.0), (8.0, -4.0), (8.0, 4.0), (0.0, 10.0), (-8.0, 4.0), (-8.0, -4.0)],
        GemKind::Emerald => [(0.0, -8.0), (6.0, -2.0), (6.0, 6.0), (0.0, 8.0), (-6.0, 6.0), (-6.0, -2.0)],
    }
}

fn paint_gem(canvas: &mut Canvas, gem: &Collectible) {
    let (cx, cy) = gem.rect().center();
    let cy = cy + gem.bob;
    let angle = gem.anim_frame as f32 * 0.1;
    let (sin, cos) = angle.sin_cos();
    let rotate = |(x, y): (f32, f32)| (cx + x * cos - y * sin, cy + x * sin + y * cos);

    let outline: Vec<(f32, f32)> = gem_shape(gem.kind).into_iter().map(rotate).collect();
    let (color, shine, alpha) = match gem.kind {
        GemKind::Diamond => (DIAMOND, Rect::new(-2.0, -6.0, 4.0, 4.0), 0.7),
        GemKind::Emerald => (EMERALD, Rect::new(-1.0, -4.0, 2.0, 3.0), 0.5),
    };
    canvas.fill_polygon(&outline, color);

    let (sx, sy) = rotate(shine.center());
    canvas.blend_rect(
        Rect::new(sx - shine.w / 2.0, sy - shine.h / 2.0, shine.w, shine.h),
        Rgb::WHITE,
        alpha,
    );
}

fn paint_enemy(canvas: &mut Canvas, e: &Enemy) {
    let b = &e.body;
    let body = match e.kind {
        EnemyKind::Goomba => GOOMBA,
    };
    canvas.fill_rect(b.rect(), body);
    canvas.fill_rect(Rect::new(b.x + 4.0, b.y + 6.0, 4.0, 4.0), HAT);
    canvas.fill_rect(Rect::new(b.x + 16.0, b.y + 6.0, 4.0, 4.0), HAT);
    canvas.fill_rect(Rect::new(b.x + 2.0, b.y + b.h - 4.0, 6.0, 4.0), Rgb::BLACK);
    canvas.fill_rect(Rect::new(b.x + 16.0, b.y + b.h - 4.0, 6.0, 4.0), Rgb::BLACK);
}

fn paint_particle(canvas: &mut Canvas, p: &Particle) {
    canvas.blend_rect(Rect::new(p.x, p.y, PARTICLE_SIZE, PARTICLE_SIZE), p.color, p.alpha());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::domain::material::Material;

    /// Full-resolution canvas so logical px map 1:1.
    fn canvas() -> Canvas {
        Canvas::with_size(1280, 720, 1.0, 1.0)
    }

    fn world() -> WorldState {
        WorldState::new(SimConfig::default(), 3)
    }

    #[test]
    fn platforms_show_material_and_seams() {
        let w = world();
        let mut c = canvas();
        paint_scene(&mut c, &w);
        // Level 1 ground is grass at (0,680); seams at x = 0, 20, 40, …
        assert_eq!(c.get(10, 700), Some(Material::Grass.color()));
        assert_eq!(c.get(20, 700), Some(Material::Grass.seam_color()));
        // Stone ledge at (300,600)
        assert_eq!(c.get(310, 610), Some(Material::Stone.color()));
    }

    #[test]
    fn background_is_sky_at_top() {
        let w = world();
        let mut c = canvas();
        paint_scene(&mut c, &w);
        let top = c.get(640, 0).unwrap_or(Rgb::BLACK);
        assert!(top.2 > top.0, "sky should be blue-ish: {top:?}");
    }

    #[test]
    fn player_colour_tracks_ground_contact() {
        let mut w = world();
        w.player.body.x = 600.0;
        w.player.body.y = 100.0;
        let mut c = canvas();
        paint_scene(&mut c, &w);
        assert_eq!(c.get(602, 128), Some(PLAYER_AIRBORNE));
        // Hat sits above the body
        assert_eq!(c.get(610, 94), Some(HAT));

        w.player.body.on_ground = true;
        paint_scene(&mut c, &w);
        assert_eq!(c.get(602, 128), Some(PLAYER_GROUNDED));
    }

    #[test]
    fn collected_gems_and_defeated_enemies_disappear() {
        let mut w = world();
        let mut c = canvas();
        // Diamond at (520,480): centre (530,490)
        paint_scene(&mut c, &w);
        assert_eq!(c.get(530, 494), Some(DIAMOND));

        w.collectibles[1].collected = true;
        w.enemies[0].defeated = true;
        paint_scene(&mut c, &w);
        assert_ne!(c.get(530, 494), Some(DIAMOND));
        assert_ne!(c.get(360, 590), Some(GOOMBA));
        assert_eq!(c.get(760, 430), Some(GOOMBA));
    }

    #[test]
    fn bob_shifts_the_drawing_only() {
        let mut w = world();
        let mut c = canvas();
        w.collectibles[1].bob = 6.0;
        paint_scene(&mut c, &w);
        // Bottom tip moved from y 500 to 506
        assert_eq!(c.get(530, 503), Some(DIAMOND));
        assert_eq!(w.collectibles[1].rect(), Rect::new(520.0, 480.0, 20.0, 20.0));
    }

    #[test]
    fn particles_fade_with_life() {
        let mut c = Canvas::with_size(10, 10, 1.0, 1.0);
        let mut p = Particle::new(1.0, 1.0, 0.0, 0.0, Rgb::GOLD);
        paint_particle(&mut c, &p);
        assert_eq!(c.get(2, 2), Some(Rgb::GOLD));

        let mut c = Canvas::with_size(10, 10, 1.0, 1.0);
        p.life = p.max_life / 2;
        paint_particle(&mut c, &p);
        assert_eq!(c.get(2, 2), Some(Rgb::BLACK.lerp(Rgb::GOLD, 0.5)));
    }

    #[test]
    fn framebuffer_put_str_clips() {
        let mut fb = FrameBuffer::new(5, 1);
        fb.put_str(3, 0, "abc", Color::White, Color::Reset);
        assert_eq!(fb.get(3, 0).ch, 'a');
        assert_eq!(fb.get(4, 0).ch, 'b');
        assert_eq!(fb.get(4, 0).bg, Cell::BASE_BG);
    }
}
