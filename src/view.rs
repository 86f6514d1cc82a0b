//! Drawing plants in the terminal.
//!
//! Two grid pixels share one terminal cell: the upper pixel is the glyph's
//! foreground (`▀`) and the lower one its background.

use crate::config::RenderConfig;
use crate::error::Result;
use crate::garden;
use crate::palette::term_color;
use crate::plant::{generate_plant_pixels, PlantCanvas, Stage, GRID_SIZE};
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use crossterm::style::Color;
use std::collections::HashMap;

const UPPER_HALF: char = '▀';
const LOWER_HALF: char = '▄';

/// Terminal cells needed for a plant at `scale`
pub fn plant_cells(scale: u32) -> (u16, u16) {
    let scale = scale.max(1) as u16;
    (GRID_SIZE as u16 * scale, GRID_SIZE as u16 / 2 * scale)
}

/// Draw a folded canvas with its top-left corner at (`left`, `top`)
pub fn draw_plant(
    term: &mut Terminal,
    canvas: &PlantCanvas,
    left: i32,
    top: i32,
    scale: u32,
    background: Option<Color>,
) -> Result<()> {
    let scale = scale.max(1) as i32;
    let (cols, rows) = plant_cells(scale as u32);
    let mut colors: HashMap<&str, Color> = HashMap::new();
    let mut lookup = |x: i32, y: i32| -> Result<Option<Color>> {
        match canvas.get(x, y) {
            Some(hex) => {
                if let Some(c) = colors.get(hex) {
                    return Ok(Some(*c));
                }
                let c = term_color(hex)?;
                colors.insert(hex, c);
                Ok(Some(c))
            }
            None => Ok(None),
        }
    };

    for row in 0..rows as i32 {
        for col in 0..cols as i32 {
            let x = col / scale;
            let upper = lookup(x, (row * 2) / scale)?;
            let lower = lookup(x, (row * 2 + 1) / scale)?;
            let (ch, fg, bg) = match (upper, lower) {
                (Some(u), Some(l)) => (UPPER_HALF, Some(u), Some(l)),
                (Some(u), None) => (UPPER_HALF, Some(u), background),
                (None, Some(l)) => (LOWER_HALF, Some(l), background),
                (None, None) => (' ', None, background),
            };
            term.set(left + col, top + row, ch, fg, bg);
        }
    }
    Ok(())
}

/// Render the plant described by `config`
pub fn run(config: RenderConfig) -> anyhow::Result<()> {
    let seed = config.seed.clone().unwrap_or_else(random_seed);

    if config.print {
        run_print_mode(&config, &seed)
    } else {
        run_interactive(&config, seed)
    }
}

fn background(config: &RenderConfig) -> Result<Option<Color>> {
    config.background.as_deref().map(term_color).transpose()
}

fn run_print_mode(config: &RenderConfig, seed: &str) -> anyhow::Result<()> {
    let (cols, rows) = plant_cells(config.scale);
    let caption_rows = if config.caption.is_some() { 1 } else { 0 };
    let mut term = Terminal::offscreen(cols, rows + caption_rows);

    let canvas = PlantCanvas::from_pixels(&generate_plant_pixels(seed, config.stage)?);
    draw_plant(&mut term, &canvas, 0, 0, config.scale, background(config)?)?;
    if let Some(caption) = &config.caption {
        term.set_str(0, rows as i32, caption, None);
    }

    term.print_to_stdout()?;
    Ok(())
}

fn run_interactive(config: &RenderConfig, initial_seed: String) -> anyhow::Result<()> {
    let mut seed = initial_seed;
    let bg = background(config)?;

    loop {
        let mut term = Terminal::new(true)?;
        term.clear_screen()?;

        let (width, height) = term.size();
        let (cols, rows) = plant_cells(config.scale);
        let left = (width as i32 - cols as i32) / 2;
        let top = (height as i32 - rows as i32 - 2).max(0) / 2;

        // Live mode walks every stage up to the target
        let stages: Vec<Stage> = if config.live {
            Stage::ALL.iter().copied().filter(|s| *s <= config.stage).collect()
        } else {
            vec![config.stage]
        };

        for stage in stages {
            let canvas = PlantCanvas::from_pixels(&generate_plant_pixels(&seed, stage)?);
            term.clear();
            draw_plant(&mut term, &canvas, left, top, config.scale, bg)?;
            let caption = config
                .caption
                .clone()
                .unwrap_or_else(|| format!("{}  seed {}", stage, seed));
            let caption_x = (width as i32 - caption.chars().count() as i32) / 2;
            term.set_str(caption_x, top + rows as i32 + 1, &caption, Some(Color::Grey));
            term.render()?;

            if config.live && stage < config.stage {
                let step_ms = (config.time_step * 1000.0) as u64;
                if quit_requested(term.wait_key(step_ms)?) {
                    return Ok(());
                }
            }
        }

        if !config.infinite {
            // Wait for keypress to exit
            loop {
                if quit_requested(term.wait_key(100)?) {
                    return Ok(());
                }
            }
        }

        let wait_ms = (config.time_wait * 1000.0) as u64;
        if quit_requested(term.wait_key(wait_ms)?) {
            return Ok(());
        }
        seed = random_seed();
        tracing::debug!(%seed, "next plant");
    }
}

fn quit_requested(key: Option<KeyCode>) -> bool {
    matches!(key, Some(KeyCode::Char('q')) | Some(KeyCode::Esc))
}

fn random_seed() -> String {
    garden::random_seed(&mut rand::thread_rng())
}
