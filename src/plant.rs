//! Seeded procedural plant renderer
//!
//! A plant is drawn onto a 32x32 grid as an ordered list of pixels. Later
//! pixels cover earlier ones at the same coordinate. Every random decision
//! comes from a fresh [`SeededRng`] built from the plant's seed, so a given
//! (seed, stage) pair always produces the same list.

use crate::error::{GardenError, Result};
use crate::palette::{Palette, FLOWER_CENTER, FLOWER_COLORS, PALETTES, POT_RIM};
use crate::rng::SeededRng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const GRID_SIZE: i32 = 32;

const CENTER_X: i32 = 16;
const GROUND_Y: i32 = 28;
const POT_WIDTH: i32 = 10;
const POT_HEIGHT: i32 = 6;
/// First stem row sits just above the pot rim
const STEM_BASE_Y: i32 = GROUND_Y - 7;

/// Growth stage of a plant, 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum Stage {
    Seedling = 1,
    Sprout = 2,
    Sapling = 3,
    Budding = 4,
    Bloom = 5,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Seedling,
        Stage::Sprout,
        Stage::Sapling,
        Stage::Budding,
        Stage::Bloom,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    /// The following stage, or `None` once in bloom
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Seedling => Some(Stage::Sprout),
            Stage::Sprout => Some(Stage::Sapling),
            Stage::Sapling => Some(Stage::Budding),
            Stage::Budding => Some(Stage::Bloom),
            Stage::Bloom => None,
        }
    }

    pub fn is_bloom(self) -> bool {
        self == Stage::Bloom
    }

    /// Stem rows drawn at this stage for a plant whose full height is `max_height`
    fn stem_height(self, max_height: i32) -> i32 {
        match self {
            Stage::Seedling => 0,
            Stage::Sprout => (max_height as f64 * 0.4).floor() as i32,
            Stage::Sapling => (max_height as f64 * 0.7).floor() as i32,
            Stage::Budding | Stage::Bloom => max_height,
        }
    }
}

impl TryFrom<i64> for Stage {
    type Error = GardenError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Stage::Seedling),
            2 => Ok(Stage::Sprout),
            3 => Ok(Stage::Sapling),
            4 => Ok(Stage::Budding),
            5 => Ok(Stage::Bloom),
            _ => Err(GardenError::InvalidArgument(format!(
                "stage must be between 1 and 5, got {}",
                value
            ))),
        }
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> u8 {
        stage.number()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Seedling => "seedling",
            Stage::Sprout => "sprout",
            Stage::Sapling => "sapling",
            Stage::Budding => "budding",
            Stage::Bloom => "bloom",
        };
        write!(f, "{} ({}/5)", name, self.number())
    }
}

/// One cell of the drawing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
    pub color: String,
}

/// Colours fixed once per seed, before anything is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantColors {
    pub palette: Palette,
    pub primary_flower: &'static str,
    pub secondary_flower: &'static str,
}

impl PlantColors {
    fn draw(rng: &mut SeededRng) -> Result<Self> {
        let palette = *rng.pick(&PALETTES)?;
        let primary_flower = *rng.pick(&FLOWER_COLORS)?;
        let secondary_flower = *rng.pick(&FLOWER_COLORS)?;
        Ok(Self {
            palette,
            primary_flower,
            secondary_flower,
        })
    }
}

/// Colours a seed will use, without drawing anything
pub fn plant_colors(seed: &str) -> Result<PlantColors> {
    PlantColors::draw(&mut SeededRng::new(seed))
}

/// Render the plant for `seed` at `stage`
pub fn generate_plant_pixels(seed: &str, stage: Stage) -> Result<Vec<Pixel>> {
    let mut sketch = Sketch::new(seed)?;
    sketch.draw_pot();

    if stage == Stage::Seedling {
        sketch.draw_sprout();
    } else {
        let top_y = sketch.grow_stem(stage);
        match stage {
            Stage::Budding => sketch.draw_flower(CENTER_X, top_y),
            Stage::Bloom => sketch.draw_canopy(top_y),
            _ => {}
        }
    }

    tracing::debug!(seed, stage = stage.number(), pixels = sketch.pixels.len(), "plant rendered");
    Ok(sketch.pixels)
}

/// Same as [`generate_plant_pixels`] for an unchecked stage number.
/// Numbers outside 1..=5 are rejected, never clamped.
pub fn generate_for_stage_number(seed: &str, stage: i64) -> Result<Vec<Pixel>> {
    generate_plant_pixels(seed, Stage::try_from(stage)?)
}

#[derive(Clone, Copy)]
enum Part {
    Petal,
    Center,
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowerShape {
    Daisy,
    Tulip,
    Rose,
}

impl FlowerShape {
    fn from_roll(roll: i32) -> Self {
        match roll {
            0 => FlowerShape::Daisy,
            1 => FlowerShape::Tulip,
            _ => FlowerShape::Rose,
        }
    }

    /// Offsets from the flower centre, in draw order
    fn glyph(self) -> &'static [(i32, i32, Part)] {
        use Part::*;
        match self {
            //   P
            // P C P
            //   P
            FlowerShape::Daisy => &[(0, -1, Petal), (0, 1, Petal), (-1, 0, Petal), (1, 0, Petal), (0, 0, Center)],
            // P . P
            // P P P
            // . S .
            FlowerShape::Tulip => &[(-1, -1, Petal), (1, -1, Petal), (-1, 0, Petal), (0, 0, Petal), (1, 0, Petal), (0, 1, Base)],
            // . P P
            // P C P
            // . P .
            FlowerShape::Rose => &[(0, -1, Petal), (1, -1, Petal), (-1, 0, Petal), (0, 0, Center), (1, 0, Petal), (0, 1, Petal)],
        }
    }
}

/// Drawing state for one render call
struct Sketch {
    rng: SeededRng,
    colors: PlantColors,
    pixels: Vec<Pixel>,
}

impl Sketch {
    fn new(seed: &str) -> Result<Self> {
        let mut rng = SeededRng::new(seed);
        let colors = PlantColors::draw(&mut rng)?;
        Ok(Self {
            rng,
            colors,
            pixels: Vec::with_capacity(256),
        })
    }

    /// Off-grid coordinates are dropped
    fn put(&mut self, x: i32, y: i32, color: &str) {
        if (0..GRID_SIZE).contains(&x) && (0..GRID_SIZE).contains(&y) {
            self.pixels.push(Pixel {
                x,
                y,
                color: color.to_string(),
            });
        }
    }

    fn draw_pot(&mut self) {
        let pot = self.colors.palette.pot;
        let rim_y = GROUND_Y - POT_HEIGHT;
        for y in rim_y..=GROUND_Y {
            for x in (CENTER_X - POT_WIDTH / 2 + 1)..(CENTER_X + POT_WIDTH / 2 - 1) {
                self.put(x, y, pot);
            }
        }
        for x in (CENTER_X - POT_WIDTH / 2)..(CENTER_X + POT_WIDTH / 2) {
            self.put(x, rim_y, POT_RIM);
        }
    }

    fn draw_sprout(&mut self) {
        let Palette { stem, leaf, .. } = self.colors.palette;
        self.put(CENTER_X, STEM_BASE_Y, stem);
        self.put(CENTER_X, STEM_BASE_Y - 1, stem);
        self.put(CENTER_X - 1, STEM_BASE_Y - 2, leaf);
        self.put(CENTER_X + 1, STEM_BASE_Y - 2, leaf);
    }

    /// Draws the main stem with its branches and returns the row above the top
    fn grow_stem(&mut self, stage: Stage) -> i32 {
        let max_height = self.rng.range(12, 22);
        let height = stage.stem_height(max_height);
        let stem = self.colors.palette.stem;

        for i in 0..height {
            let y = STEM_BASE_Y - i;
            // sin(i/2) floors to -1 or 0, so the wiggle is a one-pixel lean
            let lean = self.rng.range(0, 1) as f64;
            let wiggle = ((i as f64 * 0.5).sin() * lean).floor() as i32;
            let x = CENTER_X + wiggle;

            self.put(x, y, stem);
            if i < 5 {
                self.put(x + 1, y, stem);
            }

            if stage >= Stage::Sapling && i > 3 && i % 4 == 0 && self.rng.chance(0.7) {
                self.draw_branch(x, y, stage);
            }
        }

        STEM_BASE_Y - height
    }

    fn draw_branch(&mut self, x: i32, y: i32, stage: Stage) {
        let Palette { stem, leaf, .. } = self.colors.palette;
        let dir = if self.rng.chance(0.5) { -1 } else { 1 };
        let length = self.rng.range(3, 6);

        for b in 1..=length {
            let bx = x + b * dir;
            let by = y - b;
            self.put(bx, by, stem);

            if stage >= Stage::Budding && b == length {
                self.put(bx, by - 1, leaf);
                self.put(bx + dir, by, leaf);
                self.put(bx - dir, by, leaf);

                // Bloom gets its flowers from the canopy instead
                if stage == Stage::Budding && self.rng.chance(0.1) {
                    let primary = self.colors.primary_flower;
                    self.put(bx, by - 2, primary);
                }
            }
        }
    }

    fn draw_flower(&mut self, x: i32, y: i32) {
        let petal = if self.rng.chance(0.7) {
            self.colors.primary_flower
        } else {
            self.colors.secondary_flower
        };
        let shape = FlowerShape::from_roll(self.rng.range(0, 2));
        let stem = self.colors.palette.stem;

        for &(dx, dy, part) in shape.glyph() {
            let color = match part {
                Part::Petal => petal,
                Part::Center => FLOWER_CENTER,
                Part::Base => stem,
            };
            self.put(x + dx, y + dy, color);
        }
    }

    /// Dense disc of leaves and flowers around the stem top, then a crown
    fn draw_canopy(&mut self, top_y: i32) {
        let leaf = self.colors.palette.leaf;
        let radius = self.rng.range(7, 10);

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let px = CENTER_X + dx;
                let py = top_y + dy;
                // Independent draws: a cell can get both a leaf and a flower
                if self.rng.chance(0.8) {
                    self.put(px, py, leaf);
                }
                if self.rng.chance(0.35) {
                    self.draw_flower(px, py);
                }
            }
        }

        self.draw_flower(CENTER_X, top_y - radius);
        self.draw_flower(CENTER_X - 2, top_y - radius + 1);
        self.draw_flower(CENTER_X + 2, top_y - radius + 1);
    }
}

/// A 32x32 grid folded from a pixel list, last write wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantCanvas {
    cells: Vec<Option<String>>,
}

impl PlantCanvas {
    pub fn from_pixels(pixels: &[Pixel]) -> Self {
        let mut cells = vec![None; (GRID_SIZE * GRID_SIZE) as usize];
        for p in pixels {
            if let Some(idx) = Self::index(p.x, p.y) {
                cells[idx] = Some(p.color.clone());
            }
        }
        Self { cells }
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        if (0..GRID_SIZE).contains(&x) && (0..GRID_SIZE).contains(&y) {
            Some((y * GRID_SIZE + x) as usize)
        } else {
            None
        }
    }

    /// Colour at a coordinate, `None` if empty or off-grid
    pub fn get(&self, x: i32, y: i32) -> Option<&str> {
        Self::index(x, y).and_then(|i| self.cells[i].as_deref())
    }

    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Smallest y holding any colour
    pub fn top_row(&self) -> Option<i32> {
        (0..GRID_SIZE).find(|&y| (0..GRID_SIZE).any(|x| self.get(x, y).is_some()))
    }
}
