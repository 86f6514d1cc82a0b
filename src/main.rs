use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pixelgarden::config::RenderConfig;
use pixelgarden::export;
use pixelgarden::garden::{Badge, Garden, Plant, WaterOutcome};
use pixelgarden::plant::{generate_plant_pixels, plant_colors, Stage};
use pixelgarden::settings::Settings;
use pixelgarden::store::{FileStore, GardenStore};
use pixelgarden::view;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pixelgarden")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Seeded pixel-art plants: grow, water and bloom a garden in your terminal", long_about = None)]
struct Cli {
    /// Verbose logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the plant for a seed at a growth stage
    Render {
        /// Seed string (random if omitted)
        #[arg(short, long)]
        seed: Option<String>,

        /// Growth stage, 1 (seedling) to 5 (bloom)
        #[arg(short = 'S', long, default_value = "5", value_parser = clap::value_parser!(i64).range(1..=5))]
        stage: i64,

        /// Terminal cells per grid pixel
        #[arg(short = 'k', long)]
        scale: Option<u32>,

        /// Print to stdout (no interactive display)
        #[arg(short, long)]
        print: bool,

        /// Animate growth from stage 1 up to the target stage
        #[arg(short, long)]
        live: bool,

        /// Keep drawing new random plants
        #[arg(short, long)]
        infinite: bool,

        /// Seconds between stages in live mode
        #[arg(short, long, default_value = "0.6")]
        time: f32,

        /// Seconds between plants in infinite mode
        #[arg(short, long, default_value = "4.0")]
        wait: f64,

        /// Write a PNG instead of drawing
        #[arg(long)]
        png: Option<PathBuf>,

        /// Dump the pixel list as JSON instead of drawing
        #[arg(long)]
        json: bool,
    },

    /// Manage your garden
    Garden {
        /// Garden file (defaults to the settings value, then the data dir)
        #[arg(long)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        action: GardenAction,
    },
}

#[derive(Subcommand)]
enum GardenAction {
    /// List plants and the points balance
    List,

    /// Plant a new seed (first plant free)
    Plant {
        /// Name for the plant
        name: Option<String>,
    },

    /// Water a plant by id or name
    Water {
        plant: String,
    },

    /// Draw one of your plants
    Show {
        plant: String,

        /// Print to stdout (no interactive display)
        #[arg(short, long)]
        print: bool,
    },

    /// Credit points (routine, quiz, referral...)
    Earn {
        points: u32,

        #[arg(short, long, default_value = "manual")]
        reason: String,
    },

    /// Show badge milestones and which are unlocked
    Badges,

    /// Spend points on a reward
    Redeem {
        cost: u32,

        /// Reward name
        reward: String,
    },

    /// Show the points history, newest first
    History {
        /// Entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let settings = Settings::load();

    match cli.command {
        Commands::Render {
            seed,
            stage,
            scale,
            print,
            live,
            infinite,
            time,
            wait,
            png,
            json,
        } => {
            let stage = Stage::try_from(stage)?;
            if png.is_some() || json {
                let seed = seed.context("--seed is required with --png or --json")?;
                let pixels = generate_plant_pixels(&seed, stage)?;
                if let Some(path) = png {
                    let scale = scale.unwrap_or(settings.render.png_scale);
                    export::write_png(&pixels, scale, &path)?;
                    println!("Wrote {}", path.display());
                }
                if json {
                    println!("{}", export::to_json(&pixels)?);
                }
                return Ok(());
            }

            let config = RenderConfig {
                seed,
                stage,
                scale: scale.unwrap_or(settings.render.scale).min(4),
                live,
                infinite,
                print,
                time_step: time,
                time_wait: wait,
                background: settings.render.background.clone(),
                caption: None,
            };
            view::run(config)?;
        }
        Commands::Garden { file, action } => {
            let path = file.unwrap_or_else(|| settings.garden.store_path());
            let store = FileStore::new(path, settings.garden.starting_points);
            run_garden(&store, &settings, action)?;
        }
    }

    Ok(())
}

fn run_garden(store: &impl GardenStore, settings: &Settings, action: GardenAction) -> Result<()> {
    let mut garden = store.load()?;
    let costs = settings.garden.costs();
    let mut rng = rand::thread_rng();

    match action {
        GardenAction::List => print_garden(&garden),
        GardenAction::Plant { name } => {
            let name = name.unwrap_or_else(|| {
                format!("{} #{}", settings.garden.default_plant_name, garden.plants.len() + 1)
            });
            let plant = garden.plant(&name, costs, &mut rng)?;
            println!("Seed planted: {} (id {}, seed {})", plant.name, plant.id, plant.seed);
            store.save(&garden)?;
        }
        GardenAction::Water { plant } => {
            let outcome = garden.water(&plant, costs, &mut rng)?;
            match outcome {
                WaterOutcome::Watered { water_count, needed } => {
                    println!("Watered! {}/{} drops", water_count, needed)
                }
                WaterOutcome::Grew { stage } => println!("Your plant grew: {}", stage),
                WaterOutcome::Bloomed { coupon } => println!(
                    "Full bloom! Coupon {} ({}% off)",
                    coupon.code, coupon.percent_off
                ),
                WaterOutcome::AlreadyBloomed => println!("Already in full bloom"),
            }
            println!("Points left: {}", garden.points);
            store.save(&garden)?;
        }
        GardenAction::Show { plant, print } => {
            let plant = garden.find(&plant)?;
            let config = RenderConfig {
                seed: Some(plant.seed.clone()),
                stage: plant.stage,
                scale: settings.render.scale.min(4),
                print,
                background: settings.render.background.clone(),
                caption: Some(describe(plant)),
                ..RenderConfig::default()
            };
            view::run(config)?;
        }
        GardenAction::Earn { points, reason } => {
            for badge in garden.earn(points, &reason) {
                println!("Badge unlocked: {}", badge);
            }
            println!("Balance: {} points", garden.points);
            store.save(&garden)?;
        }
        GardenAction::Badges => {
            for badge in Badge::ALL {
                let mark = if garden.has_badge(badge) { "x" } else { " " };
                println!("[{}] {:<15} {:>5} points", mark, badge.to_string(), badge.threshold());
            }
            println!("Points: {}", garden.points);
        }
        GardenAction::Redeem { cost, reward } => {
            let left = garden.redeem(cost, &reward)?;
            println!("Redeemed {} for {} points. {} left", reward.trim(), cost, left);
            store.save(&garden)?;
        }
        GardenAction::History { limit } => {
            if garden.transactions.is_empty() {
                println!("No transactions yet.");
            }
            for tx in garden.transactions.iter().rev().take(limit) {
                println!("{}  {:>+6}  {}", tx.at.format("%Y-%m-%d %H:%M"), tx.amount, tx.reason);
            }
        }
    }

    Ok(())
}

fn print_garden(garden: &Garden) {
    println!("Points: {}", garden.points);
    if garden.plants.is_empty() {
        println!("No plants yet. Try `pixelgarden garden plant`.");
        return;
    }
    for plant in &garden.plants {
        println!("{:>3}  {}", plant.id, describe(plant));
    }
}

fn describe(plant: &Plant) -> String {
    let palette = plant_colors(&plant.seed)
        .map(|c| c.palette.name)
        .unwrap_or("?");
    let mut line = format!(
        "{}  {}  {}/{} drops  [{}]",
        plant.name, plant.stage, plant.water_count, plant.max_water_for_stage, palette
    );
    if let Some(coupon) = &plant.coupon {
        line.push_str(&format!("  coupon {} ({}% off)", coupon.code, coupon.percent_off));
    }
    line
}
