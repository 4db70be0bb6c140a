//! ec2d headless demo.
//!
//! Builds a menu scene with a start button and a level scene with a ball
//! bouncing off the screen edges and breaking bricks, then runs a fixed
//! number of ticks with scripted input: the mouse clicks the start button,
//! the level replaces the menu, its music starts and the ball is launched at
//! a random angle. Row colours are shuffled and every broken brick plays a
//! sound effect.
//!
//! ```sh
//! cargo run -- --frames 600 --seed 7 --dump-draw-list
//! ```

use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};

use ec2d::color::Color;
use ec2d::components::boxcollider::BoxCollider2D;
use ec2d::components::circlecollider::CircleCollider2D;
use ec2d::components::textrenderer::Alignment;
use ec2d::components::velocity::Velocity;
use ec2d::core::entity::EntityId;
use ec2d::core::scene::Scene;
use ec2d::error::EngineResult;
use ec2d::factory::{add_button_text, create_button, load_circle_components, load_rectangle_components};
use ec2d::game::Game;
use ec2d::mathutils;
use ec2d::resources::gameconfig::GameConfig;
use ec2d::resources::graphicsassets::FontMetrics;
use ec2d::resources::input::InputSnapshot;
use ec2d::systems::collision::{CollisionSide, collision_side};

const MENU: &str = "menu";
const LEVEL: &str = "level";
const FONT: &str = "default";
const LEVEL_MUSIC: &str = "level_theme";
const BRICK_SOUND: &str = "brick_hit";
const BALL_RADIUS: u32 = 6;
const BALL_SPEED: f32 = 180.0;
const BRICK_SIZE: (u32, u32) = (48, 16);
const BRICK_COLUMNS: u32 = 8;
const BRICK_ROWS: u32 = 3;

/// Headless ec2d demo
#[derive(Parser)]
#[command(version, about = "Runs the ec2d demo scenes without a window.")]
struct Cli {
    /// INI configuration file; defaults are used when it is missing.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seed for the ball's launch angle.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the last frame's draw commands as JSON.
    #[arg(long)]
    dump_draw_list: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> EngineResult<()> {
    let config = load_config(cli.config.as_ref());
    if let Some(seed) = cli.seed {
        mathutils::seed(seed);
    }

    let mut game = Game::new(config);
    game.assets.register_font(FontMetrics::new(FONT, 8.0, 12.0));

    let start_clicked = Rc::new(Cell::new(false));
    let (menu, button_center) = build_menu(&mut game, start_clicked.clone())?;
    game.add_scene(menu)?;
    let (level, ball) = build_level(&mut game)?;
    game.add_scene(level)?;

    let click_at = game.display.viewport_to_window(button_center);
    let frame_time = game.config.frame_time();
    let mut bricks_broken = 0usize;

    for frame in 0..cli.frames {
        game.tick(frame_time, scripted_input(frame, click_at));

        if start_clicked.replace(false) {
            game.change_scene(LEVEL, true)?;
            game.audio.play_music(LEVEL_MUSIC, true);
        }
        if game.scenes.current_name() == Some(LEVEL) {
            let broken = resolve_level(&mut game, ball);
            for _ in 0..broken {
                game.audio.play_sound_effect(BRICK_SOUND);
            }
            bricks_broken += broken;
        }
    }

    info!(
        "ran {} frames ({:.2}s simulated), scene '{}', {bricks_broken} bricks broken, music {:?}",
        game.time.frame,
        game.time.elapsed,
        game.scenes.current_name().unwrap_or("none"),
        game.audio.music_state().status
    );

    if cli.dump_draw_list {
        match serde_json::to_string_pretty(game.render.commands()) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("cannot serialise draw list: {e}"),
        }
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> GameConfig {
    let mut config = match path {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using default configuration");
    }
    config
}

/// Mouse hovers the button on frame 0, presses on frame 1 and releases on
/// frame 2.
fn scripted_input(frame: u64, click_at: Vec2) -> InputSnapshot {
    match frame {
        0 | 2 => InputSnapshot::new().with_mouse(click_at, false),
        1 => InputSnapshot::new().with_mouse(click_at, true),
        _ => InputSnapshot::new(),
    }
}

fn build_menu(game: &mut Game, start_clicked: Rc<Cell<bool>>) -> EngineResult<(Scene, Vec2)> {
    let mut menu = Scene::new(MENU);
    let (w, h) = game.display.internal_resolution();
    let center = Vec2::new(w as f32, h as f32) * 0.5;

    let mut button = menu.create_entity();
    button.transform().set_local_position(center);
    create_button(
        &mut button,
        "start_button",
        Vec2::new(120.0, 32.0),
        true,
        Color::GRAY,
        &mut game.assets,
        Some(Box::new(move || start_clicked.set(true))),
    )?;
    let button = menu.add_entity(button)?;
    add_button_text(&mut menu, button, FONT, "Start", Color::BLACK, &game.assets, Alignment::Center)?;
    Ok((menu, center))
}

fn build_level(game: &mut Game) -> EngineResult<(Scene, EntityId)> {
    let mut level = Scene::new(LEVEL);
    let (w, _) = game.display.internal_resolution();

    let mut palette = [Color::RED, Color::YELLOW, Color::GREEN];
    mathutils::shuffle(&mut palette);
    let row_width = BRICK_COLUMNS * BRICK_SIZE.0;
    let left = (w.saturating_sub(row_width)) as f32 * 0.5;
    for row in 0..BRICK_ROWS {
        for column in 0..BRICK_COLUMNS {
            let mut brick = level.create_entity();
            brick.transform().set_local_position(Vec2::new(
                left + (column * BRICK_SIZE.0) as f32,
                32.0 + (row * BRICK_SIZE.1) as f32,
            ));
            let color = palette[row as usize % palette.len()];
            let name = format!("brick_{row}_{column}");
            load_rectangle_components(&mut brick, &name, BRICK_SIZE, Some(color), &mut game.assets, true)?;
            level.add_entity(brick)?;
        }
    }

    let (_, h) = game.display.internal_resolution();
    let mut ball = level.create_entity();
    let transform = ball.transform();
    transform.set_local_position(Vec2::new(w as f32 * 0.5, h as f32 - 40.0));
    load_circle_components(&mut ball, "ball", BALL_RADIUS, Color::WHITE, &mut game.assets, true)?;
    let launch = mathutils::random_float(45.0, 135.0);
    ball.add_component(Velocity::new(
        &transform,
        mathutils::velocity_from_degrees(launch, BALL_SPEED, true),
    ))?;
    let ball = level.add_entity(ball)?;
    Ok((level, ball))
}

/// Bounces the ball off the screen edges and the bricks it hits, removing
/// those bricks. Returns how many were removed.
fn resolve_level(game: &mut Game, ball: EntityId) -> usize {
    let (w, h) = game.display.internal_resolution();
    let collisions = game.collisions();
    let Some(scene) = game.scenes.current_mut() else {
        return 0;
    };

    let mut flip = Vec2::ONE;
    let mut hits: Vec<EntityId> = Vec::new();
    if let Some(ball_entity) = scene.entity(ball) {
        let (Some(circle), Some(velocity)) = (
            ball_entity.get_component::<CircleCollider2D>(),
            ball_entity.get_component::<Velocity>(),
        ) else {
            return 0;
        };
        let bounds = circle.bounds();
        let v = velocity.value;
        // Bounce only while heading out.
        if (bounds.center.x - bounds.radius < 0.0 && v.x < 0.0)
            || (bounds.center.x + bounds.radius > w as f32 && v.x > 0.0)
        {
            flip.x = -1.0;
        }
        if (bounds.center.y - bounds.radius < 0.0 && v.y < 0.0)
            || (bounds.center.y + bounds.radius > h as f32 && v.y > 0.0)
        {
            flip.y = -1.0;
        }
        for other in collisions.iter().filter_map(|c| c.other(ball)) {
            let Some(brick) = scene.entity(other).and_then(|e| e.get_component::<BoxCollider2D>()) else {
                continue;
            };
            match collision_side(brick, circle) {
                CollisionSide::Left | CollisionSide::Right => flip.x = -1.0,
                CollisionSide::Top | CollisionSide::Bottom => flip.y = -1.0,
                CollisionSide::None => continue,
            }
            hits.push(other);
        }
    }

    if let Some(velocity) = scene
        .entity_mut(ball)
        .and_then(|e| e.get_component_mut::<Velocity>())
    {
        velocity.value *= flip;
    }
    hits.into_iter()
        .filter(|brick| scene.remove_entity(*brick, true))
        .count()
}
