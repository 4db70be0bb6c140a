//! End-to-end tests driving [`Game`] ticks with scripted input.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test game_tick_integration
//! ```

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use glam::Vec2;

use ec2d::color::Color;
use ec2d::components::button::Button;
use ec2d::components::spriterenderer::SpriteRenderer;
use ec2d::components::spritesheet::SpriteSheet;
use ec2d::core::scene::Scene;
use ec2d::error::EngineError;
use ec2d::factory::{ColliderKind, create_button, load_sprite_components, set_sprite_frame};
use ec2d::game::Game;
use ec2d::resources::display::{DisplayManager, calculate_letterbox};
use ec2d::resources::gameconfig::GameConfig;
use ec2d::resources::input::InputSnapshot;
use ec2d::resources::rendermanager::DrawCommand;
use ec2d::shapes::Rect;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_eq_rect(a: Rect, b: Rect) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.width, b.width) && approx_eq(a.height, b.height)
}

/// 640x360 game in a 1280x720 window: window coordinates are viewport x2.
fn game() -> Game {
    Game::new(GameConfig::new())
}

fn menu_with_button(game: &mut Game, clicks: Rc<Cell<u32>>) {
    let mut menu = Scene::new("menu");
    let mut button = menu.create_entity();
    button.transform().set_local_position(Vec2::new(100.0, 100.0));
    create_button(
        &mut button,
        "ok",
        Vec2::new(40.0, 20.0),
        false,
        Color::GRAY,
        &mut game.assets,
        Some(Box::new(move || clicks.set(clicks.get() + 1))),
    )
    .unwrap();
    menu.add_entity(button).unwrap();
    game.add_scene(menu).unwrap();
}

fn mouse(game: &Game, viewport: Vec2, down: bool) -> InputSnapshot {
    InputSnapshot::new().with_mouse(game.display.viewport_to_window(viewport), down)
}

// =============================================================================
// Full click
// =============================================================================

#[test]
fn button_fires_on_press_and_release_inside() {
    let clicks = Rc::new(Cell::new(0));
    let mut game = game();
    menu_with_button(&mut game, clicks.clone());
    let inside = Vec2::new(110.0, 110.0);

    game.tick(0.016, mouse(&game, inside, false));
    game.tick(0.016, mouse(&game, inside, true));
    assert_eq!(clicks.get(), 0);
    game.tick(0.016, mouse(&game, inside, false));
    assert_eq!(clicks.get(), 1);
    game.tick(0.016, mouse(&game, inside, false));
    assert_eq!(clicks.get(), 1);
}

#[test]
fn button_ignores_drag_in_or_out() {
    let clicks = Rc::new(Cell::new(0));
    let mut game = game();
    menu_with_button(&mut game, clicks.clone());
    let inside = Vec2::new(110.0, 110.0);
    let outside = Vec2::new(300.0, 300.0);

    game.tick(0.016, mouse(&game, outside, false));
    game.tick(0.016, mouse(&game, outside, true));
    game.tick(0.016, mouse(&game, inside, false));
    assert_eq!(clicks.get(), 0);

    game.tick(0.016, mouse(&game, inside, true));
    game.tick(0.016, mouse(&game, outside, false));
    assert_eq!(clicks.get(), 0);
}

#[test]
fn button_without_collider_never_fires() {
    let mut game = game();
    let mut scene = Scene::new("menu");
    let mut entity = scene.create_entity();
    let button = Button::new(&entity);
    entity.add_component(button).unwrap();
    let id = scene.add_entity(entity).unwrap();
    game.add_scene(scene).unwrap();

    let anywhere = Vec2::new(5.0, 5.0);
    game.tick(0.016, mouse(&game, anywhere, true));
    game.tick(0.016, mouse(&game, anywhere, false));
    let entity = game.current_scene().unwrap().entity(id).unwrap();
    assert_eq!(entity.get_component::<Button>().unwrap().click_count(), 0);
}

// =============================================================================
// Sprite sheets
// =============================================================================

#[test]
fn sprite_frame_changes_draw_source() {
    let mut game = game();
    game.assets.register_sprite("hero", 96, 32);
    let mut scene = Scene::new("level");
    let mut hero = scene.create_entity();
    load_sprite_components(&mut hero, "hero", &game.assets, ColliderKind::Rectangle, (32, 32), 0).unwrap();
    let id = scene.add_entity(hero).unwrap();
    game.add_scene(scene).unwrap();

    game.tick(0.016, InputSnapshot::new());
    match &game.render.commands()[0] {
        DrawCommand::Texture { texture, source, .. } => {
            assert_eq!(texture, "hero");
            assert_eq!(*source, Some(Rect::new(0.0, 0.0, 32.0, 32.0)));
        }
        other => panic!("unexpected command {other:?}"),
    }

    let hero = game.current_scene_mut().unwrap().entity_mut(id).unwrap();
    set_sprite_frame(hero, 2).unwrap();
    assert_eq!(
        set_sprite_frame(hero, 3),
        Err(EngineError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(hero.get_component::<SpriteSheet>().unwrap().grid_index(), 2);

    game.tick(0.016, InputSnapshot::new());
    match &game.render.commands()[0] {
        DrawCommand::Texture { source, .. } => {
            assert_eq!(*source, Some(Rect::new(64.0, 0.0, 32.0, 32.0)));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn sprite_sheet_requires_sprite_renderer() {
    let scene = Scene::new("level");
    let entity = scene.create_entity();
    assert!(!entity.has_component::<SpriteRenderer>());
    assert!(matches!(
        SpriteSheet::new(&entity, (16, 16)),
        Err(EngineError::MissingRequiredComponent { .. })
    ));
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn letterbox_for_wider_window() {
    let viewport = calculate_letterbox((640, 360), (1000, 360));
    assert!(approx_eq_rect(viewport, Rect::new(180.0, 0.0, 640.0, 360.0)));
}

#[test]
fn letterbox_for_taller_window() {
    let viewport = calculate_letterbox((640, 360), (640, 600));
    assert!(approx_eq_rect(viewport, Rect::new(0.0, 120.0, 640.0, 360.0)));
}

#[test]
fn mouse_in_black_bars_is_off_screen() {
    let mut display = DisplayManager::new(1000, 360);
    display.set_internal_resolution(640, 360);
    let mut game = game();
    game.display = display;
    game.tick(0.016, InputSnapshot::new().with_mouse(Vec2::new(90.0, 100.0), false));
    assert!(!game.input.mouse_on_screen());
    game.tick(0.016, InputSnapshot::new().with_mouse(Vec2::new(500.0, 100.0), false));
    assert!(game.input.mouse_on_screen());
    assert!(approx_eq(game.input.mouse_position().x, 320.0));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn config_file_drives_display() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[display]\ninternal_width = 320\ninternal_height = 180\n\n[window]\nwidth = 960\nheight = 540"
    )
    .unwrap();

    let mut config = GameConfig::with_path(file.path());
    config.load_from_file().unwrap();
    let game = Game::new(config);
    assert_eq!(game.display.internal_resolution(), (320, 180));
    assert_eq!(game.display.window_size(), (960, 540));
    assert!(approx_eq_rect(game.display.viewport(), Rect::new(0.0, 0.0, 960.0, 540.0)));
}
