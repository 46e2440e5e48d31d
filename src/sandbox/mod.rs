//! A small arena to run the simulation in: terrain covering every surface
//! kind, the player avatar, a few mobbs and the navmesh they path on.

mod camera;
mod ledge_climb;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::config::{ARCHETYPES_PATH, Archetypes, load_archetypes};
use crate::gameplay::combat::{SPEAR_LENGTH, Spear};
use crate::gameplay::registry::UnitRegistry;
use crate::gameplay::spawn::{spawn_mobb, spawn_player};
use crate::third_party::{CollisionLayer, NavObstacle, navmesh_bundle};

// === Constants ===

/// Half the arena width in world units.
pub const ARENA_HALF_WIDTH: f32 = 40.0;

/// Arena height in world units.
pub const ARENA_HEIGHT: f32 = 24.0;

const PLAYER_SPAWN: Vec2 = Vec2::new(-30.0, 0.0);

const MOBB_SPAWNS: [f32; 3] = [20.0, 28.0, 35.0];

/// Navmesh obstacle inflation; roughly half a body width.
const NAV_AGENT_RADIUS: f32 = 0.3;

const GROUND_COLOR: Color = Color::srgb(0.35, 0.3, 0.25);
const CLIMBABLE_COLOR: Color = Color::srgb(0.45, 0.4, 0.3);
const ONE_WAY_COLOR: Color = Color::srgb(0.6, 0.5, 0.3);
const LADDER_COLOR: Color = Color::srgba(0.7, 0.55, 0.2, 0.6);
const SPEAR_COLOR: Color = Color::srgb(0.85, 0.85, 0.8);

// === Terrain ===

/// One static piece of arena geometry, given its bottom-left corner.
#[derive(Debug, Clone, Copy)]
struct Piece {
    layer: CollisionLayer,
    min: Vec2,
    size: Vec2,
}

impl Piece {
    const fn new(layer: CollisionLayer, min: Vec2, size: Vec2) -> Self {
        Self { layer, min, size }
    }

    fn color(self) -> Color {
        match self.layer {
            CollisionLayer::Climbable => CLIMBABLE_COLOR,
            CollisionLayer::OneWay => ONE_WAY_COLOR,
            CollisionLayer::Ladder => LADDER_COLOR,
            _ => GROUND_COLOR,
        }
    }

    /// Solid pieces are carved out of the navmesh.
    const fn blocks_paths(self) -> bool {
        matches!(self.layer, CollisionLayer::Ground | CollisionLayer::Climbable)
    }
}

/// Floor, both walls, a ledge to mantle, a ladder and a one-way platform.
/// The stretch between the player and the mobbs is flat and open.
#[must_use]
fn arena_pieces() -> [Piece; 6] {
    let w = ARENA_HALF_WIDTH;
    let h = ARENA_HEIGHT;
    [
        Piece::new(
            CollisionLayer::Ground,
            Vec2::new(-w, -1.0),
            Vec2::new(2.0 * w, 1.0),
        ),
        Piece::new(
            CollisionLayer::Climbable,
            Vec2::new(-w - 1.0, 0.0),
            Vec2::new(1.0, h),
        ),
        Piece::new(CollisionLayer::Climbable, Vec2::new(w, 0.0), Vec2::new(1.0, h)),
        Piece::new(
            CollisionLayer::Climbable,
            Vec2::new(-38.0, 0.0),
            Vec2::new(4.0, 3.0),
        ),
        Piece::new(
            CollisionLayer::Ladder,
            Vec2::new(-20.0, 0.0),
            Vec2::new(1.0, 8.0),
        ),
        Piece::new(
            CollisionLayer::OneWay,
            Vec2::new(-19.0, 7.5),
            Vec2::new(8.0, 0.5),
        ),
    ]
}

fn spawn_piece(commands: &mut Commands, piece: Piece) {
    let center = piece.min + piece.size / 2.0;
    let mut entity = commands.spawn((
        Name::new(format!("{:?}", piece.layer)),
        RigidBody::Static,
        Collider::rectangle(piece.size.x, piece.size.y),
        CollisionLayers::new(piece.layer, [CollisionLayer::Unit, CollisionLayer::Spear]),
        Sprite::from_color(piece.color(), piece.size),
        Transform::from_translation(center.extend(-1.0)),
    ));
    if matches!(piece.layer, CollisionLayer::Ladder) {
        entity.insert(Sensor);
    }
    if piece.blocks_paths() {
        entity.insert(NavObstacle);
    }
}

// === Systems ===

/// Reads unit tuning from disk, keeping the defaults if the file is
/// missing or rejected.
fn load_tuning(mut commands: Commands) {
    match load_archetypes(ARCHETYPES_PATH) {
        Ok(archetypes) => {
            info!("Loaded archetypes from {ARCHETYPES_PATH}");
            commands.insert_resource(archetypes);
        }
        Err(error) => warn!("Using default archetypes: {error}"),
    }
}

fn spawn_arena(mut commands: Commands) {
    for piece in arena_pieces() {
        spawn_piece(&mut commands, piece);
    }
    let bounds = Rect::new(-ARENA_HALF_WIDTH, 0.0, ARENA_HALF_WIDTH, ARENA_HEIGHT);
    commands.spawn(navmesh_bundle(bounds, NAV_AGENT_RADIUS));
}

fn spawn_units(
    mut commands: Commands,
    archetypes: Res<Archetypes>,
    mut registry: ResMut<UnitRegistry>,
) {
    let player = spawn_player(&mut commands, &archetypes.player, PLAYER_SPAWN, &mut registry);
    for x in MOBB_SPAWNS {
        spawn_mobb(
            &mut commands,
            &archetypes.mobb,
            Vec2::new(x, 0.0),
            Some(player),
            &mut registry,
        );
    }
    info!("Sandbox ready: 1 player, {} mobbs", MOBB_SPAWNS.len());
}

/// Gives new spears something to look at.
fn dress_spears(mut commands: Commands, spears: Query<Entity, Added<Spear>>) {
    for spear in &spears {
        commands.entity(spear).insert(Sprite::from_color(
            SPEAR_COLOR,
            Vec2::new(SPEAR_LENGTH, 0.1),
        ));
    }
}

/// Arena, units and presentation glue for the binary.
#[derive(Debug)]
pub struct SandboxPlugin;

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Archetypes>();
        app.add_systems(
            Startup,
            (load_tuning, camera::setup_camera, spawn_arena, spawn_units).chain(),
        );
        app.add_systems(Update, (dress_spears, camera::follow_player));
        ledge_climb::plugin(app);
    }
}
