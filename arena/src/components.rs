use bulwark::{component, Entity, EntityBuilder, EntityId};
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec3);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub hp: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { hp: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Player,
    Enemy,
}

/// The structure the player defends
#[derive(Debug, Clone, Copy)]
pub struct Core;

#[derive(Debug, Clone, Copy)]
pub struct Tower {
    pub range: f32,
    pub damage: f32,
    /// Seconds between attacks
    pub rate: f32,
    /// Stun duration applied on hit
    pub stun: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AttackCooldown(pub f32);

/// What a tower is currently aiming at
#[derive(Debug, Clone, Copy, Default)]
pub struct Target(pub Option<EntityId>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stun {
    pub remaining: f32,
}

/// Currency awarded when the entity is killed
#[derive(Debug, Clone, Copy)]
pub struct Bounty(pub u32);

component! {
    Position,
    Velocity,
    Health,
    Team,
    Core,
    Tower,
    AttackCooldown,
    Target,
    Stun,
    Bounty,
}

pub const CORE_RADIUS: f32 = 1.5;
const CORE_HEALTH: f32 = 250.0;

pub fn create_core() -> EntityBuilder {
    Entity::builder()
        .set(Core)
        .set(Team::Player)
        .set(Position(Vec3::ZERO))
        .set(Health::new(CORE_HEALTH))
        .into()
}

pub fn create_tower(position: Vec3, stun: f32) -> EntityBuilder {
    Entity::builder()
        .set(Team::Player)
        .set(Position(position))
        .set(Tower {
            range: 6.0,
            damage: 8.0,
            rate: 0.5,
            stun,
        })
        .set_default::<AttackCooldown>()
        .set_default::<Target>()
        .into()
}

pub fn create_enemy(position: Vec3, speed: f32, hp: f32, bounty: u32) -> EntityBuilder {
    Entity::builder()
        .set(Team::Enemy)
        .set(Position(position))
        .set(Velocity(-position.normalize_or_zero() * speed))
        .set(Health::new(hp))
        .set(Bounty(bounty))
        .into()
}
