use std::iter::repeat_with;

use bulwark::*;
use glam::*;

struct Transform(Mat4);
struct Position(Vec3);
struct Rotation(Vec3);
struct Velocity(Vec3);

component! {
    Transform,
    Position,
    Rotation,
    Velocity,
}

pub struct Benchmark(Vec<Entity>);

impl Benchmark {
    pub fn new() -> Self {
        let entities = repeat_with(|| {
            Entity::builder()
                .set(Transform(Mat4::from_scale(Vec3::ONE)))
                .set(Position(Vec3::X))
                .set(Rotation(Vec3::X))
                .set(Velocity(Vec3::X))
                .build()
        })
        .take(10_000)
        .collect();

        Self(entities)
    }

    pub fn run(&mut self) {
        let query = EntityQuery::from(&self.0).with_components::<(Velocity, Mut<Position>)>();
        for item in query.iter().unwrap() {
            let (velocity, mut position) = item.components;
            position.0 += velocity.0;
        }
    }

    pub fn run_manual(&mut self) {
        for entity in &self.0 {
            if let (Some(velocity), Some(mut position)) = (
                entity.get_component::<Velocity>(),
                entity.get_component_mut::<Position>(),
            ) {
                position.0 += velocity.0;
            }
        }
    }
}
