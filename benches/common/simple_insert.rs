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

pub struct Benchmark;

impl Benchmark {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&mut self) -> Vec<Entity> {
        let mut entities = Vec::with_capacity(10_000);
        let mut builder = EntityBuilder::new();
        for _ in 0..10_000 {
            builder
                .set(Transform(Mat4::from_scale(Vec3::ONE)))
                .set(Position(Vec3::X))
                .set(Rotation(Vec3::X))
                .set(Velocity(Vec3::X))
                .spawn(&mut entities);
        }

        entities
    }
}
