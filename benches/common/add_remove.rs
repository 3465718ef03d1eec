use bulwark::*;

struct A(f32);
struct B(f32);

component! { A, B }

pub struct Benchmark(Vec<Entity>);

impl Benchmark {
    pub fn new() -> Self {
        let entities = (0..10_000)
            .map(|_| Entity::builder().set(A(0.0)).build())
            .collect();

        Self(entities)
    }

    pub fn run(&mut self) {
        for entity in &mut self.0 {
            entity.add_component(B(0.0));
        }

        for entity in &mut self.0 {
            entity.remove_component::<B>();
        }
    }

    pub fn run_replace(&mut self) {
        for entity in &mut self.0 {
            entity.replace_component(B(0.0));
        }

        for entity in &mut self.0 {
            entity.remove_component::<B>();
        }
    }
}
