use bulwark::*;

struct Health {
    hp: f32,
    max: f32,
}

#[derive(PartialEq)]
enum Team {
    Player,
    Enemy,
}

struct Armor(f32);

component! {
    Health,
    Team,
    Armor,
}

pub struct Benchmark(Vec<Entity>);

impl Benchmark {
    pub fn new() -> Self {
        let entities = (0..10_000)
            .map(|i| {
                let mut builder = Entity::builder();
                builder
                    .set(Health {
                        hp: (i % 100) as f32,
                        max: 100.0,
                    })
                    .set(if i % 4 == 0 { Team::Player } else { Team::Enemy });

                // Fragment the component lists
                if i % 3 == 0 {
                    builder.set(Armor(1.0));
                }

                builder.build()
            })
            .collect();

        Self(entities)
    }

    pub fn run(&mut self) -> usize {
        EntityQuery::from(&self.0)
            .with_components::<(Health, Team)>()
            .filter(|item| {
                *item.components.1 == Team::Enemy && item.components.0.hp < item.components.0.max
            })
            .execute_count()
            .unwrap()
    }

    pub fn run_unfiltered(&mut self) -> usize {
        EntityQuery::from(&self.0)
            .with_components::<(Health, Armor)>()
            .execute_count()
            .unwrap()
    }

    pub fn run_collect(&mut self) -> usize {
        EntityQuery::from(&self.0)
            .with_components::<(Team, Opt<Armor>)>()
            .filter(|item| *item.components.0 == Team::Player)
            .execute()
            .unwrap()
            .len()
    }
}
