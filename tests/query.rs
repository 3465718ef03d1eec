use bulwark::{component, Entity, EntityId, EntityQuery, Error, Mut, Opt};
use glam::{vec3, Vec3};
use itertools::Itertools;
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
struct Health {
    hp: f32,
    max: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Team {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position(Vec3);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity(Vec3);

#[derive(Debug, PartialEq)]
struct Stun {
    remaining: f32,
}

component! {
    Health,
    Team,
    Position,
    Velocity,
    Stun,
}

fn health(hp: f32) -> Health {
    Health { hp, max: 100.0 }
}

fn ids<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Vec<EntityId> {
    entities.into_iter().map(Entity::id).collect_vec()
}

fn arena() -> Vec<Entity> {
    vec![
        Entity::builder()
            .set(health(100.0))
            .set(Team::Player)
            .set(Position(Vec3::ZERO))
            .build(),
        Entity::builder()
            .set(Position(vec3(4.0, 0.0, 0.0)))
            .set(Velocity(vec3(-1.0, 0.0, 0.0)))
            .set(health(30.0))
            .set(Team::Enemy)
            .build(),
        Entity::builder()
            .set(Position(vec3(0.0, 0.0, 6.0)))
            .set(Team::Enemy)
            .build(),
        Entity::builder()
            .set(Team::Enemy)
            .set(health(80.0))
            .set(Velocity(vec3(0.0, 0.0, -2.0)))
            .set(Position(vec3(0.0, 0.0, 9.0)))
            .build(),
        Entity::builder().set(Stun { remaining: 1.0 }).build(),
    ]
}

#[test]
fn conjunction() {
    let entities = arena();
    let query = EntityQuery::from(&entities);

    let movers = query
        .with_components::<(Position, Velocity)>()
        .execute_entities()
        .unwrap();
    assert_eq!(ids(movers), ids([&entities[1], &entities[3]]));

    let combatants = query
        .with_components::<(Health, Team)>()
        .execute_entities()
        .unwrap();
    assert_eq!(ids(combatants), ids([&entities[0], &entities[1], &entities[3]]));

    // Order of the snapshot is preserved, whatever it is
    let mut shuffled = arena();
    shuffled.reverse();
    let expected = shuffled
        .iter()
        .filter(|v| v.has_component::<Health>() && v.has_component::<Team>())
        .map(Entity::id)
        .collect_vec();

    assert_eq!(expected.len(), 3);
    assert_eq!(
        ids(EntityQuery::from(&shuffled)
            .with_components::<(Health, Team)>()
            .execute_entities()
            .unwrap()),
        expected
    );

    assert_eq!(
        query
            .with_components::<(Stun, Health)>()
            .execute_count()
            .unwrap(),
        0
    );
    assert_eq!(query.with_components::<Team>().execute_count().unwrap(), 4);
}

#[test]
fn last_filter_wins() {
    let entities = arena();
    let query = EntityQuery::from(&entities).with_components::<(Health, Team)>();

    let low = query.filter(|item| item.components.0.hp < 50.0);
    let enemies = low.filter(|item| *item.components.1 == Team::Enemy);

    // Both enemies are returned, not only the wounded one
    assert_eq!(
        ids(enemies.execute_entities().unwrap()),
        ids([&entities[1], &entities[3]])
    );

    let players = enemies.filter(|item| *item.components.1 == Team::Player);
    assert_eq!(ids(players.execute_entities().unwrap()), ids([&entities[0]]));

    // The intermediate queries are unaffected
    assert_eq!(ids(low.execute_entities().unwrap()), ids([&entities[1]]));
}

#[test]
fn tuple_order() {
    let entities = arena();

    let items = EntityQuery::from(&entities)
        .with_components::<(Team, Position, Health)>()
        .execute()
        .unwrap();

    assert_eq!(items.len(), 3);
    for item in &items {
        let (team, position, health) = &item.components;
        assert_eq!(Some(**team), item.entity.get_component::<Team>().map(|v| *v));
        assert_eq!(
            Some(**position),
            item.entity.get_component::<Position>().map(|v| *v)
        );
        assert_eq!(
            Some(&**health),
            item.entity.get_component::<Health>().as_deref()
        );
    }

    let reordered = EntityQuery::from(&entities)
        .with_components::<(Health, Team)>()
        .execute()
        .unwrap();

    assert_eq!(
        reordered
            .iter()
            .map(|item| (item.components.0.hp, *item.components.1))
            .collect_vec(),
        [
            (100.0, Team::Player),
            (30.0, Team::Enemy),
            (80.0, Team::Enemy)
        ]
    );
}

#[test]
fn unconfigured() {
    let empty: Vec<Entity> = Vec::new();
    let entities = arena();

    for snapshot in [&empty, &entities] {
        let query = EntityQuery::from(snapshot);

        assert_eq!(query.execute().err(), Some(Error::NoComponentTypes));
        assert_eq!(query.execute_entities().err(), Some(Error::NoComponentTypes));
        assert_eq!(query.execute_count(), Err(Error::NoComponentTypes));
        assert_eq!(query.execute_first().err(), Some(Error::NoComponentTypes));

        let filtered = query.filter(|_| true);
        assert_eq!(filtered.execute().err(), Some(Error::NoComponentTypes));
    }
}

#[test]
fn wounded_enemy() {
    let entities = vec![Entity::builder()
        .set(Health {
            hp: 50.0,
            max: 100.0,
        })
        .set(Team::Enemy)
        .build()];

    let results = EntityQuery::from(&entities)
        .with_components::<(Health, Team)>()
        .filter(|item| item.components.0.hp < 100.0)
        .execute()
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(*results[0].components.1, Team::Enemy);
    assert_eq!(results[0].entity.id(), entities[0].id());
}

#[test]
fn mutate_components() {
    let entities = arena();
    let query = EntityQuery::from(&entities);

    for item in query
        .with_components::<(Mut<Position>, Velocity, Opt<Stun>)>()
        .iter()
        .unwrap()
    {
        let (mut position, velocity, stun) = item.components;
        if stun.is_none() {
            position.0 += velocity.0 * 0.5;
        }
    }

    let positions = query
        .with_components::<Position>()
        .iter()
        .unwrap()
        .map(|item| item.components.0)
        .collect_vec();

    assert_eq!(
        positions,
        [
            Vec3::ZERO,
            vec3(3.5, 0.0, 0.0),
            vec3(0.0, 0.0, 6.0),
            vec3(0.0, 0.0, 8.0)
        ]
    );
}

#[test]
fn optional_components() {
    let entities = arena();

    let items = EntityQuery::from(&entities)
        .with_components::<(Team, Opt<Velocity>)>()
        .execute()
        .unwrap();

    assert_eq!(
        items
            .iter()
            .map(|item| item.components.1.as_deref().copied())
            .collect_vec(),
        [
            None,
            Some(Velocity(vec3(-1.0, 0.0, 0.0))),
            None,
            Some(Velocity(vec3(0.0, 0.0, -2.0)))
        ]
    );
}

#[test]
fn first_and_single() {
    let entities = arena();
    let enemies = EntityQuery::from(&entities)
        .with_components::<(Team, Position)>()
        .filter(|item| *item.components.0 == Team::Enemy);

    let first = enemies.execute_first().unwrap().unwrap();
    assert_eq!(first.entity.id(), entities[1].id());
    drop(first);

    assert!(enemies.get(entities[0].id()).unwrap().is_none());
    assert!(enemies.get(entities[4].id()).unwrap().is_none());
    assert_eq!(
        enemies
            .get(entities[2].id())
            .unwrap()
            .map(|item| *item.components.1),
        Some(Position(vec3(0.0, 0.0, 6.0)))
    );

    let none = enemies.filter(|_| false);
    assert!(none.execute_first().unwrap().is_none());
    assert_eq!(none.execute_count().unwrap(), 0);
}

#[test]
fn reuse_base_query() {
    let entities = arena();
    let base = EntityQuery::from(&entities).with_components::<Health>();

    let wounded = base.filter(|item| item.components.hp < item.components.max);
    let healthy = base.filter(|item| item.components.hp >= item.components.max);

    assert_eq!(base.execute_count().unwrap(), 3);
    assert_eq!(wounded.execute_count().unwrap(), 2);
    assert_eq!(healthy.execute_count().unwrap(), 1);

    // Terminal operations can be repeated
    assert_eq!(
        ids(wounded.execute_entities().unwrap()),
        ids(wounded.execute_entities().unwrap())
    );
}

#[test]
fn count_without_borrowing() {
    let entities = arena();
    let query = EntityQuery::from(&entities).with_components::<(Health, Mut<Position>)>();

    // Held exclusively for the whole test
    let mut health = entities[0].get_component_mut::<Health>().unwrap();
    health.hp -= 10.0;
    let position = entities[1].get_component::<Position>().unwrap();

    assert_eq!(query.execute_count().unwrap(), 3);
    assert_eq!(
        ids(query.execute_entities().unwrap()),
        ids([&entities[0], &entities[1], &entities[3]])
    );
    assert_eq!(
        EntityQuery::from(&entities)
            .with_components::<Health>()
            .execute_count()
            .unwrap(),
        3
    );

    drop((health, position));
    assert_eq!(entities[0].get_component::<Health>().unwrap().hp, 90.0);
}
