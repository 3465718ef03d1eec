use bulwark::{component, Entity, EntityId};
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

#[derive(Debug, PartialEq)]
struct Stun {
    remaining: f32,
}

component! {
    Health,
    Team,
    Stun,
}

#[test]
fn component_isolation() {
    let mut a = Entity::new();
    let b = Entity::new();

    for i in 0..8 {
        a.add_component(Health {
            hp: i as f32,
            max: 10.0,
        });
    }
    a.add_component(Team::Enemy).add_component(Stun { remaining: 1.0 });

    assert_eq!(a.component_count(), 10);
    assert!(a.has_component::<Health>());
    assert!(!b.has_component::<Health>());
    assert!(!b.has_component::<Team>());
    assert!(!b.has_component::<Stun>());
    assert_eq!(b.component_count(), 0);
}

#[test]
fn get_component_is_idempotent() {
    let mut entity = Entity::new();
    entity.add_component(Health {
        hp: 50.0,
        max: 100.0,
    });

    let first = entity.get_component::<Health>().unwrap();
    let second = entity.get_component::<Health>().unwrap();

    assert!(std::ptr::eq(&*first, &*second));
    assert_eq!(*first, *second);
}

#[test]
fn stun_added_on_first_stun() {
    let mut entity = Entity::builder().set(Team::Player).build();
    assert!(entity.get_component::<Stun>().is_none());

    // Re-adding keeps the first instance visible
    entity.add_component(Stun { remaining: 0.5 });
    entity.add_component(Stun { remaining: 2.0 });
    assert_eq!(entity.get_component::<Stun>().unwrap().remaining, 0.5);

    // Replacing updates the visible instance without growing the list
    entity.replace_component(Stun { remaining: 3.0 });
    assert_eq!(entity.get_component::<Stun>().unwrap().remaining, 3.0);
    assert_eq!(entity.component_count(), 3);

    entity.get_component_mut::<Stun>().unwrap().remaining -= 1.0;
    assert_eq!(entity.get_component::<Stun>().unwrap().remaining, 2.0);
}

#[test]
fn ids() {
    let entities = (0..100).map(|_| Entity::new()).collect_vec();
    let ids: Vec<EntityId> = entities.iter().map(Entity::id).collect();

    assert_eq!(ids.iter().unique().count(), 100);
    assert!(ids.iter().tuple_windows().all(|(a, b)| a < b));

    let bits = ids[3].to_bits();
    assert_eq!(EntityId::from_bits(bits), ids[3]);
    assert_eq!(entities[3].to_string(), format!("Entity({})", ids[3]));
}

#[test]
#[should_panic]
fn conflicting_borrow() {
    let mut entity = Entity::new();
    entity.add_component(Health {
        hp: 1.0,
        max: 1.0,
    });

    let _shared = entity.get_component::<Health>();
    let _exclusive = entity.get_component_mut::<Health>();
}
