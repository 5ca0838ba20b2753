// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use orrery_core::ecs::EntityId;

use super::error::EcsError;
use super::world::INITIAL_COLUMN_CAPACITY;
use super::{Component, ComponentMask, World};

// --- DUMMY COMPONENTS FOR TESTING ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Foo {
    x: i32,
    y: i32,
}
impl Component for Foo {}

/// Owns heap memory, so it exercises the drop-capability path of the
/// type-erased columns (a plain byte copy would leak or double-free it if
/// the store mishandled ownership).
#[derive(Debug, Clone, PartialEq)]
struct Bar {
    values: Vec<f32>,
}
impl Component for Bar {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tag;
impl Component for Tag {}

// --- TESTS ---

#[test]
fn created_entities_live_in_the_empty_archetype() {
    let mut world = World::new();
    let first = world.create_entity();
    let second = world.create_entity();

    assert_eq!(first, EntityId::from_raw(0), "IDs are allocated in order");
    assert_eq!(second, EntityId::from_raw(1));
    assert_eq!(world.entity_count(), 2);
    assert_eq!(
        world.archetype_count(),
        1,
        "only the canonical empty archetype exists"
    );
    assert_eq!(world.archetypes[0].mask(), ComponentMask::EMPTY);
    assert_eq!(world.archetypes[0].row_count(), 2);
}

#[test]
fn add_and_get_components_across_migrations() {
    // --- 1. SETUP ---
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    world.register_component::<Bar>().unwrap();
    let entity = world.create_entity();

    // --- 2. ACTION ---
    world.add_component(entity, Foo { x: 4, y: 9 }).unwrap();
    world
        .add_component(
            entity,
            Bar {
                values: vec![1.0, 2.5],
            },
        )
        .unwrap();

    // --- 3. ASSERTIONS ---
    // The entity migrated empty -> {Foo} -> {Foo, Bar}; each mask got its
    // own archetype and the entity now lives in exactly one of them.
    assert_eq!(world.archetype_count(), 3);
    let location = world.entities.location(entity).unwrap();
    let archetype = &world.archetypes[location.archetype as usize];
    assert_eq!(archetype.mask().count(), 2, "both component bits are set");
    assert_eq!(archetype.row_count(), 1);

    assert_eq!(
        world.get_component::<Foo>(entity).unwrap(),
        &Foo { x: 4, y: 9 }
    );
    assert_eq!(
        world.get_component::<Bar>(entity).unwrap(),
        &Bar {
            values: vec![1.0, 2.5]
        }
    );
}

#[test]
fn removing_one_component_leaves_the_others_intact() {
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    world.register_component::<Bar>().unwrap();
    let entity = world.create_entity();
    world.add_component(entity, Foo { x: 1, y: 2 }).unwrap();
    world
        .add_component(
            entity,
            Bar {
                values: vec![3.0, 4.0],
            },
        )
        .unwrap();

    world.remove_component::<Foo>(entity).unwrap();

    let location = world.entities.location(entity).unwrap();
    let archetype = &world.archetypes[location.archetype as usize];
    assert_eq!(archetype.mask().count(), 1, "only Bar's bit remains");
    assert!(matches!(
        world.get_component::<Foo>(entity),
        Err(EcsError::ComponentNotPresent { .. })
    ));
    assert_eq!(
        world.get_component::<Bar>(entity).unwrap(),
        &Bar {
            values: vec![3.0, 4.0]
        },
        "the surviving component is untouched by the migration"
    );
}

#[test]
fn removing_the_last_component_parks_the_entity_in_the_empty_archetype() {
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    let entity = world.create_entity();
    world.add_component(entity, Foo { x: 0, y: 0 }).unwrap();

    world.remove_component::<Foo>(entity).unwrap();

    let location = world.entities.location(entity).unwrap();
    assert_eq!(
        location.archetype, 0,
        "the canonical empty archetype is index 0"
    );
    assert!(!world.has_component::<Foo>(entity).unwrap());

    // The entity is still alive and can pick up components again.
    world.add_component(entity, Foo { x: 7, y: 7 }).unwrap();
    assert_eq!(
        world.get_component::<Foo>(entity).unwrap(),
        &Foo { x: 7, y: 7 }
    );
}

#[test]
fn adding_a_present_component_replaces_the_value_in_place() {
    let mut world = World::new();
    world.register_component::<Bar>().unwrap();
    let entity = world.create_entity();
    world
        .add_component(entity, Bar { values: vec![1.0] })
        .unwrap();
    let archetypes_before = world.archetype_count();

    world
        .add_component(entity, Bar { values: vec![2.0] })
        .unwrap();

    assert_eq!(
        world.archetype_count(),
        archetypes_before,
        "the mask is unchanged, so no migration happened"
    );
    assert_eq!(
        world.get_component::<Bar>(entity).unwrap(),
        &Bar { values: vec![2.0] }
    );
}

#[test]
fn archetype_columns_grow_together_past_the_initial_capacity() {
    // --- 1. SETUP ---
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    world.register_component::<Bar>().unwrap();

    // --- 2. ACTION ---
    // One entity more than the initial column capacity, each with both
    // components: the {Foo, Bar} archetype must grow exactly once.
    let count = INITIAL_COLUMN_CAPACITY + 1;
    let entities: Vec<EntityId> = (0..count)
        .map(|i| {
            let entity = world.create_entity();
            world
                .add_component(
                    entity,
                    Foo {
                        x: i as i32,
                        y: -(i as i32),
                    },
                )
                .unwrap();
            world
                .add_component(
                    entity,
                    Bar {
                        values: vec![i as f32],
                    },
                )
                .unwrap();
            entity
        })
        .collect();

    // --- 3. ASSERTIONS ---
    let location = world.entities.location(entities[0]).unwrap();
    let archetype = &world.archetypes[location.archetype as usize];
    assert_eq!(archetype.row_count(), count);
    assert_eq!(
        archetype.capacity(),
        INITIAL_COLUMN_CAPACITY * 2,
        "one doubling past the initial capacity"
    );

    // Growth relocated every live row; all values must read back intact.
    for (i, &entity) in entities.iter().enumerate() {
        assert_eq!(
            world.get_component::<Foo>(entity).unwrap(),
            &Foo {
                x: i as i32,
                y: -(i as i32),
            },
            "entity {i} after growth"
        );
        assert_eq!(
            world.get_component::<Bar>(entity).unwrap().values,
            vec![i as f32]
        );
    }
}

#[test]
fn swap_remove_fixes_the_moved_entitys_location() {
    // --- 1. SETUP ---
    // Three entities sharing the {Foo, Bar} archetype, in rows 0, 1, 2.
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    world.register_component::<Bar>().unwrap();
    let entities: Vec<EntityId> = (0..3)
        .map(|i| {
            let entity = world.create_entity();
            world
                .add_component(entity, Foo { x: i, y: 10 * i })
                .unwrap();
            world
                .add_component(
                    entity,
                    Bar {
                        values: vec![i as f32; 3],
                    },
                )
                .unwrap();
            entity
        })
        .collect();

    let shared = world.entities.location(entities[0]).unwrap().archetype;
    let last_before = world.entities.location(entities[2]).unwrap();
    assert_eq!(last_before.row, 2);

    // --- 2. ACTION ---
    // Remove a component from the *middle* entity: the last row (entity 2)
    // must be swapped into the vacated row 1.
    world.remove_component::<Foo>(entities[1]).unwrap();

    // --- 3. ASSERTIONS ---
    let moved = world.entities.location(entities[2]).unwrap();
    assert_eq!(moved.archetype, shared, "entity 2 stayed in its archetype");
    assert_eq!(moved.row, 1, "entity 2 moved into the vacated row");
    assert_eq!(
        world.archetypes[shared as usize].entities()[1],
        entities[2],
        "the row's ownership record moved with it"
    );

    // The moved entity's data is reachable and intact at its new row.
    assert_eq!(
        world.get_component::<Foo>(entities[2]).unwrap(),
        &Foo { x: 2, y: 20 }
    );
    assert_eq!(
        world.get_component::<Bar>(entities[2]).unwrap().values,
        vec![2.0; 3]
    );

    // And the migrated entity still reads correctly from its new home.
    assert!(matches!(
        world.get_component::<Foo>(entities[1]),
        Err(EcsError::ComponentNotPresent { .. })
    ));
    assert_eq!(
        world.get_component::<Bar>(entities[1]).unwrap().values,
        vec![1.0; 3]
    );
}

#[test]
fn for_each_visits_matching_entities_exactly_once() {
    // --- 1. SETUP ---
    // Fragment Foo+Bar entities across distinct archetypes: {Foo, Bar} and
    // {Foo, Bar, Tag}. Entities lacking Bar must never be visited.
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    world.register_component::<Bar>().unwrap();
    world.register_component::<Tag>().unwrap();

    let mut expected = Vec::new();
    for i in 0..6 {
        let entity = world.create_entity();
        world.add_component(entity, Foo { x: i, y: 0 }).unwrap();
        if i % 2 == 0 {
            world
                .add_component(
                    entity,
                    Bar {
                        values: vec![i as f32],
                    },
                )
                .unwrap();
            expected.push(i);
        }
        if i % 3 == 0 {
            world.add_component(entity, Tag).unwrap();
        }
    }

    // --- 2. ACTION ---
    let mut visited = Vec::new();
    world
        .for_each::<(Foo, Bar), _>(|(foos, bars)| {
            assert_eq!(foos.len(), bars.len(), "columns are parallel");
            for (foo, bar) in foos.iter().zip(bars.iter()) {
                assert_eq!(bar.values, vec![foo.x as f32], "rows pair up");
                visited.push(foo.x);
            }
        })
        .unwrap();

    // --- 3. ASSERTIONS ---
    visited.sort_unstable();
    assert_eq!(
        visited, expected,
        "every Foo+Bar entity exactly once, no others"
    );
}

#[test]
fn for_each_mutations_are_visible_through_get_component() {
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    world.register_component::<Tag>().unwrap();
    let plain = world.create_entity();
    let tagged = world.create_entity();
    world.add_component(plain, Foo { x: 1, y: 1 }).unwrap();
    world.add_component(tagged, Foo { x: 2, y: 2 }).unwrap();
    world.add_component(tagged, Tag).unwrap();

    world
        .for_each::<(Foo,), _>(|(foos,)| {
            for foo in foos.iter_mut() {
                foo.y *= 10;
            }
        })
        .unwrap();

    assert_eq!(world.get_component::<Foo>(plain).unwrap().y, 10);
    assert_eq!(world.get_component::<Foo>(tagged).unwrap().y, 20);
}

#[test]
fn unregistered_and_absent_components_are_recoverable_errors() {
    let mut world = World::new();
    let entity = world.create_entity();

    assert!(matches!(
        world.get_component::<Foo>(entity),
        Err(EcsError::NotRegistered { .. })
    ));
    assert!(matches!(
        world.add_component(entity, Foo { x: 0, y: 0 }),
        Err(EcsError::NotRegistered { .. })
    ));

    world.register_component::<Foo>().unwrap();
    assert!(matches!(
        world.get_component::<Foo>(entity),
        Err(EcsError::ComponentNotPresent { .. })
    ));
    assert!(matches!(
        world.remove_component::<Foo>(entity),
        Err(EcsError::ComponentNotPresent { .. })
    ));

    assert!(matches!(
        world.register_component::<Foo>(),
        Err(EcsError::AlreadyRegistered { .. })
    ));
}

#[test]
fn fabricated_entity_ids_are_not_found() {
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    let ghost = EntityId::from_raw(999);

    assert!(matches!(
        world.get_component::<Foo>(ghost),
        Err(EcsError::EntityNotFound { .. })
    ));
    assert!(matches!(
        world.add_component(ghost, Foo { x: 0, y: 0 }),
        Err(EcsError::EntityNotFound { .. })
    ));
}

#[test]
fn registering_past_the_type_limit_fails_loudly() {
    struct Slot<const N: usize>;
    impl<const N: usize> Component for Slot<N> {}

    macro_rules! register_slots {
        ($world:expr, $($n:literal)+) => {
            $($world.register_component::<Slot<$n>>().unwrap();)+
        };
    }

    let mut world = World::new();
    register_slots!(
        world,
        0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
        16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31
        32 33 34 35 36 37 38 39 40 41 42 43 44 45 46 47
        48 49 50 51 52 53 54 55 56 57 58 59 60 61 62 63
    );
    assert_eq!(world.component_count(), 64);

    assert!(matches!(
        world.register_component::<Slot<64>>(),
        Err(EcsError::RegistryFull)
    ));
}

#[test]
fn zero_sized_components_work_as_markers() {
    let mut world = World::new();
    world.register_component::<Tag>().unwrap();
    world.register_component::<Foo>().unwrap();

    let entity = world.create_entity();
    world.add_component(entity, Tag).unwrap();
    world.add_component(entity, Foo { x: 5, y: 6 }).unwrap();

    assert!(world.has_component::<Tag>(entity).unwrap());
    let mut rows = 0;
    world
        .for_each::<(Tag, Foo), _>(|(tags, foos)| {
            rows += tags.len();
            assert_eq!(foos[0], Foo { x: 5, y: 6 });
        })
        .unwrap();
    assert_eq!(rows, 1);

    world.remove_component::<Tag>(entity).unwrap();
    assert!(!world.has_component::<Tag>(entity).unwrap());
    assert_eq!(
        world.get_component::<Foo>(entity).unwrap(),
        &Foo { x: 5, y: 6 }
    );
}

#[test]
fn get_component_mut_writes_through() {
    let mut world = World::new();
    world.register_component::<Foo>().unwrap();
    let entity = world.create_entity();
    world.add_component(entity, Foo { x: 1, y: 2 }).unwrap();

    world.get_component_mut::<Foo>(entity).unwrap().x = 99;

    assert_eq!(
        world.get_component::<Foo>(entity).unwrap(),
        &Foo { x: 99, y: 2 }
    );
}

#[test]
fn independent_worlds_do_not_share_state() {
    let mut a = World::new();
    let mut b = World::new();
    a.register_component::<Foo>().unwrap();

    // `b` has its own registry: the type is unknown there.
    let entity = b.create_entity();
    assert!(matches!(
        b.add_component(entity, Foo { x: 0, y: 0 }),
        Err(EcsError::NotRegistered { .. })
    ));
    assert!(a.is_registered::<Foo>());
    assert!(!b.is_registered::<Foo>());
}
