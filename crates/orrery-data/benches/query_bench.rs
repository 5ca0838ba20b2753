use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use orrery_data::allocators::HandlePool;
use orrery_data::ecs::{Component, World};

#[derive(Debug, Clone, Copy, Default)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Debug, Clone, Copy, Default)]
struct Velocity {
    x: f32,
    y: f32,
}
impl Component for Velocity {}

fn bench_queries(c: &mut Criterion) {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.register_component::<Velocity>().unwrap();

    // Setup 10,000 entities; half of them also get a Velocity, splitting the
    // population across two archetypes.
    for i in 0..10_000u32 {
        let entity = world.create_entity();
        world
            .add_component(
                entity,
                Position {
                    x: i as f32,
                    y: 0.0,
                },
            )
            .unwrap();
        if i % 2 == 0 {
            world
                .add_component(entity, Velocity { x: 1.0, y: -1.0 })
                .unwrap();
        }
    }

    let mut group = c.benchmark_group("ECS Queries");

    group.bench_function("Batched columns (Position & Velocity)", |b| {
        b.iter(|| {
            world
                .for_each::<(Position, Velocity), _>(|(positions, velocities)| {
                    for (position, velocity) in positions.iter_mut().zip(velocities.iter()) {
                        position.x += velocity.x;
                        position.y += velocity.y;
                    }
                })
                .unwrap();
            black_box(&world);
        });
    });

    group.bench_function("Batched columns (Position only)", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            world
                .for_each::<(Position,), _>(|(positions,)| {
                    for position in positions.iter() {
                        sum += position.y;
                    }
                })
                .unwrap();
            black_box(sum);
        });
    });

    group.finish();
}

fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("Handle Pool");

    group.bench_function("Insert + remove churn", |b| {
        let mut pool = HandlePool::with_capacity(1024);
        b.iter(|| {
            let handles: Vec<_> = (0..1024).map(|i| pool.insert(i)).collect();
            for handle in handles {
                black_box(pool.remove(handle));
            }
        });
    });

    group.bench_function("Iterate 10k live objects", |b| {
        let mut pool = HandlePool::new();
        for i in 0..10_000u32 {
            pool.insert(i);
        }
        b.iter(|| {
            let mut sum = 0u64;
            for (_, value) in pool.iter() {
                sum += u64::from(*value);
            }
            black_box(sum);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_queries, bench_pool);
criterion_main!(benches);
