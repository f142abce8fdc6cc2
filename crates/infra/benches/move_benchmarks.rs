//! Benchmarks for the move pipeline.
//!
//! Measures settlement planning on its own and the full plan-and-commit path
//! against the in-memory store, at varying flat sizes.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use flatshare_core::{FlatId, ItemId, Money, UserId};
use flatshare_infra::{FlatStore, InMemoryFlatStore, MoveService};
use flatshare_inventory::{Item, OwnershipSet};
use flatshare_moves::{plan_move_in, MoveIn, MoveOut};
use flatshare_parties::{Flat, User};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

struct Household {
    flat: Flat,
    residents: Vec<User>,
    items: Vec<Item>,
}

fn household(resident_count: usize, item_count: usize) -> Household {
    let mut flat = Flat::new(FlatId::new(), "Bench flat").unwrap();
    let mut residents = Vec::new();
    for i in 0..resident_count {
        let mut u = User::new(UserId::new(), format!("Res{i}"), "Bench", "b@example.org").unwrap();
        u.attach_to_flat(flat.id_typed()).unwrap();
        flat.add_resident(u.id_typed()).unwrap();
        residents.push(u);
    }
    let mut items = Vec::new();
    for i in 0..item_count {
        let mut item = Item::new(
            ItemId::new(),
            flat.id_typed(),
            format!("Item {i}"),
            Money::from_cents(10_000 + i as i64 * 1_000),
            date("2025-01-01"),
            0.2,
            None,
            None,
            false,
        )
        .unwrap();
        item.set_owners(OwnershipSet::from_owners(
            residents.iter().map(User::id_typed),
        ));
        flat.add_item(item.id_typed()).unwrap();
        for u in &mut residents {
            u.add_item(item.id_typed()).unwrap();
        }
        items.push(item);
    }
    Household {
        flat,
        residents,
        items,
    }
}

fn bench_plan_move_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_move_in");
    for item_count in [1usize, 10, 50] {
        let h = household(4, item_count);
        let joiner = User::new(UserId::new(), "Joiner", "Bench", "j@example.org").unwrap();
        let cmd = MoveIn {
            flat_id: h.flat.id_typed(),
            user_id: joiner.id_typed(),
            exclude_items: BTreeSet::new(),
            effective_date: date("2026-01-01"),
        };
        group.bench_with_input(BenchmarkId::from_parameter(item_count), &h, |b, h| {
            b.iter(|| {
                black_box(plan_move_in(&h.flat, &joiner, &h.items, &cmd).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_move_round_trip(c: &mut Criterion) {
    c.bench_function("move_in_then_out_committed_10_items", |b| {
        b.iter(|| {
            let store = Arc::new(InMemoryFlatStore::new());
            let h = household(3, 10);
            let flat_id = h.flat.id_typed();
            store.insert_flat(h.flat).unwrap();
            for u in h.residents {
                store.insert_user(u).unwrap();
            }
            for item in h.items {
                store.insert_item(item).unwrap();
            }
            let joiner = User::new(UserId::new(), "Joiner", "Bench", "j@example.org").unwrap();
            let joiner_id = joiner.id_typed();
            store.insert_user(joiner).unwrap();

            let service = MoveService::new(store);
            service
                .move_in(&MoveIn {
                    flat_id,
                    user_id: joiner_id,
                    exclude_items: BTreeSet::new(),
                    effective_date: date("2026-01-01"),
                })
                .unwrap();
            black_box(
                service
                    .move_out(&MoveOut {
                        flat_id,
                        user_id: joiner_id,
                        effective_date: date("2026-06-01"),
                    })
                    .unwrap(),
            );
        });
    });
}

criterion_group!(benches, bench_plan_move_in, bench_move_round_trip);
criterion_main!(benches);
