// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_segments::{LocalSegment, SegmentId, SegmentTree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Complete tree with `fanout` children per segment and `depth` levels below the root.
fn gen_wide_tree(fanout: usize, depth: usize) -> (SegmentTree, SegmentId, Vec<SegmentId>) {
    let mut tree = SegmentTree::new();
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let root = tree.insert_segment(0.0, 10.0);
    let mut all = vec![root];
    let mut level = vec![root];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for &parent in &level {
            for _ in 0..fanout {
                let child = tree.insert(
                    Some(parent),
                    LocalSegment {
                        position: rng.next_f64() * 20.0 - 10.0,
                        flipped: rng.next_u64() % 4 == 0,
                        ..LocalSegment::new(0.0, 1.0 + rng.next_f64() * 4.0)
                    },
                );
                next.push(child);
            }
        }
        all.extend_from_slice(&next);
        level = next;
    }
    (tree, root, all)
}

/// Single chain of `len` segments.
fn gen_chain(len: usize) -> (SegmentTree, SegmentId) {
    let mut tree = SegmentTree::new();
    let root = tree.insert_segment(0.0, 1.0);
    let mut parent = root;
    for i in 0..len {
        parent = tree.insert(
            Some(parent),
            LocalSegment {
                position: 1.0,
                flipped: i % 3 == 0,
                ..LocalSegment::new(0.0, 1.0)
            },
        );
    }
    (tree, root)
}

fn bench_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("position");
    for &depth in &[3usize, 5, 7] {
        let (mut tree, root, all) = gen_wide_tree(4, depth);
        group.throughput(Throughput::Elements(all.len() as u64));
        let mut p = 0.0;
        group.bench_function(format!("root_translate_fanout4_depth{}", depth), |b| {
            b.iter(|| {
                p += 1.0;
                tree.set_position(root, black_box(p));
            })
        });
    }
    let (mut tree, _, all) = gen_wide_tree(4, 6);
    let leaf = *all.last().unwrap();
    let mut p = 0.0;
    group.bench_function("leaf_translate", |b| {
        b.iter(|| {
            p += 1.0;
            tree.set_position(leaf, black_box(p));
        })
    });
    group.bench_function("redundant_translate", |b| {
        b.iter(|| tree.set_position(leaf, black_box(p)))
    });
    group.finish();
}

fn bench_flip(c: &mut Criterion) {
    let mut group = c.benchmark_group("flip");
    for &depth in &[3usize, 5, 7] {
        let (mut tree, root, all) = gen_wide_tree(4, depth);
        group.throughput(Throughput::Elements(all.len() as u64));
        let mut flipped = false;
        group.bench_function(format!("root_toggle_fanout4_depth{}", depth), |b| {
            b.iter(|| {
                flipped = !flipped;
                tree.flip(root, black_box(flipped));
            })
        });
    }
    let (mut tree, root) = gen_chain(2048);
    let mut flipped = false;
    group.bench_function("root_toggle_chain2048", |b| {
        b.iter(|| {
            flipped = !flipped;
            tree.flip(root, black_box(flipped));
        })
    });
    group.finish();
}

fn bench_reparent(c: &mut Criterion) {
    let mut group = c.benchmark_group("reparent");
    group.bench_function("detach_attach_subtree", |b| {
        b.iter_batched(
            || gen_wide_tree(4, 5),
            |(mut tree, _, all)| {
                // First child of the root, moved under a leaf of the last branch.
                let subtree = all[1];
                let target = all[all.len() - 1];
                tree.set_parent(subtree, None).unwrap();
                tree.set_parent(subtree, Some(target)).unwrap();
                black_box(tree.world_position(subtree));
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("collisions");
    let (tree, root, all) = gen_wide_tree(4, 5);
    group.throughput(Throughput::Elements(all.len() as u64));
    group.bench_function("colliding_with_root", |b| {
        b.iter(|| black_box(tree.colliding_with(root).count()))
    });
    group.finish();
}

criterion_group!(benches, bench_position, bench_flip, bench_reparent, bench_collisions);
criterion_main!(benches);
