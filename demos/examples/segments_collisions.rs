// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision queries over a row of platforms carried by a moving rail.
//!
//! Run:
//! - `cargo run -p understory_demos --example segments_collisions`

use understory_segments::{Interval, LocalSegment, SegmentTree};

const PLATFORM_LEN: f64 = 3.0;
const SPACING: f64 = 10.0;

fn main() {
    understory_demos::init_logger();

    let mut tree = SegmentTree::new();
    let rail = tree.insert_segment(0.0, 100.0);
    let platforms: Vec<_> = (0..8_u8)
        .map(|i| {
            tree.insert(
                Some(rail),
                LocalSegment {
                    position: f64::from(i) * SPACING,
                    ..LocalSegment::new(0.0, PLATFORM_LEN)
                },
            )
        })
        .collect();
    let player = tree.insert_segment(21.0, 22.0);

    for step in 0..5_u8 {
        tree.set_position(rail, f64::from(step) * 2.0);
        let hits: Vec<_> = tree
            .colliding_with(player)
            .filter(|id| *id != rail)
            .collect();
        println!("step {step}: player touches {hits:?}");
    }

    // Mirror the rail around its own position: platforms end up on the negative side.
    tree.flip(rail, true);
    let window = Interval::new(-40.0, -20.0);
    let visible: Vec<_> = tree
        .intersect_interval(window)
        .filter(|id| platforms.contains(id))
        .collect();
    println!("platforms inside {window:?}: {}", visible.len());
    assert!(!visible.is_empty(), "mirrored platforms land on the negative side");
}
