// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segment tree basics.
//!
//! Nest a few segments, move and mirror the parent, then detach the child.
//!
//! Run:
//! - `UNDERSTORY_LOG=trace cargo run -p understory_demos --example segments_basics`

use understory_segments::{LocalSegment, SegmentId, SegmentTree};

fn print(tree: &SegmentTree, name: &str, id: SegmentId) {
    let extent = tree.world_extent(id).unwrap();
    println!(
        "{name:>6}: [{:>5}, {:>5}] at {:>5} flipped={}",
        extent.start,
        extent.end,
        tree.world_position(id).unwrap(),
        tree.world_flipped(id).unwrap(),
    );
}

fn main() {
    understory_demos::init_logger();

    let mut tree = SegmentTree::new();
    let parent = tree.insert(
        None,
        LocalSegment {
            position: 1.0,
            ..LocalSegment::new(1.0, 2.0)
        },
    );
    let child = tree.insert(
        Some(parent),
        LocalSegment {
            position: 2.0,
            ..LocalSegment::new(3.0, 4.0)
        },
    );
    println!("attached");
    print(&tree, "parent", parent);
    print(&tree, "child", child);
    assert_eq!(tree.world_a(child), Some(6.0));

    tree.set_position(parent, 4.0);
    println!("parent moved to 4");
    print(&tree, "parent", parent);
    print(&tree, "child", child);

    tree.flip(parent, true);
    println!("parent flipped");
    print(&tree, "parent", parent);
    print(&tree, "child", child);
    assert_eq!(tree.world_position(child), Some(2.0));

    tree.set_parent(child, None).unwrap();
    println!("child detached");
    print(&tree, "child", child);
    assert_eq!(tree.world_a(child), Some(5.0), "detached child is back in its own frame");
}
