#![cfg(not(target_arch = "wasm32"))]

use dynarray_viz::pseudo_code::{self, Operation};
use dynarray_viz::scene::{aspect_scale, SceneLayout, Tween, EXTENT, MAX_DRAWN_SLOTS};
use dynarray_viz::{DynamicArray, VizConfig};
use proptest::prelude::*;

fn settled(arr: &DynamicArray) -> SceneLayout {
    SceneLayout::compute(arr.as_slice(), arr.capacity(), arr.capacity(), 1.0)
}

#[test]
fn one_quad_per_slot_and_filled_matches_size() {
    let mut arr = DynamicArray::new();
    for v in [5, 7, 9] {
        arr.add(v);
    }
    let layout = settled(&arr);
    assert_eq!(layout.slots.len(), 4);
    assert_eq!(layout.filled, 3);
}

#[test]
fn slots_are_ordered_and_centred() {
    let layout = SceneLayout::compute(&[1, 2], 8, 8, 1.0);
    for pair in layout.slots.windows(2) {
        assert!(pair[0].right() <= pair[1].x);
    }
    let first = layout.slots.first().unwrap();
    let last = layout.slots.last().unwrap();
    assert!((first.x + last.right()).abs() < 1e-5);
}

#[test]
fn grow_animation_widens_cage() {
    let values = [1, 2];
    let tween = Tween::start(2, 4, 0.0, 400);
    let early = SceneLayout::compute(&values, tween.from, 4, tween.progress(40.0));
    let late = SceneLayout::compute(&values, tween.from, 4, tween.progress(400.0));
    let (e, l) = (early.cage_bounds().unwrap(), late.cage_bounds().unwrap());
    assert!(l.w > e.w);
}

#[test]
fn aspect_scale_is_square_on_both_orientations() {
    // A unit square in layout space covers the same pixels either way.
    for (w, h) in [(1920.0, 1080.0), (1080.0, 1920.0)] {
        let (sx, sy) = aspect_scale(w, h);
        assert!((sx * w - sy * h).abs() < 1e-3);
    }
}

#[test]
fn click_sequence_drives_panels() {
    // Add, add, add from the default config, as the page would.
    let cfg = VizConfig::default();
    let mut arr = DynamicArray::with_capacity(cfg.initial_capacity);
    let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&log);
    arr.subscribe(move |c| sink.borrow_mut().push(*c));

    for v in cfg.values().take(3) {
        arr.add(v);
    }
    let statuses: Vec<_> = log.borrow().iter().map(pseudo_code::status).collect();
    assert_eq!(statuses.last().unwrap(), "Added 9 at index 2 (size 3 / capacity 4)");
    assert!(statuses[2].starts_with("Grew from 2 to 4"));

    let (op, _) = pseudo_code::highlight(&log.borrow()[2]);
    assert_eq!(op, Operation::Grow);
}

#[test]
fn repeated_grow_clicks_keep_layout_bounded() {
    let mut arr = DynamicArray::new();
    arr.add(5);
    for _ in 0..70 {
        arr.grow();
        let layout = settled(&arr);
        assert!(layout.slots.len() <= MAX_DRAWN_SLOTS);
    }
    assert_eq!(arr.capacity(), usize::MAX);
    let layout = settled(&arr);
    assert!(layout.overflow.is_some());
    assert_eq!(layout.filled, 1);
}

proptest! {
    #[test]
    fn cage_encloses_every_slot(size in 0usize..40, grows in 0usize..5) {
        let mut arr = DynamicArray::new();
        for i in 0..size {
            arr.add(i as i32);
        }
        for _ in 0..grows {
            arr.grow();
        }
        let layout = settled(&arr);
        let cage = layout.cage_bounds().unwrap();
        prop_assert_eq!(layout.slots.len(), arr.capacity().min(MAX_DRAWN_SLOTS));
        prop_assert_eq!(layout.hidden, arr.capacity().saturating_sub(MAX_DRAWN_SLOTS));
        prop_assert_eq!(layout.filled, arr.len());
        for slot in &layout.slots {
            prop_assert!(cage.contains(slot));
        }
        prop_assert!(cage.x >= -EXTENT - 0.1 && cage.right() <= EXTENT + 0.1);
    }
}
