#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use splitgrid_layout::{
    CancelReason, Direction, DragEffect, NavigationKey, Orientation, PaneProvider, Point,
    SplitterConfig, SplitterInput, TrackValues, Unit, track_values,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Down(u8, i16, i16),
    Move(u8, i16, i16),
    NonFiniteMove(u8),
    Up(u8),
    Key(u8),
    Cancel,
    Resize(u16),
    Flip,
}

const KEYS: [NavigationKey; 6] = [
    NavigationKey::ArrowLeft,
    NavigationKey::ArrowRight,
    NavigationKey::ArrowUp,
    NavigationKey::ArrowDown,
    NavigationKey::Home,
    NavigationKey::End,
];

const ORIENTATIONS: [Orientation; 4] = [
    Orientation::Start,
    Orientation::End,
    Orientation::Top,
    Orientation::Bottom,
];

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(track_count) = u.int_in_range(1_usize..=6) else {
        return;
    };
    let mut values = Vec::with_capacity(track_count);
    for _ in 0..track_count {
        let Ok(weight) = u.int_in_range(1_u8..=20) else {
            return;
        };
        values.push(f64::from(weight) / 4.0);
    }
    let tracks: TrackValues = track_values(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("t{i}"), *v)),
    );

    let Ok(mut provider) = PaneProvider::uncontrolled(800.0, 600.0, tracks.clone(), tracks) else {
        return;
    };
    let (Ok(pick), Ok(orientation), Ok(min), Ok(extent)) = (
        u.choose_index(track_count),
        u.choose(&ORIENTATIONS),
        u.int_in_range(0_u8..=8),
        u.int_in_range(0_u8..=40),
    ) else {
        return;
    };
    let min = f64::from(min) / 4.0;
    let max = min + f64::from(extent) / 4.0;
    let config = SplitterConfig::new(format!("t{pick}"), min, max).orientation(*orientation);
    let Ok(mut drag) = provider.activate(&config) else {
        return;
    };
    let axis = drag.splitter().axis();
    let before = provider.store().tracks(axis).total();

    let Ok(ops) = Vec::<Op>::arbitrary(&mut u) else {
        return;
    };
    for op in ops.into_iter().take(256) {
        let input = match op {
            Op::Down(id, x, y) => {
                SplitterInput::pointer_down(u32::from(id % 2), Point::new(x.into(), y.into()))
            }
            Op::Move(id, x, y) => {
                SplitterInput::pointer_move(u32::from(id % 2), Point::new(x.into(), y.into()))
            }
            Op::NonFiniteMove(id) => {
                SplitterInput::pointer_move(u32::from(id % 2), Point::new(f64::NAN, f64::INFINITY))
            }
            Op::Up(id) => SplitterInput::pointer_up(u32::from(id % 2), Point::ORIGIN),
            Op::Key(k) => SplitterInput::key(KEYS[usize::from(k) % KEYS.len()]),
            Op::Cancel => SplitterInput::cancel(CancelReason::PointerCancel),
            Op::Resize(span) => {
                let _ = provider.set_total_panes_width(f64::from(span).max(1.0));
                continue;
            }
            Op::Flip => {
                let next = match provider.direction() {
                    Direction::Ltr => Direction::Rtl,
                    Direction::Rtl => Direction::Ltr,
                };
                provider.set_direction(next);
                continue;
            }
        };
        let Ok(transition) = provider.dispatch(&mut drag, &input) else {
            continue;
        };
        assert!(transition.transition_id > 0);

        let tracks = provider.store().tracks(axis);
        let total = tracks.total();
        assert!(
            (total - before).abs() <= 1e-9 * before.max(1.0),
            "total drifted: {before} -> {total}"
        );
        let resize = match &transition.effect {
            DragEffect::Resized { resize, .. } | DragEffect::KeyboardApplied { resize, .. } => {
                resize
            }
            _ => continue,
        };
        let bounds = drag.splitter().bounds();
        assert!(
            resize.value <= bounds.max(),
            "{} above max {}",
            resize.value,
            bounds.max()
        );
        // Falling short of `min` is allowed only when the neighbor is exhausted.
        assert!(
            resize.value >= bounds.min() || resize.neighbor_value == 0.0,
            "{} below min {} with neighbor {}",
            resize.value,
            bounds.min(),
            resize.neighbor_value
        );
        assert!(resize.neighbor_value >= 0.0, "neighbor went negative");
        assert!(tracks.iter().all(|(_, value)| value >= 0.0 && value.is_finite()));
        assert_eq!(tracks.get(drag.splitter().key()), Some(resize.value));
    }

    let _ = provider.grid_template_rows(Unit::Px);
    let _ = provider.grid_template_columns(Unit::Fr);
});
