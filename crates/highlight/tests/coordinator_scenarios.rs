//! Coordinator behavior over realistic event sequences.

use std::time::{Duration, Instant};

use cursorhome_highlight::{
    CoordinatorOutcome, CoordinatorSettings, CoordinatorState, HighlightCoordinator,
    RecordingRenderer, RenderCall,
};
use cursorhome_model::{CursorTransition, Point, Rect};
use cursorhome_platform_core::{DisplayId, DisplaySnapshot, DisplayTopology, VirtualPointer};
use proptest::prelude::*;

type Coordinator = HighlightCoordinator<RecordingRenderer, VirtualPointer>;

fn single() -> DisplayTopology {
    DisplayTopology::new(vec![DisplaySnapshot::new(
        0,
        "main",
        Rect::new(0.0, 0.0, 1920.0, 1080.0),
        true,
    )])
}

fn triple() -> DisplayTopology {
    DisplayTopology::new(vec![
        DisplaySnapshot::new(0, "main", Rect::new(0.0, 0.0, 1920.0, 1080.0), true),
        DisplaySnapshot::new(1, "right", Rect::new(1920.0, 0.0, 1920.0, 1080.0), false),
        DisplaySnapshot::new(2, "left", Rect::new(-1280.0, 0.0, 1280.0, 1024.0), false),
    ])
}

fn build(topology: DisplayTopology, at: Point) -> (Coordinator, VirtualPointer) {
    let pointer = VirtualPointer::new(at);
    let coordinator = HighlightCoordinator::new(
        CoordinatorSettings::default(),
        topology,
        RecordingRenderer::new(),
        pointer.clone(),
    );
    (coordinator, pointer)
}

#[test]
fn find_then_recenter_on_single_display() {
    let now = Instant::now();
    let (mut c, pointer) = build(single(), Point::new(500.0, 500.0));

    assert_eq!(
        c.find(now),
        CoordinatorOutcome::Created {
            display: DisplayId(0),
            center: Point::new(500.0, 500.0)
        }
    );
    let first = c.session().unwrap().clone();
    assert_eq!(first.expires_at, now + Duration::from_secs(5));

    let later = now + Duration::from_secs(1);
    assert_eq!(c.find(later), CoordinatorOutcome::Recentered { display: DisplayId(0) });

    let session = c.session().unwrap();
    assert_eq!(session.surface, first.surface, "same session, not a new one");
    assert_eq!(session.center, Point::new(960.0, 540.0));
    assert_eq!(session.expires_at, later + Duration::from_secs(5));
    assert_eq!(pointer.warps(), vec![Point::new(960.0, 540.0)]);
    assert_eq!(c.renderer().peak_live(), 1);
}

#[test]
fn boundary_crossing_destroys_before_creating() {
    let now = Instant::now();
    let (mut c, pointer) = build(triple(), Point::new(1800.0, 500.0));
    c.find(now);
    c.renderer_mut().clear_calls();

    pointer.move_to(Point::new(1950.0, 500.0));
    let tick_at = now + Duration::from_millis(16);
    assert_eq!(
        c.tick(tick_at),
        CoordinatorOutcome::Transferred {
            from: DisplayId(0),
            to: DisplayId(1)
        }
    );

    let calls = c.renderer().calls();
    assert!(matches!(calls[0], RenderCall::Destroy { .. }));
    assert!(matches!(calls[1], RenderCall::Create { display: DisplayId(1), .. }));
    // The destination shows a frame within the same call.
    match &calls[2] {
        RenderCall::Update { frame, .. } => assert_eq!(frame.center, Point::new(1950.0, 500.0)),
        other => panic!("expected first frame, got {other:?}"),
    }
    assert_eq!(c.renderer().peak_live(), 1);
    assert_eq!(c.renderer().live_count(), 1);

    let session = c.session().unwrap();
    assert_eq!(session.display, DisplayId(1));
    assert_eq!(session.expires_at, tick_at + Duration::from_secs(5));
}

#[test]
fn transfer_keeps_session_style() {
    let now = Instant::now();
    let (mut c, pointer) = build(triple(), Point::new(100.0, 100.0));
    c.find(now);
    let style = c.session().unwrap().style.clone();

    let mut settings = CoordinatorSettings::default();
    settings.highlight.style.size = 140.0;
    c.apply_settings(settings);

    pointer.move_to(Point::new(-100.0, 100.0));
    c.tick(now + Duration::from_millis(16));
    assert_eq!(c.session().unwrap().display, DisplayId(2));
    assert_eq!(c.session().unwrap().style, style);
}

#[test]
fn returning_cursor_is_highlighted_where_it_lands() {
    let now = Instant::now();
    let (mut c, pointer) = build(triple(), Point::new(3839.0, 400.0));
    c.on_transition(&CursorTransition::left("macbook-pro", now), now);
    assert_eq!(c.state(), CoordinatorState::NoSession);

    pointer.move_to(Point::new(3800.0, 420.0));
    let outcome = c.on_transition(&CursorTransition::returned("macbook-pro", now), now);
    assert_eq!(
        outcome,
        CoordinatorOutcome::Created {
            display: DisplayId(1),
            center: Point::new(3800.0, 420.0)
        }
    );
}

#[derive(Debug, Clone)]
enum Op {
    Find,
    Shake,
    Left,
    Returned,
    Move(f64, f64),
    Tick(u64),
    HideAll,
    ToggleEnabled,
    DropSideDisplays,
    RestoreDisplays,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Find),
        2 => Just(Op::Shake),
        1 => Just(Op::Left),
        1 => Just(Op::Returned),
        4 => (-1500.0f64..4000.0, -100.0f64..1200.0).prop_map(|(x, y)| Op::Move(x, y)),
        4 => (1u64..2000).prop_map(Op::Tick),
        1 => Just(Op::HideAll),
        1 => Just(Op::ToggleEnabled),
        1 => Just(Op::DropSideDisplays),
        1 => Just(Op::RestoreDisplays),
    ]
}

proptest! {
    #[test]
    fn at_most_one_session_for_any_interleaving(ops in prop::collection::vec(op(), 1..120)) {
        let start = Instant::now();
        let (mut c, pointer) = build(triple(), Point::new(500.0, 500.0));
        let mut elapsed = 0u64;

        for op in ops {
            let now = start + Duration::from_millis(elapsed);
            match op {
                Op::Find => { c.find(now); }
                Op::Shake => { c.on_shake(now); }
                Op::Left => { c.on_transition(&CursorTransition::left("remote", now), now); }
                Op::Returned => { c.on_transition(&CursorTransition::returned("remote", now), now); }
                Op::Move(x, y) => pointer.move_to(Point::new(x, y)),
                Op::Tick(ms) => {
                    elapsed += ms;
                    c.tick(start + Duration::from_millis(elapsed));
                }
                Op::HideAll => { c.hide_all(); }
                Op::ToggleEnabled => {
                    let mut settings = c.settings().clone();
                    settings.highlight.enabled = !settings.highlight.enabled;
                    c.apply_settings(settings);
                }
                Op::DropSideDisplays => { c.refresh_topology(single()); }
                Op::RestoreDisplays => { c.refresh_topology(triple()); }
            }

            let live = c.renderer().live();
            prop_assert!(live.len() <= 1);
            prop_assert_eq!(live.len(), usize::from(c.session().is_some()));
            if let (Some(session), Some((handle, display))) = (c.session(), live.first()) {
                prop_assert_eq!(session.surface, *handle);
                prop_assert_eq!(session.display, *display);
            }
        }
        prop_assert!(c.renderer().peak_live() <= 1);
    }
}
