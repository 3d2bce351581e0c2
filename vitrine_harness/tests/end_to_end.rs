// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full frame-loop runs of the showcase against the fake scene.

use kurbo::{Point, Size};
use vitrine_core::time::Duration;
use vitrine_core::trace::{DiagnosticKind, ScrollSource, Tracer, TransitionPhase};
use vitrine_core::view::{BackButton, Project, ProjectItem, Showcase, ShowcaseConfig};
use vitrine_debug::recorder::{RecordedEvent, RecorderSink, decode};
use vitrine_harness::{FakeScene, FrameDriver, PacingTracker};

fn projects(n: usize) -> Vec<Project> {
    (0..n)
        .map(|i| {
            Project::new(format!("p{i}"), format!("Project {i}"))
                .with_item(ProjectItem::new(300.0))
                .with_item(ProjectItem::new(300.0))
                .with_item(ProjectItem::new(180.0))
        })
        .collect()
}

fn setup(cards: usize, viewport: Size) -> (Showcase, FakeScene, FrameDriver) {
    let showcase = Showcase::new(ShowcaseConfig::default(), projects(cards), viewport).unwrap();
    let scene = FakeScene::for_showcase(&showcase);
    (showcase, scene, FrameDriver::default())
}

/// Scrolls the page to its lower bound with wheel momentum.
fn scroll_to_bottom(showcase: &mut Showcase, scene: &mut FakeScene, driver: &mut FrameDriver) {
    showcase.set_context_available(true);
    showcase.wheel(1.0e6);
    for _ in 0..240 {
        let _ = driver.frame(showcase, scene, &mut Tracer::none());
    }
}

#[test]
fn sixteen_cards_wrap_two_per_line_at_1024() {
    let (mut showcase, mut scene, mut driver) = setup(16, Size::new(1024.0, 768.0));
    let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());

    // 1024 - 2 * 40 leaves 944; two cards and one gap take 660.
    for (i, &card) in showcase.cards().iter().enumerate() {
        let x = if i % 2 == 0 { 142.0 } else { 502.0 };
        let y = (i / 2) as f64 * 360.0;
        assert_eq!(
            scene.element(card).unwrap().position,
            Some(Point::new(x, y)),
            "card {i}"
        );
    }
    let body = showcase.tree().computed_size(showcase.body());
    assert_eq!(body.height, 8.0 * 300.0 + 7.0 * 60.0);
}

#[test]
fn layout_is_idempotent_across_quiet_frames() {
    let (mut showcase, mut scene, mut driver) = setup(5, Size::new(1024.0, 768.0));
    let first = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    assert!(!first.layout.passes.is_empty());
    let second = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    assert!(second.layout.is_empty(), "got {:?}", second.layout);
}

#[test]
fn cards_fade_out_staggered_then_project_fades_in() {
    let (mut showcase, mut scene, mut driver) = setup(16, Size::new(1024.0, 768.0));
    let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    scroll_to_bottom(&mut showcase, &mut scene, &mut driver);
    assert!(showcase.scroll_offset() > 0.0);

    let selected_at = driver.now();
    showcase.select(Some("p3"), selected_at, &scene);

    let mut recorder = RecorderSink::new();
    let mut swapped = false;
    for _ in 0..200 {
        let out = driver.frame(&mut showcase, &mut scene, &mut Tracer::new(&mut recorder));
        if out.swapped {
            swapped = true;
            break;
        }
    }
    assert!(swapped, "cards never settled");
    assert_eq!(showcase.scroll_offset(), 0.0);

    // Spread stagger: 500 ms over 16 cards.
    let started: Vec<_> = decode(recorder.as_bytes())
        .filter_map(|e| match e {
            RecordedEvent::Transition(t) if t.phase == TransitionPhase::Started => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(started.len(), 16);
    for (i, event) in started.iter().enumerate() {
        assert_eq!(event.target, u32::try_from(i).unwrap());
        assert_eq!(event.at, selected_at + Duration::from_micros(31_250) * i as u64);
    }
    for i in 0..16 {
        let card = scene.target(showcase.card_target(i)).unwrap();
        assert_eq!(card.opacity, 0.0, "card {i}");
        assert_eq!(card.depth, -20.0, "card {i}");
    }

    // Three items: 0, 150, and 300 ms delays, 350 ms each.
    for _ in 0..60 {
        let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    }
    assert_eq!(showcase.project_items().len(), 3);
    for j in 0..3 {
        let item = scene.target(showcase.project_item_target(j)).unwrap();
        assert_eq!(item.opacity, 1.0, "item {j}");
        assert_eq!(item.depth, 0.0, "item {j}");
    }
    let items = showcase.project_items();
    assert_eq!(scene.element(items[1]).unwrap().position, Some(Point::new(0.0, 360.0)));
    assert_eq!(scene.element(items[2]).unwrap().position, Some(Point::new(0.0, 720.0)));
    assert!(
        showcase
            .cards()
            .iter()
            .all(|&c| scene.element(c).unwrap().position.is_none()),
        "cards are skipped"
    );
    assert_eq!(showcase.title(), "Project: Project 3");
    assert_eq!(showcase.back_button(), BackButton::Floating);
}

#[test]
fn deselect_brings_cards_back() {
    let (mut showcase, mut scene, mut driver) = setup(4, Size::new(1024.0, 768.0));
    let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    showcase.select(Some("p0"), driver.now(), &scene);
    let (_, swapped) = driver.run_until(&mut showcase, &mut scene, 200, |_, out| out.swapped);
    assert!(swapped);
    for _ in 0..60 {
        let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    }

    showcase.select(None, driver.now(), &scene);
    let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    assert!(
        showcase
            .cards()
            .iter()
            .all(|&c| scene.element(c).unwrap().position.is_some()),
        "cards are laid out again right away"
    );

    let (_, settled) =
        driver.run_until(&mut showcase, &mut scene, 200, |s, _| s.active_transitions() == 0);
    assert!(settled);
    for i in 0..4 {
        let card = scene.target(showcase.card_target(i)).unwrap();
        assert_eq!(card.opacity, 1.0, "card {i}");
        assert_eq!(card.depth, 0.0, "card {i}");
    }
    for j in 0..3 {
        let item = scene.target(showcase.project_item_target(j)).unwrap();
        assert_eq!(item.opacity, 0.0, "item {j}");
    }
    assert_eq!(showcase.back_button(), BackButton::Hidden);
    assert_eq!(showcase.title(), "Showcase");
}

#[test]
fn reselecting_during_fade_out_takes_over() {
    let (mut showcase, mut scene, mut driver) = setup(4, Size::new(1024.0, 768.0));
    let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    showcase.select(Some("p0"), driver.now(), &scene);
    for _ in 0..10 {
        let out = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
        assert!(!out.swapped);
    }

    // Clearing before the swap cancels it: cards never leave the layout.
    showcase.select(None, driver.now(), &scene);
    let (_, swapped) = driver.run_until(&mut showcase, &mut scene, 150, |_, out| out.swapped);
    assert!(!swapped);
    assert!(showcase.state().show_cards());
}

#[test]
fn shrinking_content_clamps_scroll_offset() {
    let (mut showcase, mut scene, mut driver) = setup(16, Size::new(1024.0, 768.0));
    let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    scroll_to_bottom(&mut showcase, &mut scene, &mut driver);
    // 8 lines: 2820 + title (60) + gap (60) + padding (80).
    assert_eq!(showcase.scroll_offset(), 3020.0 - 768.0);

    // Four per line at 1800: 4 lines, 1380 high.
    showcase.set_viewport(Size::new(1800.0, 768.0));
    let out = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    assert_eq!(showcase.scroll_offset(), 1580.0 - 768.0);
    assert!(
        out.scroll
            .updates
            .iter()
            .any(|u| u.source == ScrollSource::Clamp),
        "got {:?}",
        out.scroll.updates
    );
    let thumb = showcase.thumb();
    assert!(thumb.is_visible());
    assert!(thumb.offset + thumb.extent <= 768.0 + 1e-9);
}

#[test]
fn narrow_viewport_puts_back_button_inline() {
    let (mut showcase, mut scene, mut driver) = setup(2, Size::new(800.0, 600.0));
    showcase.set_header_width(200.0);
    showcase.select(Some("p1"), driver.now(), &scene);
    let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());

    assert_eq!(showcase.back_button(), BackButton::Inline);
    let tree = showcase.tree();
    // Title row content: 60 + 20 + 200 = 280 centered in 720.
    assert_eq!(
        tree.computed_position(showcase.back_button_node()),
        Some(Point::new(220.0, 0.0))
    );
    assert_eq!(
        tree.computed_position(showcase.header()),
        Some(Point::new(300.0, 0.0))
    );
}

#[test]
fn unknown_slug_is_reported_through_the_tracer() {
    let (mut showcase, mut scene, mut driver) = setup(2, Size::new(1024.0, 768.0));
    showcase.select(Some("nope"), driver.now(), &scene);
    let mut recorder = RecorderSink::new();
    let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::new(&mut recorder));

    let diagnostics: Vec<_> = decode(recorder.as_bytes())
        .filter_map(|e| match e {
            RecordedEvent::Diagnostic(d) => Some(d),
            _ => None,
        })
        .collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnknownProject);
    assert_eq!(diagnostics[0].field, "slug");
    assert!(showcase.selected().is_none());
}

#[test]
fn frame_summaries_feed_pacing() {
    let (mut showcase, mut scene, mut driver) = setup(2, Size::new(1024.0, 768.0));
    let mut pacing = PacingTracker::<16>::default();
    let mut report = None;
    for i in 0..30 {
        let out = if i == 10 {
            let late = Duration::from_millis(50);
            driver.frame_after(late, &mut showcase, &mut scene, &mut Tracer::none())
        } else {
            driver.frame(&mut showcase, &mut scene, &mut Tracer::none())
        };
        assert_eq!(out.summary.frame_index, i);
        report = Some(pacing.observe(&out.summary));
    }
    let report = report.unwrap();
    assert_eq!(report.total_frames, 30);
    assert_eq!(report.late_frames, 1);
}

#[test]
fn page_pose_reaches_the_scene() {
    let (mut showcase, mut scene, mut driver) = setup(2, Size::new(1000.0, 800.0));
    showcase.pointer_hover(Point::new(0.0, 800.0));
    let out = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    assert_eq!(scene.page_pose(), out.pose);
    assert!(out.pose.rotation_x < 0.0 && out.pose.rotation_y < 0.0, "got {:?}", out.pose);

    for _ in 0..600 {
        let _ = driver.frame(&mut showcase, &mut scene, &mut Tracer::none());
    }
    let pose = scene.page_pose();
    assert_eq!((pose.rotation_x, pose.rotation_y), (-2.5, -2.5));
    assert_eq!(pose.light, Point::new(0.0, 800.0));
}
