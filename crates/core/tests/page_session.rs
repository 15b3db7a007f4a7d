//! Integration test: wire a whole landing page into a Coordinator and drive
//! it through load, scrolling, reveals, resizes and the mobile menu.

use scroll_fx_core::config::{EffectsConfig, RevealGroup};
use scroll_fx_core::parallax::ParallaxTarget;
use scroll_fx_core::reveal::RevealState;
use scroll_fx_core::testing::{FakeObserver, StaticLayout};
use scroll_fx_core::{Coordinator, DomCommand, IntersectionEntry, MenuEvent, MenuState};
use scroll_fx_protocol::{ClassToken, ElementId};

const NAV: ElementId = ElementId(1);
const HERO_IMG: ElementId = ElementId(2);
const MENU: ElementId = ElementId(3);
const OVERLAY: ElementId = ElementId(4);
const CARD_GRID: ElementId = ElementId(5);
const HEADING: ElementId = ElementId(6);

const SECTIONS: [(u32, &str, f64, f64); 3] = [
    (20, "hero", 0.0, 300.0),
    (21, "services", 300.0, 700.0),
    (22, "contact", 700.0, 1000.0),
];

fn group_for(config: &EffectsConfig, selector: &str) -> RevealGroup {
    config
        .reveal
        .groups
        .iter()
        .find(|g| g.selectors.iter().any(|s| s == selector))
        .cloned()
        .expect("default reveal group")
}

fn page() -> Coordinator {
    let config = EffectsConfig::default();
    let generic = group_for(&config, ".animate-fade-in");
    let mut c = Coordinator::new(config);
    c.set_nav_bar(NAV);
    c.set_menu(Some(MENU), Some(OVERLAY));
    c.register_parallax(ParallaxTarget::plain(HERO_IMG, -0.5));
    c.register_reveal(CARD_GRID, &generic, Some(4));
    c.register_reveal(HEADING, &generic, None);
    for (i, (id, name, _, _)) in SECTIONS.iter().enumerate() {
        c.add_section(ElementId(*id), name);
        c.add_nav_link(ElementId(10 + i as u32), &format!("#{name}"));
    }
    c
}

fn layout(scroll_y: f64) -> StaticLayout {
    let mut l =
        StaticLayout::new(scroll_y, 800.0, 1800.0).with_document_box(HERO_IMG, 0.0, 600.0);
    for (id, _, top, bottom) in SECTIONS {
        l = l.with_document_box(ElementId(id), top, bottom - top);
    }
    l
}

fn has(cmds: &[DomCommand], target: ElementId, class: ClassToken) -> bool {
    cmds.contains(&DomCommand::AddClass { target, class })
}

#[test]
fn scroll_through_page() {
    let mut c = page();
    let mut obs = FakeObserver::default();
    assert!(c.attach(&mut obs), "attach should request the first frame");
    assert_eq!(obs.observed_count(), 2);

    // Initial paint at the top of the page.
    let cmds = c.on_frame(&layout(0.0));
    assert!(!c.is_scrolled());
    assert!(c.active_section().is_some_and(|f| f == "hero"));
    assert!(cmds.contains(&DomCommand::SetTranslateY {
        target: HERO_IMG,
        offset: 0.0
    }));

    // A burst of scroll events lands in a single frame.
    assert!(c.on_scroll());
    for _ in 0..10 {
        assert!(!c.on_scroll());
    }
    let cmds = c.on_frame(&layout(200.0));
    assert!(has(&cmds, NAV, ClassToken::Scrolled));
    assert!(cmds.contains(&DomCommand::SetTranslateY {
        target: HERO_IMG,
        offset: -100.0
    }));
    assert!(c.active_section().is_some_and(|f| f == "services"));

    // Scan line at 750 falls in the last section.
    c.on_scroll();
    c.on_frame(&layout(550.0));
    assert!(c.active_section().is_some_and(|f| f == "contact"));

    // Back to the top: scrolled flag clears.
    c.on_scroll();
    let cmds = c.on_frame(&layout(40.0));
    assert!(cmds.contains(&DomCommand::RemoveClass {
        target: NAV,
        class: ClassToken::Scrolled
    }));
    assert!(c.active_section().is_some_and(|f| f == "hero"));
}

#[test]
fn reveals_are_one_shot() {
    let mut c = page();
    let mut obs = FakeObserver::default();
    c.attach(&mut obs);

    let entry = |target, ratio: f64| IntersectionEntry {
        target,
        is_intersecting: ratio > 0.0,
        ratio,
    };

    let cmds = c.on_intersection(&[entry(CARD_GRID, 0.05), entry(HEADING, 0.4)], &mut obs);
    assert!(has(&cmds, HEADING, ClassToken::InView));
    assert!(!has(&cmds, CARD_GRID, ClassToken::InView));
    assert!(obs.was_unobserved(HEADING));
    assert!(obs.is_observing(CARD_GRID));

    let cmds = c.on_intersection(&[entry(CARD_GRID, 0.15)], &mut obs);
    let terminal = cmds
        .iter()
        .filter(|cmd| matches!(cmd, DomCommand::AddClass { .. }))
        .count();
    assert_eq!(terminal, 1);
    let delays: Vec<u32> = cmds
        .iter()
        .filter_map(|cmd| match cmd {
            DomCommand::SetChildTransitionDelay { delay_ms, .. } => Some(*delay_ms),
            _ => None,
        })
        .collect();
    assert_eq!(delays, vec![0, 100, 200, 300]);

    // Scrolling away and back never re-triggers or reverts.
    assert!(
        c.on_intersection(&[entry(CARD_GRID, 0.0), entry(CARD_GRID, 0.9)], &mut obs)
            .is_empty()
    );
    assert_eq!(c.reveal_state(CARD_GRID), Some(RevealState::InView));
    assert_eq!(c.reveal_state(HEADING), Some(RevealState::InView));
}

#[test]
fn resize_burst_settles_once() {
    let mut c = page();
    let mut obs = FakeObserver::default();
    c.attach(&mut obs);

    let tickets: Vec<_> = (0..5).filter_map(|_| c.on_resize()).collect();
    let recomputes = tickets
        .iter()
        .filter(|t| !c.on_resize_timeout(**t, &layout(300.0)).is_empty())
        .count();
    assert_eq!(recomputes, 1);
}

#[test]
fn mobile_menu_round_trip() {
    let mut c = page();
    let mut obs = FakeObserver::default();
    c.attach(&mut obs);

    let cmds = c.on_menu(MenuEvent::ButtonClick, "");
    assert_eq!(c.menu_state(), MenuState::Open);
    assert!(cmds.contains(&DomCommand::SetBodyOverflow {
        value: "hidden".into()
    }));
    assert!(has(&cmds, MENU, ClassToken::Active));
    assert!(has(&cmds, OVERLAY, ClassToken::Active));

    let cmds = c.on_menu(MenuEvent::LinkClick, "hidden");
    assert_eq!(c.menu_state(), MenuState::Closed);
    assert!(cmds.contains(&DomCommand::SetBodyOverflow { value: String::new() }));

    c.detach(&mut obs);
    assert!(c.on_menu(MenuEvent::ButtonClick, "").is_empty());
    assert_eq!(c.menu_state(), MenuState::Closed);
}

#[test]
fn hero_parallax_freezes_past_cap() {
    let config = EffectsConfig::default();
    let rule = config
        .parallax
        .iter()
        .find(|r| r.selector == ".hero-background img")
        .cloned()
        .expect("hero rule");
    let mut c = Coordinator::new(config);
    c.register_parallax(ParallaxTarget {
        max_scroll: rule.max_scroll,
        ..ParallaxTarget::plain(HERO_IMG, rule.rate)
    });
    let mut obs = FakeObserver::default();
    c.attach(&mut obs);

    let at = |scroll_y| {
        StaticLayout::new(scroll_y, 800.0, 4000.0).with_document_box(HERO_IMG, 0.0, 1200.0)
    };
    let moved = |cmds: &[DomCommand]| {
        cmds.iter()
            .any(|cmd| matches!(cmd, DomCommand::SetTranslateY { target, .. } if *target == HERO_IMG))
    };

    let cmds = c.on_frame(&at(800.0));
    assert!(cmds.contains(&DomCommand::SetTranslateY {
        target: HERO_IMG,
        offset: -400.0
    }));

    // Still on screen, but past the cap: the last transform stays.
    c.on_scroll();
    assert!(!moved(&c.on_frame(&at(900.0))));
    c.on_scroll();
    assert!(!moved(&c.on_frame(&at(1000.0))));
}

#[test]
fn service_cards_stagger_within_a_batch() {
    let config = EffectsConfig::default();
    let cards = group_for(&config, ".service-card");
    let mut c = Coordinator::new(config);
    let ids = [ElementId(30), ElementId(31), ElementId(32)];
    for id in ids {
        assert!(c.register_reveal(id, &cards, None));
    }
    let mut obs = FakeObserver::default();
    c.attach(&mut obs);

    let batch: Vec<IntersectionEntry> = ids
        .iter()
        .map(|&target| IntersectionEntry {
            target,
            is_intersecting: true,
            ratio: 0.3,
        })
        .collect();
    let cmds = c.on_intersection(&batch, &mut obs);
    let delays: Vec<(ElementId, u32)> = cmds
        .iter()
        .filter_map(|cmd| match cmd {
            DomCommand::SetTransitionDelay { target, delay_ms } => Some((*target, *delay_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(delays, vec![(ids[0], 0), (ids[1], 150), (ids[2], 300)]);
    for id in ids {
        assert!(has(&cmds, id, ClassToken::InView));
        assert!(obs.was_unobserved(id));
    }
}
