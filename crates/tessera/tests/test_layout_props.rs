use proptest::prelude::*;
use tessera::{
    Border, BorderKind, Element, Extent, NodeId, Offset, Tree,
    geom::Expanse,
    scroll::ScrollOptions,
};

/// One randomly positioned child description.
#[derive(Debug, Clone)]
struct Spec {
    left: Option<Offset>,
    top: Option<Offset>,
    right: Option<Offset>,
    bottom: Option<Offset>,
    width: Option<Extent>,
    height: Option<Extent>,
    border: bool,
    depth: usize,
}

/// Offsets weighted toward the interesting range, with full-range values,
/// percentages and centering mixed in.
fn offset() -> impl Strategy<Value = Offset> {
    prop_oneof![
        3 => (-10i32..40).prop_map(Offset::Cells),
        1 => any::<i32>().prop_map(Offset::Cells),
        2 => (-50f32..150.0, -10i32..10).prop_map(|(p, d)| Offset::Percent(p, d)),
        1 => (-1e9f32..1e9, any::<i32>()).prop_map(|(p, d)| Offset::Percent(p, d)),
        1 => Just(Offset::Center),
    ]
}

fn extent() -> impl Strategy<Value = Extent> {
    prop_oneof![
        3 => (0u32..50).prop_map(Extent::Cells),
        1 => any::<u32>().prop_map(Extent::Cells),
        2 => (0f32..200.0, -10i32..10).prop_map(|(p, d)| Extent::Percent(p, d)),
        1 => (-1e9f32..1e9, any::<i32>()).prop_map(|(p, d)| Extent::Percent(p, d)),
        1 => Just(Extent::Shrink),
    ]
}

fn spec() -> impl Strategy<Value = Spec> {
    (
        proptest::option::of(offset()),
        proptest::option::of(offset()),
        proptest::option::of(offset()),
        proptest::option::of(offset()),
        proptest::option::of(extent()),
        proptest::option::of(extent()),
        any::<bool>(),
        0usize..3,
    )
        .prop_map(|(left, top, right, bottom, width, height, border, depth)| Spec {
            left,
            top,
            right,
            bottom,
            width,
            height,
            border,
            depth,
        })
}

fn element(s: &Spec) -> Element {
    let mut e = Element::new().content("text\nmore text");
    e.position.left = s.left;
    e.position.top = s.top;
    e.position.right = s.right;
    e.position.bottom = s.bottom;
    e.position.width = s.width;
    e.position.height = s.height;
    if s.border {
        e = e.border(Border::new(BorderKind::Line));
    }
    e
}

/// Build a tree where each spec nests under the most recent node at the
/// previous depth.
fn build(specs: &[Spec]) -> (Tree, Vec<NodeId>) {
    let mut t = Tree::new(Expanse::new(40, 20));
    let root = t.root();
    let mut stack = vec![root];
    let mut ids = Vec::new();
    for s in specs {
        let depth = s.depth.min(stack.len() - 1);
        stack.truncate(depth + 1);
        let id = t.create_child(stack[depth], element(s)).unwrap();
        stack.push(id);
        ids.push(id);
    }
    (t, ids)
}

proptest! {
    #[test]
    fn placed_nodes_stay_inside_their_parent(specs in prop::collection::vec(spec(), 1..12)) {
        let (mut t, ids) = build(&specs);
        t.layout().unwrap();
        let screen = t.size().rect();
        for id in ids {
            let Some(r) = t.resolved(id).unwrap() else {
                continue;
            };
            prop_assert!(!r.rect.is_empty());
            prop_assert!(screen.contains_rect(&r.rect));
            let parent = t.parent(id).unwrap().unwrap();
            let pclip = t.resolved(parent).unwrap().and_then(|p| p.clip);
            prop_assert!(pclip.is_some());
            prop_assert!(pclip.unwrap().contains_rect(&r.rect));
            if let Some(c) = r.clip {
                prop_assert!(r.rect.contains_rect(&c));
            }
        }
    }

    #[test]
    fn scroll_state_stays_in_range(
        content in 0usize..40,
        height in 1u32..10,
        steps in prop::collection::vec(-15i32..15, 1..20),
        always in any::<bool>(),
    ) {
        let mut t = Tree::new(Expanse::new(20, 12));
        let root = t.root();
        let opts = if always { ScrollOptions::always() } else { ScrollOptions::default() };
        let text = (0..content).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let list = t
            .create_child(root, Element::new().height(height).scrollable(opts).content(text))
            .unwrap();
        for d in steps {
            t.scroll(list, d).unwrap();
            let s = t.scroll_state(list).unwrap().unwrap();
            prop_assert!(s.base() <= s.max_base());
            prop_assert!(s.offset() < s.visible_height().max(1));
            prop_assert!(s.perc() >= 0.0 && s.perc() <= 100.0);
        }
    }
}

#[test]
fn scrolling_round_trips() {
    let mut t = Tree::new(Expanse::new(10, 10));
    let root = t.root();
    let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
    let list = t
        .create_child(
            root,
            Element::new()
                .height(5)
                .scrollable(ScrollOptions::always())
                .content(text),
        )
        .unwrap();
    assert_eq!(t.scroll_height(list).unwrap(), 30);
    assert!(t.scroll(list, 7).unwrap());
    assert_eq!(t.scroll_base(list).unwrap(), 7);
    assert!(t.scroll(list, -7).unwrap());
    assert_eq!(t.scroll_base(list).unwrap(), 0);

    assert!(t.set_scroll_perc(list, 100.0).unwrap());
    assert_eq!(t.scroll_base(list).unwrap(), 25);
    assert_eq!(t.scroll_perc(list).unwrap(), 100.0);
    assert!(!t.scroll(list, 3).unwrap());

    assert!(t.reset_scroll(list).unwrap());
    assert_eq!(t.scroll_position(list).unwrap(), 0);
    assert!(!t.reset_scroll(list).unwrap());
}

#[test]
fn shrinking_content_pulls_the_window_back() {
    let mut t = Tree::new(Expanse::new(10, 10));
    let root = t.root();
    let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
    let list = t
        .create_child(
            root,
            Element::new()
                .height(5)
                .scrollable(ScrollOptions::always())
                .content(text),
        )
        .unwrap();
    t.scroll_to(list, 20).unwrap();
    t.set_content(list, "a\nb\nc\nd\ne\nf\ng").unwrap();
    assert_eq!(t.scroll_base(list).unwrap(), 2);
}
