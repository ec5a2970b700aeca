//! AJAX propagation, auto-redraw and snippet invalidation.

use arbor::{AjaxFlags, NodeId, NodePath};

mod common;
use common::fixture;

#[test]
fn excluded_child_is_not_enabled() {
    let mut fx = fixture(false);
    fx.tree.enable_ajax(NodeId::ROOT, true, &["b"]);

    let a = fx.tree.child(NodeId::ROOT, "a").unwrap();
    let b = fx.tree.child(NodeId::ROOT, "b").unwrap();

    assert!(fx.tree.is_ajax_enabled(a));
    assert!(!fx.tree.is_ajax_enabled(b));
}

#[test]
fn exclusions_do_not_depend_on_call_order() {
    // disable first, enable afterwards
    let mut fx = fixture(false);
    fx.tree.disable_ajax_for(NodeId::ROOT, &["b"]);
    fx.tree.enable_ajax(NodeId::ROOT, true, &[]);
    let a = fx.tree.child(NodeId::ROOT, "a").unwrap();
    let b = fx.tree.child(NodeId::ROOT, "b").unwrap();
    assert!(fx.tree.is_ajax_enabled(a));
    assert!(!fx.tree.is_ajax_enabled(b));

    // enable first, disable afterwards
    let mut fx = fixture(false);
    fx.tree.enable_ajax(NodeId::ROOT, true, &["a"]);
    fx.tree.disable_ajax_for(NodeId::ROOT, &["b"]);
    let a = fx.tree.child(NodeId::ROOT, "a").unwrap();
    let b = fx.tree.child(NodeId::ROOT, "b").unwrap();
    let child = fx.tree.child(NodeId::ROOT, "child").unwrap();
    assert!(!fx.tree.is_ajax_enabled(a));
    assert!(!fx.tree.is_ajax_enabled(b));
    assert!(fx.tree.is_ajax_enabled(child));

    let excluded: Vec<_> = fx.tree.state(NodeId::ROOT).ajax().disabled_for().collect();
    assert_eq!(excluded, ["a", "b"]);
}

#[test]
fn child_type_must_be_ajax_aware() {
    let mut fx = fixture(false);
    fx.tree.enable_ajax(NodeId::ROOT, true, &[]);

    let plain = fx.tree.child(NodeId::ROOT, "plain").unwrap();

    assert!(!fx.tree.is_ajax_enabled(plain));
}

#[test]
fn propagation_is_one_level_at_a_time() {
    let mut fx = fixture(false);
    fx.tree.enable_ajax(NodeId::ROOT, true, &["b"]);

    let deep = fx.tree.lookup(NodeId::ROOT, &NodePath::parse("a-child")).unwrap();
    let cut = fx.tree.lookup(NodeId::ROOT, &NodePath::parse("b-child")).unwrap();

    assert!(fx.tree.is_ajax_enabled(deep));
    assert!(!fx.tree.is_ajax_enabled(cut));
}

#[test]
fn multiplier_passes_ajax_to_its_rows() {
    let mut fx = fixture(true);
    fx.tree.enable_ajax(NodeId::ROOT, false, &[]);

    let multiplied = fx.tree.child(NodeId::ROOT, "multiplied").unwrap();
    let row = fx.tree.child(multiplied, "7").unwrap();

    assert!(fx.tree.is_ajax_enabled(multiplied));
    assert!(fx.tree.is_ajax_enabled(row));
    assert_eq!(fx.tree.path(row), &NodePath::parse("multiplied-7"));
    // Rows redraw themselves; the container itself is not renderable.
    assert!(fx.tree.is_control_invalid(row, None));
    assert!(fx.tree.state(multiplied).ajax().auto_redraw());
}

#[test]
fn auto_redraw_only_on_ajax_requests() {
    let mut fx = fixture(true);
    fx.tree.enable_ajax(NodeId::ROOT, true, &[]);
    let a = fx.tree.child(NodeId::ROOT, "a").unwrap();
    assert_eq!(
        fx.tree.state(a).ajax().flags(),
        AjaxFlags::ENABLED | AjaxFlags::AUTO_REDRAW
    );
    assert!(fx.tree.is_control_invalid(a, None));
    assert!(fx.tree.is_control_invalid(a, Some("anything")));
    // The root sees the invalid descendant.
    assert!(fx.tree.is_control_invalid(NodeId::ROOT, None));

    let mut fx = fixture(false);
    fx.tree.enable_ajax(NodeId::ROOT, true, &[]);
    let a = fx.tree.child(NodeId::ROOT, "a").unwrap();
    assert!(fx.tree.is_ajax_enabled(a));
    assert!(!fx.tree.is_control_invalid(a, None));
}

#[test]
fn redraw_nothing_withdraws_every_mark() {
    let mut fx = fixture(true);
    fx.tree.enable_ajax(NodeId::ROOT, true, &[]);
    let a = fx.tree.child(NodeId::ROOT, "a").unwrap();
    let deep = fx.tree.child(a, "child").unwrap();
    fx.tree.redraw_control(NodeId::ROOT, Some("header"), true);
    assert!(fx.tree.is_control_invalid(deep, None));

    fx.tree.redraw_nothing();

    for id in [NodeId::ROOT, a, deep] {
        assert!(!fx.tree.is_control_invalid(id, None));
    }
    // Still enabled; only this request's marks are gone.
    assert!(fx.tree.is_ajax_enabled(deep));
}

#[test]
fn snippet_marks() {
    let mut fx = fixture(false);
    let a = fx.tree.child(NodeId::ROOT, "a").unwrap();

    fx.tree.redraw_control(a, Some("rows"), true);
    assert!(fx.tree.is_control_invalid(a, Some("rows")));
    assert!(!fx.tree.is_control_invalid(a, Some("footer")));

    fx.tree.redraw_control(a, None, true);
    fx.tree.redraw_control(a, Some("footer"), false);
    assert!(fx.tree.is_control_invalid(a, Some("header")));
    assert!(!fx.tree.is_control_invalid(a, Some("footer")));

    fx.tree.redraw_control(a, None, false);
    assert!(!fx.tree.is_control_invalid(a, None));
    assert!(!fx.tree.is_control_invalid(a, Some("rows")));
}

#[test]
fn disable_leaves_children_alone() {
    let mut fx = fixture(false);
    fx.tree.enable_ajax(NodeId::ROOT, true, &[]);
    let a = fx.tree.child(NodeId::ROOT, "a").unwrap();

    fx.tree.disable_ajax(NodeId::ROOT);
    let b = fx.tree.child(NodeId::ROOT, "b").unwrap();

    assert!(!fx.tree.is_ajax_enabled(NodeId::ROOT));
    assert!(fx.tree.is_ajax_enabled(a));
    assert!(!fx.tree.is_ajax_enabled(b));
}
