use rand::prelude::random;

use crate::node::Color;
use crate::snapshot::Snapshot;
use crate::tree::RbTree;
use crate::validate::{validate, Property};

#[test]
fn test_empty() {
    let tree: RbTree<i64> = RbTree::new("test-validate");
    let report = tree.validate();
    assert!(report.ok());
    assert_eq!(report.black_height(), Some(0));
    assert_eq!(report.height(), 0);
    assert_eq!(report.node_count(), 0);
    assert_eq!(report.depths().samples(), 1);

    let report = validate(&fixture(""));
    assert!(report.ok());
    assert_eq!(report.height(), 0);
}

#[test]
fn test_valid() {
    let report = validate(&fixture("20B(10R,30R)"));
    assert!(report.ok());
    assert_eq!(report.black_height(), Some(1));
    assert_eq!(report.height(), 2);
    assert_eq!(report.node_count(), 3);
    assert_eq!(report.red_count(), 2);
    assert_eq!(report.black_count(), 1);
    assert_eq!(report.depths().samples(), 4);
    assert_eq!(report.depths().min(), 2);
    assert_eq!(report.depths().max(), 2);

    let report = validate(&fixture("20B(10B(5R,-),30B)"));
    assert!(report.ok());
    assert_eq!(report.black_height(), Some(2));
    assert_eq!(report.height(), 3);
}

#[test]
fn test_root_black() {
    let report = validate(&fixture("20R(10B,30B)"));
    assert!(!report.ok());
    assert_eq!(report.violations().len(), 1);
    let violation = &report.violations()[0];
    assert_eq!(violation.property, Property::RootBlack);
    assert_eq!(violation.key, 20);
    assert_eq!(violation.to_string(), "property 2 at 20: root is RED");
    // a red root does not count, black-height is still defined.
    assert_eq!(report.black_height(), Some(2));
}

#[test]
fn test_red_red() {
    let report = validate(&fixture("20B(10R(5R,-),30R)"));
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].property, Property::RedRed);
    assert_eq!(report.violations()[0].key, 5);
    assert_eq!(report.black_height(), Some(1));

    // every red-red pair is reported.
    let report = validate(&fixture("20B(10R(5R,15R),30R(25R,35R))"));
    let keys: Vec<i64> = report
        .violations()
        .iter()
        .filter(|v| v.property == Property::RedRed)
        .map(|v| v.key)
        .collect();
    assert_eq!(keys, vec![5, 15, 25, 35]);
    assert!(report.violates(Property::RedRed));
    assert!(!report.violates(Property::BlackHeight));
}

#[test]
fn test_black_height() {
    let report = validate(&fixture("20B(10B(5B,-),30B)"));
    assert_eq!(report.violations().len(), 1);
    let violation = &report.violations()[0];
    assert_eq!(violation.property, Property::BlackHeight);
    assert_eq!(violation.key, 10);
    assert_eq!(violation.detail, "left: 2 right: 1");
    assert_eq!(report.black_height(), None);

    // only the first mismatch is reported.
    let report = validate(&fixture("20B(10B(5B,-),30B(-,35B))"));
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].key, 10);
    assert_eq!(report.black_height(), None);
}

#[test]
fn test_ordering() {
    let report = validate(&fixture("20B(30R,10R)"));
    let keys: Vec<i64> = report
        .violations()
        .iter()
        .filter(|v| v.property == Property::Ordering)
        .map(|v| v.key)
        .collect();
    assert_eq!(keys, vec![20, 10]);
    assert_eq!(report.violations()[0].detail, "follows 30 in-order");
    assert_eq!(Property::Ordering.number(), None);

    // equal keys are in order.
    assert!(validate(&fixture("20B(20R,20R)")).ok());
}

#[test]
fn test_mixed() {
    let report = validate(&fixture("20R(10R,30B(25B,-))"));
    assert!(report.violates(Property::RootBlack));
    assert!(report.violates(Property::RedRed));
    assert!(report.violates(Property::BlackHeight));
    assert!(!report.violates(Property::Ordering));
    assert_eq!(Property::BlackHeight.number(), Some(5));
}

#[test]
fn test_read_only() {
    let tree = RbTree::from_snapshot("test-validate", &fixture("20R(10R,30B(25B,-))"));
    let before = tree.snapshot();
    let first = tree.validate();
    assert_eq!(tree.snapshot(), before);
    assert_eq!(tree.validate(), first);

    let snap = fixture("20B(10R,30R)");
    let copy = snap.clone();
    validate(&snap);
    assert_eq!(snap, copy);
}

#[test]
fn test_tree_and_snapshot_agree() {
    let mut tree: RbTree<i64> = RbTree::new("test-validate");
    for _ in 0..300 {
        tree.insert(random_key(500)).unwrap();
    }
    let (a, b) = (tree.validate(), validate(&tree.snapshot()));
    assert!(a.ok());
    assert_eq!(a, b);
    let snap = tree.snapshot();
    for at in 0..snap.len() {
        let mut broken = snap.clone();
        let color = broken.node(at).color;
        broken.set_color(at, if color == Color::Red { Color::Black } else { Color::Red });
        assert!(!validate(&broken).ok(), "flip at {}", at);
    }
}

#[test]
fn test_deep_chain() {
    // all BLACK right chain, built bottom-up.
    let n = 200_000;
    let mut snap: Snapshot<i64> = Snapshot::new();
    let mut below = None;
    for key in (0..n).rev() {
        below = Some(snap.push(key, Color::Black, None, below));
    }
    snap.set_root(below);

    let report = validate(&snap);
    assert!(!report.ok());
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].property, Property::BlackHeight);
    assert_eq!(report.violations()[0].key, n - 2);
    assert_eq!(report.black_height(), None);
    assert_eq!(report.height(), n as usize);
    assert_eq!(report.node_count(), n as usize);
    assert_eq!(report.depths().max(), n as usize);

    let tree = RbTree::from_snapshot("test-validate", &snap);
    let report = tree.validate();
    assert!(!report.ok());
    assert_eq!(report.node_count(), n as usize);
}

include!("./ref_test.rs");
