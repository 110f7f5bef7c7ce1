use rand::prelude::random;

use crate::delete::{DeleteCase, Deficit};
use crate::error::Error;
use crate::node::{Color, NodeId, Side};
use crate::snapshot::Snapshot;
use crate::step::{Action, Fixup, Operation, OperationTrace, StepKind};
use crate::tree::RbTree;

fn cases_of(trace: &OperationTrace<i64>) -> Vec<(u8, bool)> {
    trace.cases().iter().map(|tag| (tag.number, tag.mirrored)).collect()
}

fn load(text: &str) -> RbTree<i64> {
    let tree = RbTree::from_snapshot("test-delete", &fixture(text));
    assert!(tree.validate().ok(), "fixture {}", text);
    tree
}

#[test]
fn test_delete_red_successor() {
    let mut tree = RbTree::build("test-delete", 1..=7).unwrap();
    let trace = tree.delete(&4).unwrap();

    assert_eq!(trace.operation(), Operation::Delete);
    assert_eq!(*trace.key(), 4);
    // successor 5 is RED, splicing it out needs no fixup.
    assert!(trace.cases().is_empty());
    assert_eq!(trace.count(StepKind::ColorFlip), 0);
    assert_eq!(render(trace.before()), "2B(1B,4R(3B,6B(5R,7R)))");
    assert_eq!(render(trace.after()), "2B(1B,5R(3B,6B(-,7R)))");

    let report = tree.validate();
    assert!(report.ok());
    assert_eq!(report.black_height(), Some(2));
    assert_eq!(tree.len(), 6);
    assert!(!tree.contains(&4));
}

#[test]
fn test_delete_red_sibling() {
    let mut tree = RbTree::build("test-delete", 1..=7).unwrap();
    let trace = tree.delete(&1).unwrap();
    assert_eq!(cases_of(&trace), vec![(1, false), (2, false), (0, false)]);
    assert_eq!(trace.count(StepKind::RotateLeft), 1);
    assert_eq!(render(trace.after()), "4B(2B(-,3R),6B(5R,7R))");
    assert!(tree.validate().ok());
    assert_eq!(tree.validate().black_height(), Some(2));
}

#[test]
fn test_delete_compare() {
    let mut tree = RbTree::build("test-delete", 1..=7).unwrap();
    let (n2, n4, n6) = (
        tree.search(&2).unwrap(),
        tree.search(&4).unwrap(),
        tree.search(&6).unwrap(),
    );
    let trace = tree.delete(&6).unwrap();
    let compares: Vec<(NodeId, Option<Side>)> = trace
        .iter()
        .filter_map(|s| match s.action() {
            Action::Compare { node, went } => Some((*node, *went)),
            _ => None,
        })
        .collect();
    assert_eq!(
        compares,
        vec![(n2, Some(Side::Right)), (n4, Some(Side::Right)), (n6, None)]
    );
    assert_eq!(trace.get(2).unwrap().note(), Some("6 == 6, found"));
    assert!(tree.validate().ok());
}

#[test]
fn test_delete_not_found() {
    let mut tree = RbTree::build("test-delete", 1..=7).unwrap();
    let before = tree.snapshot();
    assert_eq!(tree.delete(&99), Err(Error::NotFound(99)));
    assert_eq!(tree.snapshot(), before);
    assert_eq!(tree.len(), 7);

    let mut tree: RbTree<i64> = RbTree::new("test-delete");
    assert_eq!(tree.delete(&1), Err(Error::NotFound(1)));
    assert!(tree.is_empty());
}

#[test]
fn test_delete_black_nephews() {
    let mut tree = load("20B(10B,30B)");
    let trace = tree.delete(&10).unwrap();
    assert_eq!(cases_of(&trace), vec![(2, false), (0, false)]);
    assert_eq!(render(trace.after()), "20B(-,30R)");
    assert!(tree.validate().ok());

    // successor is z's right child, x is NIL on the right of y.
    let mut tree = load("20B(10B,30B)");
    let trace = tree.delete(&20).unwrap();
    assert_eq!(cases_of(&trace), vec![(2, true), (0, false)]);
    assert_eq!(render(trace.after()), "30B(10R,-)");
    assert!(tree.validate().ok());
}

#[test]
fn test_delete_near_far() {
    let mut tree = load("20B(10B,30B(25R,-))");
    let trace = tree.delete(&10).unwrap();
    assert_eq!(cases_of(&trace), vec![(3, false), (4, false), (0, false)]);
    assert_eq!(trace.count(StepKind::RotateRight), 1);
    assert_eq!(trace.count(StepKind::RotateLeft), 1);
    assert_eq!(render(trace.after()), "25B(20B,30B)");
    assert!(tree.validate().ok());

    let mut tree = load("20B(10B(-,15R),30B)");
    let trace = tree.delete(&30).unwrap();
    assert_eq!(cases_of(&trace), vec![(3, true), (4, true), (0, false)]);
    assert_eq!(render(trace.after()), "15B(10B,20B)");
    assert!(tree.validate().ok());
}

#[test]
fn test_delete_far_red() {
    let mut tree = load("20B(10B,30B(-,40R))");
    let trace = tree.delete(&10).unwrap();
    assert_eq!(cases_of(&trace), vec![(4, false), (0, false)]);
    let flips: Vec<(Option<Color>, Option<Color>)> = trace
        .iter()
        .filter(|s| s.kind() == StepKind::ColorFlip)
        .map(|s| (s.color_before(), s.color_after()))
        .collect();
    // sibling takes parent color, parent and far nephew go BLACK.
    assert_eq!(
        flips,
        vec![
            (Some(Color::Black), Some(Color::Black)),
            (Some(Color::Black), Some(Color::Black)),
            (Some(Color::Red), Some(Color::Black)),
        ]
    );
    assert_eq!(render(trace.after()), "30B(20B,40B)");
}

#[test]
fn test_delete_successor_color() {
    // successor 30 is BLACK and takes z's RED.
    let mut tree = load("10B(5B,20R(15B,30B))");
    let trace = tree.delete(&20).unwrap();
    let flip = trace
        .iter()
        .find(|s| s.kind() == StepKind::ColorFlip && s.case().is_none())
        .unwrap();
    assert_eq!(flip.node_ids(), vec![tree.search(&30).unwrap()]);
    assert_eq!(flip.color_after(), Some(Color::Red));
    assert!(tree.validate().ok());
    assert_eq!(tree.keys(), vec![5, 10, 15, 30]);
}

#[test]
fn test_delete_red_leaf() {
    let mut tree = load("20B(10R,30R)");
    let trace = tree.delete(&30).unwrap();
    assert!(trace.cases().is_empty());
    assert_eq!(trace.count(StepKind::Relink), 1);
    assert_eq!(render(trace.after()), "20B(10R,-)");
}

#[test]
fn test_classify() {
    let tree = load("20B(10B,30B)");
    let (n20, n10) = (tree.search(&20).unwrap(), tree.search(&10).unwrap());
    let x = Deficit {
        node: n10,
        parent: n20,
        color: Color::Black,
    };
    assert_eq!(DeleteCase::classify(&tree, &x), DeleteCase::BlackNephews(Side::Left));

    let x = Deficit {
        node: n10,
        parent: n20,
        color: Color::Red,
    };
    assert_eq!(DeleteCase::classify(&tree, &x), DeleteCase::Absorb);

    let x = Deficit {
        node: n20,
        parent: NodeId::NIL,
        color: Color::Black,
    };
    assert_eq!(DeleteCase::classify(&tree, &x), DeleteCase::Absorb);

    let tree = load("20B(10B,40R(30B,50B))");
    let x = Deficit {
        node: tree.search(&10).unwrap(),
        parent: tree.search(&20).unwrap(),
        color: Color::Black,
    };
    let case = DeleteCase::classify(&tree, &x);
    assert_eq!(case, DeleteCase::RedSibling(Side::Left));
    assert_eq!(case.number(), 1);
    assert_eq!(case.tag().fixup, Fixup::Delete);
    assert!(!case.tag().mirrored);
    assert!(DeleteCase::FarRed(Side::Right).tag().mirrored);
}

#[test]
#[should_panic]
fn test_classify_nil_sibling() {
    let tree = load("20B");
    let x = Deficit {
        node: NodeId::NIL,
        parent: tree.search(&20).unwrap(),
        color: Color::Black,
    };
    DeleteCase::classify(&tree, &x);
}

#[test]
fn test_delete_random() {
    let mut tree: RbTree<i64> = RbTree::new("test-delete");
    let mut keys = vec![];
    for key in 0..300 {
        tree.insert(key).unwrap();
        keys.push(key);
    }
    // drain in random order.
    while !keys.is_empty() {
        let key = keys.remove((random::<u64>() % (keys.len() as u64)) as usize);
        let trace = tree.delete(&key).unwrap();
        for tag in trace.cases() {
            assert_eq!(tag.fixup, Fixup::Delete);
            assert!(tag.number <= 4);
        }
        assert_eq!(trace.iter().last().map(|s| s.kind()), Some(StepKind::Done));
        let report = tree.validate();
        assert!(report.ok(), "delete {} {:?}", key, report.violations());
        assert_eq!(tree.len(), keys.len());
    }
    assert_eq!(tree.root(), NodeId::NIL);
}

include!("./ref_test.rs");
