use rand::prelude::random;

use crate::error::SearchError;
use crate::node::Color;
use crate::search::{Match, Op, Placement, Search, SearchMode, SEARCH_LIMIT};
use crate::snapshot::Snapshot;
use crate::tree::RbTree;

fn shown(matches: &[Match<i64>]) -> Vec<String> {
    matches.iter().map(|m| m.to_string()).collect()
}

#[test]
fn test_op_display() {
    let m = Match {
        mode: SearchMode::Helper,
        ops: vec![
            Op::Insert(7),
            Op::Insert(3),
            Op::HelperInsert(99),
            Op::Insert(18),
            Op::HelperDelete(99),
        ],
    };
    assert_eq!(m.to_string(), "[7, 3, +99, 18, -99]");
    assert_eq!(Op::HelperDelete(5).to_string(), "-5");
}

#[test]
fn test_search_direct() {
    let order = vec![40, 20, 60, 10, 30];
    let target = RbTree::build("test-search", order.clone()).unwrap().snapshot();
    let outcome = Search::new(target, vec![10, 20, 30, 40, 60]).run().unwrap();
    assert_eq!(outcome.checked, 120);
    assert_eq!(outcome.helper(), 0);
    let expect: Vec<Op<i64>> = order.iter().map(|k| Op::Insert(*k)).collect();
    assert!(outcome.matches.iter().any(|m| m.ops == expect));
    assert!(outcome.matches.iter().all(|m| m.mode == SearchMode::Direct));
}

#[test]
fn test_search_identity() {
    for _ in 0..10 {
        let mut order: Vec<i64> = vec![];
        while order.len() < 6 {
            let key = random_key(100);
            if !order.contains(&key) {
                order.push(key);
            }
        }
        let target = RbTree::build("test-search", order.clone()).unwrap().snapshot();
        let mut elements = order.clone();
        elements.sort();
        let outcome = Search::new(target, elements).run().unwrap();
        let expect: Vec<Op<i64>> = order.iter().map(|k| Op::Insert(*k)).collect();
        assert!(outcome.matches.iter().any(|m| m.ops == expect), "{:?}", order);
    }
}

#[test]
fn test_search_helper() {
    // all BLACK is not reachable by inserting three keys.
    let target = fixture("2B(1B,3B)");
    let outcome = Search::new(target.clone(), vec![1, 2, 3]).run().unwrap();
    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.checked, 6);

    let mut search = Search::new(target.clone(), vec![1, 2, 3]);
    search.set_mode(SearchMode::Helper).set_helper(4);
    let outcome = search.run().unwrap();
    assert_eq!(outcome.checked, 60);
    assert_eq!(outcome.direct(), 0);
    assert!(outcome.helper() > 0);
    assert!(shown(&outcome.matches).contains(&"[1, 2, 3, +4, -4]".to_string()));

    let mut search = Search::new(target, vec![1, 2, 3]);
    search.set_mode(SearchMode::Both).set_helper(4);
    let both = search.run().unwrap();
    assert_eq!(both.checked, 66);
    assert_eq!(both.matches, outcome.matches);
}

#[test]
fn test_search_placement() {
    let target = RbTree::build("test-search", vec![2, 1, 3]).unwrap().snapshot();

    // helper inserted and removed before any element, same as direct.
    let mut search = Search::new(target.clone(), vec![1, 2, 3]);
    search
        .set_mode(SearchMode::Helper)
        .set_helper(0)
        .set_placement(Placement::Begin);
    let outcome = search.run().unwrap();
    assert_eq!(outcome.checked, 6);
    assert_eq!(outcome.helper(), 6);
    assert_eq!(outcome.matches[0].to_string(), "[+0, -0, 1, 2, 3]");

    let mut search = Search::new(target, vec![1, 2, 3]);
    search
        .set_mode(SearchMode::Helper)
        .set_helper(0)
        .set_placement(Placement::Surround);
    let outcome = search.run().unwrap();
    assert_eq!(outcome.checked, 6);
    assert!(shown(&outcome.matches).iter().all(|s| s.starts_with("[+0,") && s.ends_with(", -0]")));
}

#[test]
fn test_search_prefix_limit() {
    let target = RbTree::build("test-search", vec![2, 1, 3]).unwrap().snapshot();
    let mut search = Search::new(target.clone(), vec![1, 2, 3]);
    search.set_prefix(vec![3]);
    let outcome = search.run().unwrap();
    assert_eq!(outcome.checked, 2);
    assert_eq!(shown(&outcome.matches), vec!["[3, 1, 2]", "[3, 2, 1]"]);

    // prefix covering every element leaves a single order.
    let mut search = Search::new(target.clone(), vec![1, 2, 3]);
    search.set_prefix(vec![2, 3, 1]);
    let outcome = search.run().unwrap();
    assert_eq!(outcome.checked, 1);
    assert_eq!(shown(&outcome.matches), vec!["[2, 3, 1]"]);

    let mut search = Search::new(target, vec![1, 2, 3]);
    search.set_limit(2);
    let outcome = search.run().unwrap();
    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.checked, 2);
    assert!(SEARCH_LIMIT > 2);
}

#[test]
fn test_search_errors() {
    let target = fixture("2B(1R,3R)");
    let run = |search: &Search<i64>| search.run().map(|o| o.checked);

    assert_eq!(run(&Search::new(fixture(""), vec![1])), Err(SearchError::EmptyTarget));
    match run(&Search::new(fixture("2R(1B,3B)"), vec![1, 2, 3])) {
        Err(SearchError::InvalidTarget(msg)) => assert!(msg.contains("root is RED"), "{}", msg),
        res => panic!("unexpected {:?}", res),
    }
    assert_eq!(
        run(&Search::new(fixture("2B(2R,3R)"), vec![2, 2, 3])),
        Err(SearchError::DuplicateTargetKeys)
    );
    assert_eq!(run(&Search::new(target.clone(), vec![])), Err(SearchError::NoElements));

    let mut search = Search::new(target.clone(), vec![1, 2, 3]);
    search.set_helper(2);
    assert_eq!(run(&search), Err(SearchError::HelperInElements));

    let mut search = Search::new(target.clone(), vec![1, 2, 3]);
    search.set_mode(SearchMode::Helper);
    assert_eq!(run(&search), Err(SearchError::MissingHelper));

    let mut search = Search::new(target.clone(), vec![1, 2, 3]);
    search.set_prefix(vec![9]);
    assert_eq!(run(&search), Err(SearchError::PrefixNotInElements));

    let mut search = Search::new(target, vec![1, 2, 3]);
    search.set_prefix(vec![1, 1]);
    assert_eq!(run(&search), Err(SearchError::DuplicatePrefix));
}

include!("./ref_test.rs");
