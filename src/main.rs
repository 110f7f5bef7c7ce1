// Exercise the engine with a random workload:
// * insert `n` distinct keys in random order,
// * delete half of them, again in random order,
// * validate the tree after every operation,
// * tally the fixup cases hit by each phase,
// * compare red-black and plain BST heights for random and sorted input.
//
// usage: rbtrace [n] [seed]

use std::{
    collections::BTreeMap,
    env, process,
    time::{SystemTime, UNIX_EPOCH},
};

use log::{debug, error, info};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use rbtrace::{Comparison, OperationTrace, RbTree};

fn main() {
    if let Err(err) = TermLogger::init(
        LevelFilter::Info,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger: {}", err);
    }

    let args: Vec<String> = env::args().collect();
    let n: u32 = match args.get(1).map(|s| s.parse()) {
        None => 1000,
        Some(Ok(n)) => n,
        Some(Err(err)) => {
            error!("invalid count {:?}: {}", args[1], err);
            process::exit(2);
        }
    };
    let seed: u128 = match args.get(2).map(|s| s.parse()) {
        None => make_seed(),
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            error!("invalid seed {:?}: {}", args[2], err);
            process::exit(2);
        }
    };
    info!("n:{} seed:{}", n, seed);
    let mut rng = SmallRng::from_seed(seed.to_le_bytes());

    let mut keys: Vec<u32> = (0..n).collect();
    keys.shuffle(&mut rng);

    let mut tree = RbTree::new("rbtrace");
    let mut cases = BTreeMap::new();
    for key in keys.iter() {
        match tree.insert(*key) {
            Ok(trace) => check(&tree, &trace, &mut cases),
            Err(err) => {
                error!("insert: {}", err);
                process::exit(1);
            }
        }
    }
    report("insert", &tree, &cases);

    let mut victims: Vec<u32> = keys[..keys.len() / 2].to_vec();
    victims.shuffle(&mut rng);
    cases.clear();
    for key in victims.iter() {
        match tree.delete(key) {
            Ok(trace) => check(&tree, &trace, &mut cases),
            Err(err) => {
                error!("delete: {}", err);
                process::exit(1);
            }
        }
    }
    report("delete", &tree, &cases);

    let mut sorted = keys.clone();
    sorted.sort();
    for (what, keys) in [("random", &keys), ("sorted", &sorted)].iter() {
        match Comparison::of(&keys[..]) {
            Ok(cmp) => {
                info!("{} input, {}", what, cmp);
                info!("{} rb depths, {}", what, cmp.rb_depths);
                info!("{} bst depths, {}", what, cmp.bst_depths);
            }
            Err(err) => error!("comparison: {}", err),
        }
    }
}

fn check(tree: &RbTree<u32>, trace: &OperationTrace<u32>, cases: &mut BTreeMap<String, usize>) {
    let report = tree.validate();
    if !report.ok() {
        for violation in report.violations() {
            error!("{} {:?}: {}", trace.operation(), trace.key(), violation);
        }
        process::exit(1);
    }
    debug!("{} {:?} in {} steps", trace.operation(), trace.key(), trace.len());
    for tag in trace.cases() {
        *cases.entry(tag.to_string()).or_insert(0) += 1;
    }
}

fn report(phase: &str, tree: &RbTree<u32>, cases: &BTreeMap<String, usize>) {
    let report = tree.validate();
    info!(
        "{} done, nodes:{} height:{} black-height:{:?} red:{} black:{}",
        phase,
        report.node_count(),
        report.height(),
        report.black_height(),
        report.red_count(),
        report.black_count()
    );
    for (tag, count) in cases.iter() {
        info!("  {:<24} {}", tag, count);
    }
}

fn make_seed() -> u128 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_nanos(),
        Err(_) => 0,
    }
}
