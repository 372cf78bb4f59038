use rand::Rng;

use super::*;

#[test]
fn same_seed_same_sequence() {
    let mut a = seeded_rng(42);
    let mut b = seeded_rng(42);
    let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..1000)).collect();
    let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..1000)).collect();
    assert_eq!(xs, ys);
}

#[test]
fn different_seeds_diverge() {
    let mut a = seeded_rng(1);
    let mut b = seeded_rng(2);
    let xs: Vec<u64> = (0..4).map(|_| a.r#gen()).collect();
    let ys: Vec<u64> = (0..4).map(|_| b.r#gen()).collect();
    assert_ne!(xs, ys);
}
