use hexgrove::{Grammar, Production};
use rand::SeedableRng;
use rand::rngs::StdRng;

const TRIALS: usize = 10_000;
const TOLERANCE: f64 = 0.02;

fn frequencies(production: Production, symbols: &[char], seed: u64) -> Vec<f64> {
    let axiom = "X".repeat(TRIALS);
    let grammar = Grammar::new(axiom, 1).with_rule('X', production);
    let mut rng = StdRng::seed_from_u64(seed);
    let out = grammar.expand(&mut rng).unwrap();
    assert_eq!(out.chars().count(), TRIALS);

    symbols
        .iter()
        .map(|s| out.chars().filter(|c| c == s).count() as f64 / TRIALS as f64)
        .collect()
}

#[test]
fn equal_weights_converge_to_uniform() {
    let freq = frequencies(
        Production::weighted([(1.0, "A"), (1.0, "B"), (1.0, "C")]),
        &['A', 'B', 'C'],
        2024,
    );
    for f in freq {
        assert!((f - 1.0 / 3.0).abs() < TOLERANCE, "frequency {}", f);
    }
}

#[test]
fn unequal_weights_follow_proportions() {
    let freq = frequencies(
        Production::weighted([(0.75, "A"), (0.25, "B")]),
        &['A', 'B'],
        7,
    );
    assert!((freq[0] - 0.75).abs() < TOLERANCE, "A frequency {}", freq[0]);
    assert!((freq[1] - 0.25).abs() < TOLERANCE, "B frequency {}", freq[1]);
}

#[test]
fn weights_need_not_sum_to_one() {
    let freq = frequencies(
        Production::weighted([(3.0, "A"), (1.0, "B")]),
        &['A', 'B'],
        99,
    );
    assert!((freq[0] - 0.75).abs() < TOLERANCE, "A frequency {}", freq[0]);
}

#[test]
fn each_iteration_draws_independently() {
    // Two iterations of X -> X|Y; Y is terminal, so P(X survives) = 0.5^2
    let grammar = Grammar::new("X".repeat(TRIALS), 2)
        .with_rule('X', Production::weighted([(1.0, "X"), (1.0, "Y")]));
    let out = grammar.expand_seeded(Some(3)).unwrap();
    let survivors = out.chars().filter(|&c| c == 'X').count() as f64 / TRIALS as f64;
    assert!((survivors - 0.25).abs() < TOLERANCE, "survivors {}", survivors);
}
