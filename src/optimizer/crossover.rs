use super::initialization::create_places;
use crate::net::{Arc, PetriNet, ProduceGuard, Transition};
use fastrand::Rng;

/// Builds a child whose transitions are copied, symbol by symbol, from one of
/// the two parents. Arcs keep their place index and are rebound into the
/// child's own pool, which is as large as the larger parent's.
pub fn crossover<S: AsRef<str>>(
    p1: &PetriNet,
    p2: &PetriNet,
    alphabet: &[S],
    guard: ProduceGuard,
    rng: &mut Rng,
) -> PetriNet {
    let pool_size = p1.place_count().max(p2.place_count()).max(1);
    let places = create_places(pool_size - 1);

    // Each symbol is visited once, in random order.
    let mut order: Vec<usize> = (0..alphabet.len()).collect();
    rng.shuffle(&mut order);

    let mut slots: Vec<Option<Transition>> = vec![None; alphabet.len()];
    for idx in order {
        let symbol = alphabet[idx].as_ref();
        let (first, second) = if rng.bool() { (p1, p2) } else { (p2, p1) };

        let child = match first.transition(symbol).or_else(|| second.transition(symbol)) {
            Some(source) => rebind(source, pool_size),
            None => Transition::new(symbol),
        };
        slots[idx] = Some(child);
    }

    let transitions = slots.into_iter().flatten().collect();
    PetriNet::assemble(places, transitions, guard)
}

/// Copies the arc layout with fresh counters, dropping any arc outside the pool.
fn rebind(source: &Transition, pool_size: usize) -> Transition {
    let copy = |arcs: &[Arc]| -> Vec<Arc> {
        arcs.iter()
            .filter(|a| a.place.index() < pool_size)
            .map(|a| Arc::new(a.kind, a.place))
            .collect()
    };
    Transition {
        name: source.name.clone(),
        consume: copy(&source.consume),
        produce: copy(&source.produce),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::NetBuilder;
    use proptest::prelude::*;

    fn parents() -> (PetriNet, PetriNet) {
        let small = NetBuilder::new(2)
            .transition("A", &[0], &[1])
            .transition("B", &[1], &[0])
            .build()
            .unwrap();
        let large = NetBuilder::new(5)
            .transition("A", &[0], &[3, 4])
            .transition("B", &[3], &[2])
            .build()
            .unwrap();
        (small, large)
    }

    #[test]
    fn test_child_pool_matches_larger_parent() {
        let (small, large) = parents();
        let mut rng = Rng::with_seed(42);
        let child = crossover(&small, &large, &["A", "B"], ProduceGuard::Empty, &mut rng);
        assert_eq!(child.place_count(), 5);
        assert_eq!(child.holdings(), vec![1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_child_genes_come_from_a_parent() {
        let (small, large) = parents();
        let mut rng = Rng::with_seed(9);
        for _ in 0..20 {
            let child = crossover(&small, &large, &["A", "B"], ProduceGuard::Empty, &mut rng);
            for t in child.transitions() {
                let places = |n: &PetriNet| {
                    let src = n.transition(&t.name).unwrap();
                    (
                        src.consume.iter().map(|a| a.place).collect::<Vec<_>>(),
                        src.produce.iter().map(|a| a.place).collect::<Vec<_>>(),
                    )
                };
                let got = (
                    t.consume.iter().map(|a| a.place).collect::<Vec<_>>(),
                    t.produce.iter().map(|a| a.place).collect::<Vec<_>>(),
                );
                assert!(got == places(&small) || got == places(&large));
            }
        }
    }

    #[test]
    fn test_missing_symbol_falls_back() {
        let (small, _) = parents();
        let only_a = NetBuilder::new(3)
            .transition("A", &[0], &[2])
            .build()
            .unwrap();
        let mut rng = Rng::with_seed(5);
        let child = crossover(&only_a, &small, &["A", "B", "Q"], ProduceGuard::Empty, &mut rng);

        assert_eq!(child.alphabet(), vec!["A", "B", "Q"]);
        assert_eq!(child.transition("B").unwrap().consume.len(), 1);
        assert_eq!(child.transition("Q").unwrap().arc_count(), 0);
    }

    #[test]
    fn test_empty_alphabet_is_total() {
        let (small, large) = parents();
        let empty: [&str; 0] = [];
        let child = crossover(&small, &large, &empty, ProduceGuard::Empty, &mut Rng::with_seed(1));
        assert!(child.transitions().is_empty());
        assert_eq!(child.place_count(), 5);
    }

    proptest! {
        #[test]
        fn prop_child_arcs_stay_in_pool(seed in any::<u64>()) {
            let (small, large) = parents();
            let mut rng = Rng::with_seed(seed);
            let child = crossover(&large, &small, &["A", "B"], ProduceGuard::Empty, &mut rng);

            prop_assert_eq!(child.transitions().len(), 2);
            for t in child.transitions() {
                for arc in t.arcs() {
                    prop_assert!(arc.place.index() < child.place_count());
                    prop_assert_eq!(arc.transferred(), 0);
                }
            }
        }
    }
}
