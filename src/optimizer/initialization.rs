use crate::config::{ArcBudget, GeneratorParams};
use crate::net::{Arc, ArcKind, PetriNet, Place, PlaceId, Transition, START_PLACE};
use fastrand::Rng;

/// `n + 1` places: the start place holding one token, then `n` empty ones.
pub fn create_places(n: usize) -> Vec<Place> {
    (0..=n)
        .map(|i| {
            let id = PlaceId(i);
            Place::new(id, if id == START_PLACE { 1 } else { 0 })
        })
        .collect()
}

/// Largest accepted `extra_place_ratio`; beyond it pools grow without bound.
pub const MAX_EXTRA_PLACE_RATIO: f64 = 10.0;

/// Number of non-start places for a random net over `alphabet_len` symbols.
pub fn place_count_for(alphabet_len: usize, extra_place_ratio: f64, rng: &mut Rng) -> usize {
    let extra = (alphabet_len as f64 * extra_place_ratio).round() as usize;
    alphabet_len + rng.usize(0..=extra)
}

/// One transition per symbol with random consume and produce arcs.
/// A draw that hits a place the transition already touches is dropped, so
/// a transition can end up with fewer arcs than drawn.
pub fn create_transitions<S: AsRef<str>>(
    alphabet: &[S],
    places: &[Place],
    budget: ArcBudget,
    rng: &mut Rng,
) -> Vec<Transition> {
    let mut transitions = Vec::with_capacity(alphabet.len());
    if places.is_empty() {
        return alphabet.iter().map(|s| Transition::new(s.as_ref())).collect();
    }

    for symbol in alphabet {
        let mut t = Transition::new(symbol.as_ref());
        let max = budget.max_arcs();

        let consume_count = rng.usize(1..=max);
        let produce_count = rng.usize(1..=max);

        for _ in 0..consume_count {
            let place = places[rng.usize(0..places.len())].id;
            t.push_unique(Arc::new(ArcKind::Consume, place));
        }
        for _ in 0..produce_count {
            let place = places[rng.usize(0..places.len())].id;
            t.push_unique(Arc::new(ArcKind::Produce, place));
        }

        transitions.push(t);
    }
    transitions
}

pub fn random_net<S: AsRef<str>>(
    alphabet: &[S],
    params: &GeneratorParams,
    rng: &mut Rng,
) -> PetriNet {
    let n = place_count_for(alphabet.len(), params.extra_place_ratio, rng);
    let places = create_places(n);
    let transitions = create_transitions(alphabet, &places, params.arc_budget, rng);
    PetriNet::assemble(places, transitions, params.produce_guard)
}

pub fn initial_population<S: AsRef<str>>(
    size: usize,
    alphabet: &[S],
    params: &GeneratorParams,
    rng: &mut Rng,
) -> Vec<PetriNet> {
    (0..size).map(|_| random_net(alphabet, params, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn test_create_places_marks_start() {
        let places = create_places(4);
        assert_eq!(places.len(), 5);
        assert_eq!(places[0].holding, 1);
        assert!(places[1..].iter().all(|p| p.holding == 0));
        assert!(places.iter().enumerate().all(|(i, p)| p.id.index() == i));
    }

    #[rstest]
    #[case(ArcBudget::Moderate, 3)]
    #[case(ArcBudget::Aggressive, 4)]
    fn test_arc_budget_bounds(#[case] budget: ArcBudget, #[case] max: usize) {
        let mut rng = Rng::with_seed(7);
        let places = create_places(20);
        let alphabet = ["A", "B", "C", "D", "E", "F"];

        for _ in 0..50 {
            for t in create_transitions(&alphabet, &places, budget, &mut rng) {
                assert!(!t.consume.is_empty(), "first draw can never be a duplicate");
                assert!(t.consume.len() <= max);
                assert!(t.produce.len() <= max);
            }
        }
    }

    #[test]
    fn test_no_duplicate_places_per_transition() {
        let mut rng = Rng::with_seed(42);
        let places = create_places(2);
        for t in create_transitions(&["A", "B", "C"], &places, ArcBudget::Aggressive, &mut rng) {
            let mut seen = HashSet::new();
            for arc in t.arcs() {
                assert!(seen.insert(arc.place), "place {} bound twice", arc.place);
            }
        }
    }

    #[test]
    fn test_place_count_range() {
        let mut rng = Rng::with_seed(1);
        for _ in 0..100 {
            let n = place_count_for(8, 0.5, &mut rng);
            assert!((8..=12).contains(&n));
        }
        assert_eq!(place_count_for(8, 0.0, &mut rng), 8);
    }

    #[test]
    fn test_random_net_covers_alphabet() {
        let mut rng = Rng::with_seed(3);
        let alphabet = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let net = random_net(&alphabet, &GeneratorParams::default(), &mut rng);
        assert_eq!(net.alphabet(), vec!["A", "B", "C"]);
        assert!(net.place_count() >= 4);
        assert_eq!(net.holdings()[0], 1);
    }
}
