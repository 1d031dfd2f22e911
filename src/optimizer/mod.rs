pub mod crossover;
pub mod initialization;
pub mod mutation;
pub mod runner;

pub use self::runner::{Miner, MiningOptions, MiningResult, ProgressCallback, StopReason};

use crate::net::PetriNet;

/// Best first. Stable, so equal scores keep their previous order.
pub fn rank(population: &mut [PetriNet]) {
    population.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
}

/// `round(rate * size)`, but never below one elite and never more than exist.
pub fn elite_count(elitism_rate: f64, population_size: usize, available: usize) -> usize {
    scaled_count(elitism_rate, population_size)
        .max(1)
        .min(available)
}

#[inline(always)]
pub fn scaled_count(rate: f64, population_size: usize) -> usize {
    (rate * population_size as f64).round() as usize
}

pub fn mean_fitness(population: &[PetriNet]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(|n| n.fitness).sum::<f64>() / population.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::NetBuilder;
    use rstest::rstest;

    #[rstest]
    #[case(0.1, 100, 100, 10)]
    #[case(0.2, 10, 10, 2)]
    #[case(0.0, 10, 10, 1)]
    #[case(0.5, 10, 3, 3)]
    #[case(0.01, 10, 10, 1)]
    fn test_elite_count(
        #[case] rate: f64,
        #[case] size: usize,
        #[case] available: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(elite_count(rate, size, available), expected);
    }

    #[test]
    fn test_rank_descending() {
        let mut pop: Vec<PetriNet> = [0.2, 0.9, 0.5]
            .iter()
            .map(|&f| {
                let mut n = NetBuilder::new(1).build().unwrap();
                n.fitness = f;
                n
            })
            .collect();
        rank(&mut pop);
        let order: Vec<f64> = pop.iter().map(|n| n.fitness).collect();
        assert_eq!(order, vec![0.9, 0.5, 0.2]);
        assert!((mean_fitness(&pop) - 1.6 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_of_empty_population() {
        assert_eq!(mean_fitness(&[]), 0.0);
    }
}
