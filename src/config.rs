use crate::error::NfResult;
use crate::net::ProduceGuard;
use crate::optimizer::MiningOptions;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub generator: GeneratorParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = 100)]
    pub population_size: usize,
    #[arg(long, default_value_t = 100)]
    pub generations: usize,
    #[arg(long, default_value_t = 0.9)]
    pub target_fitness: f64,
    #[arg(long, default_value_t = 0.1)]
    pub elitism_rate: f64,
    #[arg(long, default_value_t = 0.6)]
    pub crossover_rate: f64,
    #[arg(long, default_value_t = 0.1)]
    pub mutate_rate: f64,
    #[arg(long, default_value_t = RefillPolicy::Random)]
    pub refill: RefillPolicy,

    // Generations without improvement before giving up (0 = never)
    #[arg(long, default_value_t = 0)]
    pub patience: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 100,
            target_fitness: 0.9,
            elitism_rate: 0.1,
            crossover_rate: 0.6,
            mutate_rate: 0.1,
            refill: RefillPolicy::Random,
            patience: 0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    #[arg(long, default_value_t = ArcBudget::Aggressive)]
    pub arc_budget: ArcBudget,

    // Places per net = alphabet + rand(0..=round(alphabet * ratio)), plus the start place
    #[arg(long, default_value_t = 0.5)]
    pub extra_place_ratio: f64,

    #[arg(long, default_value_t = ProduceGuard::Empty)]
    pub produce_guard: ProduceGuard,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            arc_budget: ArcBudget::Aggressive,
            extra_place_ratio: 0.5,
            produce_guard: ProduceGuard::Empty,
        }
    }
}

/// Upper bound on the arcs of each kind a random transition draws.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ArcBudget {
    /// 1..=3 arcs per kind
    Moderate,
    /// 1..=4 arcs per kind
    #[default]
    Aggressive,
}

impl ArcBudget {
    pub fn max_arcs(self) -> usize {
        match self {
            Self::Moderate => 3,
            Self::Aggressive => 4,
        }
    }
}

/// How the population is brought back to size after breeding.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RefillPolicy {
    /// Top up with freshly generated random nets.
    #[default]
    Random,
    /// Keep only elites and offspring.
    None,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NfResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> NfResult<()> {
        MiningOptions::from(self).validate()
    }

    /// Copies every value the user typed on the command line over this config.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(search, population_size);
        update_if_present!(search, generations);
        update_if_present!(search, target_fitness);
        update_if_present!(search, elitism_rate);
        update_if_present!(search, crossover_rate);
        update_if_present!(search, mutate_rate);
        update_if_present!(search, refill);
        update_if_present!(search, patience);

        update_if_present!(generator, arc_budget);
        update_if_present!(generator, extra_place_ratio);
        update_if_present!(generator, produce_guard);
    }
}
