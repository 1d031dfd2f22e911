pub mod builder;
pub mod structure;

pub use self::builder::NetBuilder;
pub use self::structure::{ArcSnapshot, NetStructure, PlaceSnapshot, TransitionSnapshot};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use strum_macros::{Display, EnumString};

/// Accuracy baseline after a full reset. Non-zero so a net that never moved a
/// token still ranks above nothing.
pub const ACCURACY_FLOOR: f64 = 0.01;

/// Place 0 is the start place of every net.
pub const START_PLACE: PlaceId = PlaceId(0);

/// Stable index of a place inside the net that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub usize);

impl PlaceId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display names are 1-based, identity is the raw index.
        write!(f, "p{}", self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub holding: i64,
}

impl Place {
    pub fn new(id: PlaceId, holding: i64) -> Self {
        Self {
            id,
            name: id.to_string(),
            holding,
        }
    }

    pub fn is_start(&self) -> bool {
        self.id == START_PLACE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ArcKind {
    Consume,
    Produce,
}

/// Gate applied to produce arcs before a transition may fire.
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
pub enum ProduceGuard {
    /// The target place must be empty.
    #[default]
    Empty,
    /// Produce arcs never block.
    Unbounded,
}

impl ProduceGuard {
    #[inline(always)]
    pub fn admits(self, holding: i64) -> bool {
        match self {
            Self::Empty => holding == 0,
            Self::Unbounded => true,
        }
    }
}

/// Directed binding between a transition and one place, with run counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arc {
    pub kind: ArcKind,
    pub place: PlaceId,
    pub amount: i64,
    pub consumed: u32,
    pub produced: u32,
    pub missing: u32,
}

impl Arc {
    pub const UNIT: i64 = 1;

    pub fn new(kind: ArcKind, place: PlaceId) -> Self {
        Self {
            kind,
            place,
            amount: Self::UNIT,
            consumed: 0,
            produced: 0,
            missing: 0,
        }
    }

    pub fn consume(place: PlaceId) -> Self {
        Self::new(ArcKind::Consume, place)
    }

    pub fn produce(place: PlaceId) -> Self {
        Self::new(ArcKind::Produce, place)
    }

    /// Tokens moved through this arc since the last reset.
    #[inline(always)]
    pub fn transferred(&self) -> u64 {
        self.consumed as u64 + self.produced as u64
    }

    fn reset_counters(&mut self) {
        self.consumed = 0;
        self.produced = 0;
        self.missing = 0;
    }
}

/// An activity node. Its name matches one symbol of the log alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub name: String,
    pub consume: Vec<Arc>,
    pub produce: Vec<Arc>,
}

impl Transition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            consume: Vec::new(),
            produce: Vec::new(),
        }
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.consume.iter().chain(self.produce.iter())
    }

    pub fn arcs_of(&self, kind: ArcKind) -> &Vec<Arc> {
        match kind {
            ArcKind::Consume => &self.consume,
            ArcKind::Produce => &self.produce,
        }
    }

    pub fn arcs_of_mut(&mut self, kind: ArcKind) -> &mut Vec<Arc> {
        match kind {
            ArcKind::Consume => &mut self.consume,
            ArcKind::Produce => &mut self.produce,
        }
    }

    /// True if any arc of either kind already points at `place`.
    pub fn references(&self, place: PlaceId) -> bool {
        self.arcs().any(|a| a.place == place)
    }

    /// Adds the arc unless the transition already touches its place.
    /// Returns whether the arc was kept.
    pub fn push_unique(&mut self, arc: Arc) -> bool {
        if self.references(arc.place) {
            return false;
        }
        self.arcs_of_mut(arc.kind).push(arc);
        true
    }

    pub fn arc_count(&self) -> usize {
        self.consume.len() + self.produce.len()
    }
}

/// A candidate process model: transitions over a private pool of places.
#[derive(Debug, Clone)]
pub struct PetriNet {
    transitions: Vec<Transition>,
    lookup: HashMap<String, usize>,
    places: Vec<Place>,
    produce_guard: ProduceGuard,

    /// Sum of step accuracies since the last full reset.
    pub accuracy: f64,
    pub fitness: f64,
    pub times_run: u32,
}

impl PetriNet {
    /// Assembles a net from parts the caller already knows to be consistent
    /// (every arc bound inside `places`, `places` non-empty).
    pub(crate) fn assemble(
        places: Vec<Place>,
        transitions: Vec<Transition>,
        produce_guard: ProduceGuard,
    ) -> Self {
        let mut lookup = HashMap::with_capacity(transitions.len());
        for (i, t) in transitions.iter().enumerate() {
            // First match wins on duplicate names.
            lookup.entry(t.name.clone()).or_insert(i);
        }
        Self {
            transitions,
            lookup,
            places,
            produce_guard,
            accuracy: ACCURACY_FLOOR,
            fitness: 0.0,
            times_run: 0,
        }
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut [Transition] {
        &mut self.transitions
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn produce_guard(&self) -> ProduceGuard {
        self.produce_guard
    }

    pub fn transition(&self, name: &str) -> Option<&Transition> {
        self.lookup.get(name).map(|&i| &self.transitions[i])
    }

    pub fn alphabet(&self) -> Vec<&str> {
        self.transitions.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn arc_count(&self) -> usize {
        self.transitions.iter().map(Transition::arc_count).sum()
    }

    pub fn holdings(&self) -> Vec<i64> {
        self.places.iter().map(|p| p.holding).collect()
    }

    /// Pure enablement check. Unknown names are never enabled.
    pub fn can_fire(&self, name: &str) -> bool {
        match self.lookup.get(name) {
            Some(&idx) => self.can_fire_at(idx),
            None => false,
        }
    }

    /// Bumps `missing` on every consume arc whose place lacks tokens.
    /// Counting does not stop at the first short arc, so a join fed by two
    /// empty places records a miss on both.
    pub fn record_attempt(&mut self, name: &str) {
        if let Some(&idx) = self.lookup.get(name) {
            self.record_attempt_at(idx);
        }
    }

    /// Fires the named transition atomically. An unknown name is a no-op.
    pub fn fire(&mut self, name: &str) -> bool {
        match self.lookup.get(name) {
            Some(&idx) => self.fire_at(idx),
            None => false,
        }
    }

    fn can_fire_at(&self, idx: usize) -> bool {
        let t = &self.transitions[idx];
        let consume_ok = t
            .consume
            .iter()
            .all(|a| self.places[a.place.index()].holding >= a.amount);
        let produce_ok = t
            .produce
            .iter()
            .all(|a| self.produce_guard.admits(self.places[a.place.index()].holding));
        consume_ok && produce_ok
    }

    fn record_attempt_at(&mut self, idx: usize) {
        let places = &self.places;
        for arc in &mut self.transitions[idx].consume {
            if places[arc.place.index()].holding < arc.amount {
                arc.missing += 1;
            }
        }
    }

    fn fire_at(&mut self, idx: usize) -> bool {
        self.record_attempt_at(idx);
        if !self.can_fire_at(idx) {
            return false;
        }

        let places = &mut self.places;
        let t = &mut self.transitions[idx];

        // Consume before produce.
        for arc in &mut t.consume {
            places[arc.place.index()].holding -= arc.amount;
            arc.consumed += 1;
        }
        for arc in &mut t.produce {
            places[arc.place.index()].holding += arc.amount;
            arc.produced += 1;
        }
        true
    }

    /// Clears arc counters and the marking; the start place gets its token back.
    /// Scores survive.
    pub fn reset_tokens(&mut self) {
        for t in &mut self.transitions {
            for arc in t.consume.iter_mut().chain(t.produce.iter_mut()) {
                arc.reset_counters();
            }
        }
        for place in &mut self.places {
            place.holding = if place.is_start() { 1 } else { 0 };
        }
    }

    /// `reset_tokens` plus the score baseline used before a fresh evaluation.
    pub fn reset_all(&mut self) {
        self.reset_tokens();
        self.accuracy = ACCURACY_FLOOR;
        self.fitness = 0.0;
        self.times_run = 1;
    }
}
