use super::{Arc, ArcKind, PetriNet, Place, PlaceId, ProduceGuard, Transition};
use crate::error::{NetForgeError, NfResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serializable view of a net for renderers and for saving discovered models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetStructure {
    pub places: Vec<PlaceSnapshot>,
    pub transitions: Vec<TransitionSnapshot>,
    #[serde(default)]
    pub produce_guard: ProduceGuard,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub fitness: f64,
    #[serde(default)]
    pub times_run: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSnapshot {
    pub id: PlaceId,
    pub name: String,
    #[serde(default)]
    pub holding: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub name: String,
    pub consume: Vec<ArcSnapshot>,
    pub produce: Vec<ArcSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSnapshot {
    pub place: PlaceId,
    #[serde(default)]
    pub consumed: u32,
    #[serde(default)]
    pub produced: u32,
    #[serde(default)]
    pub missing: u32,
}

impl From<&Arc> for ArcSnapshot {
    fn from(arc: &Arc) -> Self {
        Self {
            place: arc.place,
            consumed: arc.consumed,
            produced: arc.produced,
            missing: arc.missing,
        }
    }
}

impl NetStructure {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> NfResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl PetriNet {
    pub fn structure(&self) -> NetStructure {
        NetStructure {
            places: self
                .places()
                .iter()
                .map(|p| PlaceSnapshot {
                    id: p.id,
                    name: p.name.clone(),
                    holding: p.holding,
                })
                .collect(),
            transitions: self
                .transitions()
                .iter()
                .map(|t| TransitionSnapshot {
                    name: t.name.clone(),
                    consume: t.consume.iter().map(ArcSnapshot::from).collect(),
                    produce: t.produce.iter().map(ArcSnapshot::from).collect(),
                })
                .collect(),
            produce_guard: self.produce_guard(),
            accuracy: self.accuracy,
            fitness: self.fitness,
            times_run: self.times_run,
        }
    }

    /// Rebuilds a net from a snapshot, marking and counters included.
    /// Place ids must be the positions `0..n` of the place list.
    pub fn from_structure(s: &NetStructure) -> NfResult<Self> {
        if s.places.is_empty() {
            return Err(NetForgeError::Validation(
                "net structure has no places".to_string(),
            ));
        }

        let mut places = Vec::with_capacity(s.places.len());
        for (i, p) in s.places.iter().enumerate() {
            if p.id.index() != i {
                return Err(NetForgeError::Validation(format!(
                    "place '{}' has id {} at position {}",
                    p.name,
                    p.id.index(),
                    i
                )));
            }
            places.push(Place {
                id: p.id,
                name: p.name.clone(),
                holding: p.holding,
            });
        }

        let restore = |t: &TransitionSnapshot, kind: ArcKind, snaps: &[ArcSnapshot]| {
            snaps
                .iter()
                .map(|a| {
                    if a.place.index() >= places.len() {
                        return Err(NetForgeError::Validation(format!(
                            "transition '{}' references unknown place {}",
                            t.name, a.place
                        )));
                    }
                    let mut arc = Arc::new(kind, a.place);
                    arc.consumed = a.consumed;
                    arc.produced = a.produced;
                    arc.missing = a.missing;
                    Ok(arc)
                })
                .collect::<NfResult<Vec<Arc>>>()
        };

        let mut transitions = Vec::with_capacity(s.transitions.len());
        for t in &s.transitions {
            transitions.push(Transition {
                name: t.name.clone(),
                consume: restore(t, ArcKind::Consume, &t.consume)?,
                produce: restore(t, ArcKind::Produce, &t.produce)?,
            });
        }

        let mut net = PetriNet::assemble(places, transitions, s.produce_guard);
        net.accuracy = s.accuracy;
        net.fitness = s.fitness;
        net.times_run = s.times_run;
        Ok(net)
    }
}
