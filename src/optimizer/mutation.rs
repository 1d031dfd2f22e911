use crate::net::{Arc, ArcKind, PetriNet, PlaceId};
use fastrand::Rng;
use strum_macros::{Display, EnumIter};

pub const MAX_EDITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MutationOp {
    AddArc,
    RemoveArc,
}

fn random_kind(rng: &mut Rng) -> ArcKind {
    if rng.bool() {
        ArcKind::Consume
    } else {
        ArcKind::Produce
    }
}

/// Applies one structural edit. Returns false when nothing changed.
pub fn apply(net: &mut PetriNet, op: MutationOp, rng: &mut Rng) -> bool {
    let place_count = net.place_count();
    let transitions = net.transitions_mut();
    if transitions.is_empty() {
        return false;
    }

    let idx = rng.usize(0..transitions.len());
    let t = &mut transitions[idx];
    let kind = random_kind(rng);

    match op {
        MutationOp::AddArc => {
            if place_count == 0 {
                return false;
            }
            let place = PlaceId(rng.usize(0..place_count));
            t.arcs_of_mut(kind).push(Arc::new(kind, place));
            true
        }
        MutationOp::RemoveArc => {
            let arcs = t.arcs_of_mut(kind);
            if arcs.is_empty() {
                return false;
            }
            arcs.remove(rng.usize(0..arcs.len()));
            true
        }
    }
}

/// 1..=MAX_EDITS random edits, add or remove with equal odds.
/// Returns how many edits changed the net.
pub fn mutate(net: &mut PetriNet, rng: &mut Rng) -> usize {
    let edits = rng.usize(1..=MAX_EDITS);
    let mut applied = 0;
    for _ in 0..edits {
        let op = if rng.bool() {
            MutationOp::AddArc
        } else {
            MutationOp::RemoveArc
        };
        if apply(net, op, rng) {
            applied += 1;
        }
    }
    applied
}
