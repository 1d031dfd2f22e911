use super::{Arc, PetriNet, Place, PlaceId, ProduceGuard, Transition};
use crate::error::{NetForgeError, NfResult};

/// Hand-assembly of a net from place indices. Place 0 is the start place.
///
/// ```
/// use netforge::net::NetBuilder;
///
/// let net = NetBuilder::new(3)
///     .transition("A", &[0], &[1])
///     .transition("B", &[1], &[2])
///     .build()
///     .unwrap();
/// assert_eq!(net.holdings(), vec![1, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct NetBuilder {
    place_count: usize,
    transitions: Vec<(String, Vec<usize>, Vec<usize>)>,
    produce_guard: ProduceGuard,
}

impl NetBuilder {
    pub fn new(place_count: usize) -> Self {
        Self {
            place_count,
            transitions: Vec::new(),
            produce_guard: ProduceGuard::default(),
        }
    }

    pub fn produce_guard(mut self, guard: ProduceGuard) -> Self {
        self.produce_guard = guard;
        self
    }

    pub fn transition(mut self, name: &str, consume: &[usize], produce: &[usize]) -> Self {
        self.transitions
            .push((name.to_string(), consume.to_vec(), produce.to_vec()));
        self
    }

    pub fn build(self) -> NfResult<PetriNet> {
        if self.place_count == 0 {
            return Err(NetForgeError::Validation(
                "a net needs at least the start place".to_string(),
            ));
        }

        let places: Vec<Place> = (0..self.place_count)
            .map(|i| Place::new(PlaceId(i), if i == 0 { 1 } else { 0 }))
            .collect();

        let place_count = self.place_count;
        let mut transitions = Vec::with_capacity(self.transitions.len());
        for (name, consume, produce) in self.transitions {
            let mut t = Transition::new(name);
            for &idx in &consume {
                t.consume.push(Arc::consume(checked(place_count, &t.name, idx)?));
            }
            for &idx in &produce {
                t.produce.push(Arc::produce(checked(place_count, &t.name, idx)?));
            }
            transitions.push(t);
        }

        Ok(PetriNet::assemble(places, transitions, self.produce_guard))
    }
}

fn checked(place_count: usize, transition: &str, idx: usize) -> NfResult<PlaceId> {
    if idx >= place_count {
        return Err(NetForgeError::Validation(format!(
            "transition '{}' references place index {} but the net has {} places",
            transition, idx, place_count
        )));
    }
    Ok(PlaceId(idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_dangling_place() {
        let res = NetBuilder::new(2).transition("A", &[0], &[5]).build();
        assert!(matches!(res, Err(NetForgeError::Validation(_))));
    }

    #[test]
    fn test_rejects_empty_pool() {
        assert!(NetBuilder::new(0).build().is_err());
    }

    #[test]
    fn test_keeps_transition_order() {
        let net = NetBuilder::new(2)
            .transition("B", &[], &[])
            .transition("A", &[], &[])
            .build()
            .unwrap();
        assert_eq!(net.alphabet(), vec!["B", "A"]);
    }
}
