use crate::model::LocationId;
use std::collections::HashMap;

/// Curseurs de rotation d'un appel de génération. Jamais conservés entre deux appels:
/// la continuité d'un mois à l'autre vient du rejeu depuis le 1er janvier.
#[derive(Debug, Default)]
pub(super) struct RotationState {
    topic: usize,
    verse: usize,
    primary_location: usize,
    assistants: HashMap<LocationId, usize>,
}

/// Indices du jour courant, pris avant avancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct DayCursor {
    pub topic: usize,
    pub verse: usize,
    pub primary_location: usize,
}

impl RotationState {
    /// Renvoie les indices du jour puis avance les trois curseurs partagés.
    pub(super) fn next_day(&mut self, topics: usize, verses: usize, locations: usize) -> DayCursor {
        let cursor = DayCursor {
            topic: self.topic % topics,
            verse: self.verse % verses,
            primary_location: self.primary_location % locations,
        };
        self.topic += 1;
        self.verse += 1;
        self.primary_location += 1;
        cursor
    }

    /// Valeur du curseur d'assistant du lieu, puis avancement (même sans assistant).
    pub(super) fn next_assistant(&mut self, location: &LocationId) -> usize {
        let counter = self.assistants.entry(location.clone()).or_insert(0);
        let current = *counter;
        *counter += 1;
        current
    }
}
