//! Record types served by `Dex`.

use dex_core::{Record, Schema, SchemaError};
use serde::{Deserialize, Serialize};

/// One row of `pokemon.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub identifier: String,
    pub id: u64,
    pub species_id: u32,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    pub base_experience: u32,
    pub order: u32,
    pub is_default: bool,
}

impl Record for Pokemon {
    fn id(&self) -> u64 {
        self.id
    }

    fn schema() -> Result<Schema<Self>, SchemaError> {
        Schema::builder()
            .field("identifier", |p: &mut Pokemon| &mut p.identifier)
            .field("id", |p: &mut Pokemon| &mut p.id)
            .field("species_id", |p: &mut Pokemon| &mut p.species_id)
            .field("height", |p: &mut Pokemon| &mut p.height)
            .field("weight", |p: &mut Pokemon| &mut p.weight)
            .field("base_experience", |p: &mut Pokemon| &mut p.base_experience)
            .field("order", |p: &mut Pokemon| &mut p.order)
            .field("is_default", |p: &mut Pokemon| &mut p.is_default)
            .build()
    }
}
