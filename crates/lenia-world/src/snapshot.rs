//! Point-in-time captures of a simulator, for resuming or offline analysis.

use crate::field::Field;
use lenia_core::{Bounds, Error, LeniaParams, Result, RunId};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub run_id: RunId,
    /// Unix seconds at capture time
    pub timestamp: i64,
    pub step: u64,
    pub generation: u64,
    pub params: LeniaParams,
    pub bounds: Bounds,
    pub field: Field,
    pub rng: ChaCha8Rng,
}

impl Snapshot {
    pub fn capture(
        run_id: RunId,
        step: u64,
        generation: u64,
        params: LeniaParams,
        bounds: Bounds,
        field: Field,
        rng: ChaCha8Rng,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            run_id,
            timestamp: chrono::Utc::now().timestamp(),
            step,
            generation,
            params,
            bounds,
            field,
            rng,
        }
    }

    /// Check the parts deserialization alone cannot guarantee
    pub fn validate(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(Error::Validation(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }
        let (width, height) = (self.field.width(), self.field.height());
        if width == 0 || height == 0 || self.field.len() != width * height {
            return Err(Error::Validation(format!(
                "snapshot field of {}x{} holds {} cells",
                width,
                height,
                self.field.len()
            )));
        }
        self.params.validate()?;
        self.bounds.validate()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot = bincode::deserialize(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
