//! JSON snapshots of raw service-area blocks
//!
//! A snapshot stores the 96 bytes exactly as they sit on the card, plus the
//! effective date needed to decode them. Restoring always goes back through
//! the byte parser.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::anchor::EffectiveDate;
use crate::csa::CsaContainer;
use crate::error::{CardError, ConsistencyError, FormatError};
use crate::osa::OsaContainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceArea {
    Csa,
    Osa,
}

impl fmt::Display for ServiceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceArea::Csa => write!(f, "CSA"),
            ServiceArea::Osa => write!(f, "OSA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub area: ServiceArea,
    pub effective_date: EffectiveDate,
    pub block_hex: String,
}

impl BlockSnapshot {
    pub fn from_csa(csa: &CsaContainer) -> Self {
        Self {
            area: ServiceArea::Csa,
            effective_date: csa.effective_date(),
            block_hex: csa.to_hex(),
        }
    }

    pub fn from_osa(osa: &OsaContainer) -> Self {
        Self {
            area: ServiceArea::Osa,
            effective_date: osa.effective_date(),
            block_hex: osa.to_hex(),
        }
    }

    pub fn to_json(&self) -> Result<String, CardError> {
        serde_json::to_string(self).map_err(|e| snapshot_error("JSON serialization failed", e))
    }

    pub fn to_json_pretty(&self) -> Result<String, CardError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| snapshot_error("JSON serialization failed", e))
    }

    pub fn from_json(json: &str) -> Result<Self, CardError> {
        serde_json::from_str(json).map_err(|e| snapshot_error("JSON deserialization failed", e))
    }

    pub fn to_csa(&self) -> Result<CsaContainer, CardError> {
        self.expect_area(ServiceArea::Csa)?;
        CsaContainer::from_hex(&self.block_hex, self.effective_date)
    }

    pub fn to_osa(&self) -> Result<OsaContainer, CardError> {
        self.expect_area(ServiceArea::Osa)?;
        OsaContainer::from_hex(&self.block_hex, self.effective_date)
    }

    fn expect_area(&self, expected: ServiceArea) -> Result<(), ConsistencyError> {
        if self.area != expected {
            tracing::debug!(%expected, actual = %self.area, "snapshot area mismatch");
            return Err(ConsistencyError::AreaMismatch {
                expected: expected.to_string(),
                actual: self.area.to_string(),
            });
        }
        Ok(())
    }
}

fn snapshot_error(context: &str, error: serde_json::Error) -> CardError {
    FormatError::Snapshot { reason: format!("{}: {}", context, error) }.into()
}
