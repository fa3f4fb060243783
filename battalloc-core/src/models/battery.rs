use crate::models::{BatteryId, OrderedSet, WellId};
use thiserror::Error;

/// A gathering point where the production of several wells is commingled.
///
/// The well set is ordered: the declared order is the order allocation
/// results are reported in, and the order rounding increments are handed
/// out in. Batteries are reference data owned outside the allocation
/// engine and are never modified by it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawBattery", into = "RawBattery")
)]
pub struct Battery {
    id: BatteryId,
    site: String,
    asset: String,
    wells: OrderedSet<WellId>,
}

/// The ways in which a battery definition may be invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatteryError {
    /// A battery must be fed by at least one well
    #[error("battery {0} has no wells")]
    NoWells(BatteryId),
    /// The same well was listed twice
    #[error("battery {battery_id} lists well {well_id} more than once")]
    DuplicateWell {
        /// The battery being defined
        battery_id: BatteryId,
        /// The repeated well
        well_id: WellId,
    },
}

impl Battery {
    /// Define a battery, validating its well set.
    pub fn new(
        id: BatteryId,
        site: impl Into<String>,
        asset: impl Into<String>,
        wells: impl IntoIterator<Item = WellId>,
    ) -> Result<Self, BatteryError> {
        let mut set = OrderedSet::default();
        for well_id in wells {
            if let Some(well_id) = set.replace(well_id) {
                return Err(BatteryError::DuplicateWell {
                    battery_id: id,
                    well_id,
                });
            }
        }
        if set.is_empty() {
            return Err(BatteryError::NoWells(id));
        }
        Ok(Self {
            id,
            site: site.into(),
            asset: asset.into(),
            wells: set,
        })
    }

    /// The battery identifier
    pub fn id(&self) -> &BatteryId {
        &self.id
    }

    /// The site the battery belongs to
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The asset the battery belongs to
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// The wells feeding this battery, in declared order (never empty)
    pub fn wells(&self) -> &OrderedSet<WellId> {
        &self.wells
    }

    /// Whether `well_id` feeds this battery
    pub fn contains(&self, well_id: &WellId) -> bool {
        self.wells.contains(well_id)
    }
}

/// The (de)serialization shape of a [`Battery`], validated on the way in.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawBattery {
    /// The battery identifier
    pub id: BatteryId,
    /// The site the battery belongs to
    #[cfg_attr(feature = "serde", serde(default))]
    pub site: String,
    /// The asset the battery belongs to
    #[cfg_attr(feature = "serde", serde(default))]
    pub asset: String,
    /// The wells feeding the battery, in declared order
    pub wells: Vec<WellId>,
}

impl TryFrom<RawBattery> for Battery {
    type Error = BatteryError;

    fn try_from(value: RawBattery) -> Result<Self, Self::Error> {
        Battery::new(value.id, value.site, value.asset, value.wells)
    }
}

impl From<Battery> for RawBattery {
    fn from(value: Battery) -> Self {
        Self {
            id: value.id,
            site: value.site,
            asset: value.asset,
            wells: value.wells.into_iter().collect(),
        }
    }
}
