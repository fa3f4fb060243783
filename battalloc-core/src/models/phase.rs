/// One of the three fluid phases produced by a well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Phase {
    /// Crude oil
    Oil,
    /// Natural gas
    Gas,
    /// Produced water
    Water,
}

impl Phase {
    /// Every phase, in canonical order
    pub const ALL: [Phase; 3] = [Phase::Oil, Phase::Gas, Phase::Water];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Oil => "oil",
            Self::Gas => "gas",
            Self::Water => "water",
        })
    }
}

/// One value per phase.
///
/// Rates, measured volumes, allocated volumes and variances are all
/// triples over the same three phases, and every algorithm in this
/// workspace treats the phases independently. `Phases` lets that code be
/// written once and applied per phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phases<T> {
    /// The oil value
    pub oil: T,
    /// The gas value
    pub gas: T,
    /// The water value
    pub water: T,
}

impl<T> Phases<T> {
    /// Construct from the three phase values.
    pub const fn new(oil: T, gas: T, water: T) -> Self {
        Self { oil, gas, water }
    }

    /// Build each phase's value from a function of the phase.
    pub fn from_fn(mut f: impl FnMut(Phase) -> T) -> Self {
        Self {
            oil: f(Phase::Oil),
            gas: f(Phase::Gas),
            water: f(Phase::Water),
        }
    }

    /// The value for `phase`.
    pub fn get(&self, phase: Phase) -> &T {
        match phase {
            Phase::Oil => &self.oil,
            Phase::Gas => &self.gas,
            Phase::Water => &self.water,
        }
    }

    /// Transform every phase value.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Phases<U> {
        Phases {
            oil: f(self.oil),
            gas: f(self.gas),
            water: f(self.water),
        }
    }

    /// Pair up the values of two triples phase by phase.
    pub fn zip<U>(self, other: Phases<U>) -> Phases<(T, U)> {
        Phases {
            oil: (self.oil, other.oil),
            gas: (self.gas, other.gas),
            water: (self.water, other.water),
        }
    }

    /// Iterate over `(phase, value)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &T)> {
        Phase::ALL.into_iter().map(move |phase| (phase, self.get(phase)))
    }
}

impl<T: Copy> Phases<T> {
    /// The same value for every phase.
    pub const fn splat(value: T) -> Self {
        Self {
            oil: value,
            gas: value,
            water: value,
        }
    }
}

impl<T: std::ops::Add<Output = T>> std::ops::Add for Phases<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            oil: self.oil + rhs.oil,
            gas: self.gas + rhs.gas,
            water: self.water + rhs.water,
        }
    }
}

impl<T: std::ops::Add<Output = T> + Default> std::iter::Sum for Phases<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, x| acc + x)
    }
}
