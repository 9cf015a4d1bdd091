//! Benchmark catalog of scalar objectives and the [`Problem`] they define.
//!
//! The catalog is closed: every entry is an [`ObjectiveId`] variant with an
//! analytic form and fixed bounds. Hosts refer to entries by their string
//! identifier:
//!
//! | Identifier | Function | Bounds | Global minimum |
//! |---|---|---|---|
//! | `sin_x_x` | `x·sin(x)` | `[0, 10]` | `f(10) ≈ -5.4402` |
//! | `gramacy_lee` | `sin(10πx)/(2x) + (x-1)⁴` | `[0.5, 2.5]` | `f(0.5486) ≈ -0.8690` |
//! | `forrester` | `(6x-2)²·sin(12x-4)` | `[0, 1]` | `f(0.7572) ≈ -6.0207` |
//!
//! Arbitrary functions can still be optimized by building a [`Problem`]
//! directly with [`Problem::new`].
//!
//! ```
//! use gp_bayesopt::objective::{ObjectiveId, Problem};
//!
//! let id: ObjectiveId = "forrester".parse().unwrap();
//! let problem = Problem::from_id(id);
//! assert_eq!(problem.bounds(), (0.0, 1.0));
//! assert!("rosenbrock".parse::<ObjectiveId>().is_err());
//! ```

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a benchmark objective in the fixed catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectiveId {
    /// `x·sin(x)` on `[0, 10]`.
    SinXX,
    /// Gramacy & Lee (2012) on `[0.5, 2.5]`.
    GramacyLee,
    /// Forrester et al. (2008) on `[0, 1]`.
    Forrester,
}

impl ObjectiveId {
    /// Every catalog entry, in display order.
    pub const ALL: [Self; 3] = [Self::SinXX, Self::GramacyLee, Self::Forrester];

    /// The string identifier accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SinXX => "sin_x_x",
            Self::GramacyLee => "gramacy_lee",
            Self::Forrester => "forrester",
        }
    }

    /// Fixed search interval `(low, high)`.
    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Self::SinXX => (0.0, 10.0),
            Self::GramacyLee => (0.5, 2.5),
            Self::Forrester => (0.0, 1.0),
        }
    }

    /// The objective as a plain function pointer.
    #[must_use]
    pub fn function(self) -> fn(f64) -> f64 {
        match self {
            Self::SinXX => x_sin_x,
            Self::GramacyLee => gramacy_lee,
            Self::Forrester => forrester,
        }
    }
}

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectiveId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| Error::UnknownObjective(s.to_owned()))
    }
}

fn x_sin_x(x: f64) -> f64 {
    x * x.sin()
}

fn gramacy_lee(x: f64) -> f64 {
    (10.0 * PI * x).sin() / (2.0 * x) + (x - 1.0).powi(4)
}

fn forrester(x: f64) -> f64 {
    (6.0 * x - 2.0).powi(2) * (12.0 * x - 4.0).sin()
}

/// A scalar objective together with its search interval.
///
/// Immutable once built; a session owns exactly one.
#[derive(Clone, Copy, Debug)]
pub struct Problem {
    objective: fn(f64) -> f64,
    low: f64,
    high: f64,
    id: Option<ObjectiveId>,
}

impl Problem {
    /// Build a problem from an arbitrary function and bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] unless both bounds are finite and
    /// `low < high`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gp_bayesopt::objective::Problem;
    ///
    /// let problem = Problem::new(|x| (x - 3.0).powi(2), -10.0, 10.0).unwrap();
    /// assert_eq!(problem.evaluate(3.0), 0.0);
    /// assert!(Problem::new(|x| x, 1.0, 0.0).is_err());
    /// ```
    pub fn new(objective: fn(f64) -> f64, low: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(Error::InvalidBounds { low, high });
        }
        Ok(Self {
            objective,
            low,
            high,
            id: None,
        })
    }

    /// The problem for a catalog entry.
    #[must_use]
    pub fn from_id(id: ObjectiveId) -> Self {
        let (low, high) = id.bounds();
        Self {
            objective: id.function(),
            low,
            high,
            id: Some(id),
        }
    }

    /// Look up a catalog entry by its string identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownObjective`] if `name` is not in the catalog.
    pub fn resolve(name: &str) -> Result<Self> {
        name.parse().map(Self::from_id)
    }

    /// The catalog entry this problem was built from, if any.
    #[must_use]
    pub fn id(&self) -> Option<ObjectiveId> {
        self.id
    }

    /// `(low, high)`
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// Evaluate the objective at `x`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        (self.objective)(x)
    }

    /// Evaluate the objective at every point of `xs`.
    #[must_use]
    pub fn evaluate_grid(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Draw a point uniformly from `[low, high)`.
    pub fn sample_uniform(&self, rng: &mut fastrand::Rng) -> f64 {
        self.low + rng.f64() * (self.high - self.low)
    }
}
