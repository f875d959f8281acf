use rust_decimal::Decimal;

/// A point of a piecewise-linear sub-value function
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoint {
    /// The regional capacity
    pub capacity: Decimal,
    /// The (undiscounted) value of that capacity
    pub value: Decimal,
}

/// A bidder's undiscounted value of a region as a function of the capacity it
/// holds there.
///
/// The function is piecewise-linear through the given breakpoints and must:
/// - start at the origin (no capacity, no value),
/// - have strictly increasing capacities,
/// - be weakly monotone increasing in value.
///
/// Beyond the last breakpoint the function stays constant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")
)]
pub struct SvFunction(Vec<Breakpoint>);

impl SvFunction {
    /// Creates a new function from its breakpoints, validating all constraints
    pub fn new(points: Vec<Breakpoint>) -> Result<Self, SvFunctionError> {
        Self::try_from(points)
    }

    /// The piecewise-linear approximation of a sigmoid used by the
    /// multi-region value model.
    ///
    /// With `x` the share of `max_capacity` a bidder holds, the outer pieces
    /// (`x < z_low` and `x > z_high`) have a relative slope of one half and the
    /// middle piece makes up the difference, so that the function reaches
    /// `scale` exactly at `max_capacity`.
    pub fn sigmoid(
        scale: Decimal,
        max_capacity: Decimal,
        z_low: Decimal,
        z_high: Decimal,
    ) -> Result<Self, SvFunctionError> {
        if !(Decimal::ZERO < z_low && z_low < z_high && z_high < Decimal::ONE) {
            return Err(SvFunctionError::Shape);
        }
        if max_capacity <= Decimal::ZERO || scale.is_sign_negative() {
            return Err(SvFunctionError::Shape);
        }

        let half = Decimal::new(5, 1);
        Self::new(vec![
            Breakpoint {
                capacity: Decimal::ZERO,
                value: Decimal::ZERO,
            },
            Breakpoint {
                capacity: z_low * max_capacity,
                value: scale * z_low * half,
            },
            Breakpoint {
                capacity: z_high * max_capacity,
                value: scale * (Decimal::ONE + z_high) * half,
            },
            Breakpoint {
                capacity: max_capacity,
                value: scale,
            },
        ])
    }

    /// The breakpoints of the function
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.0
    }

    /// Evaluate the function at the given capacity
    pub fn value(&self, capacity: Decimal) -> Decimal {
        let mut prev = self.0[0];
        for &point in self.0[1..].iter() {
            if capacity <= point.capacity {
                if capacity <= prev.capacity {
                    return prev.value;
                }
                let slope = (point.value - prev.value) / (point.capacity - prev.capacity);
                return prev.value + slope * (capacity - prev.capacity);
            }
            prev = point;
        }
        prev.value
    }

    /// The linear pieces of the function, as `(length, slope)` pairs in order
    /// of increasing capacity.
    pub fn segments(&self) -> impl Iterator<Item = (Decimal, Decimal)> + '_ {
        self.0.windows(2).map(|pair| {
            let dx = pair[1].capacity - pair[0].capacity;
            (dx, (pair[1].value - pair[0].value) / dx)
        })
    }

    /// The capacity of the last breakpoint
    pub fn max_capacity(&self) -> Decimal {
        self.0[self.0.len() - 1].capacity
    }
}

impl TryFrom<Vec<Breakpoint>> for SvFunction {
    type Error = SvFunctionError;

    fn try_from(value: Vec<Breakpoint>) -> Result<Self, Self::Error> {
        let Some(first) = value.first() else {
            return Err(SvFunctionError::Empty);
        };
        if !first.capacity.is_zero() || !first.value.is_zero() {
            return Err(SvFunctionError::Origin);
        }
        for pair in value.windows(2) {
            if pair[1].capacity <= pair[0].capacity {
                return Err(SvFunctionError::NonIncreasingCapacity);
            }
            if pair[1].value < pair[0].value {
                return Err(SvFunctionError::DecreasingValue);
            }
        }
        Ok(Self(value))
    }
}

impl From<SvFunction> for Vec<Breakpoint> {
    fn from(value: SvFunction) -> Self {
        value.0
    }
}

/// Errors that can occur when creating a sub-value function
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SvFunctionError {
    /// No breakpoints provided
    #[error("no breakpoints provided")]
    Empty,
    /// The function must start at (0, 0)
    #[error("the first breakpoint must be the origin")]
    Origin,
    /// Breakpoints must be ordered by strictly increasing capacity
    #[error("breakpoints are not ordered by strictly increasing capacity")]
    NonIncreasingCapacity,
    /// Values must be weakly increasing
    #[error("values decrease with capacity")]
    DecreasingValue,
    /// Invalid sigmoid parameters
    #[error("sigmoid parameters must satisfy 0 < z_low < z_high < 1 with a positive capacity")]
    Shape,
}
