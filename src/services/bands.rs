/// Ordered threshold rules used by the normalizers.
///
/// A table is evaluated top-down and the first band whose bound is strictly
/// crossed wins. A value sitting exactly on a bound therefore falls into the
/// next (lower-scoring) band.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Higher is better: band matches when `value > bound`.
    Above,
    /// Lower is better: band matches when `value < bound`.
    Below,
}

/// Score used when no band matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    Fixed(f64),
    /// `max(floor, value * slope)`
    Linear { slope: f64, floor: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct BandTable {
    pub direction: Direction,
    /// `(bound, score)` pairs, most favourable first.
    pub bands: &'static [(f64, f64)],
    pub fallback: Fallback,
}

impl BandTable {
    pub const fn above(bands: &'static [(f64, f64)], fallback: Fallback) -> Self {
        Self { direction: Direction::Above, bands, fallback }
    }

    pub const fn below(bands: &'static [(f64, f64)], fallback: Fallback) -> Self {
        Self { direction: Direction::Below, bands, fallback }
    }

    pub fn score(&self, value: f64) -> f64 {
        let hit = self.bands.iter().find(|(bound, _)| match self.direction {
            Direction::Above => value > *bound,
            Direction::Below => value < *bound,
        });

        match hit {
            Some((_, score)) => *score,
            None => match self.fallback {
                Fallback::Fixed(score) => score,
                Fallback::Linear { slope, floor } => (value * slope).max(floor),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Financial health
// ---------------------------------------------------------------------------

pub const DEBT_RATIO: BandTable =
    BandTable::below(&[(0.2, 1.0), (0.5, 0.85), (0.8, 0.65)], Fallback::Fixed(0.4));

pub const FREE_CASH_FLOW_RATIO: BandTable =
    BandTable::above(&[(0.05, 0.9), (0.0, 0.7)], Fallback::Fixed(0.4));

// ---------------------------------------------------------------------------
// Profitability
// ---------------------------------------------------------------------------

pub const PROFIT_MARGIN: BandTable = BandTable::above(
    &[(0.30, 1.0), (0.20, 0.75), (0.12, 0.55), (0.06, 0.35)],
    Fallback::Linear { slope: 3.0, floor: 0.15 },
);

pub const OPERATING_MARGIN: BandTable = BandTable::above(
    &[(0.35, 1.0), (0.25, 0.75), (0.15, 0.55), (0.08, 0.35)],
    Fallback::Linear { slope: 2.5, floor: 0.15 },
);

pub const RETURN_ON_EQUITY: BandTable = BandTable::above(
    &[(0.25, 1.0), (0.18, 0.75), (0.12, 0.55), (0.06, 0.35)],
    Fallback::Linear { slope: 2.5, floor: 0.15 },
);

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

pub const REVENUE_GROWTH: BandTable = BandTable::above(
    &[(0.2, 1.0), (0.1, 0.8), (0.05, 0.65), (0.0, 0.5)],
    Fallback::Fixed(0.35),
);

pub const EARNINGS_GROWTH: BandTable = BandTable::above(
    &[(0.2, 1.0), (0.1, 0.8), (0.05, 0.65), (0.0, 0.5)],
    Fallback::Fixed(0.35),
);

// ---------------------------------------------------------------------------
// Momentum (relative to benchmark)
// ---------------------------------------------------------------------------

pub const RELATIVE_MOMENTUM_1M: BandTable = BandTable::above(
    &[(0.08, 1.0), (0.03, 0.85), (-0.02, 0.7), (-0.06, 0.55)],
    Fallback::Fixed(0.4),
);

pub const RELATIVE_MOMENTUM_3M: BandTable = BandTable::above(
    &[(0.15, 1.0), (0.05, 0.85), (-0.05, 0.7), (-0.12, 0.55)],
    Fallback::Fixed(0.4),
);

// ---------------------------------------------------------------------------
// Stability
// ---------------------------------------------------------------------------

pub const BETA: BandTable = BandTable::below(
    &[(0.7, 1.0), (1.0, 0.85), (1.3, 0.7), (1.6, 0.55)],
    Fallback::Fixed(0.4),
);

pub const RANGE_VOLATILITY: BandTable = BandTable::below(
    &[(0.25, 1.0), (0.4, 0.85), (0.6, 0.7), (0.85, 0.55)],
    Fallback::Fixed(0.4),
);

pub const MAX_DRAWDOWN: BandTable = BandTable::below(
    &[(0.12, 1.0), (0.20, 0.85), (0.30, 0.7), (0.45, 0.55)],
    Fallback::Fixed(0.4),
);
