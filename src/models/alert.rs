/// Chat id of the user owning a flow or alert. Everything the bot stores is
/// partitioned by this.
pub type OwnerId = i64;

/// Trigger comparison for a one-shot price alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }

    pub fn parse(s: &str) -> Option<Direction> {
        match s {
            "BUY" => Some(Direction::Buy),
            "SELL" => Some(Direction::Sell),
            _ => None,
        }
    }

    /// Buy fires when the price rises to/above the target, Sell when it
    /// falls to/below it.
    pub fn hit(&self, price: f64, target: f64) -> bool {
        match self {
            Direction::Buy => price >= target,
            Direction::Sell => price <= target,
        }
    }
}

/// The fixed set of chart timeframes offered for SharpTurn alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    H1,
    H4,
    D1,
    W1,
    Mn,
}

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
        Timeframe::W1,
        Timeframe::Mn,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
            Timeframe::W1 => "1w",
            Timeframe::Mn => "1M",
        }
    }

    // Labels are case-sensitive: "1m" and "1M" are different timeframes.
    pub fn parse(s: &str) -> Option<Timeframe> {
        Timeframe::ALL.iter().copied().find(|tf| tf.label() == s)
    }
}

/// Confirmed one-shot alert. Removed from the store the moment it fires.
///
/// Equality is over the full tuple; two identical alerts are legal and
/// independent, and removal takes out one instance at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAlert {
    pub owner: OwnerId,
    pub symbol: String,
    pub target: f64,
    pub direction: Direction,
}

impl PriceAlert {
    pub fn triggered_by(&self, price: f64) -> bool {
        self.direction.hit(price, self.target)
    }
}

/// Confirmed two-point range alert. Stored and listed; the matching loop
/// does not evaluate these.
#[derive(Debug, Clone, PartialEq)]
pub struct SharpTurnAlert {
    pub owner: OwnerId,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub price_a: f64,
    pub price_b: f64,
}
