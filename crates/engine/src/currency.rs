use serde::{Deserialize, Serialize};

/// ISO currency code used to display ledger amounts.
///
/// Amounts are stored as an `i64` number of **minor units** (see [`Money`])
/// with two decimals for every supported currency, so `150000000` displays
/// as `1500000.00 IDR`.
///
/// The currency is a display setting only: switching it never rescales stored
/// amounts.
///
/// [`Money`]: crate::Money
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Idr,
    Usd,
    Eur,
    Sgd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Sgd => "SGD",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}
