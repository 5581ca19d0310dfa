//! Business-rule policy, injected into the engine at construction.
//!
//! The marketplace operators have historically run with different rules
//! (fee rate, upfront vs settlement fee collection, cash vs ledger
//! settlement, minimum rental duration), so none of them are hardcoded:
//! every knob lives here and tests can exercise each variant.

use serde::Deserialize;

/// When the platform fee is taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeCollection {
    /// Debited from the driver's wallet when the booking is created; the
    /// whole creation fails (and the spot reservation is undone) if the
    /// driver cannot pay it.
    #[default]
    Upfront,
    /// Deducted from the host payout at settlement time.
    OnSettlement,
}

/// How the rental price itself is settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    /// The driver pays the owner directly (cash/UPI); the ledger only records
    /// the owner's earning when the booking completes.
    #[default]
    OffLedger,
    /// `mark_payment_completed` debits the driver's wallet and credits the
    /// owner's wallet; completion moves no money.
    LedgerOnPayment,
}

/// The injectable rule set.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Platform fee rate in basis points (100 = 1%, 500 = 5%).
    pub fee_rate_bps: u32,
    pub fee_collection: FeeCollection,
    pub settlement: SettlementMode,
    /// Minimum rental duration as a fraction of the listing's `total_hours`;
    /// `None` disables the rule.
    pub min_rental_fraction: Option<f64>,
    /// User id whose wallet receives platform fees, so fee debits always
    /// have a matching credit and no money vanishes from the ledger.
    pub platform_account: String,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            fee_rate_bps: 100,
            fee_collection: FeeCollection::default(),
            settlement: SettlementMode::default(),
            min_rental_fraction: None,
            platform_account: "platform".to_string(),
        }
    }
}

impl Policy {
    /// Minimum bookable hours for a listing, when the rule is enabled.
    pub fn min_rental_hours(&self, listing_total_hours: i64) -> Option<f64> {
        self.min_rental_fraction
            .map(|fraction| listing_total_hours as f64 * fraction)
    }
}
