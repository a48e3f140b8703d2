use log::debug;
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::portfolio::holdings::Holding;
use crate::portfolio::valuation::{
    FailedHoldingPolicy, HoldingOutcome, PortfolioTotals, ValuationResult,
};

fn out_of_range(what: &str, security_code: u32) -> Error {
    Error::Calculation(format!(
        "{} for holding {} is out of range",
        what, security_code
    ))
}

/// Values one holding at `current_price`.
///
/// All arithmetic is exact decimal arithmetic; the sign of the profit/loss
/// follows the sign of `current_price - purchase_price`. A price large
/// enough to overflow any figure yields [`Error::Calculation`].
pub fn calculate_valuation(holding: &Holding, current_price: Decimal) -> Result<ValuationResult> {
    let code = holding.security_code;
    let quantity = holding.quantity_decimal();
    let price_difference = current_price
        .checked_sub(holding.purchase_price)
        .ok_or_else(|| out_of_range("Price difference", code))?;

    Ok(ValuationResult {
        current_price,
        purchase_amount: holding
            .purchase_amount()
            .ok_or_else(|| out_of_range("Purchase amount", code))?,
        price_difference,
        valuation: current_price
            .checked_mul(quantity)
            .ok_or_else(|| out_of_range("Valuation", code))?,
        profit_loss: price_difference
            .checked_mul(quantity)
            .ok_or_else(|| out_of_range("Profit/loss", code))?,
    })
}

/// Figures shown for a holding whose price could not be fetched: every
/// price-derived field is the zero sentinel, the purchase amount is kept.
pub fn failed_valuation(holding: &Holding) -> ValuationResult {
    ValuationResult {
        current_price: Decimal::ZERO,
        // Validated holdings always have a purchase amount.
        purchase_amount: holding.purchase_amount().unwrap_or_default(),
        price_difference: Decimal::ZERO,
        valuation: Decimal::ZERO,
        profit_loss: Decimal::ZERO,
    }
}

/// Display figures for any outcome.
pub fn outcome_figures(holding: &Holding, outcome: &HoldingOutcome) -> ValuationResult {
    match outcome {
        HoldingOutcome::Valued(result) => result.clone(),
        HoldingOutcome::Failed(_) => failed_valuation(holding),
    }
}

/// Folds per-holding outcomes into portfolio totals.
///
/// Valued holdings add their purchase amount and profit/loss. Failed
/// holdings are handled according to `policy`. Fails with
/// [`Error::Calculation`] when a running total leaves the `Decimal` range.
pub fn summarize<'a, I>(outcomes: I, policy: FailedHoldingPolicy) -> Result<PortfolioTotals>
where
    I: IntoIterator<Item = (&'a Holding, &'a HoldingOutcome)>,
{
    let (purchase, profit_loss) = outcomes.into_iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(purchase, profit_loss), (holding, outcome)| -> Result<(Decimal, Decimal)> {
            let (add_purchase, add_profit_loss) = match outcome {
                HoldingOutcome::Valued(result) => (result.purchase_amount, result.profit_loss),
                HoldingOutcome::Failed(failure) => match policy {
                    FailedHoldingPolicy::ExcludeFromTotals => {
                        debug!("Excluding {} from totals", failure.symbol);
                        return Ok((purchase, profit_loss));
                    }
                    FailedHoldingPolicy::IncludePurchaseCost => (
                        holding
                            .purchase_amount()
                            .ok_or_else(|| out_of_range("Purchase amount", holding.security_code))?,
                        Decimal::ZERO,
                    ),
                },
            };
            let purchase = purchase
                .checked_add(add_purchase)
                .ok_or_else(|| out_of_range("Total purchase amount", holding.security_code))?;
            let profit_loss = profit_loss
                .checked_add(add_profit_loss)
                .ok_or_else(|| out_of_range("Total profit/loss", holding.security_code))?;
            Ok((purchase, profit_loss))
        },
    )?;

    PortfolioTotals::new(purchase, profit_loss)
}
