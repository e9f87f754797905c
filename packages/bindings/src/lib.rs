use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::loans::emi::EmiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::loans::emi::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_eligibility(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::loans::eligibility::EligibilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::loans::eligibility::calculate_eligibility(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Deposits
// ---------------------------------------------------------------------------

#[napi]
pub fn compound_growth(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::deposits::compound::CompoundGrowthInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::deposits::compound::calculate_compound_growth(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn fixed_deposit(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::deposits::compound::FixedDepositInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::deposits::compound::calculate_fixed_deposit(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn lump_sum(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::deposits::compound::LumpSumInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fincalc_core::deposits::compound::calculate_lump_sum(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn ppf(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::deposits::ppf::PpfInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::deposits::ppf::calculate_ppf(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investments
// ---------------------------------------------------------------------------

#[napi]
pub fn sip(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::investments::sip::SipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::investments::sip::calculate_sip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn savings_goal(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::investments::savings_goal::SavingsGoalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::investments::savings_goal::calculate_savings_goal(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn roi(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::investments::roi::RoiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::investments::roi::calculate_roi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[napi]
pub fn credit_card_payoff(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::cards::payoff::CardPayoffInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::cards::payoff::calculate_payoff(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Render an amount string as Indian-grouped rupees, e.g. "₹1,23,456.00".
#[napi]
pub fn format_inr(amount: String, decimal_places: Option<u32>) -> NapiResult<String> {
    let value: Decimal =
        fincalc_core::utils::parse::parse_amount_strict("amount", &amount).map_err(to_napi_error)?;
    Ok(fincalc_core::utils::format::format_inr(
        value,
        decimal_places.unwrap_or(2),
    ))
}

#[napi]
pub fn format_compact_inr(amount: String) -> NapiResult<String> {
    let value: Decimal =
        fincalc_core::utils::parse::parse_amount_strict("amount", &amount).map_err(to_napi_error)?;
    Ok(fincalc_core::utils::format::format_compact_inr(value))
}

/// Lenient parse of user-typed amounts; anything unparseable becomes "0".
#[napi]
pub fn parse_amount(raw: String) -> String {
    fincalc_core::utils::parse::parse_amount(&raw).to_string()
}
