//! Progressive income tax estimate using the 2023 US federal schedule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::percent_of;

const BASIS_POINTS: i64 = 10_000;
const SOCIAL_SECURITY_RATE_BP: u32 = 620;
const MEDICARE_RATE_BP: u32 = 145;
/// Social security wage base for 2023, in minor units.
const SOCIAL_SECURITY_WAGE_BASE: i64 = 16_020_000;

/// Marginal rates in basis points, lowest bracket first.
const BRACKET_RATES_BP: [u32; 7] = [1_000, 1_200, 2_200, 2_400, 3_200, 3_500, 3_700];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedJoint,
        FilingStatus::MarriedSeparate,
        FilingStatus::HeadOfHousehold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedJoint => "married-joint",
            FilingStatus::MarriedSeparate => "married-separate",
            FilingStatus::HeadOfHousehold => "head-of-household",
        }
    }

    /// Standard deduction in minor units.
    pub fn standard_deduction(self) -> i64 {
        match self {
            FilingStatus::Single | FilingStatus::MarriedSeparate => 1_385_000,
            FilingStatus::MarriedJoint => 2_770_000,
            FilingStatus::HeadOfHousehold => 2_080_000,
        }
    }

    /// Upper bounds of every bracket except the open-ended top one.
    fn bracket_ceilings(self) -> [i64; 6] {
        match self {
            FilingStatus::Single => [
                1_100_000, 4_472_500, 9_537_500, 18_210_000, 23_125_000, 57_812_500,
            ],
            FilingStatus::MarriedJoint => [
                2_200_000, 8_945_000, 19_075_000, 36_420_000, 46_250_000, 69_375_000,
            ],
            FilingStatus::MarriedSeparate => [
                1_100_000, 4_472_500, 9_537_500, 18_210_000, 23_125_000, 34_687_500,
            ],
            FilingStatus::HeadOfHousehold => [
                1_570_000, 5_985_000, 9_535_000, 18_210_000, 23_125_000, 57_810_000,
            ],
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "single" => Ok(FilingStatus::Single),
            "married-joint" | "mfj" => Ok(FilingStatus::MarriedJoint),
            "married-separate" | "mfs" => Ok(FilingStatus::MarriedSeparate),
            "head-of-household" | "hoh" => Ok(FilingStatus::HeadOfHousehold),
            other => Err(format!("unknown filing status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxInput {
    /// Annual gross income in minor units.
    pub gross_income: i64,
    pub filing_status: FilingStatus,
    pub itemized_deductions: i64,
    /// Flat state rate; `None` for states without income tax.
    pub state_rate_bp: Option<u32>,
}

impl TaxInput {
    pub fn new(gross_income: i64, filing_status: FilingStatus) -> Self {
        Self {
            gross_income,
            filing_status,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BracketTax {
    pub rate_bp: u32,
    pub lower: i64,
    /// `None` for the top bracket.
    pub upper: Option<i64>,
    /// Portion of taxable income falling inside this bracket.
    pub taxed_amount: i64,
    pub tax: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxEstimate {
    pub gross_income: i64,
    pub deduction: i64,
    pub taxable_income: i64,
    pub brackets: Vec<BracketTax>,
    pub federal_tax: i64,
    pub social_security: i64,
    pub medicare: i64,
    pub state_tax: i64,
    pub total_tax: i64,
    pub effective_rate_percent: f64,
    pub marginal_rate_bp: u32,
    pub after_tax_income: i64,
}

impl TaxEstimate {
    pub fn fica_tax(&self) -> i64 {
        self.social_security.saturating_add(self.medicare)
    }
}

pub struct TaxService;

impl TaxService {
    pub fn estimate(input: &TaxInput) -> TaxEstimate {
        let gross = input.gross_income.max(0);
        let deduction = input
            .filing_status
            .standard_deduction()
            .max(input.itemized_deductions);
        let taxable_income = gross.saturating_sub(deduction).max(0);

        let brackets = Self::bracket_breakdown(input.filing_status, taxable_income);
        let federal_tax = brackets
            .iter()
            .map(|bracket| bracket.tax)
            .fold(0, i64::saturating_add);
        let marginal_rate_bp = brackets
            .iter()
            .rev()
            .find(|bracket| bracket.taxed_amount > 0)
            .map_or(0, |bracket| bracket.rate_bp);

        let social_security = apply_rate(gross.min(SOCIAL_SECURITY_WAGE_BASE), SOCIAL_SECURITY_RATE_BP);
        let medicare = apply_rate(gross, MEDICARE_RATE_BP);
        let state_tax = input
            .state_rate_bp
            .map_or(0, |rate| apply_rate(taxable_income, rate));

        let total_tax = [social_security, medicare, state_tax]
            .into_iter()
            .fold(federal_tax, i64::saturating_add);
        TaxEstimate {
            gross_income: gross,
            deduction,
            taxable_income,
            brackets,
            federal_tax,
            social_security,
            medicare,
            state_tax,
            total_tax,
            effective_rate_percent: percent_of(total_tax, gross),
            marginal_rate_bp,
            after_tax_income: gross.saturating_sub(total_tax),
        }
    }

    fn bracket_breakdown(status: FilingStatus, taxable_income: i64) -> Vec<BracketTax> {
        let ceilings = status.bracket_ceilings();
        let mut lower = 0;
        BRACKET_RATES_BP
            .iter()
            .enumerate()
            .map(|(index, &rate_bp)| {
                let upper = ceilings.get(index).copied();
                let top = upper.map_or(taxable_income, |ceiling| ceiling.min(taxable_income));
                let taxed_amount = top.saturating_sub(lower).max(0);
                let bracket = BracketTax {
                    rate_bp,
                    lower,
                    upper,
                    taxed_amount,
                    tax: apply_rate(taxed_amount, rate_bp),
                };
                if let Some(ceiling) = upper {
                    lower = ceiling;
                }
                bracket
            })
            .collect()
    }
}

/// `amount × rate`, rounded half-up to the nearest minor unit.
fn apply_rate(amount: i64, rate_bp: u32) -> i64 {
    let scaled = (i128::from(amount) * i128::from(rate_bp) + i128::from(BASIS_POINTS / 2))
        / i128::from(BASIS_POINTS);
    i64::try_from(scaled).unwrap_or(i64::MAX)
}
