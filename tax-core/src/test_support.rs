//! 2024 tables built in code for unit tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    CreditConfig, EitcBucket, EitcPhaseInRates, FilingStatus, PlanningConfig, StandardDeduction,
    TaxBracket, TaxYearConfig,
};

fn schedule(
    filing_status: FilingStatus,
    tiers: &[(Option<Decimal>, Decimal)],
) -> Vec<TaxBracket> {
    let mut brackets = Vec::with_capacity(tiers.len());
    let mut min_income = Decimal::ZERO;
    let mut base_tax = Decimal::ZERO;

    for &(max_income, tax_rate) in tiers {
        brackets.push(TaxBracket {
            tax_year: 2024,
            filing_status,
            min_income,
            max_income,
            tax_rate,
            base_tax,
        });
        if let Some(max) = max_income {
            base_tax += (max - min_income) * tax_rate;
            min_income = max;
        }
    }

    brackets
}

fn tiers(bounds: [Decimal; 6]) -> Vec<(Option<Decimal>, Decimal)> {
    let rates = [
        dec!(0.10),
        dec!(0.12),
        dec!(0.22),
        dec!(0.24),
        dec!(0.32),
        dec!(0.35),
    ];
    bounds
        .into_iter()
        .zip(rates)
        .map(|(bound, rate)| (Some(bound), rate))
        .chain(std::iter::once((None, dec!(0.37))))
        .collect()
}

pub(crate) fn config_2024() -> TaxYearConfig {
    let single = tiers([
        dec!(11600),
        dec!(47150),
        dec!(100525),
        dec!(191950),
        dec!(243725),
        dec!(609350),
    ]);
    let joint = tiers([
        dec!(23200),
        dec!(94300),
        dec!(201050),
        dec!(383900),
        dec!(487450),
        dec!(731200),
    ]);
    let separate = tiers([
        dec!(11600),
        dec!(47150),
        dec!(100525),
        dec!(191950),
        dec!(243725),
        dec!(365600),
    ]);
    let head = tiers([
        dec!(16550),
        dec!(63100),
        dec!(100500),
        dec!(191950),
        dec!(243700),
        dec!(609350),
    ]);

    let mut brackets = Vec::new();
    brackets.extend(schedule(FilingStatus::Single, &single));
    brackets.extend(schedule(FilingStatus::MarriedFilingJointly, &joint));
    brackets.extend(schedule(FilingStatus::MarriedFilingSeparately, &separate));
    brackets.extend(schedule(FilingStatus::HeadOfHousehold, &head));
    brackets.extend(schedule(FilingStatus::QualifyingSurvivingSpouse, &joint));

    let standard_deductions = [
        (FilingStatus::Single, dec!(14600)),
        (FilingStatus::MarriedFilingJointly, dec!(29200)),
        (FilingStatus::MarriedFilingSeparately, dec!(14600)),
        (FilingStatus::HeadOfHousehold, dec!(21900)),
        (FilingStatus::QualifyingSurvivingSpouse, dec!(29200)),
    ]
    .into_iter()
    .map(|(filing_status, amount)| StandardDeduction {
        tax_year: 2024,
        filing_status,
        amount,
    })
    .collect();

    let eitc_buckets = [
        (0, dec!(632), dec!(18591)),
        (1, dec!(4213), dec!(49084)),
        (2, dec!(6960), dec!(55768)),
        (3, dec!(7830), dec!(59899)),
    ]
    .into_iter()
    .map(|(qualifying_children, max_credit, income_limit)| EitcBucket {
        qualifying_children,
        max_credit,
        income_limit,
    })
    .collect();

    TaxYearConfig {
        tax_year: 2024,
        brackets,
        standard_deductions,
        credits: CreditConfig {
            child_tax_credit_per_child: dec!(2000),
            eitc_buckets,
            eitc_phase_in: EitcPhaseInRates {
                no_children: dec!(0.0765),
                one_child: dec!(0.34),
                two_or_more_children: dec!(0.40),
            },
        },
        planning: PlanningConfig {
            near_itemize_gap: dec!(5000),
            scenario_increments: vec![dec!(1000), dec!(2500), dec!(5000), dec!(10000)],
            retirement_agi_threshold: dec!(100000),
            low_income_agi_threshold: dec!(30000),
            catch_up_age: 50,
        },
    }
}
