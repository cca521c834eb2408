use serde::{Deserialize, Serialize};

/// A dependent claimed on the return. Only the credit flags affect
/// calculations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub qualifies_for_child_tax_credit: bool,
    #[serde(default)]
    pub qualifies_for_earned_income_credit: bool,
}

impl Dependent {
    pub fn qualifying_child(name: &str) -> Self {
        Self {
            name: name.to_string(),
            relationship: "child".to_string(),
            qualifies_for_child_tax_credit: true,
            qualifies_for_earned_income_credit: true,
        }
    }
}

pub(crate) fn count_child_tax_credit(dependents: &[Dependent]) -> usize {
    dependents
        .iter()
        .filter(|d| d.qualifies_for_child_tax_credit)
        .count()
}

pub(crate) fn count_earned_income_credit(dependents: &[Dependent]) -> usize {
    dependents
        .iter()
        .filter(|d| d.qualifies_for_earned_income_credit)
        .count()
}
