//! Field rules for cost centers and chart-of-accounts entries.
//!
//! Every function is pure and returns the ordered list of violations it found
//! (empty = valid). Rules run on the trimmed value; case normalization happens
//! later, on the value that gets committed. Callers aggregate the lists and
//! reject the whole record if any rule failed.

use crate::{Coa, CoaInput, CostCenter, CostCenterInput, Money};

pub const CODE_MIN_LEN: usize = 2;
pub const CODE_MAX_LEN: usize = 10;
pub const CENTER_NAME_MIN_LEN: usize = 2;
pub const CENTER_NAME_MAX_LEN: usize = 100;
pub const MANAGER_MIN_LEN: usize = 2;
pub const MANAGER_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const COA_CODE_MIN_LEN: usize = 3;
pub const COA_CODE_MAX_LEN: usize = 8;
pub const COA_NAME_MIN_LEN: usize = 3;
pub const COA_NAME_MAX_LEN: usize = 150;

/// Upper bound for a monthly budget, in major units.
pub const MAX_MONTHLY_BUDGET: i64 = 999_000_000_000;
/// Upper bound for a yearly budget, in major units.
pub const MAX_YEARLY_BUDGET: i64 = 9_900_000_000_000;
/// Allowed deviation of the yearly budget from `monthly × 12`, in percent.
pub const YEARLY_TOLERANCE_PCT: i128 = 20;
pub const MIN_BUDGET_YEAR: i32 = 2020;
/// How many years past the current one a budget period may reach.
pub const BUDGET_YEARS_AHEAD: i32 = 10;

pub const RESERVED_CODES: &[&str] = &[
    "ADMIN",
    "ROOT",
    "SYSTEM",
    "NULL",
    "UNDEFINED",
    "DEFAULT",
    "NONE",
    "ALL",
    "TEST",
];

pub const RESERVED_COA_CODES: &[&str] = &["000", "0000", "999", "9999", "00000000", "99999999"];

pub const RESERVED_NAME_TERMS: &[&str] = &[
    "drop table",
    "delete from",
    "insert into",
    "select *",
    "union select",
    "--",
];

/// Runs every cost-center rule. `own_id` excludes the record itself from the
/// uniqueness check on update.
pub fn validate_cost_center(
    input: &CostCenterInput,
    centers: &[CostCenter],
    own_id: Option<&str>,
    current_year: i32,
) -> Vec<String> {
    let mut violations = validate_cost_center_code(&input.code, centers, own_id);
    violations.extend(validate_name(
        &input.name,
        "Cost center",
        CENTER_NAME_MIN_LEN,
        CENTER_NAME_MAX_LEN,
    ));
    violations.extend(validate_description(
        input.description.as_deref(),
        "Cost center",
    ));
    violations.extend(validate_manager(&input.manager));
    violations.extend(validate_budgets(input.monthly_budget, input.yearly_budget));
    violations.extend(validate_budget_period(
        input.budget_period.as_deref(),
        current_year,
    ));
    violations
}

pub fn validate_cost_center_code(
    code: &str,
    centers: &[CostCenter],
    own_id: Option<&str>,
) -> Vec<String> {
    let code = code.trim();
    if code.is_empty() {
        return vec!["Cost center code is required".to_string()];
    }

    let mut violations = Vec::new();
    let len = code.chars().count();
    if !(CODE_MIN_LEN..=CODE_MAX_LEN).contains(&len) {
        violations.push(format!(
            "Cost center code must be between {CODE_MIN_LEN} and {CODE_MAX_LEN} characters"
        ));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        violations.push(
            "Cost center code may only contain letters, numbers, hyphens and underscores"
                .to_string(),
        );
    }
    let upper = code.to_uppercase();
    if RESERVED_CODES.contains(&upper.as_str()) {
        violations.push(format!("Cost center code '{upper}' is a reserved word"));
    }
    if centers
        .iter()
        .any(|center| Some(center.id.as_str()) != own_id && center.code.to_uppercase() == upper)
    {
        violations.push(format!("Cost center code '{upper}' already exists"));
    }
    violations
}

/// Name rules shared by cost centers and COA entries.
pub fn validate_name(name: &str, label: &str, min: usize, max: usize) -> Vec<String> {
    let name = name.trim();
    if name.is_empty() {
        return vec![format!("{label} name is required")];
    }

    let mut violations = Vec::new();
    let len = name.chars().count();
    if !(min..=max).contains(&len) {
        violations.push(format!(
            "{label} name must be between {min} and {max} characters"
        ));
    }
    if !name.chars().all(is_name_char) {
        violations.push(format!("{label} name contains invalid characters"));
    }
    let lower = name.to_lowercase();
    if let Some(term) = RESERVED_NAME_TERMS.iter().find(|term| lower.contains(*term)) {
        violations.push(format!("{label} name contains reserved term '{term}'"));
    }
    violations
}

pub fn validate_description(description: Option<&str>, label: &str) -> Vec<String> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        violations.push(format!(
            "{label} description must be at most {DESCRIPTION_MAX_LEN} characters"
        ));
    }
    if !description.chars().all(is_description_char) {
        violations.push(format!("{label} description contains invalid characters"));
    }
    violations
}

/// The manager is free text; it need not match a team member.
pub fn validate_manager(manager: &str) -> Vec<String> {
    let manager = manager.trim();
    if manager.is_empty() {
        return vec!["Manager name is required".to_string()];
    }

    let mut violations = Vec::new();
    let len = manager.chars().count();
    if !(MANAGER_MIN_LEN..=MANAGER_MAX_LEN).contains(&len) {
        violations.push(format!(
            "Manager name must be between {MANAGER_MIN_LEN} and {MANAGER_MAX_LEN} characters"
        ));
    }
    if !manager
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'')
    {
        violations.push(
            "Manager name may only contain letters, spaces, hyphens and apostrophes".to_string(),
        );
    }
    violations
}

pub fn validate_budgets(monthly: Option<Money>, yearly: Option<Money>) -> Vec<String> {
    let mut violations = Vec::new();

    if let Some(monthly) = monthly {
        if monthly.is_negative() {
            violations.push("Monthly budget cannot be negative".to_string());
        } else if monthly > Money::from_major(MAX_MONTHLY_BUDGET) {
            violations.push("Monthly budget cannot exceed 999,000,000,000".to_string());
        }
    }
    if let Some(yearly) = yearly {
        if yearly.is_negative() {
            violations.push("Yearly budget cannot be negative".to_string());
        } else if yearly > Money::from_major(MAX_YEARLY_BUDGET) {
            violations.push("Yearly budget cannot exceed 9,900,000,000,000".to_string());
        }
    }

    if let (Some(monthly), Some(yearly)) = (monthly, yearly)
        && monthly.minor() > 0
        && !yearly.is_negative()
    {
        let expected = i128::from(monthly.minor()) * 12;
        let yearly = i128::from(yearly.minor()) * 100;
        let low = expected * (100 - YEARLY_TOLERANCE_PCT);
        let high = expected * (100 + YEARLY_TOLERANCE_PCT);
        if yearly < low || yearly > high {
            violations.push(format!(
                "Yearly budget must be within {YEARLY_TOLERANCE_PCT}% of monthly budget x 12"
            ));
        }
    }
    violations
}

pub fn validate_budget_period(period: Option<&str>, current_year: i32) -> Vec<String> {
    let Some(period) = period.map(str::trim).filter(|p| !p.is_empty()) else {
        return Vec::new();
    };

    if period.len() != 4 || !period.chars().all(|c| c.is_ascii_digit()) {
        return vec!["Budget period must be a 4-digit year".to_string()];
    }
    let max_year = current_year + BUDGET_YEARS_AHEAD;
    match period.parse::<i32>() {
        Ok(year) if (MIN_BUDGET_YEAR..=max_year).contains(&year) => Vec::new(),
        _ => vec![format!(
            "Budget period must be between {MIN_BUDGET_YEAR} and {max_year}"
        )],
    }
}

/// Runs every COA rule. `own_id` excludes the record itself from the
/// uniqueness check on update.
pub fn validate_coa(input: &CoaInput, entries: &[Coa], own_id: Option<&str>) -> Vec<String> {
    let mut violations = validate_coa_code(&input.code, entries, own_id);
    violations.extend(validate_name(
        &input.name,
        "COA",
        COA_NAME_MIN_LEN,
        COA_NAME_MAX_LEN,
    ));
    violations.extend(validate_description(input.description.as_deref(), "COA"));
    violations
}

pub fn validate_coa_code(code: &str, entries: &[Coa], own_id: Option<&str>) -> Vec<String> {
    let code = code.trim();
    if code.is_empty() {
        return vec!["COA code is required".to_string()];
    }

    let mut violations = Vec::new();
    let len = code.chars().count();
    if !(COA_CODE_MIN_LEN..=COA_CODE_MAX_LEN).contains(&len)
        || !code.chars().all(|c| c.is_ascii_digit())
    {
        violations.push(format!(
            "COA code must be {COA_CODE_MIN_LEN} to {COA_CODE_MAX_LEN} digits"
        ));
    }
    if RESERVED_COA_CODES.contains(&code) {
        violations.push(format!("COA code '{code}' is reserved"));
    }
    if entries
        .iter()
        .any(|entry| Some(entry.id.as_str()) != own_id && entry.code == code)
    {
        violations.push(format!("COA code '{code}' already exists"));
    }
    violations
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '&' | '.' | ',' | '(' | ')' | '/' | '\'')
}

fn is_description_char(c: char) -> bool {
    if c == '\n' || c == '\t' {
        return true;
    }
    !c.is_control() && !matches!(c, '<' | '>' | '{' | '}' | '[' | ']' | '\\' | '`')
}
