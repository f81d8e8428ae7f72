use crate::models::{TransactionError, TransactionRequest};
use crate::types::{PageRequest, MAX_PAGE_SIZE};
use rust_decimal::Decimal;

/// A single check paired with the error reported when it does not hold.
pub struct Rule<T> {
    pub holds: fn(&T) -> bool,
    pub error: TransactionError
}

/// Evaluated in order; the first failing rule wins.
pub const TRANSACTION_RULES: [Rule<TransactionRequest>; 6] = [
    Rule { holds: amount_present, error: TransactionError::InvalidAmount },
    Rule { holds: amount_not_negative, error: TransactionError::NegativeAmount },
    Rule { holds: amount_not_zero, error: TransactionError::ZeroAmount },
    Rule { holds: type_present, error: TransactionError::InvalidType },
    Rule { holds: description_present, error: TransactionError::MissingDescription },
    Rule { holds: category_present, error: TransactionError::MissingCategory }
];

pub const PAGINATION_RULES: [Rule<PageRequest>; 3] = [
    Rule { holds: page_not_negative, error: TransactionError::InvalidPagination },
    Rule { holds: size_positive, error: TransactionError::InvalidPagination },
    Rule { holds: size_within_maximum, error: TransactionError::InvalidPagination }
];

pub fn validate_transaction(request: &TransactionRequest) -> Result<(), TransactionError> {
    check(request, &TRANSACTION_RULES)
}

pub fn validate_pagination(page: &PageRequest) -> Result<(), TransactionError> {
    check(page, &PAGINATION_RULES)
}

fn check<T>(subject: &T, rules: &[Rule<T>]) -> Result<(), TransactionError> {
    match rules.iter().find(|rule| !(rule.holds)(subject)) {
        Some(rule) => Err(rule.error),
        None => Ok(())
    }
}

// Amount rules only judge a present amount; absence belongs to `amount_present`.

fn amount_present(request: &TransactionRequest) -> bool {
    request.amount.is_some()
}

fn amount_not_negative(request: &TransactionRequest) -> bool {
    request.amount.is_none_or(|amount| amount >= Decimal::ZERO)
}

fn amount_not_zero(request: &TransactionRequest) -> bool {
    request.amount.is_none_or(|amount| !amount.is_zero())
}

fn type_present(request: &TransactionRequest) -> bool {
    request.transaction_type.is_some()
}

fn description_present(request: &TransactionRequest) -> bool {
    is_not_blank(request.description.as_deref())
}

fn category_present(request: &TransactionRequest) -> bool {
    is_not_blank(request.category.as_deref())
}

fn is_not_blank(text: Option<&str>) -> bool {
    text.is_some_and(|text| !text.trim().is_empty())
}

fn page_not_negative(page: &PageRequest) -> bool {
    page.page >= 0
}

fn size_positive(page: &PageRequest) -> bool {
    page.size > 0
}

fn size_within_maximum(page: &PageRequest) -> bool {
    page.size <= MAX_PAGE_SIZE
}
