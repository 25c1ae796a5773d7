use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::filter::{Page, ProductFilter};
use crate::errors::DomainError;

pub const DEFAULT_OFFSET: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 100;

/// Listing parameters exactly as they arrive on the query string. Empty
/// values are treated as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawListQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "priceLessThan")]
    pub price_less_than: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRequest {
    pub page: Page,
    pub filter: ProductFilter,
}

impl ListRequest {
    /// Validates in the order offset, limit, category, price ceiling and
    /// reports only the first failure.
    pub fn parse(raw: &RawListQuery) -> Result<Self, DomainError> {
        let offset = parse_offset(present(&raw.offset))?;
        let limit = parse_limit(present(&raw.limit))?;
        let category = present(&raw.category).map(str::to_owned);
        let price_less_than = parse_price_ceiling(present(&raw.price_less_than))?;

        Ok(Self {
            page: Page { offset, limit },
            filter: ProductFilter { category, price_less_than },
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn parse_offset(value: Option<&str>) -> Result<u32, DomainError> {
    let Some(value) = value else {
        return Ok(DEFAULT_OFFSET);
    };

    let offset = value
        .parse::<i64>()
        .map_err(|_| DomainError::invalid_parameter("offset", "invalid offset parameter"))?;
    if offset < 0 {
        return Err(DomainError::invalid_parameter("offset", "offset must be non-negative"));
    }

    u32::try_from(offset)
        .map_err(|_| DomainError::invalid_parameter("offset", "invalid offset parameter"))
}

fn parse_limit(value: Option<&str>) -> Result<u32, DomainError> {
    let Some(value) = value else {
        return Ok(DEFAULT_LIMIT);
    };

    let limit = value
        .parse::<i64>()
        .map_err(|_| DomainError::invalid_parameter("limit", "invalid limit parameter"))?;
    if limit < i64::from(MIN_LIMIT) {
        return Err(DomainError::invalid_parameter(
            "limit",
            format!("limit must be at least {MIN_LIMIT}"),
        ));
    }
    if limit > i64::from(MAX_LIMIT) {
        return Err(DomainError::invalid_parameter(
            "limit",
            format!("limit must not exceed {MAX_LIMIT}"),
        ));
    }

    u32::try_from(limit)
        .map_err(|_| DomainError::invalid_parameter("limit", "invalid limit parameter"))
}

fn parse_price_ceiling(value: Option<&str>) -> Result<Option<Decimal>, DomainError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let price = Decimal::from_str(value).map_err(|_| {
        DomainError::invalid_parameter("priceLessThan", "invalid priceLessThan parameter")
    })?;
    if price <= Decimal::ZERO {
        return Err(DomainError::invalid_parameter(
            "priceLessThan",
            "priceLessThan must be greater than 0",
        ));
    }

    Ok(Some(price))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{ListRequest, RawListQuery, DEFAULT_LIMIT, MAX_LIMIT};
    use crate::domain::filter::{Page, ProductFilter};
    use crate::errors::DomainError;

    fn raw(
        offset: Option<&str>,
        limit: Option<&str>,
        category: Option<&str>,
        price: Option<&str>,
    ) -> RawListQuery {
        RawListQuery {
            offset: offset.map(str::to_owned),
            limit: limit.map(str::to_owned),
            category: category.map(str::to_owned),
            price_less_than: price.map(str::to_owned),
        }
    }

    fn failing_field(query: RawListQuery) -> Option<&'static str> {
        ListRequest::parse(&query).err().as_ref().and_then(DomainError::field)
    }

    #[test]
    fn defaults_apply_when_parameters_are_absent() {
        let request = ListRequest::parse(&RawListQuery::default()).expect("valid");

        assert_eq!(request.page, Page { offset: 0, limit: DEFAULT_LIMIT });
        assert_eq!(request.filter, ProductFilter::default());
    }

    #[test]
    fn empty_values_count_as_absent() {
        let request =
            ListRequest::parse(&raw(Some(""), Some(""), Some(""), Some(""))).expect("valid");

        assert_eq!(request.page, Page { offset: 0, limit: 10 });
        assert_eq!(request.filter, ProductFilter::default());
    }

    #[test]
    fn parses_all_parameters() {
        let request =
            ListRequest::parse(&raw(Some("5"), Some("100"), Some("clothing"), Some("59.99")))
                .expect("valid");

        assert_eq!(request.page, Page { offset: 5, limit: 100 });
        assert_eq!(request.filter.category.as_deref(), Some("clothing"));
        assert_eq!(request.filter.price_less_than, Some(Decimal::new(5_999, 2)));
    }

    #[test]
    fn rejects_negative_or_malformed_offset() {
        assert_eq!(failing_field(raw(Some("-1"), None, None, None)), Some("offset"));
        assert_eq!(failing_field(raw(Some("abc"), None, None, None)), Some("offset"));
        assert_eq!(failing_field(raw(Some("1.5"), None, None, None)), Some("offset"));
    }

    #[test]
    fn rejects_limit_outside_bounds() {
        assert_eq!(failing_field(raw(None, Some("0"), None, None)), Some("limit"));
        assert_eq!(failing_field(raw(None, Some("101"), None, None)), Some("limit"));
        assert_eq!(failing_field(raw(None, Some("ten"), None, None)), Some("limit"));
        assert!(ListRequest::parse(&raw(None, Some("1"), None, None)).is_ok());
    }

    #[test]
    fn limit_beyond_u32_range_is_rejected_not_truncated() {
        let error =
            ListRequest::parse(&raw(None, Some("4294967297"), None, None)).expect_err("invalid");
        assert_eq!(error.to_string(), "limit must not exceed 100");

        let request = ListRequest::parse(&raw(None, Some("100"), None, None)).expect("valid");
        assert_eq!(request.page.limit, MAX_LIMIT);
    }

    #[test]
    fn rejects_non_positive_or_malformed_price_ceiling() {
        assert_eq!(failing_field(raw(None, None, None, Some("0"))), Some("priceLessThan"));
        assert_eq!(failing_field(raw(None, None, None, Some("-3.50"))), Some("priceLessThan"));
        assert_eq!(failing_field(raw(None, None, None, Some("cheap"))), Some("priceLessThan"));
    }

    #[test]
    fn reports_first_failure_in_parameter_order() {
        assert_eq!(failing_field(raw(Some("-1"), Some("0"), None, Some("0"))), Some("offset"));
        assert_eq!(failing_field(raw(Some("0"), Some("0"), None, Some("0"))), Some("limit"));
    }

    #[test]
    fn error_messages_name_the_rule() {
        let error = ListRequest::parse(&raw(None, Some("500"), None, None)).expect_err("invalid");

        assert_eq!(error.to_string(), "limit must not exceed 100");
    }

    #[test]
    fn category_is_passed_through_untouched() {
        let request =
            ListRequest::parse(&raw(None, None, Some(" Boots "), None)).expect("valid");

        assert_eq!(request.filter.category.as_deref(), Some(" Boots "));
    }
}
