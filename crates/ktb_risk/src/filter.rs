//! Trade inclusion/exclusion rules.
//!
//! Comparisons are exact, case-sensitive text matches against the raw
//! blotter values. An empty include-list places no restriction on its field.

use ktb_core::TradeRecord;
use std::fmt;

/// Rule set applied to each blotter row.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterRules {
    /// Accounts to drop
    pub exclude_accounts: Vec<String>,
    /// Traders to keep
    pub include_traders: Vec<String>,
    /// Asset type labels to keep
    pub include_asset_types: Vec<String>,
    /// Asset classes to keep
    pub include_asset_classes: Vec<String>,
    /// Currency codes to keep
    pub include_currencies: Vec<String>,
    /// Auto open/close flag values (as text) to keep
    pub include_auto_open_close: Vec<String>,
    /// Themes to drop
    pub exclude_themes: Vec<String>,
    /// Trade names ending with this suffix are dropped (duplicate markings)
    pub exclude_trade_name_suffix: Option<String>,
}

impl FilterRules {
    /// Rules that keep every record.
    pub fn permissive() -> Self {
        Self::default()
    }
}

/// Why a record was filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterRejection {
    /// Account is on the exclude-list
    ExcludedAccount,
    /// Trader is not on the include-list
    TraderNotIncluded,
    /// Asset type is not on the include-list
    AssetTypeNotIncluded,
    /// Asset class is not on the include-list
    AssetClassNotIncluded,
    /// Currency is not on the include-list
    CurrencyNotIncluded,
    /// Auto open/close flag is not on the include-list
    AutoOpenCloseNotIncluded,
    /// Theme is on the exclude-list
    ExcludedTheme,
    /// Trade name carries the duplicate suffix
    DuplicateTradeName,
}

impl fmt::Display for FilterRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FilterRejection::ExcludedAccount => "excluded account",
            FilterRejection::TraderNotIncluded => "trader not included",
            FilterRejection::AssetTypeNotIncluded => "asset type not included",
            FilterRejection::AssetClassNotIncluded => "asset class not included",
            FilterRejection::CurrencyNotIncluded => "currency not included",
            FilterRejection::AutoOpenCloseNotIncluded => "auto open/close not included",
            FilterRejection::ExcludedTheme => "excluded theme",
            FilterRejection::DuplicateTradeName => "duplicate trade name",
        };
        f.write_str(text)
    }
}

/// Applies [`FilterRules`] to blotter rows.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    rules: FilterRules,
}

/// An empty include-list admits every value
fn included(list: &[String], value: &str) -> bool {
    list.is_empty() || list.iter().any(|v| v == value)
}

fn excluded(list: &[String], value: &str) -> bool {
    list.iter().any(|v| v == value)
}

impl TradeFilter {
    /// Creates a filter from a rule set.
    pub fn new(rules: FilterRules) -> Self {
        Self { rules }
    }

    /// Checks one record, returning the first rule it fails.
    pub fn check(&self, record: &TradeRecord) -> Result<(), FilterRejection> {
        let rules = &self.rules;
        if excluded(&rules.exclude_accounts, &record.account_name) {
            return Err(FilterRejection::ExcludedAccount);
        }
        if !included(&rules.include_traders, &record.trader_name) {
            return Err(FilterRejection::TraderNotIncluded);
        }
        if !included(&rules.include_asset_types, &record.asset_type) {
            return Err(FilterRejection::AssetTypeNotIncluded);
        }
        if !included(&rules.include_asset_classes, &record.asset_class) {
            return Err(FilterRejection::AssetClassNotIncluded);
        }
        if !included(&rules.include_currencies, &record.currency) {
            return Err(FilterRejection::CurrencyNotIncluded);
        }
        if !included(&rules.include_auto_open_close, &record.auto_open_close) {
            return Err(FilterRejection::AutoOpenCloseNotIncluded);
        }
        if excluded(&rules.exclude_themes, &record.theme_name) {
            return Err(FilterRejection::ExcludedTheme);
        }
        if let Some(suffix) = rules.exclude_trade_name_suffix.as_deref() {
            if !suffix.is_empty() && record.trade_name.ends_with(suffix) {
                return Err(FilterRejection::DuplicateTradeName);
            }
        }
        Ok(())
    }

    /// Whether the record passes every rule.
    pub fn accepts(&self, record: &TradeRecord) -> bool {
        self.check(record).is_ok()
    }

    /// Keeps the records that pass, preserving order.
    pub fn apply<'a>(&self, records: &'a [TradeRecord]) -> Vec<&'a TradeRecord> {
        records.iter().filter(|r| self.accepts(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktb_core::Date;

    fn record() -> TradeRecord {
        TradeRecord {
            trade_id: "T001".to_string(),
            isin: "SWAP".to_string(),
            asset_type: "Interest Rate Swap".to_string(),
            asset_class: "Rates".to_string(),
            currency: "KRW".to_string(),
            settlement_date: Some(Date::from_ymd(2026, 1, 1).unwrap()),
            maturity_date: Date::from_ymd(2028, 1, 1).unwrap(),
            notional: 1.0e9,
            trade_price: Some(3.1),
            benchmark: Some("KRW-CD-3M".to_string()),
            trade_name: "KRW 2s5s".to_string(),
            account_name: "Main".to_string(),
            trader_name: "tom".to_string(),
            auto_open_close: "True".to_string(),
            theme_name: "Asia Rates".to_string(),
        }
    }

    fn desk_rules() -> FilterRules {
        FilterRules {
            exclude_accounts: vec!["Account1".to_string(), "Account2".to_string()],
            include_traders: vec!["bob".to_string(), "tom".to_string(), "terry".to_string()],
            include_asset_types: vec![
                "Interest Rate Swap".to_string(),
                "Futures".to_string(),
                "Bond".to_string(),
            ],
            include_asset_classes: vec!["Rates".to_string()],
            include_currencies: vec!["USD".to_string(), "KRW".to_string()],
            include_auto_open_close: vec!["True".to_string()],
            exclude_themes: vec!["Asia Weather".to_string(), "Politics".to_string()],
            exclude_trade_name_suffix: Some("Dup".to_string()),
        }
    }

    #[test]
    fn test_record_passes_desk_rules() {
        let filter = TradeFilter::new(desk_rules());
        assert_eq!(filter.check(&record()), Ok(()));
    }

    fn check_with(mutate: impl FnOnce(&mut TradeRecord)) -> Result<(), FilterRejection> {
        let mut r = record();
        mutate(&mut r);
        TradeFilter::new(desk_rules()).check(&r)
    }

    #[test]
    fn test_each_rule_rejects() {
        use FilterRejection::*;

        assert_eq!(check_with(|r| r.account_name = "Account1".into()), Err(ExcludedAccount));
        assert_eq!(check_with(|r| r.trader_name = "alice".into()), Err(TraderNotIncluded));
        assert_eq!(check_with(|r| r.asset_type = "Equity".into()), Err(AssetTypeNotIncluded));
        assert_eq!(check_with(|r| r.asset_class = "FX".into()), Err(AssetClassNotIncluded));
        assert_eq!(check_with(|r| r.currency = "GBP".into()), Err(CurrencyNotIncluded));
        assert_eq!(
            check_with(|r| r.auto_open_close = "False".into()),
            Err(AutoOpenCloseNotIncluded)
        );
        assert_eq!(check_with(|r| r.theme_name = "Politics".into()), Err(ExcludedTheme));
        assert_eq!(
            check_with(|r| r.trade_name = "KRW 2s5s Dup".into()),
            Err(DuplicateTradeName)
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let filter = TradeFilter::new(desk_rules());
        let mut r = record();
        r.auto_open_close = "true".to_string();
        assert_eq!(filter.check(&r), Err(FilterRejection::AutoOpenCloseNotIncluded));
    }

    #[test]
    fn test_suffix_only_matches_at_end() {
        let filter = TradeFilter::new(desk_rules());
        let mut r = record();
        r.trade_name = "Dup KRW 2s5s".to_string();
        assert!(filter.accepts(&r));
    }

    #[test]
    fn test_permissive_keeps_everything() {
        let filter = TradeFilter::new(FilterRules::permissive());
        let mut r = record();
        r.trade_name = "anything Dup".to_string();
        assert!(filter.accepts(&r));
    }

    #[test]
    fn test_empty_include_list_is_unrestricted() {
        let mut rules = desk_rules();
        rules.include_traders.clear();
        let filter = TradeFilter::new(rules);

        let mut r = record();
        r.trader_name = "someone else".to_string();
        assert!(filter.accepts(&r));

        // the populated lists still apply
        r.currency = "EUR".to_string();
        assert!(!filter.accepts(&r));
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = TradeFilter::new(desk_rules());
        let mut dropped = record();
        dropped.trade_id = "T002".to_string();
        dropped.theme_name = "Asia Weather".to_string();
        let mut kept = record();
        kept.trade_id = "T003".to_string();

        let records = vec![record(), dropped, kept];
        let ids: Vec<_> = filter
            .apply(&records)
            .iter()
            .map(|r| r.trade_id.as_str())
            .collect();
        assert_eq!(ids, vec!["T001", "T003"]);
    }
}
