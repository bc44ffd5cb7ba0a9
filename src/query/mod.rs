use chrono::NaiveDate;

/// Fixed result ordering: newest first, id breaks date ties.
pub const ORDER_CLAUSE: &str = "date.desc,id.desc";

/// Remote predicate operators understood by the table endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Eq,
    Gte,
    Lte,
    Ilike,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Gte => "gte",
            Op::Lte => "lte",
            Op::Ilike => "ilike",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InsuranceSelector {
    #[default]
    Any,
    Yes,
    No,
}

impl InsuranceSelector {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "any" | "" => Some(Self::Any),
            "yes" | "true" | "y" => Some(Self::Yes),
            "no" | "false" | "n" => Some(Self::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// The transient, client-only filter criteria set. Unset means "no
/// constraint on this field".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filters {
    pub vertical: Option<String>,
    pub settle: Option<String>,
    pub title: Option<String>,
    pub rate_min: Option<f64>,
    pub rate_max: Option<f64>,
    pub volume_min: Option<i64>,
    pub volume_max: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub insurance: InsuranceSelector,
}

impl Filters {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// One-line summary of the active constraints for status output.
    pub fn summary(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(v) = self.vertical.as_deref() {
            parts.push(format!("vertical~{v}"));
        }
        if let Some(v) = self.settle.as_deref() {
            parts.push(format!("settle~{v}"));
        }
        if let Some(v) = self.title.as_deref() {
            parts.push(format!("title~{v}"));
        }
        if self.rate_min.is_some() || self.rate_max.is_some() {
            parts.push(format!(
                "rate={}..{}",
                self.rate_min.map(|v| v.to_string()).unwrap_or_default(),
                self.rate_max.map(|v| v.to_string()).unwrap_or_default()
            ));
        }
        if self.volume_min.is_some() || self.volume_max.is_some() {
            parts.push(format!(
                "volume={}..{}",
                self.volume_min.map(|v| v.to_string()).unwrap_or_default(),
                self.volume_max.map(|v| v.to_string()).unwrap_or_default()
            ));
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            parts.push(format!(
                "date={}..{}",
                self.date_from.map(|v| v.to_string()).unwrap_or_default(),
                self.date_to.map(|v| v.to_string()).unwrap_or_default()
            ));
        }
        if self.insurance != InsuranceSelector::Any {
            parts.push(format!("insurance={}", self.insurance.as_str()));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Escape pattern metacharacters so user input is matched literally inside
/// an `ilike` clause.
pub fn escape_pattern(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_' | '*') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn push_substring(params: &mut Vec<(String, String)>, column: &str, value: Option<&str>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            params.push((
                column.to_string(),
                format!("{}.*{}*", Op::Ilike.as_str(), escape_pattern(trimmed)),
            ));
        }
    }
}

/// Translate the criteria set into the query parameters of one read. Every
/// active constraint becomes exactly one conjunctive clause; inactive
/// constraints are omitted, never defaulted to extremes. The ordering clause
/// is present on every read, including the empty-filter one.
pub fn select_params(filters: &Filters) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    params.push(("order".to_string(), ORDER_CLAUSE.to_string()));

    push_substring(&mut params, "vertical", filters.vertical.as_deref());
    push_substring(&mut params, "settle", filters.settle.as_deref());
    push_substring(&mut params, "title", filters.title.as_deref());

    if let Some(v) = filters.rate_min {
        params.push(("rate".to_string(), format!("{}.{v}", Op::Gte.as_str())));
    }
    if let Some(v) = filters.rate_max {
        params.push(("rate".to_string(), format!("{}.{v}", Op::Lte.as_str())));
    }
    if let Some(v) = filters.volume_min {
        params.push(("volume".to_string(), format!("{}.{v}", Op::Gte.as_str())));
    }
    if let Some(v) = filters.volume_max {
        params.push(("volume".to_string(), format!("{}.{v}", Op::Lte.as_str())));
    }
    if let Some(v) = filters.date_from {
        params.push(("date".to_string(), format!("{}.{v}", Op::Gte.as_str())));
    }
    if let Some(v) = filters.date_to {
        params.push(("date".to_string(), format!("{}.{v}", Op::Lte.as_str())));
    }

    match filters.insurance {
        InsuranceSelector::Any => {}
        InsuranceSelector::Yes => {
            params.push(("insurance".to_string(), format!("{}.true", Op::Eq.as_str())));
        }
        InsuranceSelector::No => {
            params.push((
                "insurance".to_string(),
                format!("{}.false", Op::Eq.as_str()),
            ));
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_filters_produce_only_ordering() {
        let params = select_params(&Filters::default());
        assert_eq!(
            params,
            vec![("order".to_string(), "date.desc,id.desc".to_string())]
        );
    }

    #[test]
    fn every_read_is_ordered_newest_first() {
        let filters = Filters {
            vertical: Some("gambling".to_string()),
            rate_min: Some(10.0),
            ..Filters::default()
        };
        let params = select_params(&filters);
        assert_eq!(params[0], ("order".to_string(), ORDER_CLAUSE.to_string()));
    }

    #[test]
    fn one_clause_per_active_constraint() {
        let filters = Filters {
            vertical: Some("gambling".to_string()),
            settle: Some("net7".to_string()),
            title: Some("acme".to_string()),
            rate_min: Some(10.0),
            rate_max: Some(250.0),
            volume_min: Some(100),
            volume_max: Some(5000),
            date_from: Some(day("2024-01-01")),
            date_to: Some(day("2024-06-30")),
            insurance: InsuranceSelector::Yes,
        };
        let params = select_params(&filters);
        // ordering + ten constraint clauses, nothing else
        assert_eq!(params.len(), 11);
        assert!(params.contains(&("vertical".to_string(), "ilike.*gambling*".to_string())));
        assert!(params.contains(&("rate".to_string(), "gte.10".to_string())));
        assert!(params.contains(&("rate".to_string(), "lte.250".to_string())));
        assert!(params.contains(&("volume".to_string(), "gte.100".to_string())));
        assert!(params.contains(&("date".to_string(), "lte.2024-06-30".to_string())));
        assert!(params.contains(&("insurance".to_string(), "eq.true".to_string())));
    }

    #[test]
    fn unset_bounds_are_omitted_not_defaulted() {
        let filters = Filters {
            rate_max: Some(250.0),
            ..Filters::default()
        };
        let params = select_params(&filters);
        assert_eq!(params.len(), 2);
        assert!(!params.iter().any(|(_, v)| v.starts_with("gte.")));
    }

    #[test]
    fn insurance_selector_translates_to_equality() {
        let yes = Filters {
            insurance: InsuranceSelector::Yes,
            ..Filters::default()
        };
        let no = Filters {
            insurance: InsuranceSelector::No,
            ..Filters::default()
        };
        assert!(select_params(&yes).contains(&("insurance".to_string(), "eq.true".to_string())));
        assert!(select_params(&no).contains(&("insurance".to_string(), "eq.false".to_string())));
        assert_eq!(select_params(&Filters::default()).len(), 1);
    }

    #[test]
    fn whitespace_only_text_filter_is_no_constraint() {
        let filters = Filters {
            title: Some("   ".to_string()),
            ..Filters::default()
        };
        assert_eq!(select_params(&filters).len(), 1);
    }

    #[test]
    fn pattern_metacharacters_are_escaped() {
        let filters = Filters {
            title: Some("100%_deal*".to_string()),
            ..Filters::default()
        };
        let params = select_params(&filters);
        assert!(params.contains(&(
            "title".to_string(),
            r"ilike.*100\%\_deal\**".to_string()
        )));
    }

    #[test]
    fn insurance_selector_parses_aliases() {
        assert_eq!(
            InsuranceSelector::parse("YES"),
            Some(InsuranceSelector::Yes)
        );
        assert_eq!(
            InsuranceSelector::parse("false"),
            Some(InsuranceSelector::No)
        );
        assert_eq!(InsuranceSelector::parse("any"), Some(InsuranceSelector::Any));
        assert_eq!(InsuranceSelector::parse("maybe"), None);
    }

    #[test]
    fn summary_names_active_constraints() {
        let filters = Filters {
            vertical: Some("gambling".to_string()),
            rate_min: Some(10.0),
            insurance: InsuranceSelector::No,
            ..Filters::default()
        };
        let summary = filters.summary().unwrap();
        assert!(summary.contains("vertical~gambling"));
        assert!(summary.contains("rate=10.."));
        assert!(summary.contains("insurance=no"));
        assert_eq!(Filters::default().summary(), None);
    }
}
