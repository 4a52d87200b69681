//! Activity search filter.
//!
//! Both conditions are optional and combine with AND:
//! - `location`: case-insensitive, unanchored substring of the location,
//!   matched literally (no wildcard or regex semantics)
//! - `month`: exact, case-sensitive member of `seasonal_months`
//!
//! An empty filter matches every activity.

use super::Activity;

pub const ACTIVITY_COLUMNS: &str =
    "id, name, description, location, category, seasonal_months, price, created_at, updated_at";

/// Case-folded location stored beside the original. SQLite's `lower()`
/// only folds ASCII, so folding happens here with full Unicode rules.
pub fn fold_location(location: &str) -> String {
    location.to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    location: Option<String>,
    month: Option<String>,
}

impl ActivityFilter {
    /// Blank values count as "not provided". The location is trimmed;
    /// the month is kept verbatim.
    pub fn new(location: Option<&str>, month: Option<&str>) -> Self {
        Self {
            location: location
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            month: month
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string),
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.month.is_none()
    }

    /// In-memory evaluation with the same semantics as the SQL query.
    pub fn matches(&self, activity: &Activity) -> bool {
        let location_ok = self.location.as_ref().map_or(true, |needle| {
            fold_location(&activity.location).contains(&fold_location(needle))
        });
        let month_ok = self
            .month
            .as_ref()
            .map_or(true, |month| activity.seasonal_months.iter().any(|m| m == month));
        location_ok && month_ok
    }

    /// The parameterised SELECT for this filter and its positional bindings.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut bindings: Vec<String> = Vec::new();

        if let Some(location) = &self.location {
            // instr() rather than LIKE so '%' and '_' stay literal
            conditions.push("instr(location_folded, ?) > 0");
            bindings.push(fold_location(location));
        }

        if let Some(month) = &self.month {
            conditions.push(
                "EXISTS (SELECT 1 FROM json_each(activities.seasonal_months) WHERE json_each.value = ?)",
            );
            bindings.push(month.clone());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM activities{} ORDER BY created_at, name",
            ACTIVITY_COLUMNS, where_clause
        );
        (sql, bindings)
    }
}
