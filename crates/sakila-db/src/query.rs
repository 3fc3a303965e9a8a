//! # Query Building
//!
//! Assembles parameterized read statements from optional filter criteria.
//!
//! Two rules hold for every statement produced here, and the tests pin them:
//!
//! 1. **No filter value ever appears in the statement text.** Substring
//!    searches wrap the value in `%` wildcards and bind it; the SQL only
//!    ever contains `?` placeholders, and placeholder count equals bind
//!    count exactly.
//! 2. **Clause order is fixed.** Film filters combine with AND in the order
//!    title → category → rating no matter which subset the caller supplied,
//!    so the same criteria always produce the same statement.
//!
//! Every list statement carries a row cap and a stable sort so repeated
//! calls against unchanged data return identical results.

// =============================================================================
// Row Caps
// =============================================================================

/// Cap applied to every entity list statement.
pub const LIST_ROW_CAP: u32 = 500;

/// Cap for the city lookup feeding the address form.
pub const CITY_ROW_CAP: u32 = 600;

// =============================================================================
// Film Filter
// =============================================================================

/// Optional criteria for the film list.
///
/// Empty strings count as absent, so a shell can pass its text fields
/// through unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmFilter {
    /// Title substring, matched case-insensitively by the store's collation.
    pub search: Option<String>,
    /// Exact category name; adds the category joins when present.
    pub category: Option<String>,
    /// Exact rating code.
    pub rating: Option<String>,
}

impl FilmFilter {
    /// Builds the film list statement and its ordered bind values.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut sql = String::from(
            "SELECT DISTINCT f.film_id, f.title, f.description, f.release_year, \
             f.language_id, f.rental_duration, f.rental_rate, f.length, \
             f.replacement_cost, f.rating, f.special_features \
             FROM film f",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        // The category joins are filter-driven: an unfiltered list scans
        // film alone.
        if self.category().is_some() {
            sql.push_str(
                " JOIN film_category fc ON f.film_id = fc.film_id \
                 JOIN category c ON fc.category_id = c.category_id",
            );
        }

        // Fixed clause order: title, category, rating.
        if let Some(search) = self.search() {
            clauses.push("f.title LIKE ?");
            binds.push(format!("%{search}%"));
        }
        if let Some(category) = self.category() {
            clauses.push("c.name = ?");
            binds.push(category.to_string());
        }
        if let Some(rating) = self.rating() {
            clauses.push("f.rating = ?");
            binds.push(rating.to_string());
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        sql.push_str(&format!(" ORDER BY f.title LIMIT {LIST_ROW_CAP}"));
        (sql, binds)
    }

    fn search(&self) -> Option<&str> {
        present(&self.search)
    }

    fn category(&self) -> Option<&str> {
        present(&self.category)
    }

    fn rating(&self) -> Option<&str> {
        present(&self.rating)
    }
}

// =============================================================================
// Customer Filter
// =============================================================================

/// Optional criteria for the customer list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Substring matched against first name, last name, and email.
    pub search: Option<String>,
}

impl CustomerFilter {
    /// Builds the customer list statement and its ordered bind values.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut sql = String::from(
            "SELECT c.customer_id, c.store_id, c.first_name, c.last_name, c.email, \
             c.address_id, c.active, \
             a.address, a.district, ci.name AS city, a.postal_code, a.phone \
             FROM customer c \
             JOIN address a ON c.address_id = a.address_id \
             JOIN city ci ON a.city_id = ci.city_id",
        );
        let mut binds: Vec<String> = Vec::new();

        if let Some(search) = present(&self.search) {
            sql.push_str(
                " WHERE (c.first_name LIKE ? OR c.last_name LIKE ? OR c.email LIKE ?)",
            );
            let pattern = format!("%{search}%");
            binds.push(pattern.clone());
            binds.push(pattern.clone());
            binds.push(pattern);
        }

        sql.push_str(&format!(
            " ORDER BY c.last_name, c.first_name LIMIT {LIST_ROW_CAP}"
        ));
        (sql, binds)
    }
}

/// Treats `None`, empty, and all-whitespace as "no filter".
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_count(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn unfiltered_film_list_has_no_placeholders_or_joins() {
        let (sql, binds) = FilmFilter::default().build();
        assert_eq!(placeholder_count(&sql), 0);
        assert!(binds.is_empty());
        assert!(!sql.contains("JOIN"));
        assert!(sql.ends_with(&format!("ORDER BY f.title LIMIT {LIST_ROW_CAP}")));
    }

    #[test]
    fn placeholder_count_matches_bind_count_for_every_subset() {
        let values = [None, Some("x".to_string())];
        for search in &values {
            for category in &values {
                for rating in &values {
                    let filter = FilmFilter {
                        search: search.clone(),
                        category: category.clone(),
                        rating: rating.clone(),
                    };
                    let (sql, binds) = filter.build();
                    assert_eq!(
                        placeholder_count(&sql),
                        binds.len(),
                        "mismatch for {filter:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn filter_values_never_appear_in_statement_text() {
        let filter = FilmFilter {
            search: Some("matrix".to_string()),
            category: Some("Action".to_string()),
            rating: Some("R".to_string()),
        };
        let (sql, binds) = filter.build();
        assert!(!sql.contains("matrix"));
        assert!(!sql.contains("Action"));
        assert_eq!(binds, vec!["%matrix%", "Action", "R"]);
    }

    #[test]
    fn clause_order_is_title_category_rating() {
        let filter = FilmFilter {
            // Supplied "backwards" relative to the emitted order
            rating: Some("R".to_string()),
            category: Some("Action".to_string()),
            search: Some("matrix".to_string()),
        };
        let (sql, _) = filter.build();

        let title = sql.find("f.title LIKE ?").expect("title clause");
        let category = sql.find("c.name = ?").expect("category clause");
        let rating = sql.find("f.rating = ?").expect("rating clause");
        assert!(title < category && category < rating);
    }

    #[test]
    fn category_filter_drives_the_join() {
        let with_category = FilmFilter {
            category: Some("Action".to_string()),
            ..Default::default()
        };
        let (sql, _) = with_category.build();
        assert!(sql.contains("JOIN film_category fc"));
        assert!(sql.contains("JOIN category c"));

        let search_only = FilmFilter {
            search: Some("matrix".to_string()),
            ..Default::default()
        };
        let (sql, _) = search_only.build();
        assert!(!sql.contains("JOIN"));
    }

    #[test]
    fn blank_filters_count_as_absent() {
        let filter = FilmFilter {
            search: Some("   ".to_string()),
            category: Some(String::new()),
            rating: None,
        };
        let (sql, binds) = filter.build();
        assert_eq!(placeholder_count(&sql), 0);
        assert!(binds.is_empty());
        assert!(!sql.contains("JOIN"));
    }

    #[test]
    fn customer_search_binds_one_pattern_three_times() {
        let filter = CustomerFilter {
            search: Some("smith".to_string()),
        };
        let (sql, binds) = filter.build();
        assert_eq!(placeholder_count(&sql), 3);
        assert_eq!(binds, vec!["%smith%", "%smith%", "%smith%"]);
        assert!(!sql.contains("smith"));
        assert!(sql.ends_with(&format!(
            "ORDER BY c.last_name, c.first_name LIMIT {LIST_ROW_CAP}"
        )));
    }

    #[test]
    fn customer_list_without_search_has_no_where() {
        let (sql, binds) = CustomerFilter::default().build();
        assert!(!sql.contains("WHERE"));
        assert!(binds.is_empty());
    }
}
