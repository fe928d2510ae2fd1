//! Filtering and ordering of collection requests.

use std::fmt;

use chrono::{DateTime, TimeZone};

use crate::api::date::format_for_query;
use crate::api::http::serialize_query;
use crate::api::location::Location;

/// Comparison operators accepted by collection filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Not equal.
    Ne,
    /// Multiple values, all required.
    All,
    /// Includes.
    In,
    /// Excludes.
    Nin,
    /// Field existence.
    Exists,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Full text search.
    Match,
    /// Nearby, for locations.
    Near,
    /// Within a bounding rectangle, for locations.
    Within,
}

impl Operator {
    fn as_str(&self) -> &'static str {
        match self {
            Operator::Ne => "ne",
            Operator::All => "all",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::Exists => "exists",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Match => "match",
            Operator::Near => "near",
            Operator::Within => "within",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MIME-type groups accepted by asset queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeTypeGroup {
    Attachment,
    Plaintext,
    Image,
    Audio,
    Video,
    Richtext,
    Presentation,
    Spreadsheet,
    Pdfdocument,
    Archive,
    Code,
    Markup,
}

impl MimeTypeGroup {
    fn as_str(&self) -> &'static str {
        match self {
            MimeTypeGroup::Attachment => "attachment",
            MimeTypeGroup::Plaintext => "plaintext",
            MimeTypeGroup::Image => "image",
            MimeTypeGroup::Audio => "audio",
            MimeTypeGroup::Video => "video",
            MimeTypeGroup::Richtext => "richtext",
            MimeTypeGroup::Presentation => "presentation",
            MimeTypeGroup::Spreadsheet => "spreadsheet",
            MimeTypeGroup::Pdfdocument => "pdfdocument",
            MimeTypeGroup::Archive => "archive",
            MimeTypeGroup::Code => "code",
            MimeTypeGroup::Markup => "markup",
        }
    }
}

/// A filter value: strings, lists, dates, and locations all have a
/// canonical query representation.
#[derive(Debug, Clone)]
pub enum QueryValue {
    String(String),
    List(Vec<String>),
}

impl QueryValue {
    fn render(self) -> String {
        match self {
            QueryValue::String(value) => value,
            QueryValue::List(values) => values.join(","),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::List(values)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(values: &[&str]) -> Self {
        QueryValue::List(values.iter().map(|v| v.to_string()).collect())
    }
}

impl From<Location> for QueryValue {
    fn from(location: Location) -> Self {
        QueryValue::String(location.query_string_formatted())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for QueryValue
where
    Tz::Offset: fmt::Display,
{
    fn from(date: DateTime<Tz>) -> Self {
        QueryValue::String(format_for_query(&date))
    }
}

/// A query used to filter and order collections when making API requests.
///
/// # Example
///
/// ```
/// use contentful_core::{Operator, Query};
///
/// let query = Query::new()
///     .content_type("cat")
///     .filter("fields.color", "rainbow", None)
///     .filter("sys.id", &["nyancat", "happycat"][..], Some(Operator::In))
///     .limit(10);
///
/// assert_eq!(
///     query.query_string(),
///     "fields.color=rainbow&sys.id%5Bin%5D=nyancat%2Chappycat&limit=10&content_type=cat",
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    limit: Option<u32>,
    skip: Option<u32>,
    content_type: Option<String>,
    mime_type_group: Option<MimeTypeGroup>,
    order: Vec<String>,
    filters: Vec<(String, String)>,
    select: Vec<String>,
    links_to_entry: Option<String>,
    links_to_asset: Option<String>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of results to retrieve.
    ///
    /// # Panics
    ///
    /// Panics when `limit` is outside `1..=1000`.
    pub fn limit(mut self, limit: u32) -> Self {
        assert!(
            (1..=1000).contains(&limit),
            "limit value must be between 1 and 1000, {} given",
            limit
        );

        self.limit = Some(limit);
        self
    }

    /// Set the index of the first result to retrieve.
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Limit results to a single content type. Only works when querying
    /// entries.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Limit results to a group of MIME-types. Assets only.
    pub fn mime_type_group(mut self, group: MimeTypeGroup) -> Self {
        self.mime_type_group = Some(group);
        self
    }

    /// Add an ordering field. Can be called multiple times to order by
    /// multiple values; `reverse` orders descending.
    pub fn order_by(mut self, field: &str, reverse: bool) -> Self {
        if reverse {
            self.order.push(format!("-{}", field));
        } else {
            self.order.push(field.to_string());
        }
        self
    }

    /// Add a filter condition. Without an operator the condition is
    /// strict equality.
    pub fn filter(
        mut self,
        field: &str,
        value: impl Into<QueryValue>,
        operator: Option<Operator>,
    ) -> Self {
        let parameter = match operator {
            Some(operator) => format!("{}[{}]", field, operator),
            None => field.to_string(),
        };

        self.filters.push((parameter, value.into().render()));
        self
    }

    /// Choose which properties to return. `sys` is always included;
    /// `sys.*` paths are redundant and dropped.
    pub fn select(mut self, paths: &[&str]) -> Self {
        let mut parts = vec!["sys".to_string()];
        for path in paths {
            if *path == "sys" || path.starts_with("sys.") {
                continue;
            }
            parts.push(path.to_string());
        }

        self.select = parts;
        self
    }

    /// Filter for all entries that link to the given entry.
    pub fn links_to_entry(mut self, entry_id: impl Into<String>) -> Self {
        self.links_to_entry = Some(entry_id.into());
        self
    }

    /// Filter for all entries that link to the given asset.
    pub fn links_to_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.links_to_asset = Some(asset_id.into());
        self
    }

    /// The parameters to execute this query, ready for
    /// [`RequestOptions::query`](crate::RequestOptions::query).
    pub fn query_data(&self) -> Vec<(String, String)> {
        let mut data = self.filters.clone();

        if let Some(limit) = self.limit {
            data.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(skip) = self.skip {
            data.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(content_type) = &self.content_type {
            data.push(("content_type".to_string(), content_type.clone()));
        }
        if let Some(group) = self.mime_type_group {
            data.push(("mimetype_group".to_string(), group.as_str().to_string()));
        }
        if !self.order.is_empty() {
            data.push(("order".to_string(), self.order.join(",")));
        }
        if !self.select.is_empty() {
            data.push(("select".to_string(), self.select.join(",")));
        }
        if let Some(entry_id) = &self.links_to_entry {
            data.push(("links_to_entry".to_string(), entry_id.clone()));
        }
        if let Some(asset_id) = &self.links_to_asset {
            data.push(("links_to_asset".to_string(), asset_id.clone()));
        }

        data
    }

    /// The RFC 3986 encoded query string for this query.
    pub fn query_string(&self) -> String {
        let data = self.query_data();
        serialize_query(data.iter().map(|(n, v)| (n.as_str(), v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn empty_query_renders_nothing() {
        assert_eq!(Query::new().query_string(), "");
    }

    #[test]
    fn operators_render_in_brackets() {
        let query = Query::new().filter("sys.updatedAt", "2017-01-01T00:00:00Z", Some(Operator::Gte));

        assert_eq!(
            query.query_data(),
            vec![(
                "sys.updatedAt[gte]".to_string(),
                "2017-01-01T00:00:00Z".to_string()
            )]
        );
    }

    #[test]
    fn list_values_join_with_commas() {
        let query = Query::new().filter("sys.id", &["a", "b", "c"][..], Some(Operator::In));

        assert_eq!(
            query.query_data(),
            vec![("sys.id[in]".to_string(), "a,b,c".to_string())]
        );
    }

    #[test]
    fn date_values_zero_the_seconds() {
        let date = Utc.with_ymd_and_hms(2017, 6, 24, 14, 30, 59).unwrap();
        let query = Query::new().filter("sys.updatedAt", date, Some(Operator::Lte));

        assert_eq!(
            query.query_data(),
            vec![(
                "sys.updatedAt[lte]".to_string(),
                "2017-06-24T14:30:00+00:00".to_string()
            )]
        );
    }

    #[test]
    fn location_values_render_lat_long() {
        let query = Query::new().filter(
            "fields.center",
            Location::new(15.0, 17.8),
            Some(Operator::Near),
        );

        assert_eq!(
            query.query_data(),
            vec![("fields.center[near]".to_string(), "15,17.8".to_string())]
        );
    }

    #[test]
    fn select_always_includes_sys_and_drops_sys_paths() {
        let query = Query::new().select(&["fields.name", "sys.id", "sys"]);

        assert_eq!(
            query.query_data(),
            vec![("select".to_string(), "sys,fields.name".to_string())]
        );
    }

    #[test]
    fn order_fields_accumulate_with_reverse_prefix() {
        let query = Query::new()
            .order_by("sys.createdAt", false)
            .order_by("fields.name", true);

        assert_eq!(
            query.query_data(),
            vec![(
                "order".to_string(),
                "sys.createdAt,-fields.name".to_string()
            )]
        );
    }

    #[test]
    fn pagination_and_grouping_keys() {
        let query = Query::new()
            .limit(150)
            .skip(10)
            .content_type("cat")
            .mime_type_group(MimeTypeGroup::Image)
            .links_to_entry("nyancat")
            .links_to_asset("happycat");

        let data = query.query_data();

        assert!(data.contains(&("limit".to_string(), "150".to_string())));
        assert!(data.contains(&("skip".to_string(), "10".to_string())));
        assert!(data.contains(&("content_type".to_string(), "cat".to_string())));
        assert!(data.contains(&("mimetype_group".to_string(), "image".to_string())));
        assert!(data.contains(&("links_to_entry".to_string(), "nyancat".to_string())));
        assert!(data.contains(&("links_to_asset".to_string(), "happycat".to_string())));
    }

    #[test]
    #[should_panic(expected = "limit value must be between 1 and 1000")]
    fn limit_outside_range_panics() {
        let _ = Query::new().limit(1001);
    }
}
