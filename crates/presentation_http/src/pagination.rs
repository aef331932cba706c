//! Pagination link building
//!
//! Two strategies:
//!
//! - cursor forwarding: the provider hands out opaque `earlierRef` /
//!   `laterRef` tokens, echoed back verbatim as `earlierThan` / `laterThan`
//! - window advancing: the next page of a departure board starts one minute
//!   after the current window, or after the latest returned item
//!
//! Links are relative to the request path and keep every unrelated query
//! parameter in its original position.

use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::contract::RawQuery;

/// Parameters replaced by a journey cursor
///
/// The temporal anchors conflict with a cursor; the locations stay so the
/// link remains a complete request.
const CURSOR_DROPPED: &[&str] = &["departure", "arrival", "earlierThan", "laterThan"];

/// Window step for departure/arrival boards
pub const WINDOW_STEP: Duration = Duration::minutes(1);

/// Relative `prev` / `next` URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

/// Rebuild `path?query` with `updates` applied
///
/// A `Some` update replaces the first occurrence of its key in place (or is
/// appended), a `None` update removes every occurrence.
#[must_use]
pub fn with_params(path: &str, query: &RawQuery, updates: &[(&str, Option<&str>)]) -> String {
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(query.pairs().len() + updates.len());
    for (key, value) in query.pairs() {
        match updates.iter().find(|(k, _)| k == key) {
            None => pairs.push((key.clone(), value.clone())),
            Some((_, Some(new))) if !pairs.iter().any(|(k, _)| k == key) => {
                pairs.push((key.clone(), (*new).to_string()));
            },
            Some(_) => {},
        }
    }
    for (key, value) in updates {
        if let Some(value) = value {
            if !pairs.iter().any(|(k, _)| k == key) {
                pairs.push(((*key).to_string(), (*value).to_string()));
            }
        }
    }

    if pairs.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish();
    format!("{path}?{query}")
}

/// Links forwarding the provider's cursor tokens
#[must_use]
pub fn cursor_links(
    path: &str,
    query: &RawQuery,
    earlier_ref: Option<&str>,
    later_ref: Option<&str>,
) -> PageLinks {
    let link = |param: &str, token: &str| {
        let mut updates: Vec<(&str, Option<&str>)> =
            CURSOR_DROPPED.iter().map(|k| (*k, None)).collect();
        updates.retain(|(k, _)| *k != param);
        updates.push((param, Some(token)));
        with_params(path, query, &updates)
    };
    PageLinks {
        prev: earlier_ref.map(|t| link("earlierThan", t)),
        next: later_ref.map(|t| link("laterThan", t)),
    }
}

/// Start of the window after the current one
///
/// With an explicit `when` the window is `[when, when + duration]`; without
/// one it ends at the latest item. Returns `None` if there is nothing to
/// advance from or the window would leave the representable range.
#[must_use]
pub fn next_window(
    when: Option<DateTime<Utc>>,
    duration_minutes: Option<i64>,
    timestamps: &[DateTime<Utc>],
) -> Option<DateTime<Utc>> {
    match when {
        Some(when) => {
            let duration = Duration::try_minutes(duration_minutes.unwrap_or(0).max(0))?;
            when.checked_add_signed(duration)?
                .checked_add_signed(WINDOW_STEP)
        },
        None => timestamps
            .iter()
            .max()
            .and_then(|t| t.checked_add_signed(WINDOW_STEP)),
    }
}

/// `when` or `plannedWhen` of every item that has one
#[must_use]
pub fn item_timestamps(items: &[Value]) -> Vec<DateTime<Utc>> {
    items
        .iter()
        .filter_map(|item| {
            ["when", "plannedWhen"]
                .iter()
                .filter_map(|key| item.get(*key).and_then(Value::as_str))
                .find_map(|s| DateTime::parse_from_rfc3339(s).ok())
        })
        .map(|t| t.with_timezone(&Utc))
        .collect()
}

/// ISO 8601 in the provider's zone, seconds omitted when zero
#[must_use]
pub fn format_when(t: DateTime<Utc>, tz: Tz) -> String {
    let local = t.with_timezone(&tz);
    if local.second() == 0 {
        local.format("%Y-%m-%dT%H:%M%:z").to_string()
    } else {
        local.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
    }
}

/// `next` link for a departure/arrival board
#[must_use]
pub fn window_links(
    path: &str,
    query: &RawQuery,
    when: Option<DateTime<Utc>>,
    duration_minutes: Option<i64>,
    items: &[Value],
    tz: Tz,
) -> PageLinks {
    let next = next_window(when, duration_minutes, &item_timestamps(items)).map(|t| {
        let formatted = format_when(t, tz);
        with_params(path, query, &[("when", Some(&formatted))])
    });
    PageLinks { prev: None, next }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn q(s: &str) -> RawQuery {
        RawQuery::parse(Some(s))
    }

    #[test]
    fn with_params_replaces_in_place_and_appends() {
        let url = with_params("/x", &q("a=1&b=2&a=3"), &[("a", Some("9")), ("c", Some("4"))]);
        assert_eq!(url, "/x?a=9&b=2&c=4");
    }

    #[test]
    fn with_params_removes_and_keeps_bare_path() {
        assert_eq!(with_params("/x", &q("a=1"), &[("a", None)]), "/x");
    }

    #[test]
    fn cursor_links_forward_tokens() {
        let query = q("from=123&to.id=321&to.latitude=1.23&departure=tomorrow&foo=bar");
        let links = cursor_links("/journeys", &query, Some("e1"), Some("l1"));
        let prev = links.prev.unwrap();
        let next = links.next.unwrap();
        assert_eq!(prev, "/journeys?from=123&to.id=321&to.latitude=1.23&foo=bar&earlierThan=e1");
        assert_eq!(next, "/journeys?from=123&to.id=321&to.latitude=1.23&foo=bar&laterThan=l1");
    }

    #[test]
    fn cursor_link_replaces_previous_cursor() {
        let query = q("from=123&to=456&laterThan=old&earlierThan=older");
        let links = cursor_links("/journeys", &query, None, Some("new"));
        assert!(links.prev.is_none());
        assert_eq!(links.next.unwrap(), "/journeys?from=123&to=456&laterThan=new");
    }

    #[test]
    fn cursor_tokens_survive_encoding() {
        let token = "3|OB|MT\u{b5}14\u{b5}520384";
        let links = cursor_links("/journeys", &q("from=1"), None, Some(token));
        let next = links.next.unwrap();
        let (_, query) = next.split_once('?').unwrap();
        assert_eq!(RawQuery::parse(Some(query)).get("laterThan"), Some(token));
    }

    #[test]
    fn no_tokens_no_links() {
        assert!(cursor_links("/journeys", &q("from=1"), None, None).is_empty());
    }

    #[test]
    fn explicit_window_advances_past_duration() {
        let when = Utc.with_ymd_and_hms(2026, 2, 11, 10, 0, 0).unwrap();
        let next = next_window(Some(when), Some(10), &[]).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 2, 11, 10, 11, 0).unwrap());
    }

    #[test]
    fn implicit_window_advances_past_latest_item() {
        let items = [
            json!({"when": "2026-02-11T11:05:00+01:00"}),
            json!({"when": null, "plannedWhen": "2026-02-11T11:20:00+01:00"}),
            json!({"when": "2026-02-11T11:10:00+01:00"}),
            json!({"cancelled": true}),
        ];
        let ts = item_timestamps(&items);
        assert_eq!(ts.len(), 3);
        let next = next_window(None, Some(10), &ts).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 2, 11, 10, 21, 0).unwrap());
    }

    #[test]
    fn empty_board_without_window_has_no_next() {
        assert_eq!(next_window(None, Some(10), &[]), None);
    }

    #[test]
    fn format_when_in_zone() {
        let t = Utc.with_ymd_and_hms(2026, 2, 11, 10, 21, 0).unwrap();
        assert_eq!(format_when(t, chrono_tz::Europe::Berlin), "2026-02-11T11:21+01:00");
        let t = Utc.with_ymd_and_hms(2026, 7, 1, 10, 21, 30).unwrap();
        assert_eq!(format_when(t, chrono_tz::Europe::Berlin), "2026-07-01T12:21:30+02:00");
    }

    #[test]
    fn window_link_sets_when() {
        let items = [json!({"when": "2026-02-11T11:05:00+01:00"})];
        let links = window_links(
            "/stops/8011160/departures",
            &q("results=5&when=now"),
            None,
            Some(10),
            &items,
            chrono_tz::Europe::Berlin,
        );
        assert_eq!(
            links.next.unwrap(),
            "/stops/8011160/departures?results=5&when=2026-02-11T11%3A06%2B01%3A00"
        );
    }
}
