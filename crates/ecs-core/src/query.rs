//! # Query Layer (read-side)
//!
//! Pure functions over the entity collections. Every function here is
//! deterministic for the same inputs and never mutates anything it is given;
//! the page-facing API composes these into view projections.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Article, Exchange, ExchangeKind, Post, PostKind, PostStatus, Request, RequestStatus, User,
};

/// Placeholder shown when a user lookup misses. Lookups degrade gracefully
/// instead of failing the caller.
pub const UNKNOWN_USER: &str = "Pengguna";

/// Ellipsis marker appended by [`excerpt`] so callers can distinguish
/// truncated from complete text.
pub const ELLIPSIS: &str = "...";

/// Default excerpt length on listing cards.
pub const EXCERPT_CARD: usize = 150;
/// Excerpt length in compact related-article tiles.
pub const EXCERPT_TILE: usize = 120;
/// Excerpt length on profile tabs.
pub const EXCERPT_PROFILE: usize = 180;

// ---------------------------------------------------------------------------
// Filters

/// Combined predicate for post listings. Every field is optional; an empty
/// filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
    pub kind: Option<PostKind>,
    pub status: Option<PostStatus>,
    pub owner: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        let search_ok = match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.description.to_lowercase().contains(&needle)
            }
            None => true,
        };
        search_ok
            && self.kind.map_or(true, |k| post.kind == k)
            && self.status.map_or(true, |s| post.status == s)
            && self.owner.as_deref().map_or(true, |o| post.user_id == o)
    }
}

/// Combined predicate for request listings.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Case-insensitive substring over plant name and reason.
    pub search: Option<String>,
    pub status: Option<RequestStatus>,
    pub owner: Option<String>,
}

impl RequestFilter {
    pub fn matches(&self, request: &Request) -> bool {
        let search_ok = match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                request.plant_name.to_lowercase().contains(&needle)
                    || request.reason.to_lowercase().contains(&needle)
            }
            None => true,
        };
        search_ok
            && self.status.map_or(true, |s| request.status == s)
            && self.owner.as_deref().map_or(true, |o| request.user_id == o)
    }
}

/// Combined predicate for article listings.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Case-insensitive substring over title and content.
    pub search: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        let search_ok = match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                article.title.to_lowercase().contains(&needle)
                    || article.content.to_lowercase().contains(&needle)
            }
            None => true,
        };
        search_ok
            && self
                .category
                .as_deref()
                .map_or(true, |c| article.category.as_deref() == Some(c))
            && self.owner.as_deref().map_or(true, |o| article.user_id == o)
    }
}

/// Which side of an exchange the session user was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeRole {
    Giver,
    Receiver,
}

/// Ledger filter scoped to one user's involvement.
#[derive(Debug, Clone)]
pub struct ExchangeFilter {
    /// Only exchanges where this user is giver or receiver are visible.
    pub user_id: String,
    pub kind: Option<ExchangeKind>,
    pub role: Option<ExchangeRole>,
}

impl ExchangeFilter {
    pub fn involving(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            kind: None,
            role: None,
        }
    }

    pub fn matches(&self, exchange: &Exchange) -> bool {
        let involved =
            exchange.giver_id == self.user_id || exchange.partner_id == self.user_id;
        let role_ok = match self.role {
            Some(ExchangeRole::Giver) => exchange.giver_id == self.user_id,
            Some(ExchangeRole::Receiver) => exchange.partner_id == self.user_id,
            None => true,
        };
        involved && role_ok && self.kind.map_or(true, |k| exchange.kind == k)
    }
}

// ---------------------------------------------------------------------------
// Sorting

/// Newest-first ordering, the universal default on every listing. The sort is
/// stable, so items sharing a timestamp keep their insertion order.
pub fn sort_newest_first<T>(items: &mut [T], timestamp: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(timestamp(item)));
}

// ---------------------------------------------------------------------------
// Text shaping

/// Truncates `text` to at most `limit` characters, appending [`ELLIPSIS`]
/// only when something was cut. Counts characters, not bytes, so multi-byte
/// content is never split mid-character.
pub fn excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Splits article content into paragraphs on blank lines, dropping empties.
pub fn paragraphs(content: &str) -> Vec<&str> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Lookups

/// Resolves a user id to a display name, falling back to the generic
/// placeholder when the user is missing.
pub fn display_name(users: &[User], user_id: &str) -> String {
    users
        .iter()
        .find(|u| u.id == user_id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}

/// Resolves a user id to their avatar URI, if any.
pub fn avatar(users: &[User], user_id: &str) -> Option<String> {
    users
        .iter()
        .find(|u| u.id == user_id)
        .and_then(|u| u.profile_image.clone())
}

// ---------------------------------------------------------------------------
// Grouping

/// One month-year bucket of the exchange ledger.
#[derive(Debug, Clone, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
    /// Human label, e.g. "Juni 2023".
    pub label: String,
    pub items: Vec<Exchange>,
}

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Partitions exchanges into (year, month) buckets of their `date`.
///
/// Buckets come out in descending chronological order, and items within a
/// bucket are newest-first. Every input lands in exactly one bucket.
pub fn group_by_month(exchanges: &[Exchange]) -> Vec<MonthBucket> {
    let mut sorted = exchanges.to_vec();
    sort_newest_first(&mut sorted, |e| e.date);

    let mut buckets: Vec<MonthBucket> = Vec::new();
    for exchange in sorted {
        let (year, month) = (exchange.date.year(), exchange.date.month());
        match buckets.last_mut() {
            Some(bucket) if bucket.year == year && bucket.month == month => {
                bucket.items.push(exchange);
            }
            _ => buckets.push(MonthBucket {
                year,
                month,
                label: format!("{} {}", MONTH_NAMES[month as usize - 1], year),
                items: vec![exchange],
            }),
        }
    }
    buckets
}

// ---------------------------------------------------------------------------
// Related content

/// Picks up to `limit` other articles sharing the source's category or at
/// least one tag, backfilled with the most recent remaining articles when
/// there are not enough topical matches. The source itself is never included.
pub fn related_articles(all: &[Article], source: &Article, limit: usize) -> Vec<Article> {
    let shares_topic = |candidate: &Article| {
        let same_category = source.category.is_some() && candidate.category == source.category;
        let shared_tag = candidate.tags.iter().any(|tag| source.tags.contains(tag));
        same_category || shared_tag
    };

    let mut related: Vec<Article> = all
        .iter()
        .filter(|a| a.id != source.id && shares_topic(a))
        .take(limit)
        .cloned()
        .collect();

    if related.len() < limit {
        let mut backfill: Vec<Article> = all
            .iter()
            .filter(|a| a.id != source.id && !related.iter().any(|r| r.id == a.id))
            .cloned()
            .collect();
        sort_newest_first(&mut backfill, |a| a.created_at);
        related.extend(backfill.into_iter().take(limit - related.len()));
    }

    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn exchange(id: &str, giver: &str, partner: &str, date: DateTime<Utc>) -> Exchange {
        Exchange {
            id: id.into(),
            post_id: Some(format!("p-{id}")),
            request_id: None,
            giver_id: giver.into(),
            partner_id: partner.into(),
            plant_name: "Tomat".into(),
            date,
            notes: String::new(),
            kind: ExchangeKind::Post,
        }
    }

    fn article(id: &str, category: &str, tags: &[&str], created: DateTime<Utc>) -> Article {
        Article {
            id: id.into(),
            user_id: "1".into(),
            title: format!("Artikel {id}"),
            content: "isi".into(),
            image: None,
            category: Some(category.into()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn excerpt_returns_short_text_unchanged() {
        assert_eq!(excerpt("halo", 10), "halo");
        assert_eq!(excerpt("halo", 4), "halo");
    }

    #[test]
    fn excerpt_truncates_and_marks() {
        let out = excerpt("abcdefghij", 5);
        assert_eq!(out, "abcde...");
        assert!(out.chars().count() <= 5 + ELLIPSIS.len());
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        // Multi-byte text must not be split inside a character.
        let out = excerpt("bibit cabe 🌶🌶🌶 pedas", 13);
        assert!(out.ends_with(ELLIPSIS));
        assert_eq!(out.chars().count(), 13 + ELLIPSIS.chars().count());
    }

    #[test]
    fn group_by_month_partitions_everything_descending() {
        let input = vec![
            exchange("a", "1", "2", at(2023, 6, 30)),
            exchange("b", "2", "1", at(2023, 7, 1)),
            exchange("c", "1", "3", at(2023, 7, 15)),
        ];
        let buckets = group_by_month(&input);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Juli 2023");
        assert_eq!(buckets[1].label, "Juni 2023");
        // Items newest-first within a bucket.
        assert_eq!(buckets[0].items[0].id, "c");
        assert_eq!(buckets[0].items[1].id, "b");

        let total: usize = buckets.iter().map(|b| b.items.len()).sum();
        assert_eq!(total, input.len());
        for item in &input {
            let hits = buckets
                .iter()
                .flat_map(|b| &b.items)
                .filter(|e| e.id == item.id)
                .count();
            assert_eq!(hits, 1, "item {} must land in exactly one bucket", item.id);
        }
    }

    #[test]
    fn group_by_month_does_not_mutate_input() {
        let input = vec![
            exchange("a", "1", "2", at(2023, 6, 30)),
            exchange("b", "2", "1", at(2023, 7, 1)),
        ];
        let snapshot: Vec<String> = input.iter().map(|e| e.id.clone()).collect();
        let _ = group_by_month(&input);
        let _ = group_by_month(&input);
        assert_eq!(
            input.iter().map(|e| e.id.clone()).collect::<Vec<_>>(),
            snapshot
        );
    }

    #[test]
    fn exchange_filter_scopes_by_involvement_and_role() {
        let ledger = vec![
            exchange("gave", "me", "other", at(2023, 7, 1)),
            exchange("got", "other", "me", at(2023, 7, 2)),
            exchange("unrelated", "a", "b", at(2023, 7, 3)),
        ];

        let all = ExchangeFilter::involving("me");
        let mine: Vec<_> = ledger.iter().filter(|e| all.matches(e)).collect();
        assert_eq!(mine.len(), 2);

        let giver = ExchangeFilter {
            role: Some(ExchangeRole::Giver),
            ..ExchangeFilter::involving("me")
        };
        let gave: Vec<_> = ledger.iter().filter(|e| giver.matches(e)).collect();
        assert_eq!(gave.len(), 1);
        assert_eq!(gave[0].id, "gave");
    }

    #[test]
    fn related_articles_prefers_topic_then_backfills_recent() {
        let source = article("src", "Budidaya", &["tomat"], at(2023, 6, 1));
        let all = vec![
            source.clone(),
            article("same-cat", "Budidaya", &[], at(2023, 5, 1)),
            article("shared-tag", "Pupuk", &["tomat", "pot"], at(2023, 4, 1)),
            article("newest-other", "Hidroponik", &["selada"], at(2023, 7, 1)),
            article("older-other", "Perawatan", &["hama"], at(2023, 3, 1)),
        ];

        let related = related_articles(&all, &source, 3);
        let ids: Vec<&str> = related.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["same-cat", "shared-tag", "newest-other"]);
        assert!(!ids.contains(&"src"));
    }

    #[test]
    fn related_articles_caps_at_limit_or_collection() {
        let source = article("src", "Budidaya", &[], at(2023, 6, 1));
        let all = vec![source.clone(), article("only", "Lain", &[], at(2023, 5, 1))];
        assert_eq!(related_articles(&all, &source, 3).len(), 1);
    }

    #[test]
    fn sort_is_stable_on_equal_timestamps() {
        let ts = at(2023, 7, 1);
        let mut items = vec![
            exchange("first", "1", "2", ts),
            exchange("second", "1", "2", ts),
            exchange("older", "1", "2", at(2023, 6, 1)),
        ];
        sort_newest_first(&mut items, |e| e.date);
        assert_eq!(items[0].id, "first");
        assert_eq!(items[1].id, "second");
        assert_eq!(items[2].id, "older");
    }

    #[test]
    fn display_name_falls_back_to_placeholder() {
        let users = vec![User {
            id: "1".into(),
            name: "Rizky".into(),
            email: "rizky@example.com".into(),
            location: "Banda Aceh".into(),
            favorite_plants: vec![],
            profile_image: None,
            created_at: at(2023, 1, 15),
        }];
        assert_eq!(display_name(&users, "1"), "Rizky");
        assert_eq!(display_name(&users, "missing"), UNKNOWN_USER);
        assert_eq!(avatar(&users, "missing"), None);
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let content = "Pertama.\n\nKedua baris\nlanjutan.\n\n\n\nKetiga.";
        assert_eq!(
            paragraphs(content),
            vec!["Pertama.", "Kedua baris\nlanjutan.", "Ketiga."]
        );
    }
}
