//! Engagement analysis over a normalized [`PostTable`].
//!
//! [`analyze`] validates the required columns, type-checks the numeric ones, appends
//! `Total_Engagement`, and derives the four aggregates (statistics, top posts, per-platform mean,
//! top verified users).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::AnalysisOptions;
use crate::schema::{
    ColumnType, ACCOUNT_VERIFICATION, COMMENTS, ENGAGEMENT_COLUMNS, FOLLOWERS, LIKES, PLATFORM,
    REQUIRED_COLUMNS, SHARES, TOTAL_ENGAGEMENT, USERNAME,
};
use crate::types::{PostTable, Value};

use super::stats::Statistics;

/// One row of the top-posts ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPost {
    pub username: Value,
    pub platform: Value,
    pub total_engagement: Value,
}

/// Mean total engagement for one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformEngagement {
    pub platform: String,
    /// `None` when every post on the platform has a missing total.
    pub mean_engagement: Option<f64>,
    /// Number of posts on the platform (including ones with a missing total).
    pub posts: usize,
}

/// One row of the top-verified-users ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedUser {
    pub username: Value,
    pub followers: Value,
}

/// Everything the analyzer derives from one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Input table with numeric columns typed and `Total_Engagement` appended.
    pub table: PostTable,
    pub statistics: Statistics,
    pub top_posts: Vec<TopPost>,
    /// Sorted alphabetically by platform.
    pub platform_engagement: Vec<PlatformEngagement>,
    pub top_verified: Vec<VerifiedUser>,
}

/// Run the full analysis on a normalized table.
pub fn analyze(table: PostTable, options: &AnalysisOptions) -> PipelineResult<Analysis> {
    let table = with_total_engagement(table)?;
    let statistics = Statistics::describe(&table, &ENGAGEMENT_COLUMNS);
    let top_posts = top_posts(&table, options.top_n)?;
    let platform_engagement = platform_engagement(&table)?;
    let top_verified = top_verified_users(&table, options.top_n, &options.verified_marker)?;

    Ok(Analysis {
        table,
        statistics,
        top_posts,
        platform_engagement,
        top_verified,
    })
}

/// Check that every row has exactly one cell per column.
///
/// Tables built by the loader always pass; hand-built tables may not. Rows are numbered the way
/// the loader numbers them (header is row 1).
pub fn validate_shape(table: &PostTable) -> PipelineResult<()> {
    match table.ragged_row() {
        None => Ok(()),
        Some((idx, found)) => Err(PipelineError::Parse {
            message: format!(
                "row {}: expected {} fields, found {found}",
                idx + 2,
                table.columns.len()
            ),
        }),
    }
}

/// Check the table's shape and that every required column is present.
///
/// Fails with [`PipelineError::Parse`] on a ragged row, then with
/// [`PipelineError::MissingColumn`] naming the first absent column.
pub fn validate_schema(table: &PostTable) -> PipelineResult<()> {
    validate_shape(table)?;
    for required in &REQUIRED_COLUMNS {
        require(table, required.name)?;
    }
    Ok(())
}

/// Validate the schema, convert the numeric columns from text, and append `Total_Engagement`.
///
/// A numeric cell that is not a number fails the whole call with [`PipelineError::TypeError`];
/// no partial table is returned. Missing cells stay [`Value::Null`] and make the row's total
/// missing as well.
pub fn with_total_engagement(table: PostTable) -> PipelineResult<PostTable> {
    validate_schema(&table)?;
    let table = coerce_numeric_columns(table)?;

    let likes = require(&table, LIKES)?;
    let comments = require(&table, COMMENTS)?;
    let shares = require(&table, SHARES)?;

    Ok(table.with_column(TOTAL_ENGAGEMENT, |row| {
        total_engagement(&row[likes], &row[comments], &row[shares])
    }))
}

/// The `n` posts with the highest total engagement, highest first.
///
/// Ties keep their original row order; posts with a missing total sort last.
pub fn top_posts(table: &PostTable, n: usize) -> PipelineResult<Vec<TopPost>> {
    validate_shape(table)?;
    let username = require(table, USERNAME)?;
    let platform = require(table, PLATFORM)?;
    let total = require(table, TOTAL_ENGAGEMENT)?;

    let order = descending_order(table, total);
    Ok(order
        .into_iter()
        .take(n)
        .map(|i| {
            let row = &table.rows[i];
            TopPost {
                username: row[username].clone(),
                platform: row[platform].clone(),
                total_engagement: row[total].clone(),
            }
        })
        .collect())
}

/// Mean total engagement per distinct platform value, sorted by platform.
///
/// Rows with a missing platform are not grouped. Missing totals are skipped in the mean.
pub fn platform_engagement(table: &PostTable) -> PipelineResult<Vec<PlatformEngagement>> {
    validate_shape(table)?;
    let platform = require(table, PLATFORM)?;
    let total = require(table, TOTAL_ENGAGEMENT)?;

    // platform -> (sum, non-null count, posts)
    let mut groups: BTreeMap<String, (f64, usize, usize)> = BTreeMap::new();
    for row in &table.rows {
        let key = match &row[platform] {
            Value::Null => continue,
            Value::Utf8(s) => s.clone(),
            other => other.to_string(),
        };
        let entry = groups.entry(key).or_insert((0.0, 0, 0));
        entry.2 += 1;
        if let Some(v) = row[total].as_f64() {
            entry.0 += v;
            entry.1 += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(platform, (sum, count, posts))| PlatformEngagement {
            platform,
            mean_engagement: (count > 0).then(|| sum / count as f64),
            posts,
        })
        .collect())
}

/// The `n` verified accounts with the most followers, highest first.
///
/// Only rows whose verification cell equals `marker` exactly are considered. Ties keep their
/// original row order. No verified rows gives an empty result.
pub fn top_verified_users(
    table: &PostTable,
    n: usize,
    marker: &str,
) -> PipelineResult<Vec<VerifiedUser>> {
    validate_shape(table)?;
    let username = require(table, USERNAME)?;
    let followers = require(table, FOLLOWERS)?;
    let verification = require(table, ACCOUNT_VERIFICATION)?;

    let verified = table.filter_rows(|row| row[verification].as_str() == Some(marker));
    let order = descending_order(&verified, followers);
    Ok(order
        .into_iter()
        .take(n)
        .map(|i| {
            let row = &verified.rows[i];
            VerifiedUser {
                username: row[username].clone(),
                followers: row[followers].clone(),
            }
        })
        .collect())
}

fn require(table: &PostTable, column: &str) -> PipelineResult<usize> {
    table
        .index_of(column)
        .ok_or_else(|| PipelineError::MissingColumn {
            column: column.to_owned(),
        })
}

fn coerce_numeric_columns(mut table: PostTable) -> PipelineResult<PostTable> {
    for required in REQUIRED_COLUMNS
        .iter()
        .filter(|c| c.column_type == ColumnType::Numeric)
    {
        let idx = require(&table, required.name)?;
        for (row_idx0, row) in table.rows.iter_mut().enumerate() {
            // Same 1-based numbering as the loader: header is line 1.
            let user_row = row_idx0 + 2;
            if let Value::Utf8(raw) = &row[idx] {
                let parsed = parse_number(raw).ok_or_else(|| PipelineError::TypeError {
                    row: user_row,
                    column: required.name.to_owned(),
                    raw: raw.clone(),
                })?;
                row[idx] = parsed;
            }
        }
    }
    Ok(table)
}

fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(Value::Int64(v));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_nan() => Some(Value::Null),
        Ok(v) => Some(Value::Float64(v)),
        Err(_) => None,
    }
}

fn total_engagement(likes: &Value, comments: &Value, shares: &Value) -> Value {
    match (likes, comments, shares) {
        (Value::Int64(a), Value::Int64(b), Value::Int64(c)) => a
            .checked_add(*b)
            .and_then(|s| s.checked_add(*c))
            .map(Value::Int64)
            .unwrap_or_else(|| Value::Float64(*a as f64 + *b as f64 + *c as f64)),
        _ => match (likes.as_f64(), comments.as_f64(), shares.as_f64()) {
            (Some(a), Some(b), Some(c)) => Value::Float64(a + b + c),
            _ => Value::Null,
        },
    }
}

/// Row indexes of `table` sorted descending by column `idx`, stable, missing values last.
fn descending_order(table: &PostTable, idx: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..table.row_count()).collect();
    order.sort_by(|&a, &b| compare_desc(&table.rows[a][idx], &table.rows[b][idx]));
    order
}

fn compare_desc(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int64(x), Value::Int64(y)) => y.cmp(x),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        analyze, platform_engagement, top_posts, top_verified_users, validate_schema,
        validate_shape, with_total_engagement,
    };
    use crate::error::{ErrorKind, PipelineError};
    use crate::pipeline::AnalysisOptions;
    use crate::schema::TOTAL_ENGAGEMENT;
    use crate::types::{PostTable, Value};

    const HEADER: [&str; 7] = [
        "Username",
        "Platform",
        "Likes/Reactions",
        "Comments",
        "Shares/Retweets",
        "Account_Verification",
        "User_Followers",
    ];

    fn text(s: &str) -> Value {
        if s.is_empty() {
            Value::Null
        } else {
            Value::Utf8(s.to_string())
        }
    }

    fn table(rows: &[[&str; 7]]) -> PostTable {
        PostTable::new(
            HEADER.iter().map(|s| s.to_string()).collect(),
            rows.iter().map(|r| r.iter().map(|c| text(c)).collect()).collect(),
        )
    }

    fn two_row_example() -> PostTable {
        table(&[
            ["alice", "X", "10", "2", "3", "Verified", "100"],
            ["bob", "X", "1", "1", "1", "Not", "50"],
        ])
    }

    #[test]
    fn two_row_example_matches_expected_aggregates() {
        let a = analyze(two_row_example(), &AnalysisOptions::default()).unwrap();
        let total = a.table.index_of(TOTAL_ENGAGEMENT).unwrap();
        let totals: Vec<_> = a.table.column(total).cloned().collect();
        assert_eq!(totals, vec![Value::Int64(15), Value::Int64(3)]);

        let names: Vec<_> = a.top_posts.iter().map(|p| p.username.clone()).collect();
        assert_eq!(names, vec![text("alice"), text("bob")]);

        assert_eq!(a.platform_engagement.len(), 1);
        assert_eq!(a.platform_engagement[0].platform, "X");
        assert_eq!(a.platform_engagement[0].mean_engagement, Some(9.0));

        assert_eq!(a.top_verified.len(), 1);
        assert_eq!(a.top_verified[0].username, text("alice"));
        assert_eq!(a.top_verified[0].followers, Value::Int64(100));
    }

    #[test]
    fn total_is_elementwise_sum_with_floats_and_nulls() {
        let t = with_total_engagement(table(&[
            ["a", "X", "1.5", "2", "3", "Verified", "1"],
            ["b", "X", "", "2", "3", "Verified", "1"],
            ["c", "X", " 4 ", "0", "0", "Verified", "1"],
        ]))
        .unwrap();
        let total = t.index_of(TOTAL_ENGAGEMENT).unwrap();
        assert_eq!(t.rows[0][total], Value::Float64(6.5));
        assert_eq!(t.rows[1][total], Value::Null);
        assert_eq!(t.rows[2][total], Value::Int64(4));
    }

    #[test]
    fn integer_overflow_falls_back_to_float() {
        let max = i64::MAX.to_string();
        let t = with_total_engagement(table(&[["a", "X", max.as_str(), "1", "0", "Verified", "1"]])).unwrap();
        let total = t.index_of(TOTAL_ENGAGEMENT).unwrap();
        assert!(matches!(t.rows[0][total], Value::Float64(_)));
    }

    #[test]
    fn short_row_is_a_parse_error_not_a_panic() {
        let mut t = two_row_example();
        t.rows[1].truncate(3);

        match validate_shape(&t).unwrap_err() {
            PipelineError::Parse { message } => assert_eq!(message, "row 3: expected 7 fields, found 3"),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(top_posts(&t, 5).unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(platform_engagement(&t).unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(top_verified_users(&t, 5, "Verified").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(
            analyze(t, &AnalysisOptions::default()).unwrap_err().kind(),
            ErrorKind::Parse
        );
    }

    #[test]
    fn missing_column_is_named() {
        let mut t = two_row_example();
        let idx = t.index_of("Comments").unwrap();
        t.columns[idx] = "Replies".to_string();
        let err = validate_schema(&t).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { ref column } if column == "Comments"));
        assert_eq!(
            analyze(t, &AnalysisOptions::default()).unwrap_err().kind(),
            ErrorKind::MissingColumn
        );
    }

    #[test]
    fn non_numeric_engagement_is_a_type_error() {
        let err = analyze(
            table(&[
                ["a", "X", "1", "2", "3", "Verified", "1"],
                ["b", "X", "1", "many", "3", "Verified", "1"],
            ]),
            &AnalysisOptions::default(),
        )
        .unwrap_err();
        match err {
            PipelineError::TypeError { row, column, raw } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Comments");
                assert_eq!(raw, "many");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_followers_is_a_type_error() {
        let err = analyze(
            table(&[["a", "X", "1", "2", "3", "Verified", "lots"]]),
            &AnalysisOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }

    #[test]
    fn top_posts_is_stable_descending_and_capped() {
        let t = with_total_engagement(table(&[
            ["a", "X", "5", "0", "0", "", "1"],
            ["b", "Y", "9", "0", "0", "", "1"],
            ["c", "X", "5", "0", "0", "", "1"],
            ["d", "Y", "", "0", "0", "", "1"],
            ["e", "Z", "1", "0", "0", "", "1"],
            ["f", "Z", "7", "0", "0", "", "1"],
            ["g", "Z", "5", "0", "0", "", "1"],
        ]))
        .unwrap();
        let top = top_posts(&t, 5).unwrap();
        let names: Vec<_> = top.iter().map(|p| p.username.to_string()).collect();
        assert_eq!(names, vec!["b", "f", "a", "c", "g"]);

        let all = top_posts(&t, 10).unwrap();
        assert_eq!(all.len(), 7);
        assert_eq!(all.last().unwrap().username, text("d"));
    }

    #[test]
    fn top_posts_on_short_table_returns_all_rows() {
        let t = with_total_engagement(two_row_example()).unwrap();
        assert_eq!(top_posts(&t, 5).unwrap().len(), 2);
    }

    #[test]
    fn platform_engagement_groups_distinct_values_sorted() {
        let t = with_total_engagement(table(&[
            ["a", "Twitter", "4", "0", "0", "", "1"],
            ["b", "Facebook", "1", "1", "1", "", "1"],
            ["c", "Twitter", "6", "0", "0", "", "1"],
            ["d", "", "100", "0", "0", "", "1"],
            ["e", "twitter", "2", "0", "0", "", "1"],
            ["f", "Facebook", "", "1", "1", "", "1"],
        ]))
        .unwrap();
        let groups = platform_engagement(&t).unwrap();
        let keys: Vec<_> = groups.iter().map(|g| g.platform.as_str()).collect();
        assert_eq!(keys, vec!["Facebook", "Twitter", "twitter"]);
        assert_eq!(groups[0].mean_engagement, Some(3.0));
        assert_eq!(groups[0].posts, 2);
        assert_eq!(groups[1].mean_engagement, Some(5.0));
        assert_eq!(groups[2].mean_engagement, Some(2.0));
    }

    #[test]
    fn verified_filter_is_exact_and_case_sensitive() {
        let t = with_total_engagement(table(&[
            ["a", "X", "1", "1", "1", "verified", "900"],
            ["b", "X", "1", "1", "1", "Verified", "10"],
            ["c", "X", "1", "1", "1", "Verified ", "800"],
            ["d", "X", "1", "1", "1", "Verified", "30"],
            ["e", "X", "1", "1", "1", "Verified", "30"],
        ]))
        .unwrap();
        let top = top_verified_users(&t, 5, "Verified").unwrap();
        let names: Vec<_> = top.iter().map(|u| u.username.to_string()).collect();
        assert_eq!(names, vec!["d", "e", "b"]);
    }

    #[test]
    fn no_verified_rows_is_empty_not_error() {
        let t = with_total_engagement(table(&[["a", "X", "1", "1", "1", "Unverified", "5"]])).unwrap();
        assert!(top_verified_users(&t, 5, "Verified").unwrap().is_empty());
    }

    #[test]
    fn zero_rows_give_empty_aggregates() {
        let a = analyze(table(&[]), &AnalysisOptions::default()).unwrap();
        assert!(a.statistics.is_empty());
        assert!(a.top_posts.is_empty());
        assert!(a.platform_engagement.is_empty());
        assert!(a.top_verified.is_empty());
        assert!(a.table.index_of(TOTAL_ENGAGEMENT).is_some());
    }

    #[test]
    fn statistics_cover_the_three_engagement_columns() {
        let a = analyze(two_row_example(), &AnalysisOptions::default()).unwrap();
        let names: Vec<_> = a.statistics.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["Likes/Reactions", "Comments", "Shares/Retweets"]);
        let likes = a.statistics.get("Likes/Reactions").unwrap();
        assert_eq!(likes.count, 2);
        assert_eq!(likes.mean, Some(5.5));
        assert_eq!(likes.max, Some(10.0));
    }
}
