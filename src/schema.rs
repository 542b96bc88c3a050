//! The fixed set of columns the analyzer requires.
//!
//! Labels are compared after [`crate::processing::normalize_columns`] has run, so an input
//! header of `" Account Verification "` satisfies [`ACCOUNT_VERIFICATION`].

pub const USERNAME: &str = "Username";
pub const PLATFORM: &str = "Platform";
pub const LIKES: &str = "Likes/Reactions";
pub const COMMENTS: &str = "Comments";
pub const SHARES: &str = "Shares/Retweets";
pub const FOLLOWERS: &str = "User_Followers";
pub const ACCOUNT_VERIFICATION: &str = "Account_Verification";

/// Derived column appended by the analyzer.
pub const TOTAL_ENGAGEMENT: &str = "Total_Engagement";

/// Value of [`ACCOUNT_VERIFICATION`] that marks a verified account (exact, case-sensitive).
pub const VERIFIED: &str = "Verified";

/// Logical type expected for a required column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Free text; any cell is accepted.
    Text,
    /// Integer or float; non-numeric text is a type error.
    Numeric,
}

/// A required column and its expected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumn {
    pub name: &'static str,
    pub column_type: ColumnType,
}

/// Required input columns, in the order they are validated.
pub const REQUIRED_COLUMNS: [RequiredColumn; 7] = [
    RequiredColumn { name: USERNAME, column_type: ColumnType::Text },
    RequiredColumn { name: PLATFORM, column_type: ColumnType::Text },
    RequiredColumn { name: LIKES, column_type: ColumnType::Numeric },
    RequiredColumn { name: COMMENTS, column_type: ColumnType::Numeric },
    RequiredColumn { name: SHARES, column_type: ColumnType::Numeric },
    RequiredColumn { name: FOLLOWERS, column_type: ColumnType::Numeric },
    RequiredColumn { name: ACCOUNT_VERIFICATION, column_type: ColumnType::Text },
];

/// The raw engagement metrics summed into [`TOTAL_ENGAGEMENT`] and described by the statistics.
pub const ENGAGEMENT_COLUMNS: [&str; 3] = [LIKES, COMMENTS, SHARES];
