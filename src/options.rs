// Typed query options accepted by the group and search endpoints
use std::fmt;

// Sort order for a user's group list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupListSort {
    MyActivity,
    #[default]
    Members,
    LastActivity,
    Title,
}

impl GroupListSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupListSort::MyActivity => "my_activity",
            GroupListSort::Members => "members",
            GroupListSort::LastActivity => "last_activity",
            GroupListSort::Title => "title",
        }
    }
}

// Sort order for group members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMemberSort {
    LastOnline,
    NumComments,
    DateJoined,
    NumBooks,
    FirstName,
}

impl GroupMemberSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupMemberSort::LastOnline => "last_online",
            GroupMemberSort::NumComments => "num_comments",
            GroupMemberSort::DateJoined => "date_joined",
            GroupMemberSort::NumBooks => "num_books",
            GroupMemberSort::FirstName => "first_name",
        }
    }
}

// Sort order for the topics listed with a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupTopicSort {
    CommentsCount,
    #[default]
    Title,
    UpdatedAt,
    Views,
}

impl GroupTopicSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupTopicSort::CommentsCount => "comments_count",
            GroupTopicSort::Title => "title",
            GroupTopicSort::UpdatedAt => "updated_at",
            GroupTopicSort::Views => "views",
        }
    }
}

// Which field `search[field]` restricts a book search to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    Title,
    Author,
    #[default]
    All,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::All => "all",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(GroupListSort, GroupMemberSort, GroupTopicSort, SearchField);
