//! Query state: what the next fetch should ask for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::api::UserId;

/// Sort orders the feed endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Distance from the caller's coordinates, computed server-side.
    #[default]
    Distance,
    Date,
    Price,
}

impl SortOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Distance => "distance",
            SortOrder::Date => "date",
            SortOrder::Price => "price",
        }
    }

    pub const fn all() -> &'static [SortOrder] {
        &[SortOrder::Distance, SortOrder::Date, SortOrder::Price]
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "distance" => Ok(SortOrder::Distance),
            "date" => Ok(SortOrder::Date),
            "price" => Ok(SortOrder::Price),
            _ => Err(format!("unknown sort order: {}", s)),
        }
    }
}

impl Serialize for SortOrder {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SortOrder::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// The frozen tuple identifying one fetch request.
///
/// Equality over signatures is what makes stale responses detectable; see
/// the controller's issue counter for how arrival-time comparison works.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySignature {
    pub search: String,
    pub page: u32,
    pub order: SortOrder,
    pub creator: Option<UserId>,
    pub attending: Option<UserId>,
}

/// Mutable query state behind the controller.
///
/// `creator`/`attending` are scope filters fixed at construction; the other
/// fields change only through the setters below. Changing `search` or
/// `order` is a compound operation that also resets `page` to 1, which is
/// what makes the next successful fetch replace the list instead of
/// appending to it.
#[derive(Debug)]
pub struct FeedQuery {
    search: String,
    order: SortOrder,
    page: u32,
    creator: Option<UserId>,
    attending: Option<UserId>,
}

impl FeedQuery {
    pub fn new(creator: Option<UserId>, attending: Option<UserId>) -> Self {
        Self {
            search: String::new(),
            order: SortOrder::default(),
            page: 1,
            creator,
            attending,
        }
    }

    /// Set the (already debounced) search text. Returns true when the value
    /// actually changed; a change resets the page to 1.
    pub fn set_search(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value == self.search {
            return false;
        }
        self.search = value;
        self.page = 1;
        true
    }

    /// Set the sort order. Returns true when the value actually changed; a
    /// change resets the page to 1.
    pub fn set_order(&mut self, order: SortOrder) -> bool {
        if order == self.order {
            return false;
        }
        self.order = order;
        self.page = 1;
        true
    }

    pub fn next_page(&mut self) -> u32 {
        self.page += 1;
        self.page
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn creator(&self) -> Option<UserId> {
        self.creator
    }

    pub fn attending(&self) -> Option<UserId> {
        self.attending
    }

    pub fn signature(&self) -> QuerySignature {
        QuerySignature {
            search: self.search.clone(),
            page: self.page,
            order: self.order,
            creator: self.creator,
            attending: self.attending,
        }
    }
}
