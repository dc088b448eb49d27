use crate::domain::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "lenient::text")]
    pub ticker: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub market: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rationale: String,
}

/// Body of `POST /recommendations`. A missing or `null` `items` key is an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub items: Vec<Recommendation>,
}
