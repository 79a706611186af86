use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSuggestion {
    pub domain: String,
    #[serde(default)]
    pub price: Option<f64>,
    pub available: bool,
    pub premium: bool,
}

/// One upstream answer. Suggestions keep upstream order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total: u64,
    pub suggestions: Vec<DomainSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
