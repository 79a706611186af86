use crate::models::DomainSuggestion;
use crate::search::{SearchState, SearchView};

pub const EMPTY_MESSAGE: &str = "No domain suggestions found. Try a different search term.";

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("${price:.2}"),
        None => "N/A".to_string(),
    }
}

/// Price as shown on a card. Only known prices are per year.
pub fn price_label(price: Option<f64>) -> String {
    match price {
        Some(_) => format!("{}/year", format_price(price)),
        None => format_price(price),
    }
}

pub fn availability_label(available: bool) -> &'static str {
    if available {
        "✓ Available"
    } else {
        "✗ Not Available"
    }
}

pub fn render_card(suggestion: &DomainSuggestion) -> String {
    let badge = if suggestion.premium { " [Premium]" } else { "" };
    format!(
        "{}{}\n  {}\n  {}",
        suggestion.domain,
        badge,
        availability_label(suggestion.available),
        price_label(suggestion.price)
    )
}

pub fn render(view: &SearchView) -> String {
    match &view.state {
        SearchState::Error(message) => message.clone(),
        SearchState::Success(results) if !results.is_empty() => {
            let mut out = format!("Available Domains ({})", results.len());
            for suggestion in results {
                out.push_str("\n\n");
                out.push_str(&render_card(suggestion));
            }
            out
        }
        SearchState::Loading => "Searching...".to_string(),
        _ if !view.query.is_empty() => EMPTY_MESSAGE.to_string(),
        _ => String::new(),
    }
}
