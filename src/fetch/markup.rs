//! Markup heuristics shared by both fetch strategies.
//!
//! The booking site does not expose a stable availability API, so the
//! verdict comes from loose signals in the results page. Negative phrases
//! always win over positive signals.

use regex::Regex;
use scraper::{Html, Selector};

/// Phrases whose presence marks the probed stay as unavailable.
const NO_AVAILABILITY_PHRASES: &[&str] = &[
    "no availability",
    "not available",
    "no rooms available",
    "sold out",
    "no lodging available",
    "no results found",
    "couldn't find any results",
];

/// Decides whether a results page offers the probed stay.
pub fn page_indicates_availability(html: &str) -> bool {
    let doc = Html::parse_document(html);
    let text = page_text(&doc).to_lowercase();

    if NO_AVAILABILITY_PHRASES.iter().any(|p| text.contains(p)) {
        return false;
    }

    has_rate_elements(&doc) || has_booking_action(&doc) || has_price_marker(&text)
}

fn page_text(doc: &Html) -> String {
    doc.root_element().text().collect::<Vec<_>>().join(" ")
}

/// Rate cards and room listings carry "rate" or "room" in their class.
fn has_rate_elements(doc: &Html) -> bool {
    let divs = Selector::parse("div").expect("static selector");
    doc.select(&divs).any(|el| {
        el.value().attr("class").is_some_and(|class| {
            let class = class.to_lowercase();
            class.contains("rate") || class.contains("room")
        })
    })
}

/// Book/Reserve buttons and links strongly indicate a bookable stay.
fn has_booking_action(doc: &Html) -> bool {
    let actions = Selector::parse("button, a").expect("static selector");
    let re = Regex::new(r"(?i)\b(book|reserve)\b").expect("static regex");
    doc.select(&actions)
        .any(|el| re.is_match(&el.text().collect::<Vec<_>>().join(" ")))
}

/// A nightly price anywhere on the page is enough.
fn has_price_marker(text: &str) -> bool {
    let re = Regex::new(r"\$\d+").expect("static regex");
    re.is_match(text) || text.contains('$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sold_out_page_is_unavailable() {
        let html = r#"<html><body><p>Sold out for these dates.</p></body></html>"#;
        assert!(!page_indicates_availability(html));
    }

    #[test]
    fn test_negative_phrase_beats_price_signal() {
        let html = r#"<html><body>
            <p>We couldn't find any results for your search.</p>
            <div class="promo">Rooms from $199 next season</div>
        </body></html>"#;
        assert!(!page_indicates_availability(html));
    }

    #[test]
    fn test_rate_element_is_available() {
        let html = r#"<html><body><div class="RateCard">Best Available Rate</div></body></html>"#;
        assert!(page_indicates_availability(html));
    }

    #[test]
    fn test_room_element_is_available() {
        let html = r#"<html><body><div class="room-listing">Standard King</div></body></html>"#;
        assert!(page_indicates_availability(html));
    }

    #[test]
    fn test_book_button_is_available() {
        let html = r#"<html><body><button>Book Now</button></body></html>"#;
        assert!(page_indicates_availability(html));
    }

    #[test]
    fn test_reserve_link_is_available() {
        let html = r#"<html><body><a href="/checkout">Reserve</a></body></html>"#;
        assert!(page_indicates_availability(html));
    }

    #[test]
    fn test_price_marker_is_available() {
        let html = r#"<html><body><span>$249 average/night</span></body></html>"#;
        assert!(page_indicates_availability(html));
    }

    #[test]
    fn test_plain_page_is_unavailable() {
        let html = r#"<html><body><h1>Plan your trip</h1><p>Select dates to begin.</p></body></html>"#;
        assert!(!page_indicates_availability(html));
    }

    #[test]
    fn test_facebook_link_is_not_a_booking_action() {
        let html = r#"<html><body><a href="https://facebook.com/lodge">Follow us</a></body></html>"#;
        assert!(!page_indicates_availability(html));
    }
}
