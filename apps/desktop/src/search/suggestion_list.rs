//! Dropdown of normalized candidates.

use dioxus::prelude::*;
use placefind_core::Candidate;

#[component]
pub fn SuggestionList(
    suggestions: Vec<Candidate>,
    active_index: Option<usize>,
    on_hover: EventHandler<usize>,
    on_pick: EventHandler<usize>,
) -> Element {
    rsx! {
        ul {
            id: "location-suggestions",
            class: "suggestion-list",
            role: "listbox",
            for (i, candidate) in suggestions.iter().enumerate() {
                li {
                    key: "{candidate.id}",
                    id: "suggestion-{i}",
                    role: "option",
                    aria_selected: active_index == Some(i),
                    class: if active_index == Some(i) {
                        "suggestion-item active"
                    } else {
                        "suggestion-item"
                    },
                    onmouseenter: move |_| on_hover.call(i),
                    onclick: move |_| on_pick.call(i),
                    span { class: "suggestion-pin", "\u{1F4CD}" }
                    div {
                        class: "suggestion-text",
                        span { class: "suggestion-primary", "{candidate.primary_label}" }
                        span { class: "suggestion-secondary", "{candidate.secondary_label}" }
                    }
                }
            }
        }
    }
}
