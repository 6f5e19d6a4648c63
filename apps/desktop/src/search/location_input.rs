//! Location search box backed by `placefind_core::LocationSearch`.

use dioxus::prelude::*;

use placefind_core::{
    Key as SearchKey, LocationSearch, Provider, SearchEvent, SearchSnapshot, Selection,
};

use super::suggestion_list::SuggestionList;
use crate::state::*;

#[component]
pub fn LocationSearchBox(
    on_select: EventHandler<Selection>,
    #[props(default = "Search for a location...".to_string())] placeholder: String,
) -> Element {
    let mut search = use_signal(|| None::<LocationSearch<Provider>>);
    let mut view = use_signal(SearchSnapshot::default);

    // Build the controller and pump its events into the view.
    use_future(move || async move {
        let (provider, options) = match CORE.read().as_ref() {
            Some(AppState { provider: Ok(p), options, .. }) => (p.clone(), *options),
            _ => return,
        };
        let (controller, mut events) = LocationSearch::new(provider, options);
        search.set(Some(controller));

        while let Some(event) = events.recv().await {
            if let SearchEvent::Selected(selection) = event {
                on_select.call(selection);
            }
            if let Some(controller) = search.read().as_ref() {
                view.set(controller.snapshot());
            }
        }
    });

    let snapshot = view.read();
    let has_query = !snapshot.query.is_empty();
    let open = !snapshot.suggestions.is_empty();
    let active_descendant = snapshot.active_index.map(|i| format!("suggestion-{i}"));

    rsx! {
        div {
            class: "location-field",

            span { class: "location-label", "LOCATION" }

            div {
                class: "location-input-row",

                svg {
                    class: "location-icon",
                    width: "16",
                    height: "16",
                    view_box: "0 0 24 24",
                    fill: "none",
                    stroke: "currentColor",
                    stroke_width: "2",
                    circle { cx: "11", cy: "11", r: "8" }
                    line { x1: "21", y1: "21", x2: "16.65", y2: "16.65" }
                }

                input {
                    class: "location-input",
                    r#type: "text",
                    placeholder: "{placeholder}",
                    value: "{snapshot.query}",
                    aria_label: "Search location",
                    aria_autocomplete: "list",
                    aria_controls: if open { "location-suggestions" },
                    aria_activedescendant: active_descendant,
                    oninput: move |e: Event<FormData>| {
                        let value = e.value();
                        drive(search, view, |c| c.input(&value));
                    },
                    onkeydown: move |e: Event<KeyboardData>| {
                        let key = SearchKey::from_name(&e.key().to_string());
                        let claimed = matches!(
                            key,
                            SearchKey::ArrowDown | SearchKey::ArrowUp | SearchKey::Enter
                        );
                        if claimed {
                            e.prevent_default();
                        }
                        drive(search, view, |c| c.key(key));
                    },
                }

                if has_query {
                    button {
                        class: "location-clear",
                        r#type: "button",
                        aria_label: "Clear search",
                        onclick: move |_| drive(search, view, |c| c.clear()),
                        "\u{00D7}"
                    }
                }

                if snapshot.loading {
                    span { class: "location-spinner", aria_hidden: "true" }
                }
            }

            if open {
                SuggestionList {
                    suggestions: snapshot.suggestions.clone(),
                    active_index: snapshot.active_index,
                    on_hover: move |i: usize| drive(search, view, |c| c.hover(i)),
                    on_pick: move |i: usize| drive(search, view, |c| c.select(i)),
                }
            }
        }
    }
}

/// Apply a user action to the controller and refresh the rendered snapshot.
fn drive(
    mut search: Signal<Option<LocationSearch<Provider>>>,
    mut view: Signal<SearchSnapshot>,
    action: impl FnOnce(&mut LocationSearch<Provider>),
) {
    let snapshot = match search.write().as_mut() {
        Some(controller) => {
            action(controller);
            controller.snapshot()
        }
        None => return,
    };
    view.set(snapshot);
}
