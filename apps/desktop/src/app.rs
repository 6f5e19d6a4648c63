//! Root application component: event location form.

use dioxus::prelude::*;
use placefind_core::Selection;

use crate::search::LocationSearchBox;
use crate::state::*;

static VARIABLES_CSS: Asset = asset!("/assets/styles/variables.css");
static APP_CSS: Asset = asset!("/assets/styles/app.css");

#[component]
pub fn App() -> Element {
    use_hook(|| {
        if let Some(state) = take_startup() {
            *CORE.write() = Some(state);
        }
    });

    rsx! {
        document::Stylesheet { href: VARIABLES_CSS }
        document::Stylesheet { href: APP_CSS }

        div {
            class: "app-shell",

            div {
                class: "titlebar",
                span { class: "titlebar-title", "placefind" }
            }

            div {
                class: "content-area",
                EventForm {}
            }

            StatusBar {}
        }
    }
}

/// The parent form: receives the committed location and shows what would be saved
/// alongside the event record.
#[component]
fn EventForm() -> Element {
    let core = CORE.read();
    let title = EVENT_TITLE.read();

    let search_error = match core.as_ref() {
        Some(AppState { provider: Err(e), .. }) => Some(e.clone()),
        None => Some("Not initialized".to_string()),
        _ => None,
    };

    let location_field = match search_error {
        Some(error) => rsx! {
            div { class: "location-error", "Location search unavailable: {error}" }
        },
        None => rsx! {
            LocationSearchBox {
                on_select: move |selection: Selection| *SELECTED_LOCATION.write() = Some(selection),
            }
        },
    };

    rsx! {
        form {
            class: "event-form",
            onsubmit: move |e| e.prevent_default(),

            label { class: "form-label", r#for: "event-title", "EVENT TITLE" }
            input {
                id: "event-title",
                class: "form-input",
                r#type: "text",
                placeholder: "Community meetup",
                value: "{title}",
                oninput: move |e: Event<FormData>| *EVENT_TITLE.write() = e.value(),
            }

            {location_field}

            SelectedLocation {}
        }
    }
}

#[component]
fn SelectedLocation() -> Element {
    let selected = SELECTED_LOCATION.read();

    let Some(location) = selected.as_ref() else {
        return rsx! {
            div { class: "selected-location empty", "No location selected" }
        };
    };

    let coords = match location.coordinates {
        Some([lat, lon]) => format!("{lat:.5}, {lon:.5}"),
        None => "coordinates unavailable".to_string(),
    };

    rsx! {
        div {
            class: "selected-location",
            span { class: "selected-address", "{location.address}" }
            span { class: "selected-coords", "{coords}" }
            span { class: "selected-id", "id {location.id}" }
        }
    }
}

/// Status bar at the bottom of the app
#[component]
fn StatusBar() -> Element {
    let core = CORE.read();

    let (provider, debounce_ms) = match core.as_ref() {
        Some(state) => (state.provider_name, state.options.debounce.as_millis()),
        None => ("none", 0),
    };

    rsx! {
        div {
            class: "statusbar",
            span { class: "statusbar-provider", "{provider}" }
            span { class: "statusbar-sep", "|" }
            span { class: "statusbar-debounce", "{debounce_ms}ms debounce" }
        }
    }
}
