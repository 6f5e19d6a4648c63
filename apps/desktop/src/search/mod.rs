//! Location search: input field with debounced lookups + suggestion dropdown.

mod location_input;
mod suggestion_list;

pub use location_input::LocationSearchBox;
