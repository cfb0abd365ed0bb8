pub mod map_view;
pub mod search_box;
pub mod status_bar;
pub mod title_bar;

pub use map_view::{MapEvent, MapView, MapViewState};
pub use search_box::{SearchBox, SearchBoxEvent};
pub use status_bar::StatusBar;
pub use title_bar::TitleBar;
