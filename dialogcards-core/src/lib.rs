pub mod deck;
pub mod errors;
pub mod filters;
pub mod models;
pub mod navigation;
pub mod params;
pub mod progress;
pub mod state;
pub mod summary;
pub mod view;

pub use deck::*;
pub use errors::*;
pub use filters::*;
pub use models::*;
pub use navigation::*;
pub use params::*;
pub use progress::*;
pub use state::*;
pub use summary::*;
pub use view::*;
