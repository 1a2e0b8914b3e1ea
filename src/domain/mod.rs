pub mod demand;
pub mod equipment;
pub mod grid;
pub mod renewable;
pub mod weather;

pub use demand::*;
pub use equipment::*;
pub use grid::*;
pub use renewable::*;
pub use weather::*;
