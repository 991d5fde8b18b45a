mod asset;
mod batch;
mod character;
mod combine;
mod compose;
mod download;
mod font;
mod layout;
mod profession;

pub use asset::*;
pub use batch::*;
pub use character::*;
pub use combine::*;
pub use compose::*;
pub use download::*;
pub use font::*;
pub use layout::*;
pub use profession::*;
