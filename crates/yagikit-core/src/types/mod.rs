//! Value types describing the antenna: boom, elements, terminals and labels.

mod boom;
mod element;
mod label;
mod terminal;

pub use boom::BoomProfile;
pub use element::{Element, ElementSet, ElementType, Polarization};
pub use label::{Label, Rgb};
pub use terminal::TerminalSpec;
