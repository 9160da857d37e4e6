mod bitflip;
mod circuit;
mod config;
mod ext;
mod gate;
mod instruction;
mod measurement;
mod render;
mod report;
mod simulator;
mod state;
mod sv_simulator;

pub use bitflip::*;
pub use circuit::*;
pub use config::*;
pub use ext::*;
pub use gate::*;
pub use instruction::*;
pub use measurement::*;
pub use render::*;
pub use report::*;
pub use simulator::*;
pub use state::*;
pub use sv_simulator::*;
