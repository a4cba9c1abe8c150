//! Domain models for the back office

mod activity;
mod customer;
mod finance;
mod inventory;
mod lead;
mod order;
mod product;
mod production;
mod supplier;
mod task;

pub use activity::*;
pub use customer::*;
pub use finance::*;
pub use inventory::*;
pub use lead::*;
pub use order::*;
pub use product::*;
pub use production::*;
pub use supplier::*;
pub use task::*;
