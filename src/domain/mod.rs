mod calendar;
mod client;
mod money;
mod order;
mod payment;

pub use calendar::*;
pub use client::*;
pub use money::*;
pub use order::*;
pub use payment::*;
