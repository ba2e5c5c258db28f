pub mod answer;
pub mod corpus;
pub mod device;
pub mod outcome;

pub use answer::*;
pub use corpus::*;
pub use device::*;
pub use outcome::*;
