pub mod fees;
pub mod jwt;
pub mod pass_terms;
pub mod password;
pub mod plate;

pub use fees::*;
pub use jwt::*;
pub use pass_terms::*;
pub use password::*;
pub use plate::*;
