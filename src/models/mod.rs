pub mod dashboard;
pub mod notification;
pub mod owner;
pub mod pagination;
pub mod pass;
pub mod session;
pub mod user;
pub mod vehicle;

pub use dashboard::*;
pub use notification::*;
pub use owner::*;
pub use pagination::*;
pub use pass::*;
pub use session::*;
pub use user::*;
pub use vehicle::*;
