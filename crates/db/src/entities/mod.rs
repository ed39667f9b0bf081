//! Database entities.

pub mod category;
pub mod comment;
pub mod facility_type;
pub mod notification;
pub mod report;
pub mod session;
pub mod user;

pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use facility_type::Entity as FacilityType;
pub use notification::Entity as Notification;
pub use report::Entity as Report;
pub use session::Entity as Session;
pub use user::Entity as User;
