//! Database repositories.

pub mod comment;
pub mod notification;
pub mod report;
pub mod session;
pub mod taxonomy;
pub mod user;

pub use comment::CommentRepository;
pub use notification::NotificationRepository;
pub use report::{ReportQuery, ReportRepository};
pub use session::SessionRepository;
pub use taxonomy::{CategoryRepository, FacilityTypeRepository};
pub use user::UserRepository;
