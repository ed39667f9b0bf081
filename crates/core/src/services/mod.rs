//! Business logic services.

pub mod analytics;
pub mod auth;
pub mod comment;
pub mod notification;
pub mod report;
pub mod taxonomy;
pub mod user;

pub use analytics::{AnalyticsService, DEFAULT_WINDOW_DAYS};
pub use auth::AuthService;
pub use comment::CommentService;
pub use notification::NotificationService;
pub use report::{CreateReportInput, ReportService, UpdateReportInput};
pub use taxonomy::{CreateTaxonomyInput, TaxonomyService, UpdateTaxonomyInput};
pub use user::{CreateUserInput, UpdateUserInput, UserService};
