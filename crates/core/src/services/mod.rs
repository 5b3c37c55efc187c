//! Domain services.

pub mod account;
pub mod admission;
pub mod course;
pub mod dashboard;
pub mod email;
pub mod event;
pub mod image;
pub mod news;
pub mod resource;
pub mod review;
pub mod tagging;
pub mod topic;
pub mod visitor;

pub use account::{
    AccountService, AdminClaims, AdminResponse, CreateAdminInput, LoginInput, LoginResponse,
    ResetPasswordInput, SendOtpInput, VerifyOtpInput,
};
pub use admission::{AdmissionInput, AdmissionResponse, AdmissionService};
pub use course::{
    CourseResponse, CourseService, CreateCourseInput, IndustryResponse, UpdateCourseInput,
};
pub use dashboard::{DashboardResponse, DashboardService};
pub use email::EmailService;
pub use event::{CreateEventInput, EventResponse, EventService, UpdateEventInput};
pub use image::{ImageResponse, ImageService};
pub use news::{CreateNewsInput, NewsResponse, NewsService, UpdateNewsInput};
pub use resource::{
    CreateResourceInput, ResourceFileResponse, ResourceResponse, ResourceService,
    UpdateResourceInput,
};
pub use review::{CreateReviewInput, ReviewResponse, ReviewService};
pub use tagging::{TagInput, TagResponse, TaggingService};
pub use topic::{
    AnswerInput, AnswerResponse, CreateAnswerInput, CreateTopicInput, TopicResponse, TopicService,
    UpdateAnswerInput, UpdateTopicInput,
};
pub use visitor::{VisitorResponse, VisitorService};
