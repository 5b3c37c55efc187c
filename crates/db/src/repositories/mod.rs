//! Database repositories.

mod admin;
mod admission;
mod course;
mod event;
mod image;
mod news;
mod resource;
mod review;
mod tag;
mod topic;
mod visitor;

pub use admin::AdminRepository;
pub use admission::AdmissionRepository;
pub use course::CourseRepository;
pub use event::EventRepository;
pub use image::ImageRepository;
pub use news::NewsRepository;
pub use resource::ResourceRepository;
pub use review::ReviewRepository;
pub use tag::TagRepository;
pub use topic::TopicRepository;
pub use visitor::VisitorRepository;
