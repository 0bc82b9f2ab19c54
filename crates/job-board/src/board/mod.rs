//! Job postings, the application lifecycle, position accounting, and saved-job
//! bookmarks, plus the HTTP router exposing them.

mod accounts;
mod catalogue;
pub mod domain;
mod lifecycle;
pub mod memory;
pub mod positions;
mod postings;
pub mod repository;
pub mod router;
mod saved;
mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use accounts::{NewCompany, NewUser, ProfileChanges};
pub use catalogue::{CatalogueImportError, CatalogueImporter, CatalogueSummary};
pub use domain::{
    Application, ApplicationId, ApplicationStatus, Company, CompanyId, Job, JobId, ProfileUpdate,
    SavedJobs, SavedJobsChange, UnknownStatus, User, UserId, UserProfile, UserRole,
};
pub use memory::InMemoryBoardStore;
pub use postings::{experience_level, FieldValue, JobPostingRequest};
pub use repository::{
    ApplicationFilter, ApplicationRepository, BoardStore, CompanyRepository, JobFilter,
    JobRepository, RepositoryError, StatusGuard, UserRepository,
};
pub use router::{board_router, Actor, BoardState, ACTOR_HEADER};
pub use service::{BoardError, Entity, ErrorKind, JobBoardService};
