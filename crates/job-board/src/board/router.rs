use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::accounts::{NewCompany, NewUser, ProfileChanges};
use super::domain::{Application, ApplicationId, Company, Job, JobId, User, UserId};
use super::postings::JobPostingRequest;
use super::repository::BoardStore;
use super::service::{BoardError, ErrorKind, JobBoardService};
use super::views::{JobDetail, JobListing, StatusChange, WorkerApplication};

/// Header the upstream identity layer sets to the authenticated user id.
pub const ACTOR_HEADER: &str = "x-user-id";

/// Shared handler state.
pub struct BoardState<S> {
    service: Arc<JobBoardService<S>>,
    expose_error_details: bool,
}

impl<S> Clone for BoardState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            expose_error_details: self.expose_error_details,
        }
    }
}

impl<S> BoardState<S> {
    pub fn new(service: Arc<JobBoardService<S>>, expose_error_details: bool) -> Self {
        Self {
            service,
            expose_error_details,
        }
    }
}

/// Router builder exposing every board operation under `/api/v1`.
pub fn board_router<S>(state: BoardState<S>) -> Router
where
    S: BoardStore + 'static,
{
    Router::new()
        .route("/api/v1/job/post", post(post_job_handler::<S>))
        .route("/api/v1/job/get", get(list_jobs_handler::<S>))
        .route("/api/v1/job/get/:job_id", get(job_detail_handler::<S>))
        .route("/api/v1/job/admin/get", get(employer_jobs_handler::<S>))
        .route(
            "/api/v1/job/admin/all-employers",
            get(all_jobs_handler::<S>),
        )
        .route(
            "/api/v1/application/apply/:job_id",
            post(apply_handler::<S>),
        )
        .route(
            "/api/v1/application/get",
            get(worker_applications_handler::<S>),
        )
        .route(
            "/api/v1/application/:job_id/applicants",
            get(job_applicants_handler::<S>),
        )
        .route(
            "/api/v1/application/status/:application_id/update",
            post(update_status_handler::<S>),
        )
        .route(
            "/api/v1/application/employer/all",
            get(employer_applications_handler::<S>),
        )
        .route(
            "/api/v1/user/jobs/save/:job_id",
            post(save_job_handler::<S>),
        )
        .route(
            "/api/v1/user/jobs/unsave/:job_id",
            post(unsave_job_handler::<S>),
        )
        .route(
            "/api/v1/user/jobs/toggle-save/:job_id",
            post(toggle_saved_job_handler::<S>),
        )
        .route("/api/v1/user/jobs/saved", get(saved_jobs_handler::<S>))
        .route("/api/v1/user/register", post(register_user_handler::<S>))
        .route("/api/v1/user/profile", get(profile_handler::<S>))
        .route(
            "/api/v1/user/profile/update",
            post(update_profile_handler::<S>),
        )
        .route(
            "/api/v1/company/register",
            post(register_company_handler::<S>),
        )
        .with_state(state)
}

/// Authenticated caller as supplied by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub UserId);

#[async_trait]
impl<St> FromRequestParts<St> for Actor
where
    St: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Actor(UserId(value.to_string())))
            .ok_or_else(|| {
                envelope(
                    StatusCode::UNAUTHORIZED,
                    Some("User not authenticated".to_string()),
                    Empty {},
                )
            })
    }
}

/// Uniform body: `{message?, success, ...payload}`.
#[derive(Serialize)]
struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    success: bool,
    #[serde(flatten)]
    payload: T,
}

#[derive(Serialize)]
struct Empty {}

#[derive(Serialize)]
struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn envelope<T: Serialize>(status: StatusCode, message: Option<String>, payload: T) -> Response {
    let body = Envelope {
        message,
        success: status.is_success(),
        payload,
    };
    (status, Json(body)).into_response()
}

pub(crate) fn error_response(error: BoardError, expose_error_details: bool) -> Response {
    let status = match error.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(%error, "board request failed");
        let detail = ErrorDetail {
            error: expose_error_details.then(|| error.to_string()),
        };
        return envelope(status, Some("Internal server error".to_string()), detail);
    }

    envelope(status, Some(error.to_string()), Empty {})
}

#[derive(Serialize)]
struct JobPayload {
    job: Job,
}

#[derive(Serialize)]
struct JobDetailPayload {
    job: JobDetail,
}

#[derive(Serialize)]
struct JobsPayload {
    jobs: Vec<JobListing>,
}

#[derive(Serialize)]
struct ApplicationPayload {
    application: Application,
}

#[derive(Serialize)]
struct StatusChangePayload {
    application: StatusChange,
}

#[derive(Serialize)]
struct WorkerApplicationsPayload {
    application: Vec<WorkerApplication>,
}

#[derive(Serialize)]
struct UserPayload {
    user: User,
}

#[derive(Serialize)]
struct CompanyPayload {
    company: Company,
}

#[derive(Serialize)]
struct ToggledPayload {
    is_saved: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct KeywordQuery {
    #[serde(default)]
    keyword: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusRequest {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

pub(crate) async fn post_job_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(employer): Actor,
    Json(request): Json<JobPostingRequest>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.post_job(&employer, request) {
        Ok(job) => envelope(
            StatusCode::CREATED,
            Some("New job created successfully.".to_string()),
            JobPayload { job },
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn list_jobs_handler<S>(
    State(state): State<BoardState<S>>,
    Query(query): Query<KeywordQuery>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.list_jobs(query.keyword.as_deref()) {
        Ok(jobs) => envelope(StatusCode::OK, None, JobsPayload { jobs }),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn job_detail_handler<S>(
    State(state): State<BoardState<S>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.job_detail(&JobId(job_id)) {
        Ok(job) => envelope(StatusCode::OK, None, JobDetailPayload { job }),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn employer_jobs_handler<S>(
    State(state): State<BoardState<S>>,
    actor: Option<Actor>,
) -> Response
where
    S: BoardStore + 'static,
{
    let employer = actor.map(|Actor(id)| id);
    match state.service.employer_jobs(employer.as_ref()) {
        Ok(jobs) => envelope(StatusCode::OK, None, JobsPayload { jobs }),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn all_jobs_handler<S>(
    State(state): State<BoardState<S>>,
    _actor: Actor,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.all_jobs() {
        Ok(jobs) => envelope(StatusCode::OK, None, JobsPayload { jobs }),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn apply_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(worker): Actor,
    Path(job_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.apply(&worker, &JobId(job_id)) {
        Ok(application) => envelope(
            StatusCode::CREATED,
            Some("Job applied successfully.".to_string()),
            ApplicationPayload { application },
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn worker_applications_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(worker): Actor,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.worker_applications(&worker) {
        Ok(application) => envelope(
            StatusCode::OK,
            None,
            WorkerApplicationsPayload { application },
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn job_applicants_handler<S>(
    State(state): State<BoardState<S>>,
    _actor: Actor,
    Path(job_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.job_applicants(&JobId(job_id)) {
        Ok(roster) => envelope(StatusCode::OK, None, roster),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn update_status_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(employer): Actor,
    Path(application_id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Response
where
    S: BoardStore + 'static,
{
    let status = request.status.unwrap_or_default();
    match state
        .service
        .update_status(&employer, &ApplicationId(application_id), &status)
    {
        Ok(application) => envelope(
            StatusCode::OK,
            Some("Status updated successfully.".to_string()),
            StatusChangePayload { application },
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn employer_applications_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(employer): Actor,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.employer_applications(&employer) {
        Ok(applications) => envelope(StatusCode::OK, None, applications),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn save_job_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(worker): Actor,
    Path(job_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.save_job(&worker, &JobId(job_id)) {
        Ok(()) => envelope(
            StatusCode::OK,
            Some("Job saved successfully".to_string()),
            Empty {},
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn unsave_job_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(worker): Actor,
    Path(job_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.unsave_job(&worker, &JobId(job_id)) {
        Ok(()) => envelope(
            StatusCode::OK,
            Some("Job removed from saved".to_string()),
            Empty {},
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn toggle_saved_job_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(worker): Actor,
    Path(job_id): Path<String>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.toggle_saved_job(&worker, &JobId(job_id)) {
        Ok(is_saved) => {
            let message = if is_saved {
                "Job saved successfully"
            } else {
                "Job removed from saved"
            };
            envelope(
                StatusCode::OK,
                Some(message.to_string()),
                ToggledPayload { is_saved },
            )
        }
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn saved_jobs_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(worker): Actor,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.saved_jobs(&worker) {
        Ok(listing) => envelope(StatusCode::OK, None, listing),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn register_user_handler<S>(
    State(state): State<BoardState<S>>,
    Json(new_user): Json<NewUser>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.register_user(new_user) {
        Ok(user) => envelope(
            StatusCode::CREATED,
            Some("Account created successfully.".to_string()),
            UserPayload { user },
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn profile_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(user_id): Actor,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.profile(&user_id) {
        Ok(user) => envelope(StatusCode::OK, None, UserPayload { user }),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

pub(crate) async fn update_profile_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(user_id): Actor,
    Json(changes): Json<ProfileChanges>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.update_profile(&user_id, changes) {
        Ok(user) => envelope(
            StatusCode::OK,
            Some("Profile updated successfully.".to_string()),
            UserPayload { user },
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}

/// Open to any authenticated account.
pub(crate) async fn register_company_handler<S>(
    State(state): State<BoardState<S>>,
    Actor(_registrant): Actor,
    Json(new_company): Json<NewCompany>,
) -> Response
where
    S: BoardStore + 'static,
{
    match state.service.register_company(new_company) {
        Ok(company) => envelope(
            StatusCode::CREATED,
            Some("Company registered successfully.".to_string()),
            CompanyPayload { company },
        ),
        Err(error) => error_response(error, state.expose_error_details),
    }
}
