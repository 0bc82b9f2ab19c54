use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use super::domain::{Company, ProfileUpdate, SavedJobs, User, UserId, UserProfile, UserRole};
use super::postings::split_list;
use super::repository::{BoardStore, CompanyRepository, RepositoryError, UserRepository};
use super::service::{next_company_id, next_user_id, BoardError, Entity, JobBoardService};

/// Account details for a new worker or employer. Credentials are handled upstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: String,
    pub role: UserRole,
    #[serde(default)]
    pub profile: UserProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Profile edits submitted by the account holder. Blank fields keep the stored
/// value; `skills` is a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileChanges {
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
}

impl ProfileChanges {
    fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            fullname: non_blank(self.fullname),
            email: non_blank(self.email),
            phone_number: non_blank(self.phone_number),
            bio: non_blank(self.bio),
            skills: non_blank(self.skills).map(|skills| split_list(&skills)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl<S> JobBoardService<S>
where
    S: BoardStore + 'static,
{
    pub fn register_user(&self, new_user: NewUser) -> Result<User, BoardError> {
        let NewUser {
            fullname,
            email,
            phone_number,
            role,
            profile,
        } = new_user;

        if [&fullname, &email, &phone_number]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(BoardError::Validation("Something is missing".to_string()));
        }

        let user = User {
            id: next_user_id(),
            fullname: fullname.trim().to_string(),
            email: email.trim().to_string(),
            phone_number: phone_number.trim().to_string(),
            role,
            profile,
            saved_jobs: SavedJobs::default(),
            created_at: Utc::now(),
        };

        let stored = self.store.insert_user(user).map_err(|error| match error {
            RepositoryError::Conflict => BoardError::EmailTaken,
            other => BoardError::Repository(other),
        })?;
        info!(user_id = %stored.id.0, role = ?stored.role, "account registered");
        Ok(stored)
    }

    pub fn register_company(&self, new_company: NewCompany) -> Result<Company, BoardError> {
        if new_company.name.trim().is_empty() {
            return Err(BoardError::Validation("Company name is required".to_string()));
        }

        let company = Company {
            id: next_company_id(),
            name: new_company.name.trim().to_string(),
            logo: new_company.logo,
            website: new_company.website,
            location: new_company.location,
        };
        let stored = self.store.insert_company(company)?;
        info!(company_id = %stored.id.0, name = %stored.name, "company registered");
        Ok(stored)
    }

    pub fn profile(&self, user_id: &UserId) -> Result<User, BoardError> {
        self.require_user(user_id)
    }

    pub fn update_profile(
        &self,
        user_id: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, BoardError> {
        let update = changes.into_update();
        if update.is_empty() {
            debug!(user_id = %user_id.0, "profile update without changes");
        }

        let user = self
            .store
            .update_profile(user_id, update)
            .map_err(|error| match error {
                RepositoryError::NotFound => BoardError::NotFound(Entity::User),
                RepositoryError::Conflict => BoardError::EmailTaken,
                other => BoardError::Repository(other),
            })?;
        info!(user_id = %user.id.0, "profile updated");
        Ok(user)
    }
}
