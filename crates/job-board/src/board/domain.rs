use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for worker and employer accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// A job posting. `position` is the seat capacity and never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: f64,
    pub location: String,
    pub job_type: String,
    pub experience_level: u32,
    pub contact_number: String,
    pub company_id: CompanyId,
    pub position: u32,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// A worker's application to a single job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: UserId,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Status tracked for every application. Only `Accepted` consumes a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Waitlist,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Waitlist,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Waitlist => "waitlist",
        }
    }

    /// Comma separated list of every accepted status label.
    pub fn valid_labels() -> String {
        Self::ALL
            .iter()
            .map(|status| status.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Worker,
    Employer,
}

/// Profile fields; the URL strings come from the upload collaborator as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub role: UserRole,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub saved_jobs: SavedJobs,
    pub created_at: DateTime<Utc>,
}

/// Worker bookmarks. Each job id is held at most once; order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<JobId>")]
pub struct SavedJobs(Vec<JobId>);

impl SavedJobs {
    pub fn contains(&self, job_id: &JobId) -> bool {
        self.0.iter().any(|saved| saved == job_id)
    }

    /// Returns `false` when the job was already saved.
    pub fn insert(&mut self, job_id: JobId) -> bool {
        if self.contains(&job_id) {
            return false;
        }
        self.0.push(job_id);
        true
    }

    /// Removes every occurrence by identity. Returns `false` when nothing was saved.
    pub fn remove(&mut self, job_id: &JobId) -> bool {
        let before = self.0.len();
        self.0.retain(|saved| saved != job_id);
        self.0.len() != before
    }

    /// Flips membership and reports whether the job is saved afterwards.
    pub fn toggle(&mut self, job_id: JobId) -> bool {
        if self.remove(&job_id) {
            false
        } else {
            self.0.push(job_id);
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<JobId> {
        self.0.clone()
    }
}

/// A single bookmark edit, applied by the store while it holds the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedJobsChange {
    Save(JobId),
    Unsave(JobId),
    Toggle(JobId),
}

impl SavedJobsChange {
    /// `Save` and `Unsave` report whether the set changed. `Toggle` reports
    /// whether the job is saved afterwards.
    pub fn apply(self, saved: &mut SavedJobs) -> bool {
        match self {
            SavedJobsChange::Save(job_id) => saved.insert(job_id),
            SavedJobsChange::Unsave(job_id) => saved.remove(&job_id),
            SavedJobsChange::Toggle(job_id) => saved.toggle(job_id),
        }
    }
}

/// Account fields to overwrite. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }

    pub fn apply_to(self, user: &mut User) {
        if let Some(fullname) = self.fullname {
            user.fullname = fullname;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone_number) = self.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(bio) = self.bio {
            user.profile.bio = Some(bio);
        }
        if let Some(skills) = self.skills {
            user.profile.skills = skills;
        }
    }
}

impl From<Vec<JobId>> for SavedJobs {
    fn from(ids: Vec<JobId>) -> Self {
        ids.into_iter().collect()
    }
}

impl FromIterator<JobId> for SavedJobs {
    fn from_iter<I: IntoIterator<Item = JobId>>(iter: I) -> Self {
        let mut saved = SavedJobs::default();
        for id in iter {
            saved.insert(id);
        }
        saved
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
