//! Division integrity service
//!
//! Owns every state transition of a division and polices the invariants:
//! a manager must be a member of the division, seeded divisions are
//! protected from ordinary mutation, a division is only deletable when it
//! has no members and no manager, and division names are unique.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{DivisionRepository, EmployeeRepository};
use crate::models::{
    CreateDivisionRequest, Division, DivisionDetail, DivisionMember, EmployeeSearchQuery,
    EmployeeSummary, UpdateDivisionRequest,
};
use crate::utils::validation::validate_division_name;
use crate::utils::{AppError, AppResult};

/// Division integrity service
pub struct DivisionService {
    pool: SqlitePool,
}

impl DivisionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<DivisionDetail>> {
        let divisions = DivisionRepository::new(&self.pool).list().await?;

        let mut details = Vec::with_capacity(divisions.len());
        for division in divisions {
            details.push(self.resolve_detail(division).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<DivisionDetail> {
        let division = DivisionRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Division not found"))?;

        self.resolve_detail(division).await
    }

    pub async fn create(&self, req: CreateDivisionRequest) -> AppResult<DivisionDetail> {
        if !validate_division_name(&req.name) {
            return Err(AppError::validation("Division name is required"));
        }
        let name = req.name.trim().to_string();

        let repo = DivisionRepository::new(&self.pool);
        if repo.get_by_name(&name).await?.is_some() {
            return Err(AppError::conflict(format!(
                "A division named '{}' already exists",
                name
            )));
        }

        let employee_ids = dedupe(req.employee_ids);
        self.check_membership(&employee_ids, req.manager_id).await?;

        let now = Utc::now();
        let division = Division {
            id: Uuid::new_v4(),
            name,
            current_project: req.current_project,
            manager_id: req.manager_id,
            employee_ids,
            seeded: false,
            created_at: now,
            updated_at: now,
        };

        repo.create(&division).await?;
        self.resolve_detail(division).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateDivisionRequest,
        privileged_override: bool,
    ) -> AppResult<DivisionDetail> {
        let repo = DivisionRepository::new(&self.pool);
        let division = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Division not found"))?;

        if division.seeded && !privileged_override {
            return Err(AppError::forbidden(
                "Seeded divisions can only be changed with the allowSeededUpdate override",
            ));
        }

        // Membership is replaced wholesale when supplied, kept otherwise
        let employee_ids = match req.employee_ids {
            Some(ids) => {
                let ids = dedupe(ids);
                self.check_membership(&ids, None).await?;
                ids
            }
            None => division.employee_ids.clone(),
        };

        // An absent or null manager clears the slot; a supplied manager
        // must be a member of the (possibly just-replaced) member set
        if let Some(manager_id) = req.manager_id {
            if !employee_ids.contains(&manager_id) {
                return Err(AppError::validation(
                    "The manager must be a member of the division",
                ));
            }
        }

        repo.replace_members_and_manager(id, req.manager_id, &employee_ids, Utc::now())
            .await?;

        let updated = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Division vanished during update"))?;
        self.resolve_detail(updated).await
    }

    pub async fn delete(&self, id: Uuid, privileged_override: bool) -> AppResult<()> {
        let repo = DivisionRepository::new(&self.pool);
        let division = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Division not found"))?;

        if division.seeded && !privileged_override {
            return Err(AppError::forbidden("Seeded divisions cannot be deleted"));
        }

        if !division.employee_ids.is_empty() || division.manager_id.is_some() {
            return Err(AppError::conflict(
                "Division still has members or a manager",
            ));
        }

        repo.delete(id).await?;
        Ok(())
    }

    /// An employee's division reference must resolve to an existing
    /// division; used by the employee create/update paths
    pub async fn ensure_exists(&self, id: Uuid) -> AppResult<()> {
        DivisionRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::validation(format!("Unknown division id: {}", id)))
    }

    /// All employees as summaries
    pub async fn employees(&self) -> AppResult<Vec<EmployeeSummary>> {
        Ok(EmployeeRepository::new(&self.pool).summaries().await?)
    }

    /// Filtered employee search; see `EmployeeSearchQuery` for the filters
    pub async fn search(&self, params: &EmployeeSearchQuery) -> AppResult<Vec<EmployeeSummary>> {
        Ok(EmployeeRepository::new(&self.pool).search(params).await?)
    }

    /// Every id must resolve to an existing employee, and the manager (when
    /// given) must be in the member list
    async fn check_membership(
        &self,
        employee_ids: &[Uuid],
        manager_id: Option<Uuid>,
    ) -> AppResult<()> {
        let existing = EmployeeRepository::new(&self.pool)
            .existing_ids(employee_ids)
            .await?;

        if let Some(missing) = employee_ids.iter().find(|id| !existing.contains(id)) {
            return Err(AppError::validation(format!(
                "Unknown employee id: {}",
                missing
            )));
        }

        if let Some(manager_id) = manager_id {
            if !employee_ids.contains(&manager_id) {
                return Err(AppError::validation(
                    "The manager must be a member of the division",
                ));
            }
        }

        Ok(())
    }

    /// Resolve manager and members to their display attributes
    async fn resolve_detail(&self, division: Division) -> AppResult<DivisionDetail> {
        let repo = EmployeeRepository::new(&self.pool);
        let summaries = repo.summaries_by_ids(&division.employee_ids).await?;

        let employees: Vec<DivisionMember> = summaries.iter().map(to_member).collect();

        let manager = match division.manager_id {
            Some(manager_id) => match summaries.iter().find(|s| s.id == manager_id) {
                Some(summary) => Some(to_member(summary)),
                // Tolerate legacy rows whose manager fell out of the member set
                None => repo
                    .summaries_by_ids(&[manager_id])
                    .await?
                    .first()
                    .map(to_member),
            },
            None => None,
        };

        Ok(DivisionDetail {
            id: division.id,
            name: division.name,
            current_project: division.current_project,
            seeded: division.seeded,
            manager,
            employees,
            created_at: division.created_at,
            updated_at: division.updated_at,
        })
    }
}

fn to_member(summary: &EmployeeSummary) -> DivisionMember {
    DivisionMember {
        id: summary.id,
        full_name: summary.full_name.clone(),
        grade: summary.grade.clone(),
        mission: summary.mission.clone(),
    }
}

fn dedupe(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
