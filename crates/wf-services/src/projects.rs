//! Project service, including employee assignments

use wf_auth::Action;
use wf_core::result::{OrNotFound, WfResult};
use wf_core::traits::Id;
use wf_db::{AssignmentRepository, ProjectRepository, Repository};
use wf_models::{Assignment, Employee, Project, ProjectStatus};

use crate::context::ServiceContext;

/// Project operations for one session
pub struct ProjectService<'a> {
    ctx: &'a ServiceContext,
    repo: ProjectRepository,
    assignments: AssignmentRepository,
}

impl<'a> ProjectService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        let pool = ctx.database().pool().clone();
        Self {
            ctx,
            repo: ProjectRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool),
        }
    }

    pub async fn create(&self, project: &Project) -> WfResult<Project> {
        self.ctx.require(Action::CreateProject)?;
        Ok(self.repo.create(project).await?)
    }

    pub async fn get(&self, id: Id) -> WfResult<Option<Project>> {
        self.ctx.require(Action::ViewProjects)?;
        Ok(self.repo.find_by_id(&id).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> WfResult<Option<Project>> {
        self.ctx.require(Action::ViewProjects)?;
        Ok(self.repo.find_by_name(name.trim()).await?)
    }

    pub async fn list(&self) -> WfResult<Vec<Project>> {
        self.ctx.require(Action::ListProjects)?;
        Ok(self.repo.find_all(self.ctx.list_limit()).await?)
    }

    pub async fn by_status(&self, status: ProjectStatus) -> WfResult<Vec<Project>> {
        self.ctx.require(Action::ListProjects)?;
        Ok(self.repo.find_by_status(status).await?)
    }

    pub async fn update(&self, project: &Project) -> WfResult<Project> {
        self.ctx.require(Action::UpdateProject)?;
        Ok(self.repo.update(project).await?)
    }

    pub async fn set_status(&self, id: Id, status: ProjectStatus) -> WfResult<Project> {
        self.ctx.require(Action::UpdateProject)?;
        let mut project = self
            .repo
            .find_by_id(&id)
            .await?
            .or_not_found("Project", "id", id)?;
        project.set_status(status);
        Ok(self.repo.update(&project).await?)
    }

    /// Removes the project's assignments along with it
    pub async fn delete(&self, id: Id) -> WfResult<()> {
        self.ctx.require(Action::DeleteProject)?;
        Ok(self.repo.delete(&id).await?)
    }

    /// Fails if either side is missing or the pair is already assigned
    pub async fn assign(&self, employee_id: &str, project_id: Id) -> WfResult<Assignment> {
        self.ctx.require(Action::AssignEmployee)?;
        Ok(self.assignments.assign(employee_id, project_id).await?)
    }

    /// Assign by project name
    pub async fn assign_by_name(&self, employee_id: &str, project_name: &str) -> WfResult<Assignment> {
        self.ctx.require(Action::AssignEmployee)?;
        let name = project_name.trim();
        let project = self
            .repo
            .find_by_name(name)
            .await?
            .or_not_found("Project", "name", name)?;
        let project_id = project
            .id()
            .or_not_found("Project", "name", name)?;
        self.assign(employee_id, project_id).await
    }

    pub async fn unassign(&self, employee_id: &str, project_id: Id) -> WfResult<()> {
        self.ctx.require(Action::UnassignEmployee)?;
        Ok(self.assignments.unassign(employee_id, project_id).await?)
    }

    /// Employees assigned to a project
    pub async fn team(&self, project_id: Id) -> WfResult<Vec<Employee>> {
        self.ctx.require(Action::ViewProjects)?;
        Ok(self.assignments.employees_of_project(project_id).await?)
    }

    /// Projects an employee is assigned to
    pub async fn projects_of(&self, employee_id: &str) -> WfResult<Vec<Project>> {
        self.ctx.require(Action::ViewProjects)?;
        Ok(self.assignments.projects_of_employee(employee_id).await?)
    }
}
