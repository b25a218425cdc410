//! Department service

use wf_auth::Action;
use wf_core::result::WfResult;
use wf_core::traits::Id;
use wf_db::{DepartmentRepository, EmployeeRepository, Repository};
use wf_models::{Department, Employee};

use crate::context::ServiceContext;

/// Department operations for one session
pub struct DepartmentService<'a> {
    ctx: &'a ServiceContext,
    repo: DepartmentRepository,
}

impl<'a> DepartmentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            repo: DepartmentRepository::new(ctx.database().pool().clone()),
        }
    }

    pub async fn create(&self, department: &Department) -> WfResult<Department> {
        self.ctx.require(Action::CreateDepartment)?;
        Ok(self.repo.create(department).await?)
    }

    pub async fn get(&self, id: Id) -> WfResult<Option<Department>> {
        self.ctx.require(Action::ListDepartments)?;
        Ok(self.repo.find_by_id(&id).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> WfResult<Option<Department>> {
        self.ctx.require(Action::ListDepartments)?;
        Ok(self.repo.find_by_name(name.trim()).await?)
    }

    pub async fn list(&self) -> WfResult<Vec<Department>> {
        self.ctx.require(Action::ListDepartments)?;
        Ok(self.repo.find_all(self.ctx.list_limit()).await?)
    }

    pub async fn count(&self) -> WfResult<i64> {
        self.ctx.require(Action::ListDepartments)?;
        Ok(self.repo.count().await?)
    }

    /// Employees currently in the department
    pub async fn members(&self, id: Id) -> WfResult<Vec<Employee>> {
        self.ctx.require(Action::ListEmployees)?;
        let employees = EmployeeRepository::new(self.ctx.database().pool().clone());
        Ok(employees.find_by_department(id).await?)
    }

    pub async fn update(&self, department: &Department) -> WfResult<Department> {
        self.ctx.require(Action::UpdateDepartment)?;
        Ok(self.repo.update(department).await?)
    }

    /// Fails with a referential error while employees still belong to it
    pub async fn delete(&self, id: Id) -> WfResult<()> {
        self.ctx.require(Action::DeleteDepartment)?;
        Ok(self.repo.delete(&id).await?)
    }
}
