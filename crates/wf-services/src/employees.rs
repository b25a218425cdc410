//! Employee service

use wf_auth::Action;
use wf_core::result::WfResult;
use wf_core::traits::Id;
use wf_db::{EmployeeRepository, Repository};
use wf_models::Employee;

use crate::context::ServiceContext;

/// Employee operations for one session
pub struct EmployeeService<'a> {
    ctx: &'a ServiceContext,
    repo: EmployeeRepository,
}

impl<'a> EmployeeService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            repo: EmployeeRepository::new(ctx.database().pool().clone()),
        }
    }

    /// Fails if the id is taken or the department does not exist
    pub async fn create(&self, employee: &Employee) -> WfResult<Employee> {
        self.ctx.require(Action::CreateEmployee)?;
        Ok(self.repo.create(employee).await?)
    }

    pub async fn get(&self, id: &str) -> WfResult<Option<Employee>> {
        self.ctx.require(Action::SearchEmployee)?;
        Ok(self.repo.find_by_id(&id.trim().to_string()).await?)
    }

    pub async fn list(&self) -> WfResult<Vec<Employee>> {
        self.ctx.require(Action::ListEmployees)?;
        Ok(self.repo.find_all(self.ctx.list_limit()).await?)
    }

    pub async fn by_department(&self, department_id: Id) -> WfResult<Vec<Employee>> {
        self.ctx.require(Action::ListEmployees)?;
        Ok(self.repo.find_by_department(department_id).await?)
    }

    pub async fn count(&self) -> WfResult<i64> {
        self.ctx.require(Action::ListEmployees)?;
        Ok(self.repo.count().await?)
    }

    pub async fn update(&self, employee: &Employee) -> WfResult<Employee> {
        self.ctx.require(Action::UpdateEmployee)?;
        Ok(self.repo.update(employee).await?)
    }

    /// Move an employee to another department, or to none
    pub async fn set_department(&self, employee_id: &str, department_id: Option<Id>) -> WfResult<()> {
        self.ctx.require(Action::UpdateEmployee)?;
        Ok(self.repo.set_department(employee_id, department_id).await?)
    }

    /// Fails with a referential error while time records or assignments remain
    pub async fn delete(&self, id: &str) -> WfResult<()> {
        self.ctx.require(Action::DeleteEmployee)?;
        Ok(self.repo.delete(&id.to_string()).await?)
    }
}
