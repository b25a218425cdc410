//! Time tracking service

use wf_auth::Action;
use wf_core::result::WfResult;
use wf_core::traits::Id;
use wf_db::{Repository, TimeRecordRepository};
use wf_models::TimeRecord;

use crate::context::ServiceContext;

/// Time record operations for one session
pub struct TimeRecordService<'a> {
    ctx: &'a ServiceContext,
    repo: TimeRecordRepository,
}

impl<'a> TimeRecordService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            repo: TimeRecordRepository::new(ctx.database().pool().clone()),
        }
    }

    /// Fails with a referential error if the employee does not exist
    pub async fn log(&self, record: &TimeRecord) -> WfResult<TimeRecord> {
        self.ctx.require(Action::LogTime)?;
        Ok(self.repo.create(record).await?)
    }

    pub async fn get(&self, id: Id) -> WfResult<Option<TimeRecord>> {
        self.ctx.require(Action::ViewTimeRecords)?;
        Ok(self.repo.find_by_id(&id).await?)
    }

    pub async fn list(&self) -> WfResult<Vec<TimeRecord>> {
        self.ctx.require(Action::ViewTimeRecords)?;
        Ok(self.repo.find_all(self.ctx.list_limit()).await?)
    }

    pub async fn by_employee(&self, employee_id: &str) -> WfResult<Vec<TimeRecord>> {
        self.ctx.require(Action::ViewTimeRecords)?;
        Ok(self.repo.find_by_employee(employee_id.trim()).await?)
    }

    pub async fn by_project_label(&self, project: &str) -> WfResult<Vec<TimeRecord>> {
        self.ctx.require(Action::ViewTimeRecords)?;
        Ok(self.repo.find_by_project_label(project.trim()).await?)
    }

    /// Sum of hours across all records
    pub async fn total_hours(&self) -> WfResult<f64> {
        self.ctx.require(Action::ViewTimeRecords)?;
        Ok(self.repo.total_hours().await?)
    }

    /// The owning employee never changes
    pub async fn update(&self, record: &TimeRecord) -> WfResult<TimeRecord> {
        self.ctx.require(Action::UpdateTimeRecord)?;
        Ok(self.repo.update(record).await?)
    }

    pub async fn delete(&self, id: Id) -> WfResult<()> {
        self.ctx.require(Action::DeleteTimeRecord)?;
        Ok(self.repo.delete(&id).await?)
    }
}
