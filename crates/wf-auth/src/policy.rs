//! Role-based authorization policy
//!
//! The role -> action mapping is a fixed, exhaustive `match`. Lookups by tag
//! deny anything they do not recognise.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use wf_models::Role;

/// Unrecognised action tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

/// Every operation subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateEmployee,
    SearchEmployee,
    ListEmployees,
    UpdateEmployee,
    DeleteEmployee,
    CreateDepartment,
    ListDepartments,
    UpdateDepartment,
    DeleteDepartment,
    CreateProject,
    ViewProjects,
    ListProjects,
    UpdateProject,
    DeleteProject,
    AssignEmployee,
    UnassignEmployee,
    LogTime,
    ViewTimeRecords,
    UpdateTimeRecord,
    DeleteTimeRecord,
    GenerateReports,
    ViewReports,
    ManageUsers,
    ChangePassword,
}

impl Action {
    pub const ALL: [Action; 24] = [
        Self::CreateEmployee,
        Self::SearchEmployee,
        Self::ListEmployees,
        Self::UpdateEmployee,
        Self::DeleteEmployee,
        Self::CreateDepartment,
        Self::ListDepartments,
        Self::UpdateDepartment,
        Self::DeleteDepartment,
        Self::CreateProject,
        Self::ViewProjects,
        Self::ListProjects,
        Self::UpdateProject,
        Self::DeleteProject,
        Self::AssignEmployee,
        Self::UnassignEmployee,
        Self::LogTime,
        Self::ViewTimeRecords,
        Self::UpdateTimeRecord,
        Self::DeleteTimeRecord,
        Self::GenerateReports,
        Self::ViewReports,
        Self::ManageUsers,
        Self::ChangePassword,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateEmployee => "create_employee",
            Self::SearchEmployee => "search_employee",
            Self::ListEmployees => "list_employees",
            Self::UpdateEmployee => "update_employee",
            Self::DeleteEmployee => "delete_employee",
            Self::CreateDepartment => "create_department",
            Self::ListDepartments => "list_departments",
            Self::UpdateDepartment => "update_department",
            Self::DeleteDepartment => "delete_department",
            Self::CreateProject => "create_project",
            Self::ViewProjects => "view_projects",
            Self::ListProjects => "list_projects",
            Self::UpdateProject => "update_project",
            Self::DeleteProject => "delete_project",
            Self::AssignEmployee => "assign_employee",
            Self::UnassignEmployee => "unassign_employee",
            Self::LogTime => "log_time",
            Self::ViewTimeRecords => "view_time_records",
            Self::UpdateTimeRecord => "update_time_record",
            Self::DeleteTimeRecord => "delete_time_record",
            Self::GenerateReports => "generate_reports",
            Self::ViewReports => "view_reports",
            Self::ManageUsers => "manage_users",
            Self::ChangePassword => "change_password",
        }
    }

    /// Tag used by the previous system, if the action existed there
    pub fn legacy_tag(&self) -> Option<&'static str> {
        let tag = match self {
            Self::CreateEmployee => "crear_empleado",
            Self::SearchEmployee => "buscar_empleado",
            Self::ListEmployees => "listar_empleados",
            Self::UpdateEmployee => "actualizar_empleado",
            Self::DeleteEmployee => "eliminar_empleado",
            Self::CreateDepartment => "crear_departamento",
            Self::UpdateDepartment => "actualizar_departamento",
            Self::DeleteDepartment => "eliminar_departamento",
            Self::CreateProject => "crear_proyecto",
            Self::ViewProjects => "ver_proyectos",
            Self::ListProjects => "listar_proyectos",
            Self::UpdateProject => "actualizar_proyecto",
            Self::DeleteProject => "eliminar_proyecto",
            Self::AssignEmployee => "asignar_empleado_proyecto",
            Self::UnassignEmployee => "desasignar_empleado_proyecto",
            Self::LogTime => "registrar_tiempo",
            Self::UpdateTimeRecord => "actualizar_registro",
            Self::DeleteTimeRecord => "eliminar_registro",
            Self::GenerateReports => "generar_informes",
            Self::ViewReports => "ver_informes",
            Self::ChangePassword => "cambiar_contraseña",
            Self::ListDepartments | Self::ViewTimeRecords | Self::ManageUsers => return None,
        };
        Some(tag)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    /// Accepts the current tags and the legacy ones
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == tag || action.legacy_tag() == Some(tag))
            .ok_or_else(|| UnknownAction(tag.to_string()))
    }
}

/// Whether `role` may perform `action`
pub fn allows(role: Role, action: Action) -> bool {
    use Action::*;

    match role {
        Role::Admin => true,
        Role::Supervisor => matches!(
            action,
            SearchEmployee
                | ListEmployees
                | LogTime
                | ViewTimeRecords
                | UpdateTimeRecord
                | ViewProjects
                | ListProjects
                | ChangePassword
                | ViewReports
        ),
        Role::Employee => matches!(
            action,
            SearchEmployee | ListEmployees | LogTime | ViewProjects | ChangePassword
        ),
    }
}

/// Tag-based permission lookup
///
/// Unknown roles and unknown actions are denied.
pub fn has_permission(role: &str, action: &str) -> bool {
    match (role.parse::<Role>(), action.parse::<Action>()) {
        (Ok(role), Ok(action)) => allows(role, action),
        _ => false,
    }
}

/// Actions granted to a role, in declaration order
pub fn permitted_actions(role: Role) -> Vec<Action> {
    Action::ALL.iter().copied().filter(|a| allows(role, *a)).collect()
}
